use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use super::{NotificationInbox, NotificationSink, StoreError, StoreResult};
use crate::models::notification::{Notification, NotificationDraft, NotificationRow};
use crate::models::page::{Page, PageRequest};

const COLUMNS: &str = "id, user_id, title, message, category, action_url, is_read, read_at, created_at";

#[derive(Clone)]
pub struct PgNotificationStore {
    pool: PgPool,
}

impl PgNotificationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn query_failed(err: sqlx::Error) -> StoreError {
    StoreError::Query(err.to_string())
}

fn convert(rows: Vec<NotificationRow>) -> StoreResult<Vec<Notification>> {
    rows.into_iter()
        .map(Notification::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(StoreError::Query)
}

#[async_trait]
impl NotificationSink for PgNotificationStore {
    #[instrument(skip(self, draft), fields(recipient_id = %draft.recipient_id, category = %draft.category))]
    async fn notify(&self, draft: NotificationDraft) -> StoreResult<Notification> {
        let row = sqlx::query_as::<_, NotificationRow>(&format!(
            r#"
            INSERT INTO notifications (user_id, title, message, category, action_url, is_read)
            VALUES ($1, $2, $3, $4, $5, FALSE)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(draft.recipient_id)
        .bind(&draft.title)
        .bind(&draft.message)
        .bind(draft.category.as_str())
        .bind(&draft.action_url)
        .fetch_one(&self.pool)
        .await
        .map_err(query_failed)?;

        Notification::try_from(row).map_err(StoreError::Query)
    }
}

#[async_trait]
impl NotificationInbox for PgNotificationStore {
    async fn get(&self, id: Uuid) -> StoreResult<Option<Notification>> {
        let row = sqlx::query_as::<_, NotificationRow>(&format!(
            "SELECT {COLUMNS} FROM notifications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_failed)?;

        row.map(Notification::try_from)
            .transpose()
            .map_err(StoreError::Query)
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> StoreResult<Page<Notification>> {
        let rows = sqlx::query_as::<_, NotificationRow>(&format!(
            "SELECT {COLUMNS} FROM notifications WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(page.per_page)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(query_failed)?;

        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM notifications WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(query_failed)?;

        Ok(Page::new(convert(rows)?, total, page))
    }

    async fn list_unread(&self, user_id: Uuid) -> StoreResult<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationRow>(&format!(
            "SELECT {COLUMNS} FROM notifications WHERE user_id = $1 AND is_read = FALSE \
             ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(query_failed)?;

        convert(rows)
    }

    async fn count_unread(&self, user_id: Uuid) -> StoreResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(query_failed)
    }

    async fn mark_read(&self, id: Uuid) -> StoreResult<Notification> {
        let row = sqlx::query_as::<_, NotificationRow>(&format!(
            r#"
            UPDATE notifications
            SET is_read = TRUE, read_at = COALESCE(read_at, NOW())
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_failed)?
        .ok_or_else(|| StoreError::NotFound(format!("notification {}", id)))?;

        Notification::try_from(row).map_err(StoreError::Query)
    }

    async fn mark_all_read(&self, user_id: Uuid) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = NOW() \
             WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(query_failed)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("notification {}", id)));
        }
        Ok(())
    }

    async fn delete_all(&self, user_id: Uuid) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(query_failed)?;
        Ok(result.rows_affected())
    }
}
