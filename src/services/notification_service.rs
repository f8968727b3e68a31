use std::sync::Arc;

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::notification::Notification;
use crate::models::page::{Page, PageRequest};
use crate::models::user::Actor;
use crate::repositories::NotificationInbox;

/// A user's notification inbox. Every operation is scoped to the actor.
#[derive(Clone)]
pub struct NotificationService {
    inbox: Arc<dyn NotificationInbox>,
}

impl NotificationService {
    pub fn new(inbox: Arc<dyn NotificationInbox>) -> Self {
        Self { inbox }
    }

    async fn owned(&self, id: Uuid, actor: &Actor) -> Result<Notification> {
        let notification = self
            .inbox
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Notification {} not found", id)))?;
        if notification.user_id != actor.id {
            return Err(Error::Forbidden(
                "You don't have permission to access this notification".to_string(),
            ));
        }
        Ok(notification)
    }

    pub async fn list(&self, actor: &Actor, page: PageRequest) -> Result<Page<Notification>> {
        Ok(self.inbox.list_for_user(actor.id, page).await?)
    }

    pub async fn list_unread(&self, actor: &Actor) -> Result<Vec<Notification>> {
        Ok(self.inbox.list_unread(actor.id).await?)
    }

    pub async fn unread_count(&self, actor: &Actor) -> Result<i64> {
        Ok(self.inbox.count_unread(actor.id).await?)
    }

    pub async fn get(&self, id: Uuid, actor: &Actor) -> Result<Notification> {
        self.owned(id, actor).await
    }

    pub async fn mark_read(&self, id: Uuid, actor: &Actor) -> Result<Notification> {
        self.owned(id, actor).await?;
        Ok(self.inbox.mark_read(id).await?)
    }

    pub async fn mark_all_read(&self, actor: &Actor) -> Result<u64> {
        let updated = self.inbox.mark_all_read(actor.id).await?;
        tracing::debug!(user_id = %actor.id, updated, "Marked notifications as read");
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid, actor: &Actor) -> Result<()> {
        self.owned(id, actor).await?;
        Ok(self.inbox.delete(id).await?)
    }

    pub async fn delete_all(&self, actor: &Actor) -> Result<u64> {
        Ok(self.inbox.delete_all(actor.id).await?)
    }
}
