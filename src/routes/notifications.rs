use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;

use crate::{
    dto::application_dto::PageQuery,
    dto::notification_dto::{MessageResponse, NotificationListResponse, UnreadCountResponse},
    error::Result,
    models::user::Actor,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/notifications",
    params(
        ("page" = Option<i64>, Query, description = "Zero-based page number"),
        ("size" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Notifications, newest first", body = Json<NotificationListResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let page = state
        .notification_service
        .list(&actor, query.into())
        .await?;
    Ok(Json(NotificationListResponse::from(page)))
}

#[utoipa::path(
    get,
    path = "/api/notifications/unread",
    responses(
        (status = 200, description = "Unread notifications")
    )
)]
#[axum::debug_handler]
pub async fn list_unread_notifications(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<impl IntoResponse> {
    let items = state.notification_service.list_unread(&actor).await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/notifications/count",
    responses(
        (status = 200, description = "Unread notification count", body = Json<UnreadCountResponse>)
    )
)]
#[axum::debug_handler]
pub async fn unread_count(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<impl IntoResponse> {
    let unread_count = state.notification_service.unread_count(&actor).await?;
    Ok(Json(UnreadCountResponse { unread_count }))
}

#[utoipa::path(
    get,
    path = "/api/notifications/{id}",
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification found"),
        (status = 403, description = "Not the recipient"),
        (status = 404, description = "Notification not found")
    )
)]
#[axum::debug_handler]
pub async fn get_notification(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let notification = state.notification_service.get(id, &actor).await?;
    Ok(Json(notification))
}

#[utoipa::path(
    put,
    path = "/api/notifications/{id}/read",
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification marked as read"),
        (status = 403, description = "Not the recipient"),
        (status = 404, description = "Notification not found")
    )
)]
#[axum::debug_handler]
pub async fn mark_as_read(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let notification = state.notification_service.mark_read(id, &actor).await?;
    Ok(Json(notification))
}

#[utoipa::path(
    put,
    path = "/api/notifications/mark-all-read",
    responses(
        (status = 200, description = "All notifications marked as read")
    )
)]
#[axum::debug_handler]
pub async fn mark_all_as_read(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<impl IntoResponse> {
    state.notification_service.mark_all_read(&actor).await?;
    Ok(Json(MessageResponse::new("All notifications marked as read")))
}

#[utoipa::path(
    delete,
    path = "/api/notifications/{id}",
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification deleted"),
        (status = 403, description = "Not the recipient"),
        (status = 404, description = "Notification not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_notification(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.notification_service.delete(id, &actor).await?;
    Ok(Json(MessageResponse::new("Notification deleted successfully")))
}

#[utoipa::path(
    delete,
    path = "/api/notifications/all",
    responses(
        (status = 200, description = "All notifications deleted")
    )
)]
#[axum::debug_handler]
pub async fn delete_all_notifications(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<impl IntoResponse> {
    state.notification_service.delete_all(&actor).await?;
    Ok(Json(MessageResponse::new("All notifications deleted successfully")))
}
