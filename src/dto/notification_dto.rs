use serde::{Deserialize, Serialize};

use crate::models::notification::Notification;
use crate::models::page::Page;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationListResponse {
    pub items: Vec<Notification>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl From<Page<Notification>> for NotificationListResponse {
    fn from(value: Page<Notification>) -> Self {
        Self {
            items: value.items,
            total: value.total,
            page: value.page,
            per_page: value.per_page,
            total_pages: value.total_pages,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
