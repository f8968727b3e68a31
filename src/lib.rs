pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::repositories::{
    ApplicationStore, JobDirectory, NotificationInbox, NotificationSink, PgApplicationStore,
    PgJobDirectory, PgNotificationStore,
};
use crate::services::{
    application_service::ApplicationService, dispatch_service::SideEffectDispatcher,
    notification_service::NotificationService,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub application_service: ApplicationService,
    pub notification_service: NotificationService,
    pub dispatcher: SideEffectDispatcher,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    /// PostgreSQL-backed state. Must be called inside a Tokio runtime because
    /// it starts the side-effect worker.
    pub fn new(pool: PgPool, jwt_secret: &str) -> Self {
        let notifications = Arc::new(PgNotificationStore::new(pool.clone()));
        Self::from_parts(
            Arc::new(PgApplicationStore::new(pool.clone())),
            Arc::new(PgJobDirectory::new(pool)),
            notifications.clone(),
            notifications,
            jwt_secret,
        )
    }

    pub fn from_parts(
        applications: Arc<dyn ApplicationStore>,
        jobs: Arc<dyn JobDirectory>,
        sink: Arc<dyn NotificationSink>,
        inbox: Arc<dyn NotificationInbox>,
        jwt_secret: &str,
    ) -> Self {
        let (dispatcher, _worker) = SideEffectDispatcher::spawn(sink, jobs.clone());
        let application_service = ApplicationService::new(applications, jobs, dispatcher.clone());
        let notification_service = NotificationService::new(inbox);

        Self {
            application_service,
            notification_service,
            dispatcher,
            jwt_secret: Arc::from(jwt_secret),
        }
    }
}
