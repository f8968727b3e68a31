pub mod applications;
pub mod health;
pub mod notifications;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::middleware::{auth::require_bearer_auth, rate_limit};
use crate::AppState;

/// Every route of the service. `/health` is public, everything under `/api`
/// requires a bearer token and shares one rate limiter.
pub fn build_router(state: AppState, api_rps: u32) -> Router {
    let application_api = Router::new()
        .route(
            "/api/applications",
            get(applications::list_my_applications).post(applications::apply_for_job),
        )
        .route(
            "/api/applications/stats",
            get(applications::application_stats),
        )
        .route(
            "/api/applications/job/:job_id",
            get(applications::list_job_applications),
        )
        .route(
            "/api/applications/job/:job_id/count",
            get(applications::count_job_applications),
        )
        .route(
            "/api/applications/job/:job_id/applied",
            get(applications::has_applied),
        )
        .route(
            "/api/applications/status/:status",
            get(applications::list_applications_by_status),
        )
        .route(
            "/api/applications/:id",
            get(applications::get_application).delete(applications::withdraw_application),
        )
        .route(
            "/api/applications/:id/status",
            put(applications::update_application_status),
        )
        .route(
            "/api/applications/:id/interview",
            post(applications::schedule_interview),
        );

    let notification_api = Router::new()
        .route("/api/notifications", get(notifications::list_notifications))
        .route(
            "/api/notifications/unread",
            get(notifications::list_unread_notifications),
        )
        .route("/api/notifications/count", get(notifications::unread_count))
        .route(
            "/api/notifications/mark-all-read",
            put(notifications::mark_all_as_read),
        )
        .route(
            "/api/notifications/all",
            axum::routing::delete(notifications::delete_all_notifications),
        )
        .route(
            "/api/notifications/:id",
            get(notifications::get_notification).delete(notifications::delete_notification),
        )
        .route(
            "/api/notifications/:id/read",
            put(notifications::mark_as_read),
        );

    let api = application_api
        .merge(notification_api)
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_bearer_auth,
        ))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::RateLimiter::new(api_rps),
            rate_limit::rps_middleware,
        ));

    Router::new()
        .route("/health", get(health::health))
        .merge(api)
        .with_state(state)
}
