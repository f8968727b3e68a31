use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::application_dto::{
        ApplicationListResponse, ApplicationResponse, ApplyPayload, HasAppliedResponse,
        JobApplicationCountResponse, PageQuery, ScheduleInterviewPayload, UpdateStatusPayload,
    },
    dto::notification_dto::MessageResponse,
    error::{Error, Result},
    models::{application::ApplicationStatus, user::Actor},
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/applications",
    request_body = ApplyPayload,
    responses(
        (status = 201, description = "Application submitted", body = Json<ApplicationResponse>),
        (status = 404, description = "Job not found"),
        (status = 409, description = "Already applied"),
        (status = 422, description = "Job closed")
    )
)]
#[axum::debug_handler]
pub async fn apply_for_job(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<ApplyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let application = state
        .application_service
        .submit(
            &actor,
            payload.job_id,
            payload.cover_letter,
            payload.resume_url,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApplicationResponse::from(application)),
    ))
}

#[utoipa::path(
    get,
    path = "/api/applications",
    params(
        ("page" = Option<i64>, Query, description = "Zero-based page number"),
        ("size" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Applications of the current user", body = Json<ApplicationListResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_my_applications(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let page = state
        .application_service
        .list_by_applicant(actor.id, query.into())
        .await?;
    Ok(Json(ApplicationListResponse::from(page)))
}

#[utoipa::path(
    get,
    path = "/api/applications/stats",
    responses(
        (status = 200, description = "Application statistics for the current user")
    )
)]
#[axum::debug_handler]
pub async fn application_stats(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<impl IntoResponse> {
    let stats = state.application_service.stats(&actor).await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/applications/job/{job_id}",
    params(
        ("job_id" = Uuid, Path, description = "Job ID"),
        ("page" = Option<i64>, Query, description = "Zero-based page number"),
        ("size" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Applications for the job", body = Json<ApplicationListResponse>),
        (status = 403, description = "Not the job poster"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn list_job_applications(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(job_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let page = state
        .application_service
        .list_for_job(&actor, job_id, query.into())
        .await?;
    Ok(Json(ApplicationListResponse::from(page)))
}

#[utoipa::path(
    get,
    path = "/api/applications/job/{job_id}/count",
    params(
        ("job_id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Number of applications for the job", body = Json<JobApplicationCountResponse>),
        (status = 403, description = "Not the job poster")
    )
)]
#[axum::debug_handler]
pub async fn count_job_applications(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let total_applications = state
        .application_service
        .count_by_job(&actor, job_id)
        .await?;
    Ok(Json(JobApplicationCountResponse {
        job_id,
        total_applications,
    }))
}

#[utoipa::path(
    get,
    path = "/api/applications/job/{job_id}/applied",
    params(
        ("job_id" = Uuid, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Whether the current user applied", body = Json<HasAppliedResponse>)
    )
)]
#[axum::debug_handler]
pub async fn has_applied(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let has_applied = state.application_service.has_applied(&actor, job_id).await?;
    Ok(Json(HasAppliedResponse {
        job_id,
        has_applied,
    }))
}

#[utoipa::path(
    get,
    path = "/api/applications/status/{status}",
    params(
        ("status" = String, Path, description = "Application status, e.g. PENDING"),
        ("page" = Option<i64>, Query, description = "Zero-based page number"),
        ("size" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Applications in the status", body = Json<ApplicationListResponse>),
        (status = 400, description = "Unknown status"),
        (status = 403, description = "Administrator role required")
    )
)]
#[axum::debug_handler]
pub async fn list_applications_by_status(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(status): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse> {
    let status: ApplicationStatus = status.parse().map_err(Error::BadRequest)?;
    let page = state
        .application_service
        .list_in_status(&actor, status, query.into())
        .await?;
    Ok(Json(ApplicationListResponse::from(page)))
}

#[utoipa::path(
    get,
    path = "/api/applications/{id}",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application found", body = Json<ApplicationResponse>),
        (status = 403, description = "Not visible to the current user"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn get_application(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let application = state.application_service.get(id, &actor).await?;
    Ok(Json(ApplicationResponse::from(application)))
}

#[utoipa::path(
    put,
    path = "/api/applications/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = UpdateStatusPayload,
    responses(
        (status = 200, description = "Status updated", body = Json<ApplicationResponse>),
        (status = 403, description = "Not the job poster or an administrator"),
        (status = 404, description = "Application not found"),
        (status = 409, description = "Concurrent update"),
        (status = 422, description = "Transition not allowed")
    )
)]
#[axum::debug_handler]
pub async fn update_application_status(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let application = state
        .application_service
        .change_status(id, &actor, payload.status, payload.notes)
        .await?;
    Ok(Json(ApplicationResponse::from(application)))
}

#[utoipa::path(
    post,
    path = "/api/applications/{id}/interview",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = ScheduleInterviewPayload,
    responses(
        (status = 200, description = "Interview scheduled", body = Json<ApplicationResponse>),
        (status = 400, description = "Invalid interview time"),
        (status = 403, description = "Not the job poster or an administrator"),
        (status = 404, description = "Application not found"),
        (status = 422, description = "Transition not allowed")
    )
)]
#[axum::debug_handler]
pub async fn schedule_interview(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ScheduleInterviewPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let application = state
        .application_service
        .schedule_interview(id, &actor, &payload.interview_time, payload.notes)
        .await?;
    Ok(Json(ApplicationResponse::from(application)))
}

#[utoipa::path(
    delete,
    path = "/api/applications/{id}",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application withdrawn"),
        (status = 403, description = "Only the applicant may withdraw"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn withdraw_application(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.application_service.withdraw(id, &actor).await?;
    Ok(Json(MessageResponse::new("Application withdrawn successfully")))
}
