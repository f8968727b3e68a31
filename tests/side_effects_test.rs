mod common;

use std::sync::Arc;

use async_trait::async_trait;
use mockall::{mock, predicate::eq};
use uuid::Uuid;

use common::{open_job, InMemoryApplicationStore, InMemoryNotifications, JWT_SECRET};
use jobboard_backend::error::Error;
use jobboard_backend::models::application::ApplicationStatus;
use jobboard_backend::models::job::JobSummary;
use jobboard_backend::models::notification::{Notification, NotificationDraft};
use jobboard_backend::models::user::{Actor, Role};
use jobboard_backend::repositories::{
    ApplicationStore, JobDirectory, NotificationSink, StoreError, StoreResult,
};
use jobboard_backend::AppState;

mock! {
    pub Sink {}

    #[async_trait]
    impl NotificationSink for Sink {
        async fn notify(&self, draft: NotificationDraft) -> StoreResult<Notification>;
    }
}

mock! {
    pub Directory {}

    #[async_trait]
    impl JobDirectory for Directory {
        async fn get(&self, job_id: Uuid) -> StoreResult<Option<JobSummary>>;
        async fn increment_application_count(&self, job_id: Uuid) -> StoreResult<()>;
    }
}

fn directory_serving(job: JobSummary) -> MockDirectory {
    let mut directory = MockDirectory::new();
    directory
        .expect_get()
        .with(eq(job.id))
        .returning(move |_| Ok(Some(job.clone())));
    directory
}

fn applicant() -> Actor {
    Actor::new(Uuid::new_v4(), Role::JobSeeker).with_display_name("Alice Applicant")
}

#[tokio::test]
async fn failing_notification_sink_does_not_fail_the_operation() {
    let poster = Actor::new(Uuid::new_v4(), Role::Employer);
    let job = open_job(poster.id, "Rust Engineer");

    let mut directory = directory_serving(job.clone());
    directory
        .expect_increment_application_count()
        .with(eq(job.id))
        .times(1)
        .returning(|_| Ok(()));

    let mut sink = MockSink::new();
    sink.expect_notify()
        .times(2)
        .returning(|_| Err(StoreError::Query("notifications table unavailable".into())));

    let applications = Arc::new(InMemoryApplicationStore::default());
    let state = AppState::from_parts(
        applications.clone(),
        Arc::new(directory),
        Arc::new(sink),
        Arc::new(InMemoryNotifications::default()),
        JWT_SECRET,
    );

    let applicant = applicant();
    let application = state
        .application_service
        .submit(&applicant, job.id, None, None)
        .await
        .expect("submit succeeds despite sink failure");

    let updated = state
        .application_service
        .change_status(application.id, &poster, ApplicationStatus::Shortlisted, None)
        .await
        .expect("status change succeeds despite sink failure");
    state.dispatcher.flush().await;

    assert_eq!(updated.status, ApplicationStatus::Shortlisted);
    let stored = applications.get(application.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ApplicationStatus::Shortlisted);
}

#[tokio::test]
async fn failing_counter_increment_is_swallowed() {
    let poster = Actor::new(Uuid::new_v4(), Role::Employer);
    let job = open_job(poster.id, "Rust Engineer");

    let mut directory = directory_serving(job.clone());
    directory
        .expect_increment_application_count()
        .times(1)
        .returning(|job_id| Err(StoreError::NotFound(format!("job {}", job_id))));

    let notifications = Arc::new(InMemoryNotifications::default());
    let state = AppState::from_parts(
        Arc::new(InMemoryApplicationStore::default()),
        Arc::new(directory),
        notifications.clone(),
        notifications.clone(),
        JWT_SECRET,
    );

    let result = state
        .application_service
        .submit(&applicant(), job.id, None, None)
        .await;
    state.dispatcher.flush().await;

    assert!(result.is_ok());
    assert_eq!(notifications.for_user(poster.id).len(), 1);
}

#[tokio::test]
async fn unreachable_job_directory_is_a_dependency_failure() {
    let mut directory = MockDirectory::new();
    directory
        .expect_get()
        .returning(|_| Err(StoreError::Query("connection refused".into())));
    directory.expect_increment_application_count().never();

    let mut sink = MockSink::new();
    sink.expect_notify().never();

    let applications = Arc::new(InMemoryApplicationStore::default());
    let state = AppState::from_parts(
        applications.clone(),
        Arc::new(directory),
        Arc::new(sink),
        Arc::new(InMemoryNotifications::default()),
        JWT_SECRET,
    );

    let err = state
        .application_service
        .submit(&applicant(), Uuid::new_v4(), None, None)
        .await
        .unwrap_err();
    state.dispatcher.flush().await;

    assert!(matches!(err, Error::DependencyFailure(_)), "got {err:?}");
    assert!(applications.all().is_empty());
}

#[tokio::test]
async fn rejected_operations_emit_no_side_effects() {
    let poster = Actor::new(Uuid::new_v4(), Role::Employer);
    let mut job = open_job(poster.id, "Closed role");
    job.is_active = false;

    let mut directory = directory_serving(job.clone());
    directory.expect_increment_application_count().never();

    let mut sink = MockSink::new();
    sink.expect_notify().never();

    let state = AppState::from_parts(
        Arc::new(InMemoryApplicationStore::default()),
        Arc::new(directory),
        Arc::new(sink),
        Arc::new(InMemoryNotifications::default()),
        JWT_SECRET,
    );

    let err = state
        .application_service
        .submit(&applicant(), job.id, None, None)
        .await
        .unwrap_err();
    state.dispatcher.flush().await;

    assert!(matches!(err, Error::JobClosed));
}

#[tokio::test]
async fn effects_run_in_enqueue_order() {
    let h = common::Harness::new();
    let application = h.submit().await;
    let service = &h.state.application_service;

    service
        .change_status(application.id, &h.poster, ApplicationStatus::Reviewed, None)
        .await
        .unwrap();
    service
        .change_status(application.id, &h.poster, ApplicationStatus::Rejected, None)
        .await
        .unwrap();
    h.settle().await;

    let messages: Vec<String> = h
        .notifications
        .for_user(h.applicant.id)
        .into_iter()
        .map(|n| n.message)
        .collect();
    assert_eq!(
        messages,
        vec![
            "Your application for Rust Engineer has been reviewed".to_string(),
            "Your application for Rust Engineer has been rejected".to_string(),
        ]
    );
}
