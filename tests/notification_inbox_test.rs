mod common;

use common::Harness;
use jobboard_backend::error::Error;
use jobboard_backend::models::application::ApplicationStatus;
use jobboard_backend::models::page::PageRequest;

#[tokio::test]
async fn recipient_reads_and_clears_own_notifications() {
    let h = Harness::new();
    let application = h.submit().await;
    h.state
        .application_service
        .change_status(application.id, &h.poster, ApplicationStatus::Reviewed, None)
        .await
        .unwrap();
    h.settle().await;

    let inbox = &h.state.notification_service;
    assert_eq!(inbox.unread_count(&h.applicant).await.unwrap(), 1);
    assert_eq!(inbox.unread_count(&h.poster).await.unwrap(), 1);

    let listed = inbox.list(&h.applicant, PageRequest::default()).await.unwrap();
    assert_eq!(listed.total, 1);
    let id = listed.items[0].id;

    let read = inbox.mark_read(id, &h.applicant).await.unwrap();
    assert!(read.is_read);
    assert!(read.read_at.is_some());
    assert_eq!(inbox.unread_count(&h.applicant).await.unwrap(), 0);
    assert!(inbox.list_unread(&h.applicant).await.unwrap().is_empty());

    inbox.delete(id, &h.applicant).await.unwrap();
    assert!(matches!(
        inbox.get(id, &h.applicant).await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn other_users_cannot_touch_a_notification() {
    let h = Harness::new();
    h.submit().await;
    h.settle().await;

    let inbox = &h.state.notification_service;
    let id = h.notifications.for_user(h.poster.id)[0].id;

    for result in [
        inbox.get(id, &h.applicant).await.map(|_| ()),
        inbox.mark_read(id, &h.applicant).await.map(|_| ()),
        inbox.delete(id, &h.stranger).await,
    ] {
        assert!(matches!(result, Err(Error::Forbidden(_))), "got {result:?}");
    }
    assert_eq!(inbox.unread_count(&h.poster).await.unwrap(), 1);
}

#[tokio::test]
async fn bulk_operations_only_affect_the_actor() {
    let h = Harness::new();
    let application = h.submit().await;
    for status in [ApplicationStatus::Reviewed, ApplicationStatus::Shortlisted] {
        h.state
            .application_service
            .change_status(application.id, &h.poster, status, None)
            .await
            .unwrap();
    }
    h.settle().await;

    let inbox = &h.state.notification_service;
    assert_eq!(inbox.mark_all_read(&h.applicant).await.unwrap(), 2);
    assert_eq!(inbox.mark_all_read(&h.applicant).await.unwrap(), 0);
    assert_eq!(inbox.unread_count(&h.poster).await.unwrap(), 1);

    assert_eq!(inbox.delete_all(&h.applicant).await.unwrap(), 2);
    assert_eq!(h.notifications.for_user(h.poster.id).len(), 1);
}
