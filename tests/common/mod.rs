#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use jobboard_backend::models::application::{Application, ApplicationStatus, NewApplication};
use jobboard_backend::models::job::JobSummary;
use jobboard_backend::models::notification::{Notification, NotificationDraft};
use jobboard_backend::models::page::{Page, PageRequest};
use jobboard_backend::models::user::{Actor, Role};
use jobboard_backend::repositories::{
    ApplicationStore, JobDirectory, NotificationInbox, NotificationSink, StoreError, StoreResult,
};
use jobboard_backend::AppState;

pub const JWT_SECRET: &str = "test_secret_key";

fn paginate<T: Clone>(mut items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = items.len() as i64;
    let start = (page.offset() as usize).min(items.len());
    let end = (start + page.per_page as usize).min(items.len());
    let window = items.drain(start..end).collect();
    Page::new(window, total, page)
}

#[derive(Default)]
pub struct InMemoryApplicationStore {
    rows: Mutex<HashMap<Uuid, Application>>,
}

impl InMemoryApplicationStore {
    pub fn all(&self) -> Vec<Application> {
        self.rows.lock().unwrap().values().cloned().collect()
    }

    fn sorted(&self, keep: impl Fn(&Application) -> bool) -> Vec<Application> {
        let mut items: Vec<Application> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|a| keep(a))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.applied_at.cmp(&a.applied_at).then(b.id.cmp(&a.id)));
        items
    }
}

#[async_trait]
impl ApplicationStore for InMemoryApplicationStore {
    async fn get(&self, id: Uuid) -> StoreResult<Option<Application>> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn exists_for_applicant_and_job(
        &self,
        applicant_id: Uuid,
        job_id: Uuid,
    ) -> StoreResult<bool> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .any(|a| a.applicant_id == applicant_id && a.job_id == job_id))
    }

    async fn insert(&self, application: NewApplication) -> StoreResult<Application> {
        let mut rows = self.rows.lock().unwrap();
        if rows
            .values()
            .any(|a| a.applicant_id == application.applicant_id && a.job_id == application.job_id)
        {
            return Err(StoreError::Duplicate);
        }
        let now = Utc::now();
        let stored = Application {
            id: Uuid::new_v4(),
            applicant_id: application.applicant_id,
            job_id: application.job_id,
            cover_letter: application.cover_letter,
            resume_url: application.resume_url,
            status: ApplicationStatus::Pending,
            applied_at: application.applied_at,
            reviewed_at: None,
            interview_scheduled_at: None,
            notes: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
            version: 1,
        };
        rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, application: &Application) -> StoreResult<Application> {
        let mut rows = self.rows.lock().unwrap();
        let current = rows
            .get_mut(&application.id)
            .ok_or_else(|| StoreError::NotFound(format!("application {}", application.id)))?;
        if current.version != application.version {
            return Err(StoreError::Conflict(format!(
                "application {} was modified concurrently",
                application.id
            )));
        }
        let applied_at = current.applied_at;
        *current = Application {
            applied_at,
            updated_at: Utc::now(),
            version: application.version + 1,
            ..application.clone()
        };
        Ok(current.clone())
    }

    async fn list_by_applicant(
        &self,
        applicant_id: Uuid,
        page: PageRequest,
    ) -> StoreResult<Page<Application>> {
        Ok(paginate(
            self.sorted(|a| a.applicant_id == applicant_id),
            page,
        ))
    }

    async fn list_by_job(&self, job_id: Uuid, page: PageRequest) -> StoreResult<Page<Application>> {
        Ok(paginate(self.sorted(|a| a.job_id == job_id), page))
    }

    async fn list_by_status(
        &self,
        status: ApplicationStatus,
        page: PageRequest,
    ) -> StoreResult<Page<Application>> {
        Ok(paginate(self.sorted(|a| a.status == status), page))
    }

    async fn count_by_applicant(&self, applicant_id: Uuid) -> StoreResult<i64> {
        Ok(self.sorted(|a| a.applicant_id == applicant_id).len() as i64)
    }

    async fn count_by_job(&self, job_id: Uuid) -> StoreResult<i64> {
        Ok(self.sorted(|a| a.job_id == job_id).len() as i64)
    }
}

#[derive(Default)]
pub struct InMemoryJobDirectory {
    jobs: Mutex<HashMap<Uuid, JobSummary>>,
    application_counts: Mutex<HashMap<Uuid, i64>>,
}

impl InMemoryJobDirectory {
    pub fn add(&self, job: JobSummary) {
        self.jobs.lock().unwrap().insert(job.id, job);
    }

    pub fn application_count(&self, job_id: Uuid) -> i64 {
        self.application_counts
            .lock()
            .unwrap()
            .get(&job_id)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl JobDirectory for InMemoryJobDirectory {
    async fn get(&self, job_id: Uuid) -> StoreResult<Option<JobSummary>> {
        Ok(self.jobs.lock().unwrap().get(&job_id).cloned())
    }

    async fn increment_application_count(&self, job_id: Uuid) -> StoreResult<()> {
        if !self.jobs.lock().unwrap().contains_key(&job_id) {
            return Err(StoreError::NotFound(format!("job {}", job_id)));
        }
        *self
            .application_counts
            .lock()
            .unwrap()
            .entry(job_id)
            .or_insert(0) += 1;
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryNotifications {
    rows: Mutex<Vec<Notification>>,
}

impl InMemoryNotifications {
    /// Notifications for `user_id` in the order they were recorded.
    pub fn for_user(&self, user_id: Uuid) -> Vec<Notification> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn newest_first(&self, keep: impl Fn(&Notification) -> bool) -> Vec<Notification> {
        let mut items: Vec<Notification> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|n| keep(n))
            .cloned()
            .collect();
        items.reverse();
        items
    }
}

#[async_trait]
impl NotificationSink for InMemoryNotifications {
    async fn notify(&self, draft: NotificationDraft) -> StoreResult<Notification> {
        let notification = Notification {
            id: Uuid::new_v4(),
            user_id: draft.recipient_id,
            title: draft.title,
            message: draft.message,
            category: draft.category,
            action_url: Some(draft.action_url),
            is_read: false,
            read_at: None,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(notification.clone());
        Ok(notification)
    }
}

#[async_trait]
impl NotificationInbox for InMemoryNotifications {
    async fn get(&self, id: Uuid) -> StoreResult<Option<Notification>> {
        Ok(self.rows.lock().unwrap().iter().find(|n| n.id == id).cloned())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> StoreResult<Page<Notification>> {
        Ok(paginate(self.newest_first(|n| n.user_id == user_id), page))
    }

    async fn list_unread(&self, user_id: Uuid) -> StoreResult<Vec<Notification>> {
        Ok(self.newest_first(|n| n.user_id == user_id && !n.is_read))
    }

    async fn count_unread(&self, user_id: Uuid) -> StoreResult<i64> {
        Ok(self.newest_first(|n| n.user_id == user_id && !n.is_read).len() as i64)
    }

    async fn mark_read(&self, id: Uuid) -> StoreResult<Notification> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("notification {}", id)))?;
        row.is_read = true;
        row.read_at.get_or_insert_with(Utc::now);
        Ok(row.clone())
    }

    async fn mark_all_read(&self, user_id: Uuid) -> StoreResult<u64> {
        let mut updated = 0;
        for row in self
            .rows
            .lock()
            .unwrap()
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.is_read)
        {
            row.is_read = true;
            row.read_at = Some(Utc::now());
            updated += 1;
        }
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|n| n.id != id);
        if rows.len() == before {
            return Err(StoreError::NotFound(format!("notification {}", id)));
        }
        Ok(())
    }

    async fn delete_all(&self, user_id: Uuid) -> StoreResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|n| n.user_id != user_id);
        Ok((before - rows.len()) as u64)
    }
}

pub fn open_job(poster_id: Uuid, title: &str) -> JobSummary {
    JobSummary {
        id: Uuid::new_v4(),
        title: title.to_string(),
        poster_id,
        is_active: true,
        application_deadline: Some(Utc::now() + Duration::days(30)),
    }
}

pub struct Harness {
    pub state: AppState,
    pub applications: Arc<InMemoryApplicationStore>,
    pub jobs: Arc<InMemoryJobDirectory>,
    pub notifications: Arc<InMemoryNotifications>,
    pub poster: Actor,
    pub applicant: Actor,
    pub admin: Actor,
    pub stranger: Actor,
    pub job: JobSummary,
}

impl Harness {
    pub fn new() -> Self {
        let applications = Arc::new(InMemoryApplicationStore::default());
        let jobs = Arc::new(InMemoryJobDirectory::default());
        let notifications = Arc::new(InMemoryNotifications::default());

        let poster = Actor::new(Uuid::new_v4(), Role::Employer).with_display_name("Erin Employer");
        let applicant =
            Actor::new(Uuid::new_v4(), Role::JobSeeker).with_display_name("Alice Applicant");
        let admin = Actor::new(Uuid::new_v4(), Role::Admin);
        let stranger = Actor::new(Uuid::new_v4(), Role::Employer);

        let job = open_job(poster.id, "Rust Engineer");
        jobs.add(job.clone());

        let state = AppState::from_parts(
            applications.clone(),
            jobs.clone(),
            notifications.clone(),
            notifications.clone(),
            JWT_SECRET,
        );

        Self {
            state,
            applications,
            jobs,
            notifications,
            poster,
            applicant,
            admin,
            stranger,
            job,
        }
    }

    pub async fn submit(&self) -> Application {
        self.state
            .application_service
            .submit(
                &self.applicant,
                self.job.id,
                Some("I love Rust".to_string()),
                Some("https://example.com/cv.pdf".to_string()),
            )
            .await
            .expect("submit application")
    }

    pub async fn settle(&self) {
        self.state.dispatcher.flush().await;
    }
}
