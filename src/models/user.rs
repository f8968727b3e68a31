use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    JobSeeker,
    Employer,
    Admin,
}

impl Role {
    /// Unknown or missing role claims fall back to the least privileged role.
    pub fn from_claim(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(r) if r.eq_ignore_ascii_case("admin") => Role::Admin,
            Some(r) if r.eq_ignore_ascii_case("employer") => Role::Employer,
            _ => Role::JobSeeker,
        }
    }
}

/// The authenticated identity performing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
    pub display_name: Option<String>,
}

impl Actor {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self {
            id,
            role,
            display_name: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn label(&self) -> String {
        self.display_name
            .clone()
            .unwrap_or_else(|| format!("Applicant {}", self.id))
    }
}
