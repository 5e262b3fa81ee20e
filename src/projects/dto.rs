use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::AppError;
use crate::projects::repo::{Project, ProjectStatus};

/// Request body for project creation. The `user` field names the owner; only
/// admins may assign someone other than themselves.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub status: ProjectStatus,
    pub goals: String,
    pub user: Option<i64>,
}

impl CreateProjectRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Name must not be empty".into()));
        }
        if self.description.trim().is_empty() {
            return Err(AppError::Validation("Description must not be empty".into()));
        }
        if self.goals.trim().is_empty() {
            return Err(AppError::Validation("Goals must not be empty".into()));
        }
        Ok(())
    }
}

/// Partial update payload; absent fields keep the previous value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub goals: Option<String>,
    pub user: Option<i64>,
}

impl UpdateProjectRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        for (field, value) in [
            ("Name", &self.name),
            ("Description", &self.description),
            ("Goals", &self.goals),
        ] {
            if let Some(v) = value {
                if v.trim().is_empty() {
                    return Err(AppError::Validation(format!("{field} must not be empty")));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub goals: String,
    pub user: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub is_active: bool,
}

impl From<Project> for ProjectResponse {
    fn from(p: Project) -> Self {
        Self {
            id: p.id_project,
            name: p.name,
            description: p.description,
            status: p.status,
            goals: p.goals,
            user: p.id_user,
            created_at: p.created_at,
            updated_at: p.updated_at,
            is_active: p.is_active,
        }
    }
}
