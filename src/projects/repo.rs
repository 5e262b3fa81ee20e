use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use time::OffsetDateTime;

/// Mission status. Assignment is free among the three states; no transition
/// ordering is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ProjectStatus {
    Pending,
    InProgress,
    Completed,
}

impl Default for ProjectStatus {
    fn default() -> Self {
        ProjectStatus::Pending
    }
}

/// Project row; `id_user` is the owning hero, never null.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id_project: i64,
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub goals: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub is_active: bool,
    pub id_user: i64,
}

/// Field set for inserting a project row with a resolved owner.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
    pub goals: String,
    pub id_user: i64,
}

impl Project {
    pub async fn find_active_by_id<'e>(
        db: impl PgExecutor<'e>,
        id: i64,
    ) -> anyhow::Result<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id_project, name, description, status, goals,
                   created_at, updated_at, is_active, id_user
            FROM project
            WHERE id_project = $1 AND is_active
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(project)
    }

    pub async fn list_active<'e>(db: impl PgExecutor<'e>) -> anyhow::Result<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id_project, name, description, status, goals,
                   created_at, updated_at, is_active, id_user
            FROM project
            WHERE is_active
            ORDER BY id_project
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(projects)
    }

    pub async fn list_active_by_owner<'e>(
        db: impl PgExecutor<'e>,
        owner_id: i64,
    ) -> anyhow::Result<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id_project, name, description, status, goals,
                   created_at, updated_at, is_active, id_user
            FROM project
            WHERE id_user = $1 AND is_active
            ORDER BY id_project
            "#,
        )
        .bind(owner_id)
        .fetch_all(db)
        .await?;
        Ok(projects)
    }

    pub async fn insert<'e>(
        db: impl PgExecutor<'e>,
        new: &NewProject,
    ) -> anyhow::Result<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO project (name, description, status, goals, id_user)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id_project, name, description, status, goals,
                      created_at, updated_at, is_active, id_user
            "#,
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.status)
        .bind(&new.goals)
        .bind(new.id_user)
        .fetch_optional(db)
        .await?;
        Ok(project)
    }

    /// Flips `is_active` off on the matching active row; `false` when the
    /// row was absent or already inactive.
    pub async fn deactivate<'e>(db: impl PgExecutor<'e>, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE project SET is_active = FALSE, updated_at = now()
            WHERE id_project = $1 AND is_active
            "#,
        )
        .bind(id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ProjectStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::to_string(&ProjectStatus::Pending).unwrap(),
            "\"pending\""
        );
        let parsed: ProjectStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, ProjectStatus::Completed);
    }

    #[test]
    fn status_rejects_unknown_value() {
        let parsed: Result<ProjectStatus, _> = serde_json::from_str("\"archived\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn status_defaults_to_pending() {
        assert_eq!(ProjectStatus::default(), ProjectStatus::Pending);
    }
}
