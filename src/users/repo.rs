use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use time::OffsetDateTime;

use crate::policy::Role;

/// User row. "Deleted" rows stay in the table with `is_active = false`;
/// every update supersedes the old row with a freshly inserted one.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id_user: i64,
    pub role: Role,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub persona: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub is_active: bool,
}

/// Field set for inserting a user row; `password` is always a hash by the
/// time it reaches the repo.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub role: Role,
    pub name: String,
    pub email: String,
    pub password: String,
    pub persona: Option<String>,
}

impl User {
    pub async fn find_active_by_id<'e>(
        db: impl PgExecutor<'e>,
        id: i64,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id_user, role, name, email, password, persona,
                   created_at, updated_at, is_active
            FROM "user"
            WHERE id_user = $1 AND is_active
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_active_by_email<'e>(
        db: impl PgExecutor<'e>,
        email: &str,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id_user, role, name, email, password, persona,
                   created_at, updated_at, is_active
            FROM "user"
            WHERE email = $1 AND is_active
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn list_active<'e>(db: impl PgExecutor<'e>) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id_user, role, name, email, password, persona,
                   created_at, updated_at, is_active
            FROM "user"
            WHERE is_active
            ORDER BY id_user
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(users)
    }

    /// Inserts an active row. Surfaces the raw sqlx error so callers can map
    /// the unique-email violation.
    pub async fn insert<'e>(db: impl PgExecutor<'e>, new: &NewUser) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO "user" (role, name, email, password, persona)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id_user, role, name, email, password, persona,
                      created_at, updated_at, is_active
            "#,
        )
        .bind(new.role)
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.password)
        .bind(&new.persona)
        .fetch_optional(db)
        .await
    }

    /// Flips `is_active` off on the matching active row; `false` when the
    /// row was absent or already inactive.
    pub async fn deactivate<'e>(db: impl PgExecutor<'e>, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE "user" SET is_active = FALSE, updated_at = now()
            WHERE id_user = $1 AND is_active
            "#,
        )
        .bind(id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
