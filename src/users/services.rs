use sqlx::PgPool;
use tracing::{info, warn};

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::policy::{Requester, Role};
use crate::users::dto::{CreateUserRequest, UpdateUserRequest};
use crate::users::repo::{NewUser, User};

/// True when the error is Postgres 23505 on the active-email unique index.
fn is_unique_email_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

/// Admins see every active user; a hero only sees their own row.
pub async fn list(db: &PgPool, requester: &Requester) -> AppResult<Vec<User>> {
    if requester.can_act_on_all() {
        Ok(User::list_active(db).await?)
    } else {
        Ok(User::find_active_by_id(db, requester.id)
            .await?
            .into_iter()
            .collect())
    }
}

/// Admin or self; absence is `None`, not an error.
pub async fn find_by_id(db: &PgPool, id: i64, requester: &Requester) -> AppResult<Option<User>> {
    if !requester.can_act_on(id) {
        return Err(AppError::Unauthorized);
    }
    Ok(User::find_active_by_id(db, id).await?)
}

/// Creates an active user with a hashed password. The pre-check keeps the
/// common duplicate path cheap; the partial unique index on active emails is
/// the authoritative signal under concurrent registration.
pub async fn create(db: &PgPool, payload: CreateUserRequest) -> AppResult<User> {
    if User::find_active_by_email(db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(AppError::EmailAlreadyExists);
    }

    let new = NewUser {
        role: payload.role.unwrap_or(Role::Hero),
        name: payload.name,
        email: payload.email,
        password: hash_password(&payload.password)?,
        persona: payload.persona,
    };

    let user = User::insert(db, &new).await.map_err(|e| {
        if is_unique_email_violation(&e) {
            AppError::EmailAlreadyExists
        } else {
            AppError::Database(e)
        }
    })?;
    let user = user.ok_or(AppError::RegistrationFailed)?;

    info!(user_id = user.id_user, email = %user.email, "user created");
    Ok(user)
}

/// Replace-and-soft-delete update: the old row is deactivated and a new row
/// carrying the merged attributes is inserted with a fresh id, inside one
/// transaction so a failure at any step rolls the whole update back.
pub async fn update(
    db: &PgPool,
    id: i64,
    mut payload: UpdateUserRequest,
    requester: &Requester,
) -> AppResult<User> {
    if !requester.can_act_on(id) {
        return Err(AppError::Unauthorized);
    }

    if let Some(plain) = payload.password.take() {
        payload.password = Some(hash_password(&plain)?);
    }

    let mut tx = db.begin().await?;

    let old = User::find_active_by_id(&mut *tx, id)
        .await?
        .ok_or(AppError::NotFoundOrInactive("User"))?;

    if !User::deactivate(&mut *tx, id).await? {
        return Err(AppError::NotFoundOrInactive("User"));
    }

    let merged = merged_fields(&old, payload);
    let saved = User::insert(&mut *tx, &merged)
        .await
        .map_err(|e| {
            if is_unique_email_violation(&e) {
                AppError::EmailAlreadyExists
            } else {
                AppError::Database(e)
            }
        })?
        .ok_or(AppError::UpdateFailed("User"))?;

    tx.commit().await?;

    info!(old_id = id, new_id = saved.id_user, "user updated");
    Ok(saved)
}

/// Soft delete; `false` (not an error) when no active row matched, so a
/// second call on the same id is a no-op.
pub async fn remove(db: &PgPool, id: i64, requester: &Requester) -> AppResult<bool> {
    if !requester.can_act_on(id) {
        return Err(AppError::Unauthorized);
    }
    let affected = User::deactivate(db, id).await?;
    if affected {
        info!(user_id = id, "user deactivated");
    }
    Ok(affected)
}

/// Old attributes merged with the provided partial fields; the password in
/// the patch is already hashed by the time it gets here.
fn merged_fields(old: &User, patch: UpdateUserRequest) -> NewUser {
    NewUser {
        role: patch.role.unwrap_or(old.role),
        name: patch.name.unwrap_or_else(|| old.name.clone()),
        email: patch.email.unwrap_or_else(|| old.email.clone()),
        password: patch.password.unwrap_or_else(|| old.password.clone()),
        persona: patch.persona.or_else(|| old.persona.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn old_user() -> User {
        User {
            id_user: 3,
            role: Role::Hero,
            name: "Diana".into(),
            email: "diana@heroforce.com".into(),
            password: "$argon2id$hash".into(),
            persona: Some("Wonder".into()),
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
            is_active: true,
        }
    }

    #[test]
    fn merge_keeps_unspecified_fields() {
        let patch = UpdateUserRequest {
            name: Some("New Name".into()),
            ..Default::default()
        };
        let merged = merged_fields(&old_user(), patch);
        assert_eq!(merged.name, "New Name");
        assert_eq!(merged.email, "diana@heroforce.com");
        assert_eq!(merged.role, Role::Hero);
        assert_eq!(merged.persona.as_deref(), Some("Wonder"));
        assert_eq!(merged.password, "$argon2id$hash");
    }

    #[test]
    fn merge_applies_every_provided_field() {
        let patch = UpdateUserRequest {
            name: Some("Clark".into()),
            email: Some("clark@heroforce.com".into()),
            password: Some("$argon2id$newhash".into()),
            role: Some(Role::Admin),
            persona: Some("Kal-El".into()),
        };
        let merged = merged_fields(&old_user(), patch);
        assert_eq!(merged.name, "Clark");
        assert_eq!(merged.email, "clark@heroforce.com");
        assert_eq!(merged.password, "$argon2id$newhash");
        assert_eq!(merged.role, Role::Admin);
        assert_eq!(merged.persona.as_deref(), Some("Kal-El"));
    }

    /// Database-level error carrying the Postgres unique-violation code,
    /// standing in for what the active-email index raises.
    #[derive(Debug)]
    struct UniqueViolation;

    impl std::fmt::Display for UniqueViolation {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("duplicate key value violates unique constraint \"user_email_active_uniq\"")
        }
    }

    impl std::error::Error for UniqueViolation {}

    impl sqlx::error::DatabaseError for UniqueViolation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn code(&self) -> Option<std::borrow::Cow<'_, str>> {
            Some("23505".into())
        }

        fn constraint(&self) -> Option<&str> {
            Some("user_email_active_uniq")
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::UniqueViolation
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }
    }

    #[test]
    fn unique_violation_detection() {
        let duplicate = sqlx::Error::Database(Box::new(UniqueViolation));
        assert!(is_unique_email_violation(&duplicate));

        let not_db = sqlx::Error::RowNotFound;
        assert!(!is_unique_email_violation(&not_db));
    }
}
