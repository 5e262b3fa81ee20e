use sqlx::PgPool;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::policy::Requester;
use crate::projects::dto::{CreateProjectRequest, UpdateProjectRequest};
use crate::projects::repo::{NewProject, Project};

/// Admins see every active project; a hero only their own. Empty result is
/// an empty list, never an error.
pub async fn list(db: &PgPool, requester: &Requester) -> AppResult<Vec<Project>> {
    if requester.can_act_on_all() {
        Ok(Project::list_active(db).await?)
    } else {
        Ok(Project::list_active_by_owner(db, requester.id).await?)
    }
}

/// Lookup by id requires blanket permission, not per-row ownership: a hero
/// is denied even on a project they own. Kept as observed in the system this
/// replaces; `list` remains the hero's read path.
pub async fn find_by_id(db: &PgPool, id: i64, requester: &Requester) -> AppResult<Project> {
    if !requester.can_act_on_all() {
        return Err(AppError::Unauthorized);
    }
    Project::find_active_by_id(db, id)
        .await?
        .ok_or(AppError::NotFound("Project"))
}

/// Creates an active project owned by the resolved owner.
pub async fn create(
    db: &PgPool,
    payload: CreateProjectRequest,
    requester: &Requester,
) -> AppResult<Project> {
    let owner = resolve_owner(requester, payload.user);
    let new = NewProject {
        name: payload.name,
        description: payload.description,
        status: payload.status,
        goals: payload.goals,
        id_user: owner,
    };
    let project = Project::insert(db, &new)
        .await?
        .ok_or(AppError::CreateFailed("Project"))?;
    info!(project_id = project.id_project, owner_id = owner, "project created");
    Ok(project)
}

/// Replace-and-soft-delete update inside one transaction. Permission is
/// checked against the prospective owner before anything mutates.
pub async fn update(
    db: &PgPool,
    id: i64,
    payload: UpdateProjectRequest,
    requester: &Requester,
) -> AppResult<Project> {
    let prospective_owner = payload.user.unwrap_or(requester.id);
    if !requester.can_act_on(prospective_owner) {
        return Err(AppError::Unauthorized);
    }

    let mut tx = db.begin().await?;

    let old = Project::find_active_by_id(&mut *tx, id)
        .await?
        .ok_or(AppError::NotFoundOrInactive("Project"))?;

    if !Project::deactivate(&mut *tx, id).await? {
        return Err(AppError::NotFoundOrInactive("Project"));
    }

    let merged = merged_fields(&old, payload, requester);
    let saved = Project::insert(&mut *tx, &merged)
        .await?
        .ok_or(AppError::UpdateFailed("Project"))?;

    tx.commit().await?;

    info!(old_id = id, new_id = saved.id_project, "project updated");
    Ok(saved)
}

/// Soft delete, checked against the row's actual owner; `false` when no
/// active row matched, so a second call on the same id is a no-op.
pub async fn remove(db: &PgPool, id: i64, requester: &Requester) -> AppResult<bool> {
    let Some(project) = Project::find_active_by_id(db, id).await? else {
        return Ok(false);
    };
    if !requester.can_act_on(project.id_user) {
        return Err(AppError::Unauthorized);
    }
    let affected = Project::deactivate(db, id).await?;
    if affected {
        info!(project_id = id, "project deactivated");
    }
    Ok(affected)
}

/// Owner of a new project: the `user` field when an admin supplied one,
/// otherwise the requester themself.
fn resolve_owner(requester: &Requester, requested: Option<i64>) -> i64 {
    match requested {
        Some(owner) if requester.can_act_on_all() => owner,
        _ => requester.id,
    }
}

/// Old attributes merged with the partial fields. A hero always ends up
/// owning the result; an admin keeps the old owner unless the patch names
/// another.
fn merged_fields(old: &Project, patch: UpdateProjectRequest, requester: &Requester) -> NewProject {
    let owner = if requester.can_act_on_all() {
        patch.user.unwrap_or(old.id_user)
    } else {
        requester.id
    };
    NewProject {
        name: patch.name.unwrap_or_else(|| old.name.clone()),
        description: patch.description.unwrap_or_else(|| old.description.clone()),
        status: patch.status.unwrap_or(old.status),
        goals: patch.goals.unwrap_or_else(|| old.goals.clone()),
        id_user: owner,
    }
}


#[cfg(test)]
mod db_tests {
    use super::*;
    use crate::policy::Role;
    use crate::projects::repo::ProjectStatus;
    use crate::users::repo::{NewUser, User};
    use sqlx::PgPool;

    fn admin() -> Requester {
        Requester {
            id: 0,
            email: "admin@heroforce.com".into(),
            role: Role::Admin,
        }
    }

    fn hero(id: i64) -> Requester {
        Requester {
            id,
            email: format!("hero{id}@heroforce.com"),
            role: Role::Hero,
        }
    }

    async fn seed_hero(pool: &PgPool, email: &str) -> i64 {
        let new = NewUser {
            role: Role::Hero,
            name: "Seeded Hero".into(),
            email: email.into(),
            password: "$argon2id$test-only".into(),
            persona: None,
        };
        User::insert(pool, &new)
            .await
            .expect("insert user")
            .expect("user row")
            .id_user
    }

    fn create_request(owner: Option<i64>) -> CreateProjectRequest {
        CreateProjectRequest {
            name: "Ultron Initiative".into(),
            description: "Armor around the world".into(),
            status: ProjectStatus::Pending,
            goals: "World Peace".into(),
            user: owner,
        }
    }

    #[sqlx::test]
    #[ignore = "needs a postgres database; run with -- --ignored"]
    async fn list_scopes_heroes_to_their_own_projects(pool: PgPool) {
        let alpha = seed_hero(&pool, "alpha@heroforce.com").await;
        let beta = seed_hero(&pool, "beta@heroforce.com").await;
        create(&pool, create_request(None), &hero(alpha))
            .await
            .expect("alpha's project");
        create(&pool, create_request(None), &hero(beta))
            .await
            .expect("beta's project");

        let all = list(&pool, &admin()).await.expect("admin list");
        assert_eq!(all.len(), 2);

        let mine = list(&pool, &hero(alpha)).await.expect("hero list");
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id_user, alpha);
    }

    #[sqlx::test]
    #[ignore = "needs a postgres database; run with -- --ignored"]
    async fn lookup_by_id_denies_owner_who_is_not_admin(pool: PgPool) {
        let owner = seed_hero(&pool, "owner@heroforce.com").await;
        let project = create(&pool, create_request(Some(owner)), &admin())
            .await
            .expect("admin-assigned project");
        assert_eq!(project.id_user, owner);

        // Blanket check: the owning hero is denied, an admin is not.
        let err = find_by_id(&pool, project.id_project, &hero(owner))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
        find_by_id(&pool, project.id_project, &admin())
            .await
            .expect("admin lookup");
    }

    #[sqlx::test]
    #[ignore = "needs a postgres database; run with -- --ignored"]
    async fn remove_checks_actual_owner_and_is_idempotent(pool: PgPool) {
        let owner = seed_hero(&pool, "owner@heroforce.com").await;
        let other = seed_hero(&pool, "other@heroforce.com").await;
        let project = create(&pool, create_request(None), &hero(owner))
            .await
            .expect("owner's project");

        // Another hero cannot delete it, whatever owner id they might claim.
        let err = remove(&pool, project.id_project, &hero(other))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));

        assert!(remove(&pool, project.id_project, &hero(owner))
            .await
            .expect("first remove"));
        assert!(!remove(&pool, project.id_project, &hero(owner))
            .await
            .expect("second remove is a no-op"));
    }

    #[sqlx::test]
    #[ignore = "needs a postgres database; run with -- --ignored"]
    async fn remove_of_absent_id_is_false_not_unauthorized(pool: PgPool) {
        // No active row: resolves to `false` before any permission check
        // could fire, even for a plain hero.
        let someone = seed_hero(&pool, "someone@heroforce.com").await;
        assert!(!remove(&pool, 424242, &hero(someone))
            .await
            .expect("absent id is a no-op"));
    }
}
