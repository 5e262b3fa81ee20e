use tracing::info;

use crate::auth::password::hash_password;
use crate::policy::Role;
use crate::state::AppState;
use crate::users::repo::{NewUser, User};

/// Seeds the bootstrap admin account when no active user carries the
/// configured admin email. Runs once at startup; failures abort boot.
pub async fn ensure_admin(state: &AppState) -> anyhow::Result<()> {
    let seed = &state.config.admin_seed;

    if User::find_active_by_email(&state.db, &seed.email)
        .await?
        .is_some()
    {
        info!(email = %seed.email, "admin user already exists");
        return Ok(());
    }

    info!(email = %seed.email, "seeding admin user");
    let new = NewUser {
        role: Role::Admin,
        name: seed.name.clone(),
        email: seed.email.clone(),
        password: hash_password(&seed.password)?,
        persona: Some(seed.persona.clone()),
    };
    User::insert(&state.db, &new)
        .await?
        .ok_or_else(|| anyhow::anyhow!("admin seed insert returned no row"))?;

    info!("admin user created");
    Ok(())
}
