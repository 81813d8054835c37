//! Startup seeding of built-in roles and the optional superadmin.

use std::collections::BTreeSet;

use gatehouse_core::UserRole;
use strum::IntoEnumIterator;
use uuid::Uuid;

use crate::service::records::{Authorship, update_author};
use crate::service::{BootstrapAdmin, RoleRecord, ServiceState, UserRecord};
use crate::utility::tracing_targets::TRACING_TARGET_BOOTSTRAP;
use crate::{Error, Result};

/// Language key given to seeded records.
const DEFAULT_LANG_KEY: &str = "en-us";

/// Seeds built-in roles and, when configured, the superadmin account.
pub async fn seed(state: &ServiceState) -> Result<()> {
    seed_roles(state).await?;

    if let Some(admin) = &state.config.bootstrap_admin {
        seed_superadmin(state, admin).await?;
    }

    Ok(())
}

/// Inserts a system-locked, active record for every built-in role missing
/// from the role store.
async fn seed_roles(state: &ServiceState) -> Result<()> {
    for role in UserRole::iter() {
        let value = role.to_string();
        let lookup = value.clone();
        let existing = state
            .registry
            .roles
            .find_one(&move |record: &RoleRecord| record.value == lookup)
            .await?;

        if existing.is_some() {
            continue;
        }

        let mut record = RoleRecord::new(value.clone(), value, DEFAULT_LANG_KEY);
        record.active = true;
        record.system_locked = true;
        update_author(&mut record, None, true);

        state.registry.roles.insert(record).await?;
        tracing::info!(
            target: TRACING_TARGET_BOOTSTRAP,
            role = %role,
            "built-in role seeded"
        );
    }

    Ok(())
}

/// Creates the configured superadmin unless its login is already taken.
async fn seed_superadmin(state: &ServiceState, admin: &BootstrapAdmin) -> Result<()> {
    let login = admin.login.clone();
    let existing = state
        .registry
        .users
        .find_one(&move |record: &UserRecord| record.login == login)
        .await?;

    if existing.is_some() {
        tracing::debug!(
            target: TRACING_TARGET_BOOTSTRAP,
            login = %admin.login,
            "superadmin already exists"
        );
        return Ok(());
    }

    let password = state
        .password_hasher
        .hash_password(&admin.password)
        .map_err(|e| Error::internal("bootstrap", "cannot hash superadmin password").with_source(e))?;

    let mut record = UserRecord {
        id: Uuid::now_v7(),
        login: admin.login.clone(),
        first_name: admin.login.clone(),
        last_name: String::new(),
        email: admin.email.clone(),
        lang_key: DEFAULT_LANG_KEY.to_owned(),
        password,
        roles: BTreeSet::from([UserRole::SuperAdmin]),
        active: true,
        verification_token: None,
        authorship: Authorship::default(),
    };
    update_author(&mut record, None, true);

    state.registry.users.insert(record).await?;
    tracing::info!(
        target: TRACING_TARGET_BOOTSTRAP,
        login = %admin.login,
        "superadmin created"
    );

    Ok(())
}
