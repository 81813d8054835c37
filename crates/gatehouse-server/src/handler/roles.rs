//! Role management handlers.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use gatehouse_core::UserRole;
use uuid::Uuid;

use super::users::DEFAULT_LANG_KEY;
use crate::extract::{AuthState, Json, Path, SanitizedJson, ValidateJson};
use crate::handler::request::{ActivateRole, CreateRole, UpdateRole};
use crate::handler::response::Role;
use crate::handler::{ClientError, Error, Result};
use crate::middleware::MethodRouterAccessExt;
use crate::service::{
    Guarded, OperationAccess, RoleRecord, ServiceRegistry, ServiceState, Unique, update_author,
};
use crate::utility::tracing_targets::TRACING_TARGET_ROLES;

async fn find_role(registry: &ServiceRegistry, id: Uuid) -> Result<RoleRecord> {
    registry.roles.find_by_id(id).await?.ok_or_else(|| {
        tracing::debug!(target: TRACING_TARGET_ROLES, role_id = %id, "role not found");
        ClientError::RoleNotFound.into()
    })
}

fn duplicated(field: &str) -> Error<'static> {
    if field == "value" {
        ClientError::RoleDuplicatedValue.with_field("value", "duplicated")
    } else {
        ClientError::RoleDuplicatedName.with_field("role", "duplicated")
    }
}

/// Stores `record` unless another role already uses its name or value.
async fn store_update(registry: &ServiceRegistry, record: RoleRecord) -> Result<RoleRecord> {
    let (name, value) = (record.role.clone(), record.value.clone());
    let same_name = |existing: &RoleRecord| existing.role == name;
    let same_value = |existing: &RoleRecord| existing.value == value;
    let unique = [
        Unique::new("role", &same_name),
        Unique::new("value", &same_value),
    ];

    let record = match registry.roles.update_unique(record, &unique).await? {
        Some(Guarded::Stored(record)) => record,
        Some(Guarded::Conflict { field }) => return Err(duplicated(field)),
        None => return Err(ClientError::RoleNotFound.into()),
    };

    tracing::info!(target: TRACING_TARGET_ROLES, role_id = %record.id, "role updated");
    Ok(record)
}

#[tracing::instrument(skip_all)]
async fn list_roles(State(registry): State<ServiceRegistry>) -> Result<Json<Vec<Role>>> {
    let roles = registry.roles.list().await?;
    Ok(Json(roles.into_iter().map(Role::from).collect()))
}

/// Creates an inactive role. Name and value must both be unused.
#[tracing::instrument(skip_all)]
async fn create_role(
    State(registry): State<ServiceRegistry>,
    auth_state: AuthState,
    SanitizedJson(request): SanitizedJson<CreateRole>,
) -> Result<(StatusCode, Json<Role>)> {
    let lang_key = request
        .lang_key
        .unwrap_or_else(|| DEFAULT_LANG_KEY.to_owned());
    let mut record = RoleRecord::new(request.role, request.value, lang_key);
    record.system_locked = request.system_locked;

    let actor = auth_state.actor();
    update_author(&mut record, Some(&actor), true);
    update_author(&mut record, Some(&actor), false);

    let (name, value) = (record.role.clone(), record.value.clone());
    let same_name = |existing: &RoleRecord| existing.role == name;
    let same_value = |existing: &RoleRecord| existing.value == value;
    let unique = [
        Unique::new("role", &same_name),
        Unique::new("value", &same_value),
    ];

    let record = match registry.roles.insert_unique(record, &unique).await? {
        Guarded::Stored(record) => record,
        Guarded::Conflict { field } => {
            tracing::warn!(target: TRACING_TARGET_ROLES, field, "role already exists");
            return Err(duplicated(field));
        }
    };

    tracing::info!(
        target: TRACING_TARGET_ROLES,
        role_id = %record.id,
        value = %record.value,
        "role created"
    );

    Ok((StatusCode::CREATED, Json(record.into())))
}

#[tracing::instrument(skip_all)]
async fn get_role(
    State(registry): State<ServiceRegistry>,
    Path(id): Path<Uuid>,
) -> Result<Json<Role>> {
    let record = find_role(&registry, id).await?;
    Ok(Json(record.into()))
}

#[tracing::instrument(skip_all)]
async fn update_role(
    State(registry): State<ServiceRegistry>,
    auth_state: AuthState,
    Path(id): Path<Uuid>,
    SanitizedJson(request): SanitizedJson<UpdateRole>,
) -> Result<Json<Role>> {
    let mut record = find_role(&registry, id).await?;

    if let Some(role) = request.role {
        record.role = role;
    }
    if let Some(value) = request.value {
        if record.system_locked && value != record.value {
            tracing::warn!(target: TRACING_TARGET_ROLES, role_id = %id, "system-locked value");
            return Err(ClientError::RoleWrong.with_field("value", "system locked"));
        }
        record.value = value;
    }
    if let Some(lang_key) = request.lang_key {
        record.lang_key = lang_key;
    }
    if let Some(active) = request.active {
        record.active = active;
    }
    if let Some(system_locked) = request.system_locked {
        record.system_locked = system_locked;
    }

    update_author(&mut record, Some(&auth_state.actor()), false);
    let record = store_update(&registry, record).await?;
    Ok(Json(record.into()))
}

#[tracing::instrument(skip_all)]
async fn activate_role(
    State(registry): State<ServiceRegistry>,
    auth_state: AuthState,
    Path(id): Path<Uuid>,
    ValidateJson(request): ValidateJson<ActivateRole>,
) -> Result<Json<Role>> {
    let mut record = find_role(&registry, id).await?;
    record.active = request.active;

    update_author(&mut record, Some(&auth_state.actor()), false);
    let record = store_update(&registry, record).await?;
    Ok(Json(record.into()))
}

/// Deletes a role unless it is system-locked.
#[tracing::instrument(skip_all)]
async fn remove_role(
    State(registry): State<ServiceRegistry>,
    Path(id): Path<Uuid>,
) -> Result<Json<Role>> {
    let record = find_role(&registry, id).await?;
    if record.system_locked {
        tracing::warn!(target: TRACING_TARGET_ROLES, role_id = %id, "role is system-locked");
        return Err(ClientError::RoleDeleteSystemLocked.into());
    }

    let record = registry
        .roles
        .remove(id)
        .await?
        .ok_or(ClientError::RoleNotFound)?;

    tracing::info!(target: TRACING_TARGET_ROLES, role_id = %id, "role deleted");
    Ok(Json(record.into()))
}

/// Returns a [`Router`] with all related routes.
pub fn routes(state: &ServiceState) -> Router<ServiceState> {
    let authenticated = OperationAccess::authenticated;

    Router::new()
        .route(
            "/api/v1/roles",
            get(list_roles).with_access(state, authenticated()),
        )
        .route(
            "/api/v1/roles",
            post(create_role).with_access(
                state,
                OperationAccess::roles([UserRole::SuperAdmin, UserRole::Admin]),
            ),
        )
        .route(
            "/api/v1/roles/{id}",
            get(get_role).with_access(state, authenticated()),
        )
        .route(
            "/api/v1/roles/{id}",
            put(update_role).with_access(state, authenticated()),
        )
        .route(
            "/api/v1/roles/{id}",
            delete(remove_role).with_access(state, authenticated()),
        )
        .route(
            "/api/v1/roles/{id}/activate",
            put(activate_role).with_access(state, authenticated()),
        )
}

#[cfg(test)]
mod test {
    use std::future::IntoFuture;

    use serde_json::{Value, json};

    use super::*;
    use crate::handler::test::{create_test_server, create_test_user};

    #[tokio::test]
    async fn builtin_roles_are_seeded() -> anyhow::Result<()> {
        let (server, state) = create_test_server().await?;
        let (_, token) = create_test_user(&state, "jdoe", &[UserRole::User]).await?;

        let response = server.get("/api/v1/roles").authorization_bearer(&token).await;
        response.assert_status_ok();

        let body: Vec<Role> = response.json();
        let mut values: Vec<_> = body.iter().map(|r| r.value.as_str()).collect();
        values.sort_unstable();
        assert_eq!(values, ["admin", "superadmin", "user"]);
        assert!(body.iter().all(|r| r.active && r.system_locked));
        Ok(())
    }

    #[tokio::test]
    async fn roles_require_authentication() -> anyhow::Result<()> {
        let (server, _) = create_test_server().await?;

        let response = server.get("/api/v1/roles").await;
        response.assert_status_unauthorized();

        let body: Value = response.json();
        assert_eq!(body["type"], "NO_TOKEN");
        Ok(())
    }

    #[tokio::test]
    async fn admin_creates_inactive_role() -> anyhow::Result<()> {
        let (server, state) = create_test_server().await?;
        let (admin, token) = create_test_user(&state, "admin", &[UserRole::Admin]).await?;

        let response = server
            .post("/api/v1/roles")
            .authorization_bearer(&token)
            .json(&json!({ "role": "Editor", "value": "editor", "active": true }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let body: Role = response.json();
        assert!(!body.active);
        assert!(!body.system_locked);
        assert_eq!(body.lang_key, "en-us");
        assert_eq!(body.authorship.created_by, Some(admin.id));
        assert_eq!(body.authorship.last_modified_by, Some(admin.id));
        Ok(())
    }

    #[tokio::test]
    async fn plain_user_cannot_create_role() -> anyhow::Result<()> {
        let (server, state) = create_test_server().await?;
        let (_, token) = create_test_user(&state, "jdoe", &[UserRole::User]).await?;

        let response = server
            .post("/api/v1/roles")
            .authorization_bearer(&token)
            .json(&json!({ "role": "Editor", "value": "editor" }))
            .await;
        response.assert_status_unauthorized();
        Ok(())
    }

    #[tokio::test]
    async fn create_rejects_duplicates() -> anyhow::Result<()> {
        let (server, state) = create_test_server().await?;
        let (_, token) = create_test_user(&state, "root2", &[UserRole::SuperAdmin]).await?;

        let response = server
            .post("/api/v1/roles")
            .authorization_bearer(&token)
            .json(&json!({ "role": "user", "value": "member" }))
            .await;
        response.assert_status_unprocessable_entity();
        let body: Value = response.json();
        assert_eq!(body, json!({ "errors": { "role": "duplicated" } }));

        let response = server
            .post("/api/v1/roles")
            .authorization_bearer(&token)
            .json(&json!({ "role": "Member", "value": "user" }))
            .await;
        response.assert_status_unprocessable_entity();
        let body: Value = response.json();
        assert_eq!(body, json!({ "errors": { "value": "duplicated" } }));
        Ok(())
    }

    #[tokio::test]
    async fn activate_and_remove_role() -> anyhow::Result<()> {
        let (server, state) = create_test_server().await?;
        let (user, token) = create_test_user(&state, "jdoe", &[UserRole::User]).await?;
        let record = state
            .registry
            .roles
            .insert(RoleRecord::new("Editor", "editor", "en-us"))
            .await?;

        let response = server
            .put(&format!("/api/v1/roles/{}/activate", record.id))
            .authorization_bearer(&token)
            .json(&json!({ "active": true }))
            .await;
        response.assert_status_ok();
        let body: Role = response.json();
        assert!(body.active);
        assert_eq!(body.authorship.last_modified_by, Some(user.id));

        let response = server
            .delete(&format!("/api/v1/roles/{}", record.id))
            .authorization_bearer(&token)
            .await;
        response.assert_status_ok();

        let response = server
            .get(&format!("/api/v1/roles/{}", record.id))
            .authorization_bearer(&token)
            .await;
        response.assert_status_not_found();
        let body: Value = response.json();
        assert_eq!(body["message"], "role.notfound");
        Ok(())
    }

    #[tokio::test]
    async fn system_locked_role_survives_delete() -> anyhow::Result<()> {
        let (server, state) = create_test_server().await?;
        let (_, token) = create_test_user(&state, "root2", &[UserRole::SuperAdmin]).await?;
        let roles = state.registry.roles.list().await?;
        let locked = roles
            .first()
            .ok_or_else(|| anyhow::anyhow!("no seeded roles"))?;

        let response = server
            .delete(&format!("/api/v1/roles/{}", locked.id))
            .authorization_bearer(&token)
            .await;
        response.assert_status_unprocessable_entity();

        let body: Value = response.json();
        assert_eq!(
            body,
            json!({ "errors": { "message": "role.delete.systemLocked" } })
        );
        assert_eq!(state.registry.roles.count().await?, 3);
        Ok(())
    }

    #[tokio::test]
    async fn locked_role_value_cannot_change() -> anyhow::Result<()> {
        let (server, state) = create_test_server().await?;
        let (_, token) = create_test_user(&state, "root2", &[UserRole::SuperAdmin]).await?;
        let admin = state
            .registry
            .roles
            .find_one(&|record: &RoleRecord| record.value == "admin")
            .await?
            .ok_or_else(|| anyhow::anyhow!("admin role not seeded"))?;

        let response = server
            .put(&format!("/api/v1/roles/{}", admin.id))
            .authorization_bearer(&token)
            .json(&json!({ "value": "owner" }))
            .await;
        response.assert_status_unprocessable_entity();
        let body: Value = response.json();
        assert_eq!(body, json!({ "errors": { "value": "system locked" } }));

        let response = server
            .put(&format!("/api/v1/roles/{}", admin.id))
            .authorization_bearer(&token)
            .json(&json!({ "role": "Administrator" }))
            .await;
        response.assert_status_ok();
        let body: Role = response.json();
        assert_eq!(body.value, "admin");
        Ok(())
    }

    #[tokio::test]
    async fn update_rejects_taken_name() -> anyhow::Result<()> {
        let (server, state) = create_test_server().await?;
        let (_, token) = create_test_user(&state, "root2", &[UserRole::SuperAdmin]).await?;
        let record = state
            .registry
            .roles
            .insert(RoleRecord::new("Editor", "editor", "en-us"))
            .await?;

        let response = server
            .put(&format!("/api/v1/roles/{}", record.id))
            .authorization_bearer(&token)
            .json(&json!({ "role": "user" }))
            .await;
        response.assert_status_unprocessable_entity();
        let body: Value = response.json();
        assert_eq!(body, json!({ "errors": { "role": "duplicated" } }));
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_creates_keep_value_unique() -> anyhow::Result<()> {
        let (server, state) = create_test_server().await?;
        let (_, token) = create_test_user(&state, "root2", &[UserRole::SuperAdmin]).await?;

        let create = |name: &'static str| {
            server
                .post("/api/v1/roles")
                .authorization_bearer(&token)
                .json(&json!({ "role": name, "value": "editor" }))
                .into_future()
        };
        let (first, second, third) =
            tokio::join!(create("Editor"), create("Writer"), create("Author"));

        let created = [first, second, third]
            .iter()
            .filter(|response| response.status_code() == StatusCode::CREATED)
            .count();
        assert_eq!(created, 1);
        assert_eq!(state.registry.roles.count().await?, 4);
        Ok(())
    }
}
