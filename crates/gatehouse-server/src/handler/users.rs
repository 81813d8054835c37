//! User management handlers.
//!
//! `getMe` and `logout` are open to any authenticated caller. Creation and
//! every id-addressed operation require `superadmin`.

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use gatehouse_core::UserRole;
use uuid::Uuid;

use crate::extract::{AuthState, Json, Path, SanitizedJson, ValidateJson};
use crate::handler::request::{CreateUser, RemoveManyUsers, UpdateUser};
use crate::handler::response::{
    DeletionError, DeletionErrorDetail, DeletionRecord, Logout, User, UserDeleted, UsersDeleted,
};
use crate::handler::{ClientError, Error, ErrorKind, Result};
use crate::middleware::{MethodRouterAccessExt, RouterRolesExt};
use crate::service::{
    Actor, Authorship, Guarded, OperationAccess, PasswordHasher, RoleRecord, RoleRequirement,
    ServiceConfig, ServiceRegistry, ServiceState, Unique, UserRecord, generate_verification_token,
    update_author,
};
use crate::utility::tracing_targets::TRACING_TARGET_USERS;

/// Language key used when a request omits one.
pub(super) const DEFAULT_LANG_KEY: &str = "en-us";

const REMOVE_MANY_SINGLE: &str = "Deletion skipped. API removemany called with 1 item in array. \
                                  Use DELETE /api/v1/user/:id instead.";
const REMOVE_MANY_EMPTY: &str = "API removemany called with unprocessable parameter";

/// Messages attached to the `login` and `email` fields when either is taken.
pub(super) struct TakenMessages {
    pub login: &'static str,
    pub email: &'static str,
}

/// Messages used by superadmin-driven writes.
const CREATE_TAKEN: TakenMessages = TakenMessages {
    login: "login not available",
    email: "email not available",
};

/// Fields of a user about to be stored.
pub(super) struct NewUser {
    pub login: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub lang_key: Option<String>,
    pub roles: BTreeSet<UserRole>,
    pub require_token: bool,
}

/// Returns the error for a taken `login` or `email`.
fn taken_error(field: &str, taken: &TakenMessages) -> Error<'static> {
    if field == "email" {
        ClientError::UserDuplicatedEmail.with_field("email", taken.email)
    } else {
        ClientError::UserDuplicatedLogin.with_field("login", taken.login)
    }
}

/// Refuses explicitly assigned roles whose stored role record is inactive.
async fn ensure_roles_active(
    registry: &ServiceRegistry,
    roles: &BTreeSet<UserRole>,
) -> Result<()> {
    for role in roles {
        let value = role.as_ref();
        let record = registry
            .roles
            .find_one(&|record: &RoleRecord| record.value == value)
            .await?;

        if record.is_some_and(|record| !record.active) {
            tracing::warn!(target: TRACING_TARGET_USERS, role = value, "role not active");
            let message = format!("{value} not active");
            return Err(ClientError::RoleNotActive.with_field("roles", message));
        }
    }
    Ok(())
}

/// Hashes the password and stores a new user whose login and email are
/// both unused.
///
/// With `require_token` the user is stored inactive together with a
/// verification token; otherwise it is active right away.
pub(super) async fn insert_user(
    registry: &ServiceRegistry,
    password_hasher: &PasswordHasher,
    new_user: NewUser,
    actor: Option<&Actor>,
    taken: TakenMessages,
) -> Result<UserRecord> {
    let password = password_hasher.hash_password(&new_user.password)?;
    let verification_token = new_user
        .require_token
        .then(generate_verification_token);

    let mut record = UserRecord {
        id: Uuid::now_v7(),
        login: new_user.login,
        first_name: new_user.first_name,
        last_name: new_user.last_name,
        email: new_user.email,
        lang_key: new_user
            .lang_key
            .unwrap_or_else(|| DEFAULT_LANG_KEY.to_owned()),
        password,
        roles: new_user.roles,
        active: !new_user.require_token,
        verification_token,
        authorship: Authorship::default(),
    };
    update_author(&mut record, actor, true);

    let (login, email) = (record.login.clone(), record.email.clone());
    let same_login = |existing: &UserRecord| existing.login == login;
    let same_email = |existing: &UserRecord| existing.email == email;
    let unique = [
        Unique::new("login", &same_login),
        Unique::new("email", &same_email),
    ];

    let record = match registry.users.insert_unique(record, &unique).await? {
        Guarded::Stored(record) => record,
        Guarded::Conflict { field } => {
            tracing::warn!(target: TRACING_TARGET_USERS, field, "user already registered");
            return Err(taken_error(field, &taken));
        }
    };

    tracing::info!(
        target: TRACING_TARGET_USERS,
        user_id = %record.id,
        login = %record.login,
        active = record.active,
        "user created"
    );

    Ok(record)
}

async fn find_user(registry: &ServiceRegistry, id: Uuid) -> Result<UserRecord> {
    registry.users.find_by_id(id).await?.ok_or_else(|| {
        tracing::debug!(target: TRACING_TARGET_USERS, user_id = %id, "user not found");
        ClientError::UserNotFound.into()
    })
}

/// Echoes the caller's identity. Tokens are bearer-held, so nothing is
/// revoked server-side.
#[tracing::instrument(skip_all)]
async fn logout(auth_state: AuthState) -> Json<Logout> {
    tracing::debug!(
        target: TRACING_TARGET_USERS,
        user_id = %auth_state.id,
        "logout"
    );

    Json(Logout {
        logout: true,
        user: auth_state.into_inner(),
    })
}

/// Creates a user on behalf of a superadmin.
#[tracing::instrument(skip_all)]
async fn create_user(
    State(config): State<Arc<ServiceConfig>>,
    State(registry): State<ServiceRegistry>,
    State(password_hasher): State<PasswordHasher>,
    auth_state: AuthState,
    SanitizedJson(request): SanitizedJson<CreateUser>,
) -> Result<(StatusCode, Json<User>)> {
    if let Some(roles) = &request.roles {
        ensure_roles_active(&registry, roles).await?;
    }

    let new_user = NewUser {
        login: request.login,
        email: request.email,
        first_name: request.first_name,
        last_name: request.last_name,
        password: request.password,
        lang_key: request.lang_key,
        roles: request
            .roles
            .unwrap_or_else(|| config.default_roles.iter().copied().collect()),
        require_token: request
            .require_reg_token
            .unwrap_or(config.registration_token_required),
    };

    let actor = auth_state.actor();
    let record =
        insert_user(&registry, &password_hasher, new_user, Some(&actor), CREATE_TAKEN).await?;
    Ok((StatusCode::CREATED, Json(User::with_verification_token(record))))
}

/// Returns the caller's current stored record.
#[tracing::instrument(skip_all)]
async fn get_me(
    State(registry): State<ServiceRegistry>,
    auth_state: AuthState,
) -> Result<Json<User>> {
    let record = find_user(&registry, auth_state.id).await?;
    Ok(Json(record.into()))
}

#[tracing::instrument(skip_all)]
async fn get_user(
    State(registry): State<ServiceRegistry>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>> {
    let record = find_user(&registry, id).await?;
    Ok(Json(record.into()))
}

/// Applies a partial update. Creation stamps are kept.
#[tracing::instrument(skip_all)]
async fn update_user(
    State(registry): State<ServiceRegistry>,
    State(password_hasher): State<PasswordHasher>,
    auth_state: AuthState,
    Path(id): Path<Uuid>,
    SanitizedJson(request): SanitizedJson<UpdateUser>,
) -> Result<Json<User>> {
    let mut record = find_user(&registry, id).await?;

    if let Some(login) = request.login {
        record.login = login;
    }
    if let Some(email) = request.email {
        record.email = email;
    }
    if let Some(first_name) = request.first_name {
        record.first_name = first_name;
    }
    if let Some(last_name) = request.last_name {
        record.last_name = last_name;
    }
    if let Some(lang_key) = request.lang_key {
        record.lang_key = lang_key;
    }
    if let Some(roles) = request.roles {
        ensure_roles_active(&registry, &roles).await?;
        record.roles = roles;
    }
    if let Some(active) = request.active {
        record.active = active;
    }
    if let Some(password) = request.password {
        record.password = password_hasher.hash_password(&password)?;
    }

    update_author(&mut record, Some(&auth_state.actor()), false);

    let (login, email) = (record.login.clone(), record.email.clone());
    let same_login = |existing: &UserRecord| existing.login == login;
    let same_email = |existing: &UserRecord| existing.email == email;
    let unique = [
        Unique::new("login", &same_login),
        Unique::new("email", &same_email),
    ];

    let record = match registry.users.update_unique(record, &unique).await? {
        Some(Guarded::Stored(record)) => record,
        Some(Guarded::Conflict { field }) => {
            tracing::warn!(target: TRACING_TARGET_USERS, user_id = %id, field, "update collides");
            return Err(taken_error(field, &CREATE_TAKEN));
        }
        None => return Err(ClientError::UserNotFound.into()),
    };

    tracing::info!(target: TRACING_TARGET_USERS, user_id = %id, "user updated");
    Ok(Json(record.into()))
}

/// Deletes one user. A caller cannot delete itself.
#[tracing::instrument(skip_all)]
async fn remove_user(
    State(registry): State<ServiceRegistry>,
    auth_state: AuthState,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<UserDeleted>)> {
    if id == auth_state.id {
        tracing::warn!(target: TRACING_TARGET_USERS, user_id = %id, "refusing to delete self");
        return Err(ClientError::UserDeleteItself.into());
    }

    let record = registry
        .users
        .remove(id)
        .await?
        .ok_or(ClientError::UserNotFound)?;

    tracing::info!(target: TRACING_TARGET_USERS, user_id = %id, "user deleted");
    let response = UserDeleted {
        records_deleted: 1,
        record: record.into(),
    };

    Ok((StatusCode::ACCEPTED, Json(response)))
}

/// Deletes several users and reports per-id failures.
#[tracing::instrument(skip_all)]
async fn remove_many_users(
    State(registry): State<ServiceRegistry>,
    auth_state: AuthState,
    ValidateJson(request): ValidateJson<RemoveManyUsers>,
) -> Result<(StatusCode, Json<UsersDeleted>)> {
    match request.user_ids.len() {
        0 => {
            tracing::warn!(target: TRACING_TARGET_USERS, "removeMany called without ids");
            return Err(ErrorKind::Unprocessable.with_message(REMOVE_MANY_EMPTY));
        }
        1 => {
            tracing::warn!(target: TRACING_TARGET_USERS, "removeMany called with a single id");
            return Err(ErrorKind::Unprocessable.with_message(REMOVE_MANY_SINGLE));
        }
        _ => {}
    }

    let mut response = UsersDeleted::default();
    for id in request.user_ids {
        if id == auth_state.id {
            let record = match registry.users.find_by_id(id).await? {
                Some(record) => DeletionRecord::User(Box::new(record.into())),
                None => DeletionRecord::Missing { id },
            };

            response.push_error(DeletionError {
                error: DeletionErrorDetail {
                    message: "Cannot delete self".to_owned(),
                    code: ClientError::UserDeleteItself.kind().status_code().as_u16(),
                    error_type: Some(ClientError::UserDeleteItself.code().to_owned()),
                },
                record,
            });
            continue;
        }

        match registry.users.remove(id).await? {
            Some(record) => response.push_deleted(record.into()),
            None => response.push_error(DeletionError {
                error: DeletionErrorDetail {
                    message: ClientError::UserNotFound.code().to_owned(),
                    code: ClientError::UserNotFound.kind().status_code().as_u16(),
                    error_type: None,
                },
                record: DeletionRecord::Missing { id },
            }),
        }
    }

    tracing::info!(
        target: TRACING_TARGET_USERS,
        deleted = response.records_deleted.deletion_count,
        failed = response.deletion_errors.as_ref().map_or(0, |e| e.error_count),
        "bulk user deletion finished"
    );

    Ok((StatusCode::ACCEPTED, Json(response)))
}

#[tracing::instrument(skip_all)]
async fn list_users(State(registry): State<ServiceRegistry>) -> Result<Json<Vec<User>>> {
    let users = registry.users.list().await?;
    Ok(Json(users.into_iter().map(User::from).collect()))
}

/// Returns a [`Router`] with all related routes.
pub fn routes(state: &ServiceState) -> Router<ServiceState> {
    let superadmin = || OperationAccess::roles([UserRole::SuperAdmin]);

    let own_routes = Router::new()
        .route(
            "/api/v1/user/logout",
            get(logout).with_access(state, OperationAccess::authenticated()),
        )
        .route(
            "/api/v1/user",
            get(get_me).with_access(state, OperationAccess::authenticated()),
        )
        .route(
            "/api/v1/user",
            post(create_user).with_access(state, superadmin()),
        );

    // Everything here is superadmin-only, so the requirement sits on the router.
    let managed_routes = Router::new()
        .route(
            "/api/v1/user/list",
            get(list_users).with_access(state, OperationAccess::authenticated()),
        )
        .route(
            "/api/v1/user/removeMany",
            post(remove_many_users).with_access(state, OperationAccess::authenticated()),
        )
        .route(
            "/api/v1/user/{id}",
            get(get_user).with_access(state, OperationAccess::authenticated()),
        )
        .route(
            "/api/v1/user/{id}",
            put(update_user).with_access(state, OperationAccess::authenticated()),
        )
        .route(
            "/api/v1/user/{id}",
            delete(remove_user).with_access(state, OperationAccess::authenticated()),
        )
        .with_route_roles(RoleRequirement::any_of([UserRole::SuperAdmin]));

    own_routes.merge(managed_routes)
}

#[cfg(test)]
mod test {
    use serde_json::{Value, json};

    use super::*;
    use crate::handler::test::{
        TEST_PASSWORD, create_test_server, create_test_state, create_test_user,
    };

    #[tokio::test]
    async fn logout_echoes_identity() -> anyhow::Result<()> {
        let (server, state) = create_test_server().await?;
        let (user, token) = create_test_user(&state, "jdoe", &[UserRole::User]).await?;

        let response = server
            .get("/api/v1/user/logout")
            .authorization_bearer(&token)
            .await;
        response.assert_status_ok();

        let body: Logout = response.json();
        assert!(body.logout);
        assert_eq!(body.user.id, user.id);
        Ok(())
    }

    #[tokio::test]
    async fn get_me_hides_password() -> anyhow::Result<()> {
        let (server, state) = create_test_server().await?;
        let (user, token) = create_test_user(&state, "jdoe", &[UserRole::User]).await?;

        let response = server.get("/api/v1/user").authorization_bearer(&token).await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["_id"], json!(user.id));
        assert_eq!(body["login"], "jdoe");
        assert!(body.get("password").is_none());
        assert!(body.get("verificationToken").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn get_me_reports_deleted_user() -> anyhow::Result<()> {
        let (server, state) = create_test_server().await?;
        let (user, token) = create_test_user(&state, "ghost", &[UserRole::User]).await?;
        state.registry.users.remove(user.id).await?;

        let response = server.get("/api/v1/user").authorization_bearer(&token).await;
        response.assert_status_not_found();

        let body: Value = response.json();
        assert_eq!(body["name"], "ClientError");
        assert_eq!(body["message"], "user.notfound");
        Ok(())
    }

    #[tokio::test]
    async fn plain_user_cannot_list() -> anyhow::Result<()> {
        let (server, state) = create_test_server().await?;
        let (_, token) = create_test_user(&state, "jdoe", &[UserRole::User]).await?;

        let response = server
            .get("/api/v1/user/list")
            .authorization_bearer(&token)
            .await;
        response.assert_status_unauthorized();

        let body: Value = response.json();
        assert_eq!(body["type"], "INVALID_TOKEN");
        Ok(())
    }

    #[tokio::test]
    async fn superadmin_lists_users() -> anyhow::Result<()> {
        let (server, state) = create_test_server().await?;
        let (_, token) = create_test_user(&state, "root2", &[UserRole::SuperAdmin]).await?;

        let response = server
            .get("/api/v1/user/list")
            .authorization_bearer(&token)
            .await;
        response.assert_status_ok();

        // The bootstrap superadmin plus the one created above.
        let body: Vec<User> = response.json();
        assert_eq!(body.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn create_honors_registration_token_override() -> anyhow::Result<()> {
        let (server, state) = create_test_server().await?;
        let (admin, token) = create_test_user(&state, "root2", &[UserRole::SuperAdmin]).await?;

        let response = server
            .post("/api/v1/user")
            .authorization_bearer(&token)
            .json(&json!({
                "login": "pending",
                "email": "pending@example.com",
                "firstName": "Pending",
                "password": TEST_PASSWORD,
                "requireRegToken": true,
                "createdBy": Uuid::nil(),
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let body: User = response.json();
        assert!(!body.active);
        assert_eq!(body.verification_token.as_deref().map(str::len), Some(64));
        assert_eq!(body.roles, BTreeSet::from([UserRole::User]));
        assert_eq!(body.authorship.created_by, Some(admin.id));
        Ok(())
    }

    #[tokio::test]
    async fn create_rejects_taken_login() -> anyhow::Result<()> {
        let (server, state) = create_test_server().await?;
        let (_, token) = create_test_user(&state, "root2", &[UserRole::SuperAdmin]).await?;
        create_test_user(&state, "taken", &[UserRole::User]).await?;

        let response = server
            .post("/api/v1/user")
            .authorization_bearer(&token)
            .json(&json!({
                "login": "taken",
                "email": "other@example.com",
                "firstName": "Other",
                "password": TEST_PASSWORD,
            }))
            .await;
        response.assert_status_unprocessable_entity();

        let body: Value = response.json();
        assert_eq!(body, json!({ "errors": { "login": "login not available" } }));
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_keep_login_unique() -> anyhow::Result<()> {
        let state = create_test_state().await?;

        let tasks: Vec<_> = (0..4)
            .map(|i| {
                let state = state.clone();
                tokio::spawn(async move {
                    let new_user = NewUser {
                        login: "racer".to_owned(),
                        email: format!("racer{i}@example.com"),
                        first_name: "Racer".to_owned(),
                        last_name: String::new(),
                        password: TEST_PASSWORD.to_owned(),
                        lang_key: None,
                        roles: BTreeSet::from([UserRole::User]),
                        require_token: false,
                    };

                    insert_user(
                        &state.registry,
                        &state.password_hasher,
                        new_user,
                        None,
                        CREATE_TAKEN,
                    )
                    .await
                    .is_ok()
                })
            })
            .collect();

        let mut created = 0;
        for task in tasks {
            if task.await? {
                created += 1;
            }
        }
        assert_eq!(created, 1);

        let racers = state
            .registry
            .users
            .list()
            .await?
            .into_iter()
            .filter(|user| user.login == "racer")
            .count();
        assert_eq!(racers, 1);
        Ok(())
    }

    #[tokio::test]
    async fn update_rejects_taken_email() -> anyhow::Result<()> {
        let (server, state) = create_test_server().await?;
        let (_, token) = create_test_user(&state, "root2", &[UserRole::SuperAdmin]).await?;
        let (user, _) = create_test_user(&state, "jdoe", &[UserRole::User]).await?;
        create_test_user(&state, "jane", &[UserRole::User]).await?;

        let response = server
            .put(&format!("/api/v1/user/{}", user.id))
            .authorization_bearer(&token)
            .json(&json!({ "email": "jane@example.com" }))
            .await;
        response.assert_status_unprocessable_entity();

        let body: Value = response.json();
        assert_eq!(body, json!({ "errors": { "email": "email not available" } }));

        let stored = state.registry.users.find_by_id(user.id).await?;
        assert_eq!(stored.map(|u| u.email).as_deref(), Some("jdoe@example.com"));
        Ok(())
    }

    #[tokio::test]
    async fn inactive_role_cannot_be_assigned() -> anyhow::Result<()> {
        let (server, state) = create_test_server().await?;
        let (_, token) = create_test_user(&state, "root2", &[UserRole::SuperAdmin]).await?;
        let (user, _) = create_test_user(&state, "jdoe", &[UserRole::User]).await?;

        let mut admin = state
            .registry
            .roles
            .find_one(&|record: &RoleRecord| record.value == "admin")
            .await?
            .ok_or_else(|| anyhow::anyhow!("admin role not seeded"))?;
        admin.active = false;
        state.registry.roles.update(admin).await?;

        let response = server
            .post("/api/v1/user")
            .authorization_bearer(&token)
            .json(&json!({
                "login": "helper",
                "email": "helper@example.com",
                "firstName": "Helper",
                "password": TEST_PASSWORD,
                "roles": ["admin"],
            }))
            .await;
        response.assert_status_forbidden();
        let body: Value = response.json();
        assert_eq!(body["message"], "role.notactive");
        assert_eq!(body["data"][0]["field"], "roles");

        let response = server
            .put(&format!("/api/v1/user/{}", user.id))
            .authorization_bearer(&token)
            .json(&json!({ "roles": ["user", "admin"] }))
            .await;
        response.assert_status_forbidden();

        let stored = state.registry.users.find_by_id(user.id).await?;
        assert_eq!(stored.map(|u| u.roles), Some(BTreeSet::from([UserRole::User])));
        assert_eq!(state.registry.users.count().await?, 3);
        Ok(())
    }

    #[tokio::test]
    async fn update_keeps_creation_stamps() -> anyhow::Result<()> {
        let (server, state) = create_test_server().await?;
        let (admin, token) = create_test_user(&state, "root2", &[UserRole::SuperAdmin]).await?;
        let (user, _) = create_test_user(&state, "jdoe", &[UserRole::User]).await?;

        let response = server
            .put(&format!("/api/v1/user/{}", user.id))
            .authorization_bearer(&token)
            .json(&json!({
                "firstName": "Johnny",
                "password": "a new password",
                "createdDate": "2000-01-01T00:00:00Z",
            }))
            .await;
        response.assert_status_ok();

        let body: User = response.json();
        assert_eq!(body.first_name, "Johnny");
        assert_eq!(body.authorship.created_date, user.authorship.created_date);
        assert_eq!(body.authorship.last_modified_by, Some(admin.id));

        let stored = state
            .registry
            .users
            .find_by_id(user.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("user vanished"))?;
        state
            .password_hasher
            .verify_password("a new password", &stored.password)?;
        Ok(())
    }

    #[tokio::test]
    async fn remove_refuses_self() -> anyhow::Result<()> {
        let (server, state) = create_test_server().await?;
        let (admin, token) = create_test_user(&state, "root2", &[UserRole::SuperAdmin]).await?;

        let response = server
            .delete(&format!("/api/v1/user/{}", admin.id))
            .authorization_bearer(&token)
            .await;
        response.assert_status_unprocessable_entity();

        let body: Value = response.json();
        assert_eq!(body, json!({ "errors": { "message": "user.delete.itself" } }));
        Ok(())
    }

    #[tokio::test]
    async fn remove_returns_accepted() -> anyhow::Result<()> {
        let (server, state) = create_test_server().await?;
        let (_, token) = create_test_user(&state, "root2", &[UserRole::SuperAdmin]).await?;
        let (user, _) = create_test_user(&state, "jdoe", &[UserRole::User]).await?;

        let response = server
            .delete(&format!("/api/v1/user/{}", user.id))
            .authorization_bearer(&token)
            .await;
        response.assert_status(StatusCode::ACCEPTED);

        let body: UserDeleted = response.json();
        assert_eq!(body.records_deleted, 1);
        assert_eq!(body.record.id, user.id);

        let response = server
            .delete(&format!("/api/v1/user/{}", user.id))
            .authorization_bearer(&token)
            .await;
        response.assert_status_not_found();
        Ok(())
    }

    #[tokio::test]
    async fn remove_many_needs_several_ids() -> anyhow::Result<()> {
        let (server, state) = create_test_server().await?;
        let (_, token) = create_test_user(&state, "root2", &[UserRole::SuperAdmin]).await?;

        let response = server
            .post("/api/v1/user/removeMany")
            .authorization_bearer(&token)
            .json(&json!({ "userIDs": [Uuid::now_v7()] }))
            .await;
        response.assert_status_unprocessable_entity();
        let body: Value = response.json();
        assert_eq!(body["errors"]["message"], REMOVE_MANY_SINGLE);

        let response = server
            .post("/api/v1/user/removeMany")
            .authorization_bearer(&token)
            .json(&json!({ "userIDs": [] }))
            .await;
        response.assert_status_unprocessable_entity();
        let body: Value = response.json();
        assert_eq!(body["errors"]["message"], REMOVE_MANY_EMPTY);
        Ok(())
    }

    #[tokio::test]
    async fn remove_many_reports_failures() -> anyhow::Result<()> {
        let (server, state) = create_test_server().await?;
        let (admin, token) = create_test_user(&state, "root2", &[UserRole::SuperAdmin]).await?;
        let (first, _) = create_test_user(&state, "first", &[UserRole::User]).await?;
        let (second, _) = create_test_user(&state, "second", &[UserRole::User]).await?;
        let missing = Uuid::now_v7();

        let response = server
            .post("/api/v1/user/removeMany")
            .authorization_bearer(&token)
            .json(&json!({ "userIDs": [first.id, admin.id, missing, second.id] }))
            .await;
        response.assert_status(StatusCode::ACCEPTED);

        let body: Value = response.json();
        assert_eq!(body["recordsDeleted"]["deletionCount"], 2);
        assert_eq!(body["deletionErrors"]["errorCount"], 2);

        let errors = &body["deletionErrors"]["records"];
        assert_eq!(errors[0]["error"]["message"], "Cannot delete self");
        assert_eq!(errors[0]["error"]["code"], 422);
        assert_eq!(errors[0]["error"]["type"], "user.delete.itself");
        assert_eq!(errors[0]["record"]["_id"], json!(admin.id));
        assert_eq!(errors[1]["error"]["message"], "user.notfound");
        assert_eq!(errors[1]["error"]["code"], 404);
        assert_eq!(errors[1]["record"], json!({ "id": missing }));

        assert_eq!(state.registry.users.count().await?, 2);
        Ok(())
    }
}
