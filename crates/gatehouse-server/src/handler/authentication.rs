//! Registration, login and account activation.
//!
//! These routes are public. Login is the only place a token is issued; the
//! token embeds an [`IdentitySnapshot`] that later requests trust without a
//! store lookup.
//!
//! [`IdentitySnapshot`]: gatehouse_core::IdentitySnapshot

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;

use super::users::{NewUser, TakenMessages, insert_user};
use crate::extract::{Json, SanitizedJson, ValidateJson};
use crate::handler::request::{Activate, Login, Register};
use crate::handler::response::{LoginResponse, User};
use crate::handler::{ClientError, ErrorKind, Result};
use crate::middleware::MethodRouterAccessExt;
use crate::service::{
    OperationAccess, PasswordHasher, ServiceConfig, ServiceRegistry, ServiceState, UserRecord,
};
use crate::utility::tracing_targets::TRACING_TARGET_ACCOUNTS;

/// Registers a new account with the configured default roles.
#[tracing::instrument(skip_all)]
async fn register(
    State(config): State<Arc<ServiceConfig>>,
    State(registry): State<ServiceRegistry>,
    State(password_hasher): State<PasswordHasher>,
    SanitizedJson(request): SanitizedJson<Register>,
) -> Result<(StatusCode, Json<User>)> {
    tracing::trace!(
        target: TRACING_TARGET_ACCOUNTS,
        login = %request.login,
        "registration attempt"
    );

    let new_user = NewUser {
        login: request.login,
        email: request.email,
        first_name: request.first_name,
        last_name: request.last_name,
        password: request.password,
        lang_key: request.lang_key,
        roles: config.default_roles.iter().copied().collect(),
        require_token: config.registration_token_required,
    };

    let taken = TakenMessages {
        login: "duplicated",
        email: "duplicated",
    };

    let record = insert_user(&registry, &password_hasher, new_user, None, taken).await?;
    Ok((StatusCode::CREATED, Json(User::with_verification_token(record))))
}

/// Exchanges credentials for a token.
///
/// `login` is matched against the email when it contains `@`.
#[tracing::instrument(skip_all)]
async fn login(
    State(service_state): State<ServiceState>,
    ValidateJson(request): ValidateJson<Login>,
) -> Result<(TypedHeader<Authorization<Bearer>>, Json<LoginResponse>)> {
    let credential = request.login.as_str();
    let found = service_state
        .registry
        .users
        .find_one(&|record: &UserRecord| record.matches_credential(credential))
        .await?;

    let Some(record) = found else {
        // Keeps response timing independent of whether the account exists.
        service_state
            .password_hasher
            .verify_dummy_password(&request.password);

        tracing::warn!(target: TRACING_TARGET_ACCOUNTS, "login failed: unknown account");
        return Err(PasswordHasher::wrong_credentials());
    };

    if !record.active {
        tracing::warn!(
            target: TRACING_TARGET_ACCOUNTS,
            user_id = %record.id,
            "login failed: account not active"
        );
        return Err(ClientError::UserNotActive.with_field("disabled", "user not active"));
    }

    service_state
        .password_hasher
        .verify_password(&request.password, &record.password)
        .inspect_err(|_| {
            tracing::warn!(
                target: TRACING_TARGET_ACCOUNTS,
                user_id = %record.id,
                "login failed: wrong password"
            );
        })?;

    let token = service_state.issue_token(&record)?;
    let header = Authorization::bearer(token.as_str()).map_err(|_| {
        ErrorKind::InternalServerError.with_context("Issued token is not a valid header value")
    })?;

    tracing::info!(
        target: TRACING_TARGET_ACCOUNTS,
        user_id = %record.id,
        "login successful: token issued"
    );

    let response = LoginResponse {
        user: record.into(),
        token,
    };

    Ok((TypedHeader(header), Json(response)))
}

/// Activates the account holding the given verification token.
#[tracing::instrument(skip_all)]
async fn activate(
    State(registry): State<ServiceRegistry>,
    ValidateJson(request): ValidateJson<Activate>,
) -> Result<Json<User>> {
    let verification_token = request.verification_token.as_str();
    let mut record = registry
        .users
        .find_one(&|record: &UserRecord| {
            record.verification_token.as_deref() == Some(verification_token)
        })
        .await?
        .ok_or(ClientError::UserNotFound)?;

    record.active = true;
    let record = registry
        .users
        .update(record)
        .await?
        .ok_or(ClientError::UserNotFound)?;

    tracing::info!(
        target: TRACING_TARGET_ACCOUNTS,
        user_id = %record.id,
        "account activated"
    );

    Ok(Json(record.into()))
}

/// Returns a [`Router`] with all related routes.
pub fn routes(state: &ServiceState) -> Router<ServiceState> {
    Router::new()
        .route(
            "/auth/register",
            post(register).with_access(state, OperationAccess::public()),
        )
        .route(
            "/auth/login",
            post(login).with_access(state, OperationAccess::public()),
        )
        .route(
            "/auth/activate",
            post(activate).with_access(state, OperationAccess::public()),
        )
}

#[cfg(test)]
mod test {
    use axum::http::header::AUTHORIZATION;
    use gatehouse_core::UserRole;
    use serde_json::{Value, json};

    use super::*;
    use crate::handler::test::{
        TEST_PASSWORD, create_test_config, create_test_server, create_test_server_with_state,
        create_test_user,
    };

    fn registration(login: &str) -> Value {
        json!({
            "login": login,
            "email": format!("{login}@example.com"),
            "firstName": "John",
            "lastName": "Doe",
            "password": TEST_PASSWORD,
        })
    }

    #[tokio::test]
    async fn register_assigns_default_roles() -> anyhow::Result<()> {
        let (server, _) = create_test_server().await?;

        let response = server.post("/auth/register").json(&registration("jdoe")).await;
        response.assert_status(StatusCode::CREATED);

        let body: Value = response.json();
        assert_eq!(body["roles"], json!(["user"]));
        assert_eq!(body["active"], true);
        assert_eq!(body["langKey"], "en-us");
        assert_eq!(body["createdBy"], Value::Null);
        assert!(body.get("password").is_none());
        assert!(body.get("verificationToken").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn register_rejects_duplicates() -> anyhow::Result<()> {
        let (server, _) = create_test_server().await?;
        server.post("/auth/register").json(&registration("jdoe")).await;

        let response = server.post("/auth/register").json(&registration("jdoe")).await;
        response.assert_status_unprocessable_entity();
        let body: Value = response.json();
        assert_eq!(body, json!({ "errors": { "login": "duplicated" } }));

        let mut same_email = registration("other");
        same_email["email"] = json!("jdoe@example.com");
        let response = server.post("/auth/register").json(&same_email).await;
        response.assert_status_unprocessable_entity();
        let body: Value = response.json();
        assert_eq!(body, json!({ "errors": { "email": "duplicated" } }));
        Ok(())
    }

    #[tokio::test]
    async fn register_validates_payload() -> anyhow::Result<()> {
        let (server, _) = create_test_server().await?;

        let mut payload = registration("jdoe");
        payload["email"] = json!("not-an-email");

        let response = server.post("/auth/register").json(&payload).await;
        response.assert_status_unprocessable_entity();

        let body: Value = response.json();
        assert_eq!(body["errors"]["email"], "The 'email' field must be a valid email");
        Ok(())
    }

    #[tokio::test]
    async fn registration_token_flow() -> anyhow::Result<()> {
        let mut config = create_test_config()?;
        config.registration_token_required = true;
        let state = ServiceState::new(config).await?;
        let server = create_test_server_with_state(state)?;

        let response = server.post("/auth/register").json(&registration("jdoe")).await;
        response.assert_status(StatusCode::CREATED);
        let body: User = response.json();
        assert!(!body.active);
        let verification_token = body
            .verification_token
            .ok_or_else(|| anyhow::anyhow!("missing verification token"))?;

        let login = json!({ "login": "jdoe", "password": TEST_PASSWORD });
        let response = server.post("/auth/login").json(&login).await;
        response.assert_status_forbidden();
        let body: Value = response.json();
        assert_eq!(body["name"], "ClientError");
        assert_eq!(body["message"], "user.notactive");
        assert_eq!(body["data"][0]["field"], "disabled");

        let response = server
            .post("/auth/activate")
            .json(&json!({ "verificationToken": verification_token }))
            .await;
        response.assert_status_ok();
        let body: User = response.json();
        assert!(body.active);

        let response = server.post("/auth/login").json(&login).await;
        response.assert_status_ok();
        Ok(())
    }

    #[tokio::test]
    async fn activate_unknown_token() -> anyhow::Result<()> {
        let (server, _) = create_test_server().await?;

        let response = server
            .post("/auth/activate")
            .json(&json!({ "verificationToken": "nope" }))
            .await;
        response.assert_status_not_found();

        let body: Value = response.json();
        assert_eq!(body["message"], "user.notfound");
        Ok(())
    }

    #[tokio::test]
    async fn login_by_login_or_email() -> anyhow::Result<()> {
        let (server, state) = create_test_server().await?;
        let (user, _) = create_test_user(&state, "jdoe", &[UserRole::User]).await?;

        for credential in ["jdoe", "jdoe@example.com"] {
            let response = server
                .post("/auth/login")
                .json(&json!({ "login": credential, "password": TEST_PASSWORD }))
                .await;
            response.assert_status_ok();

            let body: LoginResponse = response.json();
            assert_eq!(body.user.id, user.id);

            let header = response.header(AUTHORIZATION);
            assert_eq!(header.to_str()?, format!("Bearer {}", body.token));

            let snapshot = state.authenticator.codec().resolve(body.token.as_str())?;
            assert_eq!(snapshot, user.snapshot());
        }
        Ok(())
    }

    #[tokio::test]
    async fn login_rejects_wrong_credentials() -> anyhow::Result<()> {
        let (server, state) = create_test_server().await?;
        create_test_user(&state, "jdoe", &[UserRole::User]).await?;

        let expected = json!({
            "errors": {
                "login": "login/password incorrect",
                "password": "login/password incorrect",
            }
        });

        for (login, password) in [("jdoe", "wrong password"), ("nobody", TEST_PASSWORD)] {
            let response = server
                .post("/auth/login")
                .json(&json!({ "login": login, "password": password }))
                .await;
            response.assert_status_unprocessable_entity();

            let body: Value = response.json();
            assert_eq!(body, expected);
        }
        Ok(())
    }
}
