//! Admin login backed by server-side sessions.
//!
//! An unknown username and a wrong password produce the same 401 body, and
//! both run one bcrypt verification.

use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue, header},
};

use crate::common::{ApiJson, AppState, Envelope, EnvelopeSchema};
use crate::error::{AppError, AppResult};
use crate::repositories::AdminUserRepository;
use crate::services::password::check_password;
use crate::services::session::AdminIdentity;

use super::types::{LoginRequest, LoginResponse};

type WithCookie<T> = ([(header::HeaderName, HeaderValue); 1], Envelope<T>);

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".to_string())
}

/// Log in and receive the session cookie
#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "`data`: `{username}`; sets the session cookie", body = EnvelopeSchema),
        (status = 400, description = "Username and password required", body = EnvelopeSchema),
        (status = 401, description = "Invalid credentials", body = EnvelopeSchema),
        (status = 429, description = "Too many login attempts"),
    ),
    tag = "admin"
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> AppResult<WithCookie<LoginResponse>> {
    let (Some(username), Some(password)) = (
        body.username.filter(|u| !u.is_empty()),
        body.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::Validation(
            "Username and password required".to_string(),
        ));
    };

    let user = AdminUserRepository::new(&state.db)
        .find_by_username(&username)
        .await?;
    let stored = user.as_ref().map(|u| u.password_hash.clone());

    let (true, Some(user)) = (check_password(password, stored).await?, user) else {
        tracing::warn!(username = %username, "Admin login failed");
        return Err(invalid_credentials());
    };

    let identity = AdminIdentity {
        id: user.id,
        username: user.username,
    };
    let cookie = state.sessions.start(&identity).await?;
    tracing::info!(username = %identity.username, "Admin logged in");

    Ok((
        [(header::SET_COOKIE, cookie)],
        Envelope::ok(LoginResponse {
            username: identity.username,
        }),
    ))
}

/// Liveness message for the login form
#[utoipa::path(
    get,
    path = "/api/admin/login",
    responses(
        (status = 200, description = "Admin API is running", body = EnvelopeSchema),
    ),
    tag = "admin"
)]
pub async fn login_status() -> Envelope<()> {
    Envelope::message("Admin API is running")
}

/// Identity of the current session
#[utoipa::path(
    get,
    path = "/api/admin/me",
    responses(
        (status = 200, description = "`data`: `{id, username}`", body = EnvelopeSchema),
        (status = 401, description = "Not authenticated", body = EnvelopeSchema),
    ),
    tag = "admin"
)]
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Envelope<AdminIdentity>> {
    state
        .sessions
        .current(&headers)
        .await?
        .map(Envelope::ok)
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))
}

/// End the current session, if any
#[utoipa::path(
    post,
    path = "/api/admin/logout",
    responses(
        (status = 200, description = "Logged out; clears the session cookie", body = EnvelopeSchema),
    ),
    tag = "admin"
)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<WithCookie<()>> {
    let cookie = state.sessions.end(&headers).await?;
    Ok(([(header::SET_COOKIE, cookie)], Envelope::message("Logged out")))
}
