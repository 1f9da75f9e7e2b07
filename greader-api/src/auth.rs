//! Request authentication.
//!
//! Two credentials exist. The session credential travels in every request
//! as `Authorization: GoogleLogin auth=<user>/<token>` and is obtained from
//! ClientLogin. The action token (`T` form field) guards mutations and is
//! the same derived token, fetched separately through `/token`.

use crate::error::{ApiError, ApiResult};
use crate::server::ReaderApi;
use crate::users::{verify_password, UserAccount};
use axum::http::{header, HeaderMap};
use greader_core::is_valid_username;

/// The authenticated user of one request.
#[derive(Debug, Clone)]
pub struct Session {
    user: UserAccount,
}

impl Session {
    /// Username.
    pub fn username(&self) -> &str {
        &self.user.name
    }

    /// The full account.
    pub fn user(&self) -> &UserAccount {
        &self.user
    }
}

/// Extract `<user>/<token>` from a `GoogleLogin auth=...` header value.
pub fn google_login_credential(value: &str) -> Option<&str> {
    let rest = value.trim().strip_prefix("GoogleLogin")?.trim_start();
    let credential = rest.strip_prefix("auth=")?.trim();
    (!credential.is_empty()).then_some(credential)
}

/// The GoogleLogin credential of a request, if any.
pub fn header_credential(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(google_login_credential)
}

/// Authenticate a request from its `Authorization` header.
///
/// No header (or one without a `<user>/<token>` pair) is not an error:
/// the request simply has no session. A header naming an invalid username
/// is a bad request; anything else that does not check out is unauthorized.
pub fn authenticate(api: &ReaderApi, headers: &HeaderMap) -> ApiResult<Option<Session>> {
    let Some((username, token)) = header_credential(headers).and_then(|c| c.split_once('/'))
    else {
        return Ok(None);
    };

    if !is_valid_username(username) {
        return Err(ApiError::bad_request("invalid username in Authorization header"));
    }

    let user = enabled_user(api, username)?;
    let tokens = api.tokens()?;

    if user.api_password_hash.is_empty()
        || !tokens.verify_exact(&user.name, &user.api_password_hash, token)
    {
        tracing::warn!("Invalid API authorisation for user {}", username);
        return Err(ApiError::unauthorized("session token mismatch"));
    }

    tracing::debug!("Authenticated API user {}", username);
    Ok(Some(Session { user }))
}

/// Handle `accounts/ClientLogin`. Returns the plain-text response body.
pub fn client_login(api: &ReaderApi, email: &str, password: &str) -> ApiResult<String> {
    if !is_valid_username(email) {
        return Err(ApiError::bad_request("invalid username"));
    }

    let user = enabled_user(api, email)?;
    if !verify_password(password, &user.api_password_hash) {
        tracing::warn!("Password API mismatch for user {}", email);
        return Err(ApiError::unauthorized("password mismatch"));
    }

    let token = api.tokens()?.issue(&user.name, &user.api_password_hash);
    let auth = format!("{}/{}", user.name, token);
    tracing::info!("ClientLogin succeeded for user {}", user.name);

    Ok(format!("SID={auth}\nLSID=null\nAuth={auth}\n"))
}

/// Check the `T` action token of a mutation request.
pub fn check_action_token(api: &ReaderApi, session: &Session, presented: &str) -> ApiResult<()> {
    let tokens = api.tokens()?;
    let user = session.user();
    if tokens.verify(&user.name, &user.api_password_hash, presented.trim()) {
        return Ok(());
    }
    tracing::warn!("Invalid POST token for user {}", user.name);
    Err(ApiError::unauthorized("action token mismatch"))
}

/// The action token of the session user, as served by `/token`.
pub fn action_token(api: &ReaderApi, session: &Session) -> ApiResult<String> {
    let user = session.user();
    Ok(api.tokens()?.issue(&user.name, &user.api_password_hash))
}

fn enabled_user(api: &ReaderApi, username: &str) -> ApiResult<UserAccount> {
    match api.users().find(username) {
        Some(user) if user.enabled => Ok(user),
        Some(_) => {
            tracing::warn!("Invalid API user {}: account is disabled", username);
            Err(ApiError::unauthorized("account disabled"))
        }
        None => {
            tracing::warn!("Invalid API user {}: account not found", username);
            Err(ApiError::unauthorized("unknown account"))
        }
    }
}
