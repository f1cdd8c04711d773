//! HTTP Basic authentication and role guards for the versioned API.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use secrecy::SecretString;

use hospital_lib::{Principal, ADMIN_ROLE, USER_ROLE};

use crate::error::{handle_authentication_error, ApiError};
use crate::state::AppState;

/// Username and password carried by an `Authorization: Basic` header.
#[derive(Debug)]
pub struct BasicCredentials {
    pub username: String,
    pub password: SecretString,
}

/// Decodes `Basic base64(username:password)`. The scheme is matched
/// case-insensitively and the password may itself contain colons.
pub fn parse_basic_credentials(auth_header: &str) -> Option<BasicCredentials> {
    let (scheme, encoded) = auth_header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    if username.is_empty() {
        return None;
    }

    Some(BasicCredentials {
        username: username.to_string(),
        password: SecretString::new(password.to_string()),
    })
}

/// Resolves the caller from Basic credentials and stores the [`Principal`]
/// in the request extensions.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let credentials = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(parse_basic_credentials);
    let Some(credentials) = credentials else {
        return ApiError::missing_credentials().into_response();
    };

    match state
        .authenticator
        .authenticate(&credentials.username, &credentials.password)
        .await
    {
        Ok(principal) => {
            tracing::debug!(username = %principal.username, "request authenticated");
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(e) => handle_authentication_error(e, &state.env).into_response(),
    }
}

async fn require_any_role(request: Request<Body>, next: Next, roles: &[&str]) -> Response {
    let decision = request
        .extensions()
        .get::<Principal>()
        .map(|principal| (principal.has_any_role(roles), principal.username.clone()));

    match decision {
        Some((true, _)) => next.run(request).await,
        Some((false, username)) => {
            tracing::warn!(
                username = %username,
                required = ?roles,
                path = %request.uri().path(),
                "access denied"
            );
            ApiError::Forbidden("insufficient role".to_string()).into_response()
        }
        None => ApiError::missing_credentials().into_response(),
    }
}

pub async fn require_user(request: Request<Body>, next: Next) -> Response {
    require_any_role(request, next, &[USER_ROLE, ADMIN_ROLE]).await
}

pub async fn require_admin(request: Request<Body>, next: Next) -> Response {
    require_any_role(request, next, &[ADMIN_ROLE]).await
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    fn header_for(raw: &str) -> String {
        format!("Basic {}", STANDARD.encode(raw))
    }

    #[test]
    fn parses_valid_header() {
        let credentials = parse_basic_credentials(&header_for("admin:1234")).unwrap();
        assert_eq!(credentials.username, "admin");
        assert_eq!(credentials.password.expose_secret(), "1234");
    }

    #[test]
    fn password_may_contain_colons() {
        let credentials = parse_basic_credentials(&header_for("user1:a:b")).unwrap();
        assert_eq!(credentials.password.expose_secret(), "a:b");
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let header = format!("basic {}", STANDARD.encode("user1:1234"));
        assert!(parse_basic_credentials(&header).is_some());
    }

    #[test]
    fn rejects_malformed_headers() {
        assert!(parse_basic_credentials("Bearer abc").is_none());
        assert!(parse_basic_credentials("Basic not-base64!").is_none());
        assert!(parse_basic_credentials(&header_for("no-colon")).is_none());
        assert!(parse_basic_credentials(&header_for(":1234")).is_none());
        assert!(parse_basic_credentials("Basic").is_none());
    }
}
