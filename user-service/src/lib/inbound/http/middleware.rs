use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

/// Extension type to store the authenticated caller in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Why a request was stopped before reaching its handler.
///
/// Every token failure (malformed, forged, expired) maps to `InvalidToken`
/// so the client cannot tell them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    MissingToken,
    InvalidToken,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthRejection::MissingToken => (StatusCode::UNAUTHORIZED, "Token required"),
            AuthRejection::InvalidToken => (StatusCode::FORBIDDEN, "Invalid token"),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Middleware that validates bearer tokens and adds the caller to request extensions
pub async fn authenticate<US: UserServicePort>(
    State(state): State<AppState<US>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let token = extract_bearer_token(req.headers())?;

    let claims = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(reason = e.reason(), error = %e, "Token rejected");
        AuthRejection::InvalidToken
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: UserId(claims.user_id),
    });

    Ok(next.run(req).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthRejection> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthRejection::MissingToken)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthRejection::InvalidToken)?;

    let (scheme, token) = auth_str
        .trim()
        .split_once(' ')
        .ok_or(AuthRejection::InvalidToken)?;

    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(AuthRejection::InvalidToken);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthRejection::InvalidToken);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token(&headers_with("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
        assert_eq!(extract_bearer_token(&headers_with("bearer abc")), Ok("abc"));
    }

    #[test]
    fn test_missing_header_is_missing_token() {
        assert_eq!(
            extract_bearer_token(&HeaderMap::new()),
            Err(AuthRejection::MissingToken)
        );
    }

    #[test]
    fn test_bad_header_is_invalid_token() {
        for value in ["Bearer", "Bearer    ", "Basic dXNlcjpwYXNz", "abc.def.ghi"] {
            assert_eq!(
                extract_bearer_token(&headers_with(value)),
                Err(AuthRejection::InvalidToken),
                "{}",
                value
            );
        }
    }

    #[test]
    fn test_rejection_status_codes() {
        assert_eq!(
            AuthRejection::MissingToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthRejection::InvalidToken.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }
}
