//! Bearer-token gate for protected routes
//!
//! Missing credentials are Unauthorized; credentials that fail signature or
//! expiry checks are Forbidden. On success the decoded identity is attached
//! to the request for handlers to consume.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};

use super::handlers::ErrorResponse;
use super::routes::AppState;
use crate::auth;

/// Identity decoded from a verified access token
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub email: String,
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let token = extract_bearer(req.headers()).ok_or_else(|| {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "Missing Authorization bearer token".into(),
            }),
        )
    })?;

    let claims = auth::verify_token(&state.jwt_secret, token).map_err(|_| {
        (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse {
                error: "Invalid or expired token".into(),
            }),
        )
    })?;

    req.extensions_mut().insert(AuthedUser {
        email: claims.email,
    });

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let token = headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?
        .trim();

    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
