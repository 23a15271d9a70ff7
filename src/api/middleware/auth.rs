use crate::api::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Gates mutating routes behind a valid bearer token. Any valid token grants
/// the full admin capability; no identity is attached to the request.
pub async fn require_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("No authorization token provided".to_string()))?;

    if !state.tokens.verify(token) {
        return Err(AppError::Unauthorized(
            "Invalid or expired token".to_string(),
        ));
    }

    Ok(next.run(req).await)
}
