use crate::api::error::AppError;
use crate::models::AdminUser;
use crate::AppState;
use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub secret: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: AdminUser,
}

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Admin created", body = AuthResponse),
        (status = 400, description = "Missing fields or weak password"),
        (status = 403, description = "Invalid signup secret"),
        (status = 409, description = "Admin already exists")
    ),
    tag = "auth"
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    if payload.email.is_empty() || payload.password.is_empty() || payload.secret.is_empty() {
        return Err(AppError::Validation(
            "Email, password, and secret are required".to_string(),
        ));
    }

    if payload.secret != state.config.signup_secret {
        return Err(AppError::Forbidden("Invalid signup secret".to_string()));
    }

    if state.admins.contains(&payload.email) {
        return Err(AppError::Conflict("Admin already exists".to_string()));
    }

    if payload.password.len() < 6 {
        return Err(AppError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    state
        .admins
        .add(&payload.email, &payload.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!("Admin account created for {}", payload.email);

    let token = state.tokens.issue();
    Ok(Json(AuthResponse {
        token,
        user: AdminUser::new(payload.email),
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    // One generic message for unknown email and wrong password alike
    let email = state
        .admins
        .verify(&payload.email, &payload.password)
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    let token = state.tokens.issue();
    Ok(Json(AuthResponse {
        token,
        user: AdminUser::new(email),
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Token revoked (idempotent)")
    ),
    tag = "auth"
)]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    if let Some(token) = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
    {
        state.tokens.revoke(token);
    }

    Json(json!({ "message": "Logout successful" }))
}
