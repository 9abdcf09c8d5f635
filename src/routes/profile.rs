use axum::{Extension, Json, extract::State};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{OkResponse, UpdateProfileRequest, UserResponse},
    queries::user_queries,
    utils::{extractors::extract_user_id, jwt::Claims},
};

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>> {
    let user_id = extract_user_id(&claims)?;

    let password_hash = match &payload.password {
        Some(password) => {
            if password.len() < 6 {
                return Err(AppError::BadRequest(
                    "Password must be at least 6 characters".to_string(),
                ));
            }
            Some(
                bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| {
                    AppError::InternalError(format!("Password hashing failed: {}", e))
                })?,
            )
        }
        None => None,
    };

    let user = user_queries::update_profile(
        &state.db,
        user_id,
        payload.name.as_deref(),
        password_hash.as_deref(),
        payload.phone.as_deref(),
        payload.address.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}

// Probe endpoints for frontend route guards; the middleware stack does all
// the work.
pub async fn user_auth() -> Json<OkResponse> {
    Json(OkResponse { ok: true })
}

pub async fn admin_auth() -> Json<OkResponse> {
    Json(OkResponse { ok: true })
}
