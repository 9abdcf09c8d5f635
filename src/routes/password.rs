use axum::{Json, extract::State};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{ForgotPasswordRequest, MessageResponse},
    queries::user_queries,
};

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>> {
    if payload.email.is_empty() || !payload.email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }

    if payload.answer.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Security answer is required".to_string(),
        ));
    }

    if payload.new_password.len() < 6 {
        return Err(AppError::BadRequest(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    // Generic failure message, same as login: do not reveal which field
    // failed to match.
    let user = user_queries::find_by_email_and_answer(&state.db, &payload.email, &payload.answer)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or answer".to_string()))?;

    let password_hash = bcrypt::hash(&payload.new_password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {}", e)))?;

    user_queries::update_password(&state.db, user.id, &password_hash)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(MessageResponse {
        message: "Password reset successfully".to_string(),
    }))
}
