use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{Category, CategoryRequest, MessageResponse},
    queries::category_queries,
    utils::slug::slugify,
};

fn validated_slug(name: &str) -> Result<String> {
    if name.trim().is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }

    let slug = slugify(name);
    if slug.is_empty() {
        return Err(AppError::BadRequest(
            "Name must contain at least one letter or digit".to_string(),
        ));
    }

    Ok(slug)
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<Category>)> {
    let slug = validated_slug(&payload.name)?;

    // Repeating an identical create returns the conflict, never a second row.
    if category_queries::find_by_slug(&state.db, &slug)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Category already exists".to_string()));
    }

    let category = category_queries::create_category(&state.db, payload.name.trim(), &slug).await?;

    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<CategoryRequest>,
) -> Result<Json<Category>> {
    let slug = validated_slug(&payload.name)?;

    if let Some(existing) = category_queries::find_by_slug(&state.db, &slug).await? {
        if existing.id != id {
            return Err(AppError::Conflict("Category already exists".to_string()));
        }
    }

    let category = category_queries::update_category(&state.db, id, payload.name.trim(), &slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    Ok(Json(category))
}

pub async fn get_all_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = category_queries::get_all(&state.db).await?;

    Ok(Json(categories))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Category>> {
    let category = category_queries::find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    Ok(Json(category))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>> {
    let deleted = category_queries::delete_category(&state.db, id).await?;

    if !deleted {
        return Err(AppError::NotFound("Category not found".to_string()));
    }

    Ok(Json(MessageResponse {
        message: "Category deleted".to_string(),
    }))
}
