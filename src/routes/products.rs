use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{MessageResponse, PhotoUpload, Product, ProductDetail, ProductInput, ProductQuery},
    queries::{category_queries, product_queries},
    utils::slug::slugify,
};

pub const MAX_PHOTO_BYTES: usize = 1_000_000;

/// Raw multipart fields before validation. All fields arrive as text except
/// the photo part.
#[derive(Debug, Default)]
pub struct ProductForm {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<String>,
    pub shipping: Option<String>,
    pub photo: Option<PhotoUpload>,
}

async fn read_product_form(multipart: &mut Multipart) -> Result<ProductForm> {
    let mut form = ProductForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {}", e)))?
    {
        let field_name = field.name().unwrap_or_default().to_string();

        if field_name == "photo" {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Invalid photo upload: {}", e)))?;

            if bytes.len() > MAX_PHOTO_BYTES {
                return Err(AppError::PayloadTooLarge(
                    "Photo must be smaller than 1MB".to_string(),
                ));
            }

            form.photo = Some(PhotoUpload {
                bytes: bytes.to_vec(),
                content_type,
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {}", e)))?;

        match field_name.as_str() {
            "name" => form.name = Some(value),
            "description" => form.description = Some(value),
            "price" => form.price = Some(value),
            "category" => form.category = Some(value),
            "quantity" => form.quantity = Some(value),
            "shipping" => form.shipping = Some(value),
            _ => {}
        }
    }

    Ok(form)
}

/// Full-field validation: create and update both require every field to be
/// resupplied (the photo stays optional).
pub fn validate_product_form(form: ProductForm) -> Result<ProductInput> {
    let name = form
        .name
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Name is required".to_string()))?;

    let description = form
        .description
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Description is required".to_string()))?;

    let price = form
        .price
        .ok_or_else(|| AppError::BadRequest("Price is required".to_string()))?
        .parse::<rust_decimal::Decimal>()
        .map_err(|_| AppError::BadRequest("Invalid price".to_string()))?;

    if price.is_sign_negative() {
        return Err(AppError::BadRequest("Price cannot be negative".to_string()));
    }

    let category_id = form
        .category
        .ok_or_else(|| AppError::BadRequest("Category is required".to_string()))?
        .parse::<i32>()
        .map_err(|_| AppError::BadRequest("Invalid category id".to_string()))?;

    let quantity = form
        .quantity
        .ok_or_else(|| AppError::BadRequest("Quantity is required".to_string()))?
        .parse::<i32>()
        .map_err(|_| AppError::BadRequest("Invalid quantity".to_string()))?;

    if quantity < 0 {
        return Err(AppError::BadRequest(
            "Quantity cannot be negative".to_string(),
        ));
    }

    let shipping = matches!(form.shipping.as_deref(), Some("true") | Some("1"));

    Ok(ProductInput {
        name: name.trim().to_string(),
        description,
        price,
        category_id,
        quantity,
        shipping,
        photo: form.photo,
    })
}

pub async fn create_product(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Product>)> {
    let form = read_product_form(&mut multipart).await?;
    let input = validate_product_form(form)?;

    category_queries::find_by_id(&state.db, input.category_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    let slug = slugify(&input.name);
    if product_queries::find_by_slug(&state.db, &slug).await?.is_some() {
        return Err(AppError::Conflict("Product already exists".to_string()));
    }

    let product = product_queries::create_product(&state.db, &input, &slug).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    mut multipart: Multipart,
) -> Result<Json<Product>> {
    let form = read_product_form(&mut multipart).await?;
    let input = validate_product_form(form)?;

    category_queries::find_by_id(&state.db, input.category_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    let slug = slugify(&input.name);
    if let Some(existing) = product_queries::find_by_slug(&state.db, &slug).await? {
        if existing.id != id {
            return Err(AppError::Conflict("Product already exists".to_string()));
        }
    }

    let product = product_queries::update_product(&state.db, id, &input, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(product))
}

pub async fn get_products(
    State(state): State<AppState>,
    Query(params): Query<ProductQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = product_queries::search_products(&state.db, params).await?;

    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductDetail>> {
    let product = product_queries::find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let category = category_queries::find_by_id(&state.db, product.category_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

    Ok(Json(ProductDetail { product, category }))
}

pub async fn product_photo(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse> {
    let photo = product_queries::find_photo(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let bytes = photo
        .photo
        .ok_or_else(|| AppError::NotFound("Product has no photo".to_string()))?;

    let content_type = photo
        .photo_content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());

    Ok(([(header::CONTENT_TYPE, content_type)], bytes))
}

pub async fn related_products(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<Product>>> {
    let product = product_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let related = product_queries::related_products(&state.db, product.id, product.category_id).await?;

    Ok(Json(related))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>> {
    let deleted = product_queries::delete_product(&state.db, id).await?;

    if !deleted {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    Ok(Json(MessageResponse {
        message: "Product deleted".to_string(),
    }))
}
