use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::Result,
    models::{Product, ProductInput, ProductPhoto, ProductQuery, SortBy},
};

// Listings and lookups never select the photo column; the blob only moves
// through find_photo.
const PRODUCT_COLUMNS: &str = "id, name, slug, description, price, category_id, quantity, \
                               shipping, created_at, updated_at";

const DEFAULT_PAGE_SIZE: i64 = 12;
const MAX_PAGE_SIZE: i64 = 60;
const RELATED_LIMIT: i64 = 3;

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {} FROM products WHERE id = $1",
        PRODUCT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {} FROM products WHERE slug = $1",
        PRODUCT_COLUMNS
    ))
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

pub async fn find_photo(pool: &PgPool, id: i32) -> Result<Option<ProductPhoto>> {
    let photo = sqlx::query_as::<_, ProductPhoto>(
        "SELECT photo, photo_content_type FROM products WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(photo)
}

pub async fn search_products(pool: &PgPool, params: ProductQuery) -> Result<Vec<Product>> {
    let mut query: QueryBuilder<Postgres> = QueryBuilder::new(format!(
        "SELECT {} FROM products WHERE 1=1",
        PRODUCT_COLUMNS
    ));

    // keyword search
    if let Some(ref keyword) = params.keyword {
        query.push(" AND (name ILIKE ");
        query.push_bind(format!("%{}%", keyword));
        query.push(" OR description ILIKE ");
        query.push_bind(format!("%{}%", keyword));
        query.push(")");
    }

    // category by slug
    if let Some(ref category) = params.category {
        query.push(" AND category_id IN (SELECT id FROM categories WHERE slug = ");
        query.push_bind(category);
        query.push(")");
    }

    // price range
    if let Some(price_from) = params.price_from {
        query.push(" AND price >= ");
        query.push_bind(price_from);
    }

    if let Some(price_to) = params.price_to {
        query.push(" AND price <= ");
        query.push_bind(price_to);
    }

    // sort
    match params.sort_by {
        Some(SortBy::PriceAsc) => {
            query.push(" ORDER BY price ASC");
        }
        Some(SortBy::PriceDesc) => {
            query.push(" ORDER BY price DESC");
        }
        Some(SortBy::Newest) | None => {
            query.push(" ORDER BY created_at DESC");
        }
    }

    // pagination
    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let page = params.page.unwrap_or(1).max(1);

    query.push(" LIMIT ");
    query.push_bind(limit);
    query.push(" OFFSET ");
    query.push_bind((page - 1) * limit);

    let products = query.build_query_as::<Product>().fetch_all(pool).await?;

    Ok(products)
}

/// Other products sharing the category, newest first.
pub async fn related_products(pool: &PgPool, product_id: i32, category_id: i32) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(&format!(
        "SELECT {} FROM products
         WHERE category_id = $1 AND id != $2
         ORDER BY created_at DESC LIMIT $3",
        PRODUCT_COLUMNS
    ))
    .bind(category_id)
    .bind(product_id)
    .bind(RELATED_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(products)
}

pub async fn create_product(pool: &PgPool, input: &ProductInput, slug: &str) -> Result<Product> {
    let (photo, content_type) = match &input.photo {
        Some(upload) => (Some(upload.bytes.as_slice()), Some(upload.content_type.as_str())),
        None => (None, None),
    };

    let product = sqlx::query_as::<_, Product>(&format!(
        "INSERT INTO products (name, slug, description, price, category_id, quantity, shipping, photo, photo_content_type)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING {}",
        PRODUCT_COLUMNS
    ))
    .bind(&input.name)
    .bind(slug)
    .bind(&input.description)
    .bind(input.price)
    .bind(input.category_id)
    .bind(input.quantity)
    .bind(input.shipping)
    .bind(photo)
    .bind(content_type)
    .fetch_one(pool)
    .await?;

    Ok(product)
}

/// Full-field replace. The photo is only touched when a new one was uploaded.
pub async fn update_product(
    pool: &PgPool,
    id: i32,
    input: &ProductInput,
    slug: &str,
) -> Result<Option<Product>> {
    let product = match &input.photo {
        Some(upload) => {
            sqlx::query_as::<_, Product>(&format!(
                "UPDATE products
                 SET name = $1, slug = $2, description = $3, price = $4, category_id = $5,
                     quantity = $6, shipping = $7, photo = $8, photo_content_type = $9,
                     updated_at = NOW()
                 WHERE id = $10
                 RETURNING {}",
                PRODUCT_COLUMNS
            ))
            .bind(&input.name)
            .bind(slug)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.category_id)
            .bind(input.quantity)
            .bind(input.shipping)
            .bind(upload.bytes.as_slice())
            .bind(&upload.content_type)
            .bind(id)
            .fetch_optional(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Product>(&format!(
                "UPDATE products
                 SET name = $1, slug = $2, description = $3, price = $4, category_id = $5,
                     quantity = $6, shipping = $7, updated_at = NOW()
                 WHERE id = $8
                 RETURNING {}",
                PRODUCT_COLUMNS
            ))
            .bind(&input.name)
            .bind(slug)
            .bind(&input.description)
            .bind(input.price)
            .bind(input.category_id)
            .bind(input.quantity)
            .bind(input.shipping)
            .bind(id)
            .fetch_optional(pool)
            .await?
        }
    };

    Ok(product)
}

pub async fn delete_product(pool: &PgPool, id: i32) -> Result<bool> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
