use sqlx::PgPool;

use crate::{error::Result, models::User};

pub async fn create_user(
    pool: &PgPool,
    name: &str,
    email: &str,
    password_hash: &str,
    phone: &str,
    address: &str,
    answer: &str,
) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (name, email, password, phone, address, answer)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(phone)
    .bind(address)
    .bind(answer)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn find_by_email_and_answer(
    pool: &PgPool,
    email: &str,
    answer: &str,
) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1 AND answer = $2")
        .bind(email)
        .bind(answer)
        .fetch_optional(pool)
        .await?;

    Ok(user)
}

pub async fn update_password(pool: &PgPool, id: i32, password_hash: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "UPDATE users SET password = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
    )
    .bind(password_hash)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Partial profile update; absent fields keep their current value.
pub async fn update_profile(
    pool: &PgPool,
    id: i32,
    name: Option<&str>,
    password_hash: Option<&str>,
    phone: Option<&str>,
    address: Option<&str>,
) -> Result<Option<User>> {
    let mut query_builder = sqlx::QueryBuilder::<sqlx::Postgres>::new("UPDATE users SET ");
    let mut has_fields = false;

    if let Some(name) = name {
        query_builder.push("name = ");
        query_builder.push_bind(name);
        has_fields = true;
    }

    if let Some(password_hash) = password_hash {
        if has_fields {
            query_builder.push(", ");
        }
        query_builder.push("password = ");
        query_builder.push_bind(password_hash);
        has_fields = true;
    }

    if let Some(phone) = phone {
        if has_fields {
            query_builder.push(", ");
        }
        query_builder.push("phone = ");
        query_builder.push_bind(phone);
        has_fields = true;
    }

    if let Some(address) = address {
        if has_fields {
            query_builder.push(", ");
        }
        query_builder.push("address = ");
        query_builder.push_bind(address);
        has_fields = true;
    }

    if !has_fields {
        return find_by_id(pool, id).await;
    }

    query_builder.push(", updated_at = NOW() WHERE id = ");
    query_builder.push_bind(id);
    query_builder.push(" RETURNING *");

    let user = query_builder
        .build_query_as::<User>()
        .fetch_optional(pool)
        .await?;

    Ok(user)
}
