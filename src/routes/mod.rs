pub mod categories;
pub mod checkout;
pub mod health;
pub mod login;
pub mod orders;
pub mod password;
pub mod products;
pub mod profile;
pub mod register;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::{
    AppState,
    middleware::{admin_middleware, auth_middleware},
};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .nest("/auth", auth_routes(&state))
        .nest("/category", category_routes(&state))
        .nest("/product", product_routes(&state))
        .with_state(state)
}

fn auth_routes(state: &AppState) -> Router<AppState> {
    let authed = Router::new()
        .route("/profile", put(profile::update_profile))
        .route("/user-auth", get(profile::user_auth))
        .route("/orders", get(orders::get_orders))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // admin_middleware is layered inside auth_middleware: the signature check
    // always runs before the role check.
    let admin = Router::new()
        .route("/admin-auth", get(profile::admin_auth))
        .route("/all-orders", get(orders::get_all_orders))
        .route("/order-status/{order_id}", put(orders::update_order_status))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/register", post(register::register_user))
        .route("/login", post(login::login_user))
        .route("/forgot-password", post(password::forgot_password))
        .merge(authed)
        .merge(admin)
}

fn category_routes(state: &AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/create-category", post(categories::create_category))
        .route("/update-category/{id}", put(categories::update_category))
        .route("/delete-category/{id}", delete(categories::delete_category))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/get-category", get(categories::get_all_categories))
        .route("/single-category/{slug}", get(categories::get_category))
        .merge(admin)
}

fn product_routes(state: &AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/create-product", post(products::create_product))
        .route("/update-product/{id}", put(products::update_product))
        .route("/delete-product/{id}", delete(products::delete_product))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let authed = Router::new()
        .route("/braintree/payment", post(checkout::braintree_payment))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/get-product", get(products::get_products))
        .route("/get-product/{slug}", get(products::get_product))
        .route("/product-photo/{id}", get(products::product_photo))
        .route("/related-product/{id}", get(products::related_products))
        .route("/braintree/token", get(checkout::braintree_token))
        .merge(authed)
        .merge(admin)
}
