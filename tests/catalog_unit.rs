use storefront_back::error::AppError;
use storefront_back::models::OrderStatus;
use storefront_back::routes::products::{ProductForm, validate_product_form};
use storefront_back::utils::slug::slugify;

fn full_form() -> ProductForm {
    ProductForm {
        name: Some("Espresso Machine".to_string()),
        description: Some("Two-group lever machine".to_string()),
        price: Some("1299.99".to_string()),
        category: Some("3".to_string()),
        quantity: Some("4".to_string()),
        shipping: Some("true".to_string()),
        photo: None,
    }
}

#[test]
fn slugify_lowercases_and_hyphenates() {
    assert_eq!(slugify("Home Appliances"), "home-appliances");
    assert_eq!(slugify("Rust 101"), "rust-101");
    assert_eq!(slugify("  Laptops & Tablets  "), "laptops-tablets");
}

#[test]
fn slugify_collapses_separator_runs() {
    assert_eq!(slugify("a--b"), "a-b");
    assert_eq!(slugify("--edge--"), "edge");
    assert_eq!(slugify("!!!"), "");
}

#[test]
fn order_status_round_trips_every_label() {
    for status in OrderStatus::ALL {
        let parsed: OrderStatus = status.as_str().parse().expect("parse");
        assert_eq!(parsed, status);
    }
}

#[test]
fn order_status_rejects_unknown_labels() {
    assert!("INVALID_STATUS".parse::<OrderStatus>().is_err());
    assert!("not processed".parse::<OrderStatus>().is_err());
    assert!("".parse::<OrderStatus>().is_err());
}

#[test]
fn order_status_serializes_with_spaces() {
    let value = serde_json::to_value(OrderStatus::NotProcessed).expect("serialize");
    assert_eq!(value, serde_json::json!("Not Processed"));

    let value = serde_json::to_value(OrderStatus::Shipped).expect("serialize");
    assert_eq!(value, serde_json::json!("Shipped"));
}

#[test]
fn product_form_requires_every_field() {
    for strip in ["name", "description", "price", "category", "quantity"] {
        let mut form = full_form();
        match strip {
            "name" => form.name = None,
            "description" => form.description = None,
            "price" => form.price = None,
            "category" => form.category = None,
            _ => form.quantity = None,
        }

        assert!(
            matches!(validate_product_form(form), Err(AppError::BadRequest(_))),
            "missing {} should be rejected",
            strip
        );
    }
}

#[test]
fn product_form_rejects_negative_price_and_quantity() {
    let mut form = full_form();
    form.price = Some("-1.00".to_string());
    assert!(matches!(
        validate_product_form(form),
        Err(AppError::BadRequest(_))
    ));

    let mut form = full_form();
    form.quantity = Some("-2".to_string());
    assert!(matches!(
        validate_product_form(form),
        Err(AppError::BadRequest(_))
    ));
}

#[test]
fn product_form_accepts_complete_input() {
    let input = validate_product_form(full_form()).expect("valid form");

    assert_eq!(input.name, "Espresso Machine");
    assert_eq!(input.category_id, 3);
    assert_eq!(input.quantity, 4);
    assert!(input.shipping);
    assert_eq!(input.price.to_string(), "1299.99");
}

#[test]
fn product_form_defaults_shipping_off() {
    let mut form = full_form();
    form.shipping = None;

    let input = validate_product_form(form).expect("valid form");
    assert!(!input.shipping);
}
