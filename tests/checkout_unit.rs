use storefront_back::error::AppError;
use storefront_back::models::{CartItem, PaymentRequest};
use storefront_back::routes::checkout::{
    cart_total_cents, format_cents, stock_demand, validate_payment,
};

fn item(price: f64) -> CartItem {
    CartItem {
        product_id: None,
        name: None,
        price,
    }
}

#[test]
fn two_item_cart_totals_to_the_cent() {
    let cart = vec![item(19.99), item(25.50)];
    let cents = cart_total_cents(&cart).expect("total");

    assert_eq!(cents, 4549);
    assert_eq!(format_cents(cents), "45.49");
}

#[test]
fn many_small_prices_carry_no_drift() {
    // 100 * 0.1 is 10.000000000000002 in f64 arithmetic; per-item cent
    // rounding must still land exactly on 10.00.
    let cart: Vec<CartItem> = (0..100).map(|_| item(0.1)).collect();
    assert_eq!(format_cents(cart_total_cents(&cart).unwrap()), "10.00");

    let cart: Vec<CartItem> = (0..10_000).map(|_| item(0.01)).collect();
    assert_eq!(format_cents(cart_total_cents(&cart).unwrap()), "100.00");
}

#[test]
fn sub_cent_prices_round_to_nearest_cent() {
    assert_eq!(cart_total_cents(&[item(19.999)]).unwrap(), 2000);
    assert_eq!(cart_total_cents(&[item(0.004)]).unwrap(), 0);
    assert_eq!(cart_total_cents(&[item(0.005)]).unwrap(), 1);
}

#[test]
fn format_cents_pads_fractions() {
    assert_eq!(format_cents(0), "0.00");
    assert_eq!(format_cents(5), "0.05");
    assert_eq!(format_cents(100), "1.00");
    assert_eq!(format_cents(123456), "1234.56");
}

#[test]
fn missing_nonce_is_a_validation_failure() {
    let payload = PaymentRequest {
        nonce: "  ".to_string(),
        cart: vec![item(10.0)],
    };

    assert!(matches!(
        validate_payment(&payload),
        Err(AppError::BadRequest(_))
    ));
}

#[test]
fn empty_cart_is_a_validation_failure() {
    let payload = PaymentRequest {
        nonce: "nonce-abc".to_string(),
        cart: vec![],
    };

    assert!(matches!(
        validate_payment(&payload),
        Err(AppError::BadRequest(_))
    ));
}

#[test]
fn negative_price_is_unprocessable() {
    let payload = PaymentRequest {
        nonce: "nonce-abc".to_string(),
        cart: vec![item(-5.0)],
    };

    assert!(matches!(
        validate_payment(&payload),
        Err(AppError::UnprocessableEntity(_))
    ));
}

#[test]
fn non_finite_price_is_unprocessable() {
    for price in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let payload = PaymentRequest {
            nonce: "nonce-abc".to_string(),
            cart: vec![item(price)],
        };

        assert!(matches!(
            validate_payment(&payload),
            Err(AppError::UnprocessableEntity(_))
        ));
    }
}

#[test]
fn valid_payload_passes_validation() {
    let payload = PaymentRequest {
        nonce: "nonce-abc".to_string(),
        cart: vec![item(19.99), item(25.50)],
    };

    assert!(validate_payment(&payload).is_ok());
}

#[test]
fn stock_demand_aggregates_identified_items() {
    let cart = vec![
        CartItem {
            product_id: Some(7),
            name: Some("Widget".to_string()),
            price: 5.0,
        },
        CartItem {
            product_id: Some(7),
            name: Some("Widget".to_string()),
            price: 5.0,
        },
        CartItem {
            product_id: Some(9),
            name: None,
            price: 2.5,
        },
        item(1.0),
    ];

    let demand = stock_demand(&cart);

    assert_eq!(demand.len(), 2);
    assert_eq!(demand[&7], 2);
    assert_eq!(demand[&9], 1);
}
