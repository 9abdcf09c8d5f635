use storefront_back::config::AuthConfig;
use storefront_back::error::AppError;
use storefront_back::utils::jwt;

fn config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "unit-test-secret".to_string(),
        token_ttl_days: 7,
    }
}

#[test]
fn token_round_trips_identity() {
    let auth = config();
    let token = jwt::generate_token(&auth, 42, "j@x.com").expect("generate");

    let claims = jwt::verify_token(&auth, &token).expect("verify");
    assert_eq!(claims.sub, "42");
    assert_eq!(claims.email, "j@x.com");
}

#[test]
fn expired_token_is_rejected_with_distinct_reason() {
    let auth = config();
    let expired = AuthConfig {
        jwt_secret: auth.jwt_secret.clone(),
        token_ttl_days: -1,
    };

    let token = jwt::generate_token(&expired, 42, "j@x.com").expect("generate");
    let err = jwt::verify_token(&auth, &token).expect_err("must be rejected");

    match err {
        AppError::Unauthorized(message) => assert_eq!(message, "Token expired"),
        other => panic!("expected Unauthorized, got {:?}", other),
    }
}

#[test]
fn token_signed_with_another_secret_is_rejected() {
    let auth = config();
    let other = AuthConfig {
        jwt_secret: "some-other-secret".to_string(),
        token_ttl_days: 7,
    };

    let token = jwt::generate_token(&other, 42, "j@x.com").expect("generate");
    let err = jwt::verify_token(&auth, &token).expect_err("must be rejected");

    match err {
        AppError::Unauthorized(message) => assert_eq!(message, "Invalid token"),
        other => panic!("expected Unauthorized, got {:?}", other),
    }
}

#[test]
fn stored_password_is_never_the_plaintext() {
    let hash = bcrypt::hash("abcdef", bcrypt::DEFAULT_COST).expect("hash");

    assert_ne!(hash, "abcdef");
    assert!(bcrypt::verify("abcdef", &hash).expect("verify"));
    assert!(!bcrypt::verify("wrong-password", &hash).expect("verify"));
}
