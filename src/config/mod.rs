mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, BraintreeConfig, BraintreeEnvironment, CorsConfig, DatabaseConfig,
    ServerConfig,
};
