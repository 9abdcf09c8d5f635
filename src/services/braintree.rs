use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;

use crate::{
    config::{BraintreeConfig, BraintreeEnvironment},
    error::{AppError, Result},
};

const SANDBOX_URL: &str = "https://payments.sandbox.braintree-api.com/graphql";
const PRODUCTION_URL: &str = "https://payments.braintree-api.com/graphql";
const BRAINTREE_VERSION: &str = "2019-01-01";

// Transaction statuses the gateway reports for a charge that did not
// actually capture money.
const DECLINED_STATUSES: [&str; 4] = [
    "PROCESSOR_DECLINED",
    "GATEWAY_REJECTED",
    "SETTLEMENT_DECLINED",
    "FAILED",
];

/// Payment gateway seam. Constructed once at startup and injected through
/// AppState so tests can substitute a fake without touching the network.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Token the client-side payment SDK needs to tokenize a payment method.
    async fn client_token(&self) -> Result<String>;

    /// Redeems a nonce for a single charge of `amount` (two-decimal string).
    async fn sale(&self, amount: &str, nonce: &str) -> Result<PaymentReceipt>;
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    pub transaction_id: String,
    pub status: String,
    /// Full gateway response, persisted opaquely on the order.
    pub raw: serde_json::Value,
}

pub struct BraintreeGateway {
    config: BraintreeConfig,
    client: reqwest::Client,
}

impl BraintreeGateway {
    pub fn new(config: BraintreeConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self) -> &'static str {
        match self.config.environment {
            BraintreeEnvironment::Sandbox => SANDBOX_URL,
            BraintreeEnvironment::Production => PRODUCTION_URL,
        }
    }

    async fn graphql(&self, query: &str, variables: serde_json::Value) -> Result<serde_json::Value> {
        let response = self
            .client
            .post(self.endpoint())
            .basic_auth(&self.config.public_key, Some(&self.config.private_key))
            .header("Braintree-Version", BRAINTREE_VERSION)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| AppError::PaymentFailed(format!("Payment gateway unreachable: {}", e)))?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::PaymentFailed(format!("Invalid gateway response: {}", e)))?;

        if let Some(errors) = body.get("errors").and_then(|v| v.as_array()) {
            if let Some(first) = errors.first() {
                let message = first
                    .get("message")
                    .and_then(|v| v.as_str())
                    .unwrap_or("Unknown gateway error");
                tracing::warn!("Braintree error response: {}", message);
                return Err(AppError::PaymentFailed(format!(
                    "Payment gateway rejected the request: {}",
                    message
                )));
            }
        }

        Ok(body)
    }
}

#[async_trait]
impl PaymentGateway for BraintreeGateway {
    async fn client_token(&self) -> Result<String> {
        const QUERY: &str =
            "mutation CreateClientToken($input: CreateClientTokenInput) { \
               createClientToken(input: $input) { clientToken } }";

        let variables = json!({
            "input": { "clientToken": { "merchantAccountId": self.config.merchant_id } }
        });

        let body = self.graphql(QUERY, variables).await?;

        body.pointer("/data/createClientToken/clientToken")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                AppError::PaymentFailed("Gateway response missing client token".to_string())
            })
    }

    async fn sale(&self, amount: &str, nonce: &str) -> Result<PaymentReceipt> {
        const QUERY: &str =
            "mutation ChargePaymentMethod($input: ChargePaymentMethodInput!) { \
               chargePaymentMethod(input: $input) { transaction { id status } } }";

        let variables = json!({
            "input": {
                "paymentMethodId": nonce,
                "transaction": { "amount": amount }
            }
        });

        let body = self.graphql(QUERY, variables).await?;

        let transaction = body
            .pointer("/data/chargePaymentMethod/transaction")
            .ok_or_else(|| {
                AppError::PaymentFailed("Gateway response missing transaction".to_string())
            })?;

        let transaction_id = transaction
            .get("id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| {
                AppError::PaymentFailed("Gateway response missing transaction id".to_string())
            })?
            .to_string();

        let status = transaction
            .get("status")
            .and_then(|v| v.as_str())
            .unwrap_or("UNKNOWN")
            .to_string();

        if DECLINED_STATUSES.contains(&status.as_str()) {
            return Err(AppError::PaymentFailed(format!(
                "Payment declined: {}",
                status
            )));
        }

        Ok(PaymentReceipt {
            transaction_id,
            status,
            raw: body,
        })
    }
}
