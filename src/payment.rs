use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Convert a major-unit amount (e.g. 250.00 INR) to gateway minor units (paise).
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    (amount * Decimal::from(100)).round().to_i64()
}

#[derive(Debug, Serialize)]
pub struct OrderRequest {
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
}

/// Gateway-side order object representing a pending payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub receipt: Option<String>,
    pub status: String,
}

/// Thin client for the Razorpay orders API. Credentials are sent via basic
/// auth; errors come back as `AppError::PaymentGateway` wrapping the
/// gateway's response text. No retries.
#[derive(Clone)]
pub struct PaymentClient {
    http: reqwest::Client,
    key_id: String,
    key_secret: String,
    base_url: String,
}

impl PaymentClient {
    pub fn new(
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            key_id: key_id.into(),
            key_secret: key_secret.into(),
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.razorpay_key_id.clone(),
            config.razorpay_key_secret.clone(),
            config.razorpay_base_url.clone(),
        )
    }

    pub async fn create_order(&self, order: &OrderRequest) -> AppResult<PaymentOrder> {
        let url = format!("{}/orders", self.base_url);

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(order)
            .send()
            .await
            .map_err(|e| AppError::PaymentGateway(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "Payment gateway rejected order creation");
            return Err(AppError::PaymentGateway(body));
        }

        response
            .json::<PaymentOrder>()
            .await
            .map_err(|e| AppError::PaymentGateway(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn minor_units_scales_by_hundred() {
        assert_eq!(to_minor_units(Decimal::new(25000, 2)), Some(25000)); // 250.00
        assert_eq!(to_minor_units(Decimal::from(400)), Some(40000));
    }

    #[test]
    fn minor_units_rounds_fractional_paise() {
        // 99.999 -> 10000, 99.994 -> 9999
        assert_eq!(to_minor_units(Decimal::new(99999, 3)), Some(10000));
        assert_eq!(to_minor_units(Decimal::new(99994, 3)), Some(9999));
    }

    #[tokio::test]
    async fn create_order_posts_exact_minor_amount() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/orders"))
            .and(body_json(json!({
                "amount": 50000,
                "currency": "INR",
                "receipt": "receipt_abc",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "order_test123",
                "amount": 50000,
                "currency": "INR",
                "receipt": "receipt_abc",
                "status": "created",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = PaymentClient::new("key", "secret", server.uri());
        let order = client
            .create_order(&OrderRequest {
                amount: 50000,
                currency: "INR".to_string(),
                receipt: "receipt_abc".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(order.id, "order_test123");
        assert_eq!(order.amount, 50000);
        assert_eq!(order.status, "created");
    }

    #[tokio::test]
    async fn gateway_failure_surfaces_error_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/orders"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(json!({ "error": { "description": "Invalid key" } })),
            )
            .mount(&server)
            .await;

        let client = PaymentClient::new("bad", "creds", server.uri());
        let err = client
            .create_order(&OrderRequest {
                amount: 100,
                currency: "INR".to_string(),
                receipt: "receipt_x".to_string(),
            })
            .await
            .unwrap_err();

        match err {
            AppError::PaymentGateway(msg) => assert!(msg.contains("Invalid key")),
            other => panic!("expected PaymentGateway error, got {other:?}"),
        }
    }
}
