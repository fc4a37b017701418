//! HTTP Settlement Gateway - `SettlementGateway` over the REST API using reqwest.
//!
//! # Configuration
//!
//! ```ignore
//! let gateway = HttpSettlementGateway::new(&ClientConfig::default())?;
//! let status = gateway.fetch_status().await?;
//! ```
//!
//! Error bodies returned by the service carry a `code`; the gateway maps it
//! back to the matching `GatewayError` kind so callers see the same failure
//! the service raised.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::adapters::http::settlement::ErrorResponse;
use crate::config::ClientConfig;
use crate::domain::foundation::ValidationError;
use crate::domain::settlement::{Decision, Settlement};
use crate::ports::{GatewayError, SettlementGateway};

#[derive(Debug, Serialize)]
struct SubmitBody {
    amount: f64,
}

#[derive(Debug, Serialize)]
struct RespondBody<'a> {
    response: Decision,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
}

/// Settlement service client.
pub struct HttpSettlementGateway {
    base_url: String,
    timeout: Duration,
    client: Client,
}

impl HttpSettlementGateway {
    /// Creates a gateway for the service at `config.base_url`.
    pub fn new(config: &ClientConfig) -> Result<Self, GatewayError> {
        let timeout = config.request_timeout();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout,
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    fn map_send_error(&self, e: reqwest::Error) -> GatewayError {
        if e.is_timeout() {
            GatewayError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else if e.is_connect() {
            GatewayError::transport(format!("Connection failed: {}", e))
        } else {
            GatewayError::transport(e.to_string())
        }
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response, GatewayError> {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))
    }

    /// Decodes a success body or turns an error body back into its kind.
    async fn decode<T: DeserializeOwned>(&self, response: Response) -> Result<T, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| GatewayError::UnexpectedResponse {
                    status: status.as_u16(),
                    message: format!("Failed to decode body: {}", e),
                });
        }

        let text = response.text().await.map_err(|e| self.map_send_error(e))?;
        debug!(status = status.as_u16(), body = %text, "settlement service returned error");
        Err(error_from_body(status, &text))
    }
}

fn error_from_body(status: StatusCode, text: &str) -> GatewayError {
    match serde_json::from_str::<ErrorResponse>(text) {
        Ok(body) => match body.error_code() {
            Some(code) => GatewayError::from_service(code, status.as_u16(), body.message),
            None => GatewayError::UnexpectedResponse {
                status: status.as_u16(),
                message: body.message,
            },
        },
        Err(_) => GatewayError::UnexpectedResponse {
            status: status.as_u16(),
            message: text.to_string(),
        },
    }
}

#[async_trait]
impl SettlementGateway for HttpSettlementGateway {
    async fn fetch_status(&self) -> Result<Option<Settlement>, GatewayError> {
        let response = self
            .client
            .get(self.url("status"))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        self.decode(response).await
    }

    async fn submit(&self, amount: f64) -> Result<Settlement, GatewayError> {
        // serde_json writes NaN and infinities as `null`.
        if !amount.is_finite() {
            let err = ValidationError::invalid_format("amount", "must be a finite number");
            return Err(GatewayError::Validation(err.to_string()));
        }
        let response = self.post("submit", &SubmitBody { amount }).await?;
        self.decode(response).await
    }

    async fn respond(
        &self,
        decision: Decision,
        comment: Option<String>,
    ) -> Result<Settlement, GatewayError> {
        let body = RespondBody {
            response: decision,
            comment: comment.as_deref(),
        };
        let response = self.post("respond", &body).await?;
        self.decode(response).await
    }
}
