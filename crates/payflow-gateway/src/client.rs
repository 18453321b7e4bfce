//! HTTP implementation of the gateway client.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use payflow_core::types::{OrderId, TransactionId};

use crate::error::GatewayError;
use crate::traits::PaymentGateway;
use crate::types::{
    AssertOutcome, AssertRequest, AssertResponse, CaptureRequest, CaptureResponse,
    InitializeOutcome, InitializeRequest, InitializeResponse, PaymentSpec, RequestHeader,
    ReturnUrls, TransactionReference, WireAmount,
};

/// Protocol version this integration targets.
pub const SPEC_VERSION: &str = "1.31";

const INITIALIZE_PATH: &str = "/Payment/v1/PaymentPage/Initialize";
const ASSERT_PATH: &str = "/Payment/v1/PaymentPage/Assert";
const CAPTURE_PATH: &str = "/Payment/v1/Transaction/Capture";

/// Connection settings for the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the gateway API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Merchant customer identifier.
    #[serde(default)]
    pub customer_id: String,
    /// Merchant terminal identifier.
    #[serde(default)]
    pub terminal_id: String,
    /// API username for basic authentication.
    #[serde(default)]
    pub username: String,
    /// API password for basic authentication.
    #[serde(default)]
    pub password: String,
}

fn default_base_url() -> String {
    "https://test.saferpay.com/api".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            customer_id: String::new(),
            terminal_id: String::new(),
            username: String::new(),
            password: String::new(),
        }
    }
}

/// Client for the hosted-page gateway's JSON API.
///
/// Each call carries a fixed protocol version and a fresh correlation ID,
/// authenticates with the configured credential pair, and maps failures to
/// the tagged [`GatewayError`] variants. No retries happen here.
pub struct HostedPageClient {
    config: GatewayConfig,
    http: reqwest::Client,
}

impl HostedPageClient {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn request_header(&self) -> RequestHeader {
        RequestHeader {
            spec_version: SPEC_VERSION.to_string(),
            customer_id: self.config.customer_id.clone(),
            request_id: Uuid::now_v7().to_string(),
            retry_indicator: 0,
        }
    }

    /// POST a JSON body and return the raw response body of a 2xx reply.
    async fn post(&self, path: &str, body: &impl Serialize) -> Result<String, GatewayError> {
        let url = format!("{}{}", self.config.base_url, path);
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            tracing::error!(%url, status = status.as_u16(), body = %text, "gateway rejected request");
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }

    fn parse<T: DeserializeOwned>(body: &str) -> Result<T, GatewayError> {
        serde_json::from_str(body).map_err(|_| GatewayError::Malformed {
            body: body.to_string(),
        })
    }
}

#[async_trait]
impl PaymentGateway for HostedPageClient {
    async fn initialize(
        &self,
        amount: u64,
        currency: &str,
        order_id: &OrderId,
        return_urls: &ReturnUrls,
    ) -> Result<InitializeOutcome, GatewayError> {
        let request = InitializeRequest {
            request_header: self.request_header(),
            terminal_id: self.config.terminal_id.clone(),
            payment: PaymentSpec {
                amount: WireAmount {
                    value: amount,
                    currency_code: currency.to_string(),
                },
                order_id: order_id.to_string(),
                description: format!("{currency} Payment"),
            },
            return_urls: return_urls.clone(),
        };

        let body = self.post(INITIALIZE_PATH, &request).await?;
        let response: InitializeResponse = Self::parse(&body)?;

        let token = response.token.clone().filter(|t| !t.is_empty());
        let redirect_url = response.resolve_redirect_url().map(str::to_string);
        match (token, redirect_url) {
            (Some(token), Some(redirect_url)) => {
                tracing::debug!(%order_id, "payment page session initialized");
                Ok(InitializeOutcome {
                    token,
                    expiration: response.expiration,
                    redirect_url,
                })
            }
            _ => Err(GatewayError::Malformed { body }),
        }
    }

    async fn assert_session(&self, token: &str) -> Result<AssertOutcome, GatewayError> {
        let request = AssertRequest {
            request_header: self.request_header(),
            token: token.to_string(),
        };

        let body = self.post(ASSERT_PATH, &request).await?;
        let response: AssertResponse = Self::parse(&body)?;

        // The transaction block and its status are the entire point of the
        // operation; a 2xx without them is not a success.
        let transaction = response
            .transaction
            .ok_or_else(|| GatewayError::Malformed { body: body.clone() })?;
        let status = transaction
            .status
            .clone()
            .ok_or(GatewayError::Malformed { body })?;

        tracing::debug!(%status, "session outcome asserted");
        Ok(AssertOutcome {
            status,
            transaction,
        })
    }

    async fn capture(
        &self,
        transaction_id: &TransactionId,
        amount: u64,
        currency: &str,
    ) -> Result<CaptureResponse, GatewayError> {
        let request = CaptureRequest {
            request_header: self.request_header(),
            transaction_reference: TransactionReference {
                transaction_id: transaction_id.to_string(),
            },
            amount: WireAmount {
                value: amount,
                currency_code: currency.to_string(),
            },
        };

        let body = self.post(CAPTURE_PATH, &request).await?;
        // The gateway does not reliably echo a transaction block on capture;
        // any well-formed JSON object is accepted and the orchestration
        // layer resolves the identifier.
        Self::parse(&body)
    }
}
