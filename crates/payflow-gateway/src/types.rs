//! Wire types for the hosted-page gateway's JSON API.
//!
//! The gateway (a Saferpay-compatible JSON API) uses PascalCase field names
//! throughout; everything here is validated once at the parse boundary and
//! handed to callers as typed outcomes rather than optional-field grab-bags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use payflow_core::types::{TransactionId, TransactionStatus};

// --- Request envelope ---

/// Header sent with every gateway request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RequestHeader {
    /// Fixed protocol version the integration targets.
    pub spec_version: String,
    /// Merchant customer identifier.
    pub customer_id: String,
    /// Fresh per-request correlation ID; the gateway uses it to detect
    /// idempotent retries, so it must never be reused across calls.
    pub request_id: String,
    pub retry_indicator: u8,
}

/// Monetary value in minor units plus ISO 4217 code.
///
/// Outbound we always send a number; inbound the gateway has been observed
/// sending both numbers and numeric strings, so deserialization accepts
/// either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireAmount {
    #[serde(deserialize_with = "minor_units")]
    pub value: u64,
    pub currency_code: String,
}

fn minor_units<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// The three merchant URLs the gateway redirects the payer back to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReturnUrls {
    pub success: String,
    pub fail: String,
    pub abort: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InitializeRequest {
    pub request_header: RequestHeader,
    pub terminal_id: String,
    pub payment: PaymentSpec,
    pub return_urls: ReturnUrls,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaymentSpec {
    pub amount: WireAmount,
    pub order_id: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AssertRequest {
    pub request_header: RequestHeader,
    pub token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CaptureRequest {
    pub request_header: RequestHeader,
    pub transaction_reference: TransactionReference,
    pub amount: WireAmount,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionReference {
    pub transaction_id: String,
}

// --- Response shapes ---

/// The gateway's transaction block, shared by assert, capture, and
/// webhook payloads. Every field is optional on the wire; required-field
/// policy is applied per operation at the parse boundary.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct TransactionInfo {
    pub id: Option<String>,
    pub status: Option<TransactionStatus>,
    pub date: Option<DateTime<Utc>>,
    pub amount: Option<WireAmount>,
}

/// Instrument details reported alongside a transaction.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct PaymentMeans {
    pub brand: Option<Brand>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct Brand {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct InitializeResponse {
    pub token: Option<String>,
    pub expiration: Option<String>,
    pub redirect_url: Option<String>,
    pub redirect: Option<RedirectBlock>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct RedirectBlock {
    pub redirect_url: Option<String>,
}

impl InitializeResponse {
    /// The hosted-page URL, accepted in either observed position.
    pub fn resolve_redirect_url(&self) -> Option<&str> {
        self.redirect_url
            .as_deref()
            .or_else(|| self.redirect.as_ref().and_then(|r| r.redirect_url.as_deref()))
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct AssertResponse {
    pub transaction: Option<TransactionInfo>,
    pub payment_means: Option<PaymentMeans>,
}

/// Capture response. The gateway does not reliably echo the transaction
/// block here; an empty object is a valid (if unhelpful) response, and the
/// orchestration layer falls back to the caller-supplied identifier.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct CaptureResponse {
    pub transaction: Option<TransactionInfo>,
    pub capture: Option<CaptureBlock>,
    pub payment_means: Option<PaymentMeans>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct CaptureBlock {
    pub transaction_id: Option<String>,
}

impl CaptureResponse {
    /// Resolve the canonical transaction identifier: the transaction block's
    /// ID if present, else the capture block's, else the caller-supplied
    /// fallback. First non-empty value wins.
    pub fn resolved_transaction_id(&self, fallback: &TransactionId) -> Option<TransactionId> {
        let from_transaction = self
            .transaction
            .as_ref()
            .and_then(|t| t.id.as_deref())
            .filter(|id| !id.is_empty());
        let from_capture = self
            .capture
            .as_ref()
            .and_then(|c| c.transaction_id.as_deref())
            .filter(|id| !id.is_empty());

        from_transaction
            .or(from_capture)
            .map(|id| TransactionId(id.to_string()))
            .or_else(|| (!fallback.is_empty()).then(|| fallback.clone()))
    }

    /// Instrument brand name, when reported.
    pub fn brand_name(&self) -> Option<&str> {
        self.payment_means
            .as_ref()
            .and_then(|pm| pm.brand.as_ref())
            .and_then(|b| b.name.as_deref())
    }
}

/// Asynchronous notification pushed by the gateway, independent of the
/// payer's browser session.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct NotificationEvent {
    pub transaction: Option<TransactionInfo>,
    pub payment_means: Option<PaymentMeans>,
}

impl NotificationEvent {
    /// Instrument brand name, when reported.
    pub fn brand_name(&self) -> Option<&str> {
        self.payment_means
            .as_ref()
            .and_then(|pm| pm.brand.as_ref())
            .and_then(|b| b.name.as_deref())
    }
}

// --- Parsed outcomes ---

/// Successful initialization: a session exists at the gateway and the payer
/// can be sent to the hosted page.
#[derive(Debug, Clone)]
pub struct InitializeOutcome {
    pub token: String,
    pub expiration: Option<String>,
    pub redirect_url: String,
}

/// Successful assert: the gateway reported the session's outcome.
#[derive(Debug, Clone)]
pub struct AssertOutcome {
    pub status: TransactionStatus,
    pub transaction: TransactionInfo,
}
