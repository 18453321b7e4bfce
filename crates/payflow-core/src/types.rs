use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Merchant-side identifier for one payment attempt.
///
/// Generated once at initialization and stable for the attempt's lifetime;
/// the gateway echoes it back on the browser return so the session can be
/// recovered without trusting the payer-supplied token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub String);

impl OrderId {
    /// Generate a fresh order ID (UUID v7 — time-ordered).
    pub fn generate() -> Self {
        Self(format!("ORDER-{}", Uuid::now_v7()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Gateway-assigned transaction identifier; the receipt ledger key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub String);

impl TransactionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transaction status codes reported by the gateway.
///
/// The gateway reports upper-case code strings; codes outside the known set
/// are preserved verbatim in `Other` rather than rejected, since the ledger
/// must record whatever the gateway last said (refunds, chargebacks, etc.).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionStatus {
    Authorized,
    Pending,
    Captured,
    Canceled,
    Other(String),
}

impl TransactionStatus {
    /// The gateway's wire code for this status.
    pub fn code(&self) -> &str {
        match self {
            Self::Authorized => "AUTHORIZED",
            Self::Pending => "PENDING",
            Self::Captured => "CAPTURED",
            Self::Canceled => "CANCELED",
            Self::Other(code) => code,
        }
    }

    /// Parse a wire code, falling back to `Other` for unknown codes.
    pub fn from_code(code: &str) -> Self {
        match code {
            "AUTHORIZED" => Self::Authorized,
            "PENDING" => Self::Pending,
            "CAPTURED" => Self::Captured,
            "CANCELED" => Self::Canceled,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for TransactionStatus {
    fn from(code: String) -> Self {
        Self::from_code(&code)
    }
}

impl From<TransactionStatus> for String {
    fn from(status: TransactionStatus) -> Self {
        status.code().to_string()
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// An initiated-but-not-yet-settled payment attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The order this attempt belongs to.
    pub order_id: OrderId,
    /// Opaque gateway-issued handle for querying the session outcome.
    pub token: String,
    /// Advisory expiry echoed from the gateway; kept opaque, not enforced.
    pub expiration: Option<String>,
}

/// The locally persisted record of a transaction's last known outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Gateway-assigned transaction identifier.
    pub transaction_id: TransactionId,
    /// Last status reported by the gateway.
    pub status: TransactionStatus,
    /// Settled value in minor units, when the writer knew it.
    pub amount: Option<u64>,
    /// ISO 4217 currency code, when the writer knew it.
    pub currency: Option<String>,
    /// Payment instrument brand, best-effort.
    pub method: String,
    /// Settlement timestamp; time of write when the gateway omitted one.
    pub date: DateTime<Utc>,
}

/// Default label for the payment instrument when the gateway does not
/// report a brand.
pub const DEFAULT_METHOD: &str = "Card";
