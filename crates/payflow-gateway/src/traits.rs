use async_trait::async_trait;

use payflow_core::types::{OrderId, TransactionId};

use crate::error::GatewayError;
use crate::types::{AssertOutcome, CaptureResponse, InitializeOutcome, ReturnUrls};

/// Payment gateway interface.
///
/// The seam between orchestration and the external service: production code
/// talks to the hosted-page HTTP API, tests inject fakes.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a hosted-page payment session for the given amount.
    async fn initialize(
        &self,
        amount: u64,
        currency: &str,
        order_id: &OrderId,
        return_urls: &ReturnUrls,
    ) -> Result<InitializeOutcome, GatewayError>;

    /// Query the authorization outcome of a completed hosted-page flow.
    async fn assert_session(&self, token: &str) -> Result<AssertOutcome, GatewayError>;

    /// Finalize settlement of an authorized transaction.
    async fn capture(
        &self,
        transaction_id: &TransactionId,
        amount: u64,
        currency: &str,
    ) -> Result<CaptureResponse, GatewayError>;
}
