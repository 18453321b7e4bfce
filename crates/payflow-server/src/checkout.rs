//! Payment initiation and capture orchestration.
//!
//! Drives the gateway calls and keeps the local stores in agreement with
//! whatever the gateway reports. Gateway calls never execute while a store
//! lock is held; the stores are only touched after the remote call returns.

use chrono::Utc;

use payflow_core::types::{OrderId, Receipt, TransactionId, TransactionStatus, DEFAULT_METHOD};
use payflow_gateway::types::CaptureResponse;
use payflow_gateway::{GatewayError, ReturnUrls};

use crate::state::AppState;

/// Outcome of a successful initialization.
#[derive(Debug, Clone)]
pub struct InitiatedPayment {
    pub order_id: OrderId,
    pub token: String,
    pub redirect_url: String,
    pub expiration: Option<String>,
}

/// Outcome of a successful capture.
///
/// `transaction_id` and `receipt_url` are absent when the gateway response
/// offered no identifier to anchor local bookkeeping on; the capture itself
/// still succeeded upstream.
#[derive(Debug, Clone)]
pub struct CapturedPayment {
    pub transaction_id: Option<TransactionId>,
    pub receipt_url: Option<String>,
    pub capture: CaptureResponse,
}

/// Start a hosted-page payment: create the gateway session and record it.
pub async fn start_payment(state: &AppState, amount: u64) -> Result<InitiatedPayment, GatewayError> {
    let order_id = OrderId::generate();
    let currency = &state.config.payment.default_currency;
    let return_urls = return_urls(&state.config.payment.public_base_url, &order_id);

    let outcome = state
        .gateway
        .initialize(amount, currency, &order_id, &return_urls)
        .await?;

    state
        .sessions
        .put(order_id.clone(), outcome.token.clone(), outcome.expiration.clone());
    tracing::info!(%order_id, amount, %currency, "payment session initiated");

    Ok(InitiatedPayment {
        order_id,
        token: outcome.token,
        redirect_url: outcome.redirect_url,
        expiration: outcome.expiration,
    })
}

/// Capture an authorized transaction and record the receipt.
pub async fn capture_payment(
    state: &AppState,
    transaction_id: TransactionId,
    amount: u64,
) -> Result<CapturedPayment, GatewayError> {
    let currency = state.config.payment.default_currency.clone();
    let response = state
        .gateway
        .capture(&transaction_id, amount, &currency)
        .await?;

    let Some(resolved) = response.resolved_transaction_id(&transaction_id) else {
        // Settled at the gateway, but nothing to key a receipt on.
        tracing::warn!(requested = %transaction_id, "capture succeeded without a resolvable transaction id");
        return Ok(CapturedPayment {
            transaction_id: None,
            receipt_url: None,
            capture: response,
        });
    };

    let receipt = Receipt {
        transaction_id: resolved.clone(),
        status: response
            .transaction
            .as_ref()
            .and_then(|t| t.status.clone())
            .unwrap_or(TransactionStatus::Captured),
        amount: Some(amount),
        currency: Some(currency),
        method: response.brand_name().unwrap_or(DEFAULT_METHOD).to_string(),
        date: response
            .transaction
            .as_ref()
            .and_then(|t| t.date)
            .unwrap_or_else(Utc::now),
    };
    state.receipts.upsert(receipt);
    tracing::info!(transaction_id = %resolved, amount, "capture recorded");

    Ok(CapturedPayment {
        receipt_url: Some(format!("/receipt.html?transactionId={resolved}")),
        transaction_id: Some(resolved),
        capture: response,
    })
}

/// The three return links the gateway sends the payer's browser back to,
/// each carrying the order ID so the session can be recovered.
fn return_urls(public_base_url: &str, order_id: &OrderId) -> ReturnUrls {
    ReturnUrls {
        success: format!("{public_base_url}/api/payments/return/success?orderId={order_id}"),
        fail: format!("{public_base_url}/api/payments/return/fail?orderId={order_id}"),
        abort: format!("{public_base_url}/api/payments/return/abort?orderId={order_id}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use async_trait::async_trait;
    use payflow_gateway::types::{AssertOutcome, InitializeOutcome};
    use payflow_gateway::PaymentGateway;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Gateway fake returning canned outcomes and counting calls.
    #[derive(Default)]
    struct FakeGateway {
        capture_body: String,
        initialize_calls: AtomicUsize,
    }

    #[async_trait]
    impl PaymentGateway for FakeGateway {
        async fn initialize(
            &self,
            _amount: u64,
            _currency: &str,
            _order_id: &OrderId,
            return_urls: &ReturnUrls,
        ) -> Result<InitializeOutcome, GatewayError> {
            self.initialize_calls.fetch_add(1, Ordering::SeqCst);
            assert!(return_urls.success.contains("orderId=ORDER-"));
            Ok(InitializeOutcome {
                token: "tok-fake".into(),
                expiration: Some("2026-01-01T00:00:00Z".into()),
                redirect_url: "https://pay.example/page".into(),
            })
        }

        async fn assert_session(&self, _token: &str) -> Result<AssertOutcome, GatewayError> {
            unimplemented!("not exercised here")
        }

        async fn capture(
            &self,
            _transaction_id: &TransactionId,
            _amount: u64,
            _currency: &str,
        ) -> Result<CaptureResponse, GatewayError> {
            Ok(serde_json::from_str(&self.capture_body).unwrap())
        }
    }

    fn state_with(gateway: FakeGateway) -> Arc<AppState> {
        AppState::with_gateway(ServerConfig::default(), Arc::new(gateway))
    }

    #[tokio::test]
    async fn test_start_payment_stores_session() {
        let state = state_with(FakeGateway {
            capture_body: "{}".into(),
            ..Default::default()
        });

        let initiated = start_payment(&state, 1000).await.unwrap();
        assert_eq!(initiated.token, "tok-fake");
        assert!(state.sessions.contains(&initiated.order_id));
    }

    #[tokio::test]
    async fn test_capture_resolves_gateway_transaction_id() {
        let state = state_with(FakeGateway {
            capture_body: r#"{"Transaction": {"Id": "T1", "Status": "CAPTURED"},
                              "Capture": {"TransactionId": "T2"}}"#
                .into(),
            ..Default::default()
        });

        let captured = capture_payment(&state, TransactionId("T3".into()), 500)
            .await
            .unwrap();
        assert_eq!(captured.transaction_id, Some(TransactionId("T1".into())));
        assert_eq!(
            captured.receipt_url.as_deref(),
            Some("/receipt.html?transactionId=T1")
        );

        let receipt = state.receipts.get(&TransactionId("T1".into())).unwrap();
        assert_eq!(receipt.status, TransactionStatus::Captured);
        assert_eq!(receipt.amount, Some(500));
        assert_eq!(receipt.currency.as_deref(), Some("EUR"));
    }

    #[tokio::test]
    async fn test_capture_defaults_status_and_method() {
        let state = state_with(FakeGateway {
            capture_body: "{}".into(),
            ..Default::default()
        });

        capture_payment(&state, TransactionId("T9".into()), 250)
            .await
            .unwrap();

        let receipt = state.receipts.get(&TransactionId("T9".into())).unwrap();
        assert_eq!(receipt.status, TransactionStatus::Captured);
        assert_eq!(receipt.method, DEFAULT_METHOD);
    }

    #[tokio::test]
    async fn test_capture_without_any_id_skips_receipt() {
        let state = state_with(FakeGateway {
            capture_body: "{}".into(),
            ..Default::default()
        });

        let captured = capture_payment(&state, TransactionId(String::new()), 250)
            .await
            .unwrap();
        assert!(captured.transaction_id.is_none());
        assert!(captured.receipt_url.is_none());
        assert!(state.receipts.is_empty());
    }

    #[tokio::test]
    async fn test_capture_records_brand_name() {
        let state = state_with(FakeGateway {
            capture_body: r#"{"Transaction": {"Id": "T1"},
                              "PaymentMeans": {"Brand": {"Name": "MASTERCARD"}}}"#
                .into(),
            ..Default::default()
        });

        capture_payment(&state, TransactionId("T1".into()), 100)
            .await
            .unwrap();
        let receipt = state.receipts.get(&TransactionId("T1".into())).unwrap();
        assert_eq!(receipt.method, "MASTERCARD");
    }
}
