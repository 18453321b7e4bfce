//! Webhook reconciliation.
//!
//! The gateway pushes transaction events independently of the payer's
//! browser and of any capture call; whichever writer lands last owns the
//! receipt. The boundary contract with the gateway is "received", not
//! "processed": unusable bodies are logged and dropped, never surfaced.

use chrono::Utc;

use payflow_core::types::{Receipt, TransactionId, DEFAULT_METHOD};
use payflow_core::ReceiptLedger;
use payflow_gateway::NotificationEvent;

/// Apply a notification to the ledger.
///
/// Returns the transaction ID that was upserted, or `None` when the event
/// carried no usable transaction. A receipt needs at least an identifier
/// and a status; anything less is recorded nowhere.
pub fn reconcile(receipts: &ReceiptLedger, event: &NotificationEvent) -> Option<TransactionId> {
    let Some(transaction) = event.transaction.as_ref() else {
        tracing::warn!("notification without transaction block, ignoring");
        return None;
    };
    let Some(id) = transaction.id.as_deref().filter(|id| !id.is_empty()) else {
        tracing::warn!("notification without transaction id, ignoring");
        return None;
    };
    let Some(status) = transaction.status.clone() else {
        tracing::warn!(transaction_id = %id, "notification without status, ignoring");
        return None;
    };

    let transaction_id = TransactionId(id.to_string());
    let receipt = Receipt {
        transaction_id: transaction_id.clone(),
        status,
        amount: transaction.amount.as_ref().map(|a| a.value),
        currency: transaction.amount.as_ref().map(|a| a.currency_code.clone()),
        method: event.brand_name().unwrap_or(DEFAULT_METHOD).to_string(),
        date: transaction.date.unwrap_or_else(Utc::now),
    };
    receipts.upsert(receipt);
    tracing::info!(%transaction_id, "notification reconciled");
    Some(transaction_id)
}
