//! In-memory receipt ledger.
//!
//! Single source of truth for "a payment was captured/settled". Capture
//! calls and webhook notifications both write here; whichever arrives last
//! wins, and applying the same payload twice leaves the ledger unchanged.

use dashmap::DashMap;

use crate::types::{Receipt, TransactionId};

/// Owned map from transaction ID to the last known settlement record.
///
/// Writes are independent per-key upserts with no read-modify-write
/// dependency, so arbitrary interleaving of capture and webhook writers is
/// tolerated. Receipts are never deleted; they live for the process
/// lifetime.
pub struct ReceiptLedger {
    receipts: DashMap<TransactionId, Receipt>,
}

impl ReceiptLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            receipts: DashMap::new(),
        }
    }

    /// Insert or replace the receipt for its transaction. Last write wins.
    pub fn upsert(&self, receipt: Receipt) {
        tracing::debug!(
            transaction_id = %receipt.transaction_id,
            status = %receipt.status,
            "receipt recorded"
        );
        self.receipts.insert(receipt.transaction_id.clone(), receipt);
    }

    /// Look up the receipt for a transaction.
    pub fn get(&self, transaction_id: &TransactionId) -> Option<Receipt> {
        self.receipts.get(transaction_id).map(|r| r.value().clone())
    }

    /// Number of recorded receipts.
    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }
}

impl Default for ReceiptLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TransactionStatus, DEFAULT_METHOD};
    use chrono::Utc;

    fn receipt(id: &str, status: TransactionStatus) -> Receipt {
        Receipt {
            transaction_id: TransactionId(id.to_string()),
            status,
            amount: Some(1000),
            currency: Some("EUR".to_string()),
            method: DEFAULT_METHOD.to_string(),
            date: Utc::now(),
        }
    }

    #[test]
    fn test_upsert_and_get() {
        let ledger = ReceiptLedger::new();
        ledger.upsert(receipt("T1", TransactionStatus::Captured));

        let stored = ledger.get(&TransactionId("T1".into())).unwrap();
        assert_eq!(stored.status, TransactionStatus::Captured);
        assert_eq!(stored.amount, Some(1000));
    }

    #[test]
    fn test_get_missing_is_absent() {
        let ledger = ReceiptLedger::new();
        assert!(ledger.get(&TransactionId("T-missing".into())).is_none());
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let ledger = ReceiptLedger::new();
        let r = receipt("T1", TransactionStatus::Captured);
        ledger.upsert(r.clone());
        ledger.upsert(r.clone());

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get(&r.transaction_id).unwrap(), r);
    }

    #[test]
    fn test_last_write_wins() {
        let ledger = ReceiptLedger::new();
        ledger.upsert(receipt("T1", TransactionStatus::Captured));
        ledger.upsert(receipt("T1", TransactionStatus::Other("REFUNDED".into())));

        let stored = ledger.get(&TransactionId("T1".into())).unwrap();
        assert_eq!(stored.status, TransactionStatus::Other("REFUNDED".into()));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_receipts_are_keyed_independently() {
        let ledger = ReceiptLedger::new();
        ledger.upsert(receipt("T1", TransactionStatus::Captured));
        ledger.upsert(receipt("T2", TransactionStatus::Pending));

        assert_eq!(ledger.len(), 2);
        assert_eq!(
            ledger.get(&TransactionId("T2".into())).unwrap().status,
            TransactionStatus::Pending
        );
    }
}
