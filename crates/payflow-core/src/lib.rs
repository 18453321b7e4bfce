pub mod ledger;
pub mod resolver;
pub mod session;
pub mod types;

pub use ledger::ReceiptLedger;
pub use resolver::{ReturnDisposition, ReturnFlow};
pub use session::SessionStore;
pub use types::{OrderId, Receipt, Session, TransactionId, TransactionStatus};
