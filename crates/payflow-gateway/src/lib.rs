pub mod client;
pub mod error;
pub mod traits;
pub mod types;

pub use client::{GatewayConfig, HostedPageClient};
pub use error::GatewayError;
pub use traits::PaymentGateway;
pub use types::{
    AssertOutcome, CaptureResponse, InitializeOutcome, NotificationEvent, ReturnUrls,
    TransactionInfo,
};
