//! Shared service state, accessible from HTTP handlers.

use std::sync::Arc;

use payflow_core::{ReceiptLedger, SessionStore};
use payflow_gateway::{HostedPageClient, PaymentGateway};

use crate::config::ServerConfig;

/// Everything a request handler needs: the two stores and the gateway.
///
/// Stores are owned here and handed to components by reference; nothing in
/// the service reaches for ambient globals.
pub struct AppState {
    pub config: ServerConfig,
    pub sessions: SessionStore,
    pub receipts: ReceiptLedger,
    pub gateway: Arc<dyn PaymentGateway>,
}

impl AppState {
    /// Build state with the HTTP gateway client from config.
    pub fn new(config: ServerConfig) -> Arc<Self> {
        let gateway = Arc::new(HostedPageClient::new(config.gateway.clone()));
        Self::with_gateway(config, gateway)
    }

    /// Build state with an injected gateway implementation.
    pub fn with_gateway(config: ServerConfig, gateway: Arc<dyn PaymentGateway>) -> Arc<Self> {
        Arc::new(Self {
            config,
            sessions: SessionStore::new(),
            receipts: ReceiptLedger::new(),
            gateway,
        })
    }
}
