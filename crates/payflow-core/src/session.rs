//! In-memory store for initiated payment sessions.
//!
//! Single source of truth for "a payment was started". Entries are keyed by
//! order ID and consumed at most once by the return resolver; a session that
//! the payer never returns for stays in memory until the process restarts.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::types::{OrderId, Session};

/// Owned map from order ID to the gateway-issued token for that attempt.
///
/// `take_by_order_id` is the only operation requiring mutual exclusion: the
/// read and the delete happen under one lock so no two callers can both
/// observe the same token. Every other access is an independent per-key
/// write. Absence is a normal outcome here; callers decide how to react.
pub struct SessionStore {
    entries: Mutex<HashMap<OrderId, Session>>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Create or overwrite the session for an order.
    pub fn put(&self, order_id: OrderId, token: String, expiration: Option<String>) {
        let session = Session {
            order_id: order_id.clone(),
            token,
            expiration,
        };
        self.entries.lock().unwrap().insert(order_id, session);
    }

    /// Return the session for an order and remove it, atomically.
    ///
    /// At most one caller ever gets the session; a second call for the same
    /// order returns `None`.
    pub fn take_by_order_id(&self, order_id: &OrderId) -> Option<Session> {
        self.entries.lock().unwrap().remove(order_id)
    }

    /// Whether an unconsumed session exists for the order.
    pub fn contains(&self, order_id: &OrderId) -> bool {
        self.entries.lock().unwrap().contains_key(order_id)
    }

    /// Number of unconsumed sessions.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
