//! Return-URL resolution.
//!
//! When the payer's browser comes back from the hosted payment page it lands
//! on one of three return paths, carrying either the session token directly
//! or the order ID it was issued under. This module recovers the token and
//! decides which terminal page the payer is sent to. It is pure state
//! resolution plus a routing decision; the gateway is never consulted.

use std::collections::HashMap;

use crate::session::SessionStore;
use crate::types::OrderId;

/// Which of the three return paths the browser arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnFlow {
    Success,
    Fail,
    Abort,
}

impl ReturnFlow {
    /// The terminal presentation page for this flow.
    pub fn terminal_page(&self) -> &'static str {
        match self {
            Self::Success => "/success.html",
            Self::Fail => "/fail.html",
            Self::Abort => "/abort.html",
        }
    }
}

/// Where to send the payer's browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnDisposition {
    /// The token was recovered; land on the flow's terminal page.
    Terminal { target: String },
    /// No token could be recovered on the success flow; land on the error
    /// page with the received parameters embedded for diagnosis.
    Diagnostic { target: String },
}

impl ReturnDisposition {
    /// The redirect target, regardless of disposition.
    pub fn target(&self) -> &str {
        match self {
            Self::Terminal { target } | Self::Diagnostic { target } => target,
        }
    }
}

/// Resolve a browser return into a redirect decision.
///
/// A token in the query is used directly with no store interaction. An order
/// ID is resolved through the session store, consuming the entry so the same
/// order cannot resolve twice. When neither yields a token, the success flow
/// routes to a diagnostic page enumerating every received parameter, while
/// fail and abort degrade to their terminal page without a token. The payer
/// always lands on some page; resolution never produces an error.
pub fn resolve_return(
    flow: ReturnFlow,
    params: &HashMap<String, String>,
    sessions: &SessionStore,
) -> ReturnDisposition {
    let token = params.get("token").cloned().or_else(|| {
        params.get("orderId").and_then(|order_id| {
            sessions
                .take_by_order_id(&OrderId(order_id.clone()))
                .map(|session| session.token)
        })
    });

    match token {
        Some(token) => ReturnDisposition::Terminal {
            target: format!("{}?token={}", flow.terminal_page(), token),
        },
        None if flow == ReturnFlow::Success => {
            let diagnostic = diagnostic_payload(params);
            tracing::warn!(%diagnostic, "no token resolvable on success return");
            ReturnDisposition::Diagnostic {
                target: format!("/error.html?message={}", urlencoding::encode(&diagnostic)),
            }
        }
        None => ReturnDisposition::Terminal {
            target: flow.terminal_page().to_string(),
        },
    }
}

/// Enumerate every received query parameter, sorted for stable output.
fn diagnostic_payload(params: &HashMap<String, String>) -> String {
    let mut pairs: Vec<_> = params.iter().collect();
    pairs.sort_by_key(|(key, _)| key.as_str());

    let mut payload = String::from("No token available. Available parameters: ");
    for (key, value) in pairs {
        payload.push_str(key);
        payload.push('=');
        payload.push_str(value);
        payload.push_str(", ");
    }
    payload
}
