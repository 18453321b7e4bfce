/// Gateway client errors.
///
/// `Upstream` and `Malformed` carry the raw response body for diagnostics;
/// the client performs no retries, so retry policy belongs to the caller.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("gateway transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("gateway returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("gateway response unparseable or missing required fields: {body}")]
    Malformed { body: String },
}
