//! Launch gate
//!
//! Decides once per launch whether the native app or the web content is
//! shown. The decision comes from a single best-effort GET against the
//! configured endpoint:
//!
//! | outcome                                   | decision     |
//! |-------------------------------------------|--------------|
//! | endpoint is not a valid http(s) URL       | `ShowNative` |
//! | transport error (timeout, TLS, DNS, ...)  | `ShowNative` |
//! | 200 with `Content-Length: 0` or no body   | `ShowNative` |
//! | 200 with a body                           | `ShowWeb`    |
//! | 3xx (not followed)                        | `ShowWeb`    |
//! | anything else                             | `ShowNative` |
//!
//! - `transport` - the HTTP seam (reqwest by default)
//! - `resolver` - the `Pending -> Resolved` state machine

pub mod resolver;
pub mod transport;

use std::fmt;

use reqwest::Url;
use serde::{Deserialize, Serialize};

pub use resolver::GateResolver;
pub use transport::{GateTransport, ReqwestTransport};

/// Which experience to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateDecision {
    ShowNative,
    ShowWeb,
}

impl GateDecision {
    /// Decision stored in the `isBlock` cache flag (`true` = native)
    pub fn from_cache(is_block: bool) -> Self {
        if is_block {
            Self::ShowNative
        } else {
            Self::ShowWeb
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Self::ShowNative)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShowNative => "show_native",
            Self::ShowWeb => "show_web",
        }
    }
}

impl fmt::Display for GateDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Gate state for the current launch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Probe not finished; `cached` is the last launch's decision
    Pending { cached: GateDecision },
    /// Terminal for this launch
    Resolved(GateDecision),
}

impl GateState {
    /// Decision to render right now
    pub fn decision(&self) -> GateDecision {
        match self {
            Self::Pending { cached } => *cached,
            Self::Resolved(decision) => *decision,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// What the probe observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    /// Raw `Content-Length` header value, if sent
    pub content_length: Option<String>,
    /// Number of body bytes received
    pub body_len: usize,
}

/// Result of the single probe attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Response(ProbeResponse),
    /// Timeout, TLS, DNS, refused connection or a broken body
    TransportError(String),
    /// The transport finished without producing a response
    NoResponse,
}

/// Map a probe outcome to a decision
pub fn classify(outcome: &ProbeOutcome) -> GateDecision {
    let response = match outcome {
        ProbeOutcome::Response(response) => response,
        ProbeOutcome::TransportError(_) | ProbeOutcome::NoResponse => {
            return GateDecision::ShowNative
        }
    };

    match response.status {
        200 => {
            let zero_length = response.content_length.as_deref().map(str::trim) == Some("0");
            if zero_length || response.body_len == 0 {
                GateDecision::ShowNative
            } else {
                GateDecision::ShowWeb
            }
        }
        300..=399 => GateDecision::ShowWeb,
        _ => GateDecision::ShowNative,
    }
}

/// Parse the endpoint, accepting only absolute http(s) URLs with a host
pub fn parse_endpoint(endpoint: &str) -> Option<Url> {
    let url = Url::parse(endpoint.trim()).ok()?;
    let web_scheme = matches!(url.scheme(), "http" | "https");
    let has_host = url.host_str().map(|h| !h.is_empty()).unwrap_or(false);
    (web_scheme && has_host).then_some(url)
}
