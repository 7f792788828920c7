use std::fmt;

use serde::Deserialize;

use crate::session::Session;

/// Block height in the relay does not match the servicer's session view.
pub const CODE_INVALID_BLOCK_HEIGHT: u32 = 60;
/// The relay was built against a session the servicer considers outdated.
pub const CODE_OUT_OF_SYNC_REQUEST: u32 = 75;
/// The servicer and the client disagree on the current session.
pub const CODE_OUT_OF_SYNC_SESSION: u32 = 14;

/// Codes with which the network signals an outdated session view.
pub const STALE_SESSION_CODES: [u32; 3] = [
    CODE_INVALID_BLOCK_HEIGHT,
    CODE_OUT_OF_SYNC_REQUEST,
    CODE_OUT_OF_SYNC_SESSION,
];

/// An error reported by a service node, or by the transport on its way there.
/// Transport-level failures (timeouts, refused connections) carry no code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcError {
    pub code: Option<u32>,
    pub codespace: String,
    pub message: String,
    /// Session embedded by the servicer in stale-session errors.
    pub session: Option<Session>,
    /// Public key of the node the failing relay was sent to.
    pub node_public_key: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
    #[serde(default)]
    dispatch: Option<DispatchDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: Option<u32>,
    #[serde(default)]
    codespace: String,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct DispatchDetail {
    #[serde(default)]
    session: Option<Session>,
}

impl RpcError {
    pub fn new(code: Option<u32>, message: &str) -> Self {
        RpcError {
            code,
            codespace: String::new(),
            message: message.to_string(),
            session: None,
            node_public_key: None,
        }
    }

    /// Decodes a network error body
    /// (`{"error":{"code","codespace","message"},"dispatch":{"session"}}`),
    /// falling back to an uncoded error carrying the raw body.
    pub fn from_error_body(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(decoded) => RpcError {
                code: decoded.error.code,
                codespace: decoded.error.codespace,
                message: decoded.error.message,
                session: decoded.dispatch.and_then(|dispatch| dispatch.session),
                node_public_key: None,
            },
            Err(_) => RpcError::new(None, &format!("HTTP {}: {}", status, body)),
        }
    }

    pub fn with_node_public_key(mut self, node_public_key: &str) -> Self {
        self.node_public_key = Some(node_public_key.to_string());
        self
    }

    pub fn is_stale_session(&self) -> bool {
        self.code
            .map(|code| STALE_SESSION_CODES.contains(&code))
            .unwrap_or(false)
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "code {}: {}", code, self.message)?,
            None => write!(f, "{}", self.message)?,
        }
        if let Some(node_public_key) = &self.node_public_key {
            write!(f, " (node {})", node_public_key)?;
        }
        Ok(())
    }
}

impl std::error::Error for RpcError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::fixtures::{make_nodes, make_session};

    #[test]
    fn decodes_stale_session_errors_with_hint() {
        let session = make_session("0022", 9, make_nodes(2));
        let body = serde_json::json!({
            "error": { "code": 60, "codespace": "pocketcore", "message": "invalid block height" },
            "dispatch": { "session": session, "block_height": 10 }
        })
        .to_string();

        let error = RpcError::from_error_body(400, &body);
        assert_eq!(error.code, Some(CODE_INVALID_BLOCK_HEIGHT));
        assert_eq!(error.codespace, "pocketcore");
        assert!(error.is_stale_session());
        assert_eq!(error.session, Some(session));
    }

    #[test]
    fn other_codes_are_not_stale() {
        let error = RpcError::from_error_body(400, r#"{"error":{"code":1,"message":"nope"}}"#);
        assert!(!error.is_stale_session());
        assert!(error.session.is_none());

        let raw = RpcError::from_error_body(502, "bad gateway");
        assert_eq!(raw.code, None);
        assert!(!raw.is_stale_session());
        assert_eq!(raw.to_string(), "HTTP 502: bad gateway");
    }

    #[test]
    fn display_names_the_node() {
        let error = RpcError::new(Some(75), "out of sync").with_node_public_key("abcd");
        assert_eq!(error.to_string(), "code 75: out of sync (node abcd)");
        for code in STALE_SESSION_CODES.iter() {
            assert!(RpcError::new(Some(*code), "stale").is_stale_session());
        }
    }
}
