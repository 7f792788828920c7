use async_trait::async_trait;

use crate::configuration::Configuration;
use crate::networking::routes::Route;
use crate::networking::rpc_error::RpcError;
use crate::node::Node;
use crate::relay::{RelayRequest, RelayResponse};

/// Per-call transport settings, taken from the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportOptions {
    pub validate_responses: bool,
    pub timeout_ms: u64,
    pub reject_self_signed: bool,
}

impl From<&Configuration> for TransportOptions {
    fn from(configuration: &Configuration) -> Self {
        TransportOptions {
            validate_responses: configuration.validate_relay_responses,
            timeout_ms: configuration.request_timeout,
            reject_self_signed: configuration.reject_self_signed_certificates,
        }
    }
}

///
/// Delivers requests to a service node. Implementations do not retry; a
/// timeout surfaces as an `RpcError` without a code.
///
#[async_trait]
pub trait RelayTransport: Send + Sync {
    async fn relay(
        &self,
        node: &Node,
        request: &RelayRequest,
        options: &TransportOptions,
    ) -> Result<RelayResponse, RpcError>;

    async fn send(
        &self,
        node: &Node,
        route: Route,
        payload: &serde_json::Value,
        options: &TransportOptions,
    ) -> Result<serde_json::Value, RpcError>;
}
