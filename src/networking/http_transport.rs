use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::{event, Level};
use url::Url;

use crate::networking::routes::Route;
use crate::networking::rpc_error::RpcError;
use crate::networking::transport::{RelayTransport, TransportOptions};
use crate::node::Node;
use crate::relay::{RelayRequest, RelayResponse, WireFormat};

#[derive(Deserialize)]
struct RelayReply {
    response: String,
    signature: String,
}

/// JSON-over-HTTP(S) transport to service nodes.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {}

impl HttpTransport {
    pub fn new() -> Self {
        HttpTransport {}
    }

    // routes are appended to whatever path prefix the service url carries
    fn endpoint(node: &Node, route: Route) -> Result<Url, RpcError> {
        let mut url = Url::parse(&node.service_url).map_err(|_| {
            RpcError::new(None, &format!("invalid service url {}", node.service_url))
        })?;
        let path = format!("{}{}", url.path().trim_end_matches('/'), route.path());
        url.set_path(&path);
        Ok(url)
    }

    async fn post(
        &self,
        node: &Node,
        route: Route,
        body: String,
        options: &TransportOptions,
    ) -> Result<String, RpcError> {
        let url = HttpTransport::endpoint(node, route)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(options.timeout_ms))
            .danger_accept_invalid_certs(!options.reject_self_signed)
            .build()
            .map_err(|err| RpcError::new(None, &err.to_string()))?;

        event!(Level::DEBUG, "POST {}", url);
        let response = client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    RpcError::new(None, "request timed out")
                } else {
                    RpcError::new(None, &err.to_string())
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| RpcError::new(None, &err.to_string()))?;
        if !status.is_success() {
            return Err(RpcError::from_error_body(status.as_u16(), &text));
        }
        Ok(text)
    }
}

#[async_trait]
impl RelayTransport for HttpTransport {
    async fn relay(
        &self,
        node: &Node,
        request: &RelayRequest,
        options: &TransportOptions,
    ) -> Result<RelayResponse, RpcError> {
        let body = request
            .to_json()
            .map_err(|err| RpcError::new(None, &err.to_string()))?;
        let text = self.post(node, Route::Relay, body, options).await?;

        let reply: RelayReply = match serde_json::from_str(&text) {
            Ok(reply) => reply,
            Err(_) => return Err(RpcError::from_error_body(200, &text)),
        };
        let response = RelayResponse {
            signature: reply.signature,
            payload: reply.response,
            proof: request.proof.clone(),
        };
        if options.validate_responses && !response.is_valid() {
            return Err(RpcError::new(
                None,
                "service node returned an invalid relay response",
            ));
        }
        Ok(response)
    }

    async fn send(
        &self,
        node: &Node,
        route: Route,
        payload: &serde_json::Value,
        options: &TransportOptions,
    ) -> Result<serde_json::Value, RpcError> {
        let text = self.post(node, route, payload.to_string(), options).await?;
        serde_json::from_str(&text)
            .map_err(|_| RpcError::new(None, &format!("invalid JSON from {}", node.service_url)))
    }
}
