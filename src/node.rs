use serde::{Deserialize, Serialize};
use url::Url;

use crate::crypto::is_hex;
use crate::error::RelayError;

pub const SECURE_SCHEME: &str = "https";

/// A service node eligible to serve relays within a session.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub address: String,
    pub public_key: String,
    #[serde(default)]
    pub jailed: bool,
    #[serde(default)]
    pub status: u32,
    #[serde(default)]
    pub tokens: String,
    pub service_url: String,
    #[serde(default)]
    pub chains: Vec<String>,
    #[serde(default)]
    pub unstaking_time: String,
}

impl Node {
    pub fn new(
        address: &str,
        public_key: &str,
        jailed: bool,
        service_url: &str,
        chains: Vec<String>,
    ) -> Result<Node, RelayError> {
        let node = Node {
            address: address.to_string(),
            public_key: public_key.to_string(),
            jailed,
            status: 0,
            tokens: String::new(),
            service_url: service_url.to_string(),
            chains,
            unstaking_time: String::new(),
        };
        if !node.is_valid() {
            return Err(RelayError::Malformed("node"));
        }
        Ok(node)
    }

    pub fn is_valid(&self) -> bool {
        is_hex(&self.address)
            && is_hex(&self.public_key)
            && self
                .parsed_service_url()
                .map(|url| url.scheme() == SECURE_SCHEME)
                .unwrap_or(false)
    }

    pub fn parsed_service_url(&self) -> Result<Url, RelayError> {
        Url::parse(&self.service_url).map_err(|_| RelayError::Malformed("node service url"))
    }

    pub fn supports_chain(&self, chain: &str) -> bool {
        self.chains.iter().any(|c| c == chain)
    }
}
