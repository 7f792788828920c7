use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::relay::WireFormat;

/// Headers forwarded with the upstream call. Sorted so the hashed JSON is
/// reproducible.
pub type RelayHeaders = BTreeMap<String, String>;

/// The opaque upstream call carried by a relay.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct RelayPayload {
    pub data: String,
    pub method: String,
    pub path: String,
    pub headers: Option<RelayHeaders>,
}

impl RelayPayload {
    pub fn new(data: &str, method: &str, path: &str, headers: Option<RelayHeaders>) -> Self {
        RelayPayload {
            data: data.to_string(),
            method: method.to_string(),
            path: path.to_string(),
            headers,
        }
    }
}

impl WireFormat for RelayPayload {
    const NAME: &'static str = "relay payload";

    // data, method and path are required but may be empty; decoding already
    // enforces their presence.
    fn is_valid(&self) -> bool {
        true
    }
}
