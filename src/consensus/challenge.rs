use serde::{Deserialize, Serialize};

use crate::error::RelayError;
use crate::relay::{RelayResponse, WireFormat};

/// The responses that agreed in a disputed round.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct MajorityResponse {
    pub relays: Vec<RelayResponse>,
}

impl MajorityResponse {
    pub fn new(relays: Vec<RelayResponse>) -> Result<Self, RelayError> {
        if relays.is_empty() || !relays.iter().all(|relay| relay.is_valid()) {
            return Err(RelayError::Malformed("majority response"));
        }
        Ok(MajorityResponse { relays })
    }
}

/// A response that disagreed with the majority.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct MinorityResponse {
    pub relay: RelayResponse,
}

impl MinorityResponse {
    pub fn new(relay: RelayResponse) -> Result<Self, RelayError> {
        if !relay.is_valid() {
            return Err(RelayError::Malformed("minority response"));
        }
        Ok(MinorityResponse { relay })
    }
}

/// Dispute submitted to an arbiter node.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChallengeRequest {
    #[serde(rename = "majority_responses")]
    pub majority_response: MajorityResponse,
    pub minority_response: MinorityResponse,
}

impl ChallengeRequest {
    pub fn new(majority_response: MajorityResponse, minority_response: MinorityResponse) -> Self {
        ChallengeRequest {
            majority_response,
            minority_response,
        }
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value, RelayError> {
        serde_json::to_value(self).map_err(|_| RelayError::Malformed("challenge request"))
    }
}

/// The arbiter's reply to a challenge.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChallengeResponse {
    pub response: String,
}

impl ChallengeResponse {
    pub fn new(response: &str) -> Self {
        ChallengeResponse {
            response: response.to_string(),
        }
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, RelayError> {
        serde_json::from_value(value).map_err(|_| RelayError::Malformed("challenge response"))
    }
}
