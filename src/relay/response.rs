use serde::{Deserialize, Serialize};

use crate::error::RelayError;
use crate::relay::proof::RelayProof;
use crate::relay::WireFormat;

/// A service node's signed reply, paired with the proof it answered.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RelayResponse {
    pub signature: String,
    #[serde(rename = "response")]
    pub payload: String,
    pub proof: RelayProof,
}

impl RelayResponse {
    pub fn new(signature: &str, payload: &str, proof: RelayProof) -> Result<Self, RelayError> {
        let response = RelayResponse {
            signature: signature.to_string(),
            payload: payload.to_string(),
            proof,
        };
        if !response.is_valid() {
            return Err(RelayError::Malformed("relay response"));
        }
        Ok(response)
    }
}

impl WireFormat for RelayResponse {
    const NAME: &'static str = "relay response";

    fn is_valid(&self) -> bool {
        !self.signature.is_empty() && !self.payload.is_empty()
    }
}
