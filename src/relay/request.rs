use serde::{Deserialize, Serialize};

use crate::error::RelayError;
use crate::relay::meta::RelayMeta;
use crate::relay::payload::RelayPayload;
use crate::relay::proof::RelayProof;
use crate::relay::WireFormat;

/// The unit submitted to a service node.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RelayRequest {
    pub payload: RelayPayload,
    pub meta: RelayMeta,
    pub proof: RelayProof,
}

impl RelayRequest {
    pub fn new(payload: RelayPayload, meta: RelayMeta, proof: RelayProof) -> Result<Self, RelayError> {
        let request = RelayRequest {
            payload,
            meta,
            proof,
        };
        if !request.is_valid() {
            return Err(RelayError::Malformed("relay request"));
        }
        Ok(request)
    }
}

impl WireFormat for RelayRequest {
    const NAME: &'static str = "relay request";

    fn is_valid(&self) -> bool {
        self.payload.is_valid() && self.meta.is_valid() && self.proof.is_valid()
    }
}
