use serde::{Deserialize, Serialize};

use crate::aat::AuthToken;
use crate::crypto::is_hex;
use crate::error::RelayError;
use crate::relay::WireFormat;

/// The signed claim a service node verifies before serving a relay.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RelayProof {
    pub entropy: i64,
    pub session_block_height: u64,
    pub servicer_pub_key: String,
    pub blockchain: String,
    pub aat: AuthToken,
    pub signature: String,
    pub request_hash: String,
}

impl RelayProof {
    pub fn new(
        entropy: i64,
        session_block_height: u64,
        servicer_pub_key: &str,
        blockchain: &str,
        aat: AuthToken,
        signature: &str,
        request_hash: &str,
    ) -> Result<Self, RelayError> {
        let proof = RelayProof {
            entropy,
            session_block_height,
            servicer_pub_key: servicer_pub_key.to_string(),
            blockchain: blockchain.to_string(),
            aat,
            signature: signature.to_string(),
            request_hash: request_hash.to_string(),
        };
        if !proof.is_valid() {
            return Err(RelayError::Malformed("relay proof"));
        }
        Ok(proof)
    }
}

impl WireFormat for RelayProof {
    const NAME: &'static str = "relay proof";

    fn is_valid(&self) -> bool {
        self.entropy >= 0
            && self.session_block_height > 0
            && is_hex(&self.servicer_pub_key)
            && !self.blockchain.is_empty()
            && self.aat.is_valid()
            && is_hex(&self.signature)
            && is_hex(&self.request_hash)
    }
}
