use serde::Serialize;

use crate::aat::AuthToken;
use crate::crypto::{hash, RelayHash};
use crate::error::RelayError;
use crate::relay::request_hash::RequestHash;

// Field order is the wire order; the serialized bytes are what gets hashed.
#[derive(Serialize)]
struct ProofCommitment<'a> {
    entropy: i64,
    session_block_height: u64,
    servicer_pub_key: &'a str,
    blockchain: &'a str,
    signature: &'a str,
    token: String,
    request_hash: String,
}

///
/// Builds the bytes a client signs for a relay proof: SHA3-256 over the
/// canonical proof JSON with the signature left empty, the token replaced by
/// its masked hash and the request replaced by its request hash.
///
pub fn proof_bytes(
    entropy: i64,
    session_block_height: u64,
    servicer_pub_key: &str,
    chain: &str,
    aat: &AuthToken,
    request_hash: &RequestHash,
) -> Result<RelayHash, RelayError> {
    let commitment = ProofCommitment {
        entropy,
        session_block_height,
        servicer_pub_key,
        blockchain: chain,
        signature: "",
        token: aat.hash_without_signature()?,
        request_hash: request_hash.hash()?,
    };
    let json =
        serde_json::to_vec(&commitment).map_err(|_| RelayError::Malformed("relay proof"))?;
    Ok(hash(&json))
}
