use crate::crypto::hash_hex;
use crate::error::RelayError;
use crate::relay::meta::RelayMeta;
use crate::relay::payload::RelayPayload;
use crate::relay::WireFormat;

/// An empty relay proof spliced into the hashed request. Service nodes compute
/// the request hash over a relay whose proof has been zeroed, so these bytes
/// have to stay exactly as they are.
pub const EMPTY_PROOF_PLACEHOLDER: &str = r#"{"entropy":0,"session_block_height":0,"servicer_pub_key":"","blockchain":"","aat":{"version":"","app_pub_key":"","client_pub_key":"","signature":""},"signature":"","request_hash":""}"#;

/// Binding of payload and meta. Only ever used as a hash input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHash {
    pub payload: RelayPayload,
    pub meta: RelayMeta,
}

impl RequestHash {
    pub fn new(payload: RelayPayload, meta: RelayMeta) -> Result<Self, RelayError> {
        let request_hash = RequestHash { payload, meta };
        if !request_hash.is_valid() {
            return Err(RelayError::Malformed("request hash"));
        }
        Ok(request_hash)
    }

    pub fn is_valid(&self) -> bool {
        self.payload.is_valid() && self.meta.is_valid()
    }

    pub fn to_json(&self) -> Result<String, RelayError> {
        Ok(format!(
            r#"{{"payload":{},"meta":{},"proof":{}}}"#,
            self.payload.to_json()?,
            self.meta.to_json()?,
            EMPTY_PROOF_PLACEHOLDER
        ))
    }

    /// SHA3-256 (hex) of the canonical JSON.
    pub fn hash(&self) -> Result<String, RelayError> {
        Ok(hash_hex(self.to_json()?.as_bytes()))
    }
}
