/*!
# Relay Envelope

Immutable value objects exchanged with service nodes. Field names and nesting
of their JSON projections are fixed by the network:

```text
RelayRequest  { payload: RelayPayload, meta: RelayMeta, proof: RelayProof }
RelayPayload  { data, method, path, headers }
RelayMeta     { block_height }
RelayProof    { entropy, session_block_height, servicer_pub_key, blockchain,
                aat: { version, app_pub_key, client_pub_key, signature },
                signature, request_hash }
RelayResponse { signature, response, proof }
```

Constructors validate synchronously, before any network I/O. Values decoded
from the network are checked again with `is_valid`.
*/
use serde::{de::DeserializeOwned, Serialize};

use crate::error::RelayError;

pub mod meta;
pub mod payload;
pub mod proof;
pub mod proof_builder;
pub mod request;
pub mod request_hash;
pub mod response;

pub use meta::RelayMeta;
pub use payload::{RelayHeaders, RelayPayload};
pub use proof::RelayProof;
pub use request::RelayRequest;
pub use request_hash::RequestHash;
pub use response::RelayResponse;

/// JSON projection shared by the relay value objects.
pub trait WireFormat: Serialize + DeserializeOwned + Sized {
    /// Name used in `RelayError::Malformed`.
    const NAME: &'static str;

    fn is_valid(&self) -> bool;

    fn to_json(&self) -> Result<String, RelayError> {
        serde_json::to_string(self).map_err(|_| RelayError::Malformed(Self::NAME))
    }

    /// Decodes and re-validates.
    fn from_json(json: &str) -> Result<Self, RelayError> {
        let value: Self =
            serde_json::from_str(json).map_err(|_| RelayError::Malformed(Self::NAME))?;
        if !value.is_valid() {
            return Err(RelayError::Malformed(Self::NAME));
        }
        Ok(value)
    }
}
