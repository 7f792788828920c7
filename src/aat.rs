use serde::{Deserialize, Serialize};

use crate::crypto::{hash_hex, is_hex};
use crate::error::RelayError;
use crate::keypair::Keypair;

pub const AAT_VERSION: &str = "0.0.1";

///
/// Application Authentication Token. Delegates the client key to relay on
/// behalf of the application's staked identity. Only the public key fields are
/// read by the relay engine.
///
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub version: String,
    #[serde(rename = "app_pub_key")]
    pub application_public_key: String,
    #[serde(rename = "client_pub_key")]
    pub client_public_key: String,
    #[serde(rename = "signature")]
    pub application_signature: String,
}

// Field order matters: this is the byte sequence that gets hashed.
#[derive(Serialize)]
struct UnsignedAuthToken<'a> {
    version: &'a str,
    app_pub_key: &'a str,
    client_pub_key: &'a str,
    signature: &'a str,
}

impl AuthToken {
    pub fn new(
        version: &str,
        application_public_key: &str,
        client_public_key: &str,
        application_signature: &str,
    ) -> Result<AuthToken, RelayError> {
        let token = AuthToken {
            version: version.to_string(),
            application_public_key: application_public_key.to_string(),
            client_public_key: client_public_key.to_string(),
            application_signature: application_signature.to_string(),
        };
        if !token.is_valid() {
            return Err(RelayError::Malformed("application authentication token"));
        }
        Ok(token)
    }

    /// Issues a token for `client_public_key`, signed by the application key.
    pub fn generate(
        version: &str,
        client_public_key: &str,
        application_keypair: &Keypair,
    ) -> Result<AuthToken, RelayError> {
        let application_public_key = application_keypair.public_key_hex();
        let message = AuthToken::unsigned_bytes(version, &application_public_key, client_public_key)?;
        let signature = hex::encode(application_keypair.sign(&message)?);
        AuthToken::new(
            version,
            &application_public_key,
            client_public_key,
            &signature,
        )
    }

    pub fn is_valid(&self) -> bool {
        !self.version.is_empty()
            && is_hex(&self.application_public_key)
            && is_hex(&self.client_public_key)
            && is_hex(&self.application_signature)
    }

    /// Verifies the application signature over the masked token.
    pub fn verify_signature(&self) -> bool {
        let message = match AuthToken::unsigned_bytes(
            &self.version,
            &self.application_public_key,
            &self.client_public_key,
        ) {
            Ok(message) => message,
            Err(_) => return false,
        };
        match hex::decode(&self.application_signature) {
            Ok(signature) => Keypair::verify(&self.application_public_key, &message, &signature),
            Err(_) => false,
        }
    }

    /// SHA3-256 (hex) of the token with its signature masked to `""`, so that
    /// proofs never depend on the raw application signature.
    pub fn hash_without_signature(&self) -> Result<String, RelayError> {
        let bytes = AuthToken::unsigned_bytes(
            &self.version,
            &self.application_public_key,
            &self.client_public_key,
        )?;
        Ok(hash_hex(&bytes))
    }

    fn unsigned_bytes(
        version: &str,
        application_public_key: &str,
        client_public_key: &str,
    ) -> Result<Vec<u8>, RelayError> {
        serde_json::to_vec(&UnsignedAuthToken {
            version,
            app_pub_key: application_public_key,
            client_pub_key: client_public_key,
            signature: "",
        })
        .map_err(|_| RelayError::Malformed("application authentication token"))
    }
}
