use secp256k1::{Message, PublicKey, SecretKey, Signature, SECP256K1};
use std::fmt;

use crate::crypto::{address_from_public_key, hash};
use crate::error::RelayError;

/// An secp256k1 keypair for signing and verifying relay artifacts
#[derive(Debug, PartialEq)]
pub struct Keypair {
    secret_key: SecretKey,
    public_key: PublicKey,
}

impl Keypair {
    /// Create and return a keypair with a randomly generated private key.
    pub fn new() -> Keypair {
        loop {
            let candidate: [u8; 32] = rand::random();
            if let Ok(keypair) = Keypair::from_secret_slice(&candidate) {
                return keypair;
            }
        }
    }

    /// Create and return a keypair with the given u8 slice as the private key
    pub fn from_secret_slice(slice: &[u8]) -> Result<Keypair, secp256k1::Error> {
        let secret_key = SecretKey::from_slice(slice)?;
        let public_key = PublicKey::from_secret_key(&SECP256K1, &secret_key);

        Ok(Keypair {
            secret_key,
            public_key,
        })
    }

    /// Create and return a keypair with the given hex string as the private key
    pub fn from_secret_hex(secret_hex: &str) -> crate::Result<Keypair> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(secret_hex, &mut bytes as &mut [u8])?;
        Ok(Keypair::from_secret_slice(&bytes)?)
    }

    /// Public key in its compressed form, hex-encoded
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key.serialize())
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }

    /// Account address derived from the public key
    pub fn address(&self) -> Result<String, RelayError> {
        address_from_public_key(&self.public_key_hex())
    }

    /// Hash and sign arbitrary bytes, returning the compact signature
    pub fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, RelayError> {
        let message = Keypair::message_for(payload)?;
        Ok(SECP256K1
            .sign(&message, &self.secret_key)
            .serialize_compact()
            .to_vec())
    }

    /// Verify a compact signature produced by [`Keypair::sign`]
    pub fn verify(public_key_hex: &str, payload: &[u8], signature: &[u8]) -> bool {
        let public_key = match hex::decode(public_key_hex)
            .ok()
            .and_then(|bytes| PublicKey::from_slice(&bytes).ok())
        {
            Some(public_key) => public_key,
            None => return false,
        };
        let signature = match Signature::from_compact(signature) {
            Ok(signature) => signature,
            Err(_) => return false,
        };
        match Keypair::message_for(payload) {
            Ok(message) => SECP256K1.verify(&message, &signature, &public_key).is_ok(),
            Err(_) => false,
        }
    }

    fn message_for(payload: &[u8]) -> Result<Message, RelayError> {
        Message::from_slice(&hash(payload)).map_err(|_| RelayError::Malformed("signing digest"))
    }
}

impl Default for Keypair {
    fn default() -> Self {
        Keypair::new()
    }
}

impl fmt::Display for Keypair {
    /// formats a Keypair for println! without exposing the secret key
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pubkey:{}", self.public_key_hex())
    }
}
