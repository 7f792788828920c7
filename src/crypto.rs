use rand::Rng;
use ring::digest::{digest, SHA256};
use sha3::{Digest, Sha3_256};

use crate::error::RelayError;

pub type RelayHash = [u8; 32];

/// Length in bytes of an account address.
pub const ADDRESS_LENGTH: usize = 20;

/// SHA3-256 of `data`.
pub fn hash(data: &[u8]) -> RelayHash {
    let mut hasher = Sha3_256::new();
    hasher.update(data);
    hasher.finalize().into()
}

pub fn hash_hex(data: &[u8]) -> String {
    hex::encode(hash(data))
}

/// True for a non-empty, even-length string of hex digits.
pub fn is_hex(value: &str) -> bool {
    !value.is_empty() && value.len() % 2 == 0 && value.chars().all(|c| c.is_ascii_hexdigit())
}

/// Derives the account address of a hex-encoded public key: the first 20 bytes
/// of its SHA-256 digest, hex-encoded.
pub fn address_from_public_key(public_key_hex: &str) -> Result<String, RelayError> {
    let public_key = hex::decode(public_key_hex).map_err(|_| RelayError::Malformed("public key"))?;
    if public_key.is_empty() {
        return Err(RelayError::Malformed("public key"));
    }
    let digest = digest(&SHA256, &public_key);
    Ok(hex::encode(&digest.as_ref()[..ADDRESS_LENGTH]))
}

/// Fresh per-attempt entropy. Kept within the non-negative i64 range so it
/// serializes as a plain JSON integer.
pub fn generate_entropy() -> i64 {
    rand::thread_rng().gen_range(0..i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_sha3_256() {
        assert_eq!(
            hash_hex(b""),
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        );
        assert_eq!(
            hash_hex(b"abc"),
            "3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532"
        );
    }

    #[test]
    fn hex_check() {
        assert!(is_hex("00ff"));
        assert!(is_hex("ABcd"));
        assert!(!is_hex(""));
        assert!(!is_hex("abc"));
        assert!(!is_hex("zz"));
    }

    #[test]
    fn address_is_truncated_sha256() {
        let address = address_from_public_key("00").unwrap();
        // sha256(0x00) = 6e340b9cffb37a989ca544e6bb780a2c78901d3fb33738768511a30617afa01d
        assert_eq!(address, "6e340b9cffb37a989ca544e6bb780a2c78901d3f");
        assert_eq!(address.len(), ADDRESS_LENGTH * 2);
        assert!(address_from_public_key("not hex").is_err());
        assert!(address_from_public_key("").is_err());
    }

    #[test]
    fn entropy_is_fresh() {
        let first = generate_entropy();
        let second = generate_entropy();
        assert!(first >= 0 && second >= 0);
        assert_ne!(first, second);
    }
}
