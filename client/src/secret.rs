//! The payer secret boundary.
//!
//! Key material only crosses into the rest of the client as a [`PayerSecret`],
//! which never prints its bytes and only lands in the persisted config when
//! the orchestrator is explicitly told to keep it there.

use serde::{
    de::Error as _,
    Deserialize,
    Deserializer,
    Serialize,
    Serializer,
};
use solana_sdk::signature::Keypair;

pub const SECRET_SIZE: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("payer secret is not valid hex")]
    InvalidHex,
    #[error("payer secret must be {SECRET_SIZE} bytes, got {0}")]
    WrongLength(usize),
    #[error("payer secret is not a valid ed25519 keypair")]
    InvalidKeyMaterial,
}

/// Raw ed25519 keypair material for the fee payer, hex-encoded at rest.
#[derive(Clone, Eq, PartialEq)]
pub struct PayerSecret([u8; SECRET_SIZE]);

impl PayerSecret {
    pub fn from_keypair(keypair: &Keypair) -> Self {
        PayerSecret(keypair.to_bytes())
    }

    pub fn to_keypair(&self) -> Result<Keypair, SecretError> {
        Keypair::try_from(&self.0[..]).map_err(|_| SecretError::InvalidKeyMaterial)
    }

    pub fn from_hex(encoded: &str) -> Result<Self, SecretError> {
        let raw = hex::decode(encoded).map_err(|_| SecretError::InvalidHex)?;
        let bytes: [u8; SECRET_SIZE] = raw
            .try_into()
            .map_err(|raw: Vec<u8>| SecretError::WrongLength(raw.len()))?;
        Ok(PayerSecret(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

// Key material must never leak through debug output.
impl core::fmt::Debug for PayerSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "PayerSecret(<redacted>)")
    }
}

impl Serialize for PayerSecret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PayerSecret {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        PayerSecret::from_hex(&encoded).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let keypair = Keypair::new();
        let secret = PayerSecret::from_keypair(&keypair);
        let restored = PayerSecret::from_hex(&secret.to_hex()).unwrap();
        assert_eq!(restored, secret);
        assert_eq!(restored.to_keypair().unwrap().to_bytes(), keypair.to_bytes());
    }

    #[test]
    fn test_debug_is_redacted() {
        let secret = PayerSecret::from_keypair(&Keypair::new());
        let printed = format!("{secret:?}");
        assert_eq!(printed, "PayerSecret(<redacted>)");
        assert!(!printed.contains(&secret.to_hex()[..8]));
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(matches!(
            PayerSecret::from_hex("ab").unwrap_err(),
            SecretError::WrongLength(1)
        ));
        assert!(matches!(
            PayerSecret::from_hex("zz").unwrap_err(),
            SecretError::InvalidHex
        ));
    }

    #[test]
    fn test_serde_as_hex_string() {
        let secret = PayerSecret::from_keypair(&Keypair::new());
        let json = serde_json::to_string(&secret).unwrap();
        assert_eq!(json, format!("\"{}\"", secret.to_hex()));
        let parsed: PayerSecret = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, secret);
    }
}
