//! ECDSA key management for Aspect transactions
//!
//! Provides account derivation and recoverable signing using
//! the secp256k1 elliptic curve (same as Ethereum).

use alloy_primitives::{keccak256, Address, B256};
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use thiserror::Error;

/// Errors that can occur during key operations
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Invalid private key")]
    InvalidPrivateKey,
    #[error("Secp256k1 error: {0}")]
    Secp256k1Error(#[from] secp256k1::Error),
}

/// A recoverable signature split into the parts an EVM transaction carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoverableSignature {
    pub r: B256,
    pub s: B256,
    /// Recovery id, 0 or 1
    pub recovery_id: u8,
}

/// A key pair consisting of a private key and its corresponding public key
#[derive(Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Create a key pair from an existing secret key
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Create a key pair from a hex-encoded private key, with or without `0x`
    pub fn from_private_key_hex(hex_key: &str) -> Result<Self, KeyError> {
        let trimmed = hex_key.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(digits).map_err(|_| KeyError::InvalidPrivateKey)?;
        let secret_key =
            SecretKey::from_slice(&bytes).map_err(|_| KeyError::InvalidPrivateKey)?;
        Ok(Self::from_secret_key(secret_key))
    }

    /// Account address derived from the public key
    pub fn address(&self) -> Address {
        public_key_to_address(&self.public_key)
    }

    /// Sign a 32-byte digest
    pub fn sign_hash(&self, hash: &B256) -> Result<RecoverableSignature, KeyError> {
        sign_hash(&self.secret_key, hash)
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// Convert a public key to an account address
/// Ethereum-style: last 20 bytes of keccak256(uncompressed pubkey without prefix)
pub fn public_key_to_address(public_key: &PublicKey) -> Address {
    let uncompressed = public_key.serialize_uncompressed();
    let hash = keccak256(&uncompressed[1..]);
    Address::from_slice(&hash[12..])
}

/// Sign a digest with a secret key, keeping the recovery id
pub fn sign_hash(secret_key: &SecretKey, hash: &B256) -> Result<RecoverableSignature, KeyError> {
    let secp = Secp256k1::new();
    let message = Message::from_digest_slice(hash.as_slice())?;
    let signature = secp.sign_ecdsa_recoverable(&message, secret_key);
    let (recovery_id, compact) = signature.serialize_compact();

    Ok(RecoverableSignature {
        r: B256::from_slice(&compact[..32]),
        s: B256::from_slice(&compact[32..]),
        recovery_id: recovery_id.to_i32() as u8,
    })
}

/// Recover the signing address from a digest and signature
pub fn recover_address(
    hash: &B256,
    signature: &RecoverableSignature,
) -> Result<Address, KeyError> {
    let secp = Secp256k1::new();
    let message = Message::from_digest_slice(hash.as_slice())?;
    let recovery_id = secp256k1::ecdsa::RecoveryId::from_i32(signature.recovery_id as i32)?;

    let mut compact = [0u8; 64];
    compact[..32].copy_from_slice(signature.r.as_slice());
    compact[32..].copy_from_slice(signature.s.as_slice());
    let sig = secp256k1::ecdsa::RecoverableSignature::from_compact(&compact, recovery_id)?;

    let public_key = secp.recover_ecdsa(&message, &sig)?;
    Ok(public_key_to_address(&public_key))
}
