//! Cryptographic utilities for signing Aspect transactions
//!
//! This module provides:
//! - ECDSA key management (secp256k1)
//! - Ethereum-style account addresses
//! - Recoverable signatures for EIP-155 transactions

pub mod keys;

pub use keys::{
    public_key_to_address, recover_address, sign_hash, KeyError, KeyPair, RecoverableSignature,
};
