//! Transaction handling for Aspect operations
//!
//! Implements the legacy EVM transaction envelope with
//! EIP-155 replay protection, which is what the Aspect system contract
//! expects from deploy, bind and unbind calls.

use crate::crypto::{KeyError, KeyPair, RecoverableSignature};
use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_rlp::{Encodable, Header};
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Gas limit used when none (or zero) is supplied
pub const DEFAULT_GAS_LIMIT: u64 = 9_000_000;

// =============================================================================
// Error Types
// =============================================================================

/// Transaction-related errors
#[derive(Error, Debug)]
pub enum TransactionError {
    #[error("Crypto error: {0}")]
    CryptoError(#[from] KeyError),
    #[error("Chain id {0} is too large for an EIP-155 signature")]
    ChainIdOverflow(u64),
}

// =============================================================================
// Gas
// =============================================================================

/// Parse a gas limit the lenient way the CLI has always accepted it:
/// an optional `+` and the leading decimal digits are used, anything else
/// (or zero) falls back to [`DEFAULT_GAS_LIMIT`].
pub fn parse_gas_limit(gas: Option<&str>) -> u64 {
    let Some(raw) = gas else {
        return DEFAULT_GAS_LIMIT;
    };

    let trimmed = raw.trim_start();
    let digits: String = trimmed
        .strip_prefix('+')
        .unwrap_or(trimmed)
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();

    match digits.parse::<u64>() {
        Ok(0) | Err(_) => DEFAULT_GAS_LIMIT,
        Ok(limit) => limit,
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// An unsigned legacy transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTransaction {
    pub nonce: u64,
    pub gas_price: U256,
    pub gas: u64,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub chain_id: u64,
}

/// A signed transaction ready for `eth_sendRawTransaction`
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    pub transaction: LegacyTransaction,
    pub signature: RecoverableSignature,
    /// RLP encoding of the signed envelope
    pub raw: Vec<u8>,
    pub hash: B256,
}

impl LegacyTransaction {
    /// RLP payload that gets hashed and signed (EIP-155)
    pub fn signing_payload(&self) -> Vec<u8> {
        encode_list(&[
            &self.nonce,
            &self.gas_price,
            &self.gas,
            &self.to,
            &self.value,
            &self.data,
            &self.chain_id,
            &0u8,
            &0u8,
        ])
    }

    /// Hash that the sender signs
    pub fn signing_hash(&self) -> B256 {
        keccak256(self.signing_payload())
    }

    /// Sign with the given key
    pub fn sign(self, key: &KeyPair) -> Result<SignedTransaction, TransactionError> {
        let signature = key.sign_hash(&self.signing_hash())?;
        let v = self.v(&signature)?;
        let r = U256::from_be_bytes(signature.r.0);
        let s = U256::from_be_bytes(signature.s.0);

        let raw = encode_list(&[
            &self.nonce,
            &self.gas_price,
            &self.gas,
            &self.to,
            &self.value,
            &self.data,
            &v,
            &r,
            &s,
        ]);
        let hash = keccak256(&raw);

        Ok(SignedTransaction {
            transaction: self,
            signature,
            raw,
            hash,
        })
    }

    /// EIP-155 `v` value
    fn v(&self, signature: &RecoverableSignature) -> Result<u64, TransactionError> {
        self.chain_id
            .checked_mul(2)
            .and_then(|v| v.checked_add(35 + signature.recovery_id as u64))
            .ok_or(TransactionError::ChainIdOverflow(self.chain_id))
    }
}

impl SignedTransaction {
    /// Raw transaction as `0x`-prefixed hex
    pub fn raw_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.raw))
    }
}

/// RLP-encode a heterogeneous list
fn encode_list(fields: &[&dyn Encodable]) -> Vec<u8> {
    let payload_length: usize = fields.iter().map(|f| f.length()).sum();
    let mut out = Vec::with_capacity(payload_length + 9);
    Header {
        list: true,
        payload_length,
    }
    .encode(&mut out);
    for field in fields {
        field.encode(&mut out);
    }
    out
}
