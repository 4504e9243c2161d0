//! Core Aspect building blocks
//!
//! This module contains:
//! - Join points (validated names and their on-chain bit mask)
//! - The Aspect system contract ABI (deploy, bind, unbind)
//! - Legacy transactions with EIP-155 signing

pub mod abi;
pub mod join_point;
pub mod transaction;

pub use abi::{
    encode_bind, encode_unbind, DeployPayload, ASPECT_SYSTEM_ADDRESS, DEFAULT_ASPECT_VERSION,
    DEFAULT_BIND_PRIORITY,
};
pub use join_point::{InvalidJoinPoint, JoinPoint, JoinPoints, VALID_JOIN_POINTS};
pub use transaction::{
    parse_gas_limit, LegacyTransaction, SignedTransaction, TransactionError, DEFAULT_GAS_LIMIT,
};
