//! Chain node access
//!
//! A small JSON-RPC client covering gas price, chain id, nonce, raw
//! transaction submission and receipt polling.

pub mod client;
pub mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use client::{parse_u256, parse_u64, RpcClient, RpcError};
pub use types::{
    ReceiptPolling, TransactionReceipt, DEFAULT_RECEIPT_POLL_INTERVAL, DEFAULT_RECEIPT_TIMEOUT,
};
