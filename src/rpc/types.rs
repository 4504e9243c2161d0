//! JSON-RPC wire types

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default interval between receipt lookups
pub const DEFAULT_RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Default time to wait for a receipt
pub const DEFAULT_RECEIPT_TIMEOUT: Duration = Duration::from_secs(750);

/// JSON-RPC request envelope
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: serde_json::Value,
}

/// JSON-RPC response envelope
#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

/// Error member of a JSON-RPC response
#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// How long to wait for a transaction to be mined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptPolling {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for ReceiptPolling {
    fn default() -> Self {
        Self {
            interval: DEFAULT_RECEIPT_POLL_INTERVAL,
            timeout: DEFAULT_RECEIPT_TIMEOUT,
        }
    }
}

/// Transaction receipt, including the Artela `aspectAddress` extension
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    #[serde(default)]
    pub block_number: Option<U256>,
    #[serde(default)]
    pub block_hash: Option<B256>,
    #[serde(default)]
    pub from: Option<Address>,
    #[serde(default)]
    pub to: Option<Address>,
    #[serde(default)]
    pub gas_used: Option<U256>,
    /// `0x1` on success, `0x0` on revert
    #[serde(default)]
    pub status: Option<U256>,
    /// Identifier of a freshly deployed Aspect
    #[serde(default)]
    pub aspect_address: Option<Address>,
    /// Fields this tool does not interpret
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl TransactionReceipt {
    /// Receipts without a status field predate Byzantium and count as success
    pub fn succeeded(&self) -> bool {
        self.status.map_or(true, |s| !s.is_zero())
    }
}
