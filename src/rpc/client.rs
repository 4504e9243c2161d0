//! Minimal JSON-RPC client for an EVM node
//!
//! Only the handful of `eth_*` methods the Aspect commands need.

use super::types::{ReceiptPolling, RpcRequest, RpcResponse, TransactionReceipt};
use crate::core::SignedTransaction;
use alloy_primitives::{Address, B256, U256};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::time::Instant;

/// RPC errors
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Node returned error {code}: {message}")]
    NodeError { code: i64, message: String },
    #[error("Missing result for {0}")]
    MissingResult(String),
    #[error("Unexpected response for {method}: {source}")]
    InvalidResponse {
        method: String,
        source: serde_json::Error,
    },
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
    #[error("Transaction {0} was not mined within {1:?}")]
    ReceiptTimeout(B256, std::time::Duration),
    #[error("Transaction {0} reverted")]
    Reverted(B256),
}

/// JSON-RPC client bound to one node URL
pub struct RpcClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl RpcClient {
    /// Create a client for the given node URL
    pub fn new(url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.to_string(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Perform one JSON-RPC call
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, RpcError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };
        log::debug!("-> {} {}", method, request.params);

        let response: RpcResponse = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(RpcError::NodeError {
                code: error.code,
                message: error.message,
            });
        }

        let result = response.result.unwrap_or(Value::Null);
        log::debug!("<- {} {}", method, result);
        serde_json::from_value(result).map_err(|source| RpcError::InvalidResponse {
            method: method.to_string(),
            source,
        })
    }

    /// `eth_gasPrice`
    pub async fn gas_price(&self) -> Result<U256, RpcError> {
        let quantity: String = self.request("eth_gasPrice", json!([])).await?;
        parse_u256(&quantity)
    }

    /// `eth_chainId`
    pub async fn chain_id(&self) -> Result<u64, RpcError> {
        let quantity: String = self.request("eth_chainId", json!([])).await?;
        parse_u64(&quantity)
    }

    /// `eth_getTransactionCount` against the pending block
    pub async fn transaction_count(&self, address: Address) -> Result<u64, RpcError> {
        let quantity: String = self
            .request("eth_getTransactionCount", json!([address, "pending"]))
            .await?;
        parse_u64(&quantity)
    }

    /// `eth_sendRawTransaction`, returning the node's transaction hash
    pub async fn send_raw_transaction(&self, tx: &SignedTransaction) -> Result<B256, RpcError> {
        let hash: Option<B256> = self
            .request("eth_sendRawTransaction", json!([tx.raw_hex()]))
            .await?;
        hash.ok_or_else(|| RpcError::MissingResult("eth_sendRawTransaction".to_string()))
    }

    /// `eth_getTransactionReceipt`; `None` while the transaction is pending
    pub async fn transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<TransactionReceipt>, RpcError> {
        self.request("eth_getTransactionReceipt", json!([hash])).await
    }

    /// Poll until the receipt is available or the timeout passes
    pub async fn wait_for_receipt(
        &self,
        hash: B256,
        polling: ReceiptPolling,
    ) -> Result<TransactionReceipt, RpcError> {
        let deadline = Instant::now() + polling.timeout;

        loop {
            if let Some(receipt) = self.transaction_receipt(hash).await? {
                return Ok(receipt);
            }
            if Instant::now() >= deadline {
                return Err(RpcError::ReceiptTimeout(hash, polling.timeout));
            }
            log::debug!("Receipt for {} not available yet", hash);
            tokio::time::sleep(polling.interval).await;
        }
    }

    /// Submit a signed transaction and wait for a successful receipt
    pub async fn send_and_confirm(
        &self,
        tx: &SignedTransaction,
        polling: ReceiptPolling,
    ) -> Result<TransactionReceipt, RpcError> {
        let hash = self.send_raw_transaction(tx).await?;
        if hash != tx.hash {
            log::warn!("Node reported hash {} for transaction {}", hash, tx.hash);
        }

        let receipt = self.wait_for_receipt(hash, polling).await?;
        if !receipt.succeeded() {
            return Err(RpcError::Reverted(hash));
        }
        Ok(receipt)
    }
}

fn strip_hex_prefix(quantity: &str) -> &str {
    quantity
        .strip_prefix("0x")
        .or_else(|| quantity.strip_prefix("0X"))
        .unwrap_or(quantity)
}

/// Parse a hex quantity as `U256`
pub fn parse_u256(quantity: &str) -> Result<U256, RpcError> {
    U256::from_str_radix(strip_hex_prefix(quantity), 16)
        .map_err(|_| RpcError::InvalidQuantity(quantity.to_string()))
}

/// Parse a hex quantity as `u64`
pub fn parse_u64(quantity: &str) -> Result<u64, RpcError> {
    u64::from_str_radix(strip_hex_prefix(quantity), 16)
        .map_err(|_| RpcError::InvalidQuantity(quantity.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::mock::MockNode;
    use std::time::Duration;

    #[test]
    fn test_parse_quantities() {
        assert_eq!(parse_u64("0x2e2c").unwrap(), 11820);
        assert_eq!(parse_u64("0x0").unwrap(), 0);
        assert_eq!(parse_u256("0x3b9aca00").unwrap(), U256::from(1_000_000_000u64));
        assert!(parse_u64("0xzz").is_err());
        assert!(parse_u64("").is_err());
    }

    #[tokio::test]
    async fn test_basic_queries() {
        let node = MockNode::start().await;
        let client = RpcClient::new(&node.url());

        assert_eq!(client.gas_price().await.unwrap(), U256::from(1_000_000_000u64));
        assert_eq!(client.chain_id().await.unwrap(), 11820);
        assert_eq!(
            client.transaction_count(Address::repeat_byte(1)).await.unwrap(),
            5
        );
        assert_eq!(
            node.methods(),
            vec!["eth_gasPrice", "eth_chainId", "eth_getTransactionCount"]
        );
    }

    #[tokio::test]
    async fn test_node_error() {
        let node = MockNode::start().await;
        node.fail_method("eth_gasPrice", "backend unavailable");
        let client = RpcClient::new(&node.url());

        let err = client.gas_price().await.unwrap_err();
        assert!(matches!(err, RpcError::NodeError { ref message, .. } if message == "backend unavailable"));
    }

    #[tokio::test]
    async fn test_receipt_timeout() {
        let node = MockNode::start().await;
        node.withhold_receipts();
        let client = RpcClient::new(&node.url());

        let polling = ReceiptPolling {
            interval: Duration::from_millis(10),
            timeout: Duration::from_millis(50),
        };
        let err = client
            .wait_for_receipt(B256::repeat_byte(7), polling)
            .await
            .unwrap_err();
        assert!(matches!(err, RpcError::ReceiptTimeout(..)));
        assert!(node.methods().len() >= 2);
    }
}
