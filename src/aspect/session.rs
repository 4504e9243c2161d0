//! Signing session against one node
//!
//! Shared by deploy, bind and unbind: holds the RPC client and the sender's
//! key, fills in gas price, chain id and nonce, then signs and submits.

use super::AspectError;
use crate::config::Configuration;
use crate::core::LegacyTransaction;
use crate::crypto::KeyPair;
use crate::rpc::{RpcClient, TransactionReceipt};
use alloy_primitives::{Address, Bytes, U256};

/// Client plus sending account for one command
pub struct Session {
    client: RpcClient,
    sender: KeyPair,
    config: Configuration,
}

impl Session {
    /// Derive the sender account. No network access happens here.
    pub fn new(config: &Configuration) -> Result<Self, AspectError> {
        let sender = KeyPair::from_private_key_hex(&config.private_key)?;
        log::info!("from address: {}", sender.address());

        Ok(Self {
            client: RpcClient::new(&config.node_url),
            sender,
            config: config.clone(),
        })
    }

    pub fn sender(&self) -> Address {
        self.sender.address()
    }

    /// Envelope addressed to `to`, priced at the node's current gas price
    pub async fn transaction(
        &self,
        to: Address,
        data: Vec<u8>,
        gas: u64,
    ) -> Result<LegacyTransaction, AspectError> {
        let gas_price = self.client.gas_price().await?;
        let chain_id = self.client.chain_id().await?;
        let nonce = self.client.transaction_count(self.sender()).await?;

        Ok(LegacyTransaction {
            nonce,
            gas_price,
            gas,
            to,
            value: U256::ZERO,
            data: Bytes::from(data),
            chain_id,
        })
    }

    /// Sign, submit and wait for the receipt
    pub async fn submit(&self, tx: LegacyTransaction) -> Result<TransactionReceipt, AspectError> {
        let signed = tx.sign(&self.sender)?;
        log::info!("sending signed transaction...");
        log::debug!("raw transaction {}", signed.raw_hex());

        let receipt = self
            .client
            .send_and_confirm(&signed, self.config.receipt)
            .await?;
        log::info!(
            "transaction {} included in block {}",
            receipt.transaction_hash,
            receipt
                .block_number
                .map(|n| n.to_string())
                .unwrap_or_else(|| "?".to_string())
        );
        Ok(receipt)
    }
}
