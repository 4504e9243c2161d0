//! Binding Aspects to contracts
//!
//! `bind` goes to the Aspect registry with a fixed priority and version;
//! `unbind` goes to the aspect-core address, which is configured separately.

use super::session::Session;
use super::{parse_address, AspectError};
use crate::config::Configuration;
use crate::core::{
    encode_bind, encode_unbind, parse_gas_limit, DEFAULT_ASPECT_VERSION, DEFAULT_BIND_PRIORITY,
};
use crate::rpc::TransactionReceipt;
use alloy_primitives::Address;

/// Arguments of `aspect bind` and `aspect unbind`
#[derive(Debug, Clone, Default)]
pub struct BindRequest {
    pub contract: String,
    pub aspect_id: String,
    pub gas: Option<String>,
}

impl BindRequest {
    /// Parsed `(contract, aspect id)` pair
    pub fn addresses(&self) -> Result<(Address, Address), AspectError> {
        let contract = parse_address("contract", &self.contract)?;
        let aspect_id = parse_address("aspect id", &self.aspect_id)?;
        Ok((contract, aspect_id))
    }

    pub fn gas_limit(&self) -> u64 {
        parse_gas_limit(self.gas.as_deref())
    }
}

/// Bind an Aspect to a contract
pub async fn bind_aspect(
    config: &Configuration,
    request: &BindRequest,
) -> Result<TransactionReceipt, AspectError> {
    let (contract, aspect_id) = request.addresses()?;
    let session = Session::new(config)?;

    let data = encode_bind(
        aspect_id,
        contract,
        DEFAULT_ASPECT_VERSION,
        DEFAULT_BIND_PRIORITY,
    );
    let tx = session
        .transaction(config.aspect_registry, data, request.gas_limit())
        .await?;
    session.submit(tx).await
}

/// Remove an Aspect binding from a contract
pub async fn unbind_aspect(
    config: &Configuration,
    request: &BindRequest,
) -> Result<TransactionReceipt, AspectError> {
    let (contract, aspect_id) = request.addresses()?;
    let session = Session::new(config)?;

    let data = encode_unbind(aspect_id, contract);
    let tx = session
        .transaction(config.aspect_core, data, request.gas_limit())
        .await?;
    session.submit(tx).await
}
