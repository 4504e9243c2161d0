//! Aspect deployment
//!
//! Validates the request locally, then sends a `deploy` call to the Aspect
//! registry and reads the new Aspect id from the receipt.

use super::properties::parse_properties;
use super::session::Session;
use super::AspectError;
use crate::config::Configuration;
use crate::core::{parse_gas_limit, DeployPayload, JoinPoints};
use crate::rpc::TransactionReceipt;
use alloy_primitives::Address;
use std::fs;
use std::path::PathBuf;

/// Placeholder proof accepted by the Aspect system contract
pub const DEPLOY_PROOF: [u8; 1] = [0x00];

/// Arguments of `aspect deploy`
#[derive(Debug, Clone, Default)]
pub struct DeployRequest {
    /// JSON array of `{key, value}` objects
    pub properties: Option<String>,
    pub join_points: Option<Vec<String>>,
    pub wasm_path: PathBuf,
    pub gas: Option<String>,
}

/// Result of a successful deployment
#[derive(Debug, Clone)]
pub struct DeployOutcome {
    pub aspect_id: Address,
    pub receipt: TransactionReceipt,
}

impl DeployRequest {
    /// Validate inputs and build the call payload.
    ///
    /// Properties are parsed first, then join points are checked in order,
    /// then the compiled binary is read. Nothing here touches the network.
    pub fn prepare(&self, paymaster: Address) -> Result<DeployPayload, AspectError> {
        let properties = parse_properties(self.properties.as_deref())?;

        let names = self.join_points.clone().unwrap_or_default();
        let points = JoinPoints::parse_all(&names)?;

        let code = fs::read(&self.wasm_path).map_err(|source| AspectError::ReadCode {
            path: self.wasm_path.clone(),
            source,
        })?;
        if code.is_empty() {
            return Err(AspectError::EmptyCode);
        }
        log::debug!(
            "aspect code 0x{}... ({} bytes)",
            hex::encode(&code[..code.len().min(8)]),
            code.len()
        );

        Ok(DeployPayload {
            code,
            properties,
            paymaster,
            proof: DEPLOY_PROOF.to_vec(),
            join_points: JoinPoints::from_points(&points),
        })
    }

    pub fn gas_limit(&self) -> u64 {
        parse_gas_limit(self.gas.as_deref())
    }
}

/// Deploy an Aspect and return its id
pub async fn deploy_aspect(
    config: &Configuration,
    request: &DeployRequest,
) -> Result<DeployOutcome, AspectError> {
    let session = Session::new(config)?;
    let payload = request.prepare(session.sender())?;

    let tx = session
        .transaction(config.aspect_registry, payload.encode(), request.gas_limit())
        .await?;
    let receipt = session.submit(tx).await?;

    let aspect_id = receipt
        .aspect_address
        .ok_or(AspectError::MissingAspectId(receipt.transaction_hash))?;

    Ok(DeployOutcome { aspect_id, receipt })
}
