//! Aspect lifecycle operations
//!
//! Deploy, bind and unbind flows. Each flow validates its input before
//! touching the node, then builds, signs and submits one transaction.
//!
//! # Example
//!
//! ```rust,no_run
//! use aspect_tool::aspect::{bind_aspect, BindRequest};
//! use aspect_tool::config::ConfigResolver;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigResolver::from_current_dir()?.resolve()?;
//! let request = BindRequest {
//!     contract: "0x2222222222222222222222222222222222222222".to_string(),
//!     aspect_id: "0x1111111111111111111111111111111111111111".to_string(),
//!     gas: None,
//! };
//! let receipt = bind_aspect(&config, &request).await?;
//! println!("bound in {}", receipt.transaction_hash);
//! # Ok(())
//! # }
//! ```

pub mod binding;
pub mod deploy;
pub mod properties;
pub mod session;

pub use binding::{bind_aspect, unbind_aspect, BindRequest};
pub use deploy::{deploy_aspect, DeployOutcome, DeployRequest, DEPLOY_PROOF};
pub use properties::parse_properties;
pub use session::Session;

use crate::core::{InvalidJoinPoint, TransactionError};
use crate::crypto::KeyError;
use crate::rpc::RpcError;
use alloy_primitives::{Address, B256};
use std::path::PathBuf;
use thiserror::Error;

/// Errors from the Aspect flows
#[derive(Error, Debug)]
pub enum AspectError {
    #[error("Invalid join point: {0}")]
    InvalidJoinPoint(String),
    #[error("aspectCode cannot be empty")]
    EmptyCode,
    #[error("Failed to read {}: {source}", .path.display())]
    ReadCode {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid properties: {0}")]
    InvalidProperties(String),
    #[error("Invalid {field} address: {value}")]
    InvalidAddress { field: &'static str, value: String },
    #[error("Key error: {0}")]
    KeyError(#[from] KeyError),
    #[error("Transaction error: {0}")]
    TransactionError(#[from] TransactionError),
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),
    #[error("Receipt of {0} carries no aspectAddress")]
    MissingAspectId(B256),
}

impl From<InvalidJoinPoint> for AspectError {
    fn from(err: InvalidJoinPoint) -> Self {
        AspectError::InvalidJoinPoint(err.0)
    }
}

impl AspectError {
    /// Input rejected before anything was sent
    pub fn is_validation(&self) -> bool {
        matches!(self, AspectError::InvalidJoinPoint(_) | AspectError::EmptyCode)
    }
}

pub(crate) fn parse_address(field: &'static str, value: &str) -> Result<Address, AspectError> {
    value
        .trim()
        .parse()
        .map_err(|_| AspectError::InvalidAddress {
            field,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address() {
        assert_eq!(
            parse_address("contract", " 0x2222222222222222222222222222222222222222 ").unwrap(),
            Address::repeat_byte(0x22)
        );
        assert!(parse_address("contract", "0x22").is_err());
    }

    #[test]
    fn test_validation_errors() {
        assert!(AspectError::from(InvalidJoinPoint("x".to_string())).is_validation());
        assert!(AspectError::EmptyCode.is_validation());
        assert!(!AspectError::InvalidProperties("x".to_string()).is_validation());
    }
}
