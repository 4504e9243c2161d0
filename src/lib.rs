//! Aspect tool: compile, deploy and bind Aspects on an Artela-style chain
//!
//! This crate provides:
//! - Project configuration (`aspect.config.json`) resolution
//! - AssemblyScript compilation through an external toolchain
//! - Join point validation and the Aspect system contract ABI
//! - EIP-155 transaction signing (secp256k1)
//! - A minimal JSON-RPC client with receipt polling
//! - Deploy, bind and unbind flows
//!
//! # Example
//!
//! ```rust,no_run
//! use aspect_tool::aspect::{deploy_aspect, DeployRequest};
//! use aspect_tool::config::ConfigResolver;
//! use std::path::PathBuf;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigResolver::from_current_dir()?.resolve()?;
//! let request = DeployRequest {
//!     properties: None,
//!     join_points: Some(vec!["preContractCall".to_string()]),
//!     wasm_path: PathBuf::from("build/index.wasm"),
//!     gas: None,
//! };
//! let outcome = deploy_aspect(&config, &request).await?;
//! println!("Aspect id: {}", outcome.aspect_id);
//! # Ok(())
//! # }
//! ```

pub mod aspect;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod core;
pub mod crypto;
pub mod rpc;

// Re-export commonly used types
pub use aspect::{
    bind_aspect, deploy_aspect, unbind_aspect, AspectError, BindRequest, DeployOutcome,
    DeployRequest,
};
pub use compiler::{CompileError, CompileOutput, CompileRequest, Target, Toolchain};
pub use config::{ConfigError, ConfigResolver, Configuration};
pub use core::{JoinPoint, JoinPoints, LegacyTransaction, ASPECT_SYSTEM_ADDRESS};
pub use crypto::KeyPair;
pub use rpc::{RpcClient, RpcError, TransactionReceipt};
