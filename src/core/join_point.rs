//! Aspect join points
//!
//! A join point is a lifecycle hook an Aspect registers for. On chain the
//! selection travels as a bit mask in the `joinPoints` argument of `deploy`.

use alloy_primitives::U256;
use bitflags::bitflags;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Join point names accepted by the deploy command
pub const VALID_JOIN_POINTS: [&str; 5] = [
    "preContractCall",
    "postContractCall",
    "preTxExecute",
    "postTxExecute",
    "verifyTx",
];

/// Raised for a join point name outside [`VALID_JOIN_POINTS`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid join point: {0}")]
pub struct InvalidJoinPoint(pub String);

/// A single lifecycle hook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinPoint {
    VerifyTx,
    PreTxExecute,
    PreContractCall,
    PostContractCall,
    PostTxExecute,
}

bitflags! {
    /// Join point mask as encoded for the Aspect system contract
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct JoinPoints: u64 {
        const VERIFY_TX = 1;
        const PRE_TX_EXECUTE = 1 << 1;
        const PRE_CONTRACT_CALL = 1 << 2;
        const POST_CONTRACT_CALL = 1 << 3;
        const POST_TX_EXECUTE = 1 << 4;
    }
}

impl JoinPoint {
    /// Name used on the command line and in Aspect manifests
    pub fn name(&self) -> &'static str {
        match self {
            JoinPoint::VerifyTx => "verifyTx",
            JoinPoint::PreTxExecute => "preTxExecute",
            JoinPoint::PreContractCall => "preContractCall",
            JoinPoint::PostContractCall => "postContractCall",
            JoinPoint::PostTxExecute => "postTxExecute",
        }
    }

    /// Mask bit for this join point
    pub fn flag(&self) -> JoinPoints {
        match self {
            JoinPoint::VerifyTx => JoinPoints::VERIFY_TX,
            JoinPoint::PreTxExecute => JoinPoints::PRE_TX_EXECUTE,
            JoinPoint::PreContractCall => JoinPoints::PRE_CONTRACT_CALL,
            JoinPoint::PostContractCall => JoinPoints::POST_CONTRACT_CALL,
            JoinPoint::PostTxExecute => JoinPoints::POST_TX_EXECUTE,
        }
    }
}

impl FromStr for JoinPoint {
    type Err = InvalidJoinPoint;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "verifyTx" => Ok(JoinPoint::VerifyTx),
            "preTxExecute" => Ok(JoinPoint::PreTxExecute),
            "preContractCall" => Ok(JoinPoint::PreContractCall),
            "postContractCall" => Ok(JoinPoint::PostContractCall),
            "postTxExecute" => Ok(JoinPoint::PostTxExecute),
            other => Err(InvalidJoinPoint(other.to_string())),
        }
    }
}

impl fmt::Display for JoinPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl JoinPoints {
    /// Validate names in order, stopping at the first invalid one
    pub fn parse_all<S: AsRef<str>>(names: &[S]) -> Result<Vec<JoinPoint>, InvalidJoinPoint> {
        names.iter().map(|n| n.as_ref().parse()).collect()
    }

    /// Build a mask from validated join points
    pub fn from_points(points: &[JoinPoint]) -> Self {
        points
            .iter()
            .fold(JoinPoints::empty(), |mask, p| mask | p.flag())
    }

    /// Mask as the `uint256` ABI argument
    pub fn to_u256(self) -> U256 {
        U256::from(self.bits())
    }
}
