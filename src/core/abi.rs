//! Aspect system contract interface
//!
//! Call data builders for the aspect-core contract that handles deployment
//! and contract bindings.

use alloy_primitives::{address, Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};

use super::join_point::JoinPoints;

/// Well-known address of the Aspect system contract
pub const ASPECT_SYSTEM_ADDRESS: Address = address!("0000000000000000000000000000000000A27E14");

/// Binding priority used by the bind command
pub const DEFAULT_BIND_PRIORITY: i8 = 1;

/// Aspect version used by the bind command
pub const DEFAULT_ASPECT_VERSION: u64 = 1;

sol! {
    struct KVPair {
        string key;
        bytes value;
    }

    interface IAspectCore {
        function deploy(bytes code, KVPair[] initdata, address account, bytes proof, uint256 joinPoints) external;
        function bind(address aspectId, uint256 aspectVersion, address contractAddress, int8 priority) external;
        function unbind(address aspectId, address contractAddress) external;
    }
}

/// Arguments of a deploy call
#[derive(Debug, Clone)]
pub struct DeployPayload {
    pub code: Vec<u8>,
    pub properties: Vec<(String, Vec<u8>)>,
    pub paymaster: Address,
    pub proof: Vec<u8>,
    pub join_points: JoinPoints,
}

impl DeployPayload {
    /// ABI-encoded `deploy` call data
    pub fn encode(&self) -> Vec<u8> {
        let initdata = self
            .properties
            .iter()
            .map(|(key, value)| KVPair {
                key: key.clone(),
                value: Bytes::from(value.clone()),
            })
            .collect();

        IAspectCore::deployCall {
            code: Bytes::from(self.code.clone()),
            initdata,
            account: self.paymaster,
            proof: Bytes::from(self.proof.clone()),
            joinPoints: self.join_points.to_u256(),
        }
        .abi_encode()
    }
}

/// ABI-encoded `bind` call data
pub fn encode_bind(aspect_id: Address, contract: Address, version: u64, priority: i8) -> Vec<u8> {
    IAspectCore::bindCall {
        aspectId: aspect_id,
        aspectVersion: U256::from(version),
        contractAddress: contract,
        priority,
    }
    .abi_encode()
}

/// ABI-encoded `unbind` call data
pub fn encode_unbind(aspect_id: Address, contract: Address) -> Vec<u8> {
    IAspectCore::unbindCall {
        aspectId: aspect_id,
        contractAddress: contract,
    }
    .abi_encode()
}
