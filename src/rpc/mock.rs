//! In-process JSON-RPC node for tests

use crate::core::LegacyTransaction;
use alloy_primitives::{keccak256, Address, Bytes, U256};
use alloy_rlp::{Decodable, Header};
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

pub const MOCK_GAS_PRICE: &str = "0x3b9aca00";
pub const MOCK_CHAIN_ID: u64 = 11820;
pub const MOCK_NONCE: u64 = 5;
pub const MOCK_ASPECT_ID: &str = "0x5555555555555555555555555555555555555555";

#[derive(Default)]
struct Inner {
    requests: Vec<Value>,
    failures: HashMap<String, String>,
    withhold_receipts: bool,
    revert: bool,
}

#[derive(Clone, Default)]
struct MockState(Arc<Mutex<Inner>>);

/// A node answering the `eth_*` calls the CLI makes
pub struct MockNode {
    addr: SocketAddr,
    state: MockState,
}

impl MockNode {
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new()
            .route("/", post(handle))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Methods received so far, in order
    pub fn methods(&self) -> Vec<String> {
        let inner = self.state.0.lock().unwrap();
        inner
            .requests
            .iter()
            .filter_map(|r| r["method"].as_str().map(str::to_string))
            .collect()
    }

    /// Raw transactions submitted so far
    pub fn raw_transactions(&self) -> Vec<Vec<u8>> {
        let inner = self.state.0.lock().unwrap();
        inner
            .requests
            .iter()
            .filter(|r| r["method"] == "eth_sendRawTransaction")
            .filter_map(|r| r["params"][0].as_str())
            .map(|raw| hex::decode(raw.trim_start_matches("0x")).unwrap())
            .collect()
    }

    pub fn fail_method(&self, method: &str, message: &str) {
        let mut inner = self.state.0.lock().unwrap();
        inner
            .failures
            .insert(method.to_string(), message.to_string());
    }

    pub fn withhold_receipts(&self) {
        self.state.0.lock().unwrap().withhold_receipts = true;
    }

    pub fn revert_transactions(&self) {
        self.state.0.lock().unwrap().revert = true;
    }
}

async fn handle(State(state): State<MockState>, Json(request): Json<Value>) -> Json<Value> {
    let mut inner = state.0.lock().unwrap();
    inner.requests.push(request.clone());

    let id = request["id"].clone();
    let method = request["method"].as_str().unwrap_or_default().to_string();

    if let Some(message) = inner.failures.get(&method) {
        return Json(json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": {"code": -32000, "message": message}
        }));
    }

    let status = if inner.revert { "0x0" } else { "0x1" };
    let result = match method.as_str() {
        "eth_gasPrice" => json!(MOCK_GAS_PRICE),
        "eth_chainId" => json!(format!("0x{:x}", MOCK_CHAIN_ID)),
        "eth_getTransactionCount" => json!(format!("0x{:x}", MOCK_NONCE)),
        "eth_sendRawTransaction" => {
            let raw = request["params"][0].as_str().unwrap_or_default();
            let bytes = hex::decode(raw.trim_start_matches("0x")).unwrap_or_default();
            json!(keccak256(bytes))
        }
        "eth_getTransactionReceipt" if inner.withhold_receipts => Value::Null,
        "eth_getTransactionReceipt" => json!({
            "transactionHash": request["params"][0],
            "blockNumber": "0x10",
            "status": status,
            "gasUsed": "0x5208",
            "aspectAddress": MOCK_ASPECT_ID,
            "logs": []
        }),
        _ => Value::Null,
    };

    Json(json!({"jsonrpc": "2.0", "id": id, "result": result}))
}

/// Decode a signed legacy transaction, returning it with its `v` value
pub fn decode_raw_transaction(raw: &[u8]) -> (LegacyTransaction, u64) {
    let mut buf = raw;
    let header = Header::decode(&mut buf).unwrap();
    assert!(header.list);

    let nonce = u64::decode(&mut buf).unwrap();
    let gas_price = U256::decode(&mut buf).unwrap();
    let gas = u64::decode(&mut buf).unwrap();
    let to = Address::decode(&mut buf).unwrap();
    let value = U256::decode(&mut buf).unwrap();
    let data = Bytes::decode(&mut buf).unwrap();
    let v = u64::decode(&mut buf).unwrap();

    let tx = LegacyTransaction {
        nonce,
        gas_price,
        gas,
        to,
        value,
        data,
        chain_id: (v - 35) / 2,
    };
    (tx, v)
}
