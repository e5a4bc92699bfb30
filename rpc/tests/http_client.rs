//! HttpMessenger against an in-process JSON-RPC node.

use axum::{extract::State, routing::post, Json, Router};
use serde_json::{json, Value};
use shardblast_rpc::{fetch_balances, HttpMessenger, NodeRpc, RpcError};
use shardblast_types::{Address, BaseAmount, ReceiptRef};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct MockNode {
    seen: Arc<Mutex<Vec<(String, Value)>>>,
}

async fn handle(State(node): State<MockNode>, Json(req): Json<Value>) -> Json<Value> {
    let method = req["method"].as_str().unwrap_or_default().to_string();
    let params = req["params"].clone();
    node.seen.lock().unwrap().push((method.clone(), params.clone()));

    let id = req["id"].clone();
    let reply = match method.as_str() {
        "hmy_getTransactionCount" => json!({"jsonrpc": "2.0", "id": id, "result": "0x2a"}),
        "hmy_sendRawTransaction" => {
            if params[0] == "0xbad" {
                json!({"jsonrpc": "2.0", "id": id, "error": {"code": -32000, "message": "nonce too low"}})
            } else {
                json!({"jsonrpc": "2.0", "id": id, "result": "0xabc123"})
            }
        }
        "hmy_getBalance" => json!({"jsonrpc": "2.0", "id": id, "result": "0x3b9aca00"}),
        "hmy_getNodeMetadata" => {
            json!({"jsonrpc": "2.0", "id": id, "result": {"shard-id": 2, "network": "devnet"}})
        }
        "hmy_getTransactionReceipt" => json!({"jsonrpc": "2.0", "id": id, "result": null}),
        _ => json!({"jsonrpc": "2.0", "id": id}),
    };
    Json(reply)
}

async fn spawn_node() -> (String, MockNode) {
    let node = MockNode::default();
    let app = Router::new()
        .route("/", post(handle))
        .with_state(node.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), node)
}

fn sender() -> Address {
    Address::parse("one1sender").unwrap()
}

#[tokio::test]
async fn next_nonce_sends_latest_tag() {
    let (url, node) = spawn_node().await;
    let rpc = HttpMessenger::new(&url).unwrap();

    assert_eq!(rpc.next_nonce(&sender()).await.unwrap(), 42);

    let seen = node.seen.lock().unwrap();
    assert_eq!(seen[0].0, "hmy_getTransactionCount");
    assert_eq!(seen[0].1, json!(["one1sender", "latest"]));
}

#[tokio::test]
async fn send_returns_receipt_reference() {
    let (url, _node) = spawn_node().await;
    let rpc = HttpMessenger::new(&url).unwrap();

    let receipt = rpc.send_raw_transaction("0x00ff").await.unwrap();
    assert_eq!(receipt, ReceiptRef::new("0xabc123"));
}

#[tokio::test]
async fn node_error_object_is_surfaced() {
    let (url, _node) = spawn_node().await;
    let rpc = HttpMessenger::new(&url).unwrap();

    match rpc.send_raw_transaction("0xbad").await {
        Err(RpcError::Node { code, message }) => {
            assert_eq!(code, -32000);
            assert_eq!(message, "nonce too low");
        }
        other => panic!("expected node error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_result_is_invalid_response() {
    let (url, _node) = spawn_node().await;
    let rpc = HttpMessenger::new(&url).unwrap();

    let err = rpc.call("hmy_unknown", json!([])).await.unwrap_err();
    assert!(matches!(err, RpcError::InvalidResponse { .. }));
}

#[tokio::test]
async fn pending_receipt_is_none() {
    let (url, _node) = spawn_node().await;
    let rpc = HttpMessenger::new(&url).unwrap();

    let receipt = rpc
        .transaction_receipt(&ReceiptRef::new("0xabc123"))
        .await
        .unwrap();
    assert!(receipt.is_none());
}

#[tokio::test]
async fn balances_from_ip_endpoint_use_node_shard() {
    let (url, _node) = spawn_node().await;

    let balances = fetch_balances(&url, &sender()).await.unwrap();
    assert_eq!(balances.len(), 1);
    assert_eq!(balances[0].shard, 2);
    assert_eq!(balances[0].amount, BaseAmount::new(1_000_000_000).to_string());
}

#[tokio::test]
async fn unreachable_node_is_transport_error() {
    let rpc = HttpMessenger::new("http://127.0.0.1:1").unwrap();
    let err = rpc.next_nonce(&sender()).await.unwrap_err();
    assert!(matches!(err, RpcError::Transport(_)));
}
