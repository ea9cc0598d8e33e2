//! # Test Fixtures
//!
//! Synthetic chains and an in-process node serving them over HTTP.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Heads plus raw tipset documents, keyed by identifier.
#[derive(Clone, Debug, Default)]
pub struct ChainFixture {
    /// Identifiers returned by `chain/head`.
    pub heads: Vec<String>,
    /// Raw `show/block` bodies.
    pub blocks: HashMap<String, Value>,
    /// Insertion order, newest first, for streaming listings.
    pub order: Vec<String>,
}

impl ChainFixture {
    /// Empty chain with the given heads.
    pub fn with_heads(heads: &[&str]) -> Self {
        Self {
            heads: heads.iter().map(|h| h.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Add a tipset without messages.
    pub fn tipset(self, cid: &str, height: u64, parents: &[&str]) -> Self {
        self.tipset_with_messages(cid, height, parents, Vec::new())
    }

    /// Add a tipset carrying `messages`.
    pub fn tipset_with_messages(mut self, cid: &str, height: u64, parents: &[&str], messages: Vec<Value>) -> Self {
        let parents: Vec<Value> = parents.iter().map(|p| json!({ "/": p })).collect();
        let doc = json!({
            "Header": {
                "height": height.to_string(),
                "parents": parents,
                "miner": format!("t0{}", 1000 + height),
                "parentWeight": (height * 1000).to_string()
            },
            "Messages": messages
        });
        self.insert_raw(cid, doc)
    }

    /// Add an arbitrary raw document.
    pub fn insert_raw(mut self, cid: &str, doc: Value) -> Self {
        self.blocks.insert(cid.to_string(), doc);
        self.order.push(cid.to_string());
        self
    }

    /// `depth` heights below `top`, each holding `width` sibling tipsets that
    /// all point at every sibling one height down.
    pub fn forked(width: usize, depth: u64, top: u64) -> Self {
        let name = |h: u64, i: usize| format!("bafy-{}-{}", h, i);
        let heads: Vec<String> = (0..width).map(|i| name(top, i)).collect();
        let mut fixture = Self {
            heads,
            ..Default::default()
        };

        for level in 0..depth {
            let height = top - level;
            let parents: Vec<String> = if level + 1 < depth {
                (0..width).map(|i| name(height - 1, i)).collect()
            } else {
                Vec::new()
            };
            let parent_refs: Vec<&str> = parents.iter().map(String::as_str).collect();
            for i in 0..width {
                fixture = fixture.tipset(&name(height, i), height, &parent_refs);
            }
        }
        fixture
    }
}

/// Raw message entry as the node encodes it.
pub fn raw_message(method: &str, params: Option<&str>, value: Option<&str>, nonce: u64) -> Value {
    json!({
        "meteredMessage": {
            "gasPrice": "0.0000001",
            "gasLimit": "2500000",
            "message": {
                "from": "t1sender",
                "to": "t1receiver",
                "value": value,
                "method": method,
                "params": params,
                "nonce": nonce.to_string()
            }
        }
    })
}

/// Handle to a running fake node.
#[derive(Clone)]
pub struct FakeNode {
    /// Base URL, e.g. `http://127.0.0.1:41234`.
    pub url: String,
    state: Arc<NodeState>,
}

impl FakeNode {
    /// Tipset identifiers requested through `show/block`, in order.
    pub fn block_requests(&self) -> Vec<String> {
        self.state.block_requests.lock().clone()
    }
}

struct NodeState {
    chain: ChainFixture,
    block_requests: Mutex<Vec<String>>,
}

/// Serve `chain` on an ephemeral local port.
///
/// Routes:
/// - `POST /api/chain/head` - head links
/// - `POST /api/show/block/:cid` - one raw tipset, 404 if unknown
/// - `POST /api/chain/ls` - every tipset as NDJSON, newest first
pub async fn spawn_fake_node(chain: ChainFixture) -> FakeNode {
    let state = Arc::new(NodeState {
        chain,
        block_requests: Mutex::new(Vec::new()),
    });

    let app = Router::new()
        .route("/api/chain/head", post(heads))
        .route("/api/show/block/:cid", post(show_block))
        .route("/api/chain/ls", post(list_chain))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fake node");
    let addr = listener.local_addr().expect("fake node address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake node crashed");
    });

    FakeNode {
        url: format!("http://{}", addr),
        state,
    }
}

async fn heads(State(state): State<Arc<NodeState>>) -> Json<Value> {
    let links: Vec<Value> = state.chain.heads.iter().map(|h| json!({ "/": h })).collect();
    Json(Value::Array(links))
}

async fn show_block(State(state): State<Arc<NodeState>>, Path(cid): Path<String>) -> Response {
    state.block_requests.lock().push(cid.clone());
    match state.chain.blocks.get(&cid) {
        Some(doc) => Json(doc.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, format!("no tipset {}", cid)).into_response(),
    }
}

async fn list_chain(State(state): State<Arc<NodeState>>) -> Response {
    let lines: String = state
        .chain
        .order
        .iter()
        .filter_map(|cid| state.chain.blocks.get(cid))
        .map(|doc| format!("{}\n", doc))
        .collect();
    Body::from(lines).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forked_fixture_shape() {
        let chain = ChainFixture::forked(3, 4, 100);
        assert_eq!(chain.heads.len(), 3);
        assert_eq!(chain.blocks.len(), 12);
        let top = &chain.blocks["bafy-100-0"];
        assert_eq!(top["Header"]["height"], "100");
        assert_eq!(top["Header"]["parents"].as_array().unwrap().len(), 3);
        assert!(chain.blocks["bafy-97-2"]["Header"]["parents"].as_array().unwrap().is_empty());
    }
}
