//! Node Chain Source Adapter
//!
//! Implements the `ChainSource` port over the node's HTTP API.

use async_trait::async_trait;
use node_client::StreamingApiClient;
use tracing::debug;

use crate::config::CollectorConfig;
use crate::domain::wire::{CidLink, RawBlock};
use crate::domain::{CollectorError, HeadReference};
use crate::ports::outbound::ChainSource;

/// Chain source backed by a remote node.
#[derive(Clone, Debug)]
pub struct NodeChainSource {
    client: StreamingApiClient,
    heads_path: String,
    block_path: String,
}

impl NodeChainSource {
    /// Create a source using the endpoint paths from `config`.
    pub fn new(client: StreamingApiClient, config: &CollectorConfig) -> Self {
        Self {
            client,
            heads_path: config.heads_path.clone(),
            block_path: config.block_path.trim_end_matches('/').to_string(),
        }
    }

    /// Underlying API client.
    pub fn client(&self) -> &StreamingApiClient {
        &self.client
    }

    fn block_path_for(&self, tipset_hash: &HeadReference) -> String {
        format!("{}/{}", self.block_path, tipset_hash)
    }
}

#[async_trait]
impl ChainSource for NodeChainSource {
    async fn chain_heads(&self) -> Result<Vec<HeadReference>, CollectorError> {
        let links: Vec<CidLink> = self.client.get_json(&self.heads_path).await?;
        debug!("[collector] node reported {} heads", links.len());
        Ok(links.into_iter().map(|l| HeadReference::new(l.cid)).collect())
    }

    async fn raw_block(&self, tipset_hash: &HeadReference) -> Result<RawBlock, CollectorError> {
        let path = self.block_path_for(tipset_hash);
        Ok(self.client.get_json(&path).await?)
    }

    fn source_id(&self) -> &str {
        &self.client.config().base_url
    }
}
