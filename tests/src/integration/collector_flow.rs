//! # Collector Flow
//!
//! `TipsetCollector` over `NodeChainSource` over `StreamingApiClient`,
//! talking HTTP to the fake node.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use node_client::{NodeClientConfig, StreamingApiClient};
    use serde_json::json;
    use tipset_collector::{
        invariant_fetched_once, Block, CollectorConfig, CollectorError, DecoderTable, NodeChainSource,
        Params, TipsetCollector, TipsetCollectorApi,
    };

    use crate::fixtures::{raw_message, spawn_fake_node, ChainFixture, FakeNode};
    use crate::integration::guarded;

    fn decoders() -> DecoderTable {
        DecoderTable::new().with("knownMethod", |p| json!({ "hex": p, "bytes": (p.len() - 2) / 2 }))
    }

    async fn collector_for(chain: ChainFixture) -> (TipsetCollector<NodeChainSource>, FakeNode) {
        let node = spawn_fake_node(chain).await;
        let client = StreamingApiClient::new(NodeClientConfig::for_testing(&node.url)).unwrap();
        let config = CollectorConfig::default();
        let source = NodeChainSource::new(client, &config);
        let collector = TipsetCollector::new(config, Arc::new(source), Arc::new(decoders())).unwrap();
        (collector, node)
    }

    /// Heights first seen as 10, 9, 8, 7; D carries two messages.
    fn forked_chain() -> ChainFixture {
        ChainFixture::with_heads(&["A"])
            .tipset("A", 10, &["B"])
            .tipset("B", 9, &["C", "D"])
            .tipset("C", 9, &["E"])
            .tipset_with_messages(
                "D",
                8,
                &[],
                vec![
                    raw_message("knownMethod", Some("0xAB"), Some("1000"), 1),
                    raw_message("otherMethod", Some("0xCD"), None, 2),
                ],
            )
            .tipset("E", 7, &["F"])
            .tipset("F", 6, &[])
    }

    fn cids(blocks: &[Block]) -> Vec<&str> {
        blocks.iter().map(|b| b.tipset_hash.as_str()).collect()
    }

    #[tokio::test]
    async fn test_collect_returns_stable_batch() {
        let (collector, node) = collector_for(forked_chain()).await;

        let blocks = guarded(collector.collect(0)).await.unwrap();
        assert_eq!(cids(&blocks), vec!["D", "E"]);
        assert_eq!(node.block_requests(), vec!["A", "B", "C", "D", "E"]);
    }

    #[tokio::test]
    async fn test_messages_inflated_with_decoders() {
        let (collector, _node) = collector_for(forked_chain()).await;

        let blocks = guarded(collector.collect(0)).await.unwrap();
        let d = &blocks[0];
        assert_eq!(d.parent_weight.as_u64(), 8000);
        assert_eq!(d.messages.len(), 2);

        let known = &d.messages[0];
        assert_eq!(known.index, 0);
        assert_eq!(known.height, 8);
        assert_eq!(known.params, Some(Params::Decoded(json!({"hex": "0xAB", "bytes": 1}))));
        assert_eq!(known.value.map(|v| v.to_string()), Some("1000".to_string()));
        assert_eq!(known.gas_price.to_string(), "0.0000001");

        let other = &d.messages[1];
        assert_eq!(other.index, 1);
        assert_eq!(other.params, Some(Params::Raw("0xCD".to_string())));
        assert_eq!(other.value, None);
        assert_eq!(other.nonce, 2);
    }

    #[tokio::test]
    async fn test_wide_fork_fetches_each_tipset_once() {
        let (collector, node) = collector_for(ChainFixture::forked(2, 6, 50)).await;

        let blocks = guarded(collector.collect(0)).await.unwrap();
        let requests = node.block_requests();
        assert!(invariant_fetched_once(&requests));

        // Discoveries: 2 at 49, 2 at 48, then 2 at 47 crosses the bound
        // while 48-0 is being processed.
        assert_eq!(requests.len(), 5);
        assert!(blocks.iter().all(|b| b.height <= 48));
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].height, 48);
    }

    #[tokio::test]
    async fn test_floor_excludes_old_tipsets() {
        let chain = ChainFixture::with_heads(&["A", "X"])
            .tipset("A", 10, &["B"])
            .tipset("X", 3, &["Y"])
            .tipset("B", 9, &["C", "D"])
            .tipset("C", 9, &["E"])
            .tipset("D", 8, &[])
            .tipset("E", 7, &["F"]);
        let (collector, node) = collector_for(chain).await;

        let blocks = guarded(collector.collect(5)).await.unwrap();
        assert!(blocks.iter().all(|b| b.height > 5));
        assert!(!node.block_requests().contains(&"Y".to_string()));
    }

    #[tokio::test]
    async fn test_shallow_chain_is_empty_not_error() {
        let chain = ChainFixture::with_heads(&["A"]).tipset("A", 10, &["B", "C", "D", "E", "F"]);
        let (collector, _node) = collector_for(chain).await;
        assert!(guarded(collector.collect(0)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_frontier_exhausted_over_http() {
        let (collector, _node) = collector_for(forked_chain()).await;
        let err = guarded(collector.collect(7)).await.unwrap_err();
        assert!(matches!(
            err,
            CollectorError::FrontierExhausted {
                discovered: 4,
                bound: 5,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_unknown_tipset_is_transport_error() {
        let chain = ChainFixture::with_heads(&["A"]).tipset("A", 10, &["missing"]);
        let (collector, _node) = collector_for(chain).await;

        let err = guarded(collector.collect(0)).await.unwrap_err();
        assert!(err.is_transport());
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_malformed_tipset_is_decode_error() {
        let chain = forked_chain().insert_raw("C", json!({"Header": {"height": "nine"}}));
        let (collector, _node) = collector_for(chain).await;

        let err = guarded(collector.collect(0)).await.unwrap_err();
        assert!(err.is_decode());
        assert!(err.to_string().contains("tipset C"));
    }

    #[tokio::test]
    async fn test_unreachable_node_is_transport_error() {
        let client = StreamingApiClient::new(NodeClientConfig::for_testing("http://127.0.0.1:1")).unwrap();
        let config = CollectorConfig::default();
        let source = NodeChainSource::new(client, &config);
        let collector = TipsetCollector::new(config, Arc::new(source), Arc::new(decoders())).unwrap();

        let err = guarded(collector.collect(0)).await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn test_concurrent_collections_are_independent() {
        let (collector, node) = collector_for(forked_chain()).await;
        let collector = Arc::new(collector);

        let (a, b) = guarded(async { tokio::join!(collector.collect(0), collector.collect(0)) }).await;
        assert_eq!(cids(&a.unwrap()), vec!["D", "E"]);
        assert_eq!(cids(&b.unwrap()), vec!["D", "E"]);
        assert_eq!(node.block_requests().len(), 10);
    }
}
