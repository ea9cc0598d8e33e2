//! # CLI Flow
//!
//! `tipset-scout` command implementations against the fake node.

#[cfg(test)]
mod tests {
    use std::io::{self, Write};
    use std::sync::Arc;
    use std::time::Duration;

    use node_client::{ApiRequest, NodeClientConfig, StreamEnd, StreamingApiClient};
    use parking_lot::Mutex;
    use serde_json::Value;
    use tipset_collector::{CollectorConfig, DecoderTable, NodeChainSource, TipsetCollector};
    use tipset_scout::{commands, OutputFormat};

    use crate::fixtures::{spawn_fake_node, ChainFixture};
    use crate::integration::guarded;

    /// Writer shared with the test after being moved into a stream task.
    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn chain() -> ChainFixture {
        ChainFixture::with_heads(&["A"])
            .tipset("A", 10, &["B"])
            .tipset("B", 9, &["C", "D"])
            .tipset("C", 9, &["E"])
            .tipset("D", 8, &[])
            .tipset("E", 7, &["F"])
    }

    async fn setup() -> (StreamingApiClient, TipsetCollector<NodeChainSource>) {
        let node = spawn_fake_node(chain()).await;
        let client = StreamingApiClient::new(NodeClientConfig::for_testing(&node.url)).unwrap();
        let config = CollectorConfig::default();
        let source = NodeChainSource::new(client.clone(), &config);
        let collector =
            TipsetCollector::new(config, Arc::new(source), Arc::new(DecoderTable::new())).unwrap();
        (client, collector)
    }

    #[tokio::test]
    async fn test_collect_command_prints_json() {
        let (_, collector) = setup().await;
        let mut out = Vec::new();

        let n = guarded(commands::collect(&collector, 0, OutputFormat::Json, &mut out))
            .await
            .unwrap();
        assert_eq!(n, 2);

        let printed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed[0]["tipsetHash"], "D");
        assert_eq!(printed[1]["height"], 7);
    }

    #[tokio::test]
    async fn test_heads_command() {
        let (_, collector) = setup().await;
        let mut out = Vec::new();
        guarded(commands::heads(&collector, &mut out)).await.unwrap();
        let printed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed, serde_json::json!(["A"]));
    }

    #[tokio::test]
    async fn test_stream_command_honors_limit() {
        let (client, _) = setup().await;
        let buffer = SharedBuffer::default();

        let summary = guarded(commands::stream(
            &client,
            ApiRequest::new("chain", "ls"),
            Some(3),
            Some(Duration::from_secs(5)),
            buffer.clone(),
        ))
        .await
        .unwrap();

        assert_eq!(summary.end, StreamEnd::Stopped);
        assert_eq!(summary.delivered, 3);
        let text = String::from_utf8(buffer.0.lock().clone()).unwrap();
        assert_eq!(text.lines().count(), 3);
    }
}
