//! Subcommand implementations, written against the collector API so they
//! can run over any chain source.

use std::io::Write;
use std::time::Duration;

use anyhow::Context;
use node_client::{ApiRequest, ProcessorError, StreamControl, StreamSummary, StreamingApiClient};
use serde_json::Value;
use tipset_collector::{HeadReference, TipsetCollectorApi};
use tracing::{info, warn};

use crate::output::{self, OutputFormat};

/// Collect the stable batch above `floor` and print it.
pub async fn collect<C, W>(collector: &C, floor: u64, format: OutputFormat, out: &mut W) -> anyhow::Result<usize>
where
    C: TipsetCollectorApi + ?Sized,
    W: Write,
{
    let blocks = collector
        .collect(floor)
        .await
        .with_context(|| format!("collecting tipsets above height {}", floor))?;
    output::write_blocks(out, &blocks, format)?;
    Ok(blocks.len())
}

/// Print the node's current heads.
pub async fn heads<C, W>(collector: &C, out: &mut W) -> anyhow::Result<usize>
where
    C: TipsetCollectorApi + ?Sized,
    W: Write,
{
    let heads = collector.heads().await.context("fetching chain heads")?;
    output::write_json(out, &heads)?;
    Ok(heads.len())
}

/// Fetch one tipset and print it.
pub async fn block<C, W>(collector: &C, cid: &str, format: OutputFormat, out: &mut W) -> anyhow::Result<()>
where
    C: TipsetCollectorApi + ?Sized,
    W: Write,
{
    let block = collector
        .fetch_block(&HeadReference::new(cid))
        .await
        .with_context(|| format!("fetching tipset {}", cid))?;
    output::write_blocks(out, std::slice::from_ref(&block), format)?;
    Ok(())
}

/// Stream `request`, printing each item as one JSON line.
///
/// Stops after `limit` items. With a timeout, the stream is cancelled when
/// the timer fires and still settles through the normal path.
pub async fn stream<W>(
    client: &StreamingApiClient,
    request: ApiRequest,
    limit: Option<usize>,
    timeout: Option<Duration>,
    mut out: W,
) -> anyhow::Result<StreamSummary>
where
    W: Write + Send + 'static,
{
    let mut printed = 0usize;
    let subscription = client.spawn_streaming(request, move |item: Value| {
        output::write_line(&mut out, &item).map_err(ProcessorError::new)?;
        printed += 1;
        Ok(StreamControl::from(limit.map_or(true, |max| printed < max)))
    });

    if let Some(after) = timeout {
        let token = subscription.cancellation_token();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            if !token.is_cancelled() {
                warn!(timeout_secs = after.as_secs(), "stream timed out, cancelling");
                token.cancel();
            }
        });
    }

    let summary = subscription.settled().await.context("streaming from node")?;
    info!(delivered = summary.delivered, end = ?summary.end, "stream settled");
    Ok(summary)
}
