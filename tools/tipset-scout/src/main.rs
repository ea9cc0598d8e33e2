//! Tipset Scout CLI.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use node_client::{ApiRequest, StreamingApiClient};
use scout_telemetry::{init_telemetry, TelemetryConfig};
use tipset_collector::{DecoderTable, NodeChainSource, TipsetCollector};
use tracing::Instrument;

use tipset_scout::{commands, Args, Command, ScoutConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut telemetry = TelemetryConfig::from_env();
    if args.verbose {
        telemetry = telemetry.with_log_level("debug");
    }
    init_telemetry(&telemetry)?;

    let span = tracing::info_span!("tipset-scout", service = %telemetry.service_name);
    run(args).instrument(span).await
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = ScoutConfig::resolve(&args)?;
    let client = StreamingApiClient::new(config.node.clone())?;

    match args.command {
        Command::Stream {
            service,
            method,
            args: positional,
            options,
            limit,
            timeout_secs,
        } => {
            let mut request = ApiRequest::new(service, method).args(positional);
            request.options = options;
            let timeout = timeout_secs.map(Duration::from_secs);
            commands::stream(&client, request, limit, timeout, io::stdout()).await?;
        }
        Command::Collect { floor, format, .. } => {
            let collector = build_collector(client, &config)?;
            commands::collect(&collector, floor, format, &mut io::stdout().lock()).await?;
        }
        Command::Heads => {
            let collector = build_collector(client, &config)?;
            commands::heads(&collector, &mut io::stdout().lock()).await?;
        }
        Command::Block { cid, format } => {
            let collector = build_collector(client, &config)?;
            commands::block(&collector, &cid, format, &mut io::stdout().lock()).await?;
        }
    }
    Ok(())
}

fn build_collector(
    client: StreamingApiClient,
    config: &ScoutConfig,
) -> anyhow::Result<TipsetCollector<NodeChainSource>> {
    let source = NodeChainSource::new(client, &config.collector);
    Ok(TipsetCollector::new(
        config.collector.clone(),
        Arc::new(source),
        Arc::new(DecoderTable::new()),
    )?)
}
