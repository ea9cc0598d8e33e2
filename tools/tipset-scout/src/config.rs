//! Tool configuration: optional JSON file, then flags and environment.

use std::fs;
use std::path::Path;

use anyhow::Context;
use node_client::NodeClientConfig;
use serde::{Deserialize, Serialize};
use tipset_collector::CollectorConfig;

use crate::cli::{Args, Command};

/// Combined configuration for one run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    /// Node connection settings.
    pub node: NodeClientConfig,
    /// Traversal settings.
    pub collector: CollectorConfig,
}

impl ScoutConfig {
    /// Read a JSON config file. Missing sections and fields keep defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Parse configuration from JSON text.
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Configuration for `args`: file first, command line on top.
    pub fn resolve(args: &Args) -> anyhow::Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply(args);
        config
            .collector
            .validate()
            .context("invalid collector configuration")?;
        config.node.validate().context("invalid node configuration")?;
        Ok(config)
    }

    fn apply(&mut self, args: &Args) {
        if let Some(node) = &args.node {
            self.node.base_url = node.clone();
        }
        if let Command::Collect {
            discovery_bound: Some(bound),
            ..
        } = &args.command
        {
            self.collector.discovery_bound = *bound;
        }
    }
}
