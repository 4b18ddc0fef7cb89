//! Application configuration management.
//!
//! This module handles loading and merging configuration from multiple sources
//! with a clear precedence order. Configuration can come from default values,
//! configuration files, and environment variables.

use crate::{Cli, schedule::Scheduler};
use gfa_core::models::NetworkConfig;
use gfa_solver::FlowConfig;
use gfa_sqlite::config::SqliteConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The main application configuration that composes all component configs
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Database configuration (path, creation, pool bounds)
    #[serde(default)]
    pub database: SqliteConfig,

    /// Allocation engine configuration (tolerance, strategy, timeouts, etc.)
    #[serde(default)]
    pub flows: FlowConfig,

    /// The networks the worker processes
    #[serde(default = "default_networks")]
    pub networks: Vec<NetworkConfig>,

    /// Periodic run configuration
    #[serde(default)]
    pub schedule: Scheduler,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: SqliteConfig::default(),
            flows: FlowConfig::default(),
            networks: default_networks(),
            schedule: Scheduler::default(),
        }
    }
}

fn default_networks() -> Vec<NetworkConfig> {
    vec![NetworkConfig {
        code: "NEM".into(),
        regions: ["NSW1", "QLD1", "SA1", "TAS1", "VIC1"]
            .into_iter()
            .map(Into::into)
            .collect(),
        interconnectors: true,
        interval: Duration::from_secs(300),
    }]
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest priority)
    /// 2. Config file given by the CLI
    /// 3. Default values (lowest priority)
    ///
    /// Environment variables are mapped using the pattern:
    /// `GFA_<SECTION>__<KEY>` maps to `<section>.<key>`
    ///
    /// # Examples
    ///
    /// ```bash
    /// # Persist to a database file
    /// export GFA_DATABASE__DATABASE_PATH="/data/aggregates.db"
    ///
    /// # Select the flow-tracing strategy
    /// export GFA_FLOWS__SOLVER="v2"
    ///
    /// # Recompute every five minutes
    /// export GFA_SCHEDULE__EVERY="5m"
    /// ```
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        // Start with default values
        config = config.add_source(config::Config::try_from(&Self::default())?);

        // Layer on config file if it is specified and exists
        if let Some(path) = &cli.config {
            if path.exists() {
                config = config.add_source(config::File::from(path.as_path()))
            } else {
                return Err(anyhow::anyhow!(
                    "Config file {} does not exist",
                    path.display()
                ));
            }
        }

        // Override with environment variables
        // This maps GFA_FLOWS__TOLERANCE to flows.tolerance
        config = config.add_source(
            config::Environment::with_prefix("GFA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let built_config = config.build()?;
        built_config.try_deserialize().map_err(Into::into)
    }
}
