//! Command-line interface definition and evaluation.

use crate::{AppConfig, IOArgs, fixture::Fixture, latest_complete, run_networks};
use clap::{Parser, Subcommand, ValueEnum};
use gfa_core::models::NetworkId;
use gfa_solver::{AnySolver, IntervalOrchestrator, SolverVersion};
use gfa_sqlite::Db;
use std::{io::stdout, path::PathBuf};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::{Level, event};

/// Command-line arguments for the aggregation worker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file.
    #[arg(short, long, env = "GFA_CONFIG")]
    pub config: Option<PathBuf>,

    /// What to do
    #[command(subcommand)]
    pub command: Commands,
}

/// The worker's modes of operation.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Compute and persist a single interval of a network
    Run {
        /// The network to process
        #[arg(short, long, default_value = "NEM")]
        network: String,

        /// The RFC3339 start of the interval (defaults to the latest complete interval)
        #[arg(short, long, value_parser = parse_rfc3339)]
        at: Option<OffsetDateTime>,
    },

    /// Compute and persist the latest complete interval of every network, periodically
    Schedule,

    /// Run the engine over a JSON fixture without touching the database
    Solve {
        #[command(flatten)]
        io: IOArgs,

        /// Override the configured allocation strategy
        #[arg(short, long)]
        solver: Option<SolverArg>,
    },
}

/// The allocation strategies selectable from the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SolverArg {
    /// Flow tracing through intermediate regions
    V2,
    /// Proportional allocation per interconnector
    V3,
}

impl From<SolverArg> for SolverVersion {
    fn from(value: SolverArg) -> Self {
        match value {
            SolverArg::V2 => SolverVersion::V2,
            SolverArg::V3 => SolverVersion::V3,
        }
    }
}

fn parse_rfc3339(value: &str) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(value, &Rfc3339)
}

type Engine = IntervalOrchestrator<Db, Db, AnySolver>;

async fn engine(config: &AppConfig) -> anyhow::Result<Engine> {
    let db = Db::open(&config.database).await?;
    let solver = config.flows.solver.solver();
    Ok(IntervalOrchestrator::new(
        config.flows.clone(),
        config.networks.iter().cloned(),
        db.clone(),
        db,
        solver,
    ))
}

impl Cli {
    /// Parse command-line arguments.
    pub fn import() -> Result<Self, clap::Error> {
        Self::try_parse()
    }
}

impl Commands {
    /// Execute the command with the loaded configuration.
    pub async fn evaluate(self, config: AppConfig) -> anyhow::Result<()> {
        match self {
            Commands::Run { network, at } => {
                let network = NetworkId::from(network);
                let engine = engine(&config).await?;

                let start = match at {
                    Some(at) => at,
                    None => {
                        let Some(settings) = engine.networks().find(|n| n.code == network) else {
                            anyhow::bail!("network {network} is not configured");
                        };
                        latest_complete(
                            OffsetDateTime::now_utc() - config.schedule.lag,
                            settings.interval,
                        )?
                    }
                };

                let summary = engine.run_interval(start, &network).await?;
                serde_json::to_writer_pretty(stdout().lock(), &summary)?;
            }

            Commands::Schedule => {
                let engine = engine(&config).await?;
                if config.schedule.every.is_none() {
                    event!(Level::WARN, "no schedule configured, nothing to do");
                }

                config
                    .schedule
                    .schedule(async |complete: OffsetDateTime| {
                        run_networks(&engine, complete).await;
                        Ok::<(), anyhow::Error>(())
                    })
                    .await?;
            }

            Commands::Solve { io, solver } => {
                let fixture = serde_json::from_reader::<_, Fixture>(io.read()?)?;

                let mut flows = config.flows;
                if let Some(solver) = solver {
                    flows.solver = solver.into();
                }

                let report = fixture.solve(flows).await;
                serde_json::to_writer_pretty(io.write()?, &report)?;
            }
        }

        Ok(())
    }
}
