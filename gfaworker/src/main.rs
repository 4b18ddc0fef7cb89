use gfaworker::{AppConfig, Cli};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // By convention, we leverage `tracing` to instrument and log the stages of
    // every interval. Events go to stderr so they never mix with the JSON
    // written to stdout.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::import()?;
    let config = AppConfig::load(&cli)?;

    cli.command.evaluate(config).await
}
