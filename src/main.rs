use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use linkpulse::cli::{targets_or_default, CommandLine, Commands};
use linkpulse::{ConsoleReporter, DispatchConfig, Dispatcher, HttpProbe, JsonReporter, Reporter};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .init();

    let commands = CommandLine::parse_args();

    let mut config = match &commands.config {
        Some(path) => DispatchConfig::load(path)?,
        None => DispatchConfig::default(),
    };
    if let Some(ms) = commands.timeout_ms {
        config.probe_timeout_ms = ms;
    }
    if let Some(ms) = commands.wait_ms {
        config.settle_wait_ms = ms;
    }

    let probe = Arc::new(HttpProbe::new(config.probe_timeout())?);
    let reporter: Arc<dyn Reporter> = if commands.json {
        Arc::new(JsonReporter)
    } else {
        Arc::new(ConsoleReporter)
    };
    let dispatcher = Dispatcher::new(config, probe, reporter);

    match commands.command {
        Commands::Run { strategy, urls } => {
            let targets = targets_or_default(urls);
            info!("Running the {} strategy", strategy);
            dispatcher.dispatch(strategy, &targets).await;
        }
        Commands::Compare { urls } => {
            let targets = targets_or_default(urls);
            dispatcher.compare(&targets).await;
        }
    }

    Ok(())
}
