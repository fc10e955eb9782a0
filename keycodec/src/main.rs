use clap::Parser;
use keycodec::cli::{Cli, run};
use keycodec::config::ToolConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "keycodec=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match ToolConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(2);
        }
    };
    tracing::debug!(
        "Loaded configuration: default_key_type={}, hex_uppercase={}",
        config.default_key_type,
        config.hex_uppercase
    );

    let cli = Cli::parse();
    match run(&cli.command, &config) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    }
}
