mod api;
mod cli;
mod config;
mod error;
mod model;
mod session;
mod store;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();

    // No subcommand means serve with defaults
    let command = cli.command.unwrap_or(Commands::Serve {
        port: None,
        host: None,
        no_open: false,
    });

    match command {
        Commands::Serve {
            port,
            host,
            no_open,
        } => {
            let config = config::load_config();
            let port = port.or(config.web.port).unwrap_or(cli::web::DEFAULT_PORT);
            let host = host
                .or(config.web.host)
                .unwrap_or_else(|| cli::web::DEFAULT_HOST.to_string());

            tokio::runtime::Runtime::new()
                .expect("Failed to create tokio runtime")
                .block_on(async {
                    cli::web::execute(host, port, no_open).await;
                });
        }
    }
}
