//! CLI entry point - the composition root.
//!
//! Command dispatch routes to handlers; all wiring of the environment
//! snapshot, upstream client, and server happens behind them.

use clap::Parser;

use modelgate_cli::{Cli, Commands, handlers};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // No command runs the server with defaults, so the binary works as a
    // container entry point
    let Some(command) = cli.command else {
        return handlers::serve::execute(handlers::serve::ServeArgs::default()).await;
    };

    match command {
        Commands::Serve {
            port,
            static_dir,
            cors_origins,
            insecure_tls,
            api_only,
        } => {
            let args = handlers::serve::ServeArgs {
                port,
                static_dir,
                cors_origins,
                insecure_tls,
                api_only,
            };
            handlers::serve::execute(args).await?;
        }
        Commands::Services { json } => {
            handlers::services::execute(json).await?;
        }
    }

    Ok(())
}
