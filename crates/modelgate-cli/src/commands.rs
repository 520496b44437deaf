//! Main commands enum and subcommand arguments.

use std::path::PathBuf;

use clap::Subcommand;

/// Available commands for the gateway CLI.
#[derive(Subcommand)]
pub enum Commands {
    /// Run the gateway HTTP server
    Serve {
        /// Port to listen on (falls back to the PORT variable, then 8080)
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory with a built web client to serve alongside the API
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Allow only these CORS origins (repeatable; default allows all)
        #[arg(long = "cors-origin")]
        cors_origins: Vec<String>,

        /// Skip upstream TLS certificate verification (trade-off: accepts
        /// self-signed brokers, loses protection against MITM)
        #[arg(long)]
        insecure_tls: bool,

        /// Serve the API only, without probing for a web client build
        #[arg(long)]
        api_only: bool,
    },

    /// Show the services and models discovered from the environment
    Services {
        /// Emit the full service list as JSON
        #[arg(long)]
        json: bool,
    },
}
