//! CLI definitions.

pub mod web;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "checklist")]
#[command(version)]
#[command(about = "Session-backed todo list manager")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
        /// Host to bind (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Don't automatically open the browser
        #[arg(long)]
        no_open: bool,
    },
}
