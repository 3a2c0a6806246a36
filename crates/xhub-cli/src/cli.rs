use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "xhub",
    about = "xhub: a hierarchical store for studies, trials, and files",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the xhub HTTP server
    Serve(ConfigArgs),
    /// Print the effective configuration as TOML
    Config(ConfigArgs),
}

/// Config sources: an optional TOML file, overridden by individual flags.
#[derive(Args, Clone, Debug, Default)]
pub struct ConfigArgs {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Address to listen on
    #[arg(long)]
    pub addr: Option<SocketAddr>,
    /// SQLite database file
    #[arg(long)]
    pub dbfile: Option<PathBuf>,
    /// Base URL used in list responses
    #[arg(long)]
    pub public_url: Option<String>,
}
