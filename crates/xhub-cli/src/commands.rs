use anyhow::Context;
use colored::Colorize;
use xhub_server::{ServerConfig, XhubServer};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Config(args) => cmd_config(args),
    }
}

/// Defaults, then the config file, then individual flags.
fn effective_config(args: &ConfigArgs) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ServerConfig::default(),
    };
    if let Some(addr) = args.addr {
        config.bind_addr = addr;
    }
    if let Some(db) = &args.dbfile {
        config.db_path = db.clone();
    }
    if let Some(url) = &args.public_url {
        config.public_url = Some(url.clone());
    }
    Ok(config)
}

fn cmd_serve(args: ConfigArgs) -> anyhow::Result<()> {
    let config = effective_config(&args)?;
    let server = XhubServer::open(config.clone())
        .with_context(|| format!("opening {}", config.db_path.display()))?;
    println!(
        "{} xhub listening on {} (db: {})",
        "✓".green().bold(),
        config.bind_addr.to_string().bold(),
        config.db_path.display().to_string().cyan()
    );
    println!("  Base URL: {}", config.base_url().yellow());

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn cmd_config(args: ConfigArgs) -> anyhow::Result<()> {
    let config = effective_config(&args)?;
    print!("{}", config.to_toml()?);
    Ok(())
}
