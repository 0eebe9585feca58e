use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use shelf_server::{ServerConfig, ShelfServer};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Config(args) => cmd_config(args),
    }
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = effective_config(&args)?;
    print_banner(&config);
    let server = ShelfServer::new(config);
    let runtime = tokio::runtime::Runtime::new().context("failed to start the async runtime")?;
    runtime.block_on(server.serve())?;
    Ok(())
}

fn cmd_config(args: ConfigArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}

/// The file (or defaults) with command-line overrides applied.
fn effective_config(args: &ServeArgs) -> anyhow::Result<ServerConfig> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if args.no_seed {
        config.seed_demo_data = false;
    }
    Ok(config)
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ServerConfig> {
    match path {
        Some(path) => ServerConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(ServerConfig::default()),
    }
}

fn print_banner(config: &ServerConfig) {
    let auth = if config.auth.is_enabled() {
        format!("{} token(s)", config.auth.tokens.len())
    } else {
        "anonymous".to_string()
    };
    println!("{} {}", "shelf".green().bold(), env!("CARGO_PKG_VERSION").dimmed());
    println!("  Listening: {}", config.bind_addr.to_string().bold());
    println!("  Auth: {}", auth.cyan());
    println!(
        "  Demo data: {}",
        if config.seed_demo_data && !config.auth.is_enabled() {
            "yes".yellow()
        } else {
            "no".dimmed()
        }
    );
}
