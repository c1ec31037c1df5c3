//! brokenlink CLI - post-processor for a built static site.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "brokenlink")]
#[command(about = "Annotates external links and builds the palette stylesheet for a static site")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to brokenlink.toml config file
    #[arg(short, long, default_value = "brokenlink.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default brokenlink.toml
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        yes: bool,
    },

    /// Annotate external links and write the palette stylesheet
    Build {
        /// Site directory (defaults to config or "_site")
        #[arg(short, long)]
        site: Option<PathBuf>,

        /// Skip minification
        #[arg(long)]
        no_minify: bool,
    },

    /// Only annotate external links
    Annotate {
        /// Site directory (defaults to config or "_site")
        #[arg(short, long)]
        site: Option<PathBuf>,
    },

    /// Only write the palette stylesheet
    Css {
        /// Purge unused rules regardless of BUILD_ENV
        #[arg(long, conflicts_with = "dev")]
        prod: bool,

        /// Keep every rule regardless of BUILD_ENV
        #[arg(long)]
        dev: bool,

        /// Output file (defaults to the configured stylesheet inside the site)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip minification
        #[arg(long)]
        no_minify: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::Build { site, no_minify } => {
            let minify = if no_minify { Some(false) } else { None };
            commands::build::run(&cli.config, site, minify).await?;
        }
        Commands::Annotate { site } => {
            commands::annotate::run(&cli.config, site).await?;
        }
        Commands::Css {
            prod,
            dev,
            output,
            no_minify,
        } => {
            let purge = match (prod, dev) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            let minify = if no_minify { Some(false) } else { None };
            commands::css::run(&cli.config, purge, output, minify).await?;
        }
    }

    Ok(())
}
