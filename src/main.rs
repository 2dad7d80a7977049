//! Quire - A static site generator for Markdown blogs.

mod build;
mod cli;
mod compiler;
mod config;
mod content;
mod logger;
mod markdown;
mod template;
mod transform;
mod utils;

use anyhow::Result;
use build::build_site;
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;

fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));
    let config: &'static SiteConfig = Box::leak(Box::new(SiteConfig::load(cli)?));

    match &cli.command {
        Commands::Build { .. } => build_site(config),
    }
}
