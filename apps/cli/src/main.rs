//! LexiSync CLI — vocabulary sync tool.
//!
//! Pulls a language-learning provider's courses, skills, and vocabulary
//! through an on-disk response cache and persists a normalized snapshot
//! into MongoDB.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
