// src/cli/mod.rs — CLI definition (clap derive)

pub mod chat;

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "manualmate",
    about = "Chat with your technical PDF manuals",
    version
)]
pub struct Cli {
    /// PDF manual to open on startup
    pub manual: Option<PathBuf>,

    /// Gemini model to use (overrides config)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Config file path
    #[arg(long)]
    pub config: Option<String>,

    /// Suppress status output (only emit transcript turns)
    #[arg(long)]
    pub quiet: bool,
}
