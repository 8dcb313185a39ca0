use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "docqa", version, about = "Ask questions about uploaded documents")]
pub struct Cli {
    #[arg(long, global = true, help = "Backend origin (overrides DOCQA_BASE_URL)")]
    pub base_url: Option<String>,
    #[arg(
        long,
        global = true,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Per-request timeout in seconds (overrides DOCQA_TIMEOUT_SECS)"
    )]
    pub timeout_secs: Option<u64>,
    #[arg(
        long,
        global = true,
        help = "Only the most recently submitted question may update the answer"
    )]
    pub latest_wins: bool,
    #[arg(long, global = true, help = "Print the final page as JSON")]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit one question and print the answer
    Ask { question: String },
    /// Select files and submit the upload form; only the first file is sent
    Upload { files: Vec<PathBuf> },
    /// Read submissions from stdin, one per line (`:upload <path>` uploads)
    Shell,
}
