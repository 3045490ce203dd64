//! Command-line argument parsing for sheetql.

use clap::Parser;
use std::path::PathBuf;

/// Ask questions about a spreadsheet in plain language, answered with
/// LLM-generated SQL.
#[derive(Parser, Debug)]
#[command(name = "sheetql")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the .xlsx workbook to load
    #[arg(value_name = "WORKBOOK")]
    pub workbook: PathBuf,

    /// Ask a single question and exit (otherwise an interactive prompt starts)
    #[arg(short, long, value_name = "TEXT")]
    pub question: Option<String>,

    /// SQLite database file backing the session
    #[arg(long, value_name = "PATH", default_value = "user_data.db")]
    pub db: PathBuf,

    /// Name of the session table
    #[arg(long, value_name = "NAME", default_value = "user_table")]
    pub table: String,

    /// Directory the export artifact is written into
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub export_dir: PathBuf,

    /// Generation model to use
    #[arg(long, value_name = "NAME", env = "GEMINI_MODEL")]
    pub model: Option<String>,

    /// API key for the generation model
    #[arg(long, value_name = "KEY", env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Use the mock generator instead of Gemini (no API key required)
    #[arg(long)]
    pub mock_llm: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
