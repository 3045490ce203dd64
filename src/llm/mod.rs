//! Generation model integration.
//!
//! One outbound call per question: prompt string in, raw text out. The
//! seam is the [`SqlGenerator`] trait; the real provider is Gemini, and a
//! mock generator covers tests and offline use.
//!
//! Generation failures are tagged errors, not error strings standing in
//! for SQL: a failed call can never reach the executor as a candidate
//! statement.

pub mod gemini;
pub mod mock;
pub mod parser;
pub mod prompt;

pub use gemini::{GeminiClient, GeminiConfig};
pub use mock::MockSqlGenerator;
pub use parser::strip_sql_fences;
pub use prompt::build_prompt;

use async_trait::async_trait;
use std::str::FromStr;

use crate::error::{Result, SheetqlError};

/// Trait for clients that turn a prompt into candidate SQL text.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait SqlGenerator: Send + Sync {
    /// Sends the prompt to the model and returns the raw response text.
    ///
    /// The text is untrusted and unstructured; callers strip fences and
    /// classify it before execution.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Generation model provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneratorProvider {
    /// Google Gemini.
    #[default]
    Gemini,
    /// Mock generator for testing (no API key required).
    Mock,
}

impl GeneratorProvider {
    /// Returns the provider as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Mock => "mock",
        }
    }
}

impl FromStr for GeneratorProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "mock" => Ok(Self::Mock),
            _ => Err(format!("Unknown generator provider: {}", s)),
        }
    }
}

impl std::fmt::Display for GeneratorProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Creates a generator for the given provider.
///
/// For Gemini the API key is resolved in order: the `api_key` parameter,
/// then the `GEMINI_API_KEY` environment variable; a missing key is a
/// configuration error raised before any question is accepted. The model
/// defaults to `gemini-1.5-pro` unless overridden.
pub fn create_generator(
    provider: GeneratorProvider,
    api_key: Option<String>,
    model: Option<String>,
) -> Result<Box<dyn SqlGenerator>> {
    match provider {
        GeneratorProvider::Gemini => {
            let key = api_key
                .or_else(|| std::env::var("GEMINI_API_KEY").ok())
                .filter(|k| !k.trim().is_empty())
                .ok_or_else(|| {
                    SheetqlError::config(
                        "GEMINI_API_KEY is not set. Add it to the environment or a .env file.",
                    )
                })?;
            let model = model
                .or_else(|| std::env::var("GEMINI_MODEL").ok())
                .unwrap_or_else(|| gemini::DEFAULT_MODEL.to_string());
            Ok(Box::new(GeminiClient::new(GeminiConfig::new(key, model))?))
        }
        GeneratorProvider::Mock => Ok(Box::new(MockSqlGenerator::new())),
    }
}
