//! Mock SQL generator for testing.
//!
//! Provides deterministic responses based on input patterns, without
//! making real API calls.

use async_trait::async_trait;

use crate::error::{Result, SheetqlError};
use crate::llm::SqlGenerator;

/// Mock generator that returns canned responses based on prompt patterns.
#[derive(Debug, Clone, Default)]
pub struct MockSqlGenerator {
    /// Custom response mappings (pattern -> response).
    custom_responses: Vec<(String, String)>,
    /// When set, every call fails with this message.
    failure: Option<String>,
}

impl MockSqlGenerator {
    /// Creates a new mock generator with default responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a custom response mapping.
    ///
    /// When the prompt contains `pattern`, the mock returns `response`.
    pub fn with_response(
        mut self,
        pattern: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        self.custom_responses
            .push((pattern.into(), response.into()));
        self
    }

    /// Makes every call fail, for exercising the generation-failure path.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Generates a mock response based on the prompt.
    fn mock_response(&self, prompt: &str) -> String {
        let prompt_lower = prompt.to_lowercase();

        for (pattern, response) in &self.custom_responses {
            if prompt_lower.contains(&pattern.to_lowercase()) {
                return response.clone();
            }
        }

        if prompt_lower.contains("how many") || prompt_lower.contains("count") {
            return "```sql\nSELECT COUNT(*) FROM user_table;\n```".to_string();
        }

        if prompt_lower.contains("delete") {
            return "```sql\nDELETE FROM user_table WHERE id = 1;\n```".to_string();
        }

        if prompt_lower.contains("add") || prompt_lower.contains("insert") {
            return "```sql\nINSERT INTO user_table VALUES (3, 'c');\n```".to_string();
        }

        if prompt_lower.contains("drop") {
            return "```sql\nDROP TABLE user_table;\n```".to_string();
        }

        "```sql\nSELECT * FROM user_table;\n```".to_string()
    }
}

#[async_trait]
impl SqlGenerator for MockSqlGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        if let Some(message) = &self.failure {
            return Err(SheetqlError::llm(message.clone()));
        }
        Ok(self.mock_response(prompt))
    }
}
