//! Prompt construction for SQL generation.
//!
//! Formats the schema descriptor, sample rows, table name, and the raw
//! user question into a single prompt string. Interpolation is verbatim:
//! no length cap, no sanitization of the question text. That is a known
//! trust boundary of this design, and it keeps the prompt deterministic
//! for identical schemas.

use crate::store::{format_row_tuple, TableInfo};

/// Prompt template for the generation model.
const PROMPT_TEMPLATE: &str = "\
Convert the following natural language question into a SQL query using the table schema and sample data provided:

Table Schema:
{schema}

Sample Data (first 5 rows):
{samples}

Natural Language Question: '{question}'

The SQL query should fetch data from the table '{table}'.";

/// Builds the generation prompt for one question.
///
/// Each column renders as `name (Type: type)` on its own line; each
/// sample row renders as its tuple representation on its own line.
pub fn build_prompt(info: &TableInfo, table: &str, question: &str) -> String {
    let schema_text = info
        .columns
        .iter()
        .map(|col| format!("{} (Type: {})", col.name, col.data_type))
        .collect::<Vec<_>>()
        .join("\n");

    let samples_text = info
        .samples
        .iter()
        .map(format_row_tuple)
        .collect::<Vec<_>>()
        .join("\n");

    PROMPT_TEMPLATE
        .replace("{schema}", &schema_text)
        .replace("{samples}", &samples_text)
        .replace("{question}", question)
        .replace("{table}", table)
}
