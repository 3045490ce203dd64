//! Response post-processing for generator output.
//!
//! Model responses often wrap SQL in a Markdown code fence. The candidate
//! statement is the response trimmed of surrounding whitespace with any
//! fence decoration removed; nothing beyond that is parsed or validated.

/// Strips Markdown code-fence decoration from a model response.
///
/// Trims the text; if it then begins with a fence, removes every
/// occurrence of the ```` ```sql ```` marker and every occurrence of the
/// ```` ``` ```` delimiter wherever they appear, and trims again. Text
/// with no leading fence is returned trimmed but otherwise untouched.
pub fn strip_sql_fences(raw: &str) -> String {
    let trimmed = raw.trim();

    if trimmed.starts_with("```sql") {
        trimmed
            .replace("```sql", "")
            .replace("```", "")
            .trim()
            .to_string()
    } else if trimmed.starts_with("```") {
        trimmed.replace("```", "").trim().to_string()
    } else {
        trimmed.to_string()
    }
}
