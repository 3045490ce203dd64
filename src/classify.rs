//! Statement classification.
//!
//! Decides whether a candidate SQL string is a read or a mutation before
//! it is executed. The check is lexical (leading keyword), not a SQL
//! parse: the candidate comes from a language model and may not parse at
//! all, yet still needs to be routed somewhere.

/// Keywords whose presence at the start of a statement marks it a mutation.
const MUTATION_PREFIXES: [&str; 5] = ["insert", "update", "delete", "alter", "drop"];

/// Keyword set for the legacy substring heuristic.
///
/// Includes "remove", which is not a SQL verb and can only ever match as
/// a substring of identifiers or string literals.
const MUTATION_SUBSTRINGS: [&str; 6] = ["update", "insert", "delete", "remove", "alter", "drop"];

/// How a candidate statement will be dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// Fetch rows, no commit.
    Read,
    /// Execute and commit, no result rows.
    Mutation,
}

impl QueryKind {
    /// Returns true for the mutation path.
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::Mutation)
    }
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Mutation => write!(f, "mutation"),
        }
    }
}

/// Classifies a candidate statement by its leading keyword.
///
/// This is the single classification used for both the dispatch decision
/// and the executor's commit-vs-fetch branch, so the two can never
/// disagree. It is computed once per submission and threaded through.
///
/// The check is `starts_with`, not a word-boundary match, so e.g.
/// "updates" also classifies as a mutation. Anything that does not start
/// with a mutation keyword (SELECT, PRAGMA, EXPLAIN, garbage) takes the
/// read path.
pub fn classify_statement(sql: &str) -> QueryKind {
    let lowered = sql.trim().to_lowercase();
    if MUTATION_PREFIXES
        .iter()
        .any(|keyword| lowered.starts_with(keyword))
    {
        QueryKind::Mutation
    } else {
        QueryKind::Read
    }
}

/// Legacy substring heuristic: true if any mutation keyword appears
/// anywhere in the text.
///
/// Flags false positives such as a SELECT whose column name contains
/// "update", and matches "remove" even though no SQL statement starts
/// with it. Kept for comparison and pinned down in tests; dispatch uses
/// [`classify_statement`] instead.
pub fn contains_mutation_keyword(sql: &str) -> bool {
    let lowered = sql.to_lowercase();
    MUTATION_SUBSTRINGS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}
