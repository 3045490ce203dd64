//! Session context and question pipeline.
//!
//! A session is created by ingesting one workbook and holds everything a
//! submission needs: the store handle, the generator, the fixed table
//! name, and the deterministic export path. Re-ingesting replaces the
//! session wholesale; there is no global state.
//!
//! Each submission runs the full pipeline to completion: inspect, build
//! the prompt, generate, strip fences, classify once, execute, and on a
//! successful mutation regenerate the export. Every failure is terminal
//! for that submission; there are no pipeline-level retries.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::classify::classify_statement;
use crate::error::Result;
use crate::export;
use crate::ingest;
use crate::llm::{build_prompt, strip_sql_fences, SqlGenerator};
use crate::store::{ExecOutcome, QueryResult, TableSnapshot, TableStore};

/// Default table name backing the session's uploaded data.
pub const DEFAULT_TABLE_NAME: &str = "user_table";

/// Options for creating a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Name of the session table.
    pub table: String,
    /// Directory the export artifact is written into.
    pub export_dir: PathBuf,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            table: DEFAULT_TABLE_NAME.to_string(),
            export_dir: PathBuf::from("."),
        }
    }
}

/// Outcome of one question submission.
#[derive(Debug)]
pub enum Answer {
    /// Read path: the generated SQL and its result rows.
    Rows {
        /// The executed statement.
        sql: String,
        /// Fetched rows.
        result: QueryResult,
    },

    /// Mutation path: the statement committed. The snapshot and export
    /// are absent when the table no longer exists after the mutation
    /// (e.g. it was dropped), in which case the export step is skipped.
    Mutated {
        /// The executed statement.
        sql: String,
        /// Rows affected as reported by the store.
        rows_affected: u64,
        /// Post-mutation table contents, if the table still exists.
        snapshot: Option<TableSnapshot>,
        /// Path of the regenerated export artifact, if one was written.
        export: Option<PathBuf>,
    },

    /// The generation call failed; nothing was executed.
    GenerationFailed {
        /// User-visible failure reason.
        reason: String,
    },

    /// The statement failed to execute; the store is unchanged beyond
    /// SQLite's own error semantics.
    ExecutionFailed {
        /// The statement that failed.
        sql: String,
        /// User-visible error message.
        message: String,
    },
}

/// One loaded workbook and the pipeline that answers questions about it.
pub struct Session {
    store: TableStore,
    generator: Box<dyn SqlGenerator>,
    table: String,
    export_path: PathBuf,
    last_export: Option<PathBuf>,
}

impl Session {
    /// Creates a session by ingesting the workbook at `path`.
    ///
    /// Replaces any previously loaded table of the same name; the export
    /// path is derived from the workbook's filename
    /// (`updated_<filename>` inside the export directory).
    pub async fn open(
        store: TableStore,
        generator: Box<dyn SqlGenerator>,
        workbook: &Path,
        options: SessionOptions,
    ) -> Result<Self> {
        ingest::ingest_workbook(&store, workbook, &options.table).await?;
        let export_path = export::export_path_for(workbook, &options.export_dir)?;

        Ok(Self {
            store,
            generator,
            table: options.table,
            export_path,
            last_export: None,
        })
    }

    /// Name of the session table.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Path the export artifact is written to after mutations.
    pub fn export_path(&self) -> &Path {
        &self.export_path
    }

    /// Path of the most recently written export, if any.
    pub fn last_export(&self) -> Option<&Path> {
        self.last_export.as_deref()
    }

    /// Current full table contents, for the data preview.
    pub async fn preview(&self) -> Result<TableSnapshot> {
        self.store.snapshot(&self.table).await
    }

    /// Runs one question through the full pipeline.
    ///
    /// Errors are reserved for the session's own plumbing (inspection of
    /// a vanished table, export write failures); generation and
    /// execution failures come back as [`Answer`] variants so the caller
    /// can show them and keep accepting questions.
    pub async fn ask(&mut self, question: &str) -> Result<Answer> {
        let info = self.store.inspect(&self.table).await?;
        let prompt = build_prompt(&info, &self.table, question);

        let raw = match self.generator.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!("generation failed: {e}");
                return Ok(Answer::GenerationFailed {
                    reason: e.to_string(),
                });
            }
        };

        let sql = strip_sql_fences(&raw);
        let kind = classify_statement(&sql);
        info!(%kind, sql = %sql, "candidate statement");

        match self.store.execute(&sql, kind).await? {
            ExecOutcome::Failed(message) => Ok(Answer::ExecutionFailed { sql, message }),
            ExecOutcome::Rows(result) => Ok(Answer::Rows { sql, result }),
            ExecOutcome::Mutated { rows_affected } => {
                self.sync_export(sql, rows_affected).await
            }
        }
    }

    /// Regenerates the export artifact after a successful mutation.
    ///
    /// If the table no longer exists (the mutation dropped it) the
    /// export step is skipped cleanly rather than failing.
    async fn sync_export(&mut self, sql: String, rows_affected: u64) -> Result<Answer> {
        let snapshot = match self.store.snapshot(&self.table).await {
            Ok(snapshot) => snapshot,
            Err(e) if e.is_table_not_found() => {
                warn!(table = %self.table, "table gone after mutation; export skipped");
                return Ok(Answer::Mutated {
                    sql,
                    rows_affected,
                    snapshot: None,
                    export: None,
                });
            }
            Err(e) => return Err(e),
        };

        export::write_snapshot(&snapshot, &self.export_path)?;
        self.last_export = Some(self.export_path.clone());

        Ok(Answer::Mutated {
            sql,
            rows_affected,
            snapshot: Some(snapshot),
            export: Some(self.export_path.clone()),
        })
    }
}
