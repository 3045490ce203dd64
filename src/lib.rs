//! sheetql - ask questions about a spreadsheet in plain language.
//!
//! Pipeline: ingest a workbook into a SQLite table, turn each question
//! into candidate SQL via a generation model, classify and execute it,
//! and keep a spreadsheet export in sync after mutations.

pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod llm;
pub mod session;
pub mod store;
