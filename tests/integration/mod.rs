//! Integration tests for sheetql.

pub mod common;
pub mod export_roundtrip_test;
pub mod pipeline_test;
