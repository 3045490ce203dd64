//! Mutation-to-export round-trip tests.

use pretty_assertions::assert_eq;

use sheetql::ingest;
use sheetql::llm::MockSqlGenerator;
use sheetql::session::Answer;
use sheetql::store::Value;

use super::common::open_seed_session;

#[tokio::test]
async fn test_mutation_export_round_trip() {
    // After a successful mutation the export mirrors the table exactly:
    // table -> xlsx -> re-read xlsx == table.
    let dir = tempfile::tempdir().unwrap();
    let (mut session, _) = open_seed_session(dir.path(), MockSqlGenerator::new()).await;

    let answer = session.ask("add a row for 'c'").await.unwrap();
    let (snapshot, export) = match answer {
        Answer::Mutated {
            snapshot: Some(snapshot),
            export: Some(export),
            ..
        } => (snapshot, export),
        other => panic!("Expected mutation with export, got {:?}", other),
    };

    assert_eq!(export, dir.path().join("updated_data.xlsx"));

    let reread = ingest::load_workbook(&export).unwrap();
    let header: Vec<&str> = reread.columns.iter().map(|c| c.name.as_str()).collect();
    let expected: Vec<&str> = snapshot.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(header, expected);
    assert_eq!(reread.rows, snapshot.rows);
}

#[tokio::test]
async fn test_consecutive_mutations_overwrite_export() {
    let dir = tempfile::tempdir().unwrap();
    let generator = MockSqlGenerator::new()
        .with_response("first insert", "INSERT INTO user_table VALUES (3, 'c')")
        .with_response("second insert", "INSERT INTO user_table VALUES (4, 'd')");
    let (mut session, _) = open_seed_session(dir.path(), generator).await;

    session.ask("first insert").await.unwrap();
    session.ask("second insert").await.unwrap();

    let export = session.last_export().expect("export written").to_path_buf();
    let reread = ingest::load_workbook(&export).unwrap();
    assert_eq!(reread.rows.len(), 4);
    assert_eq!(
        reread.rows[3],
        vec![Value::Int(4), Value::Text("d".into())]
    );
}

#[tokio::test]
async fn test_export_not_written_for_reads() {
    let dir = tempfile::tempdir().unwrap();
    let (mut session, _) = open_seed_session(dir.path(), MockSqlGenerator::new()).await;

    session.ask("how many rows are there").await.unwrap();
    assert!(session.last_export().is_none());
    assert!(!dir.path().join("updated_data.xlsx").exists());
}
