//! Full-pipeline tests: ingest, inspect, classify, execute.

use pretty_assertions::assert_eq;

use sheetql::ingest;
use sheetql::llm::MockSqlGenerator;
use sheetql::session::Answer;
use sheetql::store::{ColumnDescriptor, TableStore, Value};

use super::common::{open_seed_session, write_seed_workbook};

#[tokio::test]
async fn test_ingested_columns_match_header_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let workbook_path = dir.path().join("data.xlsx");
    write_seed_workbook(&workbook_path);

    let store = TableStore::new(dir.path().join("test.db"));
    let sheet = ingest::ingest_workbook(&store, &workbook_path, "user_table")
        .await
        .unwrap();

    let names: Vec<&str> = sheet.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "name"]);

    // The store agrees with the sheet, in the same order.
    let info = store.inspect("user_table").await.unwrap();
    assert_eq!(info.columns, sheet.columns);
}

#[tokio::test]
async fn test_inspector_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let workbook_path = dir.path().join("data.xlsx");
    write_seed_workbook(&workbook_path);

    let store = TableStore::new(dir.path().join("test.db"));
    ingest::ingest_workbook(&store, &workbook_path, "user_table")
        .await
        .unwrap();

    let first = store.inspect("user_table").await.unwrap();
    let second = store.inspect("user_table").await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_count_question_scenario() {
    // user_table = [(1,'a'), (2,'b')]; "how many rows are there" takes
    // the read path and returns a single count row.
    let dir = tempfile::tempdir().unwrap();
    let (mut session, _) = open_seed_session(dir.path(), MockSqlGenerator::new()).await;

    let answer = session.ask("how many rows are there").await.unwrap();
    match answer {
        Answer::Rows { result, .. } => {
            assert_eq!(result.row_count, 1);
            assert_eq!(result.rows[0], vec![Value::Int(2)]);
        }
        other => panic!("Expected rows, got {:?}", other),
    }

    let preview = session.preview().await.unwrap();
    assert_eq!(
        preview.rows,
        vec![
            vec![Value::Int(1), Value::Text("a".into())],
            vec![Value::Int(2), Value::Text("b".into())],
        ]
    );
}

#[tokio::test]
async fn test_read_with_embedded_keyword_stays_on_read_path() {
    // A SELECT whose text contains "update" classifies as a read with
    // the unified leading-verb check; the table is untouched.
    let dir = tempfile::tempdir().unwrap();
    let generator = MockSqlGenerator::new().with_response(
        "recently changed",
        "SELECT name FROM user_table WHERE name != 'update'",
    );
    let (mut session, _) = open_seed_session(dir.path(), generator).await;

    let before = session.preview().await.unwrap();
    let answer = session.ask("recently changed rows").await.unwrap();
    match answer {
        Answer::Rows { result, .. } => assert_eq!(result.row_count, 2),
        other => panic!("Expected rows, got {:?}", other),
    }
    let after = session.preview().await.unwrap();
    assert_eq!(before, after);
    // No export artifact on the read path.
    assert!(!session.export_path().exists());
}

#[tokio::test]
async fn test_drop_table_scenario() {
    // DROP TABLE succeeds as a mutation; inspection then fails with
    // not-found and no export is produced.
    let dir = tempfile::tempdir().unwrap();
    let (mut session, _) = open_seed_session(dir.path(), MockSqlGenerator::new()).await;

    let answer = session.ask("drop everything").await.unwrap();
    match answer {
        Answer::Mutated {
            sql,
            snapshot,
            export,
            ..
        } => {
            assert_eq!(sql, "DROP TABLE user_table;");
            assert!(snapshot.is_none());
            assert!(export.is_none());
        }
        other => panic!("Expected mutation, got {:?}", other),
    }

    let store = TableStore::new(dir.path().join("session.db"));
    let err = store.inspect("user_table").await.unwrap_err();
    assert!(err.is_table_not_found());
    assert!(!session.export_path().exists());
}

#[tokio::test]
async fn test_malformed_sql_is_surfaced_not_raised() {
    let dir = tempfile::tempdir().unwrap();
    let generator = MockSqlGenerator::new().with_response("typo", "SELEC * FROM user_table");
    let (mut session, _) = open_seed_session(dir.path(), generator).await;

    let answer = session.ask("typo question").await.unwrap();
    match answer {
        Answer::ExecutionFailed { message, .. } => {
            assert!(message.to_lowercase().contains("syntax"));
        }
        other => panic!("Expected execution failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fenced_response_is_stripped_before_execution() {
    let dir = tempfile::tempdir().unwrap();
    let generator = MockSqlGenerator::new()
        .with_response("fenced", "```sql\nSELECT * FROM user_table;\n```");
    let (mut session, _) = open_seed_session(dir.path(), generator).await;

    let answer = session.ask("fenced please").await.unwrap();
    match answer {
        Answer::Rows { sql, result } => {
            assert_eq!(sql, "SELECT * FROM user_table;");
            assert_eq!(result.row_count, 2);
        }
        other => panic!("Expected rows, got {:?}", other),
    }
}

#[tokio::test]
async fn test_reingest_replaces_table() {
    let dir = tempfile::tempdir().unwrap();
    let workbook_path = dir.path().join("data.xlsx");
    write_seed_workbook(&workbook_path);

    let store = TableStore::new(dir.path().join("test.db"));
    ingest::ingest_workbook(&store, &workbook_path, "user_table")
        .await
        .unwrap();

    // Mutate, then re-ingest: replace semantics, no merge.
    store
        .execute(
            "INSERT INTO user_table VALUES (9, 'z')",
            sheetql::classify::classify_statement("INSERT INTO user_table VALUES (9, 'z')"),
        )
        .await
        .unwrap();
    assert_eq!(store.snapshot("user_table").await.unwrap().rows.len(), 3);

    ingest::ingest_workbook(&store, &workbook_path, "user_table")
        .await
        .unwrap();
    let snapshot = store.snapshot("user_table").await.unwrap();
    assert_eq!(snapshot.rows.len(), 2);
    assert_eq!(
        snapshot.columns,
        vec![
            ColumnDescriptor::new("id", "INTEGER"),
            ColumnDescriptor::new("name", "TEXT"),
        ]
    );
}
