//! Shared helpers for integration tests.

use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;
use sheetql::llm::MockSqlGenerator;
use sheetql::session::{Session, SessionOptions};
use sheetql::store::TableStore;

/// Writes the canonical workbook: header (id, name), rows (1,'a'), (2,'b').
pub fn write_seed_workbook(path: &Path) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(0, 0, "id").unwrap();
    worksheet.write_string(0, 1, "name").unwrap();
    worksheet.write_number(1, 0, 1.0).unwrap();
    worksheet.write_string(1, 1, "a").unwrap();
    worksheet.write_number(2, 0, 2.0).unwrap();
    worksheet.write_string(2, 1, "b").unwrap();
    workbook.save(path).unwrap();
}

/// Opens a session over the seed workbook in `dir` with the given mock.
pub async fn open_seed_session(dir: &Path, generator: MockSqlGenerator) -> (Session, PathBuf) {
    let workbook_path = dir.join("data.xlsx");
    write_seed_workbook(&workbook_path);

    let store = TableStore::new(dir.join("session.db"));
    let options = SessionOptions {
        table: "user_table".to_string(),
        export_dir: dir.to_path_buf(),
    };
    let session = Session::open(store, Box::new(generator), &workbook_path, options)
        .await
        .unwrap();
    (session, workbook_path)
}
