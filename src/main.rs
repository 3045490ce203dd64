//! sheetql - ask questions about a spreadsheet in plain language.

use std::io::{self, BufRead, Write};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use sheetql::cli::Cli;
use sheetql::config::Settings;
use sheetql::error::Result;
use sheetql::llm::create_generator;
use sheetql::session::{Answer, Session, SessionOptions};
use sheetql::store::{ColumnDescriptor, Row, TableSnapshot, TableStore};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    // A .env file supplies GEMINI_API_KEY for local use.
    dotenvy::dotenv().ok();

    if let Err(e) = run().await {
        error!("{}: {}", e.category(), e);
        eprintln!("{e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let settings = Settings::from_cli(cli)?;

    let generator = create_generator(
        settings.provider,
        settings.api_key.clone(),
        settings.model.clone(),
    )?;

    let store = TableStore::new(&settings.db_path);
    let options = SessionOptions {
        table: settings.table.clone(),
        export_dir: settings.export_dir.clone(),
    };

    info!(workbook = %settings.workbook.display(), "loading workbook");
    let mut session = Session::open(store, generator, &settings.workbook, options).await?;

    let preview = session.preview().await?;
    println!("Loaded {} rows into '{}':", preview.rows.len(), session.table());
    println!("{}", render_snapshot(&preview));

    match settings.question {
        Some(question) => {
            let answer = session.ask(&question).await?;
            print_answer(&answer);
        }
        None => {
            interactive_loop(&mut session).await?;
        }
    }

    Ok(())
}

/// Reads questions from stdin until EOF, a blank line, or "quit".
async fn interactive_loop(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    loop {
        print!("ask> ");
        io::stdout().flush().ok();

        let mut line = String::new();
        let read = stdin.lock().read_line(&mut line).unwrap_or(0);
        if read == 0 {
            break;
        }

        let question = line.trim();
        if question.is_empty() || question.eq_ignore_ascii_case("quit") {
            break;
        }

        let answer = session.ask(question).await?;
        print_answer(&answer);
    }
    Ok(())
}

/// Prints one answer to stdout.
fn print_answer(answer: &Answer) {
    match answer {
        Answer::Rows { sql, result } => {
            println!("Generated SQL: {sql}");
            if result.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", render_table(&result.columns, &result.rows));
            }
        }
        Answer::Mutated {
            sql,
            rows_affected,
            snapshot,
            export,
        } => {
            println!("Generated SQL: {sql}");
            println!("Database updated ({rows_affected} rows affected).");
            if let Some(snapshot) = snapshot {
                println!("{}", render_snapshot(snapshot));
            }
            match export {
                Some(path) => println!("Updated spreadsheet written to {}", path.display()),
                None => println!("Table no longer exists; no spreadsheet written."),
            }
        }
        Answer::GenerationFailed { reason } => {
            println!("Could not generate a query: {reason}");
        }
        Answer::ExecutionFailed { sql, message } => {
            println!("Generated SQL: {sql}");
            println!("Query execution error: {message}");
        }
    }
}

/// Renders a snapshot as an aligned text table.
fn render_snapshot(snapshot: &TableSnapshot) -> String {
    render_table(&snapshot.columns, &snapshot.rows)
}

/// Renders columns and rows as an aligned text table.
fn render_table(columns: &[ColumnDescriptor], rows: &[Row]) -> String {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.name.len()).collect();
    let rendered: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|v| v.to_display_string()).collect())
        .collect();

    for row in &rendered {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            } else {
                widths.push(cell.len());
            }
        }
    }

    let mut out = String::new();
    let header = columns
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{:width$}", c.name, width = widths[i]))
        .collect::<Vec<_>>()
        .join(" | ");
    out.push_str(&header);
    out.push('\n');
    out.push_str(&"-".repeat(header.len()));

    for row in &rendered {
        out.push('\n');
        let line = row
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:width$}", cell, width = widths.get(i).copied().unwrap_or(0)))
            .collect::<Vec<_>>()
            .join(" | ");
        out.push_str(&line);
    }

    out
}
