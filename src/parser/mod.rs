//! Table extraction from portal documents
//!
//! The dossier page carries two tables the rest of the system cares about,
//! located by a structural contract with the portal markup:
//!
//! - student info: the first `<table>` inside the first top-level `<div>`
//!   of `<body>`
//! - grades: the first table classified `table table-bordered`
//!
//! That contract is deliberately confined to this module so markup drift
//! on the portal side only ever touches these selectors. Cell text is
//! whitespace-normalized and rows without cells are dropped; a missing
//! table is a distinct error, never an empty result.

use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};

use crate::error::ExtractError;
use crate::models::Table;

// Helper macro to parse selectors safely at compile time
macro_rules! parse_selector {
    ($s:expr) => {
        Selector::parse($s).expect(concat!("Invalid CSS selector: ", $s))
    };
}

lazy_static! {
    static ref TOP_LEVEL_DIV: Selector = parse_selector!("body > div");
    static ref ANY_TABLE: Selector = parse_selector!("table");
    static ref GRADES_TABLE: Selector = parse_selector!("table.table.table-bordered");
    static ref ROW: Selector = parse_selector!("tr");
    static ref CELL: Selector = parse_selector!("th, td");
}

/// Extract the student identity table
///
/// # Errors
///
/// Returns `ExtractError::StructureNotFound` when the first top-level
/// `<div>` or its table is absent.
pub fn extract_student_info(html: &str) -> Result<Table, ExtractError> {
    let document = Html::parse_document(html);

    let first_div = document
        .select(&TOP_LEVEL_DIV)
        .next()
        .ok_or(ExtractError::StructureNotFound("student info"))?;

    let table = first_div
        .select(&ANY_TABLE)
        .next()
        .ok_or(ExtractError::StructureNotFound("student info"))?;

    Ok(table_rows(table))
}

/// Extract the grades table
///
/// # Errors
///
/// Returns `ExtractError::StructureNotFound` when no `table table-bordered`
/// element exists in the document.
pub fn extract_grades(html: &str) -> Result<Table, ExtractError> {
    let document = Html::parse_document(html);

    let table = document
        .select(&GRADES_TABLE)
        .next()
        .ok_or(ExtractError::StructureNotFound("grades"))?;

    Ok(table_rows(table))
}

/// Collect normalized rows from a table element, dropping cell-less rows
fn table_rows(table: ElementRef<'_>) -> Table {
    let mut rows = Vec::new();

    for tr in table.select(&ROW) {
        let cells: Vec<String> = tr.select(&CELL).map(cell_text).collect();
        if !cells.is_empty() {
            rows.push(cells);
        }
    }

    Table::new(rows)
}

/// Whitespace-normalized text of one cell
///
/// Runs of whitespace, including embedded line breaks, collapse to single
/// spaces; leading and trailing whitespace is trimmed.
fn cell_text(cell: ElementRef<'_>) -> String {
    let joined = cell.text().collect::<Vec<_>>().join(" ");
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}
