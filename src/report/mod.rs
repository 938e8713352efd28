//! # Table Extractor
//!
//! Recovers one row/column matrix per named section of a SQL*Plus HTML spool.
//! SQL*Plus echoes every `rem [name]` command of the generating script as a
//! `SQL&gt; rem [name]` line, followed by the HTML table of the next query;
//! that echo is the anchor each sheet is looked up by.
//!
//! Cells stay text here. Typing happens when a sheet is written.

pub(crate) mod html;

use crate::diagnostics::Warning;
use std::collections::HashMap;
use tracing::debug;

pub use html::find_config_reference as config_reference;

/// Matrix recovered from one section. Row 0 is the header row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExtractedTable {
    pub section_id: String,
    pub rows: Vec<Vec<String>>,
}

impl ExtractedTable {
    pub fn empty(section_id: &str) -> Self {
        ExtractedTable { section_id: section_id.to_owned(), rows: Vec::new() }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    pub fn col_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Cell text, `None` outside a (possibly short) row.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }
}

/// Tables found for the requested sections plus what went missing.
#[derive(Debug, Default)]
pub struct Extraction {
    pub tables: HashMap<String, ExtractedTable>,
    pub warnings: Vec<Warning>,
}

impl Extraction {
    pub fn table(&self, section_id: &str) -> Option<&ExtractedTable> {
        self.tables.get(section_id)
    }
}

/// Extracts every requested `(sheet, section)` pair from the document.
///
/// A section without marker yields a `SectionNotFound` warning and no table;
/// a marker without a table yields an empty table and an `EmptySection`
/// warning. When a marker repeats, the last occurrence wins.
pub fn extract_sections(document: &str, requested: &[(&str, &str)]) -> Extraction {
    let markers = html::find_markers(document);
    let mut regions: HashMap<&str, &str> = HashMap::new();
    for (name, region) in html::marker_regions(document, &markers) {
        regions.insert(name, region);
    }
    debug!(markers = markers.len(), sections = regions.len(), "scanned report markers");

    let mut extraction = Extraction::default();
    for (sheet, section) in requested {
        if extraction.tables.contains_key(*section) {
            continue;
        }
        let Some(region) = regions.get(section) else {
            extraction.warnings.push(Warning::SectionNotFound {
                sheet: (*sheet).to_owned(),
                section: (*section).to_owned(),
            });
            continue;
        };
        let rows = match html::first_table(region) {
            Some(table) => html::table_rows(table),
            None => Vec::new(),
        };
        if rows.is_empty() {
            extraction.warnings.push(Warning::EmptySection { section: (*section).to_owned() });
        }
        let table = ExtractedTable { section_id: (*section).to_owned(), rows };
        debug!(
            section = *section,
            rows = table.row_count(),
            cols = table.col_count(),
            "extracted section"
        );
        extraction.tables.insert((*section).to_owned(), table);
    }
    extraction
}
