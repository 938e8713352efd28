//! Sheet Writer: turns an extracted table into typed, styled cells.

use super::cell::CellValue;
use super::style::validate_pattern;
use super::style::CellStyle;
use super::style::StyleId;
use super::SheetModel;
use super::WorkbookModel;
use super::WrittenCell;
use crate::diagnostics::Warning;
use crate::options::ConvertOptions;
use crate::report::ExtractedTable;
use crate::rules::range::CellRect;
use crate::rules::SheetSpec;
use tracing::debug;
use tracing::warn;

/// A FORMAT rule resolved against the table being written.
struct ResolvedFormat {
    rects: Vec<CellRect>,
    /// `None` when the pattern was rejected
    style: Option<StyleId>,
}

/// Writes `table` as a new sheet of `model` and returns the number of rows
/// written. Rejected FORMAT patterns are reported once per rule in
/// `warnings`.
pub fn write_sheet(
    model: &mut WorkbookModel,
    spec: &SheetSpec,
    table: &ExtractedTable,
    options: &ConvertOptions,
    hidden: bool,
    warnings: &mut Vec<Warning>,
) -> usize {
    let rows = table.row_count();
    let cols = table.col_count();

    let mut formats = Vec::with_capacity(spec.format_rules.len());
    for rule in &spec.format_rules {
        let style = match validate_pattern(&rule.display_format) {
            Ok(()) => Some(model.styles.intern(CellStyle::number(&rule.display_format))),
            Err(reason) => {
                let warning = Warning::UnsupportedFormat {
                    sheet: spec.name.clone(),
                    rule: rule.id.clone(),
                    line: rule.line,
                    pattern: rule.display_format.clone(),
                    reason: reason.to_string(),
                };
                warn!("{warning}");
                warnings.push(warning);
                None
            }
        };
        let rects: Vec<CellRect> = rule.ranges.iter().filter_map(|range| range.resolve(rows, cols)).collect();
        if rects.is_empty() {
            debug!(sheet = %spec.name, rule = %rule.id, line = rule.line, "FORMAT range is empty for this report");
        }
        formats.push(ResolvedFormat { rects, style });
    }

    let mut sheet = SheetModel::new(&spec.name);
    sheet.hidden = hidden;
    sheet.row_count = rows;
    sheet.col_count = cols;

    for row in 0..rows {
        for col in 0..cols {
            // rows shorter than the widest one end early
            let Some(text) = table.cell(row, col) else {
                continue;
            };
            let value = if row == 0 { CellValue::header(text) } else { CellValue::classify(text) };
            if value == CellValue::Empty {
                continue;
            }
            // only numbers take FORMAT patterns, dates keep the date format;
            // later rules take precedence
            let covering = if matches!(value, CellValue::Number(_)) {
                formats.iter().rev().find(|format| format.rects.iter().any(|rect| rect.contains(row, col)))
            } else {
                None
            };
            let style = match covering {
                Some(format) => format.style,
                None => options.default_style(&value).map(|style| model.styles.intern(style)),
            };
            sheet.cells.push(WrittenCell { row, col, value, style });
        }
        sheet.rows_written += 1;
    }

    let rows_written = sheet.rows_written;
    debug!(sheet = %spec.name, rows = rows_written, cols, cells = sheet.cells.len(), "wrote sheet");
    model.sheets.push(sheet);
    rows_written
}
