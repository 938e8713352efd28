//! Non-fatal findings collected during a conversion and the end-of-run summary.

use std::fmt::Display;

/// A problem that does not stop the conversion.
#[derive(Clone, Debug, PartialEq)]
pub enum Warning {
    /// The report has no marker for a declared sheet; the sheet is written empty.
    SectionNotFound { sheet: String, section: String },
    /// The marker exists but no table follows it.
    EmptySection { section: String },
    /// A FORMAT pattern could not be turned into a cell style; cells it covers
    /// are written without a number format.
    UnsupportedFormat {
        sheet: String,
        rule: String,
        line: usize,
        pattern: String,
        reason: String,
    },
    /// No series could be bound; the chart is left out.
    EmptyChart { sheet: String, chart: String, line: usize },
}

impl Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::SectionNotFound { sheet, section } => {
                write!(f, "section '{section}' not found in report; sheet '{sheet}' left empty")
            }
            Warning::EmptySection { section } => write!(f, "section '{section}' has no table"),
            Warning::UnsupportedFormat { sheet, rule, line, pattern, reason } => write!(
                f,
                "FORMAT{rule} (line {line}) on sheet '{sheet}': unsupported pattern '{pattern}': {reason}"
            ),
            Warning::EmptyChart { sheet, chart, line } => {
                write!(f, "CHART{chart} (line {line}) on sheet '{sheet}' has no data; skipped")
            }
        }
    }
}

/// Per-sheet line of the conversion summary.
#[derive(Clone, Debug, PartialEq)]
pub struct SheetSummary {
    pub name: String,
    pub section: String,
    pub rows_written: usize,
    pub companion_of: Option<String>,
}

/// Outcome of a successful conversion.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConversionReport {
    pub sheets: Vec<SheetSummary>,
    pub charts_bound: usize,
    pub warnings: Vec<Warning>,
}

impl ConversionReport {
    pub fn rows_written(&self) -> usize {
        self.sheets.iter().map(|sheet| sheet.rows_written).sum()
    }

    /// Summary lines printed at the end of a run, without the status marker.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .sheets
            .iter()
            .map(|sheet| match &sheet.companion_of {
                Some(host) => format!("{}: {} rows (companion of {host})", sheet.name, sheet.rows_written),
                None => format!("{}: {} rows", sheet.name, sheet.rows_written),
            })
            .collect();
        lines.extend(self.warnings.iter().map(|warning| format!("warning: {warning}")));
        lines
    }
}
