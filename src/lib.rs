//! # AWR Sheet
//!
//! Converts the HTML spool of an Oracle AWR SQL*Plus script into a formatted
//! xlsx workbook, driven by a declarative rule file. The same rule file also
//! generates the SQL*Plus script that produces the spool.
//!
//! ## Features
//!
//! - **Rule file**: one `[section]` per sheet holding its query, plus `FORMAT`
//!   and `CHART` declarations with `row.col:row.col` ranges
//! - **Report extraction**: tables located by the `SQL> rem [name]` echo that
//!   precedes each query's output
//! - **Overshooting ranges**: `E` or `65535` clamp to the rows actually present
//! - **Cell typing**: numbers with thousands separators and dates become real
//!   values; header rows stay text
//! - **Charts**: series bound by column, read from the host sheet or a hidden
//!   `<sheet>_sqlN` companion sheet
//! - **All-or-nothing output**: configuration errors abort before any file is
//!   written and workbooks are saved atomically
//!
//! ## Binaries
//!
//! - `awr2xlsx`: report (or glob of reports) to workbook
//! - `ini2sql`: rule file to SQL*Plus script

pub mod cli;
pub mod debug;
pub mod diagnostics;
pub mod error;
pub mod helpers;
pub mod logging;
pub mod options;
pub mod pipeline;
pub mod report;
pub mod rules;
pub mod script;
pub mod workbook;

pub use diagnostics::ConversionReport;
pub use diagnostics::Warning;
pub use error::AwrSheetError;
pub use options::ConvertOptions;
pub use options::ScriptOptions;
pub use pipeline::convert_document;
pub use pipeline::convert_file;
pub use rules::compile;
pub use rules::RuleSet;
