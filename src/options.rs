use crate::workbook::cell::CellValue;
use crate::workbook::style::CellStyle;

pub const DEFAULT_NUMBER_FORMAT: &str = "###,##0";
pub const DEFAULT_DATE_FORMAT: &str = "yyyy/mm/dd";
pub const DEFAULT_DATETIME_FORMAT: &str = "yyyy/mm/dd hh:mm";
pub const DEFAULT_SNAPSHOT_FROM: u64 = 202601010000;
pub const DEFAULT_SNAPSHOT_TO: u64 = 202601150000;

/// Settings for converting a report into a workbook.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvertOptions {
    /// Format for numbers no FORMAT rule covers.
    pub number_format: String,

    /// Format for dates without a time of day.
    pub date_format: String,

    /// Format for dates with a time of day.
    pub datetime_format: String,

    /// Encoding label forced on the report instead of detection.
    pub encoding: Option<String>,

    /// Hide `<host>_sqlN` companion sheets in the workbook.
    pub hide_companions: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            number_format: DEFAULT_NUMBER_FORMAT.to_owned(),
            date_format: DEFAULT_DATE_FORMAT.to_owned(),
            datetime_format: DEFAULT_DATETIME_FORMAT.to_owned(),
            encoding: None,
            hide_companions: true,
        }
    }
}

impl ConvertOptions {
    pub fn with_number_format(mut self, number_format: &str) -> Self {
        self.number_format = number_format.to_owned();
        self
    }

    pub fn with_encoding(mut self, encoding: Option<String>) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_hide_companions(mut self, hide_companions: bool) -> Self {
        self.hide_companions = hide_companions;
        self
    }

    /// Style for a data cell no FORMAT rule covers.
    pub(crate) fn default_style(&self, value: &CellValue) -> Option<CellStyle> {
        match value {
            CellValue::Empty => None,
            CellValue::Number(_) => Some(CellStyle::number(&self.number_format)),
            CellValue::DateTime { has_time: false, .. } => Some(CellStyle::number(&self.date_format)),
            CellValue::DateTime { has_time: true, .. } => Some(CellStyle::number(&self.datetime_format)),
            CellValue::Text(_) => Some(CellStyle::text()),
        }
    }
}

/// Settings for generating the SQL*Plus script from a rule file.
#[derive(Clone, Debug, PartialEq)]
pub struct ScriptOptions {
    /// Snapshot window start, `YYYYMMDDHH24MI`.
    pub snapshot_from: u64,

    /// Snapshot window end, `YYYYMMDDHH24MI`.
    pub snapshot_to: u64,

    /// Rule file name echoed into the spool so the converter can find it.
    pub rules_name: String,
}

impl ScriptOptions {
    pub fn new(rules_name: &str) -> Self {
        ScriptOptions {
            snapshot_from: DEFAULT_SNAPSHOT_FROM,
            snapshot_to: DEFAULT_SNAPSHOT_TO,
            rules_name: rules_name.to_owned(),
        }
    }
}
