use crate::helpers::string::parse_date_time;
use crate::helpers::string::parse_number;
use chrono::NaiveDate;
use chrono::NaiveDateTime;

/// A typed cell value as it will be stored in the workbook.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    DateTime { value: NaiveDateTime, has_time: bool },
    Text(String),
}

impl CellValue {
    /// Header cells are never typed.
    pub fn header(text: &str) -> Self {
        if text.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(text.to_owned())
        }
    }

    /// Types a data cell from its text alone: dates first, then numbers,
    /// otherwise the text is kept verbatim.
    pub fn classify(text: &str) -> Self {
        if text.is_empty() {
            return CellValue::Empty;
        }
        if let Some((value, has_time)) = parse_date_time(text) {
            return CellValue::DateTime { value, has_time };
        }
        match parse_number(text) {
            Some(number) => CellValue::Number(number),
            None => CellValue::Text(text.to_owned()),
        }
    }

    /// Value as an Excel number, dates converted to serial days.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(number) => Some(*number),
            CellValue::DateTime { value, .. } => Some(excel_serial(value)),
            _ => None,
        }
    }
}

/// Days since 1899-12-30 with the time of day as fraction (1900 date system).
pub fn excel_serial(value: &NaiveDateTime) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default();
    let duration = *value - epoch;
    duration.num_milliseconds() as f64 / 86_400_000.0
}
