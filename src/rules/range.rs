use regex::Regex;
use std::fmt::Display;
use std::sync::LazyLock;
use thiserror::Error;

/// Literal row/column value configuration authors use to mean "to the end".
pub const END_SENTINEL: usize = 65535;

static RANGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)(\d+|E)\.(\d+|E):(\d+|E)\.(\d+|E)$").expect("Hardcode regex pattern")
});

/// Errors related to `row.col:row.col` range parsing.
#[derive(Error, Debug, PartialEq)]
pub enum RangeError {
    #[error("Invalid range format '{0}'")]
    FormatError(String),

    #[error("Range '{0}' uses index 0; rows and columns are 1-based")]
    ZeroIndex(String),

    #[error("Sheet prefix missing before '!' in '{0}'")]
    EmptySheetPrefix(String),

    #[error("Empty range list")]
    EmptyList,
}

/// One coordinate of a range expression, 1-based as written.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Bound {
    /// Literal 1-based index
    At(usize),
    /// The `E` marker: last row/column of the data actually extracted
    End,
}

impl Bound {
    fn parse(text: &str, whole: &str) -> Result<Self, RangeError> {
        if text.eq_ignore_ascii_case("E") {
            return Ok(Bound::End);
        }
        match text.parse::<usize>() {
            Ok(0) => Err(RangeError::ZeroIndex(whole.to_owned())),
            Ok(index) => Ok(Bound::At(index)),
            Err(_) => Err(RangeError::FormatError(whole.to_owned())),
        }
    }

    /// 0-based index clamped to `extent - 1`; `extent` must be non-zero.
    fn clamp(self, extent: usize) -> usize {
        match self {
            Bound::At(index) => (index - 1).min(extent - 1),
            Bound::End => extent - 1,
        }
    }

    /// 0-based index for a lower bound. Overshoot is kept so that the caller
    /// can detect an empty rectangle.
    fn lower(self, extent: usize) -> usize {
        match self {
            Bound::At(index) => index - 1,
            Bound::End => extent - 1,
        }
    }
}

impl Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bound::At(index) => write!(f, "{index}"),
            Bound::End => write!(f, "E"),
        }
    }
}

/// A textual `r1.c1:r2.c2` rectangle, 1-based and inclusive, as it appears
/// in the rule file.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RangeExpr {
    pub first_row: Bound,
    pub first_col: Bound,
    pub last_row: Bound,
    pub last_col: Bound,
}

impl TryFrom<&str> for RangeExpr {
    type Error = RangeError;

    /// Parses `1.2:E.4`, `2.1:65535.10` and the like.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();
        let captures = RANGE_PATTERN
            .captures(value)
            .ok_or_else(|| RangeError::FormatError(value.to_owned()))?;
        Ok(RangeExpr {
            first_row: Bound::parse(&captures[1], value)?,
            first_col: Bound::parse(&captures[2], value)?,
            last_row: Bound::parse(&captures[3], value)?,
            last_col: Bound::parse(&captures[4], value)?,
        })
    }
}

impl Display for RangeExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}:{}.{}", self.first_row, self.first_col, self.last_row, self.last_col)
    }
}

impl RangeExpr {
    /// Resolves the expression against a table of `rows` x `cols` cells.
    ///
    /// Upper bounds at or beyond the extent clamp to the last row/column.
    /// Returns `None` when the table is empty or the lower bound lies past
    /// the clamped upper bound; both are expected for rules written against
    /// reports of varying length.
    pub fn resolve(&self, rows: usize, cols: usize) -> Option<CellRect> {
        if rows == 0 || cols == 0 {
            return None;
        }
        let rect = CellRect {
            first_row: self.first_row.lower(rows),
            first_col: self.first_col.lower(cols),
            last_row: self.last_row.clamp(rows),
            last_col: self.last_col.clamp(cols),
        };
        if rect.first_row > rect.last_row || rect.first_col > rect.last_col {
            None
        } else {
            Some(rect)
        }
    }
}

/// Concrete 0-based inclusive rectangle inside an extracted table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellRect {
    pub first_row: usize,
    pub first_col: usize,
    pub last_row: usize,
    pub last_col: usize,
}

impl CellRect {
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.first_row <= row && row <= self.last_row && self.first_col <= col && col <= self.last_col
    }

    pub fn row_count(&self) -> usize {
        self.last_row - self.first_row + 1
    }

    pub fn col_count(&self) -> usize {
        self.last_col - self.first_col + 1
    }
}

impl Display for CellRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reference = crate::helpers::reference::rect_to_reference(
            self.first_row,
            self.first_col,
            self.last_row,
            self.last_col,
        );
        write!(f, "{reference}")
    }
}

/// A range optionally qualified with the sheet it reads from (`sheet!1.1:E.3`).
/// Unqualified ranges refer to the sheet hosting the rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetRange {
    pub sheet: Option<String>,
    pub range: RangeExpr,
}

impl SheetRange {
    /// Name of the sheet this range reads from, given the hosting sheet.
    pub fn sheet_or<'a>(&'a self, host: &'a str) -> &'a str {
        self.sheet.as_deref().unwrap_or(host)
    }
}

impl TryFrom<&str> for SheetRange {
    type Error = RangeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();
        match value.split_once('!') {
            Some((sheet, range)) => {
                let sheet = sheet.trim();
                if sheet.is_empty() {
                    return Err(RangeError::EmptySheetPrefix(value.to_owned()));
                }
                Ok(SheetRange {
                    sheet: Some(sheet.to_owned()),
                    range: RangeExpr::try_from(range)?,
                })
            }
            None => Ok(SheetRange { sheet: None, range: RangeExpr::try_from(value)? }),
        }
    }
}

impl Display for SheetRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.sheet {
            Some(sheet) => write!(f, "{sheet}!{}", self.range),
            None => write!(f, "{}", self.range),
        }
    }
}

/// Parses a bracketed, `/`-separated list: `[1.2:E.2/load_sql2!1.31:E.32]`.
/// The brackets are optional.
pub fn parse_range_list(value: &str) -> Result<Vec<SheetRange>, RangeError> {
    let inner = value.trim().trim_start_matches('[').trim_end_matches(']');
    if inner.trim().is_empty() {
        return Err(RangeError::EmptyList);
    }
    inner.split('/').map(SheetRange::try_from).collect()
}

/// Inverse of [`parse_range_list`].
pub fn format_range_list(ranges: &[SheetRange]) -> String {
    let parts: Vec<String> = ranges.iter().map(|range| range.to_string()).collect();
    format!("[{}]", parts.join("/"))
}
