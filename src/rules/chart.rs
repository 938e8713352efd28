use super::range::format_range_list;
use super::range::SheetRange;
use std::fmt::Display;
use std::str::FromStr;

/// Chart types a CHART line may declare.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
    Column,
    Area,
    Pie,
    Scatter,
    Doughnut,
    Radar,
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LINE" => Ok(ChartKind::Line),
            "BAR" => Ok(ChartKind::Bar),
            "COLUMN" => Ok(ChartKind::Column),
            "AREA" => Ok(ChartKind::Area),
            "PIE" => Ok(ChartKind::Pie),
            "SCATTER" => Ok(ChartKind::Scatter),
            "DOUGHNUT" => Ok(ChartKind::Doughnut),
            "RADAR" => Ok(ChartKind::Radar),
            other => Err(other.to_owned()),
        }
    }
}

impl Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ChartKind::Line => "LINE",
            ChartKind::Bar => "BAR",
            ChartKind::Column => "COLUMN",
            ChartKind::Area => "AREA",
            ChartKind::Pie => "PIE",
            ChartKind::Scatter => "SCATTER",
            ChartKind::Doughnut => "DOUGHNUT",
            ChartKind::Radar => "RADAR",
        };
        write!(f, "{name}")
    }
}

/// A compiled CHART declaration.
#[derive(Clone, Debug)]
pub struct ChartRule {
    /// Suffix after `CHART` (`CHART3=` gives `"3"`)
    pub id: String,
    /// Sheet the chart is drawn on
    pub host: String,
    /// X axis categories; only present when two or more ranges were given
    pub category_range: Option<SheetRange>,
    /// One series per column of each range
    pub data_ranges: Vec<SheetRange>,
    pub active: bool,
    /// Name of the query the chart was designed against; informational
    pub source: String,
    pub title: String,
    /// 1-based anchor row on the host sheet
    pub anchor_row: usize,
    /// 1-based anchor column on the host sheet
    pub anchor_col: usize,
    pub kind: ChartKind,
    pub legend: bool,
    pub x_format: Option<String>,
    pub x_title: Option<String>,
    /// 1-based source line; diagnostics only
    pub line: usize,
}

impl ChartRule {
    /// All ranges in declaration order, categories first.
    pub fn ranges(&self) -> Vec<&SheetRange> {
        self.category_range.iter().chain(self.data_ranges.iter()).collect()
    }
}

impl PartialEq for ChartRule {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.host == other.host
            && self.category_range == other.category_range
            && self.data_ranges == other.data_ranges
            && self.active == other.active
            && self.source == other.source
            && self.title == other.title
            && self.anchor_row == other.anchor_row
            && self.anchor_col == other.anchor_col
            && self.kind == other.kind
            && self.legend == other.legend
            && self.x_format == other.x_format
            && self.x_title == other.x_title
    }
}

impl Display for ChartRule {
    /// Canonical CHART line, with the host always spelled out.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ranges: Vec<SheetRange> = self.ranges().into_iter().cloned().collect();
        write!(
            f,
            "CHART{}={},{},{},{},{},{},{},{},{}",
            self.id,
            self.host,
            format_range_list(&ranges),
            if self.active { "ACTIVE" } else { "INACTIVE" },
            self.source,
            self.title,
            self.anchor_row,
            self.anchor_col,
            self.kind,
            if self.legend { "TRUE" } else { "FALSE" },
        )?;
        match (&self.x_format, &self.x_title) {
            (None, None) => Ok(()),
            (x_format, None) => write!(f, ",{}", x_format.as_deref().unwrap_or_default()),
            (x_format, Some(x_title)) => {
                write!(f, ",{},{}", x_format.as_deref().unwrap_or_default(), x_title)
            }
        }
    }
}
