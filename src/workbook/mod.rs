//! In-memory workbook built by the sheet writer and the chart binder, and
//! replayed onto a [`sink::WorkbookSink`] once the whole run succeeded.

pub mod cell;
pub mod chart;
pub mod sink;
pub mod style;
pub mod writer;
pub mod xlsx;

use crate::error::AwrSheetError;
use crate::rules::chart::ChartKind;
use crate::rules::range::CellRect;
use cell::CellValue;
use sink::WorkbookSink;
use style::StyleId;
use style::StyleTable;
use tracing::debug;

#[derive(Clone, Debug, PartialEq)]
pub struct WrittenCell {
    pub row: usize,
    pub col: usize,
    pub value: CellValue,
    pub style: Option<StyleId>,
}

/// A rectangle on a named sheet.
#[derive(Clone, Debug, PartialEq)]
pub struct SheetRect {
    pub sheet: String,
    pub rect: CellRect,
}

/// One chart series: a single column of values, optionally named by its
/// header cell and labelled by a category rectangle.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesBinding {
    /// `(sheet, row, col)` of the header cell naming the series
    pub name: Option<(String, usize, usize)>,
    pub values: SheetRect,
    pub categories: Option<SheetRect>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChartModel {
    pub kind: ChartKind,
    pub title: String,
    /// 0-based anchor on the hosting sheet
    pub anchor_row: usize,
    pub anchor_col: usize,
    pub series: Vec<SeriesBinding>,
    pub legend: bool,
    pub x_format: Option<String>,
    pub x_title: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SheetModel {
    pub name: String,
    pub hidden: bool,
    /// Cells in row-major write order
    pub cells: Vec<WrittenCell>,
    pub rows_written: usize,
    /// Extent of the table the sheet was written from
    pub row_count: usize,
    pub col_count: usize,
    pub charts: Vec<ChartModel>,
}

impl SheetModel {
    pub fn new(name: &str) -> Self {
        SheetModel {
            name: name.to_owned(),
            hidden: false,
            cells: Vec::new(),
            rows_written: 0,
            row_count: 0,
            col_count: 0,
            charts: Vec::new(),
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&WrittenCell> {
        self.cells.iter().find(|cell| cell.row == row && cell.col == col)
    }
}

/// Sheets in output order plus the styles their cells refer to.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorkbookModel {
    pub sheets: Vec<SheetModel>,
    pub styles: StyleTable,
}

impl WorkbookModel {
    pub fn sheet(&self, name: &str) -> Option<&SheetModel> {
        self.sheets.iter().find(|sheet| sheet.name.to_lowercase() == name.to_lowercase())
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut SheetModel> {
        self.sheets.iter_mut().find(|sheet| sheet.name.to_lowercase() == name.to_lowercase())
    }

    pub fn chart_count(&self) -> usize {
        self.sheets.iter().map(|sheet| sheet.charts.len()).sum()
    }

    /// Replays the model onto `sink`: styles, then every sheet with its cells,
    /// then charts, which may reference any sheet.
    pub fn emit(&self, sink: &mut dyn WorkbookSink) -> Result<(), AwrSheetError> {
        for (id, style) in self.styles.iter() {
            sink.define_style(id, style)?;
        }
        for sheet in &self.sheets {
            sink.create_sheet(&sheet.name, sheet.hidden)?;
            for cell in &sheet.cells {
                sink.write_cell(&sheet.name, cell.row, cell.col, &cell.value, cell.style)?;
            }
        }
        for sheet in &self.sheets {
            for chart in &sheet.charts {
                let handle = sink.create_chart(&sheet.name, chart.kind)?;
                sink.set_chart_title(handle, &chart.title)?;
                sink.set_chart_x_axis(handle, chart.x_title.as_deref(), chart.x_format.as_deref())?;
                sink.set_chart_legend(handle, chart.legend)?;
                for series in &chart.series {
                    sink.bind_series(handle, series)?;
                }
                sink.set_chart_anchor(handle, chart.anchor_row, chart.anchor_col)?;
            }
        }
        debug!(sheets = self.sheets.len(), charts = self.chart_count(), styles = self.styles.len(), "emitted workbook");
        Ok(())
    }
}
