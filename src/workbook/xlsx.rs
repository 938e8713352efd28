//! `.xlsx` backend on top of `rust_xlsxwriter`.

use super::cell::CellValue;
use super::sink::ChartHandle;
use super::sink::WorkbookSink;
use super::style::Alignment;
use super::style::CellStyle;
use super::style::StyleId;
use super::SeriesBinding;
use crate::error::AwrSheetError;
use crate::rules::chart::ChartKind;
use anyhow::anyhow;
use rust_xlsxwriter::Chart;
use rust_xlsxwriter::ChartFont;
use rust_xlsxwriter::ChartFormat;
use rust_xlsxwriter::ChartLegendPosition;
use rust_xlsxwriter::ChartType;
use rust_xlsxwriter::Format;
use rust_xlsxwriter::FormatAlign;
use rust_xlsxwriter::Workbook;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

const TITLE_FONT: &str = "Arial";
const TITLE_FONT_SIZE: u32 = 10;

struct PendingChart {
    sheet: String,
    chart: Chart,
    anchor: (u32, u16),
}

/// Sink producing a workbook with `rust_xlsxwriter`. Charts are inserted
/// when the workbook is serialised, after all their series are known.
pub struct XlsxSink {
    workbook: Workbook,
    formats: HashMap<StyleId, Format>,
    charts: Vec<PendingChart>,
}

impl Default for XlsxSink {
    fn default() -> Self {
        Self::new()
    }
}

impl XlsxSink {
    pub fn new() -> Self {
        XlsxSink { workbook: Workbook::new(), formats: HashMap::new(), charts: Vec::new() }
    }

    fn chart(&mut self, handle: ChartHandle) -> Result<&mut PendingChart, AwrSheetError> {
        self.charts
            .get_mut(handle)
            .ok_or_else(|| anyhow!("Unknown chart handle {handle}").into())
    }

    /// Serialises the workbook into memory.
    pub fn into_buffer(mut self) -> Result<Vec<u8>, AwrSheetError> {
        for pending in &self.charts {
            let worksheet = self.workbook.worksheet_from_name(&pending.sheet)?;
            worksheet.insert_chart(pending.anchor.0, pending.anchor.1, &pending.chart)?;
        }
        Ok(self.workbook.save_to_buffer()?)
    }

    /// Writes the workbook to `path` through a temporary file in the same
    /// directory, so `path` is either the complete workbook or untouched.
    pub fn save(self, path: &Path) -> Result<(), AwrSheetError> {
        let buffer = self.into_buffer()?;
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(directory)?;
        file.write_all(&buffer)?;
        file.flush()?;
        file.persist(path)?;
        info!(path = %path.display(), bytes = buffer.len(), "saved workbook");
        Ok(())
    }
}

fn row_number(row: usize) -> Result<u32, AwrSheetError> {
    u32::try_from(row).map_err(|_| anyhow!("Row {row} out of range").into())
}

fn col_number(col: usize) -> Result<u16, AwrSheetError> {
    u16::try_from(col).map_err(|_| anyhow!("Column {col} out of range").into())
}

fn chart_type(kind: ChartKind) -> ChartType {
    match kind {
        ChartKind::Line => ChartType::Line,
        ChartKind::Bar => ChartType::Bar,
        ChartKind::Column => ChartType::Column,
        ChartKind::Area => ChartType::Area,
        ChartKind::Pie => ChartType::Pie,
        ChartKind::Scatter => ChartType::Scatter,
        ChartKind::Doughnut => ChartType::Doughnut,
        ChartKind::Radar => ChartType::Radar,
    }
}

impl WorkbookSink for XlsxSink {
    fn define_style(&mut self, id: StyleId, style: &CellStyle) -> Result<(), AwrSheetError> {
        let mut format = Format::new().set_align(match style.align {
            Alignment::Left => FormatAlign::Left,
            Alignment::Right => FormatAlign::Right,
        });
        if let Some(num_format) = &style.num_format {
            format = format.set_num_format(num_format);
        }
        self.formats.insert(id, format);
        Ok(())
    }

    fn create_sheet(&mut self, name: &str, hidden: bool) -> Result<(), AwrSheetError> {
        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(name)?;
        if hidden {
            worksheet.set_hidden(true);
        }
        Ok(())
    }

    fn write_cell(
        &mut self,
        sheet: &str,
        row: usize,
        col: usize,
        value: &CellValue,
        style: Option<StyleId>,
    ) -> Result<(), AwrSheetError> {
        let (row, col) = (row_number(row)?, col_number(col)?);
        let format = match style {
            Some(id) => Some(self.formats.get(&id).ok_or_else(|| anyhow!("Undefined style {}", id.0))?),
            None => None,
        };
        let worksheet = self.workbook.worksheet_from_name(sheet)?;
        match (value, format) {
            (CellValue::Empty, _) => {}
            (CellValue::Text(text), Some(format)) => {
                worksheet.write_string_with_format(row, col, text, format)?;
            }
            (CellValue::Text(text), None) => {
                worksheet.write_string(row, col, text)?;
            }
            (value, format) => {
                let number = value.as_number().unwrap_or_default();
                match format {
                    Some(format) => worksheet.write_number_with_format(row, col, number, format)?,
                    None => worksheet.write_number(row, col, number)?,
                };
            }
        }
        Ok(())
    }

    fn create_chart(&mut self, sheet: &str, kind: ChartKind) -> Result<ChartHandle, AwrSheetError> {
        let mut chart = Chart::new(chart_type(kind));
        chart.chart_area().set_format(ChartFormat::new().set_no_border());
        self.charts.push(PendingChart { sheet: sheet.to_owned(), chart, anchor: (0, 0) });
        Ok(self.charts.len() - 1)
    }

    fn set_chart_title(&mut self, chart: ChartHandle, title: &str) -> Result<(), AwrSheetError> {
        let pending = self.chart(chart)?;
        pending
            .chart
            .title()
            .set_name(title)
            .set_font(ChartFont::new().set_name(TITLE_FONT).set_size(TITLE_FONT_SIZE));
        Ok(())
    }

    fn set_chart_x_axis(
        &mut self,
        chart: ChartHandle,
        title: Option<&str>,
        num_format: Option<&str>,
    ) -> Result<(), AwrSheetError> {
        let pending = self.chart(chart)?;
        let axis = pending.chart.x_axis();
        if let Some(title) = title {
            axis.set_name(title);
        }
        if let Some(num_format) = num_format {
            axis.set_num_format(num_format);
        }
        Ok(())
    }

    fn set_chart_legend(&mut self, chart: ChartHandle, visible: bool) -> Result<(), AwrSheetError> {
        let pending = self.chart(chart)?;
        if visible {
            pending.chart.legend().set_position(ChartLegendPosition::Right).set_overlay(true);
        } else {
            pending.chart.legend().set_hidden();
        }
        Ok(())
    }

    fn bind_series(&mut self, chart: ChartHandle, series: &SeriesBinding) -> Result<(), AwrSheetError> {
        let values = &series.values;
        let values_range = (
            values.sheet.as_str(),
            row_number(values.rect.first_row)?,
            col_number(values.rect.first_col)?,
            row_number(values.rect.last_row)?,
            col_number(values.rect.last_col)?,
        );
        let name = match &series.name {
            Some((sheet, row, col)) => Some((sheet.clone(), row_number(*row)?, col_number(*col)?)),
            None => None,
        };
        let categories = match &series.categories {
            Some(categories) => Some((
                categories.sheet.clone(),
                row_number(categories.rect.first_row)?,
                col_number(categories.rect.first_col)?,
                row_number(categories.rect.last_row)?,
                col_number(categories.rect.last_col)?,
            )),
            None => None,
        };

        let pending = self.chart(chart)?;
        let chart_series = pending.chart.add_series();
        chart_series.set_values(values_range);
        if let Some((sheet, row, col)) = &name {
            chart_series.set_name((sheet.as_str(), *row, *col));
        }
        if let Some((sheet, first_row, first_col, last_row, last_col)) = &categories {
            chart_series.set_categories((sheet.as_str(), *first_row, *first_col, *last_row, *last_col));
        }
        Ok(())
    }

    fn set_chart_anchor(&mut self, chart: ChartHandle, row: usize, col: usize) -> Result<(), AwrSheetError> {
        let anchor = (row_number(row)?, col_number(col)?);
        self.chart(chart)?.anchor = anchor;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::range::CellRect;
    use crate::workbook::SheetRect;

    #[test]
    fn buffer_is_a_zip_container() {
        let mut sink = XlsxSink::new();
        sink.define_style(StyleId(0), &CellStyle::number("###,##0")).unwrap();
        sink.create_sheet("load", false).unwrap();
        sink.create_sheet("load_sql2", true).unwrap();
        sink.write_cell("load", 0, 0, &CellValue::Text("TPS".to_owned()), None).unwrap();
        sink.write_cell("load", 1, 0, &CellValue::Number(1234.0), Some(StyleId(0))).unwrap();
        let handle = sink.create_chart("load", ChartKind::Line).unwrap();
        sink.set_chart_title(handle, "Transactions").unwrap();
        sink.set_chart_legend(handle, false).unwrap();
        sink.bind_series(
            handle,
            &SeriesBinding {
                name: Some(("load".to_owned(), 0, 0)),
                values: SheetRect {
                    sheet: "load".to_owned(),
                    rect: CellRect { first_row: 1, first_col: 0, last_row: 1, last_col: 0 },
                },
                categories: None,
            },
        )
        .unwrap();
        sink.set_chart_anchor(handle, 1, 4).unwrap();

        let bytes = sink.into_buffer().unwrap();
        assert_eq!(&bytes[0..2], b"PK");
    }

    #[test]
    fn unknown_style_and_chart_are_errors() {
        let mut sink = XlsxSink::new();
        sink.create_sheet("load", false).unwrap();
        assert!(sink.write_cell("load", 0, 0, &CellValue::Number(1.0), Some(StyleId(3))).is_err());
        assert!(sink.set_chart_title(7, "x").is_err());
    }

    #[test]
    fn save_replaces_target_atomically() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("awr.xlsx");
        std::fs::write(&path, b"old").unwrap();

        let mut sink = XlsxSink::new();
        sink.create_sheet("load", false).unwrap();
        sink.save(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[0..2], b"PK");
        let leftovers = std::fs::read_dir(directory.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }
}
