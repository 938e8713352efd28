use super::cell::CellValue;
use super::style::CellStyle;
use super::style::StyleId;
use super::SeriesBinding;
use crate::error::AwrSheetError;
use crate::rules::chart::ChartKind;

/// Chart created on a sink, valid for the sink that returned it.
pub type ChartHandle = usize;

/// Capabilities the converter needs from a workbook backend. The converter
/// never touches the container format itself.
pub trait WorkbookSink {
    fn define_style(&mut self, id: StyleId, style: &CellStyle) -> Result<(), AwrSheetError>;

    fn create_sheet(&mut self, name: &str, hidden: bool) -> Result<(), AwrSheetError>;

    fn write_cell(
        &mut self,
        sheet: &str,
        row: usize,
        col: usize,
        value: &CellValue,
        style: Option<StyleId>,
    ) -> Result<(), AwrSheetError>;

    /// Creates a chart to be placed on `sheet`.
    fn create_chart(&mut self, sheet: &str, kind: ChartKind) -> Result<ChartHandle, AwrSheetError>;

    fn set_chart_title(&mut self, chart: ChartHandle, title: &str) -> Result<(), AwrSheetError>;

    fn set_chart_x_axis(
        &mut self,
        chart: ChartHandle,
        title: Option<&str>,
        num_format: Option<&str>,
    ) -> Result<(), AwrSheetError>;

    fn set_chart_legend(&mut self, chart: ChartHandle, visible: bool) -> Result<(), AwrSheetError>;

    fn bind_series(&mut self, chart: ChartHandle, series: &SeriesBinding) -> Result<(), AwrSheetError>;

    /// Places the chart's top-left corner at a 0-based cell of its sheet.
    fn set_chart_anchor(&mut self, chart: ChartHandle, row: usize, col: usize) -> Result<(), AwrSheetError>;
}

/// A capability call as observed by [`RecordingSink`].
#[derive(Clone, Debug, PartialEq)]
pub enum SinkCall {
    DefineStyle(StyleId, CellStyle),
    CreateSheet(String, bool),
    WriteCell(String, usize, usize, CellValue, Option<StyleId>),
    CreateChart(ChartHandle, String, ChartKind),
    SetChartTitle(ChartHandle, String),
    SetChartXAxis(ChartHandle, Option<String>, Option<String>),
    SetChartLegend(ChartHandle, bool),
    BindSeries(ChartHandle, SeriesBinding),
    SetChartAnchor(ChartHandle, usize, usize),
}

/// Sink that records every call; used to inspect a conversion without
/// producing a file.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<SinkCall>,
    charts: usize,
}

impl WorkbookSink for RecordingSink {
    fn define_style(&mut self, id: StyleId, style: &CellStyle) -> Result<(), AwrSheetError> {
        self.calls.push(SinkCall::DefineStyle(id, style.clone()));
        Ok(())
    }

    fn create_sheet(&mut self, name: &str, hidden: bool) -> Result<(), AwrSheetError> {
        self.calls.push(SinkCall::CreateSheet(name.to_owned(), hidden));
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
        self.calls.push(SinkCall::WriteCell(sheet.to_owned(), row, col, value.clone(), style));
        Ok(())
    }

    fn create_chart(&mut self, sheet: &str, kind: ChartKind) -> Result<ChartHandle, AwrSheetError> {
        let handle = self.charts;
        self.charts += 1;
        self.calls.push(SinkCall::CreateChart(handle, sheet.to_owned(), kind));
        Ok(handle)
    }

    fn set_chart_title(&mut self, chart: ChartHandle, title: &str) -> Result<(), AwrSheetError> {
        self.calls.push(SinkCall::SetChartTitle(chart, title.to_owned()));
        Ok(())
    }

    fn set_chart_x_axis(
        &mut self,
        chart: ChartHandle,
        title: Option<&str>,
        num_format: Option<&str>,
    ) -> Result<(), AwrSheetError> {
        self.calls.push(SinkCall::SetChartXAxis(
            chart,
            title.map(str::to_owned),
            num_format.map(str::to_owned),
        ));
        Ok(())
    }

    fn set_chart_legend(&mut self, chart: ChartHandle, visible: bool) -> Result<(), AwrSheetError> {
        self.calls.push(SinkCall::SetChartLegend(chart, visible));
        Ok(())
    }

    fn bind_series(&mut self, chart: ChartHandle, series: &SeriesBinding) -> Result<(), AwrSheetError> {
        self.calls.push(SinkCall::BindSeries(chart, series.clone()));
        Ok(())
    }

    fn set_chart_anchor(&mut self, chart: ChartHandle, row: usize, col: usize) -> Result<(), AwrSheetError> {
        self.calls.push(SinkCall::SetChartAnchor(chart, row, col));
        Ok(())
    }
}
