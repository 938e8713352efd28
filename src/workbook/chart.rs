//! Chart Binder: attaches compiled CHART rules to the written sheets.

use super::ChartModel;
use super::SeriesBinding;
use super::SheetRect;
use super::WorkbookModel;
use crate::diagnostics::Warning;
use crate::rules::chart::ChartRule;
use crate::rules::range::CellRect;
use crate::rules::range::SheetRange;
use crate::rules::RuleSet;
use thiserror::Error;
use tracing::debug;
use tracing::warn;

#[derive(Error, Debug, PartialEq)]
pub enum BindError {
    #[error("CHART{chart} (line {line}) on sheet '{host}' references missing sheet '{sheet}'")]
    MissingSheet {
        chart: String,
        line: usize,
        host: String,
        sheet: String,
    },

    #[error("CHART{chart} (line {line}) has a {axis} position below 1")]
    InvalidAnchor {
        chart: String,
        line: usize,
        axis: &'static str,
    },
}

/// Binds every active chart of `rules` into `model`, which must already hold
/// all sheets. Returns the number of charts placed.
pub fn bind_charts(
    model: &mut WorkbookModel,
    rules: &RuleSet,
    warnings: &mut Vec<Warning>,
) -> Result<usize, BindError> {
    let mut bound = Vec::new();
    for rule in rules.chart_rules() {
        if !rule.active {
            debug!(chart = %rule.id, line = rule.line, "skipping inactive chart");
            continue;
        }
        let chart = bind_chart(model, rule)?;
        if chart.series.is_empty() {
            let warning = Warning::EmptyChart { sheet: rule.host.clone(), chart: rule.id.clone(), line: rule.line };
            warn!("{warning}");
            warnings.push(warning);
            continue;
        }
        debug!(
            chart = %rule.id,
            sheet = %rule.host,
            series = chart.series.len(),
            points = chart.series.first().map_or(0, |series| series.values.rect.row_count()),
            row = chart.anchor_row,
            col = chart.anchor_col,
            "bound chart"
        );
        bound.push((rule.host.clone(), chart));
    }

    let count = bound.len();
    for (host, chart) in bound {
        if let Some(sheet) = model.sheet_mut(&host) {
            sheet.charts.push(chart);
        }
    }
    Ok(count)
}

fn missing_sheet(rule: &ChartRule, sheet: &str) -> BindError {
    BindError::MissingSheet {
        chart: rule.id.clone(),
        line: rule.line,
        host: rule.host.clone(),
        sheet: sheet.to_owned(),
    }
}

/// Resolves a range against the sheet it reads from.
fn resolve(model: &WorkbookModel, rule: &ChartRule, range: &SheetRange) -> Result<Option<SheetRect>, BindError> {
    let name = range.sheet_or(&rule.host);
    let sheet = model.sheet(name).ok_or_else(|| missing_sheet(rule, name))?;
    Ok(range
        .range
        .resolve(sheet.row_count, sheet.col_count)
        .map(|rect| SheetRect { sheet: sheet.name.clone(), rect }))
}

fn bind_chart(model: &WorkbookModel, rule: &ChartRule) -> Result<ChartModel, BindError> {
    if model.sheet(&rule.host).is_none() {
        return Err(missing_sheet(rule, &rule.host));
    }

    let categories = match &rule.category_range {
        Some(range) => resolve(model, rule, range)?,
        None => None,
    };

    let anchor = |position: usize, axis: &'static str| {
        position.checked_sub(1).ok_or_else(|| BindError::InvalidAnchor {
            chart: rule.id.clone(),
            line: rule.line,
            axis,
        })
    };
    let anchor_row = anchor(rule.anchor_row, "row")?;
    let anchor_col = anchor(rule.anchor_col, "column")?;

    let mut series = Vec::new();
    for range in &rule.data_ranges {
        let Some(data) = resolve(model, rule, range)? else {
            continue;
        };
        let rect = data.rect;
        // the header row is never plotted; categories move down with the values
        let (first_row, series_categories) = if rect.first_row == 0 {
            (1, categories.as_ref().and_then(below_header))
        } else {
            (rect.first_row, categories.clone())
        };
        if first_row > rect.last_row {
            continue;
        }
        let header = model.sheet(&data.sheet);
        series.reserve(rect.col_count());
        for col in rect.first_col..=rect.last_col {
            let name = header
                .filter(|_| rect.first_row == 0)
                .and_then(|sheet| sheet.cell(0, col))
                .map(|_| (data.sheet.clone(), 0, col));
            series.push(SeriesBinding {
                name,
                values: SheetRect {
                    sheet: data.sheet.clone(),
                    rect: CellRect { first_row, first_col: col, last_row: rect.last_row, last_col: col },
                },
                categories: series_categories.clone(),
            });
        }
    }

    Ok(ChartModel {
        kind: rule.kind,
        title: rule.title.clone(),
        anchor_row,
        anchor_col,
        series,
        legend: rule.legend,
        x_format: rule.x_format.clone(),
        x_title: rule.x_title.clone(),
    })
}

/// `categories` shifted one row down, `None` when nothing is left.
fn below_header(categories: &SheetRect) -> Option<SheetRect> {
    let rect = categories.rect;
    let first_row = rect.first_row + 1;
    if first_row > rect.last_row {
        return None;
    }
    Some(SheetRect { sheet: categories.sheet.clone(), rect: CellRect { first_row, ..rect } })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::compile;
    use crate::workbook::cell::CellValue;
    use crate::workbook::SheetModel;
    use crate::workbook::WrittenCell;
    use pretty_assertions::assert_eq;

    fn sheet(name: &str, rows: usize, cols: usize) -> SheetModel {
        let mut sheet = SheetModel::new(name);
        sheet.row_count = rows;
        sheet.col_count = cols;
        sheet
    }

    fn model(sheets: Vec<SheetModel>) -> WorkbookModel {
        WorkbookModel { sheets, ..Default::default() }
    }

    #[test]
    fn companion_series_clamp_to_extent() {
        let rules = compile(
            "[load]\nselect 1\n[load_sql2]\nselect 2\n\
             CHART1=load,[load_sql2!2.1:65535.10],ACTIVE,load,Rank,2,56,LINE",
        )
        .unwrap();
        let mut workbook = model(vec![sheet("load", 5, 3), sheet("load_sql2", 40, 12)]);
        let mut warnings = Vec::new();
        assert_eq!(bind_charts(&mut workbook, &rules, &mut warnings), Ok(1));

        let chart = &workbook.sheet("load").unwrap().charts[0];
        assert_eq!((chart.anchor_row, chart.anchor_col), (1, 55));
        assert_eq!(chart.series.len(), 10);
        let first = &chart.series[0];
        assert_eq!(first.name, None);
        assert_eq!(first.values.sheet, "load_sql2");
        assert_eq!(first.values.rect.to_string(), "A2:A40");
        assert_eq!(chart.series[9].values.rect.to_string(), "J2:J40");
        assert!(warnings.is_empty());
    }

    #[test]
    fn header_row_names_series() {
        let rules = compile("[load]\nselect 1\nCHART1=,[1.1:E.1/1.2:E.3],ACTIVE,load,TPS,1,5,LINE").unwrap();
        let mut load = sheet("load", 4, 3);
        for (col, header) in ["SNAP_TIME", "TPS"].into_iter().enumerate() {
            load.cells.push(WrittenCell { row: 0, col, value: CellValue::header(header), style: None });
        }
        let mut workbook = model(vec![load]);
        bind_charts(&mut workbook, &rules, &mut Vec::new()).unwrap();

        let chart = &workbook.sheets[0].charts[0];
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].name, Some(("load".to_owned(), 0, 1)));
        assert_eq!(chart.series[0].values.rect.to_string(), "B2:B4");
        // no header text in C1
        assert_eq!(chart.series[1].name, None);
        assert_eq!(chart.series[1].values.rect.to_string(), "C2:C4");
        for series in &chart.series {
            let categories = series.categories.as_ref().unwrap();
            assert_eq!(categories.rect.to_string(), "A2:A4");
        }
    }

    #[test]
    fn categories_below_data_start_stay_put() {
        let rules = compile("[load]\nselect 1\nCHART1=,[2.1:E.1/2.2:E.2],ACTIVE,load,TPS,1,5,LINE").unwrap();
        let mut workbook = model(vec![sheet("load", 4, 2)]);
        bind_charts(&mut workbook, &rules, &mut Vec::new()).unwrap();

        let series = &workbook.sheets[0].charts[0].series[0];
        assert_eq!(series.values.rect.to_string(), "B2:B4");
        assert_eq!(series.categories.as_ref().unwrap().rect.to_string(), "A2:A4");
    }

    #[test]
    fn zero_anchor_is_rejected() {
        let mut rules = compile("[load]\nselect 1\nCHART2=,[2.2:E.2],ACTIVE,load,TPS,1,5,LINE").unwrap();
        rules.sheets[0].chart_rules[0].anchor_col = 0;
        let mut workbook = model(vec![sheet("load", 4, 2)]);
        assert_eq!(
            bind_charts(&mut workbook, &rules, &mut Vec::new()),
            Err(BindError::InvalidAnchor { chart: "2".to_owned(), line: 3, axis: "column" })
        );
        assert!(workbook.sheets[0].charts.is_empty());
    }

    #[test]
    fn chart_without_rows_is_skipped_with_warning() {
        let rules = compile("[load]\nselect 1\nCHART4=,[1.1:E.1/1.2:E.3],ACTIVE,load,TPS,1,5,LINE").unwrap();
        let mut workbook = model(vec![sheet("load", 1, 3)]);
        let mut warnings = Vec::new();
        assert_eq!(bind_charts(&mut workbook, &rules, &mut warnings), Ok(0));
        assert!(workbook.sheets[0].charts.is_empty());
        assert_eq!(
            warnings,
            vec![Warning::EmptyChart { sheet: "load".to_owned(), chart: "4".to_owned(), line: 3 }]
        );
    }

    #[test]
    fn inactive_charts_are_not_bound() {
        let rules = compile("[load]\nselect 1\nCHART1=,[1.2:E.3],INACTIVE,load,TPS,1,5,LINE").unwrap();
        let mut workbook = model(vec![sheet("load", 10, 3)]);
        assert_eq!(bind_charts(&mut workbook, &rules, &mut Vec::new()), Ok(0));
        assert!(workbook.sheets[0].charts.is_empty());
    }

    #[test]
    fn missing_referenced_sheet_is_fatal() {
        let rules = compile("[load]\nselect 1\n[load_sql2]\nselect 2\nCHART1=load,[load_sql2!2.1:E.3],ACTIVE,x,t,1,1,BAR")
            .unwrap();
        let mut workbook = model(vec![sheet("load", 10, 3)]);
        let error = bind_charts(&mut workbook, &rules, &mut Vec::new()).unwrap_err();
        assert_eq!(
            error,
            BindError::MissingSheet {
                chart: "1".to_owned(),
                line: 5,
                host: "load".to_owned(),
                sheet: "load_sql2".to_owned(),
            }
        );
    }
}
