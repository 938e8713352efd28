//! Conversion pipeline: compile, extract, write, bind, then hand the finished
//! workbook to a sink. Every fatal error surfaces before the sink sees a
//! single call, so a failed run never leaves a partial workbook behind.

use crate::debug::DebugReporter;
use crate::diagnostics::ConversionReport;
use crate::diagnostics::SheetSummary;
use crate::error::AwrSheetError;
use crate::error::ResultMessage;
use crate::helpers::reader::read_text;
use crate::options::ConvertOptions;
use crate::report::config_reference;
use crate::report::extract_sections;
use crate::report::ExtractedTable;
use crate::rules::compile;
use crate::rules::RuleSet;
use crate::workbook::chart::bind_charts;
use crate::workbook::sink::WorkbookSink;
use crate::workbook::writer::write_sheet;
use crate::workbook::xlsx::XlsxSink;
use crate::workbook::WorkbookModel;
use std::path::Path;
use std::path::PathBuf;
use tracing::info;
use tracing::warn;

/// Builds the in-memory workbook for `document` according to `rules`.
pub fn build_workbook(
    rules: &RuleSet,
    document: &str,
    options: &ConvertOptions,
    reporter: &mut DebugReporter,
) -> Result<(WorkbookModel, ConversionReport), AwrSheetError> {
    reporter.rules(rules);

    let requested: Vec<(&str, &str)> = rules
        .sheets
        .iter()
        .map(|sheet| (sheet.name.as_str(), sheet.source_section.as_str()))
        .collect();
    let extraction = extract_sections(document, &requested);
    info!(sheets = requested.len(), found = extraction.tables.len(), "extracted report sections");

    let mut report = ConversionReport::default();
    for warning in &extraction.warnings {
        warn!("{warning}");
    }
    report.warnings.extend(extraction.warnings.iter().cloned());

    let mut model = WorkbookModel::default();
    for (index, spec) in rules.sheets.iter().enumerate() {
        let empty = ExtractedTable::empty(&spec.source_section);
        let table = extraction.table(&spec.source_section).unwrap_or(&empty);
        // the first sheet stays visible, a workbook needs one
        let hidden = options.hide_companions && spec.companion_of.is_some() && index > 0;
        let rows_written = write_sheet(&mut model, spec, table, options, hidden, &mut report.warnings);
        reporter.sheet_written(&spec.name, rows_written);
        report.sheets.push(SheetSummary {
            name: spec.name.clone(),
            section: spec.source_section.clone(),
            rows_written,
            companion_of: spec.companion_of.clone(),
        });
    }

    report.charts_bound = bind_charts(&mut model, rules, &mut report.warnings)?;
    info!(
        sheets = report.sheets.len(),
        rows = report.rows_written(),
        charts = report.charts_bound,
        warnings = report.warnings.len(),
        "built workbook"
    );
    Ok((model, report))
}

/// Converts report text with rule file text into `sink`.
pub fn convert_document(
    rules_text: &str,
    document: &str,
    options: &ConvertOptions,
    reporter: &mut DebugReporter,
    sink: &mut dyn WorkbookSink,
) -> Result<ConversionReport, AwrSheetError> {
    let rules = compile(rules_text)?;
    let (model, report) = build_workbook(&rules, document, options, reporter)?;
    model.emit(sink)?;
    Ok(report)
}

/// Locates the rule file a report names in its `rem INI_NAME=` line:
/// next to the report first, then relative to the working directory.
pub fn resolve_rules_path(report_path: &Path, name: &str) -> Result<PathBuf, AwrSheetError> {
    let name = Path::new(name);
    if name.is_absolute() {
        return if name.is_file() {
            Ok(name.to_path_buf())
        } else {
            Err(AwrSheetError::WithContextError(format!("Rules file '{}' not found", name.display())))
        };
    }
    let beside_report = report_path.parent().map(|parent| parent.join(name));
    beside_report
        .into_iter()
        .chain(std::iter::once(name.to_path_buf()))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| {
            AwrSheetError::WithContextError(format!(
                "Rules file '{}' named by report '{}' not found",
                name.display(),
                report_path.display()
            ))
        })
}

/// Default output path: the input with an `.xlsx` extension.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("xlsx")
}

/// Converts the report at `input` into the workbook at `output`.
///
/// Without `rules_path` the rule file is discovered from the report itself.
pub fn convert_file(
    input: &Path,
    output: &Path,
    rules_path: Option<&Path>,
    options: &ConvertOptions,
    reporter: &mut DebugReporter,
) -> Result<ConversionReport, AwrSheetError> {
    let document = read_text(input, options.encoding.as_deref())
        .with_prefix(&format!("Failed to read report '{}'", input.display()))?;
    if document.lossy {
        warn!(path = %input.display(), encoding = document.encoding.name(), "report contains undecodable bytes");
    }

    let rules_path = match rules_path {
        Some(path) => path.to_path_buf(),
        None => {
            let name = config_reference(&document.text).ok_or_else(|| {
                AwrSheetError::WithContextError(format!(
                    "Report '{}' does not name its rules file (rem INI_NAME=...); pass one with -n",
                    input.display()
                ))
            })?;
            resolve_rules_path(input, &name)?
        }
    };
    info!(report = %input.display(), rules = %rules_path.display(), "converting report");
    reporter.line(&format!("rules file: {}", rules_path.display()));

    let rules_text = read_text(&rules_path, None)
        .with_prefix(&format!("Failed to read rules file '{}'", rules_path.display()))?;
    let rules = compile(&rules_text.text)?;
    let (model, report) = build_workbook(&rules, &document.text, options, reporter)?;

    let mut sink = XlsxSink::new();
    model.emit(&mut sink)?;
    sink.save(output)
        .with_prefix(&format!("Failed to write workbook '{}'", output.display()))?;
    Ok(report)
}
