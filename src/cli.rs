//! Command-line surface of the `awr2xlsx` and `ini2sql` binaries. Both
//! binaries are thin wrappers around the `run_*` functions here.

use crate::debug::DebugReporter;
use crate::helpers::reader::read_text;
use crate::logging::init_logging;
use crate::options::ConvertOptions;
use crate::options::ScriptOptions;
use crate::options::DEFAULT_NUMBER_FORMAT;
use crate::options::DEFAULT_SNAPSHOT_FROM;
use crate::options::DEFAULT_SNAPSHOT_TO;
use crate::pipeline::convert_file;
use crate::pipeline::default_output_path;
use crate::rules::compile;
use crate::script::generate_script;
use crate::script::write_script;
use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "awr2xlsx",
    version,
    about = "Convert SQL*Plus AWR HTML spools into formatted xlsx workbooks with charts."
)]
pub struct ConvertArgs {
    /// Report to convert, or a glob pattern such as `AWR_*.html`.
    #[arg(short, long)]
    input: String,

    /// Output workbook (single input only; default: input with `.xlsx`).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Rules file (default: the `rem INI_NAME=` named by the report).
    #[arg(short = 'n', long = "rules")]
    rules: Option<PathBuf>,

    /// Print every compiled rule and written sheet.
    #[arg(long)]
    debug: bool,

    /// Force the report's text encoding (e.g. `euc-kr`, `utf-8`).
    #[arg(long)]
    encoding: Option<String>,

    /// Number format for cells no FORMAT rule covers.
    #[arg(long, default_value = DEFAULT_NUMBER_FORMAT)]
    number_format: String,

    /// Keep `<sheet>_sqlN` companion sheets visible.
    #[arg(long)]
    show_companions: bool,
}

#[derive(Parser, Debug)]
#[command(
    name = "ini2sql",
    version,
    about = "Generate the SQL*Plus script whose HTML spool awr2xlsx converts."
)]
pub struct ScriptArgs {
    /// Rules file.
    #[arg(short, long)]
    input: PathBuf,

    /// Output script (default: input with `.sql`).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Snapshot window start, YYYYMMDDHH24MI.
    #[arg(long, default_value_t = DEFAULT_SNAPSHOT_FROM)]
    from: u64,

    /// Snapshot window end, YYYYMMDDHH24MI.
    #[arg(long, default_value_t = DEFAULT_SNAPSHOT_TO)]
    to: u64,

    /// Print every compiled rule.
    #[arg(long)]
    debug: bool,
}

/// Expands a glob pattern; plain paths are returned as given.
fn expand_inputs(input: &str) -> Result<Vec<PathBuf>> {
    if !input.contains(['*', '?', '[']) {
        return Ok(vec![PathBuf::from(input)]);
    }
    let mut paths = Vec::new();
    for entry in glob::glob(input).with_context(|| format!("Invalid input pattern '{input}'"))? {
        paths.push(entry?);
    }
    if paths.is_empty() {
        bail!("No report matches '{input}'");
    }
    paths.sort();
    Ok(paths)
}

pub fn run_convert() -> Result<ExitCode> {
    let args = ConvertArgs::parse();
    init_logging(args.debug)?;
    run_convert_with_args(args)
}

pub fn run_convert_with_args(args: ConvertArgs) -> Result<ExitCode> {
    let inputs = expand_inputs(&args.input)?;
    if args.output.is_some() && inputs.len() > 1 {
        bail!("-o/--output needs a single input, '{}' matches {} reports", args.input, inputs.len());
    }

    let options = ConvertOptions::default()
        .with_number_format(&args.number_format)
        .with_encoding(args.encoding.clone())
        .with_hide_companions(!args.show_companions);

    let mut failures = 0;
    for input in &inputs {
        let output = args.output.clone().unwrap_or_else(|| default_output_path(input));
        if !convert_one(input, &output, args.rules.as_deref(), &options, args.debug) {
            failures += 1;
        }
    }
    Ok(if failures == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn convert_one(input: &Path, output: &Path, rules: Option<&Path>, options: &ConvertOptions, debug: bool) -> bool {
    let mut reporter = DebugReporter::new(debug);
    match convert_file(input, output, rules, options, &mut reporter) {
        Ok(report) => {
            for line in report.summary_lines() {
                println!("{line}");
            }
            println!(
                "[OK] {} -> {}: {} sheets, {} rows, {} charts, {} warnings",
                input.display(),
                output.display(),
                report.sheets.len(),
                report.rows_written(),
                report.charts_bound,
                report.warnings.len()
            );
            true
        }
        Err(error) => {
            eprintln!("[FAIL] {}: {error}", input.display());
            false
        }
    }
}

pub fn run_script() -> Result<ExitCode> {
    let args = ScriptArgs::parse();
    init_logging(args.debug)?;
    run_script_with_args(args)
}

pub fn run_script_with_args(args: ScriptArgs) -> Result<ExitCode> {
    let output = args.output.clone().unwrap_or_else(|| args.input.with_extension("sql"));

    let text = read_text(&args.input, None).with_context(|| format!("Failed to read '{}'", args.input.display()))?;
    let rules = match compile(&text.text) {
        Ok(rules) => rules,
        Err(error) => {
            eprintln!("[FAIL] {}: {error}", args.input.display());
            return Ok(ExitCode::FAILURE);
        }
    };
    DebugReporter::new(args.debug).rules(&rules);

    let options = ScriptOptions {
        snapshot_from: args.from,
        snapshot_to: args.to,
        rules_name: args.input.display().to_string(),
    };
    let script = generate_script(&rules, &options);
    write_script(&output, &script).with_context(|| format!("Failed to write '{}'", output.display()))?;
    println!("[OK] {} -> {}: {} queries", args.input.display(), output.display(), rules.sheets.len());
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn argument_definitions_are_valid() {
        ConvertArgs::command().debug_assert();
        ScriptArgs::command().debug_assert();
    }

    #[test]
    fn parse_convert_arguments() {
        let args = ConvertArgs::parse_from(["awr2xlsx", "-i", "awr.html", "-n", "rules.ini", "--debug"]);
        assert_eq!(args.input, "awr.html");
        assert_eq!(args.rules, Some(PathBuf::from("rules.ini")));
        assert_eq!(args.number_format, "###,##0");
        assert!(args.debug);
        assert!(!args.show_companions);
    }

    #[test]
    fn parse_script_arguments() {
        let args = ScriptArgs::parse_from(["ini2sql", "-i", "awr.ini", "--from", "202101260000"]);
        assert_eq!(args.from, 202101260000);
        assert_eq!(args.to, 202601150000);
        assert_eq!(args.output, None);
    }

    #[test]
    fn plain_input_is_not_globbed() {
        assert_eq!(expand_inputs("no_such.html").unwrap(), vec![PathBuf::from("no_such.html")]);
    }

    #[test]
    fn glob_input_expands_sorted() {
        let directory = tempfile::tempdir().unwrap();
        for name in ["b.html", "a.html", "c.txt"] {
            std::fs::write(directory.path().join(name), "").unwrap();
        }
        let pattern = format!("{}/*.html", directory.path().display());
        let inputs = expand_inputs(&pattern).unwrap();
        assert_eq!(inputs, vec![directory.path().join("a.html"), directory.path().join("b.html")]);

        let pattern = format!("{}/*.xml", directory.path().display());
        assert!(expand_inputs(&pattern).is_err());
    }

    #[test]
    fn script_binary_writes_output() {
        let directory = tempfile::tempdir().unwrap();
        let input = directory.path().join("awr.ini");
        std::fs::write(&input, "[load]\nselect 1 from dual\n").unwrap();
        let output = directory.path().join("awr.sql");
        let args = ScriptArgs {
            input: input.clone(),
            output: Some(output.clone()),
            from: DEFAULT_SNAPSHOT_FROM,
            to: DEFAULT_SNAPSHOT_TO,
            debug: false,
        };
        assert_eq!(run_script_with_args(args).unwrap(), ExitCode::SUCCESS);
        let script = std::fs::read_to_string(&output).unwrap();
        assert!(script.contains("rem INI_NAME="));
        assert!(script.ends_with("rem [load]\nselect 1 from dual\n;\nexit;\n"));
    }

    #[test]
    fn convert_binary_rejects_output_with_many_inputs() {
        let directory = tempfile::tempdir().unwrap();
        for name in ["a.html", "b.html"] {
            std::fs::write(directory.path().join(name), "").unwrap();
        }
        let args = ConvertArgs::parse_from([
            "awr2xlsx".to_owned(),
            "-i".to_owned(),
            format!("{}/*.html", directory.path().display()),
            "-o".to_owned(),
            "out.xlsx".to_owned(),
        ]);
        assert!(run_convert_with_args(args).is_err());
    }
}
