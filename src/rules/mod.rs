//! Rule Compiler: turns the line-oriented rule file into a [`RuleSet`].
//!
//! The rule file is INI-like. Each `[section]` whose body starts with a
//! `select` becomes a sheet named after the section; other sections only hold
//! `FORMAT`/`CHART` declarations. Sections written as `[#name]` are disabled
//! together with everything up to the next section header.
//!
//! ```text
//! [load]
//! select ... from dba_hist_sysstat ...
//! [FORMAT]
//! FORMAT1=load^[2.2:E.9]^###,##0.0
//! [CHART]
//! CHART1=load,[1.1:E.1/load_sql2!1.2:E.6],ACTIVE,load,Transactions,2,12,LINE,TRUE,dd hh:mm,Time
//! ```

pub mod chart;
pub mod range;

use chart::ChartKind;
use chart::ChartRule;
use range::format_range_list;
use range::parse_range_list;
use range::RangeError;
use range::RangeExpr;
use range::SheetRange;
use regex::Regex;
use std::fmt::Display;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

/// Longest sheet name a workbook accepts.
pub const MAX_SHEET_NAME_LENGTH: usize = 31;

static SECTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(\w+)\]").expect("Hardcode regex pattern"));

static FORMAT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^FORMAT(\w*)=(.*)$").expect("Hardcode regex pattern"));

static CHART_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^CHART(\w*)=(.*)$").expect("Hardcode regex pattern"));

static COMPANION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)_sql\d+$").expect("Hardcode regex pattern"));

/// Errors in the rule file. Every variant names the 1-based line it came from.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("line {line}: declaration before any sheet")]
    OutsideSection { line: usize },

    #[error("line {line}: invalid section header '{text}'")]
    InvalidSectionHeader { line: usize, text: String },

    #[error("line {line}: invalid sheet name '{name}': {reason}")]
    InvalidSheetName {
        line: usize,
        name: String,
        reason: String,
    },

    #[error("line {line}: sheet '{name}' is declared more than once")]
    DuplicateSheet { line: usize, name: String },

    #[error("line {line}: malformed FORMAT declaration: {reason}")]
    MalformedFormat { line: usize, reason: String },

    #[error("line {line}: malformed CHART declaration: {reason}")]
    MalformedChart { line: usize, reason: String },

    #[error("line {line}: {source}")]
    InvalidRange { line: usize, source: RangeError },

    #[error("line {line}: unknown chart type '{kind}'")]
    UnknownChartType { line: usize, kind: String },

    #[error("line {line}: invalid chart position '{value}', expected a 1-based number")]
    InvalidPosition { line: usize, value: String },

    #[error("line {line}: unknown sheet '{sheet}'")]
    UnknownSheet { line: usize, sheet: String },
}

impl ConfigError {
    /// 1-based rule file line the error refers to.
    pub fn line(&self) -> usize {
        match self {
            ConfigError::OutsideSection { line }
            | ConfigError::InvalidSectionHeader { line, .. }
            | ConfigError::InvalidSheetName { line, .. }
            | ConfigError::DuplicateSheet { line, .. }
            | ConfigError::MalformedFormat { line, .. }
            | ConfigError::MalformedChart { line, .. }
            | ConfigError::InvalidRange { line, .. }
            | ConfigError::UnknownChartType { line, .. }
            | ConfigError::InvalidPosition { line, .. }
            | ConfigError::UnknownSheet { line, .. } => *line,
        }
    }
}

/// A compiled FORMAT declaration.
#[derive(Clone, Debug)]
pub struct FormatRule {
    /// Suffix after `FORMAT`
    pub id: String,
    /// Sheet whose cells are formatted
    pub host: String,
    pub ranges: Vec<RangeExpr>,
    /// Number format pattern, e.g. `###,##0.0`
    pub display_format: String,
    /// 1-based source line; diagnostics only
    pub line: usize,
}

impl PartialEq for FormatRule {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.host == other.host
            && self.ranges == other.ranges
            && self.display_format == other.display_format
    }
}

impl Display for FormatRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ranges: Vec<SheetRange> =
            self.ranges.iter().map(|range| SheetRange { sheet: None, range: *range }).collect();
        write!(
            f,
            "FORMAT{}={}^{}^{}",
            self.id,
            self.host,
            format_range_list(&ranges),
            self.display_format
        )
    }
}

/// One output sheet and the rules attached to it.
#[derive(Clone, Debug, PartialEq)]
pub struct SheetSpec {
    pub name: String,
    /// Marker name looked up in the report
    pub source_section: String,
    /// Query body, one entry per non-blank line
    pub query: Vec<String>,
    /// Host sheet when this sheet is a `<host>_sqlN` chart data source
    pub companion_of: Option<String>,
    pub format_rules: Vec<FormatRule>,
    pub chart_rules: Vec<ChartRule>,
}

/// Ordered, immutable result of compiling a rule file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuleSet {
    pub sheets: Vec<SheetSpec>,
}

impl RuleSet {
    /// Finds a sheet by name, ignoring case as workbooks do.
    pub fn sheet(&self, name: &str) -> Option<&SheetSpec> {
        self.sheets.iter().find(|sheet| same_name(&sheet.name, name))
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|sheet| sheet.name.as_str()).collect()
    }

    pub fn format_rules(&self) -> impl Iterator<Item = &FormatRule> {
        self.sheets.iter().flat_map(|sheet| sheet.format_rules.iter())
    }

    pub fn chart_rules(&self) -> impl Iterator<Item = &ChartRule> {
        self.sheets.iter().flat_map(|sheet| sheet.chart_rules.iter())
    }
}

impl Display for RuleSet {
    /// Canonical rule file text; compiling it yields an equal `RuleSet`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for sheet in &self.sheets {
            writeln!(f, "[{}]", sheet.name)?;
            for line in &sheet.query {
                writeln!(f, "{line}")?;
            }
        }
        if self.format_rules().next().is_some() {
            writeln!(f, "[FORMAT]")?;
            for rule in self.format_rules() {
                writeln!(f, "{rule}")?;
            }
        }
        if self.chart_rules().next().is_some() {
            writeln!(f, "[CHART]")?;
            for rule in self.chart_rules() {
                writeln!(f, "{rule}")?;
            }
        }
        Ok(())
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Checks the workbook's sheet naming rules.
pub fn validate_sheet_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("name is empty".to_owned());
    }
    if name.chars().count() > MAX_SHEET_NAME_LENGTH {
        return Err(format!("longer than {MAX_SHEET_NAME_LENGTH} characters"));
    }
    if let Some(c) = name.chars().find(|c| "[]:*?/\\".contains(*c)) {
        return Err(format!("contains '{c}'"));
    }
    Ok(())
}

struct Section {
    name: String,
    line: usize,
    disabled: bool,
    query: Vec<String>,
}

impl Section {
    fn is_sheet(&self) -> bool {
        !self.disabled
            && self
                .query
                .first()
                .is_some_and(|first| first.to_lowercase().contains("select"))
    }
}

struct Pending<T> {
    host: Option<String>,
    section: usize,
    rule: T,
}

/// Compiles rule file text into a [`RuleSet`].
pub fn compile(text: &str) -> Result<RuleSet, ConfigError> {
    let mut sections: Vec<Section> = Vec::new();
    let mut formats: Vec<Pending<FormatRule>> = Vec::new();
    let mut charts: Vec<Pending<ChartRule>> = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = raw.replace('\r', "");
        let trimmed = content.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if trimmed.starts_with("[#") {
            let name = trimmed.trim_start_matches("[#").trim_end_matches(']').to_owned();
            sections.push(Section { name, line, disabled: true, query: Vec::new() });
            continue;
        }
        if trimmed.starts_with('[') {
            let captures = SECTION_PATTERN.captures(trimmed).ok_or_else(|| {
                ConfigError::InvalidSectionHeader { line, text: trimmed.to_owned() }
            })?;
            sections.push(Section { name: captures[1].to_owned(), line, disabled: false, query: Vec::new() });
            continue;
        }

        let section_index = sections.len().checked_sub(1).ok_or(ConfigError::OutsideSection { line })?;
        let section = &mut sections[section_index];
        if section.disabled {
            continue;
        }

        if let Some(captures) = FORMAT_PATTERN.captures(trimmed) {
            let (host, rule) = parse_format(&captures[1], &captures[2], line)?;
            formats.push(Pending { host, section: section_index, rule });
        } else if let Some(captures) = CHART_PATTERN.captures(trimmed) {
            let (host, rule) = parse_chart(&captures[1], &captures[2], line)?;
            charts.push(Pending { host, section: section_index, rule });
        } else {
            section.query.push(content.trim_end().to_owned());
        }
    }

    let mut sheets: Vec<SheetSpec> = Vec::new();
    for section in sections.iter().filter(|section| section.is_sheet()) {
        validate_sheet_name(&section.name).map_err(|reason| ConfigError::InvalidSheetName {
            line: section.line,
            name: section.name.clone(),
            reason,
        })?;
        if sheets.iter().any(|sheet| same_name(&sheet.name, &section.name)) {
            return Err(ConfigError::DuplicateSheet { line: section.line, name: section.name.clone() });
        }
        sheets.push(SheetSpec {
            name: section.name.clone(),
            source_section: section.name.clone(),
            query: section.query.clone(),
            companion_of: None,
            format_rules: Vec::new(),
            chart_rules: Vec::new(),
        });
    }

    for index in 0..sheets.len() {
        let host = COMPANION_PATTERN
            .captures(&sheets[index].name)
            .map(|captures| captures[1].to_owned());
        if let Some(host) = host {
            let companion_of = find_sheet(&sheets, &host).map(|found| sheets[found].name.clone());
            sheets[index].companion_of = companion_of;
        }
    }

    for pending in formats {
        let host = resolve_host(&sections, &sheets, &pending.host, pending.section, pending.rule.line)?;
        let mut rule = pending.rule;
        rule.host = sheets[host].name.clone();
        sheets[host].format_rules.push(rule);
    }

    for pending in charts {
        let host = resolve_host(&sections, &sheets, &pending.host, pending.section, pending.rule.line)?;
        let mut rule = pending.rule;
        rule.host = sheets[host].name.clone();
        for range in rule.category_range.iter_mut().chain(rule.data_ranges.iter_mut()) {
            if let Some(sheet) = &range.sheet {
                let target = find_sheet(&sheets, sheet)
                    .ok_or_else(|| ConfigError::UnknownSheet { line: rule.line, sheet: sheet.clone() })?;
                range.sheet = Some(sheets[target].name.clone());
            }
        }
        sheets[host].chart_rules.push(rule);
    }

    let rules = RuleSet { sheets };
    debug!(
        sheets = ?rules.sheet_names(),
        format_rules = rules.format_rules().count(),
        chart_rules = rules.chart_rules().count(),
        "compiled rule file"
    );
    Ok(rules)
}

fn find_sheet(sheets: &[SheetSpec], name: &str) -> Option<usize> {
    sheets.iter().position(|sheet| same_name(&sheet.name, name))
}

/// Host of a rule declared inside `sections[section]`: the named sheet, or
/// else the most recently declared sheet. Rules are only valid once a sheet
/// has been declared.
fn resolve_host(
    sections: &[Section],
    sheets: &[SheetSpec],
    host: &Option<String>,
    section: usize,
    line: usize,
) -> Result<usize, ConfigError> {
    let current = sections[..=section]
        .iter()
        .rev()
        .find(|section| section.is_sheet())
        .ok_or(ConfigError::OutsideSection { line })?;
    let host = host.as_deref().unwrap_or(&current.name);
    find_sheet(sheets, host).ok_or_else(|| ConfigError::UnknownSheet { line, sheet: host.to_owned() })
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}

/// `<sheet>^[<ranges>]^<pattern>`
fn parse_format(id: &str, body: &str, line: usize) -> Result<(Option<String>, FormatRule), ConfigError> {
    let parts: Vec<&str> = body.splitn(3, '^').collect();
    if parts.len() != 3 {
        return Err(ConfigError::MalformedFormat {
            line,
            reason: "expected <sheet>^[<ranges>]^<pattern>".to_owned(),
        });
    }
    let ranges = parse_range_list(parts[1]).map_err(|source| ConfigError::InvalidRange { line, source })?;
    if let Some(prefixed) = ranges.iter().find(|range| range.sheet.is_some()) {
        return Err(ConfigError::MalformedFormat {
            line,
            reason: format!("range '{prefixed}' names a sheet; use the sheet field instead"),
        });
    }
    let rule = FormatRule {
        id: id.to_owned(),
        host: String::new(),
        ranges: ranges.into_iter().map(|range| range.range).collect(),
        display_format: parts[2].trim().to_owned(),
        line,
    };
    Ok((optional(parts[0]), rule))
}

/// `<sheet>,[<ranges>],<ACTIVE|INACTIVE>,<source>,<title>,<row>,<col>,<TYPE>[,<legend>[,<x-format>[,<x-title>]]]`
fn parse_chart(id: &str, body: &str, line: usize) -> Result<(Option<String>, ChartRule), ConfigError> {
    let fields: Vec<&str> = body.split(',').map(str::trim).collect();
    if fields.len() < 8 {
        return Err(ConfigError::MalformedChart {
            line,
            reason: format!("expected at least 8 fields, found {}", fields.len()),
        });
    }
    if fields.len() > 11 {
        return Err(ConfigError::MalformedChart {
            line,
            reason: format!("expected at most 11 fields, found {}", fields.len()),
        });
    }

    let mut ranges = parse_range_list(fields[1]).map_err(|source| ConfigError::InvalidRange { line, source })?;
    let category_range = if ranges.len() > 1 { Some(ranges.remove(0)) } else { None };

    let active = match fields[2].to_ascii_uppercase().as_str() {
        "ACTIVE" => true,
        "INACTIVE" => false,
        other => {
            return Err(ConfigError::MalformedChart {
                line,
                reason: format!("expected ACTIVE or INACTIVE, found '{other}'"),
            })
        }
    };

    let position = |value: &str| match value.parse::<usize>() {
        Ok(position) if position > 0 => Ok(position),
        _ => Err(ConfigError::InvalidPosition { line, value: value.to_owned() }),
    };
    let anchor_row = position(fields[5])?;
    let anchor_col = position(fields[6])?;

    let kind = fields[7]
        .parse::<ChartKind>()
        .map_err(|kind| ConfigError::UnknownChartType { line, kind })?;

    let legend = match fields.get(8).map(|value| value.to_ascii_uppercase()) {
        None => true,
        Some(value) if value.is_empty() || value == "TRUE" => true,
        Some(value) if value == "FALSE" => false,
        Some(value) => {
            return Err(ConfigError::MalformedChart {
                line,
                reason: format!("expected TRUE or FALSE legend flag, found '{value}'"),
            })
        }
    };

    let rule = ChartRule {
        id: id.to_owned(),
        host: String::new(),
        category_range,
        data_ranges: ranges,
        active,
        source: fields[3].to_owned(),
        title: fields[4].to_owned(),
        anchor_row,
        anchor_col,
        kind,
        legend,
        x_format: fields.get(9).and_then(|value| optional(value)),
        x_title: fields.get(10).and_then(|value| optional(value)),
        line,
    };
    Ok((optional(fields[0]), rule))
}

#[cfg(test)]
mod tests {
    use super::range::Bound;
    use super::*;
    use pretty_assertions::assert_eq;

    const RULES: &str = "\
# AWR workload rules
[load]
select snap_time, tps, redo
  from workload
[load_sql2]
select snap_time, rank1, rank2 from workload_ranked
[#event]
select * from events
FORMAT9=load^[1.1:E.E]^0.00
[FORMAT]
FORMAT1=load^[2.2:E.3]^###,##0.0
FORMAT2=load^[2.3:E.3/2.5:E.5]^0.00%
[CHART]
CHART1=load,[1.1:E.1/load_sql2!1.2:65535.10],ACTIVE,load,Transactions,2,56,LINE,TRUE,dd hh:mm,Time
CHART2=load,[1.2:E.2],INACTIVE,load,Redo,20,56,column
";

    #[test]
    fn compile_sheets_and_rules() {
        let rules = compile(RULES).unwrap();
        assert_eq!(rules.sheet_names(), vec!["load", "load_sql2"]);

        let load = rules.sheet("LOAD").unwrap();
        assert_eq!(load.query, vec!["select snap_time, tps, redo", "  from workload"]);
        assert_eq!(load.companion_of, None);
        assert_eq!(load.format_rules.len(), 2);
        assert_eq!(load.format_rules[0].display_format, "###,##0.0");
        assert_eq!(load.format_rules[0].line, 11);
        assert_eq!(load.format_rules[1].ranges.len(), 2);

        let companion = rules.sheet("load_sql2").unwrap();
        assert_eq!(companion.companion_of.as_deref(), Some("load"));

        let chart = &load.chart_rules[0];
        assert_eq!(chart.host, "load");
        assert_eq!(chart.kind, ChartKind::Line);
        assert_eq!((chart.anchor_row, chart.anchor_col), (2, 56));
        assert_eq!(chart.category_range.as_ref().unwrap().sheet, None);
        assert_eq!(chart.data_ranges[0].sheet.as_deref(), Some("load_sql2"));
        assert_eq!(chart.data_ranges[0].range.last_row, Bound::At(65535));
        assert_eq!(chart.x_format.as_deref(), Some("dd hh:mm"));
        assert_eq!(chart.x_title.as_deref(), Some("Time"));
        assert!(chart.active);

        let inactive = &load.chart_rules[1];
        assert!(!inactive.active);
        assert!(inactive.legend);
        assert_eq!(inactive.kind, ChartKind::Column);
        assert_eq!(inactive.category_range, None);
        assert_eq!(inactive.x_title, None);
    }

    #[test]
    fn rules_scope_to_current_sheet() {
        let rules = compile("[load]\nselect 1 from dual\nFORMAT1=^[2.1:E.1]^0\nCHART1=,[1.1:E.1],ACTIVE,load,t,1,1,BAR")
            .unwrap();
        let load = rules.sheet("load").unwrap();
        assert_eq!(load.format_rules[0].host, "load");
        assert_eq!(load.chart_rules[0].host, "load");
    }

    #[test]
    fn later_rules_keep_declaration_order() {
        let rules = compile(
            "[s]\nselect 1\nFORMAT1=^[1.1:E.E]^0\n[other]\nselect 2\nFORMAT2=s^[1.1:1.1]^0.0\nFORMAT3=^[1.1:1.1]^0.00",
        )
        .unwrap();
        let ids: Vec<&str> = rules.sheet("s").unwrap().format_rules.iter().map(|rule| rule.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(rules.sheet("other").unwrap().format_rules[0].id, "3");
    }

    #[test]
    fn declaration_before_section_is_error() {
        assert_eq!(
            compile("# header\n\nFORMAT1=load^[1.1:2.2]^0"),
            Err(ConfigError::OutsideSection { line: 3 })
        );
    }

    #[test]
    fn unscoped_rule_in_rule_section_takes_last_sheet() {
        let rules = compile(
            "[load]\nselect 1\n[event]\nselect 2\n[FORMAT]\nFORMAT1=^[1.1:2.2]^0\n[CHART]\nCHART1=,[1.1:E.1],ACTIVE,x,t,1,1,LINE",
        )
        .unwrap();
        assert!(rules.sheet("load").unwrap().format_rules.is_empty());
        let event = rules.sheet("event").unwrap();
        assert_eq!(event.format_rules[0].host, "event");
        assert_eq!(event.chart_rules[0].host, "event");
    }

    #[test]
    fn rule_before_any_sheet_is_error() {
        assert_eq!(
            compile("[FORMAT]\nFORMAT1=load^[1.1:2.2]^0\n[load]\nselect 1"),
            Err(ConfigError::OutsideSection { line: 2 })
        );
        assert_eq!(
            compile("[settings]\nowner=perf\n[CHART]\nCHART1=,[1.1:E.1],ACTIVE,x,t,1,1,LINE\n[load]\nselect 1"),
            Err(ConfigError::OutsideSection { line: 4 })
        );
    }

    #[test]
    fn chart_on_ghost_sheet_is_error() {
        let error = compile("[load]\nselect 1\n[CHART]\nCHART1=load,[1.1:E.1/ghost!1.2:E.3],ACTIVE,x,t,1,1,LINE")
            .unwrap_err();
        assert_eq!(error, ConfigError::UnknownSheet { line: 4, sheet: "ghost".to_owned() });
        assert!(error.to_string().contains("ghost"));

        let error = compile("[load]\nselect 1\n[CHART]\nCHART1=ghost,[1.1:E.1],ACTIVE,x,t,1,1,LINE").unwrap_err();
        assert_eq!(error, ConfigError::UnknownSheet { line: 4, sheet: "ghost".to_owned() });
    }

    #[test]
    fn malformed_declarations() {
        let base = "[load]\nselect 1\n";
        let cases = [
            ("FORMAT1=load^[1.1:2.2]", 3),
            ("FORMAT1=load^[1.1-2.2]^0", 3),
            ("CHART1=load,[1.1:E.1],ACTIVE,x,t,1,1", 3),
            ("CHART1=load,[1.1:E.1],ON,x,t,1,1,LINE", 3),
            ("CHART1=load,[1.1:E.1],ACTIVE,x,t,0,1,LINE", 3),
            ("CHART1=load,[1.1:E.1],ACTIVE,x,t,1,1,BUBBLE", 3),
            ("CHART1=load,[1.1:E.1],ACTIVE,x,t,1,1,LINE,MAYBE", 3),
        ];
        for (declaration, line) in cases {
            let error = compile(&format!("{base}{declaration}")).unwrap_err();
            assert_eq!(error.line(), line, "{declaration}");
        }
        assert!(matches!(
            compile("[load]\nselect 1\nCHART1=load,[1.1:E.1],ACTIVE,x,t,1,1,LINE\n[bad section"),
            Err(ConfigError::InvalidSectionHeader { line: 4, .. })
        ));
    }

    #[test]
    fn duplicate_and_invalid_sheet_names() {
        assert_eq!(
            compile("[load]\nselect 1\n[LOAD]\nselect 2"),
            Err(ConfigError::DuplicateSheet { line: 3, name: "LOAD".to_owned() })
        );
        let long = "x".repeat(32);
        assert!(matches!(
            compile(&format!("[{long}]\nselect 1")),
            Err(ConfigError::InvalidSheetName { line: 1, .. })
        ));
        assert_eq!(validate_sheet_name("a/b"), Err("contains '/'".to_owned()));
        assert_eq!(validate_sheet_name("load_sql2"), Ok(()));
    }

    #[test]
    fn disabled_section_is_skipped() {
        let rules = compile(RULES).unwrap();
        assert!(rules.sheet("event").is_none());
        assert!(rules.format_rules().all(|rule| rule.id != "9"));
    }

    #[test]
    fn non_query_sections_are_not_sheets() {
        let rules = compile("[settings]\nowner=perf\n[load]\nSELECT 1 FROM dual").unwrap();
        assert_eq!(rules.sheet_names(), vec!["load"]);
    }

    #[test]
    fn round_trip() {
        let rules = compile(RULES).unwrap();
        let text = rules.to_string();
        let recompiled = compile(&text).unwrap();
        assert_eq!(recompiled, rules);
        assert_eq!(recompiled.to_string(), text);
    }

    #[test]
    fn round_trip_optional_chart_fields() {
        let rules = compile("[s]\nselect 1\nCHART7=s,[1.1:E.1/1.2:E.3],ACTIVE,s,Title,3,4,PIE,FALSE,,Axis").unwrap();
        let chart = &rules.sheets[0].chart_rules[0];
        assert!(!chart.legend);
        assert_eq!(chart.x_format, None);
        assert_eq!(chart.x_title.as_deref(), Some("Axis"));
        assert_eq!(
            chart.to_string(),
            "CHART7=s,[1.1:E.1/1.2:E.3],ACTIVE,s,Title,3,4,PIE,FALSE,,Axis"
        );
        assert_eq!(compile(&rules.to_string()).unwrap(), rules);
    }
}
