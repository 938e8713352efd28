//! Debug Reporter: a line-oriented trace of compiled rules and written sheets.
//!
//! The reporter always receives the same calls; when debugging is off its
//! writer is [`std::io::sink`].

use crate::rules::chart::ChartRule;
use crate::rules::range::format_range_list;
use crate::rules::FormatRule;
use crate::rules::RuleSet;
use std::io;
use std::io::Write;

pub struct DebugReporter {
    out: Box<dyn Write>,
}

impl DebugReporter {
    /// Writes to stderr when `enabled`, discards everything otherwise.
    pub fn new(enabled: bool) -> Self {
        if enabled {
            Self::to_writer(Box::new(io::stderr()))
        } else {
            Self::to_writer(Box::new(io::sink()))
        }
    }

    pub fn to_writer(out: Box<dyn Write>) -> Self {
        DebugReporter { out }
    }

    /// Trace output must never fail a conversion.
    pub fn line(&mut self, text: &str) {
        writeln!(self.out, "{text}").ok();
    }

    /// One line per FORMAT and CHART rule, in rule file order.
    pub fn rules(&mut self, rules: &RuleSet) {
        let mut lines: Vec<(usize, String)> = rules
            .format_rules()
            .map(|rule| (rule.line, describe_format(rule)))
            .chain(rules.chart_rules().map(|rule| (rule.line, describe_chart(rule))))
            .collect();
        lines.sort_by_key(|(line, _)| *line);
        for sheet in &rules.sheets {
            match &sheet.companion_of {
                Some(host) => self.line(&format!("SHEET {} (companion of {host})", sheet.name)),
                None => self.line(&format!("SHEET {}", sheet.name)),
            }
        }
        for (_, text) in lines {
            self.line(&text);
        }
    }

    pub fn sheet_written(&mut self, name: &str, rows_written: usize) {
        self.line(&format!("sheet '{name}': {rows_written} rows written"));
    }
}

fn describe_format(rule: &FormatRule) -> String {
    let ranges: Vec<String> = rule.ranges.iter().map(|range| range.to_string()).collect();
    format!(
        "FORMAT{} (line {}): sheet={} ranges=[{}] format={}",
        rule.id,
        rule.line,
        rule.host,
        ranges.join("/"),
        rule.display_format
    )
}

fn describe_chart(rule: &ChartRule) -> String {
    let categories = rule
        .category_range
        .as_ref()
        .map_or_else(|| "-".to_owned(), |range| range.to_string());
    format!(
        "CHART{} (line {}): sheet={} type={} title={} pos=({},{}) categories={} data={}{}",
        rule.id,
        rule.line,
        rule.host,
        rule.kind,
        rule.title,
        rule.anchor_row,
        rule.anchor_col,
        categories,
        format_range_list(&rule.data_ranges),
        if rule.active { "" } else { " inactive" }
    )
}
