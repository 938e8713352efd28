use crate::helpers::string::cell_text;
use regex::Regex;
use std::sync::LazyLock;

static MARKER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"SQL(?:&gt;|>) rem \[([^\]\r\n]+)\]").expect("Hardcode regex pattern")
});

static CONFIG_REFERENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^SQL(?:&gt;|>) rem INI_NAME=(.*)$").expect("Hardcode regex pattern")
});

static ROW_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<tr(?:\s[^>]*)?>(.*?)</tr\s*>").expect("Hardcode regex pattern"));

static CELL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<t[hd](?:\s[^>]*)?>(.*?)</t[hd]\s*>").expect("Hardcode regex pattern")
});

/// A `SQL> rem [name]` line echoed by SQL*Plus in front of each query's output.
#[derive(Debug, PartialEq)]
pub(crate) struct Marker<'a> {
    pub(crate) name: &'a str,
    /// Byte offset of the marker text
    pub(crate) start: usize,
    /// Byte offset just past the marker text
    pub(crate) end: usize,
}

pub(crate) fn find_markers(document: &str) -> Vec<Marker<'_>> {
    MARKER_PATTERN
        .captures_iter(document)
        .filter_map(|captures| {
            let whole = captures.get(0)?;
            let name = captures.get(1)?.as_str().trim();
            Some(Marker { name, start: whole.start(), end: whole.end() })
        })
        .collect()
}

/// Text owned by each marker: from the end of the marker up to the next
/// marker or the end of the document.
pub(crate) fn marker_regions<'a>(document: &'a str, markers: &[Marker<'a>]) -> Vec<(&'a str, &'a str)> {
    markers
        .iter()
        .enumerate()
        .map(|(index, marker)| {
            let end = markers.get(index + 1).map_or(document.len(), |next| next.start);
            (marker.name, &document[marker.end..end])
        })
        .collect()
}

/// First `<table ...>` of a region up to its `</table>`, or to the end of the
/// region when the closing tag is missing.
pub(crate) fn first_table(region: &str) -> Option<&str> {
    // ASCII lowercasing keeps byte offsets aligned with `region`
    let lowered = region.to_ascii_lowercase();
    let start = lowered.find("<table")?;
    let end = lowered[start..]
        .find("</table")
        .map_or(region.len(), |offset| start + offset);
    Some(&region[start..end])
}

/// Rows of a table as trimmed cell texts. Rows without cells are dropped;
/// rows keep their own width.
pub(crate) fn table_rows(table: &str) -> Vec<Vec<String>> {
    ROW_PATTERN
        .captures_iter(table)
        .map(|row| {
            CELL_PATTERN
                .captures_iter(&row[1])
                .map(|cell| cell_text(&cell[1]))
                .collect::<Vec<String>>()
        })
        .filter(|cells| !cells.is_empty())
        .collect()
}

/// Rule file name announced by a `SQL> rem INI_NAME=<name>` line.
pub fn find_config_reference(document: &str) -> Option<String> {
    CONFIG_REFERENCE_PATTERN
        .captures(document)
        .map(|captures| captures[1].trim().to_owned())
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_in_both_spellings() {
        let document = "SQL&gt; rem [load]\n<p>\nSQL> rem [ event ]\n";
        let markers = find_markers(document);
        let names: Vec<&str> = markers.iter().map(|marker| marker.name).collect();
        assert_eq!(names, vec!["load", "event"]);
        assert_eq!(markers[0].start, 0);
        assert_eq!(markers[0].end, 18);
    }

    #[test]
    fn regions_end_at_next_marker() {
        let document = "SQL&gt; rem [a]\nAAA\nSQL&gt; rem [b]\nBBB";
        let markers = find_markers(document);
        let regions = marker_regions(document, &markers);
        assert_eq!(regions, vec![("a", "\nAAA\n"), ("b", "\nBBB")]);
    }

    #[test]
    fn first_table_only() {
        let region = "<p>x</p><TABLE border='1'><tr><td>1</td></tr></TABLE><table><tr><td>2</td></tr></table>";
        assert_eq!(first_table(region), Some("<TABLE border='1'><tr><td>1</td></tr>"));
        assert_eq!(first_table("<p>no table</p>"), None);
        assert_eq!(first_table("<table><tr><td>3</td></tr>"), Some("<table><tr><td>3</td></tr>"));
    }

    #[test]
    fn rows_and_cells() {
        let table = "<table>\n<tr>\n<th scope=\"col\">SNAP_TIME</th>\n<th>TPS</th>\n</tr>\n\
                     <tr></tr>\n\
                     <TR><td>2021-01-26 10:00</td><td align=\"right\">  1,234</td></TR>\n\
                     <tr><td>&nbsp;</td></tr>\n";
        assert_eq!(
            table_rows(table),
            vec![
                vec!["SNAP_TIME".to_owned(), "TPS".to_owned()],
                vec!["2021-01-26 10:00".to_owned(), "1,234".to_owned()],
                vec!["".to_owned()],
            ]
        );
    }

    #[test]
    fn track_tag_is_not_a_row() {
        assert!(table_rows("<track><td>x</td></track>").is_empty());
    }

    #[test]
    fn config_reference() {
        let document = "SQL&gt; set echo on\r\nSQL&gt; rem INI_NAME=awr_rules.ini\r\n";
        assert_eq!(find_config_reference(document), Some("awr_rules.ini".to_owned()));
        assert_eq!(find_config_reference("SQL> rem INI_NAME=\n"), None);
        assert_eq!(find_config_reference("rem INI_NAME=x.ini"), None);
    }
}
