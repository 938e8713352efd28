use std::collections::HashMap;
use thiserror::Error;

/// Number format patterns have at most positive;negative;zero;text sections.
const MAX_FORMAT_SECTIONS: usize = 4;

#[derive(Error, Debug, PartialEq)]
pub enum FormatError {
    #[error("empty pattern")]
    Empty,

    #[error("unbalanced quotes")]
    UnbalancedQuotes,

    #[error("unbalanced brackets")]
    UnbalancedBrackets,

    #[error("{0} sections, at most 4 allowed")]
    TooManySections(usize),
}

/// Checks that a number format pattern can be handed to the workbook as-is.
pub fn validate_pattern(pattern: &str) -> Result<(), FormatError> {
    if pattern.trim().is_empty() {
        return Err(FormatError::Empty);
    }
    let mut sections = 1;
    let mut in_quotes = false;
    let mut in_brackets = false;
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' if !in_quotes => {
                chars.next();
            }
            '"' if !in_brackets => in_quotes = !in_quotes,
            '[' if !in_quotes => {
                if in_brackets {
                    return Err(FormatError::UnbalancedBrackets);
                }
                in_brackets = true;
            }
            ']' if !in_quotes => {
                if !in_brackets {
                    return Err(FormatError::UnbalancedBrackets);
                }
                in_brackets = false;
            }
            ';' if !in_quotes && !in_brackets => sections += 1,
            _ => {}
        }
    }
    if in_quotes {
        return Err(FormatError::UnbalancedQuotes);
    }
    if in_brackets {
        return Err(FormatError::UnbalancedBrackets);
    }
    if sections > MAX_FORMAT_SECTIONS {
        return Err(FormatError::TooManySections(sections));
    }
    Ok(())
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Alignment {
    Left,
    Right,
}

/// Visual attributes of a cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CellStyle {
    pub num_format: Option<String>,
    pub align: Alignment,
}

impl CellStyle {
    pub fn number(num_format: &str) -> Self {
        CellStyle { num_format: Some(num_format.to_owned()), align: Alignment::Right }
    }

    pub fn text() -> Self {
        CellStyle { num_format: None, align: Alignment::Left }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleId(pub usize);

/// Interned styles in first-use order, so identical sheets produce identical
/// style tables.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleTable {
    styles: Vec<CellStyle>,
    index: HashMap<CellStyle, StyleId>,
}

impl StyleTable {
    pub fn intern(&mut self, style: CellStyle) -> StyleId {
        if let Some(id) = self.index.get(&style) {
            return *id;
        }
        let id = StyleId(self.styles.len());
        self.index.insert(style.clone(), id);
        self.styles.push(style);
        id
    }

    pub fn get(&self, id: StyleId) -> Option<&CellStyle> {
        self.styles.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StyleId, &CellStyle)> {
        self.styles.iter().enumerate().map(|(index, style)| (StyleId(index), style))
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_patterns() {
        for pattern in [
            "###,##0",
            "0.00%",
            "yyyy/mm/dd hh:mm",
            "#,##0;[Red]-#,##0",
            "\"TPS \"0.0",
            "0.0\\;",
            "[>=1000]#,##0;0;\"-\";@",
        ] {
            assert_eq!(validate_pattern(pattern), Ok(()), "{pattern}");
        }
    }

    #[test]
    fn invalid_patterns() {
        assert_eq!(validate_pattern(" "), Err(FormatError::Empty));
        assert_eq!(validate_pattern("\"abc"), Err(FormatError::UnbalancedQuotes));
        assert_eq!(validate_pattern("[Red0.0"), Err(FormatError::UnbalancedBrackets));
        assert_eq!(validate_pattern("0.0]"), Err(FormatError::UnbalancedBrackets));
        assert_eq!(validate_pattern("0;0;0;0;0"), Err(FormatError::TooManySections(5)));
    }

    #[test]
    fn intern_deduplicates() {
        let mut table = StyleTable::default();
        let number = table.intern(CellStyle::number("###,##0"));
        let text = table.intern(CellStyle::text());
        assert_eq!(table.intern(CellStyle::number("###,##0")), number);
        assert_ne!(number, text);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(text), Some(&CellStyle::text()));
    }
}
