/// Converts a 0-based column index to Excel column letters (0 -> "A", 26 -> "AA").
pub(crate) fn col_to_letters(col: usize) -> String {
    let mut col = col + 1;
    let mut letters = Vec::new();
    while col > 0 {
        col -= 1;
        letters.push(char::from(b'A' + (col % 26) as u8));
        col /= 26;
    }
    letters.iter().rev().collect()
}

/// Converts 0-based row/column indexes to an A1-style reference.
pub(crate) fn index_to_reference(row: usize, col: usize) -> String {
    format!("{}{}", col_to_letters(col), row + 1)
}

/// Formats an inclusive 0-based rectangle as `A1:B2`.
pub(crate) fn rect_to_reference(first_row: usize, first_col: usize, last_row: usize, last_col: usize) -> String {
    format!(
        "{}:{}",
        index_to_reference(first_row, first_col),
        index_to_reference(last_row, last_col)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters() {
        assert_eq!(col_to_letters(0), "A");
        assert_eq!(col_to_letters(25), "Z");
        assert_eq!(col_to_letters(26), "AA");
        assert_eq!(col_to_letters(51), "AZ");
        assert_eq!(col_to_letters(52), "BA");
        assert_eq!(col_to_letters(16383), "XFD");
    }

    #[test]
    fn references() {
        assert_eq!(index_to_reference(0, 0), "A1");
        assert_eq!(index_to_reference(39, 9), "J40");
        assert_eq!(rect_to_reference(1, 0, 39, 9), "A2:J40");
    }
}
