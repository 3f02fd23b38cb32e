//! Composition height measurement for the host viewport.

use unicode_width::UnicodeWidthChar;

/// Number of display rows `text` occupies when soft-wrapped at `width`
/// columns, using terminal display widths per character.
///
/// Empty text still occupies one row. A width of `0` is treated as `1`
/// to keep the measurement total.
pub fn wrapped_row_count(text: &str, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let mut rows: u16 = 1;
    let mut column = 0;

    for ch in text.chars() {
        if ch == '\n' {
            rows = rows.saturating_add(1);
            column = 0;

            continue;
        }

        let ch_width = ch.width().unwrap_or(0);
        if column + ch_width > width {
            rows = rows.saturating_add(1);
            column = 0;
        }

        column += ch_width;
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_row_count_empty_text_is_one_row() {
        assert_eq!(wrapped_row_count("", 10), 1);
    }

    #[test]
    fn test_wrapped_row_count_counts_newlines() {
        assert_eq!(wrapped_row_count("a\nb\nc", 10), 3);
    }

    #[test]
    fn test_wrapped_row_count_soft_wraps_long_lines() {
        // Arrange — 12 narrow chars at width 5 wrap onto 3 rows
        assert_eq!(wrapped_row_count("abcdefghijkl", 5), 3);
    }

    #[test]
    fn test_wrapped_row_count_uses_display_width() {
        // Arrange — four wide CJK chars take 8 columns, wrapping at 5
        assert_eq!(wrapped_row_count("四字熟語", 5), 2);
    }
}
