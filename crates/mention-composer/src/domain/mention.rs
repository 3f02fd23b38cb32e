//! Mention grammar: pure recognition of `@` tokens in free text.
//!
//! A mention token is `@` followed by either a path beginning with `/`,
//! a URL of the form `scheme://<non-whitespace>`, or the literal
//! `problems`. Matching is non-overlapping and scans left to right.
//! All offsets are character offsets, end-exclusive.

/// The category of a recognized mention token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MentionKind {
    File,
    Folder,
    Url,
    Problems,
}

/// A recognized mention span within a text buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MentionSpan {
    /// Character offset of the leading `@`.
    pub start: usize,
    /// Character offset one past the last token character.
    pub end: usize,
    pub kind: MentionKind,
}

/// Scans `text` and returns every mention span, left to right.
///
/// Spans never overlap: after a match the scan resumes at the match end,
/// so an `@` inside a matched token cannot start a second token.
pub fn find_mention_spans(text: &str) -> Vec<MentionSpan> {
    let chars: Vec<char> = text.chars().collect();
    let mut spans = Vec::new();
    let mut index = 0;

    while index < chars.len() {
        if chars[index] == '@'
            && let Some((end, kind)) = match_mention_body(&chars, index + 1)
        {
            spans.push(MentionSpan {
                start: index,
                end,
                kind,
            });
            index = end;

            continue;
        }

        index += 1;
    }

    spans
}

/// Returns the mention span ending exactly at character offset `end`.
pub fn mention_ending_at(text: &str, end: usize) -> Option<MentionSpan> {
    find_mention_spans(text)
        .into_iter()
        .find(|span| span.end == end)
}

/// Returns whether `offset` sits just past a mention's separating space:
/// the character before `offset` is whitespace and a mention span ends
/// immediately before that whitespace.
pub fn is_mention_boundary(text: &str, offset: usize) -> bool {
    if offset == 0 {
        return false;
    }

    let before = text.chars().nth(offset - 1);
    if !before.is_some_and(char::is_whitespace) {
        return false;
    }

    mention_ending_at(text, offset - 1).is_some()
}

/// Extracts the unterminated `@query` ending at `cursor`, if any.
///
/// Returns `Some((at_char_index, query))` when the cursor sits inside an
/// `@query` token whose `@` is at position 0 or preceded by whitespace,
/// with no whitespace between the `@` and the cursor. This is the
/// condition under which the autocomplete menu opens. An out-of-range
/// cursor is clamped to the text end.
pub fn active_mention_query(text: &str, cursor: usize) -> Option<(usize, String)> {
    let chars: Vec<char> = text.chars().collect();
    let cursor = cursor.min(chars.len());
    if cursor == 0 {
        return None;
    }

    let mut scan = cursor;

    while scan > 0 {
        scan -= 1;
        let ch = *chars.get(scan)?;

        if ch == '@' {
            if scan == 0 || chars.get(scan - 1).is_some_and(|ch| ch.is_whitespace()) {
                let query: String = chars[scan + 1..cursor].iter().collect();

                return Some((scan, query));
            }

            return None;
        }

        if ch.is_whitespace() {
            return None;
        }
    }

    None
}

/// Matches one mention body starting at `body_start` (just past the `@`).
///
/// Returns the end offset (exclusive) and the token kind.
fn match_mention_body(chars: &[char], body_start: usize) -> Option<(usize, MentionKind)> {
    let first = *chars.get(body_start)?;

    if first == '/' {
        let end = non_whitespace_end(chars, body_start);
        // A lone "@/" is not a path mention; at least one character must
        // follow the slash.
        if end <= body_start + 1 {
            return None;
        }

        let kind = if chars[end - 1] == '/' {
            MentionKind::Folder
        } else {
            MentionKind::File
        };

        return Some((end, kind));
    }

    if let Some(end) = match_url(chars, body_start) {
        return Some((end, MentionKind::Url));
    }

    match_problems(chars, body_start).map(|end| (end, MentionKind::Problems))
}

/// Matches `scheme://<non-whitespace>+` starting at `start`.
fn match_url(chars: &[char], start: usize) -> Option<usize> {
    if !chars.get(start)?.is_ascii_alphabetic() {
        return None;
    }

    let mut index = start + 1;
    while index < chars.len()
        && (chars[index].is_ascii_alphanumeric() || matches!(chars[index], '+' | '-' | '.'))
    {
        index += 1;
    }

    if chars.get(index) != Some(&':')
        || chars.get(index + 1) != Some(&'/')
        || chars.get(index + 2) != Some(&'/')
    {
        return None;
    }

    let body = index + 3;
    let end = non_whitespace_end(chars, body);
    if end == body {
        return None;
    }

    Some(end)
}

/// Matches the literal `problems` starting at `start`, requiring the
/// token to end at a word boundary.
fn match_problems(chars: &[char], start: usize) -> Option<usize> {
    const LITERAL: &str = "problems";
    let end = start + LITERAL.len();

    if chars.len() < end {
        return None;
    }

    if !chars[start..end].iter().copied().eq(LITERAL.chars()) {
        return None;
    }

    let boundary = chars
        .get(end)
        .is_none_or(|ch| !ch.is_alphanumeric() && *ch != '_');

    boundary.then_some(end)
}

/// Returns the offset of the first whitespace character at or after
/// `start`, or the text length when none follows.
fn non_whitespace_end(chars: &[char], start: usize) -> usize {
    let mut index = start;
    while index < chars.len() && !chars[index].is_whitespace() {
        index += 1;
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_mention_spans_path_file() {
        // Arrange & Act
        let spans = find_mention_spans("see @/src/a.ts for ref");

        // Assert
        assert_eq!(
            spans,
            vec![MentionSpan {
                start: 4,
                end: 14,
                kind: MentionKind::File,
            }]
        );
    }

    #[test]
    fn test_find_mention_spans_path_folder() {
        // Arrange & Act
        let spans = find_mention_spans("@/src/");

        // Assert
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].kind, MentionKind::Folder);
        assert_eq!((spans[0].start, spans[0].end), (0, 6));
    }

    #[test]
    fn test_find_mention_spans_url() {
        // Arrange & Act
        let spans = find_mention_spans("docs at @https://example.com/a?b=1 end");

        // Assert
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].kind, MentionKind::Url);
        assert_eq!(spans[0].start, 8);
        assert_eq!(spans[0].end, 34);
    }

    #[test]
    fn test_find_mention_spans_problems_literal() {
        // Arrange & Act
        let spans = find_mention_spans("fix @problems now");

        // Assert
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].kind, MentionKind::Problems);
        assert_eq!((spans[0].start, spans[0].end), (4, 13));
    }

    #[test]
    fn test_find_mention_spans_problems_requires_word_boundary() {
        // Arrange & Act
        let spans = find_mention_spans("@problemsolver");

        // Assert
        assert!(spans.is_empty());
    }

    #[test]
    fn test_find_mention_spans_rejects_bare_at_and_lone_slash() {
        // Arrange & Act & Assert
        assert!(find_mention_spans("mail me @ home").is_empty());
        assert!(find_mention_spans("odd @/ token").is_empty());
    }

    #[test]
    fn test_find_mention_spans_are_non_overlapping() {
        // Arrange
        let text = "@/a.rs @problems @https://x.io/y";

        // Act
        let spans = find_mention_spans(text);

        // Assert
        assert_eq!(spans.len(), 3);
        for pair in spans.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
    }

    #[test]
    fn test_find_mention_spans_at_inside_token_does_not_restart() {
        // Arrange — the second @ sits inside the path token's span
        let text = "@/src/we@ird";

        // Act
        let spans = find_mention_spans(text);

        // Assert
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].end, 12);
    }

    #[test]
    fn test_mention_ending_at_finds_adjacent_span() {
        // Arrange
        let text = "see @/src/a.ts for ref";

        // Act
        let span = mention_ending_at(text, 14);

        // Assert
        assert_eq!(
            span,
            Some(MentionSpan {
                start: 4,
                end: 14,
                kind: MentionKind::File,
            })
        );
        assert!(mention_ending_at(text, 13).is_none());
    }

    #[test]
    fn test_is_mention_boundary_after_separating_space() {
        // Arrange
        let text = "see @/src/a.ts for ref";

        // Act & Assert — offset 15 is just past the space after the token
        assert!(is_mention_boundary(text, 15));
        assert!(!is_mention_boundary(text, 14));
        assert!(!is_mention_boundary(text, 4));
        assert!(!is_mention_boundary("plain words here", 6));
    }

    #[test]
    fn test_active_mention_query_at_start() {
        // Arrange & Act
        let query = active_mention_query("@src", 4);

        // Assert
        assert_eq!(query, Some((0, "src".to_string())));
    }

    #[test]
    fn test_active_mention_query_after_whitespace() {
        // Arrange & Act
        let query = active_mention_query("open @comp/men", 14);

        // Assert
        assert_eq!(query, Some((5, "comp/men".to_string())));
    }

    #[test]
    fn test_active_mention_query_rejects_mid_word_at() {
        // Arrange & Act
        let query = active_mention_query("user@host", 9);

        // Assert
        assert!(query.is_none());
    }

    #[test]
    fn test_active_mention_query_stops_at_whitespace() {
        // Arrange — a space between the @ token and the cursor ends the query
        let query = active_mention_query("@src done", 9);

        // Assert
        assert!(query.is_none());
    }

    #[test]
    fn test_active_mention_query_clamps_out_of_range_cursor() {
        // Arrange & Act
        let query = active_mention_query("@a", 99);

        // Assert
        assert_eq!(query, Some((0, "a".to_string())));
    }

    #[test]
    fn test_active_mention_query_empty_after_bare_at() {
        // Arrange & Act
        let query = active_mention_query("say @", 5);

        // Assert
        assert_eq!(query, Some((4, String::new())));
    }
}
