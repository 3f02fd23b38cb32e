//! Mention insertion and removal against a text+cursor pair, plus the
//! two-step backspace policy that makes mentions delete atomically.
//!
//! All operations are pure: callers compare old and new text before
//! committing a mutation event, and a no-op returns the input unchanged.

use crate::domain::mention::{active_mention_query, is_mention_boundary, mention_ending_at};

/// What a Backspace keystroke should do, given the text around the cursor
/// and whether the previous keystroke armed atomic mention deletion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackspaceOutcome {
    /// Ordinary single-character deletion proceeds. `arm` records whether
    /// the deleted character was a mention's separating space, which makes
    /// the next Backspace remove the whole mention.
    PassThrough { arm: bool },
    /// The keystroke is intercepted: the cursor moves to `cursor` (just
    /// before the mention's separating space) without touching the text,
    /// and atomic deletion is armed.
    MoveCursor { cursor: usize },
    /// The armed keystroke: the mention ending at the cursor is removed
    /// as one unit via [`remove_mention`].
    RemoveMention,
}

/// Decides the disposition of a Backspace at `cursor`.
///
/// `armed` is the one-step memory recording that the previous Backspace
/// consumed (or stepped over) the separating space after a mention.
pub fn backspace_outcome(text: &str, cursor: usize, armed: bool) -> BackspaceOutcome {
    if is_mention_boundary(text, cursor) {
        let after = text.chars().nth(cursor);
        // With whitespace on both sides the native single-character
        // delete is correct as-is; the arm bit still carries over.
        if after.is_some_and(char::is_whitespace) {
            return BackspaceOutcome::PassThrough { arm: true };
        }

        return BackspaceOutcome::MoveCursor { cursor: cursor - 1 };
    }

    if armed {
        return BackspaceOutcome::RemoveMention;
    }

    BackspaceOutcome::PassThrough { arm: false }
}

/// Replaces the in-progress `@query` ending at `cursor` with
/// `@insert_value` plus a single trailing space.
///
/// The returned cursor is the offset of the character after the space
/// that follows the inserted token, located by searching the resulting
/// text from the token's `@`. Without an active `@query` at the cursor
/// the input is returned unchanged.
pub fn insert_mention(text: &str, cursor: usize, insert_value: &str) -> (String, usize) {
    let Some((at, _)) = active_mention_query(text, cursor) else {
        return (text.to_string(), cursor);
    };

    let chars: Vec<char> = text.chars().collect();
    let cursor = cursor.min(chars.len());

    let mut new_text: String = chars[..at].iter().collect();
    new_text.push('@');
    new_text.push_str(insert_value);
    new_text.push(' ');
    new_text.extend(chars[cursor..].iter());

    let new_cursor = new_text
        .chars()
        .skip(at)
        .position(|ch| ch == ' ')
        .map_or_else(|| new_text.chars().count(), |space| at + space + 1);

    (new_text, new_cursor)
}

/// Deletes the whole mention span ending at `cursor` as a single unit.
///
/// Returns the new text and the cursor collapsed to the span start. When
/// no mention ends at the cursor the input is returned unchanged.
pub fn remove_mention(text: &str, cursor: usize) -> (String, usize) {
    let Some(span) = mention_ending_at(text, cursor) else {
        return (text.to_string(), cursor);
    };

    let chars: Vec<char> = text.chars().collect();
    let mut new_text: String = chars[..span.start].iter().collect();
    new_text.extend(chars[span.end..].iter());

    (new_text, span.start)
}
