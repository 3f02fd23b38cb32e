//! Projects buffer text into highlight markup for the host's overlay.
//!
//! The projection is a pure function of the text: recognized mention
//! tokens are wrapped in a `<mark>` element and everything is HTML
//! escaped, so the overlay renders visually identical glyphs over the
//! native input.

use crate::domain::mention::find_mention_spans;

const HIGHLIGHT_OPEN: &str = "<mark class=\"mention-highlight\">";
const HIGHLIGHT_CLOSE: &str = "</mark>";

/// Renders `text` as escaped markup with every mention span wrapped in
/// a highlight element.
///
/// A trailing newline is doubled so the overlay keeps a visible final
/// line where the native input shows one.
pub fn project(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut markup = String::new();
    let mut plain_from = 0;

    for span in find_mention_spans(text) {
        push_escaped(&mut markup, &chars[plain_from..span.start]);
        markup.push_str(HIGHLIGHT_OPEN);
        push_escaped(&mut markup, &chars[span.start..span.end]);
        markup.push_str(HIGHLIGHT_CLOSE);
        plain_from = span.end;
    }

    push_escaped(&mut markup, &chars[plain_from..]);

    if markup.ends_with('\n') {
        markup.push('\n');
    }

    markup
}

fn push_escaped(markup: &mut String, chars: &[char]) {
    for ch in chars {
        match ch {
            '&' => markup.push_str("&amp;"),
            '<' => markup.push_str("&lt;"),
            '>' => markup.push_str("&gt;"),
            _ => markup.push(*ch),
        }
    }
}
