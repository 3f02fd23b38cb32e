//! Selection state for the mention autocomplete menu.
//!
//! The menu never stores candidates: the host recomputes the list per
//! event and the state here is reconciled against whatever came back.
//! Highlight positions therefore always refer to the latest list.

use crate::domain::candidate::{MentionCandidate, PathKind};

/// Live state of an open autocomplete menu.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MenuState {
    /// Text typed after the `@`, used to filter candidates.
    pub query: String,
    /// Category scoping from a two-step affordance pick, if any.
    pub category_filter: Option<PathKind>,
    /// Index of the highlighted candidate in the current list. `None`
    /// when the list has no selectable entry for the highlight to rest on.
    pub highlighted: Option<usize>,
    /// Set on menu mouse-down so the input's blur does not close the
    /// menu before the click lands.
    pub pending_mouse_down: bool,
}

impl MenuState {
    /// Opens the menu for `query` with the highlight on the configured
    /// default slot where that slot is selectable.
    pub fn open(query: String, default_slot: usize, candidates: &[MentionCandidate]) -> Self {
        Self {
            query,
            category_filter: None,
            highlighted: default_highlight(default_slot, candidates),
            pending_mouse_down: false,
        }
    }

    /// Moves the highlight to the next selectable candidate, wrapping
    /// from the bottom back to the top.
    pub fn move_down(&mut self, candidates: &[MentionCandidate]) {
        let selectable = selectable_indices(candidates);
        if selectable.is_empty() {
            self.highlighted = None;

            return;
        }

        let next = match self.highlighted {
            Some(current) => selectable
                .iter()
                .copied()
                .find(|&index| index > current)
                .unwrap_or(selectable[0]),
            None => selectable[0],
        };
        self.highlighted = Some(next);
    }

    /// Moves the highlight to the previous selectable candidate,
    /// wrapping from the top back to the bottom.
    pub fn move_up(&mut self, candidates: &[MentionCandidate]) {
        let selectable = selectable_indices(candidates);
        if selectable.is_empty() {
            self.highlighted = None;

            return;
        }

        let previous = match self.highlighted {
            Some(current) => selectable
                .iter()
                .copied()
                .rev()
                .find(|&index| index < current)
                .unwrap_or_else(|| selectable[selectable.len() - 1]),
            None => selectable[selectable.len() - 1],
        };
        self.highlighted = Some(previous);
    }

    /// Escape behavior: clears the category scope and returns the
    /// highlight to the default slot. The query mirrors the buffer text,
    /// which Escape does not change, so it is left alone.
    pub fn reset_to_default(&mut self, default_slot: usize, candidates: &[MentionCandidate]) {
        self.category_filter = None;
        self.highlighted = default_highlight(default_slot, candidates);
    }

    /// Narrows the menu to `kind` after a category affordance pick. The
    /// query restarts empty and the highlight moves to the top.
    pub fn scope_to_category(&mut self, kind: PathKind, candidates: &[MentionCandidate]) {
        self.query.clear();
        self.category_filter = Some(kind);
        self.highlighted = selectable_indices(candidates).first().copied();
    }

    /// Re-locates the previously highlighted candidate in a recomputed
    /// list by identity. A vanished candidate clears the highlight
    /// rather than landing on an arbitrary neighbor.
    pub fn reconcile_highlight(
        &mut self,
        previous: Option<&MentionCandidate>,
        candidates: &[MentionCandidate],
    ) {
        self.highlighted = previous
            .and_then(|target| candidates.iter().position(|candidate| candidate == target));
    }

    /// The candidate under the highlight, when it is selectable.
    pub fn highlighted_candidate<'a>(
        &self,
        candidates: &'a [MentionCandidate],
    ) -> Option<&'a MentionCandidate> {
        self.highlighted
            .and_then(|index| candidates.get(index))
            .filter(|candidate| candidate.is_selectable())
    }
}

fn selectable_indices(candidates: &[MentionCandidate]) -> Vec<usize> {
    candidates
        .iter()
        .enumerate()
        .filter(|(_, candidate)| candidate.is_selectable())
        .map(|(index, _)| index)
        .collect()
}

fn default_highlight(default_slot: usize, candidates: &[MentionCandidate]) -> Option<usize> {
    if candidates
        .get(default_slot)
        .is_some_and(MentionCandidate::is_selectable)
    {
        return Some(default_slot);
    }

    selectable_indices(candidates).first().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates_with_url() -> Vec<MentionCandidate> {
        vec![
            MentionCandidate::Problems,
            MentionCandidate::Url("https://example.com".to_string()),
            MentionCandidate::Category(PathKind::Folder),
            MentionCandidate::Category(PathKind::File),
            MentionCandidate::Path {
                kind: PathKind::File,
                path: "src/main.rs".to_string(),
            },
        ]
    }

    #[test]
    fn test_open_prefers_default_slot() {
        // Arrange
        let candidates = candidates_with_url();

        // Act
        let menu = MenuState::open(String::new(), 3, &candidates);

        // Assert
        assert_eq!(menu.highlighted, Some(3));
    }

    #[test]
    fn test_open_falls_back_to_first_selectable() {
        // Arrange — only two entries, default slot out of range
        let candidates = vec![
            MentionCandidate::Url("https://example.com".to_string()),
            MentionCandidate::Problems,
        ];

        // Act
        let menu = MenuState::open(String::new(), 3, &candidates);

        // Assert — the url entry is skipped
        assert_eq!(menu.highlighted, Some(1));
    }

    #[test]
    fn test_move_down_wraps_and_skips_url() {
        // Arrange
        let candidates = candidates_with_url();
        let mut menu = MenuState::open(String::new(), 3, &candidates);

        // Act & Assert — full cycle lands back where it started
        menu.move_down(&candidates);
        assert_eq!(menu.highlighted, Some(4));
        menu.move_down(&candidates);
        assert_eq!(menu.highlighted, Some(0));
        menu.move_down(&candidates);
        assert_eq!(menu.highlighted, Some(2));
        menu.move_down(&candidates);
        assert_eq!(menu.highlighted, Some(3));
    }

    #[test]
    fn test_move_up_wraps_to_bottom() {
        // Arrange
        let candidates = candidates_with_url();
        let mut menu = MenuState::open(String::new(), 3, &candidates);
        menu.highlighted = Some(0);

        // Act
        menu.move_up(&candidates);

        // Assert
        assert_eq!(menu.highlighted, Some(4));
    }

    #[test]
    fn test_reset_to_default_clears_filter_but_keeps_query() {
        // Arrange
        let candidates = candidates_with_url();
        let mut menu = MenuState::open("main".to_string(), 3, &candidates);
        menu.category_filter = Some(PathKind::File);
        menu.highlighted = Some(4);

        // Act
        menu.reset_to_default(3, &candidates);

        // Assert — the query still mirrors the typed text
        assert_eq!(menu.query, "main");
        assert!(menu.category_filter.is_none());
        assert_eq!(menu.highlighted, Some(3));
    }

    #[test]
    fn test_scope_to_category_highlights_top_of_scoped_list() {
        // Arrange
        let mut menu = MenuState::open(String::new(), 3, &candidates_with_url());
        let scoped = vec![MentionCandidate::Path {
            kind: PathKind::File,
            path: "src/main.rs".to_string(),
        }];

        // Act
        menu.scope_to_category(PathKind::File, &scoped);

        // Assert
        assert_eq!(menu.category_filter, Some(PathKind::File));
        assert!(menu.query.is_empty());
        assert_eq!(menu.highlighted, Some(0));
    }

    #[test]
    fn test_reconcile_highlight_follows_candidate_identity() {
        // Arrange — the highlighted path moves to a new position
        let mut menu = MenuState::open(String::new(), 3, &candidates_with_url());
        menu.highlighted = Some(4);
        let target = MentionCandidate::Path {
            kind: PathKind::File,
            path: "src/main.rs".to_string(),
        };
        let narrowed = vec![target.clone()];

        // Act
        menu.reconcile_highlight(Some(&target), &narrowed);

        // Assert
        assert_eq!(menu.highlighted, Some(0));
    }

    #[test]
    fn test_reconcile_highlight_clears_when_candidate_vanishes() {
        // Arrange
        let mut menu = MenuState::open(String::new(), 3, &candidates_with_url());
        let vanished = MentionCandidate::Path {
            kind: PathKind::File,
            path: "gone.rs".to_string(),
        };

        // Act
        menu.reconcile_highlight(Some(&vanished), &[MentionCandidate::Problems]);

        // Assert
        assert_eq!(menu.highlighted, None);
    }

    #[test]
    fn test_highlighted_candidate_ignores_unselectable_entries() {
        // Arrange
        let candidates = candidates_with_url();
        let mut menu = MenuState::open(String::new(), 3, &candidates);
        menu.highlighted = Some(1);

        // Act & Assert — the url entry cannot be committed
        assert!(menu.highlighted_candidate(&candidates).is_none());
    }
}
