//! The composer facade: one state machine owning the buffer, the
//! autocomplete menu, the deletion arm, attachments, and the pending
//! cursor slot.
//!
//! Hosts feed key, paste, and focus events in and apply the returned
//! [`ComposerEvent`]s to their native input. The engine's buffer is the
//! authoritative proposal; the host mirrors it.

use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::warn;

use crate::domain::attachment::AttachmentList;
use crate::domain::candidate::{IndexablePath, MentionCandidate, compute_candidates};
use crate::domain::edit::{BackspaceOutcome, backspace_outcome, insert_mention, remove_mention};
use crate::domain::input::InputBuffer;
use crate::domain::mention::active_mention_query;
use crate::infra::clipboard::{
    ClipboardEntry, ClipboardSource, PasteError, accepted_image_subtype, decode_image_entries,
};
use crate::infra::file_index::index_paths;
use crate::ui::highlight;
use crate::ui::layout::wrapped_row_count;
use crate::ui::state::menu::MenuState;

/// Host-tunable knobs, applied at construction.
#[derive(Clone, Copy, Debug)]
pub struct ComposerConfig {
    /// Hard cap on pending attachments; the earliest survive.
    pub max_attachments: usize,
    /// Disables the whole image paste pipeline and the picker request.
    pub images_disabled: bool,
    /// Menu slot highlighted when the menu opens unfiltered. Slot `3`
    /// is the first concrete path entry in the default ordering.
    pub default_highlighted_slot: usize,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            max_attachments: 20,
            images_disabled: false,
            default_highlighted_slot: 3,
        }
    }
}

/// Interaction mode. The menu and the armed deletion flag are mutually
/// exclusive by construction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ComposerMode {
    #[default]
    Idle,
    /// The autocomplete menu is open for an in-progress `@query`.
    Menu(MenuState),
    /// The previous Backspace landed on a mention boundary; the next one
    /// removes the whole mention.
    AwaitingMentionDelete,
}

/// Effects the host must apply after feeding the engine an event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ComposerEvent {
    /// The authoritative buffer changed; mirror text and cursor.
    TextChanged { text: String, cursor: usize },
    /// The user submitted the drafted message.
    RequestSend { text: String },
    /// The user asked for the host's native image picker.
    RequestImagePicker,
    /// The pending attachment list changed.
    AttachmentsChanged(Vec<String>),
    /// The composition now needs this many display rows.
    CompositionHeightChanged(u16),
}

/// Result of a paste: whether the host should suppress its native paste
/// handling, plus any effects to apply.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PasteOutcome {
    pub default_suppressed: bool,
    pub events: Vec<ComposerEvent>,
}

/// The mention-aware composer engine.
pub struct Composer {
    input: InputBuffer,
    mode: ComposerMode,
    /// Single-slot cursor override, consumed once by [`Self::reconcile_cursor`].
    pending_cursor: Option<usize>,
    attachments: AttachmentList,
    index: Vec<IndexablePath>,
    config: ComposerConfig,
    viewport_width: Option<u16>,
    last_height: u16,
}

impl Composer {
    pub fn new(config: ComposerConfig) -> Self {
        Self {
            input: InputBuffer::new(),
            mode: ComposerMode::Idle,
            pending_cursor: None,
            attachments: AttachmentList::new(config.max_attachments),
            index: Vec::new(),
            config,
            viewport_width: None,
            last_height: 1,
        }
    }

    pub fn text(&self) -> &str {
        self.input.text()
    }

    pub fn cursor(&self) -> usize {
        self.input.cursor()
    }

    pub fn mode(&self) -> &ComposerMode {
        &self.mode
    }

    pub fn menu(&self) -> Option<&MenuState> {
        match &self.mode {
            ComposerMode::Menu(menu) => Some(menu),
            _ => None,
        }
    }

    pub fn attachments(&self) -> &[String] {
        self.attachments.items()
    }

    /// Replaces the indexable-path snapshot the menu draws from.
    pub fn set_index(&mut self, index: Vec<IndexablePath>) {
        self.index = index;
    }

    /// Rebuilds the path snapshot from the filesystem under `root`.
    pub fn refresh_index(&mut self, root: &Path) {
        self.index = index_paths(root);
    }

    /// Overwrites the buffer from a host-side edit and re-syncs the menu.
    pub fn sync_text(&mut self, text: String, cursor: usize) {
        self.input.set_contents(text, cursor);
        self.sync_menu();
    }

    /// The candidate list for the currently open menu. Recomputed per
    /// call; the engine never caches candidates across events.
    pub fn candidates(&self) -> Vec<MentionCandidate> {
        match &self.mode {
            ComposerMode::Menu(menu) => {
                compute_candidates(&menu.query, menu.category_filter, &self.index)
            }
            _ => Vec::new(),
        }
    }

    /// Highlight markup for the host's overlay, projected from the
    /// current buffer text.
    pub fn highlight_markup(&self) -> String {
        highlight::project(self.input.text())
    }

    /// Feeds one keystroke through the state machine.
    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<ComposerEvent> {
        if key.kind == KeyEventKind::Release {
            return Vec::new();
        }

        // Anything other than Backspace disarms atomic deletion.
        if key.code != KeyCode::Backspace && self.mode == ComposerMode::AwaitingMentionDelete {
            self.mode = ComposerMode::Idle;
        }

        match key.code {
            KeyCode::Enter | KeyCode::Char('\r' | '\n') => self.handle_enter(key),
            KeyCode::Esc => {
                self.handle_escape();

                Vec::new()
            }
            KeyCode::Up => self.handle_up(),
            KeyCode::Down => self.handle_down(),
            KeyCode::Left => {
                self.input.move_left();
                self.sync_menu();

                Vec::new()
            }
            KeyCode::Right => {
                self.input.move_right();
                self.sync_menu();

                Vec::new()
            }
            KeyCode::Home => {
                self.input.move_home();
                self.sync_menu();

                Vec::new()
            }
            KeyCode::End => {
                self.input.move_end();
                self.sync_menu();

                Vec::new()
            }
            KeyCode::Backspace => self.handle_backspace(),
            KeyCode::Delete => {
                if self.input.cursor() >= self.input.char_len() {
                    return Vec::new();
                }

                self.input.delete_forward();
                self.sync_menu();

                self.buffer_events()
            }
            KeyCode::Char(ch) => {
                self.input.insert_char(ch);
                self.sync_menu();

                self.buffer_events()
            }
            _ => Vec::new(),
        }
    }

    /// Commits the candidate at `index`, as from a menu click.
    pub fn select_candidate(&mut self, index: usize) -> Vec<ComposerEvent> {
        let candidates = self.candidates();
        let Some(candidate) = candidates.get(index) else {
            return Vec::new();
        };
        if !candidate.is_selectable() {
            return Vec::new();
        }

        let candidate = candidate.clone();
        if let ComposerMode::Menu(menu) = &mut self.mode {
            menu.pending_mouse_down = false;
        }

        self.commit_candidate(&candidate)
    }

    /// Records a mouse-down on the menu so the input's blur does not
    /// close it before the click commits.
    pub fn set_menu_mouse_down(&mut self, pending: bool) {
        if let ComposerMode::Menu(menu) = &mut self.mode {
            menu.pending_mouse_down = pending;
        }
    }

    /// Closes the menu on input blur, unless a menu click is in flight.
    pub fn handle_blur(&mut self) {
        if let ComposerMode::Menu(menu) = &self.mode {
            if menu.pending_mouse_down {
                return;
            }

            self.mode = ComposerMode::Idle;
        }
    }

    /// Takes the pending cursor override, if one is waiting. Each
    /// programmatic edit writes at most one target and the host consumes
    /// it exactly once.
    pub fn reconcile_cursor(&mut self) -> Option<usize> {
        let target = self.pending_cursor.take()?;
        self.input.set_cursor(target);

        Some(target)
    }

    /// Ingests raw clipboard entries from a paste gesture.
    ///
    /// Non-image and unsupported-subtype entries fall through to the
    /// host's native paste. Image entries suppress it, even when none of
    /// them survive decoding.
    pub async fn ingest_paste(&mut self, entries: Vec<ClipboardEntry>) -> PasteOutcome {
        if self.config.images_disabled {
            return PasteOutcome::default();
        }

        let images: Vec<ClipboardEntry> = entries
            .into_iter()
            .filter(|entry| accepted_image_subtype(&entry.mime).is_some())
            .collect();
        if images.is_empty() {
            return PasteOutcome::default();
        }

        let data_urls = decode_image_entries(images).await;
        if data_urls.is_empty() {
            warn!("no pasted image could be decoded");

            return PasteOutcome {
                default_suppressed: true,
                events: Vec::new(),
            };
        }

        let changed = self.attachments.append_capped(data_urls);
        let events = if changed {
            vec![ComposerEvent::AttachmentsChanged(
                self.attachments.items().to_vec(),
            )]
        } else {
            Vec::new()
        };

        PasteOutcome {
            default_suppressed: true,
            events,
        }
    }

    /// Reads the system clipboard through `source` and ingests it.
    pub async fn ingest_clipboard(
        &mut self,
        source: &mut dyn ClipboardSource,
    ) -> Result<PasteOutcome, PasteError> {
        let entries = source.entries()?;

        Ok(self.ingest_paste(entries).await)
    }

    /// Drops the attachment at `index`.
    pub fn remove_attachment(&mut self, index: usize) -> Vec<ComposerEvent> {
        if self.attachments.remove(index).is_none() {
            return Vec::new();
        }

        vec![ComposerEvent::AttachmentsChanged(
            self.attachments.items().to_vec(),
        )]
    }

    /// Asks the host to open its image picker, unless images are off.
    pub fn request_image_picker(&self) -> Option<ComposerEvent> {
        if self.config.images_disabled {
            return None;
        }

        Some(ComposerEvent::RequestImagePicker)
    }

    /// Records the viewport width used for height measurement.
    pub fn set_viewport_width(&mut self, width: u16) -> Option<ComposerEvent> {
        self.viewport_width = Some(width);

        self.height_event()
    }

    fn handle_enter(&mut self, key: KeyEvent) -> Vec<ComposerEvent> {
        if should_insert_newline(key) {
            self.input.insert_newline();
            self.sync_menu();

            return self.buffer_events();
        }

        if let ComposerMode::Menu(menu) = &self.mode {
            let candidates = self.candidates();
            if let Some(candidate) = menu.highlighted_candidate(&candidates) {
                let candidate = candidate.clone();

                return self.commit_candidate(&candidate);
            }
        }

        if self.input.is_empty() {
            return Vec::new();
        }

        let text = self.input.take_text();
        self.mode = ComposerMode::Idle;

        let mut events = vec![
            ComposerEvent::RequestSend { text },
            ComposerEvent::TextChanged {
                text: String::new(),
                cursor: 0,
            },
        ];
        events.extend(self.height_event());

        events
    }

    fn handle_escape(&mut self) {
        let Some(menu) = self.menu() else {
            return;
        };

        // The query survives the reset, so the candidates the highlight
        // lands on are the ones the visible query still allows.
        let unscoped = compute_candidates(&menu.query, None, &self.index);
        if let ComposerMode::Menu(menu) = &mut self.mode {
            menu.reset_to_default(self.config.default_highlighted_slot, &unscoped);
        }
    }

    fn handle_up(&mut self) -> Vec<ComposerEvent> {
        if matches!(self.mode, ComposerMode::Menu(_)) {
            let candidates = self.candidates();
            if let ComposerMode::Menu(menu) = &mut self.mode {
                menu.move_up(&candidates);
            }

            return Vec::new();
        }

        self.input.move_up();
        self.sync_menu();

        Vec::new()
    }

    fn handle_down(&mut self) -> Vec<ComposerEvent> {
        if matches!(self.mode, ComposerMode::Menu(_)) {
            let candidates = self.candidates();
            if let ComposerMode::Menu(menu) = &mut self.mode {
                menu.move_down(&candidates);
            }

            return Vec::new();
        }

        self.input.move_down();
        self.sync_menu();

        Vec::new()
    }

    fn handle_backspace(&mut self) -> Vec<ComposerEvent> {
        let armed = self.mode == ComposerMode::AwaitingMentionDelete;

        match backspace_outcome(self.input.text(), self.input.cursor(), armed) {
            BackspaceOutcome::PassThrough { arm } => {
                if self.input.cursor() == 0 {
                    return Vec::new();
                }

                self.input.delete_backward();
                if arm {
                    // The menu must not reopen beside the now-adjacent
                    // mention, so the usual re-sync is skipped.
                    self.mode = ComposerMode::AwaitingMentionDelete;
                } else {
                    self.sync_menu();
                }

                self.buffer_events()
            }
            BackspaceOutcome::MoveCursor { cursor } => {
                self.input.set_cursor(cursor);
                self.mode = ComposerMode::AwaitingMentionDelete;
                self.pending_cursor = Some(cursor);

                self.buffer_events()
            }
            BackspaceOutcome::RemoveMention => {
                let (new_text, new_cursor) =
                    remove_mention(self.input.text(), self.input.cursor());
                self.mode = ComposerMode::Idle;
                if new_text == self.input.text() {
                    return Vec::new();
                }

                self.apply_programmatic_edit(new_text, new_cursor)
            }
        }
    }

    fn commit_candidate(&mut self, candidate: &MentionCandidate) -> Vec<ComposerEvent> {
        match candidate {
            MentionCandidate::Url(_) => Vec::new(),
            MentionCandidate::Category(kind) => {
                let scoped = compute_candidates("", Some(*kind), &self.index);
                if let ComposerMode::Menu(menu) = &mut self.mode {
                    menu.scope_to_category(*kind, &scoped);
                }

                Vec::new()
            }
            _ => {
                let insert = candidate.insert_value();
                let (new_text, new_cursor) =
                    insert_mention(self.input.text(), self.input.cursor(), &insert);
                if new_text == self.input.text() && new_cursor == self.input.cursor() {
                    return Vec::new();
                }

                self.mode = ComposerMode::Idle;

                self.apply_programmatic_edit(new_text, new_cursor)
            }
        }
    }

    /// Applies an engine-initiated text edit and queues the cursor
    /// override for the host to reconcile.
    fn apply_programmatic_edit(&mut self, text: String, cursor: usize) -> Vec<ComposerEvent> {
        self.input.set_contents(text, cursor);
        self.pending_cursor = Some(cursor);

        self.buffer_events()
    }

    /// Re-derives the menu from the `@query` at the cursor, if any.
    ///
    /// An existing menu keeps its category scope and follows its
    /// highlighted candidate by identity into the recomputed list; a
    /// candidate that vanished leaves the highlight empty rather than
    /// jumping to a neighbor.
    fn sync_menu(&mut self) {
        let Some((_, query)) = active_mention_query(self.input.text(), self.input.cursor()) else {
            if matches!(self.mode, ComposerMode::Menu(_)) {
                self.mode = ComposerMode::Idle;
            }

            return;
        };

        let next = match &self.mode {
            ComposerMode::Menu(menu) => {
                let old_candidates =
                    compute_candidates(&menu.query, menu.category_filter, &self.index);
                let previous = menu
                    .highlighted
                    .and_then(|index| old_candidates.get(index))
                    .cloned();
                let new_candidates =
                    compute_candidates(&query, menu.category_filter, &self.index);

                let mut next = MenuState {
                    query,
                    category_filter: menu.category_filter,
                    highlighted: None,
                    pending_mouse_down: menu.pending_mouse_down,
                };
                next.reconcile_highlight(previous.as_ref(), &new_candidates);

                next
            }
            _ => {
                let candidates = compute_candidates(&query, None, &self.index);

                MenuState::open(query, self.config.default_highlighted_slot, &candidates)
            }
        };

        self.mode = ComposerMode::Menu(next);
    }

    fn buffer_events(&mut self) -> Vec<ComposerEvent> {
        let mut events = vec![ComposerEvent::TextChanged {
            text: self.input.text().to_string(),
            cursor: self.input.cursor(),
        }];
        events.extend(self.height_event());

        events
    }

    fn height_event(&mut self) -> Option<ComposerEvent> {
        let width = self.viewport_width?;
        let rows = wrapped_row_count(self.input.text(), width);
        if rows == self.last_height {
            return None;
        }

        self.last_height = rows;

        Some(ComposerEvent::CompositionHeightChanged(rows))
    }
}

fn should_insert_newline(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::ALT) || key.modifiers.contains(KeyModifiers::SHIFT)
}
