//! Mention-aware text editing engine for chat input surfaces.
//!
//! The engine owns the authoritative text buffer, the `@` mention
//! autocomplete menu, atomic mention deletion, highlight projection,
//! and clipboard image ingestion. Hosts feed it key, paste, and focus
//! events and apply the [`ComposerEvent`]s it returns to their native
//! input widget.

pub mod app;
pub mod domain;
pub mod infra;
pub mod ui;

pub use app::{Composer, ComposerConfig, ComposerEvent, ComposerMode, PasteOutcome};
pub use domain::candidate::{IndexablePath, MentionCandidate, PathKind};
pub use domain::mention::{MentionKind, MentionSpan, find_mention_spans};
pub use infra::clipboard::{ClipboardEntry, ClipboardSource, PasteError, SystemClipboard};
pub use infra::file_index::index_paths;
pub use ui::state::menu::MenuState;
