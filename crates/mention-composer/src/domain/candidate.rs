//! Autocomplete candidates for the `@` mention menu.
//!
//! Candidates are recomputed from the host's latest indexable-path
//! snapshot on every query change and never cached across events.

use url::Url;

/// Whether an indexable path points at a file or a folder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathKind {
    File,
    Folder,
}

/// A host-supplied path the menu may offer. The engine treats the list
/// as read-only; folder paths carry a trailing `/`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexablePath {
    pub kind: PathKind,
    pub path: String,
}

/// A single autocomplete suggestion.
///
/// `Category` entries are the two-step affordances: picking one narrows
/// the menu to that category instead of inserting text. `Url` entries are
/// display-only — free-typed URLs are auto-recognized by the grammar, so
/// they are never selectable from the list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MentionCandidate {
    Problems,
    Url(String),
    Category(PathKind),
    Path { kind: PathKind, path: String },
}

impl MentionCandidate {
    /// The label shown in the menu.
    pub fn display_value(&self) -> String {
        match self {
            Self::Problems => "Problems".to_string(),
            Self::Url(url) => url.clone(),
            Self::Category(PathKind::File) => "File".to_string(),
            Self::Category(PathKind::Folder) => "Folder".to_string(),
            Self::Path { path, .. } => path.clone(),
        }
    }

    /// The canonical text inserted after the `@`. Paths gain a leading
    /// `/` so the inserted token satisfies the mention grammar; category
    /// affordances insert nothing.
    pub fn insert_value(&self) -> String {
        match self {
            Self::Problems => "problems".to_string(),
            Self::Url(url) => url.clone(),
            Self::Category(_) => String::new(),
            Self::Path { path, .. } => {
                if path.starts_with('/') {
                    path.clone()
                } else {
                    format!("/{path}")
                }
            }
        }
    }

    /// Whether keyboard navigation and Enter may land on this entry.
    pub fn is_selectable(&self) -> bool {
        !matches!(self, Self::Url(_))
    }
}

/// Computes the ordered candidate list for `(query, category_filter)`
/// against the latest indexable-path snapshot.
///
/// Ordering: Problems, a synthetic Url echo of the query, the Folder and
/// File category affordances, then path entries. Problems and the
/// affordances appear only while no category filter is active. Filtering
/// is substring match against the query, case preserved; an empty query
/// keeps everything the category filter allows.
pub fn compute_candidates(
    query: &str,
    category_filter: Option<PathKind>,
    paths: &[IndexablePath],
) -> Vec<MentionCandidate> {
    let mut candidates = Vec::new();

    if category_filter.is_none() {
        candidates.push(MentionCandidate::Problems);

        if query_is_url(query) {
            candidates.push(MentionCandidate::Url(query.to_string()));
        }

        candidates.push(MentionCandidate::Category(PathKind::Folder));
        candidates.push(MentionCandidate::Category(PathKind::File));
    }

    for entry in paths {
        // Folder iff the path ends with a separator; the declared kind is
        // the host's intent, the separator is the contract.
        let kind = if entry.path.ends_with('/') {
            PathKind::Folder
        } else {
            PathKind::File
        };

        if category_filter.is_some_and(|filter| filter != kind) {
            continue;
        }

        candidates.push(MentionCandidate::Path {
            kind,
            path: entry.path.clone(),
        });
    }

    if !query.is_empty() {
        candidates.retain(|candidate| matches_query(candidate, query));
    }

    candidates
}

/// Substring match on the display or insert value, case preserved.
fn matches_query(candidate: &MentionCandidate, query: &str) -> bool {
    candidate.display_value().contains(query) || candidate.insert_value().contains(query)
}

/// Whether the query itself reads as a URL the grammar would recognize.
fn query_is_url(query: &str) -> bool {
    query.contains("://") && Url::parse(query).is_ok()
}
