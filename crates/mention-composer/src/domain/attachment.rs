//! Ordered attachment list with a hard cap.

/// Pending attachments, stored as base64 data URLs in arrival order.
///
/// The cap keeps the earliest items: appends past the cap are dropped
/// rather than evicting older entries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttachmentList {
    items: Vec<String>,
    cap: usize,
}

impl AttachmentList {
    pub fn new(cap: usize) -> Self {
        Self {
            items: Vec::new(),
            cap,
        }
    }

    /// Appends `incoming` in order, truncating at the cap.
    ///
    /// Returns whether the list changed.
    pub fn append_capped(&mut self, incoming: Vec<String>) -> bool {
        let before = self.items.len();
        self.items.extend(incoming);
        self.items.truncate(self.cap);

        self.items.len() != before
    }

    /// Removes and returns the attachment at `index`, if present.
    pub fn remove(&mut self, index: usize) -> Option<String> {
        if index >= self.items.len() {
            return None;
        }

        Some(self.items.remove(index))
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_capped_keeps_earliest_items() {
        // Arrange
        let mut list = AttachmentList::new(2);

        // Act
        let changed = list.append_capped(vec!["a".to_string(), "b".to_string(), "c".to_string()]);

        // Assert
        assert!(changed);
        assert_eq!(list.items(), ["a", "b"]);
    }

    #[test]
    fn test_append_capped_at_cap_reports_no_change() {
        // Arrange
        let mut list = AttachmentList::new(1);
        list.append_capped(vec!["a".to_string()]);

        // Act
        let changed = list.append_capped(vec!["b".to_string()]);

        // Assert
        assert!(!changed);
        assert_eq!(list.items(), ["a"]);
    }

    #[test]
    fn test_remove_returns_item_and_shifts_order() {
        // Arrange
        let mut list = AttachmentList::new(5);
        list.append_capped(vec!["a".to_string(), "b".to_string(), "c".to_string()]);

        // Act
        let removed = list.remove(1);

        // Assert
        assert_eq!(removed.as_deref(), Some("b"));
        assert_eq!(list.items(), ["a", "c"]);
    }

    #[test]
    fn test_remove_out_of_range_is_none() {
        // Arrange
        let mut list = AttachmentList::new(5);

        // Act & Assert
        assert!(list.remove(0).is_none());
        assert!(list.is_empty());
    }
}
