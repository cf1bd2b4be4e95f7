//! Fragment deduplication and document accumulation.
//!
//! The upstream source occasionally retransmits a fragment it already
//! emitted. Every cleaned fragment is checked against a fixed-capacity
//! window of recently accepted fragments before it is appended; the window
//! is a safety net, not a primary correctness mechanism - the framed event
//! path is the only writer.

use std::collections::VecDeque;

/// How many recently accepted fragments are remembered for exact-match
/// duplicate suppression.
pub const RECENT_WINDOW_CAPACITY: usize = 64;

/// Fixed-capacity FIFO window of recently accepted fragment strings.
#[derive(Debug)]
pub struct RecentFragmentWindow {
    entries: VecDeque<String>,
    capacity: usize,
}

impl RecentFragmentWindow {
    /// Create a window with the standard capacity.
    pub fn new() -> Self {
        Self::with_capacity(RECENT_WINDOW_CAPACITY)
    }

    /// Create a window with an explicit capacity (tests use small ones).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Exact-match membership check.
    pub fn contains(&self, fragment: &str) -> bool {
        self.entries.iter().any(|entry| entry == fragment)
    }

    /// Remember a fragment, evicting the oldest entry at capacity.
    pub fn insert(&mut self, fragment: String) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(fragment);
    }

    /// Number of remembered fragments.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the window is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RecentFragmentWindow {
    fn default() -> Self {
        Self::new()
    }
}

/// The growing document plus its dedup window.
///
/// Owned exclusively by one session; a new session always starts from an
/// empty accumulator.
#[derive(Debug, Default)]
pub struct DocumentAccumulator {
    window: RecentFragmentWindow,
    document: String,
}

impl DocumentAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a cleaned fragment.
    ///
    /// Returns `true` when the fragment was appended, `false` when it was a
    /// recent duplicate and silently rejected. Accepted fragments join the
    /// document with a single newline.
    pub fn push(&mut self, fragment: &str) -> bool {
        if self.window.contains(fragment) {
            return false;
        }
        self.window.insert(fragment.to_string());
        if !self.document.is_empty() {
            self.document.push('\n');
        }
        self.document.push_str(fragment);
        true
    }

    /// The full cumulative document.
    pub fn document(&self) -> &str {
        &self.document
    }

    /// Whether anything has been accepted yet.
    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_fragment_appends_without_separator() {
        let mut acc = DocumentAccumulator::new();
        assert!(acc.push("first"));
        assert_eq!(acc.document(), "first");
    }

    #[test]
    fn test_fragments_join_with_newline() {
        let mut acc = DocumentAccumulator::new();
        acc.push("first");
        acc.push("second");
        assert_eq!(acc.document(), "first\nsecond");
    }

    #[test]
    fn test_duplicate_within_window_is_rejected() {
        let mut acc = DocumentAccumulator::new();
        assert!(acc.push("repeated"));
        assert!(!acc.push("repeated"));
        assert_eq!(acc.document(), "repeated");
    }

    #[test]
    fn test_window_never_exceeds_capacity() {
        let mut window = RecentFragmentWindow::with_capacity(3);
        for i in 0..10 {
            window.insert(format!("fragment {}", i));
        }
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn test_evicted_fragment_is_accepted_again() {
        let mut window = RecentFragmentWindow::with_capacity(2);
        window.insert("a".to_string());
        window.insert("b".to_string());
        window.insert("c".to_string());
        assert!(!window.contains("a"));
        assert!(window.contains("b"));
        assert!(window.contains("c"));
    }

    #[test]
    fn test_full_capacity_eviction_through_accumulator() {
        let mut acc = DocumentAccumulator::new();
        assert!(acc.push("early"));
        for i in 0..RECENT_WINDOW_CAPACITY {
            acc.push(&format!("filler {}", i));
        }
        // "early" has been evicted from the window, so it appends again.
        assert!(acc.push("early"));
    }

    #[test]
    fn test_document_is_monotonically_non_shrinking() {
        let mut acc = DocumentAccumulator::new();
        let mut last_len = 0;
        for fragment in ["one", "two", "two", "three"] {
            acc.push(fragment);
            assert!(acc.document().len() >= last_len);
            last_len = acc.document().len();
        }
    }
}
