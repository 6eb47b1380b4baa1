//! Ordered ad pod and the current-item cursor.
//!
//! The index is monotonically non-decreasing for the lifetime of one
//! session and never wraps; callers must check `advance()` / `has_next()`
//! before treating `current()` as valid.

use log::debug;

use crate::entities::{AdItem, AdOptions};

/// Ordered pod of ad items with per-item options.
#[derive(Debug, Default)]
pub struct AdSequence {
    items: Vec<AdItem>,
    options: Option<Vec<AdOptions>>,
    index: usize,
}

impl AdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new pod. A single item is passed as a length-1 vec.
    /// Resets the cursor to 0.
    pub fn start(&mut self, items: Vec<AdItem>, options: Option<Vec<AdOptions>>) {
        debug!("ad pod started: {} item(s)", items.len());
        self.items = items;
        self.options = options;
        self.index = 0;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 0-based cursor into the pod.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn items(&self) -> &[AdItem] {
        &self.items
    }

    /// Item and options at the cursor. `None` once the pod is exhausted
    /// or before `start()`.
    pub fn current(&self) -> Option<(&AdItem, Option<&AdOptions>)> {
        debug_assert!(!self.items.is_empty(), "current() before start()");
        let item = self.items.get(self.index)?;
        let options = self
            .options
            .as_ref()
            .and_then(|opts| opts.get(self.index));
        Some((item, options))
    }

    /// True when at least one item follows the cursor.
    pub fn has_next(&self) -> bool {
        self.index + 1 < self.items.len()
    }

    /// Move the cursor forward. Returns whether a next item exists.
    /// The cursor never moves backward and never wraps.
    pub fn advance(&mut self) -> bool {
        self.index += 1;
        self.index < self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pod(n: usize) -> Vec<AdItem> {
        (0..n).map(|i| AdItem::new(format!("ads/{i}.mp4"))).collect()
    }

    #[test]
    fn test_start_resets_index() {
        let mut seq = AdSequence::new();
        seq.start(pod(3), None);
        seq.advance();
        assert_eq!(seq.index(), 1);
        seq.start(pod(2), None);
        assert_eq!(seq.index(), 0);
        assert_eq!(seq.len(), 2);
    }

    #[test]
    fn test_advance_reports_remaining() {
        let mut seq = AdSequence::new();
        seq.start(pod(2), None);
        assert!(seq.has_next());
        assert!(seq.advance());
        assert!(!seq.has_next());
        assert!(!seq.advance());
        assert!(seq.current().is_none());
    }

    #[test]
    fn test_current_pairs_item_with_options() {
        let mut seq = AdSequence::new();
        let options = vec![
            AdOptions { tag: Some("a".into()), ..AdOptions::default() },
            AdOptions { tag: Some("b".into()), ..AdOptions::default() },
        ];
        seq.start(pod(2), Some(options));

        let (item, opts) = seq.current().unwrap();
        assert_eq!(item.source, "ads/0.mp4");
        assert_eq!(opts.unwrap().tag.as_deref(), Some("a"));

        seq.advance();
        let (_, opts) = seq.current().unwrap();
        assert_eq!(opts.unwrap().tag.as_deref(), Some("b"));
    }

    #[test]
    fn test_single_item_pod() {
        let mut seq = AdSequence::new();
        seq.start(pod(1), None);
        assert!(!seq.has_next());
        assert!(seq.current().is_some());
    }
}
