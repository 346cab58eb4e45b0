//! Playback queue
//!
//! The ordered list a track was started from, plus a cursor. The queue is
//! replaced wholesale whenever playback starts from a new list and is never
//! reordered; shuffle only changes how the next cursor position is picked.

use crate::types::Track;
use serde::Serialize;

/// Ordered working set of tracks governing next/previous navigation
///
/// Invariant: `current < tracks.len()` whenever `tracks` is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Queue {
    tracks: Vec<Track>,
    current: usize,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every track and move the cursor
    ///
    /// An out-of-range `index` is clamped onto the last track.
    pub fn replace(&mut self, tracks: Vec<Track>, index: usize) {
        self.current = index.min(tracks.len().saturating_sub(1));
        self.tracks = tracks;
    }

    /// Move the cursor to `index`
    ///
    /// Returns the track now under the cursor, or `None` (cursor untouched)
    /// when `index` is out of range.
    pub fn select(&mut self, index: usize) -> Option<&Track> {
        if index >= self.tracks.len() {
            return None;
        }
        self.current = index;
        self.tracks.get(index)
    }

    /// Track under the cursor
    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.current)
    }

    /// Cursor position, `None` while the queue is empty
    pub fn current_index(&self) -> Option<usize> {
        if self.tracks.is_empty() {
            None
        } else {
            Some(self.current)
        }
    }

    /// Get track at index
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Index of the first track with the given id
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    /// All tracks in queue order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracks(ids: &[&str]) -> Vec<Track> {
        ids.iter()
            .map(|id| Track::new(*id, format!("Track {}", id), "Artist", format!("mem://{}", id)))
            .collect()
    }

    #[test]
    fn empty_queue_has_no_cursor() {
        let queue = Queue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.current_index(), None);
        assert!(queue.current().is_none());
    }

    #[test]
    fn replace_sets_cursor() {
        let mut queue = Queue::new();
        queue.replace(tracks(&["a", "b", "c"]), 1);

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.current_index(), Some(1));
        assert_eq!(queue.current().unwrap().id, "b");
    }

    #[test]
    fn replace_clamps_out_of_range_cursor() {
        let mut queue = Queue::new();
        queue.replace(tracks(&["a", "b"]), 7);
        assert_eq!(queue.current_index(), Some(1));

        queue.replace(Vec::new(), 3);
        assert_eq!(queue.current_index(), None);
    }

    #[test]
    fn replace_discards_previous_tracks() {
        let mut queue = Queue::new();
        queue.replace(tracks(&["a", "b", "c"]), 2);
        queue.replace(tracks(&["x", "y"]), 0);

        let ids: Vec<&str> = queue.tracks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["x", "y"]);
        assert_eq!(queue.position_of("c"), None);
    }

    #[test]
    fn select_rejects_out_of_range() {
        let mut queue = Queue::new();
        queue.replace(tracks(&["a", "b"]), 0);

        assert_eq!(queue.select(1).map(|t| t.id.as_str()), Some("b"));
        assert!(queue.select(2).is_none());
        assert_eq!(queue.current_index(), Some(1));
    }

    #[test]
    fn position_of_finds_first_match() {
        let mut queue = Queue::new();
        queue.replace(tracks(&["a", "b", "a"]), 0);
        assert_eq!(queue.position_of("a"), Some(0));
        assert_eq!(queue.position_of("b"), Some(1));
        assert_eq!(queue.position_of("z"), None);
    }
}
