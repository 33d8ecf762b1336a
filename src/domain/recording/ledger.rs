//! Ordered bookkeeping of the segments in a take

use crate::domain::error::SegmentIndexOutOfRange;

use super::Segment;

/// Ordered list of completed segments for the current take.
///
/// Order is insertion order and is the order the backend assembles the
/// take in. Only explicit removal takes segments out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentLedger {
    segments: Vec<Segment>,
}

impl SegmentLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of segments in the take
    pub fn count(&self) -> usize {
        self.segments.len()
    }

    /// Check if the take has no segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append a backend-confirmed segment
    pub fn append(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Remove the most recent segment. No-op on an empty ledger.
    pub fn remove_last(&mut self) -> Option<Segment> {
        self.segments.pop()
    }

    /// Remove every segment, returning them in take order
    pub fn remove_all(&mut self) -> Vec<Segment> {
        std::mem::take(&mut self.segments)
    }

    /// Remove the segment at `index`, leaving the ledger untouched on failure
    pub fn remove_at(&mut self, index: usize) -> Result<Segment, SegmentIndexOutOfRange> {
        self.check_index(index)?;
        Ok(self.segments.remove(index))
    }

    /// Validate an index against the current ledger
    pub fn check_index(&self, index: usize) -> Result<(), SegmentIndexOutOfRange> {
        if index >= self.segments.len() {
            return Err(SegmentIndexOutOfRange {
                index,
                count: self.segments.len(),
            });
        }
        Ok(())
    }

    /// Get a segment by position
    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// Iterate segments in take order
    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// Sum of backend-reported durations
    pub fn total_duration_ms(&self) -> f64 {
        self.segments.iter().map(Segment::duration_ms).sum()
    }

    /// Copy of the segments in take order
    pub fn to_vec(&self) -> Vec<Segment> {
        self.segments.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_with(durations: &[f64]) -> SegmentLedger {
        let mut ledger = SegmentLedger::new();
        for (i, d) in durations.iter().enumerate() {
            ledger.append(Segment::new(*d, format!("seg-{}", i)));
        }
        ledger
    }

    #[test]
    fn new_ledger_is_empty() {
        let ledger = SegmentLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.count(), 0);
        assert_eq!(ledger.total_duration_ms(), 0.0);
    }

    #[test]
    fn append_keeps_insertion_order() {
        let ledger = ledger_with(&[100.0, 200.0, 300.0]);
        let uris: Vec<&str> = ledger.iter().map(Segment::uri).collect();
        assert_eq!(uris, vec!["seg-0", "seg-1", "seg-2"]);
        assert_eq!(ledger.total_duration_ms(), 600.0);
    }

    #[test]
    fn remove_last_on_empty_is_noop() {
        let mut ledger = SegmentLedger::new();
        assert!(ledger.remove_last().is_none());
        assert!(ledger.remove_all().is_empty());
        assert_eq!(ledger.count(), 0);
    }

    #[test]
    fn remove_last_pops_newest() {
        let mut ledger = ledger_with(&[100.0, 200.0]);
        let removed = ledger.remove_last().unwrap();
        assert_eq!(removed.uri(), "seg-1");
        assert_eq!(ledger.count(), 1);
    }

    #[test]
    fn remove_at_middle_preserves_order() {
        let mut ledger = ledger_with(&[100.0, 200.0, 300.0]);
        let removed = ledger.remove_at(1).unwrap();
        assert_eq!(removed.uri(), "seg-1");
        let uris: Vec<&str> = ledger.iter().map(Segment::uri).collect();
        assert_eq!(uris, vec!["seg-0", "seg-2"]);
    }

    #[test]
    fn remove_at_out_of_range_leaves_ledger_unchanged() {
        let mut ledger = ledger_with(&[100.0, 200.0]);
        let before = ledger.clone();

        let err = ledger.remove_at(5).unwrap_err();
        assert_eq!(err, SegmentIndexOutOfRange { index: 5, count: 2 });
        assert_eq!(ledger, before);
    }

    #[test]
    fn remove_at_on_empty_fails() {
        let mut ledger = SegmentLedger::new();
        assert!(ledger.remove_at(0).is_err());
    }

    #[test]
    fn remove_all_returns_everything() {
        let mut ledger = ledger_with(&[100.0, 200.0]);
        let removed = ledger.remove_all();
        assert_eq!(removed.len(), 2);
        assert!(ledger.is_empty());
    }
}
