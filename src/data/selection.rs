//! Per-batch click buffers.
//!
//! Each batch owns an ordered buffer of at most two row indices (dense, per-batch
//! indexing). Clicks beyond the second are ignored until the buffer is reset.

use std::collections::HashMap;

/// Maximum number of buffered clicks per batch.
pub const MAX_CLICKS: usize = 2;

/// A click reported by the chart renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickEvent {
    /// Row index attached to the clicked point, when the renderer carries it.
    pub row_index: Option<usize>,
    /// Position of the clicked point within its plotted series.
    pub point_ordinal: usize,
    pub x: f64,
    pub y: f64,
}

impl ClickEvent {
    /// Row index of the click: attached metadata first, point ordinal otherwise.
    pub fn resolve_index(&self) -> usize {
        self.row_index.unwrap_or(self.point_ordinal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Empty,
    OnePoint(usize),
    TwoPoints(usize, usize),
}

impl SelectionState {
    pub fn from_buffer(buffer: &[usize]) -> Self {
        match buffer {
            [] => SelectionState::Empty,
            [a] => SelectionState::OnePoint(*a),
            [a, b, ..] => SelectionState::TwoPoints(*a, *b),
        }
    }

    /// `(start, end)` with `start <= end`, only for a complete selection.
    pub fn ordered_range(&self) -> Option<(usize, usize)> {
        match *self {
            SelectionState::TwoPoints(a, b) => Some((a.min(b), a.max(b))),
            _ => None,
        }
    }

    pub fn can_commit(&self) -> bool {
        matches!(self, SelectionState::TwoPoints(..))
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionRecorder {
    buffers: HashMap<String, Vec<usize>>,
}

impl SelectionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer for `batch`, created empty on first access.
    pub fn ensure(&mut self, batch: &str) -> &mut Vec<usize> {
        self.buffers.entry(batch.to_string()).or_default()
    }

    pub fn current_selection(&self, batch: &str) -> &[usize] {
        self.buffers.get(batch).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn state(&self, batch: &str) -> SelectionState {
        SelectionState::from_buffer(self.current_selection(batch))
    }

    /// Append `index` to the batch's buffer. Returns `false` when the buffer was full.
    pub fn record_click(&mut self, batch: &str, index: usize) -> bool {
        let buffer = self.ensure(batch);
        if buffer.len() >= MAX_CLICKS {
            return false;
        }
        buffer.push(index);
        true
    }

    pub fn reset_selection(&mut self, batch: &str) {
        self.ensure(batch).clear();
    }

    /// Drop buffers of batches that are no longer present.
    pub fn retain_batches(&mut self, batches: &[String]) {
        self.buffers.retain(|k, _| batches.contains(k));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_wins_over_ordinal() {
        let with_meta = ClickEvent {
            row_index: Some(7),
            point_ordinal: 2,
            x: 0.0,
            y: 0.0,
        };
        assert_eq!(with_meta.resolve_index(), 7);
        let without = ClickEvent {
            row_index: None,
            ..with_meta
        };
        assert_eq!(without.resolve_index(), 2);
    }

    #[test]
    fn state_machine() {
        let mut rec = SelectionRecorder::new();
        assert_eq!(rec.state("A"), SelectionState::Empty);
        rec.record_click("A", 5);
        assert_eq!(rec.state("A"), SelectionState::OnePoint(5));
        rec.record_click("A", 1);
        assert_eq!(rec.state("A").ordered_range(), Some((1, 5)));
        assert!(!rec.record_click("A", 9));
        rec.reset_selection("A");
        assert_eq!(rec.state("A"), SelectionState::Empty);
    }
}
