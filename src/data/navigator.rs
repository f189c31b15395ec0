//! Batch navigation: the sorted list of lot identities and a clamped pointer into it.
//!
//! The free functions are the pure transitions; [`BatchNavigator`] bundles them with
//! the batch list so the prev/next buttons and the direct picker share one pointer.

use std::collections::BTreeSet;

use crate::data::table::{is_missing, Table};
use crate::error::Result;

/// Distinct, non-missing values of `lot_column` as text, sorted ascending.
pub fn list_batches(table: &Table, lot_column: &str) -> Result<Vec<String>> {
    let set: BTreeSet<&str> = table
        .column(lot_column)?
        .into_iter()
        .filter(|v| !is_missing(v))
        .collect();
    Ok(set.into_iter().map(str::to_string).collect())
}

pub fn advance(pointer: usize, n_batches: usize) -> usize {
    if n_batches == 0 {
        return 0;
    }
    (pointer + 1).min(n_batches - 1)
}

pub fn retreat(pointer: usize, _n_batches: usize) -> usize {
    pointer.saturating_sub(1)
}

/// Pointer matching `chosen`; the pointer is kept when `chosen` is not in the list.
pub fn sync_from_direct_selection(pointer: usize, chosen: &str, batches: &[String]) -> usize {
    batches
        .iter()
        .position(|b| b == chosen)
        .unwrap_or(pointer)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchNavigator {
    batches: Vec<String>,
    pointer: usize,
}

impl BatchNavigator {
    pub fn new(batches: Vec<String>) -> Self {
        Self {
            batches,
            pointer: 0,
        }
    }

    /// Replace the batch list (e.g. after a re-upload), keeping the pointer in range.
    pub fn set_batches(&mut self, batches: Vec<String>) {
        self.batches = batches;
        self.pointer = self.pointer.min(self.batches.len().saturating_sub(1));
    }

    pub fn batches(&self) -> &[String] {
        &self.batches
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// The batch the pointer references, or `None` when there are no batches.
    pub fn current(&self) -> Option<&str> {
        self.batches.get(self.pointer).map(String::as_str)
    }

    pub fn advance(&mut self) -> Option<&str> {
        self.pointer = advance(self.pointer, self.batches.len());
        self.current()
    }

    pub fn retreat(&mut self) -> Option<&str> {
        self.pointer = retreat(self.pointer, self.batches.len());
        self.current()
    }

    /// Reconcile with the direct picker; returns `true` when the pointer moved.
    pub fn sync_from_direct_selection(&mut self, chosen: &str) -> bool {
        let next = sync_from_direct_selection(self.pointer, chosen, &self.batches);
        let moved = next != self.pointer;
        self.pointer = next;
        moved
    }
}
