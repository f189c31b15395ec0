//! Export table: committed ranges of every lot, serialized on demand as delimited text.

use std::path::Path;

use tracing::{debug, info};

use crate::data::table::{Delimiter, Table};
use crate::error::{CurveCutError, Result};

/// Default prefix of the suggested export file name.
pub const DEFAULT_FILENAME_PREFIX: &str = "extractions";

/// Accumulated committed ranges of every batch.
///
/// The column layout is fixed by the first committed range; later ranges are
/// rearranged to it and rejected when their column set differs.
#[derive(Debug, Clone, Default)]
pub struct ExportTable {
    table: Option<Table>,
}

/// What a successful commit appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    pub batch: String,
    pub start: usize,
    pub end: usize,
    pub rows: usize,
}

impl ExportTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn n_rows(&self) -> usize {
        self.table.as_ref().map_or(0, Table::n_rows)
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    pub fn columns(&self) -> &[String] {
        match &self.table {
            Some(t) => t.columns(),
            None => &[],
        }
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn clear(&mut self) {
        self.table = None;
    }

    fn append(&mut self, rows: Table) -> Result<()> {
        match &mut self.table {
            None => {
                self.table = Some(rows);
                Ok(())
            }
            Some(existing) => {
                let rows = rows.reordered(existing.columns())?;
                existing.extend(rows)
            }
        }
    }

    /// Delimited text of the current contents, header first, no index column.
    pub fn serialize(&self, delimiter: Delimiter) -> Result<Vec<u8>> {
        match &self.table {
            Some(t) if !t.is_empty() => t.to_delimited(delimiter),
            _ => Err(CurveCutError::EmptyExport),
        }
    }

    pub fn write_to_path<P: AsRef<Path>>(&self, path: P, delimiter: Delimiter) -> Result<()> {
        let bytes = self.serialize(delimiter)?;
        std::fs::write(path.as_ref(), bytes)?;
        info!(path = %path.as_ref().display(), rows = self.n_rows(), "export written");
        Ok(())
    }
}

/// Slice `start..=end` out of `batch_rows`, stamp `lot_column` with `batch` and append
/// the slice to `export`.
///
/// This is the only way rows enter the export table. On error the table is unchanged.
pub fn validate_and_commit(
    export: &mut ExportTable,
    batch_rows: &Table,
    start: usize,
    end: usize,
    batch: &str,
    lot_column: &str,
) -> Result<CommitSummary> {
    let mut range = batch_rows.slice(start, end)?;
    range.set_column(lot_column, batch);
    let rows = range.n_rows();
    export.append(range)?;
    debug!(batch, start, end, rows, total = export.n_rows(), "range committed");
    Ok(CommitSummary {
        batch: batch.to_string(),
        start,
        end,
        rows,
    })
}

/// Suggested file name for an export made while `batch` is current.
pub fn default_filename(prefix: &str, batch: &str) -> String {
    let safe: String = batch
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();
    format!("{prefix}_{safe}.csv")
}
