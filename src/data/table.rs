//! In-memory rectangular table loaded from delimited text.
//!
//! Cells are kept as text exactly as read; numeric and time interpretations
//! happen on demand. Row order is significant: selections index into it.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::{CurveCutError, Result};

/// Field separator accepted by the loader and the exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Delimiter {
    #[default]
    Comma,
    Semicolon,
}

impl Delimiter {
    pub const ALL: [Delimiter; 2] = [Delimiter::Comma, Delimiter::Semicolon];

    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Semicolon => b';',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Delimiter::Comma => ",",
            Delimiter::Semicolon => ";",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// A cell holding only whitespace is a missing value.
pub fn is_missing(cell: &str) -> bool {
    cell.trim().is_empty()
}

/// Rename repeated header names to `name.1`, `name.2`, ... so every column is
/// addressable by name. Generated names never clash with another header.
fn unique_headers(columns: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(columns.len());
    for (i, name) in columns.iter().enumerate() {
        if !out.contains(name) {
            out.push(name.clone());
            continue;
        }
        let mut n = 1;
        let mut candidate = format!("{name}.{n}");
        while out.contains(&candidate) || columns[i + 1..].contains(&candidate) {
            n += 1;
            candidate = format!("{name}.{n}");
        }
        out.push(candidate);
    }
    out
}

impl Table {
    /// Build a table from column names and rows. Every row must have one cell per column;
    /// repeated column names are made unique.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let columns = unique_headers(columns);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(CurveCutError::RaggedRow {
                    row: i,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    /// Parse delimited text with a header row.
    ///
    /// Short rows are padded with missing cells; rows with more fields than the
    /// header are rejected so that no partial table is ever accepted. Repeated
    /// header names get a `.1`, `.2`, ... suffix.
    pub fn load<R: Read>(reader: R, delimiter: Delimiter) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter.as_byte())
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let columns: Vec<String> = rdr
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if columns.is_empty() || columns.iter().all(|c| c.is_empty()) {
            return Err(CurveCutError::EmptyInput);
        }
        let columns = unique_headers(columns);

        let mut rows = Vec::new();
        for (i, record) in rdr.records().enumerate() {
            let record = record?;
            if record.len() > columns.len() {
                return Err(CurveCutError::RaggedRow {
                    row: i,
                    expected: columns.len(),
                    found: record.len(),
                });
            }
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(columns.len(), String::new());
            rows.push(row);
        }
        Ok(Self { columns, rows })
    }

    pub fn from_bytes(bytes: &[u8], delimiter: Delimiter) -> Result<Self> {
        Self::load(bytes, delimiter)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| CurveCutError::UnknownColumn(name.to_string()))
    }

    /// Text cells of one column, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|r| r[idx].as_str()).collect())
    }

    /// Cells of one column parsed as `f64`; missing or non-numeric cells become `None`.
    ///
    /// A comma decimal separator is accepted when the cell contains no dot.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        Ok(self.column(name)?.into_iter().map(parse_number).collect())
    }

    pub fn cell(&self, row: usize, column: &str) -> Result<&str> {
        let idx = self.column_index(column)?;
        self.rows
            .get(row)
            .map(|r| r[idx].as_str())
            .ok_or(CurveCutError::IndexOutOfRange {
                index: row,
                len: self.rows.len(),
            })
    }

    /// Rows whose `column` equals `value`, re-indexed densely from zero.
    pub fn rows_where(&self, column: &str, value: &str) -> Result<Table> {
        let idx = self.column_index(column)?;
        let rows = self
            .rows
            .iter()
            .filter(|r| r[idx] == value)
            .cloned()
            .collect();
        Ok(Table {
            columns: self.columns.clone(),
            rows,
        })
    }

    /// Contiguous rows `start..=end`.
    pub fn slice(&self, start: usize, end: usize) -> Result<Table> {
        if start > end {
            return Err(CurveCutError::SelectionOrder { start, end });
        }
        if end >= self.rows.len() {
            return Err(CurveCutError::IndexOutOfRange {
                index: end,
                len: self.rows.len(),
            });
        }
        Ok(Table {
            columns: self.columns.clone(),
            rows: self.rows[start..=end].to_vec(),
        })
    }

    /// Set every cell of `column` to `value`, appending the column if absent.
    pub fn set_column(&mut self, column: &str, value: &str) {
        match self.columns.iter().position(|c| c == column) {
            Some(idx) => {
                for row in &mut self.rows {
                    row[idx] = value.to_string();
                }
            }
            None => {
                self.columns.push(column.to_string());
                for row in &mut self.rows {
                    row.push(value.to_string());
                }
            }
        }
    }

    /// Copy of this table with its columns rearranged to `order`.
    ///
    /// `order` must be a permutation of the current column names.
    pub fn reordered(&self, order: &[String]) -> Result<Table> {
        let mut same_set = order.len() == self.columns.len();
        let mut positions = Vec::with_capacity(order.len());
        for name in order {
            match self.columns.iter().position(|c| c == name) {
                Some(p) => positions.push(p),
                None => same_set = false,
            }
        }
        if !same_set {
            return Err(CurveCutError::SchemaMismatch {
                expected: order.to_vec(),
                found: self.columns.clone(),
            });
        }
        let rows = self
            .rows
            .iter()
            .map(|r| positions.iter().map(|&p| r[p].clone()).collect())
            .collect();
        Ok(Table {
            columns: order.to_vec(),
            rows,
        })
    }

    /// Append the rows of `other`, which must have exactly this table's columns in order.
    pub fn extend(&mut self, other: Table) -> Result<()> {
        if other.columns != self.columns {
            return Err(CurveCutError::SchemaMismatch {
                expected: self.columns.clone(),
                found: other.columns,
            });
        }
        self.rows.extend(other.rows);
        Ok(())
    }

    /// Serialize as delimited text with a header row and no index column.
    pub fn to_delimited(&self, delimiter: Delimiter) -> Result<Vec<u8>> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(delimiter.as_byte())
            .from_writer(Vec::new());
        wtr.write_record(&self.columns)?;
        for row in &self.rows {
            wtr.write_record(row)?;
        }
        wtr.into_inner()
            .map_err(|e| CurveCutError::Io(e.into_error()))
    }
}

pub(crate) fn parse_number(cell: &str) -> Option<f64> {
    let s = cell.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<f64>() {
        return v.is_finite().then_some(v);
    }
    if !s.contains('.') && s.matches(',').count() == 1 {
        return s.replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_number_accepts_decimal_comma() {
        assert_eq!(parse_number("3,5"), Some(3.5));
        assert_eq!(parse_number(" 2.25 "), Some(2.25));
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("1,000,5"), None);
    }

    #[test]
    fn short_rows_are_padded() {
        let t = Table::load("a,b,c\n1,2\n".as_bytes(), Delimiter::Comma).unwrap();
        assert_eq!(t.rows()[0], vec!["1", "2", ""]);
    }

    #[test]
    fn long_rows_are_rejected() {
        let err = Table::load("a,b\n1,2,3\n".as_bytes(), Delimiter::Comma).unwrap_err();
        assert!(matches!(err, CurveCutError::RaggedRow { row: 0, expected: 2, found: 3 }));
    }

    #[test]
    fn repeated_headers_get_a_suffix() {
        let t = Table::load("v,v,v.1,v\n1,2,3,4\n".as_bytes(), Delimiter::Comma).unwrap();
        assert_eq!(t.columns(), &["v", "v.2", "v.1", "v.3"]);
        assert_eq!(t.cell(0, "v.2").unwrap(), "2");
    }
}
