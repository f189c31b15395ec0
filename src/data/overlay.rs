//! Multi-lot overlay: several parameters of several lots on a shared "seconds since
//! lot start" axis.

use crate::data::table::Table;
use crate::data::time_axis::{parse_column, relative_seconds, DateOrder};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySeries {
    pub batch: String,
    pub parameter: String,
    /// `[seconds since the batch's first timestamp, value]`, sorted by time.
    pub points: Vec<[f64; 2]>,
}

impl OverlaySeries {
    pub fn label(&self) -> String {
        format!("{} (Lot {})", self.parameter, self.batch)
    }
}

/// Which lots and parameters the overlay chart shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlaySelection {
    pub batches: Vec<String>,
    pub parameters: Vec<String>,
}

impl OverlaySelection {
    pub fn select_all(&mut self, batches: &[String]) {
        self.batches = batches.to_vec();
    }

    pub fn deselect_all(&mut self) {
        self.batches.clear();
    }

    pub fn toggle_batch(&mut self, batch: &str) {
        toggle(&mut self.batches, batch);
    }

    pub fn toggle_parameter(&mut self, parameter: &str) {
        toggle(&mut self.parameters, parameter);
    }

    /// Forget entries that no longer exist after a re-upload or a role change.
    pub fn retain_known(&mut self, batches: &[String], parameters: &[&str]) {
        self.batches.retain(|b| batches.contains(b));
        self.parameters.retain(|p| parameters.contains(&p.as_str()));
    }

    pub fn is_drawable(&self) -> bool {
        !self.batches.is_empty() && !self.parameters.is_empty()
    }
}

fn toggle(list: &mut Vec<String>, value: &str) {
    if let Some(pos) = list.iter().position(|v| v == value) {
        list.remove(pos);
    } else {
        list.push(value.to_string());
    }
}

/// Every column except the lot and date columns.
pub fn parameter_candidates<'a>(table: &'a Table, lot: &str, date: &str) -> Vec<&'a str> {
    table
        .columns()
        .iter()
        .map(String::as_str)
        .filter(|c| *c != lot && *c != date)
        .collect()
}

/// One series per (batch, parameter). Rows without a readable timestamp are dropped;
/// rows without a numeric value leave a gap.
pub fn build_overlay(
    table: &Table,
    lot_column: &str,
    date_column: &str,
    selection: &OverlaySelection,
    order: DateOrder,
) -> Result<Vec<OverlaySeries>> {
    let mut out = Vec::new();
    for batch in &selection.batches {
        let rows = table.rows_where(lot_column, batch)?;
        let times = relative_seconds(&parse_column(rows.column(date_column)?, order));
        let mut timed: Vec<(usize, f64)> = times
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.map(|t| (i, t)))
            .collect();
        if timed.is_empty() {
            continue;
        }
        timed.sort_by(|a, b| a.1.total_cmp(&b.1));
        for parameter in &selection.parameters {
            let values = rows.numeric_column(parameter)?;
            let points = timed
                .iter()
                .filter_map(|&(i, t)| values[i].map(|v| [t, v]))
                .collect();
            out.push(OverlaySeries {
                batch: batch.clone(),
                parameter: parameter.clone(),
                points,
            });
        }
    }
    Ok(out)
}
