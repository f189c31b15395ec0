//! Chart series of the current batch: the target curve (clickable) and overlay curves.
//!
//! Every plotted point keeps the dense row index it came from, so a click can be
//! mapped back to a row even when rows without a timestamp or value were skipped.

use crate::data::columns::ColumnRoles;
use crate::data::table::Table;
use crate::data::time_axis::{looks_like_epoch, parse_column, DateOrder};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct CurveSeries {
    pub name: String,
    pub points: Vec<[f64; 2]>,
    /// Row index of each entry of `points`.
    pub rows: Vec<usize>,
    /// `(min, max)` of the original values, before any rescaling.
    pub value_range: Option<(f64, f64)>,
}

impl CurveSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point of the series that comes from row `row`.
    pub fn point_for_row(&self, row: usize) -> Option<[f64; 2]> {
        self.rows
            .iter()
            .position(|&r| r == row)
            .map(|i| self.points[i])
    }

    /// Linearly map the values into `target` so the curve shares the main Y axis.
    pub fn rescaled_into(&self, target: (f64, f64)) -> CurveSeries {
        let mut out = self.clone();
        if let Some((lo, hi)) = self.value_range {
            let span = hi - lo;
            for p in &mut out.points {
                p[1] = if span > 0.0 {
                    target.0 + (p[1] - lo) / span * (target.1 - target.0)
                } else {
                    (target.0 + target.1) * 0.5
                };
            }
        }
        out
    }
}

/// X axis of a batch chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XAxisKind {
    /// Epoch seconds parsed from the date column.
    Time,
    /// Plain numbers read from the date column.
    Numeric,
    /// Nothing in the date column was readable; the row index is used instead.
    RowIndex,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchChart {
    pub x_kind: XAxisKind,
    pub target: CurveSeries,
    pub overlays: Vec<CurveSeries>,
}

fn series(name: &str, xs: &[Option<f64>], ys: &[Option<f64>]) -> CurveSeries {
    let mut points = Vec::new();
    let mut rows = Vec::new();
    for (i, (x, y)) in xs.iter().zip(ys).enumerate() {
        if let (Some(x), Some(y)) = (x, y) {
            points.push([*x, *y]);
            rows.push(i);
        }
    }
    let value_range = points.iter().fold(None, |acc: Option<(f64, f64)>, p| {
        Some(match acc {
            None => (p[1], p[1]),
            Some((lo, hi)) => (lo.min(p[1]), hi.max(p[1])),
        })
    });
    CurveSeries {
        name: name.to_string(),
        points,
        rows,
        value_range,
    }
}

/// Build the chart series of one batch's rows.
pub fn build_batch_chart(
    batch_rows: &Table,
    roles: &ColumnRoles,
    batch: &str,
    order: DateOrder,
) -> Result<BatchChart> {
    let mut xs = parse_column(batch_rows.column(&roles.date)?, order);
    let x_kind = if xs.iter().all(Option::is_none) {
        xs = (0..batch_rows.n_rows()).map(|i| Some(i as f64)).collect();
        XAxisKind::RowIndex
    } else if looks_like_epoch(&xs) {
        XAxisKind::Time
    } else {
        XAxisKind::Numeric
    };

    let target = series(
        &format!("{} - Lot {}", roles.target, batch),
        &xs,
        &batch_rows.numeric_column(&roles.target)?,
    );
    let mut overlays = Vec::with_capacity(roles.overlay.len());
    for col in &roles.overlay {
        overlays.push(series(
            &format!("{} - Lot {}", col, batch),
            &xs,
            &batch_rows.numeric_column(col)?,
        ));
    }
    Ok(BatchChart {
        x_kind,
        target,
        overlays,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Table {
        let csv = "lot,date,t,p\nA,01/01/2024 10:00:00,1,10\nA,,2,20\nA,01/01/2024 10:00:02,x,30\nA,01/01/2024 10:00:03,4,40\n";
        Table::from_bytes(csv.as_bytes(), crate::data::table::Delimiter::Comma).unwrap()
    }

    #[test]
    fn skipped_rows_keep_their_index() {
        let roles = ColumnRoles::new("lot", "date", "t");
        let chart = build_batch_chart(&rows(), &roles, "A", DateOrder::DayFirst).unwrap();
        assert_eq!(chart.x_kind, XAxisKind::Time);
        assert_eq!(chart.target.rows, vec![0, 3]);
        assert_eq!(chart.target.value_range, Some((1.0, 4.0)));
    }

    #[test]
    fn overlay_rescales_into_target_range() {
        let mut roles = ColumnRoles::new("lot", "date", "t");
        roles.overlay.push("p".into());
        let chart = build_batch_chart(&rows(), &roles, "A", DateOrder::DayFirst).unwrap();
        let scaled = chart.overlays[0].rescaled_into((0.0, 1.0));
        let ys: Vec<f64> = scaled.points.iter().map(|p| p[1]).collect();
        assert_eq!(ys.first(), Some(&0.0));
        assert_eq!(ys.last(), Some(&1.0));
    }

    #[test]
    fn unreadable_dates_fall_back_to_row_index() {
        let csv = "lot,date,t\nA,foo,1\nA,bar,2\n";
        let t = Table::from_bytes(csv.as_bytes(), crate::data::table::Delimiter::Comma).unwrap();
        let chart =
            build_batch_chart(&t, &ColumnRoles::new("lot", "date", "t"), "A", DateOrder::DayFirst)
                .unwrap();
        assert_eq!(chart.x_kind, XAxisKind::RowIndex);
        assert_eq!(chart.target.points, vec![[0.0, 1.0], [1.0, 2.0]]);
    }
}
