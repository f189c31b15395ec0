//! Chart rendering for the curve and overlay pages.
//!
//! This module draws series with `egui_plot` and turns a click on the plot area into a
//! [`ClickEvent`] by snapping to the nearest point of the target curve.

use egui::Color32;
use egui_plot::{Legend, Line, Plot, Points, VLine};

use crate::config::CurveCutConfig;
use crate::data::curve::{BatchChart, CurveSeries, XAxisKind};
use crate::data::overlay::OverlaySeries;
use crate::data::selection::ClickEvent;
use crate::data::time_axis::format_epoch;

const P1_COLOR: Color32 = Color32::YELLOW;
const P2_COLOR: Color32 = Color32::LIGHT_BLUE;
const RANGE_COLOR: Color32 = Color32::LIGHT_GREEN;

/// Nearest point of `series` to `pos`, measured with each axis scaled by the visible
/// `span` so that both directions weigh the same on screen.
pub fn nearest_point(series: &CurveSeries, pos: [f64; 2], span: [f64; 2]) -> Option<ClickEvent> {
    let sx = if span[0] > 0.0 { span[0] } else { 1.0 };
    let sy = if span[1] > 0.0 { span[1] } else { 1.0 };
    let mut best: Option<(usize, f64)> = None;
    for (i, p) in series.points.iter().enumerate() {
        let dx = (p[0] - pos[0]) / sx;
        let dy = (p[1] - pos[1]) / sy;
        let d2 = dx * dx + dy * dy;
        if best.map_or(true, |(_, b)| d2 < b) {
            best = Some((i, d2));
        }
    }
    best.map(|(i, _)| ClickEvent {
        row_index: series.rows.get(i).copied(),
        point_ordinal: i,
        x: series.points[i][0],
        y: series.points[i][1],
    })
}

fn format_x(kind: XAxisKind, value: f64, span: f64) -> String {
    match kind {
        XAxisKind::Time => format_epoch(value, span),
        XAxisKind::Numeric => format!("{value:.3}"),
        XAxisKind::RowIndex => format!("{value:.0}"),
    }
}

/// Draw the current batch and report a click on it, if any.
pub fn show_batch_chart(
    ui: &mut egui::Ui,
    chart: &BatchChart,
    selection: &[usize],
    x_label: &str,
    cfg: &CurveCutConfig,
) -> Option<ClickEvent> {
    let kind = chart.x_kind;
    let mut plot = Plot::new("batch_chart")
        .height(600.0)
        .allow_double_click_reset(true)
        .show_grid(cfg.features.grid)
        .x_axis_label(x_label.to_string())
        .x_axis_formatter(move |mark, range| {
            format_x(kind, mark.value, range.end() - range.start())
        });
    if cfg.features.legend {
        plot = plot.legend(Legend::default());
    }

    let target = &chart.target;
    let target_range = target.value_range.unwrap_or((0.0, 1.0));
    let resp = plot.show(ui, |plot_ui| {
        plot_ui.line(Line::new(target.name.clone(), target.points.clone()).width(1.5));
        plot_ui.points(
            Points::new(target.name.clone(), target.points.clone()).radius(cfg.marker_radius),
        );

        if cfg.features.overlay_columns {
            for overlay in &chart.overlays {
                let scaled = overlay.rescaled_into(target_range);
                let name = match overlay.value_range {
                    Some((lo, hi)) => format!("{} [{lo:.3} .. {hi:.3}]", overlay.name),
                    None => overlay.name.clone(),
                };
                plot_ui.line(Line::new(name, scaled.points));
            }
        }

        if let [a, b] = selection {
            let (lo, hi) = ((*a).min(*b), (*a).max(*b));
            let segment: Vec<[f64; 2]> = target
                .rows
                .iter()
                .zip(&target.points)
                .filter(|(r, _)| (lo..=hi).contains(*r))
                .map(|(_, p)| *p)
                .collect();
            plot_ui.line(Line::new("Selection", segment).width(3.0).color(RANGE_COLOR));
        }
        for (k, &row) in selection.iter().enumerate() {
            let color = if k == 0 { P1_COLOR } else { P2_COLOR };
            let label = format!("P{}", k + 1);
            if let Some(p) = target.point_for_row(row) {
                plot_ui.vline(VLine::new(label.clone(), p[0]).color(color));
                plot_ui.points(Points::new(label, vec![p]).radius(5.0).color(color));
            }
        }
    });

    if !resp.response.clicked() {
        return None;
    }
    let screen = resp.response.interact_pointer_pos()?;
    let pos = resp.transform.value_from_position(screen);
    let bounds = resp.transform.bounds();
    nearest_point(target, [pos.x, pos.y], [bounds.width(), bounds.height()])
}

/// Draw the multi-lot overlay chart (X = seconds since each lot's start).
pub fn show_overlay_chart(ui: &mut egui::Ui, series: &[OverlaySeries], y_label: &str, cfg: &CurveCutConfig) {
    let mut plot = Plot::new("overlay_chart")
        .height(600.0)
        .show_grid(cfg.features.grid)
        .x_axis_label("Relative time (s)")
        .y_axis_label(y_label.to_string());
    if cfg.features.legend {
        plot = plot.legend(Legend::default());
    }
    plot.show(ui, |plot_ui| {
        for s in series {
            plot_ui.line(Line::new(s.label(), s.points.clone()).width(2.0));
            plot_ui.points(Points::new(s.label(), s.points.clone()).radius(1.5));
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series() -> CurveSeries {
        CurveSeries {
            name: "t".into(),
            points: vec![[0.0, 0.0], [10.0, 100.0], [20.0, 0.0]],
            rows: vec![0, 2, 5],
            value_range: Some((0.0, 100.0)),
        }
    }

    #[test]
    fn snaps_to_nearest_and_carries_row_index() {
        let click = nearest_point(&series(), [11.0, 90.0], [20.0, 100.0]).unwrap();
        assert_eq!(click.point_ordinal, 1);
        assert_eq!(click.row_index, Some(2));
        assert_eq!(click.resolve_index(), 2);
    }

    #[test]
    fn axes_are_weighted_by_span() {
        // Raw distance would favour ordinal 1; relative to the spans, ordinal 2 is closer.
        let click = nearest_point(&series(), [17.0, 60.0], [20.0, 1000.0]).unwrap();
        assert_eq!(click.point_ordinal, 2);
    }

    #[test]
    fn empty_series_yields_nothing() {
        let empty = CurveSeries {
            name: "e".into(),
            points: vec![],
            rows: vec![],
            value_range: None,
        };
        assert!(nearest_point(&empty, [0.0, 0.0], [1.0, 1.0]).is_none());
    }
}
