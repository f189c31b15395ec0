//! Configuration for the curve cutting UI.

use std::path::Path;

use serde::Deserialize;

use crate::data::export::DEFAULT_FILENAME_PREFIX;
use crate::data::table::Delimiter;
use crate::data::time_axis::DateOrder;
use crate::error::Result;

// ─────────────────────────────────────────────────────────────────────────────
// Feature flags
// ─────────────────────────────────────────────────────────────────────────────

/// Toggle individual pages and chart features on or off.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// Show the multi-lot overlay page.
    pub overlay_page: bool,
    /// Draw the extra overlay columns on the curve page.
    pub overlay_columns: bool,
    /// Show the plot legend.
    pub legend: bool,
    /// Show the plot grid.
    pub grid: bool,
    /// Show a preview grid of the committed rows in the export panel.
    pub export_preview: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            overlay_page: true,
            overlay_columns: true,
            legend: true,
            grid: true,
            export_preview: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CurveCutConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level configuration.
///
/// Every field has a default, so a JSON file only needs to name what it changes:
///
/// ```json
/// { "title": "Batch review", "default_delimiter": "Semicolon" }
/// ```
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct CurveCutConfig {
    /// Native window title.
    pub title: String,
    /// Delimiter preselected for uploads and used for exports.
    pub default_delimiter: Delimiter,
    /// How ambiguous dates are read on the curve page.
    pub curve_date_order: DateOrder,
    /// How ambiguous dates are read on the overlay page.
    pub overlay_date_order: DateOrder,
    /// Prefix of the suggested export file name (`<prefix>_<lot>.csv`).
    pub export_filename_prefix: String,
    /// Initial window size in points.
    pub window_size: [f32; 2],
    /// Marker radius of the clickable target curve.
    pub marker_radius: f32,
    pub features: FeatureFlags,
    /// Optional eframe native-window options.
    #[serde(skip)]
    pub native_options: Option<eframe::NativeOptions>,
}

impl Default for CurveCutConfig {
    fn default() -> Self {
        Self {
            title: "Curve extractor".to_string(),
            default_delimiter: Delimiter::Comma,
            curve_date_order: DateOrder::DayFirst,
            overlay_date_order: DateOrder::MonthFirst,
            export_filename_prefix: DEFAULT_FILENAME_PREFIX.to_string(),
            window_size: [1400.0, 900.0],
            marker_radius: 2.0,
            features: FeatureFlags::default(),
            native_options: None,
        }
    }
}

impl CurveCutConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
