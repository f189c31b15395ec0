//! Curvecut crate root: re-exports and module wiring.
//!
//! An egui/eframe tool to review lot-by-lot time series and cut out the relevant part
//! of each curve by clicking its first and last point:
//! - `data`: table loading, column roles, lot navigation, click buffers, export table
//! - `session`: typed session state and the event handlers that mutate it
//! - `plot`: chart drawing and click-to-row snapping
//! - `panels`: the UI sections (data, curve cutting, export, lot overlay)
//! - `app`: the eframe application and `run_curvecut`

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod panels;
pub mod plot;
pub mod session;

// Public re-exports for a compact external API
pub use app::{run_curvecut, CurveCutApp, Page};
pub use config::{CurveCutConfig, FeatureFlags};
pub use data::columns::ColumnRoles;
pub use data::selection::{ClickEvent, SelectionState};
pub use data::table::{Delimiter, Table};
pub use error::{CurveCutError, Result};
pub use session::{ExportPayload, Notice, NoticeLevel, SessionEvent, SessionState};
