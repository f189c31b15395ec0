pub mod data_ui;
pub mod export_ui;
pub mod overlay_ui;
pub mod panel_trait;
pub mod segment_ui;

pub use data_ui::DataPanel;
pub use export_ui::ExportPanel;
pub use overlay_ui::OverlayPanel;
pub use panel_trait::{Panel, PanelResponse, PanelState};
pub use segment_ui::SegmentPanel;
