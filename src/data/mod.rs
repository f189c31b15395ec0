//! Data layer: table loading, column roles, batch navigation, click buffers,
//! chart series and the export table. Nothing in here depends on egui.

pub mod columns;
pub mod curve;
pub mod export;
pub mod navigator;
pub mod overlay;
pub mod selection;
pub mod table;
pub mod time_axis;
