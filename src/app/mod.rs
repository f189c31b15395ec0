//! Application shell: the eframe app and the entry point that opens the window.
//!
//! | Sub-module       | Responsibility |
//! | ---------------- | -------------- |
//! | [`curvecut_app`] | [`CurveCutApp`]: owns the session, renders the panels, applies their events |
//! | [`run`]          | [`run_curvecut()`] entry point and icon loading |

mod curvecut_app;
mod run;

pub use curvecut_app::{CurveCutApp, Page};
pub use run::run_curvecut;
