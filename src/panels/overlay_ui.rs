use egui::Ui;
use egui_phosphor::regular as icons;

use super::panel_trait::{Panel, PanelResponse, PanelState};
use crate::config::CurveCutConfig;
use crate::plot::show_overlay_chart;
use crate::session::{Notice, SessionEvent, SessionState};

/// Several parameters of several lots on a shared relative time axis.
pub struct OverlayPanel {
    state: PanelState,
}

impl Default for OverlayPanel {
    fn default() -> Self {
        Self {
            state: PanelState::new("Lot overlay", icons::CHART_LINE),
        }
    }
}

impl Panel for OverlayPanel {
    fn state(&self) -> &PanelState {
        &self.state
    }

    fn render(&mut self, ui: &mut Ui, session: &SessionState, cfg: &CurveCutConfig) -> PanelResponse {
        let mut out = PanelResponse::default();
        ui.heading(self.heading());
        if session.table().is_none() || session.roles().is_none() {
            ui.label("Please import a CSV file and apply the lot and date columns to continue.");
            return out;
        }
        let selection = session.overlay_selection();

        ui.columns(2, |cols| {
            cols[0].horizontal(|ui| {
                if ui.button("Select all lots").clicked() {
                    out.push(SessionEvent::OverlaySelectAll);
                }
                if ui.button("Deselect all lots").clicked() {
                    out.push(SessionEvent::OverlayDeselectAll);
                }
            });
            egui::ScrollArea::vertical()
                .id_salt("overlay_lots")
                .max_height(180.0)
                .show(&mut cols[0], |ui| {
                    for batch in session.navigator().batches() {
                        let mut on = selection.batches.contains(batch);
                        if ui.checkbox(&mut on, batch.as_str()).changed() {
                            out.push(SessionEvent::OverlayToggleBatch(batch.clone()));
                        }
                    }
                });

            cols[1].label("Parameters to overlay");
            egui::ScrollArea::vertical()
                .id_salt("overlay_params")
                .max_height(180.0)
                .show(&mut cols[1], |ui| {
                    for param in session.overlay_parameters() {
                        let mut on = selection.parameters.iter().any(|p| p == param);
                        if ui.checkbox(&mut on, param).changed() {
                            out.push(SessionEvent::OverlayToggleParameter(param.to_string()));
                        }
                    }
                });
        });
        ui.separator();

        if !selection.is_drawable() {
            ui.label("Select at least one lot and one parameter to display the chart.");
            return out;
        }
        match session.overlay_series() {
            Ok(series) => {
                let y_label = selection.parameters.first().cloned().unwrap_or_default();
                show_overlay_chart(ui, &series, &y_label, cfg);
            }
            Err(e) => out.notify(Notice::from(e)),
        }
        out
    }
}
