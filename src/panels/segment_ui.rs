use egui::Ui;
use egui_phosphor::regular as icons;

use super::panel_trait::{Panel, PanelResponse, PanelState};
use crate::config::CurveCutConfig;
use crate::data::selection::SelectionState;
use crate::plot::show_batch_chart;
use crate::session::{Notice, SessionEvent, SessionState};

/// Lot navigation, the clickable chart, and the reset / validate controls.
pub struct SegmentPanel {
    state: PanelState,
}

impl Default for SegmentPanel {
    fn default() -> Self {
        Self {
            state: PanelState::new("Curve cutting", icons::SCISSORS),
        }
    }
}

impl SegmentPanel {
    fn render_navigation(&self, ui: &mut Ui, session: &SessionState, out: &mut PanelResponse) {
        let nav = session.navigator();
        let current = nav.current().unwrap_or_default().to_string();
        ui.horizontal(|ui| {
            let at_start = nav.pointer() == 0;
            let at_end = nav.pointer() + 1 >= nav.len();
            if ui
                .add_enabled(!at_start, egui::Button::new(format!("{} Previous lot", icons::CARET_LEFT)))
                .clicked()
            {
                out.push(SessionEvent::Previous);
            }
            if ui
                .add_enabled(!at_end, egui::Button::new(format!("Next lot {}", icons::CARET_RIGHT)))
                .clicked()
            {
                out.push(SessionEvent::Next);
            }
            ui.separator();
            ui.label("Find a lot");
            let mut picked = current.clone();
            egui::ComboBox::from_id_salt("lot_picker")
                .selected_text(picked.as_str())
                .show_ui(ui, |ui| {
                    for batch in nav.batches() {
                        ui.selectable_value(&mut picked, batch.clone(), batch.as_str());
                    }
                });
            if picked != current {
                out.push(SessionEvent::PickBatch(picked));
            }
            ui.label(format!("({}/{})", nav.pointer() + 1, nav.len()));
        });
    }

    fn render_selection(&self, ui: &mut Ui, session: &SessionState, out: &mut PanelResponse) {
        match session.selection_state() {
            SelectionState::Empty => {
                ui.label("No point has been clicked for this lot.");
            }
            SelectionState::OnePoint(i) => {
                ui.label(format!(
                    "One point selected (index = {i}). Click another point to set the end."
                ));
            }
            SelectionState::TwoPoints(a, b) => {
                ui.colored_label(
                    egui::Color32::LIGHT_GREEN,
                    format!("Two points selected (index = [{a}, {b}])."),
                );
            }
        }
        ui.horizontal(|ui| {
            if ui
                .button(format!("{} Reset the selection for this lot", icons::ARROW_COUNTER_CLOCKWISE))
                .clicked()
            {
                out.push(SessionEvent::ResetSelection);
            }
            let validate = egui::Button::new(format!("{} Validate the selection", icons::CHECK));
            if ui.add_enabled(session.can_commit(), validate).clicked() {
                out.push(SessionEvent::Validate);
            }
        });
    }
}

impl Panel for SegmentPanel {
    fn state(&self) -> &PanelState {
        &self.state
    }

    fn render(&mut self, ui: &mut Ui, session: &SessionState, cfg: &CurveCutConfig) -> PanelResponse {
        let mut out = PanelResponse::default();
        ui.heading(self.heading());
        if session.table().is_none() {
            ui.label("Please select a CSV file.");
            return out;
        }
        let Some(roles) = session.roles() else {
            ui.label("Choose the lot, date and target columns, then apply them.");
            return out;
        };
        if session.navigator().is_empty() {
            ui.label(format!("No lot found in column '{}'.", roles.lot));
            return out;
        }

        self.render_navigation(ui, session, &mut out);
        ui.separator();

        match session.batch_chart() {
            Ok(Some(chart)) => {
                if chart.target.is_empty() {
                    ui.colored_label(
                        ui.visuals().warn_fg_color,
                        format!("Column '{}' has no numeric value for this lot.", roles.target),
                    );
                }
                if let Some(click) =
                    show_batch_chart(ui, &chart, session.current_selection(), &roles.date, cfg)
                {
                    out.push(SessionEvent::Click(click));
                }
            }
            Ok(None) => {}
            Err(e) => out.notify(Notice::from(e)),
        }

        self.render_selection(ui, session, &mut out);
        out
    }
}
