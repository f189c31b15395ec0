use egui::Ui;
use egui_phosphor::regular as icons;
use tracing::warn;

use super::panel_trait::{Panel, PanelResponse, PanelState};
use crate::config::CurveCutConfig;
use crate::data::columns::ColumnRoles;
use crate::data::table::Delimiter;
use crate::session::{Notice, SessionEvent, SessionState};

/// File upload, delimiter and column role pickers.
pub struct DataPanel {
    state: PanelState,
    draft: ColumnRoles,
    synced: Option<ColumnRoles>,
}

impl Default for DataPanel {
    fn default() -> Self {
        Self {
            state: PanelState::new("Data", icons::TABLE),
            draft: ColumnRoles::default(),
            synced: None,
        }
    }
}

fn column_combo(ui: &mut Ui, id: &str, label: &str, value: &mut String, options: &[String]) {
    ui.label(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(value.as_str())
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            for opt in options {
                ui.selectable_value(value, opt.clone(), opt.as_str());
            }
        });
}

impl DataPanel {
    /// Copy the active roles into the pickers whenever the session changed them.
    fn sync_draft(&mut self, session: &SessionState) {
        let active = session.roles().cloned();
        if active.is_some() && active != self.synced {
            self.draft = active.clone().unwrap_or_default();
            self.synced = active;
        } else if active.is_none() {
            self.synced = None;
            if let Some(table) = session.table() {
                if !self.draft.lot.is_empty() && table.has_column(&self.draft.lot) {
                    return;
                }
                if let Some(guess) = ColumnRoles::guess(table) {
                    self.draft = guess;
                }
            }
        }
    }

    fn render_upload(&mut self, ui: &mut Ui, session: &SessionState, out: &mut PanelResponse) {
        if ui
            .button(format!("{} Import a CSV file", icons::FOLDER_OPEN))
            .clicked()
        {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("CSV", &["csv", "txt"])
                .pick_file()
            {
                match std::fs::read(&path) {
                    Ok(bytes) => {
                        let name = path
                            .file_name()
                            .map(|n| n.to_string_lossy().to_string())
                            .unwrap_or_else(|| path.display().to_string());
                        out.push(SessionEvent::Upload { name, bytes });
                    }
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "failed to read upload");
                        out.notify(Notice::error(format!("Failed to read {}: {e}", path.display())));
                    }
                }
            }
        }
        match session.upload_name() {
            Some(name) => ui.label(format!("Loaded: {name}")),
            None => ui.weak("No file loaded."),
        };

        let mut delimiter = session.delimiter();
        ui.horizontal(|ui| {
            ui.label("Delimiter");
            for d in Delimiter::ALL {
                ui.selectable_value(&mut delimiter, d, format!("'{}'", d.label()));
            }
        });
        if delimiter != session.delimiter() {
            out.push(SessionEvent::SetDelimiter(delimiter));
        }
    }

    fn render_roles(&mut self, ui: &mut Ui, session: &SessionState, out: &mut PanelResponse) {
        let Some(table) = session.table() else {
            return;
        };
        let columns = table.columns();
        ui.label(format!("{} rows, {} columns", table.n_rows(), columns.len()));
        ui.add_space(4.0);
        column_combo(ui, "role_lot", "Lot column", &mut self.draft.lot, columns);
        column_combo(ui, "role_date", "Date column", &mut self.draft.date, columns);
        column_combo(ui, "role_target", "Column to cut (target)", &mut self.draft.target, columns);

        ui.add_space(4.0);
        ui.label("Extra columns to overlay");
        let candidates: Vec<String> = self
            .draft
            .overlay_candidates(table)
            .into_iter()
            .map(str::to_string)
            .collect();
        self.draft.overlay.retain(|c| candidates.contains(c));
        egui::ScrollArea::vertical()
            .id_salt("overlay_columns")
            .max_height(160.0)
            .show(ui, |ui| {
                for col in &candidates {
                    let mut on = self.draft.overlay.contains(col);
                    if ui.checkbox(&mut on, col.as_str()).changed() {
                        if on {
                            self.draft.overlay.push(col.clone());
                        } else {
                            self.draft.overlay.retain(|c| c != col);
                        }
                    }
                }
            });

        let mut preview = self.draft.clone();
        let check = preview.validate(table);
        if let Err(e) = &check {
            ui.colored_label(ui.visuals().warn_fg_color, e.to_string());
        }
        let dirty = session.roles() != Some(&self.draft);
        let button = egui::Button::new(format!("{} Apply columns", icons::CHECK));
        if ui.add_enabled(check.is_ok() && dirty, button).clicked() {
            out.push(SessionEvent::ApplyRoles(self.draft.clone()));
        }
    }
}

impl Panel for DataPanel {
    fn state(&self) -> &PanelState {
        &self.state
    }

    fn render(&mut self, ui: &mut Ui, session: &SessionState, _cfg: &CurveCutConfig) -> PanelResponse {
        let mut out = PanelResponse::default();
        self.sync_draft(session);
        ui.heading(self.heading());
        self.render_upload(ui, session, &mut out);
        ui.separator();
        self.render_roles(ui, session, &mut out);
        out
    }
}
