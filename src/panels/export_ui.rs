use egui::Ui;
use egui_phosphor::regular as icons;
use tracing::{info, warn};

use super::panel_trait::{Panel, PanelResponse, PanelState};
use crate::config::CurveCutConfig;
use crate::session::{Notice, SessionEvent, SessionState};

const PREVIEW_ROWS: usize = 20;

/// File name, export button and a preview of the validated rows.
pub struct ExportPanel {
    state: PanelState,
    filename: String,
}

impl Default for ExportPanel {
    fn default() -> Self {
        Self {
            state: PanelState::new("Export", icons::DOWNLOAD_SIMPLE),
            filename: String::new(),
        }
    }
}

impl ExportPanel {
    fn save(&self, session: &SessionState, out: &mut PanelResponse) {
        let payload = match session.export_payload() {
            Ok(p) => p,
            Err(e) => {
                out.notify(Notice::from(e));
                return;
            }
        };
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(payload.filename.as_str())
            .add_filter("CSV", &["csv"])
            .save_file()
        else {
            return;
        };
        match std::fs::write(&path, &payload.bytes) {
            Ok(()) => {
                info!(path = %path.display(), bytes = payload.bytes.len(), "export saved");
                out.notify(Notice::success(format!(
                    "{} rows written to {}.",
                    session.export_table().n_rows(),
                    path.display()
                )));
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to save export");
                out.notify(Notice::error(format!("Failed to save {}: {e}", path.display())));
            }
        }
    }

    fn render_preview(&self, ui: &mut Ui, session: &SessionState) {
        let Some(table) = session.export_table().table() else {
            return;
        };
        let skip = table.n_rows().saturating_sub(PREVIEW_ROWS);
        egui::ScrollArea::both()
            .id_salt("export_preview")
            .max_height(240.0)
            .show(ui, |ui| {
                egui::Grid::new("export_preview_grid")
                    .striped(true)
                    .show(ui, |ui| {
                        for col in table.columns() {
                            ui.strong(col.as_str());
                        }
                        ui.end_row();
                        for row in &table.rows()[skip..] {
                            for cell in row {
                                ui.label(cell.as_str());
                            }
                            ui.end_row();
                        }
                    });
            });
        if skip > 0 {
            ui.weak(format!("Showing the last {PREVIEW_ROWS} of {} rows.", table.n_rows()));
        }
    }
}

impl Panel for ExportPanel {
    fn state(&self) -> &PanelState {
        &self.state
    }

    fn render(&mut self, ui: &mut Ui, session: &SessionState, cfg: &CurveCutConfig) -> PanelResponse {
        let mut out = PanelResponse::default();
        ui.heading(self.heading());
        self.filename = session.export_filename();

        ui.horizontal(|ui| {
            ui.label("Name of the CSV file to export:");
            let resp = ui.add(egui::TextEdit::singleline(&mut self.filename).desired_width(280.0));
            if resp.changed() {
                out.push(SessionEvent::SetExportFilename(self.filename.clone()));
            }
        });

        let rows = session.export_table().n_rows();
        ui.label(format!("{rows} validated rows."));
        ui.horizontal(|ui| {
            if ui
                .button(format!("{} Export all validated selections", icons::DOWNLOAD_SIMPLE))
                .clicked()
            {
                self.save(session, &mut out);
            }
            if ui
                .add_enabled(rows > 0, egui::Button::new(format!("{} Clear", icons::TRASH)))
                .clicked()
            {
                out.push(SessionEvent::ClearExport);
            }
        });
        if let Some(last) = session.last_commit() {
            ui.weak(format!(
                "Last added: lot {}, rows {}..={} ({} rows).",
                last.batch, last.start, last.end, last.rows
            ));
        }

        if cfg.features.export_preview {
            self.render_preview(ui, session);
        }
        out
    }
}
