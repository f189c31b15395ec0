//! Standalone application wrapper.
//!
//! [`CurveCutApp`] owns the [`SessionState`] and the panels and implements
//! [`eframe::App`]. Every frame the panels render from the session and return the
//! events the user triggered; the app then applies them in order.

use std::path::Path;

use eframe::egui;
use egui_phosphor::regular as icons;
use tracing::info;

use crate::config::CurveCutConfig;
use crate::panels::{DataPanel, ExportPanel, OverlayPanel, Panel, PanelResponse, SegmentPanel};
use crate::session::{Notice, NoticeLevel, SessionEvent, SessionState};

/// Number of status messages kept for the bottom bar.
const NOTICE_HISTORY: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Cut one curve per lot.
    Segmentation,
    /// Overlay parameters of several lots.
    Overlay,
}

pub struct CurveCutApp {
    pub session: SessionState,
    pub config: CurveCutConfig,
    pub page: Page,
    data_panel: DataPanel,
    segment_panel: SegmentPanel,
    export_panel: ExportPanel,
    overlay_panel: OverlayPanel,
    notices: Vec<Notice>,
}

impl CurveCutApp {
    pub fn new(config: CurveCutConfig) -> Self {
        Self {
            session: SessionState::new(&config),
            config,
            page: Page::Segmentation,
            data_panel: DataPanel::default(),
            segment_panel: SegmentPanel::default(),
            export_panel: ExportPanel::default(),
            overlay_panel: OverlayPanel::default(),
            notices: Vec::new(),
        }
    }

    /// Load a CSV file before the window opens, as if it had been uploaded.
    pub fn preload<P: AsRef<Path>>(&mut self, path: P) -> std::io::Result<()> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        info!(path = %path.display(), "preloading table");
        self.apply(SessionEvent::Upload { name, bytes });
        Ok(())
    }

    pub fn apply(&mut self, event: SessionEvent) {
        let notice = self.session.handle(event);
        self.push_notice(notice);
    }

    fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
        if self.notices.len() > NOTICE_HISTORY {
            self.notices.remove(0);
        }
    }

    fn dispatch(&mut self, response: PanelResponse) {
        for notice in response.notices {
            self.push_notice(notice);
        }
        for event in response.events {
            self.apply(event);
        }
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    fn render_status(&self, ui: &mut egui::Ui) {
        let Some(last) = self.notices.last() else {
            ui.weak("Ready.");
            return;
        };
        let visuals = ui.visuals();
        let color = match last.level {
            NoticeLevel::Info => visuals.text_color(),
            NoticeLevel::Success => egui::Color32::LIGHT_GREEN,
            NoticeLevel::Warning => visuals.warn_fg_color,
            NoticeLevel::Error => visuals.error_fg_color,
        };
        ui.colored_label(color, last.message.as_str());
    }
}

impl eframe::App for CurveCutApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut response = PanelResponse::default();

        egui::TopBottomPanel::top("curvecut_menu").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong(self.config.title.as_str());
                ui.separator();
                ui.selectable_value(
                    &mut self.page,
                    Page::Segmentation,
                    format!("{} Curve cutting", icons::SCISSORS),
                );
                if self.config.features.overlay_page {
                    ui.selectable_value(
                        &mut self.page,
                        Page::Overlay,
                        format!("{} Lot overlay", icons::CHART_LINE),
                    );
                }
            });
        });

        egui::TopBottomPanel::bottom("curvecut_status").show(ctx, |ui| {
            self.render_status(ui);
        });

        egui::SidePanel::left("curvecut_data")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    response.merge(self.data_panel.render(ui, &self.session, &self.config));
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match self.page {
                Page::Segmentation => {
                    response.merge(self.segment_panel.render(ui, &self.session, &self.config));
                    ui.separator();
                    response.merge(self.export_panel.render(ui, &self.session, &self.config));
                }
                Page::Overlay => {
                    response.merge(self.overlay_panel.render(ui, &self.session, &self.config));
                }
            });
        });

        if !response.events.is_empty() || !response.notices.is_empty() {
            self.dispatch(response);
            ctx.request_repaint();
        }
    }
}
