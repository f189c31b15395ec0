use egui::Ui;

use crate::config::CurveCutConfig;
use crate::session::{Notice, SessionEvent, SessionState};

#[derive(Debug, Clone, Copy)]
pub struct PanelState {
    pub title: &'static str,
    pub icon: &'static str,
}

impl PanelState {
    pub fn new(title: &'static str, icon: &'static str) -> Self {
        Self { title, icon }
    }
}

/// What a panel asks the app to do after a frame.
#[derive(Debug, Default)]
pub struct PanelResponse {
    pub events: Vec<SessionEvent>,
    pub notices: Vec<Notice>,
}

impl PanelResponse {
    pub fn push(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn merge(&mut self, other: PanelResponse) {
        self.events.extend(other.events);
        self.notices.extend(other.notices);
    }
}

/// A section of the UI. Panels only read the session; changes go out as events.
pub trait Panel {
    fn state(&self) -> &PanelState;

    fn heading(&self) -> String {
        format!("{} {}", self.state().icon, self.state().title)
    }

    fn render(&mut self, ui: &mut Ui, session: &SessionState, cfg: &CurveCutConfig) -> PanelResponse;
}
