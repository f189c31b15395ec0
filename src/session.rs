//! Session state and the event handlers that mutate it.
//!
//! The UI re-renders every frame from [`SessionState`] and reports what the user did as
//! [`SessionEvent`]s. Each handler applies one complete update and answers with a
//! [`Notice`] for the status line; no handler leaves the state half-updated.

use tracing::{debug, info, warn};

use crate::config::CurveCutConfig;
use crate::data::columns::ColumnRoles;
use crate::data::curve::{build_batch_chart, BatchChart};
use crate::data::export::{default_filename, validate_and_commit, CommitSummary, ExportTable};
use crate::data::navigator::{list_batches, BatchNavigator};
use crate::data::overlay::{build_overlay, parameter_candidates, OverlaySelection, OverlaySeries};
use crate::data::selection::{ClickEvent, SelectionRecorder, SelectionState};
use crate::data::table::{Delimiter, Table};
use crate::data::time_axis::DateOrder;
use crate::error::{CurveCutError, Result};

pub const CSV_MIME: &str = "text/csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// User-facing outcome of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl From<CurveCutError> for Notice {
    fn from(e: CurveCutError) -> Self {
        match e {
            CurveCutError::EmptyExport => Notice::warning("No validated selection to export yet."),
            CurveCutError::NoData => Notice::info("Load a CSV file to continue."),
            other => Notice::error(other.to_string()),
        }
    }
}

/// Everything the user can do.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A file was picked; it is parsed with the current delimiter.
    Upload { name: String, bytes: Vec<u8> },
    /// Change the delimiter; an already uploaded file is parsed again.
    SetDelimiter(Delimiter),
    ApplyRoles(ColumnRoles),
    Next,
    Previous,
    /// The direct batch picker changed.
    PickBatch(String),
    /// A click on the target curve of the current batch.
    Click(ClickEvent),
    ResetSelection,
    /// Commit the current two-point selection.
    Validate,
    SetExportFilename(String),
    ClearExport,
    OverlaySelectAll,
    OverlayDeselectAll,
    OverlayToggleBatch(String),
    OverlayToggleParameter(String),
}

/// Bytes ready to be offered as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub mime: &'static str,
}

#[derive(Debug, Clone)]
struct Upload {
    name: String,
    bytes: Vec<u8>,
}

pub struct SessionState {
    upload: Option<Upload>,
    delimiter: Delimiter,
    table: Option<Table>,
    roles: Option<ColumnRoles>,
    navigator: BatchNavigator,
    recorder: SelectionRecorder,
    export: ExportTable,
    export_filename: Option<String>,
    overlay: OverlaySelection,
    last_commit: Option<CommitSummary>,
    curve_date_order: DateOrder,
    overlay_date_order: DateOrder,
    filename_prefix: String,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(&CurveCutConfig::default())
    }
}

impl SessionState {
    pub fn new(cfg: &CurveCutConfig) -> Self {
        Self {
            upload: None,
            delimiter: cfg.default_delimiter,
            table: None,
            roles: None,
            navigator: BatchNavigator::default(),
            recorder: SelectionRecorder::new(),
            export: ExportTable::new(),
            export_filename: None,
            overlay: OverlaySelection::default(),
            last_commit: None,
            curve_date_order: cfg.curve_date_order,
            overlay_date_order: cfg.overlay_date_order,
            filename_prefix: cfg.export_filename_prefix.clone(),
        }
    }

    // ── Read access ─────────────────────────────────────────────────────────

    pub fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    pub fn upload_name(&self) -> Option<&str> {
        self.upload.as_ref().map(|u| u.name.as_str())
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    /// Active column roles; `None` until a valid mapping is applied.
    pub fn roles(&self) -> Option<&ColumnRoles> {
        self.roles.as_ref()
    }

    pub fn navigator(&self) -> &BatchNavigator {
        &self.navigator
    }

    pub fn current_batch(&self) -> Option<&str> {
        self.navigator.current()
    }

    pub fn current_selection(&self) -> &[usize] {
        match self.current_batch() {
            Some(b) => self.recorder.current_selection(b),
            None => &[],
        }
    }

    pub fn selection_state(&self) -> SelectionState {
        SelectionState::from_buffer(self.current_selection())
    }

    /// The validate control is enabled only with two buffered points.
    pub fn can_commit(&self) -> bool {
        self.selection_state().can_commit()
    }

    pub fn recorder(&self) -> &SelectionRecorder {
        &self.recorder
    }

    pub fn export_table(&self) -> &ExportTable {
        &self.export
    }

    pub fn last_commit(&self) -> Option<&CommitSummary> {
        self.last_commit.as_ref()
    }

    pub fn overlay_selection(&self) -> &OverlaySelection {
        &self.overlay
    }

    /// File name edited for the current batch, or the default pattern for it.
    pub fn export_filename(&self) -> String {
        match &self.export_filename {
            Some(name) => name.clone(),
            None => default_filename(&self.filename_prefix, self.current_batch().unwrap_or("all")),
        }
    }

    /// Rows of the current batch, densely re-indexed. `None` when there is no batch.
    pub fn batch_rows(&self) -> Result<Option<Table>> {
        let (Some(table), Some(roles), Some(batch)) =
            (&self.table, &self.roles, self.navigator.current())
        else {
            return Ok(None);
        };
        table.rows_where(&roles.lot, batch).map(Some)
    }

    pub fn batch_chart(&self) -> Result<Option<BatchChart>> {
        let (Some(rows), Some(roles), Some(batch)) =
            (self.batch_rows()?, &self.roles, self.navigator.current())
        else {
            return Ok(None);
        };
        build_batch_chart(&rows, roles, batch, self.curve_date_order).map(Some)
    }

    /// Columns the overlay page may plot.
    pub fn overlay_parameters(&self) -> Vec<&str> {
        match (&self.table, &self.roles) {
            (Some(t), Some(r)) => parameter_candidates(t, &r.lot, &r.date),
            _ => Vec::new(),
        }
    }

    pub fn overlay_series(&self) -> Result<Vec<OverlaySeries>> {
        match (&self.table, &self.roles) {
            (Some(t), Some(r)) if self.overlay.is_drawable() => {
                build_overlay(t, &r.lot, &r.date, &self.overlay, self.overlay_date_order)
            }
            _ => Ok(Vec::new()),
        }
    }

    /// Serialize the export table as it is right now.
    pub fn export_payload(&self) -> Result<ExportPayload> {
        let bytes = self.export.serialize(self.delimiter)?;
        Ok(ExportPayload {
            bytes,
            filename: self.export_filename(),
            mime: CSV_MIME,
        })
    }

    // ── Event handling ──────────────────────────────────────────────────────

    pub fn handle(&mut self, event: SessionEvent) -> Notice {
        let result = match event {
            SessionEvent::Upload { name, bytes } => self.on_upload(name, bytes),
            SessionEvent::SetDelimiter(d) => self.on_set_delimiter(d),
            SessionEvent::ApplyRoles(roles) => self.on_apply_roles(roles),
            SessionEvent::Next => self.on_navigate(|n| {
                n.advance();
            }),
            SessionEvent::Previous => self.on_navigate(|n| {
                n.retreat();
            }),
            SessionEvent::PickBatch(batch) => self.on_navigate(|n| {
                n.sync_from_direct_selection(&batch);
            }),
            SessionEvent::Click(click) => self.on_click(click),
            SessionEvent::ResetSelection => self.on_reset_selection(),
            SessionEvent::Validate => self.on_validate(),
            SessionEvent::SetExportFilename(name) => {
                self.export_filename = Some(name);
                Ok(Notice::info("Export file name updated."))
            }
            SessionEvent::ClearExport => {
                self.export.clear();
                self.last_commit = None;
                info!("export table cleared");
                Ok(Notice::info("All validated selections were cleared."))
            }
            SessionEvent::OverlaySelectAll => {
                self.overlay.select_all(self.navigator.batches());
                Ok(Notice::info("All lots selected."))
            }
            SessionEvent::OverlayDeselectAll => {
                self.overlay.deselect_all();
                Ok(Notice::info("All lots deselected."))
            }
            SessionEvent::OverlayToggleBatch(b) => {
                self.overlay.toggle_batch(&b);
                Ok(self.overlay_notice())
            }
            SessionEvent::OverlayToggleParameter(p) => {
                self.overlay.toggle_parameter(&p);
                Ok(self.overlay_notice())
            }
        };
        result.unwrap_or_else(|e| {
            warn!(error = %e, "event rejected");
            Notice::from(e)
        })
    }

    /// Apply events in order, returning the last notice.
    pub fn handle_all<I: IntoIterator<Item = SessionEvent>>(&mut self, events: I) -> Option<Notice> {
        events.into_iter().map(|e| self.handle(e)).last()
    }

    fn on_upload(&mut self, name: String, bytes: Vec<u8>) -> Result<Notice> {
        let table = Table::from_bytes(&bytes, self.delimiter)?;
        info!(file = %name, rows = table.n_rows(), columns = table.columns().len(), "table loaded");
        self.upload = Some(Upload { name, bytes });
        self.install_table(table)
    }

    fn on_set_delimiter(&mut self, delimiter: Delimiter) -> Result<Notice> {
        if delimiter == self.delimiter {
            return Ok(Notice::info(format!("Delimiter is '{}'.", delimiter.label())));
        }
        let Some(upload) = &self.upload else {
            self.delimiter = delimiter;
            return Ok(Notice::info(format!("Delimiter set to '{}'.", delimiter.label())));
        };
        let table = Table::from_bytes(&upload.bytes, delimiter)?;
        self.delimiter = delimiter;
        self.install_table(table)
    }

    /// Replace the table, keeping roles when they still fit and the export table always.
    fn install_table(&mut self, table: Table) -> Result<Notice> {
        let kept = self.roles.take().and_then(|mut r| r.validate(&table).ok().map(|_| r));
        let roles = match kept {
            Some(r) => Some(r),
            None => ColumnRoles::guess(&table).and_then(|mut r| r.validate(&table).ok().map(|_| r)),
        };
        self.table = Some(table);
        self.roles = roles;
        self.refresh_batches()?;
        if self.roles.is_none() {
            return Ok(Notice::warning(
                "Data loaded. Choose distinct lot, date and target columns.",
            ));
        }
        Ok(Notice::success(format!(
            "Data loaded successfully ({} lots).",
            self.navigator.len()
        )))
    }

    fn on_apply_roles(&mut self, mut roles: ColumnRoles) -> Result<Notice> {
        let table = self.table.as_ref().ok_or(CurveCutError::NoData)?;
        roles.validate(table)?;
        let lot_changed = self.roles.as_ref().map(|r| r.lot != roles.lot).unwrap_or(true);
        info!(lot = %roles.lot, date = %roles.date, target = %roles.target, "column roles applied");
        self.roles = Some(roles);
        if lot_changed {
            self.recorder = SelectionRecorder::new();
        }
        self.refresh_batches()?;
        Ok(Notice::success("Columns validated."))
    }

    /// Re-derive the batch list from the table and roles and re-sync dependent state.
    fn refresh_batches(&mut self) -> Result<()> {
        let batches = match (&self.table, &self.roles) {
            (Some(t), Some(r)) => list_batches(t, &r.lot)?,
            _ => Vec::new(),
        };
        self.recorder.retain_batches(&batches);
        let params: Vec<String> = self.overlay_parameters().into_iter().map(str::to_string).collect();
        let params: Vec<&str> = params.iter().map(String::as_str).collect();
        self.overlay.retain_known(&batches, &params);
        self.navigator.set_batches(batches);
        self.touch_current();
        Ok(())
    }

    /// Lazily create the click buffer of the batch that just became current.
    fn touch_current(&mut self) {
        if let Some(batch) = self.navigator.current() {
            let batch = batch.to_string();
            self.recorder.ensure(&batch);
        }
    }

    fn on_navigate(&mut self, step: impl FnOnce(&mut BatchNavigator)) -> Result<Notice> {
        if self.navigator.is_empty() {
            return Err(CurveCutError::NoData);
        }
        let before = self.navigator.pointer();
        step(&mut self.navigator);
        if self.navigator.pointer() != before {
            // an edited name belongs to the lot it was typed for
            self.export_filename = None;
        }
        self.touch_current();
        let batch = self.navigator.current().unwrap_or_default();
        debug!(batch, pointer = self.navigator.pointer(), "current lot");
        Ok(Notice::info(format!(
            "Lot {} ({}/{}).",
            batch,
            self.navigator.pointer() + 1,
            self.navigator.len()
        )))
    }

    fn on_click(&mut self, click: ClickEvent) -> Result<Notice> {
        let rows = self.batch_rows()?.ok_or(CurveCutError::NoData)?;
        let index = click.resolve_index();
        if index >= rows.n_rows() {
            return Err(CurveCutError::IndexOutOfRange {
                index,
                len: rows.n_rows(),
            });
        }
        let batch = self.navigator.current().unwrap_or_default().to_string();
        if !self.recorder.record_click(&batch, index) {
            return Ok(Notice::info(
                "Two points are already selected for this lot. Reset the selection to pick again.",
            ));
        }
        debug!(batch = %batch, index, "click recorded");
        Ok(self.selection_notice())
    }

    fn on_reset_selection(&mut self) -> Result<Notice> {
        let batch = self.navigator.current().ok_or(CurveCutError::NoData)?.to_string();
        self.recorder.reset_selection(&batch);
        debug!(batch = %batch, "selection reset");
        Ok(Notice::info(format!("Selection reset for lot {batch}.")))
    }

    fn on_validate(&mut self) -> Result<Notice> {
        let rows = self.batch_rows()?.ok_or(CurveCutError::NoData)?;
        let Some((start, end)) = self.selection_state().ordered_range() else {
            return Ok(Notice::warning("Select two points before validating."));
        };
        self.commit(&rows, start, end)
    }

    /// Commit `start..=end` of the current batch. `start` must not exceed `end`.
    pub fn commit_range(&mut self, start: usize, end: usize) -> Notice {
        let result = self
            .batch_rows()
            .and_then(|rows| rows.ok_or(CurveCutError::NoData))
            .and_then(|rows| self.commit(&rows, start, end));
        result.unwrap_or_else(Notice::from)
    }

    fn commit(&mut self, rows: &Table, start: usize, end: usize) -> Result<Notice> {
        let (Some(roles), Some(batch)) = (&self.roles, self.navigator.current()) else {
            return Err(CurveCutError::NoData);
        };
        let summary = validate_and_commit(&mut self.export, rows, start, end, batch, &roles.lot)?;
        info!(
            batch = %summary.batch,
            start,
            end,
            rows = summary.rows,
            total = self.export.n_rows(),
            "selected range added"
        );
        let msg = format!(
            "Selected range for lot {} added ({} rows).",
            summary.batch, summary.rows
        );
        self.last_commit = Some(summary);
        Ok(Notice::success(msg))
    }

    fn selection_notice(&self) -> Notice {
        match self.selection_state() {
            SelectionState::Empty => Notice::info("No point selected for this lot."),
            SelectionState::OnePoint(i) => Notice::info(format!(
                "One point selected (index = {i}). Click another point to set the end."
            )),
            SelectionState::TwoPoints(a, b) => {
                Notice::success(format!("Two points selected (index = [{a}, {b}])."))
            }
        }
    }

    fn overlay_notice(&self) -> Notice {
        if self.overlay.is_drawable() {
            Notice::info(format!(
                "{} lot(s), {} parameter(s) selected.",
                self.overlay.batches.len(),
                self.overlay.parameters.len()
            ))
        } else {
            Notice::info("Select at least one lot and one parameter to draw the chart.")
        }
    }
}
