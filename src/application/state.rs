//! Board state for the terminal job tracker.
//!
//! `App` is the board view's state: which column and card the cursor is on,
//! what the user is currently doing (mode, drag in progress, open form), and
//! the handle to the shared application store. It never keeps its own copy
//! of the applications; every read goes through the store.

use chrono::{Local, NaiveDate};

use crate::application::form::{ApplicationForm, FormPurpose, TextInput};
use crate::application::store::StoreHandle;
use crate::domain::{
    group_by_stage, place, step, ApplicationId, JobApplication, Stage, StepDirection,
};

/// Width of the sidebar in the wide layout.
pub const SIDEBAR_WIDTH: u16 = 24;
/// Width of one stage column in the wide layout.
pub const COLUMN_WIDTH: u16 = 32;

/// Represents the current mode of the application.
///
/// The mode decides how keys are interpreted and which overlay is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Board navigation, moving cards
    Normal,
    /// The add/edit form is open
    Form,
    /// Help screen is displayed
    Help,
    /// Waiting for the user to confirm deleting the selected card
    ConfirmDelete,
    /// Export dialog is open
    Export,
}

/// How the board is arranged for the current terminal width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardLayout {
    /// Sidebar plus as many stage columns as fit; cards are dragged between columns.
    Wide,
    /// One stage column at a time; cards are stepped forward and back.
    Compact,
}

/// Options that shape the board, usually taken from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Terminal widths below this use the compact layout.
    pub compact_width: u16,
    /// Column the cursor starts on.
    pub start_stage: Stage,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            compact_width: 100,
            start_stage: Stage::first(),
        }
    }
}

/// Main application state for the board.
#[derive(Debug)]
pub struct App {
    /// Shared handle to the application store
    pub store: StoreHandle,
    pub settings: Settings,
    /// Current application mode
    pub mode: AppMode,
    /// Column under the cursor, as a stage ordinal
    pub selected_stage: usize,
    /// Card under the cursor, as an index within the selected column
    pub selected_card: usize,
    /// Left-most stage column visible in the wide layout
    pub scroll_stage: usize,
    /// Application currently being dragged, if any
    pub dragging: Option<ApplicationId>,
    /// Draft being edited while the form is open
    pub form: Option<ApplicationForm>,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Input buffer for the export file name
    pub filename_input: TextInput,
    /// The export target exists and the next Enter replaces it
    pub overwrite_pending: bool,
    pub viewport_width: u16,
    pub viewport_height: u16,
    /// Source of the current calendar date for new drafts
    pub today: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl App {
    pub fn new(store: StoreHandle, settings: Settings) -> Self {
        Self {
            store,
            settings,
            mode: AppMode::Normal,
            selected_stage: settings.start_stage.ordinal(),
            selected_card: 0,
            scroll_stage: 0,
            dragging: None,
            form: None,
            help_scroll: 0,
            status_message: None,
            filename_input: TextInput::default(),
            overwrite_pending: false,
            viewport_width: 120,
            viewport_height: 40,
            today: local_today,
        }
    }

    pub fn layout(&self) -> BoardLayout {
        if self.viewport_width < self.settings.compact_width {
            BoardLayout::Compact
        } else {
            BoardLayout::Wide
        }
    }

    /// Number of stage columns that fit on screen at once.
    pub fn visible_stages(&self) -> usize {
        match self.layout() {
            BoardLayout::Compact => 1,
            BoardLayout::Wide => {
                let board_width = self.viewport_width.saturating_sub(SIDEBAR_WIDTH);
                ((board_width / COLUMN_WIDTH) as usize).clamp(1, Stage::ALL.len())
            }
        }
    }

    pub fn selected_stage(&self) -> Stage {
        Stage::from_ordinal(self.selected_stage).unwrap_or_else(Stage::first)
    }

    /// Applications in the given stage, in collection order.
    pub fn applications_in(&self, stage: Stage) -> Vec<JobApplication> {
        let snapshot = self.store.list();
        group_by_stage(&snapshot)
            .into_iter()
            .find(|group| group.stage == stage)
            .map(|group| group.applications.into_iter().cloned().collect())
            .unwrap_or_default()
    }

    /// The card under the cursor, if the selected column has any.
    pub fn selected_application(&self) -> Option<JobApplication> {
        self.applications_in(self.selected_stage())
            .into_iter()
            .nth(self.selected_card)
    }

    /// Updates the viewport size for layout and scrolling calculations.
    pub fn update_viewport_size(&mut self, width: u16, height: u16) {
        self.viewport_width = width;
        self.viewport_height = height;
        self.ensure_stage_visible();
    }

    pub fn select_stage(&mut self, ordinal: usize) {
        self.selected_stage = ordinal.min(Stage::last().ordinal());
        self.clamp_selected_card();
        self.ensure_stage_visible();
    }

    pub fn move_stage_cursor(&mut self, forward: bool) {
        let target = if forward {
            self.selected_stage + 1
        } else {
            match self.selected_stage.checked_sub(1) {
                Some(target) => target,
                None => return,
            }
        };
        self.select_stage(target);
    }

    pub fn move_card_cursor(&mut self, down: bool) {
        if down {
            self.selected_card += 1;
        } else {
            self.selected_card = self.selected_card.saturating_sub(1);
        }
        self.clamp_selected_card();
    }

    fn clamp_selected_card(&mut self) {
        let count = self.applications_in(self.selected_stage()).len();
        self.selected_card = self.selected_card.min(count.saturating_sub(1));
    }

    /// Adjusts horizontal scrolling so the selected column is on screen.
    pub fn ensure_stage_visible(&mut self) {
        let visible = self.visible_stages();
        if self.selected_stage < self.scroll_stage {
            self.scroll_stage = self.selected_stage;
        } else if self.selected_stage >= self.scroll_stage + visible {
            self.scroll_stage = self.selected_stage + 1 - visible;
        }
        self.scroll_stage = self.scroll_stage.min(Stage::ALL.len() - visible);
    }

    /// Moves the cursor onto the given application, wherever it now lives.
    pub fn focus_application(&mut self, id: ApplicationId) {
        let snapshot = self.store.list();
        for group in group_by_stage(&snapshot) {
            if let Some(index) = group.applications.iter().position(|app| app.id == id) {
                self.selected_stage = group.stage.ordinal();
                self.selected_card = index;
                self.ensure_stage_visible();
                return;
            }
        }
    }

    /// Puts the application into `target`, skipping the update when it is
    /// already there or no longer exists.
    pub fn place_application(&mut self, id: ApplicationId, target: Stage) -> bool {
        let Some(application) = self.store.get(id) else {
            tracing::debug!(id, "placement ignored, application no longer exists");
            return false;
        };
        match place(&application, target) {
            Some(moved) => {
                tracing::debug!(id, from = %application.stage, to = %target, "placing application");
                self.store.update(moved);
                self.focus_application(id);
                self.status_message = Some(format!("Moved {} to {}", application.company, target));
                true
            }
            None => false,
        }
    }

    /// Moves the selected card one stage back or forward.
    pub fn step_selected(&mut self, direction: StepDirection) -> bool {
        let Some(application) = self.selected_application() else {
            return false;
        };
        match step(&application, direction) {
            Some(moved) => {
                let target = moved.stage;
                tracing::debug!(id = application.id, from = %application.stage, to = %target, "stepping application");
                self.store.update(moved);
                self.focus_application(application.id);
                self.status_message = Some(format!("Moved {} to {}", application.company, target));
                true
            }
            None => {
                tracing::debug!(id = application.id, ?direction, "step ignored at stage boundary");
                false
            }
        }
    }

    /// Places the selected card directly into `target`.
    pub fn place_selected(&mut self, target: Stage) -> bool {
        match self.selected_application() {
            Some(application) => self.place_application(application.id, target),
            None => false,
        }
    }

    /// Starts dragging an application.
    pub fn start_drag(&mut self, id: ApplicationId) {
        if let Some(application) = self.store.get(id) {
            self.dragging = Some(id);
            self.status_message = Some(format!(
                "Moving {}: choose a column and drop it there",
                application.company
            ));
        }
    }

    /// Starts dragging the card under the cursor.
    pub fn pick_up_selected(&mut self) {
        if let Some(application) = self.selected_application() {
            self.start_drag(application.id);
        }
    }

    /// Drops the dragged card into `target` and ends the drag.
    pub fn drop_on(&mut self, target: Stage) -> bool {
        let Some(id) = self.dragging.take() else {
            return false;
        };
        let moved = self.place_application(id, target);
        if !moved {
            self.status_message = None;
        }
        moved
    }

    pub fn cancel_drag(&mut self) {
        if self.dragging.take().is_some() {
            self.status_message = Some("Move cancelled".to_string());
        }
    }

    /// Opens the form with a fresh draft.
    pub fn open_add_form(&mut self) {
        self.form = Some(ApplicationForm::new_draft((self.today)()));
        self.mode = AppMode::Form;
        self.status_message = None;
    }

    /// Opens the form prefilled with the selected card.
    pub fn open_edit_form(&mut self) {
        if let Some(application) = self.selected_application() {
            self.form = Some(ApplicationForm::for_application(&application));
            self.mode = AppMode::Form;
            self.status_message = None;
        }
    }

    /// Commits the open form to the store and closes it.
    pub fn submit_form(&mut self) {
        let Some(form) = self.form.take() else {
            self.mode = AppMode::Normal;
            return;
        };
        let draft = form.draft();
        let id = match form.purpose {
            FormPurpose::Add => {
                let company = draft.company.clone();
                let id = self.store.add(draft);
                self.status_message = Some(format!("Added application for {}", display_company(&company)));
                id
            }
            FormPurpose::Edit(id) => {
                let company = draft.company.clone();
                if self.store.update(draft.with_id(id)) {
                    self.status_message = Some(format!("Updated {}", display_company(&company)));
                }
                id
            }
        };
        self.mode = AppMode::Normal;
        self.focus_application(id);
    }

    /// Closes the form, discarding the draft.
    pub fn cancel_form(&mut self) {
        self.form = None;
        self.mode = AppMode::Normal;
    }

    pub fn request_delete(&mut self) {
        if self.selected_application().is_some() {
            self.mode = AppMode::ConfirmDelete;
        }
    }

    pub fn confirm_delete(&mut self) {
        if let Some(application) = self.selected_application() {
            if self.store.delete(application.id) {
                self.status_message = Some(format!("Deleted {}", display_company(&application.company)));
            }
        }
        self.mode = AppMode::Normal;
        self.clamp_selected_card();
    }

    pub fn cancel_delete(&mut self) {
        self.mode = AppMode::Normal;
    }

    pub fn show_help(&mut self) {
        self.mode = AppMode::Help;
        self.help_scroll = 0;
    }

    pub fn close_help(&mut self) {
        self.mode = AppMode::Normal;
    }

    /// Switches to export mode to prompt for a file name.
    pub fn start_export(&mut self) {
        self.mode = AppMode::Export;
        self.filename_input = TextInput::new("applications.csv");
        self.overwrite_pending = false;
        self.status_message = None;
    }

    /// File name to export to, falling back to the default.
    pub fn export_filename(&self) -> String {
        let name = self.filename_input.value().trim();
        if name.is_empty() {
            "applications.csv".to_string()
        } else {
            name.to_string()
        }
    }

    /// Asks before replacing an existing export file.
    pub fn request_overwrite(&mut self) {
        tracing::debug!(filename = %self.export_filename(), "export target exists, asking to overwrite");
        self.overwrite_pending = true;
    }

    /// Processes the result of an export, given as the written path or an error message.
    pub fn set_export_result(&mut self, result: Result<String, String>) {
        self.status_message = Some(match result {
            Ok(path) => format!("Exported {} applications to {}", self.store.len(), path),
            Err(err) => format!("Export failed: {err}"),
        });
        self.cancel_export();
    }

    pub fn cancel_export(&mut self) {
        self.mode = AppMode::Normal;
        self.overwrite_pending = false;
        self.filename_input.clear();
    }
}

fn display_company(company: &str) -> &str {
    if company.is_empty() { "(no company)" } else { company }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::store::StoreScope;
    use crate::domain::NewJobApplication;

    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    fn new_app(scope: &StoreScope) -> App {
        let mut app = App::new(scope.handle(), Settings::default());
        app.today = fixed_today;
        app
    }

    fn add(app: &App, company: &str, stage: Stage) -> ApplicationId {
        app.store.add(NewJobApplication {
            company: company.to_string(),
            position: "Eng".to_string(),
            stage,
            date_applied: "2024-01-10".to_string(),
            notes: String::new(),
        })
    }

    #[test]
    fn test_layout_switches_on_width() {
        let scope = StoreScope::new();
        let mut app = new_app(&scope);
        app.update_viewport_size(160, 40);
        assert_eq!(app.layout(), BoardLayout::Wide);
        assert_eq!(app.visible_stages(), 4);

        app.update_viewport_size(80, 40);
        assert_eq!(app.layout(), BoardLayout::Compact);
        assert_eq!(app.visible_stages(), 1);
    }

    #[test]
    fn test_cursor_starts_on_configured_stage() {
        let scope = StoreScope::new();
        let settings = Settings {
            start_stage: Stage::Rejected,
            ..Settings::default()
        };
        let mut app = App::new(scope.handle(), settings);
        app.update_viewport_size(160, 40);
        assert_eq!(app.selected_stage(), Stage::Rejected);
        assert_eq!(app.scroll_stage, 5);
    }

    #[test]
    fn test_stage_cursor_stays_in_bounds_and_scrolls() {
        let scope = StoreScope::new();
        let mut app = new_app(&scope);
        app.update_viewport_size(160, 40);

        app.move_stage_cursor(false);
        assert_eq!(app.selected_stage, 0);

        for _ in 0..20 {
            app.move_stage_cursor(true);
        }
        assert_eq!(app.selected_stage, 8);
        assert_eq!(app.scroll_stage, 5);

        app.select_stage(2);
        assert_eq!(app.scroll_stage, 2);
    }

    #[test]
    fn test_card_cursor_clamps_to_column() {
        let scope = StoreScope::new();
        let mut app = new_app(&scope);
        add(&app, "A", Stage::Applied);
        add(&app, "B", Stage::Applied);

        app.move_card_cursor(true);
        app.move_card_cursor(true);
        app.move_card_cursor(true);
        assert_eq!(app.selected_card, 1);
        assert_eq!(app.selected_application().unwrap().company, "B");

        app.select_stage(Stage::Offer.ordinal());
        assert_eq!(app.selected_card, 0);
        assert!(app.selected_application().is_none());
    }

    #[test]
    fn test_step_forward_from_phone_interview() {
        let scope = StoreScope::new();
        let mut app = new_app(&scope);
        let id = add(&app, "Hooli", Stage::PhoneInterview);
        app.select_stage(Stage::PhoneInterview.ordinal());

        assert!(app.step_selected(StepDirection::Forward));
        assert_eq!(app.store.get(id).unwrap().stage, Stage::TechnicalAssessment);
        assert_eq!(app.selected_stage(), Stage::TechnicalAssessment);
    }

    #[test]
    fn test_step_at_boundaries_is_noop() {
        let scope = StoreScope::new();
        let mut app = new_app(&scope);
        let first = add(&app, "First", Stage::Applied);
        let last = add(&app, "Last", Stage::Rejected);
        let before = app.store.list();

        app.select_stage(Stage::Applied.ordinal());
        assert!(!app.step_selected(StepDirection::Back));
        app.select_stage(Stage::Rejected.ordinal());
        assert!(!app.step_selected(StepDirection::Forward));

        assert_eq!(app.store.list(), before);
        assert_eq!(app.store.get(first).unwrap().stage, Stage::Applied);
        assert_eq!(app.store.get(last).unwrap().stage, Stage::Rejected);
    }

    #[test]
    fn test_direct_placement_changes_only_stage() {
        let scope = StoreScope::new();
        let mut app = new_app(&scope);
        let id = add(&app, "Acme", Stage::Applied);
        let original = app.store.get(id).unwrap();

        assert!(app.place_application(id, Stage::Offer));
        let moved = app.store.get(id).unwrap();
        assert_eq!(moved, JobApplication { stage: Stage::Offer, ..original });
        assert_eq!(app.selected_stage(), Stage::Offer);
    }

    #[test]
    fn test_drop_on_same_stage_is_noop() {
        let scope = StoreScope::new();
        let mut app = new_app(&scope);
        let id = add(&app, "Acme", Stage::Interview);
        let before = app.store.list();

        app.start_drag(id);
        assert_eq!(app.dragging, Some(id));
        assert!(!app.drop_on(Stage::Interview));
        assert_eq!(app.dragging, None);
        assert_eq!(app.store.list(), before);
    }

    #[test]
    fn test_drop_of_deleted_application_is_noop() {
        let scope = StoreScope::new();
        let mut app = new_app(&scope);
        let id = add(&app, "Acme", Stage::Applied);
        app.start_drag(id);
        app.store.delete(id);

        assert!(!app.drop_on(Stage::Offer));
        assert!(app.store.is_empty());
    }

    #[test]
    fn test_cancel_drag_leaves_store_alone() {
        let scope = StoreScope::new();
        let mut app = new_app(&scope);
        add(&app, "Acme", Stage::Applied);
        app.pick_up_selected();
        assert!(app.dragging.is_some());
        app.cancel_drag();
        assert!(app.dragging.is_none());
        assert_eq!(app.store.list()[0].stage, Stage::Applied);
    }

    #[test]
    fn test_submitting_default_draft_twice() {
        let scope = StoreScope::new();
        let mut app = new_app(&scope);

        app.open_add_form();
        app.submit_form();
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.form.is_none());

        app.open_add_form();
        app.submit_form();

        let apps = app.store.list();
        assert_eq!(apps.len(), 2);
        assert_ne!(apps[0].id, apps[1].id);
        for record in &apps {
            assert_eq!(record.stage, Stage::Applied);
            assert_eq!(record.date_applied, "2024-01-10");
        }
        assert_eq!(
            JobApplication { id: 0, ..apps[0].clone() },
            JobApplication { id: 0, ..apps[1].clone() }
        );
    }

    #[test]
    fn test_reopened_form_starts_from_defaults() {
        let scope = StoreScope::new();
        let mut app = new_app(&scope);

        app.open_add_form();
        app.form.as_mut().unwrap().company.insert('X');
        app.submit_form();

        app.open_add_form();
        let form = app.form.as_ref().unwrap();
        assert_eq!(form.company.value(), "");
        assert_eq!(form.stage, Stage::Applied);
        assert_eq!(form.date_applied.value(), "2024-01-10");
    }

    #[test]
    fn test_cancel_form_discards_draft() {
        let scope = StoreScope::new();
        let mut app = new_app(&scope);

        app.open_add_form();
        app.form.as_mut().unwrap().company.insert('X');
        app.cancel_form();

        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.form.is_none());
        assert!(app.store.is_empty());
    }

    #[test]
    fn test_edit_form_updates_record() {
        let scope = StoreScope::new();
        let mut app = new_app(&scope);
        let id = add(&app, "Acme", Stage::Applied);

        app.open_edit_form();
        let form = app.form.as_mut().unwrap();
        form.notes.insert('!');
        form.stage = Stage::Interview;
        app.submit_form();

        let updated = app.store.get(id).unwrap();
        assert_eq!(updated.notes, "!");
        assert_eq!(updated.stage, Stage::Interview);
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.selected_stage(), Stage::Interview);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let scope = StoreScope::new();
        let mut app = new_app(&scope);
        add(&app, "Acme", Stage::Applied);
        add(&app, "Globex", Stage::Applied);

        app.request_delete();
        assert_eq!(app.mode, AppMode::ConfirmDelete);
        app.cancel_delete();
        assert_eq!(app.store.len(), 2);

        app.move_card_cursor(true);
        app.request_delete();
        app.confirm_delete();
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.store.list()[0].company, "Acme");
        assert_eq!(app.selected_card, 0);
    }

    #[test]
    fn test_request_delete_on_empty_column_does_nothing() {
        let scope = StoreScope::new();
        let mut app = new_app(&scope);
        app.request_delete();
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_export_filename_defaults() {
        let scope = StoreScope::new();
        let mut app = new_app(&scope);
        app.start_export();
        assert_eq!(app.mode, AppMode::Export);
        assert_eq!(app.export_filename(), "applications.csv");

        app.filename_input.clear();
        assert_eq!(app.export_filename(), "applications.csv");

        app.set_export_result(Err("disk full".to_string()));
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.status_message.as_deref(), Some("Export failed: disk full"));
    }
}
