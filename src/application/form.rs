//! Draft state for the add/edit application form.
//!
//! A form holds uncommitted values only. Nothing reaches the store until the
//! caller turns the form into a record and submits it.

use chrono::NaiveDate;

use crate::domain::{ApplicationId, DATE_FORMAT, JobApplication, NewJobApplication, Stage};

/// A single-line text buffer with a cursor measured in characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.len() {
            let at = self.byte_index(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map_or(self.value.len(), |(i, _)| i)
    }
}

/// Fields of the form in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Company,
    Position,
    Stage,
    DateApplied,
    Notes,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Company,
        FormField::Position,
        FormField::Stage,
        FormField::DateApplied,
        FormField::Notes,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Company => "Company",
            FormField::Position => "Position",
            FormField::Stage => "Stage",
            FormField::DateApplied => "Date Applied",
            FormField::Notes => "Notes",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            FormField::Company => "Company name",
            FormField::Position => "Job title",
            FormField::Stage => "Select stage",
            FormField::DateApplied => "YYYY-MM-DD",
            FormField::Notes => "Add any notes about this application",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }
}

/// What submitting the form does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPurpose {
    /// Create a new application from the draft.
    Add,
    /// Replace the application with this id.
    Edit(ApplicationId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationForm {
    pub purpose: FormPurpose,
    pub company: TextInput,
    pub position: TextInput,
    pub stage: Stage,
    pub date_applied: TextInput,
    pub notes: TextInput,
    pub focus: FormField,
}

impl ApplicationForm {
    /// A fresh draft: empty text, first stage, applied `today`.
    pub fn new_draft(today: NaiveDate) -> Self {
        Self {
            purpose: FormPurpose::Add,
            company: TextInput::default(),
            position: TextInput::default(),
            stage: Stage::first(),
            date_applied: TextInput::new(today.format(DATE_FORMAT).to_string()),
            notes: TextInput::default(),
            focus: FormField::Company,
        }
    }

    /// A form prefilled from an existing application.
    pub fn for_application(application: &JobApplication) -> Self {
        Self {
            purpose: FormPurpose::Edit(application.id),
            company: TextInput::new(application.company.clone()),
            position: TextInput::new(application.position.clone()),
            stage: application.stage,
            date_applied: TextInput::new(application.date_applied.clone()),
            notes: TextInput::new(application.notes.clone()),
            focus: FormField::Company,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.purpose {
            FormPurpose::Add => "Add Job Application",
            FormPurpose::Edit(_) => "Edit Job Application",
        }
    }

    /// The form's values without an id.
    pub fn draft(&self) -> NewJobApplication {
        NewJobApplication {
            company: self.company.value().to_string(),
            position: self.position.value().to_string(),
            stage: self.stage,
            date_applied: self.date_applied.value().to_string(),
            notes: self.notes.value().to_string(),
        }
    }

    /// The text buffer behind the focused field, `None` for the stage selector.
    pub fn focused_input_mut(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            FormField::Company => Some(&mut self.company),
            FormField::Position => Some(&mut self.position),
            FormField::Stage => None,
            FormField::DateApplied => Some(&mut self.date_applied),
            FormField::Notes => Some(&mut self.notes),
        }
    }

    pub fn input(&self, field: FormField) -> Option<&TextInput> {
        match field {
            FormField::Company => Some(&self.company),
            FormField::Position => Some(&self.position),
            FormField::Stage => None,
            FormField::DateApplied => Some(&self.date_applied),
            FormField::Notes => Some(&self.notes),
        }
    }

    pub fn focus_next(&mut self) {
        let next = (self.focus.index() + 1) % FormField::ALL.len();
        self.focus = FormField::ALL[next];
    }

    pub fn focus_previous(&mut self) {
        let len = FormField::ALL.len();
        let previous = (self.focus.index() + len - 1) % len;
        self.focus = FormField::ALL[previous];
    }

    /// Cycles the stage selector, wrapping at both ends.
    pub fn cycle_stage(&mut self, forward: bool) {
        let len = Stage::ALL.len();
        let ordinal = self.stage.ordinal();
        let next = if forward { (ordinal + 1) % len } else { (ordinal + len - 1) % len };
        self.stage = Stage::ALL[next];
    }
}
