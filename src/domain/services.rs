use chrono::NaiveDate;

use crate::domain::models::{JobApplication, Stage};

/// Date format produced by the add form and expected in `date_applied`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Applications that currently sit in one stage, in collection order.
#[derive(Debug, Clone, PartialEq)]
pub struct StageGroup<'a> {
    pub stage: Stage,
    pub applications: Vec<&'a JobApplication>,
}

impl StageGroup<'_> {
    pub fn len(&self) -> usize {
        self.applications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }
}

/// Splits a snapshot into one group per stage, in board order.
///
/// Always returns exactly one group for every stage, even when empty. Within
/// a group the relative order of the source collection is kept.
pub fn group_by_stage(applications: &[JobApplication]) -> Vec<StageGroup<'_>> {
    Stage::ALL
        .iter()
        .map(|&stage| StageGroup {
            stage,
            applications: applications.iter().filter(|app| app.stage == stage).collect(),
        })
        .collect()
}

/// Direction for moving an application one stage at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Back,
    Forward,
}

/// Moves an application directly into `target`.
///
/// Returns the record to hand to the store's update, or `None` when the
/// application is already in `target`.
pub fn place(application: &JobApplication, target: Stage) -> Option<JobApplication> {
    if application.stage == target {
        return None;
    }
    Some(application.with_stage(target))
}

/// Moves an application one stage back or forward.
///
/// Returns `None` at the boundaries: back from the first stage, forward from
/// the last.
pub fn step(application: &JobApplication, direction: StepDirection) -> Option<JobApplication> {
    let target = step_target(application.stage, direction)?;
    place(application, target)
}

/// The stage a step would land on, if one is available.
pub fn step_target(stage: Stage, direction: StepDirection) -> Option<Stage> {
    match direction {
        StepDirection::Back => stage.previous(),
        StepDirection::Forward => stage.next(),
    }
}

/// Formats a `YYYY-MM-DD` date as `Jan 10, 2024`.
///
/// Month names are always English, independent of the user's locale. Input
/// that is not a valid date is returned unchanged.
pub fn format_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date.trim(), DATE_FORMAT) {
        Ok(parsed) => parsed.format("%b %-d, %Y").to_string(),
        Err(_) => date.to_string(),
    }
}
