use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::services::format_date;

/// Identifier assigned to an application by the store.
pub type ApplicationId = u32;

/// One of the fixed, ordered hiring stages an application moves through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    #[default]
    #[serde(rename = "Applied")]
    Applied,
    #[serde(rename = "Resume Screened")]
    ResumeScreened,
    #[serde(rename = "Phone Interview")]
    PhoneInterview,
    #[serde(rename = "Technical Assessment")]
    TechnicalAssessment,
    #[serde(rename = "Interview")]
    Interview,
    #[serde(rename = "Final Interview")]
    FinalInterview,
    #[serde(rename = "Offer")]
    Offer,
    #[serde(rename = "Accepted")]
    Accepted,
    #[serde(rename = "Rejected")]
    Rejected,
}

impl Stage {
    /// Every stage in board order.
    pub const ALL: [Stage; 9] = [
        Stage::Applied,
        Stage::ResumeScreened,
        Stage::PhoneInterview,
        Stage::TechnicalAssessment,
        Stage::Interview,
        Stage::FinalInterview,
        Stage::Offer,
        Stage::Accepted,
        Stage::Rejected,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Stage::Applied => "Applied",
            Stage::ResumeScreened => "Resume Screened",
            Stage::PhoneInterview => "Phone Interview",
            Stage::TechnicalAssessment => "Technical Assessment",
            Stage::Interview => "Interview",
            Stage::FinalInterview => "Final Interview",
            Stage::Offer => "Offer",
            Stage::Accepted => "Accepted",
            Stage::Rejected => "Rejected",
        }
    }

    /// Zero-based position of the stage on the board.
    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn from_ordinal(ordinal: usize) -> Option<Stage> {
        Self::ALL.get(ordinal).copied()
    }

    /// The stage after this one, or `None` for the last stage.
    pub fn next(self) -> Option<Stage> {
        Self::from_ordinal(self.ordinal() + 1)
    }

    /// The stage before this one, or `None` for the first stage.
    pub fn previous(self) -> Option<Stage> {
        self.ordinal().checked_sub(1).and_then(Self::from_ordinal)
    }

    pub fn first() -> Stage {
        Self::ALL[0]
    }

    pub fn last() -> Stage {
        Self::ALL[Self::ALL.len() - 1]
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Stage {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|stage| stage.label() == s.trim())
            .ok_or_else(|| DomainError::UnknownStage(s.to_string()))
    }
}

/// A tracked job application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: ApplicationId,
    pub company: String,
    pub position: String,
    pub stage: Stage,
    pub date_applied: String,
    pub notes: String,
}

impl JobApplication {
    pub fn has_notes(&self) -> bool {
        !self.notes.is_empty()
    }

    /// Human-readable form of `date_applied`, for display only.
    pub fn display_date(&self) -> String {
        format_date(&self.date_applied)
    }

    /// Copy of this record with only the stage replaced.
    pub fn with_stage(&self, stage: Stage) -> JobApplication {
        JobApplication {
            stage,
            ..self.clone()
        }
    }
}

/// An application that has not been given an id yet.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJobApplication {
    pub company: String,
    pub position: String,
    pub stage: Stage,
    pub date_applied: String,
    pub notes: String,
}

impl NewJobApplication {
    pub fn with_id(self, id: ApplicationId) -> JobApplication {
        JobApplication {
            id,
            company: self.company,
            position: self.position,
            stage: self.stage,
            date_applied: self.date_applied,
            notes: self.notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> JobApplication {
        NewJobApplication {
            company: "Acme".to_string(),
            position: "Eng".to_string(),
            stage: Stage::Applied,
            date_applied: "2024-01-10".to_string(),
            notes: String::new(),
        }
        .with_id(7)
    }

    #[test]
    fn test_stage_order_and_ordinals() {
        for (index, stage) in Stage::ALL.iter().enumerate() {
            assert_eq!(stage.ordinal(), index);
            assert_eq!(Stage::from_ordinal(index), Some(*stage));
        }
        assert_eq!(Stage::from_ordinal(9), None);
        assert_eq!(Stage::first(), Stage::Applied);
        assert_eq!(Stage::last(), Stage::Rejected);
    }

    #[test]
    fn test_stage_neighbours() {
        assert_eq!(Stage::Applied.previous(), None);
        assert_eq!(Stage::Rejected.next(), None);
        assert_eq!(Stage::PhoneInterview.next(), Some(Stage::TechnicalAssessment));
        assert_eq!(Stage::Offer.previous(), Some(Stage::FinalInterview));
    }

    #[test]
    fn test_stage_from_str() {
        assert_eq!("Resume Screened".parse::<Stage>(), Ok(Stage::ResumeScreened));
        assert_eq!(" Offer ".parse::<Stage>(), Ok(Stage::Offer));
        assert_eq!(
            "Ghosted".parse::<Stage>(),
            Err(DomainError::UnknownStage("Ghosted".to_string()))
        );
        for stage in Stage::ALL {
            assert_eq!(stage.to_string().parse::<Stage>(), Ok(stage));
        }
    }

    #[test]
    fn test_with_stage_only_changes_stage() {
        let app = sample();
        let moved = app.with_stage(Stage::Offer);
        assert_eq!(moved.stage, Stage::Offer);
        assert_eq!(moved.id, app.id);
        assert_eq!(moved.company, app.company);
        assert_eq!(moved.position, app.position);
        assert_eq!(moved.date_applied, app.date_applied);
        assert_eq!(moved.notes, app.notes);
    }

    #[test]
    fn test_notes_indicator() {
        let mut app = sample();
        assert!(!app.has_notes());
        app.notes = "Referral from Sam".to_string();
        assert!(app.has_notes());
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["dateApplied"], "2024-01-10");
        assert_eq!(json["stage"], "Applied");
        assert_eq!(json["id"], 7);
    }
}
