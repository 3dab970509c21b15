//! Repair Phase Sub-Document
//!
//! The `phases` JSON column stored on every repair. The key names here are
//! the persisted wire format and must not change: existing stored repairs
//! use exactly `survey` / `progress` / `finish` with `repair_type`,
//! `measurements`, `comments`, `photos`, `created_by_user_id`,
//! `created_by_user_name` and `created_at` inside each slot.
//!
//! A phase slot is complete iff its `created_at` is a non-empty string.

use std::collections::BTreeMap;

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// The survey phase: the first submission for a repair, which also fixes the
/// repair type (and with it the total phase count).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct SurveyPhase {
    pub repair_type:          String,
    #[serde(default)]
    pub measurements:         BTreeMap<String, String>,
    #[serde(default)]
    pub comments:             String,
    #[serde(default)]
    pub photos:               Vec<String>,
    pub created_by_user_id:   String,
    pub created_by_user_name: String,
    pub created_at:           String,
}

/// One intermediate progress step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct ProgressPhase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repair_type:          Option<String>,
    #[serde(default)]
    pub measurements:         BTreeMap<String, String>,
    #[serde(default)]
    pub comments:             String,
    #[serde(default)]
    pub photos:               Vec<String>,
    pub created_by_user_id:   String,
    pub created_by_user_name: String,
    pub created_at:           String,
}

/// The closing phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct FinishPhase {
    #[serde(default)]
    pub comments:             String,
    #[serde(default)]
    pub photos:               Vec<String>,
    pub created_by_user_id:   String,
    pub created_by_user_name: String,
    pub created_at:           String,
}

/// The full phase sub-document of a repair.
///
/// `progress` always has exactly (catalog phase count - 2) slots; slots are
/// `None` until their step has been submitted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct RepairPhases {
    #[serde(default)]
    pub survey:   Option<SurveyPhase>,
    #[serde(default)]
    pub progress: Vec<Option<ProgressPhase>>,
    #[serde(default)]
    pub finish:   Option<FinishPhase>,
}

impl SurveyPhase {
    /// A phase is complete iff its `created_at` is non-empty.
    #[must_use]
    pub fn is_complete(&self) -> bool { !self.created_at.is_empty() }
}

impl ProgressPhase {
    #[must_use]
    pub fn is_complete(&self) -> bool { !self.created_at.is_empty() }
}

impl FinishPhase {
    #[must_use]
    pub fn is_complete(&self) -> bool { !self.created_at.is_empty() }
}

impl RepairPhases {
    /// Create an empty phase document sized for a repair type with the given
    /// total phase count (survey + progress steps + finish).
    #[must_use]
    pub fn sized(total_phases: u8) -> Self {
        let progress_slots = usize::from(total_phases.saturating_sub(2));
        Self {
            survey:   None,
            progress: vec![None; progress_slots],
            finish:   None,
        }
    }

    /// Whether the survey slot has been completed.
    #[must_use]
    pub fn survey_complete(&self) -> bool { self.survey.as_ref().is_some_and(SurveyPhase::is_complete) }

    /// Whether the finish slot has been completed.
    #[must_use]
    pub fn finish_complete(&self) -> bool { self.finish.as_ref().is_some_and(FinishPhase::is_complete) }

    /// Number of completed progress slots.
    #[must_use]
    pub fn completed_progress(&self) -> usize {
        self.progress
            .iter()
            .filter(|slot| slot.as_ref().is_some_and(ProgressPhase::is_complete))
            .count()
    }

    /// Whether every progress slot has been completed.
    #[must_use]
    pub fn all_progress_complete(&self) -> bool { self.completed_progress() == self.progress.len() }

    /// The repair type fixed by the survey, if surveyed.
    #[must_use]
    pub fn repair_type(&self) -> Option<&str> { self.survey.as_ref().map(|s| s.repair_type.as_str()) }
}
