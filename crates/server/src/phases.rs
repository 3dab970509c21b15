//! # Repair Phase State Machine
//!
//! Validates and advances a repair through its phase sequence:
//! `NoSurvey → Surveyed → InProgress(k of N−2) → Finished`.
//!
//! The survey fixes the repair type, and with it the total phase count N from
//! the project catalog; the progress vector then has exactly N−2 slots.
//!
//! Historically, progress slots and the finish phase could be submitted in
//! any order (technicians back-fill steps from the field). That behavior is
//! preserved as the default: out-of-order submissions are accepted and logged.
//! Setting [`PhaseConfig::strict_ordering`] rejects them instead.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use entity::{
    phases::{FinishPhase, ProgressPhase, RepairPhases, SurveyPhase},
    projects,
};
use error::AppError;
use tracing::warn;

/// Phase-ordering configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseConfig {
    /// Reject out-of-order progress/finish submissions instead of logging
    /// them.
    pub strict_ordering: bool,
}

impl PhaseConfig {
    /// Read the configuration from `PLUMBLINE_STRICT_PHASE_ORDER`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            strict_ordering: std::env::var("PLUMBLINE_STRICT_PHASE_ORDER")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

/// Derived lifecycle state of a repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseState {
    /// No survey submitted yet.
    NoSurvey,
    /// Survey complete, no progress steps yet.
    Surveyed,
    /// Some progress steps complete.
    InProgress {
        completed: usize,
        total:     usize,
    },
    /// Finish phase complete.
    Finished,
}

/// Derive the lifecycle state from a phase document.
#[must_use]
pub fn phase_state(phases: &RepairPhases) -> PhaseState {
    if phases.finish_complete() {
        return PhaseState::Finished;
    }
    if !phases.survey_complete() {
        return PhaseState::NoSurvey;
    }
    match phases.completed_progress() {
        0 => PhaseState::Surveyed,
        completed => {
            PhaseState::InProgress {
                completed,
                total: phases.progress.len(),
            }
        },
    }
}

/// A field-level phase validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseValidationError {
    pub field:  &'static str,
    pub reason: String,
}

impl PhaseValidationError {
    fn new(field: &'static str, reason: impl ToString) -> Self {
        Self {
            field,
            reason: reason.to_string(),
        }
    }
}

impl std::fmt::Display for PhaseValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

impl From<PhaseValidationError> for AppError {
    fn from(err: PhaseValidationError) -> Self { AppError::validation(err.to_string()) }
}

/// The content of one phase submission.
#[derive(Debug, Clone, Default)]
pub struct PhaseSubmission {
    pub measurements: BTreeMap<String, String>,
    pub comments:     String,
    pub photos:       Vec<String>,
}

/// The user making a submission, denormalized onto the phase record.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id:   String,
    pub user_name: String,
}

/// Validate a survey submission and build the initial phase document.
///
/// This is the `NoSurvey → Surveyed` transition: the repair type must be
/// resolvable in the project catalog (to learn the total phase count), and
/// the (drop, level) coordinate must fall inside the named elevation's grid.
pub fn build_survey(
    project: &projects::Model,
    elevation_name: &str,
    drop: i32,
    level: i32,
    repair_type: &str,
    submission: PhaseSubmission,
    actor: &Actor,
    now: DateTime<Utc>,
) -> Result<RepairPhases, PhaseValidationError> {
    let bounds = project
        .elevation_bounds(elevation_name)
        .ok_or_else(|| PhaseValidationError::new("elevation_name", format!("Unknown elevation '{}'", elevation_name)))?;

    if !bounds.contains(drop, level) {
        return Err(PhaseValidationError::new(
            "drop",
            format!(
                "Coordinates ({}, {}) are outside elevation '{}' ({}..={} drops, {}..={} levels)",
                drop, level, elevation_name, bounds.min_drop, bounds.max_drop, bounds.min_level, bounds.max_level
            ),
        ));
    }

    let total_phases = project.phase_count(repair_type).ok_or_else(|| {
        PhaseValidationError::new(
            "repair_type",
            format!("Repair type '{}' is not in the project catalog", repair_type),
        )
    })?;

    let mut phases = RepairPhases::sized(total_phases);
    phases.survey = Some(SurveyPhase {
        repair_type:          repair_type.to_string(),
        measurements:         submission.measurements,
        comments:             submission.comments,
        photos:               submission.photos,
        created_by_user_id:   actor.user_id.clone(),
        created_by_user_name: actor.user_name.clone(),
        created_at:           now.to_rfc3339(),
    });

    Ok(phases)
}

/// Apply a progress submission to slot `slot` (1-based).
///
/// `Surveyed → InProgress(i)`: requires `1 <= slot <= N−2`. An already
/// populated slot is overwritten. Ordering relative to the survey and earlier
/// slots is only enforced under strict ordering; otherwise a violation is
/// logged and accepted.
pub fn apply_progress(
    phases: &mut RepairPhases,
    slot: usize,
    submission: PhaseSubmission,
    actor: &Actor,
    now: DateTime<Utc>,
    config: PhaseConfig,
) -> Result<(), PhaseValidationError> {
    if slot == 0 || slot > phases.progress.len() {
        return Err(PhaseValidationError::new(
            "slot",
            format!(
                "Progress slot {} is out of range (this repair has {} progress steps)",
                slot,
                phases.progress.len()
            ),
        ));
    }

    let earlier_incomplete = phases.progress[.. slot - 1]
        .iter()
        .any(|s| !s.as_ref().is_some_and(ProgressPhase::is_complete));
    let out_of_order = !phases.survey_complete() || earlier_incomplete;

    if out_of_order {
        if config.strict_ordering {
            return Err(PhaseValidationError::new(
                "slot",
                format!("Progress slot {} submitted before earlier phases are complete", slot),
            ));
        }
        warn!(slot = slot, "Out-of-order progress submission accepted");
    }

    let repair_type = phases.repair_type().map(ToString::to_string);
    phases.progress[slot - 1] = Some(ProgressPhase {
        repair_type,
        measurements:         submission.measurements,
        comments:             submission.comments,
        photos:               submission.photos,
        created_by_user_id:   actor.user_id.clone(),
        created_by_user_name: actor.user_name.clone(),
        created_at:           now.to_rfc3339(),
    });

    Ok(())
}

/// Apply a finish submission.
///
/// `InProgress(N−2) → Finished`: all progress slots should be complete.
/// Under strict ordering an incomplete prior phase rejects the submission;
/// otherwise it is logged and accepted.
pub fn apply_finish(
    phases: &mut RepairPhases,
    submission: PhaseSubmission,
    actor: &Actor,
    now: DateTime<Utc>,
    config: PhaseConfig,
) -> Result<(), PhaseValidationError> {
    let out_of_order = !phases.survey_complete() || !phases.all_progress_complete();

    if out_of_order {
        if config.strict_ordering {
            return Err(PhaseValidationError::new(
                "finish",
                "Finish submitted before survey and all progress steps are complete",
            ));
        }
        warn!(
            completed = phases.completed_progress(),
            total = phases.progress.len(),
            "Out-of-order finish submission accepted"
        );
    }

    phases.finish = Some(FinishPhase {
        comments:             submission.comments,
        photos:               submission.photos,
        created_by_user_id:   actor.user_id.clone(),
        created_by_user_name: actor.user_name.clone(),
        created_at:           now.to_rfc3339(),
    });

    Ok(())
}

/// Compute the next repair index for a location+type group.
///
/// `repairs` is the set of repairs already at the (project, elevation, drop,
/// level) location; only those whose survey fixed the same repair type count
/// toward the group. The next index is max + 1, or 1 for the first repair.
#[must_use]
pub fn next_repair_index<'a, I>(repairs: I, repair_type: &str) -> i32
where
    I: IntoIterator<Item = &'a entity::repairs::Model>,
{
    repairs
        .into_iter()
        .filter(|r| r.phases.repair_type() == Some(repair_type))
        .map(|r| r.repair_index)
        .max()
        .map_or(1, |max| max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity::projects::{Elevation, ElevationList, ProjectStatus, RepairTypeList, RepairTypeSpec, TechnicianList};

    fn actor() -> Actor {
        Actor {
            user_id:   "usr_t1".to_string(),
            user_name: "Tess Ops".to_string(),
        }
    }

    fn project() -> projects::Model {
        projects::Model {
            id:                 "prj_1".to_string(),
            name:               "Harbor Tower".to_string(),
            client_name:        "Harborside Ltd".to_string(),
            client_id:          "usr_c1".to_string(),
            status:             ProjectStatus::InProgress,
            elevations:         ElevationList(vec![Elevation {
                name:   "North".to_string(),
                drops:  10,
                levels: 5,
            }]),
            repair_types:       RepairTypeList(vec![RepairTypeSpec {
                repair_type_id: "rt_1".to_string(),
                repair_type:    "Crack".to_string(),
                phases:         4,
                price:          2500,
                unit_to_charge: "m".to_string(),
            }]),
            technicians:        TechnicianList(vec![]),
            created_by_user_id: "usr_m1".to_string(),
            created_at:         Utc::now(),
            updated_at:         Utc::now(),
            deleted_at:         None,
        }
    }

    fn surveyed_phases() -> RepairPhases {
        build_survey(
            &project(),
            "North",
            3,
            2,
            "Crack",
            PhaseSubmission::default(),
            &actor(),
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_survey_creates_sized_document() {
        let phases = surveyed_phases();
        assert!(phases.survey_complete());
        assert_eq!(phases.progress, vec![None, None]);
        assert!(phases.finish.is_none());
        assert_eq!(phase_state(&phases), PhaseState::Surveyed);
    }

    #[test]
    fn test_survey_unknown_elevation() {
        let err = build_survey(
            &project(),
            "West",
            1,
            1,
            "Crack",
            PhaseSubmission::default(),
            &actor(),
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(err.field, "elevation_name");
    }

    #[test]
    fn test_survey_out_of_bounds() {
        let err = build_survey(
            &project(),
            "North",
            11,
            2,
            "Crack",
            PhaseSubmission::default(),
            &actor(),
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(err.field, "drop");
    }

    #[test]
    fn test_survey_unknown_repair_type() {
        let err = build_survey(
            &project(),
            "North",
            3,
            2,
            "Spalling",
            PhaseSubmission::default(),
            &actor(),
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(err.field, "repair_type");
    }

    #[test]
    fn test_progress_in_order() {
        let mut phases = surveyed_phases();
        let config = PhaseConfig::default();

        apply_progress(&mut phases, 1, PhaseSubmission::default(), &actor(), Utc::now(), config).unwrap();
        assert_eq!(
            phase_state(&phases),
            PhaseState::InProgress {
                completed: 1,
                total:     2,
            }
        );

        apply_progress(&mut phases, 2, PhaseSubmission::default(), &actor(), Utc::now(), config).unwrap();
        assert_eq!(
            phase_state(&phases),
            PhaseState::InProgress {
                completed: 2,
                total:     2,
            }
        );
    }

    #[test]
    fn test_progress_slot_out_of_range() {
        let mut phases = surveyed_phases();
        let config = PhaseConfig::default();

        let err = apply_progress(&mut phases, 3, PhaseSubmission::default(), &actor(), Utc::now(), config)
            .unwrap_err();
        assert_eq!(err.field, "slot");

        let err = apply_progress(&mut phases, 0, PhaseSubmission::default(), &actor(), Utc::now(), config)
            .unwrap_err();
        assert_eq!(err.field, "slot");
    }

    #[test]
    fn test_progress_out_of_order_permissive() {
        let mut phases = surveyed_phases();
        let config = PhaseConfig::default();

        // Slot 2 before slot 1 is accepted by default.
        apply_progress(&mut phases, 2, PhaseSubmission::default(), &actor(), Utc::now(), config).unwrap();
        assert!(phases.progress[0].is_none());
        assert!(phases.progress[1].is_some());
    }

    #[test]
    fn test_progress_out_of_order_strict() {
        let mut phases = surveyed_phases();
        let config = PhaseConfig {
            strict_ordering: true,
        };

        let err = apply_progress(&mut phases, 2, PhaseSubmission::default(), &actor(), Utc::now(), config)
            .unwrap_err();
        assert_eq!(err.field, "slot");
        assert!(phases.progress[1].is_none());
    }

    #[test]
    fn test_progress_overwrite_allowed() {
        let mut phases = surveyed_phases();
        let config = PhaseConfig::default();

        apply_progress(&mut phases, 1, PhaseSubmission::default(), &actor(), Utc::now(), config).unwrap();
        let submission = PhaseSubmission {
            comments: "revised".to_string(),
            ..Default::default()
        };
        apply_progress(&mut phases, 1, submission, &actor(), Utc::now(), config).unwrap();

        assert_eq!(phases.progress[0].as_ref().unwrap().comments, "revised");
    }

    #[test]
    fn test_progress_carries_repair_type() {
        let mut phases = surveyed_phases();
        apply_progress(
            &mut phases,
            1,
            PhaseSubmission::default(),
            &actor(),
            Utc::now(),
            PhaseConfig::default(),
        )
        .unwrap();

        assert_eq!(
            phases.progress[0].as_ref().unwrap().repair_type.as_deref(),
            Some("Crack")
        );
    }

    #[test]
    fn test_finish_after_all_progress() {
        let mut phases = surveyed_phases();
        let config = PhaseConfig::default();
        apply_progress(&mut phases, 1, PhaseSubmission::default(), &actor(), Utc::now(), config).unwrap();
        apply_progress(&mut phases, 2, PhaseSubmission::default(), &actor(), Utc::now(), config).unwrap();

        apply_finish(&mut phases, PhaseSubmission::default(), &actor(), Utc::now(), config).unwrap();
        assert_eq!(phase_state(&phases), PhaseState::Finished);
    }

    #[test]
    fn test_finish_early_permissive() {
        let mut phases = surveyed_phases();
        apply_finish(
            &mut phases,
            PhaseSubmission::default(),
            &actor(),
            Utc::now(),
            PhaseConfig::default(),
        )
        .unwrap();
        assert_eq!(phase_state(&phases), PhaseState::Finished);
    }

    #[test]
    fn test_finish_early_strict() {
        let mut phases = surveyed_phases();
        let err = apply_finish(
            &mut phases,
            PhaseSubmission::default(),
            &actor(),
            Utc::now(),
            PhaseConfig {
                strict_ordering: true,
            },
        )
        .unwrap_err();
        assert_eq!(err.field, "finish");
    }

    #[test]
    fn test_phase_state_no_survey() {
        assert_eq!(phase_state(&RepairPhases::sized(4)), PhaseState::NoSurvey);
    }

    #[test]
    fn test_validation_error_maps_to_app_error() {
        let err: AppError = PhaseValidationError::new("slot", "out of range").into();
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert!(err.message().contains("slot"));
    }

    fn repair_at(index: i32, repair_type: &str) -> entity::repairs::Model {
        let phases = build_survey(
            &project(),
            "North",
            3,
            2,
            repair_type,
            PhaseSubmission::default(),
            &actor(),
            Utc::now(),
        )
        .unwrap();

        entity::repairs::Model {
            id:                   format!("rep_{}", index),
            project_id:           "prj_1".to_string(),
            project_name:         "Harbor Tower".to_string(),
            elevation_name:       "North".to_string(),
            drop:                 3,
            level:                2,
            repair_index:         index,
            status:               entity::repairs::RepairStatus::Pending,
            phases,
            created_by_user_id:   "usr_t1".to_string(),
            created_by_user_name: "Tess Ops".to_string(),
            created_at:           Utc::now(),
            updated_at:           Utc::now(),
        }
    }

    #[test]
    fn test_next_repair_index_empty_group() {
        assert_eq!(next_repair_index(std::iter::empty(), "Crack"), 1);
    }

    #[test]
    fn test_next_repair_index_increments_max() {
        let repairs = vec![repair_at(1, "Crack"), repair_at(2, "Crack")];
        assert_eq!(next_repair_index(&repairs, "Crack"), 3);
    }

    #[test]
    fn test_next_repair_index_ignores_other_types() {
        // Same catalog entry name differs: only same-type repairs count.
        let mut other = repair_at(5, "Crack");
        other.phases.survey.as_mut().unwrap().repair_type = "Spalling".to_string();
        let repairs = vec![repair_at(1, "Crack"), other];

        assert_eq!(next_repair_index(&repairs, "Crack"), 2);
    }
}
