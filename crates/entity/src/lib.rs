//! Entity definitions for Plumbline
//!
//! This crate contains Sea-ORM entity definitions for the database models,
//! plus the JSON sub-document types embedded in them (repair phases and the
//! project catalog).

pub mod phases;
pub mod projects;
pub mod repairs;
pub mod users;

pub use phases::{FinishPhase, ProgressPhase, RepairPhases, SurveyPhase};
pub use projects::Entity as Projects;
pub use repairs::Entity as Repairs;
pub use users::Entity as Users;
