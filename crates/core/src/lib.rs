//! # ANC Core
//!
//! Decision-support core for the maternal-health ANC application.
//!
//! This crate contains the only non-trivial logic in the system:
//! - Identifier resolution through an ordered fallback chain ([`identity`])
//! - Deterministic GH triage explanation and priority tier ([`triage`])
//! - ANC visit window computation and scheduling policy ([`visits`])
//! - The facade that sequences these against the external directory,
//!   predictor and scheduler ([`facade`])
//!
//! **No API concerns**: HTTP servers, serial transports, or storage backends
//! belong in `api-rest` and its collaborator implementations. The core talks
//! to the outside world only through the traits in [`services`].

pub mod config;
pub mod constants;
pub mod error;
pub mod facade;
pub mod identity;
pub mod services;
pub mod triage;
pub mod visits;
pub mod vitals;

pub use config::{primary_failure_policy_from_env_value, CoreConfig, PrimaryFailurePolicy};
pub use error::{DecisionError, DecisionResult};
pub use facade::{ClinicalDecisionFacade, Identity, PatientOverview, Role};
pub use identity::{IdentityResolver, ResolveOptions, Resolution};
pub use services::{
    AdviceEntry, PatientDirectory, PatientId, PatientRecord, PlannedVisit, PredictionRecord,
    RiskPredictor, ScheduleRequest, VisitScheduler, VisitStatus,
};
pub use triage::{explain, Tier, TriageAssessment};
pub use visits::{
    clinic_datetime, compute_window, resolve_next_date, validate_requested_next,
    validate_reschedule, VisitWindow,
};
pub use vitals::VitalsPayload;
