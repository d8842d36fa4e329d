//! Collaborator contracts consumed by the decision-support facade.
//!
//! The patient directory, the risk predictor, and the visit scheduler are
//! external systems. This module defines their abstract contracts plus the
//! record types that cross them; the core never talks to a transport
//! directly.
//!
//! Every lookup distinguishes a clean miss from an unreachable collaborator:
//! `Ok(None)` means "definitely not there", `Err(DecisionError::Unavailable)`
//! means "could not find out". The two must never be conflated.

use crate::error::DecisionResult;
use crate::vitals::VitalsPayload;
use anc_types::AdviceText;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Directory-assigned canonical patient identifier.
///
/// Once resolution succeeds the identifier is treated as immutable and passed
/// verbatim to every downstream call; it is never re-derived implicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(pub i64);

impl std::fmt::Display for PatientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PatientId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A patient row as held by the external directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: PatientId,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

/// A single clinician advice note attached to a patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceEntry {
    pub id: i64,
    pub patient_id: PatientId,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Output of the external GH risk predictor for one screening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub risk_class: String,
    pub risk_score: f64,
    #[serde(default)]
    pub priority: bool,
    #[serde(default)]
    pub reasons: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle state of a planned ANC visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitStatus {
    Scheduled,
    Completed,
    Rescheduled,
    Cancelled,
}

impl std::fmt::Display for VisitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            VisitStatus::Scheduled => "scheduled",
            VisitStatus::Completed => "completed",
            VisitStatus::Rescheduled => "rescheduled",
            VisitStatus::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

/// The next planned visit for a patient, as held by the scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedVisit {
    pub next_visit: NaiveDate,
    pub status: VisitStatus,
    /// Concrete booked slot (visit date at the default clinic hour).
    pub scheduled_for: DateTime<Utc>,
}

/// Request to record the next ANC visit for a patient.
///
/// Invariant: a present `requested_next` must fall inside the window derived
/// from `last_visit`; the facade validates this before the scheduler is
/// called.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub patient_id: PatientId,
    pub last_visit: NaiveDate,
    #[serde(default)]
    pub requested_next: Option<NaiveDate>,
}

/// The external patient directory.
pub trait PatientDirectory {
    /// Generic resolve over a free-form term. The authoritative path; may
    /// create a missing record when `allow_create` is true (the only
    /// mutating capability of the directory contract).
    fn resolve(&self, term: &str, allow_create: bool) -> DecisionResult<Option<PatientId>>;

    /// Direct lookup by canonical identifier.
    fn get_by_id(&self, id: PatientId) -> DecisionResult<Option<PatientRecord>>;

    /// Lookup by exact email (case-insensitive).
    fn get_by_email(&self, email: &str) -> DecisionResult<Option<PatientRecord>>;

    /// Lists patients, optionally filtered by a name/email substring.
    fn list(&self, query: Option<&str>) -> DecisionResult<Vec<PatientRecord>>;

    /// Attaches an advice note to a patient.
    fn add_advice(&self, id: PatientId, text: &AdviceText) -> DecisionResult<AdviceEntry>;

    /// Advice notes for a patient, latest first.
    fn list_advice(&self, id: PatientId) -> DecisionResult<Vec<AdviceEntry>>;
}

/// The external GH risk predictor service.
pub trait RiskPredictor {
    /// Submits a validated payload for scoring. When a patient is supplied
    /// the predictor persists the result against that patient.
    fn predict(
        &self,
        patient: Option<PatientId>,
        payload: &VitalsPayload,
    ) -> DecisionResult<PredictionRecord>;

    /// Most recent stored prediction for a patient, if any.
    fn latest(&self, patient: PatientId) -> DecisionResult<Option<PredictionRecord>>;
}

/// The external ANC visit scheduler.
pub trait VisitScheduler {
    /// Records the next visit. `next` is the concrete date already resolved
    /// and validated by the caller.
    fn schedule(&self, request: &ScheduleRequest, next: NaiveDate) -> DecisionResult<PlannedVisit>;

    /// Moves the current plan to `new_date`. Policy validation is the
    /// caller's responsibility.
    fn reschedule(&self, patient: PatientId, new_date: NaiveDate) -> DecisionResult<PlannedVisit>;

    /// Current plan for a patient, if any.
    fn next_visit_for_patient(&self, patient: PatientId) -> DecisionResult<Option<PlannedVisit>>;

    /// Current plan looked up by patient email (patient-side dashboard).
    fn next_visit_by_email(&self, email: &str) -> DecisionResult<Option<PlannedVisit>>;
}
