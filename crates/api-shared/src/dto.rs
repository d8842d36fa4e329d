//! Wire DTOs for the REST surface.
//!
//! These mirror the JSON contract of the original clinic backend: dates as
//! ISO `YYYY-MM-DD`, timestamps as RFC 3339 strings, and the legacy resolve
//! response that degrades to an empty object when nothing matched.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Structured error body, `{"detail": "..."}` like the original backend.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub detail: String,
}

/// Resolve response. All fields absent means the term did not resolve;
/// the legacy contract answers `{}` rather than a 404 here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ResolveRes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A patient row in list responses.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PatientRow {
    pub id: i64,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

/// One advice note.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdviceRes {
    pub id: i64,
    pub patient_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Request body for attaching an advice note.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AdviceIn {
    pub advice: String,
}

/// Patient detail: directory record plus assessment, advice and visit plan.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PatientDetailRes {
    pub id: i64,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub next_visit: Option<NaiveDate>,
    pub appt_status: Option<String>,
    pub assessment: Option<AssessmentRes>,
    pub advice: Vec<AdviceRes>,
}

/// GH screening request: the vitals form plus an optional free-form patient
/// identifier to link the result to.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PredictReq {
    /// Free-form identifier (numeric ID or email). Optional: a screening
    /// may deliberately run unlinked.
    #[serde(default)]
    pub patient: Option<String>,
    /// Permit the directory to create a missing patient for an email-shaped
    /// identifier.
    #[serde(default)]
    pub create_if_missing: bool,
    pub age: i32,
    pub bmi: f64,
    pub systolic_bp: i32,
    pub diastolic_bp: i32,
    pub heart_rate: i32,
    #[serde(default)]
    pub previous_complications: bool,
    #[serde(default)]
    pub preexisting_diabetes: bool,
    #[serde(default)]
    pub gestational_diabetes: bool,
    #[serde(default)]
    pub mental_health: bool,
}

/// A merged triage assessment as rendered to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssessmentRes {
    pub patient_id: Option<i64>,
    pub tier: String,
    pub risk_class: String,
    pub risk_score: f64,
    pub priority: bool,
    pub reasons: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Request to record the next ANC visit.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ScheduleReq {
    pub patient_id: i64,
    pub last_visit: NaiveDate,
    #[serde(default)]
    pub requested_next: Option<NaiveDate>,
}

/// Confirmation of a recorded or moved visit.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VisitRes {
    pub ok: bool,
    pub next_visit: NaiveDate,
    pub status: String,
    pub scheduled_for: DateTime<Utc>,
}

/// Patient-initiated reschedule request.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RescheduleReq {
    pub patient_id: i64,
    pub new_date: NaiveDate,
}

/// Patient-side next-visit lookup. `next_visit: null` means none planned.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NextVisitRes {
    pub next_visit: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<DateTime<Utc>>,
}
