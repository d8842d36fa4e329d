//! Clinical decision facade.
//!
//! Sequences the identity resolver, the triage explainer, and the visit
//! window calculator against the external collaborators. The facade performs
//! no business computation of its own beyond sequencing and merging; the
//! decision logic lives in [`crate::identity`], [`crate::triage`] and
//! [`crate::visits`].
//!
//! Every operation takes an explicit [`Identity`] (the acting user's email
//! and role) as a call parameter. The core never reads caller context from
//! ambient process state.

use crate::config::CoreConfig;
use crate::error::{DecisionError, DecisionResult};
use crate::identity::{IdentityResolver, ResolveOptions};
use crate::services::{
    AdviceEntry, PatientDirectory, PatientId, PatientRecord, PlannedVisit, RiskPredictor,
    ScheduleRequest, VisitScheduler,
};
use crate::triage::TriageAssessment;
use crate::visits;
use crate::vitals::VitalsPayload;
use anc_types::{AdviceText, RawIdentifier};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Role of the acting user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Clinician,
    Doctor,
    Admin,
}

/// Explicit caller context passed into every facade operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    pub role: Role,
}

impl Identity {
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            role,
        }
    }
}

/// Combined clinician view of one patient: directory record, advice,
/// latest assessment and the current visit plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientOverview {
    pub patient: PatientRecord,
    pub advice: Vec<AdviceEntry>,
    pub assessment: Option<TriageAssessment>,
    pub next_visit: Option<PlannedVisit>,
}

/// Orchestrates decision-support operations against the external directory,
/// predictor and scheduler.
pub struct ClinicalDecisionFacade<D, P, S> {
    directory: D,
    predictor: P,
    scheduler: S,
    cfg: Arc<CoreConfig>,
}

impl<D, P, S> ClinicalDecisionFacade<D, P, S>
where
    D: PatientDirectory,
    P: RiskPredictor,
    S: VisitScheduler,
{
    pub fn new(directory: D, predictor: P, scheduler: S, cfg: Arc<CoreConfig>) -> Self {
        Self {
            directory,
            predictor,
            scheduler,
            cfg,
        }
    }

    /// Resolves a raw identifier to a canonical patient identifier.
    ///
    /// # Errors
    ///
    /// See [`IdentityResolver::resolve`].
    pub fn resolve_patient(
        &self,
        identity: &Identity,
        raw: &RawIdentifier,
        options: ResolveOptions,
    ) -> DecisionResult<PatientId> {
        tracing::debug!(actor = %identity.email, term = %raw, "resolving patient identifier");
        IdentityResolver::new(&self.directory, self.cfg.primary_failure()).resolve(raw, options)
    }

    /// Screens a payload for an already-resolved (or deliberately unlinked)
    /// patient.
    ///
    /// The payload is validated before the predictor is contacted; an
    /// out-of-range field fails fast with no partial submission.
    pub fn screen(
        &self,
        identity: &Identity,
        patient: Option<PatientId>,
        payload: &VitalsPayload,
    ) -> DecisionResult<TriageAssessment> {
        payload.validate()?;
        tracing::debug!(actor = %identity.email, patient = ?patient, "submitting GH screening");
        let prediction = self.predictor.predict(patient, payload)?;
        Ok(TriageAssessment::from_prediction(
            patient,
            prediction,
            Some(payload),
        ))
    }

    /// Resolves an identifier and screens in one step.
    ///
    /// A clean resolution miss does not abort the screening: the assessment
    /// proceeds unlinked (`patient: None`), mirroring the clinician workflow
    /// where a prediction is still wanted for an unknown identifier. A
    /// transport-level resolution failure, by contrast, propagates.
    pub fn screen_by_identifier(
        &self,
        identity: &Identity,
        raw: &RawIdentifier,
        options: ResolveOptions,
        payload: &VitalsPayload,
    ) -> DecisionResult<TriageAssessment> {
        payload.validate()?;
        let patient = match self.resolve_patient(identity, raw, options) {
            Ok(id) => Some(id),
            Err(DecisionError::NotFound(_)) | Err(DecisionError::NotFoundAfterUnavailable { .. }) => {
                tracing::warn!(
                    actor = %identity.email,
                    term = %raw,
                    "identifier did not resolve; screening will not be linked to a patient"
                );
                None
            }
            Err(e) => return Err(e),
        };
        self.screen(identity, patient, payload)
    }

    /// Latest stored assessment for a patient, merged for display.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::NotFound`] when no prediction is stored.
    pub fn latest_assessment(
        &self,
        identity: &Identity,
        patient: PatientId,
    ) -> DecisionResult<TriageAssessment> {
        tracing::debug!(actor = %identity.email, %patient, "fetching latest assessment");
        let prediction = self
            .predictor
            .latest(patient)?
            .ok_or_else(|| DecisionError::NotFound(format!("no saved prediction for patient {patient}")))?;
        Ok(TriageAssessment::from_prediction(
            Some(patient),
            prediction,
            None,
        ))
    }

    /// Validates and records the next ANC visit for a patient.
    ///
    /// The requested date (when present) is checked against the 3-to-5-week
    /// window before the scheduler is contacted; absence books the earliest
    /// allowed day.
    pub fn schedule_visit(
        &self,
        identity: &Identity,
        request: &ScheduleRequest,
    ) -> DecisionResult<PlannedVisit> {
        let next = visits::resolve_next_date(request.last_visit, request.requested_next)?;
        self.directory
            .get_by_id(request.patient_id)?
            .ok_or_else(|| DecisionError::NotFound(format!("patient {}", request.patient_id)))?;
        tracing::info!(
            actor = %identity.email,
            patient = %request.patient_id,
            %next,
            "scheduling next ANC visit"
        );
        self.scheduler.schedule(request, next)
    }

    /// Validates and applies a patient-initiated reschedule.
    ///
    /// The proposed date must lie within the tolerance around the current
    /// plan; the current plan is fetched from the scheduler first.
    pub fn reschedule_visit(
        &self,
        identity: &Identity,
        patient: PatientId,
        proposed: NaiveDate,
    ) -> DecisionResult<PlannedVisit> {
        let current = self
            .scheduler
            .next_visit_for_patient(patient)?
            .ok_or_else(|| DecisionError::NotFound(format!("no appointment for patient {patient}")))?;
        visits::validate_reschedule(current.next_visit, proposed)?;
        tracing::info!(
            actor = %identity.email,
            %patient,
            from = %current.next_visit,
            to = %proposed,
            "rescheduling ANC visit"
        );
        self.scheduler.reschedule(patient, proposed)
    }

    /// Current visit plan looked up by patient email.
    pub fn next_visit_by_email(
        &self,
        identity: &Identity,
        email: &str,
    ) -> DecisionResult<Option<PlannedVisit>> {
        tracing::debug!(actor = %identity.email, "looking up next visit by email");
        self.scheduler.next_visit_by_email(email)
    }

    /// Directory record for a known patient.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::NotFound`] when the directory has no such
    /// patient.
    pub fn patient_record(
        &self,
        identity: &Identity,
        patient: PatientId,
    ) -> DecisionResult<PatientRecord> {
        tracing::debug!(actor = %identity.email, %patient, "fetching patient record");
        self.directory
            .get_by_id(patient)?
            .ok_or_else(|| DecisionError::NotFound(format!("patient {patient}")))
    }

    /// Combined clinician view of one patient.
    pub fn patient_overview(
        &self,
        identity: &Identity,
        patient: PatientId,
    ) -> DecisionResult<PatientOverview> {
        tracing::debug!(actor = %identity.email, %patient, "building patient overview");
        let record = self
            .directory
            .get_by_id(patient)?
            .ok_or_else(|| DecisionError::NotFound(format!("patient {patient}")))?;
        let advice = self.directory.list_advice(patient)?;
        let assessment = self
            .predictor
            .latest(patient)?
            .map(|prediction| TriageAssessment::from_prediction(Some(patient), prediction, None));
        let next_visit = self.scheduler.next_visit_for_patient(patient)?;
        Ok(PatientOverview {
            patient: record,
            advice,
            assessment,
            next_visit,
        })
    }

    /// Attaches an advice note to a patient.
    pub fn add_advice(
        &self,
        identity: &Identity,
        patient: PatientId,
        text: &AdviceText,
    ) -> DecisionResult<AdviceEntry> {
        tracing::info!(actor = %identity.email, %patient, "adding advice note");
        self.directory.add_advice(patient, text)
    }

    /// Advice notes for a patient, latest first.
    pub fn list_advice(
        &self,
        identity: &Identity,
        patient: PatientId,
    ) -> DecisionResult<Vec<AdviceEntry>> {
        tracing::debug!(actor = %identity.email, %patient, "listing advice notes");
        self.directory.list_advice(patient)
    }

    /// Lists directory patients, optionally filtered.
    pub fn list_patients(
        &self,
        identity: &Identity,
        query: Option<&str>,
    ) -> DecisionResult<Vec<PatientRecord>> {
        tracing::debug!(actor = %identity.email, query = ?query, "listing patients");
        self.directory.list(query)
    }
}
