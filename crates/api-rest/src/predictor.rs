//! Deterministic stand-in for the external GH risk predictor.
//!
//! The real predictor is a separately deployed model service; this stub keeps
//! the demo server and the tests self-contained. It scores a payload by the
//! share of triage rules that fire and applies the same screen/priority
//! thresholds the production service is calibrated with, persisting the
//! result per patient exactly like the real service does.

use crate::store::InMemoryStore;
use anc_core::{explain, DecisionResult, PatientId, PredictionRecord, RiskPredictor, VitalsPayload};
use chrono::Utc;

/// Score at or above which a screening is classed "High".
pub const DEFAULT_SCREEN_THRESHOLD: f64 = 0.03;

/// Score at or above which a screening is marked priority.
pub const DEFAULT_PRIORITY_THRESHOLD: f64 = 0.26;

/// Number of independent triage rules; the score is the fired fraction.
const RULE_COUNT: f64 = 9.0;

/// Rule-fraction screening stub.
pub struct ScreeningStub {
    store: InMemoryStore,
    screen_threshold: f64,
    priority_threshold: f64,
}

impl ScreeningStub {
    pub fn new(store: InMemoryStore) -> Self {
        Self {
            store,
            screen_threshold: DEFAULT_SCREEN_THRESHOLD,
            priority_threshold: DEFAULT_PRIORITY_THRESHOLD,
        }
    }

    /// Overrides both thresholds; used by tests.
    pub fn with_thresholds(mut self, screen: f64, priority: f64) -> Self {
        self.screen_threshold = screen;
        self.priority_threshold = priority;
        self
    }
}

impl RiskPredictor for ScreeningStub {
    fn predict(
        &self,
        patient: Option<PatientId>,
        payload: &VitalsPayload,
    ) -> DecisionResult<PredictionRecord> {
        let reasons = explain(payload);
        let score = (reasons.len() as f64 / RULE_COUNT).min(1.0);
        let record = PredictionRecord {
            risk_class: if score >= self.screen_threshold {
                "High".into()
            } else {
                "Low".into()
            },
            risk_score: score,
            priority: score >= self.priority_threshold,
            reasons,
            created_at: Utc::now(),
        };
        if let Some(id) = patient {
            self.store.put_prediction(id, record.clone())?;
        }
        Ok(record)
    }

    fn latest(&self, patient: PatientId) -> DecisionResult<Option<PredictionRecord>> {
        self.store.latest_prediction(patient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_payload() -> VitalsPayload {
        VitalsPayload {
            age: 28,
            bmi: 24.0,
            systolic_bp: 118,
            diastolic_bp: 76,
            heart_rate: 72,
            previous_complications: false,
            preexisting_diabetes: false,
            gestational_diabetes: false,
            mental_health: false,
        }
    }

    #[test]
    fn no_fired_rules_is_a_low_class() {
        let stub = ScreeningStub::new(InMemoryStore::new());
        let record = stub.predict(None, &quiet_payload()).expect("predict");
        assert_eq!(record.risk_class, "Low");
        assert!(!record.priority);
        assert!(record.reasons.is_empty());
    }

    #[test]
    fn several_fired_rules_cross_the_priority_threshold() {
        let stub = ScreeningStub::new(InMemoryStore::new());
        let mut payload = quiet_payload();
        payload.systolic_bp = 150;
        payload.diastolic_bp = 95;
        // Fires SBP, DBP and the combined rule: 3/9 > 0.26.
        let record = stub.predict(None, &payload).expect("predict");
        assert_eq!(record.risk_class, "High");
        assert!(record.priority);
    }

    #[test]
    fn prediction_is_persisted_per_patient() {
        let store = InMemoryStore::new();
        let patient = store
            .insert_patient(Some("Amina Wanjiru"), None, None)
            .expect("insert");
        let stub = ScreeningStub::new(store);
        let mut payload = quiet_payload();
        payload.bmi = 36.0;
        stub.predict(Some(patient), &payload).expect("predict");
        let stored = stub
            .latest(patient)
            .expect("latest")
            .expect("stored prediction");
        assert_eq!(stored.reasons, vec!["BMI ≥ 35 (36)"]);
    }
}
