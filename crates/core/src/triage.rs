//! GH triage explanation and priority tier.
//!
//! [`explain`] is a pure, total function over a validated payload: a fixed,
//! ordered rule set where each matching rule appends exactly one reason.
//! Rules are independent and may co-fire (the combined SBP/DBP rule fires in
//! addition to the single-measurement rules), so the same measurement can
//! legitimately produce several reasons. Output order is evaluation order,
//! never alphabetical, so the explanation is stable across runs.

use crate::services::{PatientId, PredictionRecord};
use crate::vitals::VitalsPayload;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Priority classification of a triage result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    Low,
    ScreenedHigh,
    PriorityHigh,
}

impl Tier {
    /// Derives the tier from predictor output.
    ///
    /// A priority mark wins outright, even when the predictor's class string
    /// says otherwise; a `"High"` class without priority is screened-high;
    /// everything else is low.
    pub fn derive(priority: bool, risk_class: &str) -> Self {
        if priority {
            Tier::PriorityHigh
        } else if risk_class == "High" {
            Tier::ScreenedHigh
        } else {
            Tier::Low
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Tier::Low => "Low",
            Tier::ScreenedHigh => "ScreenedHigh",
            Tier::PriorityHigh => "PriorityHigh",
        };
        write!(f, "{s}")
    }
}

/// Produces the ordered list of human-readable flag reasons for a payload.
///
/// Evaluation order is fixed: blood-pressure rules, BMI, age, then the four
/// history flags in their declared order. Each matching rule contributes
/// exactly one reason with the measured value embedded.
pub fn explain(p: &VitalsPayload) -> Vec<String> {
    let mut reasons = Vec::new();
    if p.systolic_bp >= 140 {
        reasons.push(format!("SBP ≥ 140 ({})", p.systolic_bp));
    }
    if p.diastolic_bp >= 90 {
        reasons.push(format!("DBP ≥ 90 ({})", p.diastolic_bp));
    }
    if p.systolic_bp >= 130 && p.diastolic_bp >= 85 {
        reasons.push(format!(
            "SBP ≥ 130 & DBP ≥ 85 ({}/{})",
            p.systolic_bp, p.diastolic_bp
        ));
    }
    if p.bmi >= 35.0 {
        reasons.push(format!("BMI ≥ 35 ({})", p.bmi));
    }
    if p.age < 18 || p.age > 40 {
        reasons.push(format!("Age high-risk ({})", p.age));
    }
    if p.previous_complications {
        reasons.push("Previous complications".to_owned());
    }
    if p.preexisting_diabetes {
        reasons.push("Pre-existing diabetes".to_owned());
    }
    if p.gestational_diabetes {
        reasons.push("Gestational diabetes".to_owned());
    }
    if p.mental_health {
        reasons.push("Mental health comorbidity".to_owned());
    }
    reasons
}

/// A merged, display-ready triage result.
///
/// Combines predictor output with the local explanation: the predictor's own
/// reason list takes precedence when non-empty, otherwise the local engine
/// acts as the fallback explainer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageAssessment {
    /// Canonical patient the screening was linked to, if resolution
    /// succeeded (the caller may deliberately screen unlinked).
    pub patient: Option<PatientId>,
    pub tier: Tier,
    pub risk_class: String,
    /// Predictor score, rounded to three decimals for display.
    pub risk_score: f64,
    pub priority: bool,
    pub reasons: Vec<String>,
    pub assessed_at: DateTime<Utc>,
}

impl TriageAssessment {
    /// Builds an assessment from predictor output, falling back to the local
    /// explanation when the predictor gave no reasons and the screened
    /// payload is at hand.
    pub fn from_prediction(
        patient: Option<PatientId>,
        prediction: PredictionRecord,
        payload: Option<&VitalsPayload>,
    ) -> Self {
        let reasons = if !prediction.reasons.is_empty() {
            prediction.reasons
        } else if let Some(p) = payload {
            explain(p)
        } else {
            Vec::new()
        };

        Self {
            patient,
            tier: Tier::derive(prediction.priority, &prediction.risk_class),
            risk_class: prediction.risk_class,
            risk_score: round3(prediction.risk_score),
            priority: prediction.priority,
            reasons,
            assessed_at: prediction.created_at,
        }
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> VitalsPayload {
        VitalsPayload {
            age: 25,
            bmi: 20.0,
            systolic_bp: 145,
            diastolic_bp: 92,
            heart_rate: 80,
            previous_complications: true,
            preexisting_diabetes: false,
            gestational_diabetes: false,
            mental_health: false,
        }
    }

    #[test]
    fn reasons_are_ordered_and_co_fire() {
        assert_eq!(
            explain(&payload()),
            vec![
                "SBP ≥ 140 (145)",
                "DBP ≥ 90 (92)",
                "SBP ≥ 130 & DBP ≥ 85 (145/92)",
                "Previous complications",
            ]
        );
    }

    #[test]
    fn explain_is_deterministic() {
        let p = payload();
        assert_eq!(explain(&p), explain(&p));
    }

    #[test]
    fn unremarkable_payload_yields_no_reasons() {
        let p = VitalsPayload {
            age: 28,
            bmi: 24.0,
            systolic_bp: 118,
            diastolic_bp: 76,
            heart_rate: 72,
            previous_complications: false,
            preexisting_diabetes: false,
            gestational_diabetes: false,
            mental_health: false,
        };
        assert!(explain(&p).is_empty());
    }

    #[test]
    fn history_flags_keep_declaration_order() {
        let p = VitalsPayload {
            age: 30,
            bmi: 22.0,
            systolic_bp: 110,
            diastolic_bp: 70,
            heart_rate: 75,
            previous_complications: true,
            preexisting_diabetes: true,
            gestational_diabetes: true,
            mental_health: true,
        };
        assert_eq!(
            explain(&p),
            vec![
                "Previous complications",
                "Pre-existing diabetes",
                "Gestational diabetes",
                "Mental health comorbidity",
            ]
        );
    }

    #[test]
    fn age_rule_fires_on_both_extremes() {
        let mut p = payload();
        p.systolic_bp = 110;
        p.diastolic_bp = 70;
        p.previous_complications = false;
        p.age = 17;
        assert_eq!(explain(&p), vec!["Age high-risk (17)"]);
        p.age = 41;
        assert_eq!(explain(&p), vec!["Age high-risk (41)"]);
        p.age = 18;
        assert!(explain(&p).is_empty());
        p.age = 40;
        assert!(explain(&p).is_empty());
    }

    #[test]
    fn priority_mark_outranks_risk_class() {
        assert_eq!(Tier::derive(true, "Low"), Tier::PriorityHigh);
        assert_eq!(Tier::derive(false, "High"), Tier::ScreenedHigh);
        assert_eq!(Tier::derive(false, "Low"), Tier::Low);
        assert_eq!(Tier::derive(false, "Moderate"), Tier::Low);
    }

    #[test]
    fn predictor_reasons_take_precedence_when_present() {
        let prediction = PredictionRecord {
            risk_class: "High".into(),
            risk_score: 0.31459,
            priority: false,
            reasons: vec!["model: elevated trajectory".into()],
            created_at: Utc::now(),
        };
        let p = payload();
        let assessment = TriageAssessment::from_prediction(None, prediction, Some(&p));
        assert_eq!(assessment.reasons, vec!["model: elevated trajectory"]);
        assert_eq!(assessment.tier, Tier::ScreenedHigh);
        assert_eq!(assessment.risk_score, 0.315);
    }

    #[test]
    fn empty_predictor_reasons_fall_back_to_local_explanation() {
        let prediction = PredictionRecord {
            risk_class: "Low".into(),
            risk_score: 0.01,
            priority: false,
            reasons: vec![],
            created_at: Utc::now(),
        };
        let p = payload();
        let assessment = TriageAssessment::from_prediction(Some(PatientId(3)), prediction, Some(&p));
        assert_eq!(assessment.reasons, explain(&p));
        assert_eq!(assessment.tier, Tier::Low);
        assert_eq!(assessment.patient, Some(PatientId(3)));
    }
}
