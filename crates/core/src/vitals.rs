//! Vital-signs payload and pre-flight validation.
//!
//! The payload is validated against closed numeric ranges **before** any
//! collaborator is contacted, so an out-of-range value can never cause a
//! partial submission to the predictor or scheduler.

use crate::constants::{
    AGE_RANGE, BMI_RANGE, DIASTOLIC_BP_RANGE, HEART_RATE_RANGE, SYSTOLIC_BP_RANGE,
};
use crate::error::{DecisionError, DecisionResult};
use serde::{Deserialize, Serialize};

/// A single vital-signs and history observation for GH screening.
///
/// All numeric fields have closed valid ranges; one out-of-range field
/// invalidates the whole payload. History flags default to `false` when
/// absent from the wire form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalsPayload {
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

impl VitalsPayload {
    /// Validates every numeric field against its closed range.
    ///
    /// Fields are checked in declaration order and the first violation is
    /// reported, naming the field and the permitted range.
    ///
    /// # Errors
    ///
    /// Returns [`DecisionError::Validation`] for the first out-of-range
    /// field.
    pub fn validate(&self) -> DecisionResult<()> {
        check_range("age", f64::from(self.age), AGE_RANGE.0.into(), AGE_RANGE.1.into())?;
        check_range("bmi", self.bmi, BMI_RANGE.0, BMI_RANGE.1)?;
        check_range(
            "systolic_bp",
            f64::from(self.systolic_bp),
            SYSTOLIC_BP_RANGE.0.into(),
            SYSTOLIC_BP_RANGE.1.into(),
        )?;
        check_range(
            "diastolic_bp",
            f64::from(self.diastolic_bp),
            DIASTOLIC_BP_RANGE.0.into(),
            DIASTOLIC_BP_RANGE.1.into(),
        )?;
        check_range(
            "heart_rate",
            f64::from(self.heart_rate),
            HEART_RATE_RANGE.0.into(),
            HEART_RATE_RANGE.1.into(),
        )?;
        Ok(())
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> DecisionResult<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(DecisionError::Validation {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VitalsPayload {
        VitalsPayload {
            age: 28,
            bmi: 24.5,
            systolic_bp: 118,
            diastolic_bp: 76,
            heart_rate: 82,
            previous_complications: false,
            preexisting_diabetes: false,
            gestational_diabetes: false,
            mental_health: false,
        }
    }

    #[test]
    fn accepts_in_range_payload() {
        sample().validate().expect("payload should be valid");
    }

    #[test]
    fn boundaries_are_inclusive() {
        let mut p = sample();
        p.age = 10;
        p.bmi = 60.0;
        p.systolic_bp = 250;
        p.diastolic_bp = 40;
        p.heart_rate = 220;
        p.validate().expect("closed-range boundaries are valid");
    }

    #[test]
    fn rejects_out_of_range_field_naming_it() {
        let mut p = sample();
        p.diastolic_bp = 151;
        match p.validate() {
            Err(DecisionError::Validation { field, value, .. }) => {
                assert_eq!(field, "diastolic_bp");
                assert_eq!(value, 151.0);
            }
            other => panic!("expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_non_finite_bmi() {
        let mut p = sample();
        p.bmi = f64::NAN;
        assert!(p.validate().is_err());
    }

    #[test]
    fn history_flags_default_to_false_on_deserialize() {
        let p: VitalsPayload = serde_json::from_str(
            r#"{"age":30,"bmi":22.0,"systolic_bp":120,"diastolic_bp":80,"heart_rate":70}"#,
        )
        .expect("deserialize");
        assert!(!p.previous_complications);
        assert!(!p.mental_health);
    }
}
