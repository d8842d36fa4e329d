//! Constants used throughout the ANC core crate.
//!
//! This module contains the clinical policy constants so the scheduling and
//! validation rules are stated in one place.

/// Earliest allowed next ANC visit, in days after the last visit (3 weeks).
pub const NEXT_VISIT_EARLIEST_DAYS: u64 = 21;

/// Latest allowed next ANC visit, in days after the last visit (5 weeks).
pub const NEXT_VISIT_LATEST_DAYS: u64 = 35;

/// A reschedule may move an existing plan by at most this many days.
pub const RESCHEDULE_TOLERANCE_DAYS: u64 = 7;

/// Default clinic slot for booked visits (hour of day, UTC).
pub const CLINIC_VISIT_HOUR: u32 = 9;

/// Closed valid range for maternal age in years.
pub const AGE_RANGE: (i32, i32) = (10, 60);

/// Closed valid range for body-mass index.
pub const BMI_RANGE: (f64, f64) = (10.0, 60.0);

/// Closed valid range for systolic blood pressure (mmHg).
pub const SYSTOLIC_BP_RANGE: (i32, i32) = (60, 250);

/// Closed valid range for diastolic blood pressure (mmHg).
pub const DIASTOLIC_BP_RANGE: (i32, i32) = (40, 150);

/// Closed valid range for heart rate (bpm).
pub const HEART_RATE_RANGE: (i32, i32) = (40, 220);
