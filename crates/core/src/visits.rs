//! ANC visit window computation and scheduling policy validation.
//!
//! All arithmetic is calendar-day based; there is no time-of-day component
//! in the policy itself. The booked slot ([`clinic_datetime`]) is a calendar
//! convenience applied after the policy has been satisfied.

use crate::constants::{
    CLINIC_VISIT_HOUR, NEXT_VISIT_EARLIEST_DAYS, NEXT_VISIT_LATEST_DAYS, RESCHEDULE_TOLERANCE_DAYS,
};
use crate::error::{DecisionError, DecisionResult};
use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// The clinically allowed date range for the next ANC visit, both ends
/// inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitWindow {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
}

impl VisitWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.earliest <= date && date <= self.latest
    }
}

/// Computes the allowed next-visit window from the last visit date:
/// 3 to 5 weeks later, inclusive.
///
/// # Errors
///
/// Returns [`DecisionError::InvalidInput`] if the date arithmetic leaves the
/// representable calendar range.
pub fn compute_window(last_visit: NaiveDate) -> DecisionResult<VisitWindow> {
    let earliest = add_days(last_visit, NEXT_VISIT_EARLIEST_DAYS)?;
    let latest = add_days(last_visit, NEXT_VISIT_LATEST_DAYS)?;
    Ok(VisitWindow { earliest, latest })
}

/// Validates an optional requested next-visit date against the window
/// derived from `last_visit`.
///
/// Absence is always acceptable: the next-visit date is optional and a
/// default is derived elsewhere ([`resolve_next_date`]).
///
/// # Errors
///
/// Returns [`DecisionError::OutOfWindow`] when a present date falls outside
/// the inclusive window.
pub fn validate_requested_next(
    last_visit: NaiveDate,
    requested: Option<NaiveDate>,
) -> DecisionResult<()> {
    let Some(requested) = requested else {
        return Ok(());
    };
    let window = compute_window(last_visit)?;
    if !window.contains(requested) {
        return Err(DecisionError::OutOfWindow {
            requested,
            earliest: window.earliest,
            latest: window.latest,
        });
    }
    Ok(())
}

/// Resolves the concrete next-visit date for a scheduling request.
///
/// A present requested date is validated against the window and used as-is;
/// absence defaults to the earliest allowed day.
pub fn resolve_next_date(
    last_visit: NaiveDate,
    requested: Option<NaiveDate>,
) -> DecisionResult<NaiveDate> {
    validate_requested_next(last_visit, requested)?;
    match requested {
        Some(date) => Ok(date),
        None => Ok(compute_window(last_visit)?.earliest),
    }
}

/// Validates a patient-initiated reschedule of an existing plan.
///
/// Rescheduling is a small adjustment to an existing plan, not the selection
/// of a fresh window: the proposed date must lie within the current plan
/// plus or minus the tolerance, inclusive.
///
/// # Errors
///
/// Returns [`DecisionError::OutOfRange`] when the proposed date falls
/// outside the tolerance range.
pub fn validate_reschedule(current_planned: NaiveDate, proposed: NaiveDate) -> DecisionResult<()> {
    let earliest = sub_days(current_planned, RESCHEDULE_TOLERANCE_DAYS)?;
    let latest = add_days(current_planned, RESCHEDULE_TOLERANCE_DAYS)?;
    if proposed < earliest || proposed > latest {
        return Err(DecisionError::OutOfRange {
            proposed,
            earliest,
            latest,
        });
    }
    Ok(())
}

/// The concrete booked slot for a visit date: the default clinic hour, UTC.
pub fn clinic_datetime(date: NaiveDate) -> DateTime<Utc> {
    let slot = NaiveTime::from_hms_opt(CLINIC_VISIT_HOUR, 0, 0).unwrap_or_default();
    date.and_time(slot).and_utc()
}

fn add_days(date: NaiveDate, days: u64) -> DecisionResult<NaiveDate> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| DecisionError::InvalidInput(format!("date out of range: {date} + {days}d")))
}

fn sub_days(date: NaiveDate, days: u64) -> DecisionResult<NaiveDate> {
    date.checked_sub_days(Days::new(days))
        .ok_or_else(|| DecisionError::InvalidInput(format!("date out of range: {date} - {days}d")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn window_is_three_to_five_weeks_inclusive() {
        let window = compute_window(date(2024, 1, 1)).expect("window");
        assert_eq!(window.earliest, date(2024, 1, 22));
        assert_eq!(window.latest, date(2024, 2, 5));
        assert!(window.contains(window.earliest));
        assert!(window.contains(window.latest));
        assert!(!window.contains(date(2024, 1, 21)));
        assert!(!window.contains(date(2024, 2, 6)));
    }

    #[test]
    fn absent_requested_date_is_always_ok() {
        validate_requested_next(date(2024, 1, 1), None).expect("absent is Ok");
    }

    #[test]
    fn requested_date_is_checked_against_the_window() {
        match validate_requested_next(date(2024, 1, 1), Some(date(2024, 1, 20))) {
            Err(DecisionError::OutOfWindow {
                requested,
                earliest,
                latest,
            }) => {
                assert_eq!(requested, date(2024, 1, 20));
                assert_eq!(earliest, date(2024, 1, 22));
                assert_eq!(latest, date(2024, 2, 5));
            }
            other => panic!("expected OutOfWindow, got {other:?}"),
        }
        validate_requested_next(date(2024, 1, 1), Some(date(2024, 1, 25))).expect("inside window");
    }

    #[test]
    fn next_date_defaults_to_the_earliest_window_day() {
        assert_eq!(
            resolve_next_date(date(2024, 1, 1), None).expect("default"),
            date(2024, 1, 22)
        );
        assert_eq!(
            resolve_next_date(date(2024, 1, 1), Some(date(2024, 2, 5))).expect("requested"),
            date(2024, 2, 5)
        );
    }

    #[test]
    fn reschedule_tolerance_is_seven_days_inclusive() {
        validate_reschedule(date(2024, 2, 1), date(2024, 2, 6)).expect("within tolerance");
        validate_reschedule(date(2024, 2, 1), date(2024, 1, 25)).expect("lower bound");
        validate_reschedule(date(2024, 2, 1), date(2024, 2, 8)).expect("upper bound");
        match validate_reschedule(date(2024, 2, 1), date(2024, 2, 10)) {
            Err(DecisionError::OutOfRange { proposed, .. }) => {
                assert_eq!(proposed, date(2024, 2, 10));
            }
            other => panic!("expected OutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn window_crosses_month_and_year_boundaries() {
        let window = compute_window(date(2023, 12, 15)).expect("window");
        assert_eq!(window.earliest, date(2024, 1, 5));
        assert_eq!(window.latest, date(2024, 1, 19));
    }

    #[test]
    fn booked_slot_is_the_default_clinic_hour() {
        let dt = clinic_datetime(date(2024, 1, 22));
        assert_eq!(dt.to_rfc3339(), "2024-01-22T09:00:00+00:00");
    }
}
