use chrono::NaiveDate;

/// Errors produced by the decision-support core.
///
/// Every error carries enough structure for a caller to distinguish the
/// outcome kinds that matter clinically: a payload that must be corrected
/// (`Validation`, `MissingField`, `InvalidInput`), a lookup that cleanly
/// found nothing (`NotFound`, `NotFoundAfterUnavailable`), a scheduling
/// policy violation (`OutOfWindow`, `OutOfRange`), and a collaborator that
/// could not be reached (`Unavailable`). None of these may be collapsed into
/// a catch-all.
#[derive(Debug, thiserror::Error)]
pub enum DecisionError {
    #[error("{field} must be between {min} and {max} (got {value})")]
    Validation {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("required field missing: {0}")]
    MissingField(&'static str),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// Resolution exhausted all strategies, but at least one strategy was
    /// unavailable along the way. The detail of the last unavailable step is
    /// retained for diagnostics rather than discarded.
    #[error("not found: {term} (a lookup step was unavailable: {detail})")]
    NotFoundAfterUnavailable { term: String, detail: String },
    #[error("requested next visit {requested} outside allowed window {earliest} to {latest}")]
    OutOfWindow {
        requested: NaiveDate,
        earliest: NaiveDate,
        latest: NaiveDate,
    },
    #[error("proposed date {proposed} outside reschedule range {earliest} to {latest}")]
    OutOfRange {
        proposed: NaiveDate,
        earliest: NaiveDate,
        latest: NaiveDate,
    },
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

pub type DecisionResult<T> = std::result::Result<T, DecisionError>;
