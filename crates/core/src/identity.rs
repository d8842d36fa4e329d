//! Identifier resolution against the patient directory.
//!
//! Turns a free-form identifier (numeric ID, email, or empty) into a
//! canonical [`PatientId`] by trying an ordered chain of strategies and
//! stopping at the first success:
//!
//! 1. empty input resolves to nothing without touching the directory,
//! 2. the directory's generic resolve capability (authoritative; may create
//!    a record when permitted),
//! 3. a direct by-ID lookup when the input is all digits,
//! 4. a by-email lookup when the input contains `@`.
//!
//! The fallbacks exist so resolution keeps working while the resolve
//! capability is degraded: each is a structurally narrower, cheaper lookup
//! than the primary. Strategies run strictly sequentially: only the primary
//! step may mutate, and running it concurrently with fallbacks could create
//! redundant records.

use crate::config::PrimaryFailurePolicy;
use crate::error::{DecisionError, DecisionResult};
use crate::services::{PatientDirectory, PatientId};
use anc_types::{IdentifierKind, RawIdentifier};

/// Options for a single resolution attempt.
///
/// Record creation is an explicit caller decision, never inferred from the
/// shape of the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    /// Permit the directory's resolve step to create a missing record.
    pub allow_create: bool,
}

/// Outcome of a single resolution strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(PatientId),
    NotFound,
    Unavailable(String),
}

/// Resolves raw identifiers through an ordered strategy chain.
pub struct IdentityResolver<'a, D: PatientDirectory + ?Sized> {
    directory: &'a D,
    primary_failure: PrimaryFailurePolicy,
}

impl<'a, D: PatientDirectory + ?Sized> IdentityResolver<'a, D> {
    pub fn new(directory: &'a D, primary_failure: PrimaryFailurePolicy) -> Self {
        Self {
            directory,
            primary_failure,
        }
    }

    /// Resolves `raw` to a canonical patient identifier.
    ///
    /// Strategies are tried in order and the chain short-circuits on the
    /// first success; once one strategy finds a patient, no further lookup
    /// runs. A strategy that is inapplicable to the input shape is skipped
    /// outright.
    ///
    /// # Errors
    ///
    /// - [`DecisionError::NotFound`] when every applicable strategy cleanly
    ///   found nothing (an empty identifier short-circuits here without any
    ///   directory call).
    /// - [`DecisionError::NotFoundAfterUnavailable`] when the chain was
    ///   exhausted but at least one step was unavailable; the last
    ///   unavailable detail is retained so the caller can tell "definitely
    ///   absent" from "possibly unreachable".
    /// - [`DecisionError::Unavailable`] when the primary step fails at the
    ///   transport level and the resolver is configured with
    ///   [`PrimaryFailurePolicy::Abort`].
    pub fn resolve(
        &self,
        raw: &RawIdentifier,
        options: ResolveOptions,
    ) -> DecisionResult<PatientId> {
        let kind = raw.kind();
        if kind == IdentifierKind::Empty {
            return Err(DecisionError::NotFound("empty identifier".into()));
        }

        let mut last_unavailable: Option<String> = None;

        match self.primary(raw, options) {
            Resolution::Found(id) => return Ok(id),
            Resolution::NotFound => {
                tracing::debug!(term = %raw, "directory resolve found nothing, trying fallbacks");
            }
            Resolution::Unavailable(detail) => {
                if self.primary_failure == PrimaryFailurePolicy::Abort {
                    return Err(DecisionError::Unavailable(detail));
                }
                tracing::warn!(
                    term = %raw,
                    detail = %detail,
                    "directory resolve unavailable, continuing with fallback lookups"
                );
                last_unavailable = Some(detail);
            }
        }

        if kind == IdentifierKind::Numeric {
            match self.by_id(raw) {
                Resolution::Found(id) => return Ok(id),
                Resolution::NotFound => {
                    tracing::debug!(term = %raw, "by-ID fallback found nothing");
                }
                Resolution::Unavailable(detail) => {
                    tracing::warn!(term = %raw, detail = %detail, "by-ID fallback unavailable");
                    last_unavailable = Some(detail);
                }
            }
        }

        if kind == IdentifierKind::Email {
            match self.by_email(raw) {
                Resolution::Found(id) => return Ok(id),
                Resolution::NotFound => {
                    tracing::debug!(term = %raw, "by-email fallback found nothing");
                }
                Resolution::Unavailable(detail) => {
                    tracing::warn!(term = %raw, detail = %detail, "by-email fallback unavailable");
                    last_unavailable = Some(detail);
                }
            }
        }

        match last_unavailable {
            Some(detail) => Err(DecisionError::NotFoundAfterUnavailable {
                term: raw.as_str().to_owned(),
                detail,
            }),
            None => Err(DecisionError::NotFound(raw.as_str().to_owned())),
        }
    }

    fn primary(&self, raw: &RawIdentifier, options: ResolveOptions) -> Resolution {
        match self.directory.resolve(raw.as_str(), options.allow_create) {
            Ok(Some(id)) => Resolution::Found(id),
            Ok(None) => Resolution::NotFound,
            Err(e) => Resolution::Unavailable(e.to_string()),
        }
    }

    fn by_id(&self, raw: &RawIdentifier) -> Resolution {
        // Classification guarantees digits, but the numeral may still not fit
        // an i64; such an input cannot name a directory row.
        let Ok(id) = raw.as_str().parse::<i64>() else {
            return Resolution::NotFound;
        };
        match self.directory.get_by_id(PatientId(id)) {
            Ok(Some(record)) => Resolution::Found(record.id),
            Ok(None) => Resolution::NotFound,
            Err(e) => Resolution::Unavailable(e.to_string()),
        }
    }

    fn by_email(&self, raw: &RawIdentifier) -> Resolution {
        match self.directory.get_by_email(raw.as_str()) {
            Ok(Some(record)) => Resolution::Found(record.id),
            Ok(None) => Resolution::NotFound,
            Err(e) => Resolution::Unavailable(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{AdviceEntry, PatientRecord};
    use anc_types::AdviceText;
    use std::cell::Cell;

    /// Scripted directory double that counts every call.
    #[derive(Default)]
    struct ScriptedDirectory {
        resolve_outcome: Option<fn() -> DecisionResult<Option<PatientId>>>,
        by_id_record: Option<PatientRecord>,
        by_email_record: Option<PatientRecord>,
        resolve_calls: Cell<usize>,
        by_id_calls: Cell<usize>,
        by_email_calls: Cell<usize>,
        creates: Cell<usize>,
    }

    fn record(id: i64) -> PatientRecord {
        PatientRecord {
            id: PatientId(id),
            full_name: Some("Amina Wanjiru".into()),
            email: Some("amina@example.org".into()),
            phone_number: None,
        }
    }

    impl PatientDirectory for ScriptedDirectory {
        fn resolve(&self, _term: &str, allow_create: bool) -> DecisionResult<Option<PatientId>> {
            self.resolve_calls.set(self.resolve_calls.get() + 1);
            let outcome = match self.resolve_outcome {
                Some(f) => f()?,
                None => None,
            };
            if outcome.is_none() && allow_create {
                self.creates.set(self.creates.get() + 1);
            }
            Ok(outcome)
        }

        fn get_by_id(&self, id: PatientId) -> DecisionResult<Option<PatientRecord>> {
            self.by_id_calls.set(self.by_id_calls.get() + 1);
            Ok(self.by_id_record.clone().filter(|r| r.id == id))
        }

        fn get_by_email(&self, email: &str) -> DecisionResult<Option<PatientRecord>> {
            self.by_email_calls.set(self.by_email_calls.get() + 1);
            Ok(self
                .by_email_record
                .clone()
                .filter(|r| r.email.as_deref() == Some(email)))
        }

        fn list(&self, _query: Option<&str>) -> DecisionResult<Vec<PatientRecord>> {
            Ok(vec![])
        }

        fn add_advice(&self, _id: PatientId, _text: &AdviceText) -> DecisionResult<AdviceEntry> {
            unimplemented!("not exercised by resolver tests")
        }

        fn list_advice(&self, _id: PatientId) -> DecisionResult<Vec<AdviceEntry>> {
            Ok(vec![])
        }
    }

    fn resolver(directory: &ScriptedDirectory) -> IdentityResolver<'_, ScriptedDirectory> {
        IdentityResolver::new(directory, PrimaryFailurePolicy::FallThrough)
    }

    #[test]
    fn empty_input_never_contacts_the_directory() {
        let dir = ScriptedDirectory::default();
        let err = resolver(&dir)
            .resolve(&RawIdentifier::new("   "), ResolveOptions::default())
            .expect_err("empty input must not resolve");
        assert!(matches!(err, DecisionError::NotFound(_)));
        assert_eq!(dir.resolve_calls.get(), 0);
        assert_eq!(dir.by_id_calls.get(), 0);
        assert_eq!(dir.by_email_calls.get(), 0);
    }

    #[test]
    fn primary_success_short_circuits_fallbacks() {
        let dir = ScriptedDirectory {
            resolve_outcome: Some(|| Ok(Some(PatientId(7)))),
            by_id_record: Some(record(7)),
            ..Default::default()
        };
        let id = resolver(&dir)
            .resolve(&RawIdentifier::new("7"), ResolveOptions::default())
            .expect("primary should resolve");
        assert_eq!(id, PatientId(7));
        assert_eq!(dir.by_id_calls.get(), 0);
        assert_eq!(dir.by_email_calls.get(), 0);
    }

    #[test]
    fn numeric_input_falls_back_to_by_id_lookup() {
        let dir = ScriptedDirectory {
            by_id_record: Some(record(42)),
            ..Default::default()
        };
        let id = resolver(&dir)
            .resolve(&RawIdentifier::new("42"), ResolveOptions::default())
            .expect("by-ID fallback should resolve");
        assert_eq!(id, PatientId(42));
        assert_eq!(dir.resolve_calls.get(), 1);
        assert_eq!(dir.by_id_calls.get(), 1);
        assert_eq!(dir.by_email_calls.get(), 0);
    }

    #[test]
    fn email_input_falls_back_to_by_email_lookup() {
        let dir = ScriptedDirectory {
            by_email_record: Some(record(9)),
            ..Default::default()
        };
        let id = resolver(&dir)
            .resolve(
                &RawIdentifier::new("amina@example.org"),
                ResolveOptions::default(),
            )
            .expect("by-email fallback should resolve");
        assert_eq!(id, PatientId(9));
        // The by-ID lookup is inapplicable to an email-shaped term.
        assert_eq!(dir.by_id_calls.get(), 0);
        assert_eq!(dir.by_email_calls.get(), 1);
    }

    #[test]
    fn unavailable_primary_falls_through_by_default() {
        let dir = ScriptedDirectory {
            resolve_outcome: Some(|| Err(DecisionError::Unavailable("directory down".into()))),
            by_id_record: Some(record(42)),
            ..Default::default()
        };
        let id = resolver(&dir)
            .resolve(&RawIdentifier::new("42"), ResolveOptions::default())
            .expect("fallback should still resolve");
        assert_eq!(id, PatientId(42));
    }

    #[test]
    fn unavailable_primary_aborts_under_strict_policy() {
        let dir = ScriptedDirectory {
            resolve_outcome: Some(|| Err(DecisionError::Unavailable("directory down".into()))),
            by_id_record: Some(record(42)),
            ..Default::default()
        };
        let strict = IdentityResolver::new(&dir, PrimaryFailurePolicy::Abort);
        let err = strict
            .resolve(&RawIdentifier::new("42"), ResolveOptions::default())
            .expect_err("strict policy must surface the outage");
        assert!(matches!(err, DecisionError::Unavailable(_)));
        assert_eq!(dir.by_id_calls.get(), 0);
    }

    #[test]
    fn exhausted_chain_retains_last_unavailable_detail() {
        let dir = ScriptedDirectory {
            resolve_outcome: Some(|| Err(DecisionError::Unavailable("directory down".into()))),
            ..Default::default()
        };
        let err = resolver(&dir)
            .resolve(&RawIdentifier::new("nobody@example.org"), ResolveOptions::default())
            .expect_err("nothing should resolve");
        match err {
            DecisionError::NotFoundAfterUnavailable { term, detail } => {
                assert_eq!(term, "nobody@example.org");
                assert!(detail.contains("directory down"));
            }
            other => panic!("expected NotFoundAfterUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn free_text_miss_is_a_plain_not_found() {
        let dir = ScriptedDirectory::default();
        let err = resolver(&dir)
            .resolve(&RawIdentifier::new("Amina W"), ResolveOptions::default())
            .expect_err("free text without a match must not resolve");
        assert!(matches!(err, DecisionError::NotFound(_)));
        // Neither narrow fallback applies to free text.
        assert_eq!(dir.by_id_calls.get(), 0);
        assert_eq!(dir.by_email_calls.get(), 0);
    }

    #[test]
    fn resolving_twice_without_allow_create_creates_nothing() {
        let dir = ScriptedDirectory {
            resolve_outcome: Some(|| Ok(Some(PatientId(5)))),
            ..Default::default()
        };
        let r = resolver(&dir);
        let opts = ResolveOptions {
            allow_create: false,
        };
        let first = r.resolve(&RawIdentifier::new("5"), opts).expect("resolve");
        let second = r.resolve(&RawIdentifier::new("5"), opts).expect("resolve");
        assert_eq!(first, second);
        assert_eq!(dir.creates.get(), 0);
    }

    #[test]
    fn overlong_numeral_skips_the_by_id_lookup() {
        let dir = ScriptedDirectory::default();
        let err = resolver(&dir)
            .resolve(
                &RawIdentifier::new("99999999999999999999999999"),
                ResolveOptions::default(),
            )
            .expect_err("should not resolve");
        assert!(matches!(err, DecisionError::NotFound(_)));
        assert_eq!(dir.by_id_calls.get(), 0);
    }
}
