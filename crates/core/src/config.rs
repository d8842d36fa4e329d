//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process
//! startup and then passed into core services. The intent is to avoid reading
//! process-wide environment variables during request handling, which can lead
//! to inconsistent behaviour in multi-threaded runtimes and test harnesses.

/// How identifier resolution reacts when the primary directory-resolve step
/// fails at the transport level (as opposed to cleanly finding nothing).
///
/// The legacy behaviour swallowed such failures and carried on with the
/// narrower fallback lookups; some deployments prefer to surface the outage
/// immediately instead of answering from a degraded path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PrimaryFailurePolicy {
    /// Treat an unavailable primary step like a miss and advance to the
    /// fallback lookups (legacy behaviour).
    #[default]
    FallThrough,
    /// Propagate the unavailability to the caller without trying fallbacks.
    Abort,
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug, Default)]
pub struct CoreConfig {
    primary_failure: PrimaryFailurePolicy,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(primary_failure: PrimaryFailurePolicy) -> Self {
        Self { primary_failure }
    }

    pub fn primary_failure(&self) -> PrimaryFailurePolicy {
        self.primary_failure
    }
}

/// Interpret an environment-variable value as a [`PrimaryFailurePolicy`].
///
/// Intended for binaries that read `ANC_RESOLVER_STRICT` once at startup;
/// core code never reads the environment itself. Truthy values (`1`, `true`,
/// `yes`, case-insensitive) select [`PrimaryFailurePolicy::Abort`]; anything
/// else, including an unset variable, selects the legacy fall-through.
pub fn primary_failure_policy_from_env_value(value: Option<&str>) -> PrimaryFailurePolicy {
    match value {
        Some(v) if matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes") => {
            PrimaryFailurePolicy::Abort
        }
        _ => PrimaryFailurePolicy::FallThrough,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_value_maps_to_policy() {
        assert_eq!(
            primary_failure_policy_from_env_value(None),
            PrimaryFailurePolicy::FallThrough
        );
        assert_eq!(
            primary_failure_policy_from_env_value(Some("0")),
            PrimaryFailurePolicy::FallThrough
        );
        assert_eq!(
            primary_failure_policy_from_env_value(Some("true")),
            PrimaryFailurePolicy::Abort
        );
        assert_eq!(
            primary_failure_policy_from_env_value(Some(" YES ")),
            PrimaryFailurePolicy::Abort
        );
    }
}
