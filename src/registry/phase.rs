//! Injector lifecycle phases.

use serde::{Deserialize, Serialize};

/// Lifecycle of an injector. Moves forward one step at a time, never back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Injections may be registered.
    Registration,
    /// Registrations are being resolved and checked for duplicates.
    PreInjection,
    /// Synthetic types are installed into the host's type registry.
    InjectionPhase1,
    /// Biome spawn tables and the client-facing conversion layer are updated.
    InjectionPhase2,
    /// Done. Lookup tables are immutable.
    Injected,
}

impl Phase {
    /// Every phase in order.
    pub const ALL: [Phase; 5] = [
        Phase::Registration,
        Phase::PreInjection,
        Phase::InjectionPhase1,
        Phase::InjectionPhase2,
        Phase::Injected,
    ];

    /// The phase after this one.
    #[must_use]
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Registration => Some(Phase::PreInjection),
            Phase::PreInjection => Some(Phase::InjectionPhase1),
            Phase::InjectionPhase1 => Some(Phase::InjectionPhase2),
            Phase::InjectionPhase2 => Some(Phase::Injected),
            Phase::Injected => None,
        }
    }

    /// Upper-case name used in messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Phase::Registration => "REGISTRATION",
            Phase::PreInjection => "PRE_INJECTION",
            Phase::InjectionPhase1 => "INJECTION_PHASE_1",
            Phase::InjectionPhase2 => "INJECTION_PHASE_2",
            Phase::Injected => "INJECTED",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_walks_all_phases() {
        let mut walked = vec![Phase::Registration];
        while let Some(next) = walked.last().and_then(|p| p.next()) {
            walked.push(next);
        }
        assert_eq!(walked, Phase::ALL);
    }

    #[test]
    fn test_ordering_is_monotonic() {
        for pair in Phase::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Phase::InjectionPhase1.to_string(), "INJECTION_PHASE_1");
        assert_eq!(Phase::Injected.to_string(), "INJECTED");
    }
}
