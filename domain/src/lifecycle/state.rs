//! Lifecycle states and the transition table.

use crate::core::error::LifecycleError;

/// Stage of a single toy run
///
/// ```text
/// Uninitialized → Declared → Resolved → CrossValidated → Built → Running → Destroyed
///        └──────────┴──────────┴─────────────┴────────────┴────────┴──→ Failed → Destroyed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LifecycleState {
    #[default]
    Uninitialized,
    Declared,
    Resolved,
    CrossValidated,
    Built,
    Running,
    Failed,
    Destroyed,
}

impl LifecycleState {
    pub fn as_str(&self) -> &str {
        match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::Declared => "declared",
            LifecycleState::Resolved => "resolved",
            LifecycleState::CrossValidated => "cross-validated",
            LifecycleState::Built => "built",
            LifecycleState::Running => "running",
            LifecycleState::Failed => "failed",
            LifecycleState::Destroyed => "destroyed",
        }
    }

    /// `Destroyed` is the only state with no way out
    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecycleState::Destroyed)
    }

    /// Whether `next` directly follows `self`
    pub fn can_transition_to(&self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        match (*self, next) {
            (Uninitialized, Declared)
            | (Declared, Resolved)
            | (Resolved, CrossValidated)
            | (CrossValidated, Built)
            | (Built, Running)
            | (Running, Destroyed)
            | (Failed, Destroyed) => true,
            (Failed, Failed) | (Destroyed, _) => false,
            (_, Failed) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tracks the current state of one run and every state it passed through.
///
/// A `Lifecycle` is never re-entered: once `Destroyed`, every transition is
/// rejected.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    state: LifecycleState,
    history: Vec<LifecycleState>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: LifecycleState::Uninitialized,
            history: vec![LifecycleState::Uninitialized],
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn history(&self) -> &[LifecycleState] {
        &self.history
    }

    /// Whether the run ever reached `state`
    pub fn has_visited(&self, state: LifecycleState) -> bool {
        self.history.contains(&state)
    }

    /// Move to `next`, rejecting transitions outside the table
    pub fn advance(&mut self, next: LifecycleState) -> Result<(), LifecycleError> {
        if !self.state.can_transition_to(next) {
            return Err(LifecycleError::IllegalTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        self.history.push(next);
        Ok(())
    }

    /// Move to `Failed` unless the run is already failed or destroyed
    pub fn fail(&mut self) {
        if self.state.can_transition_to(LifecycleState::Failed) {
            self.state = LifecycleState::Failed;
            self.history.push(LifecycleState::Failed);
        }
    }

    pub fn into_history(self) -> Vec<LifecycleState> {
        self.history
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LifecycleState::*;

    #[test]
    fn test_happy_path() {
        let mut lifecycle = Lifecycle::new();
        for next in [Declared, Resolved, CrossValidated, Built, Running, Destroyed] {
            lifecycle.advance(next).unwrap();
        }
        assert_eq!(lifecycle.state(), Destroyed);
        assert_eq!(lifecycle.history().len(), 7);
    }

    #[test]
    fn test_skipping_a_stage_is_rejected() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.advance(Declared).unwrap();
        let err = lifecycle.advance(Built).unwrap_err();
        assert_eq!(
            err,
            LifecycleError::IllegalTransition {
                from: Declared,
                to: Built
            }
        );
        assert_eq!(lifecycle.state(), Declared);
    }

    #[test]
    fn test_failed_reachable_from_every_non_terminal_state() {
        for state in [Uninitialized, Declared, Resolved, CrossValidated, Built, Running] {
            assert!(state.can_transition_to(Failed), "{state} -> failed");
        }
        assert!(!Destroyed.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(Failed));
    }

    #[test]
    fn test_failed_only_leads_to_destroyed() {
        assert!(Failed.can_transition_to(Destroyed));
        assert!(!Failed.can_transition_to(Running));
        assert!(!Failed.can_transition_to(Declared));
    }

    #[test]
    fn test_no_reentry_after_destroyed() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.fail();
        lifecycle.advance(Destroyed).unwrap();
        assert!(lifecycle.state().is_terminal());
        assert!(lifecycle.advance(Declared).is_err());
        lifecycle.fail();
        assert_eq!(lifecycle.state(), Destroyed);
    }

    #[test]
    fn test_fail_is_recorded_once() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.advance(Declared).unwrap();
        lifecycle.fail();
        lifecycle.fail();
        assert_eq!(lifecycle.history(), &[Uninitialized, Declared, Failed]);
        assert!(lifecycle.has_visited(Declared));
        assert!(!lifecycle.has_visited(Built));
    }
}
