//! State machine trait for phase enums.
//!
//! Gives interaction phases (e.g. the manual reorder gesture) a uniform way to
//! validate transitions before they are taken.

use super::ValidationError;

/// Trait for enums that represent state machines.
///
/// Implementors define valid transitions and get a validated
/// `transition_to` for free.
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Toggle {
        Off,
        On,
    }

    impl StateMachine for Toggle {
        fn can_transition_to(&self, target: &Self) -> bool {
            self != target
        }

        fn valid_transitions(&self) -> Vec<Self> {
            match self {
                Toggle::Off => vec![Toggle::On],
                Toggle::On => vec![Toggle::Off],
            }
        }
    }

    #[test]
    fn transition_to_succeeds_for_valid_transition() {
        assert_eq!(Toggle::Off.transition_to(Toggle::On), Ok(Toggle::On));
    }

    #[test]
    fn transition_to_fails_for_self_loop() {
        let err = Toggle::On.transition_to(Toggle::On).unwrap_err();
        assert!(err.to_string().contains("Cannot transition from On to On"));
    }

    #[test]
    fn valid_transitions_lists_targets() {
        assert_eq!(Toggle::Off.valid_transitions(), vec![Toggle::On]);
    }
}
