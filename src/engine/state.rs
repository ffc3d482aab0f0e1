//! Tour navigation state machine
//!
//! ```text
//! Idle ──start──▶ ShowingStep(0) ──next/skip──▶ ShowingStep(i+1) ──▶ …
//!                      ▲  │                          │
//!                      └──┘ prev                     ├─finish / skip past last──▶ Completed
//!                                                    └─close / escape──────────▶ Aborted
//! Completed, Aborted ──start──▶ ShowingStep(0)
//! ```
//!
//! Only `Completed` persists the completion flag; `Aborted` leaves the tour
//! available for a later page load.

use std::fmt;
use strum::Display;
use thiserror::Error;

/// Where the tour is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TourState {
    /// No session has run yet
    #[default]
    Idle,
    /// Session active on step `i`
    ShowingStep(usize),
    /// Finished deliberately (terminal)
    Completed,
    /// Closed or escaped mid-tour (terminal)
    Aborted,
}

impl TourState {
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Aborted)
    }

    #[inline]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::ShowingStep(_))
    }

    pub const fn step(self) -> Option<usize> {
        match self {
            Self::ShowingStep(i) => Some(i),
            _ => None,
        }
    }

    /// Apply `event` to a script of `len` steps.
    ///
    /// # Errors
    ///
    /// - `EmptyScript` when starting a tour with no steps
    /// - `AlreadyActive` when starting while a step is showing
    /// - `NotActive` for navigation outside a session
    /// - `AtFirstStep` / `AtLastStep` when stepping past either end
    pub fn transition(self, event: NavEvent, len: usize) -> Result<TourState, TourTransitionError> {
        match (self, event) {
            (Self::ShowingStep(_), NavEvent::Start) => {
                Err(TourTransitionError::AlreadyActive { state: self })
            }
            (_, NavEvent::Start) if len == 0 => Err(TourTransitionError::EmptyScript),
            (_, NavEvent::Start) => Ok(Self::ShowingStep(0)),

            (Self::ShowingStep(i), NavEvent::Next) if i + 1 < len => Ok(Self::ShowingStep(i + 1)),
            (Self::ShowingStep(i), NavEvent::Next) => Err(TourTransitionError::AtLastStep { index: i }),

            (Self::ShowingStep(i), NavEvent::Skip) if i + 1 < len => Ok(Self::ShowingStep(i + 1)),
            (Self::ShowingStep(_), NavEvent::Skip) => Ok(Self::Completed),

            (Self::ShowingStep(0), NavEvent::Previous) => {
                Err(TourTransitionError::AtFirstStep)
            }
            (Self::ShowingStep(i), NavEvent::Previous) => Ok(Self::ShowingStep(i - 1)),

            (Self::ShowingStep(_), NavEvent::Finish) => Ok(Self::Completed),
            (Self::ShowingStep(_), NavEvent::Close | NavEvent::Escape) => Ok(Self::Aborted),

            (state, event) => Err(TourTransitionError::NotActive { state, event }),
        }
    }
}

impl fmt::Display for TourState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::ShowingStep(i) => write!(f, "showing step {}", i + 1),
            Self::Completed => write!(f, "completed"),
            Self::Aborted => write!(f, "aborted"),
        }
    }
}

/// Inputs to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum NavEvent {
    Start,
    Next,
    #[strum(serialize = "prev")]
    Previous,
    /// Target of the next step never appeared
    Skip,
    Finish,
    Close,
    Escape,
}

/// Illegal transitions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TourTransitionError {
    #[error("Cannot start a tour with no steps")]
    EmptyScript,

    #[error("A tour is already active ({state})")]
    AlreadyActive { state: TourState },

    #[error("Cannot {event} while {state}")]
    NotActive { state: TourState, event: NavEvent },

    #[error("Already at the first step")]
    AtFirstStep,

    #[error("Step {} is the last step", index + 1)]
    AtLastStep { index: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_from_idle_and_terminal_states() {
        for state in [TourState::Idle, TourState::Completed, TourState::Aborted] {
            assert_eq!(state.transition(NavEvent::Start, 3), Ok(TourState::ShowingStep(0)));
        }
        assert_eq!(
            TourState::Idle.transition(NavEvent::Start, 0),
            Err(TourTransitionError::EmptyScript)
        );
        assert!(matches!(
            TourState::ShowingStep(1).transition(NavEvent::Start, 3),
            Err(TourTransitionError::AlreadyActive { .. })
        ));
    }

    #[test]
    fn test_next_and_previous_bounds() {
        assert_eq!(
            TourState::ShowingStep(0).transition(NavEvent::Next, 3),
            Ok(TourState::ShowingStep(1))
        );
        assert_eq!(
            TourState::ShowingStep(2).transition(NavEvent::Next, 3),
            Err(TourTransitionError::AtLastStep { index: 2 })
        );
        assert_eq!(
            TourState::ShowingStep(2).transition(NavEvent::Previous, 3),
            Ok(TourState::ShowingStep(1))
        );
        assert_eq!(
            TourState::ShowingStep(0).transition(NavEvent::Previous, 3),
            Err(TourTransitionError::AtFirstStep)
        );
    }

    #[test]
    fn test_skip_past_last_completes() {
        assert_eq!(
            TourState::ShowingStep(1).transition(NavEvent::Skip, 3),
            Ok(TourState::ShowingStep(2))
        );
        assert_eq!(
            TourState::ShowingStep(2).transition(NavEvent::Skip, 3),
            Ok(TourState::Completed)
        );
    }

    #[test]
    fn test_close_and_escape_abort_anywhere() {
        for i in 0..3 {
            assert_eq!(TourState::ShowingStep(i).transition(NavEvent::Close, 3), Ok(TourState::Aborted));
            assert_eq!(TourState::ShowingStep(i).transition(NavEvent::Escape, 3), Ok(TourState::Aborted));
        }
    }

    #[test]
    fn test_navigation_outside_session_rejected() {
        let err = TourState::Idle.transition(NavEvent::Next, 3).unwrap_err();
        assert_eq!(err.to_string(), "Cannot next while idle");
        assert!(TourState::Completed.transition(NavEvent::Finish, 3).is_err());
        assert!(TourState::Aborted.transition(NavEvent::Escape, 3).is_err());
    }

    #[test]
    fn test_state_predicates() {
        assert!(TourState::Completed.is_terminal());
        assert!(TourState::Aborted.is_terminal());
        assert!(!TourState::Idle.is_terminal());
        assert!(TourState::ShowingStep(4).is_active());
        assert_eq!(TourState::ShowingStep(4).step(), Some(4));
        assert_eq!(TourState::ShowingStep(4).to_string(), "showing step 5");
    }
}
