#![forbid(unsafe_code)]

//! Errors surfaced by the binding layer.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Stale subject | Control dropped before a write or invocation | Write dropped, stream completes |
//! | Thread affinity | Disposal off the control's owning thread | Debug assertion |
//!
//! Redundant writes (value unchanged) are not errors; the two-way binding
//! suppresses them before they reach the external cell.

use std::thread::ThreadId;

use crate::control::ControlId;

/// Errors from binding operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// The control was dropped before the operation completed.
    StaleSubject {
        /// Identity of the control that is gone.
        control: ControlId,
    },
    /// An operation that must run on the control's owning thread ran
    /// somewhere else.
    ThreadAffinity { owner: ThreadId, current: ThreadId },
}

impl std::fmt::Display for BindError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StaleSubject { control } => {
                write!(f, "control {control} was dropped before the operation completed")
            }
            Self::ThreadAffinity { owner, current } => {
                write!(
                    f,
                    "control owned by thread {owner:?} accessed from thread {current:?}"
                )
            }
        }
    }
}

impl std::error::Error for BindError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_control() {
        let err = BindError::StaleSubject {
            control: ControlId::from_raw(12),
        };
        assert_eq!(
            err.to_string(),
            "control #12 was dropped before the operation completed"
        );
    }

    #[test]
    fn is_std_error() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&BindError::StaleSubject {
            control: ControlId::from_raw(1),
        });
    }
}
