//!
//! The fault record partners answer requests with when something goes wrong.
//!

use thiserror::Error;

/// A partner-side failure, carried back to the requesting activity in place
/// of a success response.
///
/// Faults are terminal for the branch that caused them: the activity logs
/// the fault (or speaks a fallback phrase) and still decrements, it never
/// retries.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("partner fault: {reason}")]
pub struct Fault {
    /// The human-readable reason the partner reported.
    pub reason: String,
}

impl Fault {
    /// Create a fault with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// The error from posting into a port whose partner side has been dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("the partner side of this port is closed")]
pub struct PortClosed;
