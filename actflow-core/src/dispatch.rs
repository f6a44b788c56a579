//!
//! A dispatcher handles the scheduling and execution of activities.
//!
//! In all likelihood most users should use the dispatcher provided in
//! actflow-dispatch.  This trait should, however, create a common interface
//! for interfacing with any dispatcher that runs activities and allows users
//! to write their own dispatchers if desired.
//!

use crate::activity::Activity;

/// The current state a dispatcher is in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchState {
    /// The dispatcher is not currently polling activities.
    Stopped,
    /// The dispatcher is currently polling its activities.
    Running,
}

/// A dispatcher handles the scheduling and execution of activities.
///
/// Activities are cooperative: each poll runs its ready handlers to
/// completion before the dispatcher moves on to the next activity, so a
/// single dispatcher is a single logical scheduler no matter how many
/// activities are interleaved on it.
pub trait Dispatch {
    /// Add an activity directly to the dispatcher.
    fn spawn(&mut self, activity: Box<dyn Activity>);

    /// Run the poll loop for a set amount of time (in milliseconds).
    fn run_for_ms(&mut self, ms: u128);

    /// Run the poll loop until every spawned activity has completed and no
    /// new activities are waiting to be admitted.
    fn run_until_idle(&mut self);

    /// Run the poll loop until the dispatcher's interrupt is called.
    fn run_loop(&mut self);

    /// Check whether the dispatcher has been interrupted.
    ///
    /// Note: This should be called between each activity poll.
    fn check_interrupt(&mut self) -> bool;
}
