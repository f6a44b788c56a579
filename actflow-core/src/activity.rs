//!
//! A Single Live Workflow Instance.
//!
//! In actflow, an Activity is one live response to one inbound event.  When a
//! qualifying notification arrives, one Activity is created for it, wired up
//! with whatever merge funnels and join barriers its branching logic needs,
//! and handed to a dispatcher.  The dispatcher then polls the Activity until
//! it reports that every asynchronous branch it opened has drained, at which
//! point the Activity is discarded.
//!

/// The result of polling an activity once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivityStatus {
    /// The activity still has outstanding branches and should be polled again.
    Pending,
    /// The activity's completion signal has fired and it can be discarded.
    Complete,
}

/// An Activity represents one live instance of a triggered workflow.
///
/// Implementors typically perform their entry branching at construction time
/// and use `poll` to drive the handlers of their merge funnels and join
/// barriers until completion.
pub trait Activity: Send {
    /// Drive any handlers whose inputs have arrived since the last poll and
    /// report whether the activity has completed.
    ///
    /// Note: handlers run to completion inside this call.  A dispatcher must
    /// not poll the same activity from two threads at once.
    fn poll(&mut self) -> ActivityStatus;
}
