//!
//! Actflow-Sync provides the completion-tracking primitives that activities
//! are built out of.
//!
//! Every activity opens some number of asynchronous branches in response to
//! an inbound event.  Each branch is accounted for by an [`Activation`]
//! reference count, delivered through either a [`MergeFunnel`] (fire per
//! arrival) or a [`JoinBarrier`] (fire once per full set of arrivals), and
//! the activation signals completion exactly once when every branch has
//! drained.  The only subtle part is not declaring completion while a join
//! is half full and still waiting on its partner branch, which is what the
//! outstanding-join offset in [`Activation::decrement`] is for.
//!

#![deny(unsafe_code)]
#![deny(missing_docs)]

pub mod activation;
pub use activation::{Activation, CompletionHandle, JoinWatch};

pub mod join;
pub use join::{JoinBarrier, JoinSlots};

pub mod merge;
pub use merge::{MergeFunnel, MergePost};
