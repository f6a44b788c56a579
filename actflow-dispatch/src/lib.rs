//!
//! Actflow-Dispatch provides the cooperative scheduler that drives
//! activities.
//!
//! A dispatcher is a single logical scheduler: it polls each spawned
//! activity in turn, each poll runs that activity's ready handlers to
//! completion, and activities that report completion are dropped.  Many
//! independent activities interleave on the same dispatcher, while
//! producers on other OS threads are free to post into their ports at any
//! time.
//!

#![deny(unsafe_code)]
#![deny(missing_docs)]

pub mod dispatcher;
pub use dispatcher::{Dispatcher, Spawner};
