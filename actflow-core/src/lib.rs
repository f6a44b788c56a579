//!
//! Actflow-Core is a collection of traits that layout the core of the
//! actflow activity orchestration framework.
//!

#![deny(unsafe_code)]
#![deny(missing_docs)]

pub mod activity;
pub use activity::{Activity, ActivityStatus};

pub mod dispatch;
pub use dispatch::{Dispatch, DispatchState};

pub mod port;
pub use port::{Post, Requester};
