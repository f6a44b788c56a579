//!
//! Actflow-Ports provides local (in-process) partner port implementations.
//!
//! A partner port is the boundary of the orchestration core: activities post
//! command records to partners (a drive controller, a speech synthesizer)
//! and never own the partner's lifecycle.  The local ports here carry
//! commands over crossbeam channels so partners can live on any thread.
//!

#![deny(unsafe_code)]
#![deny(missing_docs)]

pub mod fault;
pub use fault::{Fault, PortClosed};

pub mod local;
pub use local::{Inbound, LocalInbox, LocalPost, LocalRequester, LocalResponder};
