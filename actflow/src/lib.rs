//!
//! # Actflow
//!
//! Actflow is an activity orchestration core for message-passing robotics
//! services.
//!
//! ## Description
//!
//! An actflow system is a set of partner services (drive controllers,
//! speech synthesizers, recognizers) wired together by activities: one
//! activity is spawned per inbound notification, branches into port posts,
//! and completes once every asynchronous branch it opened has drained.
//!
//! ## Technical Overview
//!
//! The moving parts are small and layered:
//!
//! * `actflow-sync` holds the completion-tracking primitives.  An
//!   [`Activation`](sync::Activation) reference-counts the outstanding
//!   branches of one live activity; a [`MergeFunnel`](sync::MergeFunnel)
//!   fires its handler once per posted value; a
//!   [`JoinBarrier`](sync::JoinBarrier) fires only when all of its slots
//!   hold a value, consuming one from each.  The activation will not
//!   declare completion while any of its registered joins is half full.
//! * `actflow-ports` carries command records to partners over local
//!   channels, fire-and-forget or with a success/fault response.
//! * `actflow-dispatch` is the cooperative scheduler: activities interleave
//!   on one dispatcher and every handler runs to completion before the next
//!   is polled.
//! * `actflow-activities` is the voice-drive activity set built on top of
//!   all of the above.
//!
//! Producers are free to post into ports from any thread; all of the
//! completion accounting is channel- and mutex-backed rather than
//! scheduler-thread-confined.
//!

#![deny(unsafe_code)]
#![deny(missing_docs)]

pub mod prelude;

/// Actflow Voice-Drive Activities
pub use actflow_activities as activities;
/// Actflow Core Traits
pub use actflow_core as core;
/// Actflow Dispatchers
pub use actflow_dispatch as dispatch;
/// Actflow Partner Ports
pub use actflow_ports as ports;
/// Actflow Synchronization Primitives
pub use actflow_sync as sync;
