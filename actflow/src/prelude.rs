//!
//! The actflow prelude re-exports the types most systems need to spawn and
//! drive activities.
//!

pub use actflow_core::{Activity, ActivityStatus, Dispatch, DispatchState, Post, Requester};

pub use actflow_sync::{Activation, CompletionHandle, JoinBarrier, JoinSlots, MergeFunnel, MergePost};

pub use actflow_ports::{
    Fault, Inbound, LocalInbox, LocalPost, LocalRequester, LocalResponder, PortClosed,
};

pub use actflow_dispatch::{Dispatcher, Spawner};
