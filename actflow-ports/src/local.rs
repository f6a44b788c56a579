//!
//! Local Partner Ports
//!
//! Local partner ports utilize crossbeam channels to carry command records
//! from activities to partners and responses from partners back to the
//! requesting activity.
//!

use crossbeam::channel::{self, Receiver, Sender};

use actflow_core::{Post, Requester};

use crate::fault::PortClosed;

/// The partner-side end of a fire-and-forget command port.
///
/// The partner (or a test standing in for one) polls the inbox for the
/// commands activities have posted.
pub struct LocalInbox<C> {
    rx: Receiver<C>,
    tx: Sender<C>,
}

impl<C> LocalInbox<C> {
    /// Create a new local inbox.
    pub fn new() -> Self {
        let (tx, rx) = channel::unbounded();
        Self { rx, tx }
    }

    /// Create a posting handle for this inbox.
    pub fn poster(&self) -> LocalPost<C> {
        LocalPost {
            tx: self.tx.clone(),
        }
    }

    /// Drain every command posted since the last poll, in post order.
    pub fn poll(&mut self) -> Vec<C> {
        self.rx.try_iter().collect()
    }
}

impl<C> Default for LocalInbox<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// A non-owning, clonable posting handle to a partner's local inbox.
pub struct LocalPost<C> {
    tx: Sender<C>,
}

impl<C> Clone for LocalPost<C> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<C> Post for LocalPost<C> {
    type Command = C;
    type Error = PortClosed;

    fn post(&self, command: Self::Command) -> Result<(), Self::Error> {
        self.tx.send(command).map_err(|_| PortClosed)
    }
}

/// A request a [`LocalResponder`] has received, along with its one-shot
/// reply handle.
pub struct Inbound<Req, Res> {
    /// The request body.
    pub body: Req,
    reply: Sender<(Req, Res)>,
}

impl<Req, Res> Inbound<Req, Res> {
    /// Answer the request, handing the body back to the requester together
    /// with the response.
    ///
    /// Replies after the requester has been discarded are dropped, matching
    /// the lifecycle of an already-completed activity.
    pub fn respond(self, response: Res) {
        let _ = self.reply.send((self.body, response));
    }
}

/// The partner-side end of a request/response port.
pub struct LocalResponder<Req, Res> {
    rx: Receiver<(Req, Sender<(Req, Res)>)>,
    tx: Sender<(Req, Sender<(Req, Res)>)>,
}

impl<Req, Res> LocalResponder<Req, Res> {
    /// Create a new local responder.
    pub fn new() -> Self {
        let (tx, rx) = channel::unbounded();
        Self { rx, tx }
    }

    /// Create a requester for this responder.
    ///
    /// Each requester receives only the responses to its own requests, no
    /// matter how many requesters share the responder.
    pub fn create_requester(&self) -> LocalRequester<Req, Res> {
        let (reply_tx, reply_rx) = channel::unbounded();
        LocalRequester {
            tx: self.tx.clone(),
            rx: reply_rx,
            reply_tx,
        }
    }

    /// Check for incoming requests along with their reply handles.
    pub fn poll_for_requests(&mut self) -> Vec<Inbound<Req, Res>> {
        self.rx
            .try_iter()
            .map(|(body, reply)| Inbound { body, reply })
            .collect()
    }
}

impl<Req, Res> Default for LocalResponder<Req, Res> {
    fn default() -> Self {
        Self::new()
    }
}

/// A local requester that sends requests to a partner and polls for the
/// partner's success or fault responses.
pub struct LocalRequester<Req, Res> {
    tx: Sender<(Req, Sender<(Req, Res)>)>,
    rx: Receiver<(Req, Res)>,
    reply_tx: Sender<(Req, Res)>,
}

impl<Req, Res> Requester for LocalRequester<Req, Res> {
    type Request = Req;
    type Response = Res;
    type Error = PortClosed;

    fn send_request(&mut self, request: Self::Request) -> Result<(), Self::Error> {
        self.tx
            .send((request, self.reply_tx.clone()))
            .map_err(|_| PortClosed)
    }

    fn poll_for_responses(&mut self) -> Vec<Result<(Self::Request, Self::Response), Self::Error>> {
        self.rx.try_iter().map(Ok).collect()
    }
}
