//!
//! Partner Port Communication
//!
//! Partner ports are the message endpoints an activity posts commands to.
//! The port implementations themselves live outside the orchestration core;
//! an activity only ever holds a non-owning posting handle.
//!

/// The basic posting trait for fire-and-forget partner ports.
pub trait Post {
    /// The type of command posted through this port
    type Command;
    /// The error type from attempting to post a command
    type Error;

    /// Post a command to the partner this port belongs to.
    fn post(&self, command: Self::Command) -> Result<(), Self::Error>;
}

/// A requester sends a request to a partner and later polls for the
/// partner's success or fault response.
pub trait Requester {
    /// The type of request sent to the partner
    type Request;
    /// The type of response received from the partner
    type Response;
    /// The error type from sending a request
    type Error;

    /// Send a request to the partner this requester is associated with
    fn send_request(&mut self, request: Self::Request) -> Result<(), Self::Error>;

    /// Check for responses from the partner, containing both the sent
    /// request and the partner's response
    #[allow(clippy::type_complexity)]
    fn poll_for_responses(&mut self) -> Vec<Result<(Self::Request, Self::Response), Self::Error>>;
}
