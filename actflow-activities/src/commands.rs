//!
//! The command records posted to partner ports.
//!
//! These are the outbound boundary of the activity set: fire-and-forget
//! records for the speech-output and differential-drive partners, and the
//! request record for the grammar-configuration partner (which answers with
//! a success or fault response).
//!

/// A request for the speech-output partner to speak a phrase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SayTextRequest {
    /// The text to speak.
    pub speech_text: String,
}

/// A request for the differential-drive partner to set its wheel powers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SetDrivePowerRequest {
    /// Power applied to the left wheel, in `[-1.0, 1.0]`.
    pub left_wheel_power: f64,
    /// Power applied to the right wheel, in `[-1.0, 1.0]`.
    pub right_wheel_power: f64,
}

/// A request for the speech-recognizer partner to load a grammar file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetGrammarRequest {
    /// The location of the grammar file to load.
    pub file_location: String,
}
