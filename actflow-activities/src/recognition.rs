//!
//! Notification payloads from the speech-recognizer partner.
//!

use std::collections::HashMap;

/// The semantic key carrying the kind of movement ("Move" or "Stop").
pub const TYPE_OF_MOVING: &str = "TypeOfMoving";

/// The semantic key carrying the direction of a "Move" command.
pub const MOVING_DIRECTION: &str = "MovingDirection";

/// A successful recognition notification: the recognized text, the
/// recognizer's confidence, and the key/value semantic slots the grammar
/// extracted from the utterance.
#[derive(Clone, Debug, PartialEq)]
pub struct Recognition {
    /// The recognized utterance.
    pub text: String,
    /// The recognizer's confidence in `[0.0, 1.0]`.
    pub confidence: f64,
    /// The semantic slots extracted by the grammar.
    pub semantics: HashMap<String, String>,
}

impl Recognition {
    /// Look up a semantic slot by key.
    pub fn semantic(&self, key: &str) -> Option<&str> {
        self.semantics.get(key).map(String::as_str)
    }
}

/// A rejection notification: the recognizer heard something it could not
/// match against the loaded grammar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rejection {
    /// The raw transcription of the unmatched utterance, if any.
    pub text: String,
}

/// A notification from the speech-recognizer partner.
#[derive(Clone, Debug, PartialEq)]
pub enum RecognitionEvent {
    /// An utterance was matched against the grammar.
    Recognized(Recognition),
    /// An utterance could not be matched against the grammar.
    Rejected(Rejection),
}
