//!
//! Actflow-Activities provides the voice-drive activity set: the workflow
//! instances spawned in response to speech-recognizer notifications, wired
//! out of the actflow-sync completion-tracking primitives.
//!
//! The set covers one spoken-command robot: recognized speech is branched
//! into drive commands through a keyword/recognition join, rejected or
//! low-confidence speech funnels into a spoken fallback, and a grammar-load
//! activity runs at service start before any notification is handled.
//!

#![deny(unsafe_code)]
#![deny(missing_docs)]

pub mod commands;
pub use commands::{SayTextRequest, SetDrivePowerRequest, SetGrammarRequest};

pub mod recognition;
pub use recognition::{Recognition, RecognitionEvent, Rejection};

pub mod recognized;
pub use recognized::SpeechRecognizedActivity;

pub mod rejected;
pub use rejected::SpeechRejectedActivity;

pub mod grammar;
pub use grammar::LoadGrammarActivity;

pub mod service;
pub use service::VoiceDriveService;

/// The phrase spoken whenever an utterance cannot be turned into a command.
pub(crate) const FALLBACK_TEXT: &str = "I did not understand you.";
