//!
//! The grammar-load activity, run once at service start.
//!
//! Sends the grammar file location to the speech-recognizer partner and
//! waits for its success or fault response; either continuation announces
//! the outcome through the speech-output partner.  A fault is terminal for
//! the branch, never retried.
//!

use actflow_core::{Activity, ActivityStatus, Post, Requester};

use actflow_ports::{Fault, LocalPost, LocalRequester};

use actflow_sync::{Activation, CompletionHandle};

use tracing::error;

use crate::commands::{SayTextRequest, SetGrammarRequest};

/// The confirmation spoken when the grammar loads.
const LOADED_TEXT: &str = "I successfully loaded the speech grammar. What can I do for you now?";

/// The apology spoken, with the fault reason appended, when the grammar
/// fails to load.
const LOAD_FAILED_TEXT: &str = "Could not load the grammar file. The error is as follows: ";

/// The one-shot activity that configures the recognizer's grammar.
pub struct LoadGrammarActivity {
    activation: Activation,
    grammar: LocalRequester<SetGrammarRequest, Result<(), Fault>>,
    speech: LocalPost<SayTextRequest>,
}

impl LoadGrammarActivity {
    /// Send the grammar request for `file_location` and return the activity
    /// that awaits the partner's response.
    pub fn new(
        file_location: impl Into<String>,
        mut grammar: LocalRequester<SetGrammarRequest, Result<(), Fault>>,
        speech: LocalPost<SayTextRequest>,
    ) -> (Self, CompletionHandle) {
        let (activation, completion) = Activation::new();

        activation.increment();

        activation.increment();
        if let Err(error) = grammar.send_request(SetGrammarRequest {
            file_location: file_location.into(),
        }) {
            error!(%error, "grammar partner dropped a set-grammar request");
            activation.decrement();
        }

        activation.decrement();

        (
            Self {
                activation,
                grammar,
                speech,
            },
            completion,
        )
    }

    fn speak(&self, speech_text: String) {
        if let Err(error) = self.speech.post(SayTextRequest { speech_text }) {
            error!(%error, "speech partner dropped a say-text command");
        }
    }
}

impl Activity for LoadGrammarActivity {
    fn poll(&mut self) -> ActivityStatus {
        if self.activation.is_complete() {
            return ActivityStatus::Complete;
        }

        for response in self.grammar.poll_for_responses() {
            match response {
                Ok((_request, Ok(()))) => {
                    self.speak(LOADED_TEXT.to_string());
                }
                Ok((request, Err(fault))) => {
                    error!(
                        file_location = %request.file_location,
                        %fault,
                        "failed to load the speech grammar",
                    );
                    self.speak(format!("{LOAD_FAILED_TEXT}{}", fault.reason));
                }
                Err(error) => {
                    error!(%error, "grammar partner closed before responding");
                }
            }
            self.activation.decrement();
        }

        if self.activation.is_complete() {
            ActivityStatus::Complete
        } else {
            ActivityStatus::Pending
        }
    }
}
