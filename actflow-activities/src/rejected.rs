//!
//! The activity spawned for each rejected-speech notification.
//!
//! The rejection funnels into a single-slot join feeding the speech-output
//! partner.  A one-slot join is degenerate as synchronization goes, but it
//! keeps the rejected path on the same accounting contract as every other
//! handler: post paired with increment, consume paired with decrement.
//!

use actflow_core::{Activity, ActivityStatus, Post};

use actflow_ports::LocalPost;

use actflow_sync::{Activation, CompletionHandle, JoinBarrier, MergeFunnel};

use tracing::{debug, error};

use crate::{commands::SayTextRequest, recognition::Rejection, FALLBACK_TEXT};

/// One live response to a rejected-speech notification.
pub struct SpeechRejectedActivity {
    activation: Activation,
    rejected: MergeFunnel<Rejection>,
    say_join: JoinBarrier<String>,
}

impl SpeechRejectedActivity {
    /// Wire up the activity and run its entry against `message`.
    pub fn new(
        message: Rejection,
        speech: LocalPost<SayTextRequest>,
    ) -> (Self, CompletionHandle) {
        let (activation, completion) = Activation::new();

        let (say_join, say_slots) = {
            let activation = activation.clone();
            JoinBarrier::new(1, move |values: Vec<String>| {
                let consumed = values.len();
                for speech_text in values {
                    if let Err(error) = speech.post(SayTextRequest { speech_text }) {
                        error!(%error, "speech partner dropped a say-text command");
                    }
                }
                activation.decrement_by(consumed);
            })
        };
        activation.register_join(say_join.watch());

        let (rejected, rejected_post) = {
            let activation = activation.clone();
            MergeFunnel::new(move |rejection: Rejection| {
                debug!(text = %rejection.text, "utterance rejected by the grammar");

                activation.increment();
                say_slots.post(0, FALLBACK_TEXT.to_string());

                activation.decrement();
            })
        };

        activation.increment();

        activation.increment();
        rejected_post.post(message);

        activation.decrement();

        (
            Self {
                activation,
                rejected,
                say_join,
            },
            completion,
        )
    }
}

impl Activity for SpeechRejectedActivity {
    fn poll(&mut self) -> ActivityStatus {
        if self.activation.is_complete() {
            return ActivityStatus::Complete;
        }

        self.rejected.poll();
        self.say_join.poll();

        if self.activation.is_complete() {
            ActivityStatus::Complete
        } else {
            ActivityStatus::Pending
        }
    }
}
