//!
//! The activity spawned for each recognized-speech notification.
//!
//! Branching graph: high-confidence recognitions post into a two-slot join
//! of movement keyword and full recognition record; the join handler turns
//! the spoken direction into drive powers.  "Stop" short-circuits straight
//! to a zero-power drive command, and anything the grammar did not map to a
//! movement funnels into the spoken fallback.  Every port post is paired
//! with an activation increment and every handled value with a decrement,
//! so the activity completes once its last branch has run.
//!

use actflow_core::{Activity, ActivityStatus, Post};

use actflow_ports::LocalPost;

use actflow_sync::{Activation, CompletionHandle, JoinBarrier, MergeFunnel};

use tracing::{debug, error};

use crate::{
    commands::{SayTextRequest, SetDrivePowerRequest},
    recognition::{Recognition, MOVING_DIRECTION, TYPE_OF_MOVING},
    FALLBACK_TEXT,
};

/// Recognitions at or below this confidence are not acted on.
const CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Wheel power for driving forward or backward.
const MOVE_POWER: f64 = 0.5;

/// Wheel power differential for turning in place.
const TURN_POWER: f64 = 0.15;

/// A value posted into the movement join: slot 0 carries the movement
/// keyword, slot 1 the full recognition record.
enum MoveSlot {
    /// The matched movement keyword.
    Keyword(String),
    /// The recognition record the direction is read from.
    Utterance(Recognition),
}

/// An input that could not be turned into a movement, kept for logging.
enum FallbackCue {
    Keyword(String),
    Utterance(Recognition),
}

/// Differential wheel powers for a turn command.
struct WheelPowers {
    left: f64,
    right: f64,
}

/// One live response to a recognized-speech notification.
pub struct SpeechRecognizedActivity {
    activation: Activation,
    fallback: MergeFunnel<FallbackCue>,
    uniform_power: MergeFunnel<f64>,
    wheel_powers: MergeFunnel<WheelPowers>,
    move_join: JoinBarrier<MoveSlot>,
}

impl SpeechRecognizedActivity {
    /// Wire up the activity's funnels and join, then run the entry
    /// branching against `message`.
    ///
    /// The returned [`CompletionHandle`] resolves once every branch the
    /// entry (and the join handler) opened has drained.
    pub fn new(
        message: Recognition,
        speech: LocalPost<SayTextRequest>,
        drive: LocalPost<SetDrivePowerRequest>,
    ) -> (Self, CompletionHandle) {
        let (activation, completion) = Activation::new();

        let (fallback, fallback_post) = {
            let activation = activation.clone();
            let speech = speech.clone();
            MergeFunnel::new(move |cue: FallbackCue| {
                match &cue {
                    FallbackCue::Keyword(keyword) => {
                        debug!(keyword = %keyword, "unrecognized movement keyword");
                    }
                    FallbackCue::Utterance(recognition) => {
                        debug!(
                            text = %recognition.text,
                            confidence = recognition.confidence,
                            "utterance not understood"
                        );
                    }
                }

                if let Err(error) = speech.post(SayTextRequest {
                    speech_text: FALLBACK_TEXT.to_string(),
                }) {
                    error!(%error, "speech partner dropped a say-text command");
                }
                activation.decrement();
            })
        };

        let (uniform_power, uniform_post) = {
            let activation = activation.clone();
            let drive = drive.clone();
            MergeFunnel::new(move |power: f64| {
                if let Err(error) = drive.post(SetDrivePowerRequest {
                    left_wheel_power: power,
                    right_wheel_power: power,
                }) {
                    error!(%error, "drive partner dropped a set-power command");
                }
                activation.decrement();
            })
        };

        let (wheel_powers, wheel_post) = {
            let activation = activation.clone();
            MergeFunnel::new(move |powers: WheelPowers| {
                if let Err(error) = drive.post(SetDrivePowerRequest {
                    left_wheel_power: powers.left,
                    right_wheel_power: powers.right,
                }) {
                    error!(%error, "drive partner dropped a set-power command");
                }
                activation.decrement();
            })
        };

        let (move_join, move_slots) = {
            let activation = activation.clone();
            let fallback_post = fallback_post.clone();
            let uniform_post = uniform_post.clone();
            JoinBarrier::new(2, move |mut values: Vec<MoveSlot>| {
                let consumed = values.len();

                let utterance = values.pop();
                let keyword = values.pop();
                match (keyword, utterance) {
                    (Some(MoveSlot::Keyword(keyword)), Some(MoveSlot::Utterance(recognition))) => {
                        debug!(keyword = %keyword, "movement join fired");
                        match recognition.semantic(MOVING_DIRECTION) {
                            Some("Forward") => {
                                activation.increment();
                                uniform_post.post(MOVE_POWER);
                            }
                            Some("Backward") => {
                                activation.increment();
                                uniform_post.post(-MOVE_POWER);
                            }
                            Some("Left") => {
                                activation.increment();
                                wheel_post.post(WheelPowers {
                                    left: -TURN_POWER,
                                    right: TURN_POWER,
                                });
                            }
                            Some("Right") => {
                                activation.increment();
                                wheel_post.post(WheelPowers {
                                    left: TURN_POWER,
                                    right: -TURN_POWER,
                                });
                            }
                            _ => {
                                activation.increment();
                                fallback_post.post(FallbackCue::Utterance(recognition));
                            }
                        }
                    }
                    _ => error!("movement join fired with mismatched slot values"),
                }

                activation.decrement_by(consumed);
            })
        };
        activation.register_join(move_join.watch());

        // Entry branching.  The first increment is the "this activation is
        // alive" unit, undone by the decrement once branching is finished.
        activation.increment();
        if message.confidence > CONFIDENCE_THRESHOLD {
            activation.increment();
            move_slots.post(1, MoveSlot::Utterance(message.clone()));

            match message.semantic(TYPE_OF_MOVING) {
                Some("Stop") => {
                    activation.increment();
                    uniform_post.post(0.0);
                }
                Some(keyword @ "Move") => {
                    activation.increment();
                    move_slots.post(0, MoveSlot::Keyword(keyword.to_string()));
                }
                other => {
                    activation.increment();
                    fallback_post.post(FallbackCue::Keyword(
                        other.unwrap_or_default().to_string(),
                    ));
                }
            }
        } else {
            activation.increment();
            fallback_post.post(FallbackCue::Utterance(message));
        }
        activation.decrement();

        (
            Self {
                activation,
                fallback,
                uniform_power,
                wheel_powers,
                move_join,
            },
            completion,
        )
    }
}

impl Activity for SpeechRecognizedActivity {
    fn poll(&mut self) -> ActivityStatus {
        // Completion is the internal shutdown signal: once it has fired no
        // further handler scheduling happens for this activation.
        if self.activation.is_complete() {
            return ActivityStatus::Complete;
        }

        self.fallback.poll();
        self.uniform_power.poll();
        self.wheel_powers.poll();
        self.move_join.poll();

        if self.activation.is_complete() {
            ActivityStatus::Complete
        } else {
            ActivityStatus::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    use actflow_ports::LocalInbox;

    fn recognition(confidence: f64, semantics: &[(&str, &str)]) -> Recognition {
        Recognition {
            text: "spoken command".to_string(),
            confidence,
            semantics: semantics
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect::<HashMap<String, String>>(),
        }
    }

    fn run(
        message: Recognition,
    ) -> (Vec<SayTextRequest>, Vec<SetDrivePowerRequest>) {
        let mut speech = LocalInbox::new();
        let mut drive = LocalInbox::new();

        let (mut activity, mut complete) =
            SpeechRecognizedActivity::new(message, speech.poster(), drive.poster());

        for _ in 0..8 {
            if activity.poll() == ActivityStatus::Complete {
                assert!(complete.is_complete());
                return (speech.poll(), drive.poll());
            }
        }
        panic!("activity did not complete");
    }

    #[test]
    fn test_move_forward_drives_at_half_power() {
        let (spoken, driven) = run(recognition(
            0.9,
            &[(TYPE_OF_MOVING, "Move"), (MOVING_DIRECTION, "Forward")],
        ));

        assert!(spoken.is_empty());
        assert_eq!(
            driven,
            vec![SetDrivePowerRequest {
                left_wheel_power: 0.5,
                right_wheel_power: 0.5,
            }]
        );
    }

    #[test]
    fn test_move_backward_reverses() {
        let (spoken, driven) = run(recognition(
            0.8,
            &[(TYPE_OF_MOVING, "Move"), (MOVING_DIRECTION, "Backward")],
        ));

        assert!(spoken.is_empty());
        assert_eq!(
            driven,
            vec![SetDrivePowerRequest {
                left_wheel_power: -0.5,
                right_wheel_power: -0.5,
            }]
        );
    }

    #[test]
    fn test_turns_use_differential_power() {
        let (_, left_turn) = run(recognition(
            0.8,
            &[(TYPE_OF_MOVING, "Move"), (MOVING_DIRECTION, "Left")],
        ));
        assert_eq!(
            left_turn,
            vec![SetDrivePowerRequest {
                left_wheel_power: -0.15,
                right_wheel_power: 0.15,
            }]
        );

        let (_, right_turn) = run(recognition(
            0.8,
            &[(TYPE_OF_MOVING, "Move"), (MOVING_DIRECTION, "Right")],
        ));
        assert_eq!(
            right_turn,
            vec![SetDrivePowerRequest {
                left_wheel_power: 0.15,
                right_wheel_power: -0.15,
            }]
        );
    }

    #[test]
    fn test_low_confidence_speaks_fallback_only() {
        let (spoken, driven) = run(recognition(
            0.5,
            &[(TYPE_OF_MOVING, "Move"), (MOVING_DIRECTION, "Forward")],
        ));

        assert!(driven.is_empty());
        assert_eq!(
            spoken,
            vec![SayTextRequest {
                speech_text: FALLBACK_TEXT.to_string(),
            }]
        );
    }

    #[test]
    fn test_stop_zeroes_the_drive() {
        // "Stop" completes with the recognition still buffered in the
        // half-filled movement join; the outstanding-join offset is what
        // lets the activation drain anyway.
        let (spoken, driven) = run(recognition(0.9, &[(TYPE_OF_MOVING, "Stop")]));

        assert!(spoken.is_empty());
        assert_eq!(
            driven,
            vec![SetDrivePowerRequest {
                left_wheel_power: 0.0,
                right_wheel_power: 0.0,
            }]
        );
    }

    #[test]
    fn test_unknown_keyword_speaks_fallback() {
        let (spoken, driven) = run(recognition(0.9, &[(TYPE_OF_MOVING, "Dance")]));

        assert!(driven.is_empty());
        assert_eq!(
            spoken,
            vec![SayTextRequest {
                speech_text: FALLBACK_TEXT.to_string(),
            }]
        );
    }

    #[test]
    fn test_unknown_direction_speaks_fallback() {
        let (spoken, driven) = run(recognition(
            0.9,
            &[(TYPE_OF_MOVING, "Move"), (MOVING_DIRECTION, "Up")],
        ));

        assert!(driven.is_empty());
        assert_eq!(
            spoken,
            vec![SayTextRequest {
                speech_text: FALLBACK_TEXT.to_string(),
            }]
        );
    }

    #[test]
    fn test_dropped_drive_partner_still_completes() {
        let mut speech = LocalInbox::new();
        let drive = LocalInbox::new();
        let drive_post = drive.poster();
        drop(drive);

        let (mut activity, mut complete) = SpeechRecognizedActivity::new(
            recognition(0.9, &[(TYPE_OF_MOVING, "Move"), (MOVING_DIRECTION, "Forward")]),
            speech.poster(),
            drive_post,
        );

        for _ in 0..8 {
            if activity.poll() == ActivityStatus::Complete {
                break;
            }
        }

        // The failed partner post is logged but the branch still
        // decrements, so the activation does not hang.
        assert!(complete.is_complete());
        assert!(speech.poll().is_empty());
    }
}
