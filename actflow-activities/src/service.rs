//!
//! The voice-drive service: the long-lived activity that owns the partner
//! port handles, runs the grammar load at start, and spawns one activity
//! per speech-recognizer notification.
//!
//! Notifications that arrive while the grammar is still loading stay
//! buffered in the event inbox; handler spawning only begins once the
//! grammar-load activity completes.
//!

use actflow_core::{Activity, ActivityStatus};

use actflow_dispatch::Spawner;

use actflow_ports::{Fault, LocalInbox, LocalPost, LocalRequester};

use actflow_sync::CompletionHandle;

use crate::{
    commands::{SayTextRequest, SetDrivePowerRequest, SetGrammarRequest},
    grammar::LoadGrammarActivity,
    recognition::RecognitionEvent,
    recognized::SpeechRecognizedActivity,
    rejected::SpeechRejectedActivity,
};

/// The long-lived service activity dispatching recognizer notifications.
///
/// The service itself never completes; it runs until its dispatcher is
/// interrupted.
pub struct VoiceDriveService {
    events: LocalInbox<RecognitionEvent>,
    spawner: Spawner,
    speech: LocalPost<SayTextRequest>,
    drive: LocalPost<SetDrivePowerRequest>,
    grammar_loaded: CompletionHandle,
}

impl VoiceDriveService {
    /// Create the service and spawn its grammar-load activity.
    pub fn new(
        grammar_file: impl Into<String>,
        grammar: LocalRequester<SetGrammarRequest, Result<(), Fault>>,
        speech: LocalPost<SayTextRequest>,
        drive: LocalPost<SetDrivePowerRequest>,
        spawner: Spawner,
    ) -> Self {
        let (load, grammar_loaded) =
            LoadGrammarActivity::new(grammar_file, grammar, speech.clone());
        spawner.spawn(Box::new(load));

        Self {
            events: LocalInbox::new(),
            spawner,
            speech,
            drive,
            grammar_loaded,
        }
    }

    /// A posting handle the speech-recognizer partner feeds notifications
    /// through.
    pub fn notifier(&self) -> LocalPost<RecognitionEvent> {
        self.events.poster()
    }
}

impl Activity for VoiceDriveService {
    fn poll(&mut self) -> ActivityStatus {
        if !self.grammar_loaded.is_complete() {
            return ActivityStatus::Pending;
        }

        for event in self.events.poll() {
            match event {
                RecognitionEvent::Recognized(recognition) => {
                    let (activity, _completion) = SpeechRecognizedActivity::new(
                        recognition,
                        self.speech.clone(),
                        self.drive.clone(),
                    );
                    self.spawner.spawn(Box::new(activity));
                }
                RecognitionEvent::Rejected(rejection) => {
                    let (activity, _completion) =
                        SpeechRejectedActivity::new(rejection, self.speech.clone());
                    self.spawner.spawn(Box::new(activity));
                }
            }
        }

        ActivityStatus::Pending
    }
}
