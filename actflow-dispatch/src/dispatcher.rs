//!
//! The Dispatcher
//!
//! The dispatcher stores its live activities in a vector and repeatedly
//! polls each one, admitting newly spawned activities between passes and
//! dropping activities once their completion signal has fired.  It is
//! deliberately the most simple scheduler that satisfies the cooperative
//! run-to-completion model: there is no preemption and no priority, an
//! activity's handlers simply run whenever their inputs have arrived by
//! poll time.
//!
//! Note: The dispatcher can be interrupted by sending a true value over the
//! channel whose receiving end is owned by the dispatcher.
//!
//! Addendum: The dispatcher busy waits between passes, so do not expect it
//! to yield CPU time to other processes while it is running.
//!

use crossbeam::channel::{self, Receiver, Sender};

use quanta::Clock;

use actflow_core::{Activity, ActivityStatus, Dispatch, DispatchState};

/// A single-threaded cooperative activity dispatcher.
pub struct Dispatcher {
    // The live activities
    active: Vec<Box<dyn Activity>>,
    // Intake channel for activities spawned while the dispatcher is running
    intake: Receiver<Box<dyn Activity>>,
    // Kept to mint spawner handles
    intake_tx: Sender<Box<dyn Activity>>,
    // The quanta high-precision clock backing run_for_ms
    clock: Clock,
    // The current state of the dispatcher
    state: DispatchState,
    // The interrupt receiver channel
    interrupt: Receiver<bool>,
    // Whether or not the dispatcher has been interrupted
    interrupted: bool,
}

impl Dispatcher {
    /// Create a new dispatcher without any activities.
    pub fn new(interrupt: Receiver<bool>) -> Self {
        let (intake_tx, intake) = channel::unbounded();
        Self {
            active: Vec::new(),
            intake,
            intake_tx,
            clock: Clock::new(),
            state: DispatchState::Stopped,
            interrupt,
            interrupted: false,
        }
    }

    /// Create a new dispatcher with a number of activities.
    pub fn new_with(interrupt: Receiver<bool>, activities: Vec<Box<dyn Activity>>) -> Self {
        let mut dispatcher = Self::new(interrupt);
        dispatcher.active = activities;
        dispatcher
    }

    /// Create a handle other threads (or running activities) can use to
    /// spawn activities into this dispatcher.
    pub fn spawner(&self) -> Spawner {
        Spawner {
            tx: self.intake_tx.clone(),
        }
    }

    /// The number of activities currently live on the dispatcher.
    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// Admit newly spawned activities, poll every live activity once, and
    /// drop the ones that completed.
    fn pass(&mut self) {
        for activity in self.intake.try_iter() {
            self.active.push(activity);
        }

        self.active
            .retain_mut(|activity| activity.poll() == ActivityStatus::Pending);
    }
}

impl Dispatch for Dispatcher {
    fn spawn(&mut self, activity: Box<dyn Activity>) {
        self.active.push(activity);
    }

    /// Run the dispatcher for a given number of milliseconds before
    /// stopping.  An interrupt will also stop the dispatcher early.
    fn run_for_ms(&mut self, ms: u128) {
        self.interrupted = false;
        self.state = DispatchState::Running;

        let start = self.clock.now();
        while self.clock.now().duration_since(start).as_millis() < ms && !self.check_interrupt() {
            self.pass();
        }

        self.state = DispatchState::Stopped;
    }

    /// Run the dispatcher until every live activity has completed and no
    /// spawned activity is waiting for admission.  An interrupt will also
    /// stop the dispatcher early, leaving any pending activities in place
    /// for the next run.
    fn run_until_idle(&mut self) {
        self.interrupted = false;
        self.state = DispatchState::Running;

        loop {
            self.pass();
            if self.active.is_empty() && self.intake.is_empty() {
                break;
            }
            if self.check_interrupt() {
                break;
            }
        }

        self.state = DispatchState::Stopped;
    }

    /// Run the dispatcher until an interrupt is received.
    fn run_loop(&mut self) {
        self.interrupted = false;
        self.state = DispatchState::Running;

        while !self.check_interrupt() {
            self.pass();
        }

        self.state = DispatchState::Stopped;
    }

    /// Check the interrupt receiver for an interrupt.  If an interrupt
    /// signal was sent over the channel then this dispatcher should report
    /// that it was interrupted.
    fn check_interrupt(&mut self) -> bool {
        if let Ok(interrupt) = self.interrupt.try_recv() {
            self.interrupted = interrupt;
        }
        self.interrupted
    }
}

/// A clonable handle for spawning activities into a running dispatcher.
pub struct Spawner {
    tx: Sender<Box<dyn Activity>>,
}

impl Clone for Spawner {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl Spawner {
    /// Spawn an activity onto the dispatcher this handle belongs to.
    ///
    /// Spawns after the dispatcher has been dropped are discarded.
    pub fn spawn(&self, activity: Box<dyn Activity>) {
        let _ = self.tx.send(activity);
    }
}
