//!
//! Activation reference counting and completion detection.
//!
//! An Activation counts the outstanding asynchronous branches of one live
//! workflow instance.  Every port post is paired with an [`Activation::increment`]
//! and every handled value with a decrement, so the count drains to zero once
//! the last branch has run.  Registered join barriers complicate the picture:
//! a half-filled join holds buffered values whose decrements cannot happen
//! until the join's partner branch arrives, so those buffered values are
//! subtracted from the live count (the outstanding-join offset) before the
//! completion check.
//!
//! The original decrement-and-compare was a raw interlocked decrement racing
//! against a recomputed threshold.  Here the counter is an explicit state
//! machine behind a single mutex, which makes the single-crossing invariant
//! (completion fires exactly once per activation) structural: the first
//! decrement that satisfies `count <= offset` transitions the state to
//! `Complete`, and every later increment or decrement is a no-op.
//!

use std::sync::{Arc, Mutex};

use crossbeam::channel::{self, Receiver, Sender};

/// A pending-value counter over the slots of one join barrier.
///
/// `pending` reports the barrier's contribution to the outstanding-join
/// offset: zero if the barrier is empty or ready to fire, otherwise the
/// number of values buffered across its filled slots.
pub struct JoinWatch {
    inner: Arc<dyn SlotCount + Send + Sync>,
}

impl JoinWatch {
    pub(crate) fn from_slots<V: Send + 'static>(slots: Vec<Receiver<V>>) -> Self {
        Self {
            inner: Arc::new(Slots(slots)),
        }
    }

    fn pending(&self) -> usize {
        self.inner.pending()
    }
}

trait SlotCount {
    fn pending(&self) -> usize;
}

struct Slots<V>(Vec<Receiver<V>>);

impl<V: Send> SlotCount for Slots<V> {
    fn pending(&self) -> usize {
        let mut buffered = 0;
        let mut complete = true;

        for slot in self.0.iter() {
            let count = slot.len();
            if count != 0 {
                buffered += count;
            } else {
                complete = false;
            }
        }

        // A barrier that is ready to fire accounts for its own decrements;
        // only a mid-fill barrier defers them.
        if complete {
            0
        } else {
            buffered
        }
    }
}

enum CounterState {
    /// The activation still has `n` outstanding branch units.
    Active(i64),
    /// The completion latch has fired; further count changes are no-ops.
    Complete,
}

struct Tracker {
    state: CounterState,
    joins: Vec<JoinWatch>,
}

struct ActivationInner {
    tracker: Mutex<Tracker>,
    complete_tx: Sender<()>,
}

/// The branch counter and completion tracker for one live activity instance.
///
/// Cheaply clonable; handler closures each hold a clone and pair their port
/// posts and consumed values with increments and decrements.
pub struct Activation {
    inner: Arc<ActivationInner>,
}

impl Clone for Activation {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl Activation {
    /// Create a new activation with a count of zero, along with the handle
    /// the activation's spawner uses to await completion.
    pub fn new() -> (Self, CompletionHandle) {
        let (complete_tx, complete_rx) = channel::bounded(1);

        (
            Self {
                inner: Arc::new(ActivationInner {
                    tracker: Mutex::new(Tracker {
                        state: CounterState::Active(0),
                        joins: Vec::new(),
                    }),
                    complete_tx,
                }),
            },
            CompletionHandle {
                rx: complete_rx,
                observed: false,
            },
        )
    }

    /// Register a join barrier with this activation so its buffered,
    /// not-yet-consumed slot values are excluded from the completion check.
    pub fn register_join(&self, watch: JoinWatch) {
        let mut tracker = self.inner.tracker.lock().unwrap();
        tracker.joins.push(watch);
    }

    /// Add one outstanding branch unit.
    pub fn increment(&self) {
        let mut tracker = self.inner.tracker.lock().unwrap();
        if let CounterState::Active(count) = &mut tracker.state {
            *count += 1;
        }
    }

    /// Remove one outstanding branch unit and, if the remaining count is
    /// covered entirely by values stuck in half-filled joins, fire the
    /// completion latch.
    pub fn decrement(&self) {
        let mut tracker = self.inner.tracker.lock().unwrap();

        if let CounterState::Active(count) = tracker.state {
            let count = count - 1;
            let offset = tracker
                .joins
                .iter()
                .map(|join| join.pending() as i64)
                .sum::<i64>();

            if count <= offset {
                tracker.state = CounterState::Complete;
                // The spawner may have dropped its handle already.
                let _ = self.inner.complete_tx.try_send(());
            } else {
                tracker.state = CounterState::Active(count);
            }
        }
    }

    /// Perform `count` sequential decrements, each independently checking
    /// the completion threshold.
    ///
    /// Join handlers use this to undo the increments paired with each of the
    /// values they consumed in one firing.
    pub fn decrement_by(&self, count: usize) {
        for _ in 0..count {
            self.decrement();
        }
    }

    /// Whether the completion latch has fired.
    ///
    /// This is the activation-internal shutdown signal: once it reports true
    /// no further handler scheduling should happen for this activation.
    pub fn is_complete(&self) -> bool {
        let tracker = self.inner.tracker.lock().unwrap();
        matches!(tracker.state, CounterState::Complete)
    }
}

/// The spawner-facing end of an activation's one-shot completion signal.
pub struct CompletionHandle {
    rx: Receiver<()>,
    observed: bool,
}

impl CompletionHandle {
    /// Block the calling thread until the activation completes.
    ///
    /// Returns immediately on every call after the first.
    pub fn wait(&mut self) {
        if !self.observed {
            // Disconnection means the activation was dropped without
            // completing; there is nothing left to wait for either way.
            let _ = self.rx.recv();
            self.observed = true;
        }
    }

    /// Check for completion without blocking.
    pub fn is_complete(&mut self) -> bool {
        if !self.observed && self.rx.try_recv().is_ok() {
            self.observed = true;
        }
        self.observed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::thread;

    use crossbeam::channel::unbounded;

    #[test]
    fn test_completion_fires_when_count_drains() {
        let (activation, mut complete) = Activation::new();

        activation.increment();
        activation.increment();
        activation.decrement();
        assert!(!complete.is_complete());
        assert!(!activation.is_complete());

        activation.decrement();
        assert!(complete.is_complete());
        assert!(activation.is_complete());
    }

    #[test]
    fn test_late_counts_are_noops_after_completion() {
        let (activation, mut complete) = Activation::new();

        activation.increment();
        activation.decrement();
        assert!(complete.is_complete());

        // A straggling branch must not resurrect or re-complete the
        // activation.
        activation.increment();
        activation.decrement();
        assert!(activation.is_complete());
        assert!(complete.is_complete());
    }

    #[test]
    fn test_decrement_by_checks_each_unit() {
        let (activation, mut complete) = Activation::new();

        activation.increment();
        activation.increment();
        activation.increment();
        activation.decrement_by(3);

        assert!(complete.is_complete());
    }

    #[test]
    fn test_half_filled_join_defers_completion() {
        let (activation, mut complete) = Activation::new();

        let (slot_a_tx, slot_a_rx) = unbounded::<u8>();
        let (_slot_b_tx, slot_b_rx) = unbounded::<u8>();
        activation.register_join(JoinWatch::from_slots(vec![slot_a_rx, slot_b_rx]));

        // One unit for the activation itself, one for the buffered slot
        // value.
        activation.increment();
        activation.increment();
        slot_a_tx.send(1).unwrap();

        // count 2 -> 1, offset 1: the only remaining unit is stuck in the
        // half-filled join, so the activation is as drained as it will get.
        activation.decrement();
        assert!(complete.is_complete());
    }

    #[test]
    fn test_full_join_does_not_defer_completion() {
        let (activation, mut complete) = Activation::new();

        let (slot_a_tx, slot_a_rx) = unbounded::<u8>();
        let (slot_b_tx, slot_b_rx) = unbounded::<u8>();
        activation.register_join(JoinWatch::from_slots(vec![slot_a_rx, slot_b_rx]));

        activation.increment();
        activation.increment();
        activation.increment();
        slot_a_tx.send(1).unwrap();
        slot_b_tx.send(2).unwrap();

        // A ready-to-fire join contributes no offset, so the activation
        // stays alive until the join handler's decrements land.
        activation.decrement();
        assert!(!complete.is_complete());
        activation.decrement_by(2);
        assert!(complete.is_complete());
    }

    #[test]
    fn test_completion_fires_exactly_once_under_race() {
        for _ in 0..100 {
            let (activation, mut complete) = Activation::new();

            for _ in 0..8 {
                activation.increment();
            }

            let handles = (0..8)
                .map(|_| {
                    let activation = activation.clone();
                    thread::spawn(move || activation.decrement())
                })
                .collect::<Vec<_>>();
            for handle in handles {
                handle.join().unwrap();
            }

            assert!(complete.is_complete());
            // The latch channel is bounded at one; a double fire would have
            // left a second message behind.
            assert!(activation.inner.complete_tx.is_empty());
            assert!(activation.is_complete());
        }
    }

    #[test]
    fn test_wait_returns_after_completion() {
        let (activation, mut complete) = Activation::new();
        activation.increment();

        let handle = thread::spawn(move || {
            complete.wait();
            complete
        });

        activation.decrement();
        let mut complete = handle.join().unwrap();
        assert!(complete.is_complete());
    }
}
