//!
//! Join barriers.
//!
//! A join barrier is an N-input synchronization point: each of its N slots
//! buffers posted values FIFO, and the barrier fires its handler only once
//! every slot holds at least one value, consuming exactly one value from
//! each slot per firing.  There is no partial firing: a barrier with k < N
//! filled slots just sits on its buffered values (and defers the owning
//! activation's completion through its [`JoinWatch`]).
//!
//! Slot values are whatever tagged type the activity declares for the
//! barrier, one variant per producing branch, so a firing hands the handler
//! an already-typed set of values rather than a row of downcasts.
//!

use std::time::Duration;

use crossbeam::channel::{self, Receiver, Sender};

use quanta::{Clock, Instant};

use crate::activation::JoinWatch;

/// An N-input synchronization point that fires once per full set of posted
/// values.
///
/// Constructed together with its clonable [`JoinSlots`] posting handle; the
/// barrier side is polled by the owning activity, the slots side is handed
/// to whichever branches (possibly on other threads) produce the inputs.
pub struct JoinBarrier<V> {
    slots: Vec<Receiver<V>>,
    handler: Box<dyn FnMut(Vec<V>) + Send>,
    expiry: Option<Expiry<V>>,
}

struct Expiry<V> {
    after: Duration,
    clock: Clock,
    armed: Option<Instant>,
    on_expired: Box<dyn FnMut(V) + Send>,
}

impl<V: Send + 'static> JoinBarrier<V> {
    /// Create a join barrier with `arity` slots and the handler to invoke
    /// with each complete set of values (in slot order).
    ///
    /// The handler is responsible for decrementing the owning activation
    /// once per consumed value.
    ///
    /// # Panics
    ///
    /// Panics if `arity` is zero.
    pub fn new(
        arity: usize,
        handler: impl FnMut(Vec<V>) + Send + 'static,
    ) -> (Self, JoinSlots<V>) {
        assert!(arity >= 1, "a join barrier must have at least one slot");

        let mut slots = Vec::with_capacity(arity);
        let mut posts = Vec::with_capacity(arity);
        for _ in 0..arity {
            let (tx, rx) = channel::unbounded();
            posts.push(tx);
            slots.push(rx);
        }

        (
            Self {
                slots,
                handler: Box::new(handler),
                expiry: None,
            },
            JoinSlots { slots: posts },
        )
    }

    /// Arm an expiry on partial fills: if the barrier has been mid-fill for
    /// longer than `after` at poll time, its buffered values are drained
    /// through `on_expired` (one call per dropped value) instead of waiting
    /// forever on a partner branch that never arrives.
    ///
    /// The `on_expired` callback is responsible for the decrement paired
    /// with each dropped value.  Without this the barrier reproduces the
    /// original non-expiring behavior, where an unmatched join leaks.
    pub fn with_expiry(mut self, after: Duration, on_expired: impl FnMut(V) + Send + 'static) -> Self {
        self.expiry = Some(Expiry {
            after,
            clock: Clock::new(),
            armed: None,
            on_expired: Box::new(on_expired),
        });
        self
    }

    /// The number of input slots on this barrier.
    pub fn arity(&self) -> usize {
        self.slots.len()
    }

    /// A pending-value watch over this barrier's slots, for registration
    /// with the owning activation.
    pub fn watch(&self) -> JoinWatch {
        JoinWatch::from_slots(self.slots.clone())
    }

    /// Fire the handler for every complete set of buffered values and
    /// return the number of firings.
    ///
    /// The barrier is the only consumer of its slots, so a slot observed
    /// non-empty stays non-empty until this method consumes from it.
    pub fn poll(&mut self) -> usize {
        let mut fired = 0;

        while self.slots.iter().all(|slot| !slot.is_empty()) {
            let values = self
                .slots
                .iter()
                .map(|slot| slot.try_recv().unwrap())
                .collect::<Vec<V>>();
            (self.handler)(values);
            fired += 1;
        }

        self.check_expiry();

        fired
    }

    /// Drain a partial fill that has outlived the configured expiry.
    fn check_expiry(&mut self) {
        let Some(expiry) = self.expiry.as_mut() else {
            return;
        };

        if self.slots.iter().all(|slot| slot.is_empty()) {
            expiry.armed = None;
            return;
        }

        let now = expiry.clock.now();
        match expiry.armed {
            None => expiry.armed = Some(now),
            Some(since) if now.duration_since(since) > expiry.after => {
                for slot in self.slots.iter() {
                    for value in slot.try_iter() {
                        (expiry.on_expired)(value);
                    }
                }
                expiry.armed = None;
            }
            Some(_) => {}
        }
    }
}

/// The clonable posting side of a join barrier.
pub struct JoinSlots<V> {
    slots: Vec<Sender<V>>,
}

impl<V> Clone for JoinSlots<V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
        }
    }
}

impl<V> JoinSlots<V> {
    /// Post a value into slot `slot`.
    ///
    /// Posts after the barrier has been discarded are dropped, matching the
    /// lifecycle of an already-completed activation.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of range for the barrier's arity.
    pub fn post(&self, slot: usize, value: V) {
        assert!(
            slot < self.slots.len(),
            "join slot {} out of range for arity {}",
            slot,
            self.slots.len()
        );
        let _ = self.slots[slot].send(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};
    use std::thread;

    fn recording_barrier(arity: usize) -> (JoinBarrier<u32>, JoinSlots<u32>, Arc<Mutex<Vec<Vec<u32>>>>) {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let record = fired.clone();
        let (barrier, slots) = JoinBarrier::new(arity, move |values| {
            record.lock().unwrap().push(values);
        });
        (barrier, slots, fired)
    }

    #[test]
    fn test_no_partial_firing() {
        let (mut barrier, slots, fired) = recording_barrier(2);

        slots.post(0, 1);
        assert_eq!(barrier.poll(), 0);
        assert!(fired.lock().unwrap().is_empty());

        slots.post(1, 2);
        assert_eq!(barrier.poll(), 1);
        assert_eq!(*fired.lock().unwrap(), vec![vec![1, 2]]);
    }

    #[test]
    fn test_fifo_within_slots() {
        let (mut barrier, slots, fired) = recording_barrier(2);

        slots.post(0, 1);
        slots.post(0, 2);
        slots.post(1, 10);
        slots.post(1, 20);

        assert_eq!(barrier.poll(), 2);
        assert_eq!(*fired.lock().unwrap(), vec![vec![1, 10], vec![2, 20]]);
    }

    #[test]
    fn test_fire_count_matches_minimum_slot_posts() {
        let (mut barrier, slots, fired) = recording_barrier(3);

        for i in 0..5 {
            slots.post(0, i);
        }
        for i in 0..3 {
            slots.post(1, i);
        }
        for i in 0..4 {
            slots.post(2, i);
        }

        assert_eq!(barrier.poll(), 3);
        assert_eq!(fired.lock().unwrap().len(), 3);
        // The extra slot-0 and slot-2 values stay buffered.
        assert_eq!(barrier.poll(), 0);
    }

    #[test]
    fn test_concurrent_producers() {
        let (mut barrier, slots, fired) = recording_barrier(2);

        let producers = (0..2)
            .map(|slot| {
                let slots = slots.clone();
                thread::spawn(move || {
                    for i in 0..100 {
                        slots.post(slot, i);
                    }
                })
            })
            .collect::<Vec<_>>();
        for producer in producers {
            producer.join().unwrap();
        }

        assert_eq!(barrier.poll(), 100);
        let fired = fired.lock().unwrap();
        for (i, values) in fired.iter().enumerate() {
            assert_eq!(values, &vec![i as u32, i as u32]);
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_slot_panics() {
        let (_barrier, slots, _fired) = recording_barrier(2);
        slots.post(2, 1);
    }

    #[test]
    fn test_expiry_drains_partial_fill() {
        let dropped = Arc::new(Mutex::new(Vec::new()));
        let record = dropped.clone();
        let (barrier, slots) = JoinBarrier::new(2, |_values: Vec<u32>| {});
        let mut barrier = barrier.with_expiry(Duration::from_millis(10), move |value| {
            record.lock().unwrap().push(value);
        });

        slots.post(0, 7);
        // First poll arms the expiry clock.
        assert_eq!(barrier.poll(), 0);
        assert!(dropped.lock().unwrap().is_empty());

        thread::sleep(Duration::from_millis(20));
        assert_eq!(barrier.poll(), 0);
        assert_eq!(*dropped.lock().unwrap(), vec![7]);

        // A completed drain disarms the expiry and the barrier keeps
        // working.
        slots.post(0, 1);
        slots.post(1, 2);
        assert_eq!(barrier.poll(), 1);
    }
}
