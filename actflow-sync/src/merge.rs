//!
//! Merge funnels.
//!
//! A merge funnel is the degenerate cousin of a join barrier: a single
//! unbounded queue whose handler fires once per posted value, in post order,
//! with no synchronization against any other funnel or barrier.  It stands
//! in for "first of several possible predecessors" in an activity's
//! branching graph.
//!

use crossbeam::channel::{self, Receiver, Sender};

/// A single-input queue whose handler fires independently per posted value.
///
/// The handler performs the branch's side effect and decrements the owning
/// activation exactly once, matching the increment issued by whichever
/// branch produced the value.
pub struct MergeFunnel<T> {
    rx: Receiver<T>,
    handler: Box<dyn FnMut(T) + Send>,
}

impl<T: Send> MergeFunnel<T> {
    /// Create a merge funnel with its handler, along with the clonable
    /// posting handle producers use.
    pub fn new(handler: impl FnMut(T) + Send + 'static) -> (Self, MergePost<T>) {
        let (tx, rx) = channel::unbounded();
        (
            Self {
                rx,
                handler: Box::new(handler),
            },
            MergePost { tx },
        )
    }

    /// Invoke the handler once for every buffered value, in post order, and
    /// return the number of invocations.
    pub fn poll(&mut self) -> usize {
        let mut fired = 0;
        while let Ok(value) = self.rx.try_recv() {
            (self.handler)(value);
            fired += 1;
        }
        fired
    }
}

/// The clonable posting side of a merge funnel.
pub struct MergePost<T> {
    tx: Sender<T>,
}

impl<T> Clone for MergePost<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> MergePost<T> {
    /// Post a value into the funnel.
    ///
    /// Posts after the funnel has been discarded are dropped, matching the
    /// lifecycle of an already-completed activation.
    pub fn post(&self, value: T) {
        let _ = self.tx.send(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use crate::activation::Activation;

    #[test]
    fn test_every_post_fires_once_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let record = seen.clone();
        let (mut funnel, post) = MergeFunnel::new(move |value: u32| {
            record.lock().unwrap().push(value);
        });

        for i in 0..10 {
            post.post(i);
        }

        assert_eq!(funnel.poll(), 10);
        assert_eq!(*seen.lock().unwrap(), (0..10).collect::<Vec<u32>>());
        assert_eq!(funnel.poll(), 0);
    }

    #[test]
    fn test_handler_decrements_pair_with_posts() {
        let (activation, mut complete) = Activation::new();

        let handler_activation = activation.clone();
        let (mut funnel, post) = MergeFunnel::new(move |_value: u32| {
            handler_activation.decrement();
        });

        activation.increment();
        for i in 0..5 {
            activation.increment();
            post.post(i);
        }
        activation.decrement();

        assert_eq!(funnel.poll(), 5);
        assert!(complete.is_complete());
    }
}
