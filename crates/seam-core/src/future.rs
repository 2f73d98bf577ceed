//! Future bridge
//!
//! A [`BridgeFuture`] represents a pending native computation observable
//! from the host. The native side runs the work on its own runtime; the
//! host polls without ever blocking its calling thread. The state machine
//! is `Pending -> Ready` or `Pending -> Failed`, both terminal: exactly
//! one terminal value is ever produced, and polling a terminal future
//! returns the same value every time.

use std::future::Future;
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::runtime::runtime;

/// Observable state of a bridged computation
#[derive(Debug, Clone)]
pub enum FuturePoll<T> {
    /// The work has not produced a value yet
    Pending,
    /// The work completed; terminal
    Ready(T),
    /// The work failed; terminal
    Failed(Arc<Error>),
}

impl<T> FuturePoll<T> {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, FuturePoll::Pending)
    }
}

enum State<T> {
    Pending,
    Ready(T),
    Failed(Arc<Error>),
}

/// A pending native computation, polled across the boundary.
///
/// Cloning shares the underlying latch; every clone observes the same
/// terminal value.
pub struct BridgeFuture<T> {
    state: Arc<Mutex<State<T>>>,
}

impl<T> Clone for BridgeFuture<T> {
    fn clone(&self) -> Self {
        BridgeFuture {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Send + 'static> BridgeFuture<T> {
    /// Start `work` on the worker runtime and return the handle observing it.
    pub fn spawn<F>(work: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let state = Arc::new(Mutex::new(State::Pending));
        let latch = Arc::clone(&state);

        runtime().spawn(async move {
            let outcome = work.await;
            let mut slot = latch.lock().unwrap();
            // The worker is the only writer; a terminal state never flips.
            if matches!(*slot, State::Pending) {
                *slot = match outcome {
                    Ok(value) => State::Ready(value),
                    Err(error) => {
                        log::warn!("bridged worker failed: {error}");
                        State::Failed(Arc::new(error))
                    }
                };
            }
        });

        BridgeFuture { state }
    }

    /// A future that is already resolved
    pub fn ready(value: T) -> Self {
        BridgeFuture {
            state: Arc::new(Mutex::new(State::Ready(value))),
        }
    }

    /// A future that already failed
    pub fn failed(error: Error) -> Self {
        BridgeFuture {
            state: Arc::new(Mutex::new(State::Failed(Arc::new(error)))),
        }
    }
}

impl<T: Clone> BridgeFuture<T> {
    /// Non-blocking probe of the computation's state
    pub fn poll(&self) -> FuturePoll<T> {
        match &*self.state.lock().unwrap() {
            State::Pending => FuturePoll::Pending,
            State::Ready(value) => FuturePoll::Ready(value.clone()),
            State::Failed(error) => FuturePoll::Failed(Arc::clone(error)),
        }
    }
}
