//! Action sink handed to running effects.

use std::fmt;
use std::sync::Arc;

/// Callback through which an effect sends actions back to its store.
///
/// Cloning is cheap. A dispatcher for a child feature is derived from the
/// parent's with [`Dispatcher::embed`].
pub struct Dispatcher<A> {
    sink: Arc<dyn Fn(A) + Send + Sync>,
}

impl<A> Clone for Dispatcher<A> {
    fn clone(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
        }
    }
}

impl<A> fmt::Debug for Dispatcher<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}

impl<A: Send + 'static> Dispatcher<A> {
    pub fn new(sink: impl Fn(A) + Send + Sync + 'static) -> Self {
        Self {
            sink: Arc::new(sink),
        }
    }

    /// Send an action. Never blocks on the reducer of another task.
    pub fn send(&self, action: A) {
        (self.sink)(action)
    }

    /// Derive a dispatcher for a narrower action type whose actions are
    /// wrapped by `wrap` before reaching this one.
    pub fn embed<C, F>(self, wrap: F) -> Dispatcher<C>
    where
        C: Send + 'static,
        F: Fn(C) -> A + Send + Sync + 'static,
    {
        Dispatcher::new(move |action| self.send(wrap(action)))
    }

    /// Gate this dispatcher: actions are dropped whenever `open` is false.
    pub(crate) fn fenced<F>(self, open: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Dispatcher::new(move |action| {
            if open() {
                self.send(action);
            } else {
                tracing::trace!("Dropped action from superseded effect");
            }
        })
    }
}
