//! Effects as inert values, and the engine that interprets them.
//!
//! Reducers never perform side effects. They return an [`Effect`] that
//! describes the work, and the store hands it to the [`EffectEngine`],
//! which runs async bodies on tokio, keeps cancellation groups and
//! debounce/throttle timers keyed by [`EffectId`], and feeds any resulting
//! actions back through a [`Dispatcher`].

mod dispatcher;
mod engine;
mod error;
mod id;
mod value;

pub use dispatcher::Dispatcher;
pub use engine::EffectEngine;
pub use error::{millis, EffectError};
pub use id::EffectId;
pub use value::{BoxFuture, Effect, EffectKind, Procedure, Task};
