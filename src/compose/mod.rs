//! Reducer composition.
//!
//! A child feature is written and tested as a standalone [`Reducer`]. The
//! operators here embed it into a parent's state and action space without
//! changing its behavior:
//!
//! - [`Scope`]: child state always present
//! - [`IfLet`]: child state optional; child actions are dropped while absent
//! - [`IfLetPresented`]: like `IfLet`, with the [`PresentationAction`]
//!   envelope so the parent can dismiss the child
//! - [`Combine`]: run two reducers over the same state, batching effects
//!
//! [`Reducer`]: crate::mvi::Reducer

mod combine;
mod envelope;
mod if_let;
mod lens;
mod scope;

pub use combine::Combine;
pub use envelope::PresentationAction;
pub use if_let::{IfLet, IfLetPresented};
pub use lens::{ActionPrism, OptionalLens, StateLens};
pub use scope::Scope;

#[cfg(test)]
pub(crate) use scope::tests as fixtures;
