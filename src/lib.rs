//! Unidirectional state management: reducers, effects as values, a store
//! that runs them, and navigation modeled as state.

pub mod compose;
pub mod config;
pub mod deps;
pub mod effect;
pub mod logging;
pub mod mvi;
pub mod navigation;
pub mod store;

pub use config::RuntimeConfig;
pub use effect::{Dispatcher, Effect, EffectId};
pub use mvi::{Action, Reducer, UiState};
pub use store::Store;
