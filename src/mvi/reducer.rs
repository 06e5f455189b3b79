//! Reducer trait.

use crate::effect::Effect;

use super::action::Action;
use super::state::UiState;

/// Reducer transforms state based on actions.
///
/// The reducer is the only place where state transitions happen. It must be
/// total, deterministic and synchronous: every side effect it wants is
/// returned as an [`Effect`] value and executed later by the store.
pub trait Reducer: Send + Sync + 'static {
    /// The state type this reducer operates on.
    type State: UiState;

    /// The action type this reducer handles.
    type Action: Action;

    /// Injected capabilities passed unchanged through every call.
    type Dependencies: Send + Sync + 'static;

    /// Process an action and return the new state and the effect to run.
    fn reduce(
        &self,
        state: Self::State,
        action: Self::Action,
        deps: &Self::Dependencies,
    ) -> (Self::State, Effect<Self::Action>);
}
