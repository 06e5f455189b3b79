use crate::effect::Effect;
use crate::mvi::{Action, Reducer, UiState};

use super::envelope::PresentationAction;
use super::lens::{ActionPrism, OptionalLens};

/// Embeds a child reducer whose state may be absent.
///
/// A child action that arrives while the child state is `None` is dropped
/// silently; this is expected when actions race with dismissal.
pub struct IfLet<R: Reducer, PS, PA> {
    child: R,
    state: OptionalLens<PS, R::State>,
    action: ActionPrism<PA, R::Action>,
}

impl<R: Reducer, PS, PA> IfLet<R, PS, PA> {
    pub fn new(
        child: R,
        state: OptionalLens<PS, R::State>,
        action: ActionPrism<PA, R::Action>,
    ) -> Self {
        Self {
            child,
            state,
            action,
        }
    }
}

impl<R, PS, PA> Reducer for IfLet<R, PS, PA>
where
    R: Reducer,
    PS: UiState,
    PA: Action,
{
    type State = PS;
    type Action = PA;
    type Dependencies = R::Dependencies;

    fn reduce(&self, state: PS, action: PA, deps: &R::Dependencies) -> (PS, Effect<PA>) {
        let Some(child_action) = self.action.extract(action) else {
            return (state, Effect::None);
        };
        let Some(child_state) = self.state.get(&state) else {
            tracing::debug!(action = ?child_action, "Dropped action for absent child");
            return (state, Effect::None);
        };
        let (child_state, effect) = self.child.reduce(child_state, child_action, deps);
        let embed = self.action.embedder();
        (self.state.set(state, Some(child_state)), effect.map(move |a| embed(a)))
    }
}

/// [`IfLet`] over the [`PresentationAction`] envelope.
///
/// `Dismiss` clears the child state without running the child reducer.
pub struct IfLetPresented<R: Reducer, PS, PA> {
    child: R,
    state: OptionalLens<PS, R::State>,
    action: ActionPrism<PA, PresentationAction<R::Action>>,
}

impl<R: Reducer, PS, PA> IfLetPresented<R, PS, PA> {
    pub fn new(
        child: R,
        state: OptionalLens<PS, R::State>,
        action: ActionPrism<PA, PresentationAction<R::Action>>,
    ) -> Self {
        Self {
            child,
            state,
            action,
        }
    }
}

impl<R, PS, PA> Reducer for IfLetPresented<R, PS, PA>
where
    R: Reducer,
    PS: UiState,
    PA: Action,
{
    type State = PS;
    type Action = PA;
    type Dependencies = R::Dependencies;

    fn reduce(&self, state: PS, action: PA, deps: &R::Dependencies) -> (PS, Effect<PA>) {
        let child_action = match self.action.extract(action) {
            None => return (state, Effect::None),
            Some(PresentationAction::Dismiss) => return (self.state.set(state, None), Effect::None),
            Some(PresentationAction::Presented(child_action)) => child_action,
        };
        let Some(child_state) = self.state.get(&state) else {
            tracing::debug!(action = ?child_action, "Dropped action for dismissed child");
            return (state, Effect::None);
        };
        let (child_state, effect) = self.child.reduce(child_state, child_action, deps);
        let embed = self.action.embedder();
        (
            self.state.set(state, Some(child_state)),
            effect.map(move |a| embed(PresentationAction::Presented(a))),
        )
    }
}
