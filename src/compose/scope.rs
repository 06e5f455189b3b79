use crate::effect::Effect;
use crate::mvi::{Action, Reducer, UiState};

use super::lens::{ActionPrism, StateLens};

/// Embeds a child reducer whose state is always present in the parent.
///
/// Parent actions the prism does not recognize leave the parent state
/// untouched and produce [`Effect::None`].
pub struct Scope<R: Reducer, PS, PA> {
    child: R,
    state: StateLens<PS, R::State>,
    action: ActionPrism<PA, R::Action>,
}

impl<R: Reducer, PS, PA> Scope<R, PS, PA> {
    pub fn new(child: R, state: StateLens<PS, R::State>, action: ActionPrism<PA, R::Action>) -> Self {
        Self {
            child,
            state,
            action,
        }
    }
}

impl<R, PS, PA> Reducer for Scope<R, PS, PA>
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
        let child_state = self.state.get(&state);
        let (child_state, effect) = self.child.reduce(child_state, child_action, deps);
        let embed = self.action.embedder();
        (self.state.set(state, child_state), effect.map(move |a| embed(a)))
    }
}
