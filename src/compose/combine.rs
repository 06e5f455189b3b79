use crate::effect::Effect;
use crate::mvi::Reducer;

/// Runs `first` then `second` over the same state and action.
///
/// The effects of both are batched. This is how a parent's own logic is
/// glued to the scoped reducers of its children.
pub struct Combine<A, B> {
    first: A,
    second: B,
}

impl<A, B> Combine<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A, B> Reducer for Combine<A, B>
where
    A: Reducer,
    B: Reducer<State = A::State, Action = A::Action, Dependencies = A::Dependencies>,
{
    type State = A::State;
    type Action = A::Action;
    type Dependencies = A::Dependencies;

    fn reduce(
        &self,
        state: A::State,
        action: A::Action,
        deps: &A::Dependencies,
    ) -> (A::State, Effect<A::Action>) {
        let (state, first) = self.first.reduce(state, action.clone(), deps);
        let (state, second) = self.second.reduce(state, action, deps);
        (state, first.merge(second))
    }
}
