//! Drill-down navigation stack.

use crate::compose::PresentationAction;
use crate::effect::Effect;
use crate::mvi::{Action, Reducer, UiState};

/// Ordered screen states. Index 0 is the root and is never removed.
#[derive(Debug, Clone, PartialEq)]
pub struct StackState<S> {
    screens: Vec<S>,
}

impl<S: UiState> UiState for StackState<S> {}

impl<S> StackState<S> {
    pub fn new(root: S) -> Self {
        Self {
            screens: vec![root],
        }
    }

    /// Stack from an explicit path. `None` when `path` is empty.
    pub fn from_path(path: Vec<S>) -> Option<Self> {
        if path.is_empty() {
            None
        } else {
            Some(Self { screens: path })
        }
    }

    pub fn screens(&self) -> &[S] {
        &self.screens
    }

    pub fn len(&self) -> usize {
        self.screens.len()
    }

    /// True when only the root is on the stack.
    pub fn is_at_root(&self) -> bool {
        self.screens.len() == 1
    }

    pub fn root(&self) -> &S {
        &self.screens[0]
    }

    pub fn top(&self) -> &S {
        &self.screens[self.screens.len() - 1]
    }

    pub fn get(&self, index: usize) -> Option<&S> {
        self.screens.get(index)
    }

    pub fn push(mut self, screen: S) -> Self {
        self.screens.push(screen);
        self
    }

    /// Remove the top screen. At the root this is a no-op.
    pub fn pop(mut self) -> Self {
        if self.screens.len() > 1 {
            self.screens.pop();
        }
        self
    }

    pub fn pop_to_root(mut self) -> Self {
        self.screens.truncate(1);
        self
    }

    /// Replace every screen. An empty path leaves the stack unchanged.
    pub fn set_path(self, path: Vec<S>) -> Self {
        Self::from_path(path).unwrap_or(self)
    }

    /// Keep the first `len` screens, never fewer than one.
    fn truncate(mut self, len: usize) -> Self {
        self.screens.truncate(len.max(1));
        self
    }

    fn replace(mut self, index: usize, screen: S) -> Self {
        self.screens[index] = screen;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StackAction<S, A> {
    Push(S),
    Pop,
    PopToRoot,
    /// Replace the whole stack, e.g. when restoring a deep link.
    SetPath(Vec<S>),
    /// Action for the screen at `index`. `Dismiss` pops that screen and every
    /// screen above it.
    Element {
        index: usize,
        action: PresentationAction<A>,
    },
}

impl<S: UiState, A: Action> Action for StackAction<S, A> {}

/// Runs the per-screen reducer `R` for each element of a [`StackState`].
///
/// Effects from a screen are routed back to the same index. If the stack has
/// shrunk by the time they dispatch, the action is dropped as out of range.
pub struct StackReducer<R> {
    screen: R,
}

impl<R: Reducer> StackReducer<R> {
    pub fn new(screen: R) -> Self {
        Self { screen }
    }
}

impl<R: Reducer> Reducer for StackReducer<R> {
    type State = StackState<R::State>;
    type Action = StackAction<R::State, R::Action>;
    type Dependencies = R::Dependencies;

    fn reduce(
        &self,
        state: Self::State,
        action: Self::Action,
        deps: &R::Dependencies,
    ) -> (Self::State, Effect<Self::Action>) {
        match action {
            StackAction::Push(screen) => (state.push(screen), Effect::None),
            StackAction::Pop => (state.pop(), Effect::None),
            StackAction::PopToRoot => (state.pop_to_root(), Effect::None),
            StackAction::SetPath(path) => {
                if path.is_empty() {
                    tracing::warn!("Ignoring empty stack path, the root screen is required");
                    return (state, Effect::None);
                }
                (state.set_path(path), Effect::None)
            }
            StackAction::Element { index, action } => {
                let Some(screen) = state.get(index).cloned() else {
                    tracing::debug!(index, depth = state.len(), "Stack element out of range");
                    return (state, Effect::None);
                };
                match action {
                    PresentationAction::Dismiss if index == 0 => {
                        tracing::debug!("Ignoring dismiss of the root screen");
                        (state, Effect::None)
                    }
                    PresentationAction::Dismiss => (state.truncate(index), Effect::None),
                    PresentationAction::Presented(action) => {
                        let (screen, effect) = self.screen.reduce(screen, action, deps);
                        let effect = effect.map(move |action| StackAction::Element {
                            index,
                            action: PresentationAction::Presented(action),
                        });
                        (state.replace(index, screen), effect)
                    }
                }
            }
        }
    }
}
