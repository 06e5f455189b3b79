use crate::mvi::Action;

/// Envelope for actions addressed to an optional child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationAction<A> {
    /// An action for the presented child.
    Presented(A),
    /// Remove the child. Handled by the owner of the optional state.
    Dismiss,
}

impl<A: Action> Action for PresentationAction<A> {}

impl<A> PresentationAction<A> {
    pub fn presented(self) -> Option<A> {
        match self {
            PresentationAction::Presented(action) => Some(action),
            PresentationAction::Dismiss => None,
        }
    }

    pub fn is_dismiss(&self) -> bool {
        matches!(self, PresentationAction::Dismiss)
    }
}
