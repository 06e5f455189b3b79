//! Animated presentation lifecycle.
//!
//! ```text
//! Idle ──present──→ Presenting ──completed/timeout──→ Presented
//!  ↑                                                     │
//!  └──completed/timeout── Dismissing ←────dismiss────────┘
//! ```
//!
//! Completion events come from the UI's animation callback; the timeout
//! variants are scheduled alongside as a fallback for callbacks that never
//! fire. Both are guarded by the current status, so whichever arrives second
//! is a no-op.

use std::marker::PhantomData;
use std::time::Duration;

use crate::config::PresentationConfig;
use crate::effect::Effect;
use crate::mvi::{Action, Reducer, UiState};

/// Animation status of a destination, carrying the content being shown.
///
/// `content` stays available while dismissing so the UI can keep rendering
/// the outgoing view.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PresentationState<T> {
    #[default]
    Idle,
    Presenting {
        content: T,
        duration: Option<Duration>,
    },
    Presented {
        content: T,
    },
    Dismissing {
        content: T,
        duration: Option<Duration>,
    },
}

impl<T: UiState> UiState for PresentationState<T> {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresentationStatus {
    Idle,
    Presenting,
    Presented,
    Dismissing,
}

impl<T> PresentationState<T> {
    pub fn status(&self) -> PresentationStatus {
        match self {
            Self::Idle => PresentationStatus::Idle,
            Self::Presenting { .. } => PresentationStatus::Presenting,
            Self::Presented { .. } => PresentationStatus::Presented,
            Self::Dismissing { .. } => PresentationStatus::Dismissing,
        }
    }

    pub fn content(&self) -> Option<&T> {
        match self {
            Self::Idle => None,
            Self::Presenting { content, .. }
            | Self::Presented { content }
            | Self::Dismissing { content, .. } => Some(content),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Same status with new content. `Idle` stays `Idle`.
    fn with_content(self, content: T) -> Self {
        match self {
            Self::Idle => Self::Idle,
            Self::Presenting { duration, .. } => Self::Presenting { content, duration },
            Self::Presented { .. } => Self::Presented { content },
            Self::Dismissing { duration, .. } => Self::Dismissing { content, duration },
        }
    }
}

/// Lifecycle signals for [`PresentationState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationEvent {
    PresentationCompleted,
    PresentationTimeout,
    DismissalCompleted,
    DismissalTimeout,
}

impl Action for PresentationEvent {}

/// A destination and its presentation status, kept consistent together.
///
/// Fields are only changed through [`present`](Self::present),
/// [`dismiss`](Self::dismiss), [`apply`](Self::apply) and
/// [`set_destination`](Self::set_destination). Once settled, the destination
/// is present exactly when the status is not idle.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentable<D> {
    destination: Option<D>,
    presentation: PresentationState<D>,
}

impl<D> Default for Presentable<D> {
    fn default() -> Self {
        Self {
            destination: None,
            presentation: PresentationState::Idle,
        }
    }
}

impl<D: UiState> UiState for Presentable<D> {}

impl<D: UiState> Presentable<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn destination(&self) -> Option<&D> {
        self.destination.as_ref()
    }

    pub fn presentation(&self) -> &PresentationState<D> {
        &self.presentation
    }

    pub fn status(&self) -> PresentationStatus {
        self.presentation.status()
    }

    /// Show `content`, scheduling completion after the animation and a
    /// timeout fallback.
    ///
    /// Neither event is cancelled by a later cycle. See [`Self::dismiss`].
    pub fn present(
        self,
        content: D,
        config: &PresentationConfig,
    ) -> (Self, Effect<PresentationEvent>) {
        let animation = config.animation();
        let next = Self {
            destination: Some(content.clone()),
            presentation: PresentationState::Presenting {
                content,
                duration: Some(animation),
            },
        };
        let effect = Effect::batch([
            Effect::send_after(animation, PresentationEvent::PresentationCompleted),
            Effect::send_after(config.timeout(), PresentationEvent::PresentationTimeout),
        ]);
        (next, effect)
    }

    /// Start animating the destination out. The destination stays in place
    /// until the dismissal completes.
    ///
    /// No-op when nothing is presented or a dismissal is already running.
    ///
    /// Events carry no cycle marker and are only guarded by status. A timeout
    /// left over from an earlier dismissal that lands during a later one
    /// completes that later dismissal early. Keep the timeout multiplier
    /// large enough that a full re-present and re-dismiss cannot fit inside it
    /// if that matters to the feature.
    pub fn dismiss(self, config: &PresentationConfig) -> (Self, Effect<PresentationEvent>) {
        if self.presentation.status() == PresentationStatus::Dismissing {
            return (self, Effect::None);
        }
        let Some(content) = self.destination.clone() else {
            return (self, Effect::None);
        };
        let animation = config.animation();
        let next = Self {
            destination: self.destination,
            presentation: PresentationState::Dismissing {
                content,
                duration: Some(animation),
            },
        };
        let effect = Effect::batch([
            Effect::send_after(animation, PresentationEvent::DismissalCompleted),
            Effect::send_after(config.timeout(), PresentationEvent::DismissalTimeout),
        ]);
        (next, effect)
    }

    /// Apply a lifecycle event. Events that do not match the current status
    /// are ignored.
    pub fn apply(self, event: PresentationEvent) -> Self {
        match (event, self.presentation) {
            (
                PresentationEvent::PresentationCompleted | PresentationEvent::PresentationTimeout,
                PresentationState::Presenting { content, .. },
            ) => Self {
                destination: self.destination,
                presentation: PresentationState::Presented { content },
            },
            (
                PresentationEvent::DismissalCompleted | PresentationEvent::DismissalTimeout,
                PresentationState::Dismissing { .. },
            ) => Self::default(),
            (event, presentation) => {
                tracing::trace!(event = ?event, status = ?presentation.status(), "Ignored stale presentation event");
                Self {
                    destination: self.destination,
                    presentation,
                }
            }
        }
    }

    /// Replace the destination value, as written back by a child reducer.
    ///
    /// `None` clears both fields at once (dismissal without animation). A
    /// value arriving while idle counts as already presented. Otherwise the
    /// status is kept and its content refreshed.
    pub fn set_destination(self, destination: Option<D>) -> Self {
        match destination {
            None => Self::default(),
            Some(content) => {
                let presentation = match self.presentation {
                    PresentationState::Idle => PresentationState::Presented {
                        content: content.clone(),
                    },
                    other => other.with_content(content.clone()),
                };
                Self {
                    destination: Some(content),
                    presentation,
                }
            }
        }
    }
}

/// Reducer applying [`PresentationEvent`]s to a [`Presentable`].
///
/// Generic over the dependency type so it can be scoped into any parent.
pub struct PresentationReducer<D, Deps = ()> {
    _marker: PhantomData<fn() -> (D, Deps)>,
}

impl<D, Deps> PresentationReducer<D, Deps> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<D, Deps> Default for PresentationReducer<D, Deps> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, Deps> Reducer for PresentationReducer<D, Deps>
where
    D: UiState,
    Deps: Send + Sync + 'static,
{
    type State = Presentable<D>;
    type Action = PresentationEvent;
    type Dependencies = Deps;

    fn reduce(
        &self,
        state: Presentable<D>,
        event: PresentationEvent,
        _deps: &Deps,
    ) -> (Presentable<D>, Effect<PresentationEvent>) {
        (state.apply(event), Effect::None)
    }
}
