//! Unidirectional data flow primitives.
//!
//! # Architecture
//!
//! ```text
//! Action ──→ Reducer ──→ (State, Effect)
//!    ↑                          │
//!    └──── Effect engine ───────┘
//! ```
//!
//! - **State**: Immutable value tree, replaced on every transition
//! - **Action**: Discrete event, user or system originated
//! - **Reducer**: Pure function producing the next state and an inert effect

mod action;
mod reducer;
mod state;

pub use action::Action;
pub use reducer::Reducer;
pub use state::UiState;
