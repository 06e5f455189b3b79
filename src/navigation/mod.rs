//! Navigation as state.
//!
//! - [`DestinationRouter`]: one reducer over a closed enum of child features,
//!   routed by tag
//! - [`Presentable`]: a destination paired with its animated
//!   [`PresentationState`] lifecycle
//! - [`StackReducer`]: drill-down stack with push/pop/replace-path

mod destination;
mod presentation;
mod stack;

pub use destination::{extract_tag, CasePath, Destination, DestinationRouter, Tagged};
pub use presentation::{
    Presentable, PresentationEvent, PresentationReducer, PresentationState, PresentationStatus,
};
pub use stack::{StackAction, StackReducer, StackState};
