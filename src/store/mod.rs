//! The store: owns state, serializes dispatch, and runs effects.
//!
//! ```text
//! send(action) ──→ queue ──→ reducer ──→ state ──→ subscribers
//!      ↑                        │
//!      └──── EffectEngine ←─────┘
//! ```

mod error;
mod history;
mod runtime;
mod subscription;

pub use error::StoreError;
pub use history::ActionHistory;
pub use runtime::Store;
pub use subscription::Subscription;
