//! Accessors used by the composition operators.

use std::fmt;
use std::sync::Arc;

type Getter<P, C> = Arc<dyn Fn(&P) -> C + Send + Sync>;
type Setter<P, C> = Arc<dyn Fn(P, C) -> P + Send + Sync>;

/// Reads a required child state out of a parent and writes it back.
pub struct StateLens<P, C> {
    get: Getter<P, C>,
    set: Setter<P, C>,
}

impl<P, C> StateLens<P, C> {
    pub fn new(
        get: impl Fn(&P) -> C + Send + Sync + 'static,
        set: impl Fn(P, C) -> P + Send + Sync + 'static,
    ) -> Self {
        Self {
            get: Arc::new(get),
            set: Arc::new(set),
        }
    }

    pub fn get(&self, parent: &P) -> C {
        (self.get)(parent)
    }

    pub fn set(&self, parent: P, child: C) -> P {
        (self.set)(parent, child)
    }
}

/// Reads an optional child state out of a parent and writes it back.
pub struct OptionalLens<P, C> {
    get: Getter<P, Option<C>>,
    set: Setter<P, Option<C>>,
}

impl<P, C> OptionalLens<P, C> {
    pub fn new(
        get: impl Fn(&P) -> Option<C> + Send + Sync + 'static,
        set: impl Fn(P, Option<C>) -> P + Send + Sync + 'static,
    ) -> Self {
        Self {
            get: Arc::new(get),
            set: Arc::new(set),
        }
    }

    pub fn get(&self, parent: &P) -> Option<C> {
        (self.get)(parent)
    }

    pub fn set(&self, parent: P, child: Option<C>) -> P {
        (self.set)(parent, child)
    }
}

/// Extracts a child action from a parent action and wraps child actions
/// back into the parent type.
pub struct ActionPrism<P, C> {
    extract: Arc<dyn Fn(P) -> Option<C> + Send + Sync>,
    embed: Arc<dyn Fn(C) -> P + Send + Sync>,
}

impl<P, C> ActionPrism<P, C> {
    pub fn new(
        extract: impl Fn(P) -> Option<C> + Send + Sync + 'static,
        embed: impl Fn(C) -> P + Send + Sync + 'static,
    ) -> Self {
        Self {
            extract: Arc::new(extract),
            embed: Arc::new(embed),
        }
    }

    /// `None` when the parent action does not target this child.
    pub fn extract(&self, parent: P) -> Option<C> {
        (self.extract)(parent)
    }

    pub fn embed(&self, child: C) -> P {
        (self.embed)(child)
    }

    /// Shared handle to the embedder, for rewriting child effects.
    pub fn embedder(&self) -> Arc<dyn Fn(C) -> P + Send + Sync> {
        Arc::clone(&self.embed)
    }
}

impl<P, C> fmt::Debug for ActionPrism<P, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionPrism").finish_non_exhaustive()
    }
}
