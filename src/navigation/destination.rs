//! Enum-routed child features.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::compose::PresentationAction;
use crate::effect::Effect;
use crate::mvi::{Action, Reducer, UiState};

/// A value belonging to one case of a closed set, identified by its tag.
pub trait Tagged {
    type Tag: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    fn tag(&self) -> Self::Tag;
}

/// Enum of child feature states that can be presented by a parent.
///
/// The companion action enum shares the tag type, so an action's tag names
/// the case it is addressed to.
pub trait Destination: Tagged + UiState {
    type Action: Tagged<Tag = Self::Tag> + Action;
}

/// Projection into one variant of an enum, and the variant's constructor.
///
/// Build with [`case_path!`](crate::case_path).
pub struct CasePath<Root, Value> {
    embed: fn(Value) -> Root,
    project: fn(&Root) -> Option<&Value>,
}

impl<Root, Value> Clone for CasePath<Root, Value> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Root, Value> Copy for CasePath<Root, Value> {}

impl<Root, Value> CasePath<Root, Value> {
    pub const fn new(embed: fn(Value) -> Root, project: fn(&Root) -> Option<&Value>) -> Self {
        Self { embed, project }
    }

    pub fn embed(&self, value: Value) -> Root {
        (self.embed)(value)
    }

    pub fn project<'a>(&self, root: &'a Root) -> Option<&'a Value> {
        (self.project)(root)
    }

    /// A destination presenting `value` in this case.
    pub fn initial(&self, value: Value) -> Option<Root> {
        Some(self.embed(value))
    }

    /// The child state if `destination` is currently in this case.
    pub fn extract<'a>(&self, destination: &'a Option<Root>) -> Option<&'a Value> {
        destination.as_ref().and_then(|root| self.project(root))
    }
}

/// Builds a [`CasePath`] for a single-field tuple variant.
///
/// ```
/// use unistate::case_path;
///
/// #[derive(Debug, PartialEq)]
/// enum Sheet {
///     Edit(String),
///     Confirm(bool),
/// }
///
/// let edit = case_path!(Sheet::Edit);
/// let sheet = edit.initial("draft".to_string());
/// assert_eq!(edit.extract(&sheet), Some(&"draft".to_string()));
/// assert_eq!(case_path!(Sheet::Confirm).extract(&sheet), None);
/// ```
#[macro_export]
macro_rules! case_path {
    ($($variant:ident)::+) => {
        $crate::navigation::CasePath::new($($variant)::+, |root| match root {
            $($variant)::+(value) => ::std::option::Option::Some(value),
            #[allow(unreachable_patterns)]
            _ => ::std::option::Option::None,
        })
    };
}

/// The destination if its tag is `tag`.
pub fn extract_tag<D: Tagged>(destination: &Option<D>, tag: D::Tag) -> Option<&D> {
    destination.as_ref().filter(|d| d.tag() == tag)
}

type CaseHandler<D, Deps> = Box<
    dyn Fn(&D, <D as Destination>::Action, &Deps) -> Option<(D, Effect<<D as Destination>::Action>)>
        + Send
        + Sync,
>;

/// Routes actions to the reducer registered for the active destination case.
///
/// Reduces `Option<D>` under `PresentationAction<D::Action>`. An action is
/// dropped when its case has no reducer, when nothing is presented, or when
/// a different case is active. `Dismiss` passes through untouched: clearing
/// the destination is the parent's job, after its own cleanup.
pub struct DestinationRouter<D: Destination, Deps> {
    cases: HashMap<D::Tag, CaseHandler<D, Deps>>,
}

impl<D: Destination, Deps: Send + Sync + 'static> Default for DestinationRouter<D, Deps> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Destination, Deps: Send + Sync + 'static> DestinationRouter<D, Deps> {
    pub fn new() -> Self {
        Self {
            cases: HashMap::new(),
        }
    }

    /// Register `reducer` for the case `tag`.
    pub fn case<R>(
        mut self,
        tag: D::Tag,
        state: CasePath<D, R::State>,
        action: CasePath<D::Action, R::Action>,
        reducer: R,
    ) -> Self
    where
        R: Reducer<Dependencies = Deps>,
    {
        let handler: CaseHandler<D, Deps> = Box::new(move |current: &D, event: D::Action, deps: &Deps| {
            let child_state = state.project(current)?.clone();
            let child_action = action.project(&event)?.clone();
            let (child_state, effect) = reducer.reduce(child_state, child_action, deps);
            let embed = action.embed;
            Some((state.embed(child_state), effect.map(embed)))
        });
        if self.cases.insert(tag, handler).is_some() {
            tracing::warn!(tag = ?tag, "Destination case registered twice; keeping the latest");
        }
        self
    }

    pub fn handles(&self, tag: D::Tag) -> bool {
        self.cases.contains_key(&tag)
    }
}

impl<D, Deps> Reducer for DestinationRouter<D, Deps>
where
    D: Destination,
    Deps: Send + Sync + 'static,
{
    type State = Option<D>;
    type Action = PresentationAction<D::Action>;
    type Dependencies = Deps;

    fn reduce(
        &self,
        state: Option<D>,
        action: PresentationAction<D::Action>,
        deps: &Deps,
    ) -> (Option<D>, Effect<PresentationAction<D::Action>>) {
        let PresentationAction::Presented(action) = action else {
            return (state, Effect::None);
        };
        let tag = action.tag();
        let Some(handler) = self.cases.get(&tag) else {
            tracing::debug!(tag = ?tag, "No reducer registered for destination case");
            return (state, Effect::None);
        };
        let Some(current) = state else {
            tracing::debug!(tag = ?tag, "Dropped action for dismissed destination");
            return (None, Effect::None);
        };
        if current.tag() != tag {
            tracing::debug!(tag = ?tag, active = ?current.tag(), "Dropped action for inactive destination");
            return (Some(current), Effect::None);
        }
        match handler(&current, action, deps) {
            Some((next, effect)) => (Some(next), effect.map(PresentationAction::Presented)),
            None => {
                tracing::warn!(tag = ?tag, "Destination case path does not match its tag");
                (Some(current), Effect::None)
            }
        }
    }
}
