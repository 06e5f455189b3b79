//! The effect algebra.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use super::dispatcher::Dispatcher;
use super::id::EffectId;

/// Boxed async body of an effect. Failures are logged by the engine.
pub type BoxFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'static>>;

/// Async producer: receives a dispatcher and may send any number of actions.
pub type Task<A> = Box<dyn FnOnce(Dispatcher<A>) -> BoxFuture + Send + 'static>;

/// Async procedure with no access to dispatch.
pub type Procedure = Box<dyn FnOnce() -> BoxFuture + Send + 'static>;

/// Inert description of a side effect.
///
/// An effect holds no runtime bookkeeping. Timers and abort handles for the
/// keyed variants live in the [`EffectEngine`](super::EffectEngine), keyed by
/// the effect's [`EffectId`].
pub enum Effect<A> {
    None,
    Run(Task<A>),
    FireAndForget(Procedure),
    Batch(Vec<Effect<A>>),
    /// Aborts any in-flight work registered under the same id before starting.
    Cancellable { id: EffectId, task: Task<A> },
    /// Runs only if no newer effect with the same id arrives within `delay`.
    Debounced {
        id: EffectId,
        delay: Duration,
        task: Task<A>,
    },
    /// At most one execution per `interval`, with a single trailing run.
    Throttled {
        id: EffectId,
        interval: Duration,
        task: Task<A>,
    },
    AfterDelay { delay: Duration, task: Task<A> },
    /// Cancels cancellable work, a pending debounce and a pending throttle
    /// trailer under the id.
    Cancel(EffectId),
}

/// Structural description of an effect, for inspection and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectKind {
    None,
    Run,
    FireAndForget,
    Batch(Vec<EffectKind>),
    Cancellable(EffectId),
    Debounced { id: EffectId, delay: Duration },
    Throttled { id: EffectId, interval: Duration },
    AfterDelay(Duration),
    Cancel(EffectId),
}

fn boxed_task<A, F, Fut>(body: F) -> Task<A>
where
    A: Send + 'static,
    F: FnOnce(Dispatcher<A>) -> Fut + Send + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Box::new(move |dispatcher| Box::pin(body(dispatcher)))
}

impl<A: Send + 'static> Effect<A> {
    pub fn none() -> Self {
        Effect::None
    }

    pub fn run<F, Fut>(body: F) -> Self
    where
        F: FnOnce(Dispatcher<A>) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Effect::Run(boxed_task(body))
    }

    pub fn fire_and_forget<F, Fut>(body: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Effect::FireAndForget(Box::new(move || Box::pin(body())))
    }

    /// Dispatch `action` as soon as the engine picks the effect up.
    pub fn send(action: A) -> Self {
        Effect::run(move |dispatcher| async move {
            dispatcher.send(action);
            Ok(())
        })
    }

    /// Combine effects to run concurrently.
    ///
    /// `None` members are dropped; an empty batch is `None` and a batch of one
    /// is that single effect.
    pub fn batch(effects: impl IntoIterator<Item = Effect<A>>) -> Self {
        let mut effects: Vec<Effect<A>> =
            effects.into_iter().filter(|e| !e.is_none()).collect();
        match effects.len() {
            0 => Effect::None,
            1 => effects.pop().unwrap_or(Effect::None),
            _ => Effect::Batch(effects),
        }
    }

    /// Batch `self` with `other`.
    pub fn merge(self, other: Effect<A>) -> Self {
        Effect::batch([self, other])
    }

    pub fn cancellable<F, Fut>(id: impl Into<EffectId>, body: F) -> Self
    where
        F: FnOnce(Dispatcher<A>) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Effect::Cancellable {
            id: id.into(),
            task: boxed_task(body),
        }
    }

    pub fn debounced<F, Fut>(id: impl Into<EffectId>, delay: Duration, body: F) -> Self
    where
        F: FnOnce(Dispatcher<A>) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Effect::Debounced {
            id: id.into(),
            delay,
            task: boxed_task(body),
        }
    }

    pub fn throttled<F, Fut>(id: impl Into<EffectId>, interval: Duration, body: F) -> Self
    where
        F: FnOnce(Dispatcher<A>) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Effect::Throttled {
            id: id.into(),
            interval,
            task: boxed_task(body),
        }
    }

    pub fn after_delay<F, Fut>(delay: Duration, body: F) -> Self
    where
        F: FnOnce(Dispatcher<A>) -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Effect::AfterDelay {
            delay,
            task: boxed_task(body),
        }
    }

    /// Dispatch `action` once after `delay`.
    pub fn send_after(delay: Duration, action: A) -> Self {
        Effect::after_delay(delay, move |dispatcher| async move {
            dispatcher.send(action);
            Ok(())
        })
    }

    pub fn cancel(id: impl Into<EffectId>) -> Self {
        Effect::Cancel(id.into())
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Effect::None)
    }

    pub fn kind(&self) -> EffectKind {
        match self {
            Effect::None => EffectKind::None,
            Effect::Run(_) => EffectKind::Run,
            Effect::FireAndForget(_) => EffectKind::FireAndForget,
            Effect::Batch(effects) => EffectKind::Batch(effects.iter().map(Effect::kind).collect()),
            Effect::Cancellable { id, .. } => EffectKind::Cancellable(id.clone()),
            Effect::Debounced { id, delay, .. } => EffectKind::Debounced {
                id: id.clone(),
                delay: *delay,
            },
            Effect::Throttled { id, interval, .. } => EffectKind::Throttled {
                id: id.clone(),
                interval: *interval,
            },
            Effect::AfterDelay { delay, .. } => EffectKind::AfterDelay(*delay),
            Effect::Cancel(id) => EffectKind::Cancel(id.clone()),
        }
    }

    /// Rewrite every action this effect would dispatch through `transform`.
    ///
    /// Applied once per composition layer, this is how a child feature's
    /// effects become effects of its parent.
    pub fn map<B, F>(self, transform: F) -> Effect<B>
    where
        B: Send + 'static,
        F: Fn(A) -> B + Send + Sync + 'static,
    {
        self.map_shared(Arc::new(transform))
    }

    fn map_shared<B>(self, transform: Arc<dyn Fn(A) -> B + Send + Sync>) -> Effect<B>
    where
        B: Send + 'static,
    {
        match self {
            Effect::None => Effect::None,
            Effect::Run(task) => Effect::Run(map_task(task, transform)),
            Effect::FireAndForget(procedure) => Effect::FireAndForget(procedure),
            Effect::Batch(effects) => Effect::Batch(
                effects
                    .into_iter()
                    .map(|e| e.map_shared(Arc::clone(&transform)))
                    .collect(),
            ),
            Effect::Cancellable { id, task } => Effect::Cancellable {
                id,
                task: map_task(task, transform),
            },
            Effect::Debounced { id, delay, task } => Effect::Debounced {
                id,
                delay,
                task: map_task(task, transform),
            },
            Effect::Throttled { id, interval, task } => Effect::Throttled {
                id,
                interval,
                task: map_task(task, transform),
            },
            Effect::AfterDelay { delay, task } => Effect::AfterDelay {
                delay,
                task: map_task(task, transform),
            },
            Effect::Cancel(id) => Effect::Cancel(id),
        }
    }
}

fn map_task<A, B>(task: Task<A>, transform: Arc<dyn Fn(A) -> B + Send + Sync>) -> Task<B>
where
    A: Send + 'static,
    B: Send + 'static,
{
    Box::new(move |dispatcher: Dispatcher<B>| task(dispatcher.embed(move |a| transform(a))))
}

impl<A> Default for Effect<A> {
    fn default() -> Self {
        Effect::None
    }
}

impl<A: Send + 'static> fmt::Debug for Effect<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind())
    }
}
