//! Store runtime and dispatch loop.

use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::runtime::Handle;
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::effect::{Dispatcher, EffectEngine};
use crate::mvi::Reducer;

use super::error::StoreError;
use super::history::ActionHistory;
use super::subscription::Subscription;

type StateListener<S> = Arc<dyn Fn(&S) + Send + Sync>;
type ActionListener<A, S> = Arc<dyn Fn(&A, &S) + Send + Sync>;

/// Owns the current state of a feature tree and drives its reducer.
///
/// `Store` is a cheap handle; clones share the same state. Actions sent from
/// any task are processed one at a time, strictly in the order they were
/// enqueued. Effects run concurrently on the tokio runtime the store was
/// created on.
pub struct Store<R: Reducer> {
    inner: Arc<StoreInner<R>>,
}

impl<R: Reducer> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct StoreInner<R: Reducer> {
    id: Uuid,
    reducer: R,
    deps: R::Dependencies,
    state: Mutex<R::State>,
    queue: Mutex<DispatchQueue<R::Action>>,
    history: Mutex<ActionHistory<R::Action>>,
    listeners: Mutex<Listeners<R::State, R::Action>>,
    engine: EffectEngine,
    destroyed: AtomicBool,
}

struct DispatchQueue<A> {
    pending: VecDeque<A>,
    draining: bool,
}

/// Listeners are called in subscription order.
struct Listeners<S, A> {
    next_id: u64,
    state: BTreeMap<u64, StateListener<S>>,
    actions: BTreeMap<u64, ActionListener<A, S>>,
}

impl<S, A> Listeners<S, A> {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn clear(&mut self) {
        self.state.clear();
        self.actions.clear();
    }
}

impl<R: Reducer> Store<R> {
    /// Create a store on the current tokio runtime with default settings.
    pub fn new(reducer: R, initial: R::State, deps: R::Dependencies) -> Result<Self, StoreError> {
        Self::with_config(reducer, initial, deps, &StoreConfig::default())
    }

    /// Create a store on the current tokio runtime.
    pub fn with_config(
        reducer: R,
        initial: R::State,
        deps: R::Dependencies,
        config: &StoreConfig,
    ) -> Result<Self, StoreError> {
        let handle = Handle::try_current()?;
        Ok(Self::with_handle(handle, reducer, initial, deps, config))
    }

    /// Create a store whose effects run on `handle`.
    pub fn with_handle(
        handle: Handle,
        reducer: R,
        initial: R::State,
        deps: R::Dependencies,
        config: &StoreConfig,
    ) -> Self {
        let id = Uuid::new_v4();
        tracing::debug!(store = %id, history = config.history_capacity, "Store created");
        Self {
            inner: Arc::new(StoreInner {
                id,
                reducer,
                deps,
                state: Mutex::new(initial),
                queue: Mutex::new(DispatchQueue {
                    pending: VecDeque::new(),
                    draining: false,
                }),
                history: Mutex::new(ActionHistory::new(config.history_capacity)),
                listeners: Mutex::new(Listeners {
                    next_id: 0,
                    state: BTreeMap::new(),
                    actions: BTreeMap::new(),
                }),
                engine: EffectEngine::new(handle),
                destroyed: AtomicBool::new(false),
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> R::State {
        self.inner.state.lock().clone()
    }

    /// Read the current state without cloning it.
    ///
    /// The state lock is held while `read` runs; do not send from inside it.
    pub fn with_state<T>(&self, read: impl FnOnce(&R::State) -> T) -> T {
        read(&self.inner.state.lock())
    }

    /// Most recent actions, oldest first.
    pub fn history(&self) -> Vec<R::Action> {
        self.inner.history.lock().to_vec()
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.load(Ordering::SeqCst)
    }

    /// Dispatcher that feeds actions into this store.
    ///
    /// Holds only a weak reference; sending after the last store handle is
    /// dropped does nothing.
    pub fn dispatcher(&self) -> Dispatcher<R::Action> {
        let weak: Weak<StoreInner<R>> = Arc::downgrade(&self.inner);
        Dispatcher::new(move |action| {
            if let Some(inner) = weak.upgrade() {
                Store { inner }.send(action);
            }
        })
    }

    /// Dispatch an action.
    ///
    /// If another call is already draining the queue (a listener re-entering
    /// the store, or an effect on another task), the action is appended and
    /// processed by that call. Otherwise the caller drains the queue before
    /// returning. A panicking reducer propagates to the caller and discards
    /// the rest of the queue.
    pub fn send(&self, action: R::Action) {
        if self.is_destroyed() {
            tracing::debug!(store = %self.inner.id, action = ?action, "Action sent to destroyed store");
            return;
        }
        {
            let mut queue = self.inner.queue.lock();
            queue.pending.push_back(action);
            if queue.draining {
                return;
            }
            queue.draining = true;
        }

        let inner = Arc::clone(&self.inner);
        let _reset = scopeguard::guard_on_unwind((), move |_| {
            let mut queue = inner.queue.lock();
            queue.pending.clear();
            queue.draining = false;
        });

        loop {
            let next = {
                let mut queue = self.inner.queue.lock();
                match queue.pending.pop_front() {
                    Some(action) => action,
                    None => {
                        queue.draining = false;
                        return;
                    }
                }
            };
            self.process(next);
        }
    }

    fn process(&self, action: R::Action) {
        if self.is_destroyed() {
            return;
        }
        let inner = &self.inner;
        let _span = tracing::trace_span!("dispatch", store = %inner.id).entered();
        tracing::trace!(action = ?action, "Reducing");

        let recorded = action.clone();
        let current = inner.state.lock().clone();
        let (next, effect) = inner.reducer.reduce(current, action, &inner.deps);

        let changed = {
            let mut state = inner.state.lock();
            let changed = *state != next;
            *state = next;
            changed
        };
        inner.history.lock().push(recorded.clone());

        let (state_listeners, action_listeners) = {
            let listeners = inner.listeners.lock();
            let state: Vec<StateListener<R::State>> = if changed {
                listeners.state.values().cloned().collect()
            } else {
                Vec::new()
            };
            let actions: Vec<ActionListener<R::Action, R::State>> =
                listeners.actions.values().cloned().collect();
            (state, actions)
        };
        if !state_listeners.is_empty() || !action_listeners.is_empty() {
            let snapshot = self.state();
            for listener in &state_listeners {
                listener(&snapshot);
            }
            for listener in &action_listeners {
                listener(&recorded, &snapshot);
            }
        }

        inner.engine.execute(effect, self.dispatcher());
    }

    /// Call `listener` with the new state after every dispatch that changed it.
    pub fn subscribe(&self, listener: impl Fn(&R::State) + Send + Sync + 'static) -> Subscription {
        let id = {
            let mut listeners = self.inner.listeners.lock();
            let id = listeners.next_id();
            listeners.state.insert(id, Arc::new(listener));
            id
        };
        let weak = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.listeners.lock().state.remove(&id);
            }
        })
    }

    /// Call `listener` with every dispatched action and the resulting state.
    pub fn subscribe_to_actions(
        &self,
        listener: impl Fn(&R::Action, &R::State) + Send + Sync + 'static,
    ) -> Subscription {
        let id = {
            let mut listeners = self.inner.listeners.lock();
            let id = listeners.next_id();
            listeners.actions.insert(id, Arc::new(listener));
            id
        };
        let weak = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.listeners.lock().actions.remove(&id);
            }
        })
    }

    /// Resolve once the dispatch queue is empty and no effect is in flight.
    ///
    /// With a paused tokio clock this advances through pending timers.
    pub async fn settle(&self) {
        loop {
            self.inner.engine.wait_idle().await;
            let quiet = {
                let queue = self.inner.queue.lock();
                queue.pending.is_empty() && !queue.draining
            };
            if quiet && self.inner.engine.in_flight() == 0 {
                return;
            }
            tokio::task::yield_now().await;
        }
    }

    /// Tear the store down: abort in-flight effects, clear timers and
    /// subscribers. Later sends are ignored.
    pub fn destroy(&self) {
        if self.inner.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.inner.engine.shutdown();
        self.inner.listeners.lock().clear();
        self.inner.queue.lock().pending.clear();
        tracing::debug!(store = %self.inner.id, "Store destroyed");
    }
}
