//! Effect interpreter.
//!
//! Every spawned task is tracked so that [`EffectEngine::shutdown`] can abort
//! it. Keyed variants additionally keep a slot per [`EffectId`] holding a
//! generation number; a slot is only ever released by the generation that
//! created it, so late cleanup from superseded work cannot clobber newer
//! registrations.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::task::AbortHandle;
use tokio::time::Instant;

use super::dispatcher::Dispatcher;
use super::id::EffectId;
use super::value::{BoxFuture, Effect, Task};

/// Runs [`Effect`] values on a tokio runtime.
#[derive(Clone)]
pub struct EffectEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    handle: Handle,
    registry: Mutex<Registry>,
    idle: Notify,
    shut_down: AtomicBool,
}

#[derive(Default)]
struct Registry {
    next_task: u64,
    next_generation: u64,
    tasks: HashMap<u64, AbortHandle>,
    cancellable: HashMap<EffectId, Slot>,
    debounce: HashMap<EffectId, Slot>,
    throttle: HashMap<EffectId, ThrottleWindow>,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    generation: u64,
    task: u64,
}

#[derive(Default)]
struct ThrottleWindow {
    last_run: Option<Instant>,
    trailing: Option<Slot>,
}

impl Registry {
    fn generation(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    /// Detach a task from tracking and hand back its abort handle.
    fn release(&mut self, slot: Slot) -> Option<AbortHandle> {
        self.tasks.remove(&slot.task)
    }
}

impl EffectEngine {
    pub fn new(handle: Handle) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                handle,
                registry: Mutex::new(Registry::default()),
                idle: Notify::new(),
                shut_down: AtomicBool::new(false),
            }),
        }
    }

    /// Number of spawned tasks that have not finished yet, timers included.
    pub fn in_flight(&self) -> usize {
        self.inner.registry.lock().tasks.len()
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.shut_down.load(Ordering::SeqCst)
    }

    /// Resolve once no task is in flight.
    pub async fn wait_idle(&self) {
        loop {
            // Register interest before checking to avoid a lost wakeup.
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.in_flight() == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Abort all in-flight work and pending timers. Later effects are dropped.
    pub fn shutdown(&self) {
        if self.inner.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }
        let handles: Vec<AbortHandle> = {
            let mut registry = self.inner.registry.lock();
            registry.cancellable.clear();
            registry.debounce.clear();
            registry.throttle.clear();
            registry.tasks.drain().map(|(_, handle)| handle).collect()
        };
        tracing::debug!(aborted = handles.len(), "Effect engine shut down");
        for handle in handles {
            handle.abort();
        }
        self.inner.idle.notify_waiters();
    }

    /// Start executing `effect`. Never blocks the caller.
    pub fn execute<A: Send + 'static>(&self, effect: Effect<A>, dispatcher: Dispatcher<A>) {
        if self.is_shut_down() {
            if !effect.is_none() {
                tracing::debug!(effect = ?effect, "Effect dropped after shutdown");
            }
            return;
        }
        let weak = Arc::downgrade(&self.inner);
        let dispatcher = dispatcher.fenced(move || {
            weak.upgrade()
                .is_some_and(|inner| !inner.shut_down.load(Ordering::SeqCst))
        });
        self.execute_fenced(effect, dispatcher);
    }

    fn execute_fenced<A: Send + 'static>(&self, effect: Effect<A>, dispatcher: Dispatcher<A>) {
        match effect {
            Effect::None => {}
            Effect::Run(task) => {
                let mut registry = self.inner.registry.lock();
                self.spawn_locked(&mut registry, async move { report(task(dispatcher)).await });
            }
            Effect::FireAndForget(procedure) => {
                let mut registry = self.inner.registry.lock();
                self.spawn_locked(&mut registry, async move { report(procedure()).await });
            }
            Effect::Batch(effects) => {
                for effect in effects {
                    self.execute_fenced(effect, dispatcher.clone());
                }
            }
            Effect::Cancellable { id, task } => self.start_cancellable(id, task, dispatcher),
            Effect::Debounced { id, delay, task } => {
                self.start_debounced(id, delay, task, dispatcher)
            }
            Effect::Throttled { id, interval, task } => {
                self.start_throttled(id, interval, task, dispatcher)
            }
            Effect::AfterDelay { delay, task } => {
                let mut registry = self.inner.registry.lock();
                self.spawn_locked(&mut registry, async move {
                    tokio::time::sleep(delay).await;
                    report(task(dispatcher)).await;
                });
            }
            Effect::Cancel(id) => self.cancel(&id),
        }
    }

    fn start_cancellable<A: Send + 'static>(
        &self,
        id: EffectId,
        task: Task<A>,
        dispatcher: Dispatcher<A>,
    ) {
        let mut registry = self.inner.registry.lock();
        let superseded = registry
            .cancellable
            .remove(&id)
            .and_then(|slot| registry.release(slot));
        let generation = registry.generation();

        let weak = Arc::downgrade(&self.inner);
        let fence_id = id.clone();
        let dispatcher = dispatcher.fenced(move || {
            weak.upgrade().is_some_and(|inner| {
                inner
                    .registry
                    .lock()
                    .cancellable
                    .get(&fence_id)
                    .is_some_and(|slot| slot.generation == generation)
            })
        });

        let weak = Arc::downgrade(&self.inner);
        let guard_id = id.clone();
        let key = self.spawn_locked(&mut registry, async move {
            let _deregister = scopeguard::guard((), move |_| {
                release_slot(&weak, cancellable_slots, &guard_id, generation);
            });
            report(task(dispatcher)).await;
        });
        registry.cancellable.insert(id.clone(), Slot { generation, task: key });
        drop(registry);

        if let Some(handle) = superseded {
            tracing::debug!(id = %id, "Cancelled superseded effect");
            handle.abort();
        }
    }

    fn start_debounced<A: Send + 'static>(
        &self,
        id: EffectId,
        delay: Duration,
        task: Task<A>,
        dispatcher: Dispatcher<A>,
    ) {
        let mut registry = self.inner.registry.lock();
        let pending = registry
            .debounce
            .remove(&id)
            .and_then(|slot| registry.release(slot));
        let generation = registry.generation();

        let weak = Arc::downgrade(&self.inner);
        let timer_id = id.clone();
        let key = self.spawn_locked(&mut registry, async move {
            {
                let weak = weak.clone();
                let guard_id = timer_id.clone();
                let _deregister = scopeguard::guard((), move |_| {
                    release_slot(&weak, debounce_slots, &guard_id, generation);
                });
                tokio::time::sleep(delay).await;
            }
            // The slot is released when the timer fires, so only a pending
            // timer can be reset by a newer call.
            report(task(dispatcher)).await;
        });
        registry.debounce.insert(id.clone(), Slot { generation, task: key });
        drop(registry);

        if let Some(handle) = pending {
            tracing::trace!(id = %id, "Debounce window reset");
            handle.abort();
        }
    }

    fn start_throttled<A: Send + 'static>(
        &self,
        id: EffectId,
        interval: Duration,
        task: Task<A>,
        dispatcher: Dispatcher<A>,
    ) {
        let now = Instant::now();
        let mut registry = self.inner.registry.lock();
        let window = registry.throttle.remove(&id).unwrap_or_default();

        let elapsed = window.last_run.map(|last| now.saturating_duration_since(last));
        let leading = elapsed.map_or(true, |elapsed| elapsed >= interval);
        let replaced = window.trailing.and_then(|slot| registry.release(slot));

        let window = if leading {
            self.spawn_locked(&mut registry, async move { report(task(dispatcher)).await });
            ThrottleWindow {
                last_run: Some(now),
                trailing: None,
            }
        } else {
            let remaining = interval.saturating_sub(elapsed.unwrap_or_default());
            let generation = registry.generation();
            let weak = Arc::downgrade(&self.inner);
            let timer_id = id.clone();
            let key = self.spawn_locked(&mut registry, async move {
                tokio::time::sleep(remaining).await;
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                if !inner.claim_trailing(&timer_id, generation) {
                    return;
                }
                drop(inner);
                report(task(dispatcher)).await;
            });
            ThrottleWindow {
                last_run: window.last_run,
                trailing: Some(Slot { generation, task: key }),
            }
        };
        registry.throttle.insert(id.clone(), window);
        drop(registry);

        if let Some(handle) = replaced {
            tracing::trace!(id = %id, "Throttle trailer replaced");
            handle.abort();
        }
    }

    fn cancel(&self, id: &EffectId) {
        let handles: Vec<AbortHandle> = {
            let mut registry = self.inner.registry.lock();
            let mut slots = Vec::new();
            slots.extend(registry.cancellable.remove(id));
            slots.extend(registry.debounce.remove(id));
            if let Some(window) = registry.throttle.get_mut(id) {
                slots.extend(window.trailing.take());
            }
            slots
                .into_iter()
                .filter_map(|slot| registry.release(slot))
                .collect()
        };
        if !handles.is_empty() {
            tracing::debug!(id = %id, count = handles.len(), "Cancelled effects");
        }
        for handle in handles {
            handle.abort();
        }
    }

    /// Spawn a tracked task. Effect bodies are only invoked inside `future`,
    /// never while the registry lock is held.
    fn spawn_locked<F>(&self, registry: &mut Registry, future: F) -> u64
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let key = registry.next_task;
        registry.next_task += 1;
        let weak = Arc::downgrade(&self.inner);
        // The task cannot unregister itself before insertion below because
        // that requires the registry lock the caller holds.
        let join = self.inner.handle.spawn(async move {
            let _finish = scopeguard::guard((), move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.finish_task(key);
                }
            });
            future.await;
        });
        registry.tasks.insert(key, join.abort_handle());
        key
    }
}

impl EngineInner {
    fn finish_task(&self, key: u64) {
        let idle = {
            let mut registry = self.registry.lock();
            registry.tasks.remove(&key);
            registry.tasks.is_empty()
        };
        if idle {
            self.idle.notify_waiters();
        }
    }

    /// Promote a pending throttle trailer to the window's execution.
    fn claim_trailing(&self, id: &EffectId, generation: u64) -> bool {
        let mut registry = self.registry.lock();
        match registry.throttle.get_mut(id) {
            Some(window) if window.trailing.is_some_and(|s| s.generation == generation) => {
                window.trailing = None;
                window.last_run = Some(Instant::now());
                true
            }
            _ => false,
        }
    }
}

fn cancellable_slots(registry: &mut Registry) -> &mut HashMap<EffectId, Slot> {
    &mut registry.cancellable
}

fn debounce_slots(registry: &mut Registry) -> &mut HashMap<EffectId, Slot> {
    &mut registry.debounce
}

fn release_slot(
    weak: &Weak<EngineInner>,
    map: fn(&mut Registry) -> &mut HashMap<EffectId, Slot>,
    id: &EffectId,
    generation: u64,
) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let mut registry = inner.registry.lock();
    let slots = map(&mut registry);
    if slots.get(id).is_some_and(|slot| slot.generation == generation) {
        slots.remove(id);
    }
}

async fn report(body: BoxFuture) {
    if let Err(err) = body.await {
        tracing::error!("Effect failed: {:#}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn recorder() -> (Dispatcher<u32>, Arc<Mutex<Vec<u32>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (Dispatcher::new(move |a| sink.lock().push(a)), seen)
    }

    #[tokio::test(start_paused = true)]
    async fn run_dispatches_actions() {
        let engine = EffectEngine::new(Handle::current());
        let (dispatcher, seen) = recorder();

        engine.execute(Effect::send(5), dispatcher);
        engine.wait_idle().await;

        assert_eq!(*seen.lock(), vec![5]);
    }

    #[tokio::test(start_paused = true)]
    async fn failing_effect_is_contained() {
        let engine = EffectEngine::new(Handle::current());
        let (dispatcher, seen) = recorder();

        engine.execute(
            Effect::batch([
                Effect::run(|_| async { Err(anyhow::anyhow!("boom")) }),
                Effect::send(1),
            ]),
            dispatcher,
        );
        engine.wait_idle().await;

        assert_eq!(*seen.lock(), vec![1]);
        assert_eq!(engine.in_flight(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_cancellable_never_dispatches() {
        let engine = EffectEngine::new(Handle::current());
        let (dispatcher, seen) = recorder();
        let slow = |n: u32| {
            Effect::cancellable("load", move |d: Dispatcher<u32>| async move {
                tokio::time::sleep(Duration::from_millis(100)).await;
                d.send(n);
                Ok(())
            })
        };

        engine.execute(slow(1), dispatcher.clone());
        engine.execute(slow(2), dispatcher);
        engine.wait_idle().await;

        assert_eq!(*seen.lock(), vec![2]);
        assert!(engine.inner.registry.lock().cancellable.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn fire_and_forget_runs_without_dispatch() {
        let engine = EffectEngine::new(Handle::current());
        let (dispatcher, seen) = recorder();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        engine.execute(
            Effect::fire_and_forget(move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
            dispatcher,
        );
        engine.wait_idle().await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(seen.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_pending_debounce() {
        let engine = EffectEngine::new(Handle::current());
        let (dispatcher, seen) = recorder();

        engine.execute(
            Effect::debounced("typing", Duration::from_millis(300), |d| async move {
                d.send(1);
                Ok(())
            }),
            dispatcher.clone(),
        );
        engine.execute(Effect::cancel("typing"), dispatcher);
        engine.wait_idle().await;

        assert!(seen.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_aborts_timers_and_drops_later_effects() {
        let engine = EffectEngine::new(Handle::current());
        let (dispatcher, seen) = recorder();

        engine.execute(Effect::send_after(Duration::from_secs(1), 1), dispatcher.clone());
        assert_eq!(engine.in_flight(), 1);

        engine.shutdown();
        engine.execute(Effect::send(2), dispatcher);
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(seen.lock().is_empty());
        assert_eq!(engine.in_flight(), 0);
        assert!(engine.is_shut_down());
    }
}
