//! Store dispatch ordering, subscriptions and teardown.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::{feed_store, FeedAction, FeedState, SEARCH_DELAY};
use parking_lot::Mutex;
use unistate::config::StoreConfig;
use unistate::Store;

#[tokio::test(start_paused = true)]
async fn destroy_clears_pending_timers_and_inflight_work() {
    let (store, calls) = feed_store();

    store.send(FeedAction::Typed("pending".to_string()));
    store.send(FeedAction::Load("inflight".to_string()));
    store.destroy();

    tokio::time::sleep(SEARCH_DELAY * 3).await;
    assert!(calls.lock().is_empty());
    assert!(store.is_destroyed());

    let before = store.state();
    store.send(FeedAction::Ticked);
    assert_eq!(store.state(), before);
}

#[tokio::test(start_paused = true)]
async fn destroy_drops_subscribers() {
    let (store, _) = feed_store();
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);
    store
        .subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .detach();

    store.send(FeedAction::Ticked);
    store.destroy();
    store.send(FeedAction::Ticked);

    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn effect_dispatches_keep_call_order_with_direct_sends() {
    let (store, _) = feed_store();
    let order = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&order);
    let _sub = store.subscribe_to_actions(move |action, _| {
        log.lock().push(format!("{:?}", action));
    });

    store.send(FeedAction::Typed("q".to_string()));
    store.send(FeedAction::Ticked);
    store.settle().await;

    assert_eq!(
        *order.lock(),
        vec![
            "Typed(\"q\")".to_string(),
            "Ticked".to_string(),
            "Loaded([\"q:hit\"])".to_string(),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn dropped_subscription_stops_notifications() {
    let (store, _) = feed_store();
    let states = Arc::new(Mutex::new(Vec::<FeedState>::new()));
    let sink = Arc::clone(&states);
    let sub = store.subscribe(move |s| sink.lock().push(s.clone()));

    store.send(FeedAction::Ticked);
    drop(sub);
    store.send(FeedAction::Ticked);

    assert_eq!(states.lock().len(), 1);
    assert_eq!(store.state().ticks, 2);
}

#[tokio::test(start_paused = true)]
async fn history_capacity_comes_from_config() {
    let store = Store::with_config(
        common::Feed,
        FeedState::default(),
        common::FeedDeps {
            calls: common::CallLog::default(),
        },
        &StoreConfig {
            history_capacity: 2,
        },
    )
    .unwrap();

    for _ in 0..5 {
        store.send(FeedAction::Ticked);
    }
    store.send(FeedAction::StopAll);

    assert_eq!(store.history(), vec![FeedAction::Ticked, FeedAction::StopAll]);
}

#[tokio::test(start_paused = true)]
async fn sends_from_other_tasks_are_serialized() {
    let (store, _) = feed_store();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            for _ in 0..25 {
                store.send(FeedAction::Ticked);
                tokio::task::yield_now().await;
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }
    store.settle().await;

    assert_eq!(store.state().ticks, 200);
}
