//! Scripted features driven by the demo binary.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use unistate::compose::{ActionPrism, Combine, PresentationAction, Scope, StateLens};
use unistate::config::{PresentationConfig, RuntimeConfig};
use unistate::deps::{Clock, SystemClock};
use unistate::navigation::{
    Presentable, PresentationEvent, PresentationReducer, StackAction, StackReducer, StackState,
};
use unistate::store::StoreError;
use unistate::{Action, Effect, Reducer, Store, UiState};

const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
const KEYSTROKE_GAP: Duration = Duration::from_millis(80);
const REFRESH_INTERVAL: Duration = Duration::from_secs(1);

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<String>,
    pub searches: u32,
    pub loaded_at_ms: Option<u128>,
}

impl UiState for SearchState {}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchAction {
    QueryChanged(String),
    ResultsLoaded { query: String, results: Vec<String> },
}

impl Action for SearchAction {}

pub struct SearchDeps {
    pub catalog: Arc<Vec<String>>,
    pub clock: Arc<dyn Clock>,
}

/// Debounced type-ahead search over an in-memory catalog.
pub struct Search;

impl Reducer for Search {
    type State = SearchState;
    type Action = SearchAction;
    type Dependencies = SearchDeps;

    fn reduce(
        &self,
        state: SearchState,
        action: SearchAction,
        deps: &SearchDeps,
    ) -> (SearchState, Effect<SearchAction>) {
        match action {
            SearchAction::QueryChanged(query) if query.is_empty() => (
                SearchState {
                    query,
                    results: Vec::new(),
                    ..state
                },
                Effect::cancel("search"),
            ),
            SearchAction::QueryChanged(query) => {
                let catalog = Arc::clone(&deps.catalog);
                let needle = query.clone();
                let effect = Effect::debounced("search", SEARCH_DEBOUNCE, move |d| async move {
                    let results = catalog
                        .iter()
                        .filter(|item| item.contains(needle.as_str()))
                        .cloned()
                        .collect();
                    d.send(SearchAction::ResultsLoaded {
                        query: needle,
                        results,
                    });
                    Ok(())
                });
                (SearchState { query, ..state }, effect)
            }
            SearchAction::ResultsLoaded { query, .. } if query != state.query => {
                tracing::debug!(query = %query, "Discarding results for stale query");
                (state, Effect::None)
            }
            SearchAction::ResultsLoaded { results, .. } => (
                SearchState {
                    results,
                    searches: state.searches + 1,
                    loaded_at_ms: Some(deps.clock.now_millis()),
                    ..state
                },
                Effect::None,
            ),
        }
    }
}

pub fn search_deps(clock: Arc<dyn Clock>) -> SearchDeps {
    let catalog = ["abacus", "abbey", "abc", "banana", "cabbage"]
        .into_iter()
        .map(String::from)
        .collect();
    SearchDeps {
        catalog: Arc::new(catalog),
        clock,
    }
}

/// Types "a", "ab", "abc" faster than the debounce and waits for results.
pub async fn run_search(config: &RuntimeConfig) -> Result<SearchState, StoreError> {
    let store = Store::with_config(
        Search,
        SearchState::default(),
        search_deps(Arc::new(SystemClock)),
        &config.store,
    )?;
    let _printer = print_transitions(&store);

    for query in ["a", "ab", "abc"] {
        store.send(SearchAction::QueryChanged(query.to_string()));
        tokio::time::sleep(KEYSTROKE_GAP).await;
    }
    store.settle().await;
    Ok(finish(store))
}

// ---------------------------------------------------------------------------
// Modal
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModalState {
    pub sheet: Presentable<String>,
    pub confirmed: Vec<String>,
}

impl UiState for ModalState {}

#[derive(Debug, Clone, PartialEq)]
pub enum ModalAction {
    Open(String),
    Confirm,
    Close,
    Presentation(PresentationEvent),
}

impl Action for ModalAction {}

/// Opens and closes a sheet. Lifecycle events are handled by the scoped
/// [`PresentationReducer`].
pub struct Modal {
    presentation: PresentationConfig,
}

impl Reducer for Modal {
    type State = ModalState;
    type Action = ModalAction;
    type Dependencies = ();

    fn reduce(&self, state: ModalState, action: ModalAction, _: &()) -> (ModalState, Effect<ModalAction>) {
        match action {
            ModalAction::Open(title) => {
                let (sheet, effect) = state.sheet.present(title, &self.presentation);
                (ModalState { sheet, ..state }, effect.map(ModalAction::Presentation))
            }
            ModalAction::Confirm => {
                let mut confirmed = state.confirmed;
                if let Some(title) = state.sheet.destination() {
                    confirmed.push(title.clone());
                }
                let (sheet, effect) = state.sheet.dismiss(&self.presentation);
                (ModalState { sheet, confirmed }, effect.map(ModalAction::Presentation))
            }
            ModalAction::Close => {
                let (sheet, effect) = state.sheet.dismiss(&self.presentation);
                (ModalState { sheet, ..state }, effect.map(ModalAction::Presentation))
            }
            ModalAction::Presentation(_) => (state, Effect::None),
        }
    }
}

pub type ModalFeature = Combine<Modal, Scope<PresentationReducer<String>, ModalState, ModalAction>>;

pub fn modal_feature(presentation: PresentationConfig) -> ModalFeature {
    Combine::new(
        Modal { presentation },
        Scope::new(
            PresentationReducer::new(),
            StateLens::new(|s: &ModalState| s.sheet.clone(), |s, sheet| ModalState { sheet, ..s }),
            ActionPrism::new(
                |a| match a {
                    ModalAction::Presentation(event) => Some(event),
                    _ => None,
                },
                ModalAction::Presentation,
            ),
        ),
    )
}

/// Confirms one sheet, then opens a second and closes it without confirming.
pub async fn run_modal(config: &RuntimeConfig) -> Result<ModalState, StoreError> {
    let store = Store::with_config(
        modal_feature(config.presentation.clone()),
        ModalState::default(),
        (),
        &config.store,
    )?;
    let _printer = print_transitions(&store);

    store.send(ModalAction::Open("Rename item".to_string()));
    store.settle().await;
    store.send(ModalAction::Confirm);
    store.settle().await;
    store.send(ModalAction::Open("Delete item".to_string()));
    store.send(ModalAction::Close);
    store.settle().await;
    Ok(finish(store))
}

// ---------------------------------------------------------------------------
// Stack
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Screen {
    pub title: String,
    pub visits: u32,
}

impl Screen {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            visits: 0,
        }
    }
}

impl UiState for Screen {}

#[derive(Debug, Clone, PartialEq)]
pub enum ScreenAction {
    Visit,
    /// Throttled reload; bursts collapse to a leading and a trailing visit.
    Refresh,
}

impl Action for ScreenAction {}

pub struct ScreenFeature;

impl Reducer for ScreenFeature {
    type State = Screen;
    type Action = ScreenAction;
    type Dependencies = ();

    fn reduce(&self, state: Screen, action: ScreenAction, _: &()) -> (Screen, Effect<ScreenAction>) {
        match action {
            ScreenAction::Visit => (
                Screen {
                    visits: state.visits + 1,
                    ..state
                },
                Effect::None,
            ),
            ScreenAction::Refresh => (
                state,
                Effect::throttled("refresh", REFRESH_INTERVAL, |d| async move {
                    d.send(ScreenAction::Visit);
                    Ok(())
                }),
            ),
        }
    }
}

pub type StackMsg = StackAction<Screen, ScreenAction>;

/// Drills down two screens, refreshes, dismisses the middle one and pops.
pub async fn run_stack(config: &RuntimeConfig) -> Result<StackState<Screen>, StoreError> {
    let store = Store::with_config(
        StackReducer::new(ScreenFeature),
        StackState::new(Screen::new("Inbox")),
        (),
        &config.store,
    )?;
    let _printer = print_transitions(&store);

    let refresh = |index| StackMsg::Element {
        index,
        action: PresentationAction::Presented(ScreenAction::Refresh),
    };

    store.send(StackMsg::Push(Screen::new("Thread")));
    store.send(StackMsg::Push(Screen::new("Message")));
    for _ in 0..3 {
        store.send(refresh(2));
    }
    store.settle().await;
    store.send(StackMsg::Element {
        index: 1,
        action: PresentationAction::Dismiss,
    });
    store.send(StackMsg::Pop);
    store.settle().await;
    Ok(finish(store))
}

// ---------------------------------------------------------------------------

fn print_transitions<R>(store: &Store<R>) -> unistate::store::Subscription
where
    R: Reducer,
    R::State: Debug,
{
    store.subscribe_to_actions(|action, state| {
        println!("{:?}\n  -> {:?}", action, state);
    })
}

fn finish<R: Reducer>(store: Store<R>) -> R::State {
    let state = store.state();
    store.destroy();
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use unistate::deps::FixedClock;
    use unistate::navigation::PresentationStatus;

    #[tokio::test(start_paused = true)]
    async fn search_runs_once_for_the_last_query() {
        let state = run_search(&RuntimeConfig::default()).await.unwrap();
        assert_eq!(state.query, "abc");
        assert_eq!(state.results, vec!["abc".to_string()]);
        assert_eq!(state.searches, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_results_are_discarded() {
        let store = Store::new(
            Search,
            SearchState::default(),
            search_deps(Arc::new(FixedClock::at_millis(42))),
        )
        .unwrap();
        store.send(SearchAction::QueryChanged("ban".to_string()));
        store.send(SearchAction::ResultsLoaded {
            query: "old".to_string(),
            results: vec!["x".to_string()],
        });
        assert!(store.state().results.is_empty());

        store.settle().await;
        let state = store.state();
        assert_eq!(state.results, vec!["banana".to_string()]);
        assert_eq!(state.loaded_at_ms, Some(42));
    }

    #[tokio::test(start_paused = true)]
    async fn modal_confirms_and_returns_to_idle() {
        let state = run_modal(&RuntimeConfig::default()).await.unwrap();
        assert_eq!(state.confirmed, vec!["Rename item".to_string()]);
        assert_eq!(state.sheet.status(), PresentationStatus::Idle);
        assert!(state.sheet.destination().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn stack_ends_at_root() {
        let state = run_stack(&RuntimeConfig::default()).await.unwrap();
        assert_eq!(state.len(), 1);
        assert_eq!(state.root().title, "Inbox");
    }
}
