//! Shared fixture features for integration tests.

#![allow(dead_code, unused_imports)]

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use unistate::compose::{ActionPrism, Combine, PresentationAction, Scope, StateLens};
use unistate::config::PresentationConfig;
use unistate::navigation::{
    Destination, DestinationRouter, Presentable, PresentationEvent, PresentationReducer, Tagged,
};
use unistate::{case_path, Action, Effect, Reducer, Store, UiState};

pub const SEARCH_DELAY: Duration = Duration::from_millis(300);
pub const LOAD_LATENCY: Duration = Duration::from_millis(100);
pub const TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// Every effect body execution, in order.
pub type CallLog = Arc<Mutex<Vec<String>>>;

// ---------------------------------------------------------------------------
// Feed: one action per keyed effect flavor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedState {
    pub query: String,
    pub results: Vec<String>,
    pub ticks: u32,
}

impl UiState for FeedState {}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedAction {
    /// Debounced search under "search".
    Typed(String),
    /// Cancellable fetch under "load".
    Load(String),
    /// Throttled refresh under "tick".
    Tick,
    /// Throttled under "refresh", carrying the page to fetch.
    Refresh(u32),
    Ticked,
    Loaded(Vec<String>),
    StopAll,
}

impl Action for FeedAction {}

pub struct FeedDeps {
    pub calls: CallLog,
}

pub struct Feed;

impl Reducer for Feed {
    type State = FeedState;
    type Action = FeedAction;
    type Dependencies = FeedDeps;

    fn reduce(&self, state: FeedState, action: FeedAction, deps: &FeedDeps) -> (FeedState, Effect<FeedAction>) {
        match action {
            FeedAction::Typed(query) => {
                let calls = Arc::clone(&deps.calls);
                let needle = query.clone();
                let effect = Effect::debounced("search", SEARCH_DELAY, move |d| async move {
                    calls.lock().push(needle.clone());
                    d.send(FeedAction::Loaded(vec![format!("{needle}:hit")]));
                    Ok(())
                });
                (FeedState { query, ..state }, effect)
            }
            FeedAction::Load(key) => {
                let calls = Arc::clone(&deps.calls);
                let effect = Effect::cancellable("load", move |d| async move {
                    tokio::time::sleep(LOAD_LATENCY).await;
                    calls.lock().push(key.clone());
                    d.send(FeedAction::Loaded(vec![format!("{key}:loaded")]));
                    Ok(())
                });
                (state, effect)
            }
            FeedAction::Tick => {
                let calls = Arc::clone(&deps.calls);
                let effect = Effect::throttled("tick", TICK_INTERVAL, move |d| async move {
                    calls.lock().push("tick".to_string());
                    d.send(FeedAction::Ticked);
                    Ok(())
                });
                (state, effect)
            }
            FeedAction::Refresh(page) => {
                let calls = Arc::clone(&deps.calls);
                let effect = Effect::throttled("refresh", TICK_INTERVAL, move |d| async move {
                    calls.lock().push(format!("refresh:{page}"));
                    d.send(FeedAction::Ticked);
                    Ok(())
                });
                (state, effect)
            }
            FeedAction::Ticked => (
                FeedState {
                    ticks: state.ticks + 1,
                    ..state
                },
                Effect::None,
            ),
            FeedAction::Loaded(results) => (FeedState { results, ..state }, Effect::None),
            FeedAction::StopAll => (
                state,
                Effect::batch([
                    Effect::cancel("search"),
                    Effect::cancel("load"),
                    Effect::cancel("tick"),
                    Effect::cancel("refresh"),
                ]),
            ),
        }
    }
}

pub fn feed_store() -> (Store<Feed>, CallLog) {
    let calls = CallLog::default();
    let store = Store::new(
        Feed,
        FeedState::default(),
        FeedDeps {
            calls: Arc::clone(&calls),
        },
    )
    .expect("store needs a tokio runtime");
    (store, calls)
}

// ---------------------------------------------------------------------------
// Inventory: a parent presenting enum-routed sheets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetTag {
    AddItem,
    Rename,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemForm {
    pub name: String,
}

impl UiState for ItemForm {}

#[derive(Debug, Clone, PartialEq)]
pub enum FormAction {
    SetName(String),
    Save,
}

impl Action for FormAction {}

pub struct Form;

impl Reducer for Form {
    type State = ItemForm;
    type Action = FormAction;
    type Dependencies = ();

    fn reduce(&self, state: ItemForm, action: FormAction, _: &()) -> (ItemForm, Effect<FormAction>) {
        match action {
            FormAction::SetName(name) => (ItemForm { name }, Effect::None),
            FormAction::Save => (state, Effect::None),
        }
    }
}

pub struct RenameField;

impl Reducer for RenameField {
    type State = String;
    type Action = String;
    type Dependencies = ();

    fn reduce(&self, _: String, action: String, _: &()) -> (String, Effect<String>) {
        (action, Effect::None)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Sheet {
    AddItem(ItemForm),
    Rename(String),
}

impl UiState for Sheet {}

impl Tagged for Sheet {
    type Tag = SheetTag;

    fn tag(&self) -> SheetTag {
        match self {
            Sheet::AddItem(_) => SheetTag::AddItem,
            Sheet::Rename(_) => SheetTag::Rename,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SheetAction {
    AddItem(FormAction),
    Rename(String),
}

impl Action for SheetAction {}

impl Tagged for SheetAction {
    type Tag = SheetTag;

    fn tag(&self) -> SheetTag {
        match self {
            SheetAction::AddItem(_) => SheetTag::AddItem,
            SheetAction::Rename(_) => SheetTag::Rename,
        }
    }
}

impl Destination for Sheet {
    type Action = SheetAction;
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InventoryState {
    pub sheet: Presentable<Sheet>,
    pub items: Vec<String>,
}

impl UiState for InventoryState {}

#[derive(Debug, Clone, PartialEq)]
pub enum InventoryAction {
    Open(Sheet),
    Close,
    Sheet(PresentationAction<SheetAction>),
    Presentation(PresentationEvent),
}

impl Action for InventoryAction {}

/// Parent logic: opens and closes sheets, saves items from the form.
pub struct Inventory {
    pub presentation: PresentationConfig,
}

impl Inventory {
    fn dismiss(&self, state: InventoryState) -> (InventoryState, Effect<InventoryAction>) {
        let (sheet, effect) = state.sheet.dismiss(&self.presentation);
        (InventoryState { sheet, ..state }, effect.map(InventoryAction::Presentation))
    }
}

impl Reducer for Inventory {
    type State = InventoryState;
    type Action = InventoryAction;
    type Dependencies = ();

    fn reduce(
        &self,
        state: InventoryState,
        action: InventoryAction,
        _: &(),
    ) -> (InventoryState, Effect<InventoryAction>) {
        match action {
            InventoryAction::Open(sheet) => {
                let (presentable, effect) = state.sheet.present(sheet, &self.presentation);
                (
                    InventoryState {
                        sheet: presentable,
                        ..state
                    },
                    effect.map(InventoryAction::Presentation),
                )
            }
            InventoryAction::Close | InventoryAction::Sheet(PresentationAction::Dismiss) => {
                self.dismiss(state)
            }
            InventoryAction::Sheet(PresentationAction::Presented(SheetAction::AddItem(
                FormAction::Save,
            ))) => {
                let mut items = state.items.clone();
                if let Some(Sheet::AddItem(form)) = state.sheet.destination() {
                    items.push(form.name.clone());
                }
                self.dismiss(InventoryState { items, ..state })
            }
            InventoryAction::Sheet(_) | InventoryAction::Presentation(_) => (state, Effect::None),
        }
    }
}

pub type InventoryFeature = Combine<
    Combine<Inventory, Scope<DestinationRouter<Sheet, ()>, InventoryState, InventoryAction>>,
    Scope<PresentationReducer<Sheet>, InventoryState, InventoryAction>,
>;

pub fn sheet_router() -> DestinationRouter<Sheet, ()> {
    DestinationRouter::new()
        .case(
            SheetTag::AddItem,
            case_path!(Sheet::AddItem),
            case_path!(SheetAction::AddItem),
            Form,
        )
        .case(
            SheetTag::Rename,
            case_path!(Sheet::Rename),
            case_path!(SheetAction::Rename),
            RenameField,
        )
}

pub fn inventory(presentation: PresentationConfig) -> InventoryFeature {
    let destinations = Scope::new(
        sheet_router(),
        StateLens::new(
            |s: &InventoryState| s.sheet.destination().cloned(),
            |s, destination| InventoryState {
                sheet: s.sheet.set_destination(destination),
                ..s
            },
        ),
        ActionPrism::new(
            |a| match a {
                InventoryAction::Sheet(action) => Some(action),
                _ => None,
            },
            InventoryAction::Sheet,
        ),
    );
    let lifecycle = Scope::new(
        PresentationReducer::new(),
        StateLens::new(|s: &InventoryState| s.sheet.clone(), |s, sheet| InventoryState { sheet, ..s }),
        ActionPrism::new(
            |a| match a {
                InventoryAction::Presentation(event) => Some(event),
                _ => None,
            },
            InventoryAction::Presentation,
        ),
    );
    Combine::new(
        Combine::new(
            Inventory { presentation },
            destinations,
        ),
        lifecycle,
    )
}

pub fn inventory_store(presentation: PresentationConfig) -> Store<InventoryFeature> {
    Store::new(inventory(presentation), InventoryState::default(), ())
        .expect("store needs a tokio runtime")
}

pub fn add_item(name: &str) -> Sheet {
    Sheet::AddItem(ItemForm {
        name: name.to_string(),
    })
}

pub fn form(action: FormAction) -> InventoryAction {
    InventoryAction::Sheet(PresentationAction::Presented(SheetAction::AddItem(action)))
}
