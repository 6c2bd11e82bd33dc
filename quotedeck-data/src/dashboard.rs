//! Outward facade of the data-plane.
//!
//! Composes the registry, state store, stream connection manager, filter/sort
//! specs and selection coordinator behind the entry points a dashboard
//! front-end consumes.

use crate::{
    bars::{BarsFetcher, Timeframe},
    config::DashboardConfig,
    error::DataError,
    registry::SymbolRegistry,
    selection::{SelectionCoordinator, SelectionState},
    store::StateStore,
    stream::{ConnectionStatus, MarketFeed},
    transport::{HttpClient, HttpFetch, StreamConnector, WsConnector},
    types::AssetRecord,
    view::{self, FilterSpec, SortField, SortSpec},
};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::watch;

/// The data-plane of the market dashboard.
///
/// Holds the canonical "current truth" per tracked asset and exposes it as
/// filter/sort projections plus an on-demand historical-bars lookup.
pub struct Dashboard {
    store: Arc<StateStore>,
    feed: MarketFeed,
    selection: SelectionCoordinator,
    filter: RwLock<FilterSpec>,
    sort: RwLock<SortSpec>,
}

impl Dashboard {
    /// Build a dashboard over explicit transport capabilities.
    pub fn new(
        config: DashboardConfig,
        connector: Arc<dyn StreamConnector>,
        http: Arc<dyn HttpFetch>,
    ) -> Self {
        let registry = Arc::new(SymbolRegistry::new());
        let store = Arc::new(StateStore::new());
        let feed = MarketFeed::new(&config, connector, registry, Arc::clone(&store));
        let selection = SelectionCoordinator::new(Arc::new(BarsFetcher::new(&config, http)));

        Self {
            store,
            feed,
            selection,
            filter: RwLock::new(FilterSpec::default()),
            sort: RwLock::new(SortSpec::default()),
        }
    }

    /// Build a dashboard wired to the live exchange transports.
    pub fn live(config: DashboardConfig) -> Self {
        Self::new(
            config,
            Arc::new(WsConnector::new()),
            Arc::new(HttpClient::new()),
        )
    }

    // --- streaming lifecycle -------------------------------------------------

    /// Open the live feed. Reconnection after failure is the caller's call.
    pub async fn connect(&self) -> Result<(), DataError> {
        self.feed.connect().await
    }

    /// Close the live feed. Idempotent.
    pub fn disconnect(&self) {
        self.feed.disconnect();
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.feed.status()
    }

    /// Message recorded by the most recent transport failure.
    pub fn connection_error(&self) -> Option<String> {
        self.feed.last_error()
    }

    /// Watch handle for connection status transitions.
    pub fn status_watch(&self) -> watch::Receiver<ConnectionStatus> {
        self.feed.status_watch()
    }

    // --- selection -----------------------------------------------------------

    /// Put an asset under detailed inspection.
    pub fn select(&self, symbol: &str) {
        self.selection.select(symbol);
    }

    pub fn clear_selection(&self) {
        self.selection.clear();
    }

    pub fn set_timeframe(&self, timeframe: Timeframe) {
        self.selection.set_timeframe(timeframe);
    }

    pub fn selection_state(&self) -> SelectionState {
        self.selection.state()
    }

    /// Latest canonical record for the selected asset, if any.
    pub fn selected_record(&self) -> Option<AssetRecord> {
        self.selection
            .state()
            .selected
            .and_then(|symbol| self.store.get(&symbol))
    }

    // --- projections ---------------------------------------------------------

    pub fn set_filter(&self, filter: FilterSpec) {
        *self.filter.write() = filter;
    }

    pub fn set_sort(&self, sort: SortSpec) {
        *self.sort.write() = sort;
    }

    /// Column-header click semantics: flip direction on the active field,
    /// default a new field to descending.
    pub fn toggle_sort(&self, field: SortField) {
        self.sort.write().toggle(field);
    }

    pub fn filter(&self) -> FilterSpec {
        self.filter.read().clone()
    }

    pub fn sort(&self) -> SortSpec {
        *self.sort.read()
    }

    /// Current table view under the stored filter/sort specs.
    pub fn current_view(&self) -> Vec<AssetRecord> {
        let snapshot = self.store.snapshot();
        view::project(&snapshot, &self.filter.read(), &self.sort.read())
    }

    /// Current table view under explicit specs; stored specs are untouched.
    pub fn view_with(&self, filter: &FilterSpec, sort: &SortSpec) -> Vec<AssetRecord> {
        view::project(&self.store.snapshot(), filter, sort)
    }

    /// Unprojected snapshot in arrival order.
    pub fn snapshot(&self) -> Vec<AssetRecord> {
        self.store.snapshot()
    }
}
