/// QuoteDeck Data - market dashboard data-plane
///
/// Ingests a live feed of per-asset market ticks, normalises each tick into a
/// canonical record, maintains the always-current table of latest state per
/// asset, and exposes that table through filter/sort projections plus an
/// on-demand historical-bars lookup.
///
/// The library includes:
/// - The canonical data model ([`AssetRecord`], [`Bar`])
/// - A streaming ingestion state machine with explicit caller-side
///   reconnection ([`MarketFeed`])
/// - Pure filter/sort projections over store snapshots
/// - A selection coordinator with stale-fetch suppression
/// - Transport capability traits with live websocket/HTTP implementations
pub mod bars;
pub mod config;
pub mod dashboard;
pub mod de;
pub mod error;
pub mod fmt;
pub mod normalize;
pub mod registry;
pub mod selection;
pub mod store;
pub mod stream;
pub mod ticker;
pub mod transport;
pub mod types;
pub mod view;

// Re-export commonly used types for convenience
pub use bars::{BarsFetcher, Timeframe};
pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use error::DataError;
pub use normalize::Normalizer;
pub use registry::{SymbolInfo, SymbolRegistry};
pub use selection::{SelectionCoordinator, SelectionState};
pub use store::StateStore;
pub use stream::{ConnectionStatus, MarketFeed};
pub use ticker::{Ticker24h, TickerMessage};
pub use transport::{
    HttpClient, HttpFetch, StreamConnection, StreamConnector, TransportError, WsConnector,
};
pub use types::{AssetRecord, Bar, SPARKLINE_LEN};
pub use view::{FilterSpec, PerformanceFilter, SortDirection, SortField, SortSpec, project};
