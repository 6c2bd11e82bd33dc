//! Selection coordinator: tracks the asset under detailed inspection.
//!
//! A selection change clears the bars and issues a fresh fetch. In-flight
//! fetches are never cancelled; their results are compared against the
//! current fetch generation on completion and silently discarded when
//! superseded.

use crate::{
    bars::{BarsFetcher, Timeframe},
    types::Bar,
};
use parking_lot::Mutex;
use smol_str::SmolStr;
use std::sync::Arc;
use tracing::debug;

/// Snapshot of the current selection and its loaded bars.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    /// Asset under inspection, if any
    pub selected: Option<SmolStr>,
    /// Historical bars for the selection; empty until loaded
    pub bars: Vec<Bar>,
    /// Active timeframe
    pub timeframe: Timeframe,
}

#[derive(Debug)]
struct SelectionInner {
    selected: Option<SmolStr>,
    bars: Vec<Bar>,
    timeframe: Timeframe,
    /// Monotonic fetch generation: only the most recently issued fetch may
    /// write bars
    generation: u64,
}

impl Default for SelectionInner {
    fn default() -> Self {
        Self {
            selected: None,
            bars: Vec::new(),
            timeframe: Timeframe::default(),
            generation: 0,
        }
    }
}

/// Coordinates selection changes and the bars fetches they trigger.
pub struct SelectionCoordinator {
    fetcher: Arc<BarsFetcher>,
    inner: Arc<Mutex<SelectionInner>>,
}

impl SelectionCoordinator {
    pub fn new(fetcher: Arc<BarsFetcher>) -> Self {
        Self {
            fetcher,
            inner: Arc::new(Mutex::new(SelectionInner::default())),
        }
    }

    /// Put an asset under inspection: clears bars and issues a fetch for
    /// the active timeframe.
    pub fn select(&self, symbol: &str) {
        let (symbol, timeframe, generation) = {
            let mut inner = self.inner.lock();
            let symbol = SmolStr::new(symbol);
            inner.selected = Some(symbol.clone());
            inner.bars.clear();
            inner.generation += 1;
            (symbol, inner.timeframe, inner.generation)
        };
        self.spawn_fetch(symbol, timeframe, generation);
    }

    /// Drop the selection. Any in-flight fetch result is discarded when it
    /// completes.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.selected = None;
        inner.bars.clear();
        inner.generation += 1;
    }

    /// Switch the active timeframe, re-fetching if a selection is active.
    pub fn set_timeframe(&self, timeframe: Timeframe) {
        let issued = {
            let mut inner = self.inner.lock();
            inner.timeframe = timeframe;
            match inner.selected.clone() {
                Some(symbol) => {
                    inner.bars.clear();
                    inner.generation += 1;
                    Some((symbol, inner.generation))
                }
                None => None,
            }
        };

        if let Some((symbol, generation)) = issued {
            self.spawn_fetch(symbol, timeframe, generation);
        }
    }

    pub fn state(&self) -> SelectionState {
        let inner = self.inner.lock();
        SelectionState {
            selected: inner.selected.clone(),
            bars: inner.bars.clone(),
            timeframe: inner.timeframe,
        }
    }

    /// Run the fetch to completion, then write the result only if no newer
    /// fetch has been issued in the meantime (compare-and-discard).
    fn spawn_fetch(&self, symbol: SmolStr, timeframe: Timeframe, generation: u64) {
        let fetcher = Arc::clone(&self.fetcher);
        let inner = Arc::clone(&self.inner);

        tokio::spawn(async move {
            let bars = fetcher.fetch(&symbol, timeframe).await;

            let mut guard = inner.lock();
            if guard.generation == generation {
                guard.bars = bars;
            } else {
                debug!(%symbol, %timeframe, "discarding stale bars result");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::DashboardConfig,
        transport::{HttpFetch, TransportError},
    };
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::time::Duration;
    use url::Url;

    /// Serves distinguishable bars per symbol, with a configurable delay so
    /// tests can race a slow fetch against a fast one.
    struct RacingHttp {
        requests: Mutex<Vec<String>>,
    }

    impl RacingHttp {
        fn new() -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl HttpFetch for RacingHttp {
        async fn get(&self, url: &Url) -> Result<(u16, Bytes), TransportError> {
            self.requests.lock().push(url.to_string());

            // BTC resolves slowly, everything else quickly
            let (delay, time_ms) = if url.as_str().contains("BTCUSDT") {
                (Duration::from_millis(100), 1_000_000u64)
            } else {
                (Duration::from_millis(10), 2_000_000u64)
            };
            tokio::time::sleep(delay).await;

            let body = format!(r#"[[{time_ms}, "1.0", "2.0", "0.5", "1.5"]]"#);
            Ok((200, Bytes::from(body)))
        }
    }

    fn coordinator() -> (SelectionCoordinator, Arc<RacingHttp>) {
        let http = Arc::new(RacingHttp::new());
        let fetcher = Arc::new(BarsFetcher::new(
            &DashboardConfig::default(),
            Arc::clone(&http) as Arc<dyn HttpFetch>,
        ));
        (SelectionCoordinator::new(fetcher), http)
    }

    #[test]
    fn test_initial_state() {
        let state = SelectionState::default();
        assert_eq!(state.selected, None);
        assert!(state.bars.is_empty());
        assert_eq!(state.timeframe, Timeframe::OneYear);
    }

    #[tokio::test]
    async fn test_select_loads_bars() {
        let (coordinator, _) = coordinator();

        coordinator.select("ETH");
        let state = coordinator.state();
        assert_eq!(state.selected.as_deref(), Some("ETH"));
        assert!(state.bars.is_empty());

        tokio::time::sleep(Duration::from_millis(50)).await;
        let state = coordinator.state();
        assert_eq!(state.bars.len(), 1);
        assert_eq!(state.bars[0].time, 2_000);
    }

    #[tokio::test]
    async fn test_stale_fetch_discard() {
        let (coordinator, _) = coordinator();

        // Slow-resolving fetch for BTC superseded by a fast one for ETH
        coordinator.select("BTC");
        coordinator.select("ETH");

        tokio::time::sleep(Duration::from_millis(200)).await;

        // BTC's fetch has resolved by now; its result must not be visible
        let state = coordinator.state();
        assert_eq!(state.selected.as_deref(), Some("ETH"));
        assert_eq!(state.bars.len(), 1);
        assert_eq!(state.bars[0].time, 2_000);
    }

    #[tokio::test]
    async fn test_clear_discards_in_flight_fetch() {
        let (coordinator, _) = coordinator();

        coordinator.select("BTC");
        coordinator.clear();

        let state = coordinator.state();
        assert_eq!(state.selected, None);
        assert!(state.bars.is_empty());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(coordinator.state().bars.is_empty());
    }

    #[tokio::test]
    async fn test_set_timeframe_refetches_active_selection() {
        let (coordinator, http) = coordinator();

        coordinator.select("ETH");
        tokio::time::sleep(Duration::from_millis(50)).await;

        coordinator.set_timeframe(Timeframe::FiveYears);
        let state = coordinator.state();
        // Bars cleared until the new timeframe resolves
        assert!(state.bars.is_empty());
        assert_eq!(state.timeframe, Timeframe::FiveYears);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(coordinator.state().bars.len(), 1);

        let requests = http.requests.lock().clone();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].contains("interval=1w&limit=52"));
        assert!(requests[1].contains("interval=1M&limit=60"));
    }

    #[tokio::test]
    async fn test_set_timeframe_without_selection_does_not_fetch() {
        let (coordinator, http) = coordinator();

        coordinator.set_timeframe(Timeframe::OneMonth);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(http.requests.lock().is_empty());
        assert_eq!(coordinator.state().timeframe, Timeframe::OneMonth);
    }
}
