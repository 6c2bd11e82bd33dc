//! Filter/sort projection engine.
//!
//! Pure transforms over a [`StateStore`](crate::store::StateStore) snapshot:
//! filter first, then a stable sort. Canonical state is never mutated here.

use crate::types::AssetRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Performance bucket filter, decided by the sign of the 24h change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum PerformanceFilter {
    #[default]
    All,
    /// change_24h >= 0
    Gain,
    /// change_24h < 0
    Loss,
}

/// Which records to keep in a projected view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FilterSpec {
    /// Case-insensitive substring match against name or symbol; empty keeps all
    pub search: String,
    pub performance: PerformanceFilter,
}

impl FilterSpec {
    pub fn matches(&self, record: &AssetRecord) -> bool {
        let search_ok = self.search.is_empty() || {
            let needle = self.search.to_lowercase();
            record.name.to_lowercase().contains(&needle)
                || record.symbol.to_lowercase().contains(&needle)
        };

        let performance_ok = match self.performance {
            PerformanceFilter::All => true,
            PerformanceFilter::Gain => record.change_24h >= 0.0,
            PerformanceFilter::Loss => record.change_24h < 0.0,
        };

        search_ok && performance_ok
    }
}

/// Orderable columns of an [`AssetRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum SortField {
    Name,
    Symbol,
    Price,
    Change1h,
    Change24h,
    Change7d,
    MarketCap,
    Volume24h,
    CirculatingSupply,
    MaxSupply,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

/// How to order a projected view; `field: None` keeps arrival order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SortSpec {
    pub field: Option<SortField>,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Apply a column-header click: re-selecting the active field flips the
    /// direction, a new field starts descending.
    pub fn toggle(&mut self, field: SortField) {
        if self.field == Some(field) {
            self.direction = match self.direction {
                SortDirection::Ascending => SortDirection::Descending,
                SortDirection::Descending => SortDirection::Ascending,
            };
        } else {
            self.field = Some(field);
            self.direction = SortDirection::Descending;
        }
    }
}

fn compare_by(a: &AssetRecord, b: &AssetRecord, field: SortField) -> Ordering {
    match field {
        SortField::Name => a.name.cmp(&b.name),
        SortField::Symbol => a.symbol.cmp(&b.symbol),
        SortField::Price => a.price.total_cmp(&b.price),
        SortField::Change1h => a.change_1h.total_cmp(&b.change_1h),
        SortField::Change24h => a.change_24h.total_cmp(&b.change_24h),
        SortField::Change7d => a.change_7d.total_cmp(&b.change_7d),
        SortField::MarketCap => a.market_cap.total_cmp(&b.market_cap),
        SortField::Volume24h => a.volume_24h.total_cmp(&b.volume_24h),
        SortField::CirculatingSupply => a.circulating_supply.total_cmp(&b.circulating_supply),
        // Uncapped assets order before any capped supply
        SortField::MaxSupply => match (a.max_supply, b.max_supply) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(lhs), Some(rhs)) => lhs.total_cmp(&rhs),
        },
    }
}

/// Project a snapshot into an ordered view: filter, then stable sort.
pub fn project(snapshot: &[AssetRecord], filter: &FilterSpec, sort: &SortSpec) -> Vec<AssetRecord> {
    let mut view: Vec<AssetRecord> = snapshot
        .iter()
        .filter(|record| filter.matches(record))
        .cloned()
        .collect();

    if let Some(field) = sort.field {
        view.sort_by(|a, b| {
            let ordering = compare_by(a, b, field);
            match sort.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
    }

    view
}
