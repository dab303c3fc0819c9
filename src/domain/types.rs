//! # Domain Types
//!
//! Snapshot and transition types shared by the fetcher, diff engine,
//! renderer and tracker registry.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Shop keys accepted by `.stock start <shop>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shop {
    Seed,
    Gear,
    Egg,
    Cosmetic,
    EventShop,
}

impl Shop {
    pub const ALL: [Shop; 5] = [
        Shop::Seed,
        Shop::Gear,
        Shop::Egg,
        Shop::Cosmetic,
        Shop::EventShop,
    ];

    /// Key used in the stock API response and in `config.yaml` alert maps.
    pub fn key(&self) -> &'static str {
        match self {
            Shop::Seed => "seed_stock",
            Shop::Gear => "gear_stock",
            Shop::Egg => "egg_stock",
            Shop::Cosmetic => "cosmetic_stock",
            Shop::EventShop => "eventshop_stock",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Shop::Seed => "Seed Stock",
            Shop::Gear => "Gear Stock",
            Shop::Egg => "Egg Stock",
            Shop::Cosmetic => "Cosmetic Stock",
            Shop::EventShop => "Event Shop Stock",
        }
    }
}

impl fmt::Display for Shop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Error)]
#[error("unknown shop `{0}`")]
pub struct UnknownShop(pub String);

impl FromStr for Shop {
    type Err = UnknownShop;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Shop::ALL
            .into_iter()
            .find(|shop| shop.key() == s)
            .ok_or_else(|| UnknownShop(s.to_string()))
    }
}

/// One inventory line, unique by name (duplicates are merged at fetch time).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockItem {
    pub name: String,
    pub quantity: u64,
}

/// Normalized inventory of one shop at one point in time. Items are sorted
/// by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockSnapshot {
    pub shop: Shop,
    pub items: Vec<StockItem>,
}

impl StockSnapshot {
    pub fn total(&self) -> u64 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Name → quantity map, the shape kept as a tracker's previous state.
    pub fn quantities(&self) -> HashMap<String, u64> {
        self.items
            .iter()
            .map(|item| (item.name.clone(), item.quantity))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherEvent {
    pub name: String,
    pub active: bool,
    /// Event duration in seconds.
    pub duration: u64,
    pub starts_at: Option<i64>,
    pub ends_at: Option<i64>,
}

/// Weather system state at one point in time. Events keep source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WeatherSnapshot {
    pub events: Vec<WeatherEvent>,
}

impl WeatherSnapshot {
    pub fn active_count(&self) -> usize {
        self.events.iter().filter(|event| event.active).count()
    }

    /// Name → active map, the shape kept as a tracker's previous state.
    pub fn flags(&self) -> HashMap<String, bool> {
        self.events
            .iter()
            .map(|event| (event.name.clone(), event.active))
            .collect()
    }
}

/// Which polling loop a tracker runs. A room holds at most one tracker of
/// each kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackerKind {
    Stock,
    Weather,
}

impl TrackerKind {
    pub fn label(&self) -> &'static str {
        match self {
            TrackerKind::Stock => "stock",
            TrackerKind::Weather => "weather",
        }
    }
}

/// A qualifying change between two consecutive snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Quantity went from 0 (or the item was absent) to > 0.
    Restocked { name: String, quantity: u64 },
    /// Active flag went from false to true.
    EventStarted { name: String },
}

impl Transition {
    pub fn name(&self) -> &str {
        match self {
            Transition::Restocked { name, .. } => name,
            Transition::EventStarted { name } => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shop_keys_round_trip() {
        for shop in Shop::ALL {
            assert_eq!(shop.key().parse::<Shop>().unwrap(), shop);
        }
        assert!("flower_stock".parse::<Shop>().is_err());
    }

    #[test]
    fn snapshot_totals_and_maps() {
        let snapshot = StockSnapshot {
            shop: Shop::Seed,
            items: vec![
                StockItem { name: "Cacao".into(), quantity: 3 },
                StockItem { name: "Grape".into(), quantity: 5 },
            ],
        };
        assert_eq!(snapshot.total(), 8);
        assert_eq!(snapshot.quantities().get("Grape"), Some(&5));

        let weather = WeatherSnapshot {
            events: vec![
                WeatherEvent {
                    name: "Rain".into(),
                    active: true,
                    duration: 600,
                    starts_at: None,
                    ends_at: None,
                },
                WeatherEvent {
                    name: "Frost".into(),
                    active: false,
                    duration: 0,
                    starts_at: None,
                    ends_at: None,
                },
            ],
        };
        assert_eq!(weather.active_count(), 1);
        assert_eq!(weather.flags().get("Frost"), Some(&false));
    }
}
