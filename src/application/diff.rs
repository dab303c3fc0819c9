//! # Diff Engine
//!
//! Compares a tracker's previous-state record against the current snapshot
//! and produces the transitions worth alerting on. Always tick-to-tick:
//! callers overwrite the record with the current snapshot after diffing, so
//! cumulative drift never fires an alert.

use crate::domain::types::{StockSnapshot, Transition, WeatherSnapshot};
use std::collections::HashMap;

/// Stock rule: previous quantity was 0 (or the item was absent) and the
/// current quantity is > 0. Emission follows the snapshot's name-sorted
/// order.
pub fn stock_transitions(
    previous: &HashMap<String, u64>,
    current: &StockSnapshot,
) -> Vec<Transition> {
    current
        .items
        .iter()
        .filter(|item| item.quantity > 0 && previous.get(&item.name).copied().unwrap_or(0) == 0)
        .map(|item| Transition::Restocked {
            name: item.name.clone(),
            quantity: item.quantity,
        })
        .collect()
}

/// Weather rule: previously known as inactive, now active. Events the
/// record has never seen produce no transition. Emission follows source
/// order.
pub fn weather_transitions(
    previous: &HashMap<String, bool>,
    current: &WeatherSnapshot,
) -> Vec<Transition> {
    current
        .events
        .iter()
        .filter(|event| event.active && previous.get(&event.name) == Some(&false))
        .map(|event| Transition::EventStarted {
            name: event.name.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Shop, StockItem, WeatherEvent};

    fn snapshot(items: &[(&str, u64)]) -> StockSnapshot {
        StockSnapshot {
            shop: Shop::Seed,
            items: items
                .iter()
                .map(|(name, quantity)| StockItem {
                    name: name.to_string(),
                    quantity: *quantity,
                })
                .collect(),
        }
    }

    fn weather(events: &[(&str, bool)]) -> WeatherSnapshot {
        WeatherSnapshot {
            events: events
                .iter()
                .map(|(name, active)| WeatherEvent {
                    name: name.to_string(),
                    active: *active,
                    duration: 0,
                    starts_at: None,
                    ends_at: None,
                })
                .collect(),
        }
    }

    #[test]
    fn restock_fires_only_on_zero_to_positive() {
        let previous = HashMap::from([("A".to_string(), 0), ("B".to_string(), 3)]);
        let current = snapshot(&[("A", 5), ("B", 3), ("C", 0)]);

        let transitions = stock_transitions(&previous, &current);
        assert_eq!(
            transitions,
            vec![Transition::Restocked { name: "A".into(), quantity: 5 }]
        );
    }

    #[test]
    fn absent_previous_counts_as_zero() {
        let previous = HashMap::new();
        let current = snapshot(&[("Grape", 5)]);
        assert_eq!(stock_transitions(&previous, &current).len(), 1);
    }

    #[test]
    fn quantity_increase_above_zero_is_not_a_transition() {
        let previous = HashMap::from([("Grape".to_string(), 2)]);
        let current = snapshot(&[("Grape", 9)]);
        assert!(stock_transitions(&previous, &current).is_empty());
    }

    #[test]
    fn emission_follows_snapshot_order() {
        let previous = HashMap::new();
        let current = snapshot(&[("Beanstalk", 1), ("Cacao", 2), ("Pepper", 3)]);
        let names: Vec<String> = stock_transitions(&previous, &current)
            .iter()
            .map(|t| t.name().to_string())
            .collect();
        assert_eq!(names, vec!["Beanstalk", "Cacao", "Pepper"]);
    }

    #[test]
    fn weather_fires_once_on_activation() {
        let previous = HashMap::from([("Rain".to_string(), false)]);
        let current = weather(&[("Rain", true)]);
        assert_eq!(
            weather_transitions(&previous, &current),
            vec![Transition::EventStarted { name: "Rain".into() }]
        );

        // Still active next tick: no new transition.
        let previous = HashMap::from([("Rain".to_string(), true)]);
        assert!(weather_transitions(&previous, &current).is_empty());
    }

    #[test]
    fn unknown_weather_event_is_ignored() {
        let previous = HashMap::new();
        let current = weather(&[("Blackhole", true)]);
        assert!(weather_transitions(&previous, &current).is_empty());
    }
}
