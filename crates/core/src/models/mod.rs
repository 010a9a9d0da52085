//! Shared domain models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Mutable state of the trading player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Name of the city the player is in.
    pub location: String,
    /// Fuel on hand. Only travel consumes it.
    pub fuel: f64,
    /// Cash on hand.
    pub money: i64,
    /// Units held per good. Missing entries count as zero.
    #[serde(default)]
    pub inventory: BTreeMap<String, u32>,
}

impl PlayerState {
    /// A player with an empty inventory.
    pub fn new(location: impl Into<String>, fuel: f64, money: i64) -> Self {
        Self {
            location: location.into(),
            fuel,
            money,
            inventory: BTreeMap::new(),
        }
    }

    /// Units of `good` currently held.
    pub fn held(&self, good: &str) -> u32 {
        self.inventory.get(good).copied().unwrap_or(0)
    }

    /// Goods with a non-zero quantity, in name order.
    pub fn cargo(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.inventory
            .iter()
            .filter(|(_, quantity)| **quantity > 0)
            .map(|(good, quantity)| (good.as_str(), *quantity))
    }
}
