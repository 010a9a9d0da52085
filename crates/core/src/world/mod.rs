//! World description: the road network plus per-city price tables.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::network::RoadNetwork;

/// Loading world descriptions from JSON.
pub mod loader;

pub use loader::WorldLoader;

/// City used as the starting location when the world has no cities at all.
pub const FALLBACK_START_CITY: &str = "Paris";

/// A market town and the unit prices of the goods it trades.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    /// Unique city name.
    pub name: String,
    /// Unit price per good name.
    pub goods: BTreeMap<String, u32>,
}

impl City {
    /// Build a city from its name and price list.
    pub fn new(name: impl Into<String>, goods: BTreeMap<String, u32>) -> Self {
        Self {
            name: name.into(),
            goods,
        }
    }

    /// Unit price of `good`, if the city trades it.
    pub fn price(&self, good: &str) -> Option<u32> {
        self.goods.get(good).copied()
    }

    /// Whether the city lists `good` at all.
    pub fn sells(&self, good: &str) -> bool {
        self.goods.contains_key(good)
    }
}

/// Road network and city table, built once and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct World {
    /// Roads between cities.
    pub network: RoadNetwork,
    /// Cities keyed by name.
    pub cities: BTreeMap<String, City>,
}

impl World {
    /// Assemble a world, registering every city as a network node.
    pub fn new(mut network: RoadNetwork, cities: BTreeMap<String, City>) -> Self {
        for name in cities.keys() {
            network.add_city(name.as_str());
        }
        Self { network, cities }
    }

    /// The world embedded in the binary.
    pub fn builtin() -> anyhow::Result<Self> {
        WorldLoader::parse(include_str!("builtin_world.json"))
    }

    /// Look up a city by name.
    pub fn city(&self, name: &str) -> Option<&City> {
        self.cities.get(name)
    }

    /// Whether `name` is a known location (priced city or network node).
    pub fn contains_city(&self, name: &str) -> bool {
        self.cities.contains_key(name) || self.network.contains(name)
    }

    /// First city in name order, or [`FALLBACK_START_CITY`] for an empty world.
    pub fn default_start(&self) -> String {
        self.cities
            .keys()
            .next()
            .cloned()
            .unwrap_or_else(|| FALLBACK_START_CITY.to_string())
    }

    /// Tabulate every city's prices against the union of all goods.
    pub fn price_table(&self) -> PriceTable {
        let mut goods: Vec<String> = self
            .cities
            .values()
            .flat_map(|city| city.goods.keys().cloned())
            .collect();
        goods.sort();
        goods.dedup();

        let rows = self
            .cities
            .values()
            .map(|city| {
                let prices = goods.iter().map(|good| city.price(good)).collect();
                (city.name.clone(), prices)
            })
            .collect();

        PriceTable { goods, rows }
    }
}

/// Market prices of all cities, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceTable {
    /// Column headers, sorted.
    pub goods: Vec<String>,
    /// One row per city in name order; `None` where the city lacks the good.
    pub rows: Vec<(String, Vec<Option<u32>>)>,
}

impl fmt::Display for PriceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header: Vec<String> = std::iter::once("City".to_string())
            .chain(self.goods.iter().cloned())
            .collect();
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|(name, prices)| {
                std::iter::once(name.clone())
                    .chain(prices.iter().map(|price| match price {
                        Some(value) => format!("${value}"),
                        None => "-".to_string(),
                    }))
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = (0..header.len())
            .map(|col| {
                std::iter::once(&header)
                    .chain(cells.iter())
                    .map(|row| row[col].chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let render = |row: &[String]| {
            row.iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join(" | ")
        };

        writeln!(f, "{}", render(&header).trim_end())?;
        let rule = widths.iter().sum::<usize>() + 3 * widths.len().saturating_sub(1);
        write!(f, "{}", "-".repeat(rule))?;
        for row in &cells {
            write!(f, "\n{}", render(row).trim_end())?;
        }
        Ok(())
    }
}
