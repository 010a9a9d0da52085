#![allow(missing_docs)]

use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::network::{RoadCost, RoadNetwork};

use super::{City, World};

/// Builds a [`World`] from a JSON world description.
///
/// Malformed roads and prices are skipped with a warning instead of failing
/// the whole load.
pub struct WorldLoader;

impl WorldLoader {
    pub fn from_path(path: impl AsRef<Path>) -> Result<World> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read world {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("failed to load world {}", path.display()))
    }

    pub fn parse(json: &str) -> Result<World> {
        let raw: RawWorld = serde_json::from_str(json).context("failed to parse world JSON")?;
        Ok(build_world(raw))
    }
}

fn build_world(raw: RawWorld) -> World {
    let cities = raw
        .cities
        .into_iter()
        .map(|(name, goods)| {
            let goods = normalize_goods(&name, goods);
            (name.clone(), City::new(name, goods))
        })
        .collect::<BTreeMap<_, _>>();

    let mut network = RoadNetwork::new();
    for (index, road) in raw.roads.iter().enumerate() {
        match parse_road(road) {
            Some((a, b, cost)) => {
                if cost.fuel().is_none() {
                    warn!("Road {a} - {b} has unusable cost {cost}; it will not be traversed");
                }
                network.add_road(a, b, cost);
            }
            None => warn!("Skipping road #{index}: expected [city, city, cost], got {road}"),
        }
    }

    debug!(
        cities = cities.len(),
        roads = raw.roads.len(),
        "world description loaded"
    );
    World::new(network, cities)
}

fn normalize_goods(city: &str, goods: BTreeMap<String, Value>) -> BTreeMap<String, u32> {
    let mut normalized = BTreeMap::new();
    for (good, price) in goods {
        let key = good.trim().to_lowercase();
        let value = match unit_price(&price) {
            Some(value) if !key.is_empty() => value,
            _ => {
                warn!("Skipping {good} in {city}: invalid price {price}");
                continue;
            }
        };
        if let Some(previous) = normalized.insert(key.clone(), value) {
            warn!("{city} lists {key} more than once; using ${value} over ${previous}");
        }
    }
    normalized
}

/// Whole unit price from any finite, non-negative JSON number.
///
/// Fractional prices are rounded to the nearest unit.
fn unit_price(price: &Value) -> Option<u32> {
    if let Some(value) = price.as_u64() {
        return u32::try_from(value).ok();
    }
    let value = price.as_f64()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let rounded = value.round();
    if rounded > f64::from(u32::MAX) {
        return None;
    }
    if rounded != value {
        warn!("Rounding fractional price {value} to {rounded}");
    }
    Some(rounded as u32)
}

fn parse_road(road: &Value) -> Option<(&str, &str, RoadCost)> {
    match road.as_array()?.as_slice() {
        [Value::String(a), Value::String(b), cost] => Some((a.as_str(), b.as_str(), cost.into())),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct RawWorld {
    #[serde(default)]
    cities: BTreeMap<String, BTreeMap<String, Value>>,
    #[serde(default)]
    roads: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn loads_world_from_file() -> Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join("world.json");
        fs::write(
            &path,
            json!({
                "cities": {
                    "A": { "wheat": 30, "Iron": 12 },
                    "B": { "wheat": 50 }
                },
                "roads": [["A", "B", 10]]
            })
            .to_string(),
        )?;

        let world = WorldLoader::from_path(&path)?;
        assert_eq!(world.cities.len(), 2);
        assert_eq!(world.city("A").and_then(|city| city.price("iron")), Some(12));
        assert_eq!(world.network.road_cost("B", "A"), Some(&RoadCost::Fuel(10.0)));
        Ok(())
    }

    #[test]
    fn skips_malformed_entries() -> Result<()> {
        let world = WorldLoader::parse(
            &json!({
                "cities": {
                    "A": { "wheat": -4, "salt": "cheap", "fish": 7 },
                    "Island": {}
                },
                "roads": [
                    ["A", "B"],
                    "A-B",
                    ["A", 3, 4],
                    ["A", "C", "far"],
                    ["A", "D", "6"]
                ]
            })
            .to_string(),
        )?;

        let a = world.city("A").expect("city A");
        assert_eq!(a.goods.len(), 1);
        assert_eq!(a.price("fish"), Some(7));
        assert!(world.network.contains("Island"));
        assert!(!world.network.contains("B"));
        assert_eq!(
            world.network.road_cost("A", "C"),
            Some(&RoadCost::Malformed("far".to_string()))
        );
        assert_eq!(world.network.road_cost("D", "A"), Some(&RoadCost::Fuel(6.0)));
        Ok(())
    }

    #[test]
    fn accepts_float_prices() -> Result<()> {
        let world = WorldLoader::parse(
            &json!({
                "cities": { "A": { "wheat": 30.0, "silk": 12.5, "salt": 1e12 } },
                "roads": []
            })
            .to_string(),
        )?;

        let a = world.city("A").expect("city A");
        assert!(a.sells("wheat"));
        assert_eq!(a.price("wheat"), Some(30));
        assert_eq!(a.price("silk"), Some(13));
        assert!(!a.sells("salt"));
        Ok(())
    }

    #[test]
    fn case_variants_of_a_good_collapse() -> Result<()> {
        let world = WorldLoader::parse(r#"{"cities": {"A": {"Wheat": 30, "wheat": 40}}}"#)?;

        let a = world.city("A").expect("city A");
        assert_eq!(a.goods.len(), 1);
        assert_eq!(a.price("wheat"), Some(40));
        Ok(())
    }

    #[test]
    fn missing_sections_default_to_empty() -> Result<()> {
        let world = WorldLoader::parse("{}")?;
        assert!(world.cities.is_empty());
        assert!(world.network.is_empty());
        Ok(())
    }

    #[test]
    fn reports_unreadable_files() {
        let err = WorldLoader::from_path("/nonexistent/world.json").unwrap_err();
        assert!(err.to_string().contains("failed to read world"));
    }
}
