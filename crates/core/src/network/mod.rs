//! Weighted road network between cities and single-source shortest paths.

use std::{
    cmp::Ordering,
    collections::{BTreeMap, BinaryHeap, HashMap},
    fmt,
};

use serde_json::Value;

/// Fuel cost stored on a road.
///
/// Costs come from loosely-typed world data, so a road may carry a value
/// that cannot be used as fuel. Such roads stay in the graph but are never
/// traversed.
#[derive(Debug, Clone, PartialEq)]
pub enum RoadCost {
    /// A numeric fuel cost.
    Fuel(f64),
    /// A cost that could not be read as a number, kept verbatim.
    Malformed(String),
}

impl RoadCost {
    /// Fuel needed to drive the road, if the cost is a usable number.
    pub fn fuel(&self) -> Option<f64> {
        match self {
            RoadCost::Fuel(value) if value.is_finite() && *value >= 0.0 => Some(*value),
            _ => None,
        }
    }
}

impl From<f64> for RoadCost {
    fn from(value: f64) -> Self {
        RoadCost::Fuel(value)
    }
}

impl From<u32> for RoadCost {
    fn from(value: u32) -> Self {
        RoadCost::Fuel(f64::from(value))
    }
}

impl From<&str> for RoadCost {
    fn from(value: &str) -> Self {
        match value.trim().parse::<f64>() {
            Ok(parsed) => RoadCost::Fuel(parsed),
            Err(_) => RoadCost::Malformed(value.to_string()),
        }
    }
}

impl From<&Value> for RoadCost {
    fn from(value: &Value) -> Self {
        match value {
            Value::Number(num) => match num.as_f64() {
                Some(parsed) => RoadCost::Fuel(parsed),
                None => RoadCost::Malformed(num.to_string()),
            },
            Value::String(text) => RoadCost::from(text.as_str()),
            other => RoadCost::Malformed(other.to_string()),
        }
    }
}

impl fmt::Display for RoadCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoadCost::Fuel(value) => write!(f, "{value}"),
            RoadCost::Malformed(raw) => write!(f, "?{raw}"),
        }
    }
}

/// Undirected graph of cities keyed by name.
///
/// Every city referenced by a road is also a node, even when it has no
/// neighbours of its own.
#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    adjacency: BTreeMap<String, BTreeMap<String, RoadCost>>,
}

impl RoadNetwork {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a city with no roads if it is not already present.
    pub fn add_city(&mut self, name: impl Into<String>) {
        self.adjacency.entry(name.into()).or_default();
    }

    /// Connect `a` and `b` in both directions with the same cost.
    pub fn add_road(&mut self, a: &str, b: &str, cost: impl Into<RoadCost>) {
        let cost = cost.into();
        self.add_city(a);
        self.add_city(b);
        self.adjacency
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string(), cost.clone());
        self.adjacency
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string(), cost);
    }

    /// Whether `city` is a node of the network.
    pub fn contains(&self, city: &str) -> bool {
        self.adjacency.contains_key(city)
    }

    /// All city names in the network, in name order.
    pub fn cities(&self) -> impl Iterator<Item = &str> + '_ {
        self.adjacency.keys().map(String::as_str)
    }

    /// Number of cities in the network.
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    /// Whether the network has no cities.
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Adjacent cities and road costs. Unknown cities have no neighbours.
    pub fn neighbors(&self, city: &str) -> impl Iterator<Item = (&str, &RoadCost)> + '_ {
        self.adjacency
            .get(city)
            .into_iter()
            .flat_map(|roads| roads.iter().map(|(name, cost)| (name.as_str(), cost)))
    }

    /// Cost of the direct road between `a` and `b`, if one exists.
    pub fn road_cost(&self, a: &str, b: &str) -> Option<&RoadCost> {
        self.adjacency.get(a).and_then(|roads| roads.get(b))
    }

    /// Minimum fuel cost from `source` to every city (Dijkstra).
    ///
    /// Roads with malformed costs are ignored. An unknown source yields an
    /// empty result.
    pub fn shortest_distances(&self, source: &str) -> ShortestPaths {
        let Some((source_name, _)) = self.adjacency.get_key_value(source) else {
            return ShortestPaths::default();
        };

        let mut distances: HashMap<String, f64> = self
            .adjacency
            .keys()
            .map(|name| (name.clone(), f64::INFINITY))
            .collect();
        let mut predecessors: HashMap<String, String> = HashMap::new();
        let mut queue = BinaryHeap::new();

        distances.insert(source_name.clone(), 0.0);
        queue.push(QueueEntry {
            distance: 0.0,
            city: source_name.as_str(),
        });

        while let Some(QueueEntry { distance, city }) = queue.pop() {
            // Stale entry: a shorter distance was recorded after this push.
            if distance > distances.get(city).copied().unwrap_or(f64::INFINITY) {
                continue;
            }

            for (neighbor, cost) in self.neighbors(city) {
                let Some(fuel) = cost.fuel() else {
                    continue;
                };
                let candidate = distance + fuel;
                let best = distances.get(neighbor).copied().unwrap_or(f64::INFINITY);
                if candidate < best {
                    distances.insert(neighbor.to_string(), candidate);
                    predecessors.insert(neighbor.to_string(), city.to_string());
                    queue.push(QueueEntry {
                        distance: candidate,
                        city: neighbor,
                    });
                }
            }
        }

        ShortestPaths {
            source: Some(source_name.clone()),
            distances,
            predecessors,
        }
    }
}

/// Result of a single-source shortest path search.
#[derive(Debug, Clone, Default)]
pub struct ShortestPaths {
    source: Option<String>,
    distances: HashMap<String, f64>,
    predecessors: HashMap<String, String>,
}

impl ShortestPaths {
    /// City the search started from, `None` when it was unknown.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Whether the search produced no results.
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Minimum fuel cost to `city`; infinity when unreachable or unknown.
    pub fn distance(&self, city: &str) -> f64 {
        self.distances.get(city).copied().unwrap_or(f64::INFINITY)
    }

    /// Whether `city` can be reached from the source.
    pub fn is_reachable(&self, city: &str) -> bool {
        self.distance(city).is_finite()
    }

    /// City preceding `city` on a shortest route.
    pub fn predecessor(&self, city: &str) -> Option<&str> {
        self.predecessors.get(city).map(String::as_str)
    }

    /// Every city with its distance, in name order.
    pub fn distances(&self) -> Vec<(&str, f64)> {
        let mut entries: Vec<_> = self
            .distances
            .iter()
            .map(|(name, distance)| (name.as_str(), *distance))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Cities on a shortest route from the source to `city`, both included.
    pub fn route_to(&self, city: &str) -> Option<Vec<String>> {
        if !self.is_reachable(city) {
            return None;
        }
        let mut route = vec![city.to_string()];
        let mut current = city;
        while let Some(previous) = self.predecessor(current) {
            route.push(previous.to_string());
            current = previous;
        }
        route.reverse();
        Some(route)
    }
}

#[derive(Debug, Clone, Copy)]
struct QueueEntry<'a> {
    distance: f64,
    city: &'a str,
}

impl PartialEq for QueueEntry<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry<'_> {}

impl PartialOrd for QueueEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Reversed so the max-heap pops the smallest distance first.
impl Ord for QueueEntry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.city.cmp(self.city))
    }
}
