//! Greedy trade suggestions combining route costs with price differences.

use std::sync::Arc;

use tracing::debug;

use crate::world::World;

/// Weight applied to the fuel needed to reach a destination.
pub const FUEL_COST_WEIGHT: f64 = 0.5;

/// Most profitable single-good trade found from a location.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    /// City to carry the good to.
    pub destination: String,
    /// Good to buy here and sell there.
    pub good: String,
    /// Per-unit price gap minus the weighted fuel cost.
    pub margin: f64,
    /// Unit price in the current city.
    pub price_here: u32,
    /// Unit price at the destination.
    pub price_there: u32,
    /// Fuel needed along the cheapest route.
    pub fuel_cost: f64,
    /// Cities on the cheapest route, origin first.
    pub route: Vec<String>,
}

impl Suggestion {
    /// Raw price gap per unit, ignoring fuel.
    pub fn per_unit(&self) -> i64 {
        i64::from(self.price_there) - i64::from(self.price_here)
    }

    /// Units affordable with `money` at the current city's price.
    pub fn affordable_quantity(&self, money: i64) -> i64 {
        if self.price_here == 0 || money <= 0 {
            return 0;
        }
        money / i64::from(self.price_here)
    }

    /// Gross gain from spending `money` on the good, before fuel.
    pub fn estimated_gross(&self, money: i64) -> i64 {
        self.per_unit().max(0) * self.affordable_quantity(money)
    }
}

/// Suggests the best (destination, good) pair within a fuel budget.
#[derive(Debug, Clone)]
pub struct TradeAdvisor {
    world: Arc<World>,
}

impl TradeAdvisor {
    /// Build an advisor over a shared world.
    pub fn new(world: Arc<World>) -> Self {
        Self { world }
    }

    /// Best trade reachable from `location` with at most `fuel_budget` fuel.
    ///
    /// Returns `None` when no reachable destination offers a strictly
    /// positive margin. Affordability is left to the caller.
    pub fn suggest(&self, location: &str, fuel_budget: f64) -> Option<Suggestion> {
        let paths = self.world.network.shortest_distances(location);
        let here = self.world.city(location)?;

        let mut best: Option<Suggestion> = None;
        let mut best_margin = 0.0;

        for (destination, fuel_cost) in paths.distances() {
            if destination == location || !fuel_cost.is_finite() || fuel_cost > fuel_budget {
                continue;
            }
            let Some(there) = self.world.city(destination) else {
                continue;
            };

            for (good, &price_here) in &here.goods {
                let Some(price_there) = there.price(good) else {
                    continue;
                };
                let margin = (f64::from(price_there) - f64::from(price_here))
                    - FUEL_COST_WEIGHT * fuel_cost;
                if margin > best_margin {
                    best_margin = margin;
                    best = Some(Suggestion {
                        destination: destination.to_string(),
                        good: good.clone(),
                        margin,
                        price_here,
                        price_there,
                        fuel_cost,
                        route: paths.route_to(destination).unwrap_or_default(),
                    });
                }
            }
        }

        match &best {
            Some(found) => debug!(
                destination = %found.destination,
                good = %found.good,
                margin = found.margin,
                "trade suggestion"
            ),
            None => debug!(%location, fuel_budget, "no profitable trade"),
        }
        best
    }
}
