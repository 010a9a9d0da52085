//! Player state machine: travel, buy and sell as guarded transitions.
//!
//! Every operation either applies all of its effects and appends one ledger
//! entry, or returns a [`TradeError`] and leaves the state untouched.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::{
    ledger::{ActionKind, ActionLedger},
    models::PlayerState,
    world::World,
};

/// Recoverable reasons an action was refused.
///
/// The `Display` text is the message shown to the player.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TradeError {
    #[error("You are already in {city}.")]
    AlreadyThere { city: String },
    #[error("Invalid destination: no road from {from} to {to}.")]
    NoRoad { from: String, to: String },
    #[error("The road from {from} to {to} has an unusable fuel cost.")]
    UnusableRoad { from: String, to: String },
    #[error("Not enough fuel to travel: need {required}, have {available}.")]
    InsufficientFuel { required: f64, available: f64 },
    #[error("{city} doesn't sell {good}.")]
    NotSold { city: String, good: String },
    #[error("You don't have enough money: need ${required}, have ${available}.")]
    InsufficientFunds { required: i64, available: i64 },
    #[error("You don't have enough {good} to sell: requested {requested}, holding {held}.")]
    InsufficientStock {
        good: String,
        requested: u32,
        held: u32,
    },
    #[error("Quantity must be positive.")]
    InvalidQuantity,
    #[error("That trade is too large to settle.")]
    TooLarge,
    #[error("Unknown city {city}.")]
    UnknownCity { city: String },
}

/// Outcome of an economy operation: a confirmation message or a refusal.
pub type TradeResult = Result<String, TradeError>;

/// Owns the player, the action ledger and a shared view of the world.
#[derive(Debug, Clone)]
pub struct Economy {
    world: Arc<World>,
    player: PlayerState,
    ledger: ActionLedger,
    starting_money: i64,
}

impl Economy {
    /// Start a session. The player's location must exist in the world.
    pub fn new(world: Arc<World>, player: PlayerState) -> Result<Self, TradeError> {
        if !world.contains_city(&player.location) {
            return Err(TradeError::UnknownCity {
                city: player.location,
            });
        }
        info!(
            location = %player.location,
            fuel = player.fuel,
            money = player.money,
            "starting trading session"
        );
        Ok(Self {
            starting_money: player.money,
            world,
            player,
            ledger: ActionLedger::new(),
        })
    }

    /// Current player state.
    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    /// Actions recorded so far.
    pub fn ledger(&self) -> &ActionLedger {
        &self.ledger
    }

    /// World the session plays in.
    pub fn world(&self) -> &Arc<World> {
        &self.world
    }

    /// Cash held when the session started.
    pub fn starting_money(&self) -> i64 {
        self.starting_money
    }

    /// Drive to an adjacent city, paying the road's fuel cost.
    pub fn travel(&mut self, destination: &str) -> TradeResult {
        let origin = self.player.location.clone();
        if destination == origin {
            return Err(TradeError::AlreadyThere { city: origin });
        }

        let cost = self
            .world
            .network
            .road_cost(&origin, destination)
            .ok_or_else(|| TradeError::NoRoad {
                from: origin.clone(),
                to: destination.to_string(),
            })?;
        let required = cost.fuel().ok_or_else(|| TradeError::UnusableRoad {
            from: origin.clone(),
            to: destination.to_string(),
        })?;
        if self.player.fuel < required {
            return Err(TradeError::InsufficientFuel {
                required,
                available: self.player.fuel,
            });
        }

        self.player.fuel -= required;
        self.player.location = destination.to_string();
        self.ledger.append(
            ActionKind::Travel,
            format!("Traveled from {origin} to {destination}"),
        );
        debug!(%origin, %destination, fuel = self.player.fuel, "travelled");

        Ok(format!(
            "Traveled to {destination}. Fuel left: {}",
            self.player.fuel
        ))
    }

    /// Buy goods from the current city at its listed price.
    pub fn buy(&mut self, good: &str, quantity: u32) -> TradeResult {
        if quantity == 0 {
            return Err(TradeError::InvalidQuantity);
        }

        let location = self.player.location.clone();
        let price = self
            .world
            .city(&location)
            .and_then(|city| city.price(good))
            .ok_or_else(|| TradeError::NotSold {
                city: location.clone(),
                good: good.to_string(),
            })?;

        let total = i64::from(price)
            .checked_mul(i64::from(quantity))
            .filter(|total| *total <= self.player.money)
            .ok_or_else(|| TradeError::InsufficientFunds {
                required: i64::from(price).saturating_mul(i64::from(quantity)),
                available: self.player.money,
            })?;
        let stock = self
            .player
            .held(good)
            .checked_add(quantity)
            .ok_or(TradeError::TooLarge)?;

        self.player.money -= total;
        self.player.inventory.insert(good.to_string(), stock);
        self.ledger.append(
            ActionKind::Buy,
            format!("Bought {quantity} {good} in {location} for ${total}"),
        );
        debug!(%good, quantity, total, "bought goods");

        Ok(format!("Bought {quantity} {good} for ${total}."))
    }

    /// Sell held goods to the current city.
    ///
    /// A city that does not list the good still takes it, paying nothing.
    pub fn sell(&mut self, good: &str, quantity: u32) -> TradeResult {
        if quantity == 0 {
            return Err(TradeError::InvalidQuantity);
        }

        let held = self.player.held(good);
        if held < quantity {
            return Err(TradeError::InsufficientStock {
                good: good.to_string(),
                requested: quantity,
                held,
            });
        }

        let location = self.player.location.clone();
        let price = self
            .world
            .city(&location)
            .and_then(|city| city.price(good))
            .unwrap_or(0);
        let income = i64::from(price)
            .checked_mul(i64::from(quantity))
            .ok_or(TradeError::TooLarge)?;
        let money = self
            .player
            .money
            .checked_add(income)
            .ok_or(TradeError::TooLarge)?;

        self.player.inventory.insert(good.to_string(), held - quantity);
        self.player.money = money;
        self.ledger.append(
            ActionKind::Sell,
            format!("Sold {quantity} {good} in {location} for ${income}"),
        );
        debug!(%good, quantity, income, "sold goods");

        Ok(format!("Sold {quantity} {good} for ${income}."))
    }

    /// Money gained (or lost) since the session started.
    pub fn profit(&self) -> i64 {
        self.player.money - self.starting_money
    }
}
