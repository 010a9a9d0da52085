#![warn(clippy::all, missing_docs)]

//! Core domain logic for City Trader.
//!
//! This crate hosts the road network and shortest-path search, the action
//! ledger, the player economy, the trade advisor, world loading and
//! configuration, used by the command-line frontend.

pub mod advisor;
pub mod config;
pub mod economy;
pub mod ledger;
pub mod models;
pub mod network;
pub mod world;

pub use advisor::{Suggestion, TradeAdvisor};
pub use config::AppConfig;
pub use economy::{Economy, TradeError, TradeResult};
pub use ledger::{ActionKind, ActionLedger, LedgerEntry};
pub use models::PlayerState;
pub use network::{RoadCost, RoadNetwork, ShortestPaths};
pub use world::{City, PriceTable, World, WorldLoader};
