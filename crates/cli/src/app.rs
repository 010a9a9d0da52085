use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{debug, info};
use trader_core::{Economy, TradeAdvisor, TradeResult};

use crate::command::{parse_command, Command, HELP_TEXT};

/// Line-based game loop reading commands from `input` and printing to `output`.
pub struct TraderApp<R, W> {
    economy: Economy,
    advisor: TradeAdvisor,
    advisor_uses_left: u32,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TraderApp<R, W> {
    pub fn new(
        economy: Economy,
        advisor: TradeAdvisor,
        advisor_uses: u32,
        input: R,
        output: W,
    ) -> Self {
        Self {
            economy,
            advisor,
            advisor_uses_left: advisor_uses,
            input,
            output,
        }
    }

    pub fn economy(&self) -> &Economy {
        &self.economy
    }

    pub fn run(&mut self) -> Result<()> {
        let player = self.economy.player();
        let welcome = format!(
            "Welcome to City Trader!\nStarting in {} with ${} and {} fuel.\nType 'help' for a list of commands.",
            player.location, player.money, player.fuel
        );
        self.say(&welcome)?;

        let mut line = String::new();
        loop {
            write!(self.output, "\n> ")?;
            self.output.flush()?;

            line.clear();
            let read = self
                .input
                .read_line(&mut line)
                .context("failed to read command")?;
            if read == 0 {
                debug!("input closed");
                break;
            }
            if line.trim().is_empty() {
                continue;
            }

            match parse_command(&line) {
                Ok(command) => {
                    if !self.dispatch(command)? {
                        break;
                    }
                }
                Err(message) => self.say(&message)?,
            }
        }

        self.finish()
    }

    /// Execute one command. Returns `false` once the player quits.
    fn dispatch(&mut self, command: Command) -> Result<bool> {
        let outcome = match command {
            Command::Travel(destination) => {
                let destination = self.resolve_neighbor(&destination);
                let outcome = self.economy.travel(&destination);
                self.report(outcome)
            }
            Command::Buy { good, quantity } => {
                let outcome = self.economy.buy(&good, quantity);
                self.report(outcome)
            }
            Command::Sell { good, quantity } => {
                let outcome = self.economy.sell(&good, quantity);
                self.report(outcome)
            }
            Command::Prices => {
                let table = self.economy.world().price_table();
                self.say(&format!("Current market prices:\n{table}"))
            }
            Command::Inventory => self.show_inventory(),
            Command::Routes => self.show_routes(),
            Command::History => self.show_history(),
            Command::Advise => self.advise(),
            Command::Status => {
                let player = self.economy.player();
                let status = format!(
                    "You are in {}. Money: ${} | Fuel: {} | Profit: ${}",
                    player.location,
                    player.money,
                    player.fuel,
                    self.economy.profit()
                );
                self.say(&status)
            }
            Command::Profit => {
                let profit = self.economy.profit();
                self.say(&format!("Profit so far: ${profit}"))
            }
            Command::Help => self.say(HELP_TEXT),
            Command::Quit => return Ok(false),
        };
        outcome.map(|()| true)
    }

    fn report(&mut self, outcome: TradeResult) -> Result<()> {
        match outcome {
            Ok(message) => self.say(&message),
            Err(err) => {
                debug!(%err, "action refused");
                self.say(&err.to_string())
            }
        }
    }

    /// Match a typed city name against the current roads, ignoring case.
    fn resolve_neighbor(&self, typed: &str) -> String {
        let here = &self.economy.player().location;
        self.economy
            .world()
            .network
            .neighbors(here)
            .map(|(name, _)| name)
            .find(|name| name.eq_ignore_ascii_case(typed))
            .unwrap_or(typed)
            .to_string()
    }

    fn show_routes(&mut self) -> Result<()> {
        let here = self.economy.player().location.clone();
        let routes: Vec<String> = self
            .economy
            .world()
            .network
            .neighbors(&here)
            .map(|(name, cost)| format!("  - {name} ({cost} fuel)"))
            .collect();
        if routes.is_empty() {
            return self.say("No available routes from this city!");
        }
        self.say(&format!("Connected cities:\n{}", routes.join("\n")))
    }

    fn show_inventory(&mut self) -> Result<()> {
        let cargo: Vec<String> = self
            .economy
            .player()
            .cargo()
            .map(|(good, quantity)| format!("  - {good}: {quantity}"))
            .collect();
        if cargo.is_empty() {
            return self.say("Your inventory:\n  (empty)");
        }
        self.say(&format!("Your inventory:\n{}", cargo.join("\n")))
    }

    fn show_history(&mut self) -> Result<()> {
        let ledger = self.economy.ledger();
        let mut lines = vec!["Your journey:".to_string()];
        if ledger.is_empty() {
            lines.extend(ledger.render());
        } else {
            lines.extend(ledger.render().into_iter().zip(ledger.entries()).map(
                |(line, entry)| {
                    let at = entry.recorded_at.with_timezone(&Local);
                    format!("{line} [{}]", at.format("%H:%M:%S"))
                },
            ));
        }
        self.say(&lines.join("\n"))
    }

    fn advise(&mut self) -> Result<()> {
        if self.advisor_uses_left == 0 {
            return self.say("You already used your trade advisor this game.");
        }

        let player = self.economy.player();
        let Some(suggestion) = self.advisor.suggest(&player.location, player.fuel) else {
            return self.say("You can still travel, but no trades look profitable right now.");
        };
        self.advisor_uses_left -= 1;
        info!(
            destination = %suggestion.destination,
            good = %suggestion.good,
            remaining = self.advisor_uses_left,
            "advisor consulted"
        );

        let money = player.money;
        let plan = format!(
            "Suggestion:\n  - Buy {good} in {here} at ${price_here} each.\n  - Travel to {dest} via {route} (fuel cost {fuel}).\n  - Sell there at ${price_there} each.\n  - Profit per unit about ${per_unit}. If you spend all your cash now, you could buy ~{qty} and gross about ${gross} before travel cost.",
            good = suggestion.good,
            here = player.location,
            price_here = suggestion.price_here,
            dest = suggestion.destination,
            route = suggestion.route.join(" -> "),
            fuel = suggestion.fuel_cost,
            price_there = suggestion.price_there,
            per_unit = suggestion.per_unit(),
            qty = suggestion.affordable_quantity(money),
            gross = suggestion.estimated_gross(money),
        );
        self.say(&plan)
    }

    fn finish(&mut self) -> Result<()> {
        self.show_history()?;
        let profit = self.economy.profit();
        info!(profit, "session finished");
        self.say(&format!(
            "Final profit: ${profit}\nThanks for playing City Trader!"
        ))
    }

    fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{message}").context("failed to write output")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{io::Cursor, sync::Arc};
    use trader_core::{PlayerState, WorldLoader};

    fn run_script(script: &str, advisor_uses: u32) -> Result<(String, Economy)> {
        let world = Arc::new(WorldLoader::parse(
            r#"{
                "cities": { "A": { "wheat": 30, "iron": 10 }, "B": { "wheat": 50 } },
                "roads": [["A", "B", 10]]
            }"#,
        )?);
        let economy = Economy::new(world.clone(), PlayerState::new("A", 100.0, 1000))?;
        let mut output = Vec::new();
        let economy = {
            let mut app = TraderApp::new(
                economy,
                TradeAdvisor::new(world),
                advisor_uses,
                Cursor::new(script.to_string()),
                &mut output,
            );
            app.run()?;
            app.economy().clone()
        };
        Ok((String::from_utf8(output)?, economy))
    }

    #[test]
    fn plays_a_profitable_round_trip() -> Result<()> {
        let script = "buy wheat 10\ntravel b\nsell wheat 10\nprofit\nquit\n";
        let (output, economy) = run_script(script, 1)?;

        assert!(output.contains("Bought 10 wheat for $300."));
        assert!(output.contains("Traveled to B. Fuel left: 90"));
        assert!(output.contains("Sold 10 wheat for $500."));
        assert!(output.contains("Profit so far: $200"));
        assert!(output.contains("3. Sell: Sold 10 wheat in B for $500"));
        assert!(output.contains("Final profit: $200"));
        assert_eq!(economy.ledger().len(), 3);
        Ok(())
    }

    #[test]
    fn refusals_are_reported_without_changes() -> Result<()> {
        let script = "travel A\nbuy silk 1\nsell wheat 1\nbuy wheat 0\n";
        let (output, economy) = run_script(script, 1)?;

        assert!(output.contains("You are already in A."));
        assert!(output.contains("A doesn't sell silk."));
        assert!(output.contains("You don't have enough wheat to sell"));
        assert!(output.contains("Quantity must be positive."));
        assert!(output.contains("No actions recorded."));
        assert_eq!(economy.player().money, 1000);
        assert!(economy.ledger().is_empty());
        Ok(())
    }

    #[test]
    fn advisor_is_rationed() -> Result<()> {
        let (output, _) = run_script("advise\nadvise\n", 1)?;

        assert!(output.contains("Buy wheat in A at $30 each."));
        assert!(output.contains("Travel to B via A -> B (fuel cost 10)."));
        assert!(output.contains("you could buy ~33 and gross about $660"));
        assert!(output.contains("You already used your trade advisor this game."));
        Ok(())
    }

    #[test]
    fn quit_ends_the_session_immediately() -> Result<()> {
        let (output, economy) = run_script("quit\nbuy wheat 1\n", 0)?;

        assert!(!output.contains("Bought"));
        assert!(output.contains("Final profit: $0"));
        assert!(economy.ledger().is_empty());
        assert_eq!(economy.player().money, 1000);
        Ok(())
    }

    #[test]
    fn lists_routes_and_inventory() -> Result<()> {
        let (output, _) = run_script("routes\ninventory\nbuy iron 2\ninventory\n", 0)?;

        assert!(output.contains("  - B (10 fuel)"));
        assert!(output.contains("  (empty)"));
        assert!(output.contains("  - iron: 2"));
        Ok(())
    }
}
