use once_cell::sync::Lazy;
use regex::Regex;

pub const HELP_TEXT: &str = "Commands:
  travel <city>        drive to a connected city
  buy <good> <qty>     buy goods in the current city
  sell <good> <qty>    sell goods from your inventory
  prices               show the market price table
  inventory            show the goods you carry
  routes               list roads out of the current city
  history              show every action so far
  advise               ask the trade advisor for a tip
  status               show location, money, fuel and profit
  profit               show profit so far
  help                 show this list
  quit                 end the game";

static COMMAND_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<verb>[A-Za-z]+)(?:\s+(?P<rest>.*?))?\s*$")
        .expect("invalid command regex")
});

static TRADE_ARGS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<good>.+?)\s+(?P<qty>[+-]?\d+)$").expect("invalid trade argument regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Travel(String),
    Buy { good: String, quantity: u32 },
    Sell { good: String, quantity: u32 },
    Prices,
    Inventory,
    Routes,
    History,
    Advise,
    Status,
    Profit,
    Help,
    Quit,
}

/// Parse one line of player input. Errors are messages for the player.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let caps = COMMAND_RE
        .captures(line)
        .ok_or_else(|| "Type 'help' for a list of commands.".to_string())?;
    let verb = caps["verb"].to_lowercase();
    let rest = caps.name("rest").map(|m| m.as_str()).unwrap_or("");

    match verb.as_str() {
        "travel" | "go" => {
            if rest.is_empty() {
                Err("Usage: travel <city>".to_string())
            } else {
                Ok(Command::Travel(rest.to_string()))
            }
        }
        "buy" => {
            let (good, quantity) = parse_trade_args("buy", rest)?;
            Ok(Command::Buy { good, quantity })
        }
        "sell" => {
            let (good, quantity) = parse_trade_args("sell", rest)?;
            Ok(Command::Sell { good, quantity })
        }
        "prices" => Ok(Command::Prices),
        "inventory" | "inv" => Ok(Command::Inventory),
        "routes" => Ok(Command::Routes),
        "history" => Ok(Command::History),
        "advise" | "ai" => Ok(Command::Advise),
        "status" => Ok(Command::Status),
        "profit" => Ok(Command::Profit),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!(
            "Unknown command '{other}'. Type 'help' for a list of commands."
        )),
    }
}

fn parse_trade_args(verb: &str, rest: &str) -> Result<(String, u32), String> {
    let caps = TRADE_ARGS_RE
        .captures(rest)
        .ok_or_else(|| format!("Usage: {verb} <good> <quantity>"))?;
    let good = caps["good"].trim().to_lowercase();
    let quantity: i64 = caps["qty"]
        .parse()
        .map_err(|_| "Invalid quantity: please enter a number.".to_string())?;
    if quantity <= 0 {
        return Err("Quantity must be positive.".to_string());
    }
    let quantity = u32::try_from(quantity).map_err(|_| "Quantity is too large.".to_string())?;
    Ok((good, quantity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trade_commands() {
        assert_eq!(
            parse_command("  BUY Wheat 5 "),
            Ok(Command::Buy {
                good: "wheat".to_string(),
                quantity: 5
            })
        );
        assert_eq!(
            parse_command("sell olive oil 2"),
            Ok(Command::Sell {
                good: "olive oil".to_string(),
                quantity: 2
            })
        );
    }

    #[test]
    fn rejects_non_positive_quantities() {
        assert_eq!(
            parse_command("buy wheat 0"),
            Err("Quantity must be positive.".to_string())
        );
        assert_eq!(
            parse_command("sell wheat -3"),
            Err("Quantity must be positive.".to_string())
        );
        assert_eq!(
            parse_command("buy wheat 99999999999"),
            Err("Quantity is too large.".to_string())
        );
        assert_eq!(
            parse_command("buy wheat lots"),
            Err("Usage: buy <good> <quantity>".to_string())
        );
    }

    #[test]
    fn parses_travel_and_simple_verbs() {
        assert_eq!(
            parse_command("travel New York"),
            Ok(Command::Travel("New York".to_string()))
        );
        assert_eq!(parse_command("Quit"), Ok(Command::Quit));
        assert_eq!(parse_command("ai"), Ok(Command::Advise));
        assert!(parse_command("travel").is_err());
        assert!(parse_command("dance").unwrap_err().contains("Unknown command 'dance'"));
    }
}
