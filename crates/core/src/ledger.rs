//! Append-only record of the player's actions.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder line rendered for an empty ledger.
pub const EMPTY_LEDGER_TEXT: &str = "No actions recorded.";

/// Kind of action stored in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    /// Moved between cities.
    Travel,
    /// Bought goods.
    Buy,
    /// Sold goods.
    Sell,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ActionKind::Travel => "Travel",
            ActionKind::Buy => "Buy",
            ActionKind::Sell => "Sell",
        };
        f.write_str(label)
    }
}

/// Single ledger record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// What kind of action happened.
    pub kind: ActionKind,
    /// Free-text description of the action.
    pub description: String,
    /// When the action was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// Ordered history of actions. Entries can only be appended.
#[derive(Debug, Clone, Default)]
pub struct ActionLedger {
    entries: Vec<LedgerEntry>,
}

impl ActionLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an action at the end of the ledger.
    pub fn append(&mut self, kind: ActionKind, description: impl Into<String>) {
        self.entries.push(LedgerEntry {
            kind,
            description: description.into(),
            recorded_at: Utc::now(),
        });
    }

    /// Entries in insertion order. The iterator can be cloned to replay it.
    pub fn entries(&self) -> std::slice::Iter<'_, LedgerEntry> {
        self.entries.iter()
    }

    /// Number of recorded actions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Numbered, human-readable lines; a single placeholder when empty.
    pub fn render(&self) -> Vec<String> {
        if self.entries.is_empty() {
            return vec![EMPTY_LEDGER_TEXT.to_string()];
        }
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| format!("{}. {}: {}", index + 1, entry.kind, entry.description))
            .collect()
    }
}

impl<'a> IntoIterator for &'a ActionLedger {
    type Item = &'a LedgerEntry;
    type IntoIter = std::slice::Iter<'a, LedgerEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let mut ledger = ActionLedger::new();
        ledger.append(ActionKind::Travel, "Traveled from A to B");
        ledger.append(ActionKind::Buy, "Bought 2 wheat in B for $60");

        assert_eq!(ledger.len(), 2);
        let kinds: Vec<_> = ledger.entries().map(|entry| entry.kind).collect();
        assert_eq!(kinds, vec![ActionKind::Travel, ActionKind::Buy]);
        let stamps: Vec<_> = ledger.entries().map(|entry| entry.recorded_at).collect();
        assert!(stamps[0] <= stamps[1]);
    }

    #[test]
    fn entries_can_be_replayed() {
        let mut ledger = ActionLedger::new();
        ledger.append(ActionKind::Sell, "Sold 1 iron in C for $5");

        let replay = ledger.entries();
        assert_eq!(replay.clone().count(), 1);
        assert_eq!(replay.count(), 1);
        assert_eq!((&ledger).into_iter().count(), 1);
    }

    #[test]
    fn renders_numbered_lines() {
        let mut ledger = ActionLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.render(), vec![EMPTY_LEDGER_TEXT.to_string()]);

        ledger.append(ActionKind::Travel, "Traveled from A to B");
        ledger.append(ActionKind::Sell, "Sold 3 wheat in B for $150");
        assert_eq!(
            ledger.render(),
            vec![
                "1. Travel: Traveled from A to B".to_string(),
                "2. Sell: Sold 3 wheat in B for $150".to_string(),
            ]
        );
    }
}
