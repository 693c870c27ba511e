use serde::{Deserialize, Serialize};

const DEFAULT_DECKS: u16 = 2;
const DEFAULT_CUT: f64 = 0.5;

/// House rules for a table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TableRules {
    #[serde(default = "default_decks")]
    pub n_decks: u16,
    /// Reshuffle once the shoe falls below this fraction of `13 * n_decks`.
    #[serde(default = "default_cut")]
    pub cut: f64,
    #[serde(default)]
    pub allow_double: bool,
}

impl Default for TableRules {
    fn default() -> Self {
        Self {
            n_decks: DEFAULT_DECKS,
            cut: DEFAULT_CUT,
            allow_double: false,
        }
    }
}

impl TableRules {
    pub fn with_decks(n_decks: u16) -> Self {
        Self {
            n_decks,
            ..Self::default()
        }
    }

    pub fn check(&self) -> Result<(), RulesError> {
        if self.n_decks == 0 {
            return Err(RulesError::NoDecks);
        }
        if !(0.0..1.0).contains(&self.cut) {
            return Err(RulesError::CutOutOfRange(self.cut));
        }
        Ok(())
    }
}

fn default_decks() -> u16 {
    DEFAULT_DECKS
}

fn default_cut() -> f64 {
    DEFAULT_CUT
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RulesError {
    NoDecks,
    CutOutOfRange(f64),
}
