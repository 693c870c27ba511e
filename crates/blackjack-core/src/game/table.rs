use super::round::{RoundError, RoundState};
use crate::model::action::Action;
use crate::model::rules::{RulesError, TableRules};
use crate::model::seat::Seat;
use crate::model::shoe::{Shoe, ShoeError};
use rand::SeedableRng;
use rand::rngs::StdRng;

const OPENING_CARDS: usize = 2;

/// A table persists the shoe and the environment RNG across rounds.
#[derive(Debug, Clone)]
pub struct Table {
    rules: TableRules,
    shoe: Shoe,
    rng: StdRng,
    seed: u64,
    rounds_dealt: u64,
    reshuffles: u64,
}

impl Table {
    pub fn new(rules: TableRules) -> Result<Self, RulesError> {
        let seed: u64 = rand::random();
        Self::with_seed(rules, seed)
    }

    pub fn with_seed(rules: TableRules, seed: u64) -> Result<Self, RulesError> {
        rules.check()?;
        Ok(Self {
            shoe: Shoe::new(rules.n_decks),
            rules,
            rng: StdRng::seed_from_u64(seed),
            seed,
            rounds_dealt: 0,
            reshuffles: 0,
        })
    }

    pub fn rules(&self) -> &TableRules {
        &self.rules
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    pub fn rounds_dealt(&self) -> u64 {
        self.rounds_dealt
    }

    pub fn reshuffles(&self) -> u64 {
        self.reshuffles
    }

    /// Starts a round for `n_players` plus the dealer, reshuffling first when
    /// the shoe has fallen below the cut or cannot cover the opening deal.
    pub fn deal(&mut self, n_players: usize) -> Result<RoundState, RoundError> {
        let opening = OPENING_CARDS * (n_players + 1);
        if self.shoe.needs_reshuffle(self.rules.cut) || self.shoe.len() < opening {
            self.shoe.reshuffle();
            self.reshuffles += 1;
        }
        if self.shoe.len() < opening {
            return Err(ShoeError::Empty.into());
        }
        let shoe = std::mem::replace(&mut self.shoe, Shoe::new(self.rules.n_decks));
        let round = RoundState::deal(shoe, n_players, self.rules.allow_double, &mut self.rng)?;
        self.rounds_dealt += 1;
        Ok(round)
    }

    /// Commits a real move using the table's own randomness.
    pub fn apply(
        &mut self,
        round: &mut RoundState,
        seat: Seat,
        action: Action,
    ) -> Result<(), RoundError> {
        round.apply(seat, action, &mut self.rng)
    }

    /// Takes the shoe back once a round is over.
    pub fn collect(&mut self, round: RoundState) {
        self.shoe = round.into_shoe();
    }
}
