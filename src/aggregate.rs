use crate::battle::{BattleSimulator, SingleBattle};
use crate::error::{BattleError, ConfigError};
use crate::model::Combatant;
use crate::outcome::{BattleOutcome, Side, Survivor};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Deserialize;

/// Which side takes the majority when both won the same number of runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MajorityTie {
    #[default]
    #[serde(alias = "a")]
    SideA,
    #[serde(alias = "b")]
    SideB,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub a_wins: u64,
    pub b_wins: u64,
    pub draws: u64,
    pub a_hp_sum: u64,
    pub b_hp_sum: u64,
}

impl Tally {
    pub fn record(&mut self, battle: &SingleBattle) {
        match battle.winner() {
            Some(Side::A) => {
                self.a_wins += 1;
                self.a_hp_sum += battle.a_hp as u64;
            }
            Some(Side::B) => {
                self.b_wins += 1;
                self.b_hp_sum += battle.b_hp as u64;
            }
            None => self.draws += 1,
        }
    }

    pub fn merge(self, other: Tally) -> Tally {
        Tally {
            a_wins: self.a_wins + other.a_wins,
            b_wins: self.b_wins + other.b_wins,
            draws: self.draws + other.draws,
            a_hp_sum: self.a_hp_sum + other.a_hp_sum,
            b_hp_sum: self.b_hp_sum + other.b_hp_sum,
        }
    }

    pub fn runs(&self) -> u64 {
        self.a_wins + self.b_wins + self.draws
    }

    pub fn wins(&self, side: Side) -> u64 {
        match side {
            Side::A => self.a_wins,
            Side::B => self.b_wins,
        }
    }

    /// Mean remaining HP over the runs `side` won, halves rounded to even.
    /// 0 if it won none.
    pub fn mean_hp(&self, side: Side) -> u32 {
        let (wins, sum) = match side {
            Side::A => (self.a_wins, self.a_hp_sum),
            Side::B => (self.b_wins, self.b_hp_sum),
        };
        if wins == 0 {
            return 0;
        }
        (sum as f64 / wins as f64).round_ties_even() as u32
    }

    /// Side with more wins, `None` when no run produced a winner.
    pub fn majority(&self, tie_rule: MajorityTie) -> Option<Side> {
        if self.a_wins == 0 && self.b_wins == 0 {
            return None;
        }
        let side = match self.a_wins.cmp(&self.b_wins) {
            std::cmp::Ordering::Greater => Side::A,
            std::cmp::Ordering::Less => Side::B,
            std::cmp::Ordering::Equal => match tie_rule {
                MajorityTie::SideA => Side::A,
                MajorityTie::SideB => Side::B,
            },
        };
        Some(side)
    }
}

/// Runs a simulator repeatedly from the same snapshot and reports the modal
/// winner.
#[derive(Debug, Clone)]
pub struct Aggregator {
    pub runs: usize,
    pub seed: u64,
    pub tie_rule: MajorityTie,
}

impl Default for Aggregator {
    fn default() -> Self {
        Aggregator {
            runs: 100,
            seed: 0,
            tie_rule: MajorityTie::default(),
        }
    }
}

impl Aggregator {
    pub fn new(runs: usize, seed: u64) -> Self {
        Aggregator {
            runs,
            seed,
            ..Aggregator::default()
        }
    }

    pub fn with_tie_rule(mut self, tie_rule: MajorityTie) -> Self {
        self.tie_rule = tie_rule;
        self
    }

    fn run_seeds(&self) -> Vec<u64> {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        (0..self.runs).map(|_| rng.gen()).collect()
    }

    /// Runs are independent; they are spread over rayon's pool and the
    /// counts merged, so the result does not depend on scheduling.
    pub fn tally<S>(&self, simulator: &S, a: &Combatant, b: &Combatant) -> Result<Tally, BattleError>
    where
        S: BattleSimulator + ?Sized,
    {
        if self.runs == 0 {
            return Err(ConfigError::ZeroRuns.into());
        }
        self.run_seeds()
            .par_iter()
            .map(|&seed| simulator.simulate(a, b, seed))
            .try_fold(Tally::default, |mut tally, battle| {
                tally.record(&battle?);
                Ok::<_, BattleError>(tally)
            })
            .try_reduce(Tally::default, |x, y| Ok(x.merge(y)))
    }

    pub fn resolve<S>(&self, simulator: &S, a: &Combatant, b: &Combatant) -> Result<BattleOutcome, BattleError>
    where
        S: BattleSimulator + ?Sized,
    {
        let tally = self.tally(simulator, a, b)?;
        let counts = format!(
            "{} wins: {}, {} wins: {}, draws: {}",
            a.name, tally.a_wins, b.name, tally.b_wins, tally.draws
        );
        let Some(side) = tally.majority(self.tie_rule) else {
            tracing::warn!(a = %a.name, b = %b.name, runs = tally.runs(), "Every run ended in a draw");
            return Ok(BattleOutcome::draw(&a.name, &b.name).with_log(vec![
                counts,
                format!("No winner across {} battles. Both are knocked out.", tally.runs()),
            ]));
        };
        let (winner, loser) = match side {
            Side::A => (a, b),
            Side::B => (b, a),
        };
        let hp = tally.mean_hp(side).min(winner.max_hp());
        tracing::info!(
            winner = %winner.name,
            wins = tally.wins(side),
            runs = tally.runs(),
            avg_hp = hp,
            "Aggregated battles"
        );
        let log = vec![
            counts,
            format!("{} is the most frequent winner. Avg HP left: {hp}", winner.name),
        ];
        Ok(BattleOutcome::win(side, Survivor::new(&winner.name, hp), &loser.name).with_log(log))
    }
}
