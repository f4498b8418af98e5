//! Closed-form outcome heuristic: no simulation, just weighted attributes.

use crate::error::BattleError;
use crate::model::Combatant;
use crate::outcome::{BattleOutcome, Side, Survivor};
use crate::types::TypeChart;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub level: f64,
    pub hp: f64,
    pub type_multiplier: f64,
    pub stage: f64,
    /// Fraction of the score margin the winner keeps as HP.
    pub margin_to_hp: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights {
            level: 2.0,
            hp: 1.5,
            type_multiplier: 60.0,
            stage: 14.0,
            margin_to_hp: 0.7,
        }
    }
}

/// What happens when both scores are equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    #[serde(alias = "a")]
    SideA,
    #[default]
    #[serde(alias = "b")]
    SideB,
    Random,
    Draw,
}

pub struct Scorer {
    chart: Arc<TypeChart>,
    weights: ScoreWeights,
    tie_break: TieBreak,
    rng: SmallRng,
}

impl Scorer {
    pub fn new(chart: Arc<TypeChart>, weights: ScoreWeights, tie_break: TieBreak, seed: u64) -> Self {
        Scorer {
            chart,
            weights,
            tie_break,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    pub fn score(&self, combatant: &Combatant, opponent: &Combatant) -> f64 {
        let w = &self.weights;
        let multiplier = self
            .chart
            .best_multiplier(&combatant.types, &opponent.types) as f64;
        combatant.level() as f64 * w.level
            + combatant.current_hp() as f64 * w.hp
            + multiplier * w.type_multiplier
            + combatant.stage() as f64 * w.stage
    }

    pub fn resolve(&mut self, a: &Combatant, b: &Combatant) -> Result<BattleOutcome, BattleError> {
        for mon in [a, b] {
            if mon.is_fainted() {
                return Err(BattleError::Fainted {
                    name: mon.name.clone(),
                });
            }
        }
        let score_a = self.score(a, b);
        let score_b = self.score(b, a);
        let margin = (score_a - score_b).abs();

        let side = if score_a > score_b {
            Side::A
        } else if score_b > score_a {
            Side::B
        } else {
            match self.tie_break {
                TieBreak::SideA => Side::A,
                TieBreak::SideB => Side::B,
                TieBreak::Random => {
                    if self.rng.gen_bool(0.5) {
                        Side::A
                    } else {
                        Side::B
                    }
                }
                TieBreak::Draw => {
                    tracing::warn!(a = %a.name, b = %b.name, score = score_a, "Scores tied, declaring a draw");
                    return Ok(BattleOutcome::draw(&a.name, &b.name).with_log(vec![format!(
                        "{} and {} are evenly matched ({score_a:.1}). Both are knocked out.",
                        a.name, b.name
                    )]));
                }
            }
        };

        let (winner, loser) = match side {
            Side::A => (a, b),
            Side::B => (b, a),
        };
        let remaining = (margin * self.weights.margin_to_hp)
            .min(winner.current_hp() as f64)
            .floor()
            .max(0.0) as u32;
        tracing::debug!(
            a = %a.name,
            b = %b.name,
            score_a,
            score_b,
            winner = %winner.name,
            remaining,
            "Scored battle"
        );
        let log = vec![
            format!(
                "Score: {}: {score_a:.1}, {}: {score_b:.1}",
                a.name, b.name
            ),
            format!("{} wins with {remaining} HP left", winner.name),
        ];
        Ok(BattleOutcome::win(side, Survivor::new(&winner.name, remaining), &loser.name).with_log(log))
    }
}
