use crate::aggregate::Aggregator;
use crate::battle::BattleSimulator;
use crate::error::{BattleError, ConfigError, RosterError};
use crate::model::Combatant;
use crate::outcome::{BattleOutcome, Side, Verdict};
use crate::roster::Roster;
use crate::scorer::Scorer;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const LOG_TAIL: usize = 20;

/// Strategy that turns the two active combatants into an outcome.
pub enum Resolver {
    Deterministic(Scorer),
    Stochastic {
        aggregator: Aggregator,
        simulator: Box<dyn BattleSimulator>,
    },
    /// One simulator run per turn.
    Single {
        simulator: Box<dyn BattleSimulator>,
        rng: SmallRng,
    },
}

impl Resolver {
    pub fn single(simulator: Box<dyn BattleSimulator>, seed: u64) -> Self {
        Resolver::Single {
            simulator,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn resolve(&mut self, a: &Combatant, b: &Combatant) -> Result<BattleOutcome, BattleError> {
        match self {
            Resolver::Deterministic(scorer) => scorer.resolve(a, b),
            Resolver::Stochastic {
                aggregator,
                simulator,
            } => aggregator.resolve(&**simulator, a, b),
            Resolver::Single { simulator, rng } => {
                let battle = simulator.simulate(a, b, rng.gen())?;
                Ok(battle.into_outcome(a, b))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    Winner(String),
    Draw,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchState {
    Ongoing,
    /// That side's active member fainted and it still has others to send in.
    NeedsSubstitute(Side),
    Over(MatchResult),
}

fn active_of(team: &Roster) -> Result<&Combatant, RosterError> {
    team.active().ok_or_else(|| RosterError::NoActive {
        trainer: team.trainer().to_string(),
    })
}

/// Holds the two rosters of a match and applies resolved outcomes to them.
pub struct TeamBattleManager {
    team_a: Roster,
    team_b: Roster,
    resolver: Resolver,
    log: Vec<String>,
}

impl TeamBattleManager {
    /// Team A is the first roster and team B the second; any others are ignored.
    pub fn new(rosters: Vec<Roster>, resolver: Resolver) -> Result<Self, ConfigError> {
        let count = rosters.len();
        let mut rosters = rosters.into_iter();
        let (Some(team_a), Some(team_b)) = (rosters.next(), rosters.next()) else {
            return Err(ConfigError::NotEnoughTeams(count));
        };
        for team in [&team_a, &team_b] {
            if team.active().is_none() {
                return Err(ConfigError::NoEligibleCombatant {
                    trainer: team.trainer().to_string(),
                });
            }
        }
        let mut manager = TeamBattleManager {
            team_a,
            team_b,
            resolver,
            log: Vec::new(),
        };
        manager.start_new_battle();
        Ok(manager)
    }

    pub fn team(&self, side: Side) -> &Roster {
        match side {
            Side::A => &self.team_a,
            Side::B => &self.team_b,
        }
    }

    fn team_mut(&mut self, side: Side) -> &mut Roster {
        match side {
            Side::A => &mut self.team_a,
            Side::B => &mut self.team_b,
        }
    }

    pub fn current_battlers(&self) -> (Option<&Combatant>, Option<&Combatant>) {
        (self.team_a.active(), self.team_b.active())
    }

    pub fn log_lines(&self) -> &[String] {
        &self.log
    }

    /// Last lines of the battle log, newline-joined.
    pub fn battle_log(&self) -> String {
        let start = self.log.len().saturating_sub(LOG_TAIL);
        self.log[start..].join("\n")
    }

    pub fn team_status(&self, side: Side) -> Vec<String> {
        self.team(side).status_lines()
    }

    fn start_new_battle(&mut self) {
        if let (Some(a), Some(b)) = self.current_battlers() {
            let lines = [
                format!("Battle: {} vs {}", a.name, b.name),
                format!(
                    "Starting HP: {}: {} HP, {}: {} HP",
                    a.name,
                    a.current_hp(),
                    b.name,
                    b.current_hp()
                ),
            ];
            self.log.extend(lines);
        }
    }

    fn active_pair(&self) -> Result<(&Combatant, &Combatant), RosterError> {
        Ok((active_of(&self.team_a)?, active_of(&self.team_b)?))
    }

    /// Resolves the current pairing and applies the result.
    pub fn resolve_turn(&mut self) -> Result<BattleOutcome, BattleError> {
        let a = active_of(&self.team_a)?;
        let b = active_of(&self.team_b)?;
        let outcome = self.resolver.resolve(a, b)?;
        tracing::debug!(a = %a.name, b = %b.name, winner = ?outcome.winning_side(), "Resolved turn");
        self.apply_outcome(&outcome)?;
        Ok(outcome)
    }

    /// The only place HP of the active members changes after a turn. The
    /// outcome must name the current pairing.
    pub fn apply_outcome(&mut self, outcome: &BattleOutcome) -> Result<(), RosterError> {
        let (named_a, named_b) = match &outcome.verdict {
            Verdict::Win {
                side: Side::A,
                winner,
                loser,
            } => (&winner.name, &loser.name),
            Verdict::Win {
                side: Side::B,
                winner,
                loser,
            } => (&loser.name, &winner.name),
            Verdict::Draw { a, b } => (a, b),
        };
        let (active_a, active_b) = self.active_pair()?;
        for (active, named) in [(active_a, named_a), (active_b, named_b)] {
            if active.name != *named {
                return Err(RosterError::OutcomeMismatch {
                    active: active.name.clone(),
                    found: named.clone(),
                });
            }
        }

        let (hp_a, hp_b) = match &outcome.verdict {
            Verdict::Win { side, winner, .. } => match side {
                Side::A => (winner.remaining_hp, 0),
                Side::B => (0, winner.remaining_hp),
            },
            Verdict::Draw { .. } => (0, 0),
        };
        for (side, hp) in [(Side::A, hp_a), (Side::B, hp_b)] {
            let team = self.team_mut(side);
            let trainer = team.trainer().to_string();
            team.active_mut()
                .ok_or(RosterError::NoActive { trainer })?
                .set_hp(hp);
        }
        self.log.extend(outcome.log.iter().cloned());
        let (a, b) = self.active_pair()?;
        let line = format!(
            "Battle result: {} HP: {}, {} HP: {}",
            a.name,
            a.current_hp(),
            b.name,
            b.current_hp()
        );
        self.log.push(line);
        if outcome.is_draw() {
            self.log.push("Double knockout! It's a draw.".to_string());
        }
        Ok(())
    }

    /// Sends in `idx` for `side` after its active member fainted.
    pub fn handle_faint(&mut self, side: Side, idx: usize) -> Result<(), RosterError> {
        self.team_mut(side).substitute(idx)?;
        self.start_new_battle();
        Ok(())
    }

    pub fn match_state(&self) -> MatchState {
        match (self.team_a.is_defeated(), self.team_b.is_defeated()) {
            (true, true) => MatchState::Over(MatchResult::Draw),
            (true, false) => MatchState::Over(MatchResult::Winner(self.team_b.trainer().to_string())),
            (false, true) => MatchState::Over(MatchResult::Winner(self.team_a.trainer().to_string())),
            (false, false) => {
                for side in [Side::A, Side::B] {
                    if self.team(side).active().map_or(true, Combatant::is_fainted) {
                        return MatchState::NeedsSubstitute(side);
                    }
                }
                MatchState::Ongoing
            }
        }
    }

    /// Logs "game over" once the match is decided. Returns the result if so.
    pub fn finish(&mut self) -> Option<MatchResult> {
        let MatchState::Over(result) = self.match_state() else {
            return None;
        };
        let line = match &result {
            MatchResult::Winner(trainer) => format!("Game Over! {trainer} wins!"),
            MatchResult::Draw => "Game Over! Both teams are out of Pokemon.".to_string(),
        };
        self.log.push(line);
        Some(result)
    }

    pub fn note_no_substitute(&mut self, side: Side) {
        let line = format!(
            "No available Pokemon to substitute for {}!",
            self.team(side).trainer()
        );
        self.log.push(line);
    }
}
