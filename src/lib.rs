pub mod aggregate;
pub mod battle;
pub mod config;
pub mod error;
pub mod manager;
pub mod model;
pub mod outcome;
pub mod roster;
pub mod scorer;
pub mod types;

use crate::config::{build_resolver, load_config, load_dataset, load_json, BattleConfig, DataPaths};
use crate::manager::{MatchResult, MatchState, TeamBattleManager};
use crate::model::{Combatant, MoveBook};
use crate::outcome::BattleOutcome;
use crate::types::TypeChart;
use std::path::PathBuf;
use std::sync::Arc;

pub use crate::config::Strategy;
pub use crate::error::{BattleError, ConfigError, RosterError};
pub use crate::outcome::{Side, Verdict};

#[derive(Debug, Clone)]
pub struct CliOptions {
    pub paths: DataPaths,
    pub config_path: Option<PathBuf>,
    pub overrides: ConfigOverrides,
    pub duel: Option<(DuelEntry, DuelEntry)>,
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub strategy: Option<Strategy>,
    pub runs: Option<usize>,
    pub seed: Option<u64>,
    pub tie_break: Option<scorer::TieBreak>,
    pub verbose: bool,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut BattleConfig) {
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(runs) = self.runs {
            config.runs = runs;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(tie_break) = self.tie_break {
            config.tie_break = tie_break;
        }
        config.verbose |= self.verbose;
    }
}

/// `NAME:LEVEL:MOVE[:TYPE/TYPE]` from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct DuelEntry {
    pub name: String,
    pub level: u32,
    pub move_id: String,
    pub types: Vec<String>,
}

impl std::str::FromStr for DuelEntry {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [name, level, move_id, rest @ ..] = parts.as_slice() else {
            anyhow::bail!("Expected NAME:LEVEL:MOVE[:TYPE/TYPE], got {s}");
        };
        let level = level
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("Invalid level {level} in {s}: {e}"))?;
        let types = match rest {
            [] => Vec::new(),
            [types] => types.split('/').filter(|t| !t.is_empty()).map(str::to_string).collect(),
            _ => anyhow::bail!("Too many fields in {s}"),
        };
        Ok(DuelEntry {
            name: name.to_string(),
            level,
            move_id: move_id.to_string(),
            types,
        })
    }
}

impl DuelEntry {
    pub fn combatant(&self, max_hp: u32) -> Result<Combatant, ConfigError> {
        Ok(Combatant::new(self.name.clone(), self.level, max_hp)?
            .with_types(self.types.iter().cloned())
            .with_move(self.move_id.clone()))
    }
}

/// Plays the match out, sending in the first eligible member whenever a side
/// needs a substitute.
pub fn play_match(manager: &mut TeamBattleManager) -> anyhow::Result<MatchResult> {
    loop {
        match manager.match_state() {
            MatchState::Over(result) => {
                manager.finish();
                return Ok(result);
            }
            MatchState::NeedsSubstitute(side) => {
                let next = manager
                    .team(side)
                    .eligible_substitutes()
                    .first()
                    .map(|(idx, _)| *idx);
                match next {
                    Some(idx) => manager.handle_faint(side, idx)?,
                    None => {
                        manager.note_no_substitute(side);
                        anyhow::bail!("{} has no Pokemon to send in", manager.team(side).trainer());
                    }
                }
            }
            MatchState::Ongoing => {
                manager.resolve_turn()?;
            }
        }
    }
}

/// Resolves one pairing of ad-hoc combatants with the configured strategy.
pub fn run_duel(
    a: &DuelEntry,
    b: &DuelEntry,
    config: &BattleConfig,
    chart: Arc<TypeChart>,
    moves: &MoveBook,
) -> anyhow::Result<BattleOutcome> {
    let a = a.combatant(config.max_hp())?;
    let b = b.combatant(config.max_hp())?;
    let mut resolver = build_resolver(config, chart, moves)?;
    Ok(resolver.resolve(&a, &b)?)
}

pub fn run(opts: CliOptions) -> anyhow::Result<()> {
    let mut config = match &opts.config_path {
        Some(path) => load_config(path)?,
        None => BattleConfig::default(),
    };
    opts.overrides.apply(&mut config);

    if let Some((a, b)) = &opts.duel {
        let moves = match &opts.paths.moves {
            Some(path) => load_json(path)?,
            None => MoveBook::default(),
        };
        let chart = match &opts.paths.chart {
            Some(path) => load_json(path)?,
            None => TypeChart::standard(),
        };
        let outcome = run_duel(a, b, &config, Arc::new(chart), &moves)?;
        for line in &outcome.log {
            println!("{line}");
        }
        return Ok(());
    }

    let dataset = load_dataset(&opts.paths)?;
    let rosters = dataset.rosters(&config)?;
    let resolver = dataset.resolver(&config)?;
    let mut manager = TeamBattleManager::new(rosters, resolver)?;
    let result = play_match(&mut manager)?;
    for line in manager.log_lines() {
        println!("{line}");
    }
    for side in [Side::A, Side::B] {
        let team = manager.team(side);
        println!("{}: {}", team.trainer(), team.status_lines().join(", "));
    }
    tracing::info!(result = ?result, strategy = ?config.strategy, "Match finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::TieBreak;

    #[test]
    fn duel_entry_parses_optional_types() {
        let entry: DuelEntry = "Starmie:30:water-gun:water/psychic".parse().unwrap();
        assert_eq!(
            entry,
            DuelEntry {
                name: "Starmie".to_string(),
                level: 30,
                move_id: "water-gun".to_string(),
                types: vec!["water".to_string(), "psychic".to_string()],
            }
        );
        let untyped: DuelEntry = "Ditto:10:transform".parse().unwrap();
        assert!(untyped.types.is_empty());
    }

    #[test]
    fn duel_entry_rejects_bad_input() {
        assert!("Pikachu:10".parse::<DuelEntry>().is_err());
        assert!("Pikachu:ten:thunderbolt".parse::<DuelEntry>().is_err());
        assert!("Pikachu:10:thunderbolt:electric:extra".parse::<DuelEntry>().is_err());
        let zero = "Pikachu:0:thunderbolt".parse::<DuelEntry>().unwrap();
        assert!(zero.combatant(100).is_err());
    }

    #[test]
    fn overrides_replace_only_what_was_given() {
        let mut config = BattleConfig {
            runs: 7,
            verbose: true,
            ..BattleConfig::default()
        };
        ConfigOverrides {
            strategy: Some(Strategy::Single),
            seed: Some(42),
            tie_break: Some(TieBreak::Draw),
            ..ConfigOverrides::default()
        }
        .apply(&mut config);
        assert_eq!(config.strategy, Strategy::Single);
        assert_eq!(config.seed, 42);
        assert_eq!(config.tie_break, TieBreak::Draw);
        assert_eq!(config.runs, 7);
        assert!(config.verbose);
    }

    #[test]
    fn duel_follows_the_configured_strategy() {
        let a: DuelEntry = "Charmander:10:ember:fire".parse().unwrap();
        let b: DuelEntry = "Bulbasaur:10:vine-whip:grass".parse().unwrap();
        let chart = Arc::new(TypeChart::standard());

        let scored = run_duel(&a, &b, &BattleConfig::default(), chart.clone(), &MoveBook::default()).unwrap();
        assert_eq!(scored.winning_side(), Some(Side::A));

        let single = BattleConfig {
            strategy: Strategy::Single,
            verbose: true,
            ..BattleConfig::default()
        };
        let outcome = run_duel(&a, &b, &single, chart, &MoveBook::default()).unwrap();
        assert!(outcome.log.iter().any(|l| l == "--- Battle Start ---"));
    }
}
