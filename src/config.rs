use crate::aggregate::{Aggregator, MajorityTie};
use crate::battle::DuelSimulator;
use crate::error::ConfigError;
use crate::manager::Resolver;
use crate::model::{build_combatant, MoveBook, StagesFile, TeamConfig};
use crate::roster::Roster;
use crate::scorer::{ScoreWeights, Scorer, TieBreak};
use crate::types::TypeChart;
use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Deterministic,
    Stochastic,
    Single,
}

impl std::str::FromStr for Strategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "deterministic" | "score" => Ok(Strategy::Deterministic),
            "stochastic" | "aggregate" => Ok(Strategy::Stochastic),
            "single" => Ok(Strategy::Single),
            other => anyhow::bail!("Unknown strategy {other} (use deterministic, stochastic or single)"),
        }
    }
}

/// Everything a match needs besides the data files. Passed explicitly;
/// nothing reads process-wide state.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    pub strategy: Strategy,
    /// Simulator runs per pairing for the stochastic strategy.
    pub runs: usize,
    pub seed: u64,
    pub tie_break: TieBreak,
    pub majority_tie: MajorityTie,
    pub weights: ScoreWeights,
    pub base_hp: u32,
    pub hp_boost: u32,
    pub verbose: bool,
}

impl Default for BattleConfig {
    fn default() -> Self {
        BattleConfig {
            strategy: Strategy::default(),
            runs: 100,
            seed: 0,
            tie_break: TieBreak::default(),
            majority_tie: MajorityTie::default(),
            weights: ScoreWeights::default(),
            base_hp: 100,
            hp_boost: 10,
            verbose: false,
        }
    }
}

impl BattleConfig {
    pub fn max_hp(&self) -> u32 {
        self.base_hp.saturating_mul(self.hp_boost)
    }
}

/// Static data loaded once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct DataSet {
    pub teams: Vec<TeamConfig>,
    pub stages: StagesFile,
    pub moves: MoveBook,
    pub chart: Arc<TypeChart>,
}

#[derive(Debug, Clone)]
pub struct DataPaths {
    pub teams: PathBuf,
    pub stages: PathBuf,
    pub moves: Option<PathBuf>,
    pub chart: Option<PathBuf>,
}

impl Default for DataPaths {
    fn default() -> Self {
        DataPaths {
            teams: PathBuf::from("teams_config.json"),
            stages: PathBuf::from("pokemon_stages.json"),
            moves: None,
            chart: None,
        }
    }
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse JSON from {}", path.display()))
}

pub fn load_config(path: &Path) -> anyhow::Result<BattleConfig> {
    load_json(path)
}

pub fn load_dataset(paths: &DataPaths) -> anyhow::Result<DataSet> {
    let teams: Vec<TeamConfig> = load_json(&paths.teams)?;
    let stages: StagesFile = load_json(&paths.stages)?;
    let moves = match &paths.moves {
        Some(path) => load_json(path)?,
        None => MoveBook::default(),
    };
    let chart = match &paths.chart {
        Some(path) => load_json(path)?,
        None => TypeChart::standard(),
    };
    tracing::info!(
        teams = teams.len(),
        species = stages.0.len(),
        chart_entries = chart.len(),
        "Loaded battle data"
    );
    Ok(DataSet {
        teams,
        stages,
        moves,
        chart: Arc::new(chart),
    })
}

impl DataSet {
    pub fn rosters(&self, config: &BattleConfig) -> Result<Vec<Roster>, ConfigError> {
        self.teams
            .iter()
            .map(|team| {
                let mut members = Vec::new();
                for entry in &team.pokemon {
                    if let Some(mon) = build_combatant(entry, &self.stages, config.max_hp())? {
                        members.push(mon);
                    }
                }
                Ok(Roster::new(team.trainer.clone(), members))
            })
            .collect()
    }

    pub fn resolver(&self, config: &BattleConfig) -> Result<Resolver, ConfigError> {
        build_resolver(config, self.chart.clone(), &self.moves)
    }
}

/// Maps `config.strategy` onto a [`Resolver`] over the given chart and moves.
pub fn build_resolver(
    config: &BattleConfig,
    chart: Arc<TypeChart>,
    moves: &MoveBook,
) -> Result<Resolver, ConfigError> {
    let simulator = || DuelSimulator::new(chart.clone(), moves.clone()).verbose(config.verbose);
    let resolver = match config.strategy {
        Strategy::Deterministic => Resolver::Deterministic(Scorer::new(
            chart.clone(),
            config.weights,
            config.tie_break,
            config.seed,
        )),
        Strategy::Stochastic => {
            if config.runs == 0 {
                return Err(ConfigError::ZeroRuns);
            }
            Resolver::Stochastic {
                aggregator: Aggregator::new(config.runs, config.seed).with_tie_rule(config.majority_tie),
                simulator: Box::new(simulator()),
            }
        }
        Strategy::Single => Resolver::single(Box::new(simulator()), config.seed),
    };
    Ok(resolver)
}
