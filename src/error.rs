use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Expected at least two teams, found {0}")]
    NotEnoughTeams(usize),

    #[error("Team {trainer} has no Pokemon with level > 0")]
    NoEligibleCombatant { trainer: String },

    #[error("No stage {stage} registered for {species}")]
    UnknownStage { species: String, stage: u32 },

    #[error("Invalid combatant {name}: {reason}")]
    InvalidCombatant { name: String, reason: String },

    #[error("Aggregator needs at least one run")]
    ZeroRuns,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("No member at index {index} (roster has {len})")]
    OutOfRange { index: usize, len: usize },

    #[error("{name} has fainted and cannot be sent in")]
    Fainted { name: String },

    #[error("{name} is already active")]
    AlreadyActive { name: String },

    #[error("{trainer} has no active Pokemon")]
    NoActive { trainer: String },

    #[error("Outcome names {found} but the active Pokemon is {active}")]
    OutcomeMismatch { active: String, found: String },
}

#[derive(Error, Debug)]
pub enum BattleError {
    #[error("{name} has fainted and cannot battle")]
    Fainted { name: String },

    #[error("Unknown move {0}")]
    UnknownMove(String),

    #[error("Simulator failed: {0}")]
    Simulator(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Roster(#[from] RosterError),
}
