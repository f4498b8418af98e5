use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
    Genderless,
}

/// Battle-relevant snapshot of one Pokémon.
///
/// Level, stage and HP are private so they stay positive and
/// `current_hp <= max_hp` always holds; use [`Combatant::set_hp`].
#[derive(Debug, Clone, PartialEq)]
pub struct Combatant {
    pub name: String,
    pub types: Vec<String>,
    pub move_id: String,
    pub gender: Gender,
    pub img: Option<PathBuf>,
    level: u32,
    stage: u32,
    current_hp: u32,
    max_hp: u32,
}

impl Combatant {
    /// Starts at full HP with stage 1, no types and no move.
    pub fn new(name: impl Into<String>, level: u32, max_hp: u32) -> Result<Self, ConfigError> {
        let name = name.into();
        if level == 0 {
            return Err(ConfigError::InvalidCombatant {
                name,
                reason: "level must be positive".to_string(),
            });
        }
        if max_hp == 0 {
            return Err(ConfigError::InvalidCombatant {
                name,
                reason: "max HP must be positive".to_string(),
            });
        }
        Ok(Combatant {
            name,
            level,
            types: Vec::new(),
            stage: 1,
            move_id: String::new(),
            gender: Gender::default(),
            img: None,
            current_hp: max_hp,
            max_hp,
        })
    }

    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_stage(mut self, stage: u32) -> Result<Self, ConfigError> {
        if stage == 0 {
            return Err(ConfigError::InvalidCombatant {
                name: self.name,
                reason: "stage must be positive".to_string(),
            });
        }
        self.stage = stage;
        Ok(self)
    }

    pub fn with_move(mut self, move_id: impl Into<String>) -> Self {
        self.move_id = move_id.into();
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_hp(mut self, hp: u32) -> Self {
        self.set_hp(hp);
        self
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn stage(&self) -> u32 {
        self.stage
    }

    pub fn current_hp(&self) -> u32 {
        self.current_hp
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    /// Clamped to `max_hp`.
    pub fn set_hp(&mut self, hp: u32) {
        self.current_hp = hp.min(self.max_hp);
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    pub fn is_alive(&self) -> bool {
        !self.is_fainted()
    }
}

/// One slot of a trainer's team as written in the teams file.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamEntry {
    pub name: String,
    pub stage: u32,
    #[serde(default)]
    pub level: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamConfig {
    pub trainer: String,
    pub pokemon: Vec<TeamEntry>,
}

/// Per-stage metadata of an evolution line.
#[derive(Debug, Clone, Deserialize)]
pub struct StageInfo {
    pub name: String,
    #[serde(rename = "move")]
    pub move_id: String,
    #[serde(default)]
    pub img: Option<PathBuf>,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub types: Vec<String>,
}

/// Evolution line -> stage number (as a string key) -> stage info.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct StagesFile(pub HashMap<String, HashMap<String, StageInfo>>);

impl StagesFile {
    pub fn stage(&self, species: &str, stage: u32) -> Option<&StageInfo> {
        self.0.get(species)?.get(&stage.to_string())
    }
}

fn default_power() -> u32 {
    40
}

fn default_accuracy() -> f32 {
    100.0
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MoveData {
    #[serde(rename = "type")]
    pub move_type: String,
    #[serde(default = "default_power")]
    pub power: u32,
    #[serde(default = "default_accuracy")]
    pub accuracy: f32,
}

impl Default for MoveData {
    fn default() -> Self {
        MoveData {
            move_type: "normal".to_string(),
            power: default_power(),
            accuracy: default_accuracy(),
        }
    }
}

/// Move id -> move data. Lookups are case-insensitive.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "HashMap<String, MoveData>")]
pub struct MoveBook(HashMap<String, MoveData>);

impl MoveBook {
    pub fn get(&self, move_id: &str) -> Option<&MoveData> {
        self.0.get(&move_id.to_ascii_lowercase())
    }

    pub fn insert(&mut self, move_id: &str, data: MoveData) {
        self.0.insert(move_id.to_ascii_lowercase(), data);
    }
}

impl From<HashMap<String, MoveData>> for MoveBook {
    fn from(raw: HashMap<String, MoveData>) -> Self {
        MoveBook(
            raw.into_iter()
                .map(|(id, data)| (id.to_ascii_lowercase(), data))
                .collect(),
        )
    }
}

/// Resolves a team slot against the stage table. `Ok(None)` for empty
/// (level 0) slots.
pub fn build_combatant(
    entry: &TeamEntry,
    stages: &StagesFile,
    max_hp: u32,
) -> Result<Option<Combatant>, ConfigError> {
    if entry.level == 0 {
        return Ok(None);
    }
    let info = stages
        .stage(&entry.name, entry.stage)
        .ok_or_else(|| ConfigError::UnknownStage {
            species: entry.name.clone(),
            stage: entry.stage,
        })?;
    let mut combatant = Combatant::new(info.name.clone(), entry.level, max_hp)?
        .with_types(info.types.iter().cloned())
        .with_stage(entry.stage)?
        .with_move(info.move_id.clone())
        .with_gender(info.gender);
    combatant.img = info.img.clone();
    Ok(Some(combatant))
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAGES: &str = r#"{
        "charmander": {
            "1": {"name": "Charmander", "move": "ember", "img": "img/4.png", "types": ["fire"]},
            "3": {"name": "Charizard", "move": "flamethrower", "gender": "female", "types": ["fire", "flying"]}
        }
    }"#;

    #[test]
    fn hp_is_clamped_to_max() {
        let mut mon = Combatant::new("Pikachu", 10, 100).unwrap().with_hp(250);
        assert_eq!(mon.current_hp(), 100);
        mon.set_hp(0);
        assert!(mon.is_fainted());
        assert!(!mon.is_alive());
    }

    #[test]
    fn rejects_zero_level_and_zero_hp() {
        assert!(matches!(
            Combatant::new("Ghost", 0, 100),
            Err(ConfigError::InvalidCombatant { .. })
        ));
        assert!(matches!(
            Combatant::new("Ghost", 5, 0),
            Err(ConfigError::InvalidCombatant { .. })
        ));
    }

    #[test]
    fn rejects_zero_stage() {
        let mon = Combatant::new("Pichu", 5, 100).unwrap();
        assert_eq!(mon.stage(), 1);
        assert_eq!(
            mon.with_stage(0),
            Err(ConfigError::InvalidCombatant {
                name: "Pichu".to_string(),
                reason: "stage must be positive".to_string(),
            })
        );
    }

    #[test]
    fn builds_combatant_from_stage_table() {
        let stages: StagesFile = serde_json::from_str(STAGES).unwrap();
        let entry = TeamEntry {
            name: "charmander".to_string(),
            stage: 3,
            level: 36,
        };
        let mon = build_combatant(&entry, &stages, 1000).unwrap().unwrap();
        assert_eq!(mon.name, "Charizard");
        assert_eq!(mon.move_id, "flamethrower");
        assert_eq!(mon.gender, Gender::Female);
        assert_eq!(mon.types, vec!["fire".to_string(), "flying".to_string()]);
        assert_eq!(mon.stage(), 3);
        assert_eq!(mon.current_hp(), 1000);
    }

    #[test]
    fn empty_slots_and_unknown_stages() {
        let stages: StagesFile = serde_json::from_str(STAGES).unwrap();
        let empty = TeamEntry {
            name: "charmander".to_string(),
            stage: 2,
            level: 0,
        };
        assert!(build_combatant(&empty, &stages, 1000).unwrap().is_none());

        let missing = TeamEntry {
            level: 20,
            ..empty
        };
        assert_eq!(
            build_combatant(&missing, &stages, 1000),
            Err(ConfigError::UnknownStage {
                species: "charmander".to_string(),
                stage: 2,
            })
        );
    }

    #[test]
    fn move_book_defaults_and_case() {
        let book: MoveBook =
            serde_json::from_str(r#"{"Thunderbolt": {"type": "electric", "power": 90}}"#).unwrap();
        let bolt = book.get("thunderbolt").unwrap();
        assert_eq!(bolt.move_type, "electric");
        assert_eq!(bolt.power, 90);
        assert_eq!(bolt.accuracy, 100.0);
        assert!(book.get("surf").is_none());
    }
}
