use serde::Deserialize;
use std::collections::HashMap;

// Standard 18-type chart, non-neutral pairs only. Key is "attacking>defending".
static STANDARD_CHART: phf::Map<&'static str, f32> = phf::phf_map! {
    "normal>rock" => 0.5, "normal>steel" => 0.5, "normal>ghost" => 0.0,
    "fire>fire" => 0.5, "fire>water" => 0.5, "fire>rock" => 0.5, "fire>dragon" => 0.5,
    "fire>grass" => 2.0, "fire>ice" => 2.0, "fire>bug" => 2.0, "fire>steel" => 2.0,
    "water>water" => 0.5, "water>grass" => 0.5, "water>dragon" => 0.5,
    "water>fire" => 2.0, "water>ground" => 2.0, "water>rock" => 2.0,
    "electric>electric" => 0.5, "electric>grass" => 0.5, "electric>dragon" => 0.5,
    "electric>water" => 2.0, "electric>flying" => 2.0, "electric>ground" => 0.0,
    "grass>fire" => 0.5, "grass>grass" => 0.5, "grass>poison" => 0.5, "grass>flying" => 0.5,
    "grass>bug" => 0.5, "grass>dragon" => 0.5, "grass>steel" => 0.5,
    "grass>water" => 2.0, "grass>ground" => 2.0, "grass>rock" => 2.0,
    "ice>fire" => 0.5, "ice>water" => 0.5, "ice>ice" => 0.5, "ice>steel" => 0.5,
    "ice>grass" => 2.0, "ice>ground" => 2.0, "ice>flying" => 2.0, "ice>dragon" => 2.0,
    "fighting>normal" => 2.0, "fighting>ice" => 2.0, "fighting>rock" => 2.0,
    "fighting>dark" => 2.0, "fighting>steel" => 2.0,
    "fighting>poison" => 0.5, "fighting>flying" => 0.5, "fighting>psychic" => 0.5,
    "fighting>bug" => 0.5, "fighting>fairy" => 0.5, "fighting>ghost" => 0.0,
    "poison>grass" => 2.0, "poison>fairy" => 2.0,
    "poison>poison" => 0.5, "poison>ground" => 0.5, "poison>rock" => 0.5, "poison>ghost" => 0.5,
    "poison>steel" => 0.0,
    "ground>fire" => 2.0, "ground>electric" => 2.0, "ground>poison" => 2.0,
    "ground>rock" => 2.0, "ground>steel" => 2.0,
    "ground>grass" => 0.5, "ground>bug" => 0.5, "ground>flying" => 0.0,
    "flying>grass" => 2.0, "flying>fighting" => 2.0, "flying>bug" => 2.0,
    "flying>electric" => 0.5, "flying>rock" => 0.5, "flying>steel" => 0.5,
    "psychic>fighting" => 2.0, "psychic>poison" => 2.0,
    "psychic>psychic" => 0.5, "psychic>steel" => 0.5, "psychic>dark" => 0.0,
    "bug>grass" => 2.0, "bug>psychic" => 2.0, "bug>dark" => 2.0,
    "bug>fire" => 0.5, "bug>fighting" => 0.5, "bug>poison" => 0.5, "bug>flying" => 0.5,
    "bug>ghost" => 0.5, "bug>steel" => 0.5, "bug>fairy" => 0.5,
    "rock>fire" => 2.0, "rock>ice" => 2.0, "rock>flying" => 2.0, "rock>bug" => 2.0,
    "rock>fighting" => 0.5, "rock>ground" => 0.5, "rock>steel" => 0.5,
    "ghost>ghost" => 2.0, "ghost>psychic" => 2.0, "ghost>dark" => 0.5, "ghost>normal" => 0.0,
    "dragon>dragon" => 2.0, "dragon>steel" => 0.5, "dragon>fairy" => 0.0,
    "dark>psychic" => 2.0, "dark>ghost" => 2.0,
    "dark>fighting" => 0.5, "dark>dark" => 0.5, "dark>fairy" => 0.5,
    "steel>rock" => 2.0, "steel>ice" => 2.0, "steel>fairy" => 2.0,
    "steel>fire" => 0.5, "steel>water" => 0.5, "steel>electric" => 0.5, "steel>steel" => 0.5,
    "fairy>fighting" => 2.0, "fairy>dragon" => 2.0, "fairy>dark" => 2.0,
    "fairy>fire" => 0.5, "fairy>poison" => 0.5, "fairy>steel" => 0.5,
};

/// Attacking/defending type multipliers. Unlisted pairs are neutral (1.0).
///
/// Deserialises from a nested JSON object: `{"fire": {"grass": 2.0}}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "HashMap<String, HashMap<String, f32>>")]
pub struct TypeChart {
    entries: HashMap<(String, String), f32>,
}

impl TypeChart {
    pub fn standard() -> Self {
        let entries = STANDARD_CHART
            .entries()
            .filter_map(|(key, value)| {
                let (atk, def) = key.split_once('>')?;
                Some(((atk.to_string(), def.to_string()), *value))
            })
            .collect();
        TypeChart { entries }
    }

    pub fn from_entries<I, A, D>(entries: I) -> Self
    where
        I: IntoIterator<Item = (A, D, f32)>,
        A: AsRef<str>,
        D: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|(atk, def, value)| {
                (
                    (
                        atk.as_ref().to_ascii_lowercase(),
                        def.as_ref().to_ascii_lowercase(),
                    ),
                    value,
                )
            })
            .collect();
        TypeChart { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Chart lookup for a single pair, case-insensitive.
    pub fn lookup(&self, attacking: &str, defending: &str) -> f32 {
        let key = (
            attacking.to_ascii_lowercase(),
            defending.to_ascii_lowercase(),
        );
        self.entries.get(&key).copied().unwrap_or(1.0)
    }

    /// Product of the lookups of one attacking type against every defending type.
    pub fn effectiveness(&self, attacking: &str, defending: &[String]) -> f32 {
        defending
            .iter()
            .map(|def| self.lookup(attacking, def))
            .product()
    }

    /// Best same-turn multiplier any of the attacker's types achieves against
    /// the defender. 1.0 when either side is typeless.
    pub fn best_multiplier(&self, attacking: &[String], defending: &[String]) -> f32 {
        if attacking.is_empty() || defending.is_empty() {
            return 1.0;
        }
        attacking
            .iter()
            .map(|atk| self.effectiveness(atk, defending))
            .fold(f32::NEG_INFINITY, f32::max)
    }
}

impl From<HashMap<String, HashMap<String, f32>>> for TypeChart {
    fn from(raw: HashMap<String, HashMap<String, f32>>) -> Self {
        TypeChart::from_entries(raw.into_iter().flat_map(|(atk, row)| {
            row.into_iter().map(move |(def, value)| (atk.clone(), def, value))
        }))
    }
}
