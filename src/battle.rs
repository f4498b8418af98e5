use crate::error::BattleError;
use crate::model::{Combatant, MoveBook, MoveData};
use crate::outcome::{BattleOutcome, Side, Survivor};
use crate::types::TypeChart;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

const TURN_LIMIT: usize = 500;

/// Resolves one full battle between two combatants to a terminal state.
///
/// Implementations must be deterministic for a given `seed`; the aggregator
/// relies on that for reproducible results.
pub trait BattleSimulator: Send + Sync {
    fn simulate(&self, a: &Combatant, b: &Combatant, seed: u64) -> Result<SingleBattle, BattleError>;
}

/// Terminal state of one simulated battle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleBattle {
    pub a_hp: u32,
    pub b_hp: u32,
    pub turns: usize,
    pub log: Vec<String>,
}

impl SingleBattle {
    /// Winning side, or `None` for a double knockout or a stalemate.
    pub fn winner(&self) -> Option<Side> {
        match (self.a_hp > 0, self.b_hp > 0) {
            (true, false) => Some(Side::A),
            (false, true) => Some(Side::B),
            _ => None,
        }
    }

    pub fn hp(&self, side: Side) -> u32 {
        match side {
            Side::A => self.a_hp,
            Side::B => self.b_hp,
        }
    }

    pub fn into_outcome(self, a: &Combatant, b: &Combatant) -> BattleOutcome {
        let outcome = match self.winner() {
            Some(Side::A) => BattleOutcome::win(Side::A, Survivor::new(&a.name, self.a_hp), &b.name),
            Some(Side::B) => BattleOutcome::win(Side::B, Survivor::new(&b.name, self.b_hp), &a.name),
            None => BattleOutcome::draw(&a.name, &b.name),
        };
        outcome.with_log(self.log)
    }
}

#[derive(Clone)]
struct Battler<'a> {
    combatant: &'a Combatant,
    move_data: MoveData,
    current_hp: u32,
}

impl Battler<'_> {
    fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }
}

/// Reference simulator: both sides use their single move every turn until
/// one faints or the turn limit is reached.
#[derive(Debug, Clone)]
pub struct DuelSimulator {
    chart: Arc<TypeChart>,
    moves: MoveBook,
    fallback: Option<MoveData>,
    verbose: bool,
}

impl DuelSimulator {
    /// Moves missing from the book fall back to a 40-power normal move.
    pub fn new(chart: Arc<TypeChart>, moves: MoveBook) -> Self {
        DuelSimulator {
            chart,
            moves,
            fallback: Some(MoveData::default()),
            verbose: false,
        }
    }

    /// Fail with [`BattleError::UnknownMove`] instead of falling back.
    pub fn strict(mut self) -> Self {
        self.fallback = None;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn move_for(&self, combatant: &Combatant) -> Result<MoveData, BattleError> {
        self.moves
            .get(&combatant.move_id)
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or_else(|| BattleError::UnknownMove(combatant.move_id.clone()))
    }

    fn battler<'a>(&self, combatant: &'a Combatant) -> Result<Battler<'a>, BattleError> {
        if combatant.is_fainted() {
            return Err(BattleError::Fainted {
                name: combatant.name.clone(),
            });
        }
        Ok(Battler {
            combatant,
            move_data: self.move_for(combatant)?,
            current_hp: combatant.current_hp(),
        })
    }
}

impl BattleSimulator for DuelSimulator {
    fn simulate(&self, a: &Combatant, b: &Combatant, seed: u64) -> Result<SingleBattle, BattleError> {
        let mut duel = Duel {
            a: self.battler(a)?,
            b: self.battler(b)?,
            chart: &self.chart,
            rng: SmallRng::seed_from_u64(seed),
            log: Vec::new(),
            verbose: self.verbose,
        };
        duel.note(|| format!("{} (Lv {}) HP: {}", a.name, a.level(), a.max_hp()));
        duel.note(|| format!("{} (Lv {}) HP: {}", b.name, b.level(), b.max_hp()));
        duel.note(|| "--- Battle Start ---".to_string());
        duel.note_hp(0);

        let mut turns = 0;
        while turns < TURN_LIMIT && !duel.a.is_fainted() && !duel.b.is_fainted() {
            turns += 1;
            duel.run_turn();
            duel.note_hp(turns);
        }

        duel.note(|| "--- Battle End ---".to_string());
        let (a_hp, b_hp) = (duel.a.current_hp, duel.b.current_hp);
        duel.note(|| format!("Final: {} HP: {a_hp}, {} HP: {b_hp}", a.name, b.name));
        Ok(SingleBattle {
            a_hp,
            b_hp,
            turns,
            log: duel.log,
        })
    }
}

struct Duel<'a> {
    a: Battler<'a>,
    b: Battler<'a>,
    chart: &'a TypeChart,
    rng: SmallRng,
    log: Vec<String>,
    verbose: bool,
}

impl<'a> Duel<'a> {
    fn note(&mut self, line: impl FnOnce() -> String) {
        if self.verbose {
            self.log.push(line());
        }
    }

    fn note_hp(&mut self, turn: usize) {
        if !self.verbose {
            return;
        }
        let (a, b) = (&self.a, &self.b);
        let line = format!(
            "Turn {turn}: {} HP: {}, {} HP: {}",
            a.combatant.name, a.current_hp, b.combatant.name, b.current_hp
        );
        self.log.push(line);
    }

    fn battler(&self, side: Side) -> &Battler<'a> {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }

    fn battler_mut(&mut self, side: Side) -> &mut Battler<'a> {
        match side {
            Side::A => &mut self.a,
            Side::B => &mut self.b,
        }
    }

    /// Higher level moves first; equal levels are ordered by a coin flip.
    fn turn_order(&mut self) -> [Side; 2] {
        let (la, lb) = (self.a.combatant.level(), self.b.combatant.level());
        let a_first = la > lb || (la == lb && self.rng.gen_bool(0.5));
        if a_first {
            [Side::A, Side::B]
        } else {
            [Side::B, Side::A]
        }
    }

    fn run_turn(&mut self) {
        for side in self.turn_order() {
            if self.battler(side).is_fainted() || self.battler(side.opponent()).is_fainted() {
                return;
            }
            self.execute_move(side);
        }
    }

    fn execute_move(&mut self, side: Side) {
        let attacker = self.battler(side).clone();
        let defender = self.battler(side.opponent()).combatant;
        let name = attacker.combatant.name.clone();
        let move_name = attacker.combatant.move_id.clone();
        if !roll_accuracy(&attacker.move_data, &mut self.rng) {
            self.note(|| format!("{name}'s {move_name} missed!"));
            return;
        }
        let damage = compute_damage(
            attacker.combatant,
            defender,
            &attacker.move_data,
            self.chart,
            &mut self.rng,
        );
        let target = self.battler_mut(side.opponent());
        target.current_hp = target.current_hp.saturating_sub(damage);
        let target_name = target.combatant.name.clone();
        self.note(|| format!("{name} used {move_name}! {target_name} took {damage} damage."));
    }
}

fn roll_accuracy(move_data: &MoveData, rng: &mut SmallRng) -> bool {
    if move_data.accuracy >= 100.0 {
        return true;
    }
    rng.gen_range(0.0..100.0) < move_data.accuracy
}

/// Level-scaled damage with STAB, type multiplier and an 85-100% roll.
/// Stage stands in for the attack/defense ratio.
pub fn compute_damage(
    attacker: &Combatant,
    defender: &Combatant,
    move_data: &MoveData,
    chart: &TypeChart,
    rng: &mut SmallRng,
) -> u32 {
    if move_data.power == 0 {
        return 0;
    }
    let type_mod = chart.effectiveness(&move_data.move_type, &defender.types);
    if type_mod == 0.0 {
        return 0;
    }
    let level = attacker.level() as f32;
    let ratio = (attacker.stage() as f32 + 1.0) / (defender.stage() as f32 + 1.0);
    let mut base = ((2.0 * level / 5.0 + 2.0) * move_data.power as f32 * ratio) / 50.0 + 2.0;
    let stab = if attacker
        .types
        .iter()
        .any(|t| t.eq_ignore_ascii_case(&move_data.move_type))
    {
        1.5
    } else {
        1.0
    };
    let rand_mod = rng.gen_range(85..=100) as f32 / 100.0;
    base *= stab * type_mod * rand_mod;
    base.floor().max(1.0) as u32
}
