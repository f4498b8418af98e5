use pokemon_team_battle::battle::{compute_damage, BattleSimulator, DuelSimulator};
use pokemon_team_battle::model::{Combatant, MoveBook, MoveData};
use pokemon_team_battle::outcome::Side;
use pokemon_team_battle::types::TypeChart;
use pokemon_team_battle::BattleError;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::sync::Arc;

fn make_move(move_type: &str, power: u32, accuracy: f32) -> MoveData {
    MoveData {
        move_type: move_type.to_string(),
        power,
        accuracy,
    }
}

fn make_mon(name: &str, level: u32, hp: u32, types: &[&str], move_id: &str) -> Combatant {
    Combatant::new(name, level, hp)
        .unwrap()
        .with_types(types.iter().copied())
        .with_move(move_id)
}

fn simulator() -> DuelSimulator {
    let mut moves = MoveBook::default();
    moves.insert("ember", make_move("fire", 40, 100.0));
    moves.insert("thundershock", make_move("electric", 40, 100.0));
    moves.insert("lick", make_move("ghost", 30, 100.0));
    moves.insert("zap-cannon", make_move("electric", 120, 50.0));
    DuelSimulator::new(Arc::new(TypeChart::standard()), moves)
}

#[test]
fn same_seed_same_battle() {
    let sim = simulator().verbose(true);
    let a = make_mon("Charmander", 20, 300, &["fire"], "ember");
    let b = make_mon("Pikachu", 20, 300, &["electric"], "thundershock");
    let first = sim.simulate(&a, &b, 9).unwrap();
    let second = sim.simulate(&a, &b, 9).unwrap();
    assert_eq!(first, second);
    assert!(first.winner().is_some());
    assert_eq!(first.log[2], "--- Battle Start ---");
    assert_eq!(first.log[3], "Turn 0: Charmander HP: 300, Pikachu HP: 300");
    assert!(first.log.last().unwrap().starts_with("Final: Charmander HP: "));
}

#[test]
fn quiet_simulator_keeps_no_log() {
    let sim = simulator();
    let a = make_mon("Charmander", 20, 300, &["fire"], "ember");
    let b = make_mon("Pikachu", 20, 300, &["electric"], "thundershock");
    let battle = sim.simulate(&a, &b, 9).unwrap();
    assert!(battle.turns > 0);
    assert!(battle.log.is_empty());
}

#[test]
fn one_side_always_ends_at_zero() {
    let sim = simulator();
    let a = make_mon("Charmander", 25, 200, &["fire"], "ember");
    let b = make_mon("Bulbasaur", 25, 200, &["grass"], "ember");
    for seed in 0..20 {
        let battle = sim.simulate(&a, &b, seed).unwrap();
        assert_eq!(battle.winner(), Some(Side::A));
        assert_eq!(battle.hp(Side::B), 0);
        assert!(battle.hp(Side::A) <= 200);
    }
}

#[test]
fn starts_from_current_hp() {
    let sim = simulator();
    let a = make_mon("Charmander", 25, 200, &["fire"], "ember").with_hp(1);
    let b = make_mon("Bulbasaur", 25, 200, &["grass"], "ember");
    let battle = sim.simulate(&a, &b, 4).unwrap();
    assert!(battle.hp(Side::A) <= 1);
}

#[test]
fn mutual_immunity_stalls_into_draw() {
    let sim = simulator();
    let a = make_mon("Rattata", 30, 100, &["normal"], "tackle");
    let b = make_mon("Gastly", 30, 100, &["ghost"], "lick");
    let battle = sim.simulate(&a, &b, 1).unwrap();
    assert_eq!(battle.turns, 500);
    assert_eq!(battle.winner(), None);
    assert!(battle.into_outcome(&a, &b).is_draw());
}

#[test]
fn strict_simulator_rejects_unknown_moves() {
    let sim = simulator().strict();
    let a = make_mon("Pikachu", 30, 100, &["electric"], "surf");
    let b = make_mon("Diglett", 30, 100, &["ground"], "ember");
    assert!(matches!(
        sim.simulate(&a, &b, 1),
        Err(BattleError::UnknownMove(id)) if id == "surf"
    ));
}

#[test]
fn fainted_combatants_cannot_start() {
    let sim = simulator();
    let a = make_mon("Pikachu", 30, 100, &["electric"], "thundershock").with_hp(0);
    let b = make_mon("Diglett", 30, 100, &["ground"], "ember");
    assert!(matches!(sim.simulate(&a, &b, 1), Err(BattleError::Fainted { .. })));
}

#[test]
fn inaccurate_moves_sometimes_miss() {
    let sim = simulator().verbose(true);
    let a = make_mon("Magnemite", 30, 1000, &["electric"], "zap-cannon");
    let b = make_mon("Psyduck", 30, 1000, &["water"], "ember");
    let battle = sim.simulate(&a, &b, 17).unwrap();
    assert!(battle.log.iter().any(|l| l == "Magnemite's zap-cannon missed!"));
}

#[test]
fn stab_and_type_effectiveness_affect_damage() {
    let chart = TypeChart::standard();
    let ember = make_move("fire", 40, 100.0);
    let tackle = make_move("normal", 40, 100.0);
    let attacker = make_mon("Charmander", 20, 100, &["fire"], "ember");
    let grass = make_mon("Bulbasaur", 20, 100, &["grass"], "tackle");
    let water = make_mon("Squirtle", 20, 100, &["water"], "tackle");
    let roll = |defender: &Combatant, move_data: &MoveData| {
        compute_damage(&attacker, defender, move_data, &chart, &mut SmallRng::seed_from_u64(3))
    };
    let vs_grass = roll(&grass, &ember);
    let vs_water = roll(&water, &ember);
    let neutral = roll(&grass, &tackle);
    assert!(vs_grass > vs_water);
    assert!(vs_grass > neutral);
}
