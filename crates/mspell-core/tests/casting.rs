mod common;

use common::{Always, PLAYER, caster, duel};
use mspell_arena::Arena;
use mspell_core::GameRng;
use mspell_core::cast::{CastOutcome, StagedAi, cast_at_monster, cast_at_player};
use mspell_core::options::SpellOptions;
use mspell_core::race::{NamedRace, RaceFlags, RaceId};
use mspell_core::spell::id::{heal, special, tactic};
use mspell_core::spell::{Effect, SpellCategory, SpellId, SummonKind};
use mspell_core::world::{Actors, MonsterId};
use mspell_data::LoadMode;

const HEAL: SpellId = SpellId::new(SpellCategory::Heal, heal::SELF);
const BLINK: SpellId = SpellId::new(SpellCategory::Tactic, tactic::BLINK);
const SPECIAL: SpellId = SpellId::new(SpellCategory::Special, special::SPECIAL);
const BO_FIRE: SpellId = SpellId::projection(SpellCategory::Bolt, Effect::Fire);
const BA_FIRE: SpellId = SpellId::projection(SpellCategory::Ball, Effect::Fire);
const HAND_DOOM: SpellId = SpellId::projection(SpellCategory::Curse, Effect::HandDoom);

fn cast(arena: &mut Arena, mon: MonsterId, id: SpellId, seed: u64) -> CastOutcome {
    let mut rng = GameRng::new(seed);
    cast_at_player(arena, &mut rng, &SpellOptions::default(), mon, &Always(id))
}

/// Cast until the spell gets past the failure roll
fn cast_through(arena: &mut Arena, mon: MonsterId, id: SpellId) -> CastOutcome {
    for seed in 0..50 {
        let out = cast(arena, mon, id, seed);
        if out != CastOutcome::Failed {
            return out;
        }
    }
    CastOutcome::Failed
}

fn bestiary_arena() -> Arena {
    let races = mspell_data::load(LoadMode::Strict).unwrap().into_races();
    let mut arena = Arena::new(40, 21, races, 5);
    arena.player.pos = PLAYER;
    arena
}

#[test]
fn test_heal_restores_and_clears_fear() {
    let race = caster(0, "1_IN_1 | HEAL", 100, RaceFlags::MALE);
    let (mut arena, mon) = duel(race, 4);
    {
        let m = arena.monster_mut(mon).unwrap();
        m.hp = 1;
        m.timers.afraid = 10;
    }
    assert_eq!(cast(&mut arena, mon, HEAL, 1), CastOutcome::Cast(HEAL));
    let m = arena.monster(mon).unwrap();
    assert!(m.hp > 1);
    assert!(m.hp <= m.max_hp);
    assert_eq!(m.timers.afraid, 0);
    assert!(arena.messages().iter().any(|l| l.contains("his courage")));
}

#[test]
fn test_blink_moves_caster() {
    let race = caster(0, "1_IN_1 | BLINK", 100, RaceFlags::empty());
    let (mut arena, mon) = duel(race, 3);
    let before = arena.monster(mon).unwrap().pos;
    assert_eq!(cast(&mut arena, mon, BLINK, 2), CastOutcome::Cast(BLINK));
    let after = arena.monster(mon).unwrap().pos;
    assert_ne!(before, after);
    assert!(before.distance(after) <= mspell_core::BLINK_DISTANCE);
}

#[test]
fn test_no_magic_level_fails_spells() {
    let race = caster(0, "1_IN_1 | HEAL", 100, RaceFlags::empty());
    let (mut arena, mon) = duel(race, 4);
    arena.level.no_magic = true;
    assert_eq!(cast(&mut arena, mon, HEAL, 1), CastOutcome::Failed);
}

#[test]
fn test_innate_breath_ignores_barrier() {
    let race = caster(0, "1_IN_1 | BR_FIRE", 100, RaceFlags::empty());
    let (mut arena, mon) = duel(race, 4);
    arena.magic_barrier = true;
    let breath = SpellId::projection(SpellCategory::Breath, Effect::Fire);
    assert_eq!(cast(&mut arena, mon, breath, 1), CastOutcome::Cast(breath));
    assert!(arena.player.hp < 100);
}

#[test]
fn test_anti_magic_barrier_blocks() {
    let race = caster(0, "1_IN_1 | HEAL", 100, RaceFlags::empty());
    let (mut arena, mon) = duel(race, 4);
    arena.magic_barrier = true;
    assert_eq!(cast(&mut arena, mon, HEAL, 1), CastOutcome::Blocked);
    assert!(arena.messages()[0].starts_with("Your anti-magic barrier blocks"));
}

#[test]
fn test_confused_caster_declines() {
    let race = caster(0, "1_IN_1 | HEAL", 100, RaceFlags::empty());
    let (mut arena, mon) = duel(race, 4);
    arena.monster_mut(mon).unwrap().timers.confused = 3;
    assert_eq!(cast(&mut arena, mon, HEAL, 1), CastOutcome::Declined);
    assert!(!CastOutcome::Declined.took_turn());
}

#[test]
fn test_santa_calls_reindeer() {
    let mut arena = bestiary_arena();
    let santa = arena.race_by_name(NamedRace::SantaClaus).unwrap();
    let reindeer = arena.race_by_name(NamedRace::Reindeer).unwrap();
    let mon = arena.spawn(santa, PLAYER.offset(4, 0)).unwrap();

    let summon = SpellId::summon(SummonKind::Special);
    assert_eq!(cast_through(&mut arena, mon, summon), CastOutcome::Cast(summon));
    assert!(arena.race_count(reindeer) >= 1);
    assert!(arena.messages().iter().any(|l| l.contains("Now Dasher!")));
}

#[test]
fn test_banor_rupart_splits_hp() {
    let mut arena = bestiary_arena();
    let whole = arena.race_by_name(NamedRace::BanorRupart).unwrap();
    let banor = arena.race_by_name(NamedRace::Banor).unwrap();
    let lupart = arena.race_by_name(NamedRace::Lupart).unwrap();
    let mon = arena.spawn(whole, PLAYER.offset(4, 0)).unwrap();
    {
        let m = arena.monster_mut(mon).unwrap();
        m.hp = 101;
        m.max_hp = 201;
    }

    assert_eq!(cast_through(&mut arena, mon, SPECIAL), CastOutcome::Cast(SPECIAL));
    assert_eq!(arena.race_count(whole), 0);
    let halves: Vec<_> = arena
        .monster_ids()
        .into_iter()
        .filter_map(|id| arena.monster(id))
        .map(|m| (m.race, m.hp, m.max_hp))
        .collect();
    assert!(halves.contains(&(banor, 51, 101)));
    assert!(halves.contains(&(lupart, 50, 100)));

    // Either half brings them back together with the sum
    let half = arena
        .monster_ids()
        .into_iter()
        .find(|&id| arena.monster(id).is_some_and(|m| m.race == banor))
        .unwrap();
    assert_eq!(cast_through(&mut arena, half, SPECIAL), CastOutcome::Cast(SPECIAL));
    assert_eq!(arena.race_count(banor), 0);
    assert_eq!(arena.race_count(lupart), 0);
    let joined = arena.monster_ids()[0];
    let m = arena.monster(joined).unwrap();
    assert_eq!((m.race, m.hp, m.max_hp), (whole, 101, 201));
}

#[test]
fn test_monster_casts_at_enemy() {
    let race = caster(0, "1_IN_1 | BO_FIRE(30d1)", 100, RaceFlags::empty());
    let (mut arena, mon) = duel(race, 4);
    let target = arena.spawn(RaceId(0), PLAYER.offset(8, 0)).unwrap();
    arena.monster_mut(target).unwrap().pet = true;
    let hp = arena.monster(target).unwrap().hp;

    let mut rng = GameRng::new(4);
    let bolt = SpellId::projection(SpellCategory::Bolt, Effect::Fire);
    let out = cast_at_monster(&mut arena, &mut rng, &SpellOptions::default(), mon, &Always(bolt));
    assert_eq!(out, CastOutcome::Cast(bolt));
    assert_eq!(arena.monster(target).unwrap().hp, hp - 30);
    assert_eq!(arena.player.hp, 100);
}

#[test]
fn test_power_scales_damage() {
    let race = caster(0, "1_IN_1 | POWER_200% | BO_FIRE(10d1)", 100, RaceFlags::empty());
    let (mut arena, mon) = duel(race, 4);
    assert_eq!(cast(&mut arena, mon, BO_FIRE, 1), CastOutcome::Cast(BO_FIRE));
    assert_eq!(arena.projections()[0].dam, 20);
    assert_eq!(arena.player.hp, 80);
}

fn ball_radius(line: &str) -> u32 {
    let race = caster(0, line, 100, RaceFlags::empty());
    let (mut arena, mon) = duel(race, 4);
    assert_eq!(cast(&mut arena, mon, BA_FIRE, 1), CastOutcome::Cast(BA_FIRE));
    arena.projections()[0].radius
}

#[test]
fn test_ball_radius_grows_with_damage() {
    assert_eq!(ball_radius("1_IN_1 | BA_FIRE(1d1+300)"), 4);
    assert_eq!(ball_radius("1_IN_1 | BA_FIRE(1d1+299)"), 3);
    assert_eq!(ball_radius("1_IN_1 | BA_FIRE(1d1+150)"), 3);
    assert_eq!(ball_radius("1_IN_1 | BA_FIRE(1d1+149)"), 2);
    // The tier follows the scaled damage
    assert_eq!(ball_radius("1_IN_1 | POWER_200% | BA_FIRE(1d1+149)"), 4);
}

#[test]
fn test_hand_of_doom_takes_share_of_target_hp() {
    let race = caster(0, "1_IN_1 | POWER_200% | HAND_DOOM(50d1)", 100, RaceFlags::empty());
    let (mut arena, mon) = duel(race, 4);
    arena.player.hp = 80;
    assert_eq!(cast(&mut arena, mon, HAND_DOOM, 1), CastOutcome::Cast(HAND_DOOM));
    assert_eq!(arena.projections()[0].dam, 40);
}

#[test]
fn test_bird_drops_player() {
    let mut race = caster(0, "1_IN_1 | SPECIAL", 100, RaceFlags::empty());
    race.symbol = 'B';
    let (mut arena, mon) = duel(race, 3);
    let options = SpellOptions::default();
    let ai = StagedAi::new(options.clone());

    let grabbed = (0..50).any(|seed| {
        let mut rng = GameRng::new(seed);
        let out = cast_at_player(&mut arena, &mut rng, &options, mon, &ai);
        out == CastOutcome::Cast(SPECIAL)
            && arena.messages().iter().any(|l| l.contains("drops from the sky"))
    });
    assert!(grabbed);
    assert!(arena.messages().iter().any(|l| l.contains("You crashed into the ground.")));
    // 4d8 for the grab and 6d8 for the fall
    assert!(arena.player.hp <= 90);
    assert!(arena.player.pos.distance(arena.monster(mon).unwrap().pos) <= 2);
}

#[test]
fn test_levitating_player_floats_down() {
    let mut race = caster(0, "1_IN_1 | SPECIAL", 100, RaceFlags::empty());
    race.symbol = 'B';
    let (mut arena, mon) = duel(race, 3);
    arena.player.levitation = true;
    let options = SpellOptions::default();
    let ai = StagedAi::new(options.clone());

    let grabbed = (0..50).any(|seed| {
        let mut rng = GameRng::new(seed);
        cast_at_player(&mut arena, &mut rng, &options, mon, &ai);
        arena.messages().iter().any(|l| l.contains("drops from the sky"))
    });
    assert!(grabbed);
    assert!(arena.messages().iter().any(|l| l.contains("float gently down")));
    assert!(arena.player.hp >= 100 - 32);
}

#[test]
fn test_banor_rupart_needs_room_to_fuse() {
    let mut arena = bestiary_arena();
    let whole = arena.race_by_name(NamedRace::BanorRupart).unwrap();
    let banor = arena.race_by_name(NamedRace::Banor).unwrap();
    let lupart = arena.race_by_name(NamedRace::Lupart).unwrap();
    let corner = PLAYER.offset(10, 5);
    let half = arena.spawn(banor, PLAYER.offset(4, 0)).unwrap();
    let other = arena.spawn(lupart, corner).unwrap();
    arena.monster_mut(other).unwrap().hp = 30;
    for p in corner.neighbors() {
        arena.grid.set_wall(p, true);
    }

    assert_eq!(cast_through(&mut arena, half, SPECIAL), CastOutcome::Cast(SPECIAL));
    assert_eq!(arena.race_count(whole), 0);
    assert!(arena.monster(half).is_some());
    assert_eq!(arena.monster(other).unwrap().hp, 30);
    assert!(!arena.messages().iter().any(|l| l.contains("combine")));
}
