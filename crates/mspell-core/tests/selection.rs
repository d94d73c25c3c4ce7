mod common;

use common::{PLAYER, caster, duel, weigh};
use mspell_core::GameRng;
use mspell_core::cast::{CastContext, CastFlags, CastOutcome, SpellAi, StagedAi, cast_at_player};
use mspell_core::options::SpellOptions;
use mspell_core::race::{RaceFlags, RaceId};
use mspell_core::spell::{Effect, Resist, SmartFlags, SpellCategory, SpellId};
use mspell_core::world::Actors;

const BO_FIRE: SpellId = SpellId::projection(SpellCategory::Bolt, Effect::Fire);
const BO_COLD: SpellId = SpellId::projection(SpellCategory::Bolt, Effect::Cold);
const BA_FIRE: SpellId = SpellId::projection(SpellCategory::Ball, Effect::Fire);
const BR_FIRE: SpellId = SpellId::projection(SpellCategory::Breath, Effect::Fire);
const BR_DISI: SpellId = SpellId::projection(SpellCategory::Breath, Effect::Disintegrate);
const GAZE: SpellId = SpellId::projection(SpellCategory::Bolt, Effect::Attack);
const ROCKET: SpellId = SpellId::projection(SpellCategory::Ball, Effect::Rocket);
const PSY_SPEAR: SpellId = SpellId::projection(SpellCategory::Beam, Effect::PsySpear);

fn cheating_ai() -> StagedAi {
    let mut options = SpellOptions::default();
    options.smart_cheat = true;
    StagedAi::new(options)
}

#[test]
fn test_known_half_resist_halves_bolt() {
    let race = caster(0, "1_IN_1 | BO_FIRE(10d1) | BO_COLD", 100, RaceFlags::empty());
    let (mut arena, mon) = duel(race, 5);
    arena.player.resists.set(Resist::Fire, 1, 50);

    let w = weigh(&arena, &cheating_ai(), mon);
    assert_eq!(w.get(BO_FIRE), Some(7));
    assert_eq!(w.get(BO_COLD), Some(15));

    // Without learning the weights stay at the base
    let w = weigh(&arena, &StagedAi::default(), mon);
    assert_eq!(w.get(BO_FIRE), Some(15));
}

#[test]
fn test_projection_damage_is_unresisted() {
    let race = caster(0, "1_IN_1 | BO_FIRE(10d1)", 100, RaceFlags::empty());
    let (mut arena, mon) = duel(race, 5);
    arena.player.resists.set(Resist::Fire, 1, 50);

    let mut rng = GameRng::new(9);
    let out = cast_at_player(&mut arena, &mut rng, &SpellOptions::default(), mon, &StagedAi::default());
    assert_eq!(out, CastOutcome::Cast(BO_FIRE));
    assert_eq!(arena.projections()[0].dam, 10);
    assert_eq!(arena.player.hp, 95);
}

#[test]
fn test_full_resist_strikes_spell() {
    let race = caster(0, "1_IN_1 | BO_FIRE | BO_COLD", 100, RaceFlags::empty());
    let (mut arena, mon) = duel(race, 5);
    arena.player.resists.set(Resist::Fire, 3, 100);
    let w = weigh(&arena, &cheating_ai(), mon);
    assert_eq!(w.survivors(), vec![BO_COLD]);
}

fn wall_box(arena: &mut mspell_arena::Arena) {
    for p in PLAYER.neighbors() {
        arena.grid.set_wall(p, true);
    }
}

#[test]
fn test_no_line_no_splash_strikes_everything() {
    let race = caster(
        0,
        "1_IN_1 | BO_FIRE | BA_FIRE | BR_FIRE | HEAL | BLINK | S_MONSTER | BLIND | HASTE",
        100,
        RaceFlags::empty(),
    );
    let (mut arena, mon) = duel(race, 5);
    wall_box(&mut arena);

    let w = weigh(&arena, &StagedAi::default(), mon);
    assert!(w.survivors().is_empty());
    assert_eq!(w.total(), 0);

    let mut rng = GameRng::new(1);
    let out = cast_at_player(&mut arena, &mut rng, &SpellOptions::default(), mon, &StagedAi::default());
    assert_eq!(out, CastOutcome::Declined);
    assert!(arena.messages().is_empty());
}

#[test]
fn test_splash_halves_area_spells() {
    let race = caster(0, "1_IN_1 | BO_FIRE | BA_FIRE | BR_FIRE", 100, RaceFlags::empty());
    let (mut arena, mon) = duel(race, 5);
    arena.grid.set_wall(PLAYER.offset(2, 0), true);

    let mut rng = GameRng::new(3);
    let mut cast = CastContext::at_player(&arena, mon).unwrap();
    let w = StagedAi::default().weigh(&arena, &mut rng, &mut cast).unwrap();
    assert_eq!(w.get(BO_FIRE), Some(0));
    assert_eq!(w.get(BA_FIRE), Some(7));
    assert_eq!(w.get(BR_FIRE), Some(7));
    assert_ne!(cast.dest, PLAYER);
    assert_eq!(cast.dest.distance(PLAYER), 1);
}

#[test]
fn test_gating_is_idempotent() {
    let race = caster(0, "1_IN_1 | BO_FIRE | BA_FIRE | BR_FIRE | HEAL", 100, RaceFlags::empty());
    let (mut arena, mon) = duel(race, 5);
    arena.grid.set_wall(PLAYER.offset(2, 0), true);

    let ai = StagedAi::default();
    let first = weigh(&arena, &ai, mon);
    let second = weigh(&arena, &ai, mon);
    assert_eq!(first.survivors(), second.survivors());
    let a: Vec<u32> = first.iter().map(|(_, w)| w).collect();
    let b: Vec<u32> = second.iter().map(|(_, w)| w).collect();
    assert_eq!(a, b);
}

const SELF_CARE: &str = "1_IN_1 | BO_FIRE | BA_COLD | HEAL | TELE_SELF | S_MONSTER";

fn set_hp(arena: &mut mspell_arena::Arena, mon: mspell_core::world::MonsterId, pct: i32) {
    let m = arena.monster_mut(mon).unwrap();
    m.max_hp = 100;
    m.hp = pct;
}

#[test]
fn test_wounded_is_monotonic() {
    let race = caster(0, SELF_CARE, 100, RaceFlags::empty());
    let (mut arena, mon) = duel(race, 5);
    let ai = StagedAi::default();

    set_hp(&mut arena, mon, 80);
    let light = weigh(&arena, &ai, mon);
    set_hp(&mut arena, mon, 5);
    let heavy = weigh(&arena, &ai, mon);

    for category in [SpellCategory::Heal, SpellCategory::Escape] {
        assert!(heavy.group_total(category) >= light.group_total(category));
    }
    for category in [SpellCategory::Bolt, SpellCategory::Ball] {
        assert!(heavy.group_total(category) <= light.group_total(category));
    }
    // Twenty percent wounded is still below the threshold
    assert_eq!(light.group_total(SpellCategory::Heal), 10);
}

fn summon_picks(flags: RaceFlags) -> u32 {
    let race = caster(0, SELF_CARE, 100, flags);
    let (mut arena, mon) = duel(race, 5);
    set_hp(&mut arena, mon, 5);
    let ai = StagedAi::default();
    let mut rng = GameRng::new(1234);
    let mut picks = 0;
    for _ in 0..1000 {
        let mut cast = CastContext::at_player(&arena, mon).unwrap();
        if let Some(spell) = ai.choose(&arena, &mut rng, &mut cast)
            && spell.id.category == SpellCategory::Summon
        {
            picks += 1;
        }
    }
    picks
}

#[test]
fn test_smart_casters_panic_summon() {
    let calm = summon_picks(RaceFlags::empty());
    let panicked = summon_picks(RaceFlags::SMART);
    assert!(panicked > calm * 2, "smart {panicked} vs plain {calm}");
}

#[test]
fn test_arena_level_forbids_summons() {
    let race = caster(0, SELF_CARE, 100, RaceFlags::empty());
    let (mut arena, mon) = duel(race, 5);
    arena.level.arena = true;
    let w = weigh(&arena, &StagedAi::default(), mon);
    assert_eq!(w.group_total(SpellCategory::Summon), 0);
}

/// Disintegration weights over many draws of the gate roll
fn disintegration_weights(distance: i32) -> Vec<u32> {
    let race = caster(0, "1_IN_1 | BR_DISI | BO_FIRE", 100, RaceFlags::empty());
    let (mut arena, mon) = duel(race, distance);
    wall_box(&mut arena);
    let ai = StagedAi::default();
    (0..200)
        .map(|seed| {
            let mut rng = GameRng::new(seed);
            let mut cast = CastContext::at_player(&arena, mon).unwrap();
            let w = ai.weigh(&arena, &mut rng, &mut cast).unwrap();
            assert_eq!(w.get(BO_FIRE), Some(0));
            w.get(BR_DISI).unwrap()
        })
        .collect()
}

#[test]
fn test_disintegration_breaks_through_walls() {
    let near = disintegration_weights(5);
    assert!(near.iter().all(|&w| w == 0 || w == 150));
    assert!(near.contains(&150));
    assert!(near.contains(&0));

    // Half the maximum range is the limit
    let far = disintegration_weights(12);
    assert!(far.iter().all(|&w| w == 0));
}

#[test]
fn test_invulnerable_player_leaves_psycho_spear() {
    let line = "1_IN_1 | BR_FIRE | BA_FIRE | BO_FIRE | PSY_SPEAR | HAND_DOOM | HEAL";
    let race = caster(0, line, 100, RaceFlags::empty());
    let (mut arena, mon) = duel(race, 5);

    let w = weigh(&arena, &StagedAi::default(), mon);
    assert_eq!(w.get(PSY_SPEAR), Some(15));

    arena.player.timers.invulnerable = 5;
    let w = weigh(&arena, &StagedAi::default(), mon);
    assert_eq!(w.get(PSY_SPEAR), Some(30));
    for category in [
        SpellCategory::Breath,
        SpellCategory::Ball,
        SpellCategory::Bolt,
        SpellCategory::Curse,
    ] {
        assert_eq!(w.group_total(category), 0, "{category:?}");
    }
    assert_eq!(w.group_total(SpellCategory::Beam), 30);
    assert_eq!(w.group_total(SpellCategory::Heal), 10);
}

#[test]
fn test_known_reflection_strikes_bolts() {
    let race = caster(0, "1_IN_1 | BO_FIRE | GAZE | BA_FIRE", 100, RaceFlags::empty());
    let (mut arena, mon) = duel(race, 5);
    arena.player.reflection = true;

    let w = weigh(&arena, &cheating_ai(), mon);
    assert_eq!(w.get(BO_FIRE), Some(0));
    assert_eq!(w.get(GAZE), Some(0));
    assert_eq!(w.get(BA_FIRE), Some(15));

    // Learned the hard way works the same
    arena.monster_mut(mon).unwrap().smart = SmartFlags::REFLECTION;
    let w = weigh(&arena, &StagedAi::default(), mon);
    assert_eq!(w.group_total(SpellCategory::Bolt), 0);

    // Unknown reflection does not matter
    arena.monster_mut(mon).unwrap().smart = SmartFlags::empty();
    let w = weigh(&arena, &StagedAi::default(), mon);
    assert_eq!(w.get(BO_FIRE), Some(15));
}

#[test]
fn test_stupid_caster_never_splashes() {
    let race = caster(0, "1_IN_1 | BO_FIRE | BA_FIRE | BR_FIRE", 100, RaceFlags::STUPID);
    let (mut arena, mon) = duel(race, 5);
    arena.grid.set_wall(PLAYER.offset(2, 0), true);

    let mut rng = GameRng::new(3);
    let mut cast = CastContext::at_player(&arena, mon).unwrap();
    let w = StagedAi::default().weigh(&arena, &mut rng, &mut cast).unwrap();
    assert_eq!(w.total(), 0);
    assert_eq!(cast.dest, PLAYER);
    assert!(!cast.has(CastFlags::SPLASH));
}

#[test]
fn test_stupid_caster_stops_after_arena_check() {
    let race = caster(0, SELF_CARE, 100, RaceFlags::STUPID);
    let (mut arena, mon) = duel(race, 5);
    set_hp(&mut arena, mon, 5);
    arena.level.arena = true;
    arena.level.no_magic = true;

    let w = weigh(&arena, &StagedAi::default(), mon);
    assert_eq!(w.group_total(SpellCategory::Summon), 0);
    // No wounded boost and no anti-magic filter
    assert_eq!(w.group_total(SpellCategory::Heal), 10);
    assert_eq!(w.group_total(SpellCategory::Escape), 5);
    assert_eq!(w.get(BO_FIRE), Some(15));
}

#[test]
fn test_blocked_shot_strikes_bolts_and_rocket() {
    let race = caster(0, "1_IN_1 | BO_FIRE | ROCKET | BA_FIRE", 100, RaceFlags::empty());
    let (mut arena, mon) = duel(race, 5);

    let w = weigh(&arena, &StagedAi::default(), mon);
    assert_eq!(w.get(ROCKET), Some(15));

    arena.spawn(RaceId(0), PLAYER.offset(2, 0)).unwrap();
    let w = weigh(&arena, &StagedAi::default(), mon);
    assert_eq!(w.get(BO_FIRE), Some(0));
    assert_eq!(w.get(ROCKET), Some(0));
    assert_eq!(w.get(BA_FIRE), Some(15));
}
