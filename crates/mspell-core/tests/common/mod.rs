#![allow(dead_code)]

use std::sync::Arc;

use mspell_arena::Arena;
use mspell_core::GameRng;
use mspell_core::cast::{CastContext, SpellAi, Weights};
use mspell_core::geom::Point;
use mspell_core::race::{MonsterRace, RaceFlags, RaceId};
use mspell_core::spell::{Dice, Repertoire, SpellId};
use mspell_core::world::{MonsterId, SpellWorld};

pub const PLAYER: Point = Point::new(10, 10);

/// A caster species with the given spell line
pub fn caster(id: u16, line: &str, level: i32, flags: RaceFlags) -> MonsterRace {
    let mut race = MonsterRace::new(RaceId(id), format!("caster {id}"), 'p', level);
    race.flags = flags;
    race.hit_dice = Dice::new(10, 10, 0);
    race.spells = Some(Arc::new(Repertoire::parse_line(line, level).unwrap()));
    race
}

/// Arena with the player at [`PLAYER`] and one caster `distance` grids east
pub fn duel(race: MonsterRace, distance: i32) -> (Arena, MonsterId) {
    let id = race.id;
    let mut arena = Arena::new(40, 21, vec![race], 42);
    arena.player.pos = PLAYER;
    let caster = arena.spawn(id, PLAYER.offset(distance, 0)).unwrap();
    (arena, caster)
}

pub fn weigh(world: &dyn SpellWorld, ai: &dyn SpellAi, caster: MonsterId) -> Weights {
    let mut rng = GameRng::new(3);
    let mut cast = CastContext::at_player(world, caster).unwrap();
    ai.weigh(world, &mut rng, &mut cast).unwrap()
}

/// Always casts one spell, for exercising a handler directly
pub struct Always(pub SpellId);

impl SpellAi for Always {
    fn weigh(
        &self,
        _world: &dyn SpellWorld,
        _rng: &mut GameRng,
        cast: &mut CastContext,
    ) -> Option<Weights> {
        let mut w = Weights::new(cast.race.spells.clone()?);
        w.remove_where(|s| s.id != self.0);
        Some(w)
    }
}
