//! Per-cast scratch state

use bitflags::bitflags;

use crate::color::Color;
use crate::geom::Point;
use crate::race::MonsterRace;
use crate::spell::{MessageVars, Spell};
use crate::world::{MonsterId, SpellWorld};

bitflags! {
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct CastFlags: u8 {
        const SRC_PLAYER = 1 << 0;
        const SRC_MONSTER = 1 << 1;
        const DEST_PLAYER = 1 << 2;
        const DEST_MONSTER = 1 << 3;
        /// Neither party is in view
        const UNVIEW = 1 << 4;
        /// Clear line of fire to the target
        const DIRECT = 1 << 5;
        /// Aiming at a grid next to the target
        const SPLASH = 1 << 6;
    }
}

/// Everything one cast attempt knows about its caster and target.
///
/// Built fresh for each attempt and dropped once the spell resolves.
#[derive(Debug, Clone)]
pub struct CastContext {
    pub caster: MonsterId,
    /// The species the caster appears to be; its spells are the ones cast
    pub race: MonsterRace,
    pub target: Option<MonsterId>,
    pub src: Point,
    pub dest: Point,
    pub name: String,
    pub target_name: String,
    pub target_pos: &'static str,
    pub flags: CastFlags,
    pub spell: Option<Spell>,
}

impl CastContext {
    fn for_caster(world: &dyn SpellWorld, caster: MonsterId) -> Option<Self> {
        let mon = world.monster(caster)?;
        let race = world.race(mon.apparent_race)?.clone();
        Some(Self {
            caster,
            race,
            target: None,
            src: mon.pos,
            dest: mon.pos,
            name: describe(world, caster),
            target_name: String::new(),
            target_pos: "its",
            flags: CastFlags::SRC_MONSTER,
            spell: None,
        })
    }

    /// A monster casting at the player
    pub fn at_player(world: &dyn SpellWorld, caster: MonsterId) -> Option<Self> {
        let mut cast = Self::for_caster(world, caster)?;
        cast.dest = world.player().pos;
        cast.target_name = "you".to_string();
        cast.target_pos = "your";
        cast.flags |= CastFlags::DEST_PLAYER;
        Some(cast)
    }

    /// A monster casting at another monster; the target is chosen later.
    pub fn at_monster(world: &dyn SpellWorld, caster: MonsterId) -> Option<Self> {
        let mut cast = Self::for_caster(world, caster)?;
        cast.flags |= CastFlags::DEST_MONSTER;
        Some(cast)
    }

    pub fn set_target(&mut self, world: &dyn SpellWorld, target: MonsterId) {
        let Some(mon) = world.monster(target) else {
            return;
        };
        self.target = Some(target);
        self.dest = mon.pos;
        self.target_name = Color::Orange.markup(&capitalize(&world.monster_name(target)));
        self.target_pos = world
            .race(mon.apparent_race)
            .map_or("its", MonsterRace::possessive);
        let caster_seen = world.monster(self.caster).is_some_and(|m| m.visible);
        if !caster_seen && !mon.visible {
            self.flags |= CastFlags::UNVIEW;
        }
    }

    pub fn has(&self, flags: CastFlags) -> bool {
        self.flags.contains(flags)
    }

    pub fn distance(&self) -> i32 {
        self.src.distance(self.dest)
    }

    pub fn caster_pos(&self) -> &'static str {
        if self.has(CastFlags::SRC_PLAYER) {
            "your"
        } else {
            self.race.possessive()
        }
    }

    pub fn vars(&self) -> MessageVars<'_> {
        MessageVars {
            caster: &self.name,
            caster_pos: self.caster_pos(),
            target: &self.target_name,
            target_pos: self.target_pos,
        }
    }
}

/// Caster name as shown in messages
fn describe(world: &dyn SpellWorld, id: MonsterId) -> String {
    Color::LightGreen.markup(&capitalize(&world.monster_name(id)))
}

pub(crate) fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("the kobold"), "The kobold");
        assert_eq!(capitalize(""), "");
    }
}
