//! Collaborator interfaces
//!
//! The engine never owns the dungeon. Everything it needs to know or change
//! about the level, the actors and the message log goes through the traits
//! below; [`SpellWorld`] is blanket-implemented for anything that has all of
//! them.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::EnumCount;

use crate::geom::Point;
use crate::race::{MonsterRace, NamedRace, RaceId, SpellLore};
use crate::spell::{Effect, Resist, SmartFlags, SummonKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonsterId(pub u32);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterTimers {
    pub confused: i32,
    pub stunned: i32,
    pub fast: i32,
    pub invulnerable: i32,
    pub afraid: i32,
}

/// A monster on the level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    pub id: MonsterId,
    pub race: RaceId,
    /// The species the monster appears to be; differs from `race` for
    /// shapeshifters
    pub apparent_race: RaceId,
    pub pos: Point,
    pub hp: i32,
    pub max_hp: i32,
    pub timers: MonsterTimers,
    /// Player defenses this monster has observed
    pub smart: SmartFlags,
    pub pet: bool,
    pub peaceful: bool,
    /// Temporarily refuses to attack
    pub nice: bool,
    pub aware: bool,
    /// Seen by the player
    pub visible: bool,
    /// Remembered target grid
    pub target: Option<Point>,
    pub anger: u32,
}

impl Monster {
    pub fn new(id: MonsterId, race: RaceId, pos: Point, hp: i32) -> Self {
        Self {
            id,
            race,
            apparent_race: race,
            pos,
            hp,
            max_hp: hp,
            timers: MonsterTimers::default(),
            smart: SmartFlags::empty(),
            pet: false,
            peaceful: false,
            nice: false,
            aware: true,
            visible: true,
            target: None,
            anger: 0,
        }
    }

    pub fn is_hostile(&self) -> bool {
        !self.pet && !self.peaceful
    }

    pub fn is_enemy_of(&self, other: &Monster) -> bool {
        self.pet != other.pet
    }

    /// Seen by the player under its true identity
    pub fn is_original_and_seen(&self) -> bool {
        self.visible && self.race == self.apparent_race
    }
}

/// Player resistance to one element: sources stacked and resulting percent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResistLevel {
    pub sources: u8,
    pub pct: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resistances {
    levels: [ResistLevel; Resist::COUNT],
}

impl Resistances {
    pub fn set(&mut self, res: Resist, sources: u8, pct: i32) {
        self.levels[res as usize] = ResistLevel {
            sources,
            pct: pct.clamp(0, 100),
        };
    }

    pub fn pct(&self, res: Resist) -> i32 {
        self.levels[res as usize].pct
    }

    pub fn sources(&self, res: Resist) -> u8 {
        self.levels[res as usize].sources
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerTimers {
    pub blind: i32,
    pub confused: i32,
    pub slow: i32,
    pub paralyzed: i32,
    pub fast: i32,
    pub invulnerable: i32,
    pub no_spells: i32,
    /// Hastes the player in answer to annoyance spells
    pub spell_reaction: i32,
    /// Eye for an eye
    pub revenge: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Point,
    pub hp: i32,
    pub max_hp: i32,
    pub mana: i32,
    pub level: i32,
    /// Saving throw skill in percent
    pub saving_throw: i32,
    pub timers: PlayerTimers,
    pub resists: Resistances,
    pub free_action: bool,
    pub reflection: bool,
    pub levitation: bool,
    /// Ninjas turn darkness spells into light
    pub ninja: bool,
    pub one_with_magic: bool,
    pub mental_fortress: bool,
    /// Duel partner for Unending Pursuit
    pub duel_target: Option<MonsterId>,
    pub riding: Option<MonsterId>,
    pub dead: bool,
}

impl Player {
    pub fn new(pos: Point, hp: i32) -> Self {
        Self {
            pos,
            hp,
            max_hp: hp,
            mana: 0,
            level: 1,
            saving_throw: 0,
            timers: PlayerTimers::default(),
            resists: Resistances::default(),
            free_action: false,
            reflection: false,
            levitation: false,
            ninja: false,
            one_with_magic: false,
            mental_fortress: false,
            duel_target: None,
            riding: None,
            dead: false,
        }
    }

    pub fn is_blind(&self) -> bool {
        self.timers.blind > 0
    }
}

/// Properties of the current level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub depth: i32,
    /// Every non-innate spell fails
    pub no_magic: bool,
    /// Arena or monster battle: no summoning
    pub arena: bool,
    /// Teleport level would do nothing here
    pub tele_level_ineffective: bool,
    pub time_stopped: bool,
}

/// Who caused an effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Who {
    Nobody,
    Player,
    Monster(MonsterId),
}

bitflags! {
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct ProjectFlags: u16 {
        const GRID = 1 << 0;
        const ITEM = 1 << 1;
        const KILL = 1 << 2;
        const PLAYER = 1 << 3;
        const STOP = 1 << 4;
        const BEAM = 1 << 5;
        const THRU = 1 << 6;
        const HIDE = 1 << 7;
        const AIMED = 1 << 8;
        const REFLECTABLE = 1 << 9;
        /// Cone shaped, radius grows with distance
        const BREATH = 1 << 10;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct TeleportFlags: u8 {
        const PASSIVE = 1 << 0;
        const NONMAGICAL = 1 << 1;
    }
}

/// One call into the projection system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projection {
    pub who: Who,
    pub effect: Effect,
    pub target: Point,
    pub radius: u32,
    pub dam: i32,
    pub flags: ProjectFlags,
}

pub trait Geometry {
    fn projectable(&self, from: Point, to: Point) -> bool;
    /// No monster stands between the two grids
    fn clean_shot(&self, from: Point, to: Point) -> bool;
    /// Projections may enter this grid
    fn allows_projection(&self, at: Point) -> bool;
    fn in_disintegration_range(&self, from: Point, to: Point) -> bool;
    fn summon_possible(&self, at: Point) -> bool;
    fn raise_possible(&self, caster: MonsterId) -> bool;
    fn level_info(&self) -> LevelInfo;
}

pub trait Actors {
    fn player(&self) -> &Player;
    fn player_mut(&mut self) -> &mut Player;
    fn monster(&self, id: MonsterId) -> Option<&Monster>;
    fn monster_mut(&mut self, id: MonsterId) -> Option<&mut Monster>;
    fn monster_ids(&self) -> Vec<MonsterId>;
    fn monster_at(&self, at: Point) -> Option<MonsterId>;
    /// Description as the player would see it, e.g. "the kobold" or "it"
    fn monster_name(&self, id: MonsterId) -> String;
    fn race(&self, id: RaceId) -> Option<&MonsterRace>;
    fn race_by_name(&self, named: NamedRace) -> Option<RaceId>;
    /// Living monsters of the species
    fn race_count(&self, race: RaceId) -> u32;
    /// A unique that has not been killed yet
    fn unique_available(&self, race: RaceId) -> bool;
    /// Monster the player ordered the pets to attack
    fn pet_target(&self) -> Option<MonsterId>;
    fn lore_mut(&mut self) -> &mut SpellLore;
    fn lore(&self) -> &SpellLore;
    /// Would dispelling the player hurt them enough to bother
    fn dispel_worthwhile(&self, caster: MonsterId) -> bool;
    /// Weight for an anti-magic cast given the player's spellcasting
    fn anti_magic_weight(&self) -> u32;
    fn magic_barrier(&self, caster: MonsterId) -> bool;
    fn psionic_disruption(&self, caster: MonsterId) -> bool;
    fn teleport_barrier(&self, id: MonsterId) -> bool;
}

pub trait Effects {
    fn project(&mut self, projection: Projection);
    fn teleport_player_to(&mut self, to: Point, flags: TeleportFlags);
    fn teleport_player_away(&mut self, from: MonsterId, distance: i32);
    fn teleport_player_level(&mut self);
    fn teleport_monster(&mut self, id: MonsterId, distance: i32, flags: TeleportFlags);
    fn aggravate(&mut self, caster: MonsterId);
    fn animate_dead(&mut self, caster: MonsterId);
    fn create_traps(&mut self, at: Point);
    fn light_area(&mut self, lit: bool);
    fn stop_time(&mut self, caster: MonsterId, turns: i32);
    fn scare_player(&mut self, caster: MonsterId);
    fn dispel_player(&mut self);
    fn dispel_monster(&mut self, id: MonsterId);
    fn summon_kind(
        &mut self,
        who: Who,
        at: Point,
        level: i32,
        kind: SummonKind,
        kin: Option<char>,
    ) -> Option<MonsterId>;
    fn summon_race(&mut self, who: Who, at: Point, race: RaceId) -> Option<MonsterId>;
    fn delete_monster(&mut self, id: MonsterId);
    /// Damage the player; returns the damage actually taken
    fn take_hit(&mut self, dam: i32, killer: &str) -> i32;
    fn damage_monster(&mut self, id: MonsterId, dam: i32, by: Who);
    /// The player saw the spell coming and dodged it
    fn check_foresight(&mut self) -> bool;
}

pub trait Messages {
    fn msg(&mut self, text: &str);
    /// Ask the player a yes/no question
    fn confirm(&mut self, prompt: &str) -> bool;
    /// Interrupt whatever the player is doing
    fn disturb(&mut self);
}

pub trait SpellWorld: Geometry + Actors + Effects + Messages {}

impl<T: Geometry + Actors + Effects + Messages> SpellWorld for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemies() {
        let a = Monster::new(MonsterId(1), RaceId(1), Point::new(0, 0), 10);
        let mut b = Monster::new(MonsterId(2), RaceId(1), Point::new(1, 0), 10);
        assert!(!a.is_enemy_of(&b));
        b.pet = true;
        assert!(a.is_enemy_of(&b));
        assert!(!b.is_hostile());
    }

    #[test]
    fn test_original_and_seen() {
        let mut m = Monster::new(MonsterId(1), RaceId(1), Point::new(0, 0), 10);
        assert!(m.is_original_and_seen());
        m.apparent_race = RaceId(2);
        assert!(!m.is_original_and_seen());
        m.apparent_race = RaceId(1);
        m.visible = false;
        assert!(!m.is_original_and_seen());
    }

    #[test]
    fn test_resistances() {
        let mut r = Resistances::default();
        r.set(Resist::Fire, 1, 50);
        r.set(Resist::Fear, 2, 150);
        assert_eq!(r.pct(Resist::Fire), 50);
        assert_eq!(r.pct(Resist::Fear), 100);
        assert_eq!(r.sources(Resist::Fear), 2);
        assert_eq!(r.pct(Resist::Cold), 0);
    }
}
