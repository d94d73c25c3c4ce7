//! Spell identity: a tactical category plus an effect code

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, FromRepr, IntoEnumIterator};

use crate::color::Color;

use super::effect::Effect;
use super::summon::SummonKind;

/// Tactical grouping of spells. Declaration order is enumeration order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumCount,
    FromRepr,
)]
#[repr(u8)]
pub enum SpellCategory {
    Breath = 0,
    Ball = 1,
    Bolt = 2,
    Beam = 3,
    Curse = 4,
    Buff = 5,
    Debuff = 6,
    Escape = 7,
    Annoy = 8,
    Summon = 9,
    Heal = 10,
    Tactic = 11,
    Special = 12,
}

impl SpellCategory {
    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn all() -> impl Iterator<Item = SpellCategory> {
        Self::iter()
    }

    /// Selection weight every spell in the group starts each cast with
    pub const fn base_weight(self) -> u32 {
        match self {
            SpellCategory::Breath
            | SpellCategory::Ball
            | SpellCategory::Bolt
            | SpellCategory::Beam
            | SpellCategory::Curse => 15,
            SpellCategory::Buff => 5,
            SpellCategory::Debuff => 10,
            SpellCategory::Escape => 5,
            SpellCategory::Annoy => 5,
            SpellCategory::Summon => 8,
            SpellCategory::Heal => 10,
            SpellCategory::Tactic => 10,
            SpellCategory::Special => 100,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            SpellCategory::Breath => "Breathe",
            SpellCategory::Ball => "Ball",
            SpellCategory::Bolt => "Bolt",
            SpellCategory::Beam => "Beam",
            SpellCategory::Curse => "Curse",
            SpellCategory::Buff => "Buff",
            SpellCategory::Debuff => "Biff",
            SpellCategory::Escape => "Escape",
            SpellCategory::Annoy => "Annoy",
            SpellCategory::Summon => "Summon",
            SpellCategory::Heal => "Heal",
            SpellCategory::Tactic => "Tactic",
            SpellCategory::Special => "Weird",
        }
    }

    pub const fn color(self) -> Color {
        match self {
            SpellCategory::Buff
            | SpellCategory::Escape
            | SpellCategory::Heal
            | SpellCategory::Tactic => Color::LightBlue,
            SpellCategory::Annoy | SpellCategory::Summon => Color::Orange,
            SpellCategory::Special => Color::LightUmber,
            _ => Color::Red,
        }
    }

    /// Categories that need a direct hit on the target
    pub const fn is_attack(self) -> bool {
        matches!(
            self,
            SpellCategory::Breath
                | SpellCategory::Ball
                | SpellCategory::Bolt
                | SpellCategory::Beam
                | SpellCategory::Curse
        )
    }

    /// Categories whose effect code is an [`Effect`]
    pub const fn uses_projection(self) -> bool {
        matches!(
            self,
            SpellCategory::Breath | SpellCategory::Ball | SpellCategory::Bolt | SpellCategory::Beam
        )
    }
}

/// Annoyance effect codes
pub mod annoy {
    pub const AMNESIA: i16 = 0;
    pub const ANIMATE_DEAD: i16 = 1;
    pub const BLIND: i16 = 2;
    pub const CONFUSE: i16 = 3;
    pub const DARKNESS: i16 = 4;
    pub const PARALYZE: i16 = 5;
    pub const SCARE: i16 = 6;
    pub const SHRIEK: i16 = 7;
    pub const SLOW: i16 = 8;
    pub const TELE_LEVEL: i16 = 9;
    pub const TELE_TO: i16 = 10;
    pub const TRAPS: i16 = 11;
    pub const WORLD: i16 = 12;
}

/// Debuff effect codes
pub mod debuff {
    pub const ANTI_MAGIC: i16 = 0;
    pub const DISPEL_MAGIC: i16 = 1;
    pub const POLYMORPH: i16 = 2;
}

pub mod buff {
    pub const HASTE: i16 = 0;
    pub const INVULN: i16 = 1;
}

pub mod escape {
    pub const TELE_SELF: i16 = 0;
    pub const TELE_OTHER: i16 = 1;
}

/// Tactic codes. Codes below [`BLINK`] are jumps whose code is an effect.
pub mod tactic {
    pub const BLINK: i16 = 1000;
    pub const BLINK_OTHER: i16 = 1001;
}

pub mod heal {
    pub const SELF: i16 = 0;
}

pub mod special {
    pub const SPECIAL: i16 = 0;
}

/// Canonical spell identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpellId {
    pub category: SpellCategory,
    pub effect: i16,
}

impl SpellId {
    pub const fn new(category: SpellCategory, effect: i16) -> Self {
        Self { category, effect }
    }

    pub const fn projection(category: SpellCategory, effect: Effect) -> Self {
        Self::new(category, effect as i16)
    }

    pub const fn summon(kind: SummonKind) -> Self {
        Self::new(SpellCategory::Summon, kind as i16)
    }

    /// Stable key: category in the high half, effect in the low half.
    pub const fn hash(self) -> u32 {
        ((self.category as u32) << 16) | (self.effect as u16 as u32)
    }

    pub fn from_hash(hash: u32) -> Option<Self> {
        let category = SpellCategory::from_repr((hash >> 16) as u8)?;
        Some(Self::new(category, (hash & 0xFFFF) as u16 as i16))
    }

    /// The effect code as a projection effect, for the categories that have one
    pub fn as_effect(self) -> Option<Effect> {
        match self.category {
            SpellCategory::Breath
            | SpellCategory::Ball
            | SpellCategory::Bolt
            | SpellCategory::Beam
            | SpellCategory::Curse => Effect::from_code(self.effect),
            SpellCategory::Tactic if self.is_jump() => Effect::from_code(self.effect),
            _ => None,
        }
    }

    pub fn as_summon(self) -> Option<SummonKind> {
        match self.category {
            SpellCategory::Summon => SummonKind::from_code(self.effect),
            _ => None,
        }
    }

    /// Jumps are tactic spells that blast the area the caster leaves.
    pub const fn is_jump(self) -> bool {
        matches!(self.category, SpellCategory::Tactic) && self.effect < tactic::BLINK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_order() {
        let all: Vec<_> = SpellCategory::all().collect();
        assert_eq!(all.len(), SpellCategory::COUNT);
        assert_eq!(all[0], SpellCategory::Breath);
        assert_eq!(all[12], SpellCategory::Special);
        for (i, cat) in all.iter().enumerate() {
            assert_eq!(cat.index(), i);
        }
    }

    #[test]
    fn test_base_weights() {
        assert_eq!(SpellCategory::Bolt.base_weight(), 15);
        assert_eq!(SpellCategory::Summon.base_weight(), 8);
        assert_eq!(SpellCategory::Special.base_weight(), 100);
    }

    #[test]
    fn test_hash() {
        let id = SpellId::projection(SpellCategory::Ball, Effect::Fire);
        assert_eq!(id.hash(), (1 << 16) | 5);
        assert_eq!(SpellId::from_hash(id.hash()), Some(id));

        let blink = SpellId::new(SpellCategory::Tactic, tactic::BLINK);
        assert_eq!(SpellId::from_hash(blink.hash()), Some(blink));
        assert_eq!(SpellId::from_hash(99 << 16), None);
    }

    #[test]
    fn test_equality() {
        let a = SpellId::new(SpellCategory::Annoy, annoy::BLIND);
        let b = SpellId::new(SpellCategory::Annoy, annoy::BLIND);
        let c = SpellId::new(SpellCategory::Debuff, annoy::BLIND);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_jumps() {
        assert!(SpellId::projection(SpellCategory::Tactic, Effect::Fire).is_jump());
        assert!(!SpellId::new(SpellCategory::Tactic, tactic::BLINK).is_jump());
        assert_eq!(
            SpellId::projection(SpellCategory::Tactic, Effect::Fire).as_effect(),
            Some(Effect::Fire)
        );
        assert_eq!(SpellId::new(SpellCategory::Tactic, tactic::BLINK).as_effect(), None);
    }
}
