//! Spell data: identity, parameters, catalog, parser and repertoires

pub mod catalog;
pub mod effect;
pub mod id;
pub mod param;
pub mod parse;
pub mod repertoire;
pub mod summon;
pub mod template;

use bitflags::bitflags;

use crate::color::Color;

pub use catalog::{CatalogEntry, SpellDisplay};
pub use effect::{Effect, Resist, SmartFlags};
pub use id::{SpellCategory, SpellId};
pub use param::{Dice, HpPct, ParamKind, SpellParam, default_param};
pub use parse::parse_spell;
pub use repertoire::{Repertoire, SpellGroup};
pub use summon::SummonKind;
pub use template::{MessageVars, Template};

bitflags! {
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct SpellFlags: u8 {
        /// Breaths and physical attacks: never fail, ignore anti-magic
        const INNATE = 1 << 0;
        /// Ball that always has radius 0 and cannot splash
        const FIRST_IN_GROUP = 1 << 1;
        /// Needs a target to be useful
        const TARGET = 1 << 2;
    }
}

/// One spell in a species repertoire
#[derive(Debug, Clone, Copy, Eq)]
pub struct Spell {
    pub id: SpellId,
    pub param: SpellParam,
    pub display: Option<&'static SpellDisplay>,
    pub flags: SpellFlags,
}

impl Spell {
    pub fn new(id: SpellId, param: SpellParam) -> Self {
        Self {
            id,
            param,
            display: None,
            flags: SpellFlags::empty(),
        }
    }

    pub fn is_innate(&self) -> bool {
        self.flags.contains(SpellFlags::INNATE)
    }

    /// Display name, generated from the effect for spells outside the catalog
    pub fn name(&self) -> String {
        if let Some(display) = self.display {
            return display.name.to_string();
        }
        let effect = self.id.as_effect().map_or("?", Effect::name);
        match self.id.category {
            SpellCategory::Breath => format!("Breathe {effect}"),
            SpellCategory::Ball => format!("{effect} Ball"),
            SpellCategory::Bolt => format!("{effect} Bolt"),
            SpellCategory::Beam => format!("{effect} Beam"),
            SpellCategory::Tactic if self.id.is_jump() => format!("{effect} Jump"),
            SpellCategory::Summon => match self.id.as_summon() {
                Some(kind) => format!("Summon {}", kind.name()),
                None => "Summon ?".to_string(),
            },
            other => other.label().to_string(),
        }
    }

    pub fn color(&self) -> Color {
        if let Some(display) = self.display {
            return display.color;
        }
        self.id
            .as_effect()
            .map(Effect::color)
            .or_else(|| self.id.as_summon().map(SummonKind::color))
            .unwrap_or_else(|| self.id.category.color())
    }
}

impl PartialEq for Spell {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.param == other.param && self.flags == other.flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_names() {
        let name = |tok| parse_spell(tok, 30).unwrap().name();
        assert_eq!(name("BA_MANA"), "Mana Storm");
        assert_eq!(name("BO_FIRE"), "Fire Bolt");
        assert_eq!(name("BR_FIRE"), "Breathe Fire");
        assert_eq!(name("BA_COLD"), "Frost Ball");
        assert_eq!(name("S_UNDEAD"), "Summon Undead");
        assert_eq!(name("JMP_FIRE"), "Fire Jump");
        assert_eq!(name("HEAL"), "Heal Self");
    }

    #[test]
    fn test_colors() {
        assert_eq!(parse_spell("BO_FIRE", 10).unwrap().color(), Color::Red);
        assert_eq!(parse_spell("S_ANGEL", 10).unwrap().color(), Color::Yellow);
        assert_eq!(parse_spell("BA_CHAOS", 10).unwrap().color(), Color::Violet);
    }

    #[test]
    fn test_equality_ignores_display() {
        let spell = parse_spell("HAND_DOOM(6d8)", 30).unwrap();
        assert!(spell.display.is_some());
        let bare = Spell {
            display: None,
            ..spell
        };
        assert_eq!(spell, bare);
        assert_ne!(spell, parse_spell("HAND_DOOM(6d9)", 30).unwrap());
    }
}
