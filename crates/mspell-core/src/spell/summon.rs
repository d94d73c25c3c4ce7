//! Summon types selectable with `S_<NAME>` tokens

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, FromRepr, IntoEnumIterator};

use crate::color::Color;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, FromRepr,
)]
#[repr(i16)]
pub enum SummonKind {
    Monster = 0,
    Monsters = 1,
    Ant = 2,
    Spider = 3,
    Hound = 4,
    Hydra = 5,
    Angel = 6,
    Demon = 7,
    Undead = 8,
    Dragon = 9,
    HiUndead = 10,
    HiDragon = 11,
    Amberite = 12,
    Unique = 13,
    Kin = 14,
    Cyber = 15,
    Animal = 16,
    Elemental = 17,
    Olympian = 18,
    /// Per-species roster; see the special summon table
    Special = 19,
}

impl SummonKind {
    /// Token used after `S_`, display name and color
    const fn row(self) -> (&'static str, &'static str, Color) {
        match self {
            SummonKind::Monster => ("MONSTER", "Monster", Color::Orange),
            SummonKind::Monsters => ("MONSTERS", "Monsters", Color::Orange),
            SummonKind::Ant => ("ANT", "Ants", Color::Red),
            SummonKind::Spider => ("SPIDER", "Spiders", Color::Slate),
            SummonKind::Hound => ("HOUND", "Hounds", Color::LightUmber),
            SummonKind::Hydra => ("HYDRA", "Hydras", Color::Green),
            SummonKind::Angel => ("ANGEL", "Angel", Color::Yellow),
            SummonKind::Demon => ("DEMON", "Demon", Color::Red),
            SummonKind::Undead => ("UNDEAD", "Undead", Color::LightDark),
            SummonKind::Dragon => ("DRAGON", "Dragon", Color::Orange),
            SummonKind::HiUndead => ("HI_UNDEAD", "Ancient Undead", Color::LightDark),
            SummonKind::HiDragon => ("HI_DRAGON", "Ancient Dragons", Color::Violet),
            SummonKind::Amberite => ("AMBERITE", "Amberites", Color::Yellow),
            SummonKind::Unique => ("UNIQUE", "Uniques", Color::Violet),
            SummonKind::Kin => ("KIN", "Kin", Color::Orange),
            SummonKind::Cyber => ("CYBER", "Cyberdemons", Color::Umber),
            SummonKind::Animal => ("ANIMAL", "Animals", Color::Green),
            SummonKind::Elemental => ("ELEMENTAL", "Elementals", Color::LightBlue),
            SummonKind::Olympian => ("OLYMPIAN", "Olympians", Color::Yellow),
            SummonKind::Special => ("SPECIAL", "Special", Color::Orange),
        }
    }

    pub const fn token(self) -> &'static str {
        self.row().0
    }

    pub const fn name(self) -> &'static str {
        self.row().1
    }

    pub const fn color(self) -> Color {
        self.row().2
    }

    pub fn parse_token(token: &str) -> Option<Self> {
        Self::iter().find(|kind| kind.token() == token)
    }

    pub fn from_code(code: i16) -> Option<Self> {
        Self::from_repr(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token() {
        assert_eq!(SummonKind::parse_token("UNDEAD"), Some(SummonKind::Undead));
        assert_eq!(SummonKind::parse_token("HI_DRAGON"), Some(SummonKind::HiDragon));
        assert_eq!(SummonKind::parse_token("undead"), None);
    }

    #[test]
    fn test_tokens_round_trip() {
        for kind in SummonKind::iter() {
            assert_eq!(SummonKind::parse_token(kind.token()), Some(kind));
            assert_eq!(SummonKind::from_code(kind as i16), Some(kind));
        }
    }
}
