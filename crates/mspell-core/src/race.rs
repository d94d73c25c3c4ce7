//! Monster species and the player's spell knowledge about them

use std::sync::Arc;

use bitflags::bitflags;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::spell::{Dice, Repertoire, SpellId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RaceId(pub u16);

bitflags! {
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct RaceFlags: u32 {
        const UNIQUE = 1 << 0;
        const MALE = 1 << 1;
        const FEMALE = 1 << 2;
        /// Uses learned player defenses and panics near death
        const SMART = 1 << 3;
        /// Never fails, never reasons past line of sight
        const STUPID = 1 << 4;
        const FORCE_MAXHP = 1 << 5;
        const UNDEAD = 1 << 6;
        const HURT_LITE = 1 << 7;
        /// Surrounded by magical darkness
        const DARK_AURA = 1 << 8;
    }
}

impl Serialize for RaceFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RaceFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u32::deserialize(deserializer)?;
        Ok(RaceFlags::from_bits_truncate(bits))
    }
}

/// Species with hardcoded spell behavior or messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum NamedRace {
    SantaClaus,
    Reindeer,
    Zeus,
    Shambler,
    Poseidon,
    GreaterKraken,
    Hades,
    GreaterBalrog,
    Archlich,
    Athena,
    UltimateMagus,
    Ares,
    Hera,
    Apollo,
    Artemis,
    Fenghuang,
    Hephaestus,
    SpellwarpAutomaton,
    Hermes,
    MagicMushroom,
    DeathBeast,
    Demeter,
    Ent,
    Rolento,
    Shuryuudan,
    Bullgates,
    Ie,
    Caldarm,
    LockeClone,
    Talos,
    BanorRupart,
    Banor,
    Lupart,
    Ninja,
    Jaian,
    Botei,
}

impl NamedRace {
    pub const fn species_name(self) -> &'static str {
        match self {
            NamedRace::SantaClaus => "Santa Claus",
            NamedRace::Reindeer => "Reindeer",
            NamedRace::Zeus => "Zeus, Lord of Olympus",
            NamedRace::Shambler => "Shambler",
            NamedRace::Poseidon => "Poseidon, Lord of the Seas",
            NamedRace::GreaterKraken => "Greater kraken",
            NamedRace::Hades => "Hades, Lord of the Underworld",
            NamedRace::GreaterBalrog => "Greater Balrog",
            NamedRace::Archlich => "Archlich",
            NamedRace::Athena => "Athena, Goddess of Wisdom",
            NamedRace::UltimateMagus => "Ultimate Magus",
            NamedRace::Ares => "Ares, God of War",
            NamedRace::Hera => "Hera, Queen of Olympus",
            NamedRace::Apollo => "Apollo, God of Light",
            NamedRace::Artemis => "Artemis, Goddess of the Hunt",
            NamedRace::Fenghuang => "Fenghuang",
            NamedRace::Hephaestus => "Hephaestus, the Smith",
            NamedRace::SpellwarpAutomaton => "Spellwarp automaton",
            NamedRace::Hermes => "Hermes, the Messenger",
            NamedRace::MagicMushroom => "Magic mushroom patch",
            NamedRace::DeathBeast => "Death beast",
            NamedRace::Demeter => "Demeter, Goddess of the Harvest",
            NamedRace::Ent => "Ent",
            NamedRace::Rolento => "Rolento",
            NamedRace::Shuryuudan => "Shuryuudan",
            NamedRace::Bullgates => "Bull Gates",
            NamedRace::Ie => "Internet Exploder",
            NamedRace::Caldarm => "Caldarm",
            NamedRace::LockeClone => "Locke clone",
            NamedRace::Talos => "Talos",
            NamedRace::BanorRupart => "Banor=Rupart",
            NamedRace::Banor => "Banor",
            NamedRace::Lupart => "Lupart",
            NamedRace::Ninja => "Ninja",
            NamedRace::Jaian => "Jaian",
            NamedRace::Botei => "Botei",
        }
    }

    pub fn from_species_name(name: &str) -> Option<Self> {
        Self::iter().find(|n| n.species_name() == name)
    }
}

/// A species definition. Spells are shared by every monster of the species.
#[derive(Debug, Clone)]
pub struct MonsterRace {
    pub id: RaceId,
    pub name: String,
    pub named: Option<NamedRace>,
    pub symbol: char,
    pub level: i32,
    pub flags: RaceFlags,
    pub hit_dice: Dice,
    pub spells: Option<Arc<Repertoire>>,
}

impl MonsterRace {
    pub fn new(id: RaceId, name: impl Into<String>, symbol: char, level: i32) -> Self {
        let name = name.into();
        Self {
            id,
            named: NamedRace::from_species_name(&name),
            name,
            symbol,
            level,
            flags: RaceFlags::empty(),
            hit_dice: Dice::default(),
            spells: None,
        }
    }

    pub fn is_smart(&self) -> bool {
        self.flags.contains(RaceFlags::SMART)
    }

    pub fn is_stupid(&self) -> bool {
        self.flags.contains(RaceFlags::STUPID)
    }

    pub fn is_named(&self, named: NamedRace) -> bool {
        self.named == Some(named)
    }

    pub fn possessive(&self) -> &'static str {
        if self.flags.contains(RaceFlags::MALE) {
            "his"
        } else if self.flags.contains(RaceFlags::FEMALE) {
            "her"
        } else {
            "its"
        }
    }

    pub fn reflexive(&self) -> &'static str {
        if self.flags.contains(RaceFlags::MALE) {
            "himself"
        } else if self.flags.contains(RaceFlags::FEMALE) {
            "herself"
        } else {
            "itself"
        }
    }

    /// Hit points of a typical member of the species
    pub fn average_hp(&self) -> i32 {
        if self.flags.contains(RaceFlags::FORCE_MAXHP) {
            self.hit_dice.max()
        } else {
            self.hit_dice.average()
        }
    }
}

/// Spell casts the player has witnessed, per species
#[derive(Debug, Clone, Default)]
pub struct SpellLore {
    casts: HashMap<(RaceId, SpellId), i16>,
    failures: HashMap<RaceId, u32>,
}

impl SpellLore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cast(&mut self, race: RaceId, spell: SpellId) {
        let count = self.casts.entry((race, spell)).or_insert(0);
        *count = count.saturating_add(1);
    }

    pub fn record_failure(&mut self, race: RaceId) {
        *self.failures.entry(race).or_insert(0) += 1;
    }

    pub fn casts(&self, race: RaceId, spell: SpellId) -> i16 {
        self.casts.get(&(race, spell)).copied().unwrap_or(0)
    }

    pub fn failures(&self, race: RaceId) -> u32 {
        self.failures.get(&race).copied().unwrap_or(0)
    }

    /// Spells of `race` the player has seen at least once
    pub fn known_spells(&self, race: RaceId) -> impl Iterator<Item = SpellId> + '_ {
        self.casts
            .iter()
            .filter(move |((r, _), n)| *r == race && **n > 0)
            .map(|((_, id), _)| *id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spell::{SpellCategory, id::heal};

    #[test]
    fn test_named_lookup() {
        assert_eq!(NamedRace::from_species_name("Banor=Rupart"), Some(NamedRace::BanorRupart));
        assert_eq!(NamedRace::from_species_name("Kobold"), None);
        for named in NamedRace::iter() {
            assert_eq!(NamedRace::from_species_name(named.species_name()), Some(named));
        }
    }

    #[test]
    fn test_new_resolves_named() {
        let race = MonsterRace::new(RaceId(7), "Rolento", 'p', 40);
        assert!(race.is_named(NamedRace::Rolento));
        assert_eq!(race.possessive(), "its");
    }

    #[test]
    fn test_average_hp() {
        let mut race = MonsterRace::new(RaceId(1), "Orc captain", 'o', 20);
        race.hit_dice = Dice::new(10, 10, 0);
        assert_eq!(race.average_hp(), 55);
        race.flags |= RaceFlags::FORCE_MAXHP;
        assert_eq!(race.average_hp(), 100);
    }

    #[test]
    fn test_lore_saturates() {
        let mut lore = SpellLore::new();
        let id = SpellId::new(SpellCategory::Heal, heal::SELF);
        let race = RaceId(3);
        for _ in 0..5 {
            lore.record_cast(race, id);
        }
        assert_eq!(lore.casts(race, id), 5);
        assert_eq!(lore.casts(RaceId(4), id), 0);
        lore.casts.insert((race, id), i16::MAX);
        lore.record_cast(race, id);
        assert_eq!(lore.casts(race, id), i16::MAX);
        assert_eq!(lore.known_spells(race).count(), 1);
    }
}
