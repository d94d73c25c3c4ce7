//! Species table
//!
//! Spell lines use the same token grammar as the engine's parser: `|`
//! separated spell tokens with optional `(NdM+K)` or `(P%)` overrides, a
//! `1_IN_<n>` cast frequency and an optional `POWER_<p>%` damage scale.

use mspell_core::race::RaceFlags;

const NONE: RaceFlags = RaceFlags::empty();
const UNIQUE_M: RaceFlags = RaceFlags::UNIQUE.union(RaceFlags::MALE);
const UNIQUE_F: RaceFlags = RaceFlags::UNIQUE.union(RaceFlags::FEMALE);
const SMART_M: RaceFlags = UNIQUE_M.union(RaceFlags::SMART).union(RaceFlags::FORCE_MAXHP);
const SMART_F: RaceFlags = UNIQUE_F.union(RaceFlags::SMART).union(RaceFlags::FORCE_MAXHP);

/// One species as written in the data
#[derive(Debug, Clone, Copy)]
pub struct SpeciesDef {
    pub name: &'static str,
    pub symbol: char,
    pub level: i32,
    /// Hit dice count and sides
    pub hit_dice: (u32, u32),
    pub flags: RaceFlags,
    /// Spell line; empty for species that never cast
    pub spells: &'static str,
}

impl SpeciesDef {
    pub const fn new(
        name: &'static str,
        symbol: char,
        level: i32,
        hit_dice: (u32, u32),
        flags: RaceFlags,
        spells: &'static str,
    ) -> Self {
        Self {
            name,
            symbol,
            level,
            hit_dice,
            flags,
            spells,
        }
    }

    pub fn is_caster(&self) -> bool {
        !self.spells.is_empty()
    }
}

pub static SPECIES: &[SpeciesDef] = &[
    // Ordinary casters
    SpeciesDef::new("kobold shaman", 'k', 4, (11, 10), RaceFlags::MALE,
        "1_IN_5 | MISSILE | CONFUSE"),
    SpeciesDef::new("cutpurse", 'p', 2, (4, 4), RaceFlags::MALE, ""),
    SpeciesDef::new("dark elven priest", 'h', 18, (7, 10), RaceFlags::MALE.union(RaceFlags::SMART),
        "1_IN_5 | BLIND | CAUSE_2 | CONFUSE | DARKNESS | HEAL | SCARE"),
    SpeciesDef::new("dark elven sorceror", 'h', 40, (52, 10), RaceFlags::MALE.union(RaceFlags::SMART),
        "1_IN_3 | BA_FIRE | BA_COLD | BA_POIS | BLIND | BLINK | BO_ACID | BO_FIRE | BO_COLD | \
         CONFUSE | DARKNESS | HASTE | HEAL | S_DEMON | S_UNDEAD | TELE_SELF | TELE_TO"),
    SpeciesDef::new("illusionist", 'p', 14, (12, 8), RaceFlags::MALE,
        "1_IN_3 | BLIND | BLINK | CONFUSE | DARKNESS | HASTE | PARALYZE | TELE_SELF"),
    SpeciesDef::new("mage", 'p', 28, (15, 8), RaceFlags::MALE.union(RaceFlags::SMART),
        "1_IN_3 | BLIND | BLINK | BO_ELEC | BO_FIRE | BO_COLD | CONFUSE | HASTE | \
         S_MONSTER | TELE_SELF | TELE_TO"),
    SpeciesDef::new("master mystic", 'p', 50, (35, 100), RaceFlags::MALE.union(RaceFlags::SMART),
        "1_IN_3 | BLIND | CONFUSE | HEAL | S_ANIMAL | S_SPIDER | S_HOUND | SLOW | TELE_TO"),
    SpeciesDef::new("necromancer", 'p', 36, (28, 10), RaceFlags::MALE.union(RaceFlags::SMART),
        "1_IN_3 | ANIM_DEAD | BLIND | BLINK | BO_NETH | CAUSE_3 | SCARE | S_UNDEAD | \
         TELE_LEVEL | TELE_TO"),
    SpeciesDef::new("mind flayer", 'h', 22, (15, 10), RaceFlags::MALE.union(RaceFlags::SMART),
        "1_IN_8 | BLIND | BRAIN_SMASH | MIND_BLAST | PARALYZE | SCARE"),
    SpeciesDef::new("gnome mage", 'h', 6, (7, 8), RaceFlags::MALE,
        "1_IN_4 | BLINK | BO_COLD | DARKNESS | S_MONSTER"),
    SpeciesDef::new("orc archer", 'o', 12, (11, 10), RaceFlags::MALE,
        "1_IN_3 | SHOOT(4d6)"),
    SpeciesDef::new("ogre shaman", 'O', 30, (14, 10), RaceFlags::MALE,
        "1_IN_5 | BO_FIRE | HOLD | SCARE | TELE_SELF | TRAPS | BA_FIRE | S_MONSTER"),
    SpeciesDef::new("stone giant", 'P', 33, (35, 10), RaceFlags::MALE,
        "1_IN_5 | THROW(42d1)"),
    SpeciesDef::new("grave wight", 'W', 30, (12, 10), RaceFlags::UNDEAD.union(RaceFlags::HURT_LITE),
        "1_IN_8 | CAUSE_3 | DARKNESS | SCARE"),
    SpeciesDef::new("lich", 'L', 34, (30, 10), RaceFlags::UNDEAD.union(RaceFlags::SMART),
        "1_IN_4 | BLINK | BLIND | CAUSE_3 | DRAIN_MANA | HOLD | SCARE | SLOW | TELE_TO | TRAPS"),
    SpeciesDef::new("Archlich", 'L', 70, (50, 100), RaceFlags::UNDEAD.union(RaceFlags::SMART),
        "1_IN_2 | BA_NETH | BLIND | BRAIN_SMASH | CAUSE_4 | DRAIN_MANA | HAND_DOOM | HOLD | \
         S_HI_UNDEAD | TELE_TO"),
    SpeciesDef::new("floating eye", 'e', 1, (11, 8), RaceFlags::STUPID,
        "1_IN_11 | GAZE(1d5) | HOLD"),
    SpeciesDef::new("dread", 'G', 40, (25, 20), RaceFlags::UNDEAD,
        "1_IN_15 | BLIND | BO_NETH | CONFUSE | DRAIN_MANA | HOLD"),
    SpeciesDef::new("cyberdemon", 'U', 60, (100, 80), NONE,
        "1_IN_4 | ROCKET | S_CYBER"),
    SpeciesDef::new("shrieker mushroom patch", ',', 2, (1, 1), RaceFlags::STUPID,
        "1_IN_4 | SHRIEK"),
    SpeciesDef::new("ghoul king", 'z', 45, (60, 20), RaceFlags::UNDEAD.union(RaceFlags::SMART),
        "1_IN_4 | S_KIN | SCARE | HOLD | DARKNESS"),
    SpeciesDef::new("time hound", 'Z', 51, (15, 10), NONE,
        "1_IN_8 | BR_TIME"),
    SpeciesDef::new("energy hound", 'Z', 18, (6, 10), NONE,
        "1_IN_10 | BR_ELEC"),
    SpeciesDef::new("mature red dragon", 'd', 37, (30, 10), RaceFlags::FORCE_MAXHP,
        "1_IN_9 | BR_FIRE | CONFUSE | SCARE"),
    SpeciesDef::new("great hell wyrm", 'D', 80, (45, 100), RaceFlags::FORCE_MAXHP.union(RaceFlags::SMART),
        "1_IN_3 | BR_FIRE | CONFUSE | S_HI_DRAGON | SCARE | BLIND"),
    SpeciesDef::new("great wyrm of chaos", 'D', 76, (65, 100), RaceFlags::FORCE_MAXHP.union(RaceFlags::SMART),
        "1_IN_3 | BR_CHAO | BR_DISE | BR_SOUN | BR_SHAR | CONFUSE | S_HI_DRAGON | SCARE"),
    SpeciesDef::new("eagle", 'B', 20, (14, 10), NONE,
        "1_IN_4 | SPECIAL"),
    SpeciesDef::new("crebain", 'B', 16, (3, 5), NONE,
        "1_IN_10 | SHRIEK"),
    SpeciesDef::new("storm giant", 'P', 50, (38, 10), RaceFlags::MALE,
        "1_IN_8 | BLINK | BO_ELEC | BA_ELEC | TELE_TO | JMP_ELEC"),
    SpeciesDef::new("master quylthulg", 'Q', 60, (20, 10), RaceFlags::SMART,
        "1_IN_2 | BLINK | S_MONSTER | S_UNDEAD | S_DRAGON | S_HI_UNDEAD | S_HI_DRAGON"),
    SpeciesDef::new("Grand master mystic", 'p', 95, (77, 100), SMART_M,
        "1_IN_2 | BA_MANA | BO_PLAS | HASTE | HEAL | INVULN | PSY_SPEAR | S_ANIMAL | S_UNIQUE | \
         TELE_LEVEL | WORLD | POWER_120%"),
    // Uniques with their own summons and spells
    SpeciesDef::new("Santa Claus", 'h', 40, (100, 10), SMART_M,
        "1_IN_4 | BLINK | HEAL | S_SPECIAL | TELE_TO"),
    SpeciesDef::new("Reindeer", 'q', 15, (20, 10), NONE, ""),
    SpeciesDef::new("Zeus, Lord of Olympus", 'P', 99, (100, 100), SMART_M,
        "1_IN_2 | BA_ELEC(400) | BO_ELEC(800) | BR_ELEC(25%) | HASTE | S_SPECIAL | \
         S_OLYMPIAN | TELE_TO"),
    SpeciesDef::new("Shambler", 'E', 42, (50, 20), NONE,
        "1_IN_8 | BA_ELEC"),
    SpeciesDef::new("Poseidon, Lord of the Seas", 'P', 98, (95, 100), SMART_M,
        "1_IN_2 | BA_WATER(300) | BO_WATER | BR_STORM(25%) | HASTE | S_SPECIAL | S_OLYMPIAN"),
    SpeciesDef::new("Greater kraken", 'l', 55, (60, 50), NONE,
        "1_IN_6 | BA_WATER"),
    SpeciesDef::new("Hades, Lord of the Underworld", 'P', 97, (95, 100), SMART_M,
        "1_IN_2 | BA_NETH(500) | BR_NETH(25%) | BR_CHAO(25%) | S_SPECIAL | S_HI_UNDEAD | \
         HAND_DOOM | TELE_TO"),
    SpeciesDef::new("Greater Balrog", 'U', 85, (60, 100), RaceFlags::MALE,
        "1_IN_4 | BR_FIRE | BR_PLAS | S_DEMON"),
    SpeciesDef::new("Athena, Goddess of Wisdom", 'P', 95, (90, 100), SMART_F,
        "1_IN_2 | BA_LITE | BLINK | HEAL | S_SPECIAL | S_OLYMPIAN | TELE_TO"),
    SpeciesDef::new("Ultimate Magus", 'p', 90, (60, 100), SMART_M,
        "1_IN_2 | BA_MANA | BA_CHAOS | BLINK | HASTE | HEAL | S_MONSTERS | TELE_LEVEL"),
    SpeciesDef::new("Ares, God of War", 'P', 94, (90, 100), SMART_M,
        "1_IN_3 | BO_MISSILE | BR_SOUN(20%) | HASTE | S_SPECIAL"),
    SpeciesDef::new("Hera, Queen of Olympus", 'P', 96, (90, 100), SMART_F,
        "1_IN_2 | BA_CHAOS | BRAIN_SMASH | HASTE | HEAL | S_SPECIAL | S_OLYMPIAN | TELE_LEVEL"),
    SpeciesDef::new("Apollo, God of Light", 'P', 93, (90, 100), SMART_M,
        "1_IN_2 | BA_LITE | BR_LITE(25%) | BLIND | HEAL | S_SPECIAL"),
    SpeciesDef::new("Artemis, Goddess of the Hunt", 'P', 92, (90, 100), SMART_F,
        "1_IN_2 | SHOOT(6d12) | HASTE | S_SPECIAL | S_ANIMAL"),
    SpeciesDef::new("Fenghuang", 'B', 60, (40, 40), NONE,
        "1_IN_4 | BR_FIRE | BR_LITE"),
    SpeciesDef::new("Hephaestus, the Smith", 'P', 93, (95, 100), SMART_M,
        "1_IN_3 | BA_FIRE | BO_PLAS | S_SPECIAL"),
    SpeciesDef::new("Spellwarp automaton", 'g', 45, (40, 40), RaceFlags::STUPID, ""),
    SpeciesDef::new("Hermes, the Messenger", 'P', 91, (85, 100), SMART_M,
        "1_IN_2 | BLINK | BLINK_OTHER | HASTE | S_SPECIAL | TELE_OTHER | TELE_TO"),
    SpeciesDef::new("Magic mushroom patch", ',', 15, (1, 1), RaceFlags::STUPID,
        "1_IN_1 | BLINK | SCARE | CONFUSE | DARKNESS"),
    SpeciesDef::new("Death beast", 'q', 60, (100, 20), NONE, ""),
    SpeciesDef::new("Demeter, Goddess of the Harvest", 'P', 90, (85, 100), SMART_F,
        "1_IN_3 | HEAL | S_SPECIAL | S_ANIMAL"),
    SpeciesDef::new("Ent", 'l', 45, (80, 30), NONE, ""),
    SpeciesDef::new("Rolento", 'p', 30, (40, 20), UNIQUE_M,
        "1_IN_3 | BA_FIRE | S_SPECIAL"),
    SpeciesDef::new("Shuryuudan", 's', 20, (3, 7), RaceFlags::STUPID, ""),
    SpeciesDef::new("Bull Gates", 'p', 15, (20, 10), UNIQUE_M,
        "1_IN_5 | S_SPECIAL | HEAL"),
    SpeciesDef::new("Internet Exploder", 'v', 4, (3, 3), RaceFlags::STUPID, ""),
    SpeciesDef::new("Caldarm", 'p', 38, (30, 20), UNIQUE_M,
        "1_IN_4 | S_SPECIAL | BO_FIRE"),
    SpeciesDef::new("Locke clone", 'p', 20, (12, 10), RaceFlags::MALE, ""),
    SpeciesDef::new("Talos", 'g', 50, (50, 20), UNIQUE_M,
        "1_IN_4 | S_SPECIAL | BO_FIRE"),
    SpeciesDef::new("Banor=Rupart", 'p', 60, (60, 100), SMART_M,
        "1_IN_4 | BA_NUKE | BA_CHAOS | BLINK | HASTE | SPECIAL"),
    SpeciesDef::new("Banor", 'p', 50, (40, 100), SMART_M,
        "1_IN_4 | BA_NUKE | BLINK | SPECIAL"),
    SpeciesDef::new("Lupart", 'p', 50, (40, 100), SMART_M,
        "1_IN_4 | BA_CHAOS | BLINK | SPECIAL"),
    SpeciesDef::new("Ninja", 'p', 25, (15, 10), RaceFlags::MALE,
        "1_IN_3 | SHOOT(3d8)"),
    SpeciesDef::new("Jaian", 'p', 12, (20, 10), UNIQUE_M,
        "1_IN_3 | BR_SOUN"),
    SpeciesDef::new("Botei", 'p', 20, (30, 10), UNIQUE_M,
        "1_IN_3 | BR_SHAR"),
];

pub fn num_species() -> usize {
    SPECIES.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mspell_core::race::NamedRace;

    #[test]
    fn test_names_unique() {
        let mut names: Vec<_> = SPECIES.iter().map(|s| s.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), SPECIES.len());
    }

    #[test]
    fn test_named_races_present() {
        let named = SPECIES
            .iter()
            .filter(|s| NamedRace::from_species_name(s.name).is_some())
            .count();
        assert!(named >= 30);
        assert!(SPECIES.iter().any(|s| s.name == NamedRace::BanorRupart.species_name()));
        assert!(SPECIES.iter().any(|s| s.name == NamedRace::Reindeer.species_name()));
    }

    #[test]
    fn test_casters() {
        let mage = SPECIES.iter().find(|s| s.name == "mage").unwrap();
        assert!(mage.is_caster());
        let reindeer = SPECIES.iter().find(|s| s.name == "Reindeer").unwrap();
        assert!(!reindeer.is_caster());
    }
}
