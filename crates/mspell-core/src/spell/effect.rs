//! Projection effects (the `GF_*` family) and player resistances

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, FromRepr, IntoEnumIterator};

use crate::color::Color;

/// What a projection does when it lands.
///
/// The discriminants are stable: spell lore is keyed by them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, FromRepr,
)]
#[repr(i16)]
pub enum Effect {
    Elec = 1,
    Pois = 2,
    Acid = 3,
    Cold = 4,
    Fire = 5,
    PsySpear = 9,
    Missile = 10,
    Arrow = 11,
    Plasma = 12,
    Water = 14,
    Lite = 15,
    Dark = 16,
    Shards = 20,
    Sound = 21,
    Confusion = 22,
    Force = 23,
    Inertia = 24,
    Mana = 26,
    Meteor = 27,
    Ice = 28,
    Chaos = 30,
    Nether = 31,
    Disenchant = 32,
    Nexus = 33,
    Time = 34,
    Gravity = 35,
    OldPoly = 52,
    Rocket = 72,
    Nuke = 73,
    HolyFire = 79,
    HellFire = 80,
    Disintegrate = 81,
    Telekinesis = 87,
    DrainMana = 91,
    MindBlast = 92,
    BrainSmash = 93,
    Cause1 = 94,
    Cause2 = 95,
    Cause3 = 96,
    Cause4 = 97,
    HandDoom = 98,
    AnimDead = 100,
    Attack = 103,
    LavaFlow = 108,
    WaterFlow = 113,
    Antimagic = 135,
    Rock = 136,
    Amnesia = 138,
    Storm = 141,
    Paralysis = 145,
}

/// Display and resistance data for one effect
#[derive(Debug, Clone, Copy)]
pub struct EffectInfo {
    pub effect: Effect,
    pub name: &'static str,
    pub color: Color,
    pub resist: Option<Resist>,
    /// Suffixes accepted after `BR_`, `BA_`, `BO_` and `JMP_`
    pub tokens: &'static [&'static str],
}

macro_rules! gf {
    ($effect:ident, $name:literal, $color:ident, $resist:expr, [$($tok:literal),+]) => {
        EffectInfo {
            effect: Effect::$effect,
            name: $name,
            color: Color::$color,
            resist: $resist,
            tokens: &[$($tok),+],
        }
    };
}

static EFFECTS: &[EffectInfo] = &[
    gf!(Acid, "Acid", Green, Some(Resist::Acid), ["ACID"]),
    gf!(Elec, "Lightning", Blue, Some(Resist::Elec), ["ELEC"]),
    gf!(Fire, "Fire", Red, Some(Resist::Fire), ["FIRE"]),
    gf!(Cold, "Frost", LightWhite, Some(Resist::Cold), ["COLD"]),
    gf!(Pois, "Poison", LightGreen, Some(Resist::Pois), ["POIS"]),
    gf!(Lite, "Light", Yellow, Some(Resist::Lite), ["LITE", "LIGHT"]),
    gf!(Dark, "Dark", LightDark, Some(Resist::Dark), ["DARK"]),
    gf!(Confusion, "Confusion", LightUmber, Some(Resist::Conf), ["CONF", "CONFUSION"]),
    gf!(Nether, "Nether", LightDark, Some(Resist::Nether), ["NETH", "NETHER"]),
    gf!(Nexus, "Nexus", Violet, Some(Resist::Nexus), ["NEXU", "NEXUS"]),
    gf!(Sound, "Sound", Orange, Some(Resist::Sound), ["SOUN", "SOUND"]),
    gf!(Shards, "Shards", LightUmber, Some(Resist::Shards), ["SHAR", "SHARDS"]),
    gf!(Chaos, "Chaos", Violet, Some(Resist::Chaos), ["CHAO", "CHAOS"]),
    gf!(Disenchant, "Disenchantment", Violet, Some(Resist::Disen), ["DISE", "DISEN", "DISENCHANT"]),
    gf!(Time, "Time", LightBlue, Some(Resist::Time), ["TIME"]),
    gf!(Mana, "Mana", LightBlue, None, ["MANA"]),
    gf!(Gravity, "Gravity", LightUmber, None, ["GRAV", "GRAVITY"]),
    gf!(Inertia, "Inertia", LightUmber, None, ["INER", "INERT", "INERTIA"]),
    gf!(Plasma, "Plasma", LightRed, None, ["PLAS", "PLASMA"]),
    gf!(Force, "Force", LightBlue, None, ["WALL", "FORCE"]),
    gf!(Nuke, "Toxic Waste", LightGreen, Some(Resist::Pois), ["NUKE"]),
    gf!(Disintegrate, "Disintegration", Slate, None, ["DISI", "DISINTEGRATE"]),
    gf!(Storm, "Storm Winds", Blue, None, ["STORM"]),
    gf!(HolyFire, "Holy Fire", Yellow, None, ["HOLY_FIRE"]),
    gf!(HellFire, "Hellfire", LightDark, None, ["HELL_FIRE"]),
    gf!(Ice, "Ice", LightWhite, Some(Resist::Cold), ["ICE"]),
    gf!(Water, "Water", LightBlue, None, ["WATE", "WATER"]),
    gf!(Meteor, "Meteor", Red, None, ["METEOR"]),
    gf!(Rocket, "Rocket", LightUmber, Some(Resist::Shards), ["ROCKET"]),
    gf!(Missile, "Magic Missile", Slate, None, ["MISSILE"]),
    gf!(Arrow, "Arrow", LightUmber, None, ["ARROW"]),
    gf!(PsySpear, "Psycho-Spear", LightBlue, None, ["PSY_SPEAR"]),
    gf!(Telekinesis, "Telekinesis", LightBlue, None, ["TELEKINESIS"]),
    gf!(DrainMana, "Drain Mana", LightBlue, None, ["DRAIN_MANA"]),
    gf!(MindBlast, "Mind Blast", LightBlue, None, ["MIND_BLAST"]),
    gf!(BrainSmash, "Brain Smash", LightBlue, None, ["BRAIN_SMASH"]),
    gf!(Cause1, "Cause Light Wounds", Red, None, ["CAUSE_1"]),
    gf!(Cause2, "Cause Serious Wounds", Red, None, ["CAUSE_2"]),
    gf!(Cause3, "Cause Critical Wounds", Red, None, ["CAUSE_3"]),
    gf!(Cause4, "Cause Mortal Wounds", Red, None, ["CAUSE_4"]),
    gf!(HandDoom, "Hand of Doom", Red, None, ["HAND_DOOM"]),
    gf!(AnimDead, "Animate Dead", LightDark, None, ["ANIM_DEAD"]),
    gf!(Attack, "Attack", Red, None, ["ATTACK"]),
    gf!(LavaFlow, "Lava", Red, None, ["LAVA_FLOW"]),
    gf!(WaterFlow, "Flowing Water", Blue, None, ["WATER_FLOW"]),
    gf!(Antimagic, "Anti-Magic", LightBlue, None, ["ANTIMAGIC"]),
    gf!(Rock, "Rock", LightUmber, None, ["ROCK"]),
    gf!(Amnesia, "Amnesia", LightBlue, None, ["AMNESIA"]),
    gf!(Paralysis, "Paralysis", Red, None, ["PARALYSIS"]),
    gf!(OldPoly, "Polymorph", Red, None, ["POLYMORPH"]),
];

impl Effect {
    pub fn info(self) -> &'static EffectInfo {
        // Every variant has a row; the fallback only guards a missed edit.
        EFFECTS
            .iter()
            .find(|info| info.effect == self)
            .unwrap_or(&EFFECTS[0])
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn color(self) -> Color {
        self.info().color
    }

    pub fn resist(self) -> Option<Resist> {
        self.info().resist
    }

    pub fn code(self) -> i16 {
        self as i16
    }

    pub fn from_code(code: i16) -> Option<Self> {
        Self::from_repr(code)
    }

    /// Look up a token suffix such as `FIRE` or `NETH`.
    pub fn parse_token(token: &str) -> Option<Self> {
        EFFECTS
            .iter()
            .find(|info| info.tokens.contains(&token))
            .map(|info| info.effect)
    }
}

/// Player resistance categories
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumCount,
    FromRepr,
)]
#[repr(u8)]
pub enum Resist {
    Acid = 0,
    Elec = 1,
    Fire = 2,
    Cold = 3,
    Pois = 4,
    Lite = 5,
    Dark = 6,
    Conf = 7,
    Nether = 8,
    Nexus = 9,
    Sound = 10,
    Shards = 11,
    Chaos = 12,
    Disen = 13,
    Time = 14,
    Blind = 15,
    Fear = 16,
    Teleport = 17,
}

impl Resist {
    /// High resistances are rarer, so partial protection counts for more.
    pub const fn is_high(self) -> bool {
        matches!(
            self,
            Resist::Lite
                | Resist::Dark
                | Resist::Nether
                | Resist::Nexus
                | Resist::Sound
                | Resist::Shards
                | Resist::Chaos
                | Resist::Disen
                | Resist::Time
        )
    }

    pub fn all() -> impl Iterator<Item = Resist> {
        Self::iter()
    }
}

bitflags! {
    /// Player defenses a monster has seen in action
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct SmartFlags: u32 {
        const ACID = 1 << 0;
        const ELEC = 1 << 1;
        const FIRE = 1 << 2;
        const COLD = 1 << 3;
        const POIS = 1 << 4;
        const LITE = 1 << 5;
        const DARK = 1 << 6;
        const CONF = 1 << 7;
        const NETHER = 1 << 8;
        const NEXUS = 1 << 9;
        const SOUND = 1 << 10;
        const SHARDS = 1 << 11;
        const CHAOS = 1 << 12;
        const DISEN = 1 << 13;
        const TIME = 1 << 14;
        const BLIND = 1 << 15;
        const FEAR = 1 << 16;
        const TELEPORT = 1 << 17;
        const FREE_ACTION = 1 << 24;
        const REFLECTION = 1 << 25;
    }
}

impl SmartFlags {
    pub const fn from_resist(res: Resist) -> Self {
        Self::from_bits_retain(1 << res as u32)
    }

    pub const fn knows(self, res: Resist) -> bool {
        self.contains(Self::from_resist(res))
    }
}

impl Serialize for SmartFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SmartFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u32::deserialize(deserializer)?;
        Ok(SmartFlags::from_bits_truncate(bits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_effect_has_info() {
        for effect in Effect::iter() {
            assert_eq!(effect.info().effect, effect, "{effect} missing from table");
        }
    }

    #[test]
    fn test_tokens_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for info in EFFECTS {
            for tok in info.tokens {
                assert!(seen.insert(*tok), "duplicate token {tok}");
            }
        }
    }

    #[test]
    fn test_parse_token() {
        assert_eq!(Effect::parse_token("FIRE"), Some(Effect::Fire));
        assert_eq!(Effect::parse_token("NETH"), Some(Effect::Nether));
        assert_eq!(Effect::parse_token("NETHER"), Some(Effect::Nether));
        assert_eq!(Effect::parse_token("PIZZA"), None);
    }

    #[test]
    fn test_codes_round_trip() {
        for effect in Effect::iter() {
            assert_eq!(Effect::from_code(effect.code()), Some(effect));
        }
        assert_eq!(Effect::from_code(6), None);
    }

    #[test]
    fn test_smart_flags_match_resists() {
        assert_eq!(SmartFlags::from_resist(Resist::Fire), SmartFlags::FIRE);
        assert_eq!(SmartFlags::from_resist(Resist::Teleport), SmartFlags::TELEPORT);
        assert!(SmartFlags::all().knows(Resist::Chaos));
        assert!(!SmartFlags::BLIND.knows(Resist::Conf));
    }

    #[test]
    fn test_high_resists() {
        assert!(Resist::Nether.is_high());
        assert!(!Resist::Fire.is_high());
        assert!(!Resist::Blind.is_high());
    }
}
