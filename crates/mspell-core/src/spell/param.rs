//! Spell damage and count parameters
//!
//! Each category has a fixed parameter shape: breaths scale with the
//! caster's current HP, most other categories roll dice, and the rest take
//! no parameter at all. The shape is chosen by [`default_param`] and an
//! override may change the numbers but never the shape.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::ParseError;
use crate::rng::GameRng;

use super::effect::Effect;
use super::id::{SpellCategory, SpellId, heal, tactic};
use super::summon::SummonKind;

/// `dd`d`ds` + `base`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Dice {
    pub dd: u32,
    pub ds: u32,
    pub base: i32,
}

impl Dice {
    pub const fn new(dd: u32, ds: u32, base: i32) -> Self {
        Self { dd, ds, base }
    }

    pub const fn flat(base: i32) -> Self {
        Self::new(0, 0, base)
    }

    pub fn roll(&self, rng: &mut GameRng) -> i32 {
        saturate(i64::from(self.base) + i64::from(rng.damroll(self.dd, self.ds)))
    }

    /// Expected value, rounded down
    pub const fn average(&self) -> i32 {
        if self.dd == 0 || self.ds == 0 {
            return self.base;
        }
        saturate(self.base as i64 + self.dd as i64 * (self.ds as i64 + 1) / 2)
    }

    pub const fn max(&self) -> i32 {
        saturate(self.base as i64 + self.dd as i64 * self.ds as i64)
    }
}

const fn saturate(value: i64) -> i32 {
    if value > i32::MAX as i64 {
        i32::MAX
    } else if value < i32::MIN as i64 {
        i32::MIN
    } else {
        value as i32
    }
}

/// `pct`% of the caster's current HP, capped at `max`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct HpPct {
    pub pct: u32,
    pub max: i32,
}

impl HpPct {
    pub const fn new(pct: u32, max: i32) -> Self {
        Self { pct, max }
    }

    pub fn damage(&self, hp: i32) -> i32 {
        let raw = i64::from(hp.max(0)) * i64::from(self.pct) / 100;
        raw.min(i64::from(self.max)) as i32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SpellParam {
    #[default]
    None,
    Dice(Dice),
    HpPct(HpPct),
}

/// The shape of a [`SpellParam`], for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ParamKind {
    #[strum(serialize = "no")]
    None,
    #[strum(serialize = "dice")]
    Dice,
    #[strum(serialize = "hit point percentage")]
    HpPct,
}

impl SpellParam {
    pub const fn kind(&self) -> ParamKind {
        match self {
            SpellParam::None => ParamKind::None,
            SpellParam::Dice(_) => ParamKind::Dice,
            SpellParam::HpPct(_) => ParamKind::HpPct,
        }
    }

    pub const fn dice(&self) -> Option<Dice> {
        match self {
            SpellParam::Dice(d) => Some(*d),
            _ => None,
        }
    }

    pub const fn hp_pct(&self) -> Option<HpPct> {
        match self {
            SpellParam::HpPct(h) => Some(*h),
            _ => None,
        }
    }

    /// Apply one parenthesized override: `P%`, `NdM+K`, `NdM-K`, `NdM` or `K`.
    ///
    /// `token` is only used to describe errors.
    pub fn apply_override(&mut self, token: &str, arg: &str) -> Result<(), ParseError> {
        let arg = arg.trim();
        let malformed = || ParseError::MalformedArgument {
            token: token.to_string(),
            arg: arg.to_string(),
        };
        let mismatch = |expected: ParamKind| ParseError::IncompatibleOverride {
            token: token.to_string(),
            arg: arg.to_string(),
            expected,
        };

        if let Some(pct) = arg.strip_suffix('%') {
            let pct: i32 = pct.parse().map_err(|_| malformed())?;
            return match self {
                SpellParam::HpPct(h) => {
                    h.pct = pct.clamp(0, 100) as u32;
                    Ok(())
                }
                other => Err(mismatch(other.kind())),
            };
        }

        let dice = parse_dice(arg).ok_or_else(malformed)?;
        match self {
            SpellParam::Dice(d) => {
                *d = dice;
                Ok(())
            }
            other => Err(mismatch(other.kind())),
        }
    }
}

/// Dice counts and sides are bytes in spell data.
const MAX_DICE: u32 = 255;

fn parse_dice(arg: &str) -> Option<Dice> {
    let Some((dd, rest)) = arg.split_once('d') else {
        return arg.parse().ok().map(Dice::flat);
    };
    let dd: u32 = dd.parse().ok()?;
    let (ds, base) = match rest.find(['+', '-']) {
        Some(at) => {
            let (ds, base) = rest.split_at(at);
            let base = base.strip_prefix('+').unwrap_or(base);
            (ds.parse::<u32>().ok()?, base.parse::<i32>().ok()?)
        }
        None => (rest.parse::<u32>().ok()?, 0),
    };
    if dd > MAX_DICE || ds > MAX_DICE {
        return None;
    }
    Some(Dice::new(dd, ds, base))
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rolls = self.dd > 0 && self.ds > 0;
        if rolls {
            write!(f, "{}d{}", self.dd, self.ds)?;
        }
        match (rolls, self.base) {
            (true, 0) => Ok(()),
            (true, b) if b > 0 => write!(f, "+{b}"),
            (_, b) => write!(f, "{b}"),
        }
    }
}

impl fmt::Display for HpPct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}% up to {}", self.pct, self.max)
    }
}

impl fmt::Display for SpellParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpellParam::None => Ok(()),
            SpellParam::Dice(d) => d.fmt(f),
            SpellParam::HpPct(h) => h.fmt(f),
        }
    }
}

/// Default parameter for a spell cast by a caster of level `rlev`.
pub fn default_param(id: SpellId, rlev: i32) -> SpellParam {
    match id.category {
        SpellCategory::Breath => SpellParam::HpPct(breath_param(id.effect)),
        SpellCategory::Ball => SpellParam::Dice(ball_param(id.effect, rlev)),
        SpellCategory::Bolt => SpellParam::Dice(bolt_param(id.effect, rlev)),
        SpellCategory::Beam => SpellParam::Dice(beam_param(id.effect, rlev)),
        SpellCategory::Curse => SpellParam::Dice(curse_param(id.effect)),
        SpellCategory::Heal => SpellParam::Dice(heal_param(id.effect, rlev)),
        SpellCategory::Summon => SpellParam::Dice(summon_param(id.effect)),
        SpellCategory::Tactic if id.effect < tactic::BLINK => SpellParam::Dice(Dice::flat(rlev)),
        _ => SpellParam::None,
    }
}

fn breath_param(code: i16) -> HpPct {
    use Effect::*;
    match Effect::from_code(code) {
        Some(Acid | Elec | Fire | Cold) => HpPct::new(20, 900),
        Some(Pois | Nuke) => HpPct::new(17, 600),
        Some(Nether) => HpPct::new(14, 550),
        Some(Lite | Dark | Confusion) => HpPct::new(17, 400),
        Some(Sound) => HpPct::new(17, 450),
        Some(Chaos) => HpPct::new(17, 600),
        Some(Disenchant | Shards) => HpPct::new(17, 500),
        Some(Nexus) => HpPct::new(33, 250),
        Some(Storm) => HpPct::new(13, 300),
        Some(Inertia | Plasma | HellFire | HolyFire) => HpPct::new(17, 200),
        Some(Gravity | Force) => HpPct::new(33, 200),
        Some(Mana) => HpPct::new(33, 250),
        Some(Disintegrate) => HpPct::new(17, 150),
        Some(Time) => HpPct::new(33, 150),
        other => {
            tracing::warn!(effect = code, name = ?other, "unsupported breath effect");
            HpPct::default()
        }
    }
}

fn ball_param(code: i16, rlev: i32) -> Dice {
    use Effect::*;
    let r = rlev.max(0);
    let sides = |n: i32| n.max(0) as u32;
    match Effect::from_code(code) {
        Some(Acid) => Dice::new(1, sides(3 * r), 15),
        Some(Elec) => Dice::new(1, sides(3 * r / 2), 8),
        Some(Fire) => Dice::new(1, sides(7 * r / 2), 10),
        Some(Cold) => Dice::new(1, sides(3 * r / 2), 10),
        Some(Pois) => Dice::new(12, 2, 0),
        Some(Nuke) => Dice::new(10, 6, r),
        Some(Nether) => Dice::new(10, 10, 50 + r),
        Some(Dark | Lite | Mana) => Dice::new(10, 10, 50 + 4 * r),
        Some(Chaos) => Dice::new(10, 10, r),
        Some(Water) => Dice::new(1, sides(r), 50),
        Some(DrainMana) => Dice::flat(1 + r / 2),
        Some(MindBlast) => Dice::new(7, 7, 0),
        Some(BrainSmash) => Dice::new(12, 12, 0),
        Some(Telekinesis) => Dice::new(8, 8, 0),
        Some(Rock) => Dice::flat(3 * r),
        Some(Rocket) => Dice::flat(6 * r),
        _ => Dice::new(5, 5, r),
    }
}

fn bolt_param(code: i16, rlev: i32) -> Dice {
    use Effect::*;
    let r = rlev.max(0);
    match Effect::from_code(code) {
        Some(Acid) => Dice::new(7, 8, r / 3),
        Some(Elec) => Dice::new(4, 8, r / 3),
        Some(Fire) => Dice::new(9, 8, r / 3),
        Some(Cold) => Dice::new(6, 8, r / 3),
        Some(Ice) => Dice::new(6, 8, r),
        Some(Nether) => Dice::new(5, 5, 30 + r),
        Some(Water) => Dice::new(10, 10, r),
        Some(Plasma) => Dice::new(8, 7, 10 + r),
        Some(Mana) => Dice::new(1, (7 * r / 2) as u32, 50),
        Some(Missile) => Dice::new(2, 6, r / 3),
        // Gazes and arrows always carry an override in the data.
        Some(Attack | Arrow) => Dice::default(),
        other => {
            tracing::warn!(effect = code, name = ?other, "no default damage for bolt");
            Dice::default()
        }
    }
}

fn beam_param(code: i16, rlev: i32) -> Dice {
    let r = rlev.max(0);
    match Effect::from_code(code) {
        Some(Effect::PsySpear) => Dice::new(1, (r * 3 / 2) as u32, 100),
        Some(Effect::HellFire | Effect::HolyFire) => Dice::flat(2 * r),
        other => {
            tracing::warn!(effect = code, name = ?other, "no default damage for beam");
            Dice::default()
        }
    }
}

fn curse_param(code: i16) -> Dice {
    match Effect::from_code(code) {
        Some(Effect::Cause1) => Dice::new(3, 8, 0),
        Some(Effect::Cause2) => Dice::new(8, 8, 0),
        Some(Effect::Cause3) => Dice::new(10, 15, 0),
        Some(Effect::Cause4) => Dice::new(15, 15, 0),
        // A percentage of the target's current HP
        Some(Effect::HandDoom) => Dice::new(1, 20, 40),
        other => {
            tracing::warn!(effect = code, name = ?other, "no default damage for curse");
            Dice::default()
        }
    }
}

fn heal_param(code: i16, rlev: i32) -> Dice {
    match code {
        heal::SELF => Dice::flat(rlev.max(0) * 6),
        _ => Dice::default(),
    }
}

fn summon_param(code: i16) -> Dice {
    match SummonKind::from_code(code) {
        Some(SummonKind::Cyber) => Dice::new(1, 3, 0),
        _ => Dice::new(1, 3, 1),
    }
}
