//! Wizard probe: what a caster would do right now
//!
//! Runs a selection engine without drawing and reports each group's and
//! each spell's share of the total weight, with the damage a spell would
//! deal on average against the current player.

use std::fmt;

use serde::Serialize;

use crate::cast::{CastContext, SpellAi};
use crate::color::strip_markup;
use crate::rng::GameRng;
use crate::spell::{Effect, Spell, SpellCategory, SpellId, SpellParam};
use crate::world::{MonsterId, Player, SpellWorld};

#[derive(Debug, Clone, Serialize)]
pub struct SpellReport {
    pub id: SpellId,
    pub name: String,
    pub weight: u32,
    /// Share of the total weight in tenths of a percent
    pub permille: u32,
    /// Dice, or the capped damage of an HP based breath
    pub param: String,
    pub average_damage: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupReport {
    pub category: SpellCategory,
    pub weight: u32,
    pub permille: u32,
    pub spells: Vec<SpellReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub caster: String,
    /// Cast frequency in percent
    pub freq: u32,
    pub total: u32,
    pub groups: Vec<GroupReport>,
    /// Average damage of one cast, weighted by pick chance
    pub average_damage: i32,
}

fn permille(weight: u32, total: u32) -> u32 {
    (u64::from(weight) * 1000 / u64::from(total.max(1))) as u32
}

struct Pct(u32);

impl fmt::Display for Pct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>2}.{}%", self.0 / 10, self.0 % 10)
    }
}

impl fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {}%", self.caster, self.freq)?;
        for group in &self.groups {
            write!(f, "{} {:<10}", Pct(group.permille), group.category.label())?;
            for (i, spell) in group.spells.iter().enumerate() {
                if i > 0 {
                    write!(f, "{:17}", "")?;
                }
                write!(f, " {} {:<24} {:<12}", Pct(spell.permille), spell.name, spell.param)?;
                if spell.average_damage != 0 {
                    write!(f, " {}", spell.average_damage)?;
                }
                writeln!(f)?;
            }
        }
        writeln!(f, "{:>66}", self.average_damage)
    }
}

/// Resistance percent that applies to a spell's damage
fn spell_resist(spell: &Spell, player: &Player) -> i32 {
    if !spell.id.category.uses_projection() {
        return 0;
    }
    spell
        .id
        .as_effect()
        .and_then(Effect::resist)
        .map_or(0, |res| player.resists.pct(res))
}

/// Damage an attack spell deals on average, after the player's resistance.
///
/// `hp` is the caster's current hit points, for breaths.
pub fn average_damage(spell: &Spell, hp: i32, player: &Player) -> i32 {
    if !spell.id.category.is_attack() {
        return 0;
    }
    let res = spell_resist(spell, player);
    match spell.param {
        SpellParam::Dice(dice) => {
            let mut dam = dice.average();
            dam -= dam * res / 100;
            let doom = SpellId::projection(SpellCategory::Curse, Effect::HandDoom);
            if spell.id == doom {
                dam = player.hp * dam / 100;
            }
            dam
        }
        SpellParam::HpPct(pct) => {
            let dam = pct.damage(hp);
            dam - dam * res / 100
        }
        SpellParam::None => 0,
    }
}

/// Weigh `caster`'s spells against the player and report the odds.
///
/// `None` when the caster has no spells or every weight came out zero.
pub fn probe(
    world: &dyn SpellWorld,
    rng: &mut GameRng,
    ai: &dyn SpellAi,
    caster: MonsterId,
) -> Option<ProbeReport> {
    let mut cast = CastContext::at_player(world, caster)?;
    let hp = world.monster(caster)?.hp;
    let weights = ai.weigh(world, rng, &mut cast)?;
    let total = weights.total();
    if total == 0 {
        return None;
    }
    let player = world.player();
    let repertoire = weights.repertoire();

    let mut weighted_damage: i64 = 0;
    let mut groups = Vec::new();
    for group in repertoire.groups() {
        let mut spells = Vec::new();
        for spell in &group.spells {
            let weight = weights.get(spell.id).unwrap_or(0);
            let average = average_damage(spell, hp, player);
            weighted_damage += i64::from(weight) * i64::from(average);
            let param = match spell.param {
                SpellParam::HpPct(pct) => pct.damage(hp).to_string(),
                other => other.to_string(),
            };
            spells.push(SpellReport {
                id: spell.id,
                name: spell.name(),
                weight,
                permille: permille(weight, total),
                param,
                average_damage: average,
            });
        }
        let weight = weights.group_total(group.category);
        groups.push(GroupReport {
            category: group.category,
            weight,
            permille: permille(weight, total),
            spells,
        });
    }

    Some(ProbeReport {
        caster: strip_markup(&cast.name),
        freq: repertoire.freq,
        total,
        groups,
        average_damage: (weighted_damage / i64::from(total)) as i32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;
    use crate::spell::{Resist, parse_spell};

    fn player() -> Player {
        Player::new(Point::new(0, 0), 200)
    }

    #[test]
    fn test_average_dice() {
        let bolt = parse_spell("BO_FIRE", 30).unwrap();
        // 9d8+10
        assert_eq!(average_damage(&bolt, 0, &player()), 9 * 9 / 2 + 10);
    }

    #[test]
    fn test_average_resisted() {
        let bolt = parse_spell("BO_FIRE(10d1)", 30).unwrap();
        let mut p = player();
        p.resists.set(Resist::Fire, 1, 50);
        assert_eq!(average_damage(&bolt, 0, &p), 5);
    }

    #[test]
    fn test_average_breath_capped() {
        let breath = parse_spell("BR_FIRE", 30).unwrap();
        assert_eq!(average_damage(&breath, 10_000, &player()), 900);
        assert_eq!(average_damage(&breath, 100, &player()), 20);
    }

    #[test]
    fn test_hand_of_doom_scales_with_player_hp() {
        let doom = parse_spell("HAND_DOOM(50)", 30).unwrap();
        assert_eq!(average_damage(&doom, 0, &player()), 100);
    }

    #[test]
    fn test_non_attack_is_zero() {
        let heal = parse_spell("HEAL", 30).unwrap();
        assert_eq!(average_damage(&heal, 100, &player()), 0);
    }

    #[test]
    fn test_pct_display() {
        assert_eq!(Pct(1000).to_string(), "100.0%");
        assert_eq!(Pct(55).to_string(), " 5.5%");
    }
}
