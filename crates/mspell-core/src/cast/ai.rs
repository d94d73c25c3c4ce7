//! Spell selection
//!
//! [`StagedAi`] is the full engine for monsters casting at the player: base
//! weights, then an ordered series of filters, then a weighted draw.
//! [`MonsterTargetAi`] runs a reduced filter set for monster-versus-monster
//! fights and [`RandomAi`] ignores tactics altogether.

use crate::consts::{DISINTEGRATE_WEIGHT, MAX_LEARNED_WEIGHT, WOUNDED_THRESHOLD};
use crate::geom::Point;
use crate::options::SpellOptions;
use crate::race::NamedRace;
use crate::rng::GameRng;
use crate::spell::id::{annoy, buff, debuff, escape, special};
use crate::spell::{Effect, Resist, SmartFlags, Spell, SpellCategory, SpellFlags, SpellId};
use crate::world::{Player, SpellWorld};

use super::context::{CastContext, CastFlags};
use super::weights::Weights;

use SpellCategory::{
    Annoy, Ball, Beam, Bolt, Breath, Buff, Curse, Debuff, Escape, Heal, Special, Summon, Tactic,
};

const ROCKET: SpellId = SpellId::projection(Ball, Effect::Rocket);
const DRAIN_MANA: SpellId = SpellId::projection(Ball, Effect::DrainMana);
const DISINTEGRATE: SpellId = SpellId::projection(Breath, Effect::Disintegrate);
const GAZE: SpellId = SpellId::projection(Bolt, Effect::Attack);
const PSY_SPEAR: SpellId = SpellId::projection(Beam, Effect::PsySpear);
const TELE_OTHER: SpellId = SpellId::new(Escape, escape::TELE_OTHER);

const fn annoy_id(effect: i16) -> SpellId {
    SpellId::new(Annoy, effect)
}

/// A spell selection strategy
pub trait SpellAi {
    /// Weigh every spell of the caster for this cast. `None` when the caster
    /// has no spells or no target.
    fn weigh(
        &self,
        world: &dyn SpellWorld,
        rng: &mut GameRng,
        cast: &mut CastContext,
    ) -> Option<Weights>;

    /// Pick the spell to cast, if any.
    fn choose(
        &self,
        world: &dyn SpellWorld,
        rng: &mut GameRng,
        cast: &mut CastContext,
    ) -> Option<Spell> {
        let weights = self.weigh(world, rng, cast)?;
        weights.draw(rng)
    }
}

/// Full tactical engine for monsters attacking the player
#[derive(Debug, Clone, Default)]
pub struct StagedAi {
    pub options: SpellOptions,
}

impl StagedAi {
    pub fn new(options: SpellOptions) -> Self {
        Self { options }
    }
}

impl SpellAi for StagedAi {
    fn weigh(
        &self,
        world: &dyn SpellWorld,
        rng: &mut GameRng,
        cast: &mut CastContext,
    ) -> Option<Weights> {
        let mut w = Weights::new(cast.race.spells.clone()?);
        let stupid = cast.race.is_stupid();
        let smart = cast.race.is_smart();
        let opts = &self.options;

        if !stupid && (opts.smart_learn || opts.smart_cheat) {
            smart_remove(world, cast, &mut w, opts.smart_cheat);
        }
        gate_geometry(world, rng, cast, &mut w, opts.max_range);
        if world.level_info().arena {
            w.remove_group(Summon);
        }
        if stupid {
            return Some(w);
        }
        if world.level_info().no_magic {
            w.remove_where(|s| !s.is_innate());
        }
        wounded(world, rng, cast, &mut w, opts);

        if smart && cast.has(CastFlags::DIRECT) {
            if world.level_info().tele_level_ineffective {
                w.remove(annoy_id(annoy::TELE_LEVEL));
            }
            let dispel = if world.dispel_worthwhile(cast.caster) { 50 } else { 0 };
            w.set(SpellId::new(Debuff, debuff::DISPEL_MAGIC), dispel);
            w.set(SpellId::new(Debuff, debuff::ANTI_MAGIC), world.anti_magic_weight());
        }

        let anger = world.monster(cast.caster).map_or(0, |m| m.anger);
        if cast.distance() < 2 {
            w.remove(annoy_id(annoy::TELE_TO));
        } else {
            w.update(annoy_id(annoy::TELE_TO), |p| p.saturating_add(anger));
        }
        if world.level_info().time_stopped {
            w.remove(annoy_id(annoy::WORLD));
        }

        if cast.flags.intersects(CastFlags::DIRECT | CastFlags::SPLASH) {
            boost_tactics(cast, &mut w);
        }
        strike_far_jumps(cast, &mut w);

        let player = world.player();
        if player.is_blind() || cast.distance() < 2 {
            w.remove(GAZE);
        } else {
            w.update(GAZE, |p| p * 7);
        }

        strike_useless_buffs(world, cast, &mut w);
        strike_useless_annoys(player, &mut w);

        if cast.has(CastFlags::DIRECT) && !world.clean_shot(cast.src, cast.dest) {
            w.remove_group(Bolt);
            w.remove(ROCKET);
        }
        if w.repertoire().has_group(Summon) && !world.summon_possible(cast.dest) {
            w.remove_group(Summon);
        }
        if !world.raise_possible(cast.caster) {
            w.remove(annoy_id(annoy::ANIMATE_DEAD));
        }

        if player.timers.invulnerable > 0 && cast.has(CastFlags::DIRECT) {
            for category in [Breath, Ball, Bolt, Beam, Curse] {
                w.remove_group(category);
            }
            w.set(PSY_SPEAR, 30);
        }
        Some(w)
    }
}

/// Reduced engine for monsters fighting other monsters.
///
/// The target must already be chosen and in line of fire.
#[derive(Debug, Clone, Default)]
pub struct MonsterTargetAi {
    pub options: SpellOptions,
}

impl MonsterTargetAi {
    pub fn new(options: SpellOptions) -> Self {
        Self { options }
    }
}

impl SpellAi for MonsterTargetAi {
    fn weigh(
        &self,
        world: &dyn SpellWorld,
        rng: &mut GameRng,
        cast: &mut CastContext,
    ) -> Option<Weights> {
        cast.target?;
        let mut w = Weights::new(cast.race.spells.clone()?);
        cast.flags |= CastFlags::DIRECT;

        w.remove_group(Annoy);
        w.remove_group(Debuff);
        w.remove(DRAIN_MANA);
        if world.level_info().arena {
            w.remove_group(Summon);
        }
        if cast.race.is_stupid() {
            return Some(w);
        }
        if world.level_info().no_magic {
            w.remove_where(|s| !s.is_innate());
        }
        wounded(world, rng, cast, &mut w, &self.options);
        boost_tactics(cast, &mut w);
        strike_far_jumps(cast, &mut w);
        strike_useless_buffs(world, cast, &mut w);

        if !world.clean_shot(cast.src, cast.dest) {
            w.remove_group(Bolt);
            w.remove(ROCKET);
        }
        if w.repertoire().has_group(Summon) && !world.summon_possible(cast.dest) {
            w.remove_group(Summon);
            if cast.race.is_named(NamedRace::BanorRupart) {
                w.remove(SpellId::new(Special, special::SPECIAL));
            }
        }
        // Monsters only summon with the player close by.
        if !world.projectable(cast.src, world.player().pos) {
            w.remove_group(Summon);
        }
        if !world.raise_possible(cast.caster) {
            w.remove(annoy_id(annoy::ANIMATE_DEAD));
        }
        Some(w)
    }
}

/// Every spell equally likely, regardless of circumstance
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomAi;

impl SpellAi for RandomAi {
    fn weigh(
        &self,
        _world: &dyn SpellWorld,
        _rng: &mut GameRng,
        cast: &mut CastContext,
    ) -> Option<Weights> {
        let mut w = Weights::new(cast.race.spells.clone()?);
        for category in SpellCategory::all() {
            w.map_group(category, |_, _| 1);
        }
        Some(w)
    }

    fn choose(
        &self,
        _world: &dyn SpellWorld,
        rng: &mut GameRng,
        cast: &mut CastContext,
    ) -> Option<Spell> {
        let spells = cast.race.spells.clone()?;
        spells.random_uniform(rng).copied()
    }
}

fn smart_remove(world: &dyn SpellWorld, cast: &CastContext, w: &mut Weights, cheat: bool) {
    let known = if cheat {
        SmartFlags::all()
    } else {
        world.monster(cast.caster).map_or(SmartFlags::empty(), |m| m.smart)
    };
    let player = world.player();

    learn_damage(w, Breath, known, player);
    learn_damage(w, Ball, known, player);
    if known.contains(SmartFlags::REFLECTION) && player.reflection {
        w.remove_group(Bolt);
    } else {
        learn_damage(w, Bolt, known, player);
    }
    learn_damage(w, Beam, known, player);
    learn_annoy(w, known, player);
}

fn learn_damage(w: &mut Weights, category: SpellCategory, known: SmartFlags, player: &Player) {
    w.map_group(category, |spell, p| {
        let Some(res) = spell.id.as_effect().and_then(Effect::resist) else {
            return p;
        };
        if !known.knows(res) {
            return p;
        }
        let pct = player.resists.pct(res);
        if pct == 0 {
            return p;
        }
        let tweak = if pct >= 100 {
            0
        } else if res.is_high() {
            100 - (pct * 3 / 2).min(100)
        } else {
            100 - pct
        };
        learned(p, tweak)
    });
}

fn learn_annoy(w: &mut Weights, known: SmartFlags, player: &Player) {
    let save = |p: u32, res: Resist| {
        if !known.knows(res) {
            return p;
        }
        let pct = player.resists.pct(res);
        if pct == 0 {
            return p;
        }
        let need = if res.is_high() { 33 } else { 55 };
        let tweak = if pct >= need { 0 } else { 100 - pct * 80 / need };
        learned(p, tweak)
    };
    w.map_group(Annoy, |spell, p| match spell.id.effect {
        annoy::BLIND => save(p, Resist::Blind),
        annoy::CONFUSE => save(p, Resist::Conf),
        annoy::TELE_TO => save(p, Resist::Teleport),
        annoy::TELE_LEVEL => save(p, Resist::Nexus),
        annoy::PARALYZE | annoy::SLOW
            if known.contains(SmartFlags::FREE_ACTION) && player.free_action =>
        {
            0
        }
        annoy::SCARE if known.knows(Resist::Fear) => {
            (0..player.resists.sources(Resist::Fear)).fold(p, |p, _| p * 75 / 100)
        }
        _ => p,
    });
}

fn learned(weight: u32, tweak: i32) -> u32 {
    let tweak = tweak.clamp(0, 100) as u32;
    (weight * tweak / 100).min(MAX_LEARNED_WEIGHT)
}

fn gate_geometry(
    world: &dyn SpellWorld,
    rng: &mut GameRng,
    cast: &mut CastContext,
    w: &mut Weights,
    max_range: i32,
) {
    if world.projectable(cast.src, cast.dest) {
        cast.flags |= CastFlags::DIRECT;
        tracing::debug!(caster = ?cast.caster, "direct line to target");
        return;
    }

    let splash = if cast.race.is_stupid() {
        None
    } else {
        choose_splash_point(world, cast.src, cast.dest)
    };

    for category in [Annoy, Bolt, Beam, Debuff, Buff, Curse, Special] {
        w.remove_group(category);
    }
    w.remove(ROCKET);

    match splash {
        Some(point) => {
            tracing::debug!(caster = ?cast.caster, ?point, "splashing target");
            cast.dest = point;
            cast.flags |= CastFlags::SPLASH;
            w.adjust_group(Breath, 50);
            w.adjust_group(Ball, 50);
            w.remove_group_where(Ball, |s| s.flags.contains(SpellFlags::FIRST_IN_GROUP));
            w.adjust_group(Summon, 50);
            w.remove(TELE_OTHER);
        }
        None => {
            tracing::debug!(caster = ?cast.caster, "target out of reach");
            for category in [Breath, Ball, Summon, Heal, Escape, Tactic] {
                w.remove_group(category);
            }
            if w.get(DISINTEGRATE).is_some()
                && cast.distance() < max_range / 2
                && world.in_disintegration_range(cast.src, cast.dest)
                && rng.one_in(10)
            {
                w.set(DISINTEGRATE, DISINTEGRATE_WEIGHT);
            }
        }
    }
}

/// Nearest grid next to `dest` that a ball from `src` can reach
fn choose_splash_point(world: &dyn SpellWorld, src: Point, dest: Point) -> Option<Point> {
    let mut best: Option<(i32, Point)> = None;
    for point in dest.neighbors() {
        if !world.projectable(src, point) || !world.allows_projection(point) {
            continue;
        }
        let d = src.distance(point);
        if best.is_none_or(|(bd, _)| d < bd) {
            best = Some((d, point));
        }
    }
    best.map(|(_, p)| p)
}

/// Heal, escape and summon gain weight as the caster loses hit points.
fn wounded(
    world: &dyn SpellWorld,
    rng: &mut GameRng,
    cast: &CastContext,
    w: &mut Weights,
    opts: &SpellOptions,
) {
    let rep = w.repertoire();
    if !(rep.has_group(Heal) || rep.has_group(Escape) || rep.has_group(Summon)) {
        return;
    }
    let Some(mon) = world.monster(cast.caster) else {
        return;
    };
    if mon.max_hp <= 0 {
        return;
    }
    let healthy = (mon.hp.max(0) * 100 / mon.max_hp).min(100);
    let hurt = 100 - healthy;

    if hurt > WOUNDED_THRESHOLD {
        let boost = (hurt * hurt * hurt / 500) as u32;
        let mut damp = (hurt / 2) as u32;
        if cast.race.is_smart() && hurt > 90 && rng.one_in(2) {
            tracing::debug!(caster = ?cast.caster, hurt, "caster panics");
            damp = 100;
            w.adjust_group(Summon, 100 + boost / 3);
        }
        for category in [Breath, Ball, Bolt, Beam, Curse, Debuff, Annoy, Special] {
            w.adjust_group(category, 100 - damp);
        }
        w.adjust_group(Heal, 100 + boost);
        w.adjust_group(Escape, 100 + boost);
        tracing::debug!(caster = ?cast.caster, hurt, boost, damp, "wounded");
    } else if opts.strike_self_care_when_healthy {
        w.remove_group(Heal);
        w.remove_group(Escape);
    }
}

/// Blinking makes room for the next attack when the target is close.
fn boost_tactics(cast: &CastContext, w: &mut Weights) {
    let follow_up = |s: &Spell| s.id.category.is_attack() || s.id == annoy_id(annoy::TRAPS);
    if w.repertoire().has_group(Tactic) && cast.distance() < 4 && w.any(follow_up) {
        w.adjust_group(Tactic, 700);
    }
}

fn strike_far_jumps(cast: &CastContext, w: &mut Weights) {
    if cast.distance() > 5 {
        w.remove_group_where(Tactic, |s| s.id.is_jump());
    }
}

fn strike_useless_buffs(world: &dyn SpellWorld, cast: &CastContext, w: &mut Weights) {
    let Some(mon) = world.monster(cast.caster) else {
        return;
    };
    if mon.timers.invulnerable > 0 {
        w.remove(SpellId::new(Buff, buff::INVULN));
    }
    if mon.timers.fast > 0 {
        w.remove(SpellId::new(Buff, buff::HASTE));
    }
}

fn strike_useless_annoys(player: &Player, w: &mut Weights) {
    if player.mana == 0 {
        w.remove(DRAIN_MANA);
    }
    if player.is_blind() {
        w.remove(annoy_id(annoy::BLIND));
    }
    if player.timers.slow > 0 {
        w.remove(annoy_id(annoy::SLOW));
    }
    if player.timers.paralyzed > 0 {
        w.remove(annoy_id(annoy::PARALYZE));
    }
    if player.timers.confused > 0 {
        w.remove(annoy_id(annoy::CONFUSE));
    }
}
