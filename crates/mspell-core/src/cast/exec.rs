//! Casting a chosen spell
//!
//! A cast attempt runs `disturb -> failure roll -> block check -> message ->
//! lore -> effect` and stops at the first step that ends it. The engine owns
//! nothing between attempts: each one builds a [`CastContext`], asks a
//! [`SpellAi`] for a spell and resolves it against the [`SpellWorld`].

use crate::color::strip_markup;
use crate::consts::{
    BASE_FAIL_RATE, BLINK_DISTANCE, SPELL_REACTION_HASTE, TELEPORT_OTHER_DISTANCE,
    TELEPORT_SELF_DISTANCE,
};
use crate::geom::Point;
use crate::options::SpellOptions;
use crate::race::{NamedRace, RaceFlags};
use crate::rng::GameRng;
use crate::spell::id::{annoy, buff, debuff, escape, tactic};
use crate::spell::{
    Dice, Effect, Resist, SmartFlags, Spell, SpellCategory, SpellFlags, SpellId, SpellParam,
};
use crate::world::{MonsterId, ProjectFlags, Projection, SpellWorld, TeleportFlags, Who};

use super::ai::SpellAi;
use super::context::{CastContext, CastFlags};
use super::msg::cast_message;
use super::special;

/// How a cast attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastOutcome {
    /// The caster could not or would not cast; its turn is not used
    Declined,
    /// The spell fizzled
    Failed,
    /// A player defense stopped the spell
    Blocked,
    Cast(SpellId),
}

impl CastOutcome {
    /// Whether the caster used its turn
    pub fn took_turn(self) -> bool {
        !matches!(self, CastOutcome::Declined)
    }
}

fn reset_target(world: &mut dyn SpellWorld, id: MonsterId) {
    if let Some(mon) = world.monster_mut(id) {
        mon.target = None;
    }
}

/// Can this monster cast at the player right now?
pub fn can_cast(world: &mut dyn SpellWorld, caster: MonsterId) -> bool {
    let Some(confused) = world.monster(caster).map(|m| m.timers.confused > 0) else {
        return false;
    };
    if confused {
        reset_target(world, caster);
        return false;
    }
    let player_dead = world.player().dead;
    world
        .monster(caster)
        .is_some_and(|m| m.is_hostile() && !m.nice && m.aware && !player_dead)
}

/// A monster tries to cast a spell at the player.
pub fn cast_at_player(
    world: &mut dyn SpellWorld,
    rng: &mut GameRng,
    options: &SpellOptions,
    caster: MonsterId,
    ai: &dyn SpellAi,
) -> CastOutcome {
    if !can_cast(world, caster) {
        return CastOutcome::Declined;
    }
    let Some(mon) = world.monster(caster) else {
        return CastOutcome::Declined;
    };
    if mon.pos.distance(world.player().pos) > options.max_range && mon.target.is_none() {
        return CastOutcome::Declined;
    }

    let Some(mut cast) = CastContext::at_player(world, caster) else {
        return CastOutcome::Declined;
    };
    let Some(spell) = ai.choose(world, rng, &mut cast) else {
        return CastOutcome::Declined;
    };
    cast.spell = Some(spell);
    Exec::new(world, rng, options, cast, spell).run()
}

/// A monster tries to cast a spell at another monster.
pub fn cast_at_monster(
    world: &mut dyn SpellWorld,
    rng: &mut GameRng,
    options: &SpellOptions,
    caster: MonsterId,
    ai: &dyn SpellAi,
) -> CastOutcome {
    let Some(confused) = world.monster(caster).map(|m| m.timers.confused > 0) else {
        return CastOutcome::Declined;
    };
    if confused {
        reset_target(world, caster);
        return CastOutcome::Declined;
    }

    let Some(mut cast) = CastContext::at_monster(world, caster) else {
        return CastOutcome::Declined;
    };
    let Some(target) = choose_target(world, rng, caster) else {
        return CastOutcome::Declined;
    };
    cast.set_target(world, target);
    let Some(spell) = ai.choose(world, rng, &mut cast) else {
        return CastOutcome::Declined;
    };
    cast.spell = Some(spell);
    Exec::new(world, rng, options, cast, spell).run()
}

/// Pick the monster to attack: the pets' ordered target, then the caster's
/// remembered target, then any enemy in line of fire.
pub fn choose_target(
    world: &dyn SpellWorld,
    rng: &mut GameRng,
    caster: MonsterId,
) -> Option<MonsterId> {
    let mon = world.monster(caster)?;
    let reachable = |id: MonsterId| {
        id != caster && world.monster(id).is_some_and(|t| world.projectable(mon.pos, t.pos))
    };

    if mon.pet {
        if let Some(id) = world.pet_target().filter(|&id| reachable(id)) {
            return Some(id);
        }
    }

    let remembered = mon
        .target
        .and_then(|at| world.monster_at(at))
        .filter(|&id| reachable(id) && world.monster(id).is_some_and(|t| mon.is_enemy_of(t)));
    if remembered.is_some() {
        return remembered;
    }

    let enemies: Vec<MonsterId> = world
        .monster_ids()
        .into_iter()
        .filter(|&id| reachable(id) && world.monster(id).is_some_and(|t| mon.is_enemy_of(t)))
        .collect();
    rng.choose(&enemies).copied()
}

/// One spell being resolved
pub(crate) struct Exec<'a> {
    pub(crate) world: &'a mut dyn SpellWorld,
    pub(crate) rng: &'a mut GameRng,
    pub(crate) options: &'a SpellOptions,
    pub(crate) cast: CastContext,
    pub(crate) spell: Spell,
}

impl<'a> Exec<'a> {
    pub(crate) fn new(
        world: &'a mut dyn SpellWorld,
        rng: &'a mut GameRng,
        options: &'a SpellOptions,
        cast: CastContext,
        spell: Spell,
    ) -> Self {
        Self {
            world,
            rng,
            options,
            cast,
            spell,
        }
    }

    fn run(mut self) -> CastOutcome {
        self.world.disturb();
        reset_target(self.world, self.cast.caster);

        if self.fails() {
            return CastOutcome::Failed;
        }
        if self.blocked() {
            return CastOutcome::Blocked;
        }
        if let Some(text) = cast_message(&*self.world, &self.cast) {
            self.say(&text);
        }
        if let Some(mon) = self.world.monster(self.cast.caster)
            && mon.is_original_and_seen()
        {
            let race = mon.race;
            self.world.lore_mut().record_cast(race, self.spell.id);
        }

        tracing::debug!(caster = ?self.cast.caster, spell = %self.spell.name(), "casting");
        match self.spell.id.category {
            SpellCategory::Breath => self.breathe(),
            SpellCategory::Ball => self.ball(),
            SpellCategory::Bolt => self.bolt(),
            SpellCategory::Beam => self.beam(),
            SpellCategory::Curse => self.curse(),
            SpellCategory::Annoy => self.annoy(),
            SpellCategory::Debuff => self.debuff(),
            SpellCategory::Buff => self.buff(),
            SpellCategory::Escape => self.escape(),
            SpellCategory::Tactic => self.tactic(),
            SpellCategory::Heal => self.heal(),
            SpellCategory::Summon => special::summon(&mut self),
            SpellCategory::Special => special::weird(&mut self),
        }
        CastOutcome::Cast(self.spell.id)
    }

    /// Print a message unless the cast is out of view and those are ignored.
    pub(crate) fn say(&mut self, text: &str) {
        if self.options.ignore_unview && self.cast.has(CastFlags::UNVIEW) {
            return;
        }
        self.world.msg(text);
    }

    pub(crate) fn caster_visible(&self) -> bool {
        !self.world.player().is_blind()
            && self.world.monster(self.cast.caster).is_some_and(|m| m.visible)
    }

    fn fails(&mut self) -> bool {
        if self.spell.is_innate() || self.cast.race.is_stupid() {
            return false;
        }
        if self.world.level_info().no_magic {
            tracing::debug!(caster = ?self.cast.caster, "anti-magic level");
            return true;
        }

        let stun = self.world.monster(self.cast.caster).map_or(0, |m| m.timers.stunned);
        let mut fail = BASE_FAIL_RATE - (self.cast.race.level + 3) / 4;
        if stun > 0 {
            fail += 50 * stun.min(100) / 100;
        }
        let fail = fail.clamp(0, 100);
        let roll = self.rng.randint0(100) as i32;
        tracing::debug!(fail, roll, "spell failure roll");
        if fail == 0 || roll >= fail {
            return false;
        }

        self.world.lore_mut().record_failure(self.cast.race.id);
        let text = format!("{} tries to cast a spell, but fails.", self.cast.name);
        self.say(&text);
        true
    }

    fn blocked(&mut self) -> bool {
        if self.spell.is_innate() {
            return false;
        }
        let caster = self.cast.caster;
        let defense = if self.world.magic_barrier(caster) {
            "anti-magic barrier"
        } else if self.world.psionic_disruption(caster) {
            "psionic disruption"
        } else {
            return false;
        };
        let text = format!("Your {defense} blocks the spell which {} casts.", self.cast.name);
        self.world.msg(&text);
        true
    }

    // Parameters

    pub(crate) fn dice(&self) -> Option<Dice> {
        debug_assert!(
            matches!(self.spell.param, SpellParam::Dice(_)),
            "{} has no dice",
            self.spell.name()
        );
        self.spell.param.dice()
    }

    pub(crate) fn roll(&mut self) -> Option<i32> {
        let dice = self.dice()?;
        Some(dice.roll(self.rng))
    }

    fn scaled(&self, dam: i32) -> i32 {
        match &self.cast.race.spells {
            Some(spells) => spells.scale_damage(dam),
            None => dam,
        }
    }

    fn effect(&self) -> Option<Effect> {
        self.spell.id.as_effect()
    }

    pub(crate) fn project_at(
        &mut self,
        effect: Effect,
        target: Point,
        radius: u32,
        dam: i32,
        flags: ProjectFlags,
    ) {
        let projection = Projection {
            who: Who::Monster(self.cast.caster),
            effect,
            target,
            radius,
            dam,
            flags,
        };
        tracing::trace!(?projection, "project");
        self.world.project(projection);
    }

    // Damage

    fn breathe(&mut self) {
        let (Some(effect), SpellParam::HpPct(pct)) = (self.effect(), self.spell.param) else {
            debug_assert!(false, "{} is not a breath", self.spell.name());
            return;
        };
        let hp = self.world.monster(self.cast.caster).map_or(0, |m| m.hp);
        let dam = self.scaled(pct.damage(hp));
        let radius = if self.cast.race.level >= 50 { 3 } else { 2 };
        let flags = ProjectFlags::GRID
            | ProjectFlags::ITEM
            | ProjectFlags::KILL
            | ProjectFlags::PLAYER
            | ProjectFlags::BREATH;
        self.project_at(effect, self.cast.dest, radius, dam, flags);
    }

    fn ball(&mut self) {
        let (Some(effect), Some(raw)) = (self.effect(), self.roll()) else {
            return;
        };
        let dam = self.scaled(raw);
        let radius = if self.spell.flags.contains(SpellFlags::FIRST_IN_GROUP) {
            0
        } else if dam > 300 {
            4
        } else if dam > 150 {
            3
        } else {
            2
        };
        let mut flags =
            ProjectFlags::GRID | ProjectFlags::ITEM | ProjectFlags::KILL | ProjectFlags::PLAYER;
        match effect {
            Effect::Rocket => flags |= ProjectFlags::STOP,
            Effect::DrainMana | Effect::MindBlast | Effect::BrainSmash => {
                flags |= ProjectFlags::HIDE | ProjectFlags::AIMED
            }
            _ => {}
        }
        self.project_at(effect, self.cast.dest, radius, dam, flags);
    }

    fn bolt(&mut self) {
        let Some(effect) = self.effect() else {
            return;
        };
        let mut shots = 1;
        let mut flags = ProjectFlags::STOP
            | ProjectFlags::KILL
            | ProjectFlags::PLAYER
            | ProjectFlags::REFLECTABLE;
        if self.cast.race.is_named(NamedRace::Artemis) && effect == Effect::Arrow {
            shots = 4;
            flags.remove(ProjectFlags::REFLECTABLE);
        }
        if effect == Effect::Attack {
            flags |= ProjectFlags::HIDE;
        }
        for _ in 0..shots {
            let Some(raw) = self.roll() else {
                return;
            };
            let dam = self.scaled(raw);
            self.project_at(effect, self.cast.dest, 0, dam, flags);
        }
    }

    fn beam(&mut self) {
        let (Some(effect), Some(raw)) = (self.effect(), self.roll()) else {
            return;
        };
        let dam = self.scaled(raw);
        let flags =
            ProjectFlags::BEAM | ProjectFlags::KILL | ProjectFlags::THRU | ProjectFlags::PLAYER;
        self.project_at(effect, self.cast.dest, 0, dam, flags);
    }

    fn curse(&mut self) {
        let (Some(effect), Some(raw)) = (self.effect(), self.roll()) else {
            return;
        };
        // Hand of Doom takes a share of what the target has left.
        let dam = if effect == Effect::HandDoom {
            raw * self.target_hp() / 100
        } else {
            self.scaled(raw)
        };
        let flags = ProjectFlags::GRID
            | ProjectFlags::ITEM
            | ProjectFlags::KILL
            | ProjectFlags::PLAYER
            | ProjectFlags::HIDE
            | ProjectFlags::AIMED;
        self.project_at(effect, self.cast.dest, 0, dam, flags);
    }

    fn target_hp(&self) -> i32 {
        match self.cast.target {
            Some(id) => self.world.monster(id).map_or(0, |m| m.hp),
            None => self.world.player().hp,
        }
    }

    // Saving throws

    /// The player's resistance shrugs the effect off.
    fn resist_save(&mut self, res: Resist) -> bool {
        let pct = self.world.player().resists.pct(res);
        pct > 0 && (self.rng.randint0(100) as i32) < pct
    }

    /// The player's saving throw against the caster's level.
    fn curse_save(&mut self) -> bool {
        let odds = self.world.player().saving_throw * 100 / (100 + self.cast.race.level / 2);
        (self.rng.randint0(100) as i32) < odds
    }

    /// Remember a player defense the spell just ran into.
    fn learn(&mut self, flag: SmartFlags) {
        if !self.options.smart_learn || self.cast.race.is_stupid() {
            return;
        }
        if !self.cast.race.is_smart() && self.rng.percent(50) {
            return;
        }
        if let Some(mon) = self.world.monster_mut(self.cast.caster) {
            mon.smart |= flag;
        }
    }

    fn resisted(&mut self) {
        self.world.msg("You resist the effects!");
    }

    /// Apply a status effect to the player through the projection system.
    fn affect_player(&mut self, effect: Effect) {
        let at = self.world.player().pos;
        self.project_at(effect, at, 0, 0, ProjectFlags::PLAYER | ProjectFlags::HIDE);
    }

    // Status

    fn annoy(&mut self) {
        if !self.cast.has(CastFlags::DEST_PLAYER) {
            tracing::debug!(spell = %self.spell.name(), "annoyance needs the player as target");
            return;
        }
        match self.spell.id.effect {
            annoy::AMNESIA => self.affect_player(Effect::Amnesia),
            annoy::ANIMATE_DEAD => self.world.animate_dead(self.cast.caster),
            annoy::BLIND => {
                if self.resist_save(Resist::Blind) || self.curse_save() {
                    self.resisted();
                } else {
                    let turns = 12 + self.rng.randint0(4) as i32;
                    self.world.player_mut().timers.blind = turns;
                }
                self.learn(SmartFlags::BLIND);
            }
            annoy::CONFUSE => {
                if self.resist_save(Resist::Conf) || self.curse_save() {
                    self.world.msg("You disbelieve the feeble spell.");
                } else {
                    let turns = 4 + self.rng.randint0(4) as i32;
                    self.world.player_mut().timers.confused += turns;
                }
                self.learn(SmartFlags::CONF);
            }
            annoy::DARKNESS => self.darkness(),
            annoy::PARALYZE => self.affect_player(Effect::Paralysis),
            annoy::SCARE => {
                self.world.scare_player(self.cast.caster);
                self.learn(SmartFlags::FEAR);
            }
            annoy::SHRIEK => self.world.aggravate(self.cast.caster),
            annoy::SLOW => {
                if self.world.player().free_action {
                    self.world.msg("You are unaffected!");
                } else if self.curse_save() {
                    self.resisted();
                } else {
                    let turns = 4 + self.rng.randint0(4) as i32;
                    self.world.player_mut().timers.slow += turns;
                }
                self.learn(SmartFlags::FREE_ACTION);
            }
            annoy::TELE_LEVEL => {
                if self.resist_save(Resist::Nexus) || self.curse_save() {
                    self.resisted();
                } else {
                    self.world.teleport_player_level();
                }
                self.learn(SmartFlags::NEXUS);
            }
            annoy::TELE_TO => {
                // Out of sight this is nasty enough to earn a saving throw.
                let unseen = !self.world.projectable(self.cast.src, self.cast.dest);
                if (unseen && self.curse_save()) || self.resist_save(Resist::Teleport) {
                    self.resisted();
                } else {
                    self.world.teleport_player_to(self.cast.src, TeleportFlags::PASSIVE);
                }
                self.learn(SmartFlags::TELEPORT);
            }
            annoy::TRAPS => self.world.create_traps(self.cast.dest),
            annoy::WORLD => {
                let turns = 2 + self.rng.randint1(2) as i32;
                self.world.stop_time(self.cast.caster, turns);
            }
            other => tracing::warn!(effect = other, "unknown annoyance"),
        }

        let timers = self.world.player().timers;
        if timers.spell_reaction > 0 && timers.fast == 0 {
            self.world.player_mut().timers.fast = SPELL_REACTION_HASTE;
        }
    }

    fn darkness(&mut self) {
        let blind = self.world.player().is_blind();
        let name = self.cast.name.clone();
        if blind {
            self.say(&format!("{name} mumbles."));
        }
        let lights_up = self.world.player().ninja
            && !self
                .cast
                .race
                .flags
                .intersects(RaceFlags::UNDEAD | RaceFlags::HURT_LITE | RaceFlags::DARK_AURA);
        if lights_up {
            if !blind {
                self.say(&format!("{name} casts a spell to light up."));
            }
            self.world.light_area(true);
        } else {
            if !blind {
                self.say(&format!("{name} gestures in shadow."));
            }
            self.world.light_area(false);
        }
    }

    fn debuff(&mut self) {
        if !self.cast.has(CastFlags::DEST_PLAYER) {
            tracing::debug!(spell = %self.spell.name(), "debuff needs the player as target");
            return;
        }
        if self.world.check_foresight() {
            return;
        }
        match self.spell.id.effect {
            debuff::ANTI_MAGIC => {
                if self.curse_save() || self.one_with_magic() {
                    self.resisted();
                } else if self.world.player().mental_fortress {
                    self.world.msg("Your mental fortress is impenetrable!");
                } else {
                    let turns = 3 + self.rng.randint1(3) as i32;
                    self.world.player_mut().timers.no_spells += turns;
                }
            }
            debuff::DISPEL_MAGIC => {
                if self.one_with_magic() {
                    self.resisted();
                } else if self.world.player().mental_fortress {
                    self.world.msg("Your mental fortress is impenetrable!");
                } else {
                    self.world.dispel_player();
                    if let Some(mount) = self.world.player().riding {
                        self.world.dispel_monster(mount);
                    }
                }
            }
            debuff::POLYMORPH => self.affect_player(Effect::OldPoly),
            other => tracing::warn!(effect = other, "unknown debuff"),
        }
    }

    fn one_with_magic(&mut self) -> bool {
        self.world.player().one_with_magic && self.rng.one_in(2)
    }

    fn buff(&mut self) {
        let caster = self.cast.caster;
        match self.spell.id.effect {
            buff::HASTE => {
                let was_fast = self.world.monster(caster).is_some_and(|m| m.timers.fast > 0);
                if let Some(mon) = self.world.monster_mut(caster) {
                    mon.timers.fast += 100;
                }
                if !was_fast {
                    let text = format!("{} starts moving faster.", self.cast.name);
                    self.say(&text);
                }
            }
            buff::INVULN => {
                let turns = 4 + self.rng.randint1(4) as i32;
                if let Some(mon) = self.world.monster_mut(caster)
                    && mon.timers.invulnerable == 0
                {
                    mon.timers.invulnerable = turns;
                }
            }
            other => tracing::warn!(effect = other, "unknown buff"),
        }
    }

    // Movement

    /// Teleport the caster unless something pins it down.
    fn teleport_self(&mut self, distance: i32, verb: &str) {
        let caster = self.cast.caster;
        if self.world.teleport_barrier(caster) {
            let text = format!("Magic barrier obstructs teleporting of {}.", self.cast.name);
            self.say(&text);
            return;
        }
        if self.caster_visible() {
            let text = format!("{} {verb} away.", self.cast.name);
            self.say(&text);
        }
        self.world.teleport_monster(caster, distance, TeleportFlags::empty());
    }

    /// Send the target away: another monster outright, the player with a
    /// resistance check.
    fn teleport_target(&mut self, distance: i32, verb: &str) {
        if let Some(target) = self.cast.target {
            let text = format!("{} {verb} {} away.", self.cast.name, self.cast.target_name);
            self.say(&text);
            self.world.teleport_monster(target, distance, TeleportFlags::empty());
            return;
        }
        let text = format!("{} {verb} you away.", self.cast.name);
        self.world.msg(&text);
        if self.resist_save(Resist::Teleport) {
            self.resisted();
        } else {
            self.world.teleport_player_away(self.cast.caster, distance);
        }
        self.learn(SmartFlags::TELEPORT);
    }

    /// A duelist may refuse to be teleported away by their quarry.
    fn unending_pursuit(&mut self) -> bool {
        let player = self.world.player();
        if player.duel_target != Some(self.cast.caster) || player.level < 30 {
            return false;
        }
        let prompt = format!(
            "{} is attempting to teleport you. Prevent? ",
            strip_markup(&self.cast.name)
        );
        if !self.world.confirm(&prompt) {
            return false;
        }
        if self.rng.one_in(3) {
            self.world.msg("Failed!");
            return false;
        }
        self.world.msg("You invoke Unending Pursuit ... The duel continues!");
        true
    }

    fn escape(&mut self) {
        match self.spell.id.effect {
            escape::TELE_SELF => self.teleport_self(TELEPORT_SELF_DISTANCE, "teleports"),
            escape::TELE_OTHER => {
                if self.cast.target.is_none() && self.unending_pursuit() {
                    return;
                }
                self.teleport_target(TELEPORT_OTHER_DISTANCE, "teleports");
            }
            other => tracing::warn!(effect = other, "unknown escape"),
        }
    }

    fn tactic(&mut self) {
        match self.spell.id.effect {
            tactic::BLINK => self.teleport_self(BLINK_DISTANCE, "blinks"),
            tactic::BLINK_OTHER => self.teleport_target(BLINK_DISTANCE, "blinks"),
            _ => {
                // Jump: blast the grid being left, then blink.
                let (Some(effect), Some(raw)) = (self.effect(), self.roll()) else {
                    return;
                };
                let dam = self.scaled(raw * 2);
                let flags = ProjectFlags::GRID
                    | ProjectFlags::ITEM
                    | ProjectFlags::KILL
                    | ProjectFlags::PLAYER;
                self.project_at(effect, self.cast.src, 5, dam, flags);
                self.world
                    .teleport_monster(self.cast.caster, BLINK_DISTANCE, TeleportFlags::empty());
            }
        }
    }

    fn heal(&mut self) {
        let Some(amount) = self.roll() else {
            return;
        };
        let caster = self.cast.caster;
        let seen = self.caster_visible();
        let Some(mon) = self.world.monster_mut(caster) else {
            return;
        };
        mon.hp += amount;
        let full = mon.hp >= mon.max_hp;
        if full {
            mon.hp = mon.max_hp;
        }
        let was_afraid = mon.timers.afraid > 0;
        mon.timers.afraid = 0;

        let name = self.cast.name.clone();
        let report = match (full, seen) {
            (true, true) => Some(format!("{name} looks completely healed!")),
            (false, true) => Some(format!("{name} looks healthier.")),
            _ if self.cast.has(CastFlags::UNVIEW) => None,
            (true, false) => Some(format!("{name} sounds healed!")),
            (false, false) => Some(format!("{name} sounds healthier.")),
        };
        if let Some(text) = report {
            self.say(&text);
        }
        if was_afraid && seen {
            let text = format!("{name} recovers {} courage.", self.cast.caster_pos());
            self.say(&text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_turns() {
        assert!(!CastOutcome::Declined.took_turn());
        assert!(CastOutcome::Failed.took_turn());
        assert!(CastOutcome::Blocked.took_turn());
    }
}
