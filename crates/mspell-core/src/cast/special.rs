//! Summons and species-specific spells
//!
//! Some uniques summon a fixed roster with their own flavor text, birds
//! snatch the player, and Banor=Rupart splits into Banor and Lupart and back.
//! Every entry is keyed by [`NamedRace`]; a roster member missing from the
//! loaded content is skipped.

use crate::color::strip_markup;
use crate::consts::BLINK_DISTANCE;
use crate::geom::Point;
use crate::race::NamedRace;
use crate::spell::{Effect, SummonKind};
use crate::world::{MonsterId, ProjectFlags, Projection, SpellWorld, TeleportFlags, Who};

use super::context::CastFlags;
use super::exec::Exec;

/// Who a summon belongs to
fn summoner(exec: &Exec<'_>) -> Who {
    if exec.cast.has(CastFlags::SRC_PLAYER) {
        Who::Player
    } else {
        Who::Monster(exec.cast.caster)
    }
}

pub(crate) fn summon(exec: &mut Exec<'_>) {
    let Some(kind) = exec.spell.id.as_summon() else {
        tracing::warn!(id = ?exec.spell.id, "unknown summon");
        return;
    };
    if kind == SummonKind::Special {
        summon_special(exec);
        return;
    }
    let Some(count) = exec.roll() else {
        return;
    };
    let kin = (kind == SummonKind::Kin).then_some(exec.cast.race.symbol);
    let who = summoner(exec);
    let level = exec.cast.race.level;
    for _ in 0..count.max(0) {
        exec.world.summon_kind(who, exec.cast.dest, level, kind, kin);
    }
}

/// A named roster: up to two species summoned `count` times each
struct Roster {
    first: NamedRace,
    second: Option<NamedRace>,
    count: u32,
}

impl Roster {
    fn of(first: NamedRace, count: u32) -> Self {
        Self {
            first,
            second: None,
            count,
        }
    }

    fn pair(first: NamedRace, second: NamedRace, count: u32) -> Self {
        Self {
            first,
            second: Some(second),
            count,
        }
    }
}

fn unique_free(world: &dyn SpellWorld, named: NamedRace) -> bool {
    world
        .race_by_name(named)
        .is_some_and(|race| world.unique_available(race))
}

/// Flow lava or water around the caster before the summon
fn flood(exec: &mut Exec<'_>, effect: Effect) {
    let at = exec.cast.src;
    exec.project_at(effect, at, 8, 3, ProjectFlags::GRID | ProjectFlags::HIDE);
}

fn summon_special(exec: &mut Exec<'_>) {
    use NamedRace::*;

    let Some(named) = exec.cast.race.named else {
        tracing::warn!(race = %exec.cast.race.name, "no special summon for species");
        return;
    };
    let name = exec.cast.name.clone();
    let mut num = exec.rng.randint1(4);

    let roster = match named {
        SantaClaus => {
            exec.say(&format!(
                "{name} says 'Now Dasher! Now Dancer! Now, Prancer and Vixen! On, Comet! \
                 On, Cupid! On, Donner and Blitzen!'"
            ));
            Roster::of(Reindeer, num)
        }
        Zeus => {
            exec.say(&format!("{name} summons Shamblers!"));
            Roster::of(Shambler, num)
        }
        Poseidon => {
            flood(exec, Effect::WaterFlow);
            exec.say(&format!("{name} summons Greater Kraken!"));
            Roster::of(GreaterKraken, num)
        }
        Hades => {
            num = exec.rng.randint1(2);
            flood(exec, Effect::LavaFlow);
            exec.say(&format!("{name} summons Death!"));
            Roster::pair(GreaterBalrog, Archlich, num)
        }
        Athena => {
            exec.say(&format!("{name} summons friends!"));
            if exec.rng.one_in(3) && unique_free(&*exec.world, Zeus) {
                Roster::of(Zeus, 1)
            } else {
                Roster::of(UltimateMagus, exec.rng.randint1(2))
            }
        }
        Ares => {
            exec.say(&format!("{name} yells 'Mommy! Daddy! Help!!'"));
            Roster::pair(Zeus, Hera, 1)
        }
        Apollo => {
            exec.say(&format!("{name} summons help!"));
            if exec.rng.one_in(3) && unique_free(&*exec.world, Artemis) {
                Roster::of(Artemis, 1)
            } else {
                Roster::of(Fenghuang, num)
            }
        }
        Artemis => {
            exec.say(&format!("{name} summons help!"));
            Roster::of(Apollo, 1)
        }
        Hephaestus => {
            exec.say(&format!("{name} summons friends!"));
            if exec.rng.one_in(3) && unique_free(&*exec.world, Zeus) {
                Roster::of(Zeus, 1)
            } else if exec.rng.one_in(3) && unique_free(&*exec.world, Hera) {
                Roster::of(Hera, 1)
            } else {
                Roster::of(SpellwarpAutomaton, num)
            }
        }
        Hermes => {
            exec.say(&format!("{name} summons friends!"));
            Roster::of(MagicMushroom, exec.rng.randint1(16))
        }
        Hera => {
            exec.say(&format!("{name} summons aid!"));
            if exec.rng.one_in(3) && unique_free(&*exec.world, Ares) {
                Roster::of(Ares, 1)
            } else if exec.rng.one_in(3) && unique_free(&*exec.world, Hephaestus) {
                Roster::of(Hephaestus, 1)
            } else {
                Roster::of(DeathBeast, num)
            }
        }
        Demeter => {
            exec.say(&format!("{name} summons ents!"));
            Roster::of(Ent, num)
        }
        Rolento => {
            if exec.world.player().is_blind() {
                exec.say(&format!("{name} spreads something."));
            } else {
                exec.say(&format!("{name} throws some hand grenades."));
            }
            Roster::of(Shuryuudan, 1 + exec.rng.randint1(3))
        }
        Bullgates => {
            exec.say(&format!("{name} summons his minions."));
            Roster::of(Ie, num)
        }
        Caldarm => {
            exec.say(&format!("{name} summons his minions."));
            Roster::of(LockeClone, exec.rng.randint1(3))
        }
        Talos => {
            exec.say(&format!("{name} summons his minions."));
            Roster::of(SpellwarpAutomaton, exec.rng.randint1(3))
        }
        other => {
            tracing::warn!(race = %other, "no special summon for species");
            return;
        }
    };

    let who = summoner(exec);
    let dest = exec.cast.dest;
    let members = [Some(roster.first), roster.second];
    for named in members.into_iter().flatten() {
        let Some(race) = exec.world.race_by_name(named) else {
            tracing::warn!(race = %named, "summon roster species missing");
            continue;
        };
        for _ in 0..roster.count {
            exec.world.summon_race(who, dest, race);
        }
    }
}

pub(crate) fn weird(exec: &mut Exec<'_>) {
    if exec.cast.race.symbol == 'B' {
        bird(exec);
        return;
    }
    match exec.cast.race.named {
        Some(NamedRace::BanorRupart) => fission(exec),
        Some(NamedRace::Banor | NamedRace::Lupart) => fusion(exec),
        _ => tracing::debug!(race = %exec.cast.race.name, "nothing weird to do"),
    }
}

/// Grab the player, fly up and drop them.
fn bird(exec: &mut Exec<'_>) {
    let name = exec.cast.name.clone();
    let caster = exec.cast.caster;
    let grab = exec.cast.has(CastFlags::DIRECT)
        && exec.cast.has(CastFlags::DEST_PLAYER)
        && !exec.rng.one_in(3);
    if !grab {
        exec.say(&format!("{name} suddenly goes out of your sight!"));
        exec.world
            .teleport_monster(caster, BLINK_DISTANCE, TeleportFlags::NONMAGICAL);
        return;
    }

    exec.world.msg(&format!("{name} holds you, and drops from the sky."));
    let mut dam = exec.rng.damroll(4, 8) as i32;
    exec.world.teleport_player_to(
        exec.cast.src,
        TeleportFlags::NONMAGICAL | TeleportFlags::PASSIVE,
    );
    if exec.world.player().levitation {
        exec.world.msg("You float gently down to the ground.");
    } else {
        exec.world.msg("You crashed into the ground.");
        dam += exec.rng.damroll(6, 8) as i32;
    }

    let taken = exec.world.take_hit(dam, &strip_markup(&name));
    let player = exec.world.player();
    if taken > 0 && player.timers.revenge > 0 && !player.dead {
        let text = format!(
            "The attack of {name} has wounded {}!",
            exec.cast.race.reflexive()
        );
        exec.world.msg(&text);
        exec.world.project(Projection {
            who: Who::Player,
            effect: Effect::Missile,
            target: exec.cast.src,
            radius: 0,
            dam: taken,
            flags: ProjectFlags::KILL,
        });
        let revenge = &mut exec.world.player_mut().timers.revenge;
        *revenge = (*revenge - 5).max(0);
    }
    if let Some(mount) = exec.world.player().riding {
        exec.world.damage_monster(mount, dam, Who::Monster(caster));
    }
}

/// Banor=Rupart splits into Banor and Lupart, sharing its hit points.
fn fission(exec: &mut Exec<'_>) {
    let caster = exec.cast.caster;
    let at = exec.cast.src;
    if exec.world.level_info().arena || !exec.world.summon_possible(at) {
        return;
    }
    let Some((hp, max_hp)) = exec.world.monster(caster).map(|m| (m.hp, m.max_hp)) else {
        return;
    };
    let (Some(banor), Some(lupart)) = (
        exec.world.race_by_name(NamedRace::Banor),
        exec.world.race_by_name(NamedRace::Lupart),
    ) else {
        tracing::warn!("Banor or Lupart missing, no split");
        return;
    };

    exec.world.delete_monster(caster);
    let halves = [
        (banor, (hp + 1) / 2, (max_hp + 1) / 2),
        (lupart, hp / 2, max_hp / 2),
    ];
    for (race, hp, max_hp) in halves {
        if let Some(id) = exec.world.summon_race(Who::Nobody, at, race) {
            set_hp(exec.world, id, hp, max_hp);
        }
    }
    exec.say("Banor=Rupart splits in two!");
}

/// Banor and Lupart rejoin where the other half stands.
fn fusion(exec: &mut Exec<'_>) {
    let (Some(banor), Some(lupart), Some(whole)) = (
        exec.world.race_by_name(NamedRace::Banor),
        exec.world.race_by_name(NamedRace::Lupart),
        exec.world.race_by_name(NamedRace::BanorRupart),
    ) else {
        tracing::warn!("Banor=Rupart species missing, no fusion");
        return;
    };
    if exec.world.race_count(banor) == 0 || exec.world.race_count(lupart) == 0 {
        return;
    }
    let own_race = exec
        .world
        .monster(exec.cast.caster)
        .map_or(exec.cast.race.id, |m| m.race);

    let halves: Vec<MonsterId> = exec
        .world
        .monster_ids()
        .into_iter()
        .filter(|&id| {
            exec.world
                .monster(id)
                .is_some_and(|m| m.race == banor || m.race == lupart)
        })
        .collect();
    let mut hp = 0;
    let mut max_hp = 0;
    let mut at: Option<Point> = None;
    for &id in &halves {
        let Some(mon) = exec.world.monster(id) else {
            continue;
        };
        hp += mon.hp;
        max_hp += mon.max_hp;
        if mon.race != own_race {
            at = Some(mon.pos);
        }
    }

    // The halves stay put unless the whole one has somewhere to stand.
    let at = at.unwrap_or(exec.cast.src);
    if !exec.world.summon_possible(at) {
        return;
    }
    let Some(id) = exec.world.summon_race(Who::Nobody, at, whole) else {
        tracing::debug!(?at, "no room for Banor=Rupart");
        return;
    };
    for half in halves {
        exec.world.delete_monster(half);
    }
    set_hp(exec.world, id, hp, max_hp);
    exec.cast.dest = at;
    exec.say("Banor and Rupart combine into one!");
}

fn set_hp(world: &mut dyn SpellWorld, id: MonsterId, hp: i32, max_hp: i32) {
    if let Some(mon) = world.monster_mut(id) {
        mon.hp = hp;
        mon.max_hp = max_hp;
    }
}
