//! The arena world
//!
//! One rectangular level, the player, any number of monsters and the
//! species they belong to. Effects are resolved simply: projections hit
//! whatever stands in the blast and damage is reduced by the player's
//! resistance to the element.

use hashbrown::{HashMap, HashSet};

use mspell_core::GameRng;
use mspell_core::geom::Point;
use mspell_core::race::{MonsterRace, NamedRace, RaceFlags, RaceId, SpellLore};
use mspell_core::spell::{Resist, SummonKind};
use mspell_core::world::{
    Actors, Effects, Geometry, LevelInfo, Messages, Monster, MonsterId, Player, ProjectFlags,
    Projection, TeleportFlags, Who,
};

use crate::grid::Grid;

/// How far from the requested grid a summoned or teleported actor may land
const PLACE_RADIUS: i32 = 3;

#[derive(Debug, Clone)]
pub struct Arena {
    pub grid: Grid,
    pub player: Player,
    monsters: HashMap<MonsterId, Monster>,
    races: Vec<MonsterRace>,
    lore: SpellLore,
    pub level: LevelInfo,
    rng: GameRng,
    next_id: u32,
    killed_uniques: HashSet<RaceId>,
    messages: Vec<String>,
    projections: Vec<Projection>,
    pub traps: HashSet<Point>,
    pub lit: bool,
    /// Corpses an animate-dead spell could raise
    pub corpses: u32,
    pub pet_target: Option<MonsterId>,
    pub player_afraid: bool,
    pub levels_changed: u32,
    pub time_stop_turns: i32,
    pub disturbances: u32,
    // Knobs for the player-side checks
    pub confirm_answer: bool,
    pub foresight: bool,
    pub magic_barrier: bool,
    pub psionic_disruption: bool,
    pub no_teleport: bool,
    pub dispel_worthwhile: bool,
    pub anti_magic_weight: u32,
}

impl Arena {
    /// An empty walled room; the player stands in the middle.
    pub fn new(width: i32, height: i32, races: Vec<MonsterRace>, seed: u64) -> Self {
        let grid = Grid::new(width, height);
        let center = Point::new(grid.width() / 2, grid.height() / 2);
        Self {
            grid,
            player: Player::new(center, 100),
            monsters: HashMap::new(),
            races,
            lore: SpellLore::new(),
            level: LevelInfo::default(),
            rng: GameRng::new(seed),
            next_id: 1,
            killed_uniques: HashSet::new(),
            messages: Vec::new(),
            projections: Vec::new(),
            traps: HashSet::new(),
            lit: false,
            corpses: 0,
            pet_target: None,
            player_afraid: false,
            levels_changed: 0,
            time_stop_turns: 0,
            disturbances: 0,
            confirm_answer: true,
            foresight: false,
            magic_barrier: false,
            psionic_disruption: false,
            no_teleport: false,
            dispel_worthwhile: false,
            anti_magic_weight: 0,
        }
    }

    pub fn races(&self) -> &[MonsterRace] {
        &self.races
    }

    pub fn race_named(&self, name: &str) -> Option<RaceId> {
        self.races
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(name))
            .map(|r| r.id)
    }

    /// Put a monster of `race` at `pos` with the species' typical hit points.
    pub fn spawn(&mut self, race: RaceId, pos: Point) -> Option<MonsterId> {
        let hp = self.race_entry(race)?.average_hp().max(1);
        let id = MonsterId(self.next_id);
        self.next_id += 1;
        self.monsters.insert(id, Monster::new(id, race, pos, hp));
        tracing::debug!(?id, ?race, x = pos.x, y = pos.y, "spawned monster");
        Some(id)
    }

    pub fn kill_unique(&mut self, race: RaceId) {
        self.killed_uniques.insert(race);
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn take_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }

    pub fn projections(&self) -> &[Projection] {
        &self.projections
    }

    pub fn clear_log(&mut self) {
        self.messages.clear();
        self.projections.clear();
    }

    fn race_entry(&self, id: RaceId) -> Option<&MonsterRace> {
        self.races.iter().find(|r| r.id == id)
    }

    fn occupied(&self, p: Point) -> bool {
        self.player.pos == p || self.monster_at(p).is_some()
    }

    /// A free floor grid near `at`, nearest rings first
    fn place_near(&mut self, at: Point) -> Option<Point> {
        for radius in 0..=PLACE_RADIUS {
            let ring: Vec<Point> = self
                .grid
                .floor_points()
                .filter(|&p| p.distance(at) == radius)
                .filter(|&p| !self.occupied(p) && self.grid.projectable(at, p))
                .collect();
            if let Some(&p) = self.rng.choose(&ring) {
                return Some(p);
            }
        }
        None
    }

    /// A free floor grid within `distance` of `from`, preferring far ones
    fn random_spot(&mut self, from: Point, distance: i32) -> Option<Point> {
        let spots: Vec<Point> = self
            .grid
            .floor_points()
            .filter(|&p| p.distance(from) <= distance && !self.occupied(p))
            .collect();
        let far: Vec<Point> = spots
            .iter()
            .copied()
            .filter(|&p| p.distance(from) >= distance / 2)
            .collect();
        let pool = if far.is_empty() { &spots } else { &far };
        self.rng.choose(pool).copied()
    }

    fn matches_kind(race: &MonsterRace, kind: SummonKind, kin: Option<char>) -> bool {
        let unique = race.flags.contains(RaceFlags::UNIQUE);
        let undead = race.flags.contains(RaceFlags::UNDEAD);
        match kind {
            SummonKind::Kin => kin.is_some_and(|c| c == race.symbol) && !unique,
            SummonKind::Unique => unique,
            SummonKind::Olympian => unique && race.symbol == 'P',
            _ if unique => false,
            SummonKind::Monster | SummonKind::Monsters => true,
            SummonKind::Ant => race.symbol == 'a',
            SummonKind::Spider => race.symbol == 'S',
            SummonKind::Hound => race.symbol == 'Z',
            SummonKind::Hydra => race.symbol == 'M',
            SummonKind::Angel => race.symbol == 'A',
            SummonKind::Demon => race.symbol == 'U',
            SummonKind::Undead => undead,
            SummonKind::HiUndead => undead && race.level >= 30,
            SummonKind::Dragon => race.symbol == 'd',
            SummonKind::HiDragon => race.symbol == 'D',
            SummonKind::Cyber => race.name.contains("cyber"),
            SummonKind::Animal => race.symbol.is_ascii_lowercase() && !race.is_smart(),
            SummonKind::Elemental => race.symbol == 'E',
            SummonKind::Amberite => race.symbol == 'P',
            SummonKind::Special => false,
        }
    }

    fn summoned_pet(&self, who: Who) -> bool {
        match who {
            Who::Player => true,
            Who::Monster(id) => self.monsters.get(&id).is_some_and(|m| m.pet),
            Who::Nobody => false,
        }
    }

    fn place_summon(&mut self, who: Who, at: Point, race: RaceId) -> Option<MonsterId> {
        let pos = self.place_near(at)?;
        let pet = self.summoned_pet(who);
        let id = self.spawn(race, pos)?;
        if let Some(m) = self.monsters.get_mut(&id) {
            m.pet = pet;
        }
        Some(id)
    }

    fn origin(&self, who: Who, fallback: Point) -> Point {
        match who {
            Who::Player => self.player.pos,
            Who::Monster(id) => self.monsters.get(&id).map_or(fallback, |m| m.pos),
            Who::Nobody => fallback,
        }
    }

    /// Grids a projection affects
    fn blast_area(&self, p: &Projection, origin: Point) -> Vec<Point> {
        let path = self.grid.path(origin, p.target);
        if p.flags.contains(ProjectFlags::BEAM) {
            return path
                .into_iter()
                .take_while(|&g| self.grid.is_floor(g))
                .collect();
        }

        let mut center = p.target;
        if p.flags.contains(ProjectFlags::STOP) {
            for g in path {
                if self.grid.is_wall(g) {
                    break;
                }
                center = g;
                if self.occupied(g) {
                    break;
                }
            }
        }
        if p.radius == 0 {
            return vec![center];
        }
        let radius = p.radius as i32;
        self.grid
            .floor_points()
            .filter(|&g| g.distance(center) <= radius && self.grid.projectable(center, g))
            .collect()
    }

    fn hit_player(&mut self, p: &Projection) {
        if p.flags.contains(ProjectFlags::REFLECTABLE) && self.player.reflection {
            self.messages.push("The attack bounces!".to_string());
            return;
        }
        let resist = p.effect.resist().map_or(0, |r| self.player.resists.pct(r));
        let dam = p.dam * (100 - resist) / 100;
        let killer = match p.who {
            Who::Monster(id) => self.monster_name(id),
            _ => p.effect.name().to_string(),
        };
        self.take_hit(dam, &killer);
    }
}

impl Geometry for Arena {
    fn projectable(&self, from: Point, to: Point) -> bool {
        self.grid.projectable(from, to)
    }

    fn clean_shot(&self, from: Point, to: Point) -> bool {
        let path = self.grid.path(from, to);
        let Some((_, before)) = path.split_last() else {
            return true;
        };
        self.grid.projectable(from, to) && before.iter().all(|&g| self.monster_at(g).is_none())
    }

    fn allows_projection(&self, at: Point) -> bool {
        self.grid.is_floor(at)
    }

    fn in_disintegration_range(&self, from: Point, to: Point) -> bool {
        self.grid.in_bounds(to) && from.distance(to) <= mspell_core::MAX_RANGE
    }

    fn summon_possible(&self, at: Point) -> bool {
        self.grid.floor_points().any(|p| {
            p.distance(at) <= 2 && !self.occupied(p) && self.grid.projectable(at, p)
        })
    }

    fn raise_possible(&self, caster: MonsterId) -> bool {
        self.corpses > 0 && self.monsters.contains_key(&caster)
    }

    fn level_info(&self) -> LevelInfo {
        self.level
    }
}

impl Actors for Arena {
    fn player(&self) -> &Player {
        &self.player
    }

    fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    fn monster(&self, id: MonsterId) -> Option<&Monster> {
        self.monsters.get(&id)
    }

    fn monster_mut(&mut self, id: MonsterId) -> Option<&mut Monster> {
        self.monsters.get_mut(&id)
    }

    fn monster_ids(&self) -> Vec<MonsterId> {
        let mut ids: Vec<_> = self.monsters.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn monster_at(&self, at: Point) -> Option<MonsterId> {
        self.monsters.values().find(|m| m.pos == at).map(|m| m.id)
    }

    fn monster_name(&self, id: MonsterId) -> String {
        let Some(m) = self.monsters.get(&id) else {
            return "it".to_string();
        };
        if !m.visible {
            return "it".to_string();
        }
        match self.race_entry(m.apparent_race) {
            Some(r) if r.flags.contains(RaceFlags::UNIQUE) => r.name.clone(),
            Some(r) => format!("the {}", r.name),
            None => "it".to_string(),
        }
    }

    fn race(&self, id: RaceId) -> Option<&MonsterRace> {
        self.race_entry(id)
    }

    fn race_by_name(&self, named: NamedRace) -> Option<RaceId> {
        self.races.iter().find(|r| r.named == Some(named)).map(|r| r.id)
    }

    fn race_count(&self, race: RaceId) -> u32 {
        self.monsters.values().filter(|m| m.race == race).count() as u32
    }

    fn unique_available(&self, race: RaceId) -> bool {
        self.race_entry(race)
            .is_some_and(|r| r.flags.contains(RaceFlags::UNIQUE))
            && !self.killed_uniques.contains(&race)
            && self.race_count(race) == 0
    }

    fn pet_target(&self) -> Option<MonsterId> {
        self.pet_target
    }

    fn lore_mut(&mut self) -> &mut SpellLore {
        &mut self.lore
    }

    fn lore(&self) -> &SpellLore {
        &self.lore
    }

    fn dispel_worthwhile(&self, _caster: MonsterId) -> bool {
        self.dispel_worthwhile
    }

    fn anti_magic_weight(&self) -> u32 {
        self.anti_magic_weight
    }

    fn magic_barrier(&self, _caster: MonsterId) -> bool {
        self.magic_barrier
    }

    fn psionic_disruption(&self, _caster: MonsterId) -> bool {
        self.psionic_disruption
    }

    fn teleport_barrier(&self, _id: MonsterId) -> bool {
        self.no_teleport
    }
}

impl Effects for Arena {
    fn project(&mut self, projection: Projection) {
        tracing::trace!(
            effect = %projection.effect,
            dam = projection.dam,
            radius = projection.radius,
            "project"
        );
        self.projections.push(projection);
        let origin = self.origin(projection.who, projection.target);
        let caster = match projection.who {
            Who::Monster(id) => Some(id),
            _ => None,
        };
        for g in self.blast_area(&projection, origin) {
            if g == self.player.pos && projection.flags.contains(ProjectFlags::PLAYER) {
                self.hit_player(&projection);
            }
            if let Some(id) = self.monster_at(g)
                && Some(id) != caster
                && projection.flags.contains(ProjectFlags::KILL)
            {
                self.damage_monster(id, projection.dam, projection.who);
            }
        }
    }

    fn teleport_player_to(&mut self, to: Point, _flags: TeleportFlags) {
        if let Some(p) = self.place_near(to) {
            self.player.pos = p;
        }
    }

    fn teleport_player_away(&mut self, _from: MonsterId, distance: i32) {
        if let Some(p) = self.random_spot(self.player.pos, distance) {
            self.player.pos = p;
        }
    }

    fn teleport_player_level(&mut self) {
        self.levels_changed += 1;
        self.messages.push("You rise up through the ceiling.".to_string());
    }

    fn teleport_monster(&mut self, id: MonsterId, distance: i32, _flags: TeleportFlags) {
        let Some(from) = self.monsters.get(&id).map(|m| m.pos) else {
            return;
        };
        if let Some(p) = self.random_spot(from, distance)
            && let Some(m) = self.monsters.get_mut(&id)
        {
            m.pos = p;
        }
    }

    fn aggravate(&mut self, _caster: MonsterId) {
        for m in self.monsters.values_mut() {
            m.aware = true;
            m.nice = false;
        }
    }

    fn animate_dead(&mut self, caster: MonsterId) {
        if self.corpses == 0 {
            return;
        }
        self.corpses -= 1;
        let at = self.origin(Who::Monster(caster), self.player.pos);
        let level = self.level.depth;
        self.summon_kind(Who::Monster(caster), at, level, SummonKind::Undead, None);
    }

    fn create_traps(&mut self, at: Point) {
        for p in at.neighbors() {
            if self.grid.is_floor(p) && !self.occupied(p) {
                self.traps.insert(p);
            }
        }
    }

    fn light_area(&mut self, lit: bool) {
        self.lit = lit;
    }

    fn stop_time(&mut self, _caster: MonsterId, turns: i32) {
        self.level.time_stopped = true;
        self.time_stop_turns = turns;
    }

    fn scare_player(&mut self, _caster: MonsterId) {
        if self.player.resists.pct(Resist::Fear) >= 100 {
            self.messages.push("You refuse to be frightened.".to_string());
        } else {
            self.player_afraid = true;
        }
    }

    fn dispel_player(&mut self) {
        self.player.timers.fast = 0;
        self.player.timers.invulnerable = 0;
    }

    fn dispel_monster(&mut self, id: MonsterId) {
        if let Some(m) = self.monsters.get_mut(&id) {
            m.timers.fast = 0;
            m.timers.invulnerable = 0;
        }
    }

    fn summon_kind(
        &mut self,
        who: Who,
        at: Point,
        level: i32,
        kind: SummonKind,
        kin: Option<char>,
    ) -> Option<MonsterId> {
        let candidates: Vec<RaceId> = self
            .races
            .iter()
            .filter(|r| r.level <= level.max(1) && Self::matches_kind(r, kind, kin))
            .map(|r| r.id)
            .filter(|&id| {
                self.race_entry(id)
                    .is_none_or(|r| !r.flags.contains(RaceFlags::UNIQUE))
                    || self.unique_available(id)
            })
            .collect();
        let race = *self.rng.choose(&candidates)?;
        self.place_summon(who, at, race)
    }

    fn summon_race(&mut self, who: Who, at: Point, race: RaceId) -> Option<MonsterId> {
        let unique = self
            .race_entry(race)?
            .flags
            .contains(RaceFlags::UNIQUE);
        if unique && !self.unique_available(race) {
            return None;
        }
        self.place_summon(who, at, race)
    }

    fn delete_monster(&mut self, id: MonsterId) {
        self.monsters.remove(&id);
        if self.pet_target == Some(id) {
            self.pet_target = None;
        }
    }

    fn take_hit(&mut self, dam: i32, killer: &str) -> i32 {
        if self.player.timers.invulnerable > 0 || dam <= 0 {
            return 0;
        }
        self.player.hp -= dam;
        if self.player.hp < 0 && !self.player.dead {
            self.player.dead = true;
            tracing::info!(killer, "player died");
        }
        dam
    }

    fn damage_monster(&mut self, id: MonsterId, dam: i32, _by: Who) {
        let Some(m) = self.monsters.get_mut(&id) else {
            return;
        };
        if m.timers.invulnerable > 0 {
            return;
        }
        m.hp -= dam;
        if m.hp >= 0 {
            return;
        }
        let race = m.race;
        let name = self.monster_name(id);
        if self
            .race_entry(race)
            .is_some_and(|r| r.flags.contains(RaceFlags::UNIQUE))
        {
            self.killed_uniques.insert(race);
        }
        self.delete_monster(id);
        self.messages.push(format!("{name} dies."));
    }

    fn check_foresight(&mut self) -> bool {
        self.foresight
    }
}

impl Messages for Arena {
    fn msg(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        self.messages.push(prompt.to_string());
        self.confirm_answer
    }

    fn disturb(&mut self) {
        self.disturbances += 1;
    }
}
