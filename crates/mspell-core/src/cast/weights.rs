//! Per-cast selection weights
//!
//! The species repertoire is never written to. Each cast gets its own
//! `Weights`, one slot per spell, laid out like the repertoire's groups.

use std::sync::Arc;

use strum::EnumCount;

use crate::consts::MAX_ADJUSTED_WEIGHT;
use crate::rng::GameRng;
use crate::spell::{Repertoire, Spell, SpellCategory, SpellId};

#[derive(Debug, Clone)]
pub struct Weights {
    repertoire: Arc<Repertoire>,
    slots: [Vec<u32>; SpellCategory::COUNT],
}

impl Weights {
    /// Every spell at its category's base weight.
    pub fn new(repertoire: Arc<Repertoire>) -> Self {
        let mut slots: [Vec<u32>; SpellCategory::COUNT] = Default::default();
        for group in repertoire.groups() {
            slots[group.category.index()] = vec![group.category.base_weight(); group.spells.len()];
        }
        Self { repertoire, slots }
    }

    pub fn repertoire(&self) -> &Repertoire {
        &self.repertoire
    }

    pub fn get(&self, id: SpellId) -> Option<u32> {
        let i = self.position(id)?;
        Some(self.slots[id.category.index()][i])
    }

    /// No-op when the spell is not in the repertoire
    pub fn set(&mut self, id: SpellId, weight: u32) {
        if let Some(i) = self.position(id) {
            tracing::trace!(?id, weight, "set weight");
            self.slots[id.category.index()][i] = weight;
        }
    }

    pub fn update(&mut self, id: SpellId, f: impl FnOnce(u32) -> u32) {
        if let Some(w) = self.get(id) {
            self.set(id, f(w));
        }
    }

    pub fn remove(&mut self, id: SpellId) {
        self.set(id, 0);
    }

    /// Scale a group by `pct` percent, capped.
    pub fn adjust_group(&mut self, category: SpellCategory, pct: u32) {
        self.adjust_group_where(category, |_| true, pct);
    }

    pub fn adjust_group_where(
        &mut self,
        category: SpellCategory,
        pred: impl Fn(&Spell) -> bool,
        pct: u32,
    ) {
        self.map_group(category, |spell, w| if pred(spell) { scale(w, pct) } else { w });
        tracing::trace!(%category, pct, "adjust group");
    }

    /// Replace every weight in a group with `f(spell, weight)`.
    pub fn map_group(&mut self, category: SpellCategory, mut f: impl FnMut(&Spell, u32) -> u32) {
        let Some(group) = self.repertoire.group(category) else {
            return;
        };
        let slots = &mut self.slots[category.index()];
        for (spell, w) in group.spells.iter().zip(slots.iter_mut()) {
            *w = f(spell, *w);
        }
    }

    pub fn remove_group(&mut self, category: SpellCategory) {
        self.adjust_group(category, 0);
    }

    pub fn remove_group_where(&mut self, category: SpellCategory, pred: impl Fn(&Spell) -> bool) {
        self.adjust_group_where(category, pred, 0);
    }

    /// Strike every matching spell in every group
    pub fn remove_where(&mut self, pred: impl Fn(&Spell) -> bool) {
        for category in SpellCategory::all() {
            self.adjust_group_where(category, &pred, 0);
        }
    }

    pub fn any(&self, pred: impl Fn(&Spell) -> bool) -> bool {
        self.repertoire.spells().any(pred)
    }

    /// Spells with their current weights, in enumeration order
    pub fn iter(&self) -> impl Iterator<Item = (&Spell, u32)> {
        self.repertoire.groups().flat_map(move |g| {
            g.spells
                .iter()
                .zip(self.slots[g.category.index()].iter().copied())
        })
    }

    pub fn group_total(&self, category: SpellCategory) -> u32 {
        self.slots[category.index()].iter().sum()
    }

    pub fn total(&self) -> u32 {
        self.slots.iter().flatten().sum()
    }

    /// Spells that can still be chosen
    pub fn survivors(&self) -> Vec<SpellId> {
        self.iter().filter(|(_, w)| *w > 0).map(|(s, _)| s.id).collect()
    }

    /// Walk the spells subtracting weights from `roll`, returning the spell
    /// at which it drops to zero. `roll` is in `1..=total`.
    pub fn pick(&self, roll: u32) -> Option<Spell> {
        let mut left = i64::from(roll);
        for (spell, w) in self.iter() {
            left -= i64::from(w);
            if left <= 0 {
                return Some(*spell);
            }
        }
        None
    }

    pub fn draw(&self, rng: &mut GameRng) -> Option<Spell> {
        let total = self.total();
        if total == 0 {
            return None;
        }
        let roll = rng.randint1(total);
        let spell = self.pick(roll)?;
        tracing::debug!(total, roll, spell = %spell.name(), "spell chosen");
        Some(spell)
    }

    fn position(&self, id: SpellId) -> Option<usize> {
        self.repertoire
            .group(id.category)?
            .spells
            .iter()
            .position(|s| s.id == id)
    }
}

fn scale(weight: u32, pct: u32) -> u32 {
    let scaled = u64::from(weight) * u64::from(pct) / 100;
    scaled.min(u64::from(MAX_ADJUSTED_WEIGHT)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spell::{Effect, id::heal};

    fn weights(line: &str) -> Weights {
        Weights::new(Arc::new(Repertoire::parse_line(line, 30).unwrap()))
    }

    #[test]
    fn test_base_weights() {
        let w = weights("BO_FIRE | BA_COLD | HEAL | S_UNDEAD | BLINK");
        assert_eq!(w.get(SpellId::projection(SpellCategory::Bolt, Effect::Fire)), Some(15));
        assert_eq!(w.get(SpellId::new(SpellCategory::Heal, heal::SELF)), Some(10));
        assert_eq!(w.total(), 15 + 15 + 10 + 8 + 10);
        assert_eq!(w.get(SpellId::projection(SpellCategory::Bolt, Effect::Acid)), None);
    }

    #[test]
    fn test_adjust_caps() {
        let mut w = weights("BO_FIRE | BO_COLD");
        w.adjust_group(SpellCategory::Bolt, 700);
        assert_eq!(w.group_total(SpellCategory::Bolt), 105 * 2);
        w.adjust_group(SpellCategory::Bolt, 700);
        assert_eq!(w.group_total(SpellCategory::Bolt), 250 * 2);
        w.adjust_group(SpellCategory::Bolt, 50);
        assert_eq!(w.group_total(SpellCategory::Bolt), 125 * 2);
    }

    #[test]
    fn test_remove_where() {
        let mut w = weights("BR_FIRE | BO_FIRE | HEAL");
        w.remove_where(|s| !s.is_innate());
        assert_eq!(w.survivors(), vec![SpellId::projection(SpellCategory::Breath, Effect::Fire)]);
        w.remove(SpellId::projection(SpellCategory::Breath, Effect::Fire));
        assert_eq!(w.total(), 0);
        assert!(w.draw(&mut GameRng::new(1)).is_none());
    }

    #[test]
    fn test_pick_boundaries() {
        // Ball (15) then Bolt (15) then Heal (10)
        let w = weights("HEAL | BO_FIRE | BA_COLD");
        let cat = |roll| w.pick(roll).map(|s| s.id.category);
        assert_eq!(cat(1), Some(SpellCategory::Ball));
        assert_eq!(cat(15), Some(SpellCategory::Ball));
        assert_eq!(cat(16), Some(SpellCategory::Bolt));
        assert_eq!(cat(30), Some(SpellCategory::Bolt));
        assert_eq!(cat(31), Some(SpellCategory::Heal));
        assert_eq!(cat(40), Some(SpellCategory::Heal));
        assert_eq!(cat(41), None);
    }

    #[test]
    fn test_pick_skips_zero_weights() {
        let mut w = weights("BA_COLD | BO_FIRE | HEAL");
        w.remove_group(SpellCategory::Bolt);
        assert_eq!(w.pick(15).map(|s| s.id.category), Some(SpellCategory::Ball));
        assert_eq!(w.pick(16).map(|s| s.id.category), Some(SpellCategory::Heal));
    }
}
