//! A species' spells, partitioned by category

use strum::EnumCount;

use crate::error::ParseError;
use crate::rng::GameRng;

use super::id::{SpellCategory, SpellId};
use super::parse::parse_spell;
use super::Spell;

/// Spells of one category, in insertion order
#[derive(Debug, Clone, PartialEq)]
pub struct SpellGroup {
    pub category: SpellCategory,
    pub spells: Vec<Spell>,
}

impl SpellGroup {
    pub fn new(category: SpellCategory) -> Self {
        Self {
            category,
            spells: Vec::new(),
        }
    }

    pub fn find(&self, id: SpellId) -> Option<&Spell> {
        self.spells.iter().find(|s| s.id == id)
    }
}

/// Every spell a species can cast. Immutable once loaded and shared by all
/// monsters of the species.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Repertoire {
    /// Chance in percent to cast instead of acting otherwise
    pub freq: u32,
    /// Global damage scaling in percent; 0 means unscaled
    pub dam_pct: u32,
    groups: [Option<SpellGroup>; SpellCategory::COUNT],
}

impl Repertoire {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, spell: Spell) {
        let category = spell.id.category;
        self.groups[category.index()]
            .get_or_insert_with(|| SpellGroup::new(category))
            .spells
            .push(spell);
    }

    pub fn find(&self, id: SpellId) -> Option<&Spell> {
        self.group(id.category)?.find(id)
    }

    pub fn group(&self, category: SpellCategory) -> Option<&SpellGroup> {
        self.groups[category.index()].as_ref()
    }

    pub fn has_group(&self, category: SpellCategory) -> bool {
        self.group(category).is_some_and(|g| !g.spells.is_empty())
    }

    /// Groups in category order
    pub fn groups(&self) -> impl Iterator<Item = &SpellGroup> {
        self.groups.iter().flatten()
    }

    /// All spells, group by group in category order
    pub fn spells(&self) -> impl Iterator<Item = &Spell> {
        self.groups().flat_map(|g| g.spells.iter())
    }

    pub fn len(&self) -> usize {
        self.groups().map(|g| g.spells.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Any spell with equal chance, ignoring every tactical concern.
    pub fn random_uniform(&self, rng: &mut GameRng) -> Option<&Spell> {
        let n = self.len();
        if n == 0 {
            return None;
        }
        self.spells().nth(rng.randint0(n as u32) as usize)
    }

    pub fn scale_damage(&self, dam: i32) -> i32 {
        if self.dam_pct == 0 {
            dam
        } else {
            (i64::from(dam) * i64::from(self.dam_pct) / 100) as i32
        }
    }

    /// Parse a `|` separated species spell line, failing on the first bad token.
    ///
    /// Besides spell tokens the line may carry `1_IN_<n>` and `POWER_<p>%`.
    pub fn parse_line(line: &str, rlev: i32) -> Result<Self, ParseError> {
        let mut rep = Self::new();
        for token in tokens(line) {
            rep.apply_token(token, rlev)?;
        }
        Ok(rep)
    }

    /// Like [`Repertoire::parse_line`], but skips bad tokens and returns them.
    pub fn parse_line_lenient(line: &str, rlev: i32) -> (Self, Vec<ParseError>) {
        let mut rep = Self::new();
        let mut errors = Vec::new();
        for token in tokens(line) {
            if let Err(err) = rep.apply_token(token, rlev) {
                tracing::warn!(token, %err, "skipping spell token");
                errors.push(err);
            }
        }
        (rep, errors)
    }

    fn apply_token(&mut self, token: &str, rlev: i32) -> Result<(), ParseError> {
        if let Some(n) = token.strip_prefix("1_IN_") {
            let n: u32 = n
                .parse()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| ParseError::BadFrequency(token.to_string()))?;
            self.freq = 100 / n;
            return Ok(());
        }
        if let Some(p) = token.strip_prefix("POWER_") {
            self.dam_pct = p
                .strip_suffix('%')
                .and_then(|p| p.parse().ok())
                .ok_or_else(|| ParseError::BadPower(token.to_string()))?;
            return Ok(());
        }
        self.add(parse_spell(token, rlev)?);
        Ok(())
    }
}

fn tokens(line: &str) -> impl Iterator<Item = &str> {
    line.split('|').map(str::trim).filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spell::effect::Effect;
    use crate::spell::id::heal;

    const LINE: &str = "1_IN_3 | BLINK | HEAL | BO_FIRE | BA_COLD | BO_COLD | S_UNDEAD";

    #[test]
    fn test_parse_line() {
        let rep = Repertoire::parse_line(LINE, 30).unwrap();
        assert_eq!(rep.freq, 33);
        assert_eq!(rep.dam_pct, 0);
        assert_eq!(rep.len(), 6);
        assert_eq!(rep.group(SpellCategory::Bolt).unwrap().spells.len(), 2);
        assert!(rep.has_group(SpellCategory::Summon));
        assert!(!rep.has_group(SpellCategory::Breath));
    }

    #[test]
    fn test_enumeration_order() {
        let rep = Repertoire::parse_line(LINE, 30).unwrap();
        let cats: Vec<_> = rep.spells().map(|s| s.id.category).collect();
        assert_eq!(
            cats,
            [
                SpellCategory::Ball,
                SpellCategory::Bolt,
                SpellCategory::Bolt,
                SpellCategory::Summon,
                SpellCategory::Heal,
                SpellCategory::Tactic,
            ]
        );
        let bolts: Vec<_> = rep.group(SpellCategory::Bolt).unwrap().spells.iter().map(|s| s.id.effect).collect();
        assert_eq!(bolts, [Effect::Fire as i16, Effect::Cold as i16]);
    }

    #[test]
    fn test_find() {
        let rep = Repertoire::parse_line(LINE, 30).unwrap();
        assert!(rep.find(SpellId::new(SpellCategory::Heal, heal::SELF)).is_some());
        assert!(rep.find(SpellId::projection(SpellCategory::Bolt, Effect::Acid)).is_none());
        assert!(rep.find(SpellId::projection(SpellCategory::Breath, Effect::Fire)).is_none());
    }

    #[test]
    fn test_power() {
        let rep = Repertoire::parse_line("POWER_150% | BO_FIRE", 30).unwrap();
        assert_eq!(rep.dam_pct, 150);
        assert_eq!(rep.scale_damage(100), 150);
        assert_eq!(Repertoire::new().scale_damage(100), 100);
    }

    #[test]
    fn test_bad_frequency_and_power() {
        assert!(matches!(Repertoire::parse_line("1_IN_0", 1), Err(ParseError::BadFrequency(_))));
        assert!(matches!(Repertoire::parse_line("1_IN_x", 1), Err(ParseError::BadFrequency(_))));
        assert!(matches!(Repertoire::parse_line("POWER_150", 1), Err(ParseError::BadPower(_))));
    }

    #[test]
    fn test_lenient() {
        let (rep, errors) = Repertoire::parse_line_lenient("BO_FIRE | BO_PIZZA | S_KITTENS | HEAL", 10);
        assert_eq!(rep.len(), 2);
        assert_eq!(errors.len(), 2);
        assert!(Repertoire::parse_line("BO_FIRE | BO_PIZZA", 10).is_err());
    }

    #[test]
    fn test_random_uniform_covers_all() {
        let rep = Repertoire::parse_line(LINE, 30).unwrap();
        let mut rng = GameRng::new(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(rep.random_uniform(&mut rng).unwrap().id);
        }
        assert_eq!(seen.len(), rep.len());
        assert!(Repertoire::new().random_uniform(&mut rng).is_none());
    }
}
