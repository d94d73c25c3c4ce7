//! Turns the species table into races with parsed repertoires

use std::sync::Arc;

use mspell_core::error::LoadError;
use mspell_core::race::{MonsterRace, NamedRace, RaceId};
use mspell_core::spell::param::Dice;
use mspell_core::spell::repertoire::Repertoire;

use crate::species::{SPECIES, SpeciesDef};

/// How spell line errors are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// The first bad token aborts the load
    #[default]
    Strict,
    /// Bad tokens are dropped and reported; the rest of the line is kept
    Lenient,
}

/// Every loaded species, indexed by [`RaceId`]
#[derive(Debug, Clone, Default)]
pub struct Bestiary {
    races: Vec<MonsterRace>,
    /// Problems skipped in lenient mode
    pub errors: Vec<LoadError>,
}

impl Bestiary {
    pub fn get(&self, id: RaceId) -> Option<&MonsterRace> {
        self.races.get(id.0 as usize)
    }

    pub fn by_name(&self, name: &str) -> Option<&MonsterRace> {
        self.races.iter().find(|r| r.name.eq_ignore_ascii_case(name))
    }

    pub fn named(&self, named: NamedRace) -> Option<&MonsterRace> {
        self.races.iter().find(|r| r.named == Some(named))
    }

    pub fn iter(&self) -> impl Iterator<Item = &MonsterRace> {
        self.races.iter()
    }

    pub fn casters(&self) -> impl Iterator<Item = &MonsterRace> {
        self.races.iter().filter(|r| r.spells.is_some())
    }

    pub fn len(&self) -> usize {
        self.races.len()
    }

    pub fn is_empty(&self) -> bool {
        self.races.is_empty()
    }

    pub fn into_races(self) -> Vec<MonsterRace> {
        self.races
    }
}

/// Load the built-in species table.
pub fn load(mode: LoadMode) -> Result<Bestiary, LoadError> {
    load_defs(SPECIES, mode)
}

pub fn load_defs(defs: &[SpeciesDef], mode: LoadMode) -> Result<Bestiary, LoadError> {
    let mut out = Bestiary::default();
    for (idx, def) in defs.iter().enumerate() {
        let mut race = MonsterRace::new(RaceId(idx as u16), def.name, def.symbol, def.level);
        race.flags = def.flags;
        race.hit_dice = Dice::new(def.hit_dice.0, def.hit_dice.1, 0);
        if def.is_caster() {
            let rep = match mode {
                LoadMode::Strict => Repertoire::parse_line(def.spells, def.level).map_err(|source| {
                    LoadError {
                        species: def.name.to_string(),
                        source,
                    }
                })?,
                LoadMode::Lenient => {
                    let (rep, errors) = Repertoire::parse_line_lenient(def.spells, def.level);
                    if !errors.is_empty() {
                        tracing::info!(species = def.name, count = errors.len(), "spell line had errors");
                    }
                    for source in errors {
                        out.errors.push(LoadError {
                            species: def.name.to_string(),
                            source,
                        });
                    }
                    rep
                }
            };
            if !rep.is_empty() {
                race.spells = Some(Arc::new(rep));
            }
        }
        out.races.push(race);
    }
    tracing::debug!(count = out.races.len(), "loaded species");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mspell_core::error::ParseError;
    use mspell_core::race::RaceFlags;
    use mspell_core::spell::SpellCategory;

    #[test]
    fn test_builtin_table_loads_strict() {
        let b = load(LoadMode::Strict).unwrap();
        assert_eq!(b.len(), SPECIES.len());
        assert!(b.errors.is_empty());
        assert!(b.casters().count() > 40);
    }

    #[test]
    fn test_ids_index() {
        let b = load(LoadMode::Strict).unwrap();
        for (i, race) in b.iter().enumerate() {
            assert_eq!(race.id, RaceId(i as u16));
            assert_eq!(b.get(race.id).unwrap().name, race.name);
        }
    }

    #[test]
    fn test_named_lookup() {
        let b = load(LoadMode::Strict).unwrap();
        let zeus = b.named(NamedRace::Zeus).unwrap();
        assert!(zeus.flags.contains(RaceFlags::UNIQUE));
        assert!(zeus.spells.as_ref().unwrap().has_group(SpellCategory::Summon));
        assert_eq!(b.by_name("MAGE").unwrap().name, "mage");
    }

    #[test]
    fn test_non_casters() {
        let b = load(LoadMode::Strict).unwrap();
        assert!(b.named(NamedRace::Reindeer).unwrap().spells.is_none());
    }

    const BAD: &[SpeciesDef] = &[
        SpeciesDef::new("good", 'p', 10, (5, 5), RaceFlags::empty(), "1_IN_2 | BLINK"),
        SpeciesDef::new("bad", 'p', 10, (5, 5), RaceFlags::empty(), "1_IN_2 | BLINK | BO_FOO"),
    ];

    #[test]
    fn test_strict_error_names_species() {
        let err = load_defs(BAD, LoadMode::Strict).unwrap_err();
        assert_eq!(err.species, "bad");
        assert!(matches!(err.source, ParseError::UnknownEffect { .. }));
    }

    #[test]
    fn test_lenient_keeps_rest() {
        let b = load_defs(BAD, LoadMode::Lenient).unwrap();
        assert_eq!(b.errors.len(), 1);
        let bad = b.by_name("bad").unwrap();
        assert_eq!(bad.spells.as_ref().unwrap().len(), 1);
    }
}
