//! Spell token parser
//!
//! A token is a spell name optionally followed by parenthesized parameter
//! overrides, e.g. `BO_FIRE(9d8+10)` or `BR_NETH(20%)`. Names resolve in
//! this order: the catalog, `S_` summons, then the `BR_`, `BA_`, `BO_` and
//! `JMP_` prefixes with an effect suffix.

use crate::error::ParseError;

use super::catalog::{self, SpellDisplay};
use super::effect::Effect;
use super::id::{SpellCategory, SpellId};
use super::param::default_param;
use super::summon::SummonKind;
use super::{Spell, SpellFlags};

const PREFIXES: &[(&str, SpellCategory, SpellFlags)] = &[
    ("BR_", SpellCategory::Breath, SpellFlags::INNATE.union(SpellFlags::TARGET)),
    ("BA_", SpellCategory::Ball, SpellFlags::TARGET),
    ("BO_", SpellCategory::Bolt, SpellFlags::TARGET),
    ("JMP_", SpellCategory::Tactic, SpellFlags::empty()),
];

/// Parse one spell token for a caster of level `rlev`.
pub fn parse_spell(token: &str, rlev: i32) -> Result<Spell, ParseError> {
    let token = token.trim();
    let (name, args) = split_args(token)?;
    let (id, flags, display) = resolve(name)?;

    let mut param = default_param(id, rlev);
    for arg in args {
        param.apply_override(name, arg)?;
    }
    Ok(Spell {
        id,
        param,
        display,
        flags,
    })
}

fn split_args(token: &str) -> Result<(&str, Vec<&str>), ParseError> {
    let Some(open) = token.find('(') else {
        return Ok((token, Vec::new()));
    };
    let name = &token[..open];
    let inner = &token[open + 1..];
    let inner = inner
        .strip_suffix(')')
        .ok_or_else(|| ParseError::MalformedArgument {
            token: name.to_string(),
            arg: inner.to_string(),
        })?;
    let args = inner
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .collect();
    Ok((name, args))
}

type Resolved = (SpellId, SpellFlags, Option<&'static SpellDisplay>);

fn resolve(name: &str) -> Result<Resolved, ParseError> {
    if let Some(entry) = catalog::lookup_token(name) {
        return Ok((entry.id, entry.flags, Some(&entry.display)));
    }

    if let Some(rest) = name.strip_prefix("S_") {
        let kind =
            SummonKind::parse_token(rest).ok_or_else(|| ParseError::UnknownSummon(rest.to_string()))?;
        return Ok((SpellId::summon(kind), SpellFlags::empty(), None));
    }

    let (category, flags, suffix) = PREFIXES
        .iter()
        .find_map(|&(prefix, cat, flags)| name.strip_prefix(prefix).map(|s| (cat, flags, s)))
        .ok_or_else(|| ParseError::UnknownToken(name.to_string()))?;
    let effect = Effect::parse_token(suffix).ok_or_else(|| ParseError::UnknownEffect {
        token: name.to_string(),
        effect: suffix.to_string(),
    })?;
    let id = SpellId::projection(category, effect);
    Ok((id, flags, catalog::lookup_id(id).map(|e| &e.display)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spell::id::annoy;
    use crate::spell::param::{Dice, HpPct, ParamKind, SpellParam};

    #[test]
    fn test_catalog_first() {
        let spell = parse_spell("BA_MANA", 40).unwrap();
        assert_eq!(spell.id, SpellId::projection(SpellCategory::Ball, Effect::Mana));
        assert_eq!(spell.name(), "Mana Storm");
    }

    #[test]
    fn test_prefixes() {
        let br = parse_spell("BR_FIRE", 40).unwrap();
        assert_eq!(br.id.category, SpellCategory::Breath);
        assert!(br.is_innate());
        assert_eq!(br.param, SpellParam::HpPct(HpPct::new(20, 900)));

        let bo = parse_spell("BO_FIRE", 30).unwrap();
        assert_eq!(bo.param, SpellParam::Dice(Dice::new(9, 8, 10)));
        assert!(bo.flags.contains(SpellFlags::TARGET));
        assert!(!bo.is_innate());

        let jmp = parse_spell("JMP_FIRE", 25).unwrap();
        assert!(jmp.id.is_jump());
        assert_eq!(jmp.param, SpellParam::Dice(Dice::flat(25)));
    }

    #[test]
    fn test_summons() {
        let s = parse_spell("S_UNDEAD", 10).unwrap();
        assert_eq!(s.id, SpellId::summon(SummonKind::Undead));
        assert!(matches!(parse_spell("S_KITTENS", 10), Err(ParseError::UnknownSummon(k)) if k == "KITTENS"));
    }

    #[test]
    fn test_unknown() {
        assert!(matches!(parse_spell("FIREWORKS", 1), Err(ParseError::UnknownToken(_))));
        assert!(matches!(
            parse_spell("BO_PIZZA", 1),
            Err(ParseError::UnknownEffect { effect, .. }) if effect == "PIZZA"
        ));
    }

    #[test]
    fn test_overrides() {
        let s = parse_spell("BR_NETH(20%)", 50).unwrap();
        assert_eq!(s.param, SpellParam::HpPct(HpPct::new(20, 550)));

        let s = parse_spell(" BA_FIRE(100d1+50) ", 50).unwrap();
        assert_eq!(s.param.to_string(), "100d1+50");

        let s = parse_spell("GAZE(5d8)", 20).unwrap();
        assert_eq!(s.param, SpellParam::Dice(Dice::new(5, 8, 0)));
    }

    #[test]
    fn test_bad_overrides() {
        assert!(matches!(
            parse_spell("BR_FIRE(3d4)", 10),
            Err(ParseError::IncompatibleOverride { expected: ParamKind::HpPct, .. })
        ));
        assert!(matches!(
            parse_spell("BLIND(3)", 10),
            Err(ParseError::IncompatibleOverride { expected: ParamKind::None, .. })
        ));
        assert!(matches!(
            parse_spell("BO_FIRE(3d4", 10),
            Err(ParseError::MalformedArgument { .. })
        ));
    }

    #[test]
    fn test_no_param() {
        let s = parse_spell("BLIND", 10).unwrap();
        assert_eq!(s.id, SpellId::new(SpellCategory::Annoy, annoy::BLIND));
        assert_eq!(s.param, SpellParam::None);
        assert!(parse_spell("BLIND()", 10).is_ok());
    }
}
