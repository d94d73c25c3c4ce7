//! Cast messages
//!
//! A message comes from the first source that has one: the per-species
//! flavor table, then the spell's catalog display, then a generic line built
//! from the effect name. A catalog display with an empty slot is silent on
//! purpose; the effect itself reports what happened.

use std::sync::LazyLock;

use hashbrown::HashMap;

use crate::race::NamedRace;
use crate::spell::{Effect, SpellCategory, SpellDisplay, SpellId, SummonKind, Template};
use crate::world::SpellWorld;

use super::context::{CastContext, CastFlags};

/// Who is reading the message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    /// The player cast the spell
    PlayerCaster,
    /// Cast at the player, who can see
    Player,
    /// Cast at the player, who is blind
    Blind,
    /// Cast at a monster in view
    Monster,
    /// Neither party is in view
    Unseen,
}

impl Audience {
    pub fn of(world: &dyn SpellWorld, cast: &CastContext) -> Self {
        if cast.has(CastFlags::SRC_PLAYER) {
            Audience::PlayerCaster
        } else if cast.has(CastFlags::DEST_PLAYER) {
            if world.player().is_blind() {
                Audience::Blind
            } else {
                Audience::Player
            }
        } else if cast.has(CastFlags::UNVIEW) {
            Audience::Unseen
        } else {
            Audience::Monster
        }
    }
}

/// Species flavor lines, in the same slot order as [`SpellDisplay`]
struct Flavor {
    cast: Template,
    blind: Template,
    cast_mon: Template,
    cast_plr: Template,
}

impl Flavor {
    fn new(lines: [&str; 4]) -> Self {
        let [cast, blind, cast_mon, cast_plr] = lines.map(Template::parse);
        Self {
            cast,
            blind,
            cast_mon,
            cast_plr,
        }
    }

    fn slot(&self, audience: Audience) -> Option<&Template> {
        match audience {
            Audience::PlayerCaster => Some(&self.cast_plr),
            Audience::Player => Some(&self.cast),
            Audience::Blind => Some(&self.blind),
            Audience::Monster => Some(&self.cast_mon),
            Audience::Unseen => None,
        }
    }
}

static FLAVOR: LazyLock<HashMap<(NamedRace, SpellId), Flavor>> = LazyLock::new(|| {
    let grenade = "$CASTER throws a hand grenade.";
    let mut table = HashMap::new();
    table.insert(
        (NamedRace::Ninja, SpellId::projection(SpellCategory::Bolt, Effect::Arrow)),
        Flavor::new([
            "$CASTER throws a syuriken.",
            "",
            "$CASTER throws a syuriken at $TARGET.",
            "You throw a syuriken.",
        ]),
    );
    table.insert(
        (NamedRace::Jaian, SpellId::projection(SpellCategory::Breath, Effect::Sound)),
        Flavor::new(["'Booooeeeeee'"; 4]),
    );
    table.insert(
        (NamedRace::Botei, SpellId::projection(SpellCategory::Breath, Effect::Shards)),
        Flavor::new(["'Botei-Build cutter!!!'"; 4]),
    );
    table.insert(
        (NamedRace::Rolento, SpellId::projection(SpellCategory::Ball, Effect::Fire)),
        Flavor::new([
            grenade,
            grenade,
            "$CASTER throws a hand grenade at $TARGET.",
            "You throw a hand grenade.",
        ]),
    );
    table
});

fn display_slot(display: &SpellDisplay, audience: Audience) -> Option<&Template> {
    match audience {
        Audience::PlayerCaster => display.cast_plr.as_ref(),
        Audience::Player => display.cast.as_ref(),
        Audience::Blind => display.blind.as_ref(),
        Audience::Monster => display.cast_mon.as_ref(),
        Audience::Unseen => None,
    }
}

fn a_an(noun: &str) -> &'static str {
    match noun.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

/// Generic line for breaths, balls, bolts and summons outside the catalog
fn fallback(id: SpellId, audience: Audience) -> Option<Template> {
    let text = match (id.category, audience) {
        (_, Audience::Unseen) => return None,
        (SpellCategory::Breath, Audience::Blind) => "$CASTER roars.".to_string(),
        (SpellCategory::Ball | SpellCategory::Bolt | SpellCategory::Summon, Audience::Blind) => {
            "$CASTER mumbles.".to_string()
        }
        (SpellCategory::Breath, _) => {
            let effect = id.as_effect()?;
            let what = effect.color().markup(effect.name());
            match audience {
                Audience::PlayerCaster => format!("You breathe {what}."),
                Audience::Monster => format!("$CASTER breathes {what} at $TARGET."),
                _ => format!("$CASTER breathes {what}."),
            }
        }
        (SpellCategory::Ball | SpellCategory::Bolt, _) => {
            let Some(effect) = id.as_effect() else {
                tracing::warn!(?id, "no effect for generic message");
                return None;
            };
            let shape = if id.category == SpellCategory::Ball { "Ball" } else { "Bolt" };
            let what = format!(
                "{} {}",
                a_an(effect.name()),
                effect.color().markup(&format!("{} {shape}", effect.name()))
            );
            match audience {
                Audience::PlayerCaster => format!("You cast {what}."),
                Audience::Monster => format!("$CASTER casts {what} at $TARGET."),
                _ => format!("$CASTER casts {what}."),
            }
        }
        (SpellCategory::Summon, _) => {
            let kind = id.as_summon().unwrap_or(SummonKind::Monster);
            let what = kind.color().markup(kind.name());
            match audience {
                Audience::PlayerCaster => format!("You summon {what}."),
                _ => format!("$CASTER summons {what}."),
            }
        }
        _ => return None,
    };
    Some(Template::parse(&text))
}

/// The rendered message for the chosen spell, or `None` for silence.
pub fn cast_message(world: &dyn SpellWorld, cast: &CastContext) -> Option<String> {
    let spell = cast.spell?;
    let audience = Audience::of(world, cast);

    let rendered = if let Some(flavor) = cast
        .race
        .named
        .and_then(|named| FLAVOR.get(&(named, spell.id)))
    {
        flavor.slot(audience)?.render(&cast.vars())
    } else if let Some(display) = spell.display {
        display_slot(display, audience)?.render(&cast.vars())
    } else {
        fallback(spell.id, audience)?.render(&cast.vars())
    };

    if rendered.is_empty() { None } else { Some(rendered) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a_an() {
        assert_eq!(a_an("Acid"), "an");
        assert_eq!(a_an("Ice"), "an");
        assert_eq!(a_an("Fire"), "a");
        assert_eq!(a_an(""), "a");
    }

    #[test]
    fn test_fallback_ball() {
        let id = SpellId::projection(SpellCategory::Ball, Effect::Acid);
        let t = fallback(id, Audience::Player).unwrap();
        let vars = crate::spell::MessageVars {
            caster: "The mage",
            ..Default::default()
        };
        assert_eq!(
            t.render(&vars),
            "The mage casts an <color:g>Acid Ball</color>."
        );
    }

    #[test]
    fn test_fallback_blind_and_unseen() {
        let breath = SpellId::projection(SpellCategory::Breath, Effect::Fire);
        let vars = crate::spell::MessageVars {
            caster: "It",
            ..Default::default()
        };
        assert_eq!(
            fallback(breath, Audience::Blind).unwrap().render(&vars),
            "It roars."
        );
        assert!(fallback(breath, Audience::Unseen).is_none());
    }

    #[test]
    fn test_flavor_table() {
        let key = (NamedRace::Jaian, SpellId::projection(SpellCategory::Breath, Effect::Sound));
        let flavor = FLAVOR.get(&key).unwrap();
        let vars = crate::spell::MessageVars::default();
        assert_eq!(
            flavor.slot(Audience::Blind).unwrap().render(&vars),
            "'Booooeeeeee'"
        );
        assert!(flavor.slot(Audience::Unseen).is_none());
    }
}
