//! Named spells
//!
//! Tokens listed here win over the prefix rules in the parser, which is how
//! `BA_CHAOS` becomes "Invoke Logrus" instead of a plain chaos ball. Spells
//! found only through prefixes have no [`SpellDisplay`] and get generic
//! messages at cast time.

use std::sync::LazyLock;

use crate::color::Color;

use super::SpellFlags;
use super::effect::Effect;
use super::id::{SpellCategory, SpellId, annoy, buff, debuff, escape, heal, special, tactic};
use super::template::Template;

/// Name, color and messages of a catalog spell.
///
/// A missing message slot means the spell is silent for that audience; the
/// effect itself reports what happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellDisplay {
    pub name: &'static str,
    pub color: Color,
    /// Seen by the player as the target
    pub cast: Option<Template>,
    /// Heard by a blind player
    pub blind: Option<Template>,
    /// Seen by the player when a monster is the target
    pub cast_mon: Option<Template>,
    /// Used when the player casts it
    pub cast_plr: Option<Template>,
}

#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub tokens: &'static [&'static str],
    pub id: SpellId,
    pub flags: SpellFlags,
    pub display: SpellDisplay,
}

struct Row {
    tokens: &'static [&'static str],
    id: SpellId,
    name: &'static str,
    color: Color,
    msgs: [&'static str; 4],
    flags: SpellFlags,
}

const fn row(
    tokens: &'static [&'static str],
    id: SpellId,
    name: &'static str,
    color: Color,
    msgs: [&'static str; 4],
    flags: SpellFlags,
) -> Row {
    Row {
        tokens,
        id,
        name,
        color,
        msgs,
        flags,
    }
}

const NONE: SpellFlags = SpellFlags::empty();
const TARGET: SpellFlags = SpellFlags::TARGET;
const SILENT: [&str; 4] = ["", "", "", ""];

const fn id(category: SpellCategory, effect: i16) -> SpellId {
    SpellId::new(category, effect)
}

const fn gf(category: SpellCategory, effect: Effect) -> SpellId {
    SpellId::projection(category, effect)
}

use SpellCategory::{Annoy, Ball, Beam, Bolt, Buff, Curse, Debuff, Escape, Heal, Special, Tactic};

static ROWS: &[Row] = &[
    // Annoy
    row(&["AMNESIA"], id(Annoy, annoy::AMNESIA), "Amnesia", Color::LightBlue, [
        "$CASTER tries to blank your mind.",
        "$CASTER tries to blank your mind.",
        "",
        "",
    ], TARGET),
    row(&["ANIM_DEAD"], id(Annoy, annoy::ANIMATE_DEAD), "Animate Dead", Color::LightDark, [
        "$CASTER casts a spell to revive the dead.",
        "$CASTER mumbles.",
        "",
        "",
    ], NONE),
    row(&["BLIND"], id(Annoy, annoy::BLIND), "Blind", Color::White, [
        "$CASTER casts a spell, burning your eyes!",
        "$CASTER mumbles.",
        "",
        "",
    ], TARGET),
    row(&["CONFUSE"], id(Annoy, annoy::CONFUSE), "Confuse", Color::LightUmber, [
        "$CASTER creates a mesmerizing illusion.",
        "$CASTER mumbles, and you hear puzzling noises.",
        "",
        "",
    ], TARGET),
    row(&["DARKNESS"], id(Annoy, annoy::DARKNESS), "Create Darkness", Color::LightDark, SILENT, NONE),
    row(&["PARALYZE", "HOLD"], id(Annoy, annoy::PARALYZE), "Paralyze", Color::Red, [
        "$CASTER stares deep into your eyes!",
        "$CASTER mumbles.",
        "",
        "",
    ], TARGET),
    row(&["SCARE"], id(Annoy, annoy::SCARE), "Terrify", Color::Red, [
        "$CASTER casts a fearful illusion.",
        "$CASTER mumbles, and you hear scary noises.",
        "",
        "",
    ], TARGET),
    row(&["SLOW"], id(Annoy, annoy::SLOW), "Slow", Color::LightUmber, [
        "$CASTER drains power from your muscles!",
        "$CASTER drains power from your muscles!",
        "",
        "",
    ], TARGET),
    row(&["SHRIEK"], id(Annoy, annoy::SHRIEK), "Shriek", Color::LightBlue, [
        "$CASTER makes a high pitched shriek.",
        "$CASTER makes a high pitched shriek.",
        "",
        "",
    ], SpellFlags::INNATE),
    row(&["TELE_LEVEL"], id(Annoy, annoy::TELE_LEVEL), "Teleport Level", Color::White, [
        "$CASTER gestures at your feet.",
        "$CASTER mumbles strangely.",
        "",
        "",
    ], TARGET),
    row(&["TELE_TO"], id(Annoy, annoy::TELE_TO), "Teleport To", Color::White, [
        "$CASTER commands you to return.",
        "$CASTER mumbles.",
        "",
        "",
    ], TARGET),
    row(&["TRAPS"], id(Annoy, annoy::TRAPS), "Create Traps", Color::White, [
        "$CASTER casts a spell and cackles evilly.",
        "$CASTER mumbles gleefully.",
        "",
        "",
    ], TARGET),
    row(&["WORLD"], id(Annoy, annoy::WORLD), "Stop Time", Color::LightBlue, SILENT, NONE),
    // Debuff
    row(&["ANTI_MAGIC"], id(Debuff, debuff::ANTI_MAGIC), "Anti-Magic", Color::LightBlue, [
        "$CASTER invokes <color:B>Anti-Magic</color>.",
        "$CASTER mumbles powerfully.",
        "",
        "You invoke <color:B>Anti-Magic</color>.",
    ], TARGET),
    row(&["DISPEL_MAGIC"], id(Debuff, debuff::DISPEL_MAGIC), "Dispel Magic", Color::LightBlue, [
        "$CASTER invokes <color:B>Dispel Magic</color>.",
        "$CASTER mumbles powerfully.",
        "",
        "You invoke <color:B>Dispel Magic</color>.",
    ], TARGET),
    row(&["POLYMORPH"], id(Debuff, debuff::POLYMORPH), "Polymorph Other", Color::Red, [
        "$CASTER invokes <color:r>Polymorph Other</color>.",
        "$CASTER mumbles powerfully.",
        "",
        "You invoke <color:r>Polymorph Other</color>.",
    ], TARGET),
    // Buff
    row(&["HASTE"], id(Buff, buff::HASTE), "Haste Self", Color::White, [
        "$CASTER concentrates on $CASTER_POS body.",
        "$CASTER mumbles.",
        "$CASTER concentrates on $CASTER_POS body.",
        "You concentrate on your body.",
    ], NONE),
    row(&["INVULN"], id(Buff, buff::INVULN), "Invulnerability", Color::Yellow, [
        "$CASTER casts a <color:y>Globe of Invulnerability</color>.",
        "$CASTER mumbles powerfully.",
        "$CASTER casts a <color:y>Globe of Invulnerability</color>.",
        "You cast a <color:y>Globe of Invulnerability</color>.",
    ], NONE),
    // Ball
    row(&["BA_CHAOS"], gf(Ball, Effect::Chaos), "Invoke Logrus", Color::Violet, [
        "$CASTER invokes a <color:v>Raw Logrus</color>.",
        "$CASTER mumbles frighteningly.",
        "$CASTER invokes a <color:v>Raw Logrus</color> at $TARGET.",
        "You invoke a <color:v>Raw Logrus</color>.",
    ], TARGET),
    row(&["BA_DARK"], gf(Ball, Effect::Dark), "Darkness Storm", Color::LightDark, [
        "$CASTER invokes a <color:D>Darkness Storm</color>.",
        "$CASTER mumbles powerfully.",
        "$CASTER invokes a <color:D>Darkness Storm</color> at $TARGET.",
        "You invoke a <color:D>Darkness Storm</color>.",
    ], TARGET),
    row(&["BA_LITE"], gf(Ball, Effect::Lite), "Starburst", Color::Yellow, [
        "$CASTER invokes a <color:y>Starburst</color>.",
        "$CASTER mumbles powerfully.",
        "$CASTER invokes a <color:y>Starburst</color> at $TARGET.",
        "You invoke a <color:y>Starburst</color>.",
    ], TARGET),
    row(&["BA_MANA", "MANA_STORM"], gf(Ball, Effect::Mana), "Mana Storm", Color::LightBlue, [
        "$CASTER invokes a <color:B>Mana Storm</color>.",
        "$CASTER mumbles powerfully.",
        "$CASTER invokes a <color:B>Mana Storm</color> at $TARGET.",
        "You invoke a <color:B>Mana Storm</color>.",
    ], TARGET),
    row(&["BA_NUKE"], gf(Ball, Effect::Nuke), "Radiation Ball", Color::LightGreen, [
        "$CASTER casts a <color:G>Ball of Radiation</color>.",
        "$CASTER mumbles.",
        "$CASTER casts a <color:G>Ball of Radiation</color> at $TARGET.",
        "You cast a <color:G>Ball of Radiation</color>.",
    ], TARGET),
    row(&["BA_POIS"], gf(Ball, Effect::Pois), "Stinking Cloud", Color::LightGreen, [
        "$CASTER casts a <color:G>Stinking Cloud</color>.",
        "$CASTER mumbles.",
        "$CASTER casts a <color:G>Stinking Cloud</color> at $TARGET.",
        "You cast a <color:G>Stinking Cloud</color>.",
    ], TARGET),
    row(&["BA_WATER"], gf(Ball, Effect::Water), "Whirlpool", Color::LightBlue, [
        "$CASTER gestures fluidly. You are engulfed in a <color:B>Whirlpool</color>.",
        "$CASTER mumbles. You are engulfed in a <color:B>Whirlpool</color>.",
        "$CASTER gestures fluidly. $TARGET is engulfed in a <color:B>Whirlpool</color>.",
        "You gesture fluidly.",
    ], TARGET),
    row(&["BRAIN_SMASH"], gf(Ball, Effect::BrainSmash), "Brain Smash", Color::LightBlue, [
        "$CASTER gazes deep into your eyes.",
        "You feel something focusing on your mind.",
        "$CASTER gazes deep into the eyes of $TARGET.",
        "You gaze deeply.",
    ], SpellFlags::FIRST_IN_GROUP.union(TARGET)),
    row(&["DRAIN_MANA"], gf(Ball, Effect::DrainMana), "Drain Mana", Color::LightBlue, SILENT,
        SpellFlags::FIRST_IN_GROUP.union(TARGET)),
    row(&["MIND_BLAST"], gf(Ball, Effect::MindBlast), "Mind Blast", Color::LightBlue, [
        "$CASTER gazes deep into your eyes.",
        "You feel something focusing on your mind.",
        "$CASTER gazes deep into the eyes of $TARGET.",
        "You gaze deeply.",
    ], SpellFlags::FIRST_IN_GROUP.union(TARGET)),
    row(&["PULVERISE"], gf(Ball, Effect::Telekinesis), "Pulverise", Color::LightBlue, [
        "$CASTER <color:B>pulverises</color> you.",
        "Something <color:B>pulverises</color> you.",
        "$CASTER <color:B>pulverises</color> $TARGET.",
        "",
    ], TARGET),
    row(&["ROCKET"], gf(Ball, Effect::Rocket), "Rocket", Color::LightUmber, [
        "$CASTER fires a <color:U>Rocket</color>.",
        "$CASTER shoots something.",
        "$CASTER fires a <color:U>Rocket</color> at $TARGET.",
        "You fire a <color:U>Rocket</color>.",
    ], SpellFlags::INNATE.union(TARGET)),
    row(&["THROW"], gf(Ball, Effect::Rock), "Throw Boulder", Color::LightUmber, [
        "$CASTER throws a large rock.",
        "$CASTER shouts, 'Haaa!!'.",
        "$CASTER throws a large rock at $TARGET.",
        "You throw a large rock.",
    ], SpellFlags::INNATE.union(SpellFlags::FIRST_IN_GROUP).union(TARGET)),
    // Bolt
    row(&["GAZE"], gf(Bolt, Effect::Attack), "Gaze", Color::Red, [
        "$CASTER gazes at you.",
        "",
        "$CASTER gazes at $TARGET.",
        "",
    ], TARGET),
    row(&["MISSILE"], gf(Bolt, Effect::Missile), "Magic Missile", Color::White, [
        "$CASTER casts a Magic Missile.",
        "$CASTER mumbles.",
        "$CASTER casts a Magic Missile at $TARGET.",
        "You cast a Magic Missile.",
    ], TARGET),
    row(&["SHOOT"], gf(Bolt, Effect::Arrow), "Shoot", Color::LightUmber, [
        "$CASTER fires an arrow.",
        "$CASTER makes a strange noise.",
        "$CASTER fires an arrow at $TARGET.",
        "You fire an arrow.",
    ], SpellFlags::INNATE.union(TARGET)),
    // Beam
    row(&["PSY_SPEAR"], gf(Beam, Effect::PsySpear), "Psycho-Spear", Color::LightBlue, [
        "$CASTER throws a <color:B>Psycho-Spear</color>.",
        "$CASTER mumbles.",
        "$CASTER throws a <color:B>Psycho-Spear</color> at $TARGET.",
        "You throw a <color:B>Psycho-Spear</color>.",
    ], TARGET),
    row(&["HELL_LANCE"], gf(Beam, Effect::HellFire), "Hell Lance", Color::Red, [
        "$CASTER throws a <color:r>Hell Lance</color>.",
        "$CASTER mumbles.",
        "$CASTER throws a <color:r>Hell Lance</color> at $TARGET.",
        "You throw a <color:r>Hell Lance</color>.",
    ], TARGET),
    row(&["HOLY_LANCE"], gf(Beam, Effect::HolyFire), "Holy Lance", Color::Yellow, [
        "$CASTER throws a <color:y>Holy Lance</color>.",
        "$CASTER mumbles.",
        "$CASTER throws a <color:y>Holy Lance</color> at $TARGET.",
        "You throw a <color:y>Holy Lance</color>.",
    ], TARGET),
    // Curse
    row(&["CAUSE_1"], gf(Curse, Effect::Cause1), "Cause Light Wounds", Color::Red, [
        "$CASTER points at you and curses.",
        "$CASTER curses.",
        "$CASTER points at $TARGET and curses.",
        "You curse.",
    ], TARGET),
    row(&["CAUSE_2"], gf(Curse, Effect::Cause2), "Cause Serious Wounds", Color::Red, [
        "$CASTER points at you and curses horribly.",
        "$CASTER curses horribly.",
        "$CASTER points at $TARGET and curses horribly.",
        "You curse horribly.",
    ], TARGET),
    row(&["CAUSE_3"], gf(Curse, Effect::Cause3), "Cause Critical Wounds", Color::Red, [
        "$CASTER points at you, incanting terribly!",
        "$CASTER incants terribly.",
        "$CASTER points at $TARGET, incanting terribly!",
        "You incant terribly.",
    ], TARGET),
    row(&["CAUSE_4"], gf(Curse, Effect::Cause4), "Cause Mortal Wounds", Color::Red, [
        "$CASTER points at you, screaming the word DIE!",
        "$CASTER screams the word DIE!",
        "$CASTER points at $TARGET, screaming the word DIE!",
        "You scream the word DIE!",
    ], TARGET),
    row(&["HAND_DOOM"], gf(Curse, Effect::HandDoom), "Hand of Doom", Color::Red, [
        "$CASTER invokes the <color:r>Hand of Doom</color>!",
        "$CASTER invokes the <color:r>Hand of Doom</color>!",
        "$CASTER invokes the <color:r>Hand of Doom</color> at $TARGET.",
        "You invoke the <color:r>Hand of Doom</color>!",
    ], TARGET),
    // Escape
    row(&["TELE_OTHER"], id(Escape, escape::TELE_OTHER), "Teleport Away", Color::White, SILENT, TARGET),
    row(&["TELE_SELF"], id(Escape, escape::TELE_SELF), "Teleport", Color::White, SILENT, NONE),
    // Tactic
    row(&["BLINK"], id(Tactic, tactic::BLINK), "Blink", Color::White, SILENT, NONE),
    row(&["BLINK_OTHER"], id(Tactic, tactic::BLINK_OTHER), "Blink Away", Color::White, SILENT, TARGET),
    // Heal
    row(&["HEAL"], id(Heal, heal::SELF), "Heal Self", Color::White, [
        "$CASTER concentrates on $CASTER_POS wounds.",
        "$CASTER mumbles.",
        "$CASTER concentrates on $CASTER_POS wounds.",
        "You concentrate on your wounds.",
    ], NONE),
    // Special
    row(&["SPECIAL"], id(Special, special::SPECIAL), "Something Weird", Color::Red, SILENT, NONE),
];

fn message(src: &str) -> Option<Template> {
    if src.is_empty() {
        None
    } else {
        Some(Template::parse(src))
    }
}

static CATALOG: LazyLock<Vec<CatalogEntry>> = LazyLock::new(|| {
    ROWS.iter()
        .map(|r| CatalogEntry {
            tokens: r.tokens,
            id: r.id,
            flags: r.flags,
            display: SpellDisplay {
                name: r.name,
                color: r.color,
                cast: message(r.msgs[0]),
                blind: message(r.msgs[1]),
                cast_mon: message(r.msgs[2]),
                cast_plr: message(r.msgs[3]),
            },
        })
        .collect()
});

pub fn entries() -> &'static [CatalogEntry] {
    &CATALOG
}

/// Exact token match
pub fn lookup_token(token: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|e| e.tokens.contains(&token))
}

pub fn lookup_id(id: SpellId) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|e| e.id == id)
}
