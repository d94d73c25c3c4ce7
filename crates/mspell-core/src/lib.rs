//! mspell-core: monster spellcasting for an Angband-style dungeon
//!
//! Species carry a [`spell::Repertoire`] parsed from data lines. Each turn a
//! caster builds a [`cast::CastContext`], a [`cast::SpellAi`] weighs its
//! spells and draws one, and the execution engine resolves it against the
//! game through the [`world::SpellWorld`] traits. The crate owns no dungeon
//! state of its own.

pub mod cast;
pub mod color;
pub mod error;
pub mod geom;
pub mod options;
pub mod race;
pub mod spell;
pub mod wizard;
pub mod world;

mod consts;
mod rng;

pub use consts::*;
pub use rng::GameRng;
