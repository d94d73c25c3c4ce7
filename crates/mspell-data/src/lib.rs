//! mspell-data: species definitions for the spell engine
//!
//! A static table of spellcasting species and the allies they summon, plus a
//! loader that parses each species' spell line into a shared repertoire.

pub mod loader;
pub mod species;

pub use loader::{Bestiary, LoadMode, load, load_defs};
pub use species::{SPECIES, SpeciesDef, num_species};
