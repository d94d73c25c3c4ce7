//! mspell-arena: a small in-memory level for running the spell engine
//!
//! [`Arena`] implements every world trait the engine needs, keeping a log of
//! messages and projections so casts can be inspected afterwards. It backs
//! the probe tool and the engine's integration tests.

pub mod arena;
pub mod grid;

pub use arena::Arena;
pub use grid::Grid;
