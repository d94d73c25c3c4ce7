//! The casting engine: context, selection and execution

pub mod ai;
pub mod context;
pub mod exec;
pub mod msg;
mod special;
pub mod weights;

pub use ai::{MonsterTargetAi, RandomAi, SpellAi, StagedAi};
pub use context::{CastContext, CastFlags};
pub use exec::{CastOutcome, can_cast, cast_at_monster, cast_at_player, choose_target};
pub use msg::{Audience, cast_message};
pub use weights::Weights;
