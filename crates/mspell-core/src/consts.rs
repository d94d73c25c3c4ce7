//! Engine-wide constants

/// Longest distance a spell will travel
pub const MAX_RANGE: i32 = 18;

/// Below this percentage of missing HP a caster is not considered wounded
pub const WOUNDED_THRESHOLD: i32 = 20;

/// Cap on any single weight after learned-resistance adjustment
pub const MAX_LEARNED_WEIGHT: u32 = 200;

/// Cap on any single weight after a percentage adjustment
pub const MAX_ADJUSTED_WEIGHT: u32 = 250;

/// Weight given to disintegration breath when it is the only way through
pub const DISINTEGRATE_WEIGHT: u32 = 150;

/// Base spell failure chance, reduced by caster level
pub const BASE_FAIL_RATE: i32 = 25;

/// Turns of haste granted by the player's spell-reaction ability
pub const SPELL_REACTION_HASTE: i32 = 4;

/// How far a monster teleports itself
pub const TELEPORT_SELF_DISTANCE: i32 = 45;

/// How far a teleport-away spell sends its target
pub const TELEPORT_OTHER_DISTANCE: i32 = 100;

pub const BLINK_DISTANCE: i32 = 10;
