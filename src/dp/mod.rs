//! Distinguished-point machinery: compact dictionary, chain walker,
//! collision walk-back.

pub mod chain;
pub mod dict;

pub use chain::{
    is_distinguished, resolve_candidate, walk_back, walk_to_dp, Resolution, WalkBack,
    DP_STEP_MULTIPLIER,
};
pub use dict::{CompactDict, DictStats, ProbeOutcome, SLOT_BYTES};
