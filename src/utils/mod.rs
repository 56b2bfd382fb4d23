//! Ambient utilities: PRNG, memory probe, logging.

pub mod logging;
pub mod memory;
pub mod prng;
