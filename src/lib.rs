//! vowcrack - parallel van Oorschot-Wiener golden collision / claw search.
//!
//! Given black-box functions f, g over finite bit-strings and a predicate
//! picking the one pair that matters, find (x0, x1) with f(x0) == g(x1) and
//! is_good_pair(x0, x1). The engine enumerates many incidental collisions
//! of a randomized iteration function with the distinguished-point method,
//! stores chain milestones in a fixed-capacity compact dictionary, and
//! filters candidates by local chain replay. A message-passing
//! sender/receiver grid scales the same semantics across ranks; a naive
//! full-domain baseline serves as a verification oracle.

#![deny(unsafe_code)]

pub mod config;
pub mod dp;
pub mod engine;
pub mod net;
pub mod problem;
pub mod speck;
pub mod stats;
pub mod utils;
pub mod wrapper;

pub use config::Params;
pub use engine::{claw_search, collision_search, naive_claw_search, naive_collision_search};
pub use net::{distributed_claw_search, distributed_collision_search, naive_distributed_claw_search};
pub use problem::{BlackBox, ClawProblem, CollisionProblem};
pub use stats::{SearchCounters, Solution, Telemetry};
pub use utils::prng::Prng;
