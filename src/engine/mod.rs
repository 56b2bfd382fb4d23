//! Search entry points.
//!
//! Dispatch the problem to the matching wrapper, run the sequential engine
//! and keep the correctness post-conditions as permanent contract checks:
//! a returned pair always satisfies the masks, the function equation and
//! the user predicate, or the run aborts.

pub mod naive;
pub mod sequential;

pub use naive::{naive_claw_search, naive_collision_search};
pub use sequential::SequentialEngine;

use anyhow::{ensure, Result};
use log::info;

use crate::config::Params;
use crate::problem::{ClawProblem, CollisionProblem};
use crate::stats::Solution;
use crate::utils::prng::Prng;
use crate::wrapper::{CollisionWrapper, EqualSizeClawWrapper, LargerRangeClawWrapper};

/// Find the golden collision of f: x0 != x1, f(x0) == f(x1),
/// is_good_pair(x0, x1).
pub fn collision_search<P: CollisionProblem>(
    pb: &P,
    params: &mut Params,
    prng: &mut Prng,
) -> Result<Solution> {
    params.finalize(pb.domain_bits(), pb.range_bits())?;
    let mut fun = CollisionWrapper::new(pb);
    let mut engine = SequentialEngine::new(params);
    let sol = engine.run(&mut fun, prng);

    let mask = pb.mask();
    assert_eq!(sol.x0 & mask, sol.x0);
    assert_eq!(sol.x1 & mask, sol.x1);
    assert_ne!(sol.x0, sol.x1);
    assert_eq!(pb.f(sol.x0), pb.f(sol.x1));
    assert!(pb.is_good_pair(sol.x0, sol.x1));
    Ok(sol)
}

/// Find the golden claw: f(x0) == g(x1), is_good_pair(x0, x1).
pub fn claw_search<P: ClawProblem>(
    pb: &P,
    params: &mut Params,
    prng: &mut Prng,
) -> Result<Solution> {
    params.finalize(pb.domain_bits(), pb.range_bits())?;
    let mut engine = SequentialEngine::new(params);

    let sol = if pb.domain_bits() == pb.range_bits() {
        if params.verbose {
            info!("claw search, |domain| == |range| mode");
        }
        let mut fun = EqualSizeClawWrapper::new(pb);
        engine.run(&mut fun, prng)
    } else {
        ensure!(
            pb.domain_bits() < pb.range_bits(),
            "larger domain than range is not supported"
        );
        if params.verbose {
            info!("claw search, |domain| < |range| mode");
        }
        let mut fun = LargerRangeClawWrapper::new(pb);
        engine.run(&mut fun, prng)
    };

    let mask = pb.mask();
    assert_eq!(sol.x0 & mask, sol.x0);
    assert_eq!(sol.x1 & mask, sol.x1);
    assert_eq!(pb.f(sol.x0), pb.g(sol.x1));
    assert!(pb.is_good_pair(sol.x0, sol.x1));
    Ok(sol)
}
