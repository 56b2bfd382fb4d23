//! Distributed deployment of the vOW engine.
//!
//! One controller, `n_send` chain-producing ranks and `n_recv`
//! dictionary-owning ranks, realized as threads joined by FIFO channels.
//! The semantics match the sequential engine: the dictionary is merely
//! sharded across receivers by a deterministic route of each DP end value,
//! so every candidate collision is resolvable on a single rank.

pub mod controller;
pub mod naive;
pub mod receiver;
pub mod sender;
pub mod transport;

pub use naive::naive_distributed_claw_search;
pub use transport::route;

use std::time::Instant;

use anyhow::{ensure, Result};
use crossbeam_channel::{bounded, unbounded};

use crate::config::Params;
use crate::problem::{ClawProblem, CollisionProblem};
use crate::stats::Solution;
use crate::utils::prng::Prng;
use crate::wrapper::{CollisionWrapper, EqualSizeClawWrapper, IterFn, LargerRangeClawWrapper};
use controller::Controller;
use receiver::ReceiverRank;
use sender::SenderRank;

/// Distributed golden collision search; semantics of
/// `engine::collision_search` on a sender/receiver grid.
pub fn distributed_collision_search<P: CollisionProblem>(
    pb: &P,
    params: &mut Params,
    prng: &mut Prng,
) -> Result<Solution> {
    params.finalize(pb.domain_bits(), pb.range_bits())?;
    let sol = search_grid(params, prng, || CollisionWrapper::new(pb))?;

    let mask = pb.mask();
    assert_eq!(sol.x0 & mask, sol.x0);
    assert_eq!(sol.x1 & mask, sol.x1);
    assert_ne!(sol.x0, sol.x1);
    assert_eq!(pb.f(sol.x0), pb.f(sol.x1));
    assert!(pb.is_good_pair(sol.x0, sol.x1));
    Ok(sol)
}

/// Distributed golden claw search; semantics of `engine::claw_search` on a
/// sender/receiver grid.
pub fn distributed_claw_search<P: ClawProblem>(
    pb: &P,
    params: &mut Params,
    prng: &mut Prng,
) -> Result<Solution> {
    params.finalize(pb.domain_bits(), pb.range_bits())?;
    let sol = if pb.domain_bits() == pb.range_bits() {
        search_grid(params, prng, || EqualSizeClawWrapper::new(pb))?
    } else {
        ensure!(
            pb.domain_bits() < pb.range_bits(),
            "larger domain than range is not supported"
        );
        search_grid(params, prng, || LargerRangeClawWrapper::new(pb))?
    };

    let mask = pb.mask();
    assert_eq!(sol.x0 & mask, sol.x0);
    assert_eq!(sol.x1 & mask, sol.x1);
    assert_eq!(pb.f(sol.x0), pb.g(sol.x1));
    assert!(pb.is_good_pair(sol.x0, sol.x1));
    Ok(sol)
}

/// Wire the channel grid, spawn the worker ranks and run the controller on
/// the calling thread. Every rank gets its own wrapper instance so the
/// evaluation counters stay rank-local.
fn search_grid<F, M>(params: &Params, prng: &mut Prng, make_fun: M) -> Result<Solution>
where
    F: IterFn + Send,
    M: Fn() -> F,
{
    let n_send = params.sender_ranks();
    let n_recv = params.receiver_ranks();
    let t0 = Instant::now();

    let mut control_txs = Vec::with_capacity(n_send + n_recv);
    let mut control_rxs = Vec::with_capacity(n_send + n_recv);
    for _ in 0..(n_send + n_recv) {
        let (tx, rx) = unbounded();
        control_txs.push(tx);
        control_rxs.push(rx);
    }

    // one bounded link per receiver: FIFO per sender-receiver pair, and a
    // full queue blocks the producing sender (back-pressure)
    let mut point_txs = Vec::with_capacity(n_recv);
    let mut point_rxs = Vec::with_capacity(n_recv);
    for _ in 0..n_recv {
        let (tx, rx) = bounded(2 * n_send);
        point_txs.push(tx);
        point_rxs.push(rx);
    }

    let (report_tx, report_rx) = unbounded();

    let mut assign_txs = Vec::with_capacity(n_send);
    let mut assign_rxs = Vec::with_capacity(n_send);
    for _ in 0..n_send {
        let (tx, rx) = unbounded();
        assign_txs.push(tx);
        assign_rxs.push(rx);
    }

    let slots_per_recv = (params.n_slots / n_recv as u64).max(64);

    let outcome = std::thread::scope(|scope| {
        for rank in 0..n_send {
            let worker = SenderRank {
                rank,
                n_send,
                fun: make_fun(),
                control: control_rxs[rank].clone(),
                points: point_txs.clone(),
                reports: report_tx.clone(),
                assignment: assign_rxs[rank].clone(),
            };
            scope.spawn(move || worker.run(params));
        }
        for rank in 0..n_recv {
            let worker = ReceiverRank {
                rank,
                n_send,
                n_slots: slots_per_recv,
                fun: make_fun(),
                control: control_rxs[n_send + rank].clone(),
                points: point_rxs[rank].clone(),
                reports: report_tx.clone(),
            };
            scope.spawn(move || worker.run(params));
        }

        // the calling thread is rank 0, the controller; its version and
        // seed_base stream is a child of the caller's generator
        let mut grid_prng = prng.split();
        let mut ctl = Controller {
            control: control_txs,
            assignments: assign_txs,
            reports: report_rx,
            n_send,
            n_recv,
        };
        ctl.run(params, &mut grid_prng)
    });

    Ok(Solution {
        x0: outcome.x0,
        x1: outcome.x1,
        version: outcome.version,
        n_versions: outcome.n_versions,
        n_eval: outcome.n_eval,
        seconds: t0.elapsed().as_secs_f64(),
    })
}
