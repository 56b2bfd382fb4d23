//! Distributed full-domain baseline.
//!
//! Two rounds over the same sharded dictionary: phase 0 streams (x, f(x))
//! pairs routed on the image into the receivers, phase 1 streams (x, g(x))
//! and probes. Images ship precomputed so receivers never evaluate f or g
//! on the hot path; a barrier between the phases keeps late phase-0 inserts
//! ahead of early phase-1 probes.

use std::sync::Barrier;

use anyhow::Result;
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use log::debug;

use crate::config::Params;
use crate::dp::CompactDict;
use crate::net::transport::{route, PointMsg, SendBuffers, NAIVE_RECORD_WORDS};
use crate::problem::ClawProblem;

/// All good claws, gathered from every receiver, sorted for stable output.
pub fn naive_distributed_claw_search<P: ClawProblem>(
    pb: &P,
    params: &mut Params,
) -> Result<Vec<(u64, u64)>> {
    params.finalize(pb.domain_bits(), pb.range_bits())?;
    let n_send = params.sender_ranks();
    let n_recv = params.receiver_ranks();
    let domain = 1u64 << pb.domain_bits();

    let mut point_txs: Vec<Sender<PointMsg>> = Vec::with_capacity(n_recv);
    let mut point_rxs: Vec<Receiver<PointMsg>> = Vec::with_capacity(n_recv);
    for _ in 0..n_recv {
        let (tx, rx) = bounded(2 * n_send.max(1));
        point_txs.push(tx);
        point_rxs.push(rx);
    }
    let (result_tx, result_rx) = unbounded::<Vec<(u64, u64)>>();

    // every rank meets here between the insert and probe phases
    let phase_barrier = Barrier::new(n_send + n_recv);
    let slots_per_recv = ((domain as f64 * 1.25) as u64 / n_recv as u64).max(64);
    let buffer_capacity = params.buffer_capacity;

    std::thread::scope(|scope| {
        for rank in 0..n_send {
            let point_txs = point_txs.clone();
            let barrier = &phase_barrier;
            scope.spawn(move || {
                let lo = rank as u64 * domain / n_send as u64;
                let hi = (rank as u64 + 1) * domain / n_send as u64;
                for phase in 0..2 {
                    let mut bufs =
                        SendBuffers::new(point_txs.clone(), buffer_capacity, NAIVE_RECORD_WORDS);
                    for x in lo..hi {
                        let z = if phase == 0 { pb.f(x) } else { pb.g(x) };
                        bufs.push(&[x, z], route(z, n_recv));
                    }
                    bufs.flush_all();
                    debug!("naive sender {}: phase {} done", rank, phase);
                    barrier.wait();
                }
            });
        }

        for rank in 0..n_recv {
            let points = point_rxs[rank].clone();
            let results = result_tx.clone();
            let barrier = &phase_barrier;
            scope.spawn(move || {
                let mut dict = CompactDict::new(slots_per_recv);
                let mut found = Vec::new();
                let mut matches = Vec::new();
                for phase in 0..2 {
                    let mut flushes = 0usize;
                    while flushes < n_send {
                        let words = match points.recv().expect("point channel closed") {
                            PointMsg::Flush => {
                                flushes += 1;
                                continue;
                            }
                            PointMsg::Batch(words) => words,
                        };
                        for record in words.chunks_exact(NAIVE_RECORD_WORDS) {
                            let (x, z) = (record[0], record[1]);
                            if phase == 0 {
                                dict.insert(pb.hash(z), x);
                            } else {
                                dict.probe(pb.hash(z), &mut matches);
                                for &y in &matches {
                                    if pb.f(y) != z {
                                        continue; // truncation false positive
                                    }
                                    if pb.is_good_pair(y, x) {
                                        found.push((y, x));
                                    }
                                }
                            }
                        }
                    }
                    debug!("naive receiver {}: phase {} done", rank, phase);
                    barrier.wait();
                }
                results.send(found).expect("result channel closed");
            });
        }

        drop(result_tx);
        let mut all = Vec::new();
        for found in result_rx.iter() {
            all.extend(found);
        }
        all.sort_unstable();
        Ok(all)
    })
}
