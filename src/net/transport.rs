//! Buffered, flow-controlled transport between ranks.
//!
//! Ranks are threads and every link is a FIFO channel. DP traffic is
//! batched into flat u64 arrays with a fixed record arity; a batch is
//! flushed when its per-destination buffer fills, and the bounded point
//! channels turn a slow receiver into sender back-pressure.

use std::time::Instant;

use crossbeam_channel::Sender;

use crate::stats::Telemetry;

/// Words per DP record in the vOW pipeline: (start, end, length).
pub const DP_RECORD_WORDS: usize = 3;
/// Words per record in the naive pipeline: (input, image).
pub const NAIVE_RECORD_WORDS: usize = 2;

/// Control broadcast from the controller to every worker rank.
#[derive(Debug, Clone, Copy)]
pub enum Control {
    Epoch { version: u64, seed_base: u64 },
    Stop,
}

/// Point traffic from senders to receivers.
#[derive(Debug)]
pub enum PointMsg {
    Batch(Vec<u64>),
    /// End-of-epoch marker; each sender emits exactly one per receiver.
    Flush,
}

/// Reports from worker ranks to the controller.
#[derive(Debug, Clone, Copy)]
pub enum Report {
    CallHome { rank: usize, n_dp: u64 },
    Golden { x0: u64, x1: u64 },
    SenderDone { rank: usize, stats: Telemetry },
    ReceiverDone { rank: usize, stats: Telemetry },
}

/// Controller reply to a CALLHOME.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    KeepGoing,
    NewVersion,
}

/// Receiver owning a DP end value. Deterministic, identical on every
/// sender, so equivalent DPs always meet in the same dictionary slice.
/// The multiplier/modulus pair is arbitrary but fixed; see DESIGN.md.
#[inline]
pub fn route(end: u64, n_recv: usize) -> usize {
    ((end.wrapping_mul(0xdead_beef) % 0x7fff_ffff) % n_recv as u64) as usize
}

/// Per-destination batching of fixed-arity u64 records.
pub struct SendBuffers {
    buffers: Vec<Vec<u64>>,
    outputs: Vec<Sender<PointMsg>>,
    capacity_words: usize,
    pub bytes_sent: u64,
    pub send_wait: f64,
}

impl SendBuffers {
    pub fn new(outputs: Vec<Sender<PointMsg>>, capacity_records: usize, record_words: usize) -> Self {
        let capacity_words = capacity_records * record_words;
        SendBuffers {
            buffers: outputs
                .iter()
                .map(|_| Vec::with_capacity(capacity_words))
                .collect(),
            outputs,
            capacity_words,
            bytes_sent: 0,
            send_wait: 0.0,
        }
    }

    pub fn push(&mut self, record: &[u64], target: usize) {
        self.buffers[target].extend_from_slice(record);
        if self.buffers[target].len() >= self.capacity_words {
            self.flush(target);
        }
    }

    fn flush(&mut self, target: usize) {
        if self.buffers[target].is_empty() {
            return;
        }
        let batch = std::mem::replace(
            &mut self.buffers[target],
            Vec::with_capacity(self.capacity_words),
        );
        self.bytes_sent += (batch.len() * 8) as u64;
        let t = Instant::now();
        self.outputs[target]
            .send(PointMsg::Batch(batch))
            .expect("point channel closed");
        self.send_wait += t.elapsed().as_secs_f64();
    }

    /// Flush every buffer and mark the end of the epoch on every link.
    pub fn flush_all(&mut self) {
        for target in 0..self.buffers.len() {
            self.flush(target);
            self.outputs[target]
                .send(PointMsg::Flush)
                .expect("point channel closed");
        }
    }
}
