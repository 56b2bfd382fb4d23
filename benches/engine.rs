//! Criterion benches: chain-walk cost across the difficulty sweep and the
//! end-to-end toy collision search.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use vowcrack::dp::{walk_to_dp, DP_STEP_MULTIPLIER};
use vowcrack::problem::{BlackBox, CollisionProblem};
use vowcrack::utils::prng::mix64;
use vowcrack::wrapper::{CollisionWrapper, IterFn};
use vowcrack::{collision_search, Params, Prng};

struct ToyCollision;

impl BlackBox for ToyCollision {
    fn domain_bits(&self) -> u32 {
        16
    }
    fn range_bits(&self) -> u32 {
        16
    }
    fn hash(&self, y: u64) -> u64 {
        mix64(y)
    }
}

impl CollisionProblem for ToyCollision {
    fn f(&self, x: u64) -> u64 {
        (42 * x * x + 1337) & self.mask()
    }
    fn is_good_pair(&self, x0: u64, x1: u64) -> bool {
        x0 != x1
    }
}

/// Per-DP wall time should scale roughly as 2^d across the sweep.
fn bench_walk_difficulty_sweep(c: &mut Criterion) {
    let pb = ToyCollision;
    let mut fun = CollisionWrapper::new(&pb);
    let mask = fun.walk_mask();
    let mut group = c.benchmark_group("walk_to_dp");
    for difficulty in [6u32, 10, 14] {
        group.bench_with_input(
            BenchmarkId::from_parameter(difficulty),
            &difficulty,
            |b, &d| {
                let mut seed = 0u64;
                b.iter(|| {
                    seed = seed.wrapping_add(0x9e37_79b9);
                    walk_to_dp(&mut fun, 0xdead_beef, seed & mask, d, DP_STEP_MULTIPLIER << d)
                })
            },
        );
    }
    group.finish();
}

fn bench_toy_collision_search(c: &mut Criterion) {
    let pb = ToyCollision;
    c.bench_function("toy_collision_16bit", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed += 1;
            let mut params = Params {
                ram: Some(1 << 14),
                difficulty: Some(4),
                ..Params::default()
            };
            let mut prng = Prng::new(seed);
            collision_search(&pb, &mut params, &mut prng).unwrap()
        })
    });
}

criterion_group!(benches, bench_walk_difficulty_sweep, bench_toy_collision_search);
criterion_main!(benches);
