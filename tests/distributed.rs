//! Distributed-grid integration tests: sequential equivalence, routing
//! stability and the distributed naive baseline.

mod common;

use common::{small_params, DoubleSpeck, ToyCollision};
use vowcrack::net::route;
use vowcrack::problem::CollisionProblem;
use vowcrack::{
    claw_search, distributed_claw_search, distributed_collision_search,
    naive_distributed_claw_search, Params, Prng,
};

/// Parameters for a small 4x4 grid with frequent CALLHOMEs so version
/// rotation and stop stay live on tiny problems.
fn grid_params(ram_bytes: u64, difficulty: u32) -> Params {
    Params {
        n_send: Some(4),
        recv_per_node: 4,
        callhome_interval: 16,
        ping_delay_ms: 0,
        buffer_capacity: 16,
        ..small_params(ram_bytes, difficulty)
    }
}

/// With a fixed problem instance the golden claw is unique, so the grid
/// must return exactly the sequential engine's answer (S5).
#[test]
fn test_distributed_matches_sequential() {
    let mut seed_prng = Prng::new(0x1337);
    let pb = DoubleSpeck::new(12, 12, &mut seed_prng);

    let mut seq_params = small_params(1 << 14, 3);
    let mut seq_prng = Prng::new(0xabc);
    let seq = claw_search(&pb, &mut seq_params, &mut seq_prng).unwrap();

    let mut dist_params = grid_params(1 << 14, 3);
    let mut dist_prng = Prng::new(0xdef);
    let dist = distributed_claw_search(&pb, &mut dist_params, &mut dist_prng).unwrap();

    assert_eq!((seq.x0, seq.x1), (dist.x0, dist.x1));
    assert_eq!((dist.x0, dist.x1), (pb.khi, pb.klo));
}

#[test]
fn test_distributed_collision_postconditions() {
    let pb = ToyCollision;
    let mut params = grid_params(1 << 14, 4);
    let mut prng = Prng::new(0x77);
    let sol = distributed_collision_search(&pb, &mut params, &mut prng).unwrap();

    assert_ne!(sol.x0, sol.x1);
    assert_eq!(pb.f(sol.x0), pb.f(sol.x1));
    assert!(sol.n_eval > 0);
}

/// Every sender must agree on the owner of a DP end value (invariant 5).
#[test]
fn test_routing_is_stable_across_callers() {
    for n_recv in [1usize, 3, 4, 7] {
        for end in (0..4096u64).map(|i| i.wrapping_mul(0x9e37_79b9)) {
            let first = route(end, n_recv);
            assert!(first < n_recv);
            assert_eq!(first, route(end, n_recv));
        }
    }
}

/// The two-phase distributed naive baseline finds exactly the claws the
/// sequential oracle finds.
#[test]
fn test_distributed_naive_parity() {
    let mut prng = Prng::new(0x1337);
    let pb = DoubleSpeck::new(10, 10, &mut prng);

    let mut expected = vowcrack::naive_claw_search(&pb);
    expected.sort_unstable();

    let mut params = grid_params(1 << 14, 3);
    let got = naive_distributed_claw_search(&pb, &mut params).unwrap();
    assert_eq!(got, expected);
    assert!(got.contains(&(pb.khi, pb.klo)));
}
