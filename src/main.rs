//! Demo drivers for the collision / claw engine.
//!
//! Two built-in problems: a 16-bit toy collision and double-Speck64 key
//! recovery, each runnable on the sequential engine or the thread grid.

use anyhow::{bail, Result};
use clap::Parser;
use log::info;

use vowcrack::config::{parse_seed, Params};
use vowcrack::engine::{claw_search, collision_search};
use vowcrack::net::{distributed_claw_search, distributed_collision_search};
use vowcrack::problem::{width_mask, BlackBox, ClawProblem, CollisionProblem};
use vowcrack::speck;
use vowcrack::utils::logging::{log_golden, setup_logging};
use vowcrack::utils::prng::{mix64, Prng};

#[derive(Parser)]
#[command(
    version,
    about = "van Oorschot-Wiener golden collision / claw search demos"
)]
struct Args {
    /// Problem to run: "toy" (16-bit collision) or "speck" (double-Speck64
    /// claw).
    #[arg(long, default_value = "speck")]
    demo: String,

    /// Key width in bits for the Speck demo.
    #[arg(long, default_value_t = 20)]
    n: u32,

    /// PRNG seed, hexadecimal.
    #[arg(long, value_parser = parse_seed, default_value = "1337")]
    seed: u64,

    /// Run on the thread grid instead of the sequential engine.
    #[arg(long)]
    distributed: bool,

    #[command(flatten)]
    params: Params,
}

/// Toy collision target: f(x) = 42 x^2 + 1337 mod 2^16. Every output is
/// odd, so the DP predicate needs the mixing hash.
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
        debug_assert_eq!(x & self.mask(), x);
        (42 * x * x + 1337) & self.mask()
    }
    fn is_good_pair(&self, x0: u64, x1: u64) -> bool {
        x0 != x1
    }
}

/// Double-Speck64 key recovery. f encrypts P[0] under the first cascade
/// key, g decrypts C[0] under the second; a claw f(khi) = g(klo) meets in
/// the middle and the second plaintext-ciphertext pair selects the golden
/// one.
struct DoubleSpeck64 {
    n: u32,
    p: [[u32; 2]; 2],
    c: [[u32; 2]; 2],
}

fn key_words(k: u64) -> [u32; 4] {
    [(k & 0xffff_ffff) as u32, (k >> 32) as u32, 0, 0]
}

impl DoubleSpeck64 {
    /// Draw the secret cascade keys from `prng` and precompute both
    /// plaintext-ciphertext pairs.
    fn new(n: u32, prng: &mut Prng) -> Self {
        assert!((1..=64).contains(&n));
        let mask = width_mask(n);
        let khi = prng.next_u64() & mask;
        let klo = prng.next_u64() & mask;
        let rka = speck::key_schedule(key_words(khi));
        let rkb = speck::key_schedule(key_words(klo));
        let p = [[0, 0], [0xffff_ffff, 0xffff_ffff]];
        let mut c = [[0u32; 2]; 2];
        for t in 0..2 {
            c[t] = speck::encrypt(speck::encrypt(p[t], &rka), &rkb);
        }
        let pb = DoubleSpeck64 { n, p, c };
        debug_assert_eq!(pb.f(khi), pb.g(klo));
        debug_assert!(pb.is_good_pair(khi, klo));
        pb
    }
}

impl BlackBox for DoubleSpeck64 {
    fn domain_bits(&self) -> u32 {
        self.n
    }
    fn range_bits(&self) -> u32 {
        self.n
    }
}

impl ClawProblem for DoubleSpeck64 {
    fn f(&self, k: u64) -> u64 {
        debug_assert_eq!(k & self.mask(), k);
        let rk = speck::key_schedule(key_words(k));
        let ct = speck::encrypt(self.p[0], &rk);
        (ct[0] as u64 ^ ((ct[1] as u64) << 32)) & self.mask()
    }

    fn g(&self, k: u64) -> u64 {
        debug_assert_eq!(k & self.mask(), k);
        let rk = speck::key_schedule(key_words(k));
        let pt = speck::decrypt(self.c[0], &rk);
        (pt[0] as u64 ^ ((pt[1] as u64) << 32)) & self.mask()
    }

    fn is_good_pair(&self, khi: u64, klo: u64) -> bool {
        let rka = speck::key_schedule(key_words(khi));
        let rkb = speck::key_schedule(key_words(klo));
        speck::encrypt(speck::encrypt(self.p[1], &rka), &rkb) == self.c[1]
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.params.verbose);
    let mut params = args.params.clone();
    let mut prng = Prng::new(args.seed);

    match args.demo.as_str() {
        "toy" => {
            let pb = ToyCollision;
            let sol = if args.distributed {
                distributed_collision_search(&pb, &mut params, &mut prng)?
            } else {
                collision_search(&pb, &mut params, &mut prng)?
            };
            println!("f({:#x}) = f({:#x}) = {:#x}", sol.x0, sol.x1, pb.f(sol.x0));
            println!("{}", sol);
        }
        "speck" => {
            info!(
                "double-speck64 demo: seed={:#018x}, n={}",
                args.seed, args.n
            );
            let pb = DoubleSpeck64::new(args.n, &mut prng);
            // the engine walks an independent child stream, so the problem
            // instance only depends on the seed, not on the engine's draws
            let mut engine_prng = prng.split();
            let sol = if args.distributed {
                distributed_claw_search(&pb, &mut params, &mut engine_prng)?
            } else {
                claw_search(&pb, &mut params, &mut engine_prng)?
            };
            log_golden(sol.x0, sol.x1);
            println!("f({:#x}) = g({:#x})", sol.x0, sol.x1);
            println!("{}", sol);
        }
        other => bail!("unknown demo {:?} (expected \"toy\" or \"speck\")", other),
    }
    Ok(())
}
