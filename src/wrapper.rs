//! Problem wrappers reducing every supported search to one iteration family.
//!
//! Each wrapper turns the user's f (and g) into `mixf(i, x) = (f|g)(mix_i(x))`
//! over the walk space {0,1}^m, where the version tag `i` selects the mixing
//! permutation and, for claws, the branch selector. A collision of `mixf` is
//! mapped back to user inputs; `same_branch` rejects collisions that cannot
//! be claws; `good_pair` runs the user predicate on the demixed pair.

use crate::problem::{width_mask, ClawProblem, CollisionProblem};

/// A single pseudo-random iteration function family, indexed by version.
///
/// `n_eval` counts applications of `mixf` only; the f/g calls the user
/// predicate makes internally are not counted.
pub trait IterFn {
    /// Width of the walk space in bits.
    fn walk_bits(&self) -> u32;

    fn walk_mask(&self) -> u64 {
        width_mask(self.walk_bits())
    }

    /// One application of the mixing permutation followed by f or g.
    fn mixf(&mut self, i: u64, x: u64) -> u64;

    /// Digest of a range element (distinguished-point predicate and
    /// dictionary key).
    fn hash(&self, y: u64) -> u64;

    /// True when both walk values select the same branch. Always false for
    /// collision search.
    fn same_branch(&self, i: u64, a: u64, b: u64) -> bool;

    /// Map a colliding pair of walk values back to user inputs, f-side
    /// first. Callers must reject same-branch pairs beforehand.
    fn demix_pair(&self, i: u64, a: u64, b: u64) -> (u64, u64);

    /// Run the user predicate on the demixed pair.
    fn good_pair(&self, i: u64, a: u64, b: u64) -> bool;

    fn n_eval(&self) -> u64;
    fn reset_n_eval(&mut self);
}

/// Collision wrapper: g == f, walk space equals the domain.
pub struct CollisionWrapper<'a, P: CollisionProblem> {
    pb: &'a P,
    n_eval: u64,
}

impl<'a, P: CollisionProblem> CollisionWrapper<'a, P> {
    pub fn new(pb: &'a P) -> Self {
        assert_eq!(
            pb.domain_bits(),
            pb.range_bits(),
            "collision mode needs |domain| == |range|"
        );
        CollisionWrapper { pb, n_eval: 0 }
    }

    /// The mixing permutation sigma_i.
    pub fn mix(&self, i: u64, x: u64) -> u64 {
        (i ^ x) & self.pb.mask()
    }
}

impl<'a, P: CollisionProblem> IterFn for CollisionWrapper<'a, P> {
    fn walk_bits(&self) -> u32 {
        self.pb.range_bits()
    }

    fn mixf(&mut self, i: u64, x: u64) -> u64 {
        self.n_eval += 1;
        self.pb.f(self.mix(i, x))
    }

    fn hash(&self, y: u64) -> u64 {
        self.pb.hash(y)
    }

    fn same_branch(&self, _i: u64, _a: u64, _b: u64) -> bool {
        false
    }

    fn demix_pair(&self, i: u64, a: u64, b: u64) -> (u64, u64) {
        (self.mix(i, a), self.mix(i, b))
    }

    fn good_pair(&self, i: u64, a: u64, b: u64) -> bool {
        let (x0, x1) = self.demix_pair(i, a, b);
        self.pb.is_good_pair(x0, x1)
    }

    fn n_eval(&self) -> u64 {
        self.n_eval
    }

    fn reset_n_eval(&mut self) {
        self.n_eval = 0;
    }
}

/// Claw wrapper for |domain| == |range|.
pub struct EqualSizeClawWrapper<'a, P: ClawProblem> {
    pb: &'a P,
    n_eval: u64,
}

impl<'a, P: ClawProblem> EqualSizeClawWrapper<'a, P> {
    pub fn new(pb: &'a P) -> Self {
        assert_eq!(pb.domain_bits(), pb.range_bits());
        EqualSizeClawWrapper { pb, n_eval: 0 }
    }

    /// Branch selector chi_i: true picks f, false picks g.
    pub fn choose(&self, i: u64, x: u64) -> bool {
        (x.wrapping_mul(i | 1) >> (self.pb.range_bits() - 1)) & 1 == 1
    }

    pub fn mix(&self, i: u64, x: u64) -> u64 {
        (i ^ x) & self.pb.mask()
    }

    /// Order a mixed pair so the f-side comes first.
    pub fn swap(&self, i: u64, a: u64, b: u64) -> (u64, u64) {
        let x0 = if self.choose(i, a) { a } else { b };
        let x1 = if self.choose(i, b) { a } else { b };
        debug_assert!(self.choose(i, x0) && !self.choose(i, x1));
        (x0, x1)
    }
}

impl<'a, P: ClawProblem> IterFn for EqualSizeClawWrapper<'a, P> {
    fn walk_bits(&self) -> u32 {
        self.pb.range_bits()
    }

    fn mixf(&mut self, i: u64, x: u64) -> u64 {
        self.n_eval += 1;
        let y = self.mix(i, x);
        if self.choose(i, x) {
            self.pb.f(y)
        } else {
            self.pb.g(y)
        }
    }

    fn hash(&self, y: u64) -> u64 {
        self.pb.hash(y)
    }

    fn same_branch(&self, i: u64, a: u64, b: u64) -> bool {
        self.choose(i, a) == self.choose(i, b)
    }

    fn demix_pair(&self, i: u64, a: u64, b: u64) -> (u64, u64) {
        let (x0, x1) = self.swap(i, a, b);
        (self.mix(i, x0), self.mix(i, x1))
    }

    fn good_pair(&self, i: u64, a: u64, b: u64) -> bool {
        if self.same_branch(i, a, b) {
            return false;
        }
        let (x0, x1) = self.demix_pair(i, a, b);
        self.pb.is_good_pair(x0, x1)
    }

    fn n_eval(&self) -> u64 {
        self.n_eval
    }

    fn reset_n_eval(&mut self) {
        self.n_eval = 0;
    }
}

/// Claw wrapper for |domain| < |range|: the walk lives in the m-bit range
/// and mixing compresses down to the n-bit domain.
pub struct LargerRangeClawWrapper<'a, P: ClawProblem> {
    pb: &'a P,
    n_eval: u64,
}

impl<'a, P: ClawProblem> LargerRangeClawWrapper<'a, P> {
    pub fn new(pb: &'a P) -> Self {
        assert!(pb.domain_bits() < pb.range_bits());
        LargerRangeClawWrapper { pb, n_eval: 0 }
    }

    pub fn choose(&self, _i: u64, x: u64) -> bool {
        x & 1 == 1
    }

    /// {0,1}^m -> {0,1}^n
    pub fn mix(&self, i: u64, x: u64) -> u64 {
        ((i ^ x) & width_mask(self.pb.range_bits())) >> (self.pb.range_bits() - self.pb.domain_bits())
    }

    pub fn swap(&self, i: u64, a: u64, b: u64) -> (u64, u64) {
        let x0 = if self.choose(i, a) { a } else { b };
        let x1 = if self.choose(i, b) { a } else { b };
        debug_assert!(self.choose(i, x0) && !self.choose(i, x1));
        (x0, x1)
    }
}

impl<'a, P: ClawProblem> IterFn for LargerRangeClawWrapper<'a, P> {
    fn walk_bits(&self) -> u32 {
        self.pb.range_bits()
    }

    fn mixf(&mut self, i: u64, x: u64) -> u64 {
        self.n_eval += 1;
        let y = self.mix(i, x);
        if self.choose(i, x) {
            self.pb.f(y)
        } else {
            self.pb.g(y)
        }
    }

    fn hash(&self, y: u64) -> u64 {
        self.pb.hash(y)
    }

    fn same_branch(&self, i: u64, a: u64, b: u64) -> bool {
        self.choose(i, a) == self.choose(i, b)
    }

    fn demix_pair(&self, i: u64, a: u64, b: u64) -> (u64, u64) {
        let (x0, x1) = self.swap(i, a, b);
        (self.mix(i, x0), self.mix(i, x1))
    }

    fn good_pair(&self, i: u64, a: u64, b: u64) -> bool {
        if self.same_branch(i, a, b) {
            return false;
        }
        let (x0, x1) = self.demix_pair(i, a, b);
        self.pb.is_good_pair(x0, x1)
    }

    fn n_eval(&self) -> u64 {
        self.n_eval
    }

    fn reset_n_eval(&mut self) {
        self.n_eval = 0;
    }
}
