//! Exhaustive structure-seed search for degenerate coordinate pairs.
//!
//! When `x*M2 + z*M4` carries 16 or more trailing zeros, a lifting step
//! resolves no bits at all and the algebraic path cannot start. This
//! search instead extends every possible low 16-bit value one bit at a
//! time, pruning each branch against the partial congruence the target
//! imposes, and verifies survivors exactly at full width.

use crate::bits::mask;
use crate::forward::{self, Variant, A2, A4, M1, M2, M4};
use crate::reverse::{push_result, rounding_offsets};

/// Append every structure seed whose derivation at `(x, z)` reproduces
/// `population_seed`, by pruned exhaustive search.
///
/// Correct for any coordinate pair, not just degenerate ones; the cost is
/// exponential in the worst case but the congruence prune cuts branches
/// long before full width in practice.
pub fn structure_seeds(
    variant: Variant,
    population_seed: u64,
    x: i64,
    z: i64,
    out: &mut Vec<u64>,
) {
    let from = out.len();
    let query = Query {
        variant,
        population_seed,
        x,
        z,
    };
    for offset in rounding_offsets(variant, x as u64, z as u64) {
        for low in 0..1u64 << 16 {
            query.extend(offset, low, 16, from, out);
        }
    }
}

struct Query {
    variant: Variant,
    population_seed: u64,
    x: i64,
    z: i64,
}

impl Query {
    /// Grow `seed` from `bits` known low bits toward 48, pruning before
    /// every expansion.
    fn extend(&self, offset: u64, seed: u64, bits: u32, from: usize, out: &mut Vec<u64>) {
        let xored = seed ^ M1;
        let lhs = (self.x as u64)
            .wrapping_mul(xored.wrapping_mul(M2).wrapping_add(A2) >> 16)
            .wrapping_add(
                (self.z as u64).wrapping_mul(xored.wrapping_mul(M4).wrapping_add(A4) >> 16),
            )
            .wrapping_add(offset);
        if (lhs ^ seed ^ self.population_seed) & mask(bits - 16) != 0 {
            return;
        }

        if bits == 48 {
            if forward::population_seed(self.variant, seed, self.x, self.z)
                == self.population_seed
            {
                push_result(out, from, seed);
            }
            return;
        }

        self.extend(offset, seed, bits + 1, from, out);
        self.extend(offset, seed + (1 << bits), bits + 1, from, out);
    }
}
