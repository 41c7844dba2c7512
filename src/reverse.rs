//! Bit-by-bit algebraic inversion of the forward derivation.
//!
//! The derivation shifts each affine term right by 16, so the low 16 bits
//! of the unknown decide the next 16-bit window of the output while the
//! already-resolved high bits feed back through a single constant
//! multiplier. When that multiplier is odd the recurrence is invertible 16
//! bits per step; every trailing zero of the multiplier costs one bit of
//! resolution per step, and at 16 trailing zeros nothing remains to invert
//! and the exhaustive [`fallback`](crate::fallback) takes over.

use crate::bits::{mask, mod_inverse, trailing_zeros};
use crate::fallback;
use crate::forward::{self, Variant, A2, A4, M1, M2, M4};

/// Append every structure seed whose derivation at `(x, z)` reproduces
/// `population_seed`.
///
/// The result set is exact: no false negatives, no false positives, no
/// duplicates. Order is the natural enumeration order of the lifting
/// sweep. Results are appended to `out`, which is not cleared.
pub fn structure_seeds(
    variant: Variant,
    population_seed: u64,
    x: i64,
    z: i64,
    out: &mut Vec<u64>,
) {
    if x == 0 && z == 0 {
        // Both coordinate terms vanish and the derivation collapses to
        // `population_seed = structure_seed`.
        out.push(population_seed);
        return;
    }

    let xu = x as u64;
    let zu = z as u64;

    let constant_mult = xu.wrapping_mul(M2).wrapping_add(zu.wrapping_mul(M4));
    let zeros = trailing_zeros(constant_mult);
    if zeros >= 16 {
        fallback::structure_seeds(variant, population_seed, x, z, out);
        return;
    }
    let inv = mod_inverse(constant_mult >> zeros);

    let x_zeros = trailing_zeros(xu);
    let z_zeros = trailing_zeros(zu);
    let xz_zeros = trailing_zeros(xu | zu);

    let offsets = rounding_offsets(variant, xu, zu);
    let result_const = population_seed ^ M1;
    let from = out.len();

    // The two forced-odd terms tie the parity of the unknown's low window
    // to the target, so only every 2^(xz_zeros+1)-th low value can be
    // consistent.
    let parity = ((x_zeros != z_zeros) as u64) << xz_zeros;
    let mut low = ((population_seed ^ M1) & mask(xz_zeros + 1)) ^ parity;
    while low < 1 << 16 {
        let addend_base = xu
            .wrapping_mul(low.wrapping_mul(M2).wrapping_add(A2) >> 16)
            .wrapping_add(zu.wrapping_mul(low.wrapping_mul(M4).wrapping_add(A4) >> 16));

        for &offset in &offsets {
            let addend_const = addend_base.wrapping_add(offset);
            let Some(resolved) = lift(low, addend_const, result_const, constant_mult, inv, zeros)
            else {
                continue;
            };

            // The lifted value is a residue class modulo 2^(48-zeros); the
            // low `zeros` bits were never constrained, so only the exact
            // forward check separates members of the class.
            let resolved_bits = 48 - zeros;
            let mut candidate = (resolved ^ M1) & mask(resolved_bits);
            while candidate < 1 << 48 {
                if forward::population_seed(variant, candidate, x, z) == population_seed {
                    push_result(out, from, candidate);
                }
                candidate += 1 << resolved_bits;
            }
        }

        low += 1 << (xz_zeros + 1);
    }
}

/// Resolve the unknown's remaining bits from 16 known low bits of its
/// XOR-with-M1 form, `16 - zeros` bits per iteration.
///
/// Returns the resolved value on success, which then carries exactly
/// `48 - zeros` meaningful bits, or `None` when a residual check shows the
/// branch is inconsistent with the target.
fn lift(
    low: u64,
    addend_const: u64,
    result_const: u64,
    constant_mult: u64,
    inv: u64,
    zeros: u32,
) -> Option<u64> {
    let mut seed = low;
    let mut bits = 16u32;
    while bits < 48 {
        let bits_left = 48 - bits as i32;
        let bits_this_iter = (bits_left - zeros as i32).min(16 - zeros as i32);

        let addend = addend_const.wrapping_add((seed >> 16).wrapping_mul(constant_mult));
        let residual = (result_const ^ seed).wrapping_sub(addend) >> (bits - 16);

        if bits_this_iter <= 0 {
            // Fewer unresolved bits than trailing zeros: nothing more can
            // be extracted, but the leftover residual must still vanish.
            if residual & mask(bits_left as u32) != 0 {
                return None;
            }
            break;
        }
        if residual & mask(zeros) != 0 {
            return None;
        }

        let window = (residual >> zeros).wrapping_mul(inv) & mask(bits_this_iter as u32);
        seed += window << bits;
        bits += bits_this_iter as u32;
    }
    Some(seed)
}

/// All distinct additive corrections the rounding step can introduce.
///
/// The late variant's `OR 1` moves each term up by at most one coordinate;
/// the early variant's truncating division can move each term by up to two.
pub(crate) fn rounding_offsets(variant: Variant, x: u64, z: u64) -> Vec<u64> {
    let span = match variant {
        Variant::Early => 3,
        Variant::Late => 2,
    };
    let mut offsets = Vec::with_capacity(9);
    for i in 0..span {
        for j in 0..span {
            let offset = x.wrapping_mul(i).wrapping_add(z.wrapping_mul(j));
            if !offsets.contains(&offset) {
                offsets.push(offset);
            }
        }
    }
    offsets
}

/// Append `seed` unless this query already produced it. Distinct rounding
/// offsets can occasionally resolve to the same verified seed.
pub(crate) fn push_result(out: &mut Vec<u64>, from: usize, seed: u64) {
    if !out[from..].contains(&seed) {
        out.push(seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_coordinates_return_population_seed() {
        for variant in [Variant::Early, Variant::Late] {
            let mut out = Vec::new();
            structure_seeds(variant, 0xABCD_EF12_3456, 0, 0, &mut out);
            assert_eq!(out, vec![0xABCD_EF12_3456]);
        }
    }

    #[test]
    fn offsets_are_deduplicated() {
        // x == z collapses the grid onto a diagonal.
        let offs = rounding_offsets(Variant::Early, 4, 4);
        assert_eq!(offs.len(), 5);
        let offs = rounding_offsets(Variant::Late, 4, 4);
        assert_eq!(offs.len(), 3);
        // z = 0 collapses one axis entirely.
        let offs = rounding_offsets(Variant::Late, 16, 0);
        assert_eq!(offs, vec![0, 16]);
    }

    #[test]
    fn recovers_planted_seed_both_variants() {
        for variant in [Variant::Early, Variant::Late] {
            for seed in [1u64, 0x7FFF_FFFF_FFFF, 0x0123_4567_89AB] {
                let pop = forward::population_seed(variant, seed, 9, -4);
                let mut out = Vec::new();
                structure_seeds(variant, pop, 9, -4, &mut out);
                assert!(out.contains(&seed), "{variant:?} lost seed {seed}");
                for &c in &out {
                    assert_eq!(forward::population_seed(variant, c, 9, -4), pop);
                }
            }
        }
    }

    #[test]
    fn no_duplicates_within_a_query() {
        let pop = forward::population_seed(Variant::Late, 77, 32, -16);
        let mut out = Vec::new();
        structure_seeds(Variant::Late, pop, 32, -16, &mut out);
        let mut sorted = out.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), out.len());
    }
}
