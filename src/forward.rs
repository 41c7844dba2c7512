//! Forward derivation of a population seed from a structure seed.
//!
//! Two revisions of the construction exist. They share the four 48-bit
//! affine constants and differ only in how the two combined intermediates
//! are forced odd: the early revision rounds through a truncating signed
//! division, the late revision ORs the low bit on.

use crate::bits::MASK_48;

pub(crate) const M1: u64 = 25214903917;
pub(crate) const A1: u64 = 11;
pub(crate) const M2: u64 = 205749139540585;
pub(crate) const A2: u64 = 277363943098;
pub(crate) const M3: u64 = 233752471717045;
pub(crate) const A3: u64 = 11718085204285;
pub(crate) const M4: u64 = 55986898099985;
pub(crate) const A4: u64 = 49720483695876;

/// Which revision of the derivation to model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Truncating-division rounding; chunk coordinates used unscaled.
    Early,
    /// Bitwise force-to-odd; salted, chunk coordinates scaled by 16.
    Late,
}

/// Derive the population seed for `structure_seed` at coordinates `(x, z)`.
///
/// Total over the 48-bit seed domain. All arithmetic wraps modulo 2^64
/// before the final 48-bit reduction. `x` and `z` are the already-scaled
/// coordinates; the late variant multiplies chunk coordinates by 16 before
/// reaching this function.
pub fn population_seed(variant: Variant, structure_seed: u64, x: i64, z: i64) -> u64 {
    let xored = structure_seed ^ M1;
    let c1 = (((xored.wrapping_mul(M1).wrapping_add(A1)) & MASK_48) >> 16) as u32;
    let c2 = (((xored.wrapping_mul(M2).wrapping_add(A2)) & MASK_48) >> 16) as u32;
    let c3 = (((xored.wrapping_mul(M3).wrapping_add(A3)) & MASK_48) >> 16) as u32;
    let c4 = (((xored.wrapping_mul(M4).wrapping_add(A4)) & MASK_48) >> 16) as u32;

    // The low halves reenter as signed quantities: widen via i32, not a
    // zero-extend.
    let l1 = ((c1 as u64) << 32).wrapping_add(c2 as i32 as i64 as u64);
    let l2 = ((c3 as u64) << 32).wrapping_add(c4 as i32 as i64 as u64);

    let (a, b) = match variant {
        Variant::Early => (force_odd_rounded(l1), force_odd_rounded(l2)),
        Variant::Late => (l1 | 1, l2 | 1),
    };

    ((x as u64).wrapping_mul(a).wrapping_add((z as u64).wrapping_mul(b)) ^ structure_seed)
        & MASK_48
}

/// Early-variant rounding: truncating signed division rounds toward zero,
/// so the odd result sits above the input for non-negative values and
/// below it for negative ones.
fn force_odd_rounded(l: u64) -> u64 {
    ((l as i64) / 2).wrapping_mul(2).wrapping_add(1) as u64
}
