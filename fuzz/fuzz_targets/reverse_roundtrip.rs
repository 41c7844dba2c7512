use honggfuzz::fuzz;
use popseed::{population_seed, structure_seeds, Variant};

const MASK_48: u64 = (1 << 48) - 1;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            if data.len() < 11 {
                return;
            }
            let variant = if data[0] & 1 == 0 {
                Variant::Early
            } else {
                Variant::Late
            };
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(&data[1..9]);
            let seed = u64::from_le_bytes(bytes) & MASK_48;
            let x = data[9] as i8 as i64;
            let z = data[10] as i8 as i64;

            let pop = population_seed(variant, seed, x, z);
            let mut out = Vec::new();
            structure_seeds(variant, pop, x, z, &mut out);
            assert!(out.contains(&seed), "lost {seed} at ({x}, {z})");
            for &c in &out {
                assert_eq!(population_seed(variant, c, x, z), pop);
            }
        });
    }
}
