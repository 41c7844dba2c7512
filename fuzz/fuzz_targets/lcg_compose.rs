use honggfuzz::fuzz;
use popseed::Lcg;

const MASK_48: u64 = (1 << 48) - 1;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            if data.len() < 24 {
                return;
            }
            let mut word = [0u8; 8];
            word.copy_from_slice(&data[0..8]);
            let m = i64::from_le_bytes(word) >> 8;
            word.copy_from_slice(&data[8..16]);
            let n = i64::from_le_bytes(word) >> 8;
            word.copy_from_slice(&data[16..24]);
            let seed = u64::from_le_bytes(word) & MASK_48;

            let stepped = Lcg::combine(n).next_seed(Lcg::combine(m).next_seed(seed));
            let direct = Lcg::combine(m.wrapping_add(n)).next_seed(seed);
            assert_eq!(stepped, direct);
            assert_eq!(Lcg::combine(-m).next_seed(Lcg::combine(m).next_seed(seed)), seed);
        });
    }
}
