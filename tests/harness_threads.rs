use std::io::Cursor;

use popseed::lcg::{self, Lcg};
use popseed::{population_seed, search, SearchParams, Variant};

const MASK_48: u64 = (1 << 48) - 1;

fn base_params(threads: usize) -> SearchParams {
    SearchParams {
        variant: Variant::Early,
        salt: 0,
        threads,
        min_chunk_x: 0,
        max_chunk_x: 1,
        min_chunk_z: 0,
        max_chunk_z: 1,
        min_calls: -1,
        max_calls: 1,
    }
}

fn run_search(params: &SearchParams, input: &str) -> (Vec<String>, popseed::RunStats) {
    let mut sink: Vec<u8> = Vec::new();
    let stats = search::run(
        params,
        Cursor::new(input.as_bytes().to_vec()),
        &mut sink,
        None,
    )
    .unwrap();
    let text = String::from_utf8(sink).unwrap();
    let mut lines: Vec<String> = text.lines().map(str::to_owned).collect();
    lines.sort();
    (lines, stats)
}

#[test]
fn two_workers_match_one_worker_as_a_multiset() {
    let input = "12345\n987654321\n281474976710655\n1\n77777777\n424242424242\n";
    let (single, single_stats) = run_search(&base_params(1), input);
    let (dual, dual_stats) = run_search(&base_params(2), input);
    assert_eq!(single, dual);
    assert!(!single.is_empty());
    assert_eq!(single_stats.internal_seeds, 6);
    assert_eq!(dual_stats.internal_seeds, 6);
    assert_eq!(single_stats.structure_seeds, dual_stats.structure_seeds);
}

#[test]
fn single_coordinate_output_omits_coordinates() {
    let mut params = base_params(1);
    params.min_chunk_x = 1;
    params.max_chunk_x = 1;
    params.min_chunk_z = 1;
    params.max_chunk_z = 1;
    params.max_calls = -1;

    let (lines, _) = run_search(&params, "12345\n");
    assert_eq!(lines, vec!["153322249273811".to_string()]);
    for line in &lines {
        let seed: u64 = line.parse().expect("bare seed per line");
        assert_eq!(population_seed(Variant::Early, seed, 1, 1), 12345 & MASK_48);
    }
}

#[test]
fn ranged_output_carries_chunk_coordinates() {
    let (lines, _) = run_search(&base_params(1), "5\n");
    assert!(!lines.is_empty());
    for line in &lines {
        let fields: Vec<&str> = line.split(' ').collect();
        assert_eq!(fields.len(), 3, "expected `seed x z`, got {line:?}");
        let _: u64 = fields[0].parse().unwrap();
        let x: i32 = fields[1].parse().unwrap();
        let z: i32 = fields[2].parse().unwrap();
        assert!((0..=1).contains(&x));
        assert!((0..=1).contains(&z));
    }
}

#[test]
fn malformed_line_ends_consumption_silently() {
    let (_, stats) = run_search(&base_params(1), "12345\nnot-a-seed\n67890\n");
    assert_eq!(stats.internal_seeds, 1);
}

#[test]
fn late_variant_salt_and_scaling_are_applied() {
    let planted = 0x00AB_CDEF_0123u64;
    let salt = 987i32;
    let pop = population_seed(Variant::Late, planted, 16, 0);
    // call index 0 reads the state XORed with the multiplier, minus salt.
    let internal = ((pop + salt as u64) & MASK_48) ^ lcg::MULTIPLIER;

    let params = SearchParams {
        variant: Variant::Late,
        salt,
        threads: 1,
        min_chunk_x: 1,
        max_chunk_x: 1,
        min_chunk_z: 0,
        max_chunk_z: 0,
        min_calls: 0,
        max_calls: 0,
    };
    let (lines, _) = run_search(&params, &format!("{internal}\n"));
    let seeds: Vec<u64> = lines.iter().map(|l| l.parse().unwrap()).collect();
    assert!(seeds.contains(&planted));
}

#[test]
fn call_index_alignment_undoes_generator_steps() {
    let planted = 0x7777_0000_1234u64;
    let pop = population_seed(Variant::Early, planted, 1, 1);
    let sampled_state = pop ^ lcg::MULTIPLIER;
    // The internal seed sits one generator call past the sampled state.
    let internal = Lcg::STEP.next_seed(sampled_state);

    let params = SearchParams {
        variant: Variant::Early,
        salt: 0,
        threads: 1,
        min_chunk_x: 1,
        max_chunk_x: 1,
        min_chunk_z: 1,
        max_chunk_z: 1,
        min_calls: 1,
        max_calls: 1,
    };
    let (lines, _) = run_search(&params, &format!("{internal}\n"));
    let seeds: Vec<u64> = lines.iter().map(|l| l.parse().unwrap()).collect();
    assert!(seeds.contains(&planted));
}
