//! Concurrent batch search over an input stream of internal seeds.
//!
//! A fixed pool of workers shares two serialized resources: the input
//! cursor (read one line, advance) and the output sink (format, append).
//! Everything between the two is pure computation, so the only locks in
//! the system sit at those boundaries and are never held across a query.

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Instant;

use indicatif::ProgressBar;

use crate::bits::MASK_48;
use crate::config::SearchParams;
use crate::error::PopseedError;
use crate::forward::Variant;
use crate::lcg::{self, Lcg};
use crate::reverse;
use crate::stats::RunStats;

#[derive(Default)]
struct Counters {
    internal_seeds: AtomicU64,
    queries: AtomicU64,
    structure_seeds: AtomicU64,
}

/// Run the batch search to input exhaustion and return the run totals.
///
/// Each line of `input` is one decimal internal seed; a malformed line or
/// end of input ends the reading worker's loop without error. Every
/// recovered structure seed is appended to `output` as its own line, with
/// chunk coordinates attached unless the configured range pins a single
/// coordinate. Record order between workers is unspecified.
pub fn run<R, W>(
    params: &SearchParams,
    input: R,
    output: W,
    progress: Option<ProgressBar>,
) -> Result<RunStats, PopseedError>
where
    R: BufRead + Send,
    W: Write + Send,
{
    let params = params.clone().validated()?;
    let started = Instant::now();

    let input = Mutex::new(input);
    let output = Mutex::new(output);
    let counters = Counters::default();

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(params.threads);
        for _ in 0..params.threads {
            let params = &params;
            let input = &input;
            let output = &output;
            let counters = &counters;
            let progress = progress.as_ref();
            handles.push(scope.spawn(move || worker(params, input, output, counters, progress)));
        }
        for handle in handles {
            handle
                .join()
                .map_err(|_| PopseedError::Internal("worker thread panicked".into()))??;
        }
        Ok::<(), PopseedError>(())
    })?;

    let mut output = output
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    output.flush()?;

    Ok(RunStats {
        internal_seeds: counters.internal_seeds.into_inner(),
        queries: counters.queries.into_inner(),
        structure_seeds: counters.structure_seeds.into_inner(),
        elapsed_ms: started.elapsed().as_millis() as u64,
    })
}

/// One worker's loop: pull a seed, align it, sweep the coordinate and
/// call-index ranges, emit whatever the inversion recovers.
fn worker<R: BufRead, W: Write>(
    params: &SearchParams,
    input: &Mutex<R>,
    output: &Mutex<W>,
    counters: &Counters,
    progress: Option<&ProgressBar>,
) -> io::Result<()> {
    // Undoing min_calls steps aligns the state with the lowest requested
    // call index; from there every index is one backwards step away.
    let min_skip = Lcg::combine(match params.min_calls {
        -1 => 0,
        n => -(n as i64),
    });
    let step_back = Lcg::combine(-1);
    let single = params.single_coordinate();

    let mut line = String::new();
    let mut results: Vec<u64> = Vec::new();

    loop {
        let internal = {
            let mut reader = input.lock().unwrap();
            line.clear();
            match reader.read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => match line.trim().parse::<u64>() {
                    Ok(value) => value,
                    // A malformed line ends this worker's consumption.
                    Err(_) => break,
                },
                Err(_) => break,
            }
        };
        counters.internal_seeds.fetch_add(1, Ordering::Relaxed);
        if let Some(bar) = progress {
            bar.inc(1);
        }

        let internal = min_skip.next_seed(internal);

        for chunk_x in params.min_chunk_x..=params.max_chunk_x {
            for chunk_z in params.min_chunk_z..=params.max_chunk_z {
                let (x, z) = match params.variant {
                    Variant::Early => (chunk_x as i64, chunk_z as i64),
                    Variant::Late => (chunk_x as i64 * 16, chunk_z as i64 * 16),
                };

                let mut state = internal;
                for call in params.min_calls..=params.max_calls {
                    let mut target = state;
                    if call != -1 {
                        target ^= lcg::MULTIPLIER;
                        if params.variant == Variant::Late {
                            target = target.wrapping_sub(params.salt as i64 as u64) & MASK_48;
                        }
                    }

                    counters.queries.fetch_add(1, Ordering::Relaxed);
                    reverse::structure_seeds(params.variant, target, x, z, &mut results);

                    if !results.is_empty() {
                        counters
                            .structure_seeds
                            .fetch_add(results.len() as u64, Ordering::Relaxed);
                        let mut sink = output.lock().unwrap();
                        for &seed in &results {
                            if single {
                                writeln!(sink, "{seed}")?;
                            } else {
                                writeln!(sink, "{seed} {chunk_x} {chunk_z}")?;
                            }
                        }
                    }
                    results.clear();

                    if call != -1 {
                        state = step_back.next_seed(state);
                    }
                }
            }
        }
    }

    Ok(())
}
