// benches/perf_chain_latency.rs
//! Cycle-level latency for single queue operations.
//!
//! Records per-operation cycle counts into HDR histograms.
//!
//! Run: cargo build --release --bench perf_chain_latency
//! Profile: sudo taskset -c 2 ./target/release/deps/perf_chain_latency-*

use hdrhistogram::Histogram;
use nexus_chain::Queue;

const WARMUP: usize = 10_000;
const SAMPLES: usize = 100_000;
const SORT_LEN: usize = 1_024;
const SORT_SAMPLES: usize = 1_000;

#[inline]
fn rdtscp() -> u64 {
    #[cfg(target_arch = "x86_64")]
    unsafe {
        core::arch::x86_64::__rdtscp(&mut 0)
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        use std::sync::OnceLock;
        use std::time::Instant;
        static EPOCH: OnceLock<Instant> = OnceLock::new();
        EPOCH.get_or_init(Instant::now).elapsed().as_nanos() as u64
    }
}

fn print_histogram(name: &str, hist: &Histogram<u64>) {
    println!(
        "{:16} p50: {:5} cycles | p99: {:6} cycles | p999: {:7} cycles | min: {:5} | max: {:8}",
        name,
        hist.value_at_quantile(0.50),
        hist.value_at_quantile(0.99),
        hist.value_at_quantile(0.999),
        hist.min(),
        hist.max(),
    );
}

fn main() {
    let word = "latency-sample";
    let mut queue = Queue::with_capacity(SORT_LEN);
    let mut push = Histogram::<u64>::new(3).unwrap();
    let mut pop = Histogram::<u64>::new(3).unwrap();

    for i in 0..WARMUP + SAMPLES {
        let start = rdtscp();
        queue.try_push_back(word).unwrap();
        let pushed = rdtscp();
        let value = queue.pop_front();
        let popped = rdtscp();
        std::hint::black_box(value);

        if i >= WARMUP {
            push.record(pushed - start).unwrap();
            pop.record(popped - pushed).unwrap();
        }
    }

    let mut reverse = Histogram::<u64>::new(3).unwrap();
    let mut sort = Histogram::<u64>::new(3).unwrap();

    for round in 0..SORT_SAMPLES {
        for i in 0..SORT_LEN {
            // interleave so the chain is far from sorted
            let n = (i * 7919 + round) % SORT_LEN;
            queue.try_push_back(&format!("{n:06}")).unwrap();
        }

        let start = rdtscp();
        queue.reverse();
        let reversed = rdtscp();
        queue.sort();
        let sorted = rdtscp();

        reverse.record(reversed - start).unwrap();
        sort.record(sorted - reversed).unwrap();
        queue.clear();
    }

    print_histogram("push_back", &push);
    print_histogram("pop_front", &pop);
    print_histogram("reverse/1024", &reverse);
    print_histogram("sort/1024", &sort);
}
