//! StableMap Stress Binary
//!
//! Hammers a shared map from several threads and checks the live count.

use std::process;
use std::time::{Duration, Instant};

use clap::Parser;
use crossbeam::channel;
use stablemap::{Config, Result, StableMap, StableMapError};
use tracing_subscriber::{fmt, EnvFilter};

/// StableMap concurrent load generator
#[derive(Parser, Debug)]
#[command(name = "stablemap-stress")]
#[command(about = "Concurrent insert/delete workload against a StableMap")]
#[command(version)]
struct Args {
    /// Number of writer threads
    #[arg(short, long, default_value = "8")]
    threads: usize,

    /// Keys inserted by each thread (disjoint ranges)
    #[arg(short, long, default_value = "100000")]
    keys_per_thread: u64,

    /// Delete every N-th key after inserting (0 disables deletes)
    #[arg(short, long, default_value = "3")]
    delete_every: u64,

    /// Tombstones accumulated before a delete compacts the map
    #[arg(short, long, default_value_t = stablemap::DEFAULT_COMPACTION_THRESHOLD)]
    compaction_threshold: usize,
}

/// Per-thread outcome sent back to the coordinator
#[derive(Debug)]
struct WorkerReport {
    worker: usize,
    inserted: u64,
    deleted: u64,
    reinserted: u64,
    elapsed: Duration,
}

impl WorkerReport {
    fn live(&self) -> u64 {
        self.inserted - self.deleted + self.reinserted
    }
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stablemap=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("StableMap stress v{}", stablemap::VERSION);
    tracing::info!(
        "{} threads x {} keys, delete every {}, compaction threshold {}",
        args.threads,
        args.keys_per_thread,
        args.delete_every,
        args.compaction_threshold
    );

    if let Err(e) = run(&args) {
        tracing::error!("Stress run failed: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let config = Config::builder()
        .compaction_threshold(args.compaction_threshold)
        .build();
    let map: StableMap<u64, u64> = StableMap::with_config(config)?;

    let (tx, rx) = channel::unbounded();
    let started = Instant::now();

    crossbeam::scope(|scope| {
        for worker in 0..args.threads {
            let map = &map;
            let tx = tx.clone();
            scope.spawn(move |_| {
                let report = run_worker(map, worker, args.keys_per_thread, args.delete_every);
                let _ = tx.send(report);
            });
        }
    })
    .map_err(|_| StableMapError::Worker("a worker thread panicked".to_string()))?;

    drop(tx);

    let mut expected_live = 0;
    for report in rx.iter() {
        tracing::debug!(
            "worker {}: {} inserted, {} deleted, {} reinserted in {:?}",
            report.worker,
            report.inserted,
            report.deleted,
            report.reinserted,
            report.elapsed
        );
        expected_live += report.live();
    }

    let elapsed = started.elapsed();
    let total_ops = args.threads as u64 * args.keys_per_thread;
    tracing::info!(
        "Finished in {:?} ({:.0} inserts/s), len={}, tombstones={}",
        elapsed,
        total_ops as f64 / elapsed.as_secs_f64().max(f64::EPSILON),
        map.len(),
        map.tombstone_count()
    );

    if map.len() as u64 != expected_live {
        return Err(StableMapError::Worker(format!(
            "live count mismatch: map reports {}, workers expect {}",
            map.len(),
            expected_live
        )));
    }

    tracing::info!("Live count verified: {}", expected_live);
    Ok(())
}

/// Insert a disjoint key range, delete every N-th key, then re-insert
/// every other deleted key so it lands at the tail.
fn run_worker(map: &StableMap<u64, u64>, worker: usize, keys: u64, delete_every: u64) -> WorkerReport {
    let started = Instant::now();
    let base = worker as u64 * keys;
    let mut report = WorkerReport {
        worker,
        inserted: 0,
        deleted: 0,
        reinserted: 0,
        elapsed: Duration::ZERO,
    };

    for key in base..base + keys {
        map.insert(key, key);
        report.inserted += 1;
    }

    if delete_every > 0 {
        for key in (base..base + keys).step_by(delete_every as usize) {
            if map.remove(&key).is_some() {
                report.deleted += 1;
            }
        }
        for key in (base..base + keys).step_by(delete_every as usize * 2) {
            map.insert(key, key + 1);
            report.reinserted += 1;
        }
    }

    report.elapsed = started.elapsed();
    report
}
