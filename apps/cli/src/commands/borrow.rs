//! `reservoir borrow`: run concurrent borrowers against a pool.

use std::time::{Duration, Instant};

use anyhow::Context;
use reservoir_pool::{Factory, Pool, PoolStats};
use serde::Serialize;
use tokio::task::JoinSet;

/// Outcome of a borrow run.
#[derive(Debug, Serialize)]
pub struct BorrowReport {
    pub workers: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub elapsed_ms: u128,
    pub stats: PoolStats,
}

/// Spawn `workers` tasks that each acquire one handle, hold it for `hold`,
/// then close it. Individual acquire failures are counted, not fatal.
pub async fn run<F: Factory>(
    pool: &Pool<F>,
    workers: usize,
    hold: Duration,
) -> anyhow::Result<BorrowReport> {
    let started = Instant::now();
    let mut set = JoinSet::new();

    for worker in 0..workers {
        let pool = pool.clone();
        set.spawn(async move {
            let mut handle = pool.acquire().await?;
            tracing::debug!(worker, "Borrowed resource");
            tokio::time::sleep(hold).await;
            handle.close();
            tracing::debug!(worker, "Returned resource");
            Ok::<_, reservoir_pool::Error>(())
        });
    }

    let (mut succeeded, mut failed) = (0, 0);
    while let Some(joined) = set.join_next().await {
        match joined.context("borrower task panicked")? {
            Ok(()) => succeeded += 1,
            Err(e) => {
                failed += 1;
                tracing::warn!(error = %e, "Borrow failed");
            }
        }
    }

    Ok(BorrowReport {
        workers,
        succeeded,
        failed,
        elapsed_ms: started.elapsed().as_millis(),
        stats: pool.stats(),
    })
}
