//! Concurrent stress test for the pool.
//!
//! Many tasks doing acquire/close cycles must never see more than
//! `capacity` open handles, and counters must balance at the end.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use reservoir_pool::testing::MockFactory;
use reservoir_pool::{Pool, PoolConfig};
use tokio::task::JoinSet;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn stress_50_tasks_acquire_release() {
    const CAPACITY: usize = 8;

    let factory = MockFactory::new().with_delay(Duration::from_micros(100));
    let pool = Pool::new(factory, PoolConfig::with_capacity(CAPACITY)).unwrap();

    let open = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let success_count = Arc::new(AtomicU64::new(0));
    let mut set = JoinSet::new();

    for _ in 0..50 {
        let pool = pool.clone();
        let open = Arc::clone(&open);
        let peak = Arc::clone(&peak);
        let success_count = Arc::clone(&success_count);
        set.spawn(async move {
            for _ in 0..20 {
                let mut handle = pool.acquire().await.expect("task should acquire");
                let now = open.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                handle.uses += 1;
                tokio::time::sleep(Duration::from_millis(1)).await;
                open.fetch_sub(1, Ordering::SeqCst);
                drop(handle);
                tokio::task::yield_now().await;
            }
            success_count.fetch_add(1, Ordering::SeqCst);
        });
    }

    let deadline = tokio::time::Instant::now() + Duration::from_secs(30);
    while let Some(result) = tokio::time::timeout_at(deadline, set.join_next())
        .await
        .expect("stress test should not deadlock (30s timeout)")
    {
        result.expect("task should not panic");
    }

    assert_eq!(success_count.load(Ordering::SeqCst), 50);
    assert!(
        peak.load(Ordering::SeqCst) <= CAPACITY,
        "peak open handles {} exceeded capacity",
        peak.load(Ordering::SeqCst)
    );

    let stats = pool.stats();
    assert_eq!(stats.acquisitions, 1000);
    assert_eq!(stats.releases, stats.acquisitions);
    assert_eq!(stats.outstanding, 0);
    assert_eq!(stats.available, CAPACITY);
    assert!(stats.created <= CAPACITY as u64);
    assert_eq!(stats.idle as u64, stats.created);
}
