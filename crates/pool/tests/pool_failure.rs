//! Factory failure handling.
//!
//! A failed `create` must hand its permit back so the pool never shrinks.

use std::time::Duration;

use reservoir_pool::testing::MockFactory;
use reservoir_pool::{Error, Pool, PoolConfig};

fn config(capacity: usize) -> PoolConfig {
    PoolConfig::with_capacity(capacity).acquire_timeout(Duration::from_secs(1))
}

#[tokio::test]
async fn always_failing_factory_does_not_exhaust_pool() {
    let pool = Pool::new(MockFactory::new().always_fail(), config(2)).unwrap();

    // Far more failures than permits: a leak would turn these into timeouts
    for _ in 0..10 {
        let err = pool.acquire().await.unwrap_err();
        assert!(
            matches!(err, Error::CreationFailed { .. }),
            "expected CreationFailed, got: {err:?}"
        );
    }

    let stats = pool.stats();
    assert_eq!(stats.available, 2);
    assert_eq!(stats.outstanding, 0);
    assert_eq!(stats.idle, 0);
    assert_eq!(stats.creation_failures, 10);
    assert_eq!(stats.cancellations, 0);
}

#[tokio::test]
async fn n_failures_restore_n_permits() {
    let capacity = 3;
    let pool = Pool::new(MockFactory::new().fail_on(&[0, 1, 2, 3]), config(capacity)).unwrap();

    for _ in 0..4 {
        assert!(pool.acquire().await.is_err());
    }
    assert_eq!(pool.stats().available, capacity);

    // Creation now succeeds: the full capacity is still there
    let mut handles = Vec::new();
    for _ in 0..capacity {
        handles.push(pool.acquire().await.expect("capacity must be intact"));
    }
    let ids: Vec<u64> = handles.iter().map(|h| h.id).collect();
    assert_eq!(ids, vec![4, 5, 6]);
    assert_eq!(pool.stats().available, 0);
}

#[tokio::test]
async fn failure_while_others_are_held() {
    let pool = Pool::new(MockFactory::new().fail_on(&[1]), config(2)).unwrap();

    let held = pool.acquire().await.unwrap();
    assert!(matches!(
        pool.acquire().await,
        Err(Error::CreationFailed { .. })
    ));
    let second = pool.acquire().await.unwrap();
    assert_eq!(second.id, 2);

    drop(held);
    drop(second);
    let stats = pool.stats();
    assert_eq!(stats.idle, 2);
    assert_eq!(stats.available, 2);
    assert_eq!(stats.created, 2);
}

#[tokio::test]
async fn failure_surfaces_factory_error() {
    let pool = Pool::new(MockFactory::new().always_fail(), config(1)).unwrap();
    let err = pool.acquire().await.unwrap_err();

    assert_eq!(err.resource_id(), Some("mock"));
    let source = std::error::Error::source(&err).expect("factory error is the source");
    assert_eq!(source.to_string(), "mock creation 0 failed");
}
