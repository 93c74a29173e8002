//! Resource pool — a permit-gated free list in front of a [`Factory`].
//!
//! `Pool<F>` hands out [`Handle`]s. A handle owns one semaphore permit and
//! one raw resource; closing (or dropping) it pushes the resource back onto
//! the free list and only then returns the permit, so whoever is woken by
//! that permit finds the resource waiting.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::config::PoolConfig;
use crate::error::{CancelCause, Error, Result};
use crate::factory::Factory;
use crate::handle::Handle;

// ---------------------------------------------------------------------------
// PoolStats
// ---------------------------------------------------------------------------

/// Point-in-time view of a pool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct PoolStats {
    /// Configured capacity.
    pub capacity: usize,
    /// Gate permits currently free.
    pub available: usize,
    /// Handles currently open.
    pub outstanding: usize,
    /// Resources sitting in the free list.
    pub idle: usize,
    /// Resources ever created by the factory.
    pub created: u64,
    /// Successful acquisitions.
    pub acquisitions: u64,
    /// Handles closed back into the pool.
    pub releases: u64,
    /// Factory calls that returned an error.
    pub creation_failures: u64,
    /// Acquires abandoned by cancellation or timeout.
    pub cancellations: u64,
}

#[derive(Debug, Default)]
struct Counters {
    outstanding: usize,
    created: u64,
    acquisitions: u64,
    releases: u64,
    creation_failures: u64,
    cancellations: u64,
}

// ---------------------------------------------------------------------------
// Pool internals
// ---------------------------------------------------------------------------

/// Shared state behind every clone of a pool and every open handle.
pub(crate) struct PoolInner<F: Factory> {
    factory: F,
    config: PoolConfig,
    /// Idle resources. Popped from the back; order carries no meaning.
    idle: Mutex<Vec<F::Resource>>,
    counters: Mutex<Counters>,
    /// One permit per resource that may be checked out.
    semaphore: Arc<Semaphore>,
}

impl<F: Factory> PoolInner<F> {
    /// Take back a resource from a closing handle.
    ///
    /// The push must happen before the permit is dropped.
    pub(crate) fn release(&self, resource: F::Resource, permit: OwnedSemaphorePermit) {
        let idle = {
            let mut idle = self.idle.lock();
            idle.push(resource);
            idle.len()
        };
        let outstanding = {
            let mut counters = self.counters.lock();
            counters.releases += 1;
            counters.outstanding = counters.outstanding.saturating_sub(1);
            counters.outstanding
        };
        drop(permit);
        tracing::debug!(
            resource_id = %self.factory.id(),
            outstanding,
            idle,
            "Released resource to pool"
        );
    }

    fn id(&self) -> &str {
        self.factory.id()
    }
}

// ---------------------------------------------------------------------------
// Pool<F>
// ---------------------------------------------------------------------------

/// Bounded pool of resources produced by `F`.
///
/// Cloning is cheap; all clones share the same gate and free list. Resources
/// are created lazily and, once created, live for as long as the pool does,
/// moving between the free list and exactly one open handle.
pub struct Pool<F: Factory> {
    inner: Arc<PoolInner<F>>,
}

impl<F: Factory> Clone for Pool<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F: Factory> std::fmt::Debug for Pool<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("resource_id", &self.inner.id())
            .field("stats", &self.stats())
            .finish()
    }
}

impl<F: Factory> Pool<F> {
    /// Create a pool around `factory`.
    ///
    /// # Errors
    /// Returns [`Error::Configuration`] if `config` is invalid or the factory
    /// rejects its own parameters.
    pub fn new(factory: F, config: PoolConfig) -> Result<Self> {
        config.validate()?;
        factory.validate()?;
        let capacity = config.capacity;
        tracing::debug!(resource_id = %factory.id(), capacity, "Created pool");
        Ok(Self {
            inner: Arc::new(PoolInner {
                factory,
                config,
                idle: Mutex::new(Vec::with_capacity(capacity)),
                counters: Mutex::new(Counters::default()),
                semaphore: Arc::new(Semaphore::new(capacity)),
            }),
        })
    }

    /// Borrow a resource, waiting for a free slot if the pool is at capacity.
    ///
    /// Dropping the returned future while it waits gives up without
    /// consuming a slot.
    pub async fn acquire(&self) -> Result<Handle<F>> {
        self.checkout(None).await
    }

    /// Like [`acquire`](Self::acquire), but gives up with
    /// [`Error::Cancelled`] as soon as `cancel` fires.
    pub async fn acquire_with(&self, cancel: &CancellationToken) -> Result<Handle<F>> {
        self.checkout(Some(cancel)).await
    }

    async fn checkout(&self, cancel: Option<&CancellationToken>) -> Result<Handle<F>> {
        let inner = &self.inner;
        let permit = self.wait_for_permit(cancel).await?;

        let reused = inner.idle.lock().pop();
        let resource = match reused {
            Some(resource) => {
                tracing::debug!(resource_id = %inner.id(), "Reusing idle resource");
                resource
            }
            None => match inner.factory.create().await {
                Ok(resource) => {
                    inner.counters.lock().created += 1;
                    tracing::debug!(resource_id = %inner.id(), "Created new resource");
                    resource
                }
                Err(e) => {
                    inner.counters.lock().creation_failures += 1;
                    tracing::warn!(
                        resource_id = %inner.id(),
                        error = %e,
                        "Resource creation failed"
                    );
                    // `permit` drops here and goes back to the gate
                    return Err(Error::creation_failed(inner.id(), e));
                }
            },
        };

        let outstanding = {
            let mut counters = inner.counters.lock();
            counters.acquisitions += 1;
            counters.outstanding += 1;
            counters.outstanding
        };
        tracing::debug!(resource_id = %inner.id(), outstanding, "Acquired resource");

        Ok(Handle::new(resource, permit, Arc::clone(inner)))
    }

    async fn wait_for_permit(
        &self,
        cancel: Option<&CancellationToken>,
    ) -> Result<OwnedSemaphorePermit> {
        let inner = &self.inner;
        let wait = Arc::clone(&inner.semaphore).acquire_owned();
        let bounded = async {
            match inner.config.acquire_timeout {
                Some(limit) => tokio::time::timeout(limit, wait)
                    .await
                    .map_err(|_| CancelCause::Timeout(limit)),
                None => Ok(wait.await),
            }
        };
        let outcome = match cancel {
            Some(token) => tokio::select! {
                biased;
                () = token.cancelled() => Err(CancelCause::Token),
                res = bounded => res,
            },
            None => bounded.await,
        };

        match outcome {
            Ok(Ok(permit)) => Ok(permit),
            Ok(Err(_closed)) => Err(Error::internal(inner.id(), "Pool semaphore closed")),
            Err(cause) => {
                inner.counters.lock().cancellations += 1;
                tracing::debug!(resource_id = %inner.id(), %cause, "Acquire abandoned");
                Err(Error::cancelled(inner.id(), cause))
            }
        }
    }

    /// Get current pool statistics.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        let inner = &self.inner;
        let (outstanding, created, acquisitions, releases, creation_failures, cancellations) = {
            let c = inner.counters.lock();
            (
                c.outstanding,
                c.created,
                c.acquisitions,
                c.releases,
                c.creation_failures,
                c.cancellations,
            )
        };
        PoolStats {
            capacity: inner.config.capacity,
            available: inner.semaphore.available_permits(),
            outstanding,
            idle: inner.idle.lock().len(),
            created,
            acquisitions,
            releases,
            creation_failures,
            cancellations,
        }
    }

    /// Configured capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.inner.config.capacity
    }

    /// The factory this pool creates resources with.
    #[must_use]
    pub fn factory(&self) -> &F {
        &self.inner.factory
    }
}
