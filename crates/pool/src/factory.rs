//! The factory seam between a pool and whatever provisions its resources.
//!
//! A [`Factory`] knows how to open one raw resource (a connection, a socket,
//! a file descriptor). The pool decides *when* to call it; the factory never
//! sees handles, permits or the free list.

use std::future::Future;

use crate::error::Result;

/// Creates raw resources on demand.
///
/// The pool calls [`create`](Factory::create) only after a permit has been
/// granted and the free list was found empty, so at most `capacity`
/// resources are ever created by a healthy factory. Failed creations are
/// never retried by the pool.
pub trait Factory: Send + Sync + 'static {
    /// The raw resource handed out (wrapped) by the pool.
    type Resource: Send + 'static;

    /// Error returned when a resource cannot be provisioned.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Identifier used in errors and log fields (e.g. `"postgres"`, `"tcp"`).
    fn id(&self) -> &str;

    /// Check factory parameters before a pool is built around it.
    ///
    /// Failures here are reported as [`Error::Configuration`](crate::Error::Configuration).
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Provision one new resource.
    fn create(&self) -> impl Future<Output = std::result::Result<Self::Resource, Self::Error>> + Send;
}
