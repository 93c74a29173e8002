//! Caller-facing wrapper around a checked-out resource.
//!
//! A [`Handle`] exposes the whole surface of the raw resource through
//! `Deref`/`DerefMut` (and the tokio I/O traits when the resource has them)
//! but redefines closing: [`Handle::close`] and `Drop` return the resource
//! to its pool instead of destroying it. The underlying resource is never
//! really closed by the pool.

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::sync::OwnedSemaphorePermit;

use crate::factory::Factory;
use crate::pool::PoolInner;

struct Checkout<R> {
    resource: R,
    permit: OwnedSemaphorePermit,
}

/// A borrowed resource. `Open` until closed or dropped, then `Closed` for good.
///
/// Closing twice is a no-op. Dereferencing a closed handle panics; use
/// [`try_get`](Handle::try_get) when that can legitimately happen.
#[must_use = "dropping a handle immediately returns the resource to the pool"]
pub struct Handle<F: Factory> {
    checkout: Option<Checkout<F::Resource>>,
    pool: Arc<PoolInner<F>>,
}

impl<F: Factory> Handle<F> {
    pub(crate) fn new(
        resource: F::Resource,
        permit: OwnedSemaphorePermit,
        pool: Arc<PoolInner<F>>,
    ) -> Self {
        Self {
            checkout: Some(Checkout { resource, permit }),
            pool,
        }
    }

    /// Return the resource to the pool.
    ///
    /// Only the first call has any effect.
    pub fn close(&mut self) {
        if let Some(Checkout { resource, permit }) = self.checkout.take() {
            self.pool.release(resource, permit);
        }
    }

    /// Whether [`close`](Self::close) has already run.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.checkout.is_none()
    }

    /// The resource, or `None` once closed.
    #[must_use]
    pub fn try_get(&self) -> Option<&F::Resource> {
        self.checkout.as_ref().map(|c| &c.resource)
    }

    /// Mutable access to the resource, or `None` once closed.
    #[must_use]
    pub fn try_get_mut(&mut self) -> Option<&mut F::Resource> {
        self.checkout.as_mut().map(|c| &mut c.resource)
    }

    fn closed_io_error() -> io::Error {
        io::Error::new(io::ErrorKind::NotConnected, "pooled handle already closed")
    }
}

impl<F: Factory> std::ops::Deref for Handle<F> {
    type Target = F::Resource;

    fn deref(&self) -> &F::Resource {
        self.try_get().expect("pooled handle used after close")
    }
}

impl<F: Factory> std::ops::DerefMut for Handle<F> {
    fn deref_mut(&mut self) -> &mut F::Resource {
        self.try_get_mut().expect("pooled handle used after close")
    }
}

impl<F: Factory> Drop for Handle<F> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<F> std::fmt::Debug for Handle<F>
where
    F: Factory,
    F::Resource: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handle")
            .field("resource", &self.try_get())
            .field("closed", &self.is_closed())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// I/O forwarding
// ---------------------------------------------------------------------------

impl<F> AsyncRead for Handle<F>
where
    F: Factory,
    F::Resource: AsyncRead + Unpin,
{
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut().try_get_mut() {
            Some(resource) => Pin::new(resource).poll_read(cx, buf),
            None => Poll::Ready(Err(Self::closed_io_error())),
        }
    }
}

impl<F> AsyncWrite for Handle<F>
where
    F: Factory,
    F::Resource: AsyncWrite + Unpin,
{
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut().try_get_mut() {
            Some(resource) => Pin::new(resource).poll_write(cx, buf),
            None => Poll::Ready(Err(Self::closed_io_error())),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut().try_get_mut() {
            Some(resource) => Pin::new(resource).poll_flush(cx),
            None => Poll::Ready(Err(Self::closed_io_error())),
        }
    }

    /// Flushes, then hands the resource back to the pool. The stream itself
    /// stays open for the next borrower.
    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let Some(resource) = this.try_get_mut() else {
            return Poll::Ready(Ok(()));
        };
        match Pin::new(resource).poll_flush(cx) {
            Poll::Ready(Ok(())) => {
                this.close();
                Poll::Ready(Ok(()))
            }
            other => other,
        }
    }

    fn poll_write_vectored(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        bufs: &[io::IoSlice<'_>],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut().try_get_mut() {
            Some(resource) => Pin::new(resource).poll_write_vectored(cx, bufs),
            None => Poll::Ready(Err(Self::closed_io_error())),
        }
    }

    fn is_write_vectored(&self) -> bool {
        self.try_get().is_some_and(AsyncWrite::is_write_vectored)
    }
}
