//! # Reservoir Pool
//!
//! A bounded, thread-safe pool of expensive-to-create resources.
//!
//! Callers borrow with [`Pool::acquire`] and get a [`Handle`]; closing or
//! dropping the handle puts the resource back instead of destroying it. At
//! most `capacity` handles are open at once, and further borrowers wait until
//! one is closed. How resources are made is up to a [`Factory`].
//!
//! ```rust,ignore
//! let pool = Pool::new(TcpFactory::new(tcp_config), PoolConfig::with_capacity(5))?;
//! let mut conn = pool.acquire().await?;
//! conn.write_all(b"PING\r\n").await?;
//! conn.close(); // back to the pool, socket stays open
//! ```

pub mod config;
pub mod error;
pub mod factory;
pub mod handle;
pub mod pool;
pub mod tcp;
pub mod testing;

pub use config::PoolConfig;
pub use error::{CancelCause, Error, Result};
pub use factory::Factory;
pub use handle::Handle;
pub use pool::{Pool, PoolStats};
pub use tcp::{TcpConfig, TcpFactory};

pub use tokio_util::sync::CancellationToken;
