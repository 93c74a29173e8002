//! TCP connection factory
//!
//! Pools `tokio::net::TcpStream`s to a single peer. Handles forward
//! `AsyncRead`/`AsyncWrite`, so a borrowed connection is used like a plain
//! stream; shutting the handle down returns the connection instead of
//! closing the socket.

use std::net::SocketAddr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tokio::net::TcpStream;

use crate::error::{Error, Result};
use crate::factory::Factory;

/// Parameters for [`TcpFactory`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TcpConfig {
    /// Peer address, `host:port`.
    pub addr: String,
    /// Set `TCP_NODELAY` on every new connection.
    pub nodelay: bool,
}

impl Default for TcpConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:5432".to_string(),
            nodelay: true,
        }
    }
}

/// Opens one TCP connection per `create` call.
#[derive(Debug, Clone)]
pub struct TcpFactory {
    config: TcpConfig,
}

impl TcpFactory {
    /// Factory connecting according to `config`.
    #[must_use]
    pub fn new(config: TcpConfig) -> Self {
        Self { config }
    }

    /// Factory connecting to `addr` with default options.
    #[must_use]
    pub fn connect_to(addr: SocketAddr) -> Self {
        Self::new(TcpConfig {
            addr: addr.to_string(),
            ..TcpConfig::default()
        })
    }

    /// The configured peer address.
    #[must_use]
    pub fn addr(&self) -> &str {
        &self.config.addr
    }
}

impl Factory for TcpFactory {
    type Resource = TcpStream;
    type Error = std::io::Error;

    fn id(&self) -> &str {
        "tcp"
    }

    fn validate(&self) -> Result<()> {
        let addr = self.config.addr.trim();
        if addr.is_empty() {
            return Err(Error::configuration("tcp addr cannot be empty"));
        }
        // Host names are resolved at connect time; only the shape is checked here.
        let Some((host, port)) = addr.rsplit_once(':') else {
            return Err(Error::configuration(format!(
                "tcp addr '{addr}' must be host:port"
            )));
        };
        if host.is_empty() {
            return Err(Error::configuration(format!("tcp addr '{addr}' has no host")));
        }
        match port.parse::<u16>() {
            Ok(0) | Err(_) => Err(Error::configuration(format!(
                "tcp addr '{addr}' has an invalid port"
            ))),
            Ok(_) => Ok(()),
        }
    }

    async fn create(&self) -> std::io::Result<TcpStream> {
        let stream = TcpStream::connect(self.config.addr.trim()).await?;
        if self.config.nodelay {
            stream.set_nodelay(true)?;
        }
        Ok(stream)
    }
}
