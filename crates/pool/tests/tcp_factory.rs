//! TCP factory against a local listener.

use std::time::Duration;

use reservoir_pool::{Error, Pool, PoolConfig, TcpConfig, TcpFactory};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Accepts connections and echoes every byte back.
async fn echo_server() -> (std::net::SocketAddr, tokio::task::JoinHandle<usize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let task = tokio::spawn(async move {
        let mut accepted = 0;
        loop {
            let Ok(Ok((mut socket, _))) =
                tokio::time::timeout(Duration::from_millis(500), listener.accept()).await
            else {
                return accepted;
            };
            accepted += 1;
            tokio::spawn(async move {
                let (mut rd, mut wr) = socket.split();
                let _ = tokio::io::copy(&mut rd, &mut wr).await;
            });
        }
    });
    (addr, task)
}

#[tokio::test]
async fn pooled_connection_is_reused_after_shutdown() {
    let (addr, server) = echo_server().await;
    let pool = Pool::new(TcpFactory::connect_to(addr), PoolConfig::with_capacity(2)).unwrap();

    for round in 0u8..5 {
        let mut conn = pool.acquire().await.unwrap();
        conn.write_all(&[round]).await.unwrap();
        let mut byte = [0u8; 1];
        conn.read_exact(&mut byte).await.unwrap();
        assert_eq!(byte[0], round);
        // Intercepted: flushes and returns the socket, does not close it
        conn.shutdown().await.unwrap();
    }

    assert_eq!(pool.stats().created, 1);
    drop(pool);
    assert_eq!(server.await.unwrap(), 1, "one TCP connection served every round");
}

#[tokio::test]
async fn refused_connection_is_creation_failure() {
    // Bind then drop to get a port nobody listens on
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let pool = Pool::new(TcpFactory::connect_to(addr), PoolConfig::with_capacity(1)).unwrap();

    let err = pool.acquire().await.unwrap_err();
    assert!(matches!(err, Error::CreationFailed { ref resource_id, .. } if resource_id == "tcp"));
    assert_eq!(pool.stats().available, 1);
}

#[test]
fn empty_address_is_configuration_error() {
    let factory = TcpFactory::new(TcpConfig {
        addr: String::new(),
        nodelay: true,
    });
    let err = Pool::new(factory, PoolConfig::default()).unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}
