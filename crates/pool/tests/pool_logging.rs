//! Lifecycle events are visible through `tracing`.

use std::io;
use std::sync::Arc;

use parking_lot::Mutex;
use reservoir_pool::testing::MockFactory;
use reservoir_pool::{Pool, PoolConfig};

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

#[test]
fn create_reuse_and_release_are_logged() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    tracing::subscriber::with_default(subscriber, || {
        rt.block_on(async {
            let pool = Pool::new(MockFactory::new(), PoolConfig::with_capacity(1)).unwrap();
            drop(pool.acquire().await.unwrap());
            drop(pool.acquire().await.unwrap());
            assert_eq!(pool.stats().created, 1);
        });
    });

    let text = captured.text();
    assert_eq!(text.matches("Created new resource").count(), 1, "{text}");
    assert_eq!(text.matches("Reusing idle resource").count(), 1, "{text}");
    assert_eq!(text.matches("Released resource to pool").count(), 2, "{text}");
    assert!(text.contains("resource_id=mock"), "{text}");
}
