//! Mock transport for testing.
//!
//! [`MockTransport`] implements [`Transport`] without any Bluetooth
//! hardware. It records every frame that was accepted, along with the write
//! mode and the (tokio) instant it arrived, so tests can assert on exact
//! frame sequences and hold times under a paused clock.
//!
//! # Features
//!
//! - **Failure injection**: fail every write, only one write mode, or the next N attempts
//! - **Connection lifecycle**: drop the link mid-animation, or make closing it fail
//! - **Latency simulation**: delay each write to mimic a slow controller
//! - **Clone-and-share**: clones share state, so a clone can be handed to the engine

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use bledom_types::{Color, Frame};

use crate::error::{Error, Result};
use crate::transport::{Connection, Transport, WriteMode};

/// A frame the mock accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedWrite {
    /// Mode the frame was written with.
    pub mode: WriteMode,
    /// The frame itself.
    pub frame: Frame,
    /// When the write completed.
    pub at: Instant,
}

#[derive(Debug, Default)]
struct MockState {
    writes: RwLock<Vec<RecordedWrite>>,
    disconnected: AtomicBool,
    attempts: AtomicU32,
    should_fail: AtomicBool,
    fail_disconnect: AtomicBool,
    fail_with_response: AtomicBool,
    fail_without_response: AtomicBool,
    /// Number of upcoming attempts that fail before writes succeed again.
    remaining_failures: AtomicU32,
    /// Simulated write latency in milliseconds (0 = no delay).
    write_latency_ms: AtomicU64,
}

/// A recording, failure-injectable [`Transport`].
///
/// # Example
///
/// ```
/// use bledom_core::{MockTransport, send_frame};
/// use bledom_types::{Color, encode};
///
/// #[tokio::main]
/// async fn main() {
///     let mock = MockTransport::new();
///     send_frame(&mock, &encode(Color::RED), "red").await;
///     assert_eq!(mock.colors().await, vec![Color::RED]);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<MockState>,
}

impl MockTransport {
    /// Create a mock that accepts every write.
    pub fn new() -> Self {
        Self::default()
    }

    /// All accepted writes in order.
    pub async fn writes(&self) -> Vec<RecordedWrite> {
        self.state.writes.read().await.clone()
    }

    /// The accepted frames in order.
    pub async fn frames(&self) -> Vec<Frame> {
        self.state
            .writes
            .read()
            .await
            .iter()
            .map(|w| w.frame)
            .collect()
    }

    /// The colors carried by the accepted frames.
    pub async fn colors(&self) -> Vec<Color> {
        self.state
            .writes
            .read()
            .await
            .iter()
            .map(|w| w.frame.color())
            .collect()
    }

    /// Gaps between consecutive accepted writes.
    pub async fn intervals(&self) -> Vec<Duration> {
        let writes = self.state.writes.read().await;
        writes
            .windows(2)
            .map(|pair| pair[1].at.duration_since(pair[0].at))
            .collect()
    }

    /// Number of write attempts, including failed ones.
    pub fn attempt_count(&self) -> u32 {
        self.state.attempts.load(Ordering::Relaxed)
    }

    /// Forget everything recorded so far.
    pub async fn clear(&self) {
        self.state.writes.write().await.clear();
        self.state.attempts.store(0, Ordering::Relaxed);
    }

    // --- Test control methods ---

    /// Make every write fail.
    pub fn set_should_fail(&self, fail: bool) {
        self.state.should_fail.store(fail, Ordering::Relaxed);
    }

    /// Make writes using `mode` fail while the other mode keeps working.
    pub fn fail_mode(&self, mode: WriteMode) {
        match mode {
            WriteMode::WithResponse => self.state.fail_with_response.store(true, Ordering::Relaxed),
            WriteMode::WithoutResponse => self
                .state
                .fail_without_response
                .store(true, Ordering::Relaxed),
        }
    }

    /// Fail the next `count` attempts, whatever their mode.
    pub fn fail_next(&self, count: u32) {
        self.state.remaining_failures.store(count, Ordering::Relaxed);
    }

    /// Delay every write by `latency`.
    pub fn set_write_latency(&self, latency: Duration) {
        self.state
            .write_latency_ms
            .store(latency.as_millis() as u64, Ordering::Relaxed);
    }

    /// Make [`MockTransport::disconnect`] fail and leave the link up.
    pub fn set_fail_disconnect(&self, fail: bool) {
        self.state.fail_disconnect.store(fail, Ordering::Relaxed);
    }

    /// Simulate the controller dropping the connection.
    pub fn drop_connection(&self) {
        self.state.disconnected.store(true, Ordering::Relaxed);
    }

    /// Whether the link is still up.
    pub fn is_connected_sync(&self) -> bool {
        !self.state.disconnected.load(Ordering::Relaxed)
    }

    /// Close the link as a client would.
    pub async fn disconnect(&self) -> Result<()> {
        if self.state.fail_disconnect.load(Ordering::Relaxed) {
            return Err(Error::Bluetooth(btleplug::Error::RuntimeError(
                "injected disconnect failure".to_string(),
            )));
        }
        self.state.disconnected.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn check_should_fail(&self, mode: WriteMode) -> Result<()> {
        if self.state.disconnected.load(Ordering::Relaxed) {
            return Err(Error::NotConnected);
        }

        if self.state.remaining_failures.load(Ordering::Relaxed) > 0 {
            self.state.remaining_failures.fetch_sub(1, Ordering::Relaxed);
            return Err(Error::write_failed("mock", "injected transient failure"));
        }

        let mode_fails = match mode {
            WriteMode::WithResponse => self.state.fail_with_response.load(Ordering::Relaxed),
            WriteMode::WithoutResponse => self.state.fail_without_response.load(Ordering::Relaxed),
        };

        if mode_fails || self.state.should_fail.load(Ordering::Relaxed) {
            Err(Error::write_failed("mock", format!("{:?} rejected", mode)))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn write_frame(&self, frame: &Frame, mode: WriteMode) -> Result<()> {
        self.state.attempts.fetch_add(1, Ordering::Relaxed);

        let latency = self.state.write_latency_ms.load(Ordering::Relaxed);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        self.check_should_fail(mode)?;

        self.state.writes.write().await.push(RecordedWrite {
            mode,
            frame: *frame,
            at: Instant::now(),
        });
        Ok(())
    }
}

#[async_trait]
impl Connection for MockTransport {
    async fn is_connected(&self) -> bool {
        self.is_connected_sync()
    }

    async fn disconnect(&self) -> Result<()> {
        MockTransport::disconnect(self).await
    }
}
