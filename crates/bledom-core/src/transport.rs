//! The write-only transport the animation engine drives.
//!
//! The engine never sees adapters, peripherals or characteristics. It only
//! needs something that can put a [`Frame`] on the wire, which is what
//! [`Transport`] describes. The BLE [`Controller`](crate::Controller)
//! implements it for real hardware and [`MockTransport`](crate::MockTransport)
//! implements it for tests.

use async_trait::async_trait;
use tracing::{debug, error, warn};

use bledom_types::Frame;

use crate::error::Result;

/// How a frame should be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteMode {
    /// Ask the controller to acknowledge the write.
    WithResponse,
    /// Fire and forget.
    WithoutResponse,
}

impl WriteMode {
    /// The mode tried after this one fails, if any.
    pub fn fallback(self) -> Option<Self> {
        match self {
            Self::WithResponse => Some(Self::WithoutResponse),
            Self::WithoutResponse => None,
        }
    }
}

impl From<WriteMode> for btleplug::api::WriteType {
    fn from(mode: WriteMode) -> Self {
        match mode {
            WriteMode::WithResponse => btleplug::api::WriteType::WithResponse,
            WriteMode::WithoutResponse => btleplug::api::WriteType::WithoutResponse,
        }
    }
}

/// Something that can deliver a frame to an LED controller.
///
/// Implementations own the connection. A write either succeeds or returns an
/// error; deciding what to do about a failed write is up to the caller (see
/// [`send_frame`]).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Write one frame using the given mode.
    async fn write_frame(&self, frame: &Frame, mode: WriteMode) -> Result<()>;
}

/// A [`Transport`] over a link the caller is responsible for closing.
///
/// Implemented by [`Controller`](crate::Controller) and
/// [`MockTransport`](crate::MockTransport).
#[async_trait]
pub trait Connection: Transport {
    /// Whether the link is still up.
    async fn is_connected(&self) -> bool;

    /// Close the link.
    async fn disconnect(&self) -> Result<()>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for &T {
    async fn write_frame(&self, frame: &Frame, mode: WriteMode) -> Result<()> {
        (**self).write_frame(frame, mode).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn write_frame(&self, frame: &Frame, mode: WriteMode) -> Result<()> {
        (**self).write_frame(frame, mode).await
    }
}

/// Deliver a frame, falling back from acknowledged to unacknowledged writes.
///
/// The first attempt requests an acknowledgment. If that fails, the frame
/// is written once more without one. If both fail the error is logged and
/// `false` is returned; the failure never propagates.
pub async fn send_frame<T: Transport + ?Sized>(transport: &T, frame: &Frame, label: &str) -> bool {
    debug!(%frame, "{}", label);

    let mut mode = WriteMode::WithResponse;
    loop {
        match transport.write_frame(frame, mode).await {
            Ok(()) => {
                if mode != WriteMode::WithResponse {
                    debug!("{}: delivered with {:?}", label, mode);
                }
                return true;
            }
            Err(e) => match mode.fallback() {
                Some(next) => {
                    warn!("{}: {:?} write failed ({}), retrying with {:?}", label, mode, e, next);
                    mode = next;
                }
                None => {
                    error!("{}: could not send frame {}: {}", label, frame, e);
                    return false;
                }
            },
        }
    }
}
