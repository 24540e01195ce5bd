//! Connection to an ELK-BLEDOM controller.
//!
//! [`Controller`] owns the BLE peripheral and the control characteristic,
//! and implements [`Transport`] so animations can be played on it directly.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use btleplug::api::{Characteristic, Peripheral as _, Service};
use btleplug::platform::{Adapter, Peripheral};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use bledom_types::Frame;
use bledom_types::uuids::{CONTROL_CHARACTERISTIC, CONTROL_SERVICE};

use crate::error::{Error, Result};
use crate::scan::{DEFAULT_SCAN_TIMEOUT, find_controller};
use crate::transport::{Connection, Transport, WriteMode};
use crate::util::create_identifier;

/// Default timeout for BLE connection operations.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for service discovery.
const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for a single frame write.
const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// Configuration for discovery and connection timeouts.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use bledom_core::ConnectionConfig;
///
/// let config = ConnectionConfig::default()
///     .scan_timeout(Duration::from_secs(30))
///     .write_timeout(Duration::from_secs(2));
/// assert_eq!(config.connection_timeout, Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// How long to look for a matching controller.
    pub scan_timeout: Duration,
    /// Timeout for establishing a BLE connection.
    pub connection_timeout: Duration,
    /// Timeout for service discovery after connection.
    pub discovery_timeout: Duration,
    /// Timeout for each frame write.
    pub write_timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            scan_timeout: DEFAULT_SCAN_TIMEOUT,
            connection_timeout: DEFAULT_CONNECT_TIMEOUT,
            discovery_timeout: DEFAULT_DISCOVERY_TIMEOUT,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
        }
    }
}

impl ConnectionConfig {
    /// Create a new connection config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scan timeout.
    #[must_use]
    pub fn scan_timeout(mut self, timeout: Duration) -> Self {
        self.scan_timeout = timeout;
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Set the service discovery timeout.
    #[must_use]
    pub fn discovery_timeout(mut self, timeout: Duration) -> Self {
        self.discovery_timeout = timeout;
        self
    }

    /// Set the write timeout.
    #[must_use]
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }
}

/// A connected ELK-BLEDOM controller.
///
/// # Cleanup
///
/// Call [`Controller::disconnect`] before dropping. A controller dropped
/// while still connected logs a warning and disconnects in the background
/// on a best-effort basis.
pub struct Controller {
    /// Kept alive for the lifetime of the peripheral connection.
    #[allow(dead_code)]
    adapter: Adapter,
    peripheral: Peripheral,
    characteristic: Characteristic,
    name: Option<String>,
    /// MAC address on Linux/Windows, peripheral UUID on macOS.
    address: String,
    /// Whether disconnect has been called (for Drop warning).
    disconnected: AtomicBool,
    config: ConnectionConfig,
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("name", &self.name)
            .field("address", &self.address)
            .field("characteristic", &self.characteristic.uuid)
            .finish_non_exhaustive()
    }
}

impl Controller {
    /// Find and connect to the first controller matching `target`.
    ///
    /// `target` is an advertised name prefix (case-insensitive) or an address.
    ///
    /// ```no_run
    /// use bledom_core::Controller;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let controller = Controller::connect("ELK").await?;
    ///     println!("Connected to {:?}", controller);
    ///     controller.disconnect().await?;
    ///     Ok(())
    /// }
    /// ```
    #[tracing::instrument(level = "info", skip_all, fields(target = %target))]
    pub async fn connect(target: &str) -> Result<Self> {
        Self::connect_with_config(target, ConnectionConfig::default()).await
    }

    /// Find and connect with custom timeouts.
    #[tracing::instrument(level = "info", skip_all, fields(target = %target))]
    pub async fn connect_with_config(target: &str, config: ConnectionConfig) -> Result<Self> {
        let (adapter, peripheral) = find_controller(target, config.scan_timeout).await?;
        Self::from_peripheral_with_config(adapter, peripheral, config).await
    }

    /// Connect to an already-discovered peripheral.
    ///
    /// If anything fails after the link is up, the peripheral is
    /// disconnected again before the error is returned.
    #[tracing::instrument(
        level = "info",
        skip_all,
        fields(connect_timeout = ?config.connection_timeout)
    )]
    pub async fn from_peripheral_with_config(
        adapter: Adapter,
        peripheral: Peripheral,
        config: ConnectionConfig,
    ) -> Result<Self> {
        info!("Connecting to controller...");
        let release = async {
            if peripheral.is_connected().await.unwrap_or(false) {
                peripheral.disconnect().await
            } else {
                Ok(())
            }
        };
        connect_or_release(config.connection_timeout, peripheral.connect(), release).await?;
        info!("Connected!");

        match Self::prepare(&peripheral, &config).await {
            Ok((characteristic, name, address)) => Ok(Self {
                adapter,
                peripheral,
                characteristic,
                name,
                address,
                disconnected: AtomicBool::new(false),
                config,
            }),
            Err(e) => {
                if let Err(cleanup) = peripheral.disconnect().await {
                    warn!("Cleanup after failed setup also failed: {}", cleanup);
                }
                Err(e)
            }
        }
    }

    async fn prepare(
        peripheral: &Peripheral,
        config: &ConnectionConfig,
    ) -> Result<(Characteristic, Option<String>, String)> {
        info!("Discovering services...");
        timeout(config.discovery_timeout, peripheral.discover_services())
            .await
            .map_err(|_| Error::timeout("discover services", config.discovery_timeout))??;

        let services = peripheral.services();
        debug!("Found {} services", services.len());
        for service in &services {
            debug!("  Service: {}", service.uuid);
        }

        let characteristic = find_control_characteristic(&services).ok_or_else(|| {
            Error::characteristic_not_found(CONTROL_CHARACTERISTIC.to_string(), services.len())
        })?;
        debug!(
            "Using characteristic {} on service {}",
            characteristic.uuid, characteristic.service_uuid
        );

        let properties = peripheral.properties().await?;
        let name = properties.as_ref().and_then(|p| p.local_name.clone());
        let address = create_identifier(&peripheral.address().to_string(), &peripheral.id());

        Ok((characteristic, name, address))
    }

    /// Check if the peripheral reports a live connection.
    pub async fn is_connected(&self) -> bool {
        self.peripheral.is_connected().await.unwrap_or(false)
    }

    /// Disconnect from the controller.
    ///
    /// Only issues a disconnect when the peripheral still reports being
    /// connected, so calling this twice is harmless.
    #[tracing::instrument(level = "info", skip(self), fields(device_name = ?self.name))]
    pub async fn disconnect(&self) -> Result<()> {
        self.disconnected.store(true, Ordering::SeqCst);

        if self.peripheral.is_connected().await? {
            info!("Disconnecting from controller...");
            self.peripheral.disconnect().await?;
        } else {
            debug!("Already disconnected");
        }
        Ok(())
    }

    /// The advertised name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Address or platform identifier.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The connection configuration in use.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for Controller {
    async fn write_frame(&self, frame: &Frame, mode: WriteMode) -> Result<()> {
        if self.disconnected.load(Ordering::SeqCst) {
            return Err(Error::NotConnected);
        }

        let write = self
            .peripheral
            .write(&self.characteristic, frame.as_ref(), mode.into());

        timeout(self.config.write_timeout, write)
            .await
            .map_err(|_| Error::timeout(format!("write {:?}", mode), self.config.write_timeout))?
            .map_err(|e| Error::write_failed(self.characteristic.uuid.to_string(), e.to_string()))
    }
}

#[async_trait]
impl Connection for Controller {
    async fn is_connected(&self) -> bool {
        Controller::is_connected(self).await
    }

    async fn disconnect(&self) -> Result<()> {
        Controller::disconnect(self).await
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        if self.disconnected.swap(true, Ordering::SeqCst) {
            return;
        }

        warn!(
            device_name = ?self.name,
            device_address = %self.address,
            "Controller dropped without calling disconnect() - performing best-effort cleanup"
        );

        let peripheral = self.peripheral.clone();
        let address = self.address.clone();

        // The runtime may already be shutting down.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                if let Err(e) = peripheral.disconnect().await {
                    debug!("Background disconnect of {} failed: {}", address, e);
                }
            });
        }
    }
}

/// Await `connect` under `limit`, running `release` if it fails or times out.
///
/// A timed-out attempt may leave a half-open link behind, so `release` is
/// awaited on every failure path. Its own errors are only logged.
async fn connect_or_release<C, R>(limit: Duration, connect: C, release: R) -> Result<()>
where
    C: Future<Output = std::result::Result<(), btleplug::Error>>,
    R: Future<Output = std::result::Result<(), btleplug::Error>>,
{
    let outcome = match timeout(limit, connect).await {
        Ok(result) => result.map_err(Error::from),
        Err(_) => Err(Error::timeout("connect to device", limit)),
    };

    if let Err(e) = outcome {
        warn!("Connect failed, releasing link: {}", e);
        if let Err(cleanup) = release.await {
            warn!("Cleanup after failed connect also failed: {}", cleanup);
        }
        return Err(e);
    }
    Ok(())
}

/// Locate the control characteristic.
///
/// Prefers the vendor control service; falls back to any service carrying
/// a characteristic with the control UUID.
pub fn find_control_characteristic(services: &BTreeSet<Service>) -> Option<Characteristic> {
    let in_service = |service: &Service| {
        service
            .characteristics
            .iter()
            .find(|c| c.uuid == CONTROL_CHARACTERISTIC)
            .cloned()
    };

    services
        .iter()
        .filter(|s| s.uuid == CONTROL_SERVICE)
        .find_map(in_service)
        .or_else(|| services.iter().find_map(in_service))
}
