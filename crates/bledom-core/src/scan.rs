//! Controller discovery and scanning.
//!
//! Two ways to look for ELK-BLEDOM controllers:
//!
//! - [`find_controller`] watches the adapter's event stream and stops at the
//!   first peripheral matching a name prefix or address, driving a small
//!   [`Discovery`] state machine (`Scanning → Found`).
//! - [`scan_for_controllers`] scans for a fixed window and lists everything
//!   that looks like a controller.

use std::time::Duration;

use btleplug::api::{Central, CentralEvent, Manager as _, Peripheral as _, ScanFilter};
use btleplug::platform::{Adapter, Manager, Peripheral, PeripheralId};
use futures::{Stream, StreamExt};
use serde::Serialize;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use bledom_types::uuids::{CONTROL_SERVICE, DEVICE_NAME_PREFIX};

use crate::error::{DeviceNotFoundReason, Error, Result};
use crate::util::create_identifier;

/// Default time to wait for a matching controller.
pub const DEFAULT_SCAN_TIMEOUT: Duration = Duration::from_secs(15);

/// Information about a discovered controller.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoveredController {
    /// Advertised local name (e.g. "ELK-BLEDOM").
    pub name: Option<String>,
    /// The peripheral ID for connecting.
    #[serde(skip)]
    pub id: PeripheralId,
    /// The BLE address as a string (zeros on macOS, use `identifier` instead).
    pub address: String,
    /// A connection identifier (peripheral ID on macOS, address elsewhere).
    pub identifier: String,
    /// RSSI signal strength.
    pub rssi: Option<i16>,
    /// Whether the peripheral advertises the control service.
    pub advertises_control_service: bool,
}

/// Options for a listing scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// How long to scan.
    pub duration: Duration,
    /// Name prefix identifying controllers.
    pub name_prefix: String,
    /// Only return peripherals that look like controllers.
    pub controllers_only: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(5),
            name_prefix: DEVICE_NAME_PREFIX.to_string(),
            controllers_only: true,
        }
    }
}

impl ScanOptions {
    /// Create new scan options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scan duration.
    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set scan duration in seconds.
    #[must_use]
    pub fn duration_secs(mut self, secs: u64) -> Self {
        self.duration = Duration::from_secs(secs);
        self
    }

    /// Set the name prefix used to recognise controllers.
    #[must_use]
    pub fn name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = prefix.into();
        self
    }

    /// List every BLE peripheral, not just controllers.
    #[must_use]
    pub fn all_devices(mut self) -> Self {
        self.controllers_only = false;
        self
    }
}

/// Progress of a targeted search.
#[derive(Debug)]
pub enum Discovery<P> {
    /// Still waiting for a match.
    Scanning,
    /// A matching peripheral was seen.
    Found(P),
}

impl<P> Discovery<P> {
    /// Offer a candidate. The first match wins; later candidates are ignored.
    pub fn advance(self, candidate: P, name: Option<&str>, identifier: &str, target: &str) -> Self {
        match self {
            Self::Found(found) => Self::Found(found),
            Self::Scanning if matches_target(name, identifier, target) => Self::Found(candidate),
            Self::Scanning => Self::Scanning,
        }
    }

    /// Whether a match was seen.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Does a peripheral match the configured target?
///
/// The target matches when the advertised name starts with it
/// (case-insensitive) or when it equals the peripheral's identifier.
pub fn matches_target(name: Option<&str>, identifier: &str, target: &str) -> bool {
    if target.is_empty() {
        return false;
    }
    if identifier.eq_ignore_ascii_case(target) {
        return true;
    }
    name.is_some_and(|n| {
        n.len() >= target.len()
            && n.is_char_boundary(target.len())
            && n[..target.len()].eq_ignore_ascii_case(target)
    })
}

/// Get the first available Bluetooth adapter.
pub async fn get_adapter() -> Result<Adapter> {
    let manager = Manager::new().await?;
    let adapters = manager.adapters().await?;

    adapters
        .into_iter()
        .next()
        .ok_or(Error::DeviceNotFound(DeviceNotFoundReason::NoAdapter))
}

/// Find a controller by name prefix or address on the first adapter.
pub async fn find_controller(
    target: &str,
    scan_timeout: Duration,
) -> Result<(Adapter, Peripheral)> {
    let adapter = get_adapter().await?;
    let peripheral = find_controller_with_adapter(&adapter, target, scan_timeout).await?;
    Ok((adapter, peripheral))
}

/// Find a controller using a specific adapter.
///
/// Scanning is stopped before returning, whether or not a controller was
/// found.
#[tracing::instrument(
    level = "info",
    skip_all,
    fields(target = %target, timeout_secs = scan_timeout.as_secs())
)]
pub async fn find_controller_with_adapter(
    adapter: &Adapter,
    target: &str,
    scan_timeout: Duration,
) -> Result<Peripheral> {
    info!("Scanning for controller...");
    let mut events = adapter.events().await?;
    adapter.start_scan(ScanFilter::default()).await?;

    let outcome = timeout(scan_timeout, wait_for_match(adapter, &mut events, target)).await;

    if let Err(e) = adapter.stop_scan().await {
        warn!("Failed to stop scan: {}", e);
    }

    match outcome {
        Ok(Ok(peripheral)) => {
            info!("Found controller {}", peripheral.address());
            Ok(peripheral)
        }
        Ok(Err(e)) => Err(e),
        Err(_) => Err(Error::DeviceNotFound(DeviceNotFoundReason::ScanTimeout {
            identifier: target.to_string(),
            duration: scan_timeout,
        })),
    }
}

async fn wait_for_match(
    adapter: &Adapter,
    events: &mut (impl Stream<Item = CentralEvent> + Unpin),
    target: &str,
) -> Result<Peripheral> {
    let mut state = Discovery::Scanning;

    // Peripherals the platform already knows about may never produce a
    // discovery event.
    for peripheral in adapter.peripherals().await? {
        state = offer(state, peripheral, target).await;
    }

    loop {
        if let Discovery::Found(peripheral) = state {
            return Ok(peripheral);
        }

        let id = match events.next().await {
            Some(CentralEvent::DeviceDiscovered(id)) | Some(CentralEvent::DeviceUpdated(id)) => id,
            Some(_) => continue,
            None => return Err(Error::DeviceNotFound(DeviceNotFoundReason::ScanEnded)),
        };

        match adapter.peripheral(&id).await {
            Ok(peripheral) => state = offer(state, peripheral, target).await,
            Err(e) => debug!("Ignoring vanished peripheral: {}", e),
        }
    }
}

async fn offer(
    state: Discovery<Peripheral>,
    peripheral: Peripheral,
    target: &str,
) -> Discovery<Peripheral> {
    if state.is_found() {
        return state;
    }

    let name = match peripheral.properties().await {
        Ok(properties) => properties.and_then(|p| p.local_name),
        Err(e) => {
            debug!("Could not read properties: {}", e);
            None
        }
    };
    let identifier = create_identifier(&peripheral.address().to_string(), &peripheral.id());
    debug!(name = ?name, %identifier, "Saw peripheral");

    state.advance(peripheral, name.as_deref(), &identifier, target)
}

/// Scan for controllers in range with default options.
///
/// An empty list means nothing was found; it is not an error.
pub async fn scan_for_controllers() -> Result<Vec<DiscoveredController>> {
    scan_with_options(ScanOptions::default()).await
}

/// Scan for controllers with custom options.
pub async fn scan_with_options(options: ScanOptions) -> Result<Vec<DiscoveredController>> {
    let adapter = get_adapter().await?;
    scan_with_adapter(&adapter, options).await
}

/// Scan for controllers using a specific adapter.
pub async fn scan_with_adapter(
    adapter: &Adapter,
    options: ScanOptions,
) -> Result<Vec<DiscoveredController>> {
    info!(
        "Starting BLE scan for {} seconds...",
        options.duration.as_secs()
    );

    adapter.start_scan(ScanFilter::default()).await?;
    sleep(options.duration).await;
    adapter.stop_scan().await?;

    let peripherals = adapter.peripherals().await?;
    let mut discovered = Vec::new();

    for peripheral in peripherals {
        match process_peripheral(&peripheral, &options).await {
            Ok(Some(controller)) => {
                debug!("Found controller: {:?}", controller.name);
                discovered.push(controller);
            }
            Ok(None) => {}
            Err(e) => {
                debug!("Error processing peripheral: {}", e);
            }
        }
    }

    // Strongest signal first.
    discovered.sort_by(|a, b| b.rssi.cmp(&a.rssi));

    info!("Scan complete. Found {} device(s)", discovered.len());
    Ok(discovered)
}

async fn process_peripheral(
    peripheral: &Peripheral,
    options: &ScanOptions,
) -> Result<Option<DiscoveredController>> {
    let Some(properties) = peripheral.properties().await? else {
        return Ok(None);
    };

    let id = peripheral.id();
    let address = properties.address.to_string();
    let identifier = create_identifier(&address, &id);
    let advertises_control_service = properties.services.contains(&CONTROL_SERVICE);

    let looks_like_controller = advertises_control_service
        || matches_target(
            properties.local_name.as_deref(),
            &identifier,
            &options.name_prefix,
        );
    if options.controllers_only && !looks_like_controller {
        return Ok(None);
    }

    Ok(Some(DiscoveredController {
        name: properties.local_name,
        id,
        address,
        identifier,
        rssi: properties.rssi,
        advertises_control_service,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_name_prefix_case_insensitive() {
        assert!(matches_target(Some("ELK-BLEDOM"), "AA:BB", "ELK"));
        assert!(matches_target(Some("elk-bledom 1"), "AA:BB", "ELK"));
        assert!(matches_target(Some("ELK"), "AA:BB", "elk"));
        assert!(!matches_target(Some("EL"), "AA:BB", "ELK"));
        assert!(!matches_target(Some("Triones"), "AA:BB", "ELK"));
        assert!(!matches_target(None, "AA:BB", "ELK"));
    }

    #[test]
    fn test_matches_identifier() {
        let id = "BE:59:7A:00:12:34";
        assert!(matches_target(None, id, "be:59:7a:00:12:34"));
        assert!(matches_target(Some("Other"), id, id));
        assert!(!matches_target(None, id, "BE:59:7A:00:12:35"));
    }

    #[test]
    fn test_empty_target_matches_nothing() {
        assert!(!matches_target(Some("ELK-BLEDOM"), "AA:BB", ""));
    }

    #[test]
    fn test_multibyte_name_does_not_panic() {
        assert!(!matches_target(Some("Ünï"), "x", "EL"));
    }

    #[test]
    fn test_discovery_first_match_wins() {
        let state = Discovery::Scanning
            .advance("speaker", Some("JBL Flip"), "01", "ELK")
            .advance("strip", Some("ELK-BLEDOM"), "02", "ELK")
            .advance("other strip", Some("ELK-BLEDOM"), "03", "ELK");

        match state {
            Discovery::Found(found) => assert_eq!(found, "strip"),
            Discovery::Scanning => panic!("expected a match"),
        }
    }

    #[test]
    fn test_discovery_stays_scanning_without_match() {
        let state = Discovery::Scanning
            .advance(1, Some("Phone"), "01", "ELK")
            .advance(2, None, "02", "ELK");
        assert!(!state.is_found());
    }

    #[test]
    fn test_scan_options_builder() {
        let options = ScanOptions::new()
            .duration_secs(3)
            .name_prefix("Triones")
            .all_devices();
        assert_eq!(options.duration, Duration::from_secs(3));
        assert_eq!(options.name_prefix, "Triones");
        assert!(!options.controllers_only);

        let defaults = ScanOptions::default();
        assert_eq!(defaults.name_prefix, "ELK");
        assert!(defaults.controllers_only);
    }
}
