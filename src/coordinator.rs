//! Fleet polling coordinator
//!
//! Derives the set of polled devices from configuration, probes their
//! register tables once at session start, then reads running info on a
//! fixed interval and publishes the decoded values as fleet snapshots.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::time::{Duration, interval};

use crate::codec::RegisterValue;
use crate::config::Config;
use crate::error::{Result, SigenError};
use crate::logging::{StructuredLogger, get_logger};
use crate::modbus::support::RegisterSupport;
use crate::modbus::{DeviceAddress, ModbusHub};
use crate::registers::{
    AC_CHARGER_PARAMETER_REGISTERS, AC_CHARGER_RUNNING_INFO_REGISTERS,
    DC_CHARGER_PARAMETER_REGISTERS, DC_CHARGER_RUNNING_INFO_REGISTERS,
    INVERTER_PARAMETER_REGISTERS, INVERTER_RUNNING_INFO_REGISTERS, PLANT_PARAMETER_REGISTERS,
    PLANT_RUNNING_INFO_REGISTERS, RegisterTable,
};

/// Role a polled unit plays in the fleet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKind {
    Plant,
    Inverter,
    AcCharger,
    DcCharger,
}

impl DeviceKind {
    /// Running info table polled every cycle for this kind of device
    pub fn running_info_table(self) -> &'static RegisterTable {
        match self {
            DeviceKind::Plant => &PLANT_RUNNING_INFO_REGISTERS,
            DeviceKind::Inverter => &INVERTER_RUNNING_INFO_REGISTERS,
            DeviceKind::AcCharger => &AC_CHARGER_RUNNING_INFO_REGISTERS,
            DeviceKind::DcCharger => &DC_CHARGER_RUNNING_INFO_REGISTERS,
        }
    }

    /// Writable parameter table for this kind of device
    pub fn parameter_table(self) -> &'static RegisterTable {
        match self {
            DeviceKind::Plant => &PLANT_PARAMETER_REGISTERS,
            DeviceKind::Inverter => &INVERTER_PARAMETER_REGISTERS,
            DeviceKind::AcCharger => &AC_CHARGER_PARAMETER_REGISTERS,
            DeviceKind::DcCharger => &DC_CHARGER_PARAMETER_REGISTERS,
        }
    }

    /// Snake-case label used in logs and error messages
    pub fn label(self) -> &'static str {
        match self {
            DeviceKind::Plant => "plant",
            DeviceKind::Inverter => "inverter",
            DeviceKind::AcCharger => "ac_charger",
            DeviceKind::DcCharger => "dc_charger",
        }
    }
}

/// One polled unit: its role, display name and Modbus address
#[derive(Debug, Clone, Serialize)]
pub struct FleetDevice {
    pub kind: DeviceKind,
    pub name: String,
    pub address: DeviceAddress,
}

/// Build the device roster from configuration.
///
/// The plant controller, every inverter and every AC charger become devices
/// of their own. A DC charger has no Modbus identity of its own: it answers
/// on its host inverter's unit id, so it is listed as a separate device
/// sharing that address.
pub fn fleet_from_config(config: &Config) -> Vec<FleetDevice> {
    let mut devices = Vec::new();

    devices.push(FleetDevice {
        kind: DeviceKind::Plant,
        name: "plant".to_string(),
        address: DeviceAddress::new(
            config.plant.host.clone(),
            config.plant.port,
            config.plant.unit_id,
        ),
    });

    for inverter in &config.inverters {
        let address = DeviceAddress::new(inverter.host.clone(), inverter.port, inverter.unit_id);
        devices.push(FleetDevice {
            kind: DeviceKind::Inverter,
            name: inverter.name.clone(),
            address: address.clone(),
        });
        if inverter.has_dc_charger {
            devices.push(FleetDevice {
                kind: DeviceKind::DcCharger,
                name: format!("{}_dc_charger", inverter.name),
                address,
            });
        }
    }

    for charger in &config.ac_chargers {
        devices.push(FleetDevice {
            kind: DeviceKind::AcCharger,
            name: charger.name.clone(),
            address: DeviceAddress::new(charger.host.clone(), charger.port, charger.unit_id),
        });
    }

    devices
}

/// Decoded running info for one device in one poll cycle
#[derive(Debug, Clone, Serialize)]
pub struct DeviceReading {
    pub name: String,
    pub address: DeviceAddress,
    pub values: HashMap<&'static str, RegisterValue>,
}

/// One poll cycle's view of the whole fleet, grouped the way consumers
/// address devices.
///
/// Devices whose read failed this cycle are absent; consumers keep the last
/// snapshot that contained them.
#[derive(Debug, Clone, Serialize)]
pub struct FleetSnapshot {
    pub timestamp: String,
    pub plant: Option<DeviceReading>,
    pub inverters: Vec<DeviceReading>,
    pub ac_chargers: Vec<DeviceReading>,
    pub dc_chargers: Vec<DeviceReading>,
    pub total_polls: u64,
    pub overrun_count: u64,
}

impl FleetSnapshot {
    fn empty() -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            plant: None,
            inverters: Vec::new(),
            ac_chargers: Vec::new(),
            dc_chargers: Vec::new(),
            total_polls: 0,
            overrun_count: 0,
        }
    }

    /// Number of devices that answered in this cycle
    pub fn device_count(&self) -> usize {
        usize::from(self.plant.is_some())
            + self.inverters.len()
            + self.ac_chargers.len()
            + self.dc_chargers.len()
    }
}

/// Polls the fleet on a fixed interval and publishes snapshots
pub struct PollCoordinator {
    hub: Arc<ModbusHub>,
    fleet: Vec<FleetDevice>,
    scan_interval: Duration,
    logger: StructuredLogger,
    shutdown_tx: mpsc::UnboundedSender<()>,
    shutdown_rx: mpsc::UnboundedReceiver<()>,
    snapshot_tx: watch::Sender<Arc<FleetSnapshot>>,
    snapshot_rx: watch::Receiver<Arc<FleetSnapshot>>,
    total_polls: u64,
    overrun_count: u64,
}

impl PollCoordinator {
    /// Create a coordinator for the devices named in `config`
    pub fn new(config: &Config, hub: Arc<ModbusHub>) -> Self {
        let fleet = fleet_from_config(config);
        let (shutdown_tx, shutdown_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(FleetSnapshot::empty()));

        Self {
            hub,
            fleet,
            scan_interval: Duration::from_secs(config.poll.scan_interval_secs),
            logger: get_logger("coordinator"),
            shutdown_tx,
            shutdown_rx,
            snapshot_tx,
            snapshot_rx,
            total_polls: 0,
            overrun_count: 0,
        }
    }

    /// Devices this coordinator polls
    pub fn fleet(&self) -> &[FleetDevice] {
        &self.fleet
    }

    /// Handle used to request a shutdown of the run loop
    pub fn shutdown_handle(&self) -> mpsc::UnboundedSender<()> {
        self.shutdown_tx.clone()
    }

    /// Receiver for published fleet snapshots
    pub fn subscribe(&self) -> watch::Receiver<Arc<FleetSnapshot>> {
        self.snapshot_rx.clone()
    }

    /// Shared access to the register hub, for writes issued outside the loop
    pub fn hub(&self) -> Arc<ModbusHub> {
        Arc::clone(&self.hub)
    }

    /// Run the polling loop until shutdown is requested
    pub async fn run(&mut self) -> Result<()> {
        self.logger.info(&format!(
            "Starting fleet poll loop for {} devices",
            self.fleet.len()
        ));

        self.probe_fleet().await;

        let mut poll_interval = interval(self.scan_interval);

        loop {
            tokio::select! {
                _ = poll_interval.tick() => {
                    let poll_started = std::time::Instant::now();
                    if let Err(e) = self.poll_cycle().await {
                        self.logger.error(&format!("Poll cycle failed: {}", e));
                        // Continue polling even on errors
                    }
                    self.total_polls = self.total_polls.saturating_add(1);
                    if poll_started.elapsed() > self.scan_interval {
                        self.overrun_count = self.overrun_count.saturating_add(1);
                    }
                }
                _ = self.shutdown_rx.recv() => {
                    self.logger.info("Shutdown signal received");
                    break;
                }
            }
        }

        self.hub.close_all().await;
        self.logger.info("Coordinator shutdown complete");
        Ok(())
    }

    /// Probe every device's tables so later reads skip unsupported registers.
    ///
    /// Probe failures are not fatal: registers left unknown here are probed
    /// again by the first read that touches them.
    async fn probe_fleet(&self) {
        for device in &self.fleet {
            for table in [
                device.kind.running_info_table(),
                device.kind.parameter_table(),
            ] {
                if let Err(e) = self.hub.probe_registers(&device.address, table).await {
                    self.logger.warn(&format!(
                        "Probe of {} for {} failed: {}",
                        table.name(),
                        device.name,
                        e
                    ));
                }
            }

            let table = device.kind.running_info_table();
            let supported = table
                .iter()
                .filter(|(name, _)| {
                    self.hub.support_state(&device.address, name) == RegisterSupport::Supported
                })
                .count();
            self.logger.info(&format!(
                "{}: {} of {} running info registers supported",
                device.name,
                supported,
                table.len()
            ));
        }
    }

    /// Read running info from every device and publish a snapshot
    async fn poll_cycle(&mut self) -> Result<()> {
        self.logger.debug("Starting poll cycle");

        let mut snapshot = FleetSnapshot {
            timestamp: chrono::Utc::now().to_rfc3339(),
            plant: None,
            inverters: Vec::new(),
            ac_chargers: Vec::new(),
            dc_chargers: Vec::new(),
            total_polls: self.total_polls,
            overrun_count: self.overrun_count,
        };

        for device in &self.fleet {
            match self
                .hub
                .read_registers(&device.address, device.kind.running_info_table())
                .await
            {
                Ok(values) => {
                    let reading = DeviceReading {
                        name: device.name.clone(),
                        address: device.address.clone(),
                        values,
                    };
                    match device.kind {
                        DeviceKind::Plant => snapshot.plant = Some(reading),
                        DeviceKind::Inverter => snapshot.inverters.push(reading),
                        DeviceKind::AcCharger => snapshot.ac_chargers.push(reading),
                        DeviceKind::DcCharger => snapshot.dc_chargers.push(reading),
                    }
                }
                Err(e) => {
                    self.logger
                        .error(&format!("Reading {} failed: {}", device.name, e));
                    // Continue with the remaining devices
                }
            }
        }

        let _ = self.snapshot_tx.send(Arc::new(snapshot));

        self.logger.debug("Poll cycle completed");
        Ok(())
    }

    /// Write a plant parameter register
    pub async fn write_plant_parameter(
        &self,
        register: &str,
        value: &RegisterValue,
    ) -> Result<()> {
        self.write_parameter(DeviceKind::Plant, 0, register, value)
            .await
    }

    /// Write a parameter register on the index-th configured inverter
    pub async fn write_inverter_parameter(
        &self,
        index: usize,
        register: &str,
        value: &RegisterValue,
    ) -> Result<()> {
        self.write_parameter(DeviceKind::Inverter, index, register, value)
            .await
    }

    /// Write a parameter register on the index-th configured AC charger
    pub async fn write_ac_charger_parameter(
        &self,
        index: usize,
        register: &str,
        value: &RegisterValue,
    ) -> Result<()> {
        self.write_parameter(DeviceKind::AcCharger, index, register, value)
            .await
    }

    /// Write a parameter register on the index-th DC charger.
    ///
    /// The write goes out on the host inverter's unit id, which is the only
    /// address a DC charger answers on.
    pub async fn write_dc_charger_parameter(
        &self,
        index: usize,
        register: &str,
        value: &RegisterValue,
    ) -> Result<()> {
        self.write_parameter(DeviceKind::DcCharger, index, register, value)
            .await
    }

    /// Write a parameter on the index-th fleet device of the given kind
    async fn write_parameter(
        &self,
        kind: DeviceKind,
        index: usize,
        register: &str,
        value: &RegisterValue,
    ) -> Result<()> {
        let device = self
            .fleet
            .iter()
            .filter(|d| d.kind == kind)
            .nth(index)
            .ok_or_else(|| {
                SigenError::validation(
                    format!("{}[{}]", kind.label(), index),
                    "no such device in the fleet".to_string(),
                )
            })?;

        self.hub
            .write_parameter(&device.address, kind.parameter_table(), register, value)
            .await
    }
}
