//! Modbus/TCP connection hub for Sigenergy fleets
//!
//! One lazily-opened TCP connection per `(host, port)` endpoint, shared by
//! every unit id behind it: the plant controller, its inverters and any AC
//! chargers all answer on the same socket. A mutex per endpoint serializes
//! the connect-or-reuse decision and all register traffic on that endpoint,
//! while different endpoints proceed in parallel.

pub mod probe;
pub mod support;
pub mod transport;

use crate::codec::{RegisterValue, decode_registers, encode_value};
use crate::config::{ModbusSettings, PlausibilityLimits};
use crate::error::{Result, SigenError};
use crate::logging::get_logger;
use crate::registers::{RegisterAccess, RegisterDef, RegisterTable};
use probe::classify_response;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use support::{RegisterSupport, SupportTable};
use tokio::sync::Mutex;
use tokio::time::sleep;
use transport::{ModbusTransport, ReadResponse, TcpConnector, TransportConnector};

/// One Modbus/TCP service, identified by host and port
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// A device behind an endpoint, addressed by Modbus unit id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DeviceAddress {
    pub endpoint: Endpoint,
    pub unit_id: u8,
}

impl DeviceAddress {
    pub fn new(host: impl Into<String>, port: u16, unit_id: u8) -> Self {
        Self {
            endpoint: Endpoint {
                host: host.into(),
                port,
            },
            unit_id,
        }
    }
}

impl std::fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.endpoint, self.unit_id)
    }
}

/// Connection state for one endpoint
#[derive(Default)]
struct ConnectionSlot {
    /// Open transport, `None` until first use or after a failure
    transport: Option<Box<dyn ModbusTransport>>,

    /// Set after a timeout left the link in an unknown state; forces a
    /// reconnect before the transport is used again
    suspect: bool,
}

/// Connection manager, register prober and read/write front end
pub struct ModbusHub {
    /// Lazily populated endpoint table
    connections: Mutex<HashMap<Endpoint, Arc<Mutex<ConnectionSlot>>>>,

    /// Probe verdicts per device and register
    support: SupportTable,

    /// Opens transports; swapped for a mock in tests
    connector: Arc<dyn TransportConnector>,

    /// Transport timeouts and retry policy
    settings: ModbusSettings,

    /// Plausibility bounds applied during probing
    limits: PlausibilityLimits,

    /// When set, every write is rejected before any I/O
    read_only: bool,

    /// Logger
    logger: crate::logging::StructuredLogger,
}

impl ModbusHub {
    /// Create a hub that opens real TCP connections
    pub fn new(settings: &ModbusSettings, limits: &PlausibilityLimits, read_only: bool) -> Self {
        Self::with_connector(settings, limits, read_only, Arc::new(TcpConnector))
    }

    /// Create a hub with a caller-supplied connector
    pub fn with_connector(
        settings: &ModbusSettings,
        limits: &PlausibilityLimits,
        read_only: bool,
        connector: Arc<dyn TransportConnector>,
    ) -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
            support: SupportTable::new(),
            connector,
            settings: settings.clone(),
            limits: limits.clone(),
            read_only,
            logger: get_logger("modbus_hub"),
        }
    }

    /// Whether the global read-only gate is active
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Probe verdict for one register on one device
    pub fn support_state(&self, device: &DeviceAddress, register: &str) -> RegisterSupport {
        self.support.state(device, register)
    }

    /// All settled probe verdicts for one device
    pub fn device_support(
        &self,
        device: &DeviceAddress,
    ) -> HashMap<&'static str, RegisterSupport> {
        self.support.device_states(device)
    }

    /// Connection slot for an endpoint, created on first use
    async fn slot(&self, endpoint: &Endpoint) -> Arc<Mutex<ConnectionSlot>> {
        let mut connections = self.connections.lock().await;
        connections
            .entry(endpoint.clone())
            .or_insert_with(|| Arc::new(Mutex::new(ConnectionSlot::default())))
            .clone()
    }

    /// Make sure the slot holds a usable transport, reconnecting when the
    /// previous one was flagged suspect
    async fn ensure_connected(&self, endpoint: &Endpoint, slot: &mut ConnectionSlot) -> Result<()> {
        if slot.suspect {
            self.logger
                .info(&format!("Recycling suspect connection to {endpoint}"));
            if let Some(mut transport) = slot.transport.take() {
                let _ = transport.disconnect().await;
            }
            slot.suspect = false;
        }

        if slot.transport.is_some() {
            return Ok(());
        }

        let max_attempts = self.settings.retry_count.max(1);
        let retry_delay = Duration::from_millis(self.settings.retry_delay_ms);
        let mut attempts = 0;

        loop {
            match self.connector.connect(endpoint, &self.settings).await {
                Ok(transport) => {
                    slot.transport = Some(transport);
                    return Ok(());
                }
                Err(e) => {
                    attempts += 1;
                    if attempts >= max_attempts {
                        return Err(e);
                    }
                    self.logger.warn(&format!(
                        "Connection attempt {attempts} to {endpoint} failed: {e}"
                    ));
                    sleep(retry_delay).await;
                }
            }
        }
    }

    /// Eagerly connect the endpoint a device lives on
    pub async fn connect(&self, device: &DeviceAddress) -> Result<()> {
        let slot = self.slot(&device.endpoint).await;
        let mut slot = slot.lock().await;
        self.ensure_connected(&device.endpoint, &mut slot).await
    }

    /// Settle the support state of every still-unknown register in the table
    ///
    /// Write-only registers cannot be read back and are never probed. A
    /// connection failure mid-batch settles the whole batch as unsupported
    /// and drops the transport; a timeout leaves the remaining registers
    /// unknown for a later retry and flags the connection.
    pub async fn probe_registers(
        &self,
        device: &DeviceAddress,
        table: &RegisterTable,
    ) -> Result<()> {
        let candidates: Vec<(&'static str, &RegisterDef)> = table
            .iter()
            .filter(|(name, def)| {
                def.access != RegisterAccess::WriteOnly
                    && self.support.state(device, name) == RegisterSupport::Unknown
            })
            .collect();

        if candidates.is_empty() {
            return Ok(());
        }

        let slot = self.slot(&device.endpoint).await;
        let mut slot = slot.lock().await;
        self.ensure_connected(&device.endpoint, &mut slot).await?;

        self.logger.debug(&format!(
            "Probing {} registers from {} on {device}",
            candidates.len(),
            table.name()
        ));

        for &(name, def) in &candidates {
            let transport = slot
                .transport
                .as_deref_mut()
                .ok_or_else(|| SigenError::modbus("Not connected"))?;
            let outcome = read_register(transport, device.unit_id, def).await;

            match outcome {
                Ok(response) => {
                    let verdict = classify_response(def, &response, &self.limits);
                    self.support.settle(device, name, verdict);
                    if verdict == RegisterSupport::Unsupported {
                        self.logger.debug(&format!(
                            "Register {name} at {} is not supported by {device}",
                            def.address
                        ));
                    }
                }
                Err(e) if e.is_connection_failure() => {
                    self.logger
                        .error(&format!("Probe batch for {device} aborted: {e}"));
                    for &(remaining, _) in &candidates {
                        self.support
                            .settle(device, remaining, RegisterSupport::Unsupported);
                    }
                    if let Some(mut transport) = slot.transport.take() {
                        let _ = transport.disconnect().await;
                    }
                    return Ok(());
                }
                Err(e) => {
                    self.logger.warn(&format!(
                        "Probe of {name} on {device} failed, leaving it unknown: {e}"
                    ));
                    slot.suspect = true;
                    break;
                }
            }
        }

        Ok(())
    }

    /// Read every supported, readable register in the table
    ///
    /// Registers settled as unsupported are omitted from the result; callers
    /// treat an absent key as "not applicable to this device". A failure on
    /// a single register degrades to an omitted key, a connection failure
    /// fails the whole read.
    pub async fn read_registers(
        &self,
        device: &DeviceAddress,
        table: &RegisterTable,
    ) -> Result<HashMap<&'static str, RegisterValue>> {
        self.probe_registers(device, table).await?;

        let slot = self.slot(&device.endpoint).await;
        let mut slot = slot.lock().await;
        self.ensure_connected(&device.endpoint, &mut slot).await?;

        let mut values = HashMap::new();

        for (name, def) in table.iter() {
            if !def.access.readable()
                || self.support.state(device, name) != RegisterSupport::Supported
            {
                continue;
            }

            let transport = slot
                .transport
                .as_deref_mut()
                .ok_or_else(|| SigenError::modbus("Not connected"))?;

            match read_register(transport, device.unit_id, def).await {
                Ok(ReadResponse::Words(words)) => {
                    match decode_registers(&words, def.data_type, def.gain) {
                        Ok(value) => {
                            values.insert(name, value);
                        }
                        Err(e) => {
                            self.logger
                                .warn(&format!("Decoding {name} from {device} failed: {e}"));
                        }
                    }
                }
                Ok(ReadResponse::Exception(code)) => {
                    self.logger.debug(&format!(
                        "Read of {name} on {device} returned exception 0x{code:02X}"
                    ));
                }
                Err(e) if e.is_connection_failure() => {
                    if let Some(mut transport) = slot.transport.take() {
                        let _ = transport.disconnect().await;
                    }
                    return Err(e);
                }
                Err(e) => {
                    self.logger
                        .warn(&format!("Read of {name} on {device} failed: {e}"));
                    slot.suspect = true;
                    // A timed-out request leaves a response in flight that
                    // would desynchronize every later read on this link.
                    if matches!(e, SigenError::Timeout { .. }) {
                        break;
                    }
                }
            }
        }

        Ok(values)
    }

    /// Write one parameter register
    ///
    /// Rejects unknown names, read-only registers and writes while the
    /// global read-only gate is set, all before touching the network.
    pub async fn write_parameter(
        &self,
        device: &DeviceAddress,
        table: &RegisterTable,
        register: &str,
        value: &RegisterValue,
    ) -> Result<()> {
        let def = table.get(register).ok_or_else(|| {
            SigenError::validation(
                register.to_string(),
                format!("no such register in {}", table.name()),
            )
        })?;

        if !def.access.writable() {
            return Err(SigenError::write_rejected(format!(
                "register {register} is read-only"
            )));
        }

        if self.read_only {
            return Err(SigenError::ReadOnlyMode);
        }

        let words = encode_value(value, def.data_type, def.gain, def.count)?;

        let slot = self.slot(&device.endpoint).await;
        let mut slot = slot.lock().await;
        self.ensure_connected(&device.endpoint, &mut slot).await?;
        let transport = slot
            .transport
            .as_deref_mut()
            .ok_or_else(|| SigenError::modbus("Not connected"))?;

        let result = match words.as_slice() {
            [word] => {
                transport
                    .write_single_register(device.unit_id, def.address, *word)
                    .await
            }
            _ => {
                transport
                    .write_multiple_registers(device.unit_id, def.address, &words)
                    .await
            }
        };

        match result {
            Ok(()) => {
                self.logger
                    .info(&format!("Wrote {value} to {register} on {device}"));
                Ok(())
            }
            Err(e) if e.is_connection_failure() => {
                if let Some(mut transport) = slot.transport.take() {
                    let _ = transport.disconnect().await;
                }
                Err(e)
            }
            Err(e) => {
                if matches!(e, SigenError::Timeout { .. }) {
                    slot.suspect = true;
                }
                Err(e)
            }
        }
    }

    /// Close one endpoint's connection if it is open
    pub async fn close(&self, endpoint: &Endpoint) {
        let slot = { self.connections.lock().await.remove(endpoint) };
        if let Some(slot) = slot {
            let mut slot = slot.lock().await;
            if let Some(mut transport) = slot.transport.take() {
                if let Err(e) = transport.disconnect().await {
                    self.logger
                        .warn(&format!("Error closing connection to {endpoint}: {e}"));
                }
            }
        }
    }

    /// Close every open connection
    pub async fn close_all(&self) {
        let slots: Vec<_> = { self.connections.lock().await.drain().collect() };
        for (endpoint, slot) in slots {
            let mut slot = slot.lock().await;
            if let Some(mut transport) = slot.transport.take() {
                if let Err(e) = transport.disconnect().await {
                    self.logger
                        .warn(&format!("Error closing connection to {endpoint}: {e}"));
                }
            }
        }
        self.logger.info("All Modbus connections closed");
    }
}

/// Issue the read that matches the register's space: input registers for
/// read-only telemetry, holding registers for parameters
async fn read_register(
    transport: &mut dyn ModbusTransport,
    unit_id: u8,
    def: &RegisterDef,
) -> Result<ReadResponse> {
    match def.access {
        RegisterAccess::ReadOnly => {
            transport
                .read_input_registers(unit_id, def.address, def.count)
                .await
        }
        RegisterAccess::ReadWrite | RegisterAccess::WriteOnly => {
            transport
                .read_holding_registers(unit_id, def.address, def.count)
                .await
        }
    }
}
