//! Configuration management for Sigenbridge
//!
//! This module handles loading, validation, and management of the application
//! configuration from YAML files.

use crate::error::{Result, SigenError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Plant controller connection
    pub plant: PlantConfig,

    /// Inverter connections sharing the plant gateway or their own
    pub inverters: Vec<InverterConfig>,

    /// AC charger connections
    pub ac_chargers: Vec<AcChargerConfig>,

    /// Modbus transport settings
    pub modbus: ModbusSettings,

    /// Plausibility limits used when probing register support
    pub probe: PlausibilityLimits,

    /// Polling configuration
    pub poll: PollConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Plant controller connection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantConfig {
    /// Host name or IP address of the Modbus gateway
    pub host: String,

    /// TCP port (typically 502)
    pub port: u16,

    /// Modbus unit id of the plant controller
    pub unit_id: u8,

    /// Global read-only gate: when true every write is rejected before I/O
    pub read_only: bool,
}

/// Inverter connection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InverterConfig {
    /// Display label used in logs and snapshots
    pub name: String,

    /// Host name or IP address
    pub host: String,

    /// TCP port
    pub port: u16,

    /// Modbus unit id of the inverter
    pub unit_id: u8,

    /// Whether a DC charger is attached to this inverter's unit id
    pub has_dc_charger: bool,
}

/// AC charger connection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AcChargerConfig {
    /// Display label used in logs and snapshots
    pub name: String,

    /// Host name or IP address
    pub host: String,

    /// TCP port
    pub port: u16,

    /// Modbus unit id of the AC charger
    pub unit_id: u8,
}

/// Modbus transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModbusSettings {
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,

    /// Per-request timeout in seconds
    pub operation_timeout_secs: u64,

    /// Connect attempts before giving up on an acquire
    pub retry_count: u32,

    /// Delay between connect attempts in milliseconds
    pub retry_delay_ms: u64,
}

/// Bounds used to classify probe readings as plausible.
///
/// These are policy, not protocol guarantees: a register whose decoded value
/// falls outside the bound for its unit category is treated as unsupported.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlausibilityLimits {
    /// Maximum voltage magnitude in volts
    pub voltage_max: f64,

    /// Maximum current magnitude in amperes
    pub current_max: f64,

    /// Maximum power magnitude in kilowatts
    pub power_kw_max: f64,

    /// Maximum energy magnitude in kilowatt hours
    pub energy_kwh_max: f64,

    /// Temperature range in degrees
    pub temperature_min: f64,
    pub temperature_max: f64,

    /// Percentage range; above 100 tolerated for charging batteries
    pub percentage_min: f64,
    pub percentage_max: f64,
}

/// Polling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Seconds between fleet refresh cycles
    pub scan_interval_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Path to log file or directory; empty for console-only
    pub file: String,

    /// Number of rotated files to keep
    pub backup_count: u32,

    /// Whether to log to console
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            host: "192.168.1.100".to_string(),
            port: 502,
            unit_id: 247,
            read_only: true,
        }
    }
}

impl Default for InverterConfig {
    fn default() -> Self {
        Self {
            name: "inverter".to_string(),
            host: String::new(),
            port: 502,
            unit_id: 1,
            has_dc_charger: false,
        }
    }
}

impl Default for AcChargerConfig {
    fn default() -> Self {
        Self {
            name: "ac_charger".to_string(),
            host: String::new(),
            port: 502,
            unit_id: 0,
        }
    }
}

impl Default for ModbusSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 20,
            operation_timeout_secs: 20,
            retry_count: 3,
            retry_delay_ms: 500,
        }
    }
}

impl Default for PlausibilityLimits {
    fn default() -> Self {
        Self {
            voltage_max: 1000.0,
            current_max: 1000.0,
            power_kw_max: 1000.0,
            energy_kwh_max: 10_000_000.0,
            temperature_min: -50.0,
            temperature_max: 200.0,
            percentage_min: 0.0,
            percentage_max: 120.0,
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            scan_interval_secs: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            file: String::new(),
            backup_count: 5,
            console_output: true,
            json_format: false,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from the default locations
    pub fn load() -> Result<Self> {
        let default_paths = [
            "sigenbridge_config.yaml",
            "/etc/sigenbridge/config.yaml",
        ];

        for path in &default_paths {
            if Path::new(path).exists() {
                return Self::from_file(path);
            }
        }

        // Fall back to default configuration
        Ok(Config::default())
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.plant.host.is_empty() {
            return Err(SigenError::validation(
                "plant.host",
                "Host cannot be empty",
            ));
        }

        if self.plant.port == 0 {
            return Err(SigenError::validation(
                "plant.port",
                "Port must be greater than 0",
            ));
        }

        for (i, inverter) in self.inverters.iter().enumerate() {
            if inverter.host.is_empty() {
                return Err(SigenError::validation(
                    format!("inverters[{}].host", i),
                    "Host cannot be empty".to_string(),
                ));
            }
            if inverter.port == 0 {
                return Err(SigenError::validation(
                    format!("inverters[{}].port", i),
                    "Port must be greater than 0".to_string(),
                ));
            }
        }

        for (i, charger) in self.ac_chargers.iter().enumerate() {
            if charger.host.is_empty() {
                return Err(SigenError::validation(
                    format!("ac_chargers[{}].host", i),
                    "Host cannot be empty".to_string(),
                ));
            }
            if charger.port == 0 {
                return Err(SigenError::validation(
                    format!("ac_chargers[{}].port", i),
                    "Port must be greater than 0".to_string(),
                ));
            }
        }

        self.validate_unique_units()?;

        if self.modbus.connect_timeout_secs == 0 || self.modbus.operation_timeout_secs == 0 {
            return Err(SigenError::validation(
                "modbus",
                "Timeouts must be greater than 0",
            ));
        }

        if self.poll.scan_interval_secs == 0 {
            return Err(SigenError::validation(
                "poll.scan_interval_secs",
                "Must be greater than 0",
            ));
        }

        self.validate_limits()
    }

    /// Reject two devices claiming the same unit id behind one endpoint
    fn validate_unique_units(&self) -> Result<()> {
        let mut seen: HashSet<(String, u16, u8)> = HashSet::new();
        let mut claim = |host: &str, port: u16, unit_id: u8| -> Result<()> {
            if !seen.insert((host.to_string(), port, unit_id)) {
                return Err(SigenError::validation(
                    "devices".to_string(),
                    format!("Duplicate unit id {} on {}:{}", unit_id, host, port),
                ));
            }
            Ok(())
        };

        claim(&self.plant.host, self.plant.port, self.plant.unit_id)?;
        for inverter in &self.inverters {
            claim(&inverter.host, inverter.port, inverter.unit_id)?;
        }
        for charger in &self.ac_chargers {
            claim(&charger.host, charger.port, charger.unit_id)?;
        }
        Ok(())
    }

    fn validate_limits(&self) -> Result<()> {
        let limits = &self.probe;
        if limits.voltage_max <= 0.0
            || limits.current_max <= 0.0
            || limits.power_kw_max <= 0.0
            || limits.energy_kwh_max <= 0.0
        {
            return Err(SigenError::validation(
                "probe",
                "Plausibility maxima must be positive",
            ));
        }
        if limits.temperature_min >= limits.temperature_max {
            return Err(SigenError::validation(
                "probe.temperature_min",
                "Must be below temperature_max",
            ));
        }
        if limits.percentage_min >= limits.percentage_max {
            return Err(SigenError::validation(
                "probe.percentage_min",
                "Must be below percentage_max",
            ));
        }
        Ok(())
    }
}
