//! Per-device register support bookkeeping
//!
//! Sigenergy firmware revisions expose different subsets of the register map,
//! so every register starts out with an unknown support state and is settled
//! by probing. A settled verdict is final for the life of the process.

use crate::modbus::DeviceAddress;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;

/// Probe verdict for one register on one device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RegisterSupport {
    /// Not probed yet
    Unknown,
    /// Probe read succeeded and the value looked plausible
    Supported,
    /// Device rejected the read or returned an implausible value
    Unsupported,
}

/// Support states for all probed registers, keyed by device and register name
///
/// Guarded by a blocking mutex; callers hold the lock only for map access and
/// never across an await point.
pub struct SupportTable {
    entries: Mutex<HashMap<DeviceAddress, HashMap<&'static str, RegisterSupport>>>,
}

impl SupportTable {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Current state for a register, `Unknown` if never settled
    pub fn state(&self, device: &DeviceAddress, register: &str) -> RegisterSupport {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .get(device)
            .and_then(|regs| regs.get(register))
            .copied()
            .unwrap_or(RegisterSupport::Unknown)
    }

    /// Record a probe verdict. Only an `Unknown` register can be settled;
    /// returns false when the register already holds a verdict.
    pub fn settle(
        &self,
        device: &DeviceAddress,
        register: &'static str,
        verdict: RegisterSupport,
    ) -> bool {
        if verdict == RegisterSupport::Unknown {
            return false;
        }
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let regs = entries.entry(device.clone()).or_default();
        match regs.get(register) {
            Some(_) => false,
            None => {
                regs.insert(register, verdict);
                true
            }
        }
    }

    /// All settled registers for one device
    pub fn device_states(&self, device: &DeviceAddress) -> HashMap<&'static str, RegisterSupport> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(device).cloned().unwrap_or_default()
    }
}

impl Default for SupportTable {
    fn default() -> Self {
        Self::new()
    }
}
