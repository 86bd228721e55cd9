//! Register catalog for Sigenergy devices
//!
//! Declarative tables describing every register the engine knows about:
//! address, width, access class, wire encoding, fixed-point gain, unit and
//! device applicability. The catalog is immutable data; whether a specific
//! physical device actually implements a register lives in the engine's
//! support table, not here.

pub mod charger;
pub mod inverter;
pub mod plant;

use crate::codec::DataType;
use serde::Serialize;
use std::collections::HashMap;

pub use charger::{
    AC_CHARGER_PARAMETER_REGISTERS, AC_CHARGER_RUNNING_INFO_REGISTERS,
    DC_CHARGER_PARAMETER_REGISTERS, DC_CHARGER_RUNNING_INFO_REGISTERS,
};
pub use inverter::{INVERTER_PARAMETER_REGISTERS, INVERTER_RUNNING_INFO_REGISTERS};
pub use plant::{PLANT_PARAMETER_REGISTERS, PLANT_RUNNING_INFO_REGISTERS};

/// Access class of a register.
///
/// `ReadOnly` registers live in the input register space (FC 0x04),
/// `ReadWrite` in the holding space (FC 0x03/0x06/0x10), `WriteOnly`
/// registers are command words that cannot be read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RegisterAccess {
    ReadOnly,
    ReadWrite,
    WriteOnly,
}

impl RegisterAccess {
    pub fn readable(self) -> bool {
        matches!(self, RegisterAccess::ReadOnly | RegisterAccess::ReadWrite)
    }

    pub fn writable(self) -> bool {
        matches!(self, RegisterAccess::ReadWrite | RegisterAccess::WriteOnly)
    }
}

/// Device models a register applies to; an empty list means every model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeviceModel {
    HybridInverter,
    PvInverter,
}

pub(crate) const ALL: &[DeviceModel] = &[];
pub(crate) const HYBRID: &[DeviceModel] = &[DeviceModel::HybridInverter];
pub(crate) const HYBRID_OR_PV: &[DeviceModel] =
    &[DeviceModel::HybridInverter, DeviceModel::PvInverter];

/// Closed unit categories used by probe plausibility checks.
///
/// Resolved from the unit string once, when the catalog is built, so probing
/// never does substring matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnitCategory {
    Voltage,
    Current,
    Energy,
    Power,
    Temperature,
    Percentage,
}

impl UnitCategory {
    /// Resolve a unit string to its category.
    ///
    /// Matching order matters: voltage before current ("kVar" and "kVA"
    /// carry a `v`), energy ("wh") before power ("w"). Units matching no
    /// category (Hz, s, min, MΩ) get no plausibility bound at all.
    pub fn from_unit(unit: &str) -> Option<Self> {
        let unit = unit.to_lowercase();
        if unit.contains('v') || unit.contains("volt") {
            Some(UnitCategory::Voltage)
        } else if unit.contains('a') || unit.contains("amp") {
            Some(UnitCategory::Current)
        } else if unit.contains("wh") {
            Some(UnitCategory::Energy)
        } else if unit.contains('w') || unit.contains("watt") {
            Some(UnitCategory::Power)
        } else if unit.contains('c') || unit.contains('f') || unit.contains("temp") {
            Some(UnitCategory::Temperature)
        } else if unit.contains('%') {
            Some(UnitCategory::Percentage)
        } else {
            None
        }
    }
}

/// Immutable catalog entry for one register
#[derive(Debug, Clone)]
pub struct RegisterDef {
    /// Modbus register offset
    pub address: u16,

    /// Number of 16-bit words
    pub count: u16,

    /// Access class, which also selects the register space
    pub access: RegisterAccess,

    /// Wire encoding
    pub data_type: DataType,

    /// Fixed-point divisor: decoded = raw / gain
    pub gain: f64,

    /// Physical unit, used only by probing heuristics
    pub unit: Option<&'static str>,

    /// Plausibility category resolved from `unit` at construction
    pub plausibility: Option<UnitCategory>,

    /// Device models this register is defined for (informational)
    pub applicable_to: &'static [DeviceModel],
}

impl RegisterDef {
    /// Build a catalog entry, resolving the plausibility category from the
    /// unit string
    pub fn new(
        address: u16,
        count: u16,
        access: RegisterAccess,
        data_type: DataType,
        gain: f64,
        unit: Option<&'static str>,
        applicable_to: &'static [DeviceModel],
    ) -> Self {
        debug_assert!(gain > 0.0, "gain must be positive");
        if let Some(width) = data_type.fixed_word_count() {
            debug_assert!(count == width, "count must match encoding width");
        } else {
            debug_assert!(count > 0, "text registers need at least one word");
        }
        Self {
            address,
            count,
            access,
            data_type,
            gain,
            unit,
            plausibility: unit.and_then(UnitCategory::from_unit),
            applicable_to,
        }
    }
}

/// Shorthand used by the table modules
pub(crate) fn entry(
    name: &'static str,
    address: u16,
    count: u16,
    access: RegisterAccess,
    data_type: DataType,
    gain: f64,
    unit: Option<&'static str>,
    applicable_to: &'static [DeviceModel],
) -> (&'static str, RegisterDef) {
    (
        name,
        RegisterDef::new(address, count, access, data_type, gain, unit, applicable_to),
    )
}

/// An ordered, name-keyed register table for one device kind
pub struct RegisterTable {
    name: &'static str,
    entries: Vec<(&'static str, RegisterDef)>,
    index: HashMap<&'static str, usize>,
}

impl RegisterTable {
    pub(crate) fn new(name: &'static str, entries: Vec<(&'static str, RegisterDef)>) -> Self {
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, (register, _))| (*register, i))
            .collect();
        Self {
            name,
            entries,
            index,
        }
    }

    /// Table label used in logs
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Look up one register definition by name
    pub fn get(&self, register: &str) -> Option<&RegisterDef> {
        self.index
            .get(register)
            .map(|&i| &self.entries[i].1)
    }

    /// Iterate entries in catalog order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &RegisterDef)> {
        self.entries.iter().map(|(register, def)| (*register, def))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All catalog tables, in probe order
pub fn all_tables() -> [&'static RegisterTable; 8] {
    [
        &PLANT_RUNNING_INFO_REGISTERS,
        &PLANT_PARAMETER_REGISTERS,
        &INVERTER_RUNNING_INFO_REGISTERS,
        &INVERTER_PARAMETER_REGISTERS,
        &AC_CHARGER_RUNNING_INFO_REGISTERS,
        &AC_CHARGER_PARAMETER_REGISTERS,
        &DC_CHARGER_RUNNING_INFO_REGISTERS,
        &DC_CHARGER_PARAMETER_REGISTERS,
    ]
}
