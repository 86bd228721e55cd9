//! AC and DC charger register tables
//!
//! AC chargers answer on their own unit id. DC chargers are internal to a
//! hybrid inverter and answer on the inverter's unit id.

use super::{ALL, HYBRID, RegisterTable, entry};
use crate::codec::DataType::{S32, U16, U32};
use crate::registers::RegisterAccess::{ReadOnly, ReadWrite, WriteOnly};
use once_cell::sync::Lazy;

pub static AC_CHARGER_RUNNING_INFO_REGISTERS: Lazy<RegisterTable> = Lazy::new(|| {
    RegisterTable::new(
        "ac_charger_running_info",
        vec![
            entry("ac_charger_system_state", 32000, 1, ReadOnly, U16, 1.0, None, ALL),
            entry("ac_charger_total_energy_consumed", 32001, 2, ReadOnly, U32, 100.0, Some("kWh"), ALL),
            entry("ac_charger_charging_power", 32003, 2, ReadOnly, S32, 1000.0, Some("kW"), ALL),
            entry("ac_charger_rated_power", 32005, 2, ReadOnly, U32, 1000.0, Some("kW"), ALL),
            entry("ac_charger_rated_current", 32007, 2, ReadOnly, S32, 100.0, Some("A"), ALL),
            entry("ac_charger_rated_voltage", 32009, 1, ReadOnly, U16, 10.0, Some("V"), ALL),
            entry("ac_charger_input_breaker_rated_current", 32010, 2, ReadOnly, S32, 100.0, Some("A"), ALL),
            entry("ac_charger_alarm1", 32012, 1, ReadOnly, U16, 1.0, None, ALL),
            entry("ac_charger_alarm2", 32013, 1, ReadOnly, U16, 1.0, None, ALL),
            entry("ac_charger_alarm3", 32014, 1, ReadOnly, U16, 1.0, None, ALL),
        ],
    )
});

pub static AC_CHARGER_PARAMETER_REGISTERS: Lazy<RegisterTable> = Lazy::new(|| {
    RegisterTable::new(
        "ac_charger_parameter",
        vec![
            entry("ac_charger_start_stop", 42000, 1, WriteOnly, U16, 1.0, None, ALL),
            entry("ac_charger_output_current", 42001, 2, ReadWrite, U32, 100.0, Some("A"), ALL),
        ],
    )
});

pub static DC_CHARGER_RUNNING_INFO_REGISTERS: Lazy<RegisterTable> = Lazy::new(|| {
    RegisterTable::new(
        "dc_charger_running_info",
        vec![
            entry("dc_charger_vehicle_battery_voltage", 31500, 1, ReadOnly, U16, 10.0, Some("V"), HYBRID),
            entry("dc_charger_charging_current", 31501, 1, ReadOnly, U16, 10.0, Some("A"), HYBRID),
            entry("dc_charger_output_power", 31502, 2, ReadOnly, S32, 1000.0, Some("kW"), HYBRID),
            entry("dc_charger_vehicle_soc", 31504, 1, ReadOnly, U16, 10.0, Some("%"), HYBRID),
            entry("dc_charger_current_charging_capacity", 31505, 2, ReadOnly, U32, 100.0, Some("kWh"), HYBRID),
            entry("dc_charger_current_charging_duration", 31507, 2, ReadOnly, U32, 1.0, Some("s"), HYBRID),
        ],
    )
});

pub static DC_CHARGER_PARAMETER_REGISTERS: Lazy<RegisterTable> = Lazy::new(|| {
    RegisterTable::new(
        "dc_charger_parameter",
        vec![entry("dc_charger_start_stop", 41000, 1, WriteOnly, U16, 1.0, None, HYBRID)],
    )
});
