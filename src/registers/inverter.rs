//! Inverter register tables

use super::{ALL, HYBRID, HYBRID_OR_PV, RegisterTable, entry};
use crate::codec::DataType::{Ascii, S16, S32, U16, U32, U64};
use crate::registers::RegisterAccess::{ReadOnly, ReadWrite, WriteOnly};
use once_cell::sync::Lazy;

/// Per-inverter running info, read via the inverter's unit id
pub static INVERTER_RUNNING_INFO_REGISTERS: Lazy<RegisterTable> = Lazy::new(|| {
    RegisterTable::new(
        "inverter_running_info",
        vec![
            entry("inverter_model_type", 30500, 15, ReadOnly, Ascii, 1.0, None, ALL),
            entry("inverter_serial_number", 30515, 10, ReadOnly, Ascii, 1.0, None, ALL),
            entry("inverter_machine_firmware_version", 30525, 15, ReadOnly, Ascii, 1.0, None, ALL),
            entry("inverter_rated_active_power", 30540, 2, ReadOnly, U32, 1000.0, Some("kW"), ALL),
            entry("inverter_max_apparent_power", 30542, 2, ReadOnly, U32, 1000.0, Some("kVA"), ALL),
            entry("inverter_max_active_power", 30544, 2, ReadOnly, U32, 1000.0, Some("kW"), ALL),
            entry("inverter_max_absorption_power", 30546, 2, ReadOnly, U32, 1000.0, Some("kW"), HYBRID),
            entry("inverter_rated_battery_capacity", 30548, 2, ReadOnly, U32, 100.0, Some("kWh"), HYBRID),
            entry("inverter_ess_rated_charge_power", 30550, 2, ReadOnly, U32, 1000.0, Some("kW"), HYBRID),
            entry("inverter_ess_rated_discharge_power", 30552, 2, ReadOnly, U32, 1000.0, Some("kW"), HYBRID),
            entry("inverter_ess_daily_charge_energy", 30566, 2, ReadOnly, U32, 100.0, Some("kWh"), HYBRID),
            entry("inverter_ess_accumulated_charge_energy", 30568, 4, ReadOnly, U64, 100.0, Some("kWh"), HYBRID),
            entry("inverter_ess_daily_discharge_energy", 30572, 2, ReadOnly, U32, 100.0, Some("kWh"), HYBRID),
            entry("inverter_ess_accumulated_discharge_energy", 30574, 4, ReadOnly, U64, 100.0, Some("kWh"), HYBRID),
            entry("inverter_running_state", 30578, 1, ReadOnly, U16, 1.0, None, ALL),
            entry("inverter_max_active_power_adjustment_value", 30579, 2, ReadOnly, S32, 1000.0, Some("kW"), ALL),
            entry("inverter_min_active_power_adjustment_value", 30581, 2, ReadOnly, S32, 1000.0, Some("kW"), HYBRID),
            entry("inverter_max_reactive_power_adjustment_value_fed", 30583, 2, ReadOnly, U32, 1000.0, Some("kVar"), ALL),
            entry("inverter_max_reactive_power_adjustment_value_absorbed", 30585, 2, ReadOnly, U32, 1000.0, Some("kVar"), ALL),
            entry("inverter_active_power", 30587, 2, ReadOnly, S32, 1000.0, Some("kW"), ALL),
            entry("inverter_reactive_power", 30589, 2, ReadOnly, S32, 1000.0, Some("kVar"), ALL),
            entry("inverter_ess_max_battery_charge_power", 30591, 2, ReadOnly, U32, 1000.0, Some("kW"), HYBRID),
            entry("inverter_ess_max_battery_discharge_power", 30593, 2, ReadOnly, U32, 1000.0, Some("kW"), HYBRID),
            entry("inverter_ess_available_battery_charge_energy", 30595, 2, ReadOnly, U32, 100.0, Some("kWh"), HYBRID),
            entry("inverter_ess_available_battery_discharge_energy", 30597, 2, ReadOnly, U32, 100.0, Some("kWh"), HYBRID),
            entry("inverter_ess_charge_discharge_power", 30599, 2, ReadOnly, S32, 1000.0, Some("kW"), HYBRID),
            entry("inverter_ess_battery_soc", 30601, 1, ReadOnly, U16, 10.0, Some("%"), HYBRID),
            entry("inverter_ess_battery_soh", 30602, 1, ReadOnly, U16, 10.0, Some("%"), HYBRID),
            entry("inverter_ess_average_cell_temperature", 30603, 1, ReadOnly, S16, 10.0, Some("°C"), HYBRID),
            entry("inverter_ess_average_cell_voltage", 30604, 1, ReadOnly, U16, 1000.0, Some("V"), HYBRID),
            entry("inverter_alarm1", 30605, 1, ReadOnly, U16, 1.0, None, ALL),
            entry("inverter_alarm2", 30606, 1, ReadOnly, U16, 1.0, None, ALL),
            entry("inverter_alarm3", 30607, 1, ReadOnly, U16, 1.0, None, HYBRID),
            entry("inverter_alarm4", 30608, 1, ReadOnly, U16, 1.0, None, ALL),
            entry("inverter_alarm5", 30609, 1, ReadOnly, U16, 1.0, None, HYBRID),
            entry("inverter_ess_maximum_battery_temperature", 30620, 1, ReadOnly, S16, 10.0, Some("°C"), HYBRID),
            entry("inverter_ess_minimum_battery_temperature", 30621, 1, ReadOnly, S16, 10.0, Some("°C"), HYBRID),
            entry("inverter_ess_maximum_battery_cell_voltage", 30622, 1, ReadOnly, U16, 1000.0, Some("V"), HYBRID),
            entry("inverter_ess_minimum_battery_cell_voltage", 30623, 1, ReadOnly, U16, 1000.0, Some("V"), HYBRID),
            entry("inverter_rated_grid_voltage", 31000, 1, ReadOnly, U16, 10.0, Some("V"), ALL),
            entry("inverter_rated_grid_frequency", 31001, 1, ReadOnly, U16, 100.0, Some("Hz"), ALL),
            entry("inverter_grid_frequency", 31002, 1, ReadOnly, U16, 100.0, Some("Hz"), ALL),
            entry("inverter_pcs_internal_temperature", 31003, 1, ReadOnly, S16, 10.0, Some("°C"), ALL),
            entry("inverter_output_type", 31004, 1, ReadOnly, U16, 1.0, None, ALL),
            entry("inverter_ab_line_voltage", 31005, 2, ReadOnly, U32, 100.0, Some("V"), ALL),
            entry("inverter_bc_line_voltage", 31007, 2, ReadOnly, U32, 100.0, Some("V"), ALL),
            entry("inverter_ca_line_voltage", 31009, 2, ReadOnly, U32, 100.0, Some("V"), ALL),
            entry("inverter_phase_a_voltage", 31011, 2, ReadOnly, U32, 100.0, Some("V"), ALL),
            entry("inverter_phase_b_voltage", 31013, 2, ReadOnly, U32, 100.0, Some("V"), ALL),
            entry("inverter_phase_c_voltage", 31015, 2, ReadOnly, U32, 100.0, Some("V"), ALL),
            entry("inverter_phase_a_current", 31017, 2, ReadOnly, S32, 100.0, Some("A"), ALL),
            entry("inverter_phase_b_current", 31019, 2, ReadOnly, S32, 100.0, Some("A"), ALL),
            entry("inverter_phase_c_current", 31021, 2, ReadOnly, S32, 100.0, Some("A"), ALL),
            entry("inverter_power_factor", 31023, 1, ReadOnly, U16, 1000.0, None, ALL),
            entry("inverter_pack_count", 31024, 1, ReadOnly, U16, 1.0, None, HYBRID),
            entry("inverter_pv_string_count", 31025, 1, ReadOnly, U16, 1.0, None, ALL),
            entry("inverter_mppt_count", 31026, 1, ReadOnly, U16, 1.0, None, ALL),
            entry("inverter_pv1_voltage", 31027, 1, ReadOnly, S16, 10.0, Some("V"), ALL),
            entry("inverter_pv1_current", 31028, 1, ReadOnly, S16, 100.0, Some("A"), ALL),
            entry("inverter_pv2_voltage", 31029, 1, ReadOnly, S16, 10.0, Some("V"), ALL),
            entry("inverter_pv2_current", 31030, 1, ReadOnly, S16, 100.0, Some("A"), ALL),
            entry("inverter_pv3_voltage", 31031, 1, ReadOnly, S16, 10.0, Some("V"), ALL),
            entry("inverter_pv3_current", 31032, 1, ReadOnly, S16, 100.0, Some("A"), ALL),
            entry("inverter_pv4_voltage", 31033, 1, ReadOnly, S16, 10.0, Some("V"), ALL),
            entry("inverter_pv4_current", 31034, 1, ReadOnly, S16, 100.0, Some("A"), ALL),
            entry("inverter_pv_power", 31035, 2, ReadOnly, S32, 1000.0, Some("kW"), ALL),
            entry("inverter_insulation_resistance", 31037, 1, ReadOnly, U16, 1000.0, Some("MΩ"), ALL),
            entry("inverter_startup_time", 31038, 2, ReadOnly, U32, 1.0, Some("s"), ALL),
            entry("inverter_shutdown_time", 31040, 2, ReadOnly, U32, 1.0, Some("s"), ALL),
            entry("inverter_pv5_voltage", 31042, 1, ReadOnly, S16, 10.0, Some("V"), ALL),
            entry("inverter_pv5_current", 31043, 1, ReadOnly, S16, 100.0, Some("A"), ALL),
            entry("inverter_pv6_voltage", 31044, 1, ReadOnly, S16, 10.0, Some("V"), ALL),
            entry("inverter_pv6_current", 31045, 1, ReadOnly, S16, 100.0, Some("A"), ALL),
            entry("inverter_pv7_voltage", 31046, 1, ReadOnly, S16, 10.0, Some("V"), ALL),
            entry("inverter_pv7_current", 31047, 1, ReadOnly, S16, 100.0, Some("A"), ALL),
            entry("inverter_pv8_voltage", 31048, 1, ReadOnly, S16, 10.0, Some("V"), ALL),
            entry("inverter_pv8_current", 31049, 1, ReadOnly, S16, 100.0, Some("A"), ALL),
            entry("inverter_pv9_voltage", 31050, 1, ReadOnly, S16, 10.0, Some("V"), ALL),
            entry("inverter_pv9_current", 31051, 1, ReadOnly, S16, 100.0, Some("A"), ALL),
            entry("inverter_pv10_voltage", 31052, 1, ReadOnly, S16, 10.0, Some("V"), ALL),
            entry("inverter_pv10_current", 31053, 1, ReadOnly, S16, 100.0, Some("A"), ALL),
            entry("inverter_pv11_voltage", 31054, 1, ReadOnly, S16, 10.0, Some("V"), ALL),
            entry("inverter_pv11_current", 31055, 1, ReadOnly, S16, 100.0, Some("A"), ALL),
            entry("inverter_pv12_voltage", 31056, 1, ReadOnly, S16, 10.0, Some("V"), ALL),
            entry("inverter_pv12_current", 31057, 1, ReadOnly, S16, 100.0, Some("A"), ALL),
            entry("inverter_pv13_voltage", 31058, 1, ReadOnly, S16, 10.0, Some("V"), ALL),
            entry("inverter_pv13_current", 31059, 1, ReadOnly, S16, 100.0, Some("A"), ALL),
            entry("inverter_pv14_voltage", 31060, 1, ReadOnly, S16, 10.0, Some("V"), ALL),
            entry("inverter_pv14_current", 31061, 1, ReadOnly, S16, 100.0, Some("A"), ALL),
            entry("inverter_pv15_voltage", 31062, 1, ReadOnly, S16, 10.0, Some("V"), ALL),
            entry("inverter_pv15_current", 31063, 1, ReadOnly, S16, 100.0, Some("A"), ALL),
            entry("inverter_pv16_voltage", 31064, 1, ReadOnly, S16, 10.0, Some("V"), ALL),
            entry("inverter_pv16_current", 31065, 1, ReadOnly, S16, 100.0, Some("A"), ALL),
        ],
    )
});

/// Per-inverter control parameters
pub static INVERTER_PARAMETER_REGISTERS: Lazy<RegisterTable> = Lazy::new(|| {
    RegisterTable::new(
        "inverter_parameter",
        vec![
            entry("inverter_start_stop", 40500, 1, WriteOnly, U16, 1.0, None, HYBRID_OR_PV),
            entry("inverter_grid_code", 40501, 1, ReadWrite, U16, 1.0, None, HYBRID_OR_PV),
            entry("inverter_remote_ems_dispatch_enable", 41500, 1, ReadWrite, U16, 1.0, None, HYBRID),
            entry("inverter_active_power_fixed_adjustment", 41501, 2, ReadWrite, S32, 1000.0, Some("kW"), HYBRID),
            entry("inverter_reactive_power_fixed_adjustment", 41503, 2, ReadWrite, S32, 1000.0, Some("kVar"), HYBRID),
            entry("inverter_active_power_percentage_adjustment", 41505, 1, ReadWrite, S16, 100.0, Some("%"), HYBRID),
            entry("inverter_reactive_power_qs_adjustment", 41506, 1, ReadWrite, S16, 100.0, Some("%"), HYBRID),
            entry("inverter_power_factor_adjustment", 41507, 1, ReadWrite, S16, 1000.0, None, HYBRID),
        ],
    )
});
