//! Plant controller register tables

use super::{ALL, HYBRID, HYBRID_OR_PV, RegisterTable, entry};
use crate::codec::DataType::{S16, S32, U16, U32};
use crate::registers::RegisterAccess::{ReadOnly, ReadWrite, WriteOnly};
use once_cell::sync::Lazy;

/// Plant-level running info, read via the plant controller's unit id
pub static PLANT_RUNNING_INFO_REGISTERS: Lazy<RegisterTable> = Lazy::new(|| {
    RegisterTable::new(
        "plant_running_info",
        vec![
            entry("plant_system_time", 30000, 2, ReadOnly, U32, 1.0, Some("s"), ALL),
            entry("plant_system_timezone", 30002, 1, ReadOnly, S16, 1.0, Some("min"), ALL),
            entry("plant_ems_work_mode", 30003, 1, ReadOnly, U16, 1.0, None, ALL),
            entry("plant_grid_sensor_status", 30004, 1, ReadOnly, U16, 1.0, None, ALL),
            entry("plant_grid_sensor_active_power", 30005, 2, ReadOnly, S32, 1000.0, Some("kW"), ALL),
            entry("plant_grid_sensor_reactive_power", 30007, 2, ReadOnly, S32, 1000.0, Some("kVar"), ALL),
            entry("plant_on_off_grid_status", 30009, 1, ReadOnly, U16, 1.0, None, ALL),
            entry("plant_max_active_power", 30010, 2, ReadOnly, U32, 1000.0, Some("kW"), ALL),
            entry("plant_max_apparent_power", 30012, 2, ReadOnly, U32, 1000.0, Some("kVar"), ALL),
            entry("plant_ess_soc", 30014, 1, ReadOnly, U16, 10.0, Some("%"), ALL),
            entry("plant_phase_a_active_power", 30015, 2, ReadOnly, S32, 1000.0, Some("kW"), ALL),
            entry("plant_phase_b_active_power", 30017, 2, ReadOnly, S32, 1000.0, Some("kW"), ALL),
            entry("plant_phase_c_active_power", 30019, 2, ReadOnly, S32, 1000.0, Some("kW"), ALL),
            entry("plant_phase_a_reactive_power", 30021, 2, ReadOnly, S32, 1000.0, Some("kVar"), ALL),
            entry("plant_phase_b_reactive_power", 30023, 2, ReadOnly, S32, 1000.0, Some("kVar"), ALL),
            entry("plant_phase_c_reactive_power", 30025, 2, ReadOnly, S32, 1000.0, Some("kVar"), ALL),
            entry("plant_general_alarm1", 30027, 1, ReadOnly, U16, 1.0, None, ALL),
            entry("plant_general_alarm2", 30028, 1, ReadOnly, U16, 1.0, None, ALL),
            entry("plant_general_alarm3", 30029, 1, ReadOnly, U16, 1.0, None, ALL),
            entry("plant_general_alarm4", 30030, 1, ReadOnly, U16, 1.0, None, ALL),
            entry("plant_active_power", 30031, 2, ReadOnly, S32, 1000.0, Some("kW"), ALL),
            entry("plant_reactive_power", 30033, 2, ReadOnly, S32, 1000.0, Some("kVar"), ALL),
            entry("plant_photovoltaic_power", 30035, 2, ReadOnly, S32, 1000.0, Some("kW"), ALL),
            entry("plant_ess_power", 30037, 2, ReadOnly, S32, 1000.0, Some("kW"), ALL),
            entry("plant_available_max_active_power", 30039, 2, ReadOnly, U32, 1000.0, Some("kW"), ALL),
            entry("plant_available_min_active_power", 30041, 2, ReadOnly, U32, 1000.0, Some("kW"), ALL),
            entry("plant_available_max_reactive_power", 30043, 2, ReadOnly, U32, 1000.0, Some("kVar"), ALL),
            entry("plant_available_min_reactive_power", 30045, 2, ReadOnly, U32, 1000.0, Some("kVar"), ALL),
            entry("plant_ess_available_max_charging_power", 30047, 2, ReadOnly, U32, 1000.0, Some("kW"), ALL),
            entry("plant_ess_available_max_discharging_power", 30049, 2, ReadOnly, U32, 1000.0, Some("kW"), ALL),
            entry("plant_running_state", 30051, 1, ReadOnly, U16, 1.0, None, ALL),
            entry("plant_grid_sensor_phase_a_active_power", 30052, 2, ReadOnly, S32, 1000.0, Some("kW"), ALL),
            entry("plant_grid_sensor_phase_b_active_power", 30054, 2, ReadOnly, S32, 1000.0, Some("kW"), ALL),
            entry("plant_grid_sensor_phase_c_active_power", 30056, 2, ReadOnly, S32, 1000.0, Some("kW"), ALL),
            entry("plant_grid_sensor_phase_a_reactive_power", 30058, 2, ReadOnly, S32, 1000.0, Some("kVar"), ALL),
            entry("plant_grid_sensor_phase_b_reactive_power", 30060, 2, ReadOnly, S32, 1000.0, Some("kVar"), ALL),
            entry("plant_grid_sensor_phase_c_reactive_power", 30062, 2, ReadOnly, S32, 1000.0, Some("kVar"), ALL),
            entry("plant_ess_available_max_charging_capacity", 30064, 2, ReadOnly, U32, 100.0, Some("kWh"), ALL),
            entry("plant_ess_available_max_discharging_capacity", 30066, 2, ReadOnly, U32, 100.0, Some("kWh"), ALL),
            entry("plant_ess_rated_charging_power", 30068, 2, ReadOnly, U32, 1000.0, Some("kW"), ALL),
            entry("plant_ess_rated_discharging_power", 30070, 2, ReadOnly, U32, 1000.0, Some("kW"), ALL),
            entry("plant_general_alarm5", 30072, 1, ReadOnly, U16, 1.0, None, ALL),
            entry("plant_ess_rated_energy_capacity", 30083, 2, ReadOnly, U32, 100.0, Some("kWh"), ALL),
            entry("plant_ess_charge_cut_off_soc", 30085, 1, ReadOnly, U16, 10.0, Some("%"), ALL),
            entry("plant_ess_discharge_cut_off_soc", 30086, 1, ReadOnly, U16, 10.0, Some("%"), ALL),
            entry("plant_ess_soh", 30087, 1, ReadOnly, U16, 10.0, Some("%"), ALL),
        ],
    )
});

/// Plant-level control parameters
pub static PLANT_PARAMETER_REGISTERS: Lazy<RegisterTable> = Lazy::new(|| {
    RegisterTable::new(
        "plant_parameter",
        vec![
            entry("plant_start_stop", 40000, 1, WriteOnly, U16, 1.0, None, HYBRID_OR_PV),
            entry("plant_active_power_fixed_target", 40001, 2, ReadWrite, S32, 1000.0, Some("kW"), HYBRID_OR_PV),
            entry("plant_reactive_power_fixed_target", 40003, 2, ReadWrite, S32, 1000.0, Some("kVar"), HYBRID_OR_PV),
            entry("plant_active_power_percentage_target", 40005, 1, ReadWrite, S16, 100.0, Some("%"), HYBRID_OR_PV),
            entry("plant_qs_ratio_target", 40006, 1, ReadWrite, S16, 100.0, Some("%"), HYBRID_OR_PV),
            entry("plant_power_factor_target", 40007, 1, ReadWrite, S16, 1000.0, None, HYBRID_OR_PV),
            entry("plant_phase_a_active_power_fixed_target", 40008, 2, ReadWrite, S32, 1000.0, Some("kW"), HYBRID),
            entry("plant_phase_b_active_power_fixed_target", 40010, 2, ReadWrite, S32, 1000.0, Some("kW"), HYBRID),
            entry("plant_phase_c_active_power_fixed_target", 40012, 2, ReadWrite, S32, 1000.0, Some("kW"), HYBRID),
            entry("plant_phase_a_reactive_power_fixed_target", 40014, 2, ReadWrite, S32, 1000.0, Some("kVar"), HYBRID),
            entry("plant_phase_b_reactive_power_fixed_target", 40016, 2, ReadWrite, S32, 1000.0, Some("kVar"), HYBRID),
            entry("plant_phase_c_reactive_power_fixed_target", 40018, 2, ReadWrite, S32, 1000.0, Some("kVar"), HYBRID),
            entry("plant_phase_a_active_power_percentage_target", 40020, 1, ReadWrite, S16, 100.0, Some("%"), HYBRID),
            entry("plant_phase_b_active_power_percentage_target", 40021, 1, ReadWrite, S16, 100.0, Some("%"), HYBRID),
            entry("plant_phase_c_active_power_percentage_target", 40022, 1, ReadWrite, S16, 100.0, Some("%"), HYBRID),
            entry("plant_phase_a_qs_ratio_target", 40023, 1, ReadWrite, S16, 100.0, Some("%"), HYBRID),
            entry("plant_phase_b_qs_ratio_target", 40024, 1, ReadWrite, S16, 100.0, Some("%"), HYBRID),
            entry("plant_phase_c_qs_ratio_target", 40025, 1, ReadWrite, S16, 100.0, Some("%"), HYBRID),
            entry("plant_remote_ems_enable", 40029, 1, ReadWrite, U16, 1.0, None, HYBRID_OR_PV),
            entry("plant_independent_phase_power_control_enable", 40030, 1, ReadWrite, U16, 1.0, None, HYBRID),
            entry("plant_remote_ems_control_mode", 40031, 1, ReadWrite, U16, 1.0, None, HYBRID_OR_PV),
            entry("plant_ess_max_charging_limit", 40032, 2, ReadWrite, U32, 1000.0, Some("kW"), HYBRID),
            entry("plant_ess_max_discharging_limit", 40034, 2, ReadWrite, U32, 1000.0, Some("kW"), HYBRID),
            entry("plant_pv_max_power_limit", 40036, 2, ReadWrite, U32, 1000.0, Some("kW"), HYBRID),
            entry("plant_grid_point_maximum_export_limitation", 40038, 2, ReadWrite, U32, 1000.0, Some("kW"), HYBRID_OR_PV),
            entry("plant_grid_maximum_import_limitation", 40040, 2, ReadWrite, U32, 1000.0, Some("kW"), HYBRID_OR_PV),
            entry("plant_pcs_maximum_export_limitation", 40042, 2, ReadWrite, U32, 1000.0, Some("kW"), HYBRID_OR_PV),
            entry("plant_pcs_maximum_import_limitation", 40044, 2, ReadWrite, U32, 1000.0, Some("kW"), HYBRID_OR_PV),
        ],
    )
});
