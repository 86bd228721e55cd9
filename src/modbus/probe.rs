//! Register support classification
//!
//! A probe issues the register's normal read and classifies the outcome.
//! Devices reject genuinely unmapped registers with a Modbus exception, but
//! some firmware answers reads of unmapped addresses with garbage instead,
//! so numeric values are additionally checked against per-category
//! plausibility bounds derived from the register's unit.

use crate::codec::{DataType, RegisterValue, decode_registers};
use crate::config::PlausibilityLimits;
use crate::modbus::support::RegisterSupport;
use crate::modbus::transport::ReadResponse;
use crate::registers::{RegisterDef, UnitCategory};

/// Whether a decoded numeric value is believable for its unit category
pub fn value_plausible(category: UnitCategory, value: f64, limits: &PlausibilityLimits) -> bool {
    match category {
        UnitCategory::Voltage => value.abs() <= limits.voltage_max,
        UnitCategory::Current => value.abs() <= limits.current_max,
        UnitCategory::Energy => value.abs() <= limits.energy_kwh_max,
        UnitCategory::Power => value.abs() <= limits.power_kw_max,
        UnitCategory::Temperature => {
            value >= limits.temperature_min && value <= limits.temperature_max
        }
        UnitCategory::Percentage => {
            value >= limits.percentage_min && value <= limits.percentage_max
        }
    }
}

/// Classify the payload of a successful probe read
pub fn classify_words(
    def: &RegisterDef,
    words: &[u16],
    limits: &PlausibilityLimits,
) -> RegisterSupport {
    if words.is_empty() {
        return RegisterSupport::Unsupported;
    }

    // Text registers never pass the numeric checks; an all-zero payload is
    // the firmware's way of saying the field is absent.
    if def.data_type == DataType::Ascii {
        if words.iter().all(|&w| w == 0) {
            return RegisterSupport::Unsupported;
        }
        return RegisterSupport::Supported;
    }

    let value = match decode_registers(words, def.data_type, def.gain) {
        Ok(RegisterValue::Number(v)) => v,
        Ok(RegisterValue::Text(_)) => return RegisterSupport::Supported,
        Err(_) => return RegisterSupport::Unsupported,
    };

    match def.plausibility {
        Some(category) => {
            if value_plausible(category, value, limits) {
                RegisterSupport::Supported
            } else {
                RegisterSupport::Unsupported
            }
        }
        // Registers without a unit accept any value, including zero
        None => RegisterSupport::Supported,
    }
}

/// Classify a probe read that reached the device
pub fn classify_response(
    def: &RegisterDef,
    response: &ReadResponse,
    limits: &PlausibilityLimits,
) -> RegisterSupport {
    match response {
        ReadResponse::Words(words) => classify_words(def, words, limits),
        ReadResponse::Exception(_) => RegisterSupport::Unsupported,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registers::RegisterAccess;

    fn def(
        count: u16,
        data_type: DataType,
        gain: f64,
        unit: Option<&'static str>,
    ) -> RegisterDef {
        RegisterDef::new(30000, count, RegisterAccess::ReadOnly, data_type, gain, unit, &[])
    }

    fn limits() -> PlausibilityLimits {
        PlausibilityLimits::default()
    }

    #[test]
    fn test_exception_response_is_unsupported() {
        let d = def(1, DataType::U16, 10.0, Some("V"));
        assert_eq!(
            classify_response(&d, &ReadResponse::Exception(0x02), &limits()),
            RegisterSupport::Unsupported
        );
    }

    #[test]
    fn test_empty_payload_is_unsupported() {
        let d = def(1, DataType::U16, 1.0, None);
        assert_eq!(
            classify_words(&d, &[], &limits()),
            RegisterSupport::Unsupported
        );
    }

    #[test]
    fn test_plausible_voltage_is_supported() {
        // 2300 raw / 10 = 230.0 V
        let d = def(1, DataType::U16, 10.0, Some("V"));
        assert_eq!(
            classify_words(&d, &[2300], &limits()),
            RegisterSupport::Supported
        );
    }

    #[test]
    fn test_implausible_voltage_is_unsupported() {
        // 65535 raw / 10 = 6553.5 V, well past the 1000 V bound
        let d = def(1, DataType::U16, 10.0, Some("V"));
        assert_eq!(
            classify_words(&d, &[0xFFFF], &limits()),
            RegisterSupport::Unsupported
        );
    }

    #[test]
    fn test_unitless_zero_is_supported() {
        let d = def(1, DataType::U16, 1.0, None);
        assert_eq!(
            classify_words(&d, &[0], &limits()),
            RegisterSupport::Supported
        );
    }

    #[test]
    fn test_all_zero_text_is_unsupported() {
        let d = def(3, DataType::Ascii, 1.0, None);
        assert_eq!(
            classify_words(&d, &[0, 0, 0], &limits()),
            RegisterSupport::Unsupported
        );
    }

    #[test]
    fn test_nonzero_text_is_supported() {
        let d = def(3, DataType::Ascii, 1.0, None);
        assert_eq!(
            classify_words(&d, &[0x5347, 0x4100, 0], &limits()),
            RegisterSupport::Supported
        );
    }

    #[test]
    fn test_negative_current_within_magnitude_bound() {
        // -500 raw / 100 = -5.0 A, magnitude within the 1000 A bound
        let d = def(1, DataType::S16, 100.0, Some("A"));
        let words = [(-500i32 + 65536) as u16];
        assert_eq!(
            classify_words(&d, &words, &limits()),
            RegisterSupport::Supported
        );
    }

    #[test]
    fn test_temperature_bounds_are_signed() {
        let d = def(1, DataType::S16, 10.0, Some("°C"));
        // -50.0 °C sits on the lower bound
        let at_min = [(-500i32 + 65536) as u16];
        assert_eq!(
            classify_words(&d, &at_min, &limits()),
            RegisterSupport::Supported
        );
        // -50.1 °C falls below it
        let below_min = [(-501i32 + 65536) as u16];
        assert_eq!(
            classify_words(&d, &below_min, &limits()),
            RegisterSupport::Unsupported
        );
    }

    #[test]
    fn test_percentage_above_bound_is_unsupported() {
        let d = def(1, DataType::U16, 10.0, Some("%"));
        assert_eq!(
            classify_words(&d, &[1200], &limits()),
            RegisterSupport::Supported
        );
        assert_eq!(
            classify_words(&d, &[1201], &limits()),
            RegisterSupport::Unsupported
        );
    }

    #[test]
    fn test_short_numeric_payload_is_unsupported() {
        // U32 expects two words
        let d = def(2, DataType::U32, 1.0, None);
        assert_eq!(
            classify_words(&d, &[1], &limits()),
            RegisterSupport::Unsupported
        );
    }

    #[test]
    fn test_bounds_follow_configuration() {
        let d = def(1, DataType::U16, 10.0, Some("V"));
        let mut tight = limits();
        tight.voltage_max = 100.0;
        assert_eq!(
            classify_words(&d, &[2300], &tight),
            RegisterSupport::Unsupported
        );
    }
}
