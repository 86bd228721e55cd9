use sigenbridge::error::SigenError;

#[test]
fn error_constructors_group_1() {
    assert!(matches!(
        SigenError::config("x"),
        SigenError::Config { .. }
    ));
    assert!(matches!(
        SigenError::modbus("x"),
        SigenError::Modbus { .. }
    ));
    assert!(matches!(
        SigenError::connection("h", 502, "x"),
        SigenError::ConnectionFailed { .. }
    ));
}

#[test]
fn error_constructors_group_2() {
    assert!(matches!(
        SigenError::decode("x"),
        SigenError::Decode { .. }
    ));
    assert!(matches!(
        SigenError::encode("x"),
        SigenError::Encode { .. }
    ));
    assert!(matches!(
        SigenError::write_rejected("x"),
        SigenError::WriteRejected { .. }
    ));
}

#[test]
fn error_constructors_group_3() {
    assert!(matches!(
        SigenError::validation("f", "m"),
        SigenError::Validation { .. }
    ));
    assert!(matches!(SigenError::io("x"), SigenError::Io { .. }));
    assert!(matches!(
        SigenError::timeout("x"),
        SigenError::Timeout { .. }
    ));
    let ser: SigenError = serde_yaml::from_str::<u32>("[not a number").unwrap_err().into();
    assert!(matches!(ser, SigenError::Serialization { .. }));
}

#[test]
fn connection_failures_are_flagged_for_reconnect() {
    assert!(SigenError::connection("10.0.0.5", 502, "refused").is_connection_failure());
    assert!(!SigenError::timeout("read").is_connection_failure());
    assert!(!SigenError::modbus("exception 0x02").is_connection_failure());
}

#[test]
fn display_messages() {
    let e = SigenError::validation("field", "bad");
    let s = format!("{}", e);
    assert!(s.contains("Validation error"));

    let e = SigenError::connection("10.0.0.5", 502, "refused");
    assert_eq!(format!("{}", e), "Connection failed to 10.0.0.5:502: refused");

    assert_eq!(
        format!("{}", SigenError::ReadOnlyMode),
        "Write rejected: read-only mode is enabled"
    );
}
