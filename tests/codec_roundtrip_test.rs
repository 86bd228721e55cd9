use sigenbridge::codec::{DataType, RegisterValue, decode_registers, encode_value};

fn number(v: f64) -> RegisterValue {
    RegisterValue::Number(v)
}

#[test]
fn battery_soc_style_scaling() {
    // Raw 655 with gain 10 reads as 65.5 percent
    let value = decode_registers(&[655], DataType::U16, 10.0).unwrap();
    assert_eq!(value, number(65.5));

    // Writing 70.0 percent back produces raw 700
    let words = encode_value(&number(70.0), DataType::U16, 10.0, 1).unwrap();
    assert_eq!(words, vec![700]);
}

#[test]
fn gain_scaled_values_survive_a_write_read_cycle() {
    let cases: [(f64, DataType, f64, u16); 5] = [
        (23.5, DataType::U16, 10.0, 1),
        (-12.7, DataType::S16, 10.0, 1),
        (6.553, DataType::U32, 1000.0, 2),
        (-2.048, DataType::S32, 1000.0, 2),
        (86_400.0, DataType::U64, 1.0, 4),
    ];
    for (value, data_type, gain, count) in cases {
        let words = encode_value(&number(value), data_type, gain, count).unwrap();
        assert_eq!(words.len(), usize::from(count));
        let decoded = decode_registers(&words, data_type, gain).unwrap();
        let got = decoded.as_f64().unwrap();
        // Round-trip is exact up to the gain resolution
        assert!(
            (got - value).abs() < 0.5 / gain,
            "{:?} gain {}: wrote {}, read back {}",
            data_type,
            gain,
            value,
            got
        );
    }
}

#[test]
fn signed_boundaries_round_trip_and_one_past_is_rejected() {
    let words = encode_value(&number(-32_768.0), DataType::S16, 1.0, 1).unwrap();
    assert_eq!(words, vec![0x8000]);
    assert_eq!(
        decode_registers(&words, DataType::S16, 1.0).unwrap(),
        number(-32_768.0)
    );
    assert!(encode_value(&number(-32_769.0), DataType::S16, 1.0, 1).is_err());

    let words = encode_value(&number(32_767.0), DataType::S16, 1.0, 1).unwrap();
    assert_eq!(words, vec![0x7FFF]);
    assert!(encode_value(&number(32_768.0), DataType::S16, 1.0, 1).is_err());

    let words = encode_value(&number(-2_147_483_648.0), DataType::S32, 1.0, 2).unwrap();
    assert_eq!(words, vec![0x8000, 0x0000]);
    assert_eq!(
        decode_registers(&words, DataType::S32, 1.0).unwrap(),
        number(-2_147_483_648.0)
    );
    assert!(encode_value(&number(-2_147_483_649.0), DataType::S32, 1.0, 2).is_err());
}

#[test]
fn unsigned_maxima_round_trip() {
    let words = encode_value(&number(65_535.0), DataType::U16, 1.0, 1).unwrap();
    assert_eq!(words, vec![0xFFFF]);
    assert_eq!(
        decode_registers(&words, DataType::U16, 1.0).unwrap(),
        number(65_535.0)
    );

    let words = encode_value(&number(4_294_967_295.0), DataType::U32, 1.0, 2).unwrap();
    assert_eq!(words, vec![0xFFFF, 0xFFFF]);
    assert_eq!(
        decode_registers(&words, DataType::U32, 1.0).unwrap(),
        number(4_294_967_295.0)
    );
    assert!(encode_value(&number(4_294_967_296.0), DataType::U32, 1.0, 2).is_err());
}

#[test]
fn ascii_round_trip_with_padding() {
    let text = RegisterValue::Text("AB".to_string());
    let words = encode_value(&text, DataType::Ascii, 1.0, 4).unwrap();
    assert_eq!(words, vec![0x4142, 0, 0, 0]);
    assert_eq!(decode_registers(&words, DataType::Ascii, 1.0).unwrap(), text);
}

#[test]
fn empty_text_is_all_zero_words_and_back() {
    let empty = RegisterValue::Text(String::new());
    let words = encode_value(&empty, DataType::Ascii, 1.0, 3).unwrap();
    assert_eq!(words, vec![0, 0, 0]);
    assert_eq!(decode_registers(&words, DataType::Ascii, 1.0).unwrap(), empty);
}

#[test]
fn odd_length_text_half_fills_the_last_word() {
    let text = RegisterValue::Text("SIG".to_string());
    let words = encode_value(&text, DataType::Ascii, 1.0, 2).unwrap();
    assert_eq!(words, vec![0x5349, 0x4700]);
    assert_eq!(decode_registers(&words, DataType::Ascii, 1.0).unwrap(), text);
}

#[test]
fn fractional_writes_round_to_the_nearest_step() {
    // 5.26 at gain 10 rounds to raw 53, reading back as 5.3
    let words = encode_value(&number(5.26), DataType::U16, 10.0, 1).unwrap();
    assert_eq!(words, vec![53]);
    assert_eq!(
        decode_registers(&words, DataType::U16, 10.0).unwrap(),
        number(5.3)
    );
}
