#![no_main]
use libfuzzer_sys::fuzz_target;
use sigenbridge::codec::{DataType, decode_registers};

fuzz_target!(|data: &[u8]| {
    // Interpret the input as u16 register stream in big-endian pairs
    let mut regs = Vec::new();
    let mut it = data.chunks_exact(2);
    for b in &mut it {
        regs.push(u16::from_be_bytes([b[0], b[1]]));
    }

    // Exercise every encoding under varying payload lengths
    for data_type in [
        DataType::U16,
        DataType::U32,
        DataType::U64,
        DataType::S16,
        DataType::S32,
        DataType::Ascii,
    ] {
        let _ = decode_registers(&regs, data_type, 1.0);
        let _ = decode_registers(&regs, data_type, 10.0);
    }
});
