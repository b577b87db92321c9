#![no_main]

use bitstream::BitReader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut reader = BitReader::new(data);
    let mut idx = 0usize;

    // Input bytes drive a bounded sequence of operations.
    while idx < data.len() && idx < 1024 {
        let op = data[idx] % 7;
        idx += 1;

        match op {
            0 => {
                let _ = reader.read_bool();
            }
            1 => {
                let bits = usize::from(data[idx - 1] % 64) + 1;
                let _ = reader.read_bits(bits);
            }
            2 => {
                let _ = reader.align_to_byte();
            }
            3 => {
                let _ = reader.read_u32();
            }
            4 => {
                let len = usize::from(data.get(idx).copied().unwrap_or(0) % 32);
                let _ = reader.read_bytes(len);
            }
            5 => {
                let _ = reader.read_f32();
            }
            _ => {
                let _ = reader.read_i64();
            }
        }
    }
});
