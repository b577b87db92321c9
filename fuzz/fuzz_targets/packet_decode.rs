#![no_main]

use libfuzzer_sys::fuzz_target;
use wire::{decode_packet, Limits};

fuzz_target!(|data: &[u8]| {
    let limits = Limits::default();
    let Ok(packet) = decode_packet(data, &limits) else {
        return;
    };

    // Anything that decodes must re-encode to a stable byte form. Bytes are
    // compared rather than records so NaN floats do not trip the check.
    let bytes = packet.encode().expect("decoded packet re-encodes");
    let again = decode_packet(&bytes, &limits).expect("re-encoded packet decodes");
    assert_eq!(again.encode().expect("second encode"), bytes);
});
