//! Fuzzing entry points for mp3sync-core
//!
//! Each function must never panic, whatever the input. They are plain
//! functions so any fuzzing harness can drive them, e.g. with cargo-fuzz:
//! 1. Install cargo-fuzz: cargo install cargo-fuzz
//! 2. Call these from a `fuzz_target!` and run: cargo fuzz run fuzz_decode

use std::io::Cursor;

pub fn fuzz_parse_header(data: &[u8]) {
    use mp3sync_core::header::parse_header_bytes;

    let _ = parse_header_bytes(data);
}

pub fn fuzz_sync(data: &[u8]) {
    use mp3sync_core::header::parse_header_bytes;
    use mp3sync_core::scanner::find_frame;

    for confirm in [false, true] {
        if let Ok(point) = find_frame(data, confirm) {
            assert!(parse_header_bytes(&data[point.position..]).is_ok());
        }
    }
}

pub fn fuzz_scan(data: &[u8]) {
    use mp3sync_core::scanner::scan_stream;

    for frame in scan_stream(data) {
        assert!(frame.offset + frame.size <= data.len());
    }
}

pub fn fuzz_probe(data: &[u8]) {
    use mp3sync_core::prober::probe_bytes;

    // First byte picks the starting offset
    let offset = data.first().map_or(0, |&b| b as u64 * 16);
    let _ = probe_bytes(data, offset);
}

pub fn fuzz_decode(data: &[u8]) {
    use mp3sync_core::decoder::Decoder;

    let mut decoder = Decoder::new(Cursor::new(data));
    while let Ok(pcm) = decoder.read(4096) {
        if pcm.is_empty() {
            break;
        }
    }
}
