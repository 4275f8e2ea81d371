//! Header and corruption test vectors
//!
//! Headers are written as hex exactly as they appear on the wire.

use mp3sync_core::{
    encoder::FrameBuilder,
    error::{HeaderRejection, Mp3Error},
    header::parse_header_bytes,
    scanner::{find_frame, scan_stream, scan_stream_with_stats},
    types::{ChannelMode, Layer, MpegVersion},
};

struct HeaderVector {
    hex: &'static str,
    version: MpegVersion,
    layer: Layer,
    bitrate: u32,
    sample_rate: u32,
    mode: ChannelMode,
    frame_length: usize,
    samples: u32,
}

const VALID_HEADERS: &[HeaderVector] = &[
    HeaderVector {
        hex: "fffb9064",
        version: MpegVersion::Mpeg1,
        layer: Layer::Layer3,
        bitrate: 128_000,
        sample_rate: 44100,
        mode: ChannelMode::JointStereo,
        frame_length: 417,
        samples: 1152,
    },
    HeaderVector {
        hex: "fffbe2c4",
        version: MpegVersion::Mpeg1,
        layer: Layer::Layer3,
        bitrate: 320_000,
        sample_rate: 44100,
        mode: ChannelMode::Mono,
        frame_length: 1045,
        samples: 1152,
    },
    HeaderVector {
        hex: "fffd8400",
        version: MpegVersion::Mpeg1,
        layer: Layer::Layer2,
        bitrate: 128_000,
        sample_rate: 48000,
        mode: ChannelMode::Stereo,
        frame_length: 384,
        samples: 1152,
    },
    HeaderVector {
        hex: "fffe5880",
        version: MpegVersion::Mpeg1,
        layer: Layer::Layer1,
        bitrate: 160_000,
        sample_rate: 32000,
        mode: ChannelMode::DualChannel,
        frame_length: 240,
        samples: 384,
    },
    HeaderVector {
        hex: "fff35040",
        version: MpegVersion::Mpeg2,
        layer: Layer::Layer3,
        bitrate: 40_000,
        sample_rate: 22050,
        mode: ChannelMode::JointStereo,
        frame_length: 130,
        samples: 576,
    },
    HeaderVector {
        hex: "ffe338c4",
        version: MpegVersion::Mpeg25,
        layer: Layer::Layer3,
        bitrate: 24_000,
        sample_rate: 8000,
        mode: ChannelMode::Mono,
        frame_length: 216,
        samples: 576,
    },
    HeaderVector {
        hex: "ffe31200",
        version: MpegVersion::Mpeg25,
        layer: Layer::Layer3,
        bitrate: 8_000,
        sample_rate: 11025,
        mode: ChannelMode::Stereo,
        frame_length: 53,
        samples: 576,
    },
];

const REJECTED_HEADERS: &[(&str, HeaderRejection)] = &[
    ("00000000", HeaderRejection::BadSync),
    ("ffdb9064", HeaderRejection::BadSync),
    ("ffeb9064", HeaderRejection::ReservedVersion),
    ("fff99064", HeaderRejection::ReservedLayer),
    ("fffb0064", HeaderRejection::ReservedBitrate),
    ("fffbf064", HeaderRejection::ReservedBitrate),
    ("fffb9c64", HeaderRejection::ReservedSampleRate),
];

#[test]
fn test_valid_header_vectors() {
    for v in VALID_HEADERS {
        let bytes = hex::decode(v.hex).unwrap();
        let header = parse_header_bytes(&bytes).unwrap();

        assert_eq!(header.version, v.version, "{}", v.hex);
        assert_eq!(header.layer, v.layer, "{}", v.hex);
        assert_eq!(header.bitrate, v.bitrate, "{}", v.hex);
        assert_eq!(header.sample_rate, v.sample_rate, "{}", v.hex);
        assert_eq!(header.channel_mode, v.mode, "{}", v.hex);
        assert_eq!(header.frame_length, v.frame_length, "{}", v.hex);
        assert_eq!(header.frame_sample_count, v.samples, "{}", v.hex);
        assert_eq!(hex::encode(header.to_bytes()), v.hex);
    }
}

#[test]
fn test_rejected_header_vectors() {
    for (hex_word, rejection) in REJECTED_HEADERS {
        let bytes = hex::decode(hex_word).unwrap();
        assert_eq!(parse_header_bytes(&bytes), Err(*rejection), "{}", hex_word);
    }
}

#[test]
fn test_builder_matches_vectors() {
    let frame = FrameBuilder::new()
        .version(MpegVersion::Mpeg25)
        .bitrate(24)
        .sample_rate(8000)
        .channel_mode(ChannelMode::Mono)
        .build()
        .unwrap();

    // Mode extension, copyright, original and emphasis bits stay clear
    assert_eq!(hex::encode(&frame[..4]), "ffe338c0");
    assert_eq!(frame.len(), 216);
}

fn clean_stream(frames: usize) -> Vec<u8> {
    let frame = FrameBuilder::new().build().unwrap();
    frame.iter().copied().cycle().take(frame.len() * frames).collect()
}

#[test]
fn test_vector_burst_error() {
    let mut stream = clean_stream(3);
    // Wipe the middle frame's header and part of its body
    for b in &mut stream[417..417 + 100] {
        *b = 0x00;
    }

    let located = scan_stream(&stream);
    assert_eq!(located.len(), 2);
    assert_eq!(located[0].offset, 0);
    assert_eq!(located[1].offset, 834);
}

#[test]
fn test_vector_inserted_garbage() {
    let mut stream = clean_stream(1);
    stream.extend_from_slice(&hex::decode("deadbeef00112233445566778899").unwrap());
    stream.extend(clean_stream(1));

    let (located, stats) = scan_stream_with_stats(&stream);
    assert_eq!(located.len(), 2);
    assert_eq!(located[1].offset, 417 + 14);
    assert_eq!(stats.bytes_skipped, 14);
}

#[test]
fn test_vector_truncated_frame() {
    let stream = clean_stream(2);
    let truncated = &stream[..417 + 200];

    let (located, stats) = scan_stream_with_stats(truncated);
    assert_eq!(located.len(), 1);
    assert_eq!(stats.truncated_frames, 1);
}

/// A 48-byte layer I frame at `pos`, followed by another one
fn layer1_pair_at(pos: usize) -> Vec<u8> {
    let header = hex::decode("ffff1800").unwrap();
    let mut stream = vec![0u8; pos];
    for _ in 0..2 {
        stream.extend_from_slice(&header);
        stream.extend(vec![0u8; 44]);
    }
    stream
}

#[test]
fn test_vector_confirmation_lookahead_bound() {
    // Second header right after the window
    let stream = layer1_pair_at(32768 - 48);
    let point = find_frame(&stream, true).unwrap();
    assert_eq!(point.position, 32768 - 48);

    // Without bytes past the window the lookahead cannot succeed
    assert_eq!(
        find_frame(&stream[..32768], true),
        Err(Mp3Error::HeaderNotFound)
    );

    // Second header 4 bytes past the window is still accepted
    let stream = layer1_pair_at(32768 - 44);
    assert!(find_frame(&stream, true).is_ok());

    // 5 bytes past is not, even though the sync is there
    let stream = layer1_pair_at(32768 - 43);
    assert_eq!(find_frame(&stream, true), Err(Mp3Error::HeaderNotFound));
    assert!(find_frame(&stream, false).is_ok());
}
