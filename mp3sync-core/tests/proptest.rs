//! Property-based tests using proptest

use mp3sync_core::{
    constants::SYNC_WINDOW,
    decoder::Decoder,
    encoder::FrameBuilder,
    header::{parse_header, parse_header_bytes},
    prober::{candidate_offsets, probe_bytes},
    scanner::{find_frame, next_header, scan_stream_with_stats},
    types::{ChannelMode, Layer, MpegVersion},
};
use proptest::prelude::*;
use std::io::Cursor;

fn any_version() -> impl Strategy<Value = MpegVersion> {
    prop_oneof![
        Just(MpegVersion::Mpeg1),
        Just(MpegVersion::Mpeg2),
        Just(MpegVersion::Mpeg25)
    ]
}

fn any_layer() -> impl Strategy<Value = Layer> {
    prop_oneof![Just(Layer::Layer1), Just(Layer::Layer2), Just(Layer::Layer3)]
}

proptest! {
    #[test]
    fn prop_parse_never_panics(word in any::<u32>()) {
        let _ = parse_header(word);
    }

    #[test]
    fn prop_valid_fields_always_parse(
        version in any_version(),
        layer in any_layer(),
        bitrate_index in 1usize..=14,
        sample_rate_index in 0usize..=2,
        padding in any::<bool>(),
        mode in 0u8..=3,
    ) {
        let v = version.table_index();
        let l = layer.table_index();
        let kbps = mp3sync_core::constants::BIT_RATES[v][l][bitrate_index];
        let hz = mp3sync_core::constants::SAMPLE_RATES[v][sample_rate_index];

        let frame = FrameBuilder::new()
            .version(version)
            .layer(layer)
            .bitrate(kbps)
            .sample_rate(hz)
            .channel_mode(ChannelMode::from_code(mode))
            .padding(padding)
            .build()
            .unwrap();
        let header = parse_header_bytes(&frame).unwrap();

        prop_assert_eq!(header.bitrate, kbps * 1000);
        prop_assert_eq!(header.sample_rate, hz);
        prop_assert_eq!(header.channel_mode.code(), mode);
        prop_assert_eq!(header.frame_length, frame.len());
    }

    #[test]
    fn prop_sync_implies_parse(
        data in prop::collection::vec(any::<u8>(), 0..8192),
        confirm in any::<bool>(),
    ) {
        if let Ok(point) = find_frame(&data, confirm) {
            prop_assert!(point.position < SYNC_WINDOW);
            prop_assert!(parse_header_bytes(&data[point.position..]).is_ok());
        }
    }

    #[test]
    fn prop_sync_in_dense_ff_noise(
        data in prop::collection::vec(prop_oneof![Just(0xFFu8), any::<u8>()], 0..4096),
    ) {
        if let Ok(point) = find_frame(&data, true) {
            prop_assert!(parse_header_bytes(&data[point.position..]).is_ok());
        }
        if let Some((pos, _)) = next_header(&data, 0) {
            prop_assert!(parse_header_bytes(&data[pos..]).is_ok());
        }
    }

    #[test]
    fn prop_scan_accounts_for_every_byte(
        data in prop::collection::vec(any::<u8>(), 0..8192),
    ) {
        let (frames, stats) = scan_stream_with_stats(&data);
        prop_assert_eq!(stats.bytes_recovered + stats.bytes_skipped, data.len());
        for pair in frames.windows(2) {
            prop_assert!(pair[0].offset + pair[0].size <= pair[1].offset);
        }
    }

    #[test]
    fn prop_probe_never_panics(
        data in prop::collection::vec(any::<u8>(), 0..4096),
        offset in 0u64..8192,
    ) {
        let _ = probe_bytes(&data, offset);
    }

    #[test]
    fn prop_candidate_offsets_order(offset in any::<u64>(), size in 0u64..(1 << 40)) {
        let offsets = candidate_offsets(offset, size);
        prop_assert_eq!(offsets[0], offset);
        prop_assert!(offsets[1] <= offsets[2]);
        prop_assert!(offsets[2] <= offsets[3]);
        prop_assert!(offsets[3] <= size);
    }

    #[test]
    fn prop_decode_never_panics(
        data in prop::collection::vec(any::<u8>(), 0..16384),
        read_size in 1usize..10_000,
    ) {
        let mut decoder = Decoder::new(Cursor::new(data));
        loop {
            let pcm = decoder.read(read_size).unwrap();
            prop_assert!(pcm.len() <= read_size);
            if pcm.is_empty() {
                break;
            }
        }
    }
}
