//! Frame header parsing
//!
//! Bit layout of the 32-bit big-endian header word (MSB first):
//!
//! ```text
//! AAAAAAAA AAABBCCD EEEEFFGH IIJJKLMM
//! A sync (11)  B version (2)  C layer (2)  D protection (1)
//! E bitrate index (4)  F sample rate index (2)  G padding (1)  H private (1)
//! I channel mode (2)  J..M mode extension, copyright, original, emphasis
//! ```
//!
//! Only fields up to the channel mode are interpreted.

use crate::constants::{BIT_RATES, HEADER_SIZE, SAMPLE_RATES, SYNC_MASK};
use crate::error::HeaderRejection;
use crate::types::{ChannelMode, FrameHeader, Layer, MpegVersion};

/// Parse a frame header from its 32-bit big-endian word
pub fn parse_header(word: u32) -> Result<FrameHeader, HeaderRejection> {
    if word & SYNC_MASK != SYNC_MASK {
        return Err(HeaderRejection::BadSync);
    }

    let version_code = ((word >> 19) & 0x3) as u8;
    let layer_code = ((word >> 17) & 0x3) as u8;
    let protection = (word >> 16) & 0x1;
    let bitrate_index = ((word >> 12) & 0xF) as usize;
    let sample_rate_index = ((word >> 10) & 0x3) as usize;
    let padding = (word >> 9) & 0x1;
    let mode = ((word >> 6) & 0x3) as u8;

    let version = MpegVersion::from_code(version_code).ok_or(HeaderRejection::ReservedVersion)?;
    let layer = Layer::from_code(layer_code).ok_or(HeaderRejection::ReservedLayer)?;
    if bitrate_index == 0 || bitrate_index == 0xF {
        return Err(HeaderRejection::ReservedBitrate);
    }
    if sample_rate_index == 0x3 {
        return Err(HeaderRejection::ReservedSampleRate);
    }

    let bitrate = BIT_RATES[version.table_index()][layer.table_index()][bitrate_index] * 1000;
    let sample_rate = SAMPLE_RATES[version.table_index()][sample_rate_index];
    let (frame_length, frame_sample_count) =
        frame_geometry(version, layer, bitrate, sample_rate, padding != 0);

    Ok(FrameHeader {
        version,
        layer,
        channel_mode: ChannelMode::from_code(mode),
        protected: protection == 0,
        padding: padding != 0,
        bitrate,
        sample_rate,
        frame_length,
        frame_sample_count,
        raw: word,
    })
}

/// Parse a frame header from the first four bytes of `data`
pub fn parse_header_bytes(data: &[u8]) -> Result<FrameHeader, HeaderRejection> {
    if data.len() < HEADER_SIZE {
        return Err(HeaderRejection::BadSync);
    }
    parse_header(u32::from_be_bytes([data[0], data[1], data[2], data[3]]))
}

/// Frame length in bytes and samples per channel for a header's parameters.
///
/// Integer division truncates toward zero.
pub(crate) fn frame_geometry(
    version: MpegVersion,
    layer: Layer,
    bitrate: u32,
    sample_rate: u32,
    padding: bool,
) -> (usize, u32) {
    let bitrate = bitrate as usize;
    let sample_rate = sample_rate as usize;
    let padding = padding as usize;

    match layer {
        Layer::Layer1 => (((12 * bitrate / sample_rate) + padding) * 4, 384),
        Layer::Layer3 if version.is_lsf() => ((72 * bitrate / sample_rate) + padding, 576),
        _ => ((144 * bitrate / sample_rate) + padding, 1152),
    }
}
