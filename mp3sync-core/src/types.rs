//! Core types for MPEG audio frames and probe results

use crate::constants::{
    MODE_DUAL_CHANNEL, MODE_JOINT_STEREO, MODE_SINGLE_CHANNEL, MODE_STEREO,
};
use core::fmt;
use serde::{Deserialize, Serialize};

/// MPEG audio version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MpegVersion {
    /// MPEG-1 (ISO/IEC 11172-3)
    Mpeg1,
    /// MPEG-2 low sample rate extension (ISO/IEC 13818-3)
    Mpeg2,
    /// Unofficial MPEG-2.5 extension for very low sample rates
    Mpeg25,
}

impl MpegVersion {
    /// Decode the 2-bit version field; code 1 is reserved
    pub const fn from_code(code: u8) -> Option<Self> {
        match code & 0x3 {
            0 => Some(MpegVersion::Mpeg25),
            2 => Some(MpegVersion::Mpeg2),
            3 => Some(MpegVersion::Mpeg1),
            _ => None,
        }
    }

    /// The 2-bit version field as written in a header
    pub const fn code(&self) -> u8 {
        match self {
            MpegVersion::Mpeg25 => 0,
            MpegVersion::Mpeg2 => 2,
            MpegVersion::Mpeg1 => 3,
        }
    }

    /// Row index into the bitrate and sample rate tables
    pub const fn table_index(&self) -> usize {
        match self {
            MpegVersion::Mpeg1 => 0,
            MpegVersion::Mpeg2 => 1,
            MpegVersion::Mpeg25 => 2,
        }
    }

    /// Numeric version: 1.0, 2.0 or 2.5
    pub fn as_f32(&self) -> f32 {
        match self {
            MpegVersion::Mpeg1 => 1.0,
            MpegVersion::Mpeg2 => 2.0,
            MpegVersion::Mpeg25 => 2.5,
        }
    }

    /// True for the MPEG-2 and MPEG-2.5 low sample rate versions
    pub const fn is_lsf(&self) -> bool {
        !matches!(self, MpegVersion::Mpeg1)
    }
}

impl fmt::Display for MpegVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MpegVersion::Mpeg1 => f.write_str("1"),
            MpegVersion::Mpeg2 => f.write_str("2"),
            MpegVersion::Mpeg25 => f.write_str("2.5"),
        }
    }
}

/// MPEG audio layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    /// Layer I
    Layer1,
    /// Layer II
    Layer2,
    /// Layer III
    Layer3,
}

impl Layer {
    /// Decode the 2-bit layer field; code 0 is reserved
    pub const fn from_code(code: u8) -> Option<Self> {
        match code & 0x3 {
            1 => Some(Layer::Layer3),
            2 => Some(Layer::Layer2),
            3 => Some(Layer::Layer1),
            _ => None,
        }
    }

    /// The 2-bit layer field as written in a header
    pub const fn code(&self) -> u8 {
        4 - self.number()
    }

    /// Layer number: 1, 2 or 3
    pub const fn number(&self) -> u8 {
        match self {
            Layer::Layer1 => 1,
            Layer::Layer2 => 2,
            Layer::Layer3 => 3,
        }
    }

    /// Column index into the bitrate table
    pub const fn table_index(&self) -> usize {
        self.number() as usize - 1
    }
}

/// Channel mode of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelMode {
    /// Two independent channels
    Stereo,
    /// Stereo with mid/side or intensity coding
    JointStereo,
    /// Two unrelated mono channels
    DualChannel,
    /// Single channel
    Mono,
}

impl ChannelMode {
    /// Decode the 2-bit mode field (every value is valid)
    pub const fn from_code(code: u8) -> Self {
        match code & 0x3 {
            MODE_STEREO => ChannelMode::Stereo,
            MODE_JOINT_STEREO => ChannelMode::JointStereo,
            MODE_DUAL_CHANNEL => ChannelMode::DualChannel,
            _ => ChannelMode::Mono,
        }
    }

    /// Mode code: 0 stereo, 1 joint stereo, 2 dual channel, 3 mono
    pub const fn code(&self) -> u8 {
        match self {
            ChannelMode::Stereo => MODE_STEREO,
            ChannelMode::JointStereo => MODE_JOINT_STEREO,
            ChannelMode::DualChannel => MODE_DUAL_CHANNEL,
            ChannelMode::Mono => MODE_SINGLE_CHANNEL,
        }
    }

    /// Number of audio channels carried in this mode
    pub const fn channels(&self) -> u8 {
        match self {
            ChannelMode::Mono => 1,
            _ => 2,
        }
    }
}

/// Decoded MPEG audio frame header.
///
/// Every field is resolved from the lookup tables in
/// [`constants`](crate::constants); a `FrameHeader` is only produced by
/// [`parse_header`](crate::header::parse_header) or built from validated
/// values by the encoder, never from reserved field codes. Fields are
/// readable but the struct cannot be assembled outside this crate:
///
/// ```compile_fail
/// let parsed = mp3sync_core::parse_header(0xFFFB_9064).unwrap();
/// let zero_rate = mp3sync_core::FrameHeader { sample_rate: 0, ..parsed };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct FrameHeader {
    /// MPEG version
    pub version: MpegVersion,

    /// Layer
    pub layer: Layer,

    /// Channel mode
    pub channel_mode: ChannelMode,

    /// A 16-bit CRC follows the header
    pub protected: bool,

    /// The frame carries one extra padding slot
    pub padding: bool,

    /// Bitrate in bits per second
    pub bitrate: u32,

    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Total frame length in bytes, header included
    pub frame_length: usize,

    /// PCM samples per channel encoded by this frame
    pub frame_sample_count: u32,

    /// The raw 32-bit header word
    pub raw: u32,
}

impl FrameHeader {
    /// Number of audio channels
    pub const fn channels(&self) -> u8 {
        self.channel_mode.channels()
    }

    /// Bitrate in kbps
    pub const fn bitrate_kbps(&self) -> u32 {
        self.bitrate / 1000
    }

    /// Playback duration of one frame in seconds
    pub fn duration(&self) -> f64 {
        self.frame_sample_count as f64 / self.sample_rate as f64
    }

    /// Size of the PCM produced by decoding this frame (16-bit samples)
    pub const fn pcm_len(&self) -> usize {
        self.frame_sample_count as usize
            * self.channels() as usize
            * crate::constants::BYTES_PER_SAMPLE
    }

    /// The header as it appears on the wire
    pub const fn to_bytes(&self) -> [u8; 4] {
        self.raw.to_be_bytes()
    }
}

/// Stream information inferred by the prober without decoding audio
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeResult {
    /// Total size of the probed stream in bytes
    pub file_size: u64,

    /// Candidate offset at which synchronization succeeded
    pub offset: u64,

    /// Absolute position of the accepted frame header
    pub frame_offset: u64,

    /// True when the result was accepted without two-frame confirmation
    pub sketchy: bool,

    /// Header of the accepted frame
    pub header: FrameHeader,

    /// Estimated audio length in seconds
    pub length: f64,
}

impl ProbeResult {
    /// MPEG version as a number (1, 2 or 2.5)
    pub fn version(&self) -> f32 {
        self.header.version.as_f32()
    }

    /// Layer number (1, 2 or 3)
    pub fn layer(&self) -> u8 {
        self.header.layer.number()
    }

    /// Bitrate in bits per second
    pub fn bitrate(&self) -> u32 {
        self.header.bitrate
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.header.sample_rate
    }

    /// Channel mode code (0 stereo .. 3 mono)
    pub fn mode(&self) -> u8 {
        self.header.channel_mode.code()
    }

    /// Human readable one-line summary
    pub fn summary(&self) -> alloc::string::String {
        let mut s = alloc::format!(
            "MPEG {} layer {}, {} bps, {} Hz, {:.2} seconds",
            self.header.version,
            self.layer(),
            self.bitrate(),
            self.sample_rate(),
            self.length
        );
        if self.sketchy {
            s.push_str(" (sketchy)");
        }
        s
    }
}
