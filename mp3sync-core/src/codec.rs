//! Codec engine seam
//!
//! The pumps in [`decoder`](crate::decoder) and [`encoder`](crate::encoder)
//! own synchronization and buffering; turning frame bytes into PCM and back
//! is delegated to an engine implementing these traits. PCM is always
//! interleaved signed 16-bit little-endian.

use crate::constants::{MAX_QUALITY, SAMPLE_RATES};
use crate::encoder::{bitrate_index, FrameBuilder};
use crate::error::Mp3Error;
use crate::types::{ChannelMode, FrameHeader, Layer, MpegVersion};
use alloc::format;
use bytes::{BufMut, BytesMut};

/// What the engine made of a synchronized frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// PCM was appended to the output buffer
    Decoded,
    /// The frame content is damaged; the pump drops it and resynchronizes
    Corrupted,
}

/// Engine side of the decode pump
pub trait FrameDecoder {
    /// Decode one complete frame (header included) and append its PCM to `out`.
    ///
    /// Returning an error aborts the current `read` call.
    fn decode_frame(
        &mut self,
        header: &FrameHeader,
        frame: &[u8],
        out: &mut BytesMut,
    ) -> Result<FrameOutcome, Mp3Error>;
}

/// Engine side of the encode pump
pub trait FrameEncoder {
    /// Prepare for encoding; called once, before the first samples
    fn init(&mut self, config: &EncoderConfig) -> Result<(), Mp3Error>;

    /// Consume interleaved samples, appending any completed frames to `out`
    fn encode(&mut self, samples: &[i16], out: &mut BytesMut) -> Result<(), Mp3Error>;

    /// Emit whatever partial frame is still buffered
    fn flush(&mut self, out: &mut BytesMut) -> Result<(), Mp3Error>;
}

/// Encoder settings handed to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Number of interleaved input channels (1 or 2)
    pub channels: u8,

    /// Input sample rate in Hz
    pub sample_rate: u32,

    /// Constant bitrate in kbps
    pub bit_rate: u32,

    /// Output channel mode
    pub mode: ChannelMode,

    /// 0 = best/slowest .. 9 = worst/fastest
    pub quality: u8,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 44100,
            bit_rate: 128,
            mode: ChannelMode::JointStereo,
            quality: 5,
        }
    }
}

impl EncoderConfig {
    /// Check every field is in range
    pub fn validate(&self) -> Result<(), Mp3Error> {
        if !(1..=2).contains(&self.channels) {
            return Err(Mp3Error::Config(format!(
                "channels must be 1 or 2, got {}",
                self.channels
            )));
        }
        if self.sample_rate == 0 {
            return Err(Mp3Error::Config("sample rate must be positive".into()));
        }
        if self.bit_rate == 0 {
            return Err(Mp3Error::Config("bit rate must be positive".into()));
        }
        if self.quality > MAX_QUALITY {
            return Err(Mp3Error::Config(format!(
                "quality must be 0..={}, got {}",
                MAX_QUALITY, self.quality
            )));
        }
        Ok(())
    }
}

/// MPEG version whose sample rate table contains `sample_rate`
pub fn version_for_sample_rate(sample_rate: u32) -> Option<MpegVersion> {
    [MpegVersion::Mpeg1, MpegVersion::Mpeg2, MpegVersion::Mpeg25]
        .into_iter()
        .find(|v| SAMPLE_RATES[v.table_index()].contains(&sample_rate))
}

/// Reference engine for silent audio.
///
/// Decoding renders every frame as digital silence of the right length.
/// Encoding ignores the sample values and emits Layer III frames whose side
/// information and main data are all zero, which any conforming decoder
/// plays back as silence.
#[derive(Debug, Clone, Default)]
pub struct SilenceCodec {
    encoder: Option<SilenceEncoder>,
}

#[derive(Debug, Clone)]
struct SilenceEncoder {
    version: MpegVersion,
    mode: ChannelMode,
    channels: usize,
    bit_rate: u32,
    sample_rate: u32,
    samples_per_frame: usize,
    /// Samples per channel waiting for a complete frame
    pending: usize,
    /// Fractional slot accumulator driving the padding bit
    slot_error: u64,
}

impl SilenceCodec {
    /// Create a new engine
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameDecoder for SilenceCodec {
    fn decode_frame(
        &mut self,
        header: &FrameHeader,
        _frame: &[u8],
        out: &mut BytesMut,
    ) -> Result<FrameOutcome, Mp3Error> {
        out.put_bytes(0, header.pcm_len());
        Ok(FrameOutcome::Decoded)
    }
}

impl SilenceEncoder {
    fn emit_frame(&mut self, out: &mut BytesMut) -> Result<(), Mp3Error> {
        // Layer III slot coefficient: 144 for MPEG1, 72 for the LSF versions
        let coefficient: u64 = if self.version.is_lsf() { 72 } else { 144 };
        let bits = coefficient * self.bit_rate as u64 * 1000;
        self.slot_error += bits % self.sample_rate as u64;
        let padding = self.slot_error >= self.sample_rate as u64;
        if padding {
            self.slot_error -= self.sample_rate as u64;
        }

        let frame = FrameBuilder::new()
            .version(self.version)
            .layer(Layer::Layer3)
            .bitrate(self.bit_rate)
            .sample_rate(self.sample_rate)
            .channel_mode(self.mode)
            .padding(padding)
            .build()
            .map_err(|e| Mp3Error::Codec(format!("{:?}", e)))?;
        out.put_slice(&frame);
        Ok(())
    }
}

impl FrameEncoder for SilenceCodec {
    fn init(&mut self, config: &EncoderConfig) -> Result<(), Mp3Error> {
        let version = version_for_sample_rate(config.sample_rate).ok_or_else(|| {
            Mp3Error::Codec(format!("unsupported sample rate {} Hz", config.sample_rate))
        })?;
        if bitrate_index(version, Layer::Layer3, config.bit_rate).is_none() {
            return Err(Mp3Error::Codec(format!(
                "unsupported bit rate {} kbps for MPEG {} layer III",
                config.bit_rate, version
            )));
        }

        self.encoder = Some(SilenceEncoder {
            version,
            mode: config.mode,
            channels: config.channels as usize,
            bit_rate: config.bit_rate,
            sample_rate: config.sample_rate,
            samples_per_frame: if version.is_lsf() { 576 } else { 1152 },
            pending: 0,
            slot_error: 0,
        });
        Ok(())
    }

    fn encode(&mut self, samples: &[i16], out: &mut BytesMut) -> Result<(), Mp3Error> {
        let enc = self
            .encoder
            .as_mut()
            .ok_or_else(|| Mp3Error::Codec("encoder not initialized".into()))?;

        enc.pending += samples.len() / enc.channels;
        while enc.pending >= enc.samples_per_frame {
            enc.emit_frame(out)?;
            enc.pending -= enc.samples_per_frame;
        }
        Ok(())
    }

    fn flush(&mut self, out: &mut BytesMut) -> Result<(), Mp3Error> {
        let enc = self
            .encoder
            .as_mut()
            .ok_or_else(|| Mp3Error::Codec("encoder not initialized".into()))?;

        if enc.pending > 0 {
            enc.emit_frame(out)?;
            enc.pending = 0;
        }
        Ok(())
    }
}
