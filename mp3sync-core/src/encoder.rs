//! Frame header encoding and the streaming encode pump

use crate::codec::{EncoderConfig, FrameEncoder, SilenceCodec};
use crate::constants::{BIT_RATES, BYTES_PER_SAMPLE, HEADER_SIZE, SAMPLE_RATES, SYNC_MASK};
use crate::error::Mp3Error;
use crate::header::parse_header;
use crate::types::{ChannelMode, FrameHeader, Layer, MpegVersion};
use alloc::format;
use alloc::vec::Vec;
use bytes::{BufMut, Bytes, BytesMut};

#[cfg(feature = "logging")]
use tracing::debug;

/// Bitrate index (1..=14) of `kbps` for the given version and layer
pub fn bitrate_index(version: MpegVersion, layer: Layer, kbps: u32) -> Option<u8> {
    BIT_RATES[version.table_index()][layer.table_index()][1..15]
        .iter()
        .position(|&rate| rate == kbps)
        .map(|i| i as u8 + 1)
}

/// Sample rate index (0..=2) of `hz` for the given version
pub fn sample_rate_index(version: MpegVersion, hz: u32) -> Option<u8> {
    SAMPLE_RATES[version.table_index()]
        .iter()
        .position(|&rate| rate == hz)
        .map(|i| i as u8)
}

/// Assemble a header word from already-encoded field codes.
///
/// Layout:
/// 1. Sync (11 bits)
/// 2. Version, layer (2 bits each), protection (1 bit)
/// 3. Bitrate index (4 bits), sample rate index (2 bits), padding, private
/// 4. Channel mode (2 bits); mode extension, copyright, original, emphasis zero
pub fn encode_header(
    version: MpegVersion,
    layer: Layer,
    protected: bool,
    bitrate_index: u8,
    sample_rate_index: u8,
    padding: bool,
    mode: ChannelMode,
) -> u32 {
    SYNC_MASK
        | (version.code() as u32) << 19
        | (layer.code() as u32) << 17
        | (!protected as u32) << 16
        | ((bitrate_index & 0xF) as u32) << 12
        | ((sample_rate_index & 0x3) as u32) << 10
        | (padding as u32) << 9
        | (mode.code() as u32) << 6
}

/// Builder for constructing MPEG audio frames
///
/// Defaults to MPEG1 layer III, 128 kbps, 44.1 kHz, joint stereo. The frame
/// body is the payload followed by zero fill up to the frame length.
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    version: MpegVersion,
    layer: Layer,
    bitrate: u32,
    sample_rate: u32,
    mode: ChannelMode,
    padding: bool,
    protected: bool,
    payload: Bytes,
}

impl Default for FrameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuilder {
    /// Create a new frame builder
    pub fn new() -> Self {
        Self {
            version: MpegVersion::Mpeg1,
            layer: Layer::Layer3,
            bitrate: 128,
            sample_rate: 44100,
            mode: ChannelMode::JointStereo,
            padding: false,
            protected: false,
            payload: Bytes::new(),
        }
    }

    /// Set the MPEG version
    pub fn version(mut self, version: MpegVersion) -> Self {
        self.version = version;
        self
    }

    /// Set the layer
    pub fn layer(mut self, layer: Layer) -> Self {
        self.layer = layer;
        self
    }

    /// Set the bitrate in kbps
    pub fn bitrate(mut self, kbps: u32) -> Self {
        self.bitrate = kbps;
        self
    }

    /// Set the sample rate in Hz
    pub fn sample_rate(mut self, hz: u32) -> Self {
        self.sample_rate = hz;
        self
    }

    /// Set the channel mode
    pub fn channel_mode(mut self, mode: ChannelMode) -> Self {
        self.mode = mode;
        self
    }

    /// Add the padding slot
    pub fn padding(mut self, padding: bool) -> Self {
        self.padding = padding;
        self
    }

    /// Mark the header as followed by a CRC
    pub fn protected(mut self, protected: bool) -> Self {
        self.protected = protected;
        self
    }

    /// Set the bytes written right after the header
    pub fn payload(mut self, payload: Bytes) -> Self {
        self.payload = payload;
        self
    }

    /// Resolve the header this builder describes
    pub fn header(&self) -> Result<FrameHeader, Mp3Error> {
        let bitrate_index = bitrate_index(self.version, self.layer, self.bitrate).ok_or_else(|| {
            Mp3Error::Config(format!(
                "{} kbps is not a valid bitrate for MPEG {} layer {}",
                self.bitrate,
                self.version,
                self.layer.number()
            ))
        })?;
        let sample_rate_index = sample_rate_index(self.version, self.sample_rate).ok_or_else(|| {
            Mp3Error::Config(format!(
                "{} Hz is not a valid sample rate for MPEG {}",
                self.sample_rate, self.version
            ))
        })?;

        let word = encode_header(
            self.version,
            self.layer,
            self.protected,
            bitrate_index,
            sample_rate_index,
            self.padding,
            self.mode,
        );
        parse_header(word)
            .map_err(|rejection| Mp3Error::Config(format!("{:?}", rejection)))
    }

    /// Build and encode the frame
    pub fn build(self) -> Result<Bytes, Mp3Error> {
        let header = self.header()?;
        let body_len = header.frame_length - HEADER_SIZE;
        if self.payload.len() > body_len {
            return Err(Mp3Error::Config(format!(
                "payload of {} bytes does not fit a {} byte frame",
                self.payload.len(),
                header.frame_length
            )));
        }

        let mut buf = BytesMut::with_capacity(header.frame_length);
        buf.put_u32(header.raw);
        buf.put_slice(&self.payload);
        buf.put_bytes(0, body_len - self.payload.len());

        Ok(buf.freeze())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EncoderState {
    Configuring,
    Encoding,
    Failed,
}

/// Streaming encoder: 16-bit PCM in, MPEG frames out
///
/// Configure with the setters, then call [`write`](Encoder::write) with
/// interleaved little-endian samples and drain the produced frames with
/// [`take_output`](Encoder::take_output).
pub struct Encoder<C = SilenceCodec> {
    codec: C,
    config: EncoderConfig,
    state: EncoderState,
    output: BytesMut,
}

impl Encoder<SilenceCodec> {
    /// Create an encoder backed by [`SilenceCodec`]. The frames are well
    /// formed but carry silence whatever the input samples are; real
    /// compression needs an engine passed to [`with_codec`](Encoder::with_codec).
    pub fn new() -> Self {
        Self::with_codec(SilenceCodec::new())
    }
}

impl Default for Encoder<SilenceCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: FrameEncoder> Encoder<C> {
    /// Create an encoder backed by the given engine
    pub fn with_codec(codec: C) -> Self {
        Self {
            codec,
            config: EncoderConfig::default(),
            state: EncoderState::Configuring,
            output: BytesMut::new(),
        }
    }

    /// Current configuration
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    fn configure(&mut self, update: impl FnOnce(&mut EncoderConfig)) -> Result<(), Mp3Error> {
        if self.state != EncoderState::Configuring {
            return Err(Mp3Error::Config(
                "settings must be applied before the first write".into(),
            ));
        }
        let mut config = self.config;
        update(&mut config);
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Set the number of input channels (1 or 2)
    pub fn set_channels(&mut self, channels: u8) -> Result<(), Mp3Error> {
        self.configure(|c| c.channels = channels)
    }

    /// Set the input sample rate in Hz
    pub fn set_sample_rate(&mut self, hz: u32) -> Result<(), Mp3Error> {
        self.configure(|c| c.sample_rate = hz)
    }

    /// Set the constant bitrate in kbps
    pub fn set_bit_rate(&mut self, kbps: u32) -> Result<(), Mp3Error> {
        self.configure(|c| c.bit_rate = kbps)
    }

    /// Set the channel mode
    pub fn set_mode(&mut self, mode: ChannelMode) -> Result<(), Mp3Error> {
        self.configure(|c| c.mode = mode)
    }

    /// Set the quality (0 best .. 9 fastest)
    pub fn set_quality(&mut self, quality: u8) -> Result<(), Mp3Error> {
        self.configure(|c| c.quality = quality)
    }

    fn start(&mut self) -> Result<(), Mp3Error> {
        // Joint stereo makes no sense for one channel, mono none for two
        if self.config.channels == 1 {
            self.config.mode = ChannelMode::Mono;
        } else if self.config.mode == ChannelMode::Mono {
            self.config.mode = ChannelMode::Stereo;
        }

        match self.codec.init(&self.config) {
            Ok(()) => {
                #[cfg(feature = "logging")]
                debug!("Encoder initialized with {:?}", self.config);

                self.state = EncoderState::Encoding;
                Ok(())
            }
            Err(e) => {
                self.state = EncoderState::Failed;
                Err(e)
            }
        }
    }

    /// Encode a block of interleaved 16-bit little-endian PCM.
    ///
    /// The whole buffer is always consumed; returns its length.
    pub fn write(&mut self, pcm: &[u8]) -> Result<usize, Mp3Error> {
        if pcm.len() % BYTES_PER_SAMPLE != 0 {
            return Err(Mp3Error::Codec("input data must be 16-bit PCM data".into()));
        }

        if self.state == EncoderState::Configuring {
            self.start()?;
        }
        if self.state != EncoderState::Encoding {
            return Err(Mp3Error::Codec("encoder not initialized".into()));
        }

        let samples: Vec<i16> = pcm
            .chunks_exact(BYTES_PER_SAMPLE)
            .map(|s| i16::from_le_bytes([s[0], s[1]]))
            .collect();
        if samples.len() % self.config.channels as usize != 0 {
            return Err(Mp3Error::Codec(
                "the input data must be interleaved 16-bit PCM".into(),
            ));
        }

        self.codec.encode(&samples, &mut self.output)?;
        Ok(pcm.len())
    }

    /// Emit the last partial frame; returns whether any bytes were produced
    pub fn flush(&mut self) -> Result<bool, Mp3Error> {
        if self.state != EncoderState::Encoding {
            return Err(Mp3Error::Codec("not currently encoding".into()));
        }

        let before = self.output.len();
        self.codec.flush(&mut self.output)?;
        Ok(self.output.len() > before)
    }

    /// Encoded bytes not yet taken
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Drain the encoded bytes
    pub fn take_output(&mut self) -> Bytes {
        self.output.split().freeze()
    }
}
