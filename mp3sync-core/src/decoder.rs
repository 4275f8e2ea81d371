//! Streaming decode pump
//!
//! Pulls compressed bytes from a [`ByteSource`], resynchronizes one byte at a
//! time over anything that is not a frame, and hands each complete frame to a
//! [`FrameDecoder`] engine. Damaged spans are dropped, never reported.

use crate::codec::{FrameDecoder, FrameOutcome, SilenceCodec};
use crate::constants::{DECODER_CHUNK_SIZE, HEADER_SIZE};
use crate::error::Mp3Error;
use crate::scanner::next_header;
use crate::source::ByteSource;
use crate::types::FrameHeader;
use alloc::format;
use bytes::{Buf, Bytes, BytesMut};

#[cfg(feature = "logging")]
use tracing::{debug, trace, warn};

/// Counters kept while decoding
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeStats {
    /// Frames handed to the engine and decoded
    pub frames_decoded: usize,

    /// Bytes discarded while resynchronizing
    pub bytes_skipped: usize,

    /// Frames the engine reported as corrupted
    pub corrupted_frames: usize,

    /// Headers found at end of stream without a complete frame behind them
    pub truncated_frames: usize,
}

/// Decoder turning a compressed byte source into 16-bit PCM
///
/// Stream parameters come from the first header found in the first chunk
/// pulled from the source, and never change afterwards.
pub struct Decoder<S, C = SilenceCodec> {
    source: S,
    codec: C,
    input: BytesMut,
    output: BytesMut,
    eof: bool,
    first: Option<FrameHeader>,
    stats: DecodeStats,
}

impl<S: ByteSource> Decoder<S, SilenceCodec> {
    /// Create a decoder backed by [`SilenceCodec`], which renders every
    /// frame as silence. Use [`with_codec`](Decoder::with_codec) with a real
    /// engine (`MpaCodec` under the `mpa` feature) to hear the audio.
    pub fn new(source: S) -> Self {
        Self::with_codec(source, SilenceCodec::new())
    }
}

impl<S: ByteSource, C: FrameDecoder> Decoder<S, C> {
    /// Create a decoder backed by the given engine
    ///
    /// Pulls the first chunk from the source. A failing source does not fail
    /// construction; the stream is reported invalid and the failure shows up
    /// on the first [`read`](Decoder::read).
    pub fn with_codec(source: S, codec: C) -> Self {
        let mut decoder = Self {
            source,
            codec,
            input: BytesMut::with_capacity(DECODER_CHUNK_SIZE),
            output: BytesMut::new(),
            eof: false,
            first: None,
            stats: DecodeStats::default(),
        };

        match decoder.fill() {
            Ok(_) => {
                decoder.first = next_header(&decoder.input, 0).map(|(_, header)| header);

                #[cfg(feature = "logging")]
                decoder.log_stream_parameters();
            }
            Err(_e) => {
                #[cfg(feature = "logging")]
                warn!("Byte source failed on first read: {:?}", _e);
            }
        }

        decoder
    }

    #[cfg(feature = "logging")]
    fn log_stream_parameters(&self) {
        match &self.first {
            Some(h) => debug!(
                "Stream is MPEG {} layer {}, {} kbps, {} Hz",
                h.version,
                h.layer.number(),
                h.bitrate_kbps(),
                h.sample_rate
            ),
            None => debug!("No frame header in the first {} bytes", self.input.len()),
        }
    }

    /// Whether the first chunk contained a frame header
    pub fn is_valid(&self) -> bool {
        self.first.is_some()
    }

    /// Header that fixed the stream parameters
    pub fn header(&self) -> Option<&FrameHeader> {
        self.first.as_ref()
    }

    /// Channel count, 0 if invalid
    pub fn channels(&self) -> u8 {
        self.first.map_or(0, |h| h.channels())
    }

    /// Sample rate in Hz, 0 if invalid
    pub fn sample_rate(&self) -> u32 {
        self.first.map_or(0, |h| h.sample_rate)
    }

    /// Bitrate in kbps, 0 if invalid
    pub fn bit_rate(&self) -> u32 {
        self.first.map_or(0, |h| h.bitrate_kbps())
    }

    /// Channel mode code (0..=3), 0 if invalid
    pub fn mode(&self) -> u8 {
        self.first.map_or(0, |h| h.channel_mode.code())
    }

    /// Layer number (1..=3), 0 if invalid
    pub fn layer(&self) -> u8 {
        self.first.map_or(0, |h| h.layer.number())
    }

    /// Number of frames decoded so far
    pub fn frame_count(&self) -> usize {
        self.stats.frames_decoded
    }

    /// Decoding counters
    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }

    /// Read up to `max_len` bytes of PCM.
    ///
    /// Returns an empty buffer only once the source is exhausted and no
    /// further frame can be synchronized.
    pub fn read(&mut self, max_len: usize) -> Result<Bytes, Mp3Error> {
        while self.output.len() < max_len {
            if !self.decode_next_frame()? {
                break;
            }
        }

        let n = max_len.min(self.output.len());
        Ok(self.output.split_to(n).freeze())
    }

    /// Pull one chunk from the source into the input buffer
    fn fill(&mut self) -> Result<usize, Mp3Error> {
        let chunk = self.source.read(DECODER_CHUNK_SIZE)?;
        if chunk.len() > DECODER_CHUNK_SIZE {
            return Err(Mp3Error::MalformedSource(format!(
                "read({}) returned {} bytes",
                DECODER_CHUNK_SIZE,
                chunk.len()
            )));
        }

        if chunk.is_empty() {
            self.eof = true;
        }
        self.input.extend_from_slice(&chunk);
        Ok(chunk.len())
    }

    fn skip(&mut self, n: usize) {
        self.input.advance(n);
        self.stats.bytes_skipped += n;
    }

    /// Advance the cursor to the next parseable header, pulling input as needed
    fn resync(&mut self) -> Result<Option<FrameHeader>, Mp3Error> {
        loop {
            if let Some((pos, header)) = next_header(&self.input, 0) {
                if pos > 0 {
                    #[cfg(feature = "logging")]
                    trace!("Skipped {} bytes before frame header", pos);

                    self.skip(pos);
                }
                return Ok(Some(header));
            }

            if self.eof {
                let rest = self.input.len();
                self.skip(rest);
                return Ok(None);
            }

            // A header may straddle two reads
            let keep = self.input.len().min(HEADER_SIZE - 1);
            let drop = self.input.len() - keep;
            self.skip(drop);
            self.fill()?;
        }
    }

    /// Decode one frame into the output buffer; false once nothing is left
    fn decode_next_frame(&mut self) -> Result<bool, Mp3Error> {
        loop {
            let header = match self.resync()? {
                Some(header) => header,
                None => return Ok(false),
            };

            let len = header.frame_length;
            while self.input.len() < len && !self.eof {
                self.fill()?;
            }
            if self.input.len() < len {
                #[cfg(feature = "logging")]
                debug!(
                    "Dropping truncated frame: {} of {} bytes",
                    self.input.len(),
                    len
                );

                self.stats.truncated_frames += 1;
                self.skip(1);
                continue;
            }

            match self
                .codec
                .decode_frame(&header, &self.input[..len], &mut self.output)?
            {
                FrameOutcome::Decoded => {
                    self.input.advance(len);
                    self.stats.frames_decoded += 1;
                    return Ok(true);
                }
                FrameOutcome::Corrupted => {
                    #[cfg(feature = "logging")]
                    trace!("Engine rejected frame, resynchronizing");

                    self.stats.corrupted_frames += 1;
                    self.skip(1);
                }
            }
        }
    }
}
