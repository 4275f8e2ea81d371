//! Layer I/II/III decoding engine backed by symphonia
//!
//! [`MpaCodec`] plugs symphonia's MPEG audio decoder into the decode pump.
//! Each synchronized frame becomes one packet; the inner decoder is rebuilt
//! whenever the layer, sample rate or channel count changes, since it keeps
//! one signal layout and one layer for its whole life.

use crate::codec::{FrameDecoder, FrameOutcome};
use crate::error::Mp3Error;
use crate::types::{FrameHeader, Layer};
use alloc::boxed::Box;
use alloc::format;
use bytes::{BufMut, BytesMut};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{
    CodecParameters, Decoder, DecoderOptions, CODEC_TYPE_MP1, CODEC_TYPE_MP2, CODEC_TYPE_MP3,
};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::Packet;

#[cfg(feature = "logging")]
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StreamKey {
    layer: Layer,
    sample_rate: u32,
    channels: u8,
}

impl StreamKey {
    fn of(header: &FrameHeader) -> Self {
        Self {
            layer: header.layer,
            sample_rate: header.sample_rate,
            channels: header.channels(),
        }
    }
}

/// Engine decoding real MPEG audio to interleaved 16-bit PCM
#[derive(Default)]
pub struct MpaCodec {
    engine: Option<(StreamKey, Box<dyn Decoder>)>,
    samples: Option<SampleBuffer<i16>>,
    timestamp: u64,
}

impl MpaCodec {
    /// Create a new engine; the inner decoder is built on the first frame
    pub fn new() -> Self {
        Self::default()
    }
}

fn make_engine(layer: Layer) -> Result<Box<dyn Decoder>, Mp3Error> {
    let codec = match layer {
        Layer::Layer1 => CODEC_TYPE_MP1,
        Layer::Layer2 => CODEC_TYPE_MP2,
        Layer::Layer3 => CODEC_TYPE_MP3,
    };
    let mut params = CodecParameters::new();
    params.for_codec(codec);

    symphonia::default::get_codecs()
        .make(&params, &DecoderOptions::default())
        .map_err(|e| Mp3Error::Codec(format!("no decoder for layer {}: {}", layer.number(), e)))
}

impl FrameDecoder for MpaCodec {
    fn decode_frame(
        &mut self,
        header: &FrameHeader,
        frame: &[u8],
        out: &mut BytesMut,
    ) -> Result<FrameOutcome, Mp3Error> {
        let key = StreamKey::of(header);
        let stale = !matches!(&self.engine, Some((current, _)) if *current == key);
        if stale {
            #[cfg(feature = "logging")]
            debug!(
                "Starting layer {} decoder at {} Hz, {} channel(s)",
                key.layer.number(),
                key.sample_rate,
                key.channels
            );

            self.engine = Some((key, make_engine(header.layer)?));
            self.samples = None;
        }
        let engine = match self.engine.as_mut() {
            Some((_, engine)) => engine,
            None => return Err(Mp3Error::Codec("decoder not initialized".into())),
        };

        let packet = Packet::new_from_slice(
            0,
            self.timestamp,
            header.frame_sample_count as u64,
            frame,
        );
        let decoded = match engine.decode(&packet) {
            Ok(decoded) => decoded,
            Err(
                _e @ (SymphoniaError::DecodeError(_)
                | SymphoniaError::IoError(_)
                | SymphoniaError::Unsupported(_)),
            ) => {
                #[cfg(feature = "logging")]
                trace!("Frame did not decode: {}", _e);

                return Ok(FrameOutcome::Corrupted);
            }
            Err(e) => return Err(Mp3Error::Codec(format!("{}", e))),
        };

        let spec = *decoded.spec();
        let capacity = decoded.capacity() as u64;
        let buf = self
            .samples
            .get_or_insert_with(|| SampleBuffer::<i16>::new(capacity, spec));
        buf.copy_interleaved_ref(decoded);
        for &sample in buf.samples() {
            out.put_i16_le(sample);
        }

        self.timestamp += header.frame_sample_count as u64;
        Ok(FrameOutcome::Decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::Decoder as Pump;
    use crate::encoder::{Encoder, FrameBuilder};
    use crate::header::parse_header_bytes;
    use crate::types::{ChannelMode, MpegVersion};
    use alloc::vec;
    use std::io::Cursor;

    fn silent_mp3(channels: u8, frames: usize) -> bytes::Bytes {
        let mut encoder = Encoder::new();
        encoder.set_channels(channels).unwrap();
        encoder.set_sample_rate(44100).unwrap();
        encoder.set_bit_rate(128).unwrap();
        encoder
            .write(&vec![0u8; 1152 * 2 * channels as usize * frames])
            .unwrap();
        encoder.take_output()
    }

    #[test]
    fn test_decodes_encoded_frames() {
        let mp3 = silent_mp3(2, 6);
        let mut pump = Pump::with_codec(Cursor::new(mp3.to_vec()), MpaCodec::new());
        assert_eq!(pump.channels(), 2);

        let mut pcm = vec![];
        loop {
            let chunk = pump.read(4096).unwrap();
            if chunk.is_empty() {
                break;
            }
            pcm.extend_from_slice(&chunk);
        }

        assert_eq!(pump.frame_count(), 6);
        assert_eq!(pcm.len(), 6 * 1152 * 2 * 2);
        assert!(pcm.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_garbage_body_is_corrupted() {
        // Side information claiming far more main data than the frame holds
        let frame = FrameBuilder::new()
            .version(MpegVersion::Mpeg1)
            .channel_mode(ChannelMode::Mono)
            .payload(bytes::Bytes::from(vec![0xFF; 64]))
            .build()
            .unwrap();
        let header = parse_header_bytes(&frame).unwrap();

        let mut out = BytesMut::new();
        let outcome = MpaCodec::new()
            .decode_frame(&header, &frame, &mut out)
            .unwrap();
        assert_eq!(outcome, FrameOutcome::Corrupted);
        assert!(out.is_empty());
    }

    #[test]
    fn test_rebuilds_on_layout_change() {
        let mut codec = MpaCodec::new();
        let mut out = BytesMut::new();

        for channels in [2u8, 1] {
            let mp3 = silent_mp3(channels, 1);
            let header = parse_header_bytes(&mp3).unwrap();
            let outcome = codec
                .decode_frame(&header, &mp3[..header.frame_length], &mut out)
                .unwrap();
            assert_eq!(outcome, FrameOutcome::Decoded);
        }

        assert_eq!(out.len(), 1152 * 2 * 2 + 1152 * 2);
    }
}
