//! # mp3sync Core
//!
//! Frame synchronization, probing and streaming pumps for MPEG audio
//! (layers I, II and III) over damaged or noisy byte streams.
//!
//! ## Modules
//!
//! - `constants`: Sync constants and bitrate/sample rate tables
//! - `types`: Core types (FrameHeader, ProbeResult)
//! - `header`: Bit-exact header parsing
//! - `scanner`: Bounded synchronization and frame walking
//! - `prober`: Offset-retry probing of seekable sources (`std` only)
//! - `source`: Pull-based byte sources
//! - `codec`: Codec engine traits and the silence engine
//! - `decoder`: Streaming decode pump
//! - `mpa`: Real layer I/II/III decoding engine (`mpa` feature)
//! - `encoder`: Frame building and the streaming encode pump

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod codec;
pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod header;
#[cfg(feature = "mpa")]
pub mod mpa;
#[cfg(feature = "std")]
pub mod prober;
pub mod scanner;
pub mod source;
pub mod types;

// Re-export commonly used types
pub use codec::{EncoderConfig, FrameDecoder, FrameEncoder, FrameOutcome, SilenceCodec};
pub use decoder::Decoder;
pub use encoder::{Encoder, FrameBuilder};
pub use error::{HeaderRejection, Mp3Error};
pub use header::parse_header;
#[cfg(feature = "mpa")]
pub use mpa::MpaCodec;
#[cfg(feature = "std")]
pub use prober::{probe, probe_bytes};
pub use scanner::{find_frame, scan_stream, scan_stream_with_stats};
pub use source::ByteSource;
#[cfg(feature = "std")]
pub use source::FnSource;
pub use types::{ChannelMode, FrameHeader, Layer, MpegVersion, ProbeResult};

/// Result type alias for mp3sync operations
pub type Result<T> = core::result::Result<T, Mp3Error>;
