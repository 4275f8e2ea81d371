//! Error types for mp3sync operations

use alloc::string::String;

/// Errors that can occur while synchronizing, probing, decoding or encoding
#[cfg_attr(feature = "std", derive(thiserror::Error))]
#[derive(Debug, Clone, PartialEq)]
pub enum Mp3Error {
    /// No valid (and, when required, confirmed) frame header in the scanned window
    #[cfg_attr(feature = "std", error("can't sync to an MPEG frame"))]
    HeaderNotFound,

    /// The byte source violated the read contract
    #[cfg_attr(feature = "std", error("Malformed byte source: {0}"))]
    MalformedSource(String),

    /// Failure reported by the codec engine
    #[cfg_attr(feature = "std", error("Codec engine failure: {0}"))]
    Codec(String),

    /// Rejected encoder configuration
    #[cfg_attr(feature = "std", error("Invalid encoder configuration: {0}"))]
    Config(String),

    /// IO error while probing a seekable source
    #[cfg_attr(feature = "std", error("IO error: {0}"))]
    Io(String),
}

#[cfg(feature = "std")]
impl From<std::io::Error> for Mp3Error {
    fn from(err: std::io::Error) -> Self {
        Mp3Error::Io(err.to_string())
    }
}

/// Reason a 32-bit word is not a usable frame header
#[cfg_attr(feature = "std", derive(thiserror::Error))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderRejection {
    /// The top 11 bits are not all set
    #[cfg_attr(feature = "std", error("missing frame sync"))]
    BadSync,

    /// Version code 1 is reserved
    #[cfg_attr(feature = "std", error("reserved MPEG version"))]
    ReservedVersion,

    /// Layer code 0 is reserved
    #[cfg_attr(feature = "std", error("reserved layer"))]
    ReservedLayer,

    /// Bitrate index 0 (free format) or 15
    #[cfg_attr(feature = "std", error("reserved bitrate index"))]
    ReservedBitrate,

    /// Sample rate index 3
    #[cfg_attr(feature = "std", error("reserved sample rate index"))]
    ReservedSampleRate,
}
