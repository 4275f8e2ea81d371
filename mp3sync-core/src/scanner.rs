//! Frame synchronization over damaged or noisy input
//!
//! Two scanning policies live here and they are deliberately different:
//!
//! - [`find_frame`] searches a bounded window, skips 2 bytes past every
//!   rejected candidate and can demand that a second frame follows the first.
//! - [`next_header`], [`scan_stream`] and the streaming decoder advance one
//!   byte at a time and never look ahead.

use crate::constants::{
    HEADER_SIZE, SYNC_BYTE, SYNC_MASK_U16, SYNC_REJECT_SKIP, SYNC_WINDOW,
};
use crate::error::Mp3Error;
use crate::header::parse_header_bytes;
use crate::types::FrameHeader;
use alloc::vec::Vec;

#[cfg(feature = "logging")]
use tracing::{debug, trace};

/// A frame header accepted by the synchronizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncPoint {
    /// Position of the header relative to the start of the scanned data
    pub position: usize,

    /// The parsed header
    pub header: FrameHeader,
}

/// Search the first [`SYNC_WINDOW`] bytes of `data` for a frame header.
///
/// Candidates start at a `0xFF` byte. A candidate that fails to parse moves
/// the search 2 bytes forward. With `confirm` set, the accepted header must be
/// followed, `frame_length` bytes later, by another sync pattern; if that
/// lookahead fails the whole attempt fails and no later candidate is tried.
///
/// The lookahead may land up to 4 bytes past the end of the window and reads
/// from `data` beyond it when the caller supplied those bytes.
pub fn find_frame(data: &[u8], confirm: bool) -> Result<SyncPoint, Mp3Error> {
    let window = &data[..data.len().min(SYNC_WINDOW)];
    let mut candidate = find_sync_byte(window, 0);

    while let Some(pos) = candidate {
        if pos + HEADER_SIZE > window.len() {
            break;
        }

        match parse_header_bytes(&window[pos..]) {
            Ok(header) => {
                if confirm {
                    confirm_next_frame(data, window.len(), pos, &header)?;
                }

                #[cfg(feature = "logging")]
                debug!(
                    "Synchronized at offset {} ({} bytes/frame, confirmed: {})",
                    pos, header.frame_length, confirm
                );

                return Ok(SyncPoint {
                    position: pos,
                    header,
                });
            }
            Err(_rejection) => {
                #[cfg(feature = "logging")]
                trace!("Rejected sync candidate at {}: {:?}", pos, _rejection);

                candidate = find_sync_byte(window, pos + SYNC_REJECT_SKIP);
            }
        }
    }

    Err(Mp3Error::HeaderNotFound)
}

/// Require a sync pattern where the frame at `pos` says the next one starts
fn confirm_next_frame(
    data: &[u8],
    window_len: usize,
    pos: usize,
    header: &FrameHeader,
) -> Result<(), Mp3Error> {
    let next = pos + header.frame_length;
    if next > window_len + HEADER_SIZE {
        #[cfg(feature = "logging")]
        debug!("Second frame at {} lies beyond the scan window", next);
        return Err(Mp3Error::HeaderNotFound);
    }

    let bytes = data.get(next..next + 2).ok_or(Mp3Error::HeaderNotFound)?;
    let word = u16::from_be_bytes([bytes[0], bytes[1]]);
    if word & SYNC_MASK_U16 != SYNC_MASK_U16 {
        #[cfg(feature = "logging")]
        debug!("No sync at second frame position {} (found {:#06x})", next, word);
        return Err(Mp3Error::HeaderNotFound);
    }

    Ok(())
}

/// Find the next `0xFF` byte at or after `from`
fn find_sync_byte(data: &[u8], from: usize) -> Option<usize> {
    if from >= data.len() {
        return None;
    }
    memchr::memchr(SYNC_BYTE, &data[from..]).map(|p| from + p)
}

/// Find the first position at or after `from` holding a parseable header.
///
/// Rejected candidates advance the search by a single byte.
pub fn next_header(data: &[u8], from: usize) -> Option<(usize, FrameHeader)> {
    let mut candidate = find_sync_byte(data, from);

    while let Some(pos) = candidate {
        if pos + HEADER_SIZE > data.len() {
            return None;
        }
        if let Ok(header) = parse_header_bytes(&data[pos..]) {
            return Some((pos, header));
        }
        candidate = find_sync_byte(data, pos + 1);
    }

    None
}

/// A frame found at a specific offset in a buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedFrame {
    /// Byte offset of the frame header
    pub offset: usize,

    /// The parsed header
    pub header: FrameHeader,

    /// Frame size in bytes
    pub size: usize,
}

/// Walk a buffer frame by frame, resynchronizing byte by byte over damage
///
/// This function:
/// 1. Searches for a parseable header starting at the cursor
/// 2. Accepts it if the whole frame fits in the buffer
/// 3. Jumps past the accepted frame, or one byte past a rejected one
///
/// Corrupted or truncated spans are skipped, never reported as errors.
pub fn scan_stream(data: &[u8]) -> Vec<LocatedFrame> {
    scan_stream_with_stats(data).0
}

/// Scan statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Total bytes scanned
    pub bytes_scanned: usize,

    /// Number of frames located
    pub frames_found: usize,

    /// Headers that parsed but whose frame ran past the end of the buffer
    pub truncated_frames: usize,

    /// Bytes not covered by any located frame
    pub bytes_skipped: usize,

    /// Total bytes covered by located frames
    pub bytes_recovered: usize,
}

impl ScanStats {
    /// Calculate recovery rate as a percentage
    pub fn recovery_rate(&self) -> f64 {
        if self.bytes_scanned == 0 {
            0.0
        } else {
            (self.bytes_recovered as f64 / self.bytes_scanned as f64) * 100.0
        }
    }
}

/// Scan stream with statistics
pub fn scan_stream_with_stats(data: &[u8]) -> (Vec<LocatedFrame>, ScanStats) {
    let mut stats = ScanStats {
        bytes_scanned: data.len(),
        ..Default::default()
    };
    let mut results = Vec::new();
    let mut pos = 0;

    #[cfg(feature = "logging")]
    debug!("Starting frame scan of {} bytes", data.len());

    while let Some((at, header)) = next_header(data, pos) {
        if at + header.frame_length > data.len() {
            #[cfg(feature = "logging")]
            debug!(
                "Frame at {} needs {} bytes, only {} left",
                at,
                header.frame_length,
                data.len() - at
            );

            stats.truncated_frames += 1;
            pos = at + 1;
            continue;
        }

        stats.bytes_recovered += header.frame_length;
        results.push(LocatedFrame {
            offset: at,
            header,
            size: header.frame_length,
        });
        pos = at + header.frame_length;
    }

    stats.frames_found = results.len();
    stats.bytes_skipped = data.len() - stats.bytes_recovered;

    #[cfg(feature = "logging")]
    debug!(
        "Scan complete: found {} frames, skipped {} bytes",
        stats.frames_found, stats.bytes_skipped
    );

    (results, stats)
}
