//! Stream probing over seekable sources
//!
//! Finds a confirmed frame at the caller's offset or, failing that, at 30%,
//! 60% and 90% of the stream, and estimates the playing time from the
//! bitrate of that frame.

use crate::constants::SYNC_WINDOW;
use crate::error::Mp3Error;
use crate::scanner::{find_frame, SyncPoint};
use crate::types::ProbeResult;
use std::io::{Cursor, Read, Seek, SeekFrom};

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// Offsets tried with confirmation, in order
pub fn candidate_offsets(offset: u64, file_size: u64) -> [u64; 4] {
    let at = |fraction: f64| (file_size as f64 * fraction) as u64;
    [offset, at(0.3), at(0.6), at(0.9)]
}

/// Run the synchronizer over the window starting at `offset`.
///
/// The returned position is absolute.
pub fn sync_at<R: Read + Seek>(
    reader: &mut R,
    offset: u64,
    confirm: bool,
) -> Result<SyncPoint, Mp3Error> {
    reader.seek(SeekFrom::Start(offset))?;

    let mut window = Vec::with_capacity(SYNC_WINDOW);
    reader.by_ref().take(SYNC_WINDOW as u64).read_to_end(&mut window)?;

    let point = find_frame(&window, confirm)?;
    Ok(SyncPoint {
        position: offset as usize + point.position,
        header: point.header,
    })
}

/// Probe a seekable stream for MPEG audio starting near `offset`
pub fn probe<R: Read + Seek>(reader: &mut R, offset: u64) -> Result<ProbeResult, Mp3Error> {
    let file_size = reader.seek(SeekFrom::End(0))?;

    for candidate in candidate_offsets(offset, file_size) {
        match sync_at(reader, candidate, true) {
            Ok(point) => return Ok(result(file_size, offset, candidate, point, false)),
            Err(Mp3Error::HeaderNotFound) => {
                #[cfg(feature = "logging")]
                debug!("No confirmed frame at offset {}", candidate);
            }
            Err(e) => return Err(e),
        }
    }

    let point = sync_at(reader, offset, false)?;

    #[cfg(feature = "logging")]
    warn!(
        "Accepting unconfirmed frame at {}; stream parameters may be wrong",
        point.position
    );

    Ok(result(file_size, offset, offset, point, true))
}

/// Probe an in-memory stream
pub fn probe_bytes(data: &[u8], offset: u64) -> Result<ProbeResult, Mp3Error> {
    probe(&mut Cursor::new(data), offset)
}

fn result(
    file_size: u64,
    offset: u64,
    candidate: u64,
    point: SyncPoint,
    sketchy: bool,
) -> ProbeResult {
    // Remaining bytes over the bitrate, not a frame count
    let length = 8.0 * file_size.saturating_sub(offset) as f64 / point.header.bitrate as f64;

    ProbeResult {
        file_size,
        offset: candidate,
        frame_offset: point.position as u64,
        sketchy,
        header: point.header,
        length,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{Encoder, FrameBuilder};
    use crate::types::{ChannelMode, MpegVersion};

    /// Records every absolute seek
    struct Recording<R> {
        inner: R,
        seeks: Vec<u64>,
    }

    impl<R: Read> Read for Recording<R> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            self.inner.read(buf)
        }
    }

    impl<R: Seek> Seek for Recording<R> {
        fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
            if let SeekFrom::Start(at) = pos {
                self.seeks.push(at);
            }
            self.inner.seek(pos)
        }
    }

    fn frames(count: usize) -> Vec<u8> {
        let frame = FrameBuilder::new().build().unwrap();
        frame.iter().copied().cycle().take(frame.len() * count).collect()
    }

    #[test]
    fn test_candidate_offsets() {
        assert_eq!(candidate_offsets(5, 1000), [5, 300, 600, 900]);
        assert_eq!(candidate_offsets(0, 7), [0, 2, 4, 6]);
    }

    #[test]
    fn test_probe_clean_stream() {
        let data = frames(10);
        let result = probe_bytes(&data, 0).unwrap();

        assert!(!result.sketchy);
        assert_eq!(result.offset, 0);
        assert_eq!(result.frame_offset, 0);
        assert_eq!(result.version(), 1.0);
        assert_eq!(result.layer(), 3);
        assert_eq!(result.bitrate(), 128_000);
        assert_eq!(result.sample_rate(), 44100);
        assert_eq!(result.mode(), 1);
        assert_eq!(result.file_size, 4170);
        assert!((result.length - 8.0 * 4170.0 / 128_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_probe_tries_offsets_in_order() {
        let data = vec![0u8; 10_000];
        let mut reader = Recording {
            inner: Cursor::new(data),
            seeks: Vec::new(),
        };

        assert!(matches!(probe(&mut reader, 17), Err(Mp3Error::HeaderNotFound)));
        assert_eq!(reader.seeks, vec![17, 3000, 6000, 9000, 17]);
    }

    #[test]
    fn test_probe_falls_back_to_later_offset() {
        // A lone frame fails confirmation and sinks the first attempt
        let mut data = frames(1);
        data.extend(vec![0u8; 3000]);
        data.extend(frames(10));
        let result = probe_bytes(&data, 0).unwrap();

        assert!(!result.sketchy);
        assert_eq!(result.file_size, 7587);
        assert_eq!(result.offset, 2276);
        assert_eq!(result.frame_offset, 3417);
        assert!((result.length - 8.0 * 7587.0 / 128_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_frame_is_sketchy() {
        let mut data = vec![0u8; 100];
        data.extend(frames(1));
        let result = probe_bytes(&data, 0).unwrap();

        assert!(result.sketchy);
        assert_eq!(result.offset, 0);
        assert_eq!(result.frame_offset, 100);
        assert!(result.summary().ends_with("(sketchy)"));
    }

    #[test]
    fn test_no_frames_at_all() {
        assert!(matches!(probe_bytes(&[0x55; 2048], 0), Err(Mp3Error::HeaderNotFound)));
        assert!(matches!(probe_bytes(&[], 0), Err(Mp3Error::HeaderNotFound)));
    }

    #[test]
    fn test_probe_encoded_mono_stream() {
        let mut encoder = Encoder::new();
        encoder.set_channels(1).unwrap();
        encoder.set_sample_rate(8000).unwrap();
        encoder.set_bit_rate(32).unwrap();

        // 100 frames of silence
        let samples = 576 * 100;
        encoder.write(&vec![0u8; samples * 2]).unwrap();
        encoder.flush().unwrap();
        let data = encoder.take_output();

        let result = probe_bytes(&data, 0).unwrap();
        assert_eq!(result.sample_rate(), 8000);
        assert_eq!(result.mode(), 3);
        assert_eq!(result.layer(), 3);
        assert_eq!(result.header.version, MpegVersion::Mpeg25);
        assert_eq!(result.header.channel_mode, ChannelMode::Mono);

        let expected = samples as f64 / 8000.0;
        assert!((result.length - expected).abs() < 0.2);
    }
}
