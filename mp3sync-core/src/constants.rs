//! Constants, lookup tables and limits for MPEG audio frame headers

/// The 11-bit frame sync pattern, aligned to the top of a 32-bit header word
pub const SYNC_MASK: u32 = 0xFFE0_0000;

/// The sync pattern as seen in the first two bytes of a frame (`0xFFE0` mask)
pub const SYNC_MASK_U16: u16 = 0xFFE0;

/// First byte of every frame header; the synchronizer searches for it
pub const SYNC_BYTE: u8 = 0xFF;

/// Size of a frame header in bytes
pub const HEADER_SIZE: usize = 4;

/// Bounded window scanned by a single synchronization attempt.
///
/// The longest frame (MPEG2.5 layer II, 160 kbps at 8 kHz, padded) is 2881
/// bytes, so two consecutive frames always fit.
pub const SYNC_WINDOW: usize = 32768;

/// Number of bytes skipped after a rejected sync candidate in the synchronizer
pub const SYNC_REJECT_SKIP: usize = 2;

/// Size of each raw chunk the streaming decoder pulls from its byte source.
///
/// A multiple of 4 that is large enough to swallow junk at the start of a file.
pub const DECODER_CHUNK_SIZE: usize = 5 * 8192;

/// Bytes per PCM sample (signed 16-bit little-endian)
pub const BYTES_PER_SAMPLE: usize = 2;

/// Channel mode code: stereo
pub const MODE_STEREO: u8 = 0;

/// Channel mode code: joint stereo
pub const MODE_JOINT_STEREO: u8 = 1;

/// Channel mode code: dual channel
pub const MODE_DUAL_CHANNEL: u8 = 2;

/// Channel mode code: single channel (mono)
pub const MODE_SINGLE_CHANNEL: u8 = 3;

/// Highest (slowest, worst) encoder quality value
pub const MAX_QUALITY: u8 = 9;

/// Bitrates in kbps indexed by `[version][layer][bitrate_index]`.
///
/// Version rows: MPEG1, MPEG2, MPEG2.5. Layer columns: I, II, III.
/// Index 0 (free format) and 15 are reserved and hold 0.
pub static BIT_RATES: [[[u32; 16]; 3]; 3] = [
    [
        // MPEG1 layer I
        [0, 32, 64, 96, 128, 160, 192, 224, 256, 288, 320, 352, 384, 416, 448, 0],
        // MPEG1 layer II
        [0, 32, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 384, 0],
        // MPEG1 layer III
        [0, 32, 40, 48, 56, 64, 80, 96, 112, 128, 160, 192, 224, 256, 320, 0],
    ],
    [
        // MPEG2 layer I
        [0, 32, 48, 56, 64, 80, 96, 112, 128, 144, 160, 176, 192, 224, 256, 0],
        // MPEG2 layer II
        [0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160, 0],
        // MPEG2 layer III
        [0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160, 0],
    ],
    [
        // MPEG2.5 layer I
        [0, 32, 48, 56, 64, 80, 96, 112, 128, 144, 160, 176, 192, 224, 256, 0],
        // MPEG2.5 layer II
        [0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160, 0],
        // MPEG2.5 layer III
        [0, 8, 16, 24, 32, 40, 48, 56, 64, 80, 96, 112, 128, 144, 160, 0],
    ],
];

/// Sample rates in Hz indexed by `[version][sample_rate_index]`
pub static SAMPLE_RATES: [[u32; 3]; 3] = [
    [44100, 48000, 32000], // MPEG1
    [22050, 24000, 16000], // MPEG2
    [11025, 12000, 8000],  // MPEG2.5
];
