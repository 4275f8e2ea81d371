//! Pull-based byte sources feeding the decode pump

use crate::error::Mp3Error;
use bytes::Bytes;

#[cfg(feature = "std")]
use alloc::format;
#[cfg(feature = "std")]
use alloc::vec::Vec;

/// A supplier of compressed bytes.
///
/// `read(max_len)` returns at most `max_len` bytes. An empty result means end
/// of stream. Returning more than requested is a contract violation and is
/// reported by the pump as [`Mp3Error::MalformedSource`].
pub trait ByteSource {
    /// Pull the next chunk
    fn read(&mut self, max_len: usize) -> Result<Bytes, Mp3Error>;
}

#[cfg(feature = "std")]
impl<R: std::io::Read> ByteSource for R {
    fn read(&mut self, max_len: usize) -> Result<Bytes, Mp3Error> {
        let mut buf = alloc::vec![0u8; max_len];
        loop {
            match std::io::Read::read(self, &mut buf) {
                Ok(n) => {
                    buf.truncate(n);
                    return Ok(Bytes::from(buf));
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Mp3Error::MalformedSource(format!("{}", e))),
            }
        }
    }
}

/// Source backed by a closure returning owned chunks
///
/// Useful for sources that do not fit `std::io::Read`, such as chunked
/// network bodies. Errors from the closure become
/// [`Mp3Error::MalformedSource`].
#[cfg(feature = "std")]
pub struct FnSource<F> {
    pull: F,
}

#[cfg(feature = "std")]
impl<F> FnSource<F>
where
    F: FnMut(usize) -> std::io::Result<Vec<u8>>,
{
    /// Wrap a pull closure
    pub fn new(pull: F) -> Self {
        Self { pull }
    }
}

#[cfg(feature = "std")]
impl<F> ByteSource for FnSource<F>
where
    F: FnMut(usize) -> std::io::Result<Vec<u8>>,
{
    fn read(&mut self, max_len: usize) -> Result<Bytes, Mp3Error> {
        (self.pull)(max_len)
            .map(Bytes::from)
            .map_err(|e| Mp3Error::MalformedSource(format!("{}", e)))
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reader_source_chunks() {
        let mut src = Cursor::new(vec![1u8, 2, 3, 4, 5]);
        assert_eq!(ByteSource::read(&mut src, 3).unwrap().as_ref(), &[1, 2, 3]);
        assert_eq!(ByteSource::read(&mut src, 3).unwrap().as_ref(), &[4, 5]);
        assert!(ByteSource::read(&mut src, 3).unwrap().is_empty());
    }

    #[test]
    fn test_fn_source_maps_errors() {
        let mut src = FnSource::new(|_| {
            Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Invalid Input",
            ))
        });
        assert!(matches!(
            src.read(16),
            Err(Mp3Error::MalformedSource(msg)) if msg.contains("Invalid Input")
        ));
    }
}
