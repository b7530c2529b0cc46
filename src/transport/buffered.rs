//! Sequential-read transport for sources that cannot be mapped

use super::{ByteSource, Transport, check_alignment};
use crate::config::LoadOptions;
use crate::error::{NpyError, Result};
use crate::parser::{Prelude, check_header_len, parse_header_text, parse_magic_version, parse_prelude};
use crate::types::{Header, PRELUDE_SIZE_V2, Payload};
use std::io::{self, Read};
use tracing::trace;

/// Reads prelude, header and payload front to back into heap buffers
pub struct BufferedTransport<S> {
    source: S,
    /// Bytes the source had left when the transport was created
    available: Option<u64>,
}

impl<S: ByteSource> BufferedTransport<S> {
    pub fn new(mut source: S) -> Self {
        let available = source.size();
        Self { source, available }
    }
}

/// Read until `buf` is full or the source ends; returns bytes read
fn read_full<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Read up to `len` bytes into a fresh buffer.
///
/// Capacity is reserved up front, reporting failure instead of aborting, but
/// memory is only written as bytes arrive; a short source yields a short
/// buffer.
fn read_up_to<R: Read + ?Sized>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| NpyError::OutOfMemory {
            requested: Some(len),
        })?;
    reader.take(len as u64).read_to_end(&mut buf)?;
    Ok(buf)
}

impl<S: ByteSource> Transport<'static> for BufferedTransport<S> {
    fn name(&self) -> &'static str {
        "buffered"
    }

    fn read_header(&mut self, options: &LoadOptions) -> Result<(Prelude, Header)> {
        // Magic and version first; they decide how wide the length field is
        let mut prelude_buf = [0u8; PRELUDE_SIZE_V2];
        let n = read_full(&mut self.source, &mut prelude_buf[..8])?;
        let (_, prelude_size) = parse_magic_version(&prelude_buf[..n])?;

        let n = read_full(&mut self.source, &mut prelude_buf[8..prelude_size])?;
        let prelude = parse_prelude(&prelude_buf[..8 + n])?;
        check_header_len(&prelude, options)?;

        let text = read_up_to(&mut self.source, prelude.header_len)?;
        if text.len() < prelude.header_len {
            return Err(NpyError::Truncated {
                expected: prelude.payload_offset() as u64,
                actual: (prelude.consumed + text.len()) as u64,
            });
        }

        let header = parse_header_text(&text, options)?;
        trace!(?prelude, ?header, "parsed buffered header");
        Ok((prelude, header))
    }

    fn acquire_payload(mut self, prelude: &Prelude, len: usize) -> Result<Payload<'static>> {
        check_alignment(prelude)?;

        if let Some(available) = self.available {
            let remaining = available.saturating_sub(prelude.payload_offset() as u64);
            if remaining != len as u64 {
                return Err(NpyError::SizeMismatch {
                    expected: len as u64,
                    actual: remaining,
                });
            }
        }

        let data = read_up_to(&mut self.source, len)?;
        if data.len() != len {
            return Err(NpyError::Truncated {
                expected: len as u64,
                actual: data.len() as u64,
            });
        }
        Ok(Payload::Owned(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::StreamSource;
    use crate::types::{MAGIC, Ownership};
    use std::io::Cursor;

    // 10 + 54 = 64 bytes of prelude and header
    const HEADER: &str = "{'descr':'<u2', 'fortran_order': False, 'shape':(2,)}\n";

    fn npy(payload: &[u8]) -> Vec<u8> {
        let mut bytes = MAGIC.to_vec();
        bytes.extend_from_slice(&[1, 0]);
        bytes.extend_from_slice(&(HEADER.len() as u16).to_le_bytes());
        bytes.extend_from_slice(HEADER.as_bytes());
        bytes.extend_from_slice(payload);
        bytes
    }

    fn load<S: ByteSource>(source: S) -> Result<Payload<'static>> {
        let mut transport = BufferedTransport::new(source);
        let (prelude, header) = transport.read_header(&LoadOptions::default())?;
        let len = header.payload_len()?;
        transport.acquire_payload(&prelude, len)
    }

    #[test]
    fn test_reads_payload() {
        let payload = load(Cursor::new(npy(&[1, 0, 2, 0]))).unwrap();
        assert_eq!(payload.ownership(), Ownership::Owned);
        assert_eq!(payload.as_bytes(), &[1, 0, 2, 0]);
    }

    #[test]
    fn test_known_size_must_match() {
        assert!(matches!(
            load(Cursor::new(npy(&[1, 0, 2]))),
            Err(NpyError::SizeMismatch { expected: 4, actual: 3 })
        ));
        assert!(matches!(
            load(Cursor::new(npy(&[1, 0, 2, 0, 9]))),
            Err(NpyError::SizeMismatch { expected: 4, actual: 5 })
        ));
    }

    #[test]
    fn test_stream_truncated() {
        let bytes = npy(&[1, 0, 2]);
        assert!(matches!(
            load(StreamSource::new(&bytes[..])),
            Err(NpyError::Truncated { expected: 4, actual: 3 })
        ));
    }

    #[test]
    fn test_stream_trailing_bytes_are_not_read() {
        let bytes = npy(&[1, 0, 2, 0, 9, 9]);
        let payload = load(StreamSource::new(&bytes[..])).unwrap();
        assert_eq!(payload.as_bytes(), &[1, 0, 2, 0]);
    }

    #[test]
    fn test_large_declared_payload_on_empty_stream() {
        let mut text = "{'descr':'<u1', 'fortran_order': False, 'shape':(536870912,)}".to_string();
        while (10 + text.len() + 1) % 16 != 0 {
            text.push(' ');
        }
        text.push('\n');
        let mut bytes = MAGIC.to_vec();
        bytes.extend_from_slice(&[1, 0]);
        bytes.extend_from_slice(&(text.len() as u16).to_le_bytes());
        bytes.extend_from_slice(text.as_bytes());

        assert!(matches!(
            load(StreamSource::new(&bytes[..])),
            Err(NpyError::Truncated { expected: 536870912, actual: 0 })
        ));
    }

    #[test]
    fn test_read_up_to_stops_at_source_end() {
        let buf = read_up_to(&mut &b"abc"[..], 1 << 20).unwrap();
        assert_eq!(buf, b"abc");
        assert!(buf.capacity() >= 1 << 20);

        let buf = read_up_to(&mut &b"abcdef"[..], 4).unwrap();
        assert_eq!(buf, b"abcd");
    }

    #[test]
    fn test_header_truncated() {
        let bytes = npy(&[]);
        assert!(matches!(
            load(StreamSource::new(&bytes[..40])),
            Err(NpyError::Truncated { expected: 64, actual: 40 })
        ));
    }

    #[test]
    fn test_short_prelude() {
        assert!(matches!(
            load(StreamSource::new(&b"\x93NU"[..])),
            Err(NpyError::InvalidMagic)
        ));
        assert!(matches!(
            load(StreamSource::new(&b"\x93NUMPY\x01\x00\x05"[..])),
            Err(NpyError::Truncated { expected: 10, actual: 9 })
        ));
    }

    #[test]
    fn test_header_limit_checked_before_reading() {
        let mut bytes = MAGIC.to_vec();
        bytes.extend_from_slice(&[2, 0]);
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            load(StreamSource::new(&bytes[..])),
            Err(NpyError::HeaderTooLarge { .. })
        ));
    }

    #[test]
    fn test_read_full_retries_interrupts() {
        struct Flaky {
            calls: usize,
        }
        impl Read for Flaky {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                self.calls += 1;
                if self.calls == 1 {
                    return Err(io::Error::from(io::ErrorKind::Interrupted));
                }
                buf[0] = 7;
                Ok(1)
            }
        }
        let mut buf = [0u8; 3];
        assert_eq!(read_full(&mut Flaky { calls: 0 }, &mut buf).unwrap(), 3);
        assert_eq!(buf, [7, 7, 7]);
    }
}
