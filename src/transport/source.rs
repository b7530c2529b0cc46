//! Byte sources and sinks consumed by the codec

use memmap2::{MmapMut, MmapOptions};
use std::fs::File;
use std::io::{self, Cursor, Read, Seek, Write};
use tracing::{debug, warn};

/// Readable source of an npy file
pub trait ByteSource: Read {
    /// Bytes remaining from the current read position, if known
    fn size(&mut self) -> Option<u64>;

    /// Map the whole backing store privately (copy-on-write), if supported.
    ///
    /// Writes through the mapping never reach the store.
    fn map_if_possible(&mut self) -> Option<MmapMut> {
        None
    }
}

impl ByteSource for File {
    fn size(&mut self) -> Option<u64> {
        let metadata = self.metadata().ok()?;
        if !metadata.is_file() {
            return None;
        }
        let position = self.stream_position().ok()?;
        Some(metadata.len().saturating_sub(position))
    }

    fn map_if_possible(&mut self) -> Option<MmapMut> {
        let metadata = self.metadata().ok()?;
        if !metadata.is_file() {
            debug!("source is not a regular file, not mapping");
            return None;
        }
        // The mapping always starts at offset 0
        if self.stream_position().ok()? != 0 {
            debug!("source is not at its start, not mapping");
            return None;
        }

        // SAFETY: the mapping is private; concurrent modification of the file
        // by another process is outside what the codec can guard against.
        match unsafe { MmapOptions::new().map_copy(&*self) } {
            Ok(map) => Some(map),
            Err(e) => {
                warn!("mapping failed, falling back to buffered reads: {}", e);
                None
            }
        }
    }
}

impl<T: AsRef<[u8]>> ByteSource for Cursor<T> {
    fn size(&mut self) -> Option<u64> {
        let len = self.get_ref().as_ref().len() as u64;
        Some(len.saturating_sub(self.position()))
    }
}

impl ByteSource for &[u8] {
    fn size(&mut self) -> Option<u64> {
        Some(self.len() as u64)
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn size(&mut self) -> Option<u64> {
        (**self).size()
    }

    fn map_if_possible(&mut self) -> Option<MmapMut> {
        (**self).map_if_possible()
    }
}

/// Adapter for readers of unknown length such as pipes or sockets
#[derive(Debug)]
pub struct StreamSource<R> {
    inner: R,
}

impl<R: Read> StreamSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for StreamSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Read> ByteSource for StreamSource<R> {
    fn size(&mut self) -> Option<u64> {
        None
    }
}

/// Writable destination of an npy file
///
/// One call, one write: a short count is reported back, never retried.
pub trait ByteSink {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<usize>;
}

impl<W: Write + ?Sized> ByteSink for W {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.write(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::SeekFrom;

    #[test]
    fn test_cursor_size_tracks_position() {
        let mut cursor = Cursor::new(vec![0u8; 10]);
        assert_eq!(cursor.size(), Some(10));
        cursor.set_position(4);
        assert_eq!(cursor.size(), Some(6));
        assert!(cursor.map_if_possible().is_none());
    }

    #[test]
    fn test_stream_has_no_size() {
        let mut stream = StreamSource::new(&b"abc"[..]);
        assert_eq!(stream.size(), None);
        assert!(stream.map_if_possible().is_none());
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, b"abc");
    }

    #[test]
    fn test_file_maps_privately() {
        let mut tmp = tempfile::tempfile().unwrap();
        tmp.write_all(b"0123456789abcdef").unwrap();
        tmp.seek(SeekFrom::Start(0)).unwrap();

        assert_eq!(tmp.size(), Some(16));
        let mut map = tmp.map_if_possible().unwrap();
        assert_eq!(&map[..4], b"0123");

        // Private mapping: edits stay in memory
        map[0] = b'X';
        let mut on_disk = Vec::new();
        tmp.read_to_end(&mut on_disk).unwrap();
        assert_eq!(&on_disk[..4], b"0123");
    }

    #[test]
    fn test_file_not_at_start_is_not_mapped() {
        let mut tmp = tempfile::tempfile().unwrap();
        tmp.write_all(b"0123456789abcdef").unwrap();
        tmp.seek(SeekFrom::Start(4)).unwrap();
        assert_eq!(tmp.size(), Some(12));
        assert!(tmp.map_if_possible().is_none());
    }

    #[test]
    fn test_short_write_is_reported() {
        struct Short;
        impl Write for Short {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                Ok(buf.len() / 2)
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }
        assert_eq!(Short.write_bytes(&[0u8; 8]).unwrap(), 4);
    }
}
