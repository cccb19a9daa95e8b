use crate::error::{Error, Result};
use std::io::Write;

/// Window size fixed by RFC 1951
pub const DICTIONARY_SIZE: usize = 32768;

const MASK: usize = DICTIONARY_SIZE - 1;

/// Bytes handed to the sink per write during a back-reference copy
const COPY_CHUNK: usize = 258;

/// 32KB circular buffer for LZ77 sliding window
pub struct CircularDictionary {
    buffer: Box<[u8; DICTIONARY_SIZE]>,
    /// Next write position (0-32767)
    write_pos: usize,
    /// Total bytes ever written
    total_written: u64,
}

impl CircularDictionary {
    pub fn new() -> Self {
        Self { buffer: Box::new([0u8; DICTIONARY_SIZE]), write_pos: 0, total_written: 0 }
    }

    /// Add a single byte to the window
    #[inline]
    pub fn append(&mut self, byte: u8) {
        self.buffer[self.write_pos] = byte;
        self.write_pos = (self.write_pos + 1) & MASK;
        self.total_written += 1;
    }

    /// Copy `length` bytes from `distance` bytes back into `out`, appending
    /// each one to the window as it is produced.
    ///
    /// distance=1 means the most recently written byte. Length can exceed
    /// distance: the copy then re-reads bytes it wrote itself (run-length case).
    pub fn copy<W: Write>(&mut self, distance: u32, length: u32, out: &mut W) -> Result<()> {
        let available = self.available();
        if distance == 0 || distance as usize > available {
            return Err(Error::InvalidDistance { distance, available });
        }

        let mut chunk = [0u8; COPY_CHUNK];
        let mut filled = 0;
        for _ in 0..length {
            let byte = self.buffer[(self.write_pos + DICTIONARY_SIZE - distance as usize) & MASK];
            self.append(byte);

            chunk[filled] = byte;
            filled += 1;
            if filled == COPY_CHUNK {
                out.write_all(&chunk)?;
                filled = 0;
            }
        }
        out.write_all(&chunk[..filled])?;

        Ok(())
    }

    /// Get available window size
    pub fn available(&self) -> usize {
        self.total_written.min(DICTIONARY_SIZE as u64) as usize
    }

    /// Get total bytes written
    pub fn total_written(&self) -> u64 {
        self.total_written
    }
}

impl Default for CircularDictionary {
    fn default() -> Self {
        Self::new()
    }
}
