use super::BitSource;
use crate::error::{Error, Result};
use std::io::Read;

/// Bit-level reader for DEFLATE streams
///
/// DEFLATE uses LSB-first bit ordering within bytes.
/// Bits are read from LSB to MSB within each byte.
///
/// Bytes are pulled from the underlying reader one at a time and only when a
/// bit from them is needed, so the reader is never advanced past the byte
/// holding the last bit consumed. Wrap unbuffered sources in a `BufReader`.
pub struct BitReader<R: Read> {
    reader: R,
    /// Buffer holding up to 64 bits
    buffer: u64,
    /// Number of valid bits in buffer (0-64)
    bits_available: u8,
    /// Total bytes read (for error reporting)
    bytes_read: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, buffer: 0, bits_available: 0, bytes_read: 0 }
    }

    /// Ensure at least `n` bits are available in buffer
    fn fill_buffer(&mut self, n: u8) -> Result<()> {
        debug_assert!(n <= 57, "Cannot request more than 57 bits at once");

        while self.bits_available < n {
            let mut byte = [0u8; 1];
            match self.reader.read_exact(&mut byte) {
                Ok(()) => {
                    self.buffer |= (byte[0] as u64) << self.bits_available;
                    self.bits_available += 8;
                    self.bytes_read += 1;
                }
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    return Err(Error::UnexpectedEndOfStream);
                }
                Err(e) => return Err(Error::Io(e)),
            }
        }
        Ok(())
    }

    /// Discard remaining bits in current byte, align to next byte boundary
    pub fn align_to_byte(&mut self) {
        let discard = self.bits_available % 8;
        if discard > 0 {
            self.buffer >>= discard;
            self.bits_available -= discard;
        }
    }

    /// Get position in bytes
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Get a reference to the inner reader
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Get the inner reader (consumes self)
    ///
    /// Bits already pulled into the buffer but not consumed are dropped; after
    /// the final block this is at most the padding of the last byte.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> BitSource for BitReader<R> {
    fn read_bit(&mut self) -> Result<Option<u8>> {
        match self.fill_buffer(1) {
            Ok(()) => {}
            Err(Error::UnexpectedEndOfStream) => return Ok(None),
            Err(e) => return Err(e),
        }

        let bit = (self.buffer & 1) as u8;
        self.buffer >>= 1;
        self.bits_available -= 1;
        Ok(Some(bit))
    }

    fn bit_position(&self) -> u8 {
        (8 - self.bits_available % 8) % 8
    }

    /// Read `n` bits (0-32) in LSB-first order (standard DEFLATE order)
    fn read_bits(&mut self, n: u8) -> Result<u32> {
        debug_assert!(n <= 32, "Cannot read more than 32 bits at once");

        if n == 0 {
            return Ok(0);
        }

        self.fill_buffer(n)?;

        let mask = (1u64 << n) - 1;
        let result = (self.buffer & mask) as u32;
        self.buffer >>= n;
        self.bits_available -= n;

        Ok(result)
    }

    /// Read a complete byte (aligns to byte boundary first)
    fn read_byte_aligned(&mut self) -> Result<u8> {
        self.align_to_byte();
        self.read_bits(8).map(|v| v as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_bits() {
        // Binary: 11010011 10101010 = 0xD3 0xAA
        let data = vec![0xD3, 0xAA];
        let mut reader = BitReader::new(data.as_slice());

        // Read LSB first: 0xD3 = 11010011, reading from LSB:
        // bits 0-2: 011 = 3
        assert_eq!(reader.read_bits(3).unwrap(), 0b011);
        // bits 3-7: 11010 = 26
        assert_eq!(reader.read_bits(5).unwrap(), 0b11010);
        // next byte
        assert_eq!(reader.read_bits(8).unwrap(), 0xAA);
    }

    #[test]
    fn test_read_bit() {
        let data = vec![0b10110001];
        let mut reader = BitReader::new(data.as_slice());

        // LSB first
        let bits: Vec<u8> = (0..8).map(|_| reader.read_bit().unwrap().unwrap()).collect();
        assert_eq!(bits, vec![1, 0, 0, 0, 1, 1, 0, 1]);

        // End of stream is a sentinel, not an error
        assert_eq!(reader.read_bit().unwrap(), None);
        assert!(matches!(reader.read_bit_required(), Err(Error::UnexpectedEndOfStream)));
    }

    #[test]
    fn test_bit_position() {
        let data = vec![0xFF, 0x00, 0x12];
        let mut reader = BitReader::new(data.as_slice());

        assert_eq!(reader.bit_position(), 0);
        reader.read_bits(3).unwrap();
        assert_eq!(reader.bit_position(), 3);
        reader.read_bits(5).unwrap();
        assert_eq!(reader.bit_position(), 0);
        reader.read_bits(12).unwrap();
        assert_eq!(reader.bit_position(), 4);
    }

    #[test]
    fn test_read_byte_aligned() {
        let data = vec![0xFF, 0xAB, 0xCD];
        let mut reader = BitReader::new(data.as_slice());

        reader.read_bits(3).unwrap();
        assert_eq!(reader.read_byte_aligned().unwrap(), 0xAB);
        // Already aligned: no bits are discarded
        assert_eq!(reader.bit_position(), 0);
        assert_eq!(reader.read_byte_aligned().unwrap(), 0xCD);
    }

    #[test]
    fn test_cross_byte_boundary() {
        let data = vec![0xFF, 0x00];
        let mut reader = BitReader::new(data.as_slice());

        // Read 12 bits across byte boundary
        assert_eq!(reader.read_bits(12).unwrap(), 0x0FF);
    }

    #[test]
    fn test_truncated_read_bits() {
        let data = vec![0x01];
        let mut reader = BitReader::new(data.as_slice());
        assert!(matches!(reader.read_bits(9), Err(Error::UnexpectedEndOfStream)));
    }

    #[test]
    fn test_no_read_ahead() {
        let data = vec![0x01, 0x02, 0x03];
        let mut reader = BitReader::new(data.as_slice());

        reader.read_bits(4).unwrap();
        assert_eq!(reader.bytes_read(), 1);
        assert_eq!(reader.into_inner(), [0x02, 0x03]);
    }
}
