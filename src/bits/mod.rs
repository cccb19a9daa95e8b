pub mod reader;

pub use reader::BitReader;

use crate::error::{Error, Result};

/// A source of DEFLATE bits, read least-significant-bit first within each byte.
///
/// `BitReader` covers any `std::io::Read`; implement this trait directly to
/// feed the decoder from a custom bit source.
pub trait BitSource {
    /// Read the next bit, or `None` once the source is exhausted
    fn read_bit(&mut self) -> Result<Option<u8>>;

    /// Offset of the next bit within its byte, always in `0..8`
    fn bit_position(&self) -> u8;

    /// Read the next bit, treating end of stream as an error
    fn read_bit_required(&mut self) -> Result<u8> {
        self.read_bit()?.ok_or(Error::UnexpectedEndOfStream)
    }

    /// Read `n` bits (0-32); the i-th bit read contributes `bit << i`
    fn read_bits(&mut self, n: u8) -> Result<u32> {
        debug_assert!(n <= 32, "Cannot read more than 32 bits at once");

        let mut value = 0u32;
        for i in 0..n {
            value |= (self.read_bit_required()? as u32) << i;
        }
        Ok(value)
    }

    /// Discard the rest of the current byte and read the next whole byte
    fn read_byte_aligned(&mut self) -> Result<u8> {
        while self.bit_position() != 0 {
            self.read_bit_required()?;
        }
        self.read_bits(8).map(|v| v as u8)
    }
}

impl<S: BitSource + ?Sized> BitSource for &mut S {
    fn read_bit(&mut self) -> Result<Option<u8>> {
        (**self).read_bit()
    }

    fn bit_position(&self) -> u8 {
        (**self).bit_position()
    }

    fn read_bit_required(&mut self) -> Result<u8> {
        (**self).read_bit_required()
    }

    fn read_bits(&mut self, n: u8) -> Result<u32> {
        (**self).read_bits(n)
    }

    fn read_byte_aligned(&mut self) -> Result<u8> {
        (**self).read_byte_aligned()
    }
}
