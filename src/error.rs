use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unexpected end of stream")]
    UnexpectedEndOfStream,

    // DEFLATE format errors
    #[error("Invalid DEFLATE block type: {0}")]
    InvalidBlockType(u8),

    #[error("Stored block length mismatch: LEN=0x{len:04x}, NLEN=0x{nlen:04x}")]
    InvalidStoredBlockLength { len: u16, nlen: u16 },

    #[error("Invalid Huffman code lengths: {0}")]
    InvalidCodeLengths(&'static str),

    #[error("Code length repeat (symbol 16) with no previous length")]
    NoPreviousLength,

    #[error("Invalid length symbol: {0}")]
    InvalidLengthSymbol(u16),

    #[error("Invalid distance symbol: {0}")]
    InvalidDistanceSymbol(u16),

    #[error("Length/distance pair in a block without distance codes")]
    MissingDistanceCode,

    #[error("Back-reference distance {distance} exceeds available window {available}")]
    InvalidDistance { distance: u32, available: usize },

    #[error("Decoder stopped by an earlier error")]
    DecoderFailed,

    // Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error means the bitstream itself is malformed
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidBlockType(_)
                | Error::InvalidStoredBlockLength { .. }
                | Error::InvalidCodeLengths(_)
                | Error::NoPreviousLength
                | Error::InvalidLengthSymbol(_)
                | Error::InvalidDistanceSymbol(_)
                | Error::MissingDistanceCode
                | Error::InvalidDistance { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
