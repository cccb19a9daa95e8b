use crate::bits::BitSource;
use crate::error::{Error, Result};

/// Length codes 257-285: base length and extra bits
/// Index by (code - 257)
pub const LENGTH_TABLE: [(u16, u8); 29] = [
    // (base_length, extra_bits)
    (3, 0),   // 257
    (4, 0),   // 258
    (5, 0),   // 259
    (6, 0),   // 260
    (7, 0),   // 261
    (8, 0),   // 262
    (9, 0),   // 263
    (10, 0),  // 264
    (11, 1),  // 265
    (13, 1),  // 266
    (15, 1),  // 267
    (17, 1),  // 268
    (19, 2),  // 269
    (23, 2),  // 270
    (27, 2),  // 271
    (31, 2),  // 272
    (35, 3),  // 273
    (43, 3),  // 274
    (51, 3),  // 275
    (59, 3),  // 276
    (67, 4),  // 277
    (83, 4),  // 278
    (99, 4),  // 279
    (115, 4), // 280
    (131, 5), // 281
    (163, 5), // 282
    (195, 5), // 283
    (227, 5), // 284
    (258, 0), // 285 - special case
];

/// Distance codes 0-29: base distance and extra bits
pub const DISTANCE_TABLE: [(u16, u8); 30] = [
    // (base_distance, extra_bits)
    (1, 0),      // 0
    (2, 0),      // 1
    (3, 0),      // 2
    (4, 0),      // 3
    (5, 1),      // 4
    (7, 1),      // 5
    (9, 2),      // 6
    (13, 2),     // 7
    (17, 3),     // 8
    (25, 3),     // 9
    (33, 4),     // 10
    (49, 4),     // 11
    (65, 5),     // 12
    (97, 5),     // 13
    (129, 6),    // 14
    (193, 6),    // 15
    (257, 7),    // 16
    (385, 7),    // 17
    (513, 8),    // 18
    (769, 8),    // 19
    (1025, 9),   // 20
    (1537, 9),   // 21
    (2049, 10),  // 22
    (3073, 10),  // 23
    (4097, 11),  // 24
    (6145, 11),  // 25
    (8193, 12),  // 26
    (12289, 12), // 27
    (16385, 13), // 28
    (24577, 13), // 29
];

/// Order of code length alphabet for dynamic Huffman blocks
pub const CODE_LENGTH_ORDER: [usize; 19] =
    [16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15];

/// Decode a length value from a length code (257-285) and extra bits
pub fn decode_length(code: u16, extra_bits: u32) -> Option<u16> {
    if !(257..=285).contains(&code) {
        return None;
    }
    let idx = (code - 257) as usize;
    let (base, _) = LENGTH_TABLE[idx];
    Some(base + extra_bits as u16)
}

/// Decode a distance value from a distance code (0-29) and extra bits
pub fn decode_distance(code: u16, extra_bits: u32) -> Option<u16> {
    if code > 29 {
        return None;
    }
    let (base, _) = DISTANCE_TABLE[code as usize];
    Some(base + extra_bits as u16)
}

/// Read the extra bits for a length symbol and return the match length
pub fn read_length<S: BitSource>(symbol: u16, bits: &mut S) -> Result<u32> {
    if !(257..=285).contains(&symbol) {
        return Err(Error::InvalidLengthSymbol(symbol));
    }
    let (_, extra_bits) = LENGTH_TABLE[(symbol - 257) as usize];
    let extra = bits.read_bits(extra_bits)?;
    decode_length(symbol, extra).map(u32::from).ok_or(Error::InvalidLengthSymbol(symbol))
}

/// Read the extra bits for a distance symbol and return the match distance
pub fn read_distance<S: BitSource>(symbol: u16, bits: &mut S) -> Result<u32> {
    if symbol > 29 {
        return Err(Error::InvalidDistanceSymbol(symbol));
    }
    let (_, extra_bits) = DISTANCE_TABLE[symbol as usize];
    let extra = bits.read_bits(extra_bits)?;
    decode_distance(symbol, extra).map(u32::from).ok_or(Error::InvalidDistanceSymbol(symbol))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::BitReader;

    #[test]
    fn test_decode_length() {
        assert_eq!(decode_length(257, 0), Some(3));
        assert_eq!(decode_length(258, 0), Some(4));
        assert_eq!(decode_length(264, 0), Some(10));
        assert_eq!(decode_length(265, 0), Some(11));
        assert_eq!(decode_length(265, 1), Some(12));
        assert_eq!(decode_length(284, 30), Some(257));
        assert_eq!(decode_length(285, 0), Some(258));
        assert_eq!(decode_length(286, 0), None);
    }

    #[test]
    fn test_decode_distance() {
        assert_eq!(decode_distance(0, 0), Some(1));
        assert_eq!(decode_distance(3, 0), Some(4));
        assert_eq!(decode_distance(4, 0), Some(5));
        assert_eq!(decode_distance(4, 1), Some(6));
        assert_eq!(decode_distance(29, 0x1FFF), Some(32768));
        assert_eq!(decode_distance(30, 0), None);
    }

    #[test]
    fn test_extra_bits_grow_every_four_lengths() {
        for (i, &(_, extra)) in LENGTH_TABLE[..28].iter().enumerate() {
            let expected = if i < 8 { 0 } else { (i as u8 - 4) / 4 };
            assert_eq!(extra, expected, "length symbol {}", i + 257);
        }
    }

    #[test]
    fn test_extra_bits_grow_every_two_distances() {
        for (i, &(_, extra)) in DISTANCE_TABLE.iter().enumerate() {
            let expected = if i < 4 { 0 } else { (i as u8 - 2) / 2 };
            assert_eq!(extra, expected, "distance symbol {}", i);
        }
    }

    #[test]
    fn test_ranges_are_contiguous() {
        for pair in LENGTH_TABLE[..28].windows(2) {
            assert_eq!(pair[0].0 + (1 << pair[0].1), pair[1].0);
        }
        for pair in DISTANCE_TABLE.windows(2) {
            assert_eq!(pair[0].0 + (1 << pair[0].1), pair[1].0);
        }
    }

    #[test]
    fn test_read_length_with_extra_bits() {
        // Symbol 266: base 13, one extra bit
        let data = vec![0x01];
        let mut reader = BitReader::new(data.as_slice());
        assert_eq!(read_length(266, &mut reader).unwrap(), 14);
    }

    #[test]
    fn test_read_distance_with_extra_bits() {
        // Symbol 8: base 17, three extra bits = 0b101
        let data = vec![0x05];
        let mut reader = BitReader::new(data.as_slice());
        assert_eq!(read_distance(8, &mut reader).unwrap(), 22);
    }

    #[test]
    fn test_reserved_symbols() {
        let data = vec![0xFF; 4];
        let mut reader = BitReader::new(data.as_slice());
        assert!(matches!(read_length(286, &mut reader), Err(Error::InvalidLengthSymbol(286))));
        assert!(matches!(read_length(256, &mut reader), Err(Error::InvalidLengthSymbol(256))));
        assert!(matches!(read_distance(30, &mut reader), Err(Error::InvalidDistanceSymbol(30))));
        assert!(matches!(read_distance(31, &mut reader), Err(Error::InvalidDistanceSymbol(31))));
    }
}
