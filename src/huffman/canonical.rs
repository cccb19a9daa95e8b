use super::tree::CodeTree;
use crate::error::{Error, Result};

/// Longest code length DEFLATE allows
pub const MAX_CODE_LENGTH: u8 = 15;

/// Canonical Huffman code described by per-symbol code lengths
///
/// Codes are assigned in ascending (length, symbol) order (RFC 1951 section
/// 3.2.2), so the lengths alone determine every code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalCode {
    /// For each symbol, its code length (0 = not used)
    code_lengths: Vec<u8>,
}

/// One symbol's assigned code; `code` holds `length` bits, first bit in the MSB
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssignedCode {
    pub symbol: u16,
    pub code: u32,
    pub length: u8,
}

impl CanonicalCode {
    /// Build from code lengths
    pub fn new(lengths: &[u8]) -> Result<Self> {
        if lengths.len() > u16::MAX as usize + 1 {
            return Err(Error::InvalidCodeLengths("too many symbols"));
        }
        if lengths.iter().any(|&len| len > MAX_CODE_LENGTH) {
            return Err(Error::InvalidCodeLengths("code length above 15"));
        }
        Ok(Self { code_lengths: lengths.to_vec() })
    }

    /// Number of symbols in the alphabet, used or not
    pub fn symbol_limit(&self) -> usize {
        self.code_lengths.len()
    }

    /// Code length of `symbol` (0 = not used)
    pub fn code_length(&self, symbol: u16) -> u8 {
        self.code_lengths.get(symbol as usize).copied().unwrap_or(0)
    }

    /// Assign codes to every used symbol, ordered by (length, symbol)
    ///
    /// Fails if the lengths are over-subscribed (a code would overflow its
    /// length). Under-full codes are caught when the tree is built.
    pub fn assign_codes(&self) -> Result<Vec<AssignedCode>> {
        let max_bits = self.code_lengths.iter().copied().max().unwrap_or(0);

        // Count codes of each length
        let mut bl_count = [0u32; MAX_CODE_LENGTH as usize + 1];
        for &len in &self.code_lengths {
            if len > 0 {
                bl_count[len as usize] += 1;
            }
        }

        // Compute first code for each bit length
        let mut next_code = [0u32; MAX_CODE_LENGTH as usize + 1];
        let mut code = 0u32;
        for bits in 1..=max_bits as usize {
            code = (code + bl_count[bits - 1]) << 1;
            next_code[bits] = code;
        }

        // Sort symbols by code length, then by symbol value
        let mut symbols: Vec<(u16, u8)> = self
            .code_lengths
            .iter()
            .enumerate()
            .filter(|(_, &len)| len > 0)
            .map(|(sym, &len)| (sym as u16, len))
            .collect();
        symbols.sort_by_key(|&(sym, len)| (len, sym));

        let mut assigned = Vec::with_capacity(symbols.len());
        for (symbol, length) in symbols {
            let code = next_code[length as usize];
            if code >= 1 << length {
                return Err(Error::InvalidCodeLengths("over-subscribed code"));
            }
            next_code[length as usize] += 1;
            assigned.push(AssignedCode { symbol, code, length });
        }

        Ok(assigned)
    }

    /// Build the prefix tree used for decoding
    pub fn to_code_tree(&self) -> Result<CodeTree> {
        let codes = self.assign_codes()?;
        CodeTree::from_codes(&codes, self.symbol_limit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes_of(lengths: &[u8]) -> Vec<(u16, u32, u8)> {
        CanonicalCode::new(lengths)
            .unwrap()
            .assign_codes()
            .unwrap()
            .into_iter()
            .map(|c| (c.symbol, c.code, c.length))
            .collect()
    }

    #[test]
    fn test_equal_lengths_in_symbol_order() {
        assert_eq!(
            codes_of(&[2, 2, 2, 2]),
            vec![(0, 0b00, 2), (1, 0b01, 2), (2, 0b10, 2), (3, 0b11, 2)]
        );
    }

    #[test]
    fn test_rfc1951_example() {
        // RFC 1951 section 3.2.2: ABCDEFGH with lengths (3, 3, 3, 3, 3, 2, 4, 4)
        let codes = codes_of(&[3, 3, 3, 3, 3, 2, 4, 4]);
        assert_eq!(codes[0], (5, 0b00, 2));
        assert_eq!(codes[1], (0, 0b010, 3));
        assert_eq!(codes[5], (4, 0b110, 3));
        assert_eq!(codes[6], (6, 0b1110, 4));
        assert_eq!(codes[7], (7, 0b1111, 4));
    }

    #[test]
    fn test_unused_symbols_skipped() {
        assert_eq!(codes_of(&[0, 1, 0, 1]), vec![(1, 0, 1), (3, 1, 1)]);
    }

    #[test]
    fn test_deterministic() {
        let lengths = [3, 0, 2, 3, 2, 3, 3];
        assert_eq!(codes_of(&lengths), codes_of(&lengths));
    }

    #[test]
    fn test_length_above_15_rejected() {
        assert!(matches!(CanonicalCode::new(&[16, 1]), Err(Error::InvalidCodeLengths(_))));
    }

    #[test]
    fn test_oversubscribed_rejected() {
        let code = CanonicalCode::new(&[1, 1, 1]).unwrap();
        assert!(matches!(code.assign_codes(), Err(Error::InvalidCodeLengths(_))));
    }

    #[test]
    fn test_code_length_lookup() {
        let code = CanonicalCode::new(&[2, 0, 1]).unwrap();
        assert_eq!(code.symbol_limit(), 3);
        assert_eq!(code.code_length(0), 2);
        assert_eq!(code.code_length(1), 0);
        assert_eq!(code.code_length(9), 0);
    }
}
