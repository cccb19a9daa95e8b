use super::canonical::CanonicalCode;
use super::tree::CodeTree;
use std::sync::OnceLock;

/// Fixed Huffman literal/length code lengths (RFC 1951 section 3.2.6)
pub fn fixed_literal_lengths() -> [u8; 288] {
    let mut lengths = [0u8; 288];
    lengths[0..=143].fill(8); // 0-143: 8 bits
    lengths[144..=255].fill(9); // 144-255: 9 bits
    lengths[256..=279].fill(7); // 256-279: 7 bits
    lengths[280..=287].fill(8); // 280-287: 8 bits
    lengths
}

/// Fixed Huffman distance code lengths (all 32 symbols, 5 bits)
pub fn fixed_distance_lengths() -> [u8; 32] {
    [5u8; 32]
}

/// Fixed literal/length tree, built on first use and shared afterwards
pub fn fixed_literal_length_tree() -> &'static CodeTree {
    static TREE: OnceLock<CodeTree> = OnceLock::new();

    TREE.get_or_init(|| {
        CanonicalCode::new(&fixed_literal_lengths())
            .and_then(|code| code.to_code_tree())
            .expect("fixed literal/length code is complete")
    })
}

/// Fixed distance tree, built on first use and shared afterwards
pub fn fixed_distance_tree() -> &'static CodeTree {
    static TREE: OnceLock<CodeTree> = OnceLock::new();

    TREE.get_or_init(|| {
        CanonicalCode::new(&fixed_distance_lengths())
            .and_then(|code| code.to_code_tree())
            .expect("fixed distance code is complete")
    })
}
