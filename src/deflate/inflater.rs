use super::tables::{read_distance, read_length, CODE_LENGTH_ORDER};
use crate::bits::BitSource;
use crate::dictionary::CircularDictionary;
use crate::error::{Error, Result};
use crate::huffman::{fixed_distance_tree, fixed_literal_length_tree, CanonicalCode, CodeTree};
use std::io::Write;

const END_OF_BLOCK: u16 = 256;

/// Literal bytes collected before they are handed to the sink
const LITERAL_RUN: usize = 4096;

/// DEFLATE block type (BTYPE)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockType {
    Stored,
    FixedHuffman,
    DynamicHuffman,
}

/// What a single decoded block produced
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockSummary {
    pub block_type: BlockType,
    /// Whether this is the final block in the deflate stream
    pub is_final: bool,
    /// Uncompressed bytes written by this block
    pub output_bytes: u64,
}

/// Statistics from a decompression session
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InflateStats {
    /// Compressed bytes consumed, when the bit source reports it
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub stored_blocks: u64,
    pub fixed_blocks: u64,
    pub dynamic_blocks: u64,
}

impl InflateStats {
    pub fn blocks(&self) -> u64 {
        self.stored_blocks + self.fixed_blocks + self.dynamic_blocks
    }
}

/// Decodes a raw DEFLATE stream block by block
pub struct Inflater<S: BitSource> {
    bits: S,
    dictionary: CircularDictionary,
    /// Whether we've seen the final block
    finished: bool,
    /// Set once a block fails; the bit position is no longer meaningful
    failed: bool,
    /// Literals waiting to be written, flushed before copies and at end of block
    literals: Vec<u8>,
    stats: InflateStats,
}

impl<S: BitSource> Inflater<S> {
    pub fn new(bits: S) -> Self {
        Self {
            bits,
            dictionary: CircularDictionary::new(),
            finished: false,
            failed: false,
            literals: Vec::with_capacity(LITERAL_RUN),
            stats: InflateStats::default(),
        }
    }

    /// Decode every remaining block into `out`
    pub fn inflate_to<W: Write>(&mut self, out: &mut W) -> Result<&InflateStats> {
        while self.decode_block(out)?.is_some() {}
        Ok(&self.stats)
    }

    /// Decode the next DEFLATE block into `out`
    /// Returns None once the final block has been decoded
    ///
    /// Errors are fatal: after one, every later call fails with `DecoderFailed`.
    pub fn decode_block<W: Write>(&mut self, out: &mut W) -> Result<Option<BlockSummary>> {
        if self.failed {
            return Err(Error::DecoderFailed);
        }
        if self.finished {
            return Ok(None);
        }

        let result = self.decode_next_block(out);
        if result.is_err() {
            self.failed = true;
            self.literals.clear();
        }
        result.map(Some)
    }

    fn decode_next_block<W: Write>(&mut self, out: &mut W) -> Result<BlockSummary> {
        let is_final = self.bits.read_bit_required()? == 1;
        let block_type = self.bits.read_bits(2)? as u8;
        tracing::trace!(is_final, block_type, "DEFLATE block header");

        let start = self.dictionary.total_written();
        let block_type = match block_type {
            0 => {
                self.inflate_stored(out)?;
                self.stats.stored_blocks += 1;
                BlockType::Stored
            }
            1 => {
                self.inflate_symbols(
                    fixed_literal_length_tree(),
                    Some(fixed_distance_tree()),
                    out,
                )?;
                self.stats.fixed_blocks += 1;
                BlockType::FixedHuffman
            }
            2 => {
                let (lit_tree, dist_tree) = self.read_dynamic_trees()?;
                self.inflate_symbols(&lit_tree, dist_tree.as_ref(), out)?;
                self.stats.dynamic_blocks += 1;
                BlockType::DynamicHuffman
            }
            _ => return Err(Error::InvalidBlockType(block_type)),
        };

        let output_bytes = self.dictionary.total_written() - start;
        self.stats.output_bytes += output_bytes;

        if is_final {
            self.finished = true;
            tracing::debug!(
                output_bytes = self.stats.output_bytes,
                blocks = self.stats.blocks(),
                "DEFLATE stream finished"
            );
        }

        Ok(BlockSummary { block_type, is_final, output_bytes })
    }

    /// Copy a stored (uncompressed) block
    fn inflate_stored<W: Write>(&mut self, out: &mut W) -> Result<()> {
        // Read LEN and NLEN; the first read aligns to the byte boundary
        let len = self.read_u16_le()?;
        let nlen = self.read_u16_le()?;

        // Verify LEN and NLEN are complements
        if len ^ 0xFFFF != nlen {
            return Err(Error::InvalidStoredBlockLength { len, nlen });
        }

        let mut payload = Vec::with_capacity(len as usize);
        for _ in 0..len {
            let byte = self.bits.read_byte_aligned()?;
            self.dictionary.append(byte);
            payload.push(byte);
        }
        out.write_all(&payload)?;

        Ok(())
    }

    fn read_u16_le(&mut self) -> Result<u16> {
        let lo = self.bits.read_byte_aligned()? as u16;
        let hi = self.bits.read_byte_aligned()? as u16;
        Ok(lo | (hi << 8))
    }

    /// Read a dynamic block header and build its literal/length and distance trees
    fn read_dynamic_trees(&mut self) -> Result<(CodeTree, Option<CodeTree>)> {
        let hlit = self.bits.read_bits(5)? as usize + 257; // # of literal/length codes
        let hdist = self.bits.read_bits(5)? as usize + 1; // # of distance codes
        let hclen = self.bits.read_bits(4)? as usize + 4; // # of code length codes
        tracing::trace!(hlit, hdist, hclen, "dynamic block header");

        // Read code length code lengths
        let mut code_length_lengths = [0u8; 19];
        for &symbol in &CODE_LENGTH_ORDER[..hclen] {
            code_length_lengths[symbol] = self.bits.read_bits(3)? as u8;
        }
        let code_length_tree = CanonicalCode::new(&code_length_lengths)?.to_code_tree()?;

        // Decode literal/length and distance code lengths
        let total_codes = hlit + hdist;
        let mut all_lengths: Vec<u8> = Vec::with_capacity(total_codes);

        while all_lengths.len() < total_codes {
            let sym = code_length_tree.decode(&mut self.bits)?;

            let (value, repeat) = match sym {
                0..=15 => (sym as u8, 1),
                16 => {
                    // Copy previous code length 3-6 times
                    let prev = *all_lengths.last().ok_or(Error::NoPreviousLength)?;
                    (prev, self.bits.read_bits(2)? as usize + 3)
                }
                // Repeat zero 3-10 times
                17 => (0, self.bits.read_bits(3)? as usize + 3),
                // Repeat zero 11-138 times
                18 => (0, self.bits.read_bits(7)? as usize + 11),
                _ => return Err(Error::InvalidCodeLengths("unknown code length symbol")),
            };

            if all_lengths.len() + repeat > total_codes {
                return Err(Error::InvalidCodeLengths("code length run exceeds number of codes"));
            }
            all_lengths.resize(all_lengths.len() + repeat, value);
        }

        // Split into literal/length and distance lengths
        let (literal_lengths, distance_lengths) = all_lengths.split_at(hlit);

        if literal_lengths[END_OF_BLOCK as usize] == 0 {
            return Err(Error::InvalidCodeLengths("no end-of-block code"));
        }
        let lit_tree = CanonicalCode::new(literal_lengths)?.to_code_tree()?;
        let dist_tree = build_distance_tree(distance_lengths)?;

        Ok((lit_tree, dist_tree))
    }

    /// Decode symbols until end of block
    fn inflate_symbols<W: Write>(
        &mut self,
        lit_tree: &CodeTree,
        dist_tree: Option<&CodeTree>,
        out: &mut W,
    ) -> Result<()> {
        loop {
            let sym = lit_tree.decode(&mut self.bits)?;

            match sym {
                0..=255 => {
                    // Literal byte
                    let byte = sym as u8;
                    self.dictionary.append(byte);
                    self.literals.push(byte);
                    if self.literals.len() == LITERAL_RUN {
                        self.flush_literals(out)?;
                    }
                }
                END_OF_BLOCK => return self.flush_literals(out),
                _ => {
                    let length = read_length(sym, &mut self.bits)?;

                    let dist_tree = dist_tree.ok_or(Error::MissingDistanceCode)?;
                    let dist_sym = dist_tree.decode(&mut self.bits)?;
                    let distance = read_distance(dist_sym, &mut self.bits)?;

                    self.flush_literals(out)?;
                    self.dictionary.copy(distance, length, out)?;
                }
            }
        }
    }

    fn flush_literals<W: Write>(&mut self, out: &mut W) -> Result<()> {
        if !self.literals.is_empty() {
            out.write_all(&self.literals)?;
            self.literals.clear();
        }
        Ok(())
    }

    /// Check if we've finished decoding
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn stats(&self) -> &InflateStats {
        &self.stats
    }

    /// Get a reference to the underlying bit source
    pub fn get_ref(&self) -> &S {
        &self.bits
    }

    /// Get the underlying bit source
    pub fn into_inner(self) -> S {
        self.bits
    }
}

/// Build the distance tree for a dynamic block
///
/// A distance alphabet of exactly one zero length means the block holds only
/// literals. A single one-bit code is completed with a dummy symbol 31 so the
/// tree stays full; decoding it is rejected as an invalid distance symbol.
fn build_distance_tree(lengths: &[u8]) -> Result<Option<CodeTree>> {
    if lengths == [0] {
        return Ok(None);
    }

    let ones = lengths.iter().filter(|&&len| len == 1).count();
    let longer = lengths.iter().filter(|&&len| len > 1).count();
    if ones == 1 && longer == 0 {
        let mut padded = lengths.to_vec();
        padded.resize(32, 0);
        padded[31] = 1;
        return Ok(Some(CanonicalCode::new(&padded)?.to_code_tree()?));
    }

    Ok(Some(CanonicalCode::new(lengths)?.to_code_tree()?))
}
