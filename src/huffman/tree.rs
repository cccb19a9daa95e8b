use super::canonical::AssignedCode;
use crate::bits::BitSource;
use crate::error::{Error, Result};
use std::fmt;

/// Node of a prefix-code tree
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Leaf(u16),
    /// Children for bit 0 (left) and bit 1 (right)
    Internal(Box<Node>, Box<Node>),
}

/// Node under construction; `Empty` marks a branch no code has reached yet
enum Slot {
    Empty,
    Leaf(u16),
    Internal(Box<Slot>, Box<Slot>),
}

/// Binary prefix-code tree for decoding one symbol per traversal
///
/// Every internal node has exactly two children, so decoding never hits a
/// dead end.
#[derive(Clone, Debug)]
pub struct CodeTree {
    root: Node,
    /// For each symbol, its (code, length) if used
    codes: Vec<Option<(u32, u8)>>,
}

impl CodeTree {
    /// Build a tree by inserting every code as a root-to-leaf path
    pub fn from_codes(codes: &[AssignedCode], symbol_limit: usize) -> Result<Self> {
        let mut root = Slot::Empty;
        let mut table = vec![None; symbol_limit];

        for assigned in codes {
            if assigned.length == 0 || (assigned.symbol as usize) >= symbol_limit {
                return Err(Error::InvalidCodeLengths("code outside the alphabet"));
            }
            insert(&mut root, assigned)?;
            table[assigned.symbol as usize] = Some((assigned.code, assigned.length));
        }

        let root = match root {
            Slot::Empty => return Err(Error::InvalidCodeLengths("no symbols in code")),
            Slot::Leaf(_) => return Err(Error::InvalidCodeLengths("zero-length code")),
            internal => freeze(internal)?,
        };

        Ok(Self { root, codes: table })
    }

    /// Decode next symbol from bitstream, one bit per tree level
    pub fn decode<S: BitSource>(&self, bits: &mut S) -> Result<u16> {
        let mut node = &self.root;
        loop {
            match node {
                Node::Leaf(symbol) => return Ok(*symbol),
                Node::Internal(left, right) => {
                    node = if bits.read_bit_required()? == 0 { &**left } else { &**right };
                }
            }
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// The (code, length) assigned to `symbol`, if it is used
    pub fn code_of(&self, symbol: u16) -> Option<(u32, u8)> {
        self.codes.get(symbol as usize).copied().flatten()
    }

    /// Length of the longest code
    pub fn depth(&self) -> u8 {
        self.codes.iter().flatten().map(|&(_, len)| len).max().unwrap_or(0)
    }
}

impl fmt::Display for CodeTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (symbol, code) in self.codes.iter().enumerate() {
            if let Some((code, len)) = code {
                writeln!(f, "Code {:0width$b}: Symbol {}", code, symbol, width = *len as usize)?;
            }
        }
        Ok(())
    }
}

fn insert(root: &mut Slot, assigned: &AssignedCode) -> Result<()> {
    let mut slot = root;
    for i in (0..assigned.length).rev() {
        if let Slot::Empty = *slot {
            *slot = Slot::Internal(Box::new(Slot::Empty), Box::new(Slot::Empty));
        }
        slot = match slot {
            Slot::Internal(left, right) => {
                if (assigned.code >> i) & 1 == 0 {
                    &mut **left
                } else {
                    &mut **right
                }
            }
            _ => return Err(Error::InvalidCodeLengths("code collides with a shorter code")),
        };
    }

    if let Slot::Empty = *slot {
        *slot = Slot::Leaf(assigned.symbol);
        Ok(())
    } else {
        Err(Error::InvalidCodeLengths("code collides with another code"))
    }
}

fn freeze(slot: Slot) -> Result<Node> {
    match slot {
        Slot::Empty => Err(Error::InvalidCodeLengths("incomplete code")),
        Slot::Leaf(symbol) => Ok(Node::Leaf(symbol)),
        Slot::Internal(left, right) => {
            Ok(Node::Internal(Box::new(freeze(*left)?), Box::new(freeze(*right)?)))
        }
    }
}
