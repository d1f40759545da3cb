//! Serialized form of a Huffman tree, the decode key for a compressed payload.
//!
//! The payload bytes do not say how many of their bits are real, so the exact bit length
//! and the number of encoded symbols travel with the tree. Layout, MSB first:
//!
//! - 32 bits: magic `HUFT`
//! - 8 bits: format version
//! - 64 bits: symbol count
//! - 64 bits: payload bit length
//! - 1 bit: tree present (0 only for an empty diff)
//! - tree, pre-order: `1`, 21 bit scalar value, 64 bit weight for a leaf; `0` followed by
//!   the left then the right subtree for an internal node
//!
//! The last byte is zero-padded.

use log::debug;

use super::huffman::HuffmanNode;
use crate::bitstream::{BitPacker, BitReader};
use crate::error::{Error, Result};

const MAGIC: [u8; 4] = *b"HUFT";
const VERSION: u8 = 1;
/// Every Unicode scalar value fits in 21 bits.
const SYMBOL_BITS: u32 = 21;
/// Deepest tree accepted on read. Weights summing to at most `u64::MAX` cannot give a
/// Huffman tree anywhere near this deep.
const MAX_TREE_DEPTH: usize = 128;

/// Everything needed to turn a packed payload back into text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeArtifact {
    /// Chars in the encoded text.
    pub symbol_count: u64,
    /// Exact number of payload bits, before byte padding.
    pub bit_len: u64,
    /// None when the encoded text was empty.
    pub tree: Option<HuffmanNode>,
}

impl TreeArtifact {
    pub fn new(tree: Option<HuffmanNode>, symbol_count: usize, bit_len: usize) -> Self {
        Self {
            symbol_count: symbol_count as u64,
            bit_len: bit_len as u64,
            tree,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bp = BitPacker::new(32);
        bp.out32(u32::from_be_bytes(MAGIC));
        bp.out24((8 << 24) | VERSION as u32);
        bp.out64(self.symbol_count);
        bp.out64(self.bit_len);
        bp.bit(self.tree.is_some());

        if let Some(root) = &self.tree {
            let mut stack = vec![root];
            while let Some(node) = stack.pop() {
                match node {
                    HuffmanNode::Leaf { symbol, weight } => {
                        bp.bit(true);
                        bp.out24((SYMBOL_BITS << 24) | *symbol as u32);
                        bp.out64(*weight);
                    }
                    HuffmanNode::Internal { left, right, .. } => {
                        bp.bit(false);
                        stack.push(right);
                        stack.push(left);
                    }
                }
            }
        }
        debug!("Tree artifact written up to {}", bp.loc());
        bp.flush();
        bp.output
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut br = BitReader::new(data);

        if br.bytes(4).as_deref() != Some(MAGIC.as_slice()) {
            return Err(Error::InvalidTree("missing HUFT signature".into()));
        }
        let version = br.byte().ok_or_else(truncated)?;
        if version != VERSION {
            return Err(Error::InvalidTree(format!(
                "unsupported version {}",
                version
            )));
        }
        let symbol_count = br.bint64().ok_or_else(truncated)?;
        let bit_len = br.bint64().ok_or_else(truncated)?;
        let tree = if br.bool_bit().ok_or_else(truncated)? {
            Some(read_tree(&mut br)?)
        } else {
            None
        };
        debug!("Tree artifact read up to {}", br.loc());

        match &tree {
            Some(root) if root.weight() != symbol_count => {
                return Err(Error::InvalidTree(format!(
                    "tree weighs {} but {} symbols were encoded",
                    root.weight(),
                    symbol_count
                )));
            }
            Some(root) => debug!("Tree has {} leaves", root.leaf_count()),
            None if symbol_count != 0 => {
                return Err(Error::InvalidTree(format!(
                    "no tree for {} encoded symbols",
                    symbol_count
                )));
            }
            None => {}
        }

        Ok(Self {
            symbol_count,
            bit_len,
            tree,
        })
    }
}

fn truncated() -> Error {
    Error::InvalidTree("unexpected end of data".into())
}

/// Rebuild a pre-order tree without recursion. Each stack slot is an internal node that
/// is still waiting for its left child (None) or for its right child (Some(left)).
fn read_tree<R: std::io::Read>(br: &mut BitReader<R>) -> Result<HuffmanNode> {
    let mut pending: Vec<Option<HuffmanNode>> = Vec::new();
    loop {
        if !br.bool_bit().ok_or_else(truncated)? {
            if pending.len() >= MAX_TREE_DEPTH {
                return Err(Error::InvalidTree(format!(
                    "tree is deeper than {} levels",
                    MAX_TREE_DEPTH
                )));
            }
            pending.push(None);
            continue;
        }

        let raw = br.bint(SYMBOL_BITS as usize).ok_or_else(truncated)? as u32;
        let symbol = char::from_u32(raw)
            .ok_or_else(|| Error::InvalidTree(format!("invalid symbol {:#x}", raw)))?;
        let weight = br.bint64().ok_or_else(truncated)?;
        if weight == 0 {
            return Err(Error::InvalidTree(format!(
                "leaf {:?} has zero weight",
                symbol
            )));
        }

        let mut node = HuffmanNode::leaf(symbol, weight);
        loop {
            match pending.pop() {
                None => return Ok(node),
                Some(None) => {
                    pending.push(Some(node));
                    break;
                }
                Some(Some(left)) => {
                    let weight = left.weight().checked_add(node.weight()).ok_or_else(|| {
                        Error::InvalidTree("node weight overflows 64 bits".into())
                    })?;
                    node = HuffmanNode::Internal {
                        weight,
                        left: Box::new(left),
                        right: Box::new(node),
                    };
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::TreeArtifact;
    use crate::bitstream::BitPacker;
    use crate::huffman_coding::huffman::{build_tree, HuffmanNode};
    use crate::Error;
    use pretty_assertions::assert_eq;

    #[test]
    fn tree_survives_serialization() {
        let tree = build_tree("- b\n+ x\n- 日本\n").unwrap();
        let artifact = TreeArtifact::new(Some(tree), 13, 41);
        let restored = TreeArtifact::from_bytes(&artifact.to_bytes()).unwrap();
        assert_eq!(restored, artifact);
    }

    #[test]
    fn lone_leaf_survives_serialization() {
        let artifact = TreeArtifact::new(Some(HuffmanNode::leaf('a', 4)), 4, 4);
        let restored = TreeArtifact::from_bytes(&artifact.to_bytes()).unwrap();
        assert_eq!(restored, artifact);
    }

    #[test]
    fn empty_artifact() {
        let artifact = TreeArtifact::new(None, 0, 0);
        let bytes = artifact.to_bytes();
        // 4 + 1 + 8 + 8 bytes of header and one byte holding the "no tree" bit.
        assert_eq!(bytes.len(), 22);
        assert_eq!(TreeArtifact::from_bytes(&bytes).unwrap(), artifact);
    }

    #[test]
    fn header_layout() {
        let bytes = TreeArtifact::new(None, 2, 3).to_bytes();
        assert_eq!(&bytes[..4], b"HUFT");
        assert_eq!(bytes[4], 1);
        assert_eq!(bytes[12], 2);
        assert_eq!(bytes[20], 3);
    }

    #[test]
    fn bad_magic_is_rejected() {
        let mut bytes = TreeArtifact::new(None, 0, 0).to_bytes();
        bytes[0] = b'X';
        assert!(matches!(
            TreeArtifact::from_bytes(&bytes),
            Err(Error::InvalidTree(_))
        ));
    }

    #[test]
    fn truncated_tree_is_rejected() {
        let tree = build_tree("abcdef").unwrap();
        let bytes = TreeArtifact::new(Some(tree), 6, 16).to_bytes();
        assert!(matches!(
            TreeArtifact::from_bytes(&bytes[..bytes.len() - 3]),
            Err(Error::InvalidTree(_))
        ));
    }

    /// Raw artifact bytes with a hand-written tree section.
    fn raw_artifact(symbol_count: u64, write_tree: impl FnOnce(&mut BitPacker)) -> Vec<u8> {
        let mut bp = BitPacker::new(64);
        bp.out32(u32::from_be_bytes(*b"HUFT"));
        bp.out24((8 << 24) | 1);
        bp.out64(symbol_count);
        bp.out64(0);
        bp.bit(true);
        write_tree(&mut bp);
        bp.flush();
        bp.output
    }

    fn leaf(bp: &mut BitPacker, symbol: char, weight: u64) {
        bp.bit(true);
        bp.out24((21 << 24) | symbol as u32);
        bp.out64(weight);
    }

    #[test]
    fn overflowing_weights_are_rejected() {
        let bytes = raw_artifact(0, |bp| {
            bp.bit(false);
            leaf(bp, 'a', u64::MAX);
            leaf(bp, 'b', u64::MAX);
        });
        assert!(matches!(
            TreeArtifact::from_bytes(&bytes),
            Err(Error::InvalidTree(_))
        ));
    }

    #[test]
    fn root_weight_must_match_symbol_count() {
        let tree = build_tree("aab").unwrap();
        let bytes = TreeArtifact::new(Some(tree), 4, 3).to_bytes();
        assert!(matches!(
            TreeArtifact::from_bytes(&bytes),
            Err(Error::InvalidTree(_))
        ));
    }

    #[test]
    fn missing_tree_with_symbols_is_rejected() {
        let bytes = TreeArtifact::new(None, 5, 0).to_bytes();
        assert!(matches!(
            TreeArtifact::from_bytes(&bytes),
            Err(Error::InvalidTree(_))
        ));
    }

    #[test]
    fn degenerate_deep_tree_is_rejected() {
        let bytes = raw_artifact(1, |bp| {
            for _ in 0..10_000 {
                bp.bit(false);
            }
        });
        assert!(matches!(
            TreeArtifact::from_bytes(&bytes),
            Err(Error::InvalidTree(_))
        ));
    }

    #[test]
    fn unknown_version_is_rejected() {
        let mut bytes = TreeArtifact::new(None, 0, 0).to_bytes();
        bytes[4] = 9;
        assert!(TreeArtifact::from_bytes(&bytes).is_err());
    }
}
