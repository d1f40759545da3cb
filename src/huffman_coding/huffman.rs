use log::{debug, trace};
use rustc_hash::FxHashMap;

use crate::bitstream::BitString;
use crate::error::{Error, Result};
use crate::tools::freq_count::freqs;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A Huffman tree node. Leaves carry a symbol, internal nodes never do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode {
    Leaf {
        symbol: char,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<HuffmanNode>,
        right: Box<HuffmanNode>,
    },
}

impl HuffmanNode {
    pub fn leaf(symbol: char, weight: u64) -> Self {
        HuffmanNode::Leaf { symbol, weight }
    }

    /// Join two subtrees. The new node weighs as much as both children together.
    pub fn internal(left: HuffmanNode, right: HuffmanNode) -> Self {
        HuffmanNode::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn weight(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { weight, .. } | HuffmanNode::Internal { weight, .. } => *weight,
        }
    }

    /// Number of leaves (distinct symbols) below this node.
    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                HuffmanNode::Leaf { .. } => count += 1,
                HuffmanNode::Internal { left, right, .. } => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        count
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0)];
        while let Some((node, depth)) = stack.pop() {
            match node {
                HuffmanNode::Leaf { .. } => deepest = deepest.max(depth),
                HuffmanNode::Internal { left, right, .. } => {
                    stack.push((right, depth + 1));
                    stack.push((left, depth + 1));
                }
            }
        }
        deepest
    }
}

/// A symbol's code, root to leaf: `false` for a left edge, `true` for a right edge.
pub type Code = Vec<bool>;

/// Symbol to code lookup built from one tree.
pub type CodeMap = FxHashMap<char, Code>;

/// Heap entry. `seq` records push order so equal weights always pop the same way.
#[derive(Debug)]
struct Pending {
    weight: u64,
    seq: usize,
    node: HuffmanNode,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.seq == other.seq
    }
}
impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Pending {
    /// Reversed so the max-heap pops the lightest, oldest entry first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Build a Huffman tree from the char frequencies of `text`.
///
/// Leaves are seeded in ascending symbol order, then the two lightest nodes are merged
/// (first popped becomes the left child) until one node is left. A text with a single
/// distinct symbol gives a lone leaf. Empty text is an error.
pub fn build_tree(text: &str) -> Result<HuffmanNode> {
    let mut symbols: Vec<(char, u64)> = freqs(text).into_iter().collect();
    if symbols.is_empty() {
        return Err(Error::EmptyInput);
    }
    symbols.sort_unstable_by_key(|&(symbol, _)| symbol);
    debug!("Building a Huffman tree over {} symbols", symbols.len());

    let mut heap = BinaryHeap::with_capacity(symbols.len());
    let mut seq = 0;
    for (symbol, weight) in symbols {
        heap.push(Pending {
            weight,
            seq,
            node: HuffmanNode::leaf(symbol, weight),
        });
        seq += 1;
    }

    while let Some(left) = heap.pop() {
        let Some(right) = heap.pop() else {
            debug!(
                "Huffman tree built, weight {} and depth {}",
                left.node.weight(),
                left.node.depth()
            );
            return Ok(left.node);
        };
        let node = HuffmanNode::internal(left.node, right.node);
        heap.push(Pending {
            weight: node.weight(),
            seq,
            node,
        });
        seq += 1;
    }
    Err(Error::EmptyInput)
}

/// Walk the tree and record the code for every leaf. A tree that is a single leaf
/// gives its symbol the one bit code `0`.
pub fn build_codes(root: &HuffmanNode) -> CodeMap {
    let mut codes = CodeMap::default();
    if let HuffmanNode::Leaf { symbol, .. } = root {
        codes.insert(*symbol, vec![false]);
        return codes;
    }

    let mut stack: Vec<(&HuffmanNode, Code)> = vec![(root, Vec::new())];
    while let Some((node, prefix)) = stack.pop() {
        match node {
            HuffmanNode::Leaf { symbol, .. } => {
                trace!("{:?} -> {}", symbol, BitString::from(prefix.clone()));
                codes.entry(*symbol).or_insert(prefix);
            }
            HuffmanNode::Internal { left, right, .. } => {
                let mut right_prefix = prefix.clone();
                right_prefix.push(true);
                stack.push((right, right_prefix));
                let mut left_prefix = prefix;
                left_prefix.push(false);
                stack.push((left, left_prefix));
            }
        }
    }
    codes
}

/// Concatenate the code of every char of `text`, in order.
pub fn encode(text: &str, codes: &CodeMap) -> Result<BitString> {
    let mut bits = BitString::with_capacity(text.len() * 4);
    for ch in text.chars() {
        let code = codes.get(&ch).ok_or(Error::UnknownSymbol(ch))?;
        bits.extend_from_slice(code);
    }
    Ok(bits)
}

/// Walk the tree bit by bit (0 = left, 1 = right), emitting a symbol at every leaf and
/// starting again from the root. Bits that run out part-way into a code are an error.
/// With a lone-leaf tree every bit is one symbol.
pub fn decode(bits: &BitString, tree: &HuffmanNode) -> Result<String> {
    if let HuffmanNode::Leaf { symbol, .. } = tree {
        return Ok(std::iter::repeat(*symbol).take(bits.len()).collect());
    }

    let mut text = String::new();
    let mut node = tree;
    let mut dangling = 0;
    for bit in bits.iter() {
        if let HuffmanNode::Internal { left, right, .. } = node {
            node = if bit { right } else { left };
        }
        dangling += 1;
        if let HuffmanNode::Leaf { symbol, .. } = node {
            text.push(*symbol);
            node = tree;
            dangling = 0;
        }
    }
    if dangling > 0 {
        return Err(Error::IncompleteCode { dangling });
    }
    Ok(text)
}

#[cfg(test)]
mod test {
    use super::{build_codes, build_tree, decode, encode, HuffmanNode};
    use crate::bitstream::BitString;
    use crate::Error;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn weights_sum_to_text_length() {
        let tree = build_tree("- b\n+ x\n").unwrap();
        assert_eq!(tree.weight(), 8);
        assert_eq!(tree.leaf_count(), 6);
    }

    #[test]
    fn empty_text_is_an_error() {
        assert!(matches!(build_tree(""), Err(Error::EmptyInput)));
    }

    #[test]
    fn single_symbol_gets_one_bit_code() {
        let tree = build_tree("aaaa").unwrap();
        assert_eq!(tree, HuffmanNode::leaf('a', 4));
        let codes = build_codes(&tree);
        assert_eq!(codes[&'a'], vec![false]);
        let bits = encode("aaaa", &codes).unwrap();
        assert_eq!(bits.to_string(), "0000");
        assert_eq!(decode(&bits, &tree).unwrap(), "aaaa");
    }

    #[test]
    fn two_symbols_get_one_bit_each() {
        let tree = build_tree("abb").unwrap();
        let codes = build_codes(&tree);
        // 'a' is lighter, popped first, so it sits on the left.
        assert_eq!(codes[&'a'], vec![false]);
        assert_eq!(codes[&'b'], vec![true]);
    }

    #[test]
    fn heavier_symbols_get_shorter_codes() {
        let text = "aaaaaaaabbbbccd";
        let codes = build_codes(&build_tree(text).unwrap());
        assert!(codes[&'a'].len() <= codes[&'b'].len());
        assert!(codes[&'b'].len() <= codes[&'c'].len());
        assert!(codes[&'c'].len() <= codes[&'d'].len());
    }

    #[test]
    fn codes_are_prefix_free() {
        let codes = build_codes(&build_tree("the quick brown fox jumps over the lazy dog").unwrap());
        for (a, ca) in &codes {
            for (b, cb) in &codes {
                if a != b {
                    assert!(!cb.starts_with(ca), "{:?} is a prefix of {:?}", a, b);
                }
            }
        }
    }

    #[test]
    fn fresh_code_map_per_tree() {
        let first = build_codes(&build_tree("xyz").unwrap());
        let second = build_codes(&build_tree("ab").unwrap());
        assert_eq!(first.len(), 3);
        assert_eq!(second.len(), 2);
        assert!(!second.contains_key(&'x'));
    }

    #[test]
    fn unknown_symbol_is_rejected() {
        let codes = build_codes(&build_tree("ab").unwrap());
        assert!(matches!(encode("abc", &codes), Err(Error::UnknownSymbol('c'))));
    }

    #[test]
    fn trailing_partial_code_is_rejected() {
        let tree = build_tree("abcc").unwrap();
        let codes = build_codes(&tree);
        let mut bits = encode("ab", &codes).unwrap();
        // 'a' is coded 10, so its first bit alone is a partial code.
        bits.push(codes[&'a'][0]);
        assert!(matches!(
            decode(&bits, &tree),
            Err(Error::IncompleteCode { dangling: 1 })
        ));
    }

    #[test]
    fn empty_bits_decode_to_empty_text() {
        let tree = build_tree("ab").unwrap();
        assert_eq!(decode(&BitString::new(), &tree).unwrap(), "");
    }

    #[test]
    fn build_is_deterministic() {
        let text = "+ some line\n- another line\n";
        assert_eq!(build_tree(text).unwrap(), build_tree(text).unwrap());
    }

    #[rstest]
    #[case("- b\n+ x\n")]
    #[case("ab")]
    #[case("zzzzzzzzzzzzzzzzzzzzzzzzy")]
    #[case("- ünïcödé ✓\n+ 日本語\n")]
    fn round_trip(#[case] text: &str) {
        let tree = build_tree(text).unwrap();
        let bits = encode(text, &build_codes(&tree)).unwrap();
        assert_eq!(decode(&bits, &tree).unwrap(), text);
    }
}
