use std::cmp::Ordering;
use std::fmt;

use crate::frequency::FrequencyTable;
use crate::min_heap::MinHeap;

/// Huffman code tree. Only constructed by [`HuffmanTree::build`], so the
/// root is always an internal node and every leaf gets a non-empty code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: HuffNode,
}

impl HuffmanTree {
    /// Builds the code tree for `frequencies`, or `None` when there is
    /// nothing to encode.
    ///
    /// A single symbol is wrapped in an internal node with no right child,
    /// giving it the one-bit code `0`. Otherwise the two lightest trees are
    /// merged until one remains; equal weights are taken in insertion order,
    /// leaves first in table order and merged nodes in creation order.
    pub fn build(frequencies: &FrequencyTable) -> Option<Self> {
        let mut seq = 0u64;
        let mut next_entry = |node: HuffNode| {
            let entry = HeapEntry { weight: node.weight(), seq, node };
            seq += 1;
            entry
        };

        let leaves: Vec<HeapEntry> = frequencies
            .iter()
            .map(|(symbol, weight)| next_entry(HuffNode::new(symbol, weight)))
            .collect();
        let mut heap = MinHeap::build(leaves);

        if heap.heap_size() == 1 {
            let only = heap.extract_min()?.node;
            log::debug!("single symbol tree, wrapping leaf {:?}", only);
            return Some(HuffmanTree {
                root: HuffNode::Internal {
                    weight: only.weight(),
                    left: Box::new(only),
                    right: None,
                },
            });
        }

        while heap.heap_size() > 1 {
            let (Some(x), Some(y)) = (heap.extract_min(), heap.extract_min()) else {
                break;
            };
            let z = HuffNode::merge(x.node, y.node);
            log::trace!("merged {} + {} -> {}", x.weight, y.weight, z.weight());
            heap.insert(next_entry(z));
        }

        let root = heap.extract_min()?.node;
        log::debug!(
            "built tree over {} symbols, weight {}, depth {}",
            frequencies.len(),
            root.weight(),
            root.depth()
        );
        Some(HuffmanTree { root })
    }

    pub fn root(&self) -> &HuffNode {
        &self.root
    }

    /// Total weight, i.e. the number of symbols counted.
    pub fn weight(&self) -> u64 {
        self.root.weight()
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Length of the longest code.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    fn fmt_node(f: &mut fmt::Formatter<'_>, node: &HuffNode, depth: usize, label: &str) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match node {
            HuffNode::Leaf { symbol, weight } => {
                writeln!(f, "{indent}{label}-> Leaf: {symbol:?} [weight: {weight}]")
            }
            HuffNode::Internal { weight, left, right } => {
                writeln!(f, "{indent}{label}-> Internal [weight: {weight}]")?;
                Self::fmt_node(f, left, depth + 1, "L")?;
                match right {
                    Some(right) => Self::fmt_node(f, right, depth + 1, "R"),
                    None => writeln!(f, "{indent}  R-> (none)"),
                }
            }
        }
    }
}

impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Self::fmt_node(f, &self.root, 0, "root")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        weight: u64,
        symbol: char,
    },
    Internal {
        weight: u64,
        left: Box<HuffNode>,
        // only absent under the single-symbol root
        right: Option<Box<HuffNode>>,
    },
}

impl HuffNode {
    pub fn new(symbol: char, weight: u64) -> Self {
        HuffNode::Leaf { weight, symbol }
    }

    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn symbol(&self) -> Option<char> {
        match self {
            HuffNode::Leaf { symbol, .. } => Some(*symbol),
            HuffNode::Internal { .. } => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }

    /// Child reached by `bit` (false = left, true = right), if present.
    pub fn child(&self, bit: bool) -> Option<&HuffNode> {
        match self {
            HuffNode::Leaf { .. } => None,
            HuffNode::Internal { left, right, .. } => {
                if bit {
                    right.as_deref()
                } else {
                    Some(left)
                }
            }
        }
    }

    pub fn merge(a: Self, b: Self) -> Self {
        // a is the lighter node
        HuffNode::Internal {
            weight: a.weight().saturating_add(b.weight()),
            left: Box::new(a),
            right: Some(Box::new(b)),
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 1,
            HuffNode::Internal { left, right, .. } => {
                left.leaf_count() + right.as_ref().map_or(0, |r| r.leaf_count())
            }
        }
    }

    fn depth(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 0,
            HuffNode::Internal { left, right, .. } => {
                1 + left.depth().max(right.as_ref().map_or(0, |r| r.depth()))
            }
        }
    }
}

/// Heap slot ordered by weight, then by insertion sequence.
#[derive(Debug)]
struct HeapEntry {
    weight: u64,
    seq: u64,
    node: HuffNode,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .cmp(&other.weight)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn table(pairs: &[(char, u64)]) -> FrequencyTable {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_empty_table_has_no_tree() {
        assert!(HuffmanTree::build(&FrequencyTable::new()).is_none());
    }

    #[test]
    fn test_single_symbol_is_wrapped() {
        let tree = HuffmanTree::build(&table(&[('a', 5)])).unwrap();
        match tree.root() {
            HuffNode::Internal { weight, left, right } => {
                assert_eq!(*weight, 5);
                assert_eq!(**left, HuffNode::new('a', 5));
                assert!(right.is_none());
            }
            leaf => panic!("root should be internal, got {leaf:?}"),
        }
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn test_two_symbols_lighter_goes_left() {
        let tree = HuffmanTree::build(&table(&[('x', 7), ('y', 2)])).unwrap();
        let root = tree.root();
        assert_eq!(root.weight(), 9);
        assert_eq!(root.child(false).and_then(HuffNode::symbol), Some('y'));
        assert_eq!(root.child(true).and_then(HuffNode::symbol), Some('x'));
    }

    #[test]
    fn test_merge_shape() {
        // c+d=2, then b(2) vs cd(2) tie: b was inserted first, so b goes left
        let tree = HuffmanTree::build(&table(&[('a', 5), ('b', 2), ('c', 1), ('d', 1)])).unwrap();
        assert_eq!(tree.weight(), 9);
        assert_eq!(tree.leaf_count(), 4);
        assert_eq!(tree.depth(), 3);

        let root = tree.root();
        let left = root.child(false).unwrap();
        assert_eq!(left.weight(), 4);
        assert_eq!(left.child(false).and_then(HuffNode::symbol), Some('b'));
        let cd = left.child(true).unwrap();
        assert_eq!(cd.child(false).and_then(HuffNode::symbol), Some('c'));
        assert_eq!(cd.child(true).and_then(HuffNode::symbol), Some('d'));
        assert_eq!(root.child(true).and_then(HuffNode::symbol), Some('a'));
    }

    #[test]
    fn test_huge_weights_do_not_overflow() {
        let tree = HuffmanTree::build(&table(&[('a', u64::MAX), ('b', u64::MAX)])).unwrap();
        assert_eq!(tree.weight(), u64::MAX);
        assert_eq!(tree.leaf_count(), 2);
    }

    #[test]
    fn test_build_is_deterministic() {
        let freqs = FrequencyTable::from_text("the quick brown fox jumps over the lazy dog");
        let a = HuffmanTree::build(&freqs).unwrap();
        let b = HuffmanTree::build(&freqs).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_display_lists_every_leaf() {
        let tree = HuffmanTree::build(&table(&[('a', 3), ('b', 1)])).unwrap();
        let rendered = tree.to_string();
        assert!(rendered.starts_with("root-> Internal [weight: 4]"));
        assert!(rendered.contains("L-> Leaf: 'b' [weight: 1]"));
        assert!(rendered.contains("R-> Leaf: 'a' [weight: 3]"));
    }
}
