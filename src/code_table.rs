use std::collections::BTreeMap;
use std::fmt;

use crate::hufftree::{HuffNode, HuffmanTree};

/// Bit path from the root to a leaf, first bit first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Code(Vec<bool>);

impl Code {
    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Symbol to code mapping derived from a [`HuffmanTree`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<char, Code>,
}

impl CodeTable {
    /// Walks the tree depth-first, appending 0 when descending left and 1
    /// when descending right. An absent tree gives an empty table.
    pub fn from_tree(tree: Option<&HuffmanTree>) -> Self {
        let mut codes = BTreeMap::new();
        if let Some(tree) = tree {
            let mut path = Vec::with_capacity(tree.depth());
            Self::collect(tree.root(), &mut path, &mut codes);
            log::debug!("derived {} codes, longest {} bits", codes.len(), tree.depth());
        }
        CodeTable { codes }
    }

    fn collect(node: &HuffNode, path: &mut Vec<bool>, codes: &mut BTreeMap<char, Code>) {
        match node {
            HuffNode::Leaf { symbol, .. } => {
                codes.insert(*symbol, Code(path.clone()));
            }
            HuffNode::Internal { left, right, .. } => {
                path.push(false);
                Self::collect(left, path, codes);
                path.pop();
                if let Some(right) = right {
                    path.push(true);
                    Self::collect(right, path, codes);
                    path.pop();
                }
            }
        }
    }

    pub fn get(&self, symbol: char) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Entries ordered by symbol.
    pub fn iter(&self) -> impl Iterator<Item = (char, &Code)> {
        self.codes.iter().map(|(symbol, code)| (*symbol, code))
    }
}
