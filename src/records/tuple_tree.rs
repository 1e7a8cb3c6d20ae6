//! # Tuple Tree - Leaf Path Indexing
//!
//! A nested tuple is stored flat: one slot per terminal field, in depth-first
//! left-to-right order. `TupleTree` computes that order once so the decoder
//! can walk the slots linearly and still know where each value belongs.
//!
//! ```text
//! (i64, (str, (bool, f64)), option[i64])
//!
//!   path      type
//!   [0]       i64
//!   [1, 0]    str
//!   [1, 1, 0] bool
//!   [1, 1, 1] f64
//!   [2]       option[i64]
//! ```
//!
//! Only plain tuples are descended into. `option[(..)]` is a terminal: its
//! bytes form a nested row of their own.

use eyre::{ensure, Result};
use smallvec::SmallVec;

use crate::records::row_type::RowType;

pub type LeafPath = SmallVec<[usize; 4]>;

#[derive(Debug, Clone)]
pub struct Leaf<'a> {
    pub path: LeafPath,
    pub row_type: &'a RowType,
}

#[derive(Debug, Clone)]
pub struct TupleTree<'a> {
    root: &'a RowType,
    leaves: Vec<Leaf<'a>>,
}

impl<'a> TupleTree<'a> {
    pub fn new(root: &'a RowType) -> Result<Self> {
        ensure!(root.is_tuple(), "tuple tree requires a tuple type, got {}", root);

        let mut leaves = Vec::new();
        let mut prefix = LeafPath::new();
        collect_leaves(root.fields(), &mut prefix, &mut leaves);

        Ok(Self { root, leaves })
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn leaves(&self) -> &[Leaf<'a>] {
        &self.leaves
    }

    pub fn paths(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.leaves.iter().map(|leaf| leaf.path.as_slice())
    }

    /// Resolves the type at `path`. The empty path is the root tuple itself,
    /// and prefixes of leaf paths resolve to the intermediate sub-tuples.
    pub fn field_type(&self, path: &[usize]) -> Option<&'a RowType> {
        let mut current = self.root;
        for &idx in path {
            if !current.is_tuple() {
                return None;
            }
            current = current.fields().get(idx)?;
        }
        Some(current)
    }
}

fn collect_leaves<'a>(fields: &'a [RowType], prefix: &mut LeafPath, out: &mut Vec<Leaf<'a>>) {
    for (idx, field) in fields.iter().enumerate() {
        prefix.push(idx);
        if field.is_tuple() {
            collect_leaves(field.fields(), prefix, out);
        } else {
            out.push(Leaf {
                path: prefix.clone(),
                row_type: field,
            });
        }
        prefix.pop();
    }
}

/// Length of the shared prefix of two paths.
pub fn common_prefix_len(a: &[usize], b: &[usize]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}
