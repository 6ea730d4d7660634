//! The ordered leaf sequence of one compilation run.

use std::{fmt, slice};

use crate::leaf::Leaf;

/// A flat, ordered sequence of [`Leaf`] records.
///
/// Leaf order is the source order of the constructs and is significant:
/// the generator renders leaves in this order and concatenates the results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    leaves: Vec<Leaf>,
}

impl Program {
    /// Create a program from leaves in source order.
    pub fn new(leaves: Vec<Leaf>) -> Self {
        Self { leaves }
    }

    /// Returns the leaves in source order.
    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    /// Returns an iterator over the leaves in source order.
    pub fn iter(&self) -> slice::Iter<'_, Leaf> {
        self.leaves.iter()
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Leaf;
    type IntoIter = slice::Iter<'a, Leaf>;

    fn into_iter(self) -> Self::IntoIter {
        self.leaves.iter()
    }
}

impl FromIterator<Leaf> for Program {
    fn from_iter<T: IntoIterator<Item = Leaf>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// One leaf per line, wrapped in brackets. An empty program renders as `[]`.
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.leaves.is_empty() {
            return write!(f, "[]");
        }
        writeln!(f, "[")?;
        for leaf in &self.leaves {
            writeln!(f, "  {leaf},")?;
        }
        write!(f, "]")
    }
}
