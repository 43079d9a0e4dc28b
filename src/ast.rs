use itertools::Itertools as _;

use crate::{token::SyntaxElement, Symbol};

/// A node of the parse tree.
///
/// Leaves are input tokens, inner nodes are reduced symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNode<'sid> {
    pub element: SyntaxElement<'sid>,
    pub children: Vec<ParseNode<'sid>>,
}

impl<'sid> ParseNode<'sid> {
    pub fn new<I: IntoIterator<Item = Self>>(symbol: Symbol<'sid>, children: I) -> Self {
        Self {
            element: SyntaxElement::bare(symbol),
            children: children.into_iter().collect(),
        }
    }

    pub fn leaf(element: SyntaxElement<'sid>) -> Self {
        Self {
            element,
            children: vec![],
        }
    }

    pub fn symbol(&self) -> Symbol<'sid> {
        self.element.symbol
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Iterate over the leaves, left to right.
    pub fn iter_leaves(&self) -> Box<dyn Iterator<Item = &SyntaxElement<'sid>> + '_> {
        if self.is_leaf() {
            Box::new(std::iter::once(&self.element))
        } else {
            Box::new(self.children.iter().flat_map(ParseNode::iter_leaves))
        }
    }
}

impl<'sid> From<SyntaxElement<'sid>> for ParseNode<'sid> {
    fn from(element: SyntaxElement<'sid>) -> Self {
        Self::leaf(element)
    }
}

/// Renders the tree as `E[E[T[id(x)]], +, T[id(y)]]`.
impl std::fmt::Display for ParseNode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.element)?;

        if !self.is_leaf() {
            write!(f, "[{}]", self.children.iter().join(", "))?;
        }

        Ok(())
    }
}
