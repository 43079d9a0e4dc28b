pub mod traits {
    use crate::{token::SyntaxElement, LrResult, ParseNode};

    pub trait Parser<'sid> {
        /// Parses the tokens into a tree rooted at the start symbol.
        ///
        /// The end symbol is appended to the input when it runs out. Tokens must be terminals.
        ///
        /// When the start rule produces a single symbol before the end symbol, that symbol's node is
        /// the root. A longer start rule (`S -> A B $`) does not fail on acceptance: its nodes become
        /// the children of a root built for the start symbol.
        fn parse<I>(&self, input: I) -> LrResult<ParseNode<'sid>>
        where
            I: IntoIterator<Item = SyntaxElement<'sid>>;
    }
}
