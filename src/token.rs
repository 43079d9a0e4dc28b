use crate::Symbol;

/// An occurrence of a symbol.
///
/// Either a token of the input stream, or a symbol synthesized by a reduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxElement<'sid> {
    pub symbol: Symbol<'sid>,
    pub text: Option<String>,
}

impl<'sid> SyntaxElement<'sid> {
    pub fn new<S>(symbol: Symbol<'sid>, text: S) -> Self
    where
        S: ToString,
    {
        Self {
            symbol,
            text: Some(text.to_string()),
        }
    }

    /// An element without any literal text.
    pub fn bare(symbol: Symbol<'sid>) -> Self {
        Self { symbol, text: None }
    }
}

impl<'sid> From<Symbol<'sid>> for SyntaxElement<'sid> {
    fn from(symbol: Symbol<'sid>) -> Self {
        Self::bare(symbol)
    }
}

impl std::fmt::Display for SyntaxElement<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.text {
            Some(text) if text != self.symbol.name => write!(f, "{}({})", self.symbol, text),
            _ => write!(f, "{}", self.symbol),
        }
    }
}
