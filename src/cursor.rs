use std::iter::Peekable;

use crate::{token::SyntaxElement, ErrorKind, LrResult, Symbol};

/// A single pass over the input tokens.
///
/// Once the tokens are exhausted, the cursor produces the end symbol, once.
pub struct Cursor<'sid, I>
where
    I: Iterator<Item = SyntaxElement<'sid>>,
{
    input: Peekable<I>,
    end: Symbol<'sid>,
    produced: usize,
    exhausted: bool,
}

impl<'sid, I> Cursor<'sid, I>
where
    I: Iterator<Item = SyntaxElement<'sid>>,
{
    pub fn new(input: I, end: Symbol<'sid>) -> Self {
        Self {
            input: input.peekable(),
            end,
            produced: 0,
            exhausted: false,
        }
    }

    /// Consumes the next token.
    pub fn consume(&mut self) -> LrResult<SyntaxElement<'sid>> {
        if let Some(token) = self.input.next() {
            self.produced += 1;
            return Ok(token);
        }

        if self.exhausted {
            return Err(ErrorKind::inconsistent("the input was read past its end").into());
        }

        self.produced += 1;
        self.exhausted = true;
        Ok(self.end.into())
    }

    /// The symbol of the next token, without consuming it.
    pub fn peek(&mut self) -> Symbol<'sid> {
        self.input
            .peek()
            .map(|token| token.symbol)
            .unwrap_or(self.end)
    }

    /// Position of the last produced token.
    pub fn position(&self) -> usize {
        self.produced.saturating_sub(1)
    }

    /// Checks the end symbol was synthesized, rather than read from the input.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Returns the first token left in the input, with its position.
    pub fn residual(&mut self) -> Option<(usize, SyntaxElement<'sid>)> {
        if self.exhausted {
            return None;
        }

        self.input.next().map(|token| (self.produced, token))
    }
}
