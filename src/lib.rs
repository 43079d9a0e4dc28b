pub mod ast;
mod cursor;
pub mod error;
pub mod grammar;
pub mod item;
pub mod lr;
pub mod parser;
pub mod rule;
pub mod symbol;
pub mod token;

pub use ast::ParseNode;
pub use grammar::{Augmentation, Grammar};
pub use item::*;
pub use lr::{Action, LrParser, Reduction, Shifts, State, StateId};
pub use rule::*;
pub use symbol::*;
pub use token::SyntaxElement;

pub mod traits {
    pub use crate::parser::traits::Parser;
}

pub use error::{ErrorKind, ExpectedSymbols, LrError};
pub type LrResult<T> = Result<T, LrError>;

#[cfg(test)]
pub mod fixtures {
    use crate::{Grammar, LrResult};

    /// ```grammar
    /// S := E $
    /// E := E + T
    /// E := T
    /// T := id
    /// T := ( E )
    /// ```
    pub fn fixture_sum_grammar() -> LrResult<Grammar<'static>> {
        let mut grammar = Grammar::default();

        grammar
            .add_terminal_symbol("$")?
            .add_terminal_symbol("+")?
            .add_terminal_symbol("id")?
            .add_terminal_symbol("(")?
            .add_terminal_symbol(")")?
            .add_non_terminal_symbol("S")?
            .add_non_terminal_symbol("E")?
            .add_non_terminal_symbol("T")?;

        grammar
            .add_rule("S", ["E", "$"])?
            .add_rule("E", ["E", "+", "T"])?
            .add_rule("E", ["T"])?
            .add_rule("T", ["id"])?
            .add_rule("T", ["(", "E", ")"])?;

        Ok(grammar)
    }

    /// ```grammar
    /// S := E $
    /// E := E + T
    /// E := T
    /// T := T * P
    /// T := P
    /// P := id
    /// P := ( E )
    /// ```
    pub fn fixture_sum_of_products_grammar() -> LrResult<Grammar<'static>> {
        let mut grammar = Grammar::default();

        grammar
            .add_terminal_symbol("$")?
            .add_terminal_symbol("+")?
            .add_terminal_symbol("*")?
            .add_terminal_symbol("id")?
            .add_terminal_symbol("(")?
            .add_terminal_symbol(")")?
            .add_non_terminal_symbol("S")?
            .add_non_terminal_symbol("E")?
            .add_non_terminal_symbol("T")?
            .add_non_terminal_symbol("P")?;

        grammar
            .add_rule("S", ["E", "$"])?
            .add_rule("E", ["E", "+", "T"])?
            .add_rule("E", ["T"])?
            .add_rule("T", ["T", "*", "P"])?
            .add_rule("T", ["P"])?
            .add_rule("P", ["id"])?
            .add_rule("P", ["(", "E", ")"])?;

        Ok(grammar)
    }

    /// Sums and products on a single tier, which makes them ambiguous.
    pub fn fixture_single_tier_grammar() -> LrResult<Grammar<'static>> {
        let mut grammar = Grammar::default();

        grammar
            .add_terminal_symbol("$")?
            .add_terminal_symbol("+")?
            .add_terminal_symbol("*")?
            .add_terminal_symbol("id")?
            .add_non_terminal_symbol("S")?
            .add_non_terminal_symbol("E")?;

        grammar
            .add_rule("S", ["E", "$"])?
            .add_rule("E", ["E", "+", "E"])?
            .add_rule("E", ["E", "*", "E"])?
            .add_rule("E", ["id"])?;

        Ok(grammar)
    }
}
