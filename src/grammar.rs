use itertools::Itertools as _;

use crate::{ErrorKind, LrResult, Rule, Symbol};

#[derive(Debug, Clone, Default, PartialEq)]
/// A grammar
///
/// The first rule is the augmenting rule: its left-hand side is the start symbol of the grammar,
/// and the last symbol of its right-hand side is the end-of-stream symbol.
/// Neither of them may appear in any other rule.
///
/// # Example
///
/// For the following grammar :
///
/// ```grammar
/// 1. S := E $
/// 2. E := E + T
/// 3. E := T
/// 4. T := id
/// 5. T := ( E )
/// ```
///
/// ```
/// use lrkit::Grammar;
///
/// let mut grammar = Grammar::default();
///
/// grammar
///     .add_terminal_symbol("$")?
///     .add_terminal_symbol("+")?
///     .add_terminal_symbol("id")?
///     .add_terminal_symbol("(")?
///     .add_terminal_symbol(")")?
///     .add_non_terminal_symbol("S")?
///     .add_non_terminal_symbol("E")?
///     .add_non_terminal_symbol("T")?;
///
/// grammar
///     .add_rule("S", ["E", "$"])?
///     .add_rule("E", ["E", "+", "T"])?
///     .add_rule("E", ["T"])?
///     .add_rule("T", ["id"])?
///     .add_rule("T", ["(", "E", ")"])?;
/// # Ok::<(), lrkit::LrError>(())
/// ```
pub struct Grammar<'sid> {
    rules: Vec<Rule<'sid>>,
    symbols: Vec<Symbol<'sid>>,
}

/// The distinguished symbols fixed by the augmenting rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Augmentation<'sid> {
    pub start: Symbol<'sid>,
    pub end: Symbol<'sid>,
}

impl<'sid> Grammar<'sid> {
    /// Add a non-terminal symbol in the grammar.
    ///
    /// Returns an error if a symbol with the same id already exists.
    pub fn add_non_terminal_symbol(&mut self, name: &'sid str) -> LrResult<&mut Self> {
        self.add_symbol(name, false)
    }

    /// Add a terminal symbol in the grammar.
    ///
    /// Returns an error if a symbol with the same id already exists.
    pub fn add_terminal_symbol(&mut self, name: &'sid str) -> LrResult<&mut Self> {
        self.add_symbol(name, true)
    }

    fn add_symbol(&mut self, name: &'sid str, terminal: bool) -> LrResult<&mut Self> {
        if self.try_get_symbol(name).is_some() {
            return Err(ErrorKind::DuplicatedSymbol(name.to_string()).into());
        }

        let id = self.symbols.len();
        self.symbols.push(Symbol::new(id, name, terminal));
        Ok(self)
    }

    /// Get a symbol based on its name.
    pub fn try_get_symbol(&self, name: &str) -> Option<Symbol<'sid>> {
        self.symbols.iter().find(|s| s.name == name).copied()
    }

    /// Returns the symbol behind the name
    ///
    /// # Panics
    /// Panics if no symbol match the name.
    pub fn sym(&self, name: &str) -> Symbol<'sid> {
        self.try_get_symbol(name)
            .unwrap_or_else(|| panic!("unknown symbol {name}"))
    }

    /// Add a new rule
    ///
    /// Returns an error if a symbol defined in the rule does not exist within the grammar,
    /// if the right-hand side is empty, or if the left-hand side is a terminal.
    pub fn add_rule<I>(&mut self, lhs: &str, rhs: I) -> LrResult<&mut Self>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let lhs = self
            .try_get_symbol(lhs)
            .ok_or_else(|| ErrorKind::unknown_symbol(lhs))?;

        if lhs.is_terminal() {
            return Err(ErrorKind::TerminalRuleHead(lhs.name.to_string()).into());
        }

        let rhs = rhs
            .into_iter()
            .map(|name| {
                self.try_get_symbol(name.as_ref())
                    .ok_or_else(|| ErrorKind::unknown_symbol(name.as_ref()).into())
            })
            .collect::<LrResult<Vec<_>>>()?;

        if rhs.is_empty() {
            return Err(ErrorKind::EmptyRule(lhs.name.to_string()).into());
        }

        self.rules.push(Rule {
            id: self.rules.len(),
            lhs,
            rhs,
        });

        Ok(self)
    }

    /// Iterate over all rules of the grammar
    pub fn iter_rules(&self) -> impl Iterator<Item = &Rule<'sid>> {
        self.rules.iter()
    }

    pub fn iter_symbols(&self) -> impl Iterator<Item = &Symbol<'sid>> {
        self.symbols.iter()
    }

    pub fn iter_terminal_symbols(&self) -> impl Iterator<Item = &Symbol<'sid>> {
        self.symbols.iter().filter(|sym| sym.is_terminal())
    }

    pub fn iter_non_terminal_symbols(&self) -> impl Iterator<Item = &Symbol<'sid>> {
        self.symbols.iter().filter(|sym| sym.is_non_terminal())
    }

    /// Checks the shape of the augmenting rule, and returns its start and end symbols.
    pub fn augment(&self) -> LrResult<Augmentation<'sid>> {
        let first = self.rules.first().ok_or(ErrorKind::EmptyGrammar)?;
        let start = first.lhs;
        let end = first
            .last()
            .ok_or_else(|| ErrorKind::EmptyRule(start.name.to_string()))?;

        let shape = |reason: &'static str, rules: &[&Rule<'sid>]| ErrorKind::GrammarShape {
            start: start.name.to_string(),
            end: end.name.to_string(),
            reason,
            rules: rules.iter().map(|rule| format!("- {rule}")).join("\n"),
        };

        if start == end {
            return Err(shape("the start and end symbols must differ", &[first]).into());
        }

        let body = &first.rhs[..first.rhs.len() - 1];

        if body.is_empty() {
            return Err(shape(
                "the start rule must produce at least one symbol before the end symbol",
                &[first],
            )
            .into());
        }

        if body.iter().any(|sym| *sym == start || *sym == end) {
            return Err(shape(
                "the start and end symbols must not appear in the middle of the start rule",
                &[first],
            )
            .into());
        }

        let bad: Vec<_> = self
            .rules
            .iter()
            .skip(1)
            .filter(|rule| {
                rule.lhs == start || rule.lhs == end || rule.contains(&start) || rule.contains(&end)
            })
            .collect();

        if !bad.is_empty() {
            return Err(shape(
                "the start and end symbols must not appear outside of the start rule",
                &bad,
            )
            .into());
        }

        Ok(Augmentation { start, end })
    }
}
