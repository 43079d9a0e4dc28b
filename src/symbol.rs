use std::hash::Hash;

/// The symbol's key in its grammar's symbol table.
pub type SymbolId = usize;

/// Defines a symbol
///
/// Symbols are interned by the grammar: two symbols are the same symbol
/// if they share the same id.
#[derive(Debug, Clone, Copy)]
pub struct Symbol<'sid> {
    /// Key assigned by the grammar
    pub id: SymbolId,
    /// Display name, *unique* within the grammar
    pub name: &'sid str,
    /// Set the symbol as terminal
    pub terminal: bool,
}

impl<'sid> Symbol<'sid> {
    pub fn new(id: SymbolId, name: &'sid str, terminal: bool) -> Self {
        Self { id, name, terminal }
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn is_non_terminal(&self) -> bool {
        !self.terminal
    }
}

impl PartialEq for Symbol<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol<'_> {}

impl Hash for Symbol<'_> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for Symbol<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::Symbol;

    #[test]
    fn test_symbols_compare_by_key() {
        let a = Symbol::new(3, "E", false);
        let b = Symbol::new(3, "E", false);
        let c = Symbol::new(4, "E", false);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_string(), "E");
    }
}
