use std::{collections::BTreeMap, hash::Hash};

use itertools::Itertools;

use crate::{Grammar, Symbol, SymbolId};

/// The rule's identifier in the grammar.
pub type RuleId = usize;

#[derive(Debug, Clone)]
/// A grammar rule
///
/// Rules are equal if their symbols are, whatever their position in the grammar.
///
/// # Example
/// A -> w <eos>
pub struct Rule<'sid> {
    pub id: RuleId,
    pub lhs: Symbol<'sid>,
    pub rhs: Vec<Symbol<'sid>>,
}

impl PartialEq for Rule<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.lhs == other.lhs && self.rhs == other.rhs
    }
}

impl Eq for Rule<'_> {}

impl Hash for Rule<'_> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.lhs.hash(state);
        self.rhs.hash(state);
    }
}

impl std::fmt::Display for Rule<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.lhs, self.rhs.iter().join(" "))
    }
}

impl<'sid> Rule<'sid> {
    /// Check the rules contains a certain symbol in its RHS.
    #[inline(always)]
    pub fn contains(&self, sym: &Symbol<'_>) -> bool {
        self.rhs.iter().any(|s| s.id == sym.id)
    }

    /// The last symbol of the right-hand side.
    pub fn last(&self) -> Option<Symbol<'sid>> {
        self.rhs.last().copied()
    }
}

/// A set of rules.
///
/// This object is used to generate parser tables, it owns a copy of the grammar's symbol table.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet<'sid> {
    rules: Vec<Rule<'sid>>,
    symbols: Vec<Symbol<'sid>>,
    by_lhs: BTreeMap<SymbolId, Vec<RuleId>>,
}

impl<'sid> RuleSet<'sid> {
    pub fn new(grammar: &Grammar<'sid>) -> Self {
        let rules: Vec<_> = grammar.iter_rules().cloned().collect();
        let mut by_lhs = BTreeMap::<SymbolId, Vec<RuleId>>::default();

        for rule in rules.iter() {
            by_lhs.entry(rule.lhs.id).or_default().push(rule.id);
        }

        Self {
            rules,
            symbols: grammar.iter_symbols().copied().collect(),
            by_lhs,
        }
    }

    /// Iterate over all rules of the grammar
    pub fn iter(&self) -> impl Iterator<Item = &Rule<'sid>> {
        self.rules.iter()
    }

    /// Iterate over the rules producing the symbol.
    pub fn iter_by_symbol(&self, sym: SymbolId) -> impl Iterator<Item = &Rule<'sid>> + '_ {
        self.by_lhs
            .get(&sym)
            .into_iter()
            .flatten()
            .filter_map(|id| self.rules.get(*id))
    }

    pub fn get(&self, id: RuleId) -> Option<&Rule<'sid>> {
        self.rules.get(id)
    }

    /// Returns the symbol behind the key.
    pub fn symbol(&self, id: SymbolId) -> Option<Symbol<'sid>> {
        self.symbols.get(id).copied()
    }

    pub fn iter_symbols(&self) -> impl Iterator<Item = Symbol<'sid>> + '_ {
        self.symbols.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::{fixtures::fixture_sum_grammar, RuleSet};

    #[test]
    fn test_rules_by_symbol() {
        let grammar = fixture_sum_grammar().expect("cannot create grammar");
        let rules = RuleSet::new(&grammar);

        let e = grammar.sym("E").id;
        let ids: Vec<_> = rules.iter_by_symbol(e).map(|rule| rule.id).collect();
        assert_eq!(ids, vec![1, 2]);

        let id = grammar.sym("id").id;
        assert_eq!(rules.iter_by_symbol(id).count(), 0);

        let rule = rules.get(1).expect("missing rule");
        assert_eq!(rule.to_string(), "E -> E + T");
        assert!(rule.contains(&grammar.sym("+")));
        assert_eq!(rules.symbol(e), Some(grammar.sym("E")));

        assert!(!rules.is_empty());
        assert_eq!(rules.len(), 5);
        assert!(rules.iter().enumerate().all(|(id, rule)| rule.id == id));
    }
}
