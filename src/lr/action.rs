use std::collections::BTreeMap;

use crate::{item::Lookaheads, RuleId, SymbolId};

use super::StateId;

/// Transitions of a state, by symbol.
pub type Shifts = BTreeMap<SymbolId, StateId>;

/// A completed rule: pop `count` entries, push `lhs`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Reduction {
    pub rule: RuleId,
    pub lhs: SymbolId,
    pub count: usize,
}

/// What a state does. Each state does exactly one thing.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Action {
    Shift(Shifts),
    Reduce(Reduction),
    /// The augmenting rule is complete, `count` excludes the end symbol.
    Accept(Reduction),
    /// Reduce if the next input symbol is one of the lookaheads, shift otherwise.
    Resolve {
        reduction: Reduction,
        lookaheads: Lookaheads,
        shifts: Shifts,
    },
}

impl Action {
    /// The transitions out of the state, if it has any.
    pub fn shifts(&self) -> Option<&Shifts> {
        match self {
            Action::Shift(shifts) | Action::Resolve { shifts, .. } => Some(shifts),
            Action::Reduce(_) | Action::Accept(_) => None,
        }
    }

    pub fn target(&self, symbol: SymbolId) -> Option<StateId> {
        self.shifts().and_then(|shifts| shifts.get(&symbol)).copied()
    }
}

/// Short form, as found in parser tables.
impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Shift(_) => write!(f, "s"),
            Action::Reduce(reduction) => write!(f, "r{}", reduction.rule),
            Action::Accept(_) => write!(f, "acc"),
            Action::Resolve { reduction, .. } => write!(f, "r{}/s", reduction.rule),
        }
    }
}
