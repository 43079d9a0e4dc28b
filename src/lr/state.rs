use itertools::Itertools as _;

use crate::{Item, RuleSet};

use super::{Action, StateId};

/// A state of the automaton.
///
/// The basis holds the items the state was reached with, the extension the items added by closure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    id: StateId,
    basis: Vec<Item>,
    extension: Vec<Item>,
    action: Action,
}

impl State {
    pub(super) fn new(id: StateId, basis: Vec<Item>, extension: Vec<Item>, action: Action) -> Self {
        Self {
            id,
            basis,
            extension,
            action,
        }
    }

    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn basis(&self) -> &[Item] {
        &self.basis
    }

    pub fn extension(&self) -> &[Item] {
        &self.extension
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    /// Checks both states were reached with the same items, whatever their order.
    pub fn same_basis(&self, other: &Self) -> bool {
        self.basis.len() == other.basis.len()
            && self.basis.iter().all(|item| other.basis.contains(item))
    }
}

pub struct StateDisplay<'a, 'sid> {
    pub(super) state: &'a State,
    pub(super) rules: &'a RuleSet<'sid>,
}

impl std::fmt::Display for StateDisplay<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            render(
                self.state.id,
                self.state.basis.iter().cloned(),
                self.state.extension.iter().cloned(),
                Some(&self.state.action),
                self.rules,
            )
        )
    }
}

/// Renders a state.
///
/// ```text
/// STATE 3
/// - E -> T •
///   T -> T • * P
/// RESOLVE: E (1) on {$, +}, SHIFT: * → 7
/// ```
pub(crate) fn render<I1, I2>(
    id: StateId,
    basis: I1,
    extension: I2,
    action: Option<&Action>,
    rules: &RuleSet<'_>,
) -> String
where
    I1: Iterator<Item = Item>,
    I2: Iterator<Item = Item>,
{
    let name = |id: usize| {
        rules
            .symbol(id)
            .map(|sym| sym.name.to_string())
            .unwrap_or_else(|| format!("#{id}"))
    };

    let mut lines = vec![format!("STATE {id}")];
    lines.extend(basis.map(|item| format!("- {}", item.display(rules))));
    lines.extend(extension.map(|item| format!("  {}", item.display(rules))));

    let shifts = |shifts: &super::Shifts| {
        format!(
            "SHIFT: {}",
            shifts
                .iter()
                .map(|(sym, to)| format!("{} → {to}", name(*sym)))
                .join(", ")
        )
    };

    match action {
        Some(Action::Shift(edges)) => lines.push(shifts(edges)),
        Some(Action::Reduce(reduction)) => {
            lines.push(format!("REDUCE: {} ({})", name(reduction.lhs), reduction.count))
        }
        Some(Action::Accept(reduction)) => {
            lines.push(format!("ACCEPT: {} ({})", name(reduction.lhs), reduction.count))
        }
        Some(Action::Resolve {
            reduction,
            lookaheads,
            shifts: edges,
        }) => lines.push(format!(
            "RESOLVE: {} ({}) on {{{}}}, {}",
            name(reduction.lhs),
            reduction.count,
            lookaheads.iter().map(|sym| name(*sym)).join(", "),
            shifts(edges)
        )),
        None => {}
    }

    lines.join("\n")
}
