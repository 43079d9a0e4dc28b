use crate::{
    item::{ItemCore, Lookaheads},
    ErrorKind, ItemSet, LrResult, RuleSet, SymbolId,
};

use super::{state, Action, Reduction, Shifts};

/// A closed item set and the states its shift items lead to.
pub struct Transition<'set> {
    pub(super) from: &'set ItemSet,
    pub(super) edges: Shifts,
}

impl<'set> Transition<'set> {
    pub fn new(from: &'set ItemSet, edges: Shifts) -> Self {
        Self { from, edges }
    }

    fn describe(&self, rules: &RuleSet<'_>) -> String {
        state::render(
            self.from.id,
            self.from.iter_kernel(),
            self.from.iter_extension(),
            None,
            rules,
        )
    }

    fn reduction(&self, core: &ItemCore, rules: &RuleSet<'_>, end: SymbolId) -> LrResult<Action> {
        let rule = rules.get(core.rule).ok_or_else(|| {
            ErrorKind::inconsistent(format!("missing rule #{} in state #{}", core.rule, self.from.id))
        })?;

        let reduction = Reduction {
            rule: rule.id,
            lhs: rule.lhs.id,
            count: rule.rhs.len(),
        };

        if rule.last().map(|sym| sym.id) == Some(end) {
            Ok(Action::Accept(Reduction {
                count: reduction.count - 1,
                ..reduction
            }))
        } else {
            Ok(Action::Reduce(reduction))
        }
    }

    /// Derives the action of the state.
    ///
    /// A state either reduces by a single rule or shifts. With `K > 0`, a single reduction that
    /// competes with shifts is resolved by its lookaheads, provided they do not overlap the
    /// shifted symbols.
    pub fn action<const K: usize>(&self, rules: &RuleSet<'_>, end: SymbolId) -> LrResult<Action> {
        let state = self.from.id;
        let reductions: Vec<(&ItemCore, &Lookaheads)> =
            self.from.iter_exhausted_items(rules).collect();

        match (reductions.as_slice(), self.edges.is_empty()) {
            ([], true) => Err(ErrorKind::EmptyState {
                state,
                display: self.describe(rules),
            }
            .into()),

            ([], false) => Ok(Action::Shift(self.edges.clone())),

            ([(core, _)], true) => self.reduction(core, rules, end),

            ([(core, lookaheads)], false) if K > 0 => {
                let overlaps = lookaheads.iter().any(|sym| self.edges.contains_key(sym));

                match self.reduction(core, rules, end)? {
                    Action::Reduce(reduction) if !lookaheads.is_empty() && !overlaps => {
                        Ok(Action::Resolve {
                            reduction,
                            lookaheads: (*lookaheads).clone(),
                            shifts: self.edges.clone(),
                        })
                    }
                    _ => Err(ErrorKind::ShiftReduceConflict {
                        state,
                        display: self.describe(rules),
                    }
                    .into()),
                }
            }

            ([_], false) => Err(ErrorKind::ShiftReduceConflict {
                state,
                display: self.describe(rules),
            }
            .into()),

            (_, false) if K == 0 => Err(ErrorKind::ShiftReduceConflict {
                state,
                display: self.describe(rules),
            }
            .into()),

            (_, _) => Err(ErrorKind::ReduceReduceConflict {
                state,
                display: self.describe(rules),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        fixtures::{fixture_sum_grammar, fixture_sum_of_products_grammar},
        lr::{Action, Shifts},
        ErrorKind, Item, ItemCore, ItemSet, RuleSet,
    };

    use super::Transition;

    fn closed<const K: usize>(rules: &RuleSet<'_>, items: Vec<Item>) -> ItemSet {
        let mut set = ItemSet::from_iter(items);
        set.close::<K>(rules);
        set
    }

    #[test]
    fn test_reduce_and_accept() {
        let g = fixture_sum_grammar().expect("cannot create grammar");
        let rules = RuleSet::new(&g);
        let end = g.sym("$").id;

        // E → E + T •
        let set = closed::<0>(&rules, vec![Item::new(ItemCore { rule: 1, position: 3 }, [])]);
        match Transition::new(&set, Shifts::default()).action::<0>(&rules, end) {
            Ok(Action::Reduce(reduction)) => {
                assert_eq!(reduction.lhs, g.sym("E").id);
                assert_eq!(reduction.count, 3);
            }
            other => panic!("unexpected action {other:?}"),
        }

        // S → E $ •
        let set = closed::<0>(&rules, vec![Item::new(ItemCore { rule: 0, position: 2 }, [])]);
        match Transition::new(&set, Shifts::default()).action::<0>(&rules, end) {
            Ok(Action::Accept(reduction)) => {
                assert_eq!(reduction.lhs, g.sym("S").id);
                assert_eq!(reduction.count, 1);
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn test_empty_state() {
        let g = fixture_sum_grammar().expect("cannot create grammar");
        let rules = RuleSet::new(&g);

        let set = ItemSet::default();
        let err = Transition::new(&set, Shifts::default())
            .action::<0>(&rules, g.sym("$").id)
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::EmptyState { state: 0, .. }));
    }

    #[test]
    fn test_conflict_is_resolved_by_lookaheads() {
        let g = fixture_sum_of_products_grammar().expect("cannot create grammar");
        let rules = RuleSet::new(&g);
        let (plus, times, end) = (g.sym("+").id, g.sym("*").id, g.sym("$").id);

        // E → T •, {$, +} and T → T • * P, {$, +, *}
        let set = closed::<1>(
            &rules,
            vec![
                Item::new(ItemCore { rule: 2, position: 1 }, [end, plus]),
                Item::new(ItemCore { rule: 3, position: 1 }, [end, plus, times]),
            ],
        );
        let edges = Shifts::from_iter([(times, 7)]);

        let err = Transition::new(&set, edges.clone())
            .action::<0>(&rules, end)
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ShiftReduceConflict { .. }));

        match Transition::new(&set, edges).action::<1>(&rules, end) {
            Ok(Action::Resolve {
                reduction,
                lookaheads,
                shifts,
            }) => {
                assert_eq!(reduction.rule, 2);
                assert_eq!(lookaheads.into_iter().collect::<Vec<_>>(), vec![end, plus]);
                assert_eq!(shifts.get(&times), Some(&7));
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn test_overlapping_lookaheads_are_a_conflict() {
        let g = fixture_sum_of_products_grammar().expect("cannot create grammar");
        let rules = RuleSet::new(&g);
        let (times, end) = (g.sym("*").id, g.sym("$").id);

        let set = closed::<1>(
            &rules,
            vec![
                Item::new(ItemCore { rule: 2, position: 1 }, [end, times]),
                Item::new(ItemCore { rule: 3, position: 1 }, [end, times]),
            ],
        );

        let err = Transition::new(&set, Shifts::from_iter([(times, 7)]))
            .action::<1>(&rules, end)
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ShiftReduceConflict { .. }));
    }

    #[test]
    fn test_reduce_reduce_conflict() {
        let g = fixture_sum_grammar().expect("cannot create grammar");
        let rules = RuleSet::new(&g);

        // E → T •, T → id •
        let set = closed::<1>(
            &rules,
            vec![
                Item::new(ItemCore { rule: 2, position: 1 }, []),
                Item::new(ItemCore { rule: 3, position: 1 }, []),
            ],
        );

        let err = Transition::new(&set, Shifts::default())
            .action::<1>(&rules, g.sym("$").id)
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ReduceReduceConflict { .. }));
    }
}
