use std::collections::{HashMap, VecDeque};

use crate::{
    item::Lookaheads, ErrorKind, ItemSet, ItemSetId, Kernel, LrResult, RuleSet, SymbolId,
};

use super::{Action, Shifts, State, Transition};

/// The graph of item sets, built breadth-first from the augmenting rule.
pub struct Graph<'rule, 'sid, const K: usize> {
    rules: &'rule RuleSet<'sid>,
    end: SymbolId,
    pub(super) sets: Vec<ItemSet>,
    pub(super) actions: Vec<Option<Action>>,
    registry: HashMap<Kernel, ItemSetId>,
}

impl<'rule, 'sid, const K: usize> Graph<'rule, 'sid, K> {
    pub fn new(rules: &'rule RuleSet<'sid>, end: SymbolId) -> Self {
        Self {
            rules,
            end,
            sets: vec![],
            actions: vec![],
            registry: HashMap::default(),
        }
    }

    fn get_id(&self, kernel: &Kernel) -> Option<ItemSetId> {
        self.registry.get(kernel).copied()
    }

    /// Registers a new set.
    ///
    /// Each kernel is registered once, a second registration means the graph is corrupted.
    fn push(&mut self, kernel: Kernel) -> LrResult<ItemSetId> {
        if let Some(id) = self.get_id(&kernel) {
            return Err(ErrorKind::inconsistent(format!("item set #{id} is built twice")).into());
        }

        let id = self.sets.len();
        self.registry.insert(kernel.clone(), id);
        self.sets.push(ItemSet::from_kernel(id, kernel));
        self.actions.push(None);
        Ok(id)
    }

    pub fn build(&mut self) -> LrResult<()> {
        let rules = self.rules;
        let start = rules
            .get(0)
            .and_then(|rule| rule.at(0))
            .ok_or(ErrorKind::EmptyGrammar)?;

        let root = self.push(Kernel::from([(start, Lookaheads::default())]))?;
        let mut queue = VecDeque::from_iter([root]);

        while let Some(set_id) = queue.pop_front() {
            let missing = || ErrorKind::inconsistent(format!("missing item set #{set_id}"));

            self.sets
                .get_mut(set_id)
                .ok_or_else(missing)?
                .close::<K>(rules);

            let reachable = self.sets.get(set_id).ok_or_else(missing)?.reachable_sets(rules);
            let mut edges = Shifts::default();

            for (symbol, kernel) in reachable {
                let to_id = match self.get_id(&kernel) {
                    Some(id) => id,
                    None => {
                        let id = self.push(kernel)?;
                        queue.push_back(id);
                        id
                    }
                };

                edges.insert(symbol, to_id);
            }

            let set = self.sets.get(set_id).ok_or_else(missing)?;
            let action = Transition::new(set, edges).action::<K>(rules, self.end)?;
            log::trace!("state #{set_id}: {action}");

            if let Some(slot) = self.actions.get_mut(set_id) {
                *slot = Some(action);
            }
        }

        log::debug!("built {} states", self.sets.len());
        Ok(())
    }

    /// Freezes the graph into states, once every set has an action.
    pub fn into_states(self) -> LrResult<Vec<State>> {
        self.sets
            .into_iter()
            .zip(self.actions)
            .map(|(set, action)| {
                let action = action.ok_or_else(|| {
                    ErrorKind::inconsistent(format!("item set #{} has no action", set.id))
                })?;

                Ok(State::new(
                    set.id,
                    set.iter_kernel().collect(),
                    set.iter_extension().collect(),
                    action,
                ))
            })
            .collect()
    }
}
