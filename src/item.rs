use std::collections::{btree_map::Entry, BTreeMap, BTreeSet};

use itertools::Itertools;

use crate::{Rule, RuleId, RuleSet, Symbol, SymbolId};

pub type ItemSetId = usize;

/// Lookahead terminals of an item.
pub type Lookaheads = BTreeSet<SymbolId>;

/// Items of a set, one entry per position.
pub type Kernel = BTreeMap<ItemCore, Lookaheads>;

impl<'sid> Rule<'sid> {
    pub fn at(&self, position: usize) -> Option<ItemCore> {
        ItemCore::new(self, position)
    }
}

/// The position of an item: a rule, and a dot within its right-hand side.
///
/// It is the key under which items are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemCore {
    pub rule: RuleId,
    pub position: usize,
}

impl ItemCore {
    fn new(rule: &Rule<'_>, position: usize) -> Option<Self> {
        if rule.rhs.len() >= position {
            Some(Self {
                rule: rule.id,
                position,
            })
        } else {
            None
        }
    }

    /// Check if we reached the end of a rule.
    ///
    /// # Example
    /// A -> w •
    pub fn is_exhausted(&self, rules: &RuleSet<'_>) -> bool {
        rules
            .get(self.rule)
            .map(|rule| self.position >= rule.rhs.len())
            .unwrap_or(false)
    }

    /// Returns the current symbol.
    /// If A -> w •, then returns None.
    pub fn symbol<'sid>(&self, rules: &RuleSet<'sid>) -> Option<Symbol<'sid>> {
        rules
            .get(self.rule)
            .and_then(|rule| rule.rhs.get(self.position))
            .copied()
    }

    /// Returns the item with the dot moved one symbol further.
    ///
    /// # Example
    /// (A -> • w eof).next() -> (A -> w • eof)
    pub fn next(&self) -> Self {
        Self {
            rule: self.rule,
            position: self.position + 1,
        }
    }
}

/// A rule item, with its lookaheads.
///
/// # Example
/// A -> w • eof, {$}
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Item {
    pub core: ItemCore,
    pub lookaheads: Lookaheads,
}

impl From<(&ItemCore, &Lookaheads)> for Item {
    fn from((core, lookaheads): (&ItemCore, &Lookaheads)) -> Self {
        Self {
            core: *core,
            lookaheads: lookaheads.clone(),
        }
    }
}

impl Item {
    pub fn new<I>(core: ItemCore, lookaheads: I) -> Self
    where
        I: IntoIterator<Item = SymbolId>,
    {
        Self {
            core,
            lookaheads: lookaheads.into_iter().collect(),
        }
    }

    pub fn display<'a, 'sid>(&'a self, rules: &'a RuleSet<'sid>) -> ItemDisplay<'a, 'sid> {
        ItemDisplay { item: self, rules }
    }
}

pub struct ItemDisplay<'a, 'sid> {
    item: &'a Item,
    rules: &'a RuleSet<'sid>,
}

impl std::fmt::Display for ItemDisplay<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(rule) = self.rules.get(self.item.core.rule) else {
            return write!(f, "<unknown rule #{}>", self.item.core.rule);
        };

        let mut rhs = rule
            .rhs
            .iter()
            .map(ToString::to_string)
            .enumerate()
            .map(|(pos, mut s)| {
                if pos == self.item.core.position {
                    s.insert_str(0, "• ");
                }
                s
            })
            .join(" ");

        if self.item.core.position >= rule.rhs.len() {
            rhs.push_str(" •")
        }

        write!(f, "{} -> {}", rule.lhs, rhs)?;

        if !self.item.lookaheads.is_empty() {
            let lookaheads = self
                .item
                .lookaheads
                .iter()
                .map(|id| {
                    self.rules
                        .symbol(*id)
                        .map(|sym| sym.name.to_string())
                        .unwrap_or_else(|| format!("#{id}"))
                })
                .join(", ");
            write!(f, ", {{{lookaheads}}}")?;
        }

        Ok(())
    }
}

/// A set of items.
///
/// The kernel holds the items the set was reached with.
/// Items are additional items from closure.
#[derive(Debug, Default, Clone)]
pub struct ItemSet {
    // Identifer of the item set.
    pub id: ItemSetId,
    kernel: Kernel,
    items: Kernel,
}

/// Compares kernel sets.
impl PartialEq for ItemSet {
    fn eq(&self, other: &Self) -> bool {
        self.kernel.eq(&other.kernel)
    }
}

impl FromIterator<Item> for ItemSet {
    /// Collect the iterator as a kernel set.
    fn from_iter<T: IntoIterator<Item = Item>>(iter: T) -> Self {
        Self {
            id: 0,
            kernel: merge(iter),
            items: Kernel::default(),
        }
    }
}

/// Collects items, merging the lookaheads of items sharing a position.
fn merge<I: IntoIterator<Item = Item>>(iter: I) -> Kernel {
    let mut kernel = Kernel::default();
    for item in iter {
        kernel.entry(item.core).or_default().extend(item.lookaheads);
    }
    kernel
}

impl ItemSet {
    pub fn new<I1, I2>(kernel: I1, items: I2) -> Self
    where
        I1: IntoIterator<Item = Item>,
        I2: IntoIterator<Item = Item>,
    {
        Self {
            id: 0,
            kernel: merge(kernel),
            items: merge(items),
        }
    }

    /// Builds a set from an already merged kernel.
    pub fn from_kernel(id: ItemSetId, kernel: Kernel) -> Self {
        Self {
            id,
            kernel,
            items: Kernel::default(),
        }
    }

    /// Iterate over the kernel items.
    pub fn iter_kernel(&self) -> impl Iterator<Item = Item> + '_ {
        self.kernel.iter().map(Item::from)
    }

    /// Iterate over the items added by the closure.
    pub fn iter_extension(&self) -> impl Iterator<Item = Item> + '_ {
        self.items.iter().map(Item::from)
    }

    /// Iterate over all items within the set.
    pub fn iter(&self) -> impl Iterator<Item = (&ItemCore, &Lookaheads)> {
        self.kernel.iter().chain(self.items.iter())
    }

    pub fn lookaheads(&self, core: &ItemCore) -> Option<&Lookaheads> {
        self.kernel.get(core).or_else(|| self.items.get(core))
    }

    /// Iterate over all exhausted items (A -> w •)
    pub fn iter_exhausted_items<'set>(
        &'set self,
        rules: &'set RuleSet<'_>,
    ) -> impl Iterator<Item = (&'set ItemCore, &'set Lookaheads)> + 'set {
        self.iter().filter(move |(core, _)| core.is_exhausted(rules))
    }

    /// Iterable over all reachable kernels from the current set.
    ///
    /// Items are grouped by the symbol after their dot, and moved past it.
    pub fn reachable_sets(&self, rules: &RuleSet<'_>) -> BTreeMap<SymbolId, Kernel> {
        let mut sets = BTreeMap::<SymbolId, Kernel>::default();

        for (core, lookaheads) in self.iter() {
            if let Some(sym) = core.symbol(rules) {
                sets.entry(sym.id)
                    .or_default()
                    .entry(core.next())
                    .or_default()
                    .extend(lookaheads.iter().copied());
            }
        }

        sets
    }

    /// Lookaheads handed down to the items derived from the non-terminal after the dot.
    ///
    /// This is the terminal right after the non-terminal, if any, plus the item's own lookaheads if
    /// the non-terminal ends the rule.
    fn follow(&self, core: &ItemCore, rule: &Rule<'_>) -> Lookaheads {
        let mut follow = Lookaheads::default();

        if let Some(next) = rule.rhs.get(core.position + 1) {
            if next.is_terminal() {
                follow.insert(next.id);
            }
        }

        if core.position + 1 == rule.rhs.len() {
            if let Some(lookaheads) = self.lookaheads(core) {
                follow.extend(lookaheads.iter().copied());
            }
        }

        follow
    }

    /// Close the item set
    ///
    /// Every item whose dot stands before a non-terminal brings in the rules of that non-terminal,
    /// until nothing new is added. With `K > 0` lookaheads are propagated as well, merged items
    /// that gain lookaheads are visited again.
    pub fn close<const K: usize>(&mut self, rules: &RuleSet<'_>) {
        let mut stack: Vec<ItemCore> = self.kernel.keys().rev().copied().collect();

        while let Some(core) = stack.pop() {
            let Some(rule) = rules.get(core.rule) else {
                continue;
            };
            let Some(sym) = core.symbol(rules).filter(Symbol::is_non_terminal) else {
                continue;
            };

            let follow = if K > 0 {
                self.follow(&core, rule)
            } else {
                Lookaheads::default()
            };

            for derived in rules.iter_by_symbol(sym.id).flat_map(|rule| rule.at(0)) {
                // Dot-0 items only reach a kernel through the augmenting rule, which nothing derives.
                if self.kernel.contains_key(&derived) {
                    continue;
                }

                match self.items.entry(derived) {
                    Entry::Vacant(entry) => {
                        entry.insert(follow.clone());
                        stack.push(derived);
                    }
                    Entry::Occupied(mut entry) => {
                        let before = entry.get().len();
                        entry.get_mut().extend(follow.iter().copied());
                        if entry.get().len() > before {
                            stack.push(derived);
                        }
                    }
                }
            }
        }

        log::trace!(
            "closed item set #{} ({} kernel items, {} derived)",
            self.id,
            self.kernel.len(),
            self.items.len()
        );
    }
}
