use prettytable::Table as PtTable;

use super::{Action, LrParser};

/// Renders the automaton as a grid: one row per state, one column per symbol.
impl std::fmt::Display for LrParser<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut table = PtTable::new();

        let symbols: Vec<_> = self
            .rules
            .iter_symbols()
            .filter(|sym| sym.is_terminal())
            .chain(
                self.rules
                    .iter_symbols()
                    .filter(|sym| sym.is_non_terminal() && *sym != self.start),
            )
            .collect();

        table.add_row(
            ["#".to_string(), "action".to_string()]
                .into_iter()
                .chain(symbols.iter().map(|sym| sym.name.to_string()))
                .collect(),
        );

        for state in self.states.iter() {
            table.add_row(
                [state.id().to_string(), state.action().to_string()]
                    .into_iter()
                    .chain(symbols.iter().map(|sym| {
                        match state.action() {
                            Action::Resolve { lookaheads, .. } if lookaheads.contains(&sym.id) => {
                                "r".to_string()
                            }
                            action => action
                                .target(sym.id)
                                .map(|to| to.to_string())
                                .unwrap_or_default(),
                        }
                    }))
                    .collect(),
            );
        }

        write!(f, "{}", table)
    }
}
