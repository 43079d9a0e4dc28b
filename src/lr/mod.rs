use crate::{
    ast::ParseNode, cursor::Cursor, parser::traits::Parser, token::SyntaxElement, ErrorKind,
    Grammar, ItemSetId, LrError, LrResult, RuleSet, Symbol,
};

mod action;
mod graph;
mod state;
mod table;
mod transition;

pub use action::*;
use graph::*;
pub use state::{State, StateDisplay};
use transition::*;

pub type StateId = ItemSetId;

/// A shift-reduce parser.
///
/// Built once from a grammar, the parser is immutable and can be used for any number of parses.
#[derive(Debug, Clone)]
pub struct LrParser<'sid> {
    rules: RuleSet<'sid>,
    states: Vec<State>,
    start: Symbol<'sid>,
    end: Symbol<'sid>,
}

type Stack<'sid> = Vec<(StateId, ParseNode<'sid>)>;

impl<'sid> LrParser<'sid> {
    /// Builds the parser of the grammar.
    ///
    /// `K` is the lookahead depth: `0` builds a plain LR(0) automaton, `1` lets a state resolve a
    /// shift-reduce conflict by peeking at the next token.
    pub fn build<const K: usize>(grammar: &Grammar<'sid>) -> LrResult<Self> {
        if K > 1 {
            return Err(ErrorKind::UnsupportedAlgorithm(K).into());
        }

        let augmentation = grammar.augment()?;
        let rules = RuleSet::new(grammar);

        let mut graph = Graph::<'_, 'sid, K>::new(&rules, augmentation.end.id);
        graph.build()?;
        let states = graph.into_states()?;

        log::debug!(
            "built LR({}) parser: {} rules, {} states",
            K,
            rules.len(),
            states.len()
        );

        Ok(Self {
            rules,
            states,
            start: augmentation.start,
            end: augmentation.end,
        })
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(id)
    }

    pub fn start(&self) -> Symbol<'sid> {
        self.start
    }

    pub fn end(&self) -> Symbol<'sid> {
        self.end
    }

    pub fn rules(&self) -> &RuleSet<'sid> {
        &self.rules
    }

    /// Human readable rendering of a state: its items and its action.
    pub fn state_display(&self, id: StateId) -> Option<StateDisplay<'_, 'sid>> {
        self.state(id).map(|state| StateDisplay {
            state,
            rules: &self.rules,
        })
    }

    fn get_state(&self, id: StateId) -> LrResult<&State> {
        self.state(id)
            .ok_or_else(|| ErrorKind::inconsistent(format!("missing state #{id}")).into())
    }

    fn expecting(&self, state: &State) -> Vec<&'sid str> {
        state
            .action()
            .shifts()
            .into_iter()
            .flat_map(|shifts| shifts.keys())
            .filter_map(|id| self.rules.symbol(*id))
            .filter(Symbol::is_terminal)
            .map(|sym| sym.name)
            .collect()
    }

    /// Consumes the next token, which must be a terminal: non-terminals only come from reductions.
    fn shift<I>(&self, cursor: &mut Cursor<'sid, I>, state: &State) -> LrResult<ParseNode<'sid>>
    where
        I: Iterator<Item = SyntaxElement<'sid>>,
    {
        let token = cursor.consume()?;

        if token.symbol.is_non_terminal() {
            return Err(LrError::new(
                ErrorKind::unexpected_symbol(token.symbol.name, state.id(), self.expecting(state)),
                Some(cursor.position()),
            ));
        }

        Ok(token.into())
    }

    fn reduce(&self, stack: &mut Stack<'sid>, reduction: &Reduction) -> LrResult<()> {
        if reduction.count == 0 || stack.len() < reduction.count {
            return Err(ErrorKind::inconsistent(format!(
                "cannot reduce {} symbols out of a stack of {}",
                reduction.count,
                stack.len()
            ))
            .into());
        }

        let entries = stack.split_off(stack.len() - reduction.count);
        let lhs = self.rules.symbol(reduction.lhs).ok_or_else(|| {
            ErrorKind::inconsistent(format!("unknown symbol #{}", reduction.lhs))
        })?;

        // The state the first popped node was shifted from receives the reduced node.
        let parent = entries[0].0;
        log::trace!("reduce #{} in state #{parent}", reduction.rule);
        stack.push((parent, ParseNode::new(lhs, entries.into_iter().map(|(_, node)| node))));
        Ok(())
    }

    fn accept<I>(
        &self,
        mut stack: Stack<'sid>,
        reduction: &Reduction,
        cursor: &mut Cursor<'sid, I>,
    ) -> LrResult<ParseNode<'sid>>
    where
        I: Iterator<Item = SyntaxElement<'sid>>,
    {
        if stack.len() != reduction.count || reduction.lhs != self.start.id {
            return Err(ErrorKind::inconsistent(format!(
                "cannot accept {} symbols out of a stack of {}",
                reduction.count,
                stack.len()
            ))
            .into());
        }

        if let Some((position, token)) = cursor.residual() {
            return Err(LrError::new(
                ErrorKind::ResidualInput(token.to_string()),
                Some(position),
            ));
        }

        if reduction.count == 1 {
            stack
                .pop()
                .map(|(_, node)| node)
                .ok_or_else(|| ErrorKind::inconsistent("nothing to accept").into())
        } else {
            Ok(ParseNode::new(
                self.start,
                stack.into_iter().map(|(_, node)| node),
            ))
        }
    }
}

impl<'sid> Parser<'sid> for LrParser<'sid> {
    fn parse<I>(&self, input: I) -> LrResult<ParseNode<'sid>>
    where
        I: IntoIterator<Item = SyntaxElement<'sid>>,
    {
        let mut cursor = Cursor::new(input.into_iter(), self.end);
        let first = self.shift(&mut cursor, self.get_state(0)?)?;
        let mut stack: Stack<'sid> = vec![(0, first)];

        loop {
            let (state_id, symbol) = stack
                .last()
                .map(|(state, node)| (*state, node.symbol()))
                .ok_or_else(|| ErrorKind::inconsistent("empty stack"))?;

            let state = self.get_state(state_id)?;

            let Some(target_id) = state.action().target(symbol.id) else {
                let expecting = self.expecting(state);
                let kind = if symbol == self.end && cursor.is_exhausted() {
                    ErrorKind::unexpected_end_of_stream(state_id, expecting)
                } else if symbol.is_terminal() {
                    ErrorKind::unexpected_symbol(symbol.name, state_id, expecting)
                } else {
                    ErrorKind::inconsistent(format!("no transition on {symbol} in state #{state_id}"))
                };

                return Err(LrError::new(kind, Some(cursor.position())));
            };

            let target = self.get_state(target_id)?;
            log::trace!("#{state_id} {symbol} -> #{target_id} ({})", target.action());

            match target.action() {
                Action::Shift(_) => {
                    let node = self.shift(&mut cursor, target)?;
                    stack.push((target_id, node));
                }

                Action::Reduce(reduction) => self.reduce(&mut stack, reduction)?,

                Action::Resolve {
                    reduction,
                    lookaheads,
                    ..
                } => {
                    if lookaheads.contains(&cursor.peek().id) {
                        self.reduce(&mut stack, reduction)?
                    } else {
                        let node = self.shift(&mut cursor, target)?;
                        stack.push((target_id, node));
                    }
                }

                Action::Accept(reduction) => {
                    if symbol != self.end {
                        return Err(ErrorKind::inconsistent(format!(
                            "accepting on {symbol} instead of {}",
                            self.end
                        ))
                        .into());
                    }

                    stack.pop();
                    return self.accept(stack, reduction, &mut cursor);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        fixtures::{
            fixture_single_tier_grammar, fixture_sum_grammar, fixture_sum_of_products_grammar,
        },
        token::SyntaxElement,
        traits::Parser as _,
        ErrorKind, Grammar, LrParser, ParseNode,
    };

    use super::Action;

    fn tokens<'sid>(grammar: &Grammar<'sid>, input: &str) -> Vec<SyntaxElement<'sid>> {
        input
            .split_whitespace()
            .map(|word| match grammar.try_get_symbol(word) {
                Some(sym) => SyntaxElement::new(sym, word),
                None => SyntaxElement::new(grammar.sym("id"), word),
            })
            .collect()
    }

    #[test]
    fn test_lr0_parser_building() {
        let grammar = fixture_sum_grammar().expect("cannot create grammar");
        let parser = LrParser::build::<0>(&grammar).expect("cannot build parser");

        assert_eq!(parser.states().len(), 10);
        assert_eq!(parser.start(), grammar.sym("S"));
        assert_eq!(parser.end(), grammar.sym("$"));
    }

    #[test]
    fn test_unsupported_lookahead_depth() {
        let grammar = fixture_sum_grammar().expect("cannot create grammar");
        let err = LrParser::build::<2>(&grammar).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::UnsupportedAlgorithm(2));
    }

    #[test]
    fn test_ambiguous_grammar_is_rejected() {
        let grammar = fixture_single_tier_grammar().expect("cannot create grammar");

        let err = LrParser::build::<0>(&grammar).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ShiftReduceConflict { .. }));

        let err = LrParser::build::<1>(&grammar).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ShiftReduceConflict { .. }));
    }

    #[test]
    fn test_lr0_parse() {
        let grammar = fixture_sum_grammar().expect("cannot create grammar");
        let parser = LrParser::build::<0>(&grammar).expect("cannot build parser");

        let tree = parser
            .parse(tokens(&grammar, "x + y"))
            .expect("cannot parse");
        assert_eq!(tree.to_string(), "E[E[T[id(x)]], +, T[id(y)]]");
    }

    #[test]
    fn test_lookahead_parse() {
        let grammar = fixture_sum_of_products_grammar().expect("cannot create grammar");
        let parser = LrParser::build::<1>(&grammar).expect("cannot build parser");

        assert!(parser
            .states()
            .iter()
            .any(|state| matches!(state.action(), Action::Resolve { .. })));

        let tree: ParseNode = parser
            .parse(tokens(&grammar, "x + y * z"))
            .expect("cannot parse");
        assert_eq!(
            tree.to_string(),
            "E[E[T[P[id(x)]]], +, T[T[P[id(y)]], *, P[id(z)]]]"
        );
    }

    #[test]
    fn test_unexpected_end_of_stream() {
        let grammar = fixture_sum_grammar().expect("cannot create grammar");
        let parser = LrParser::build::<0>(&grammar).expect("cannot build parser");

        let err = parser.parse(tokens(&grammar, "x +")).unwrap_err();
        match err.kind() {
            ErrorKind::UnexpectedEndOfStream { expecting, .. } => {
                assert_eq!(expecting.iter().collect::<Vec<_>>(), vec!["id", "("]);
            }
            kind => panic!("unexpected error {kind}"),
        }
        assert_eq!(err.position(), Some(2));
    }

    #[test]
    fn test_state_display() {
        let grammar = fixture_sum_grammar().expect("cannot create grammar");
        let parser = LrParser::build::<0>(&grammar).expect("cannot build parser");

        assert_eq!(
            parser.state_display(4).expect("missing state").to_string(),
            "STATE 4\n- E -> T •\nREDUCE: E (1)"
        );
        assert_eq!(
            parser.state_display(3).expect("missing state").to_string(),
            "STATE 3\n- S -> E • $\n- E -> E • + T\nSHIFT: $ → 6, + → 7"
        );
        assert!(parser.state_display(42).is_none());
    }
}
