//! Lazy, exhaustive result enumeration for grammar nodes
//!
//! [`NodeResults`] is an iterator over every value a node can produce from the
//! stream's current position. Values are computed one at a time as the iterator is
//! pulled, so a caller that only wants the first result never pays for the rest.
//!
//! # Cursor protocol
//!
//! All iterators of one parse share a single [`TokenStream`]. Two rules keep them
//! from stepping on each other:
//!
//! 1. When `next()` returns a value, the cursor sits just past the tokens that value
//!    covers. Whoever receives the value may then move the cursor freely.
//! 2. Before calling `next()` on a child iterator, a composite node restores the
//!    cursor to the position the child started from.
//!
//! Terminals do not restore the cursor after rejecting a token; rule 2 makes that
//! the parent's job.
//!
//! # Ordering
//!
//! - Sequence: depth-first, left-to-right cross product over the children's own
//!   results. The first child's results form the outer loop.
//! - Alternation: all results of the first child, then all of the second, and so on.
//!
//! Left-recursive rules (a node reachable from itself without consuming a token)
//! recurse without bound.

use std::fmt;
use std::rc::Rc;

use crate::grammar::node::{Grammar, Node, NodeId};
use crate::lexing::{Checkpoint, Token, TokenStream};
use crate::trace::{TraceEvent, Tracer};

/// What every node iterator of one parse shares
pub(crate) struct ParseContext<'g, V> {
    grammar: &'g Grammar<V>,
    stream: Rc<TokenStream>,
    tracer: &'g dyn Tracer,
}

impl<V> Clone for ParseContext<'_, V> {
    fn clone(&self) -> Self {
        Self {
            grammar: self.grammar,
            stream: Rc::clone(&self.stream),
            tracer: self.tracer,
        }
    }
}

impl<'g, V: Clone + fmt::Debug> ParseContext<'g, V> {
    pub(crate) fn new(grammar: &'g Grammar<V>, stream: Rc<TokenStream>, tracer: &'g dyn Tracer) -> Self {
        Self {
            grammar,
            stream,
            tracer,
        }
    }

    pub(crate) fn stream(&self) -> &TokenStream {
        &self.stream
    }

    pub(crate) fn tracer(&self) -> &'g dyn Tracer {
        self.tracer
    }

    /// The last consumed token, or `None` at the start of the stream
    fn position(&self) -> Option<&Token> {
        if self.stream.at_begin() {
            None
        } else {
            self.stream.current()
        }
    }

    /// Start enumerating `node`'s results from the current cursor position.
    pub(crate) fn results(&self, node: NodeId) -> NodeResults<'g, V> {
        let entry = self.stream.checkpoint();
        let state = match self.grammar.node(node) {
            Some(Node::Empty { .. }) | Some(Node::Terminal { .. }) => State::Leaf { done: false },
            Some(Node::Sequence { children, .. }) => State::Sequence(SequenceState {
                children,
                frames: Vec::with_capacity(children.len()),
                values: Vec::with_capacity(children.len()),
                started: false,
            }),
            Some(Node::Alternation { children }) => State::Alternation(AlternationState {
                children,
                next_child: 0,
                current: None,
            }),
            // Ids from another grammar match nothing
            None => State::Leaf { done: true },
        };
        NodeResults {
            ctx: self.clone(),
            node,
            entry,
            state,
            entered: false,
        }
    }

    fn name(&self, node: NodeId) -> &'g str {
        self.grammar.name(node).unwrap_or("?")
    }
}

/// Lazily produced results of one grammar node
pub struct NodeResults<'g, V> {
    ctx: ParseContext<'g, V>,
    node: NodeId,
    entry: Checkpoint,
    state: State<'g, V>,
    entered: bool,
}

enum State<'g, V> {
    Leaf { done: bool },
    Sequence(SequenceState<'g, V>),
    Alternation(AlternationState<'g, V>),
}

struct SequenceState<'g, V> {
    children: &'g [NodeId],
    /// One iterator per child currently being explored, with the position it
    /// started from
    frames: Vec<(Checkpoint, NodeResults<'g, V>)>,
    /// The chosen value of every frame but the last
    values: Vec<V>,
    started: bool,
}

struct AlternationState<'g, V> {
    children: &'g [NodeId],
    next_child: usize,
    current: Option<Box<NodeResults<'g, V>>>,
}

impl<'g, V: Clone + fmt::Debug> NodeResults<'g, V> {
    /// The node these results belong to
    pub fn node(&self) -> NodeId {
        self.node
    }

    fn produce(&mut self) -> Option<V> {
        let ctx = &self.ctx;
        let stream = ctx.stream();
        match &mut self.state {
            State::Leaf { done } => {
                if *done {
                    return None;
                }
                *done = true;
                match ctx.grammar.node(self.node)? {
                    Node::Empty { build } => Some(build()),
                    Node::Terminal { token_type, build } => {
                        let token = stream.advance()?;
                        token.is(*token_type).then(|| build(token))
                    }
                    Node::Sequence { .. } | Node::Alternation { .. } => None,
                }
            }
            State::Sequence(seq) => {
                let build = match ctx.grammar.node(self.node)? {
                    Node::Sequence { build, .. } => build,
                    _ => return None,
                };
                seq.advance(ctx, self.entry)
                    .map(|values| build(values))
            }
            State::Alternation(alt) => alt.advance(ctx, self.entry),
        }
    }
}

impl<'g, V: Clone + fmt::Debug> SequenceState<'g, V> {
    /// Next complete assignment of values to all children, in cross-product order.
    fn advance(&mut self, ctx: &ParseContext<'g, V>, entry: Checkpoint) -> Option<Vec<V>> {
        let stream = ctx.stream();

        if !self.started {
            self.started = true;
            // Nothing to match against: a sequence without children never succeeds,
            // the same as an alternation without children.
            let first = *self.children.first()?;
            stream.restore(entry);
            self.frames.push((entry, ctx.results(first)));
        }

        loop {
            let (start, results) = self.frames.last_mut()?;
            stream.restore(*start);
            match results.next() {
                Some(value) if self.frames.len() == self.children.len() => {
                    let mut values = self.values.clone();
                    values.push(value);
                    return Some(values);
                }
                Some(value) => {
                    self.values.push(value);
                    let child = self.children[self.frames.len()];
                    self.frames.push((stream.checkpoint(), ctx.results(child)));
                }
                None => {
                    // Backtrack to the next value of the previous child
                    self.frames.pop();
                    self.values.pop();
                }
            }
        }
    }
}

impl<'g, V: Clone + fmt::Debug> AlternationState<'g, V> {
    /// Next result of the current child, moving on to later children as each is
    /// exhausted. Every child starts from the alternation's own entry position.
    fn advance(&mut self, ctx: &ParseContext<'g, V>, entry: Checkpoint) -> Option<V> {
        let stream = ctx.stream();
        loop {
            if self.current.is_none() {
                let child = *self.children.get(self.next_child)?;
                self.next_child += 1;
                stream.restore(entry);
                self.current = Some(Box::new(ctx.results(child)));
            }
            stream.restore(entry);
            if let Some(value) = self.current.as_mut().and_then(|results| results.next()) {
                return Some(value);
            }
            self.current = None;
        }
    }
}

impl<V: Clone + fmt::Debug> Iterator for NodeResults<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        let tracer = self.ctx.tracer();
        let tracing = tracer.enabled();
        if tracing && !self.entered {
            tracer.trace(TraceEvent::Enter {
                node: self.ctx.name(self.node),
                at: self.ctx.position(),
            });
        }
        self.entered = true;

        let value = self.produce();
        if tracing {
            let node = self.ctx.name(self.node);
            let at = self.ctx.position();
            match &value {
                Some(value) => tracer.trace(TraceEvent::Yield { node, at, value }),
                None => tracer.trace(TraceEvent::Reject { node, at }),
            }
        }
        value
    }
}

impl<V> fmt::Debug for NodeResults<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeResults")
            .field("node", &self.node)
            .field("entry", &self.entry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexing::Tokenizer;
    use crate::trace::{NoopTracer, TraceLog};

    /// Values are strings so results are easy to compare
    fn grammar() -> (Grammar<String>, [NodeId; 2]) {
        let mut g = Grammar::new();
        let a = g.token_with("A", "a", |t| t.text().to_string()).unwrap();
        let b = g.token_with("B", "b", |t| t.text().to_string()).unwrap();
        (g, [a, b])
    }

    fn stream(g: &Grammar<String>, input: &str) -> Rc<TokenStream> {
        let tokenizer = Tokenizer::new(g.token_types(), false).unwrap();
        Rc::new(TokenStream::new(tokenizer.tokenize(input).unwrap()))
    }

    /// Every result paired with how many tokens it consumed
    fn collect(g: &Grammar<String>, node: NodeId, input: &str) -> Vec<(String, usize)> {
        let s = stream(g, input);
        let mut out = Vec::new();
        let mut results = g.parse_node(node, &s, &NoopTracer);
        while let Some(value) = results.next() {
            out.push((value, s.checkpoint().consumed()));
        }
        out
    }

    #[test]
    fn test_empty_yields_once_without_consuming() {
        let (mut g, _) = grammar();
        let e = g.empty_with(|| "e".to_string());
        assert_eq!(collect(&g, e, "ab"), vec![("e".to_string(), 0)]);
    }

    #[test]
    fn test_terminal_match_and_mismatch() {
        let (g, [a, b]) = grammar();
        assert_eq!(collect(&g, a, "ab"), vec![("a".to_string(), 1)]);
        assert_eq!(collect(&g, b, "ab"), vec![]);
        assert_eq!(collect(&g, a, ""), vec![]);
    }

    #[test]
    fn test_sequence_builds_from_children() {
        let (mut g, [a, b]) = grammar();
        let ab = g.sequence_with([a, b], |v| v.concat());
        assert_eq!(collect(&g, ab, "ab"), vec![("ab".to_string(), 2)]);
        assert_eq!(collect(&g, ab, "ba"), vec![]);
    }

    #[test]
    fn test_sequence_without_children_matches_nothing() {
        let (mut g, _) = grammar();
        let seq = g.sequence_with([], |v| v.concat());
        assert_eq!(collect(&g, seq, "a"), vec![]);
    }

    #[test]
    fn test_alternation_tries_every_child() {
        let (mut g, [a, _]) = grammar();
        let e = g.empty_with(|| "e".to_string());
        let alt = g.alternation([a, e, a]);
        assert_eq!(
            collect(&g, alt, "a"),
            vec![("a".to_string(), 1), ("e".to_string(), 0), ("a".to_string(), 1)]
        );
    }

    #[test]
    fn test_sequence_cross_product_order() {
        // opt_a := a | ε, each consuming a different amount
        let (mut g, [a, _]) = grammar();
        let e = g.empty_with(|| "-".to_string());
        let first = g.alternation([a, e]);
        let second = g.alternation([a, e]);
        let pair = g.sequence_with([first, second], |v| v.join(""));
        assert_eq!(
            collect(&g, pair, "aa"),
            vec![
                ("aa".to_string(), 2),
                ("a-".to_string(), 1),
                ("-a".to_string(), 1),
                ("--".to_string(), 0),
            ]
        );
    }

    #[test]
    fn test_backtracks_into_earlier_child() {
        // (a | a a) b: the first choice of the alternation dead-ends on "aab"
        let (mut g, [a, b]) = grammar();
        let aa = g.sequence_with([a, a], |v| v.concat());
        let alt = g.alternation([a, aa]);
        let seq = g.sequence_with([alt, b], |v| v.join("|"));
        assert_eq!(collect(&g, seq, "aab"), vec![("aa|b".to_string(), 3)]);
    }

    #[test]
    fn test_right_recursive_rule() {
        // list := a list | a
        let (mut g, [a, _]) = grammar();
        let list = g.alternation([]);
        let more = g.sequence_with([a, list], |v| v.concat());
        g.set_children(list, [more, a]).unwrap();
        let values: Vec<_> = collect(&g, list, "aaa");
        assert_eq!(
            values,
            vec![
                ("aaa".to_string(), 3),
                ("aa".to_string(), 2),
                ("a".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_stops_after_first_result() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let builds = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&builds);
        let (mut g, [a, _]) = grammar();
        let list = g.alternation([]);
        let more = g.sequence_with([a, list], move |v| {
            counter.fetch_add(1, Ordering::SeqCst);
            v.concat()
        });
        g.set_children(list, [more, a]).unwrap();

        let s = stream(&g, "aaaa");
        let mut results = g.parse_node(list, &s, &NoopTracer);
        assert_eq!(results.next().as_deref(), Some("aaaa"));
        assert_eq!(builds.load(Ordering::SeqCst), 3);

        assert_eq!(results.count(), 3);
        assert!(builds.load(Ordering::SeqCst) > 3);
    }

    #[test]
    fn test_results_remember_their_node() {
        let (g, [a, b]) = grammar();
        let s = stream(&g, "ab");
        assert_eq!(g.parse_node(a, &s, &NoopTracer).node(), a);
        assert_eq!(g.parse_node(b, &s, &NoopTracer).node(), b);
    }

    #[test]
    fn test_trace_lines() {
        let (mut g, [a, b]) = grammar();
        let ab = g.sequence_with([a, b], |v| v.concat());
        g.rename(ab, "ab");
        let s = stream(&g, "ab");
        let log = TraceLog::new();
        let values: Vec<_> = g.parse_node(ab, &s, &log).collect();
        assert_eq!(values, vec!["ab".to_string()]);
        assert_eq!(
            log.lines(),
            vec![
                "@^\tab enter",
                "@^\tA enter",
                "@\"a\"\tA yields \"a\"",
                "@\"a\"\tB enter",
                "@\"b\"\tB yields \"b\"",
                "@\"b\"\tab yields \"ab\"",
                "@\"a\"\tB yields nothing more",
                "@^\tA yields nothing more",
                "@^\tab yields nothing more",
            ]
        );
    }
}
