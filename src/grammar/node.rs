//! Grammar nodes and the grammar that owns them
//!
//! Nodes live in an arena inside [`Grammar`] and refer to each other by [`NodeId`].
//! That makes recursive rules (a node reachable from its own children) ordinary: a
//! sequence or alternation can be created first, referenced by other nodes, and only
//! then given its children with [`Grammar::set_children`].
//!
//! There are exactly four kinds of node:
//!
//! - `Empty` matches without consuming anything.
//! - `Terminal` consumes one token of a given type.
//! - `Sequence` matches its children one after another.
//! - `Alternation` matches any one of its children, trying all of them.
//!
//! Each node may carry a builder that turns what it matched into a value of the
//! grammar's value type `V`. Alternations have no builder: they pass on the value of
//! whichever child matched.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::error::GrammarError;
use crate::grammar::results::{NodeResults, ParseContext};
use crate::lexing::{Token, TokenStream, TokenType, TokenTypeId};
use crate::trace::Tracer;

/// Builds the value of an [`Node::Empty`] match
pub type EmptyBuilder<V> = Arc<dyn Fn() -> V + Send + Sync>;
/// Builds the value of a [`Node::Terminal`] match from the consumed token
pub type TokenBuilder<V> = Arc<dyn Fn(&Token) -> V + Send + Sync>;
/// Builds the value of a [`Node::Sequence`] match from its children's values, in order
pub type SequenceBuilder<V> = Arc<dyn Fn(Vec<V>) -> V + Send + Sync>;

/// Handle to a node of one particular [`Grammar`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub enum Node<V> {
    Empty {
        build: EmptyBuilder<V>,
    },
    Terminal {
        token_type: TokenTypeId,
        build: TokenBuilder<V>,
    },
    Sequence {
        children: Vec<NodeId>,
        build: SequenceBuilder<V>,
    },
    Alternation {
        children: Vec<NodeId>,
    },
}

impl<V> Node<V> {
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Empty { .. } => "Empty",
            Node::Terminal { .. } => "Terminal",
            Node::Sequence { .. } => "Sequence",
            Node::Alternation { .. } => "Alternation",
        }
    }

    /// Child nodes, in order (empty for leaves)
    pub fn children(&self) -> &[NodeId] {
        match self {
            Node::Sequence { children, .. } | Node::Alternation { children } => children,
            Node::Empty { .. } | Node::Terminal { .. } => &[],
        }
    }
}

impl<V> fmt::Debug for Node<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Empty { .. } => f.write_str("Empty"),
            Node::Terminal { token_type, .. } => {
                f.debug_tuple("Terminal").field(token_type).finish()
            }
            Node::Sequence { children, .. } => f.debug_tuple("Sequence").field(children).finish(),
            Node::Alternation { children } => {
                f.debug_tuple("Alternation").field(children).finish()
            }
        }
    }
}

struct Entry<V> {
    name: String,
    node: Node<V>,
}

/// Token types, grammar nodes and the root rule
///
/// Nodes are immutable while a parse runs; the grammar can be shared by any number
/// of parses, each of which owns its own [`TokenStream`].
pub struct Grammar<V> {
    token_types: Vec<TokenType>,
    entries: Vec<Entry<V>>,
    root: Option<NodeId>,
}

impl<V> Default for Grammar<V> {
    fn default() -> Self {
        Self {
            token_types: Vec::new(),
            entries: Vec::new(),
            root: None,
        }
    }
}

impl<V> fmt::Debug for Grammar<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grammar")
            .field("token_types", &self.token_types)
            .field("nodes", &self.entries.len())
            .field("root", &self.root)
            .finish()
    }
}

impl<V> Grammar<V> {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- token types -------------------------------------------------------

    /// Register a token type. Types are tried in registration order.
    pub fn register_token(
        &mut self,
        name: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Result<TokenTypeId, GrammarError> {
        self.push_token_type(name, pattern, false)
    }

    /// Register a token type whose matches are consumed but never become tokens
    /// (whitespace, comments).
    pub fn register_ignored(
        &mut self,
        name: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Result<TokenTypeId, GrammarError> {
        self.push_token_type(name, pattern, true)
    }

    fn push_token_type(
        &mut self,
        name: impl Into<String>,
        pattern: impl Into<String>,
        ignore: bool,
    ) -> Result<TokenTypeId, GrammarError> {
        let id = TokenTypeId(self.token_types.len());
        self.token_types
            .push(TokenType::new(id, name, pattern, ignore)?);
        Ok(id)
    }

    pub fn token_types(&self) -> &[TokenType] {
        &self.token_types
    }

    pub fn token_type(&self, id: TokenTypeId) -> Option<&TokenType> {
        self.token_types.get(id.0)
    }

    /// Register a token type and return a terminal node bound to it, named after it.
    pub fn token_with<F>(
        &mut self,
        name: impl Into<String>,
        pattern: impl Into<String>,
        build: F,
    ) -> Result<NodeId, GrammarError>
    where
        F: Fn(&Token) -> V + Send + Sync + 'static,
    {
        let name = name.into();
        let ty = self.register_token(name.clone(), pattern)?;
        let node = self.terminal_with(ty, build);
        self.rename(node, name);
        Ok(node)
    }

    // ---- nodes -------------------------------------------------------------

    fn push(&mut self, node: Node<V>) -> NodeId {
        let id = NodeId(self.entries.len());
        let name = format!("{}{}", node.kind(), id);
        self.entries.push(Entry { name, node });
        id
    }

    pub fn empty_with<F>(&mut self, build: F) -> NodeId
    where
        F: Fn() -> V + Send + Sync + 'static,
    {
        self.push(Node::Empty {
            build: Arc::new(build),
        })
    }

    pub fn terminal_with<F>(&mut self, token_type: TokenTypeId, build: F) -> NodeId
    where
        F: Fn(&Token) -> V + Send + Sync + 'static,
    {
        self.push(Node::Terminal {
            token_type,
            build: Arc::new(build),
        })
    }

    pub fn sequence_with<F>(&mut self, children: impl IntoIterator<Item = NodeId>, build: F) -> NodeId
    where
        F: Fn(Vec<V>) -> V + Send + Sync + 'static,
    {
        self.push(Node::Sequence {
            children: children.into_iter().collect(),
            build: Arc::new(build),
        })
    }

    pub fn alternation(&mut self, children: impl IntoIterator<Item = NodeId>) -> NodeId {
        self.push(Node::Alternation {
            children: children.into_iter().collect(),
        })
    }

    /// Replace the children of a sequence or alternation.
    pub fn set_children(
        &mut self,
        node: NodeId,
        children: impl IntoIterator<Item = NodeId>,
    ) -> Result<(), GrammarError> {
        let slot = self.children_mut(node)?;
        *slot = children.into_iter().collect();
        Ok(())
    }

    /// Append one child to a sequence or alternation.
    pub fn push_child(&mut self, node: NodeId, child: NodeId) -> Result<(), GrammarError> {
        self.children_mut(node)?.push(child);
        Ok(())
    }

    fn children_mut(&mut self, node: NodeId) -> Result<&mut Vec<NodeId>, GrammarError> {
        let entry = self
            .entries
            .get_mut(node.0)
            .ok_or(GrammarError::UnknownNode(node))?;
        match &mut entry.node {
            Node::Sequence { children, .. } | Node::Alternation { children } => Ok(children),
            Node::Empty { .. } | Node::Terminal { .. } => Err(GrammarError::NotComposite {
                node: entry.name.clone(),
            }),
        }
    }

    /// Give a node a diagnostic name. Names only show up in traces and errors.
    pub fn rename(&mut self, node: NodeId, name: impl Into<String>) -> NodeId {
        if let Some(entry) = self.entries.get_mut(node.0) {
            entry.name = name.into();
        }
        node
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<V>> {
        self.entries.get(id.0).map(|e| &e.node)
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.entries.get(id.0).map(|e| e.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ---- root --------------------------------------------------------------

    pub fn set_root(&mut self, node: NodeId) -> Result<(), GrammarError> {
        if node.0 >= self.entries.len() {
            return Err(GrammarError::UnknownNode(node));
        }
        self.root = Some(node);
        Ok(())
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }
}

impl<V: Default + 'static> Grammar<V> {
    /// An empty node whose value is `V::default()`
    pub fn empty(&mut self) -> NodeId {
        self.empty_with(V::default)
    }
}

impl<V: From<Token> + 'static> Grammar<V> {
    /// A terminal whose value is the consumed token itself
    pub fn terminal(&mut self, token_type: TokenTypeId) -> NodeId {
        self.terminal_with(token_type, |token| V::from(token.clone()))
    }

    /// Register a token type and return a terminal node valued by its tokens.
    pub fn token(
        &mut self,
        name: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Result<NodeId, GrammarError> {
        self.token_with(name, pattern, |token| V::from(token.clone()))
    }
}

impl<V: From<Vec<V>> + 'static> Grammar<V> {
    /// A sequence whose value is the list of its children's values
    pub fn sequence(&mut self, children: impl IntoIterator<Item = NodeId>) -> NodeId {
        self.sequence_with(children, V::from)
    }
}

impl<V: Clone + fmt::Debug> Grammar<V> {
    /// Lazily enumerate every way `node` matches a prefix of `stream`, starting at the
    /// stream's current position.
    ///
    /// Unlike [`Parser::parse`](crate::parser::Parser::parse) this does not require the
    /// whole stream to be consumed. After each yielded value the stream's cursor sits
    /// just past the tokens that value was built from.
    pub fn parse_node<'g>(
        &'g self,
        node: NodeId,
        stream: &Rc<TokenStream>,
        tracer: &'g dyn Tracer,
    ) -> NodeResults<'g, V> {
        ParseContext::new(self, Rc::clone(stream), tracer).results(node)
    }
}
