//! Grammar definition and the lazy backtracking search over it

pub mod node;
pub mod results;

pub use node::{EmptyBuilder, Grammar, Node, NodeId, SequenceBuilder, TokenBuilder};
pub use results::NodeResults;
