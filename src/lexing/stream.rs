//! Token stream with a backtracking cursor
//!
//! The tokens are fixed once the stream is built; only the cursor moves. The cursor
//! counts how many tokens have been consumed, so saving and restoring a position is
//! an integer copy. The cursor sits in a [`Cell`] because every node iterator taking
//! part in one parse shares the same stream and moves the same cursor.

use std::cell::Cell;

use super::tokens::Token;

/// A saved cursor position, restorable with [`TokenStream::restore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Checkpoint(usize);

impl Checkpoint {
    /// Number of tokens consumed at this position
    pub fn consumed(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
pub struct TokenStream {
    tokens: Box<[Token]>,
    consumed: Cell<usize>,
}

impl TokenStream {
    pub fn new(tokens: impl Into<Box<[Token]>>) -> Self {
        Self {
            tokens: tokens.into(),
            consumed: Cell::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The most recently consumed token, or `None` before the first advance
    pub fn current(&self) -> Option<&Token> {
        self.consumed.get().checked_sub(1).map(|i| &self.tokens[i])
    }

    /// Consume and return the next token, or `None` without moving when every token
    /// has been consumed.
    pub fn advance(&self) -> Option<&Token> {
        let consumed = self.consumed.get();
        let token = self.tokens.get(consumed)?;
        self.consumed.set(consumed + 1);
        Some(token)
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.consumed.get())
    }

    /// Move the cursor back (or forward) to a saved position.
    ///
    /// Checkpoints are only meaningful for the stream that produced them; one past
    /// the last token is a programming error.
    pub fn restore(&self, checkpoint: Checkpoint) {
        assert!(
            checkpoint.0 <= self.tokens.len(),
            "checkpoint {} is out of range for a stream of {} tokens",
            checkpoint.0,
            self.tokens.len()
        );
        self.consumed.set(checkpoint.0);
    }

    /// True before any token has been consumed
    pub fn at_begin(&self) -> bool {
        self.consumed.get() == 0
    }

    /// True once every token has been consumed
    pub fn at_end(&self) -> bool {
        self.consumed.get() == self.tokens.len()
    }

    /// Tokens not consumed yet
    pub fn remaining(&self) -> &[Token] {
        &self.tokens[self.consumed.get()..]
    }
}
