//! Lexing: token types, the tokenizer and the token stream the grammar walks over

pub mod stream;
pub mod tokenizer;
pub mod tokens;

pub use stream::{Checkpoint, TokenStream};
pub use tokenizer::Tokenizer;
pub use tokens::{Token, TokenType, TokenTypeId};
