//! # Token Vocabularies
//!
//! Building, persisting, and loading rank-ordered token vocabularies.
//!
//! A vocabulary is an ordered list of unique tokens whose list index is the
//! token id. The four reserved symbols ([`crate::symbols::RESERVED`]) always
//! occupy ids `0..=3`; corpus tokens follow in descending frequency order.

mod builder;
mod token_vocab;

#[doc(inline)]
pub use builder::{VocabBuilder, VocabBuilderOptions, build_vocab, build_vocab_with};
#[doc(inline)]
pub use token_vocab::TokenVocab;
