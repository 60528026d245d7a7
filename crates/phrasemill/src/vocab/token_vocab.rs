//! # Token Vocabulary Index

use std::{io::BufRead, path::Path};

use crate::{
    corpus_io::open_reader,
    errors::{PhrasemillError, Result},
    types::PMHashMap,
};

/// A loaded vocabulary: the bidirectional token<->id mapping.
///
/// The id->token list's index IS the token's id (index 0 = `_PAD`, etc.),
/// and the token->id map is its exact inverse; rebuilding either from the
/// other is lossless.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TokenVocab {
    token_to_id: PMHashMap<String, usize>,
    id_to_token: Vec<String>,
}

impl TokenVocab {
    /// Build a vocabulary from an ordered token list.
    ///
    /// ## Arguments
    /// * `tokens` - The tokens in id order.
    ///
    /// ## Errors
    /// [`PhrasemillError::VocabConflict`] if a token appears twice; a
    /// duplicate would make the forward and reverse mappings diverge.
    pub fn from_tokens(tokens: Vec<String>) -> Result<Self> {
        let mut token_to_id = PMHashMap::with_capacity(tokens.len());
        for (id, token) in tokens.iter().enumerate() {
            if token_to_id.insert(token.clone(), id).is_some() {
                return Err(PhrasemillError::VocabConflict(format!(
                    "duplicate vocabulary token {token:?}"
                )));
            }
        }
        Ok(Self {
            token_to_id,
            id_to_token: tokens,
        })
    }

    /// Load a vocabulary from a one-token-per-line file.
    ///
    /// The line number (0-based) of each token is its id. Trailing
    /// whitespace is stripped before indexing.
    ///
    /// ## Errors
    /// [`PhrasemillError::NotFound`] if the path does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = open_reader(path.as_ref())?;
        let mut tokens = Vec::new();
        for line in reader.lines() {
            let line = line?;
            tokens.push(line.trim_end().to_string());
        }
        Self::from_tokens(tokens)
    }

    /// Return the id for a token, if present.
    pub fn lookup_id(
        &self,
        token: &str,
    ) -> Option<usize> {
        self.token_to_id.get(token).copied()
    }

    /// Return the token for an id, if in range.
    pub fn lookup_token(
        &self,
        id: usize,
    ) -> Option<&str> {
        self.id_to_token.get(id).map(String::as_str)
    }

    /// The number of tokens in the vocabulary.
    pub fn len(&self) -> usize {
        self.id_to_token.len()
    }

    /// Check if the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.id_to_token.is_empty()
    }

    /// The id->token list, in id order.
    pub fn tokens(&self) -> &[String] {
        &self.id_to_token
    }
}
