//! # `phrasemill` Seq2Seq Corpus Preparation Suite
//!
//! `phrasemill` converts raw parallel-corpus text into fixed-size integer
//! vocabularies and token-id sequences for sequence-to-sequence model
//! training, and converts model output (token ids plus attention weights)
//! back into readable text.
//!
//! See:
//! * [`vocab`] to build, persist, and load token vocabularies.
//! * [`encode`] to encode text lines and corpora into token ids.
//! * [`frequency`] to derive per-token corpus weights.
//! * [`reweight`] to reweight training batches toward rare tokens.
//! * [`reconstruct`] to turn decoded ids (plus attention) back into text.
//! * [`dataset`] to run the whole corpus preparation pipeline over a
//!   parallel corpus directory.
//!
//! The four reserved symbols ([`symbols::PAD`], [`symbols::GO`],
//! [`symbols::EOS`], [`symbols::UNK`]) always occupy vocabulary ids `0..=3`,
//! in that order.
#![warn(missing_docs, unused)]

mod corpus_io;

pub mod dataset;
pub mod encode;
pub mod errors;
pub mod frequency;
pub mod reconstruct;
pub mod reweight;
pub mod symbols;
pub mod tokenize;
pub mod types;
pub mod vocab;
