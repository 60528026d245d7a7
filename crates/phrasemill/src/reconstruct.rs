//! # Id -> Text Reconstruction
//!
//! Converts decoded id sequences back into text. Unknown-word positions
//! can be repaired by attention alignment: the source position with the
//! most attention mass names an original source word, which is replaced
//! through a translation table (or copied verbatim when the table has no
//! entry for it).
//!
//! The attention lookup is a pure function of the attention row, the
//! reversed source tokens, and the translation table; it does no I/O and
//! is independently testable.

use std::{
    io::{BufRead, Write},
    path::Path,
};

use crate::{
    corpus_io::{create_writer, open_reader},
    errors::{PhrasemillError, Result},
    symbols::{EOS_ID, UNK, UNK_ID},
    types::PMHashMap,
    vocab::TokenVocab,
};

/// Per-sentence attention weights, indexed `[output position][source position]`.
///
/// Rows are consulted independently and need not sum to 1; only the
/// argmax is used.
pub type AttentionMatrix = Vec<Vec<f32>>;

/// A source-word to candidate-target-words mapping.
///
/// Only the first candidate of each entry is used for substitution.
pub type TranslationTable = PMHashMap<String, Vec<String>>;

/// One decoded sentence from the model: ids, a scalar score, and the
/// attention history (if the model produced one).
#[derive(Debug, Clone)]
pub struct Hypothesis {
    /// The decoded token ids, in output order.
    pub ids: Vec<usize>,

    /// The model's score for this hypothesis.
    pub score: f32,

    /// Attention weights per output position.
    pub attention: Option<AttentionMatrix>,
}

impl Hypothesis {
    /// Create a hypothesis with no attention history.
    pub fn new(
        ids: Vec<usize>,
        score: f32,
    ) -> Self {
        Self {
            ids,
            score,
            attention: None,
        }
    }

    /// Sets the attention history.
    pub fn with_attention(
        self,
        attention: AttentionMatrix,
    ) -> Self {
        Self {
            attention: Some(attention),
            ..self
        }
    }
}

/// The source position holding the most attention mass.
///
/// Ties break to the first occurrence; `None` for an empty row.
pub fn attention_argmax(row: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &mass) in row.iter().enumerate() {
        match best {
            Some((_, top)) if mass <= top => {}
            _ => best = Some((idx, mass)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Pick the replacement word for an unknown-word position.
///
/// Finds the attention argmax over source positions, reads the original
/// source token at that index from the order-reversed source sequence
/// (index 0 is the LAST source token), and returns the translation
/// table's first candidate for it, or the source word itself when the
/// table has no entry. Falls back to the literal [`UNK`] placeholder when
/// the attention row or the source token is unavailable.
pub fn resolve_unk(
    attention_row: &[f32],
    reversed_source: &[String],
    table: &TranslationTable,
) -> String {
    let source_word = attention_argmax(attention_row).and_then(|pos| reversed_source.get(pos));
    let Some(source_word) = source_word else {
        return UNK.to_string();
    };

    match table.get(source_word).and_then(|candidates| candidates.first()) {
        Some(target) => target.clone(),
        None => source_word.clone(),
    }
}

/// Reconstruct text lines from decoded hypotheses.
///
/// Per hypothesis, output positions are walked left to right:
/// * a `None` hypothesis produces an empty output line;
/// * [`EOS_ID`] truncates the line there;
/// * [`UNK_ID`] emits the literal `_UNK` placeholder when no translation
///   table is supplied, and an attention-aligned substitution otherwise
///   (see [`resolve_unk`]);
/// * any other id is looked up in the reverse vocabulary.
///
/// `reversed_sources` holds, per input line, the original source tokens in
/// reverse order; it is only consulted when a translation table is
/// supplied.
///
/// ## Errors
/// [`PhrasemillError::TokenOutOfRange`] if a non-sentinel id falls outside
/// the vocabulary.
pub fn reconstruct_hypotheses(
    hypotheses: &[Option<Hypothesis>],
    vocab: &TokenVocab,
    table: Option<&TranslationTable>,
    reversed_sources: Option<&[Vec<String>]>,
) -> Result<Vec<String>> {
    let mut lines = Vec::with_capacity(hypotheses.len());

    for (sent_idx, hypothesis) in hypotheses.iter().enumerate() {
        let Some(hypothesis) = hypothesis else {
            lines.push(String::new());
            continue;
        };

        let mut words: Vec<String> = Vec::with_capacity(hypothesis.ids.len());
        for (pos, &id) in hypothesis.ids.iter().enumerate() {
            if id == EOS_ID {
                break;
            }

            if id == UNK_ID {
                words.push(match table {
                    None => UNK.to_string(),
                    Some(table) => {
                        let attention_row = hypothesis
                            .attention
                            .as_deref()
                            .and_then(|history| history.get(pos));
                        let source = reversed_sources.and_then(|sources| sources.get(sent_idx));
                        match (attention_row, source) {
                            (Some(row), Some(source)) => resolve_unk(row, source, table),
                            _ => UNK.to_string(),
                        }
                    }
                });
                continue;
            }

            match vocab.lookup_token(id) {
                Some(token) => words.push(token.to_string()),
                None => {
                    return Err(PhrasemillError::TokenOutOfRange {
                        id,
                        size: vocab.len(),
                    });
                }
            }
        }
        lines.push(words.join(" "));
    }
    Ok(lines)
}

/// Write reconstructed lines, each newline-terminated.
///
/// Empty lines (from `None` hypotheses) are written as bare newlines.
pub fn write_reconstruction<W: Write>(
    writer: &mut W,
    lines: &[String],
) -> Result<()> {
    for line in lines {
        writeln!(writer, "{line}")?;
    }
    Ok(())
}

/// Reconstruct hypotheses straight to a text file.
pub fn reconstruct_to_path<P: AsRef<Path>>(
    path: P,
    hypotheses: &[Option<Hypothesis>],
    vocab: &TokenVocab,
    table: Option<&TranslationTable>,
    reversed_sources: Option<&[Vec<String>]>,
) -> Result<()> {
    let lines = reconstruct_hypotheses(hypotheses, vocab, table, reversed_sources)?;
    let mut writer = create_writer(path.as_ref())?;
    write_reconstruction(&mut writer, &lines)
}

/// Load original (untokenized-to-ids) source lines with per-line token
/// order reversed, as consumed by the unknown-word substitution.
pub fn load_reversed_corpus<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<String>>> {
    let reader = open_reader(path.as_ref())?;

    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        lines.push(line.split_whitespace().rev().map(str::to_string).collect());
    }
    Ok(lines)
}

/// Load a translation table from a `source target1 [target2 ...]` per-line
/// file.
///
/// Lines with no target candidates are skipped.
pub fn load_translation_table<P: AsRef<Path>>(path: P) -> Result<TranslationTable> {
    let reader = open_reader(path.as_ref())?;

    let mut table = TranslationTable::new();
    for line in reader.lines() {
        let line = line?;
        let mut fields = line.split_whitespace().map(str::to_string);
        let Some(source) = fields.next() else {
            continue;
        };
        let candidates: Vec<String> = fields.collect();
        if !candidates.is_empty() {
            table.insert(source, candidates);
        }
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::RESERVED;

    fn test_vocab() -> TokenVocab {
        let tokens: Vec<String> = RESERVED
            .iter()
            .chain(["a", "b", "c"].iter())
            .map(|s| s.to_string())
            .collect();
        TokenVocab::from_tokens(tokens).unwrap()
    }

    fn strings(words: &[&str]) -> Vec<String> {
        words.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_attention_argmax() {
        assert_eq!(attention_argmax(&[0.1, 0.8, 0.1]), Some(1));
        assert_eq!(attention_argmax(&[0.5, 0.5, 0.2]), Some(0));
        assert_eq!(attention_argmax(&[]), None);
    }

    #[test]
    fn test_eos_truncates() {
        let vocab = test_vocab();
        let hyps = vec![Some(Hypothesis::new(vec![4, 5, EOS_ID, 6], 0.0))];
        let lines = reconstruct_hypotheses(&hyps, &vocab, None, None).unwrap();
        assert_eq!(lines, vec!["a b"]);
    }

    #[test]
    fn test_unk_without_table_is_placeholder() {
        let vocab = test_vocab();
        let hyps = vec![Some(
            Hypothesis::new(vec![UNK_ID], 0.0).with_attention(vec![vec![0.1, 0.8, 0.1]]),
        )];
        let lines = reconstruct_hypotheses(&hyps, &vocab, None, None).unwrap();
        assert_eq!(lines, vec![UNK]);
    }

    #[test]
    fn test_unk_substitution_via_attention() {
        let vocab = test_vocab();
        let hyps = vec![Some(
            Hypothesis::new(vec![UNK_ID], 0.0).with_attention(vec![vec![0.1, 0.8, 0.1]]),
        )];
        let sources = vec![strings(&["x", "y", "z"])];

        // "y" holds the attention argmax and has a table entry.
        let mut table = TranslationTable::new();
        table.insert("y".to_string(), strings(&["z2", "z3"]));
        let lines =
            reconstruct_hypotheses(&hyps, &vocab, Some(&table), Some(&sources)).unwrap();
        assert_eq!(lines, vec!["z2"]);

        // Without a table entry the source word is copied through.
        let empty = TranslationTable::new();
        let lines =
            reconstruct_hypotheses(&hyps, &vocab, Some(&empty), Some(&sources)).unwrap();
        assert_eq!(lines, vec!["y"]);
    }

    #[test]
    fn test_null_hypothesis_is_empty_line() {
        let vocab = test_vocab();
        let hyps = vec![None, Some(Hypothesis::new(vec![4], 0.0))];
        let lines = reconstruct_hypotheses(&hyps, &vocab, None, None).unwrap();
        assert_eq!(lines, vec!["", "a"]);

        let mut buf = Vec::new();
        write_reconstruction(&mut buf, &lines).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "\na\n");
    }

    #[test]
    fn test_out_of_range_id() {
        let vocab = test_vocab();
        let hyps = vec![Some(Hypothesis::new(vec![4, 42], 0.0))];
        let err = reconstruct_hypotheses(&hyps, &vocab, None, None).unwrap_err();
        assert!(matches!(
            err,
            PhrasemillError::TokenOutOfRange { id: 42, size: 7 }
        ));
    }

    #[test]
    fn test_load_reversed_corpus() {
        let dir = tempdir::TempDir::new("reconstruct_test").unwrap();
        let path = dir.path().join("test.src");
        std::fs::write(&path, "x y z\nsingle\n").unwrap();

        let sources = load_reversed_corpus(&path).unwrap();
        assert_eq!(sources[0], strings(&["z", "y", "x"]));
        assert_eq!(sources[1], strings(&["single"]));
    }

    #[test]
    fn test_load_translation_table() {
        let dir = tempdir::TempDir::new("reconstruct_test").unwrap();
        let path = dir.path().join("ttable.txt");
        std::fs::write(&path, "chien dog hound\nchat cat\nbare\n").unwrap();

        let table = load_translation_table(&path).unwrap();
        assert_eq!(table.get("chien"), Some(&strings(&["dog", "hound"])));
        assert_eq!(table.get("chat"), Some(&strings(&["cat"])));
        assert!(!table.contains_key("bare"));
    }
}
