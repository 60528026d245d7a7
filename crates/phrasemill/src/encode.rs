//! # Text -> Token-Id Encoding
//!
//! Encoding is total: out-of-vocabulary tokens map to
//! [`crate::symbols::UNK_ID`], never to an error. No end-of-sequence
//! marker is appended; usage sites that need termination add
//! [`crate::symbols::EOS_ID`] themselves.

use std::{
    io::{BufRead, Write},
    path::Path,
};

use crate::{
    corpus_io::{create_writer, open_reader, parse_error},
    errors::Result,
    symbols::UNK_ID,
    tokenize::{LineTokenizer, WhitespaceTokenizer, normalize_digits},
    vocab::TokenVocab,
};

/// Lines between progress log messages during corpus passes.
const PROGRESS_INTERVAL: usize = 100_000;

/// Encode one line of text into token ids.
///
/// Tokenizes the line, optionally normalizes digits per token, and maps
/// each token through the vocabulary; unknown tokens become
/// [`UNK_ID`]. The output length always equals the tokenizer's output
/// length.
pub fn encode_line<S: LineTokenizer>(
    line: &str,
    vocab: &TokenVocab,
    tokenizer: &S,
    digits: bool,
) -> Vec<usize> {
    tokenizer
        .tokenize(line)
        .into_iter()
        .map(|token| {
            let word = if digits {
                normalize_digits(token)
            } else {
                token.into()
            };
            vocab.lookup_id(word.as_ref()).unwrap_or(UNK_ID)
        })
        .collect()
}

/// Encode a corpus file into an ids file, using the default whitespace
/// tokenizer.
///
/// See [`encode_corpus_with`].
pub fn encode_corpus<P, Q, V>(
    data_path: P,
    target_path: Q,
    vocab_path: V,
    digits: bool,
) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    V: AsRef<Path>,
{
    encode_corpus_with(
        data_path,
        target_path,
        vocab_path,
        &WhitespaceTokenizer,
        digits,
    )
}

/// Encode a corpus file into an ids file.
///
/// Streams `data_path` line by line and writes one line of space-separated
/// decimal ids per input line to `target_path`. No trailing EOS marker is
/// persisted.
///
/// ## Arguments
/// * `data_path` - The one-sentence-per-line corpus file.
/// * `target_path` - Where the ids file will be written.
/// * `vocab_path` - The vocabulary file to encode against.
/// * `tokenizer` - The line tokenizer.
/// * `digits` - Replace digits with `'0'` before lookup.
pub fn encode_corpus_with<P, Q, V, S>(
    data_path: P,
    target_path: Q,
    vocab_path: V,
    tokenizer: &S,
    digits: bool,
) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    V: AsRef<Path>,
    S: LineTokenizer,
{
    let data_path = data_path.as_ref();
    log::info!("tokenizing data in {}", data_path.display());

    let vocab = TokenVocab::load(vocab_path)?;
    let reader = open_reader(data_path)?;
    let mut writer = create_writer(target_path.as_ref())?;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if (idx + 1) % PROGRESS_INTERVAL == 0 {
            log::info!("tokenizing line {}", idx + 1);
        }
        let ids = encode_line(&line, &vocab, tokenizer, digits);
        let rendered: Vec<String> = ids.iter().map(usize::to_string).collect();
        writeln!(writer, "{}", rendered.join(" "))?;
    }
    Ok(())
}

/// Load an entire ids file as one id sequence per line.
///
/// For corpus-scale frequency analysis prefer the streaming
/// [`crate::frequency::analyze_frequency`]; this loader is for decode-size
/// inputs.
pub fn load_ids_corpus<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<usize>>> {
    let path = path.as_ref();
    let reader = open_reader(path)?;

    let mut lines = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let ids = line
            .split_whitespace()
            .map(|field| {
                field
                    .parse::<usize>()
                    .map_err(|err| parse_error(path, idx + 1, format!("bad id {field:?}: {err}")))
            })
            .collect::<Result<Vec<usize>>>()?;
        lines.push(ids);
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{symbols::RESERVED, vocab::TokenVocab};

    fn test_vocab() -> TokenVocab {
        let tokens: Vec<String> = RESERVED
            .iter()
            .chain(["I", "have", "a", "dog", "000"].iter())
            .map(|s| s.to_string())
            .collect();
        TokenVocab::from_tokens(tokens).unwrap()
    }

    #[test]
    fn test_encode_line() {
        let vocab = test_vocab();
        let ids = encode_line("I have a dog", &vocab, &WhitespaceTokenizer, false);
        assert_eq!(ids, vec![4, 5, 6, 7]);
    }

    #[test]
    fn test_encode_is_total() {
        let vocab = test_vocab();
        let ids = encode_line("I have a wolverine", &vocab, &WhitespaceTokenizer, false);
        assert_eq!(ids, vec![4, 5, 6, UNK_ID]);

        assert!(encode_line("", &vocab, &WhitespaceTokenizer, false).is_empty());
    }

    #[test]
    fn test_encode_normalizes_digits() {
        let vocab = test_vocab();
        // "999" itself is out of vocabulary; its normalized form "000" is not.
        let ids = encode_line("I have 999 dog", &vocab, &WhitespaceTokenizer, true);
        assert_eq!(ids, vec![4, 5, 8, 7]);

        let raw = encode_line("I have 999 dog", &vocab, &WhitespaceTokenizer, false);
        assert_eq!(raw, vec![4, 5, UNK_ID, 7]);
    }

    #[test]
    fn test_encode_corpus_roundtrip() {
        let dir = tempdir::TempDir::new("encode_test").unwrap();
        let corpus_path = dir.path().join("corpus.txt");
        let vocab_path = dir.path().join("vocab.txt");
        let ids_path = dir.path().join("corpus.ids");

        std::fs::write(&corpus_path, "I have a dog\ndog dog unknown\n").unwrap();
        let mut vocab_text = test_vocab().tokens().join("\n");
        vocab_text.push('\n');
        std::fs::write(&vocab_path, vocab_text).unwrap();

        encode_corpus(&corpus_path, &ids_path, &vocab_path, false).unwrap();

        let text = std::fs::read_to_string(&ids_path).unwrap();
        assert_eq!(text, "4 5 6 7\n7 7 3\n");

        let loaded = load_ids_corpus(&ids_path).unwrap();
        assert_eq!(loaded, vec![vec![4, 5, 6, 7], vec![7, 7, 3]]);
    }

    #[test]
    fn test_load_ids_corpus_rejects_garbage() {
        let dir = tempdir::TempDir::new("encode_test").unwrap();
        let ids_path = dir.path().join("bad.ids");
        std::fs::write(&ids_path, "1 2\n3 x 4\n").unwrap();

        let err = load_ids_corpus(&ids_path).unwrap_err();
        assert!(matches!(
            err,
            crate::errors::PhrasemillError::Parse { line: 2, .. }
        ));
    }
}
