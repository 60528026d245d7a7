//! # Vocabulary Builder

use std::{
    borrow::Cow,
    io::{BufRead, Write},
    path::Path,
};

use crate::{
    corpus_io::{create_writer, open_reader},
    errors::Result,
    symbols::RESERVED,
    tokenize::{LineTokenizer, WhitespaceTokenizer, normalize_digits},
    types::{Count, PMHashMap},
};

/// Lines between progress log messages during corpus passes.
const PROGRESS_INTERVAL: usize = 100_000;

/// Options for [`VocabBuilder`].
#[derive(Debug, Clone)]
pub struct VocabBuilderOptions {
    /// Limit on the size of the created vocabulary, reserved symbols
    /// included.
    pub max_size: usize,

    /// Replace every digit character with `'0'` before counting.
    pub normalize_digits: bool,
}

impl VocabBuilderOptions {
    /// Create new options.
    ///
    /// ## Arguments
    /// * `max_size` - The vocabulary size cap, reserved symbols included.
    ///
    /// ## Returns
    /// A new `VocabBuilderOptions` instance with digit normalization off.
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            normalize_digits: false,
        }
    }

    /// Sets digit normalization.
    pub fn with_normalize_digits(
        self,
        normalize_digits: bool,
    ) -> Self {
        Self {
            normalize_digits,
            ..self
        }
    }

    /// Initializes a [`VocabBuilder`] from these options.
    pub fn init<S: LineTokenizer>(
        self,
        tokenizer: S,
    ) -> VocabBuilder<S> {
        VocabBuilder::new(tokenizer, self)
    }
}

/// Per-token statistics tracked during the counting pass.
#[derive(Debug, Clone, Copy)]
struct TokenStats {
    count: Count,

    /// Token position of the first occurrence in the canonical
    /// left-to-right scan; the rank tie-breaker.
    first_seen: usize,
}

/// Streaming token frequency counter producing a rank-ordered vocabulary.
///
/// The counting pass is bounded-memory over the corpus line stream; only
/// the distinct-token table is held in memory.
pub struct VocabBuilder<S: LineTokenizer = WhitespaceTokenizer> {
    /// The config options.
    pub options: VocabBuilderOptions,

    tokenizer: S,
    counts: PMHashMap<String, TokenStats>,
    position: usize,
}

impl<S: LineTokenizer> VocabBuilder<S> {
    /// Create a new builder.
    pub fn new(
        tokenizer: S,
        options: VocabBuilderOptions,
    ) -> Self {
        Self {
            options,
            tokenizer,
            counts: PMHashMap::new(),
            position: 0,
        }
    }

    /// The number of distinct (possibly normalized) tokens seen so far.
    pub fn distinct_tokens(&self) -> usize {
        self.counts.len()
    }

    /// Update counts inplace from one corpus line.
    pub fn update_from_line(
        &mut self,
        line: &str,
    ) {
        let tokens = self.tokenizer.tokenize(line);
        for token in tokens {
            let word: Cow<str> = if self.options.normalize_digits {
                normalize_digits(token)
            } else {
                Cow::Borrowed(token)
            };
            match self.counts.get_mut(word.as_ref()) {
                Some(stats) => stats.count += 1,
                None => {
                    self.counts.insert(
                        word.into_owned(),
                        TokenStats {
                            count: 1,
                            first_seen: self.position,
                        },
                    );
                }
            }
            self.position += 1;
        }
    }

    /// Update counts inplace from a line reader.
    pub fn update_from_reader<R: BufRead>(
        &mut self,
        reader: R,
    ) -> Result<()> {
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if (idx + 1) % PROGRESS_INTERVAL == 0 {
                log::info!("processing line {}", idx + 1);
            }
            self.update_from_line(&line);
        }
        Ok(())
    }

    /// Consume the builder and produce the ordered vocabulary list.
    ///
    /// The four reserved symbols come first, then corpus tokens sorted by
    /// descending count with ties broken by first-seen position. The list
    /// is truncated to `max_size` entries after the reserved symbols are
    /// prepended.
    pub fn into_vocab_list(self) -> Vec<String> {
        let mut ranked: Vec<(String, TokenStats)> = self.counts.into_iter().collect();
        ranked.sort_by(|(_, a), (_, b)| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.first_seen.cmp(&b.first_seen))
        });

        let mut list: Vec<String> = RESERVED.iter().map(|s| s.to_string()).collect();
        list.extend(ranked.into_iter().map(|(word, _)| word));
        list.truncate(self.options.max_size);
        list
    }
}

/// Build a vocabulary file from a corpus file, using the default
/// whitespace tokenizer.
///
/// See [`build_vocab_with`].
pub fn build_vocab<P, Q>(
    corpus_path: P,
    vocab_path: Q,
    options: VocabBuilderOptions,
) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    build_vocab_with(corpus_path, vocab_path, WhitespaceTokenizer, options)
}

/// Build a vocabulary file from a corpus file.
///
/// Streams the corpus line by line, counts (possibly digit-normalized)
/// token frequencies, and writes the rank-truncated vocabulary one token
/// per line; the line number (0-based) of each token is its id.
///
/// ## Arguments
/// * `corpus_path` - The one-sentence-per-line corpus file.
/// * `vocab_path` - Where the vocabulary will be written.
/// * `tokenizer` - The line tokenizer to count with.
/// * `options` - Size cap and normalization options.
///
/// ## Errors
/// [`crate::errors::PhrasemillError::NotFound`] if the corpus path is
/// unreadable; I/O errors leave a partially written artifact behind
/// (callers should delete and rebuild).
pub fn build_vocab_with<P, Q, S>(
    corpus_path: P,
    vocab_path: Q,
    tokenizer: S,
    options: VocabBuilderOptions,
) -> Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    S: LineTokenizer,
{
    let corpus_path = corpus_path.as_ref();
    let vocab_path = vocab_path.as_ref();
    log::info!(
        "creating vocabulary {} from {}",
        vocab_path.display(),
        corpus_path.display()
    );

    let reader = open_reader(corpus_path)?;
    let mut builder = options.init(tokenizer);
    builder.update_from_reader(reader)?;
    log::info!("{} distinct tokens", builder.distinct_tokens());

    let mut writer = create_writer(vocab_path)?;
    for token in builder.into_vocab_list() {
        writeln!(writer, "{token}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{EOS, GO, PAD, UNK};

    fn vocab_from_lines(
        lines: &[&str],
        options: VocabBuilderOptions,
    ) -> Vec<String> {
        let mut builder = options.init(WhitespaceTokenizer);
        for line in lines {
            builder.update_from_line(line);
        }
        builder.into_vocab_list()
    }

    #[test]
    fn test_frequency_ranking() {
        let list = vocab_from_lines(
            &["the cat sat on the mat", "the cat ran"],
            VocabBuilderOptions::new(100),
        );
        assert_eq!(
            list,
            vec![PAD, GO, EOS, UNK, "the", "cat", "sat", "on", "mat", "ran"]
        );
    }

    #[test]
    fn test_tie_break_is_first_seen() {
        // All tokens occur once; rank order must match scan order.
        let list = vocab_from_lines(&["zebra apple mango"], VocabBuilderOptions::new(100));
        assert_eq!(list[4..], ["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_truncation() {
        let list = vocab_from_lines(
            &["a a a b b c"],
            VocabBuilderOptions::new(6),
        );
        assert_eq!(list, vec![PAD, GO, EOS, UNK, "a", "b"]);

        let all = vocab_from_lines(&["a a a b b c"], VocabBuilderOptions::new(100));
        assert_eq!(all.len(), 4 + 3);
    }

    #[test]
    fn test_digit_normalization_merges_counts() {
        let list = vocab_from_lines(
            &["call 555 or 911 today today"],
            VocabBuilderOptions::new(100).with_normalize_digits(true),
        );
        // "555" and "911" both normalize to "000" and outrank "call"/"or".
        assert_eq!(list[4..], ["000", "today", "call", "or"]);
    }

    #[test]
    fn test_build_vocab_file() {
        let dir = tempdir::TempDir::new("vocab_test").unwrap();
        let corpus_path = dir.path().join("corpus.txt");
        let vocab_path = dir.path().join("vocab.txt");

        std::fs::write(&corpus_path, "hello world\nhello again\n").unwrap();
        build_vocab(&corpus_path, &vocab_path, VocabBuilderOptions::new(100)).unwrap();

        let text = std::fs::read_to_string(&vocab_path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec![PAD, GO, EOS, UNK, "hello", "world", "again"]);
    }

    #[test]
    fn test_missing_corpus_is_not_found() {
        let dir = tempdir::TempDir::new("vocab_test").unwrap();
        let err = build_vocab(
            dir.path().join("nope.txt"),
            dir.path().join("vocab.txt"),
            VocabBuilderOptions::new(10),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            crate::errors::PhrasemillError::NotFound { .. }
        ));
    }
}
