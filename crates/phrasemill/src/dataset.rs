//! # Corpus Preparation Pipeline
//!
//! Turns a raw parallel corpus (source/"from" and target/"to" text files,
//! one sentence per line) into everything training needs inside one data
//! directory: a vocabulary per side, and id files for the train and dev
//! splits. Corpus acquisition (download, extraction) is someone else's
//! job; this module starts from text files at known paths.

use std::path::{Path, PathBuf};

use crate::{
    encode::encode_corpus_with,
    errors::Result,
    tokenize::{LineTokenizer, WhitespaceTokenizer},
    vocab::{VocabBuilderOptions, build_vocab_with},
};

/// The source-side vocabulary file name.
pub static FROM_VOCAB_FILE: &str = "vocab.from";

/// The target-side vocabulary file name.
pub static TO_VOCAB_FILE: &str = "vocab.to";

/// The source-side training ids file name.
pub static FROM_TRAIN_IDS_FILE: &str = "train.src.ids";

/// The target-side training ids file name.
pub static TO_TRAIN_IDS_FILE: &str = "train.tgt.ids";

/// The source-side dev ids file name.
pub static FROM_DEV_IDS_FILE: &str = "dev.src.ids";

/// The target-side dev ids file name.
pub static TO_DEV_IDS_FILE: &str = "dev.tgt.ids";

/// The source-side test ids file name.
pub static FROM_TEST_IDS_FILE: &str = "test.src.ids";

/// The target-side test ids file name.
pub static TO_TEST_IDS_FILE: &str = "test.tgt.ids";

/// The raw corpus files of one parallel corpus.
#[derive(Debug, Clone)]
pub struct CorpusPaths {
    /// The source-side training corpus.
    pub from_train: PathBuf,

    /// The target-side training corpus.
    pub to_train: PathBuf,

    /// The source-side dev corpus.
    pub from_dev: PathBuf,

    /// The target-side dev corpus.
    pub to_dev: PathBuf,
}

impl CorpusPaths {
    /// Create a new path group.
    pub fn new(
        from_train: impl Into<PathBuf>,
        to_train: impl Into<PathBuf>,
        from_dev: impl Into<PathBuf>,
        to_dev: impl Into<PathBuf>,
    ) -> Self {
        Self {
            from_train: from_train.into(),
            to_train: to_train.into(),
            from_dev: from_dev.into(),
            to_dev: to_dev.into(),
        }
    }
}

/// Options for [`prepare_corpus`].
#[derive(Debug, Clone)]
pub struct PrepareOptions {
    /// Size cap of the source-side vocabulary.
    pub from_vocab_size: usize,

    /// Size cap of the target-side vocabulary.
    pub to_vocab_size: usize,

    /// Replace digits with `'0'` before counting and lookup.
    pub normalize_digits: bool,
}

impl PrepareOptions {
    /// Create new options with digit normalization off.
    pub fn new(
        from_vocab_size: usize,
        to_vocab_size: usize,
    ) -> Self {
        Self {
            from_vocab_size,
            to_vocab_size,
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
}

/// The artifacts produced by [`prepare_corpus`].
#[derive(Debug, Clone)]
pub struct PreparedCorpus {
    /// The source-side training ids file.
    pub from_train_ids: PathBuf,

    /// The target-side training ids file.
    pub to_train_ids: PathBuf,

    /// The source-side dev ids file.
    pub from_dev_ids: PathBuf,

    /// The target-side dev ids file.
    pub to_dev_ids: PathBuf,

    /// The source-side vocabulary file.
    pub from_vocab: PathBuf,

    /// The target-side vocabulary file.
    pub to_vocab: PathBuf,
}

/// Prepare a parallel corpus with the default whitespace tokenizer.
///
/// See [`prepare_corpus_with`].
pub fn prepare_corpus<P: AsRef<Path>>(
    data_dir: P,
    paths: &CorpusPaths,
    options: &PrepareOptions,
) -> Result<PreparedCorpus> {
    prepare_corpus_with(data_dir, paths, WhitespaceTokenizer, options)
}

/// Prepare all files required for training into `data_dir`.
///
/// Builds a vocabulary of the configured size per corpus side, then
/// encodes the train and dev splits against it. Artifacts land at fixed
/// names inside `data_dir` (`vocab.from`, `train.src.ids`, ...); the
/// returned [`PreparedCorpus`] carries their paths.
pub fn prepare_corpus_with<P, S>(
    data_dir: P,
    paths: &CorpusPaths,
    tokenizer: S,
    options: &PrepareOptions,
) -> Result<PreparedCorpus>
where
    P: AsRef<Path>,
    S: LineTokenizer + Clone,
{
    let data_dir = data_dir.as_ref();
    let digits = options.normalize_digits;

    let to_vocab = data_dir.join(TO_VOCAB_FILE);
    let from_vocab = data_dir.join(FROM_VOCAB_FILE);
    build_vocab_with(
        &paths.to_train,
        &to_vocab,
        tokenizer.clone(),
        VocabBuilderOptions::new(options.to_vocab_size).with_normalize_digits(digits),
    )?;
    build_vocab_with(
        &paths.from_train,
        &from_vocab,
        tokenizer.clone(),
        VocabBuilderOptions::new(options.from_vocab_size).with_normalize_digits(digits),
    )?;

    let to_train_ids = data_dir.join(TO_TRAIN_IDS_FILE);
    let from_train_ids = data_dir.join(FROM_TRAIN_IDS_FILE);
    encode_corpus_with(&paths.to_train, &to_train_ids, &to_vocab, &tokenizer, digits)?;
    encode_corpus_with(
        &paths.from_train,
        &from_train_ids,
        &from_vocab,
        &tokenizer,
        digits,
    )?;

    let to_dev_ids = data_dir.join(TO_DEV_IDS_FILE);
    let from_dev_ids = data_dir.join(FROM_DEV_IDS_FILE);
    encode_corpus_with(&paths.to_dev, &to_dev_ids, &to_vocab, &tokenizer, digits)?;
    encode_corpus_with(&paths.from_dev, &from_dev_ids, &from_vocab, &tokenizer, digits)?;

    Ok(PreparedCorpus {
        from_train_ids,
        to_train_ids,
        from_dev_ids,
        to_dev_ids,
        from_vocab,
        to_vocab,
    })
}

/// Encode a source-side test corpus against an existing vocabulary.
///
/// Writes `test.src.ids` into `data_dir` and returns its path.
pub fn prepare_test_data<P, Q, V>(
    data_dir: P,
    from_test_path: Q,
    from_vocab_path: V,
    digits: bool,
) -> Result<PathBuf>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    V: AsRef<Path>,
{
    let ids_path = data_dir.as_ref().join(FROM_TEST_IDS_FILE);
    encode_corpus_with(
        from_test_path,
        &ids_path,
        from_vocab_path,
        &WhitespaceTokenizer,
        digits,
    )?;
    Ok(ids_path)
}

/// Encode a target-side test corpus against an existing vocabulary.
///
/// Writes `test.tgt.ids` into `data_dir` and returns its path.
pub fn prepare_test_target_data<P, Q, V>(
    data_dir: P,
    to_test_path: Q,
    to_vocab_path: V,
    digits: bool,
) -> Result<PathBuf>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    V: AsRef<Path>,
{
    let ids_path = data_dir.as_ref().join(TO_TEST_IDS_FILE);
    encode_corpus_with(
        to_test_path,
        &ids_path,
        to_vocab_path,
        &WhitespaceTokenizer,
        digits,
    )?;
    Ok(ids_path)
}
