use phrasemill::vocab::{VocabBuilderOptions, build_vocab};

use crate::logging::LogArgs;

/// Args for the build-vocab command.
#[derive(clap::Args, Debug)]
pub struct BuildVocabArgs {
    /// Input corpus file, one sentence per line.
    corpus: String,

    /// Output vocabulary file.
    vocab: String,

    #[clap(flatten)]
    pub logging: LogArgs,

    /// Max vocab size, reserved symbols included.
    #[arg(long, default_value = "40000")]
    vocab_size: usize,

    /// Replace digits with 0 before counting.
    #[arg(long)]
    normalize_digits: bool,
}

impl BuildVocabArgs {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(3)?;

        let options = VocabBuilderOptions::new(self.vocab_size)
            .with_normalize_digits(self.normalize_digits);
        build_vocab(&self.corpus, &self.vocab, options)?;

        log::info!("vocabulary written to {}", self.vocab);
        Ok(())
    }
}
