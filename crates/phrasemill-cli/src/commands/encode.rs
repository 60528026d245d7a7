use phrasemill::encode::encode_corpus;

use crate::logging::LogArgs;

/// Args for the encode command.
#[derive(clap::Args, Debug)]
pub struct EncodeArgs {
    /// Input corpus file, one sentence per line.
    corpus: String,

    /// Vocabulary file to encode against.
    vocab: String,

    /// Output ids file.
    ids: String,

    #[clap(flatten)]
    pub logging: LogArgs,

    /// Replace digits with 0 before lookup.
    #[arg(long)]
    normalize_digits: bool,
}

impl EncodeArgs {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(3)?;

        encode_corpus(&self.corpus, &self.ids, &self.vocab, self.normalize_digits)?;

        log::info!("ids written to {}", self.ids);
        Ok(())
    }
}
