use phrasemill::dataset::{CorpusPaths, PrepareOptions, prepare_corpus};

use crate::logging::LogArgs;

/// Args for the prepare command.
#[derive(clap::Args, Debug)]
pub struct PrepareArgs {
    /// Directory to write the prepared artifacts into.
    data_dir: String,

    /// Source-side training corpus.
    #[arg(long)]
    from_train: String,

    /// Target-side training corpus.
    #[arg(long)]
    to_train: String,

    /// Source-side dev corpus.
    #[arg(long)]
    from_dev: String,

    /// Target-side dev corpus.
    #[arg(long)]
    to_dev: String,

    #[clap(flatten)]
    pub logging: LogArgs,

    /// Max source-side vocab size.
    #[arg(long, default_value = "40000")]
    from_vocab_size: usize,

    /// Max target-side vocab size.
    #[arg(long, default_value = "40000")]
    to_vocab_size: usize,

    /// Replace digits with 0 before counting and lookup.
    #[arg(long)]
    normalize_digits: bool,
}

impl PrepareArgs {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(3)?;

        let paths = CorpusPaths::new(
            &self.from_train,
            &self.to_train,
            &self.from_dev,
            &self.to_dev,
        );
        let options = PrepareOptions::new(self.from_vocab_size, self.to_vocab_size)
            .with_normalize_digits(self.normalize_digits);

        let prepared = prepare_corpus(&self.data_dir, &paths, &options)?;

        log::info!("from vocab:     {}", prepared.from_vocab.display());
        log::info!("to vocab:       {}", prepared.to_vocab.display());
        log::info!("from train ids: {}", prepared.from_train_ids.display());
        log::info!("to train ids:   {}", prepared.to_train_ids.display());
        log::info!("from dev ids:   {}", prepared.from_dev_ids.display());
        log::info!("to dev ids:     {}", prepared.to_dev_ids.display());
        Ok(())
    }
}
