use phrasemill::{
    encode::load_ids_corpus,
    reconstruct::{Hypothesis, reconstruct_hypotheses, write_reconstruction},
    vocab::TokenVocab,
};

use crate::{input_output::OutputArgs, logging::LogArgs};

/// Args for the decode command.
///
/// Unknown-word positions come out as the literal `_UNK` placeholder;
/// attention-aligned substitution needs attention matrices from a live
/// model and is a library-level operation.
#[derive(clap::Args, Debug)]
pub struct DecodeArgs {
    /// Input ids file, one space-separated id sequence per line.
    ids: String,

    /// Vocabulary file to decode against.
    vocab: String,

    #[clap(flatten)]
    pub logging: LogArgs,

    #[command(flatten)]
    output: OutputArgs,
}

impl DecodeArgs {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(3)?;

        let vocab = TokenVocab::load(&self.vocab)?;
        let hypotheses: Vec<Option<Hypothesis>> = load_ids_corpus(&self.ids)?
            .into_iter()
            .map(|ids| Some(Hypothesis::new(ids, 0.0)))
            .collect();

        let lines = reconstruct_hypotheses(&hypotheses, &vocab, None, None)?;

        let mut writer = self.output.open_writer()?;
        write_reconstruction(&mut writer, &lines)?;
        Ok(())
    }
}
