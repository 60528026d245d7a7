use crate::commands::{
    build_vocab::BuildVocabArgs, decode::DecodeArgs, encode::EncodeArgs, prepare::PrepareArgs,
    weights::WeightsArgs,
};

pub mod build_vocab;
pub mod decode;
pub mod encode;
pub mod prepare;
pub mod weights;

/// Subcommands for phrasemill-cli
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Build a frequency-ranked vocabulary from a corpus.
    BuildVocab(BuildVocabArgs),

    /// Encode a corpus into token ids.
    Encode(EncodeArgs),

    /// Decode an ids file back into text.
    Decode(DecodeArgs),

    /// Derive per-id loss weights from an encoded corpus.
    Weights(WeightsArgs),

    /// Prepare a full parallel corpus directory for training.
    Prepare(PrepareArgs),
}

impl Commands {
    /// Run the subcommand.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Commands::BuildVocab(cmd) => cmd.run(),
            Commands::Encode(cmd) => cmd.run(),
            Commands::Decode(cmd) => cmd.run(),
            Commands::Weights(cmd) => cmd.run(),
            Commands::Prepare(cmd) => cmd.run(),
        }
    }
}
