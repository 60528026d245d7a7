use phrasemill::frequency::write_weight_file;

use crate::logging::LogArgs;

/// Args for the weights command.
#[derive(clap::Args, Debug)]
pub struct WeightsArgs {
    /// Input ids file, one space-separated id sequence per line.
    ids: String,

    /// Output weight file, one `<id> <weight>` line per id.
    weights: String,

    #[clap(flatten)]
    pub logging: LogArgs,
}

impl WeightsArgs {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(3)?;

        write_weight_file(&self.ids, &self.weights)?;

        log::info!("weights written to {}", self.weights);
        Ok(())
    }
}
