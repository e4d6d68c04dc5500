// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction, parsed with clap. All
// business logic is delegated to Layer 2 (application); this
// layer only routes and prints.
//
// Three commands:
//   1. `preprocess` - sanitize raw images into the cleaned tree
//   2. `train`      - train the classifier and plot the history
//   3. `predict`    - classify one image with the trained model

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PredictArgs, PreprocessArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "fruit-classifier",
    version,
    about = "Train a small CNN on a labelled image directory, then classify images with it."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the right use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Preprocess(args) => Self::run_preprocess(&args),
            Commands::Train(args)      => Self::run_train(&args),
            Commands::Predict(args)    => Self::run_predict(args),
        }
    }

    fn run_preprocess(args: &PreprocessArgs) -> Result<()> {
        use crate::application::preprocess_use_case::PreprocessUseCase;

        PreprocessUseCase::new(args.into()).execute()?;
        println!("Preprocessing complete.");
        Ok(())
    }

    fn run_train(args: &TrainArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        tracing::info!("Starting training on '{}'", args.cleaned_dir.display());
        TrainUseCase::new(args.into(), args.into()).execute()?;
        println!("Training complete. Artifact saved.");
        Ok(())
    }

    fn run_predict(args: PredictArgs) -> Result<()> {
        use crate::application::predict_use_case::PredictUseCase;

        let layout = (&args).into();
        let (path, prediction) = PredictUseCase::new(layout, args.image).execute()?;
        println!(
            "{}: {}: {:.2}%",
            path.display(),
            prediction.label,
            prediction.confidence * 100.0
        );
        Ok(())
    }
}
