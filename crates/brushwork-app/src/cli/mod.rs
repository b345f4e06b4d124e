use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::services::BatchConfig;

/// Top-level CLI entry point.
#[derive(Debug, Parser)]
#[command(
    name = "brushwork",
    version,
    about = "Batch image-generation experiments against the OpenAI image APIs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    /// Increase logging verbosity (-v, -vv, -vvv).
    #[arg(global = true, short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

/// One subcommand per scenario; each runs to completion and prints a
/// summary of the files written.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Animated mascots at a nightclub (single Image API batch).
    IpBonanza(GenerateArgs),
    /// Fibonacci code spelled out in refrigerator magnets.
    CodeGeneration(GenerateArgs),
    /// Render a character JSON sheet in two prompt variants.
    CharacterJson(CharacterJsonArgs),
    /// System-prompt extraction attempts (five named batches).
    SystemPrompt(GenerateArgs),
    /// Studio Ghibli style transfer of an input selfie.
    Ghibli(GhibliArgs),
    /// Ugly Sonic with reference images via the Responses API.
    UglySonic(UglySonicArgs),
    /// Single-shot API smoke checks per model.
    Probe,
}

/// Knobs shared by every generating subcommand.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Images to generate per prompt.
    #[arg(long, default_value_t = 5)]
    pub count: u32,
    /// Maximum number of generation jobs in flight at once.
    #[arg(long, default_value_t = 5)]
    pub parallel: usize,
    /// Additional attempts after a failed generation call.
    #[arg(long, default_value_t = 2)]
    pub retries: usize,
    /// Output directory (defaults to the configured one).
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
}

impl GenerateArgs {
    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig::builder()
            .count(self.count)
            .max_parallel(
                NonZeroUsize::new(self.parallel.max(1)).expect("parallelism clamped to at least 1"),
            )
            .max_retries(self.retries)
            .build()
    }
}

#[derive(Debug, Args)]
pub struct CharacterJsonArgs {
    #[command(flatten)]
    pub generate: GenerateArgs,
    /// Path to the character JSON sheet.
    #[arg(value_name = "FILE", default_value = "paladin_pirate_barista.json")]
    pub character_file: PathBuf,
}

#[derive(Debug, Args)]
pub struct GhibliArgs {
    #[command(flatten)]
    pub generate: GenerateArgs,
    /// Input selfie image; default probe locations are tried when omitted.
    #[arg(value_name = "IMAGE")]
    pub input_image: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct UglySonicArgs {
    #[command(flatten)]
    pub generate: GenerateArgs,
    /// Directories to scan for `ugly_sonic*` reference images.
    #[arg(long = "image-dir", value_name = "DIR")]
    pub image_dirs: Vec<PathBuf>,
}
