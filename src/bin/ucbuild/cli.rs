//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use ucbuild::ops::InfoFormat;

/// ucbuild - build and package UCBlock for SMS++
#[derive(Parser)]
#[command(name = "ucbuild")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the whole pipeline: resolve, export, patch, configure, build, package
    Create(CreateArgs),

    /// Resolve the dependency, export and patch the sources
    Source(RecipeArgs),

    /// Configure and build an exported source tree
    Build(BuildArgs),

    /// Configure and package an existing build
    Package(RecipeArgs),

    /// Print the package info consumers link against
    Info(InfoArgs),

    /// Print the recipe definition
    Inspect,

    /// Remove the work directory
    Clean(CleanArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments shared by every pipeline step.
#[derive(Args, Clone)]
pub struct RecipeArgs {
    /// Directory containing the UCBlock sources (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub recipe: Option<PathBuf>,

    /// Work directory for the sandbox, build tree and package
    #[arg(long, value_name = "DIR")]
    pub workdir: Option<PathBuf>,

    /// Set a recipe option (e.g. -o shared=True)
    #[arg(short = 'o', long = "option", value_name = "NAME=VALUE")]
    pub options: Vec<String>,

    /// Build type (Debug, Release, RelWithDebInfo, MinSizeRel)
    #[arg(long)]
    pub build_type: Option<String>,

    /// Extra CMake definition (e.g. -D CMAKE_CXX_STANDARD=17)
    #[arg(short = 'D', long = "define", value_name = "KEY=VALUE")]
    pub defines: Vec<String>,

    /// CMake generator (e.g. Ninja)
    #[arg(short = 'G', long)]
    pub generator: Option<String>,

    /// Package cache used to resolve the dependency
    #[arg(long, value_name = "DIR", env = "UCBUILD_CACHE")]
    pub cache: Option<PathBuf>,
}

#[derive(Args)]
pub struct CreateArgs {
    #[command(flatten)]
    pub recipe: RecipeArgs,

    /// Number of parallel jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Publish the package to the cache as USER/CHANNEL
    #[arg(long, value_name = "USER/CHANNEL")]
    pub publish: Option<String>,
}

#[derive(Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub recipe: RecipeArgs,

    /// Number of parallel jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,
}

#[derive(Args)]
pub struct InfoArgs {
    /// Output format (flags, toml, json)
    #[arg(long, default_value = "flags")]
    pub format: InfoFormat,

    /// Package folder to describe (defaults to the work directory's package)
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Work directory
    #[arg(long, value_name = "DIR")]
    pub workdir: Option<PathBuf>,
}

#[derive(Args)]
pub struct CleanArgs {
    /// Work directory to remove
    #[arg(long, value_name = "DIR")]
    pub workdir: Option<PathBuf>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
