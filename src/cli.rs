use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "learner-lattice")]
#[command(about = "Check learner types against table headers")]
pub struct Cli {
    /// Log lattice construction and checks to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check whether a type accepts the given input and output headers
    Check(CheckArgs),
    /// Test whether one type is a subtype of another
    Subtype(SubtypeArgs),
    /// List every known type
    List(ListArgs),
}

#[derive(clap::Args)]
pub struct DefsArgs {
    /// TOML file with extra type definitions and limits
    #[arg(short, long)]
    pub defs: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct CheckArgs {
    /// Type name or expression, e.g. 'Classifying|Regressing'
    pub ty: String,

    /// Input headers as name:kind pairs, comma separated
    #[arg(short, long, default_value = "")]
    pub input: String,

    /// Output headers as name:kind pairs, comma separated
    #[arg(short, long, default_value = "")]
    pub output: String,

    #[command(flatten)]
    pub defs: DefsArgs,
}

#[derive(clap::Args)]
pub struct SubtypeArgs {
    /// Candidate subtype
    pub sub: String,

    /// Candidate supertype
    pub sup: String,

    /// Accept a union if any one of its members qualifies
    #[arg(long)]
    pub potential: bool,

    #[command(flatten)]
    pub defs: DefsArgs,
}

#[derive(clap::Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub defs: DefsArgs,
}
