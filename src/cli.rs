use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "php-class-finder")]
#[command(about = "Find PHP classes under a directory by namespace, inheritance, interfaces, traits and members")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true)]
    pub verbose: bool,

    /// Source-file extension to scan (default: php)
    #[arg(long, value_name = "EXT", global = true)]
    pub extension: Option<String>,

    /// Include hidden files and directories
    #[arg(long, global = true)]
    pub hidden: bool,

    /// Honour .gitignore and .ignore files
    #[arg(long, global = true)]
    pub respect_gitignore: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    Find(FindArgs),
    Inspect {
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Args)]
pub struct FindArgs {
    pub directory: PathBuf,

    #[arg(long, value_name = "NS")]
    pub namespace: Option<String>,

    #[arg(long, value_name = "NAME")]
    pub class: Option<String>,

    #[arg(long, value_name = "CLASS")]
    pub extends: Option<String>,

    #[arg(long, value_name = "INTERFACE")]
    pub implements: Vec<String>,

    #[arg(long, value_name = "TRAIT")]
    pub uses: Vec<String>,

    #[arg(long, value_name = "NAME")]
    pub has_constant: Vec<String>,

    #[arg(long, value_name = "NAME")]
    pub has_property: Vec<String>,

    #[arg(long, value_name = "NAME")]
    pub has_method: Vec<String>,

    /// Extra directory indexed for parents, interfaces and traits
    #[arg(long, value_name = "DIR")]
    pub search_root: Vec<PathBuf>,

    /// Loading strategy to run; repeat to run several (default: psr4)
    #[arg(long, value_enum)]
    pub strategy: Vec<StrategyKind>,

    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum StrategyKind {
    Psr4,
    Classmap,
}

#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
    Names,
}
