use clap::{Args, Parser, Subcommand};

use crate::serialize::OutputFormat;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract the TOC as JSON or YAML.
    Extract(ExtractArgs),
    /// Print the TOC as an indented outline.
    Print(SourceArgs),
    /// Print entry counts and depth of the TOC.
    Stats(SourceArgs),
    /// Find TOC entries by title.
    Search(SearchArgs),
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    /// EPUB file to read.
    #[arg(long)]
    pub epub: String,

    /// Extraction methods to try in order, comma separated (default: all).
    /// Known methods: metadata, ncx, opf, library, fulltext, external.
    #[arg(long, value_delimiter = ',')]
    pub methods: Option<Vec<String>>,

    /// Reject TOCs with repeated titles or hrefs.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output file (default: stdout).
    #[arg(long)]
    pub out: Option<String>,

    /// Output format (default: from the `--out` extension, else json).
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Text to look for in entry titles.
    #[arg(long)]
    pub query: String,

    /// Match case exactly.
    #[arg(long)]
    pub case_sensitive: bool,
}
