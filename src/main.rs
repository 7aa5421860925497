use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main() -> anyhow::Result<()> {
    let cli = epub_toc::cli::Cli::parse();
    let default_log = if cli.verbose { "debug" } else { "info" };
    epub_toc::logging::init(default_log).context("init logging")?;
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        epub_toc::cli::Command::Extract(args) => {
            epub_toc::commands::extract(args).context("extract")?;
        }
        epub_toc::cli::Command::Print(args) => {
            epub_toc::commands::print_outline(args).context("print")?;
        }
        epub_toc::cli::Command::Stats(args) => {
            epub_toc::commands::stats(args).context("stats")?;
        }
        epub_toc::cli::Command::Search(args) => {
            epub_toc::commands::search(args).context("search")?;
        }
    }

    Ok(())
}
