use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context as _;

use crate::cli::{ExtractArgs, SearchArgs, SourceArgs};
use crate::config::ExtractorConfig;
use crate::extractor::TocExtractor;
use crate::serialize::{OutputFormat, render, render_outline};
use crate::stats::{TocStats, search as search_toc};
use crate::validate::ValidationMode;

pub fn extract(args: ExtractArgs) -> anyhow::Result<()> {
    let mut extractor = open(&args.source)?;
    extractor.extract().context("extract toc")?;

    match args.out {
        Some(out) => {
            let out_path = PathBuf::from(out);
            let format = args
                .format
                .or_else(|| OutputFormat::from_path(&out_path))
                .unwrap_or_default();
            extractor
                .save(&out_path, format)
                .with_context(|| format!("save toc: {}", out_path.display()))?;
        }
        None => {
            let toc = extractor.toc().unwrap_or_default();
            let rendered = render(toc, args.format.unwrap_or_default()).context("render toc")?;
            print(&rendered)?;
        }
    }

    Ok(())
}

pub fn print_outline(args: SourceArgs) -> anyhow::Result<()> {
    let mut extractor = open(&args)?;
    print(&render_outline(extractor.extract().context("extract toc")?))
}

pub fn stats(args: SourceArgs) -> anyhow::Result<()> {
    let mut extractor = open(&args)?;
    let stats = TocStats::collect(extractor.extract().context("extract toc")?);

    let mut out = format!(
        "entries: {}\nmax depth: {}\n",
        stats.total_entries, stats.max_depth
    );
    for (level, count) in &stats.entries_per_level {
        out.push_str(&format!("level {level}: {count}\n"));
    }
    if let Some(method) = extractor.method() {
        out.push_str(&format!("method: {method}\n"));
    }
    print(&out)
}

pub fn search(args: SearchArgs) -> anyhow::Result<()> {
    let mut extractor = open(&args.source)?;
    let toc = extractor.extract().context("extract toc")?;

    let hits = search_toc(toc, &args.query, args.case_sensitive);
    tracing::info!(query = %args.query, hits = hits.len(), "search done");

    let mut out = String::new();
    for hit in &hits {
        out.push_str(&format!("{} -> {}\n", hit.breadcrumb(), hit.href));
    }
    print(&out)
}

fn open(args: &SourceArgs) -> anyhow::Result<TocExtractor> {
    let mut config = ExtractorConfig::from_env();
    if let Some(methods) = &args.methods {
        config = config.with_methods(methods.iter().map(String::as_str));
    }
    if args.strict {
        config = config.with_validation(ValidationMode::Strict);
    }

    TocExtractor::from_config(&args.epub, &config)
        .with_context(|| format!("open epub: {}", args.epub))
}

fn print(text: &str) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .and_then(|()| stdout.flush())
        .context("write stdout")
}
