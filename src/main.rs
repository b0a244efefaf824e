use anyhow::{anyhow, Context, Result};
use clap::Parser;
use html2docx::ConvertOptions;
use log::LevelFilter;
use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input HTML file (any fragment or full document).
    #[arg(long)]
    html_file: PathBuf,

    /// Output .docx path.
    #[arg(long)]
    out: PathBuf,

    /// Extra tags to skip together with their content (`hr` is always skipped).
    #[arg(long = "ignore", value_name = "TAG")]
    ignore: Vec<String>,

    /// Print debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let _ = env_logger::builder().filter_module("html2docx", level).try_init();

    let mut html = String::new();
    File::open(&args.html_file)
        .with_context(|| format!("open {}", args.html_file.display()))?
        .read_to_string(&mut html)
        .with_context(|| format!("read {}", args.html_file.display()))?;

    if html.trim().is_empty() {
        return Err(anyhow!("empty html"));
    }

    let mut options = ConvertOptions::default();
    options.ignore.extend(args.ignore);

    let bytes = html2docx::convert_with(&html, &options)
        .with_context(|| format!("convert {}", args.html_file.display()))?;

    File::create(&args.out)
        .with_context(|| format!("create {}", args.out.display()))?
        .write_all(&bytes)
        .with_context(|| format!("write {}", args.out.display()))?;
    log::info!("wrote {}", args.out.display());
    Ok(())
}
