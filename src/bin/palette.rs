use anyhow::{Context, Result};
use backdrop_palette_wasm::{AnalysisOptions, ColorSpace, analyze};
use clap::Parser;
use log::info;
use std::fs;
use std::path::PathBuf;

/// Analyse product photos: dominant palette, confidence and backdrop suggestions.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Number of palette colors to extract
    #[arg(short = 'k', long)]
    n_colors: Option<usize>,

    /// Maximum number of pixels sampled for clustering
    #[arg(short, long)]
    budget: Option<u32>,

    /// Cluster in CIELAB instead of RGB
    #[arg(long)]
    lab: bool,

    /// Locale for the confidence message (en, es, fr, de)
    #[arg(short, long)]
    locale: Option<String>,

    /// JSON file with analysis options; flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pretty: bool,
}

fn load_options(args: &Args) -> Result<AnalysisOptions> {
    let mut options = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => AnalysisOptions::default(),
    };
    if let Some(k) = args.n_colors {
        options.extract.k = k;
    }
    if let Some(budget) = args.budget {
        options.sample_budget = budget;
    }
    if args.lab {
        options.extract.color_space = ColorSpace::Lab;
    }
    if args.locale.is_some() {
        options.locale = args.locale.clone();
    }
    Ok(options)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let options = load_options(&args)?;

    for input in &args.inputs {
        let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
        let report = analyze(&bytes, &options)
            .with_context(|| format!("analysing {}", input.display()))?;
        info!(
            "{}: {} swatches, confidence {}",
            input.display(),
            report.palette.len(),
            report.confidence.tier
        );

        let json = if args.pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        println!("{json}");
    }

    Ok(())
}
