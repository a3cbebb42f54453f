use crate::config::load_config;
use crate::layout::{JitterSpread, compute_layout};
use crate::layout_dump::{arrow_report, write_layout_dump};
use crate::parser::load_capabilities;
use crate::render::{render_svg, write_output_svg};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

const DEFAULT_INPUT: &str = "input.json";

#[derive(Parser, Debug)]
#[command(name = "capvis", version, about = "Capability table diagram renderer")]
pub struct Args {
    /// Capability dump (JSON array of records). Defaults to input.json.
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme/layout/render overrides)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Seed for the arrow jitter, for reproducible figures
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Print one line per arrow with its global coordinates
    #[arg(long = "dump-arrows")]
    pub dump_arrows: bool,

    /// Write the computed layout as JSON for golden-file comparison
    #[arg(long = "dump-layout")]
    pub dump_layout: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    let input = args
        .input
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
    // A missing dump is a user-visible condition, not a fault.
    if !input.exists() {
        println!("Error: file '{}' not found.", input.display());
        return Ok(());
    }

    let descriptors = load_capabilities(&input)?;
    let mut spread = JitterSpread::from_config(&config.layout, args.seed);
    let layout = compute_layout(&descriptors, &config.layout, &mut spread);

    if args.dump_arrows {
        print!("{}", arrow_report(&layout));
    }
    if let Some(path) = &args.dump_layout {
        write_layout_dump(path, &layout)?;
    }

    let svg = render_svg(&layout, &config);
    match args.output_format {
        OutputFormat::Svg => write_output_svg(&svg, args.output.as_deref())?,
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_png(&svg, &output)?;
        }
    }

    Ok(())
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path) -> Result<()> {
    crate::render::write_output_png(svg, output)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path) -> Result<()> {
    Err(anyhow::anyhow!(
        "png output requires building with the `png` feature"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_output_requires_a_path() {
        let err = ensure_output(&None, "png").unwrap_err();
        assert!(err.to_string().contains("png"));
        let path = ensure_output(&Some(PathBuf::from("out.png")), "png").unwrap();
        assert_eq!(path, PathBuf::from("out.png"));
    }

    #[test]
    fn args_parse_with_defaults() {
        let args = Args::parse_from(["capvis"]);
        assert!(args.input.is_none());
        assert!(matches!(args.output_format, OutputFormat::Svg));
        assert!(!args.dump_arrows);
    }

    #[test]
    fn seed_and_dump_flags_parse() {
        let args = Args::parse_from(["capvis", "--seed", "42", "--dump-arrows"]);
        assert_eq!(args.seed, Some(42));
        assert!(args.dump_arrows);
    }
}
