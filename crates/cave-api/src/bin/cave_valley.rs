//! cavepath valley CLI
//!
//! Builds the spline through the configured waypoints, evaluates the valley
//! field around it, and writes the result for viewing.
//!
//! # Usage
//!
//! ```bash
//! # Reference cave, HTML viewer written to valley.html
//! cave_valley
//!
//! # Custom configuration, all exports
//! cave_valley --config route.toml --html out.html --json out.json --csv out.csv
//!
//! # Statistics only
//! cave_valley --config route.toml --summary
//! ```

use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use cave_api::{build_valley, ValleyConfig};

fn print_usage() {
    eprintln!(
        r#"cavepath valley CLI

USAGE:
    cave_valley [OPTIONS]

OPTIONS:
    --config <file.toml>   Read waypoints, outline and parameters from a TOML file
    --html <out.html>      Write a standalone HTML surface viewer
    --json <out.json>      Write the scene (path, segments, surface) as JSON
    --csv <out.csv>        Write the surface as x,z,distance_sq,value rows
    --summary              Print statistics instead of writing files
    --print-config         Print the effective configuration as TOML and exit
    --help                 Show this help message

With no output option, writes valley.html in the current directory.
Set RUST_LOG=debug for per-stage details.
"#
    );
}

#[derive(Debug, Default)]
struct Options {
    config: Option<PathBuf>,
    html: Option<PathBuf>,
    json: Option<PathBuf>,
    csv: Option<PathBuf>,
    summary: bool,
    print_config: bool,
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut options = Options::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut path_arg = |flag: &str| -> Result<PathBuf> {
            iter.next()
                .map(PathBuf::from)
                .with_context(|| format!("{} requires a path", flag))
        };
        match arg.as_str() {
            "--config" => options.config = Some(path_arg("--config")?),
            "--html" => options.html = Some(path_arg("--html")?),
            "--json" => options.json = Some(path_arg("--json")?),
            "--csv" => options.csv = Some(path_arg("--csv")?),
            "--summary" => options.summary = true,
            "--print-config" => options.print_config = true,
            other => bail!("unknown argument: {}", other),
        }
    }
    Ok(options)
}

fn run(options: Options) -> Result<()> {
    let config = match &options.config {
        Some(path) => ValleyConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => ValleyConfig::default(),
    };

    if options.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let output = build_valley(&config).context("valley pipeline failed")?;
    let scene = output.to_scene()?;

    if options.summary {
        print!("{}", scene.summary());
        return Ok(());
    }

    let mut wrote_any = false;
    if let Some(path) = &options.json {
        scene
            .export_json(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        wrote_any = true;
    }
    if let Some(path) = &options.csv {
        scene
            .export_csv(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        wrote_any = true;
    }
    if options.html.is_some() || !wrote_any {
        let path = options.html.unwrap_or_else(|| PathBuf::from("valley.html"));
        scene
            .export_html(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("Open {} in a web browser to view the valley.", path.display());
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        process::exit(0);
    }

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}\n", e);
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = run(options) {
        log::error!("{:#}", e);
        process::exit(1);
    }
}
