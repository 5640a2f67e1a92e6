//! colorline - draw a value-colored polyline from a JSON Lines sample file
//! and write it out as SVG.

use anyhow::{Context, Result};
use clap::Parser;
use colorline::config::RenderConfig;
use colorline::export::export_figure;
use colorline::{cline, cline_with_colorbar, Arg, Figure, Matrix, MATCH_MARKER_FACE};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Draw a polyline colored along its length by per-point values
#[derive(Parser, Debug)]
#[command(name = "colorline")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON Lines input, one `{"x":..,"y":..,"z":..,"value":..}` per line
    input: PathBuf,

    /// Output SVG file
    #[arg(short, long, default_value = "colorline.svg")]
    output: PathBuf,

    /// Named palette
    #[arg(short, long, default_value = "jet")]
    palette: String,

    /// JSON file holding an N-by-3 RGB table, used instead of --palette
    #[arg(long, conflicts_with = "palette")]
    palette_file: Option<PathBuf>,

    /// Style string such as "o", "--" or ":s"
    #[arg(short, long, allow_hyphen_values = true)]
    style: Option<String>,

    /// Line width in points
    #[arg(long)]
    line_width: Option<f64>,

    /// Marker size in points
    #[arg(long)]
    marker_size: Option<f64>,

    /// Fill markers with the color of their drawable
    #[arg(long)]
    match_face: bool,

    /// Show a colorbar spanning the value range
    #[arg(long)]
    colorbar: bool,

    /// JSON render config (falls back to $COLORLINE_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the recorded drawables as JSON on stdout
    #[arg(long)]
    dump: bool,
}

#[derive(Debug, Deserialize)]
struct Sample {
    x: f64,
    y: f64,
    #[serde(default)]
    z: Option<f64>,
    #[serde(default)]
    value: Option<f64>,
}

/// Load samples from a JSON Lines file. Blank lines and `#` comments are skipped.
fn load_samples<P: AsRef<Path>>(path: P) -> Result<Vec<Sample>> {
    let file = File::open(path.as_ref())
        .with_context(|| format!("Failed to open input file: {}", path.as_ref().display()))?;

    let mut samples = Vec::new();
    for (line_num, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read line {}", line_num + 1))?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let sample = serde_json::from_str::<Sample>(line)
            .with_context(|| format!("Line {} is not a valid sample", line_num + 1))?;
        samples.push(sample);
    }

    if samples.is_empty() {
        anyhow::bail!("No samples found in {}", path.as_ref().display());
    }
    Ok(samples)
}

/// Collect an optional per-sample field, which must be present on every
/// sample or on none.
fn column(samples: &[Sample], name: &str, get: impl Fn(&Sample) -> Option<f64>) -> Result<Option<Vec<f64>>> {
    let present = samples.iter().filter(|s| get(s).is_some()).count();
    match present {
        0 => Ok(None),
        n if n == samples.len() => Ok(Some(samples.iter().filter_map(&get).collect())),
        n => anyhow::bail!("'{name}' is set on {n} of {} samples; set it on all or none", samples.len()),
    }
}

fn load_palette_file(path: &Path) -> Result<Arg> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read palette file: {}", path.display()))?;
    let rows: Vec<Vec<f64>> = serde_json::from_str(&text)
        .with_context(|| format!("Palette file is not a JSON array of rows: {}", path.display()))?;
    let table = Matrix::from_rows(&rows)
        .with_context(|| format!("Palette rows have different lengths: {}", path.display()))?;
    Ok(Arg::Matrix(table))
}

/// Build the positional call from the samples and flags.
fn build_call(args: &Args, samples: &[Sample]) -> Result<Vec<Arg>> {
    let mut call = vec![
        Arg::Vector(samples.iter().map(|s| s.x).collect()),
        Arg::Vector(samples.iter().map(|s| s.y).collect()),
    ];
    if let Some(z) = column(samples, "z", |s| s.z)? {
        call.push(Arg::Vector(z));
    }

    call.push(match &args.palette_file {
        Some(path) => load_palette_file(path)?,
        None => Arg::Text(args.palette.clone()),
    });

    if let Some(values) = column(samples, "value", |s| s.value)? {
        call.push(Arg::Vector(values));
    }
    if let Some(style) = &args.style {
        call.push(Arg::Text(style.clone()));
    }
    if let Some(width) = args.line_width {
        call.extend([Arg::from("LineWidth"), Arg::Num(width)]);
    }
    if let Some(size) = args.marker_size {
        call.extend([Arg::from("MarkerSize"), Arg::Num(size)]);
    }
    if args.match_face {
        call.push(Arg::from(MATCH_MARKER_FACE));
    }
    Ok(call)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "colorline=info".into()),
        )
        .init();

    let args = Args::parse();
    let config = RenderConfig::load(args.config.as_deref())?;

    let samples = load_samples(&args.input)?;
    info!(samples = samples.len(), input = %args.input.display(), "loaded samples");

    let call = build_call(&args, &samples)?;
    debug!(tokens = call.len(), "built call");

    let mut figure = Figure::from_config(&config);
    let drawn = if args.colorbar {
        cline_with_colorbar(&mut figure, &call)
            .context("Failed to draw colored line")?
            .0
    } else {
        cline(&mut figure, &call).context("Failed to draw colored line")?
    };
    info!(drawables = drawn.len(), strategy = ?drawn.strategy, axes = %drawn.axes, "drawn");

    export_figure(&figure, drawn.axes, &config, &args.output)?;
    eprintln!("Wrote {}", args.output.display());

    if args.dump {
        let axes = figure
            .axes(drawn.axes)
            .context("Drawn axes disappeared from the figure")?;
        println!("{}", serde_json::to_string_pretty(axes)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(x: f64, z: Option<f64>, value: Option<f64>) -> Sample {
        Sample { x, y: x * 2.0, z, value }
    }

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["colorline", "in.jsonl"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn columns_must_be_all_or_none() {
        let mixed = [sample(0.0, Some(1.0), None), sample(1.0, None, None)];
        assert!(column(&mixed, "z", |s| s.z).is_err());
        assert_eq!(column(&mixed, "value", |s| s.value).unwrap(), None);
    }

    #[test]
    fn call_carries_style_pairs_and_flag() {
        let args = parse(&["--style", "o", "--line-width", "3", "--match-face"]);
        let samples = [sample(0.0, None, Some(5.0)), sample(1.0, None, Some(7.0))];
        let call = build_call(&args, &samples).unwrap();
        assert_eq!(call.len(), 8);
        assert_eq!(call[2], Arg::from("jet"));
        assert_eq!(call[3], Arg::Vector(vec![5.0, 7.0]));
        assert_eq!(call[4], Arg::from("o"));
        assert_eq!(call.last(), Some(&Arg::from(MATCH_MARKER_FACE)));
    }

    #[test]
    fn three_d_samples_add_a_z_vector() {
        let args = parse(&[]);
        let samples = [sample(0.0, Some(1.0), None), sample(1.0, Some(2.0), None)];
        let call = build_call(&args, &samples).unwrap();
        assert_eq!(call[2], Arg::Vector(vec![1.0, 2.0]));
        assert_eq!(call.len(), 4);
    }

    #[test]
    fn load_skips_comments() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        use std::io::Write;
        writeln!(file, "# header").unwrap();
        writeln!(file, r#"{{"x": 0, "y": 1}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"x": 1, "y": 3, "value": 2.5}}"#).unwrap();
        let samples = load_samples(file.path()).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].value, Some(2.5));
    }
}
