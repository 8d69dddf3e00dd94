use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use pqrst_lib::{
    config::{DetectorOptions, SearchScope},
    detectors::pqrst::{detect, Detection},
    io::{csv as csv_io, text as text_io, wfdb as wfdb_io},
    metrics::intervals::summarize,
    signal::EcgTrace,
};
use std::{
    io::{self, Read},
    path::{Path, PathBuf},
};

#[derive(Parser)]
#[command(
    name = "pqrst",
    version,
    about = "Locate P, Q, R, S and T landmarks in single-lead ECG recordings"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SSearch {
    #[value(name = "full-window")]
    FullWindow,
    #[value(name = "after-r")]
    AfterR,
}

impl From<SSearch> for SearchScope {
    fn from(value: SSearch) -> Self {
        match value {
            SSearch::FullWindow => SearchScope::FullWindow,
            SSearch::AfterR => SearchScope::AfterR,
        }
    }
}

/// Where the trace comes from and how it is timed.
#[derive(Args)]
struct TraceArgs {
    /// Newline-delimited samples (one row or one column); stdin when omitted
    #[arg(long)]
    input: Option<PathBuf>,
    /// Delimited file with a header row (.tsv is read tab-separated)
    #[arg(long, conflicts_with = "input")]
    csv: Option<PathBuf>,
    #[arg(long, default_value = "ecg")]
    ecg_column: String,
    #[arg(long)]
    time_column: Option<String>,
    #[arg(long, conflicts_with_all = ["input", "csv"])]
    wfdb_header: Option<PathBuf>,
    #[arg(long, default_value_t = 0)]
    wfdb_lead: usize,
    /// Newline-delimited timestamps, one per sample
    #[arg(long, conflicts_with = "fs")]
    time: Option<PathBuf>,
    /// Build the time base as (i + 1) / fs
    #[arg(long)]
    fs: Option<f64>,
}

/// Detector knobs; flags override values from --config.
#[derive(Args)]
struct DetectorArgs {
    /// TOML file with r_threshold, heart_rate_hz and s_search
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    r_threshold: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    heart_rate_hz: Option<f64>,
    #[arg(long)]
    s_search: Option<SSearch>,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect PQRST landmarks and print them as JSON
    Detect {
        #[command(flatten)]
        trace: TraceArgs,
        #[command(flatten)]
        detector: DetectorArgs,
    },
    /// Detect landmarks, then print per-beat and mean intervals as JSON
    Intervals {
        #[command(flatten)]
        trace: TraceArgs,
        #[command(flatten)]
        detector: DetectorArgs,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Detect { trace, detector } => cmd_detect(&trace, &detector)?,
        Commands::Intervals { trace, detector } => cmd_intervals(&trace, &detector)?,
    }
    Ok(())
}

fn read_samples(input: Option<&Path>) -> Result<Vec<f64>> {
    match input {
        Some(path) => text_io::read_signal(path),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            text_io::parse_signal(&buf)
        }
    }
}

fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    }
}

fn load_trace(args: &TraceArgs) -> Result<EcgTrace> {
    let trace = if let Some(header) = &args.wfdb_header {
        wfdb_io::load_wfdb_lead(header, args.wfdb_lead)?
    } else if let Some(path) = &args.csv {
        csv_io::load_ecg_csv(
            path,
            &args.ecg_column,
            args.time_column.as_deref(),
            delimiter_for(path),
        )?
    } else {
        EcgTrace::new(read_samples(args.input.as_deref())?)
    };

    if let Some(path) = &args.time {
        let times = text_io::read_f64_series(path)?;
        return Ok(EcgTrace::with_time(trace.samples, times));
    }
    if let Some(fs) = args.fs {
        return Ok(EcgTrace::with_rate(trace.samples, fs));
    }
    Ok(trace)
}

fn load_options(args: &DetectorArgs) -> Result<DetectorOptions> {
    let base = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str::<DetectorOptions>(&text)
                .with_context(|| format!("invalid detector config {}", path.display()))?
        }
        None => DetectorOptions::default(),
    };
    let flags = DetectorOptions {
        r_threshold: args.r_threshold,
        heart_rate_hz: args.heart_rate_hz,
        s_search: args.s_search.map(SearchScope::from),
    };
    Ok(base.merge(flags))
}

fn run_detection(trace_args: &TraceArgs, detector_args: &DetectorArgs) -> Result<Detection> {
    let trace = load_trace(trace_args)?;
    let options = load_options(detector_args)?;
    info!(
        "loaded {} samples ({:.3} samples per time unit)",
        trace.len(),
        trace.sampling_rate()
    );
    let detection = detect(&trace, &options)?;
    if detection.no_peaks_found() {
        info!("no R peaks found");
    }
    Ok(detection)
}

fn cmd_detect(trace: &TraceArgs, detector: &DetectorArgs) -> Result<()> {
    let detection = run_detection(trace, detector)?;
    let js = serde_json::to_string(&detection)?;
    println!("{}", js);
    Ok(())
}

fn cmd_intervals(trace: &TraceArgs, detector: &DetectorArgs) -> Result<()> {
    let detection = run_detection(trace, detector)?;
    let summary = summarize(&detection.complexes);
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}
