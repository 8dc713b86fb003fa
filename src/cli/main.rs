//! Command line reverse lookups.
//!
//! `lookup` resolves a single coordinate, `batch` resolves a CSV of
//! `id,lon,lat` rows in parallel, `stats` prints per-layer figures.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use reversejp::pip::DEFAULT_FALLBACK_OFFSETS;
use reversejp::{EngineConfig, ReverseJp};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "reversejp")]
#[command(about = "Resolve coordinates to Japanese administrative and hazard areas")]
struct Args {
    /// TOML engine configuration (overrides --data-dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the JMA datasets
    #[arg(long, default_value = "data", global = true)]
    data_dir: PathBuf,

    /// Fail on malformed features instead of skipping them
    #[arg(long, global = true)]
    strict: bool,

    /// Retry slightly shifted points when nothing matches
    #[arg(long, global = true)]
    nudge: bool,

    #[arg(long, default_value = "warn", global = true)]
    log_level: Level,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a single coordinate
    Lookup {
        #[arg(allow_hyphen_values = true)]
        lon: f64,
        #[arg(allow_hyphen_values = true)]
        lat: f64,

        /// Print JSON instead of one line per region
        #[arg(long)]
        json: bool,
    },

    /// Resolve `id,lon,lat` rows from a CSV file
    Batch {
        /// Input CSV (`-` for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Input has no header row
        #[arg(long)]
        no_header: bool,
    },

    /// Print layer statistics
    Stats,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let engine = load_engine(&args)?;

    match args.command {
        Command::Lookup { lon, lat, json } => lookup(&engine, lon, lat, json),
        Command::Batch {
            input,
            output,
            no_header,
        } => batch(&engine, &input, output.as_deref(), !no_header),
        Command::Stats => {
            let stats = engine.stats();
            println!("{}", serde_json::to_string_pretty(&stats)?);
            Ok(())
        }
    }
}

fn load_engine(args: &Args) -> Result<ReverseJp> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load_from_file(path).context("Failed to load config")?,
        None => EngineConfig::jma_defaults(&args.data_dir),
    };
    if args.strict {
        config.engine.strict_mode = true;
    }
    if args.nudge && config.engine.fallback_offsets.is_empty() {
        config.engine.fallback_offsets = DEFAULT_FALLBACK_OFFSETS.to_vec();
    }

    ReverseJp::from_config(&config).context("Failed to load datasets")
}

fn lookup(engine: &ReverseJp, lon: f64, lat: f64, json: bool) -> Result<()> {
    let properties = engine.find_properties(lon, lat)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&properties)?);
        return Ok(());
    }

    if properties.is_empty() {
        println!("No region found for ({lon}, {lat})");
    }
    for props in properties {
        match props.en_name {
            Some(en_name) => println!("{}\t{}\t{}", props.code, props.name, en_name),
            None => println!("{}\t{}", props.code, props.name),
        }
    }
    Ok(())
}

/// One resolved input row
struct BatchRow {
    id: String,
    codes: String,
    error: String,
}

fn batch(engine: &ReverseJp, input: &Path, output: Option<&Path>, has_headers: bool) -> Result<()> {
    let reader: Box<dyn Read> = if input == Path::new("-") {
        Box::new(io::stdin())
    } else {
        Box::new(File::open(input).context("Failed to open input file")?)
    };

    let mut csv_reader = ReaderBuilder::new()
        .has_headers(has_headers)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let records: Vec<StringRecord> = csv_reader
        .records()
        .collect::<Result<_, _>>()
        .context("Failed to read input CSV")?;
    info!("Resolving {} rows", records.len());

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})",
            )?
            .progress_chars("#>-"),
    );

    let rows: Vec<BatchRow> = records
        .par_iter()
        .map(|record| {
            let row = resolve_row(engine, record);
            pb.inc(1);
            row
        })
        .collect();
    pb.finish_and_clear();

    let failed = rows.iter().filter(|row| !row.error.is_empty()).count();
    if failed > 0 {
        warn!("{} of {} rows could not be resolved", failed, rows.len());
    }

    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(File::create(path).context("Failed to create output file")?),
        None => Box::new(io::stdout()),
    };
    let mut csv_writer = WriterBuilder::new().from_writer(writer);
    csv_writer.write_record(["id", "codes", "error"])?;
    for row in rows {
        csv_writer.write_record([row.id, row.codes, row.error])?;
    }
    csv_writer.flush()?;

    Ok(())
}

fn resolve_row(engine: &ReverseJp, record: &StringRecord) -> BatchRow {
    let id = record.get(0).unwrap_or_default().to_string();

    let coords = (|| -> Result<(f64, f64)> {
        let lon = record.get(1).context("missing lon")?.parse()?;
        let lat = record.get(2).context("missing lat")?.parse()?;
        Ok((lon, lat))
    })();

    let result = coords.and_then(|(lon, lat)| Ok(engine.find_properties(lon, lat)?));

    match result {
        Ok(properties) => BatchRow {
            id,
            codes: properties
                .iter()
                .map(|p| p.code.as_str())
                .collect::<Vec<_>>()
                .join("|"),
            error: String::new(),
        },
        Err(e) => BatchRow {
            id,
            codes: String::new(),
            error: e.to_string(),
        },
    }
}
