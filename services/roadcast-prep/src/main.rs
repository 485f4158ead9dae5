//! roadcast-prep
//!
//! Validates station configurations, writes the station document the
//! road-weather model reads, and summarizes the roadcasts it writes.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use metro_protocol::parse_roadcast;
use road_common::parse_instant;
use roadcast_prep::{load_station_file, station_document, summarize_roadcast};

#[derive(Parser, Debug)]
#[command(name = "roadcast-prep")]
#[command(about = "Prepare road-weather model inputs and read its roadcasts")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level, used when RUST_LOG is unset
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check a station configuration and report every problem found
    Validate {
        /// Station configuration file
        #[arg(short, long, env = "ROADCAST_CONFIG")]
        config: PathBuf,
    },

    /// Write the station description document
    Station {
        /// Station configuration file
        #[arg(short, long, env = "ROADCAST_CONFIG")]
        config: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Production instant written into the header (default: now)
        #[arg(long, value_parser = parse_production)]
        production: Option<DateTime<Utc>>,
    },

    /// Parse a roadcast document and print a JSON summary
    Roadcast {
        /// Roadcast XML file
        #[arg(short, long)]
        input: PathBuf,

        /// Pretty-print the summary
        #[arg(long)]
        pretty: bool,
    },

    /// Extract the station's forecast inputs from NetCDF grids
    #[cfg(feature = "netcdf")]
    Extract {
        /// Station configuration file
        #[arg(short, long, env = "ROADCAST_CONFIG")]
        config: PathBuf,

        /// Dataset for a source id, as `source_id=path` (repeatable)
        #[arg(short, long = "dataset", value_parser = parse_dataset_arg, required = true)]
        datasets: Vec<(String, PathBuf)>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Production instant written into the header (default: now)
        #[arg(long, value_parser = parse_production)]
        production: Option<DateTime<Utc>>,
    },
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.json_logs);

    match args.command {
        Command::Validate { config } => {
            let station = load_station_file(&config)?.activate()?;
            info!(
                station = %station.id,
                observation_tags = station.observation.len(),
                forecast_tags = station.forecast.len(),
                "Configuration is valid"
            );
        }
        Command::Station {
            config,
            output,
            production,
        } => {
            let station = load_station_file(&config)?.activate()?;
            let document = station_document(&station, production.unwrap_or_else(Utc::now))?;
            write_output(output.as_deref(), &document.to_xml())?;
        }
        Command::Roadcast { input, pretty } => {
            let xml = fs::read_to_string(&input)
                .with_context(|| format!("Failed to read roadcast from {:?}", input))?;
            let document = parse_roadcast(&xml)
                .with_context(|| format!("Failed to parse roadcast {:?}", input))?;
            let summary = summarize_roadcast(&document);
            let json = if pretty {
                serde_json::to_string_pretty(&summary)?
            } else {
                serde_json::to_string(&summary)?
            };
            println!("{}", json);
        }
        #[cfg(feature = "netcdf")]
        Command::Extract {
            config,
            datasets,
            output,
            production,
        } => {
            let station = load_station_file(&config)?.activate()?;
            let mut opened = std::collections::BTreeMap::new();
            for (source_id, path) in datasets {
                let dataset = grid_extract::NetcdfDataset::open(&path)
                    .with_context(|| format!("Failed to open dataset {:?}", path))?;
                opened.insert(source_id, dataset);
            }
            let inputs = roadcast_prep::forecast_document(
                &station,
                &opened,
                production.unwrap_or_else(Utc::now),
            )?;
            write_output(output.as_deref(), &inputs.document.to_xml())?;
        }
    }

    Ok(())
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries the documents
    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;
            info!(path = %path.display(), bytes = content.len(), "Document written");
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn parse_production(text: &str) -> Result<DateTime<Utc>, String> {
    parse_instant(text).ok_or_else(|| format!("not an ISO-8601 instant: '{}'", text))
}

#[cfg(feature = "netcdf")]
fn parse_dataset_arg(text: &str) -> Result<(String, PathBuf), String> {
    let (source_id, path) = text
        .split_once('=')
        .ok_or_else(|| format!("expected source_id=path, got '{}'", text))?;
    if source_id.is_empty() || path.is_empty() {
        return Err(format!("expected source_id=path, got '{}'", text));
    }
    Ok((source_id.to_string(), PathBuf::from(path)))
}
