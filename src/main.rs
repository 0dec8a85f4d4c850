//! CLI entry point for the smart bus scheduling tool.
//!
//! Provides subcommands for seeding demo data, comparing the static schedule
//! against the demand-derived one, forecasting ridership, and streaming live
//! bus positions.

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use smart_bus::config::Settings;
use smart_bus::forecast::forecast_next_hours;
use smart_bus::output::{append_rows, print_json, print_pretty};
use smart_bus::positions::{live_positions, simulate_route};
use smart_bus::report::{ScheduleReport, compare_schedules};
use smart_bus::scheduling::ThresholdTable;
use smart_bus::seed::{seed_positions, seed_tickets};
use smart_bus::store::TicketStore;
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "smart_bus")]
#[command(about = "Demand-driven schedule analysis for a city bus network", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the SQLite tables if they do not exist
    Init,
    /// Insert random demo ticket sales and GPS fixes
    Seed {
        /// Number of ticket sales to insert
        #[arg(short, long, default_value_t = 100)]
        tickets: usize,
    },
    /// Compare the static schedule against the demand-derived one
    Compare {
        /// CSV file to append the per-hour comparison to
        #[arg(short, long)]
        output: Option<String>,

        /// Print the report as JSON instead of per-hour lines
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Forecast ridership for the six hours past the observed day
    Forecast {
        /// CSV file to append forecast points to
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Show live bus positions from the configured feed or the simulator
    Positions {
        /// Number of simulated buses when no feed is configured
        #[arg(short, long, default_value_t = 8)]
        buses: usize,

        /// Poll interval in seconds between samples
        #[arg(short = 'r', long, default_value_t = 5)]
        refresh: u64,

        /// Number of samples to collect (0 = infinite)
        #[arg(short = 'n', long, default_value_t = 1)]
        samples: usize,

        /// Walk a single bus step-wise instead, recording fixes to gps_logs
        #[arg(long)]
        bus: Option<String>,

        /// Route label for the single-bus walk
        #[arg(long, default_value = "Route 1")]
        route: String,

        /// Steps in the single-bus walk
        #[arg(long, default_value_t = 10)]
        steps: usize,

        /// Show fixes already recorded in gps_logs and exit
        #[arg(long, default_value_t = false)]
        stored: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/smart_bus.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("smart_bus.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env();

    match cli.command {
        Commands::Init => {
            TicketStore::open(&settings.db_path)?;
            info!(db = %settings.db_path.display(), "Ticket store ready");
        }
        Commands::Seed { tickets } => {
            let store = TicketStore::open(&settings.db_path)?;
            seed_tickets(&store, tickets)?;
            seed_positions(&store, settings.map_center())?;
            info!(total = store.count_tickets()?, "Store seeded");
        }
        Commands::Compare { output, json } => {
            let store = TicketStore::open(&settings.db_path)?;
            let raw = store.fetch_all()?;

            match compare_schedules(raw, &ThresholdTable::DEFAULT) {
                ScheduleReport::NoData => {
                    warn!("No ticket sales data available");
                }
                ScheduleReport::Comparison(comparison) => {
                    if json {
                        print_json(&comparison)?;
                    } else {
                        info!(baseline = "every-15-min", "Static schedule, all routes");
                        print_pretty(&comparison);
                    }
                    if let Some(path) = output {
                        append_rows(&path, &comparison.hours)?;
                        info!(path = %path, "Comparison appended");
                    }
                }
            }
        }
        Commands::Forecast { output } => {
            let points = forecast_next_hours();
            for point in &points {
                info!(
                    hour = point.hour,
                    passengers = point.forecast_passengers,
                    "Forecast"
                );
            }
            if let Some(path) = output {
                append_rows(&path, &points)?;
                info!(path = %path, "Forecast appended");
            }
        }
        Commands::Positions {
            buses,
            refresh,
            samples,
            bus,
            route,
            steps,
            stored,
        } => {
            if stored {
                let store = TicketStore::open(&settings.db_path)?;
                let logs = store.fetch_positions()?;
                info!(count = logs.len(), "Recorded GPS fixes");
                for log in &logs {
                    info!(
                        bus = %log.bus_id,
                        route = %log.route,
                        lat = log.latitude,
                        lon = log.longitude,
                        at = %log.timestamp,
                        "Fix"
                    );
                }
                return Ok(());
            }

            if let Some(bus_id) = bus {
                let store = TicketStore::open(&settings.db_path)?;
                let fixes = simulate_route(&bus_id, &route, steps, settings.map_center()).await;
                for fix in &fixes {
                    store.log_position(
                        &fix.id,
                        &fix.route,
                        Local::now().naive_local(),
                        fix.latitude,
                        fix.longitude,
                    )?;
                    info!(
                        id = %fix.id,
                        route = %fix.route,
                        lat = fix.latitude,
                        lon = fix.longitude,
                        occupancy = fix.occupancy,
                        "Bus"
                    );
                }
                info!(steps = fixes.len(), "Route walk recorded");
                return Ok(());
            }

            if settings.bus_api_url.is_none() {
                info!("No BUS_API_URL configured, running simulated fleet");
            }
            if samples == 0 {
                info!(refresh, "Sampling infinitely. Press Ctrl+C to stop.");
            }

            let mut sample_count = 0;
            loop {
                if samples > 0 && sample_count >= samples {
                    break;
                }
                sample_count += 1;

                let vehicles = live_positions(
                    settings.bus_api_url.as_deref(),
                    settings.map_center(),
                    buses,
                )
                .await;

                info!(sample = sample_count, count = vehicles.len(), "Vehicle positions");
                for vehicle in &vehicles {
                    info!(
                        id = %vehicle.id,
                        route = %vehicle.route,
                        lat = vehicle.latitude,
                        lon = vehicle.longitude,
                        occupancy = vehicle.occupancy,
                        "Bus"
                    );
                }

                if samples == 0 || sample_count < samples {
                    tokio::time::sleep(tokio::time::Duration::from_secs(refresh)).await;
                }
            }
        }
    }

    Ok(())
}
