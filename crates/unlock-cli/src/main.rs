//! `unlock-schedule` CLI: turn a week of calendar events into a door
//! controller's weekly unlock template.
//!
//! ## Usage
//!
//! ```sh
//! # Events JSON on stdin, controller CSV on stdout
//! unlock-schedule generate < events.json
//!
//! # Week starting on a given date, padded, written to a file
//! unlock-schedule --pad-before 15 --pad-after 10 generate \
//!     -i events.json --start-date 2026-01-04 -o unlock.csv
//!
//! # Always use the optimizer and emit JSON
//! unlock-schedule --optimize generate -i events.json --format json
//!
//! # Check an existing table against the events it was built from
//! unlock-schedule verify --rows unlock.csv -i events.json --start-date 2026-01-04
//! ```
//!
//! Every global option can also be set through its `HMS_UNLOCK_*`
//! environment variable. Logs go to stderr and are filtered by `RUST_LOG`.

mod csv;

use std::io::{self, Read};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use unlock_engine::week::{parse_timezone, week_window_starting_sunday};
use unlock_engine::{
    build_required_grid, events_to_intervals, generate, parse_events, prepare_intervals, verify,
    week_window_from_date, Builder, DayNames, GenerateOptions, Strategy, WeekWindow,
    WeeklyTemplate,
};

#[derive(Parser)]
#[command(
    name = "unlock-schedule",
    version,
    about = "Compile calendar events into a door controller's weekly unlock template"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    settings: Settings,
}

#[derive(Args)]
struct Settings {
    /// IANA timezone the controller runs in
    #[arg(long, global = true, env = "HMS_UNLOCK_TZ", default_value = "America/New_York")]
    tz: String,

    /// Minutes to unlock before each event
    #[arg(long, global = true, env = "HMS_UNLOCK_PAD_BEFORE_MIN", default_value_t = 0)]
    pad_before: u32,

    /// Minutes to stay unlocked after each event
    #[arg(long, global = true, env = "HMS_UNLOCK_PAD_AFTER_MIN", default_value_t = 0)]
    pad_after: u32,

    /// Always use the optimizer instead of one rule per window
    #[arg(
        long,
        global = true,
        env = "HMS_UNLOCK_OPTIMIZE",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    optimize: bool,

    /// Rule slots available on the controller
    #[arg(long, global = true, env = "HMS_UNLOCK_MAX_INTERVALS", default_value_t = 8)]
    max_intervals: usize,

    /// Comma-separated day column names, Sunday first
    #[arg(long, global = true, value_delimiter = ',')]
    day_names: Option<Vec<String>>,

    /// Keep intervals that only touch as separate windows
    #[arg(long, global = true)]
    no_merge_touching: bool,
}

#[derive(Args)]
struct WeekArgs {
    /// First day of the 7-day window (defaults to today in --tz)
    #[arg(long, conflicts_with = "next_sunday")]
    start_date: Option<NaiveDate>,

    /// Start the window at the next Sunday midnight (today if it is Sunday)
    #[arg(long)]
    next_sunday: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the weekly template from events JSON
    Generate {
        /// Events JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long, env = "HMS_UNLOCK_OUTPUT_CSV")]
        output: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,
        #[command(flatten)]
        week: WeekArgs,
    },
    /// Check a template CSV against the events it should reproduce
    Verify {
        /// Template CSV to check
        #[arg(long)]
        rows: String,
        /// Events JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        #[command(flatten)]
        week: WeekArgs,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let tz = parse_timezone(&cli.settings.tz)?;
    let options = cli.settings.options()?;

    match cli.command {
        Commands::Generate {
            input,
            output,
            format,
            week,
        } => {
            let events = parse_events(&read_input(input.as_deref())?)
                .context("Failed to parse events JSON")?;
            let window = week.window(&tz);
            debug!(start = %window.start, end = %window.end, events = events.len(), "generating");

            let template = generate(&events, &tz, Some(&window), &options)
                .context("Failed to build unlock template")?;
            print_summary(&template, &options);

            let rendered = match format {
                Format::Csv => csv::write_rows(&template.rows, &options.day_names),
                Format::Json => {
                    let records: Vec<_> = template
                        .rows
                        .iter()
                        .map(|row| row.to_record(&options.day_names))
                        .collect();
                    let mut json = serde_json::to_string_pretty(&records)?;
                    json.push('\n');
                    json
                }
            };
            write_output(output.as_deref(), &rendered)?;
        }
        Commands::Verify { rows, input, week } => {
            let text = std::fs::read_to_string(&rows)
                .with_context(|| format!("Failed to read file: {}", rows))?;
            let table = csv::read_rows(&text, &options.day_names)
                .with_context(|| format!("Failed to parse template CSV: {}", rows))?;
            if table.len() != options.max_intervals {
                anyhow::bail!(
                    "Template {} has {} rows, but the controller holds exactly {}",
                    rows,
                    table.len(),
                    options.max_intervals
                );
            }

            let events = parse_events(&read_input(input.as_deref())?)
                .context("Failed to parse events JSON")?;
            let window = week.window(&tz);
            let intervals = events_to_intervals(&events, &tz, Some(&window))?;
            let required = build_required_grid(&prepare_intervals(&intervals, &options, Some(&window)));

            verify(&table, &required).context("Template does not match the events")?;
            println!(
                "OK: {} rows reproduce {} unlocked minutes",
                table.iter().filter(|r| !r.is_unused()).count(),
                required.count()
            );
        }
    }

    Ok(())
}

impl Settings {
    fn options(&self) -> Result<GenerateOptions> {
        let day_names = match &self.day_names {
            Some(names) => DayNames::new(names.iter().map(|n| n.trim().to_string()))
                .context("Invalid --day-names")?,
            None => DayNames::default(),
        };
        Ok(GenerateOptions {
            pad_before_min: self.pad_before,
            pad_after_min: self.pad_after,
            strategy: if self.optimize {
                Strategy::Optimize
            } else {
                Strategy::Naive
            },
            max_intervals: self.max_intervals,
            day_names,
            merge_touching: !self.no_merge_touching,
        })
    }
}

impl WeekArgs {
    fn window(&self, tz: &Tz) -> WeekWindow {
        let now = Utc::now().with_timezone(tz);
        if self.next_sunday {
            return week_window_starting_sunday(now);
        }
        let start = self.start_date.unwrap_or_else(|| now.date_naive());
        week_window_from_date(start, tz)
    }
}

/// One line per used row on stderr, so stdout stays machine-readable.
fn print_summary(template: &WeeklyTemplate, options: &GenerateOptions) {
    let builder = match template.builder {
        Builder::Naive => "naive",
        Builder::Optimized => "optimized",
    };
    eprintln!(
        "{} of {} rows used ({} builder)",
        template.used_rows().count(),
        template.rows.len(),
        builder
    );
    for row in template.used_rows() {
        eprintln!(
            "  {:>2}  {}-{}  {}",
            row.index,
            row.start_hhmm(),
            row.end_hhmm(),
            options.day_names.render(row.days)
        );
    }
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
