#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shiftguard::{
    config::{load_config_from_file, load_rules_from_file, Month, RiskThresholds},
    engine::Engine,
    holiday::{FixedHolidays, HolidayCalendar, NoHolidays},
    io,
    report::{log_summary, render_summary},
    storage::{JsonStorage, Storage},
};
use std::path::PathBuf;
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// Shift planner with labor-risk warnings (no database).
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Enable logs (RUST_LOG controls the filter)
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a month's schedule and evaluate labor risk
    Run {
        /// Staff roster CSV
        #[arg(long)]
        staff: PathBuf,
        /// Run configuration JSON
        #[arg(long)]
        config: PathBuf,
        /// Risk rules JSON (defaults compiled in when omitted)
        #[arg(long)]
        rules: Option<PathBuf>,
        /// Holiday dates JSON array (no holidays when omitted)
        #[arg(long)]
        holidays: Option<PathBuf>,
        /// Schedule CSV output
        #[arg(long)]
        out_schedule: Option<PathBuf>,
        /// Warnings CSV output
        #[arg(long)]
        out_warnings: Option<PathBuf>,
        /// Full outcome JSON output (atomic write)
        #[arg(long)]
        out_json: Option<PathBuf>,
    },

    /// Write sample staff.csv and config.json into a directory
    Sample {
        #[arg(long, default_value = "sample")]
        dir: PathBuf,
        /// Target month, YYYY-MM
        #[arg(long, default_value = "2026-02")]
        month: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let code = match cli.cmd {
        Commands::Run {
            staff,
            config,
            rules,
            holidays,
            out_schedule,
            out_warnings,
            out_json,
        } => {
            let roster = io::import_staff_csv(&staff)
                .with_context(|| format!("loading staff {}", staff.display()))?;
            let config = load_config_from_file(&config)?;
            let rules = match rules {
                Some(path) => load_rules_from_file(path)?,
                None => RiskThresholds::default(),
            };
            let calendar: Box<dyn HolidayCalendar> = match holidays {
                Some(path) => Box::new(FixedHolidays::load_from_file(path)?),
                None => Box::new(NoHolidays),
            };

            let engine = Engine::new(&config, &rules, calendar.as_ref());
            let outcome = engine.run(&roster);

            if let Some(path) = out_schedule {
                io::export_schedule_csv(path, &outcome)?;
            }
            if let Some(path) = out_warnings {
                io::export_warnings_csv(path, &outcome)?;
            }
            if let Some(path) = out_json {
                JsonStorage::open(path)?.save(&outcome)?;
            }

            log_summary(&outcome);
            print!("{}", render_summary(&outcome));

            // Exit 2 = completed with critical warnings
            if outcome.has_red() {
                2
            } else {
                0
            }
        }
        Commands::Sample { dir, month } => {
            let month: Month = month.parse()?;
            shiftguard::sample::write_sample_inputs(&dir, month)?;
            println!("sample inputs written to {}", dir.display());
            println!("next: shiftguard-cli run --staff {0}/staff.csv --config {0}/config.json", dir.display());
            0
        }
    };

    std::process::exit(code);
}
