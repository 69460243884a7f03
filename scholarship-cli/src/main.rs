use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::debug;

use scholarship_cli::app::{self, OptimizeRequest};
use scholarship_cli::logging;
use scholarship_cli::settings::Settings;
use scholarship_cli::utils::{parse_currency, parse_rate_percent};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Scholarship inclusion optimizer for 1098-T returns.
///
/// Finds how much scholarship to report as taxable income to get the best
/// combined federal and state result after the Lifetime Learning Credit.
#[derive(Debug, Parser)]
#[command(name = "scholarship-optimizer")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Settings file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Tax-year table (TOML); defaults to the built-in 2025 table
    #[arg(long, global = true)]
    tax_table: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `scholarship_core=trace`
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Optimize a single draft return
    Optimize(OptimizeArgs),

    /// Optimize every draft return in a CSV file
    Batch {
        /// Path to the scenario CSV
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[derive(Debug, Args)]
struct OptimizeArgs {
    /// 1098-T Box 1 (tuition / qualified expenses)
    #[arg(long, value_parser = parse_currency)]
    tuition: Decimal,

    /// 1098-T Box 5 (scholarships and grants)
    #[arg(long, value_parser = parse_currency)]
    scholarship: Decimal,

    /// Taxable scholarship currently on the draft (Schedule 1 line 8r)
    #[arg(long, value_parser = parse_currency)]
    current_inclusion: Decimal,

    /// Federal AGI on the draft (Form 1040 line 11)
    #[arg(long, value_parser = parse_currency)]
    agi: Decimal,

    /// State taxable income on the draft; omit or pass 0 when no state return is filed
    #[arg(long, value_parser = parse_currency)]
    state_taxable: Option<Decimal>,

    /// State tax rate in percent (0 to 7)
    #[arg(long, value_parser = parse_rate_percent)]
    state_rate: Option<Decimal>,

    /// Lifetime Learning Credit on the draft (Schedule 3 line 19)
    #[arg(long, value_parser = parse_currency)]
    current_credit: Option<Decimal>,
}

impl From<OptimizeArgs> for OptimizeRequest {
    fn from(args: OptimizeArgs) -> Self {
        Self {
            tuition_paid: args.tuition,
            scholarship_total: args.scholarship,
            current_inclusion: args.current_inclusion,
            federal_agi: args.agi,
            state_taxable_income: args.state_taxable,
            state_tax_rate: args.state_rate,
            reported_credit: args.current_credit,
        }
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref())?;
    let filter = logging::make_filter(cli.log_level.as_deref(), &settings.log_level)?;
    logging::init_logging(filter, settings.log_file.as_deref())?;

    let tax_table = cli.tax_table.as_deref().or(settings.tax_table.as_deref());
    let config = app::load_tax_table(tax_table)?;
    debug!(tax_year = config.tax_year, "tax table ready");

    let output = match cli.command {
        Command::Optimize(args) => app::run_optimize(&config, &settings, &args.into())?,
        Command::Batch { file } => app::run_batch(&config, &settings, &file)?,
    };
    print!("{output}");

    Ok(())
}
