use billsplit::application::ledger::BillLedger;
use billsplit::domain::allocation::{
    AllocationPolicy, Rounding, SplitStrategy, SplitType, allocate_with, custom_discrepancy,
    custom_splits_from,
};
use billsplit::domain::money::Money;
use billsplit::domain::resident::Resident;
use billsplit::error::AllocationError;
use billsplit::infrastructure::in_memory::InMemoryBillStore;
use billsplit::interfaces::csv::allocation_writer::AllocationWriter;
use billsplit::interfaces::csv::resident_reader::ResidentReader;
use billsplit::interfaces::json::bill_request::BillRequest;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file holding the allocation policy (`rounding`, `legacyDefaults`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Rounding rule, overrides the config file
    #[arg(long, global = true, value_enum)]
    rounding: Option<RoundingArg>,

    /// Default missing custom amounts to 0 and missing unit sizes to 1
    #[arg(long, global = true)]
    legacy_defaults: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Split a total across the residents of a roster CSV
    Allocate {
        /// Resident roster CSV file
        residents: PathBuf,

        /// Bill total, in major currency units
        #[arg(long, allow_hyphen_values = true)]
        total: Decimal,

        /// Split strategy: equal, custom or size-based (alias sqft)
        #[arg(long, default_value = "equal")]
        split: String,

        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,
    },
    /// Compare the roster's custom amounts against a total
    Discrepancy {
        /// Resident roster CSV file
        residents: PathBuf,

        #[arg(long, allow_hyphen_values = true)]
        total: Decimal,
    },
    /// Create a bill from a JSON request and print it
    Bill {
        /// Bill request JSON file
        request: PathBuf,

        /// Resident roster CSV file
        residents: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum RoundingArg {
    Independent,
    LargestRemainder,
}

impl From<RoundingArg> for Rounding {
    fn from(arg: RoundingArg) -> Self {
        match arg {
            RoundingArg::Independent => Rounding::Independent,
            RoundingArg::LargestRemainder => Rounding::LargestRemainder,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

fn load_policy(cli: &Cli) -> Result<AllocationPolicy> {
    let mut policy = match &cli.config {
        Some(path) => {
            let file = File::open(path).into_diagnostic()?;
            serde_json::from_reader(file).into_diagnostic()?
        }
        None => AllocationPolicy::default(),
    };
    if let Some(rounding) = cli.rounding {
        policy.rounding = rounding.into();
    }
    if cli.legacy_defaults {
        policy.legacy_defaults = true;
    }
    Ok(policy)
}

fn read_residents(path: &Path) -> Result<Vec<Resident>> {
    let file = File::open(path).into_diagnostic()?;
    ResidentReader::new(file).read_all().into_diagnostic()
}

fn strategy_for(split: &str, residents: &[Resident]) -> Result<SplitStrategy> {
    let strategy = match split.parse::<SplitType>().into_diagnostic()? {
        SplitType::Equal => SplitStrategy::Equal,
        SplitType::SizeBased => SplitStrategy::SizeBased,
        SplitType::Custom => SplitStrategy::custom_from_residents(residents).into_diagnostic()?,
    };
    Ok(strategy)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let policy = load_policy(&cli)?;

    match cli.command {
        Command::Allocate {
            residents,
            total,
            split,
            format,
        } => {
            let residents = read_residents(&residents)?;
            let total = Money::from_decimal(total).into_diagnostic()?;
            let strategy = strategy_for(&split, &residents)?;

            if let SplitStrategy::Custom(splits) = &strategy {
                let discrepancy = custom_discrepancy(total, splits).into_diagnostic()?;
                if discrepancy != Money::ZERO {
                    tracing::warn!(%total, %discrepancy, "custom amounts do not add up to the total");
                }
            }

            let allocations =
                allocate_with(total, &residents, &strategy, &policy).into_diagnostic()?;

            let stdout = io::stdout();
            match format {
                Format::Csv => AllocationWriter::new(stdout.lock())
                    .write_allocations(&allocations)
                    .into_diagnostic()?,
                Format::Json => {
                    serde_json::to_writer_pretty(stdout.lock(), &allocations).into_diagnostic()?;
                    println!();
                }
            }
        }
        Command::Discrepancy { residents, total } => {
            let residents = read_residents(&residents)?;
            let total = Money::from_decimal(total).into_diagnostic()?;
            let splits = custom_splits_from(&residents).into_diagnostic()?;
            let discrepancy = custom_discrepancy(total, &splits).into_diagnostic()?;
            let custom_sum = total
                .checked_add(discrepancy)
                .ok_or(AllocationError::AmountOverflow)
                .into_diagnostic()?;
            let missing = residents.len() - splits.len();

            println!("total,custom_sum,discrepancy,residents_without_amount");
            println!("{},{},{},{}", total, custom_sum, discrepancy, missing);
        }
        Command::Bill { request, residents } => {
            let residents = read_residents(&residents)?;
            let request = BillRequest::from_reader(File::open(request).into_diagnostic()?)
                .into_diagnostic()?;
            let new_bill = request.into_new_bill(&residents).into_diagnostic()?;

            let ledger = BillLedger::new(Box::new(InMemoryBillStore::new()), policy);
            let bill = ledger
                .create_bill(new_bill, &residents, Utc::now())
                .await
                .into_diagnostic()?;

            serde_json::to_writer_pretty(io::stdout().lock(), &bill).into_diagnostic()?;
            println!();
        }
    }

    Ok(())
}
