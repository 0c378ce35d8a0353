use std::io::{Read, Write};
use std::path::PathBuf;
use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{bail, eyre, WrapErr};
use tracing::{debug, error};
use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use shipping_helper::packaging::profile::{ProfileRegistry, DEFAULT_PROFILE};
use shipping_helper::record::{write_csv, AddressRecord, BoxRecord, LB_HEADER};
use shipping_helper::utils::blank_line_blocks;
use shipping_helper::{split_weight, AddressParser};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Csv,
}

#[derive(Parser)]
#[command(name = "shipping-helper", version)]
#[command(about = "Split shipment weights into boxes and addresses into fields")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a shipment weight (kg) into standard boxes
    Split {
        /// Total shipment weight in kg
        weight: f64,

        /// Packaging profile name (see `profiles`)
        #[arg(long, short = 'p', conflicts_with = "boxes")]
        profile: Option<String>,

        /// Explicit box capacities, e.g. `12,6,2`
        #[arg(long, short = 'b', value_delimiter = ',')]
        boxes: Option<Vec<f64>>,

        #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Split an address into name, street, city, state, ZIP and country
    Address {
        /// File to read; stdin when omitted
        file: Option<PathBuf>,

        /// Treat blank-line-separated blocks as separate addresses
        #[arg(long)]
        batch: bool,

        /// Extra country name to recognise (repeatable)
        #[arg(long = "country")]
        countries: Vec<String>,

        #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// List packaging profiles
    Profiles,
}

fn main() {
    install_tracing();
    let cli = Cli::parse();

    if let Err(e) = color_eyre::install().and_then(|_| run(cli)) {
        error!("Error: {:?}", e);
        std::process::exit(1);
    }
}

fn install_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(ErrorLayer::default())
        .init();
}

fn run(cli: Cli) -> color_eyre::Result<()> {
    match cli.command {
        Commands::Split { weight, profile, boxes, format } => split(weight, profile, boxes, format),
        Commands::Address { file, batch, countries, format } => address(file, batch, countries, format),
        Commands::Profiles => profiles(),
    }
}

fn split(weight: f64, profile: Option<String>, boxes: Option<Vec<f64>>, format: OutputFormat) -> color_eyre::Result<()> {
    let capacities = match boxes {
        Some(boxes) => boxes,
        None => {
            let registry = ProfileRegistry::from_env()?;
            let name = profile.as_deref().unwrap_or(DEFAULT_PROFILE);
            registry.get(name)
                .ok_or_else(|| eyre!("unknown packaging profile [{}]", name))?
                .capacities()
                .to_vec()
        }
    };
    debug!("splitting {} kg over {:?}", weight, capacities);
    let allocation = split_weight(weight, &capacities)?;
    let rows = allocation.rows();

    let stdout = std::io::stdout();
    match format {
        OutputFormat::Csv => write_csv(&rows, stdout.lock())?,
        OutputFormat::Table => print_box_table(&rows, allocation.total(), stdout.lock())?,
    }
    Ok(())
}

fn print_box_table(rows: &[BoxRecord], total: f64, mut out: impl Write) -> std::io::Result<()> {
    writeln!(out, "{:>5}  {:>8}  {:>12}", "Box #", "Kg", LB_HEADER)?;
    for row in rows {
        writeln!(out, "{:>5}  {:>8.2}  {:>12}", row.number, row.kg, row.lb)?;
    }
    writeln!(out, "{:>5}  {:>8.2}", "Total", total)
}

fn address(file: Option<PathBuf>, batch: bool, countries: Vec<String>, format: OutputFormat) -> color_eyre::Result<()> {
    let text = match &file {
        Some(path) => std::fs::read_to_string(path)
            .wrap_err_with(|| format!("cannot read [{}]", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text).wrap_err("cannot read stdin")?;
            text
        }
    };
    if text.trim().is_empty() {
        bail!("no address given");
    }

    let parser = if countries.is_empty() {
        AddressParser::new()
    } else {
        AddressParser::with_extra_countries(&countries)?
    };
    let blocks = if batch { blank_line_blocks(&text) } else { vec![text] };
    let records = blocks.iter()
        .map(|block| AddressRecord::from(parser.parse(block)))
        .collect::<Vec<_>>();
    debug!("parsed {} address(es)", records.len());

    let stdout = std::io::stdout();
    match format {
        OutputFormat::Csv => write_csv(&records, stdout.lock())?,
        OutputFormat::Table => print_address_table(&records, stdout.lock())?,
    }
    Ok(())
}

fn print_address_table(records: &[AddressRecord], mut out: impl Write) -> std::io::Result<()> {
    for (idx, record) in records.iter().enumerate() {
        if idx > 0 {
            writeln!(out)?;
        }
        for (label, value) in record.labelled() {
            writeln!(out, "{:<15} {}", label, value)?;
        }
    }
    Ok(())
}

fn profiles() -> color_eyre::Result<()> {
    let registry = ProfileRegistry::from_env()?;
    let mut out = std::io::stdout().lock();
    for profile in registry.profiles() {
        let capacities = profile.capacities().iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(out, "{:<15} {}", profile.name(), capacities)?;
    }
    Ok(())
}
