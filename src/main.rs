use anyhow::Result;
use clap::{Parser, Subcommand};
use proto_compat::{Compatibility, ComparerConfig, ContractComparer, SchemaSource};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "proto-compat")]
#[command(about = "Check consumer/producer compatibility between two .proto files")]
#[command(version)]
struct Args {
    #[arg(long, global = true, help = "YAML configuration file")]
    config: Option<PathBuf>,
    #[arg(
        long = "import-root",
        global = true,
        help = "Directory searched for imports (repeatable)"
    )]
    import_roots: Vec<PathBuf>,
    #[arg(long, global = true, help = "Output format", value_enum, default_value = "text")]
    format: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Compare a message type")]
    Message(NamedComparison),
    #[command(about = "Compare an enum type")]
    Enum(NamedComparison),
    #[command(about = "Compare a service")]
    Service(NamedComparison),
    #[command(about = "Compare every top-level message, enum and service")]
    Schema {
        #[arg(help = "Path to the consumer's .proto file")]
        consumer_file: PathBuf,
        #[arg(help = "Path to the producer's .proto file")]
        producer_file: PathBuf,
    },
}

#[derive(clap::Args)]
struct NamedComparison {
    #[arg(help = "Path to the consumer's .proto file")]
    consumer_file: PathBuf,
    #[arg(help = "Path to the producer's .proto file")]
    producer_file: PathBuf,
    #[arg(help = "Name to compare, e.g. `Order` or `shop.v1.Order.Line`")]
    name: String,
    #[arg(long, help = "Name on the producer side, when it differs")]
    producer_name: Option<String>,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(serde::Serialize)]
struct Report<'a> {
    consumer: &'a str,
    producer: &'a str,
    result: Compatibility,
    compatible: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ComparerConfig::from_yaml_file(path).map_err(|e| {
            anyhow::anyhow!("Failed to load config '{}': {}", path.display(), e)
        })?,
        None => ComparerConfig::default(),
    };
    config.import_roots.extend(args.import_roots.iter().cloned());

    let (consumer_file, producer_file) = match &args.command {
        Commands::Message(named) | Commands::Enum(named) | Commands::Service(named) => {
            (&named.consumer_file, &named.producer_file)
        }
        Commands::Schema { consumer_file, producer_file } => (consumer_file, producer_file),
    };

    // Import roots from the config and the command line become a
    // directory-backed file system.
    let comparer = ContractComparer::new(
        SchemaSource::from_path(consumer_file)?,
        SchemaSource::from_path(producer_file)?,
    )?
    .with_config(config);

    let (consumer_name, producer_name, result) = match &args.command {
        Commands::Message(named) => {
            let producer_name = named.producer_name.as_deref().unwrap_or(&named.name);
            let result = comparer.compare_message_type(&named.name, producer_name)?;
            (named.name.as_str(), producer_name, result)
        }
        Commands::Enum(named) => {
            let producer_name = named.producer_name.as_deref().unwrap_or(&named.name);
            let result = comparer.compare_enum_type(&named.name, producer_name)?;
            (named.name.as_str(), producer_name, result)
        }
        Commands::Service(named) => {
            let producer_name = named.producer_name.as_deref().unwrap_or(&named.name);
            let result = comparer.compare_service(&named.name, producer_name)?;
            (named.name.as_str(), producer_name, result)
        }
        Commands::Schema { .. } => (
            comparer.consumer().name(),
            comparer.producer().name(),
            comparer.compare_schemas()?,
        ),
    };

    match args.format {
        OutputFormat::Json => {
            let report = Report {
                consumer: consumer_name,
                producer: producer_name,
                result,
                compatible: result.is_compatible(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!("{result}: {}", result.description());
            println!("  consumer: {consumer_name}");
            println!("  producer: {producer_name}");
        }
    }

    if !result.is_compatible() {
        std::process::exit(1);
    }

    Ok(())
}
