use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::Rng;

use oddeven::output;
use oddeven::{
    Cluster, FileSource, InputFormat, PhaseCount, Rank, SortConfig, TransportKind, Value,
    ValueSource,
};

/// Odd-even transposition sort over cooperating processes
#[derive(Parser)]
#[command(name = "oddeven", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sort the values in an input file
    Run(RunArgs),
    /// Write a file of random input values
    Generate(GenerateArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Number of processes; defaults to the number of input values
    #[arg(short = 'n', long = "np", env = "OETS_NP")]
    np: Option<usize>,

    /// Input file
    #[arg(long, default_value = "numbers")]
    input: PathBuf,

    /// Input encoding
    #[arg(long, default_value_t = InputFormat::Decimal)]
    format: InputFormat,

    /// Phases to run: ceil, floor, or an exact count
    #[arg(long, default_value_t = PhaseCount::Ceil)]
    phases: PhaseCount,

    #[arg(long, value_enum, default_value_t = TransportArg::Memory)]
    transport: TransportArg,

    /// First listen port for the tcp transport (0 picks free ports)
    #[arg(long, default_value_t = 0)]
    base_port: u16,

    /// Rank that scatters the input and prints the result
    #[arg(long, default_value_t = 0)]
    observer: usize,

    /// Per-link buffer for the memory transport
    #[arg(long, default_value_t = 16)]
    capacity: usize,

    /// Print the loaded input before sorting
    #[arg(long)]
    echo_input: bool,

    /// Print the outcome, with every exchange, as JSON to stderr
    #[arg(long)]
    trace: bool,
}

#[derive(Args)]
struct GenerateArgs {
    /// Number of values
    #[arg(long)]
    count: usize,

    /// Output file
    #[arg(long, default_value = "numbers")]
    output: PathBuf,

    #[arg(long, default_value_t = InputFormat::Decimal)]
    format: InputFormat,

    /// Largest value to generate (inclusive)
    #[arg(long, default_value_t = 255)]
    max: Value,
}

#[derive(Clone, Copy, ValueEnum)]
enum TransportArg {
    Memory,
    Tcp,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Command::Run(args) => run(args).await,
        Command::Generate(args) => generate(args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: RunArgs) -> Result<()> {
    let source = FileSource::new(&args.input, args.format);
    let values = source
        .load()
        .await
        .with_context(|| format!("reading {}", source.describe()))?;

    if args.echo_input {
        output::write_input_line(&values, io::stdout().lock())?;
    }

    let transport = match args.transport {
        TransportArg::Memory => TransportKind::Memory,
        TransportArg::Tcp => TransportKind::Tcp {
            base_port: args.base_port,
        },
    };
    let config = SortConfig {
        phase_count: args.phases,
        observer: Rank(args.observer),
        channel_capacity: args.capacity,
        transport,
        ..SortConfig::default()
    };

    let size = args.np.unwrap_or(values.len());
    let outcome = Cluster::new(config)
        .run_with_size(size, &values)
        .await
        .context("sort failed")?;

    output::write_report(&outcome, io::stdout().lock())?;
    if args.trace {
        output::write_trace_json(&outcome, io::stderr().lock())?;
    }
    Ok(())
}

async fn generate(args: GenerateArgs) -> Result<()> {
    if args.format == InputFormat::Bytes && !(0..=255).contains(&args.max) {
        anyhow::bail!("--max must be within 0..=255 for the bytes format");
    }
    if args.max < 0 {
        anyhow::bail!("--max must not be negative");
    }

    let mut rng = rand::thread_rng();
    let values: Vec<Value> = (0..args.count).map(|_| rng.gen_range(0..=args.max)).collect();

    oddeven::source::write_values(&args.output, args.format, &values)
        .await
        .with_context(|| format!("writing {}", args.output.display()))?;
    tracing::info!(count = values.len(), path = %args.output.display(), "wrote input");
    Ok(())
}
