//! Nano ID command utility
//!
//! Prints identifiers, measures generation speed, and checks the symbol
//! distribution of a sample.

use clap::{Args, Parser, Subcommand};
use secure_nanoid::{
    analysis::{CheckError, UniformityCheck},
    config::{CheckConfig, ConfigError, FileConfig, GenerateConfig, SpeedConfig},
    entropy::{Backend, EntropyError, SystemEntropy},
    generator::{Alphabet, GenerateError, Generator},
    metrics::{MetricsError, MetricsRegistry, MetricsSnapshot},
    speed::SpeedTest,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nanoid", version, about = "A tiny, secure, URL-friendly, unique string ID generator")]
struct Cli {
    /// Pin an entropy backend (getentropy, getrandom, arc4random, device, platform)
    #[arg(long, global = true, value_name = "NAME")]
    backend: Option<Backend>,

    /// Read defaults from a TOML file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(flatten)]
    generate: GenerateArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args)]
struct GenerateArgs {
    /// Custom alphabet
    #[arg(short, long)]
    alphabet: Option<String>,

    /// Custom ID length
    #[arg(short, long)]
    length: Option<usize>,
}

#[derive(Subcommand)]
enum Command {
    /// Measure generation speed
    Speed(SpeedArgs),
    /// Chi-square test of the symbol distribution
    Check(CheckArgs),
}

#[derive(Args)]
struct SpeedArgs {
    /// Burn-in iterations (default: count/10)
    #[arg(short, long)]
    burnin: Option<usize>,

    /// Test iterations (default: 1000000)
    #[arg(short, long)]
    count: Option<usize>,

    /// Custom ID length
    #[arg(short, long)]
    length: Option<usize>,

    /// Print Prometheus metrics after the run
    #[arg(long)]
    metrics: bool,
}

#[derive(Args)]
struct CheckArgs {
    /// Identifiers to sample (default: 100000)
    #[arg(short = 'n', long)]
    samples: Option<usize>,

    /// Custom ID length (default: 20)
    #[arg(short, long)]
    length: Option<usize>,

    /// Alphabet under test
    #[arg(short, long)]
    alphabet: Option<String>,

    /// Significance level (default: 0.05)
    #[arg(long)]
    alpha: Option<f64>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Entropy(#[from] EntropyError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Check(#[from] CheckError),
    #[error(transparent)]
    Metrics(#[from] MetricsError),
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries only command output
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` when set and valid, otherwise `warn`.
fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let file = match &cli.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };

    let source = match cli.backend.or(file.generate.backend) {
        Some(backend) => SystemEntropy::with_backend(backend)?,
        None => SystemEntropy::new(),
    };
    debug!(backend = %source.backend(), "Entropy source selected");
    let generator = Generator::with_source(source);

    match cli.command {
        None => cmd_generate(&generator, cli.generate, file.generate),
        Some(Command::Speed(args)) => cmd_speed(&generator, args, file.speed),
        Some(Command::Check(args)) => cmd_check(&generator, args, file.check),
    }
}

fn cmd_generate(
    generator: &Generator,
    args: GenerateArgs,
    mut config: GenerateConfig,
) -> Result<ExitCode, CliError> {
    if let Some(alphabet) = args.alphabet {
        config.alphabet = Some(alphabet);
    }
    if let Some(length) = args.length {
        config.length = length;
    }
    config.validate()?;

    // Byte alphabets may produce non-UTF-8 ids; write them unchanged
    let mut id = generator.generate_bytes(config.length, config.alphabet_bytes())?;
    id.push(b'\n');
    io::stdout().lock().write_all(&id)?;
    Ok(ExitCode::SUCCESS)
}

fn cmd_speed(
    generator: &Generator,
    args: SpeedArgs,
    mut config: SpeedConfig,
) -> Result<ExitCode, CliError> {
    if let Some(count) = args.count {
        config.count = count;
    }
    if args.burnin.is_some() {
        config.burnin = args.burnin;
    }
    if let Some(length) = args.length {
        config.length = length;
    }
    config.validate()?;

    let registry = if args.metrics {
        Some(MetricsRegistry::new()?)
    } else {
        None
    };

    let test = SpeedTest::from(&config);
    info!(count = test.count, burnin = test.burnin, length = test.length, "Starting speed test");

    println!("Burning in ... (n={})", test.burnin);
    let result = test.burn_in(generator).and_then(|()| {
        println!("Running speed test ... (n={})", test.count);
        test.measure(generator)
    });
    let report = match result {
        Ok(report) => report,
        Err(e) => {
            if let Some(registry) = &registry {
                registry.record_failure();
                print!("{}", registry.encode()?);
            }
            return Err(e.into());
        }
    };
    println!("Speed: {} ns/id", report.nanos_per_id());

    if let Some(registry) = registry {
        registry.update(&MetricsSnapshot::from_speed(&report));
        print!("{}", registry.encode()?);
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_check(
    generator: &Generator,
    args: CheckArgs,
    mut config: CheckConfig,
) -> Result<ExitCode, CliError> {
    if let Some(samples) = args.samples {
        config.samples = samples;
    }
    if let Some(length) = args.length {
        config.length = length;
    }
    if let Some(alphabet) = args.alphabet {
        config.alphabet = Some(alphabet);
    }
    if let Some(alpha) = args.alpha {
        config.alpha = alpha;
    }
    config.validate()?;

    let alphabet = Alphabet::resolve(config.alphabet_bytes()).map_err(ConfigError::from)?;
    let check = UniformityCheck {
        samples: config.samples,
        length: config.length,
        alpha: config.alpha,
    };
    let report = check.run(generator, &alphabet)?;
    let result = report.chi_square;

    println!("Sample: size={}, len={}", report.samples, report.length);
    println!(
        "dof={}, expectation={:.3}",
        result.degrees_of_freedom, result.expected
    );
    println!("chisq={:.6}, p-value={:.4}", result.statistic, result.p_value);

    if report.is_uniform() {
        println!("Distribution is uniform (alpha={:.4}).", report.alpha);
        Ok(ExitCode::SUCCESS)
    } else {
        println!("Distribution is NOT uniform (alpha={:.4})!", report.alpha);
        Ok(ExitCode::FAILURE)
    }
}
