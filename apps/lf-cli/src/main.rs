use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use lf_app::{
    AppResult, PlotFormat, RunConfig, compare_methods, default_curve, load_config, plot_curve,
    plot_trajectory, run_lorenz,
};
use lf_sim::IntegratorType;

#[derive(Parser)]
#[command(name = "lf-cli")]
#[command(about = "lorenzflow CLI - Lorenz trajectory generation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Integrate the Lorenz system and export the trajectory
    Run {
        /// Path to a YAML run configuration (defaults when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Integrator override
        #[arg(short, long, value_enum)]
        method: Option<Method>,
        /// Export format
        #[arg(short, long, value_enum, default_value_t = Format::Csv)]
        format: Format,
        /// Output file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compare an integrator against adaptive RK45 on the same grid
    Compare {
        /// Path to a YAML run configuration (defaults when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Integrator to compare against RK45
        #[arg(short, long, value_enum, default_value_t = Method::Euler)]
        method: Method,
    },
    /// Export the y = 2 sin(x) cos(x) curve
    Curve {
        /// Export format
        #[arg(short, long, value_enum, default_value_t = Format::Csv)]
        format: Format,
        /// Output file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the default run configuration as YAML
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum Method {
    Rk45,
    Euler,
    Rk4,
}

impl From<Method> for IntegratorType {
    fn from(m: Method) -> Self {
        match m {
            Method::Rk45 => IntegratorType::Rk45,
            Method::Euler => IntegratorType::Euler,
            Method::Rk4 => IntegratorType::Rk4,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

impl From<Format> for PlotFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Csv => PlotFormat::Csv,
            Format::Json => PlotFormat::Json,
        }
    }
}

fn main() -> AppResult<()> {
    // Logs go to stderr so exported series on stdout stay clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            method,
            format,
            output,
        } => cmd_run(config.as_deref(), method, format, output.as_deref()),
        Commands::Compare { config, method } => cmd_compare(config.as_deref(), method),
        Commands::Curve { format, output } => cmd_curve(format, output.as_deref()),
        Commands::Config => cmd_config(),
    }
}

fn resolve_config(path: Option<&Path>) -> AppResult<RunConfig> {
    match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading run configuration");
            load_config(path)
        }
        None => Ok(RunConfig::default()),
    }
}

fn open_output(output: Option<&Path>) -> AppResult<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn cmd_run(
    config_path: Option<&Path>,
    method: Option<Method>,
    format: Format,
    output: Option<&Path>,
) -> AppResult<()> {
    let mut config = resolve_config(config_path)?;
    if let Some(method) = method {
        config.method = method.into();
    }

    let response = run_lorenz(&config)?;
    let stats = response.trajectory.stats;
    eprintln!(
        "✓ {} samples with {} in {:.3}s ({} rhs calls, {} accepted, {} rejected)",
        response.trajectory.len(),
        response.method,
        response.elapsed_s,
        stats.rhs_calls,
        stats.accepted_steps,
        stats.rejected_steps
    );

    let mut sink = PlotFormat::from(format).sink(open_output(output)?);
    plot_trajectory(sink.as_mut(), &response.title(), &response.trajectory)?;

    if let Some(path) = output {
        eprintln!("✓ Exported trajectory to {}", path.display());
    }
    Ok(())
}

fn cmd_compare(config_path: Option<&Path>, method: Method) -> AppResult<()> {
    let config = resolve_config(config_path)?;
    let cmp = compare_methods(&config, IntegratorType::Rk45, method.into())?;

    println!(
        "Comparing {} against {} over {} samples",
        cmp.candidate.method,
        cmp.reference.method,
        cmp.reference.trajectory.len()
    );
    for run in [&cmp.reference, &cmp.candidate] {
        let stats = run.trajectory.stats;
        println!(
            "  {:<6} {:>9} rhs calls  {:>8} steps  {:>6} rejected  {:.3}s",
            run.method.to_string(),
            stats.rhs_calls,
            stats.accepted_steps,
            stats.rejected_steps,
            run.elapsed_s
        );
    }
    println!("  initial deviation: {:e}", cmp.initial_deviation);
    println!("  max deviation:     {:e}", cmp.max_deviation);
    Ok(())
}

fn cmd_curve(format: Format, output: Option<&Path>) -> AppResult<()> {
    let curve = default_curve()?;
    let mut sink = PlotFormat::from(format).sink(open_output(output)?);
    plot_curve(sink.as_mut(), "y = 2 sin(x) cos(x)", &curve)?;

    if let Some(path) = output {
        eprintln!("✓ Exported {} points to {}", curve.x.len(), path.display());
    }
    Ok(())
}

fn cmd_config() -> AppResult<()> {
    print!("{}", RunConfig::default().to_yaml()?);
    Ok(())
}
