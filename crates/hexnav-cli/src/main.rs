mod cli;
mod commands;
mod error;
mod job;

use clap::Parser;
use cli::{Cli, Commands};

fn init_tracing(cli: &Cli) {
    // Logging policy:
    //   --quiet   -> nothing
    //   --verbose -> RUST_LOG if set, otherwise info
    //   default   -> RUST_LOG if set, otherwise warnings only
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), error::CliError> {
    match cli.command {
        Commands::Project {
            input,
            output,
            resolution,
            nodata,
            drop_nonpositive,
        } => commands::project(&input, &output, resolution, nodata, drop_nonpositive),

        Commands::Rescale {
            input,
            output,
            levels,
            to_res,
            engine,
        } => commands::rescale(&input, &output, levels, to_res, engine),

        Commands::Geometry { input, output } => commands::geometry(&input, &output),

        Commands::Window {
            lat,
            lon,
            size,
            reference,
            all,
            output,
        } => commands::window(lat, lon, size, &reference, all, output.as_deref()),

        Commands::Run { job } => commands::run_job(&job),
    }
}
