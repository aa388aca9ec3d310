use clap::Parser;
use flatcat::{Cli, FlatCat, FlatCatError, OutputFormatter};
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    initialize_logging(cli.log_level());

    let app = match FlatCat::from_cli(&cli) {
        Ok(app) => app,
        Err(e) => {
            print_startup_error(&cli, &e);
            return exit_code_for(&e);
        }
    };

    let result = if cli.dry_run {
        app.dry_run()
    } else {
        app.execute()
    };

    match result {
        Ok(report) => {
            app.output_formatter().print_report(&report);
            0
        }
        Err(e) => {
            app.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the level picked from `-v`/`-q`.
fn initialize_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("flatcat={}", default_level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn exit_code_for(error: &FlatCatError) -> i32 {
    match error {
        FlatCatError::InvalidRoot { .. } => 2,
        FlatCatError::Config { .. } => 3,
        FlatCatError::OutputFile { .. } | FlatCatError::Io(_) => 4,
    }
}

fn print_startup_error(cli: &Cli, error: &FlatCatError) {
    let formatter = OutputFormatter::new(cli.output_format.into(), 0, false);
    formatter.print_user_friendly_error(error);
}
