use clap::Parser;
use codedocx::{Cli, CodeDocx, CodeDocxError, OutputFormatter, UserFriendlyError};
use std::path::PathBuf;
use std::process;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

const SAMPLE_CONFIG_NAME: &str = "codedocx.toml";

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    setup_logging(cli.verbosity_level());

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let codedocx = match CodeDocx::from_cli(&cli) {
        Ok(codedocx) => codedocx,
        Err(e) => {
            print_startup_error(&cli, &e);
            return 1;
        }
    };

    if cli.dry_run {
        return handle_dry_run(&cli, &codedocx);
    }

    match codedocx.export(&cli.include) {
        Ok(report) => {
            tracing::info!(
                exported = report.exported_files.len(),
                skipped = report.skipped_files.len(),
                "export finished"
            );
            0
        }
        Err(e) => {
            codedocx.handle_error(&e);
            1
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(SAMPLE_CONFIG_NAME));

    match CodeDocx::generate_sample_config(&config_path) {
        Ok(()) => {
            println!(
                "Generated sample configuration file: {}",
                config_path.display()
            );
            println!("\nTo use this configuration:");
            println!(
                "  codedocx --include <path> --config {}",
                config_path.display()
            );
            println!("\nEdit the file to customize settings for your needs.");
            0
        }
        Err(e) => {
            eprintln!(
                "Failed to generate configuration file: {}",
                e.user_message()
            );
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(cli: &Cli, codedocx: &CodeDocx) -> i32 {
    let formatter = codedocx.output_formatter();
    formatter.info("DRY RUN MODE - no document will be written");

    match codedocx.dry_run(&cli.include) {
        Ok(_) => {
            formatter.info("Run without --dry-run to write the document");
            0
        }
        Err(e) => {
            codedocx.handle_error(&e);
            1
        }
    }
}

fn print_startup_error(cli: &Cli, error: &CodeDocxError) {
    let formatter = OutputFormatter::new(cli.output_mode(), 0, false);
    formatter.print_user_friendly_error(error);
}

/// Diagnostics go to stderr so stdout only carries progress and reports.
fn setup_logging(verbosity: u8) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level(verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    // Already set when embedded in a test harness
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn log_level(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}
