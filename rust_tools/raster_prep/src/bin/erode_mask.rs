use clap::Parser;
use log::{error, info};
use raster_prep::cli::{init_logging, ErodeMaskArgs};
use raster_prep::{erode_mask, ErodeConfig, ErodeOutcome, NoData, Result};
use std::process::ExitCode;

fn run(args: &ErodeMaskArgs) -> Result<()> {
    let config = ErodeConfig {
        file_in: args.file_in.clone(),
        file_out: args.output(),
        no_data: NoData::from(args.no_data),
        iterations: args.iterations,
    };

    match erode_mask(&config)? {
        ErodeOutcome::Copied => info!("Zero iterations, copied input to {}", config.file_out.display()),
        ErodeOutcome::Unchanged => info!("Zero iterations, input left untouched"),
        ErodeOutcome::Written { masked, valid } => info!(
            "Wrote {} ({} masked, {} valid pixels)",
            config.file_out.display(),
            masked,
            valid
        ),
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = ErodeMaskArgs::parse();
    init_logging(args.verbose);

    info!("=== Erode no-data mask ===");

    match run(&args) {
        Ok(()) => {
            info!("=== Done! ===");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
