use clap::Parser;
use log::{error, info};
use raster_prep::cli::{init_logging, ExtractS2Args};
use raster_prep::s2::extract_s2_files;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = ExtractS2Args::parse();
    init_logging(args.verbose);

    match extract_s2_files(&args.workdir, &args.pattern_out) {
        Ok(written) => {
            info!("Copied {} band files", written.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
