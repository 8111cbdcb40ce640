use clap::Parser;
use log::{error, info};
use raster_prep::cli::{init_logging, ExtractDimapArgs};
use raster_prep::dimap::{extract_dimap_files, DimapConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = ExtractDimapArgs::parse();
    init_logging(args.verbose);

    let config = DimapConfig {
        workdir: args.workdir,
        file_ms_out: args.file_ms_out,
        file_pan_out: args.file_pan_out,
        constellation: args.constellation,
    };

    match extract_dimap_files(&config) {
        Ok(written) => {
            info!("Extracted {} rasters", written.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
