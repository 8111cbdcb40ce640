use clap::Parser;
use log::error;
use raster_prep::cli::{init_logging, CreateCogArgs};
use raster_prep::cog::{create_cog, CogConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = CreateCogArgs::parse();
    init_logging(args.verbose);

    let config = CogConfig {
        filepath: args.filepath,
        fileout: args.fileout,
        blocksize: args.blocksize,
        projection: args.projection,
    };

    if let Err(e) = create_cog(&config) {
        error!("{}", e);
        eprintln!("{}", e);
        return ExitCode::from(e.exit_code());
    }
    ExitCode::SUCCESS
}
