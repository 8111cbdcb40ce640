use clap::Parser;
use log::{error, info};
use raster_prep::cli::{init_logging, ConvertArgs};
use raster_prep::convert::{cast_and_convert, ConvertConfig, DataFormatOut, RangeIn};
use raster_prep::Result;
use std::process::ExitCode;

fn run(args: &ConvertArgs) -> Result<()> {
    let config = ConvertConfig {
        file_in: args.file_in.clone(),
        file_out: args.output(),
        range_in: RangeIn::parse(&args.range_in)?,
        format_out: DataFormatOut::parse(&args.dformat_out)?,
        tiling: args.tiling,
    };
    cast_and_convert(&config)
}

fn main() -> ExitCode {
    let args = ConvertArgs::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => {
            info!("Converted {}", args.output().display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            if e.is_argument_error() {
                println!("{}", e);
            } else {
                eprintln!("{}", e);
            }
            ExitCode::from(e.exit_code())
        }
    }
}
