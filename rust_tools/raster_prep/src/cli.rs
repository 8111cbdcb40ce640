use crate::dimap::Constellation;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "erode-mask")]
#[command(about = "Erode area with N iterations of 3x3 kernel, setting no-data")]
#[command(version)]
#[command(author = "Huimori Project")]
pub struct ErodeMaskArgs {
    /// Input raster path
    #[arg(long, value_name = "FILE")]
    pub file_in: PathBuf,

    /// Output raster path (default: overwrite input)
    #[arg(long, value_name = "FILE")]
    pub file_out: Option<PathBuf>,

    /// No-data value, `nan` to treat NaN samples as invalid
    #[arg(long, value_name = "VALUE", default_value_t = 0.0, allow_negative_numbers = true)]
    pub no_data: f64,

    /// Number of 3x3 dilation iterations (0 copies the input)
    #[arg(long, value_name = "N")]
    pub iterations: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl ErodeMaskArgs {
    pub fn output(&self) -> PathBuf {
        self.file_out.clone().unwrap_or_else(|| self.file_in.clone())
    }
}

#[derive(Parser, Debug)]
#[command(name = "convert")]
#[command(about = "Cast and convert dataset to geotiff")]
#[command(version)]
#[command(author = "Huimori Project")]
pub struct ConvertArgs {
    /// Input raster path
    #[arg(long, value_name = "FILE")]
    pub file_in: PathBuf,

    /// Output GeoTIFF path (default: overwrite input)
    #[arg(long, value_name = "FILE")]
    pub file_out: Option<PathBuf>,

    /// Source value range: src_min,src_max
    #[arg(long, value_name = "MIN,MAX", allow_hyphen_values = true)]
    pub range_in: String,

    /// Output format: dtype,nodata,min,max
    #[arg(long, value_name = "DTYPE,NODATA,MIN,MAX", allow_hyphen_values = true)]
    pub dformat_out: String,

    /// Tile size in pixels
    #[arg(long, value_name = "PIXELS", default_value_t = 256)]
    pub tiling: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl ConvertArgs {
    pub fn output(&self) -> PathBuf {
        self.file_out.clone().unwrap_or_else(|| self.file_in.clone())
    }
}

#[derive(Parser, Debug)]
#[command(name = "create-cog")]
#[command(about = "Create cog from geotiff")]
#[command(version)]
#[command(author = "Huimori Project")]
pub struct CreateCogArgs {
    /// Input GeoTIFF path
    #[arg(long, value_name = "FILE")]
    pub filepath: PathBuf,

    /// Output COG path
    #[arg(long, value_name = "FILE")]
    pub fileout: PathBuf,

    /// Internal tile size (multiple of 16)
    #[arg(long, value_name = "PIXELS")]
    pub blocksize: String,

    /// Target SRS (e.g. EPSG:3857)
    #[arg(long, value_name = "SRS")]
    pub projection: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Parser, Debug)]
#[command(name = "extract-dimap")]
#[command(about = "Extract dimap files to geotiff")]
#[command(version)]
#[command(author = "Huimori Project")]
pub struct ExtractDimapArgs {
    /// Unpacked DIMAP delivery
    #[arg(long, value_name = "DIR")]
    pub workdir: PathBuf,

    /// Multispectral output GeoTIFF
    #[arg(long, value_name = "FILE")]
    pub file_ms_out: PathBuf,

    /// Panchromatic output GeoTIFF
    #[arg(long, value_name = "FILE")]
    pub file_pan_out: PathBuf,

    #[arg(long, value_enum)]
    pub constellation: Constellation,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Parser, Debug)]
#[command(name = "extract-s2")]
#[command(about = "Extract s2 files")]
#[command(version)]
#[command(author = "Huimori Project")]
pub struct ExtractS2Args {
    /// Unpacked Sentinel-2 product directory
    #[arg(long, value_name = "DIR")]
    pub workdir: PathBuf,

    /// Output file name, `*` is replaced by the band code
    #[arg(long, value_name = "PATTERN")]
    pub pattern_out: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Initialize env_logger at `info`, or `debug` when verbose.
pub fn init_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}
