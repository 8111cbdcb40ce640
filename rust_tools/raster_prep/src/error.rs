use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RasterPrepError {
    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Array shape error: {0}")]
    ShapeError(#[from] ndarray::ShapeError),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Input raster not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Cannot read input raster {}: {source}", .path.display())]
    InputUnreadable {
        path: PathBuf,
        source: gdal::errors::GdalError,
    },

    #[error("Input raster {} has no usable geotransform", .0.display())]
    MissingGeoTransform(PathBuf),

    #[error("Input raster has invalid dimensions: {0}x{1}")]
    InvalidDimensions(usize, usize),

    #[error("Unsupported band data type: {0}")]
    UnsupportedDataType(String),

    #[error("No {} found under {}", .0, .1.display())]
    DimapVolumeNotFound(String, PathBuf),

    #[error("Subdataset {0} has no SPECTRAL_PROCESSING metadata")]
    MissingSpectralProcessing(String),

    #[error("ERROR: wrong format for rangein (Expecting rangein=src_min,src_max): {0}")]
    InvalidRangeIn(String),

    #[error("ERROR: wrong format for dformat-out (Expecting dformat-out=GDALdtype,nodata,min,max): {0}")]
    InvalidOutputFormat(String),

    #[error("Invalid tile size: {0} (must be multiple of 16)")]
    InvalidTileSize(String),

    #[error("Invalid projection: {0}")]
    InvalidProjection(String),

    #[error("No-data value {nodata} cannot be stored in a {data_type} band")]
    NodataNotRepresentable { nodata: f64, data_type: String },

    #[error("FATAL: {} empty", .0.display())]
    EmptyResult(PathBuf),

    #[error("gdal_translate failed: {0}")]
    Translate(String),
}

impl RasterPrepError {
    /// Process exit status reported by the binaries.
    pub fn exit_code(&self) -> u8 {
        1
    }

    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            RasterPrepError::InvalidRangeIn(_)
                | RasterPrepError::InvalidOutputFormat(_)
                | RasterPrepError::InvalidTileSize(_)
                | RasterPrepError::InvalidProjection(_)
                | RasterPrepError::NodataNotRepresentable { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, RasterPrepError>;
