use crate::crs::validate_target_srs;
use crate::error::{RasterPrepError, Result};
use crate::translate::{translate, OutputFormat, TranslateOptions};
use gdal::Dataset;
use log::{debug, info};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct CogConfig {
    pub filepath: PathBuf,
    pub fileout: PathBuf,
    pub blocksize: String,
    pub projection: String,
}

/// Validate block size (positive multiple of 16)
pub fn validate_tile_size(raw: &str) -> Result<usize> {
    match raw.trim().parse::<usize>() {
        Ok(tile_size) if tile_size > 0 && tile_size % 16 == 0 => Ok(tile_size),
        _ => Err(RasterPrepError::InvalidTileSize(raw.to_string())),
    }
}

/// COG creation options
pub fn create_cog_options(projection: &str, tile_size: usize) -> Vec<String> {
    vec![
        format!("TARGET_SRS={}", projection),
        "SPARSE_OK=TRUE".to_string(),
        format!("BLOCKSIZE={}", tile_size),
    ]
}

/// Reproject and rewrite `filepath` as a Cloud-Optimized GeoTIFF.
pub fn create_cog(config: &CogConfig) -> Result<()> {
    let tile_size = validate_tile_size(&config.blocksize)?;
    validate_target_srs(&config.projection)?;

    if !config.filepath.exists() {
        return Err(RasterPrepError::InputNotFound(config.filepath.clone()));
    }

    info!(
        "Creating COG {} from {} (block {})",
        config.fileout.display(),
        config.filepath.display(),
        tile_size
    );

    let options = TranslateOptions {
        format: OutputFormat::Cog,
        creation_options: create_cog_options(&config.projection, tile_size),
        ..Default::default()
    };
    translate(&config.filepath.to_string_lossy(), &config.fileout, &options)?;

    let dataset = Dataset::open(&config.fileout)?;
    validate_cog_structure(&dataset, tile_size)?;
    info!("COG written: {}", config.fileout.display());
    Ok(())
}

/// Validate that output is tiled with the requested block size
pub fn validate_cog_structure(dataset: &Dataset, tile_size: usize) -> Result<()> {
    let (width, _height) = dataset.raster_size();

    let rasterband = dataset.rasterband(1)?;
    let block_size = rasterband.block_size();

    if block_size.0 == width && block_size.1 == 1 {
        return Err(RasterPrepError::Translate(
            "Output is not tiled (scanline format detected)".to_string(),
        ));
    }
    if block_size != (tile_size, tile_size) {
        debug!(
            "Block size {}x{} differs from requested {}",
            block_size.0, block_size.1, tile_size
        );
    }

    debug!("COG validation: tiled=yes, block_size={}x{}", block_size.0, block_size.1);
    Ok(())
}
