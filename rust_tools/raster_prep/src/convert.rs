use crate::error::{RasterPrepError, Result};
use crate::translate::{translate, OutputDataType, OutputFormat, ScaleParams, TranslateOptions};
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Source value range, `--range-in=min,max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeIn {
    pub min: f64,
    pub max: f64,
}

impl RangeIn {
    pub fn parse(raw: &str) -> Result<Self> {
        let values = parse_floats(raw).ok_or_else(|| RasterPrepError::InvalidRangeIn(raw.to_string()))?;
        match values.as_slice() {
            [min, max] => Ok(RangeIn { min: *min, max: *max }),
            _ => Err(RasterPrepError::InvalidRangeIn(raw.to_string())),
        }
    }
}

/// Output type, no-data and value range, `--dformat-out=dtype,nodata,min,max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataFormatOut {
    pub data_type: OutputDataType,
    pub no_data: f64,
    pub min: f64,
    pub max: f64,
}

impl DataFormatOut {
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = || RasterPrepError::InvalidOutputFormat(raw.to_string());

        let parts: Vec<&str> = raw.split(',').collect();
        if parts.len() != 4 {
            return Err(invalid());
        }

        let data_type = OutputDataType::parse(parts[0]).ok_or_else(invalid)?;
        let values = parse_floats(&parts[1..].join(",")).ok_or_else(invalid)?;

        Ok(DataFormatOut {
            data_type,
            no_data: values[0],
            min: values[1],
            max: values[2],
        })
    }
}

fn parse_floats(raw: &str) -> Option<Vec<f64>> {
    raw.split(',').map(|v| v.trim().parse::<f64>().ok()).collect()
}

#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub file_in: PathBuf,
    pub file_out: PathBuf,
    pub range_in: RangeIn,
    pub format_out: DataFormatOut,
    pub tiling: usize,
}

impl ConvertConfig {
    /// Type, scale and no-data part of the conversion.
    pub fn cast_options(&self) -> TranslateOptions {
        TranslateOptions {
            output_type: Some(self.format_out.data_type),
            scale: Some(ScaleParams {
                src_min: self.range_in.min,
                src_max: self.range_in.max,
                dst_min: self.format_out.min,
                dst_max: self.format_out.max,
            }),
            no_data: Some(self.format_out.no_data),
            ..Default::default()
        }
    }

    /// Tiled GTiff layout of the final file.
    pub fn gtiff_options(&self) -> TranslateOptions {
        TranslateOptions {
            format: OutputFormat::GTiff,
            creation_options: vec![
                format!("BLOCKXSIZE={}", self.tiling),
                format!("BLOCKYSIZE={}", self.tiling),
                "TILED=YES".to_string(),
                "SPARSE_OK=TRUE".to_string(),
            ],
            ..Default::default()
        }
    }
}

/// Cast, rescale and retile `file_in` into a GeoTIFF.
pub fn cast_and_convert(config: &ConvertConfig) -> Result<()> {
    if !config.file_in.exists() {
        return Err(RasterPrepError::InputNotFound(config.file_in.clone()));
    }

    info!(
        "Converting {} to {} ({}, range [{}, {}] -> [{}, {}])",
        config.file_in.display(),
        config.file_out.display(),
        config.format_out.data_type,
        config.range_in.min,
        config.range_in.max,
        config.format_out.min,
        config.format_out.max
    );

    let src = config.file_in.to_string_lossy();

    if config.file_out != config.file_in {
        let mut options = config.cast_options();
        options.creation_options = config.gtiff_options().creation_options;
        return translate(&src, &config.file_out, &options);
    }

    // In place: cast into a temporary next to the output, then retile over the input.
    let dir = config
        .file_out
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let tmp = tempfile::Builder::new()
        .prefix(".convert-")
        .suffix(".tif")
        .tempfile_in(dir)?;
    debug!("Intermediate file: {}", tmp.path().display());

    translate(&src, tmp.path(), &config.cast_options())?;
    translate(
        &tmp.path().to_string_lossy(),
        &config.file_out,
        &config.gtiff_options(),
    )
}
