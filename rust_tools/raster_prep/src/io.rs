use crate::error::{RasterPrepError, Result};
use crate::georef::GeoTransform;
use gdal::cpl::CslStringList;
use gdal::raster::{Buffer, GdalDataType, GdalType, RasterBand};
use gdal::{Dataset, Driver, DriverManager, Metadata};
use log::{debug, info, warn};
use ndarray::Array2;
use num_traits::NumCast;
use std::fmt;
use std::path::Path;

/// Band sample types the tools can read and write back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    UInt8,
    UInt16,
    Int16,
    UInt32,
    Int32,
    Float32,
    Float64,
}

impl SampleType {
    pub fn from_gdal(data_type: GdalDataType) -> Result<Self> {
        match data_type {
            GdalDataType::UInt8 => Ok(SampleType::UInt8),
            GdalDataType::UInt16 => Ok(SampleType::UInt16),
            GdalDataType::Int16 => Ok(SampleType::Int16),
            GdalDataType::UInt32 => Ok(SampleType::UInt32),
            GdalDataType::Int32 => Ok(SampleType::Int32),
            GdalDataType::Float32 => Ok(SampleType::Float32),
            GdalDataType::Float64 => Ok(SampleType::Float64),
            other => Err(RasterPrepError::UnsupportedDataType(format!("{:?}", other))),
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, SampleType::Float32 | SampleType::Float64)
    }

    /// Inclusive value range of the type.
    pub fn range(&self) -> (f64, f64) {
        match self {
            SampleType::UInt8 => (u8::MIN as f64, u8::MAX as f64),
            SampleType::UInt16 => (u16::MIN as f64, u16::MAX as f64),
            SampleType::Int16 => (i16::MIN as f64, i16::MAX as f64),
            SampleType::UInt32 => (u32::MIN as f64, u32::MAX as f64),
            SampleType::Int32 => (i32::MIN as f64, i32::MAX as f64),
            SampleType::Float32 => (f32::MIN as f64, f32::MAX as f64),
            SampleType::Float64 => (f64::MIN, f64::MAX),
        }
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SampleType::UInt8 => "Byte",
            SampleType::UInt16 => "UInt16",
            SampleType::Int16 => "Int16",
            SampleType::UInt32 => "UInt32",
            SampleType::Int32 => "Int32",
            SampleType::Float32 => "Float32",
            SampleType::Float64 => "Float64",
        };
        f.write_str(name)
    }
}

/// Everything needed to write a band back the way it was read.
#[derive(Debug, Clone)]
pub struct RasterProfile {
    pub driver: String,
    pub width: usize,
    pub height: usize,
    pub sample_type: SampleType,
    pub geotransform: GeoTransform,
    pub projection: String,
    pub nodata: Option<f64>,
    pub block_size: (usize, usize),
    pub compression: Option<String>,
}

impl RasterProfile {
    /// Strip layouts always span the full width.
    pub fn is_tiled(&self) -> bool {
        self.block_size.0 < self.width
    }

    /// GTiff creation options reproducing the source layout.
    pub fn creation_options(&self) -> Vec<String> {
        let mut options = Vec::new();
        if self.is_tiled() {
            options.push("TILED=YES".to_string());
            options.push(format!("BLOCKXSIZE={}", self.block_size.0));
            options.push(format!("BLOCKYSIZE={}", self.block_size.1));
        }
        if let Some(compression) = &self.compression {
            options.push(format!("COMPRESS={}", compression));
        }
        options
    }
}

/// A single band held fully in memory.
#[derive(Debug, Clone)]
pub struct Raster {
    pub data: Array2<f64>,
    pub profile: RasterProfile,
}

/// Extract the profile of band 1 without reading pixels.
pub fn read_profile(dataset: &Dataset, path: &Path) -> Result<RasterProfile> {
    let rasterband: RasterBand = dataset.rasterband(1)?;

    let width = rasterband.x_size();
    let height = rasterband.y_size();

    if width == 0 || height == 0 {
        return Err(RasterPrepError::InvalidDimensions(width, height));
    }

    let geotransform = GeoTransform::from(
        dataset
            .geo_transform()
            .map_err(|_| RasterPrepError::MissingGeoTransform(path.to_path_buf()))?,
    );
    if !geotransform.is_invertible() {
        return Err(RasterPrepError::MissingGeoTransform(path.to_path_buf()));
    }

    Ok(RasterProfile {
        driver: dataset.driver().short_name(),
        width,
        height,
        sample_type: SampleType::from_gdal(rasterband.band_type())?,
        geotransform,
        projection: dataset.projection(),
        nodata: rasterband.no_data_value(),
        block_size: rasterband.block_size(),
        compression: dataset.metadata_item("COMPRESSION", "IMAGE_STRUCTURE"),
    })
}

/// Read band 1 of `path` into memory. The dataset is closed before returning.
pub fn read_raster(path: &Path) -> Result<Raster> {
    if !path.exists() {
        return Err(RasterPrepError::InputNotFound(path.to_path_buf()));
    }

    info!("Opening input raster: {}", path.display());
    let dataset = Dataset::open(path).map_err(|source| RasterPrepError::InputUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let profile = read_profile(&dataset, path)?;
    if dataset.raster_count() > 1 {
        warn!(
            "{} has {} bands, only band 1 is processed",
            path.display(),
            dataset.raster_count()
        );
    }

    debug!(
        "Raster {}x{} {} (driver {}, block {}x{})",
        profile.width,
        profile.height,
        profile.sample_type,
        profile.driver,
        profile.block_size.0,
        profile.block_size.1
    );

    let rasterband = dataset.rasterband(1)?;
    let buffer = rasterband.read_as::<f64>(
        (0, 0),
        (profile.width, profile.height),
        (profile.width, profile.height),
        None,
    )?;
    let data_vec: Vec<f64> = buffer.into_iter().collect();
    let data = Array2::from_shape_vec((profile.height, profile.width), data_vec)?;

    Ok(Raster { data, profile })
}

fn output_driver(name: &str) -> Result<Driver> {
    let driver = DriverManager::get_driver_by_name(name)?;
    if driver.metadata_item("DCAP_CREATE", "").as_deref() == Some("YES") {
        return Ok(driver);
    }
    warn!("Driver {} cannot create rasters, writing GTiff instead", name);
    Ok(DriverManager::get_driver_by_name("GTiff")?)
}

/// Write `raster` as a single-band file with its profile and an explicit no-data tag.
pub fn write_raster(path: &Path, raster: &Raster) -> Result<()> {
    let profile = &raster.profile;
    let driver = output_driver(&profile.driver)?;

    let options = if driver.short_name() == "GTiff" {
        profile.creation_options()
    } else {
        Vec::new()
    };

    info!("Writing output raster: {}", path.display());
    match profile.sample_type {
        SampleType::UInt8 => write_band::<u8>(&driver, path, raster, options),
        SampleType::UInt16 => write_band::<u16>(&driver, path, raster, options),
        SampleType::Int16 => write_band::<i16>(&driver, path, raster, options),
        SampleType::UInt32 => write_band::<u32>(&driver, path, raster, options),
        SampleType::Int32 => write_band::<i32>(&driver, path, raster, options),
        SampleType::Float32 => write_band::<f32>(&driver, path, raster, options),
        SampleType::Float64 => write_band::<f64>(&driver, path, raster, options),
    }
}

fn write_band<T: GdalType + NumCast + Copy>(
    driver: &Driver,
    path: &Path,
    raster: &Raster,
    options: Vec<String>,
) -> Result<()> {
    let profile = &raster.profile;

    let mut gdal_options = CslStringList::new();
    for opt in &options {
        gdal_options.add_string(opt)?;
    }

    let mut dataset = driver.create_with_band_type_with_options::<T, _>(
        path,
        profile.width,
        profile.height,
        1,
        &gdal_options,
    )?;

    dataset.set_geo_transform(&profile.geotransform.0)?;
    if !profile.projection.is_empty() {
        dataset.set_projection(&profile.projection)?;
    }

    let samples = raster
        .data
        .iter()
        .map(|&v| {
            <T as NumCast>::from(v).ok_or_else(|| RasterPrepError::NodataNotRepresentable {
                nodata: v,
                data_type: profile.sample_type.to_string(),
            })
        })
        .collect::<Result<Vec<T>>>()?;

    let mut raster_band = dataset.rasterband(1)?;
    raster_band.set_no_data_value(profile.nodata)?;

    let mut buffer = Buffer::new((profile.width, profile.height), samples);
    raster_band.write((0, 0), (profile.width, profile.height), &mut buffer)?;

    debug!(
        "Wrote {}x{} {} band with options {:?}",
        profile.width, profile.height, profile.sample_type, options
    );
    Ok(())
}

/// Byte-for-byte copy of a raster file.
pub fn copy_raster_file(src: &Path, dst: &Path) -> Result<()> {
    if !src.exists() {
        return Err(RasterPrepError::InputNotFound(src.to_path_buf()));
    }
    info!("Copying {} to {}", src.display(), dst.display());
    std::fs::copy(src, dst)?;
    Ok(())
}
