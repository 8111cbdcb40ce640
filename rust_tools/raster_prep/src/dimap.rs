use crate::error::{RasterPrepError, Result};
use crate::translate::{translate, TranslateOptions};
use clap::ValueEnum;
use gdal::{Dataset, Metadata};
use log::{debug, info};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Constellation {
    /// Pleiades
    #[value(name = "PHR")]
    Phr,
    #[value(name = "SPOT")]
    Spot,
}

impl Constellation {
    /// Volume descriptor at the root of a DIMAP delivery.
    pub fn volume_file(&self) -> &'static str {
        match self {
            Constellation::Phr => "VOL_PHR.XML",
            Constellation::Spot => "SPOT_VOL.XML",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpectralProduct {
    Panchromatic,
    Multispectral,
}

impl SpectralProduct {
    /// Maps the `SPECTRAL_PROCESSING` metadata value; other products are skipped.
    pub fn from_metadata(value: &str) -> Option<Self> {
        match value {
            "P" => Some(SpectralProduct::Panchromatic),
            "MS" => Some(SpectralProduct::Multispectral),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DimapConfig {
    pub workdir: PathBuf,
    pub file_ms_out: PathBuf,
    pub file_pan_out: PathBuf,
    pub constellation: Constellation,
}

impl DimapConfig {
    fn output_for(&self, product: SpectralProduct) -> &Path {
        match product {
            SpectralProduct::Panchromatic => &self.file_pan_out,
            SpectralProduct::Multispectral => &self.file_ms_out,
        }
    }
}

/// First file called `name` below `directory`.
pub fn search_file(directory: &Path, name: &str) -> Option<PathBuf> {
    WalkDir::new(directory)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .find(|entry| entry.file_type().is_file() && entry.file_name() == name)
        .map(|entry| entry.into_path())
}

/// Subdataset names from a `SUBDATASETS` metadata domain, in declaration order.
pub fn subdataset_names(entries: &[String]) -> Vec<String> {
    let mut named: Vec<(usize, String)> = entries
        .iter()
        .filter_map(|entry| {
            let (key, value) = entry.split_once('=')?;
            let index = key
                .strip_prefix("SUBDATASET_")?
                .strip_suffix("_NAME")?
                .parse::<usize>()
                .ok()?;
            Some((index, value.to_string()))
        })
        .collect();
    named.sort_by_key(|(index, _)| *index);
    named.into_iter().map(|(_, name)| name).collect()
}

/// Export the panchromatic and multispectral rasters of a DIMAP delivery to tiled GeoTIFFs.
pub fn extract_dimap_files(config: &DimapConfig) -> Result<Vec<PathBuf>> {
    let volume_name = config.constellation.volume_file();
    let volume = search_file(&config.workdir, volume_name).ok_or_else(|| {
        RasterPrepError::DimapVolumeNotFound(volume_name.to_string(), config.workdir.clone())
    })?;

    info!("Opening DIMAP volume: {}", volume.display());
    let dataset = Dataset::open(&volume).map_err(|source| RasterPrepError::InputUnreadable {
        path: volume.clone(),
        source,
    })?;

    let entries = dataset.metadata_domain("SUBDATASETS").unwrap_or_default();
    let names = subdataset_names(&entries);
    info!("Found {} subdatasets", names.len());

    let options = TranslateOptions {
        creation_options: vec!["TILED=YES".to_string()],
        ..Default::default()
    };

    let mut written = Vec::new();
    for name in names {
        let subdataset = Dataset::open(&name)?;
        let spectral = subdataset
            .metadata_item("SPECTRAL_PROCESSING", "")
            .ok_or_else(|| RasterPrepError::MissingSpectralProcessing(name.clone()))?;

        let Some(product) = SpectralProduct::from_metadata(&spectral) else {
            debug!("Skipping subdataset {} ({})", name, spectral);
            continue;
        };

        let out_file = config.output_for(product);
        info!("{:?} subdataset -> {}", product, out_file.display());
        translate(&name, out_file, &options)?;
        written.push(out_file.to_path_buf());
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_files() {
        assert_eq!(Constellation::Phr.volume_file(), "VOL_PHR.XML");
        assert_eq!(Constellation::Spot.volume_file(), "SPOT_VOL.XML");
    }

    #[test]
    fn test_spectral_routing() {
        assert_eq!(
            SpectralProduct::from_metadata("P"),
            Some(SpectralProduct::Panchromatic)
        );
        assert_eq!(
            SpectralProduct::from_metadata("MS"),
            Some(SpectralProduct::Multispectral)
        );
        assert_eq!(SpectralProduct::from_metadata("PMS"), None);
    }

    #[test]
    fn test_subdataset_names_ordered() {
        let entries: Vec<String> = [
            "SUBDATASET_2_NAME=DIMAP:\"/d/VOL_PHR.XML\":2",
            "SUBDATASET_2_DESC=Multispectral",
            "SUBDATASET_1_NAME=DIMAP:\"/d/VOL_PHR.XML\":1",
            "SUBDATASET_1_DESC=Panchromatic",
            "SUBDATASET_10_NAME=DIMAP:\"/d/VOL_PHR.XML\":10",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        assert_eq!(
            subdataset_names(&entries),
            vec![
                "DIMAP:\"/d/VOL_PHR.XML\":1",
                "DIMAP:\"/d/VOL_PHR.XML\":2",
                "DIMAP:\"/d/VOL_PHR.XML\":10",
            ]
        );
    }

    #[test]
    fn test_search_file_recursive() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("PROD_1").join("VOL");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("SPOT_VOL.XML"), "<xml/>").unwrap();

        let found = search_file(dir.path(), "SPOT_VOL.XML").unwrap();
        assert_eq!(found, nested.join("SPOT_VOL.XML"));
        assert!(search_file(dir.path(), "VOL_PHR.XML").is_none());
    }

    #[test]
    fn test_missing_volume() {
        let dir = tempfile::tempdir().unwrap();
        let config = DimapConfig {
            workdir: dir.path().to_path_buf(),
            file_ms_out: dir.path().join("ms.tif"),
            file_pan_out: dir.path().join("pan.tif"),
            constellation: Constellation::Phr,
        };
        assert!(matches!(
            extract_dimap_files(&config),
            Err(RasterPrepError::DimapVolumeNotFound(_, _))
        ));
    }
}
