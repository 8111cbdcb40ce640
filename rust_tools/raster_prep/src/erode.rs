use crate::error::{RasterPrepError, Result};
use crate::georef::GeoTransform;
use crate::hull::{regularize_to_hull, HullOutcome};
use crate::io::{copy_raster_file, read_raster, write_raster};
use crate::mask::{apply_mask, count_valid, derive_mask, NoData};
use crate::morphology::binary_dilation;
use log::{debug, info};
use ndarray::Array2;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ErodeConfig {
    pub file_in: PathBuf,
    pub file_out: PathBuf,
    pub no_data: NoData,
    pub iterations: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErodeOutcome {
    /// `iterations == 0` with a distinct output path.
    Copied,
    /// `iterations == 0` in place.
    Unchanged,
    Written { masked: usize, valid: usize },
}

/// Grow the no-data region of `data` in place and return the final mask.
///
/// The mask is derived from `no_data`, regularized to the convex hull of all
/// but the last extracted region when there is more than one, dilated
/// `iterations` times with the full 3x3 element, then burnt into `data`.
pub fn erode_array(
    data: &mut Array2<f64>,
    transform: &GeoTransform,
    no_data: NoData,
    iterations: usize,
) -> Array2<bool> {
    let mask = derive_mask(data, no_data);
    debug!(
        "Initial mask: {} of {} pixels invalid",
        mask.iter().filter(|&&m| m).count(),
        mask.len()
    );

    let (mask, outcome) = regularize_to_hull(&mask, transform);
    if let HullOutcome::Regularized { shapes } = outcome {
        debug!("Mask replaced by hull built from {} regions", shapes - 1);
    }

    let mask = binary_dilation(&mask, iterations);
    apply_mask(data, &mask, no_data);
    mask
}

/// Run the erosion on files. An all no-data result is fatal and nothing is written.
pub fn erode_mask(config: &ErodeConfig) -> Result<ErodeOutcome> {
    if config.iterations == 0 {
        if config.file_out != config.file_in {
            copy_raster_file(&config.file_in, &config.file_out)?;
            return Ok(ErodeOutcome::Copied);
        }
        info!("Zero iterations in place, nothing to do");
        return Ok(ErodeOutcome::Unchanged);
    }

    let mut raster = read_raster(&config.file_in)?;
    let no_data = config.no_data.for_band(raster.profile.sample_type)?;

    info!(
        "Eroding {} with {} iteration(s), no-data {:?}",
        config.file_in.display(),
        config.iterations,
        no_data
    );

    let mask = erode_array(
        &mut raster.data,
        &raster.profile.geotransform,
        no_data,
        config.iterations,
    );

    let valid = count_valid(&raster.data, no_data);
    if valid == 0 {
        return Err(RasterPrepError::EmptyResult(config.file_in.clone()));
    }

    // Explicit tag, the source file may not carry one.
    raster.profile.nodata = Some(no_data.fill_value());
    write_raster(&config.file_out, &raster)?;

    let masked = mask.iter().filter(|&&m| m).count();
    info!("Masked {} pixels, {} valid pixels remain", masked, valid);
    Ok(ErodeOutcome::Written { masked, valid })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::s;

    fn unit() -> GeoTransform {
        GeoTransform::north_up(0.0, 10.0, 1.0)
    }

    #[test]
    fn test_center_block_grows_by_one_ring() {
        let mut data = Array2::from_elem((10, 10), 0.0);
        data.slice_mut(s![4..7, 4..7]).fill(-9999.0);

        erode_array(&mut data, &unit(), NoData::from(-9999.0), 1);

        for ((row, col), &v) in data.indexed_iter() {
            let inside = (3..8).contains(&row) && (3..8).contains(&col);
            if inside {
                assert_eq!(v, -9999.0, "pixel ({}, {})", row, col);
            } else {
                assert_eq!(v, 0.0, "pixel ({}, {})", row, col);
            }
        }
    }

    #[test]
    fn test_no_invalid_pixels_leaves_data_untouched() {
        let original = Array2::from_shape_fn((6, 8), |(r, c)| (r * 8 + c) as f64 + 1.0);
        let mut data = original.clone();
        let mask = erode_array(&mut data, &unit(), NoData::Value(0.0), 3);
        assert!(mask.iter().all(|&m| !m));
        assert_eq!(data, original);
    }

    #[test]
    fn test_nan_nodata_single_pixel() {
        let mut data = Array2::from_elem((9, 9), 1.0);
        data[[4, 4]] = f64::NAN;
        erode_array(&mut data, &unit(), NoData::Nan, 2);
        let nan_count = data.iter().filter(|v| v.is_nan()).count();
        assert_eq!(nan_count, 25);
        assert!(data.slice(s![2..7, 2..7]).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_literal_nodata_ignores_nan_samples() {
        let mut data = Array2::from_elem((5, 5), 1.0);
        data[[2, 2]] = f64::NAN;
        let mask = erode_array(&mut data, &unit(), NoData::Value(0.0), 1);
        assert!(mask.iter().all(|&m| !m));
        assert!(data[[2, 2]].is_nan());
    }

    #[test]
    fn test_multiple_regions_use_hull_before_dilation() {
        // Two corner regions: the top-left one is regularized on its own,
        // the bottom-right one is the last region and is dropped.
        let mut data = Array2::from_elem((8, 8), 5.0);
        data[[0, 0]] = 0.0;
        data[[0, 1]] = 0.0;
        data[[7, 7]] = 0.0;

        let mask = erode_array(&mut data, &unit(), NoData::Value(0.0), 1);

        // Hull of the top-left pair covers (0,0)-(0,1); dilation adds one ring.
        let expected = Array2::from_shape_fn((8, 8), |(r, c)| r <= 1 && c <= 2);
        assert_eq!(mask, expected);
        // The dropped region keeps its pixels but does not grow.
        assert_eq!(data[[7, 7]], 0.0);
        assert_eq!(data[[6, 6]], 5.0);
        assert_eq!(data[[1, 2]], 0.0);
    }

    #[test]
    fn test_zero_iterations_in_place_is_noop() {
        let config = ErodeConfig {
            file_in: PathBuf::from("/nonexistent/in.tif"),
            file_out: PathBuf::from("/nonexistent/in.tif"),
            no_data: NoData::Value(0.0),
            iterations: 0,
        };
        assert_eq!(erode_mask(&config).unwrap(), ErodeOutcome::Unchanged);
    }

    #[test]
    fn test_missing_input_is_input_error() {
        let config = ErodeConfig {
            file_in: PathBuf::from("/nonexistent/in.tif"),
            file_out: PathBuf::from("/nonexistent/out.tif"),
            no_data: NoData::Value(0.0),
            iterations: 2,
        };
        assert!(matches!(
            erode_mask(&config),
            Err(RasterPrepError::InputNotFound(_))
        ));
    }
}
