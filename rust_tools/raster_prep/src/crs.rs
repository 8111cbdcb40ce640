use crate::error::{RasterPrepError, Result};
use gdal::spatial_ref::SpatialRef;
use log::{info, warn};

/// Check that a user supplied target SRS (EPSG code, WKT, PROJ string) parses
pub fn validate_target_srs(definition: &str) -> Result<()> {
    if definition.trim().is_empty() {
        return Err(RasterPrepError::InvalidProjection(definition.to_string()));
    }

    let spatial_ref = SpatialRef::from_definition(definition)
        .map_err(|e| RasterPrepError::InvalidProjection(format!("{}: {}", definition, e)))?;

    if spatial_ref.is_geographic() {
        info!("Target SRS {} is geographic (lat/lon)", definition);
    } else if spatial_ref.is_projected() {
        // Get the linear unit (meters = 1.0)
        let linear_units = spatial_ref.linear_units();
        if (linear_units - 1.0).abs() < 0.01 {
            info!("Target SRS {} is projected in meters", definition);
        } else {
            warn!(
                "Target SRS {} is projected with non-meter units (units={:.6})",
                definition, linear_units
            );
        }
    } else {
        warn!("Unknown CRS type for target SRS {}", definition);
    }
    Ok(())
}
