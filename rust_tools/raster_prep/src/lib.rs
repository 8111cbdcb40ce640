// Library exports for testing and reuse

pub mod cli;
pub mod cog;
pub mod convert;
pub mod crs;
pub mod dimap;
pub mod erode;
pub mod error;
pub mod georef;
pub mod hull;
pub mod io;
pub mod mask;
pub mod morphology;
pub mod s2;
pub mod translate;
pub mod vectorize;

// Re-export commonly used types
pub use erode::{erode_array, erode_mask, ErodeConfig, ErodeOutcome};
pub use error::{RasterPrepError, Result};
pub use georef::GeoTransform;
pub use io::{read_raster, write_raster, Raster, RasterProfile, SampleType};
pub use mask::NoData;
