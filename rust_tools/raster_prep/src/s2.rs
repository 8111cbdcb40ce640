use crate::error::Result;
use glob::glob;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Band rasters inside an unpacked Sentinel-2 SAFE product.
pub fn band_search_pattern(workdir: &Path) -> String {
    workdir
        .join("*")
        .join("GRANULE")
        .join("*")
        .join("IMG_DATA")
        .join("*_B??.jp2")
        .to_string_lossy()
        .into_owned()
}

/// Band code of a `..._B8A.jp2` file name: the three characters before the extension.
pub fn band_code(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let chars: Vec<char> = stem.chars().collect();
    if chars.len() < 3 {
        return None;
    }
    Some(chars[chars.len() - 3..].iter().collect())
}

pub fn band_output_name(pattern: &str, band: &str) -> String {
    pattern.replace('*', band)
}

/// Copy every band raster to `workdir/<pattern_out>` with `*` replaced by the band code.
pub fn extract_s2_files(workdir: &Path, pattern_out: &str) -> Result<Vec<PathBuf>> {
    let pattern = band_search_pattern(workdir);
    info!("Scanning for band files with pattern: {}", pattern);

    let mut written = Vec::new();
    for entry in glob(&pattern)? {
        let file = match entry {
            Ok(path) => path,
            Err(e) => {
                warn!("Bad path from glob: {:?}", e);
                continue;
            }
        };

        let Some(band) = band_code(&file) else {
            warn!("Cannot derive band from {}", file.display());
            continue;
        };

        let target = workdir.join(band_output_name(pattern_out, &band));
        info!("{} -> {}", file.display(), target.display());
        std::fs::copy(&file, &target)?;
        written.push(target);
    }

    if written.is_empty() {
        warn!("No band files found under {}", workdir.display());
    }
    Ok(written)
}
