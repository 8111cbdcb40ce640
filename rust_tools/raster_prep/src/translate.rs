use crate::error::{RasterPrepError, Result};
use log::{debug, info};
use std::fmt;
use std::path::Path;
use std::process::Command;

/// Output data types accepted by `convert`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputDataType {
    UInt8,
    UInt16,
    Int16,
    UInt32,
    Int32,
    Float32,
    Float64,
    Complex64,
    Complex128,
}

impl OutputDataType {
    /// Accepts canonical names and the usual numpy shorthands.
    pub fn parse(name: &str) -> Option<Self> {
        let dtype = match name.trim().to_ascii_lowercase().as_str() {
            "uint8" | "u1" | "ubyte" => OutputDataType::UInt8,
            "uint16" | "u2" | "ushort" => OutputDataType::UInt16,
            "int16" | "i2" | "short" => OutputDataType::Int16,
            "uint32" | "u4" | "uintc" => OutputDataType::UInt32,
            "int32" | "i4" | "intc" => OutputDataType::Int32,
            "float32" | "f4" | "single" => OutputDataType::Float32,
            "float64" | "f8" | "double" | "float" => OutputDataType::Float64,
            "complex64" | "c8" | "csingle" => OutputDataType::Complex64,
            "complex128" | "c16" | "cdouble" | "complex" => OutputDataType::Complex128,
            _ => return None,
        };
        Some(dtype)
    }

    /// GDAL type name as understood by `-ot`.
    pub fn gdal_name(&self) -> &'static str {
        match self {
            OutputDataType::UInt8 => "Byte",
            OutputDataType::UInt16 => "UInt16",
            OutputDataType::Int16 => "Int16",
            OutputDataType::UInt32 => "UInt32",
            OutputDataType::Int32 => "Int32",
            OutputDataType::Float32 => "Float32",
            OutputDataType::Float64 => "Float64",
            OutputDataType::Complex64 => "CFloat32",
            OutputDataType::Complex128 => "CFloat64",
        }
    }
}

impl fmt::Display for OutputDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.gdal_name())
    }
}

/// Linear rescale from `[src_min, src_max]` to `[dst_min, dst_max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleParams {
    pub src_min: f64,
    pub src_max: f64,
    pub dst_min: f64,
    pub dst_max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    GTiff,
    Cog,
}

impl OutputFormat {
    fn driver_name(&self) -> &'static str {
        match self {
            OutputFormat::GTiff => "GTiff",
            OutputFormat::Cog => "COG",
        }
    }
}

/// Options for one `gdal_translate` run.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslateOptions {
    pub format: OutputFormat,
    pub output_type: Option<OutputDataType>,
    pub scale: Option<ScaleParams>,
    pub no_data: Option<f64>,
    pub creation_options: Vec<String>,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        TranslateOptions {
            format: OutputFormat::GTiff,
            output_type: None,
            scale: None,
            no_data: None,
            creation_options: Vec::new(),
        }
    }
}

impl TranslateOptions {
    /// Render the options as `gdal_translate` arguments (without source and destination).
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["-of".to_string(), self.format.driver_name().to_string()];

        if let Some(output_type) = self.output_type {
            args.push("-ot".to_string());
            args.push(output_type.gdal_name().to_string());
        }

        if let Some(scale) = self.scale {
            args.push("-scale".to_string());
            for v in [scale.src_min, scale.src_max, scale.dst_min, scale.dst_max] {
                args.push(v.to_string());
            }
        }

        if let Some(no_data) = self.no_data {
            args.push("-a_nodata".to_string());
            args.push(if no_data.is_nan() {
                "nan".to_string()
            } else {
                no_data.to_string()
            });
        }

        for opt in &self.creation_options {
            args.push("-co".to_string());
            args.push(opt.clone());
        }

        args
    }
}

/// Run `gdal_translate` from `src` (a path or any GDAL dataset name) to `dst`.
pub fn translate(src: &str, dst: &Path, options: &TranslateOptions) -> Result<()> {
    let args = options.to_args();
    info!("Translating {} -> {}", src, dst.display());
    debug!("gdal_translate {} {} {}", args.join(" "), src, dst.display());

    let output = Command::new("gdal_translate")
        .arg("-q")
        .args(&args)
        .arg(src)
        .arg(dst)
        .output()
        .map_err(|e| RasterPrepError::Translate(format!("cannot run gdal_translate: {}", e)))?;

    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(RasterPrepError::Translate(stderr.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dtype_aliases() {
        assert_eq!(OutputDataType::parse("uint8"), Some(OutputDataType::UInt8));
        assert_eq!(OutputDataType::parse("u1"), Some(OutputDataType::UInt8));
        assert_eq!(OutputDataType::parse("Float32"), Some(OutputDataType::Float32));
        assert_eq!(OutputDataType::parse("float"), Some(OutputDataType::Float64));
        assert_eq!(OutputDataType::parse("complex64"), Some(OutputDataType::Complex64));
        assert_eq!(OutputDataType::parse("int64"), None);
        assert_eq!(OutputDataType::parse("Byte"), None);
    }

    #[test]
    fn test_complex_gdal_names() {
        assert_eq!(OutputDataType::Complex64.gdal_name(), "CFloat32");
        assert_eq!(OutputDataType::Complex128.gdal_name(), "CFloat64");
    }

    #[test]
    fn test_default_args() {
        let args = TranslateOptions::default().to_args();
        assert_eq!(args, vec!["-of", "GTiff"]);
    }

    #[test]
    fn test_full_args() {
        let options = TranslateOptions {
            format: OutputFormat::GTiff,
            output_type: Some(OutputDataType::UInt16),
            scale: Some(ScaleParams {
                src_min: 0.0,
                src_max: 1.5,
                dst_min: 1.0,
                dst_max: 65535.0,
            }),
            no_data: Some(0.0),
            creation_options: vec!["TILED=YES".to_string()],
        };
        assert_eq!(
            options.to_args(),
            vec![
                "-of", "GTiff", "-ot", "UInt16", "-scale", "0", "1.5", "1", "65535", "-a_nodata",
                "0", "-co", "TILED=YES"
            ]
        );
    }

    #[test]
    fn test_nan_nodata_arg() {
        let options = TranslateOptions {
            format: OutputFormat::Cog,
            no_data: Some(f64::NAN),
            ..Default::default()
        };
        assert_eq!(options.to_args(), vec!["-of", "COG", "-a_nodata", "nan"]);
    }
}
