use crate::error::{RasterPrepError, Result};
use crate::io::SampleType;
use ndarray::{Array2, Zip};

/// How invalid samples are recognised. Chosen once per run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoData {
    Value(f64),
    Nan,
}

impl From<f64> for NoData {
    fn from(value: f64) -> Self {
        if value.is_nan() {
            NoData::Nan
        } else {
            NoData::Value(value)
        }
    }
}

impl NoData {
    #[inline]
    pub fn matches(&self, sample: f64) -> bool {
        match *self {
            NoData::Value(nd) => sample == nd,
            NoData::Nan => sample.is_nan(),
        }
    }

    /// Value written into masked pixels and into the output no-data tag.
    pub fn fill_value(&self) -> f64 {
        match *self {
            NoData::Value(nd) => nd,
            NoData::Nan => f64::NAN,
        }
    }

    /// The no-data value as a band of `sample_type` stores it. Float32 samples
    /// are compared against the f32 rounding of the literal. Values the band
    /// cannot hold are rejected before any pixel is touched.
    pub fn for_band(&self, sample_type: SampleType) -> Result<NoData> {
        let resolved = match *self {
            NoData::Value(nd) if sample_type == SampleType::Float32 => {
                NoData::Value(nd as f32 as f64)
            }
            other => other,
        };

        let fits = match resolved {
            NoData::Nan => sample_type.is_float(),
            NoData::Value(nd) => {
                let (min, max) = sample_type.range();
                nd >= min && nd <= max && (sample_type.is_float() || nd.fract() == 0.0)
            }
        };
        if fits {
            Ok(resolved)
        } else {
            Err(RasterPrepError::NodataNotRepresentable {
                nodata: self.fill_value(),
                data_type: sample_type.to_string(),
            })
        }
    }
}

/// `true` where the sample is invalid.
pub fn derive_mask(data: &Array2<f64>, no_data: NoData) -> Array2<bool> {
    data.mapv(|v| no_data.matches(v))
}

pub fn apply_mask(data: &mut Array2<f64>, mask: &Array2<bool>, no_data: NoData) {
    let fill = no_data.fill_value();
    Zip::from(data).and(mask).for_each(|v, &m| {
        if m {
            *v = fill;
        }
    });
}

/// Number of samples that are not no-data.
pub fn count_valid(data: &Array2<f64>, no_data: NoData) -> usize {
    data.iter().filter(|&&v| !no_data.matches(v)).count()
}
