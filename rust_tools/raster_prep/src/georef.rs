use geo::{AffineTransform, Coord};

/// GDAL-ordered affine coefficients: `[x0, dx/dcol, dx/drow, y0, dy/dcol, dy/drow]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform(pub [f64; 6]);

impl GeoTransform {
    /// North-up transform with square pixels, mostly useful for tests.
    pub fn north_up(origin_x: f64, origin_y: f64, pixel_size: f64) -> Self {
        GeoTransform([origin_x, pixel_size, 0.0, origin_y, 0.0, -pixel_size])
    }

    /// A transform can only georeference a mask if it maps pixels onto a
    /// non-degenerate area.
    pub fn is_invertible(&self) -> bool {
        let gt = &self.0;
        let det = gt[1] * gt[5] - gt[2] * gt[4];
        det.is_finite() && det.abs() > f64::EPSILON * f64::EPSILON
    }

    pub fn to_affine(&self) -> AffineTransform<f64> {
        let gt = &self.0;
        AffineTransform::new(gt[1], gt[2], gt[0], gt[4], gt[5], gt[3])
    }

    /// World coordinate of the pixel corner `(col, row)`.
    pub fn pixel_to_world(&self, col: f64, row: f64) -> Coord<f64> {
        self.to_affine().apply(Coord { x: col, y: row })
    }

    pub fn pixel_center(&self, col: usize, row: usize) -> Coord<f64> {
        self.pixel_to_world(col as f64 + 0.5, row as f64 + 0.5)
    }
}

impl From<[f64; 6]> for GeoTransform {
    fn from(gt: [f64; 6]) -> Self {
        GeoTransform(gt)
    }
}
