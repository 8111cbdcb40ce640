use crate::georef::GeoTransform;
use crate::vectorize::{extract_shapes, MaskShape};
use geo::{ConvexHull, Coord, MultiPolygon, Polygon};
use log::{debug, info};
use ndarray::Array2;

#[derive(Debug, PartialEq, Eq)]
pub enum HullOutcome {
    /// Zero or one region: the pixel mask is kept as is.
    Kept { shapes: usize },
    Regularized { shapes: usize },
}

/// Replace the mask by the rasterised convex hull of every extracted region
/// except the last one, when more than one region exists.
pub fn regularize_to_hull(
    mask: &Array2<bool>,
    transform: &GeoTransform,
) -> (Array2<bool>, HullOutcome) {
    let shapes = extract_shapes(mask, transform);

    let Some((last, kept)) = shapes.split_last().filter(|(_, kept)| !kept.is_empty()) else {
        debug!("{} masked region(s), keeping pixel mask", shapes.len());
        return (mask.clone(), HullOutcome::Kept { shapes: shapes.len() });
    };

    info!(
        "Regularizing no-data mask to the convex hull of {} of {} regions",
        kept.len(),
        shapes.len()
    );
    debug!("Dropping the region ending on row {}", last.last_row);

    let hull = union_hull(kept);
    let regularized = rasterize_polygon(&hull, mask.dim(), transform);
    (
        regularized,
        HullOutcome::Regularized {
            shapes: shapes.len(),
        },
    )
}

/// Convex hull of the union of the shapes' individual hulls.
pub fn union_hull(shapes: &[MaskShape]) -> Polygon<f64> {
    let hulls: Vec<Polygon<f64>> = shapes.iter().map(|s| s.hull.clone()).collect();
    MultiPolygon::new(hulls).convex_hull()
}

/// Burn `polygon` into a `(rows, cols)` mask with GDAL's scanline fill rule
/// (the non all-touched mode): each row is sampled at its centre line, an edge
/// counts when the line falls in `[y_min, y_max)`, and crossings are rounded
/// to the nearest pixel boundary. Pixels whose centre lies on a shared edge
/// are burnt by exactly one of the two neighbouring polygons.
pub fn rasterize_polygon(
    polygon: &Polygon<f64>,
    dim: (usize, usize),
    transform: &GeoTransform,
) -> Array2<bool> {
    let (nrows, ncols) = dim;
    let mut out = Array2::from_elem(dim, false);

    let Some(to_pixel) = transform.to_affine().inverse() else {
        return out;
    };
    let ring: Vec<Coord<f64>> = polygon
        .exterior()
        .coords()
        .map(|&c| to_pixel.apply(c))
        .collect();

    for row in 0..nrows {
        let y = row as f64 + 0.5;
        let mut crossings: Vec<f64> = ring
            .windows(2)
            .filter_map(|edge| {
                let (a, b) = if edge[0].y <= edge[1].y {
                    (edge[0], edge[1])
                } else {
                    (edge[1], edge[0])
                };
                if a.y == b.y || y < a.y || y >= b.y {
                    return None;
                }
                Some(a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y))
            })
            .collect();
        crossings.sort_by(|a, b| a.total_cmp(b));

        for span in crossings.chunks_exact(2) {
            let start = (span[0] + 0.5).floor().max(0.0) as usize;
            let end = (span[1] + 0.5).floor().min(ncols as f64).max(0.0) as usize;
            for col in start..end {
                out[[row, col]] = true;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;
    use ndarray::{arr2, s};

    fn unit() -> GeoTransform {
        GeoTransform::north_up(0.0, 0.0, 1.0)
    }

    #[test]
    fn test_single_region_is_identity() {
        let mut mask = Array2::from_elem((6, 6), false);
        mask[[1, 1]] = true;
        mask[[1, 2]] = true;
        mask[[2, 1]] = true;
        let (out, outcome) = regularize_to_hull(&mask, &unit());
        assert_eq!(out, mask);
        assert_eq!(outcome, HullOutcome::Kept { shapes: 1 });
    }

    #[test]
    fn test_empty_mask_is_identity() {
        let mask = Array2::from_elem((4, 4), false);
        let (out, outcome) = regularize_to_hull(&mask, &unit());
        assert_eq!(out, mask);
        assert_eq!(outcome, HullOutcome::Kept { shapes: 0 });
    }

    #[test]
    fn test_last_region_is_dropped() {
        // Two blobs in the top rows, one last region on the bottom row.
        let mask = arr2(&[
            [true, false, false, false, true],
            [false, false, false, false, false],
            [false, false, false, false, false],
            [false, false, false, false, false],
            [false, false, true, false, false],
        ]);
        let (out, outcome) = regularize_to_hull(&mask, &unit());
        assert_eq!(outcome, HullOutcome::Regularized { shapes: 3 });
        // Hull of the two top pixels spans the whole first row only.
        assert!(out.slice(s![0, ..]).iter().all(|&m| m));
        assert!(out.slice(s![1.., ..]).iter().all(|&m| !m));
    }

    #[test]
    fn test_hull_fills_concavity() {
        // Three regions; the bottom-right one is emitted last.
        let mask = arr2(&[
            [true, true, false, false, false, false],
            [true, false, false, false, true, false],
            [false, false, false, false, false, false],
            [false, true, false, false, false, false],
            [false, false, false, false, false, false],
            [false, false, false, false, false, true],
        ]);
        let (out, _) = regularize_to_hull(&mask, &unit());
        // Pixel centres inside the hull of the first three regions.
        assert!(out[[1, 1]]);
        assert!(out[[2, 2]]);
        assert!(out[[3, 1]]);
        assert!(!out[[5, 5]]);
        assert!(!out[[0, 5]]);
    }

    #[test]
    fn test_rasterize_respects_geotransform() {
        let gt = GeoTransform::north_up(1000.0, 2000.0, 10.0);
        let polygon = polygon![
            (x: 1010.0, y: 1990.0),
            (x: 1030.0, y: 1990.0),
            (x: 1030.0, y: 1970.0),
            (x: 1010.0, y: 1970.0),
        ];
        let out = rasterize_polygon(&polygon, (4, 4), &gt);
        let expected = arr2(&[
            [false, false, false, false],
            [false, true, true, false],
            [false, true, true, false],
            [false, false, false, false],
        ]);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_shared_diagonal_edge_burns_each_pixel_once() {
        // Two triangles splitting a 4x4 block along a diagonal that runs
        // through pixel centres.
        let upper = polygon![
            (x: 0.0, y: 0.0),
            (x: 4.0, y: 0.0),
            (x: 0.0, y: -4.0),
        ];
        let lower = polygon![
            (x: 4.0, y: 0.0),
            (x: 4.0, y: -4.0),
            (x: 0.0, y: -4.0),
        ];
        let upper = rasterize_polygon(&upper, (4, 4), &unit());
        let lower = rasterize_polygon(&lower, (4, 4), &unit());

        assert_eq!(upper.iter().filter(|&&m| m).count(), 10);
        assert_eq!(lower.iter().filter(|&&m| m).count(), 6);
        for ((row, col), &m) in upper.indexed_iter() {
            assert_ne!(m, lower[[row, col]], "pixel ({}, {})", row, col);
        }
        // Centre (3.5, 0.5) lies on the diagonal.
        assert!(upper[[0, 3]]);
        assert!(!lower[[0, 3]]);
    }

    #[test]
    fn test_polygon_outside_grid() {
        let polygon = polygon![
            (x: -10.0, y: 5.0),
            (x: -5.0, y: 5.0),
            (x: -5.0, y: 1.0),
        ];
        let out = rasterize_polygon(&polygon, (3, 3), &unit());
        assert!(out.iter().all(|&m| !m));
    }
}
