use crate::georef::GeoTransform;
use crate::morphology::mask_to_image;
use geo::{ConvexHull, MultiPoint, Point, Polygon};
use image::Luma;
use imageproc::region_labelling::{connected_components, Connectivity};
use log::debug;
use ndarray::Array2;
use std::collections::{BTreeMap, HashMap};

/// One connected region of masked pixels, reduced to the convex hull of its
/// outline in world coordinates.
#[derive(Debug, Clone)]
pub struct MaskShape {
    pub hull: Polygon<f64>,
    pub last_row: usize,
}

/// Row-wise extent of a component; the hull of a pixel region only depends
/// on the outermost pixel of every row.
struct Component {
    rows: BTreeMap<usize, (usize, usize)>,
    last_row: usize,
}

impl Component {
    fn hull(&self, transform: &GeoTransform) -> Polygon<f64> {
        let corners: Vec<Point<f64>> = self
            .rows
            .iter()
            .flat_map(|(&row, &(col_min, col_max))| {
                let (top, bottom) = (row as f64, row as f64 + 1.0);
                let (left, right) = (col_min as f64, col_max as f64 + 1.0);
                [
                    (left, top),
                    (right, top),
                    (right, bottom),
                    (left, bottom),
                ]
            })
            .map(|(col, row)| Point::from(transform.pixel_to_world(col, row)))
            .collect();

        MultiPoint::new(corners).convex_hull()
    }
}

/// Extract the 4-connected regions of `true` pixels, in the order a scanline
/// polygoniser emits them: by the row on which each region ends, then by the
/// order in which the scan first reached it.
pub fn extract_shapes(mask: &Array2<bool>, transform: &GeoTransform) -> Vec<MaskShape> {
    let labels = connected_components(&mask_to_image(mask), Connectivity::Four, Luma([0u8]));

    // Label values carry no ordering, components are indexed by first visit.
    let mut index_of: HashMap<u32, usize> = HashMap::new();
    let mut components: Vec<Component> = Vec::new();

    for ((row, col), &masked) in mask.indexed_iter() {
        if !masked {
            continue;
        }
        let label = labels.get_pixel(col as u32, row as u32)[0];
        let index = *index_of.entry(label).or_insert_with(|| {
            components.push(Component {
                rows: BTreeMap::new(),
                last_row: row,
            });
            components.len() - 1
        });

        let component = &mut components[index];
        component.last_row = row;
        let extent = component.rows.entry(row).or_insert((col, col));
        extent.0 = extent.0.min(col);
        extent.1 = extent.1.max(col);
    }

    // Stable: components ending on the same row keep scan order.
    components.sort_by_key(|c| c.last_row);

    debug!("Extracted {} masked regions", components.len());

    components
        .iter()
        .map(|c| MaskShape {
            hull: c.hull(transform),
            last_row: c.last_row,
        })
        .collect()
}
