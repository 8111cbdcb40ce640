use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::morphology::dilate;
use log::debug;
use ndarray::Array2;

const FOREGROUND: u8 = 255;

// Chessboard distances saturate at u8::MAX, so a radius of 255 would also
// select pixels with no foreground in reach.
const MAX_RADIUS_PER_PASS: usize = 254;

/// `true` pixels become foreground.
pub fn mask_to_image(mask: &Array2<bool>) -> GrayImage {
    let (nrows, ncols) = mask.dim();
    GrayImage::from_fn(ncols as u32, nrows as u32, |x, y| {
        if mask[[y as usize, x as usize]] {
            Luma([FOREGROUND])
        } else {
            Luma([0])
        }
    })
}

fn image_to_mask(image: &GrayImage) -> Array2<bool> {
    let dim = (image.height() as usize, image.width() as usize);
    Array2::from_shape_fn(dim, |(row, col)| {
        image.get_pixel(col as u32, row as u32)[0] != 0
    })
}

/// Grow the `true` region with the full 3x3 (8-connected) element,
/// `iterations` times. Pixels outside the grid count as `false`.
///
/// `k` iterations of the 3x3 square equal one dilation by a chessboard
/// radius of `k`.
pub fn binary_dilation(mask: &Array2<bool>, iterations: usize) -> Array2<bool> {
    if iterations == 0 || !mask.iter().any(|&m| m) {
        return mask.clone();
    }

    let (nrows, ncols) = mask.dim();
    // Past the grid diagonal the mask is saturated.
    let mut remaining = iterations.min(nrows.max(ncols));
    let mut image = mask_to_image(mask);

    while remaining > 0 {
        let radius = remaining.min(MAX_RADIUS_PER_PASS);
        image = dilate(&image, Norm::LInf, radius as u8);
        remaining -= radius;
    }

    debug!(
        "Dilated mask by {} iteration(s) of the 3x3 element",
        iterations
    );
    image_to_mask(&image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::s;

    fn single_pixel(size: usize, row: usize, col: usize) -> Array2<bool> {
        let mut mask = Array2::from_elem((size, size), false);
        mask[[row, col]] = true;
        mask
    }

    #[test]
    fn test_single_pixel_grows_to_square() {
        let mask = single_pixel(11, 5, 5);
        for k in 1..=3 {
            let out = binary_dilation(&mask, k);
            let expected_side = 2 * k + 1;
            assert_eq!(out.iter().filter(|&&m| m).count(), expected_side * expected_side);
            assert!(out
                .slice(s![5 - k..=5 + k, 5 - k..=5 + k])
                .iter()
                .all(|&m| m));
        }
    }

    #[test]
    fn test_diagonal_neighbours_are_reached() {
        let mask = single_pixel(3, 1, 1);
        let out = binary_dilation(&mask, 1);
        assert!(out.iter().all(|&m| m));
    }

    #[test]
    fn test_dilation_clips_at_edges() {
        let mask = single_pixel(5, 0, 0);
        let out = binary_dilation(&mask, 1);
        assert_eq!(out.iter().filter(|&&m| m).count(), 4);
        assert!(out[[1, 1]]);
        assert!(!out[[2, 0]]);
    }

    #[test]
    fn test_empty_mask_stays_empty() {
        let mask = Array2::from_elem((4, 6), false);
        let out = binary_dilation(&mask, 300);
        assert!(out.iter().all(|&m| !m));
    }

    #[test]
    fn test_zero_iterations_is_identity() {
        let mask = single_pixel(4, 1, 2);
        assert_eq!(binary_dilation(&mask, 0), mask);
    }

    #[test]
    fn test_radius_beyond_one_pass() {
        // 260 iterations take more than one u8-radius pass.
        let mut mask = Array2::from_elem((1, 300), false);
        mask[[0, 0]] = true;

        let out = binary_dilation(&mask, 260);
        assert!(out[[0, 260]]);
        assert!(!out[[0, 261]]);
        assert_eq!(out.iter().filter(|&&m| m).count(), 261);
    }

    #[test]
    fn test_image_conversion_keeps_orientation() {
        let mut mask = Array2::from_elem((2, 3), false);
        mask[[1, 2]] = true;
        let image = mask_to_image(&mask);
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(2, 1)[0], FOREGROUND);
        assert_eq!(image_to_mask(&image), mask);
    }
}
