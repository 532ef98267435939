// Pipeline level tests, per module tests live next to their code.

mod pipeline;

use alloc::vec::Vec;

use crate::{ColorSpace, Image};

/// Smooth RGB gradient, the kind of content the codec is tuned for
pub(crate) fn rgb_gradient(width: i32, height: i32) -> Image {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            data.push((x * 8) as u8);
            data.push((y * 10) as u8);
            data.push(((x + y) * 4) as u8);
        }
    }
    Image::new(width, height, ColorSpace::Rgb, data)
}

pub(crate) fn gray_pattern(width: i32, height: i32) -> Image {
    let data = (0..height)
        .flat_map(|y| (0..width).map(move |x| ((x * 7 + y * 13) % 256) as u8))
        .collect();
    Image::new(width, height, ColorSpace::Grayscale, data)
}

/// Expands grayscale pixels to RGB for comparison with decompressed output
pub(crate) fn gray_to_rgb(image: &Image) -> Vec<u8> {
    image.data().iter().flat_map(|&v| [v, v, v]).collect()
}

pub(crate) fn max_abs_diff(a: &[u8], b: &[u8]) -> i32 {
    assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(&a, &b)| (i32::from(a) - i32::from(b)).abs())
        .max()
        .unwrap_or(0)
}

pub(crate) fn psnr(a: &[u8], b: &[u8]) -> f64 {
    assert_eq!(a.len(), b.len());
    let mse = a
        .iter()
        .zip(b.iter())
        .map(|(&a, &b)| {
            let d = f64::from(a) - f64::from(b);
            d * d
        })
        .sum::<f64>()
        / a.len() as f64;

    if mse == 0.0 {
        f64::INFINITY
    } else {
        10.0 * (255.0 * 255.0 / mse).log10()
    }
}
