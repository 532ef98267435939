use alloc::vec;
use alloc::vec::Vec;
use core::cell::Cell;

use approx::assert_abs_diff_eq;

use super::{gray_pattern, gray_to_rgb, max_abs_diff, psnr, rgb_gradient};
use crate::{
    compress, decompress, error_to_string, free_compressed, free_image, version, Budgeted, Codec,
    CodecError, ColorSpace, Component, CompressedImage, CompressionParameters, Cooperative, Heap,
    Image, QuantizationTableType, TransformMethod,
};

fn params(method: TransformMethod, quality: f32, skip: bool) -> CompressionParameters {
    let mut params = CompressionParameters::new(quality);
    params.set_transform_method(method);
    params.set_skip_quantization(skip);
    params
}

fn round_trip(image: &Image, params: &CompressionParameters) -> Image {
    let compressed = compress(image, params).unwrap();
    let restored = decompress(&compressed).unwrap();

    assert_eq!(restored.width(), image.width());
    assert_eq!(restored.height(), image.height());
    assert_eq!(restored.color_space(), ColorSpace::Rgb);
    assert_eq!(restored.data().len(), (image.width() * image.height() * 3) as usize);

    restored
}

fn quantized_psnr(image: &Image, method: TransformMethod, quality: f32) -> f64 {
    let restored = round_trip(image, &params(method, quality, false));
    psnr(image.data(), restored.data())
}

fn non_zero_coefficients(compressed: &CompressedImage) -> usize {
    Component::ALL
        .iter()
        .map(|&c| compressed.quantized(c).iter().filter(|&&v| v != 0).count())
        .sum()
}

#[test]
fn test_identity_grayscale_is_exact() {
    for &(width, height) in &[(1, 1), (8, 8), (7, 9), (16, 16), (37, 29)] {
        let image = gray_pattern(width, height);
        let restored = round_trip(&image, &params(TransformMethod::Identity, 1.0, true));
        assert_eq!(restored.data(), &gray_to_rgb(&image)[..]);
    }
}

#[test]
fn test_identity_rgb_color_error() {
    let image = rgb_gradient(32, 24);
    let restored = round_trip(&image, &params(TransformMethod::Identity, 1.0, true));
    assert!(max_abs_diff(image.data(), restored.data()) <= 4);

    let neutral: Vec<u8> = (0..16 * 8).flat_map(|i| [i as u8 * 2; 3]).collect();
    let image = Image::new(16, 8, ColorSpace::Rgb, neutral);
    let restored = round_trip(&image, &params(TransformMethod::Identity, 1.0, true));
    assert_eq!(restored.data(), image.data());
}

#[test]
fn test_unquantized_transforms() {
    let image = gray_pattern(29, 19);
    let expected = gray_to_rgb(&image);

    for &method in &[TransformMethod::Loeffler, TransformMethod::Matrix] {
        let restored = round_trip(&image, &params(method, 1.0, true));
        assert!(max_abs_diff(&expected, restored.data()) <= 2, "{}", method);
    }

    let restored = round_trip(&image, &params(TransformMethod::Approximate, 1.0, true));
    assert_eq!(restored.data(), &expected[..]);
}

#[test]
fn test_unquantized_rgb() {
    let image = rgb_gradient(32, 24);
    for method in TransformMethod::ALL {
        let restored = round_trip(&image, &params(method, 1.0, true));
        assert!(max_abs_diff(image.data(), restored.data()) <= 6, "{}", method);
    }
}

#[test]
fn test_quantized_quality() {
    let image = rgb_gradient(32, 24);

    let loeffler = quantized_psnr(&image, TransformMethod::Loeffler, 1.0);
    let matrix = quantized_psnr(&image, TransformMethod::Matrix, 1.0);
    let approx = quantized_psnr(&image, TransformMethod::Approximate, 1.0);

    assert!(loeffler > 35.0, "loeffler psnr {}", loeffler);
    assert!(approx > 30.0, "approx psnr {}", approx);
    assert_abs_diff_eq!(loeffler, matrix, epsilon = 0.1);

    let coarse = quantized_psnr(&image, TransformMethod::Loeffler, 4.0);
    assert!(coarse > 30.0, "coarse psnr {}", coarse);
    assert!(coarse < loeffler);
}

#[test]
fn test_quality_factor_reduces_coefficients() {
    let image = rgb_gradient(32, 24);

    for method in TransformMethod::ALL {
        let fine = compress(&image, &params(method, 1.0, false)).unwrap();
        let coarse = compress(&image, &params(method, 4.0, false)).unwrap();
        assert!(
            non_zero_coefficients(&coarse) < non_zero_coefficients(&fine),
            "{}",
            method
        );
    }
}

#[test]
fn test_flat_tables() {
    let image = rgb_gradient(16, 16);
    let mut params = params(TransformMethod::Loeffler, 1.0, false);
    params.set_quantization_tables(QuantizationTableType::Flat);

    let compressed = compress(&image, &params).unwrap();
    assert_eq!(compressed.quantization_tables(), &QuantizationTableType::Flat);

    let restored = decompress(&compressed).unwrap();
    assert!(psnr(image.data(), restored.data()) > 30.0);
}

#[test]
fn test_odd_sizes_all_methods() {
    for &(width, height) in &[(1, 1), (1, 17), (17, 1), (7, 9), (23, 11)] {
        let image = rgb_gradient(width, height);
        for method in TransformMethod::ALL {
            for &skip in &[false, true] {
                round_trip(&image, &params(method, 2.0, skip));
            }
        }
    }
}

#[test]
fn test_one_block() {
    let image = gray_pattern(8, 8);
    let compressed = compress(&image, &CompressionParameters::default()).unwrap();
    assert_eq!(compressed.num_blocks(), 1);
    assert_eq!(compressed.width(), 8);
    assert_eq!(compressed.height(), 8);
    assert_eq!(compressed.transform_method(), TransformMethod::Loeffler);

    let image = gray_pattern(9, 8);
    assert_eq!(compress(&image, &CompressionParameters::default()).unwrap().num_blocks(), 2);
}

#[test]
fn test_input_validation() {
    let params = CompressionParameters::default();

    let empty = Image::new(8, 8, ColorSpace::Rgb, Vec::new());
    let err = compress(&empty, &params).unwrap_err();
    assert_eq!(err, CodecError::NullPointer);
    assert_eq!(error_to_string(err.code()), "Null pointer");

    let negative = Image::new(-1, 8, ColorSpace::Rgb, vec![0; 192]);
    let err = compress(&negative, &params).unwrap_err();
    assert_eq!(err, CodecError::InvalidDimensions { width: -1, height: 8 });
    assert_eq!(err.code(), -2);

    let zero = Image::new(8, 0, ColorSpace::Grayscale, vec![0; 64]);
    assert!(matches!(
        compress(&zero, &params),
        Err(CodecError::InvalidDimensions { .. })
    ));

    let short = Image::new(8, 8, ColorSpace::Rgb, vec![0; 191]);
    assert_eq!(
        compress(&short, &params),
        Err(CodecError::BadImageData {
            length: 191,
            required: 192
        })
    );
}

#[test]
fn test_validation_precedes_allocation() {
    let mut codec = Codec::with_platform(Budgeted::new(1 << 20));
    let image = Image::new(0, 8, ColorSpace::Grayscale, vec![0; 64]);

    assert!(codec.compress(&image, &CompressionParameters::default()).is_err());
    assert_eq!(codec.platform().allocated(), 0);
}

#[test]
fn test_allocation_budget() {
    let image = rgb_gradient(32, 32);
    let params = CompressionParameters::default();

    let mut codec = Codec::with_platform(Budgeted::new(4096));
    let result = codec.compress(&image, &params);
    assert!(matches!(result, Err(CodecError::AllocationFailed { .. })));
    assert_eq!(result.unwrap_err().code(), -3);

    // Planes, blocks and coefficients: 9 buffers of 1024 i32
    let mut codec = Codec::with_platform(Budgeted::new(9 * 1024 * 4));
    let compressed = codec.compress(&image, &params).unwrap();
    assert_eq!(codec.platform().remaining(), 0);

    // Blocks, planes and the RGB output
    codec.platform_mut().reset();
    codec.decompress(&compressed).unwrap();
    assert_eq!(codec.platform().allocated(), 6 * 1024 * 4 + 32 * 32 * 3);

    let mut codec = Codec::with_platform(Budgeted::new(6 * 1024 * 4));
    assert!(matches!(
        codec.decompress(&compressed),
        Err(CodecError::AllocationFailed { .. })
    ));
}

#[test]
fn test_cooperative_yield() {
    let yields = Cell::new(0);
    let platform = Cooperative::new(Heap, 2, || yields.set(yields.get() + 1));
    let mut codec = Codec::with_platform(platform);

    // 3 x 2 blocks
    let image = rgb_gradient(24, 16);
    let compressed = codec.compress(&image, &CompressionParameters::default()).unwrap();
    assert_eq!(yields.get(), 3);

    codec.decompress(&compressed).unwrap();
    assert_eq!(yields.get(), 6);
}

#[test]
fn test_codec_matches_free_functions() {
    let image = rgb_gradient(19, 13);
    let params = params(TransformMethod::Approximate, 3.0, false);

    let mut codec = Codec::new();
    let a = codec.compress(&image, &params).unwrap();
    let b = compress(&image, &params).unwrap();
    assert_eq!(a, b);
    assert_eq!(codec.decompress(&a).unwrap(), decompress(&b).unwrap());

    free_compressed(a);
    free_image(decompress(&b).unwrap());
}

#[test]
fn test_thread_safety() {
    fn assert_send_sync<T: Send + Sync>() {}

    assert_send_sync::<Image>();
    assert_send_sync::<CompressedImage>();
    assert_send_sync::<CompressionParameters>();
}

#[test]
fn test_version() {
    assert_eq!(version(), "1.0.0");
    assert_eq!(version().split('.').count(), 3);
}
