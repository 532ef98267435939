//! # Fixed-point 8×8 block transform codec
//!
//! Converts 8 bit RGB or grayscale images into quantized DCT coefficients and
//! back using integer arithmetic only. Four interchangeable transforms are
//! available: a Loeffler factorization, a direct matrix product, a
//! multiplierless approximation and the identity.
//!
//! The crate is `no_std` with `alloc`; every intermediate buffer can be
//! requested through a [Platform] to cap memory use or to yield to a
//! cooperative scheduler.
//!
//! # Example
//! ```no_run
//! use dct_codec::{
//!     compress, decompress, ColorSpace, CompressionParameters, Image, TransformMethod,
//! };
//!
//! # fn main() -> Result<(), dct_codec::CodecError> {
//! let pixels = vec![128u8; 64 * 48 * 3];
//! let image = Image::new(64, 48, ColorSpace::Rgb, pixels);
//!
//! let mut params = CompressionParameters::new(2.0);
//! params.set_transform_method(TransformMethod::Matrix);
//!
//! let compressed = compress(&image, &params)?;
//! let restored = decompress(&compressed)?;
//! assert_eq!(restored.width(), 64);
//! # Ok(())
//! # }
//! ```

#![no_std]

extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

mod blocks;
mod codec;
mod color_transform;
mod dct;
mod error;
mod image;
pub mod platform;
mod quantization;
pub mod transport;

#[cfg(test)]
mod tests;

pub use blocks::{extract_blocks, reconstruct_plane, BlockGrid, BLOCK_LEN, BLOCK_SIZE};
pub use codec::{
    compress, decompress, free_compressed, free_image, Codec, Component, CompressedImage,
    CompressionParameters,
};
pub use color_transform::{
    grayscale_to_planes, rgb565_to_rgb888, rgb_to_ycbcr_planes, ycbcr_to_rgb_planes, LUMA_OFFSET,
};
pub use dct::{
    forward as forward_transform, inverse as inverse_transform, BlockTransform, TransformMethod,
};
pub use error::{error_to_string, CodecError, CodecResult};
pub use image::{ColorSpace, Image};
pub use platform::{Budgeted, Cooperative, Heap, Platform};
pub use quantization::{
    apply_approx_norm_correction, compute_reciprocal_table, dequantize, quantize, quantize_fast,
    scale_quant_table, QuantizationTable, QuantizationTableType, ReciprocalTable, Q50_CHROMA,
    Q50_LUMA, ZIGZAG,
};

#[cfg(feature = "benchmark")]
pub use dct::{Approximate, Identity, Loeffler, Matrix};

/// Version of the codec as `"major.minor.patch"`
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
