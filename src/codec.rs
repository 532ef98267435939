use alloc::vec::Vec;

use arrayref::{array_mut_ref, array_ref};

use crate::blocks::{extract_blocks, reconstruct_plane, BlockGrid, BLOCK_LEN};
use crate::color_transform::{grayscale_to_planes, rgb_to_ycbcr_planes, ycbcr_to_rgb_planes};
use crate::dct::{Approximate, BlockTransform, Identity, Loeffler, Matrix, TransformMethod};
use crate::error::CodecResult;
use crate::image::{ColorSpace, Image};
use crate::platform::{Heap, Platform, YieldPoint};
use crate::quantization::{dequantize, quantize_fast, QuantizationTableType, QuantizationTables};

/// Conventional range of the quality factor
const QUALITY_RANGE: (f32, f32) = (1.0, 8.0);

/// # Settings for a compress call
#[derive(Clone, Debug, PartialEq)]
pub struct CompressionParameters {
    quality: f32,
    transform_method: TransformMethod,
    quantization_tables: QuantizationTableType,
    skip_quantization: bool,
    retain_raw_coefficients: bool,
}

impl CompressionParameters {
    /// Parameters with the given quality factor
    ///
    /// The quality factor scales the Q50 tables; 1.0 uses them unchanged and
    /// larger values quantize more coarsely. Uses the Loeffler transform and
    /// the standard tables by default.
    pub fn new(quality: f32) -> CompressionParameters {
        let mut params = CompressionParameters {
            quality: 1.0,
            transform_method: TransformMethod::default(),
            quantization_tables: QuantizationTableType::Standard,
            skip_quantization: false,
            retain_raw_coefficients: true,
        };
        params.set_quality(quality);
        params
    }

    pub fn set_quality(&mut self, quality: f32) {
        if !quality.is_finite() {
            log::warn!("Quality factor {} is not finite", quality);
        } else if quality < QUALITY_RANGE.0 || quality > QUALITY_RANGE.1 {
            log::warn!(
                "Quality factor {} is outside of the conventional range {}..={}",
                quality,
                QUALITY_RANGE.0,
                QUALITY_RANGE.1
            );
        }

        self.quality = quality;
    }

    pub fn quality(&self) -> f32 {
        self.quality
    }

    pub fn set_transform_method(&mut self, method: TransformMethod) {
        self.transform_method = method;
    }

    pub fn transform_method(&self) -> TransformMethod {
        self.transform_method
    }

    /// Set the base tables scaled by the quality factor
    pub fn set_quantization_tables(&mut self, tables: QuantizationTableType) {
        self.quantization_tables = tables;
    }

    pub fn quantization_tables(&self) -> &QuantizationTableType {
        &self.quantization_tables
    }

    /// Whether the standard Q50 tables are used
    pub fn use_standard_tables(&self) -> bool {
        self.quantization_tables == QuantizationTableType::Standard
    }

    /// Store the transform output without quantizing it
    pub fn set_skip_quantization(&mut self, skip: bool) {
        self.skip_quantization = skip;
    }

    pub fn skip_quantization(&self) -> bool {
        self.skip_quantization
    }

    /// Keep the unquantized transform output in the [CompressedImage]
    pub fn set_retain_raw_coefficients(&mut self, retain: bool) {
        self.retain_raw_coefficients = retain;
    }

    pub fn retain_raw_coefficients(&self) -> bool {
        self.retain_raw_coefficients
    }

    fn norm_corrected(&self) -> bool {
        self.transform_method == TransformMethod::Approximate && !self.skip_quantization
    }
}

impl Default for CompressionParameters {
    fn default() -> Self {
        CompressionParameters::new(1.0)
    }
}

/// # Channels of a compressed image
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Component {
    Y,
    Cb,
    Cr,
}

impl Component {
    pub const ALL: [Component; 3] = [Component::Y, Component::Cb, Component::Cr];

    fn index(self) -> usize {
        match self {
            Component::Y => 0,
            Component::Cb => 1,
            Component::Cr => 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Coefficients {
    pub(crate) raw: Option<Vec<i32>>,
    pub(crate) quantized: Vec<i32>,
}

/// # Output of [compress]
///
/// Every coefficient array holds `num_blocks * 64` values in row-major block
/// order, row-major within a block. Only [compress] and
/// [unpack_quantized](crate::transport::unpack_quantized) construct it.
#[derive(Clone, Debug, PartialEq)]
pub struct CompressedImage {
    width: i32,
    height: i32,
    quality: f32,
    transform_method: TransformMethod,
    num_blocks: usize,
    skip_quantization: bool,
    quantization_tables: QuantizationTableType,
    components: [Coefficients; 3],
}

impl CompressedImage {
    /// Callers guarantee that every array holds `num_blocks * 64` values.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        width: i32,
        height: i32,
        quality: f32,
        transform_method: TransformMethod,
        num_blocks: usize,
        skip_quantization: bool,
        quantization_tables: QuantizationTableType,
        components: [Coefficients; 3],
    ) -> CompressedImage {
        debug_assert!(components.iter().all(|c| c.quantized.len() == num_blocks * BLOCK_LEN));

        CompressedImage {
            width,
            height,
            quality,
            transform_method,
            num_blocks,
            skip_quantization,
            quantization_tables,
            components,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn quality(&self) -> f32 {
        self.quality
    }

    pub fn transform_method(&self) -> TransformMethod {
        self.transform_method
    }

    /// Blocks per component, identical for luma and chroma
    pub fn num_blocks(&self) -> usize {
        self.num_blocks
    }

    pub fn skip_quantization(&self) -> bool {
        self.skip_quantization
    }

    pub fn quantization_tables(&self) -> &QuantizationTableType {
        &self.quantization_tables
    }

    /// Quantized coefficients (or the transform output if quantization was skipped)
    pub fn quantized(&self, component: Component) -> &[i32] {
        &self.components[component.index()].quantized
    }

    /// Transform output before quantization, if it was retained
    pub fn raw(&self, component: Component) -> Option<&[i32]> {
        self.components[component.index()].raw.as_deref()
    }

    /// Frees the unquantized transform output
    pub fn discard_raw_coefficients(&mut self) {
        for component in self.components.iter_mut() {
            component.raw = None;
        }
    }
}

/// # The codec
///
/// Runs [compress](Codec::compress) and [decompress](Codec::decompress) with
/// every intermediate buffer requested from its [Platform].
#[derive(Debug, Default)]
pub struct Codec<P: Platform = Heap> {
    platform: P,
}

impl Codec<Heap> {
    /// Codec using the global heap
    pub fn new() -> Codec<Heap> {
        Codec { platform: Heap }
    }
}

impl<P: Platform> Codec<P> {
    pub fn with_platform(platform: P) -> Codec<P> {
        Codec { platform }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn into_platform(self) -> P {
        self.platform
    }

    /// Transform and quantize an image
    ///
    /// The pixel buffer must hold `width * height` pixels of the image color space.
    pub fn compress(
        &mut self,
        image: &Image,
        params: &CompressionParameters,
    ) -> CodecResult<CompressedImage> {
        match params.transform_method {
            TransformMethod::Loeffler => self.compress_internal::<Loeffler>(image, params),
            TransformMethod::Matrix => self.compress_internal::<Matrix>(image, params),
            TransformMethod::Approximate => self.compress_internal::<Approximate>(image, params),
            TransformMethod::Identity => self.compress_internal::<Identity>(image, params),
        }
    }

    /// Reconstruct an RGB image
    pub fn decompress(&mut self, compressed: &CompressedImage) -> CodecResult<Image> {
        match compressed.transform_method {
            TransformMethod::Loeffler => self.decompress_internal::<Loeffler>(compressed),
            TransformMethod::Matrix => self.decompress_internal::<Matrix>(compressed),
            TransformMethod::Approximate => self.decompress_internal::<Approximate>(compressed),
            TransformMethod::Identity => self.decompress_internal::<Identity>(compressed),
        }
    }

    fn compress_internal<T: BlockTransform>(
        &mut self,
        image: &Image,
        params: &CompressionParameters,
    ) -> CodecResult<CompressedImage> {
        let pixels = image.validate()?;
        let width = image.width() as usize;
        let height = image.height() as usize;
        let grid = BlockGrid::new(width, height);
        let num_blocks = grid.num_blocks();

        let tables = QuantizationTables::new(
            &params.quantization_tables,
            params.quality,
            params.norm_corrected(),
        );

        let mut planes: [Vec<i32>; 3] = [
            self.platform.allocate(pixels, "allocating Y plane")?,
            self.platform.allocate(pixels, "allocating Cb plane")?,
            self.platform.allocate(pixels, "allocating Cr plane")?,
        ];

        {
            let [y, cb, cr] = &mut planes;
            match image.color_space() {
                ColorSpace::Rgb => rgb_to_ycbcr_planes(image.data(), y, cb, cr),
                ColorSpace::Grayscale => grayscale_to_planes(image.data(), y, cb, cr),
            }
        }

        // The block buffers are transformed in place and become the raw coefficients
        let mut raw: [Vec<i32>; 3] = [
            extract_blocks(&mut self.platform, &planes[0], width, height)?,
            extract_blocks(&mut self.platform, &planes[1], width, height)?,
            extract_blocks(&mut self.platform, &planes[2], width, height)?,
        ];
        drop(planes);

        let mut quantized: [Vec<i32>; 3] = [
            self.platform.allocate(grid.blocks_len(), "allocating Y coefficients")?,
            self.platform.allocate(grid.blocks_len(), "allocating Cb coefficients")?,
            self.platform.allocate(grid.blocks_len(), "allocating Cr coefficients")?,
        ];

        let mut yield_point = YieldPoint::new(&self.platform);
        let mut coefficients = [0i32; 64];

        for block in 0..num_blocks {
            let offset = block * BLOCK_LEN;

            for channel in 0..3 {
                let raw_block = array_mut_ref![raw[channel], offset, BLOCK_LEN];
                let out = array_mut_ref![quantized[channel], offset, BLOCK_LEN];

                T::forward(raw_block, &mut coefficients);
                *raw_block = coefficients;

                if params.skip_quantization {
                    *out = coefficients;
                } else {
                    let (table, recip) = tables.channel(channel);
                    quantize_fast(&coefficients, table, recip, out);
                }
            }

            yield_point.block_done(&mut self.platform);
        }

        log::debug!(
            "Compressed {}x{} image into {} blocks per component ({}, quality {}, skip: {})",
            width,
            height,
            num_blocks,
            params.transform_method,
            params.quality,
            params.skip_quantization
        );

        let [raw_y, raw_cb, raw_cr] = raw;
        let [quantized_y, quantized_cb, quantized_cr] = quantized;
        let keep = |raw: Vec<i32>| params.retain_raw_coefficients.then(|| raw);

        Ok(CompressedImage::from_parts(
            image.width(),
            image.height(),
            params.quality,
            params.transform_method,
            num_blocks,
            params.skip_quantization,
            params.quantization_tables.clone(),
            [
                Coefficients {
                    raw: keep(raw_y),
                    quantized: quantized_y,
                },
                Coefficients {
                    raw: keep(raw_cb),
                    quantized: quantized_cb,
                },
                Coefficients {
                    raw: keep(raw_cr),
                    quantized: quantized_cr,
                },
            ],
        ))
    }

    fn decompress_internal<T: BlockTransform>(
        &mut self,
        compressed: &CompressedImage,
    ) -> CodecResult<Image> {
        let width = compressed.width as usize;
        let height = compressed.height as usize;
        let grid = BlockGrid::new(width, height);
        let num_blocks = compressed.num_blocks;

        let tables = (!compressed.skip_quantization).then(|| {
            let norm_corrected = compressed.transform_method == TransformMethod::Approximate;
            QuantizationTables::new(
                &compressed.quantization_tables,
                compressed.quality,
                norm_corrected,
            )
        });

        let mut spatial: [Vec<i32>; 3] = [
            self.platform.allocate(grid.blocks_len(), "allocating Y blocks")?,
            self.platform.allocate(grid.blocks_len(), "allocating Cb blocks")?,
            self.platform.allocate(grid.blocks_len(), "allocating Cr blocks")?,
        ];

        let mut yield_point = YieldPoint::new(&self.platform);
        let mut coefficients = [0i32; 64];

        for block in 0..num_blocks {
            let offset = block * BLOCK_LEN;

            for (channel, component) in compressed.components.iter().enumerate() {
                let input = array_ref![component.quantized, offset, BLOCK_LEN];
                let out = array_mut_ref![spatial[channel], offset, BLOCK_LEN];

                match &tables {
                    Some(tables) => dequantize(input, tables.channel(channel).0, &mut coefficients),
                    None => coefficients = *input,
                }

                T::inverse(&coefficients, out);
            }

            yield_point.block_done(&mut self.platform);
        }

        let pixels = grid.plane_len();
        let mut planes: [Vec<i32>; 3] = [
            self.platform.allocate(pixels, "allocating Y plane")?,
            self.platform.allocate(pixels, "allocating Cb plane")?,
            self.platform.allocate(pixels, "allocating Cr plane")?,
        ];

        for (blocks, plane) in spatial.iter().zip(planes.iter_mut()) {
            reconstruct_plane(blocks, width, height, plane)?;
        }
        drop(spatial);

        let mut rgb: Vec<u8> = self.platform.allocate(pixels * 3, "allocating RGB output")?;
        let [y, cb, cr] = &planes;
        ycbcr_to_rgb_planes(y, cb, cr, &mut rgb);

        log::debug!(
            "Decompressed {} blocks per component into {}x{} image ({})",
            num_blocks,
            width,
            height,
            compressed.transform_method
        );

        Ok(Image::new(
            compressed.width,
            compressed.height,
            ColorSpace::Rgb,
            rgb,
        ))
    }
}

/// Compress an image on the global heap
pub fn compress(image: &Image, params: &CompressionParameters) -> CodecResult<CompressedImage> {
    Codec::new().compress(image, params)
}

/// Decompress an image on the global heap
pub fn decompress(compressed: &CompressedImage) -> CodecResult<Image> {
    Codec::new().decompress(compressed)
}

/// Releases an image. Equivalent to dropping it.
pub fn free_image(image: Image) {
    drop(image);
}

/// Releases a compressed image with all of its coefficient arrays. Equivalent to dropping it.
pub fn free_compressed(compressed: CompressedImage) {
    drop(compressed);
}
