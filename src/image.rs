use alloc::vec::Vec;
use core::mem::size_of;

use crate::blocks::BLOCK_SIZE;
use crate::color_transform::rgb565_to_rgb888;
use crate::error::{CodecError, CodecResult};
use crate::platform::{Heap, Platform};

/// # Color space of the pixel buffer
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ColorSpace {
    /// Interleaved R, G, B bytes
    Rgb,

    /// One luma byte per pixel
    Grayscale,
}

impl ColorSpace {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            ColorSpace::Rgb => 3,
            ColorSpace::Grayscale => 1,
        }
    }
}

/// An 8 bit image, owned by whoever created it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    width: i32,
    height: i32,
    color_space: ColorSpace,
    data: Vec<u8>,
}

impl Image {
    /// Wraps a pixel buffer. The geometry is validated when the image is compressed.
    pub fn new(width: i32, height: i32, color_space: ColorSpace, data: Vec<u8>) -> Image {
        Image {
            width,
            height,
            color_space,
            data,
        }
    }

    /// Unpacks a big endian RGB565 frame into an RGB image.
    pub fn from_rgb565(width: i32, height: i32, rgb565: &[u8]) -> CodecResult<Image> {
        Image::from_rgb565_with(&mut Heap, width, height, rgb565)
    }

    /// [Image::from_rgb565] with the pixel buffer requested from `platform`.
    pub fn from_rgb565_with<P: Platform>(
        platform: &mut P,
        width: i32,
        height: i32,
        rgb565: &[u8],
    ) -> CodecResult<Image> {
        if rgb565.is_empty() {
            return Err(CodecError::NullPointer);
        }

        let pixels = pixel_count(width, height)?;

        let required = pixels
            .checked_mul(2)
            .ok_or(CodecError::InvalidDimensions { width, height })?;
        if rgb565.len() < required {
            return Err(CodecError::BadImageData {
                length: rgb565.len(),
                required,
            });
        }

        let mut data: Vec<u8> = platform.allocate(pixels * 3, "unpacking RGB565")?;
        rgb565_to_rgb888(&rgb565[..required], &mut data);

        Ok(Image::new(width, height, ColorSpace::Rgb, data))
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Checks the image in the order missing buffer, bad dimensions, short
    /// buffer and returns the number of pixels.
    pub(crate) fn validate(&self) -> CodecResult<usize> {
        if self.data.is_empty() {
            return Err(CodecError::NullPointer);
        }

        let pixels = pixel_count(self.width, self.height)?;
        let required = pixels
            .checked_mul(self.color_space.bytes_per_pixel())
            .ok_or(CodecError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })?;

        if self.data.len() < required {
            return Err(CodecError::BadImageData {
                length: self.data.len(),
                required,
            });
        }

        Ok(pixels)
    }
}

/// Number of pixels of a `width`×`height` image, both must be positive.
///
/// Also rejects images whose padded block planes, three of them in `i32`,
/// would not be addressable, so block grid arithmetic can not overflow.
pub(crate) fn pixel_count(width: i32, height: i32) -> CodecResult<usize> {
    let invalid = || CodecError::InvalidDimensions { width, height };
    if width <= 0 || height <= 0 {
        return Err(invalid());
    }

    let padded = |v: i32| {
        (v as usize)
            .checked_add(BLOCK_SIZE - 1)
            .map(|v| v / BLOCK_SIZE * BLOCK_SIZE)
    };
    padded(width)
        .zip(padded(height))
        .and_then(|(w, h)| w.checked_mul(h))
        .and_then(|samples| samples.checked_mul(3 * size_of::<i32>()))
        .ok_or_else(invalid)?;

    (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(invalid)
}
