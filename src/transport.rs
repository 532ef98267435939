//! 16 bit coefficient transport.
//!
//! The quantized planes travel as Y, Cb and Cr one after another, each in
//! row-major block order and row-major within a block, every value a little
//! endian `i16`. Geometry, method, quality and block count are carried out of
//! band in a [TransportHeader].

use alloc::vec::Vec;
use core::mem::size_of;

use byteorder::{ByteOrder, LittleEndian};

use crate::blocks::{BlockGrid, BLOCK_LEN};
use crate::codec::{Coefficients, CompressedImage, Component};
use crate::dct::TransformMethod;
use crate::error::{CodecError, CodecResult};
use crate::image::pixel_count;
use crate::platform::{Heap, Platform};
use crate::quantization::QuantizationTableType;

const VALUE_SIZE: usize = size_of::<i16>();

/// # Out of band description of a transported payload
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TransportHeader {
    pub width: i32,
    pub height: i32,
    pub method: TransformMethod,
    pub quality: f32,
    pub num_blocks: usize,

    /// Payload holds transform output instead of quantized values
    pub skip_quantization: bool,
}

impl TransportHeader {
    pub fn of(compressed: &CompressedImage) -> TransportHeader {
        TransportHeader {
            width: compressed.width(),
            height: compressed.height(),
            method: compressed.transform_method(),
            quality: compressed.quality(),
            num_blocks: compressed.num_blocks(),
            skip_quantization: compressed.skip_quantization(),
        }
    }

    /// Bytes of one component, `None` if the block count is too large to address
    pub fn component_len(&self) -> Option<usize> {
        self.num_blocks.checked_mul(BLOCK_LEN * VALUE_SIZE)
    }

    /// Bytes of the whole payload, `None` if the block count is too large to address
    pub fn payload_len(&self) -> Option<usize> {
        self.component_len()?.checked_mul(3)
    }

    fn checked_component_len(&self) -> CodecResult<usize> {
        self.payload_len()
            .and(self.component_len())
            .ok_or(CodecError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })
    }
}

/// Serializes the quantized planes of `compressed`.
///
/// Fails with [CodecError::CoefficientOutOfRange] if a value does not fit
/// into an `i16`. The receiver rebuilds the standard tables; images
/// quantized with other tables can not be decompressed on the other side.
pub fn pack_quantized(compressed: &CompressedImage) -> CodecResult<Vec<u8>> {
    pack_quantized_with(&mut Heap, compressed)
}

/// [pack_quantized] with the payload requested from `platform`.
pub fn pack_quantized_with<P: Platform>(
    platform: &mut P,
    compressed: &CompressedImage,
) -> CodecResult<Vec<u8>> {
    if !compressed.skip_quantization()
        && *compressed.quantization_tables() != QuantizationTableType::Standard
    {
        log::warn!("Packing coefficients quantized with non standard tables");
    }

    let header = TransportHeader::of(compressed);
    let component_len = header.checked_component_len()?;
    let mut payload: Vec<u8> = platform.allocate(component_len * 3, "packing coefficients")?;

    for (index, component) in Component::ALL.iter().enumerate() {
        let out = &mut payload[index * component_len..][..component_len];
        let first_index = index * header.num_blocks * BLOCK_LEN;
        pack_component(compressed.quantized(*component), out, first_index)?;
    }

    log::debug!(
        "Packed {} blocks per component into {} bytes",
        header.num_blocks,
        payload.len()
    );

    Ok(payload)
}

fn pack_component(values: &[i32], out: &mut [u8], first_index: usize) -> CodecResult<()> {
    for (i, (&value, dst)) in values.iter().zip(out.chunks_exact_mut(VALUE_SIZE)).enumerate() {
        let value = i16::try_from(value).map_err(|_| CodecError::CoefficientOutOfRange {
            index: first_index + i,
            value,
        })?;
        LittleEndian::write_i16(dst, value);
    }
    Ok(())
}

/// Rebuilds a [CompressedImage] from a header and its payload.
///
/// The block count must match the geometry and the payload must hold exactly
/// [TransportHeader::payload_len] bytes; either mismatch is reported as
/// [CodecError::TransportLength] against the size the geometry requires. Raw
/// coefficients are not transported.
pub fn unpack_quantized(header: &TransportHeader, payload: &[u8]) -> CodecResult<CompressedImage> {
    unpack_quantized_with(&mut Heap, header, payload)
}

/// [unpack_quantized] with the coefficient arrays requested from `platform`.
pub fn unpack_quantized_with<P: Platform>(
    platform: &mut P,
    header: &TransportHeader,
    payload: &[u8],
) -> CodecResult<CompressedImage> {
    if payload.is_empty() {
        return Err(CodecError::NullPointer);
    }

    pixel_count(header.width, header.height)?;
    let grid = BlockGrid::new(header.width as usize, header.height as usize);

    let expected = TransportHeader {
        num_blocks: grid.num_blocks(),
        ..*header
    };
    let component_len = expected.checked_component_len()?;
    let required = component_len * 3;

    if header.num_blocks != grid.num_blocks() || payload.len() != required {
        return Err(CodecError::TransportLength {
            length: payload.len(),
            required,
        });
    }

    let values = grid.blocks_len();
    let (y, rest) = payload.split_at(component_len);
    let (cb, cr) = rest.split_at(component_len);
    let [y, cb, cr] = [
        unpack_component(platform, y, values)?,
        unpack_component(platform, cb, values)?,
        unpack_component(platform, cr, values)?,
    ];

    log::debug!(
        "Unpacked {}x{} image with {} blocks per component ({})",
        header.width,
        header.height,
        header.num_blocks,
        header.method
    );

    Ok(CompressedImage::from_parts(
        header.width,
        header.height,
        header.quality,
        header.method,
        header.num_blocks,
        header.skip_quantization,
        QuantizationTableType::Standard,
        [
            Coefficients { raw: None, quantized: y },
            Coefficients { raw: None, quantized: cb },
            Coefficients { raw: None, quantized: cr },
        ],
    ))
}

fn unpack_component<P: Platform>(
    platform: &mut P,
    bytes: &[u8],
    values: usize,
) -> CodecResult<Vec<i32>> {
    let mut out: Vec<i32> = platform.allocate(values, "unpacking coefficients")?;
    for (dst, src) in out.iter_mut().zip(bytes.chunks_exact(VALUE_SIZE)) {
        *dst = i32::from(LittleEndian::read_i16(src));
    }
    Ok(out)
}
