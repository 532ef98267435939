// ITU-R BT.601 full range conversion in integer arithmetic.
//
// Coefficients are scaled by 1000 and every product sum gets a +500 bias
// before the (truncating) division, so no floating point is involved.

use byteorder::{BigEndian, ByteOrder};
use rgb::{FromSlice, RGB8};

const SCALE: i32 = 1000;
const BIAS: i32 = 500;

/// Level shift applied to luma so that it is centered around zero.
pub const LUMA_OFFSET: i32 = 128;

#[inline(always)]
pub fn rgb_to_ycbcr(pixel: RGB8) -> (i32, i32, i32) {
    let r = i32::from(pixel.r);
    let g = i32::from(pixel.g);
    let b = i32::from(pixel.b);

    let y = (299 * r + 587 * g + 114 * b + BIAS) / SCALE - LUMA_OFFSET;
    let cb = (-169 * r - 331 * g + 500 * b + BIAS) / SCALE;
    let cr = (500 * r - 419 * g - 81 * b + BIAS) / SCALE;

    (y, cb, cr)
}

#[inline(always)]
pub fn ycbcr_to_rgb(y: i32, cb: i32, cr: i32) -> RGB8 {
    // Decoded samples are not bounded by the 8 bit input range
    let y = i64::from(y) + i64::from(LUMA_OFFSET);
    let cb = i64::from(cb);
    let cr = i64::from(cr);
    let (scale, bias) = (i64::from(SCALE), i64::from(BIAS));

    let r = y + (1402 * cr + bias) / scale;
    let g = y - (344 * cb + 714 * cr + bias) / scale;
    let b = y + (1772 * cb + bias) / scale;

    RGB8::new(clamp_u8(r), clamp_u8(g), clamp_u8(b))
}

#[inline(always)]
fn clamp_u8(value: i64) -> u8 {
    value.clamp(0, 255) as u8
}

/// Converts an interleaved RGB buffer into three level shifted planes.
///
/// Converts as many pixels as the shortest of the buffers holds.
pub fn rgb_to_ycbcr_planes(rgb: &[u8], y: &mut [i32], cb: &mut [i32], cr: &mut [i32]) {
    let pixels = rgb.as_rgb();

    for (((&pixel, y), cb), cr) in pixels
        .iter()
        .zip(y.iter_mut())
        .zip(cb.iter_mut())
        .zip(cr.iter_mut())
    {
        let (luma, blue, red) = rgb_to_ycbcr(pixel);
        *y = luma;
        *cb = blue;
        *cr = red;
    }
}

/// Grayscale input goes straight into the luma plane, chroma planes are zero.
pub fn grayscale_to_planes(gray: &[u8], y: &mut [i32], cb: &mut [i32], cr: &mut [i32]) {
    for (((&value, y), cb), cr) in gray
        .iter()
        .zip(y.iter_mut())
        .zip(cb.iter_mut())
        .zip(cr.iter_mut())
    {
        *y = i32::from(value) - LUMA_OFFSET;
        *cb = 0;
        *cr = 0;
    }
}

/// Converts three planes back into an interleaved RGB buffer, clamping to 0..=255.
pub fn ycbcr_to_rgb_planes(y: &[i32], cb: &[i32], cr: &[i32], rgb: &mut [u8]) {
    let pixels = rgb.as_rgb_mut();

    for (((pixel, &y), &cb), &cr) in pixels.iter_mut().zip(y).zip(cb).zip(cr) {
        *pixel = ycbcr_to_rgb(y, cb, cr);
    }
}

/// Unpacks big endian RGB565 pixels (as delivered by camera DMA) into RGB888.
///
/// Byte 0 holds `RRRRRGGG`, byte 1 holds `GGGBBBBB`. The low bits of each
/// output channel are left at zero.
pub fn rgb565_to_rgb888(rgb565: &[u8], rgb: &mut [u8]) {
    let pixels = rgb.as_rgb_mut();

    for (src, dst) in rgb565.chunks_exact(2).zip(pixels.iter_mut()) {
        let value = BigEndian::read_u16(src);

        let r = (value >> 8) as u8 & 0xF8;
        let g = ((value >> 3) & 0xFC) as u8;
        let b = ((value & 0x1F) << 3) as u8;

        *dst = RGB8::new(r, g, b);
    }
}
