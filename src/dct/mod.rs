//! 8×8 forward and inverse transforms.
//!
//! Every algorithm implements [BlockTransform] through its 1D passes; the
//! separable 2D composition is shared. The codec picks the algorithm once per
//! call via [TransformMethod] and runs a block loop monomorphized for it.

use core::fmt::{self, Display, Formatter};
use core::str::FromStr;

use arrayref::array_ref;

use crate::error::CodecError;

mod approx;
mod loeffler;
mod matrix;

pub use self::approx::Approximate;
pub use self::loeffler::Loeffler;
pub use self::matrix::Matrix;

/// One fixed-point scale shared by the Loeffler and matrix transforms
pub(crate) const FIX_SCALE: i64 = 1 << 20;

/// # Transform algorithm
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TransformMethod {
    /// Loeffler-Ligtenberg-Moschytz factorization in 2^20 fixed point
    Loeffler,

    /// Direct multiplication with the cosine basis
    Matrix,

    /// Multiplierless Cintra-Bayer approximation
    Approximate,

    /// No transform
    Identity,
}

impl TransformMethod {
    pub const ALL: [TransformMethod; 4] = [
        TransformMethod::Loeffler,
        TransformMethod::Matrix,
        TransformMethod::Approximate,
        TransformMethod::Identity,
    ];

    /// Numeric index used by the C interface and the transport headers
    pub fn index(self) -> i32 {
        use TransformMethod::*;

        match self {
            Loeffler => 0,
            Matrix => 1,
            Approximate => 2,
            Identity => 3,
        }
    }

    pub fn name(self) -> &'static str {
        use TransformMethod::*;

        match self {
            Loeffler => "loeffler",
            Matrix => "matrix",
            Approximate => "approx",
            Identity => "identity",
        }
    }
}

impl Default for TransformMethod {
    fn default() -> Self {
        TransformMethod::Loeffler
    }
}

impl TryFrom<i32> for TransformMethod {
    type Error = CodecError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        TransformMethod::ALL
            .iter()
            .copied()
            .find(|method| method.index() == value)
            .ok_or(CodecError::InvalidMethod(value))
    }
}

impl FromStr for TransformMethod {
    type Err = CodecError;

    /// Names are matched case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransformMethod::ALL
            .iter()
            .copied()
            .find(|method| method.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CodecError::UnknownMethodName(s.into()))
    }
}

impl Display for TransformMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A separable 8×8 transform given by its 1D passes.
///
/// Implementors are unit types; the codec only ever calls the associated
/// functions, so every block loop is monomorphized for one algorithm.
pub trait BlockTransform {
    fn forward_1d(input: &[i32; 8]) -> [i32; 8];

    fn inverse_1d(input: &[i32; 8]) -> [i32; 8];

    /// Rows into a temporary, columns of the temporary into the output, then
    /// the output is transposed back to row-major frequency order.
    fn forward(input: &[i32; 64], output: &mut [i32; 64]) {
        let mut temp = [0i32; 64];

        for (src, dst) in input.chunks_exact(8).zip(temp.chunks_exact_mut(8)) {
            dst.copy_from_slice(&Self::forward_1d(array_ref![src, 0, 8]));
        }

        for (x, dst) in output.chunks_exact_mut(8).enumerate() {
            dst.copy_from_slice(&Self::forward_1d(&column(&temp, x)));
        }

        transpose(output);
    }

    /// Columns of the frequency input into a temporary, rows of the temporary
    /// into the spatial output.
    fn inverse(input: &[i32; 64], output: &mut [i32; 64]) {
        let mut temp = [0i32; 64];

        for x in 0..8 {
            let col = Self::inverse_1d(&column(input, x));
            for (y, &value) in col.iter().enumerate() {
                temp[y * 8 + x] = value;
            }
        }

        for (src, dst) in temp.chunks_exact(8).zip(output.chunks_exact_mut(8)) {
            dst.copy_from_slice(&Self::inverse_1d(array_ref![src, 0, 8]));
        }
    }
}

/// Exact copy in both directions.
pub struct Identity;

impl BlockTransform for Identity {
    fn forward_1d(input: &[i32; 8]) -> [i32; 8] {
        *input
    }

    fn inverse_1d(input: &[i32; 8]) -> [i32; 8] {
        *input
    }

    fn forward(input: &[i32; 64], output: &mut [i32; 64]) {
        output.copy_from_slice(input);
    }

    fn inverse(input: &[i32; 64], output: &mut [i32; 64]) {
        output.copy_from_slice(input);
    }
}

/// Forward transform of one block with the given method.
pub fn forward(method: TransformMethod, input: &[i32; 64], output: &mut [i32; 64]) {
    match method {
        TransformMethod::Loeffler => Loeffler::forward(input, output),
        TransformMethod::Matrix => Matrix::forward(input, output),
        TransformMethod::Approximate => Approximate::forward(input, output),
        TransformMethod::Identity => Identity::forward(input, output),
    }
}

/// Inverse transform of one block with the given method.
pub fn inverse(method: TransformMethod, input: &[i32; 64], output: &mut [i32; 64]) {
    match method {
        TransformMethod::Loeffler => Loeffler::inverse(input, output),
        TransformMethod::Matrix => Matrix::inverse(input, output),
        TransformMethod::Approximate => Approximate::inverse(input, output),
        TransformMethod::Identity => Identity::inverse(input, output),
    }
}

#[inline(always)]
fn column(block: &[i32; 64], x: usize) -> [i32; 8] {
    let mut col = [0i32; 8];
    for (y, value) in col.iter_mut().enumerate() {
        *value = block[y * 8 + x];
    }
    col
}

#[inline(always)]
fn transpose(block: &mut [i32; 64]) {
    for y in 0..8 {
        for x in (y + 1)..8 {
            block.swap(y * 8 + x, x * 8 + y);
        }
    }
}

/// Division rounding half away from zero, saturating to `i32`. `d` must be positive.
#[inline(always)]
pub(crate) fn div_round(n: i64, d: i64) -> i32 {
    let half = d >> 1;
    if n >= 0 {
        saturate((n + half) / d)
    } else {
        saturate((n - half) / d)
    }
}

/// [div_round] for sums that need more than 64 bits
#[inline(always)]
pub(crate) fn div_round_wide(n: i128, d: i128) -> i32 {
    let half = d >> 1;
    let q = if n >= 0 { (n + half) / d } else { (n - half) / d };
    saturate(q.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64)
}

#[inline(always)]
pub(crate) fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
