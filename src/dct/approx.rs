// Cintra and Bayer, "A DCT approximation for image compression" (2011).
//
// The basis has entries in {-1, 0, 1} only. Its rows are orthogonal but not
// normalized (squared norms 8, 6, 4, 6, 8, 6, 4, 6), so the forward output is
// unscaled and quantization tables must be norm corrected.

use super::{div_round, saturate, BlockTransform};

// 24 / squared row norm
static INVERSE_SCALE: [i64; 8] = [3, 4, 6, 4, 3, 4, 6, 4];

const INVERSE_DIVISOR: i64 = 24;

/// Multiplierless approximation, additions only.
pub struct Approximate;

impl BlockTransform for Approximate {
    fn forward_1d(input: &[i32; 8]) -> [i32; 8] {
        let [x0, x1, x2, x3, x4, x5, x6, x7] = input.map(i64::from);

        [
            x0 + x1 + x2 + x3 + x4 + x5 + x6 + x7,
            x0 + x1 + x2 - x5 - x6 - x7,
            x0 - x3 - x4 + x7,
            x0 - x2 - x3 + x4 + x5 - x7,
            x0 - x1 - x2 + x3 + x4 - x5 - x6 + x7,
            x0 - x1 + x3 - x4 + x6 - x7,
            -x1 + x2 + x5 - x6,
            -x1 + x2 - x3 + x4 - x5 + x6,
        ]
        .map(saturate)
    }

    fn inverse_1d(input: &[i32; 8]) -> [i32; 8] {
        let mut a = [0i64; 8];
        for ((a, &x), &scale) in a.iter_mut().zip(input.iter()).zip(INVERSE_SCALE.iter()) {
            *a = i64::from(x) * scale;
        }

        // Transposed basis
        let sums = [
            a[0] + a[1] + a[2] + a[3] + a[4] + a[5],
            a[0] + a[1] - a[4] - a[5] - a[6] - a[7],
            a[0] + a[1] - a[3] - a[4] + a[6] + a[7],
            a[0] - a[2] - a[3] + a[4] + a[5] - a[7],
            a[0] - a[2] + a[3] + a[4] - a[5] + a[7],
            a[0] - a[1] + a[3] - a[4] + a[6] - a[7],
            a[0] - a[1] - a[4] + a[5] - a[6] + a[7],
            a[0] - a[1] + a[2] - a[3] + a[4] - a[5],
        ];

        sums.map(|sum| div_round(sum, INVERSE_DIVISOR))
    }
}
