use super::{div_round_wide, BlockTransform, FIX_SCALE};

// round(cos(pi * k * (2n + 1) / 16) * 2^20)
static COSINES: [[i64; 8]; 8] = [
    [1048576, 1048576, 1048576, 1048576, 1048576, 1048576, 1048576, 1048576],
    [1028428, 871859, 582558, 204567, -204567, -582558, -871859, -1028428],
    [968758, 401273, -401273, -968758, -968758, -401273, 401273, 968758],
    [871859, -204567, -1028428, -582558, 582558, 1028428, 204567, -871859],
    [741455, -741455, -741455, 741455, 741455, -741455, -741455, 741455],
    [582558, -1028428, 204567, 871859, -871859, -204567, 1028428, -582558],
    [401273, -968758, 968758, -401273, -401273, 968758, -968758, 401273],
    [204567, -582558, 871859, -1028428, 1028428, -871859, 582558, -204567],
];

// Orthonormal row scale: sqrt(1/8) for DC, sqrt(2/8) otherwise
static NORMS: [i64; 8] = [370728, 524288, 524288, 524288, 524288, 524288, 524288, 524288];

// Norm and cosine together are 2^40, past i64 for large coefficients
const SCALE: i128 = (FIX_SCALE as i128) * (FIX_SCALE as i128);

/// Reference transform, a plain product with the cosine basis.
pub struct Matrix;

impl BlockTransform for Matrix {
    fn forward_1d(input: &[i32; 8]) -> [i32; 8] {
        let mut out = [0i32; 8];

        for (k, value) in out.iter_mut().enumerate() {
            let sum: i128 = input
                .iter()
                .zip(COSINES[k].iter())
                .map(|(&x, &c)| i128::from(x) * i128::from(c))
                .sum();

            *value = div_round_wide(sum * i128::from(NORMS[k]), SCALE);
        }

        out
    }

    fn inverse_1d(input: &[i32; 8]) -> [i32; 8] {
        let mut out = [0i32; 8];

        for (n, value) in out.iter_mut().enumerate() {
            let sum: i128 = (0..8)
                .map(|k| i128::from(input[k]) * i128::from(NORMS[k] * COSINES[k][n]))
                .sum();

            *value = div_round_wide(sum, SCALE);
        }

        out
    }
}
