// Loeffler, Ligtenberg and Moschytz, "Practical fast 1-D DCT algorithms with
// 11 multiplications" (1989), in 2^20 fixed point.
//
// Both directions keep every partial sum in i64 and divide exactly once per
// output sample, so rounding error does not accumulate between stages. No
// constant is applied twice to the same term, which leaves room for the full
// i32 range of dequantized coefficients.

use super::{div_round, BlockTransform, FIX_SCALE};

const C1: i64 = 1_028_428; // cos(pi/16)
const S1: i64 = 204_567; // sin(pi/16)
const C3: i64 = 871_859; // cos(3pi/16)
const S3: i64 = 582_558; // sin(3pi/16)
const C6: i64 = 401_273; // cos(6pi/16)
const S6: i64 = 968_758; // sin(6pi/16)
const R2: i64 = 1_482_910; // sqrt(2)
const C4: i64 = 741_455; // 1/sqrt(2)

pub struct Loeffler;

impl BlockTransform for Loeffler {
    fn forward_1d(input: &[i32; 8]) -> [i32; 8] {
        let x = input.map(i64::from);

        let s07 = x[0] + x[7];
        let d07 = x[0] - x[7];
        let s16 = x[1] + x[6];
        let d16 = x[1] - x[6];
        let s25 = x[2] + x[5];
        let d25 = x[2] - x[5];
        let s34 = x[3] + x[4];
        let d34 = x[3] - x[4];

        // Even part
        let e0 = s07 + s34;
        let e3 = s07 - s34;
        let e1 = s16 + s25;
        let e2 = s16 - s25;

        // Odd part
        let o0 = d07 + d34;
        let o1 = d16 + d25;
        let o2 = d16 - d25;
        let o3 = d07 - d34;

        let dc_scale = 2 * R2;
        let even_scale = 2 * FIX_SCALE;

        [
            div_round((e0 + e1) * FIX_SCALE, dc_scale),
            div_round(C3 * o0 + C1 * o1 + S1 * o2 + S3 * o3, dc_scale),
            div_round(C6 * e2 + S6 * e3, even_scale),
            div_round(S1 * o0 - C3 * o1 + S3 * o2 + C1 * o3, dc_scale),
            div_round((e0 - e1) * FIX_SCALE, dc_scale),
            div_round(C1 * o0 - S3 * o1 - C3 * o2 - S1 * o3, dc_scale),
            div_round(-S6 * e2 + C6 * e3, even_scale),
            div_round(-S3 * o0 + S1 * o1 - C1 * o2 + C3 * o3, dc_scale),
        ]
    }

    fn inverse_1d(input: &[i32; 8]) -> [i32; 8] {
        let x = input.map(i64::from);

        // All terms share the scale 2^20, so any i32 input fits in i64
        let t0 = x[0] * C4;
        let t4 = x[4] * C4;

        let a = t0 + t4;
        let b = t0 - t4;

        let even = [
            a + S6 * x[2] + C6 * x[6],
            b + C6 * x[2] - S6 * x[6],
            b - C6 * x[2] + S6 * x[6],
            a - S6 * x[2] - C6 * x[6],
        ];

        let odd = [
            C1 * x[1] + C3 * x[3] + S3 * x[5] + S1 * x[7],
            C3 * x[1] - S1 * x[3] - C1 * x[5] - S3 * x[7],
            S3 * x[1] - C1 * x[3] + S1 * x[5] + C3 * x[7],
            S1 * x[1] - S3 * x[3] + C3 * x[5] - C1 * x[7],
        ];

        let scale = 2 * FIX_SCALE;
        let mut out = [0i32; 8];

        for n in 0..4 {
            out[n] = div_round(even[n] + odd[n], scale);
            out[7 - n] = div_round(even[n] - odd[n], scale);
        }

        out
    }
}
