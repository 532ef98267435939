use alloc::boxed::Box;

/// Quantization step per coefficient, row-major
pub type QuantizationTable = [i32; 64];

/// 16 bit fixed-point reciprocals of a [QuantizationTable]
pub type ReciprocalTable = [i32; 64];

/// # Base tables that get scaled by the quality factor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantizationTableType {
    /// Sample quantization tables given in Annex K (Clause K.1) of
    /// Recommendation ITU-T T.81 (1992) | ISO/IEC 10918-1:1994.
    Standard,

    /// Flat
    Flat,

    /// Custom luma and chroma tables, row-major
    Custom {
        luma: Box<[u16; 64]>,
        chroma: Box<[u16; 64]>,
    },
}

impl QuantizationTableType {
    pub fn luma(&self) -> &[u16; 64] {
        use QuantizationTableType::*;

        match self {
            Standard => &Q50_LUMA,
            Flat => &FLAT,
            Custom { luma, .. } => luma,
        }
    }

    pub fn chroma(&self) -> &[u16; 64] {
        use QuantizationTableType::*;

        match self {
            Standard => &Q50_CHROMA,
            Flat => &FLAT,
            Custom { chroma, .. } => chroma,
        }
    }
}

impl Default for QuantizationTableType {
    fn default() -> Self {
        QuantizationTableType::Standard
    }
}

/// Annex K luminance table at quality 50
pub static Q50_LUMA: [u16; 64] = [
    16, 11, 10, 16, 24, 40, 51, 61, 12, 12, 14, 19, 26, 58, 60, 55, 14, 13, 16, 24, 40, 57, 69,
    56, 14, 17, 22, 29, 51, 87, 80, 62, 18, 22, 37, 56, 68, 109, 103, 77, 24, 35, 55, 64, 81,
    104, 113, 92, 49, 64, 78, 87, 103, 121, 120, 101, 72, 92, 95, 98, 112, 100, 103, 99,
];

/// Annex K chrominance table at quality 50
pub static Q50_CHROMA: [u16; 64] = [
    17, 18, 24, 47, 99, 99, 99, 99, 18, 21, 26, 66, 99, 99, 99, 99, 24, 26, 56, 99, 99, 99, 99,
    99, 47, 66, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99,
];

static FLAT: [u16; 64] = [16; 64];

/// Zigzag position of every row-major coefficient index
pub static ZIGZAG: [u8; 64] = [
    0, 1, 5, 6, 14, 15, 27, 28, 2, 4, 7, 13, 16, 26, 29, 42, 3, 8, 12, 17, 25, 30, 41, 43, 9, 11,
    18, 24, 31, 40, 44, 53, 10, 19, 23, 32, 39, 45, 52, 54, 20, 22, 33, 38, 46, 51, 55, 60, 21,
    34, 37, 47, 50, 56, 59, 61, 35, 36, 48, 49, 57, 58, 62, 63,
];

// Row norms of the multiplierless transform, sqrt({8, 6, 4, 6, ..}) * 1024
static APPROX_NORMS: [i64; 8] = [2896, 2508, 2048, 2508, 2896, 2508, 2048, 2508];

const QUALITY_SHIFT: u32 = 10;
const RECIPROCAL_SHIFT: u32 = 16;

/// Scales a base table by the quality factor `k` (larger is coarser).
///
/// `k` is converted to 10 bit fixed point; every entry is at least 1.
pub fn scale_quant_table(base: &[u16; 64], k: f32) -> QuantizationTable {
    // Saturating cast, NaN becomes 0
    let k_fixed = i64::from((k * (1 << QUALITY_SHIFT) as f32) as i32);

    let mut table = [0; 64];
    for (entry, &base) in table.iter_mut().zip(base.iter()) {
        let scaled = (i64::from(base) * k_fixed) >> QUALITY_SHIFT;
        *entry = scaled.clamp(1, i64::from(i32::MAX)) as i32;
    }
    table
}

pub fn compute_reciprocal_table(table: &QuantizationTable) -> ReciprocalTable {
    let mut recip = [0; 64];
    for (r, &q) in recip.iter_mut().zip(table.iter()) {
        let q = i64::from(q.max(1));
        *r = (((1i64 << RECIPROCAL_SHIFT) + q / 2) / q) as i32;
    }
    recip
}

/// Quantizes a block with reciprocal multiplication instead of division.
///
/// The estimate is corrected against the remainder, so the result is always
/// identical to [quantize].
pub fn quantize_fast(
    block: &[i32; 64],
    table: &QuantizationTable,
    recip: &ReciprocalTable,
    out: &mut [i32; 64],
) {
    for i in 0..64 {
        out[i] = quantize_value_fast(block[i], table[i], recip[i]);
    }
}

#[inline(always)]
fn quantize_value_fast(value: i32, q: i32, recip: i32) -> i32 {
    let q = i64::from(q);
    let n = i64::from(value).abs() + (q >> 1);

    let mut estimate = (n * i64::from(recip)) >> RECIPROCAL_SHIFT;
    while estimate * q > n {
        estimate -= 1;
    }
    while (estimate + 1) * q <= n {
        estimate += 1;
    }

    let estimate = estimate as i32;
    if value < 0 {
        -estimate
    } else {
        estimate
    }
}

/// Division based quantization, rounding half away from zero.
pub fn quantize(block: &[i32; 64], table: &QuantizationTable, out: &mut [i32; 64]) {
    for i in 0..64 {
        let q = i64::from(table[i]);
        let value = i64::from(block[i]);
        let half = q >> 1;

        out[i] = if value >= 0 {
            (value + half) / q
        } else {
            (value - half) / q
        } as i32;
    }
}

pub fn dequantize(block: &[i32; 64], table: &QuantizationTable, out: &mut [i32; 64]) {
    for i in 0..64 {
        out[i] = block[i].saturating_mul(table[i]);
    }
}

/// Rescales a table for the multiplierless transform, whose basis rows are
/// not normalized. Entry (i, j) is multiplied by `norm_i * norm_j`.
pub fn apply_approx_norm_correction(table: &mut QuantizationTable) {
    for (i, row) in table.chunks_exact_mut(8).enumerate() {
        for (j, entry) in row.iter_mut().enumerate() {
            let scaled = (i64::from(*entry) * APPROX_NORMS[i] * APPROX_NORMS[j] + (1 << 19)) >> 20;
            *entry = scaled.clamp(1, i64::from(i32::MAX)) as i32;
        }
    }
}

/// Luma and chroma tables, with their reciprocals, for one codec call
#[derive(Debug, Clone)]
pub(crate) struct QuantizationTables {
    pub(crate) luma: QuantizationTable,
    pub(crate) chroma: QuantizationTable,
    pub(crate) luma_recip: ReciprocalTable,
    pub(crate) chroma_recip: ReciprocalTable,
}

impl QuantizationTables {
    pub(crate) fn new(tables: &QuantizationTableType, quality: f32, norm_corrected: bool) -> Self {
        let mut luma = scale_quant_table(tables.luma(), quality);
        let mut chroma = scale_quant_table(tables.chroma(), quality);

        if norm_corrected {
            apply_approx_norm_correction(&mut luma);
            apply_approx_norm_correction(&mut chroma);
        }

        QuantizationTables {
            luma_recip: compute_reciprocal_table(&luma),
            chroma_recip: compute_reciprocal_table(&chroma),
            luma,
            chroma,
        }
    }

    /// Table and reciprocals for channel 0 (luma), 1 and 2 (chroma)
    pub(crate) fn channel(&self, channel: usize) -> (&QuantizationTable, &ReciprocalTable) {
        if channel == 0 {
            (&self.luma, &self.luma_recip)
        } else {
            (&self.chroma, &self.chroma_recip)
        }
    }
}
