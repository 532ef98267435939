use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dct_codec::{
    compute_reciprocal_table, quantize, quantize_fast, scale_quant_table, Approximate,
    BlockTransform, Loeffler, Matrix, Q50_LUMA,
};

fn create_block() -> [i32; 64] {
    let mut block = [0i32; 64];
    for (i, v) in block.iter_mut().enumerate() {
        *v = ((i * 37) % 256) as i32 - 128;
    }
    block
}

fn transform_benchmark(c: &mut Criterion) {
    let block = create_block();
    let mut out = [0i32; 64];

    c.bench_function("forward loeffler", |b| {
        b.iter(|| Loeffler::forward(black_box(&block), &mut out))
    });
    c.bench_function("forward matrix", |b| {
        b.iter(|| Matrix::forward(black_box(&block), &mut out))
    });
    c.bench_function("forward approx", |b| {
        b.iter(|| Approximate::forward(black_box(&block), &mut out))
    });

    let mut coefficients = [0i32; 64];
    Loeffler::forward(&block, &mut coefficients);

    c.bench_function("inverse loeffler", |b| {
        b.iter(|| Loeffler::inverse(black_box(&coefficients), &mut out))
    });
    c.bench_function("inverse matrix", |b| {
        b.iter(|| Matrix::inverse(black_box(&coefficients), &mut out))
    });
}

fn quantization_benchmark(c: &mut Criterion) {
    let mut coefficients = [0i32; 64];
    Loeffler::forward(&create_block(), &mut coefficients);

    let table = scale_quant_table(&Q50_LUMA, 2.0);
    let recip = compute_reciprocal_table(&table);
    let mut out = [0i32; 64];

    c.bench_function("quantize fast", |b| {
        b.iter(|| quantize_fast(black_box(&coefficients), &table, &recip, &mut out))
    });
    c.bench_function("quantize division", |b| {
        b.iter(|| quantize(black_box(&coefficients), &table, &mut out))
    });
}

criterion_group!(benches, transform_benchmark, quantization_benchmark);
criterion_main!(benches);
