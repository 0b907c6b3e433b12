use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use lrsgd::ml::{SgdLogReg, SparseVector};

const N_FEATURE: usize = 1 << 16;

fn example(len: usize) -> SparseVector {
    let stride = N_FEATURE / len;
    SparseVector::new((0..len).map(|i| (i * stride, ((i % 7) as f64 - 3.0) * 0.1)))
        .expect("strided indices are unique")
}

fn bench_predict(c: &mut Criterion) {
    let mut model = SgdLogReg::new(0.1, 0.01, N_FEATURE);
    for len in [16usize, 256, 4_096] {
        let x = example(len);
        model.fit(&x, 1.0).expect("fit");
        c.bench_with_input(BenchmarkId::new("predict_probability", len), &x, |b, x| {
            b.iter(|| model.predict_probability(black_box(x)).expect("predict"));
        });
    }
}

fn bench_fit(c: &mut Criterion) {
    for len in [16usize, 256, 4_096] {
        let x = example(len);
        let mut model = SgdLogReg::new(0.1, 0.01, N_FEATURE);
        let mut label = 0.0;
        c.bench_with_input(BenchmarkId::new("fit", len), &x, |b, x| {
            b.iter(|| {
                label = 1.0 - label;
                model.fit(black_box(x), label).expect("fit");
            });
        });
    }
}

criterion_group!(benches, bench_predict, bench_fit);
criterion_main!(benches);
