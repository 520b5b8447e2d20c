use criterion::{criterion_group, criterion_main, Criterion};
use ndarray::Array1;
use skyband_fft::{
    get_fft_maker, BackendOptions, Complex64, ElementKind, Samples, TransformRequest,
};

fn backends() -> &'static [&'static str] {
    if cfg!(feature = "planned") {
        &["direct", "planned"]
    } else {
        &["direct"]
    }
}

fn complex_block(n: usize) -> Samples {
    Samples::from(Array1::from_shape_fn(n, |i| {
        Complex64::new((i as f64 * 0.3).sin(), (i as f64 * 0.7).cos())
    }))
}

fn real_block(n: usize) -> Samples {
    Samples::from(Array1::from_shape_fn(n, |i| (i as f64 * 0.3).sin()))
}

fn bench_complex_forward(c: &mut Criterion) {
    let block = complex_block(1024);
    for &backend in backends() {
        let mut fft = get_fft_maker(backend, BackendOptions::default())
            .expect("backend should resolve")
            .make(&TransformRequest::new(vec![1024], ElementKind::Complex))
            .expect("transform should build");
        c.bench_function(&format!("complex_forward_1024_{backend}"), |b| {
            b.iter(|| fft.call(&block).expect("forward should succeed"));
        });
    }
}

fn bench_real_forward(c: &mut Criterion) {
    let block = real_block(4096);
    for &backend in backends() {
        let mut fft = get_fft_maker(backend, BackendOptions::default())
            .expect("backend should resolve")
            .make(&TransformRequest::new(vec![4096], ElementKind::Real))
            .expect("transform should build");
        c.bench_function(&format!("real_forward_4096_{backend}"), |b| {
            b.iter(|| fft.call(&block).expect("forward should succeed"));
        });
    }
}

fn bench_construction(c: &mut Criterion) {
    for &backend in backends() {
        let maker =
            get_fft_maker(backend, BackendOptions::default()).expect("backend should resolve");
        let request = TransformRequest::new(vec![4096], ElementKind::Real);
        c.bench_function(&format!("construction_4096_{backend}"), |b| {
            b.iter(|| maker.make(&request).expect("transform should build"));
        });
    }
}

#[cfg(feature = "planned")]
fn bench_inplace_roundtrip(c: &mut Criterion) {
    let mut fft = get_fft_maker(
        "planned",
        BackendOptions::default().with_overwrite_input(true),
    )
    .expect("backend should resolve")
    .make(&TransformRequest::new(vec![1024], ElementKind::Complex).with_ortho(true))
    .expect("transform should build");
    let mut ifft = fft.inverse();
    let mut block = complex_block(1024);
    c.bench_function("inplace_roundtrip_1024_planned", |b| {
        b.iter(|| {
            fft.call_inplace(&mut block).expect("forward should succeed");
            ifft.call_inplace(&mut block).expect("backward should succeed");
        });
    });
}

#[cfg(not(feature = "planned"))]
fn bench_inplace_roundtrip(_c: &mut Criterion) {}

criterion_group!(
    benches,
    bench_complex_forward,
    bench_real_forward,
    bench_construction,
    bench_inplace_roundtrip
);
criterion_main!(benches);
