use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use winfilt_array::Array2;
use winfilt_filter::{
    kernels, AnyKernel, AnySeparableKernel, Boundary, Convolution, Filter2d, Kernel2d,
    SeparableFilter2d, SeparableKernel,
};

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("Windowed Filter");

    for (rows, cols) in [(256, 256), (512, 512)].iter() {
        for kernel_size in [3, 5, 9].iter() {
            group.throughput(criterion::Throughput::Elements(
                (*rows * *cols * *kernel_size) as u64,
            ));

            let parameter_string = format!("{}x{}x{}", rows, cols, kernel_size);

            let src = Array2::from_val(*rows, *cols, 1.0f32);
            let dst = Array2::from_val(*rows, *cols, 0.0f32);

            let gauss = kernels::gaussian_kernel_1d(*kernel_size, 1.5).unwrap();
            let separable = SeparableFilter2d::<f32, Convolution<f32>>::from_any(
                AnyKernel::Separable(AnySeparableKernel::F32(SeparableKernel::new(
                    gauss.clone(),
                    gauss.clone(),
                ))),
            )
            .unwrap();

            let dense_pair = SeparableKernel::new(gauss.clone(), gauss);
            let dense: Kernel2d<f32> = dense_pair.to_dense().unwrap();
            let mut dense = Filter2d::<f32, Convolution<f32>>::new(dense);

            group.bench_with_input(
                BenchmarkId::new("separable_f32", &parameter_string),
                &(&src, &dst),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| black_box(separable.apply(src, &mut dst, Boundary::Mirror)))
                },
            );

            group.bench_with_input(
                BenchmarkId::new("dense_f32", &parameter_string),
                &(&src, &dst),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| black_box(dense.apply(src, &mut dst, Boundary::Mirror)))
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_filter);
criterion_main!(benches);
