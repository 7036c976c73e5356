//! Benchmarks for the supernodal LU engine.
//!
//! Includes:
//! - Random sparse matrices over GF(p) and Q
//! - Banded matrices, which form wide supernodes
//! - Refactorization with a reused row permutation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use exactlu::prelude::*;

const PRIME: u64 = 65_521;

/// Random matrix with a nonzero diagonal and `per_col` extra entries per column.
fn random_sparse<F: Field>(
    field: &F,
    n: usize,
    per_col: usize,
    seed: u64,
) -> CscMatrix<F::Element> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut triplets = Vec::with_capacity(n * (per_col + 1));
    for col in 0..n {
        triplets.push((col, col, field.init(rng.gen_range(1..1000))));
        for _ in 0..per_col {
            let row = rng.gen_range(0..n);
            triplets.push((row, col, field.init(rng.gen_range(-1000..1000))));
        }
    }
    CscMatrix::from_triplets(field, n, n, &triplets)
}

/// Banded matrix with half-bandwidth `k`.
fn banded<F: Field>(field: &F, n: usize, k: usize) -> CscMatrix<F::Element> {
    let mut triplets = Vec::new();
    for col in 0..n {
        let lo = col.saturating_sub(k);
        let hi = (col + k + 1).min(n);
        for row in lo..hi {
            let v = if row == col {
                4 * k as i64 + 1
            } else {
                (row + 2 * col) as i64 % 7 + 1
            };
            triplets.push((row, col, field.init(v)));
        }
    }
    CscMatrix::from_triplets(field, n, n, &triplets)
}

fn bench_random_modular(c: &mut Criterion) {
    let mut group = c.benchmark_group("lu_random_gfp");
    let field = Modular::new(PRIME).unwrap();

    for size in [100, 400, 1000] {
        let a = random_sparse(&field, size, 3, 42);
        let mut engine = LuEngine::new(field, LuOptions::default());

        group.bench_with_input(BenchmarkId::new("factorize", size), &size, |b, _| {
            b.iter(|| black_box(engine.factorize(&a).unwrap()))
        });
    }

    group.finish();
}

fn bench_random_rational(c: &mut Criterion) {
    let mut group = c.benchmark_group("lu_random_q");
    group.sample_size(10);
    let field = Rationals::new();

    for size in [50, 100, 200] {
        let a = random_sparse(&field, size, 2, 7);
        let mut engine = LuEngine::new(field, LuOptions::default());

        group.bench_with_input(BenchmarkId::new("factorize", size), &size, |b, _| {
            b.iter(|| black_box(engine.factorize(&a).unwrap()))
        });
    }

    group.finish();
}

fn bench_banded(c: &mut Criterion) {
    let mut group = c.benchmark_group("lu_banded_gfp");
    let field = Modular::new(PRIME).unwrap();
    let a = banded(&field, 1000, 8);

    // Relaxation and panel width only change the blocking, not the result
    for (relax, panel_size) in [(0, 1), (8, 8), (32, 16)] {
        let options = LuOptions {
            relax,
            panel_size,
            ..LuOptions::default()
        };
        let mut engine = LuEngine::new(field, options);
        let id = format!("relax={relax},panel={panel_size}");

        group.bench_function(BenchmarkId::new("factorize", id), |b| {
            b.iter(|| black_box(engine.factorize(&a).unwrap()))
        });
    }

    group.finish();
}

fn bench_refactorize(c: &mut Criterion) {
    let mut group = c.benchmark_group("lu_refactorize_gfp");
    let field = Modular::new(PRIME).unwrap();

    for size in [400, 1000] {
        let a = random_sparse(&field, size, 3, 11);
        let mut b_mat = a.clone();
        for v in b_mat.values_mut() {
            *v = field.mul(v, &field.init(3));
        }
        let mut engine = LuEngine::new(field, LuOptions::default());
        let first = engine.factorize(&a).unwrap();

        group.bench_with_input(BenchmarkId::new("fresh", size), &size, |b, _| {
            b.iter(|| black_box(engine.factorize(&b_mat).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("reuse", size), &size, |b, _| {
            b.iter(|| black_box(engine.refactorize(&b_mat, &first).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_random_modular,
    bench_random_rational,
    bench_banded,
    bench_refactorize
);
criterion_main!(benches);
