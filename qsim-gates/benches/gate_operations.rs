use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use num_complex::Complex64;
use qsim_gates::matrix_ops::{apply_dense, embed_gate, is_unitary, matrix_multiply};
use qsim_gates::{all, lookup};

fn benchmark_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog_lookup");

    for name in ["H", "cnot", "Toffoli", "FOO"] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &name, |b, &name| {
            b.iter(|| black_box(lookup(black_box(name)).is_ok()));
        });
    }

    group.finish();
}

fn benchmark_unitarity(c: &mut Criterion) {
    c.bench_function("catalog_unitarity_check", |b| {
        b.iter(|| {
            for gate in all() {
                black_box(is_unitary(gate.matrix, 1e-9));
            }
        });
    });

    let ccnot = lookup("CCNOT").unwrap().matrix;
    c.bench_function("matrix_multiply_8x8", |b| {
        b.iter(|| black_box(matrix_multiply(black_box(ccnot), black_box(ccnot))));
    });
}

fn benchmark_dense_reference(c: &mut Criterion) {
    let mut group = c.benchmark_group("dense_reference");
    let cnot = lookup("CNOT").unwrap().matrix;

    for num_qubits in [2usize, 4, 6] {
        let mut state = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        state[1] = Complex64::new(1.0, 0.0);
        let targets = [0, num_qubits - 1];

        group.bench_with_input(
            BenchmarkId::new("embed_and_apply", num_qubits),
            &num_qubits,
            |b, &num_qubits| {
                b.iter(|| {
                    let full = embed_gate(cnot, num_qubits, &targets);
                    black_box(apply_dense(&full, &state))
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_lookup,
    benchmark_unitarity,
    benchmark_dense_reference
);
criterion_main!(benches);
