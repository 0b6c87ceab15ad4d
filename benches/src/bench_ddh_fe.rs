use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use ipfe::traits::FEScheme;
use ipfe::{DdhFeScheme, GroupConfig};
use num_bigint::BigInt;
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::hint::black_box;

const N: usize = 64;

fn bench_ddh_fe(c: &mut Criterion) {
    let mut group = c.benchmark_group("DDH FE");
    let mut rng = StdRng::seed_from_u64(0);

    let y: Vec<BigInt> = (0..N).map(|_| BigInt::from(rng.gen_range(0u8..2))).collect();
    let x: Vec<BigInt> = (0..N).map(|_| BigInt::from(rng.gen_range(0u8..2))).collect();

    for bits in [64u64, 256] {
        let params = GroupConfig::generated(bits).with_seed(bits).build().unwrap();
        let mut scheme = DdhFeScheme::new(N, params).unwrap();

        group.bench_with_input(BenchmarkId::new("KeyDerive", bits), &y, |b, y| {
            b.iter(|| scheme.key_derive(black_box(y)).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("Encrypt", bits), &x, |b, x| {
            b.iter(|| scheme.encrypt(black_box(x)).unwrap())
        });

        scheme.key_derive(&y).unwrap();
        let ct = scheme.encrypt(&x).unwrap();
        group.bench_with_input(BenchmarkId::new("Decrypt", bits), &ct, |b, ct| {
            b.iter(|| scheme.decrypt(black_box(ct)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ddh_fe);
criterion_main!(benches);
