use criterion::{black_box, criterion_group, criterion_main, Criterion};

use corelib::{HashRing, Member};

fn bench_get(c: &mut Criterion) {
    let ring = HashRing::from_members(["10.a.a.a:8xxx", "10.b.b.b:8xxx", "10.c.c.c:8xxx"]).unwrap();

    c.bench_function("ring_get_3_of_3", |b| {
        b.iter(|| ring.get(black_box(b"/"), black_box(3)))
    });

    let keys: Vec<String> = (0..1024).map(|i| format!("key-{i}")).collect();
    let mut i = 0usize;
    c.bench_function("ring_get_1_varying_key", |b| {
        b.iter(|| {
            i = (i + 1) % keys.len();
            ring.get(black_box(keys[i].as_bytes()), 1)
        })
    });
}

fn bench_add(c: &mut Criterion) {
    let base: Vec<Member> = (0..100).map(|i| Member::from(format!("node-{i}"))).collect();
    let ring = HashRing::from_members(base).unwrap();

    c.bench_function("ring_add_to_100", |b| {
        b.iter_batched(
            || ring.clone(),
            |mut ring| ring.add(Member::from("node-new")),
            criterion::BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_get, bench_add);
criterion_main!(benches);
