//! Benchmarks for body simulation, breeding and visual codes.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use glam::Vec2;

use koi_genetics::{
    codec,
    compute::{Body, Breeder, GenomeRng},
    schema::{Blueprint, BodyTraits, BreedingConfig},
};

fn bench_spine_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("spine_update");

    for length in [0u8, 128, 255] {
        let mut body = Body::new(&BodyTraits {
            length,
            radius: 128,
            growth_speed: 128,
            mating_frequency: 0,
            offspring_count: 0,
            age: 20000,
        });
        body.initialize_spine(Vec2::ZERO, Vec2::X);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{} vertebrae", body.spine().len())),
            &length,
            |b, _| {
                let mut step = 0u32;
                b.iter(|| {
                    step = step.wrapping_add(1);
                    let direction = Vec2::from_angle(step as f32 * 0.01);
                    let head = body.spine()[0] + direction * 0.03;
                    body.update(black_box(head), direction, 0.03, false, None);
                });
            },
        );
    }

    group.finish();
}

fn bench_breeding(c: &mut Criterion) {
    let blueprints = Blueprint::defaults();
    let mut rng = GenomeRng::new(1);
    let mother = blueprints[0].spawn(&mut rng);
    let father = blueprints[1].spawn(&mut rng);
    let config = BreedingConfig::default();

    c.bench_function("breed_litter", |b| {
        b.iter(|| {
            let litter = Breeder::new(&mother, &father).breed(&config, &mut rng, |_| {});
            black_box(litter)
        });
    });
}

fn bench_code(c: &mut Criterion) {
    let blueprints = Blueprint::defaults();
    let genome = blueprints[2].spawn(&mut GenomeRng::new(5));
    let image = codec::encode(&genome).unwrap();

    c.bench_function("code_encode", |b| {
        b.iter(|| codec::encode(black_box(&genome)))
    });
    c.bench_function("code_decode", |b| {
        b.iter(|| codec::decode(black_box(&image)))
    });
}

criterion_group!(benches, bench_spine_update, bench_breeding, bench_code);
criterion_main!(benches);
