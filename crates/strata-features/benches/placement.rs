use criterion::{Criterion, black_box, criterion_group, criterion_main};
use std::time::Duration;

use strata_features::FeatureRegistry;
use strata_geom::BlockPos;
use strata_world::{ChunkGenerator, RandomSource, TerrainConfig, VoxelGrid, WorldRandom};

fn load_registry() -> FeatureRegistry {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    FeatureRegistry::load_from_path(root.join("../../assets/features.toml")).unwrap()
}

fn cave_volume(generator: &dyn ChunkGenerator) -> VoxelGrid {
    let mut g = VoxelGrid::with_size(BlockPos::new(-24, -40, -24), 48, 64, 48);
    generator.fill(&mut g);
    g.set_recording(false);
    g
}

fn bench_dripstone(c: &mut Criterion) {
    let mut group = c.benchmark_group("dripstone");
    let reg = load_registry();
    let generator = TerrainConfig::default().build_generator(0xC0FFEE);
    let base = cave_volume(generator.as_ref());
    for name in ["dripstone_cluster", "large_dripstone"] {
        let Some(feature) = reg.get(name) else { continue };
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut g = base.clone();
                let mut r = WorldRandom::new(1337);
                let mut placed = 0;
                for _ in 0..32 {
                    let origin = BlockPos::new(r.next_int_in(-16, 15), r.next_int_in(-32, 8), r.next_int_in(-16, 15));
                    placed += feature.place(&mut g, generator.as_ref(), &mut r, origin) as u32;
                }
                black_box(placed);
            })
        });
    }
    group.finish();
}

fn bench_vegetation(c: &mut Criterion) {
    let mut group = c.benchmark_group("vegetation");
    let reg = load_registry();
    let generator = TerrainConfig::default().build_generator(7);
    let base = cave_volume(generator.as_ref());
    for name in ["moss_patch", "clay_pool", "rooted_azalea_tree"] {
        let Some(feature) = reg.get(name) else { continue };
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut g = base.clone();
                let mut r = WorldRandom::new(42);
                let mut placed = 0;
                for _ in 0..32 {
                    let origin = BlockPos::new(r.next_int_in(-16, 15), r.next_int_in(-32, 8), r.next_int_in(-16, 15));
                    placed += feature.place(&mut g, generator.as_ref(), &mut r, origin) as u32;
                }
                black_box(placed);
            })
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default().measurement_time(Duration::from_secs(5));
    targets = bench_dripstone, bench_vegetation
}
criterion_main!(benches);
