use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mezzanine_logic::{
    apply_accessory_add, compute_available_perimeter, compute_pricing,
    compute_railing_placements, AccessoryKind, Configuration, GateOpening, LoadClass,
    StairVariant,
};

fn busy_platform(corner: bool) -> Configuration {
    let mut config = Configuration::new(20000, 12000, 4000, LoadClass::Heavy)
        .unwrap_or_else(|e| panic!("bench platform: {e}"));
    let mut kinds = vec![
        (AccessoryKind::Stair { variant: StairVariant::Straight1500 }, 2),
        (AccessoryKind::PalletGate { opening_width: GateOpening::W2500 }, 3),
        (AccessoryKind::Railing { segment_length_meters: 3 }, 12),
        (AccessoryKind::Railing { segment_length_meters: 1 }, 9),
    ];
    if corner {
        kinds.insert(0, (AccessoryKind::Stair { variant: StairVariant::Corner1200 }, 1));
    }
    for (kind, quantity) in kinds {
        config = apply_accessory_add(&config, kind, quantity)
            .unwrap_or_else(|e| panic!("bench add {kind:?}: {e}"))
            .config;
    }
    config
}

fn bench_placement(c: &mut Criterion) {
    let straight = busy_platform(false);
    let corner = busy_platform(true);

    c.bench_function("railing_placements_straight", |b| {
        b.iter(|| compute_railing_placements(black_box(&straight)))
    });
    c.bench_function("railing_placements_corner", |b| {
        b.iter(|| compute_railing_placements(black_box(&corner)))
    });
    c.bench_function("available_perimeter", |b| {
        b.iter(|| compute_available_perimeter(black_box(&straight)))
    });
    c.bench_function("pricing", |b| b.iter(|| compute_pricing(black_box(&corner))));
}

criterion_group!(benches, bench_placement);
criterion_main!(benches);
