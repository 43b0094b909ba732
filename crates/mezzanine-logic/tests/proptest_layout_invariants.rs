//! Property-based invariant tests for the perimeter layout engine.
//!
//! For any platform size and any sequence of accessory mutations:
//!
//! 1. Without a corner stair, available = max(0, 2(l+w) − stairs − gates).
//! 2. With a corner stair, available = floor(2(l+w) + 5.8).
//! 3. Auto-fit is idempotent.
//! 4. Auto-fit never leaves quantity or segment below 1.
//! 5. After every successful mutation, railings fit the available perimeter.
//! 6. A second corner stair is always rejected.
//! 7. Placements never overlap a front-edge opening.
//! 8. Records round-trip through JSON without loss.

use mezzanine_logic::autofit::{auto_fit, requested_railing_mm};
use mezzanine_logic::geometry::{perimeter, EdgeId};
use mezzanine_logic::occupancy::{front_openings, gate_occupancy, stair_occupancy};
use mezzanine_logic::persistence::{from_record_json, to_record_json};
use mezzanine_logic::{
    apply_accessory_add, apply_accessory_remove, apply_accessory_update,
    compute_available_perimeter, compute_railing_placements, Accessory, AccessoryId,
    AccessoryKind, AccessoryPatch, Configuration, GateOpening, LoadClass, Rejection,
    StairVariant,
};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

fn kind_strategy() -> impl Strategy<Value = AccessoryKind> {
    prop_oneof![
        prop::sample::select(StairVariant::ALL.to_vec())
            .prop_map(|variant| AccessoryKind::Stair { variant }),
        (1u32..=15).prop_map(|segment_length_meters| AccessoryKind::Railing {
            segment_length_meters
        }),
        prop::sample::select(GateOpening::ALL.to_vec())
            .prop_map(|opening_width| AccessoryKind::PalletGate { opening_width }),
    ]
}

#[derive(Debug, Clone)]
enum Op {
    Add(AccessoryKind, u32),
    Update(usize, AccessoryPatch),
    Remove(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (kind_strategy(), 1u32..=4).prop_map(|(k, q)| Op::Add(k, q)),
        1 => (any::<usize>(), prop::option::of(1u32..=4), prop::option::of(kind_strategy()))
            .prop_map(|(i, quantity, kind)| Op::Update(i, AccessoryPatch { quantity, kind })),
        1 => any::<usize>().prop_map(Op::Remove),
    ]
}

fn platform_strategy() -> impl Strategy<Value = Configuration> {
    (2000u32..=20000, 2000u32..=20000, 2000u32..=6000)
        .prop_map(|(l, w, h)| Configuration::new(l, w, h, LoadClass::Medium).unwrap())
}

fn pick_id(config: &Configuration, i: usize) -> AccessoryId {
    let list = config.accessories();
    if list.is_empty() {
        AccessoryId(u32::MAX)
    } else {
        list[i % list.len()].id
    }
}

fn run_ops(mut config: Configuration, ops: &[Op]) -> Vec<Configuration> {
    let mut history = Vec::new();
    for op in ops {
        let result = match op {
            Op::Add(kind, q) => apply_accessory_add(&config, *kind, *q),
            Op::Update(i, patch) => apply_accessory_update(&config, pick_id(&config, *i), *patch),
            Op::Remove(i) => Ok(apply_accessory_remove(&config, pick_id(&config, *i))),
        };
        if let Ok(applied) = result {
            config = applied.config;
            history.push(config.clone());
        }
    }
    history
}

// ═════════════════════════════════════════════════════════════════════════
// 1–2. Available perimeter formulas
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn available_perimeter_formula(
        base in platform_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..20),
    ) {
        for config in run_ops(base, &ops) {
            let l = config.length();
            let w = config.width();
            let available = compute_available_perimeter(&config);
            if config.has_corner_stair() {
                let expected = (perimeter(l, w, false) + 5.8 + 1e-9).floor();
                prop_assert_eq!(available, expected);
            } else {
                let list = config.accessories();
                let expected =
                    (perimeter(l, w, false) - stair_occupancy(list) - gate_occupancy(list)).max(0.0);
                prop_assert!((available - expected).abs() < 1e-6);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3–4. Auto-fit idempotence and floors
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn auto_fit_idempotent_and_floored(
        railings in prop::collection::vec((1u32..=20, 1u32..=6), 0..8),
        available in 0.0f64..60.0,
    ) {
        let list: Vec<Accessory> = railings
            .iter()
            .enumerate()
            .map(|(i, &(segment, quantity))| Accessory::new(
                AccessoryId(i as u32 + 1),
                AccessoryKind::Railing { segment_length_meters: segment },
                quantity,
            ))
            .collect();
        let once = auto_fit(&list, available);
        let twice = auto_fit(&once.accessories, available);
        prop_assert_eq!(&once.accessories, &twice.accessories);
        prop_assert!(requested_railing_mm(&once.accessories) as f64 <= available * 1000.0 + 1e-6);
        for a in &once.accessories {
            prop_assert!(a.quantity >= 1);
            if let AccessoryKind::Railing { segment_length_meters } = a.kind {
                prop_assert!(segment_length_meters >= 1);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5–6. Mutation invariants
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn railings_always_fit_after_mutation(
        base in platform_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..25),
    ) {
        for config in run_ops(base, &ops) {
            let corners = config.accessories().iter().filter(|a| a.is_corner_stair()).count();
            prop_assert!(corners <= 1);
            let requested = config.railing_meters() as f64;
            prop_assert!(requested <= compute_available_perimeter(&config) + 1e-9);
        }
    }

    #[test]
    fn second_corner_stair_always_rejected(
        base in platform_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..10),
        variant in prop::sample::select(vec![StairVariant::Corner1000, StairVariant::Corner1200]),
        quantity in 1u32..=3,
    ) {
        let config = run_ops(base.clone(), &ops).pop().unwrap_or(base);
        let config = if config.has_corner_stair() {
            config
        } else {
            let corner = AccessoryKind::Stair { variant: StairVariant::Corner1000 };
            apply_accessory_add(&config, corner, 1).unwrap().config
        };
        let result = apply_accessory_add(&config, AccessoryKind::Stair { variant }, quantity);
        prop_assert_eq!(result, Err(Rejection::SecondCornerStair));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Placements avoid openings
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn placements_never_overlap_openings(
        base in platform_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..15),
    ) {
        if let Some(config) = run_ops(base, &ops).pop() {
            let layout = compute_railing_placements(&config);
            let openings = front_openings(&config);
            let front_x0 = if config.has_corner_stair() {
                3.0f64.min(config.length() as f64 / 1000.0)
            } else {
                0.0
            };
            for p in layout.placements.iter().filter(|p| p.edge == EdgeId::Front) {
                let (ps, pe) = (p.start() + front_x0, p.end() + front_x0);
                for o in &openings {
                    prop_assert!(
                        pe <= o.start + 1e-6 || ps >= o.end - 1e-6,
                        "placement {:?} overlaps opening {:?}", p, o
                    );
                }
            }
            prop_assert!(layout.placements.iter().all(|p| p.edge != EdgeId::ExtensionFront));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8. Persistence round-trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn record_round_trip(
        base in platform_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..12),
    ) {
        let config = run_ops(base.clone(), &ops).pop().unwrap_or(base);
        let json = to_record_json(&config).unwrap();
        prop_assert_eq!(from_record_json(&json).unwrap(), config);
    }
}
