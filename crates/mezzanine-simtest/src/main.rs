//! Mezzanine Configurator Headless Harness
//!
//! Validates layout, auto-fit, placement and pricing logic end to end.
//! Runs entirely in-process — no UI, no 3D preview, no store.
//!
//! Usage:
//!   cargo run -p mezzanine-simtest
//!   cargo run -p mezzanine-simtest -- --verbose
//!   cargo run -p mezzanine-simtest -- --seed 7

use std::collections::BTreeMap;

use mezzanine_logic::config::{summarize, validate_config};
use mezzanine_logic::geometry::EdgeId;
use mezzanine_logic::occupancy::front_openings;
use mezzanine_logic::persistence::{from_record_json, to_record_json};
use mezzanine_logic::pricing::{compute_pricing_with, PriceList};
use mezzanine_logic::walker::Exhaustion;
use mezzanine_logic::{
    apply_accessory_add, apply_accessory_remove, apply_accessory_update, apply_dimensions,
    apply_load_class, compute_available_perimeter, compute_railing_placements, AccessoryId,
    AccessoryKind, AccessoryPatch, Applied, Configuration, GateOpening, LoadClass, Rejection,
    StairVariant,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

// ── Data files ──────────────────────────────────────────────────────────
const PRICE_LIST_JSON: &str = include_str!("../../../data/price_list.json");
const SCENARIOS_JSON: &str = include_str!("../../../data/scenarios.json");

const DEFAULT_SEED: u64 = 0x6d65_7a7a;
const SWEEP_CONFIGS: usize = 400;
const SWEEP_OPS: usize = 30;

#[derive(Debug, Deserialize)]
struct Scenario {
    name: String,
    length: u32,
    width: u32,
    steps: Vec<ScenarioStep>,
    available: f64,
    railing: u64,
}

#[derive(Debug, Deserialize)]
struct ScenarioStep {
    #[serde(flatten)]
    kind: AccessoryKind,
    quantity: u32,
    #[serde(default)]
    rejected: bool,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose");
    let seed = args
        .iter()
        .position(|a| a == "--seed")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED);
    println!("=== Mezzanine Configurator Harness (seed {}) ===\n", seed);

    let mut results = Vec::new();

    // 1. Price list
    let prices = match PriceList::from_json(PRICE_LIST_JSON) {
        Ok(p) => {
            results.push(TestResult {
                name: "price_list_parse".into(),
                passed: true,
                detail: format!("railing {} / m", p.railing_per_meter),
            });
            p
        }
        Err(e) => {
            results.push(TestResult {
                name: "price_list_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            PriceList::default()
        }
    };

    // 2. Scripted scenarios
    results.extend(validate_scenarios(verbose));

    // 3. Random mutation sweep
    results.extend(validate_mutation_sweep(seed, verbose));

    // 4. Placement sweep over platform sizes
    results.extend(validate_placement_sweep(verbose));

    // 5. Pricing consistency
    results.extend(validate_pricing(&prices, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 2. Scenarios ────────────────────────────────────────────────────────

fn validate_scenarios(verbose: bool) -> Vec<TestResult> {
    println!("--- Scenarios ---");
    let mut results = Vec::new();

    let scenarios: Vec<Scenario> = match serde_json::from_str(SCENARIOS_JSON) {
        Ok(s) => s,
        Err(e) => {
            results.push(TestResult {
                name: "scenarios_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    for scenario in &scenarios {
        let name = format!("scenario_{}", scenario.name);
        let mut config =
            match Configuration::new(scenario.length, scenario.width, 3000, LoadClass::Medium) {
                Ok(c) => c,
                Err(e) => {
                    results.push(TestResult {
                        name,
                        passed: false,
                        detail: format!("invalid platform: {}", e),
                    });
                    continue;
                }
            };

        let mut mismatch = None;
        for (i, step) in scenario.steps.iter().enumerate() {
            match apply_accessory_add(&config, step.kind, step.quantity) {
                Ok(applied) if !step.rejected => config = applied.config,
                Err(_) if step.rejected => {}
                Ok(_) => mismatch = Some(format!("step {} accepted, expected rejection", i)),
                Err(e) => mismatch = Some(format!("step {} rejected: {}", i, e)),
            }
            if mismatch.is_some() {
                break;
            }
        }

        let available = compute_available_perimeter(&config);
        let railing = config.railing_meters();
        let detail = mismatch.clone().unwrap_or_else(|| {
            format!(
                "available {:.1} m (expected {:.1}), railing {} m (expected {})",
                available, scenario.available, railing, scenario.railing
            )
        });
        results.push(TestResult {
            name,
            passed: mismatch.is_none()
                && (available - scenario.available).abs() < 1e-9
                && railing == scenario.railing,
            detail,
        });
    }

    if verbose {
        println!("  {} scenarios loaded", scenarios.len());
    }
    results
}

// ── 3. Mutation sweep ───────────────────────────────────────────────────

fn random_kind(rng: &mut StdRng) -> AccessoryKind {
    match rng.gen_range(0..3) {
        0 => AccessoryKind::Stair {
            variant: *StairVariant::ALL
                .choose(rng)
                .unwrap_or(&StairVariant::Straight1000),
        },
        1 => AccessoryKind::Railing {
            segment_length_meters: rng.gen_range(1..=12),
        },
        _ => AccessoryKind::PalletGate {
            opening_width: *GateOpening::ALL.choose(rng).unwrap_or(&GateOpening::W2000),
        },
    }
}

fn random_id(rng: &mut StdRng, config: &Configuration) -> AccessoryId {
    config
        .accessories()
        .choose(rng)
        .map_or(AccessoryId(u32::MAX), |a| a.id)
}

fn random_platform(rng: &mut StdRng) -> Option<Configuration> {
    let class = *LoadClass::ALL.choose(rng)?;
    Configuration::new(
        rng.gen_range(2000..=20000),
        rng.gen_range(2000..=20000),
        rng.gen_range(2000..=6000),
        class,
    )
    .ok()
}

fn random_mutation(rng: &mut StdRng, config: &Configuration) -> Result<Applied, Rejection> {
    match rng.gen_range(0..10) {
        0..=4 => apply_accessory_add(config, random_kind(rng), rng.gen_range(1..=4)),
        5 | 6 => {
            let patch = AccessoryPatch {
                quantity: rng.gen_bool(0.6).then(|| rng.gen_range(1..=4)),
                kind: rng.gen_bool(0.5).then(|| random_kind(rng)),
            };
            apply_accessory_update(config, random_id(rng, config), patch)
        }
        7 => Ok(apply_accessory_remove(config, random_id(rng, config))),
        8 => apply_dimensions(
            config,
            rng.gen_range(2000..=20000),
            rng.gen_range(2000..=20000),
            config.height(),
        ),
        _ => {
            let class = *LoadClass::ALL.choose(rng).unwrap_or(&LoadClass::Medium);
            Ok(apply_load_class(config, class))
        }
    }
}

/// Everything that must hold for any configuration a mutation produced.
fn check_invariants(config: &Configuration) -> Result<(), String> {
    let requested = config.railing_meters() as f64;
    let available = compute_available_perimeter(config);
    if requested > available + 1e-9 {
        return Err(format!("railings {} m > available {} m", requested, available));
    }
    let errors = validate_config(config);
    if let Some(e) = errors.first() {
        return Err(format!("validation: {}", e));
    }

    let layout = compute_railing_placements(config);
    if (layout.placed() + layout.unplaced - layout.requested).abs() > 1e-6 {
        return Err(format!(
            "placed {} + unplaced {} != requested {}",
            layout.placed(),
            layout.unplaced,
            layout.requested
        ));
    }
    if layout.placements.iter().any(|p| p.edge == EdgeId::ExtensionFront) {
        return Err("railing on extension front".into());
    }
    if !config.has_corner_stair() && layout.exhaustion.is_some() {
        return Err(format!("layout exhausted without extension: {:?}", layout.exhaustion));
    }

    let front_x0 = if config.has_corner_stair() {
        3.0f64.min(config.length() as f64 / 1000.0)
    } else {
        0.0
    };
    let openings = front_openings(config);
    for p in layout.placements.iter().filter(|p| p.edge == EdgeId::Front) {
        let (start, end) = (p.start() + front_x0, p.end() + front_x0);
        if let Some(o) = openings
            .iter()
            .find(|o| end > o.start + 1e-6 && start < o.end - 1e-6)
        {
            return Err(format!("railing {:?} overlaps opening {:?}", p, o));
        }
    }

    match to_record_json(config).map(|json| from_record_json(&json)) {
        Ok(Ok(loaded)) if &loaded == config => Ok(()),
        Ok(Ok(_)) => Err("record round-trip changed configuration".into()),
        Ok(Err(e)) | Err(e) => Err(format!("persistence: {}", e)),
    }
}

fn validate_mutation_sweep(seed: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Mutation Sweep ---");
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(seed);

    let mut applied = 0usize;
    let mut adjusted = 0usize;
    let mut rejections: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut failures = Vec::new();

    for run in 0..SWEEP_CONFIGS {
        let Some(mut config) = random_platform(&mut rng) else {
            failures.push(format!("run {}: platform generation failed", run));
            continue;
        };
        for op in 0..SWEEP_OPS {
            match random_mutation(&mut rng, &config) {
                Ok(result) => {
                    applied += 1;
                    if result.note.is_some() {
                        adjusted += 1;
                    }
                    if let Err(e) = check_invariants(&result.config) {
                        failures.push(format!("run {} op {}: {}", run, op, e));
                    }
                    config = result.config;
                }
                Err(rejection) => *rejections.entry(rejection_name(&rejection)).or_default() += 1,
            }
        }
    }

    results.push(TestResult {
        name: "sweep_invariants_hold".into(),
        passed: failures.is_empty(),
        detail: match failures.first() {
            None => format!(
                "{} mutations applied across {} configs",
                applied, SWEEP_CONFIGS
            ),
            Some(first) => format!("{} failures, first: {}", failures.len(), first),
        },
    });

    results.push(TestResult {
        name: "sweep_autofit_exercised".into(),
        passed: adjusted > 0,
        detail: format!("{} mutations needed auto-fit", adjusted),
    });

    results.push(TestResult {
        name: "sweep_second_corner_rejected".into(),
        passed: rejections.contains_key("SecondCornerStair"),
        detail: format!(
            "{} second corner stairs rejected",
            rejections.get("SecondCornerStair").copied().unwrap_or(0)
        ),
    });

    if verbose {
        println!("  Rejections by reason:");
        for (name, count) in &rejections {
            println!("    {:26}: {}", name, count);
        }
    }
    results
}

fn rejection_name(rejection: &Rejection) -> &'static str {
    match rejection {
        Rejection::SecondCornerStair => "SecondCornerStair",
        Rejection::CornerStairQuantity { .. } => "CornerStairQuantity",
        Rejection::RailingExceedsPerimeter { .. } => "RailingExceedsPerimeter",
        Rejection::UnknownAccessory(_) => "UnknownAccessory",
        Rejection::ZeroQuantity => "ZeroQuantity",
        Rejection::RailingTooShort => "RailingTooShort",
        Rejection::KindMismatch { .. } => "KindMismatch",
        Rejection::Invalid(_) => "Invalid",
    }
}

// ── 4. Placement sweep ──────────────────────────────────────────────────

fn validate_placement_sweep(verbose: bool) -> Vec<TestResult> {
    println!("--- Placement Sweep ---");
    let mut results = Vec::new();

    let sizes = [2000u32, 3000, 4500, 9400, 14000, 20000];
    let mut complete = 0;
    let mut exhausted = 0;
    let mut bad = Vec::new();
    for &length in &sizes {
        for &width in &sizes {
            for corner in [false, true] {
                let Ok(mut config) = Configuration::new(length, width, 3000, LoadClass::Light)
                else {
                    bad.push(format!("{}x{}: invalid platform", length, width));
                    continue;
                };
                if corner {
                    let stair = AccessoryKind::Stair {
                        variant: StairVariant::Corner1000,
                    };
                    match apply_accessory_add(&config, stair, 1) {
                        Ok(a) => config = a.config,
                        Err(e) => bad.push(format!("{}x{} corner: {}", length, width, e)),
                    }
                }
                // Fill the whole free perimeter with 1 m railings.
                let whole = compute_available_perimeter(&config).floor() as u32;
                if whole > 0 {
                    let railing = AccessoryKind::Railing {
                        segment_length_meters: 1,
                    };
                    match apply_accessory_add(&config, railing, whole) {
                        Ok(a) => config = a.config,
                        Err(e) => bad.push(format!("{}x{} railing: {}", length, width, e)),
                    }
                }
                let layout = compute_railing_placements(&config);
                match layout.exhaustion {
                    None => complete += 1,
                    Some(Exhaustion::NoFreeSpace) => exhausted += 1,
                    Some(Exhaustion::StepLimit) => {
                        bad.push(format!("{}x{}: step limit reached", length, width))
                    }
                }
                if let Err(e) = check_invariants(&config) {
                    bad.push(format!("{}x{} corner={}: {}", length, width, corner, e));
                }
            }
        }
    }

    results.push(TestResult {
        name: "placement_sweep_consistent".into(),
        passed: bad.is_empty(),
        detail: match bad.first() {
            None => format!(
                "{} complete, {} stopped after a full lap",
                complete, exhausted
            ),
            Some(first) => format!("{} problems, first: {}", bad.len(), first),
        },
    });

    if verbose {
        let config = Configuration::default();
        let summary = summarize(&config);
        if let Ok(json) = serde_json::to_string_pretty(&summary) {
            println!("  Default platform summary:\n{}", json);
        }
    }
    results
}

// ── 5. Pricing ──────────────────────────────────────────────────────────

fn validate_pricing(prices: &PriceList, verbose: bool) -> Vec<TestResult> {
    println!("--- Pricing ---");
    let mut results = Vec::new();

    let base = Configuration::default();
    let by_class: Vec<f64> = LoadClass::ALL
        .iter()
        .map(|&c| compute_pricing_with(&apply_load_class(&base, c).config, prices).price)
        .collect();
    results.push(TestResult {
        name: "pricing_load_class_monotonic".into(),
        passed: by_class.windows(2).all(|w| w[0] <= w[1]),
        detail: format!("{:?}", by_class),
    });

    let stair = AccessoryKind::Stair {
        variant: StairVariant::Corner1200,
    };
    let with_corner = apply_accessory_add(&base, stair, 1).map(|a| a.config);
    let (passed, detail) = match with_corner {
        Ok(cfg) => {
            let plain = compute_pricing_with(&base, prices);
            let corner = compute_pricing_with(&cfg, prices);
            (
                corner.area_m2 > plain.area_m2
                    && (corner.price - plain.price - prices.corner_stair).abs() < 1e-6,
                format!("area {:.1} → {:.1} m²", plain.area_m2, corner.area_m2),
            )
        }
        Err(e) => (false, format!("corner stair rejected: {}", e)),
    };
    results.push(TestResult {
        name: "pricing_corner_stair_adds_extension".into(),
        passed,
        detail,
    });

    let pricing = compute_pricing_with(&base, prices);
    results.push(TestResult {
        name: "pricing_financing_terms".into(),
        passed: pricing.monthly_60 < pricing.monthly_36
            && pricing.monthly_36 * 36.0 >= pricing.price,
        detail: format!(
            "{:.0} total, {:.2}/mo over 36, {:.2}/mo over 60",
            pricing.price, pricing.monthly_36, pricing.monthly_60
        ),
    });

    if verbose {
        for item in &pricing.line_items {
            println!("    {:28}: {} × {:.0}", item.label, item.quantity, item.unit_price);
        }
    }
    results
}
