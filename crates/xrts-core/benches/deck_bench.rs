// ─────────────────────────────────────────────────────────────────────
// XRTS Parameter Core — Input Deck Benchmark
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use xrts_core::parameters::ParameterSet;
use xrts_types::config::ParameterInput;
use xrts_types::elements::Element;

fn plastic_input() -> ParameterInput {
    ParameterInput {
        elements: Some(vec![Element::new("C", 1, 4), Element::new("H", 1, -1)]),
        scattering_angle: Some(60.0),
        electron_temperature: Some(10.0),
        ion_charge: Some(2.5),
        mass_density: Some(1.0),
        photon_energy: Some(8000.0),
        ..Default::default()
    }
}

fn bench_validate(c: &mut Criterion) {
    c.bench_function("parameter_set_new", |b| {
        b.iter_batched(
            plastic_input,
            |input| ParameterSet::new(black_box(input)),
            criterion::BatchSize::SmallInput,
        )
    });
}

fn bench_render(c: &mut Criterion) {
    let params = ParameterSet::new(plastic_input()).expect("benchmark parameters should validate");
    c.bench_function("render_deck", |b| {
        b.iter(|| black_box(&params).render_deck())
    });
}

criterion_group!(benches, bench_validate, bench_render);
criterion_main!(benches);
