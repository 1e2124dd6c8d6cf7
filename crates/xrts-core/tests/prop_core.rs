// ─────────────────────────────────────────────────────────────────────
// XRTS Parameter Core — Property-Based Tests (proptest) for xrts-core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for xrts-core using proptest.
//!
//! Covers: density triple resolution and consistency, default energy
//! window, scattering angle range, temperature defaults, JSON export,
//! species block of the input deck.

use proptest::prelude::*;
use xrts_core::densities::{relative_deviation, resolve_densities};
use xrts_core::energy::plasma_frequency_ev;
use xrts_core::parameters::ParameterSet;
use xrts_types::config::ParameterInput;
use xrts_types::constants::AVOGADRO;
use xrts_types::elements::{Element, ALL_ELEMENTS};
use xrts_types::error::XrtsError;

fn base_input(ion_charge: f64, mass_density: f64) -> ParameterInput {
    ParameterInput {
        elements: Some(vec![Element::new("C", 1, 4)]),
        scattering_angle: Some(90.0),
        electron_temperature: Some(10.0),
        ion_charge: Some(ion_charge),
        mass_density: Some(mass_density),
        photon_energy: Some(8000.0),
        ..Default::default()
    }
}

fn element_strategy() -> impl Strategy<Value = Element> {
    (
        prop::sample::select(ALL_ELEMENTS.to_vec()),
        1u32..20,
        -1i32..30,
    )
        .prop_map(|(symbol, count, charge)| Element::new(symbol, count, charge))
}

// ── Density Triple ───────────────────────────────────────────────────

proptest! {
    /// Solving for any one leg satisfies the relation, and feeding all
    /// three legs back in passes the consistency check.
    #[test]
    fn two_of_three_resolves_consistently(
        zf in 0.01f64..80.0,
        rho in 1e-4f64..50.0,
        missing in 0usize..3,
    ) {
        let ne = rho * zf * AVOGADRO * 1e6;
        let mut legs = [Some(ne), Some(zf), Some(rho)];
        legs[missing] = None;

        let triple = resolve_densities(legs[0], legs[1], legs[2]).unwrap();
        prop_assert!(
            relative_deviation(triple.electron_density(), triple.ion_charge(), triple.mass_density()) <= 1e-4
        );

        let again = resolve_densities(
            Some(triple.electron_density()),
            Some(triple.ion_charge()),
            Some(triple.mass_density()),
        );
        prop_assert!(again.is_ok());
    }

    /// All three legs off by more than the tolerance are rejected.
    #[test]
    fn inconsistent_triple_rejected(
        zf in 0.01f64..80.0,
        rho in 1e-4f64..50.0,
        deviation in 2e-4f64..10.0,
        sign in prop::bool::ANY,
    ) {
        let factor = if sign { 1.0 + deviation } else { 1.0 / (1.0 + deviation) };
        let ne = rho * zf * AVOGADRO * 1e6 * factor;
        let result = ParameterSet::new(ParameterInput {
            electron_density: Some(ne),
            ..base_input(zf, rho)
        });
        let is_inconsistent = matches!(result, Err(XrtsError::InconsistentPhysicalParameters { .. }));
        prop_assert!(is_inconsistent);
    }

    /// All three legs within the tolerance are kept exactly as given.
    #[test]
    fn consistent_triple_kept_verbatim(
        zf in 0.01f64..80.0,
        rho in 1e-4f64..50.0,
        deviation in -9e-5f64..9e-5,
    ) {
        let ne = rho * zf * AVOGADRO * 1e6 * (1.0 + deviation);
        let params = ParameterSet::new(ParameterInput {
            electron_density: Some(ne),
            ..base_input(zf, rho)
        }).unwrap();
        prop_assert_eq!(params.electron_density(), ne);
        prop_assert_eq!(params.ion_charge(), zf);
        prop_assert_eq!(params.mass_density(), rho);
    }
}

// ── Derived Defaults ─────────────────────────────────────────────────

proptest! {
    /// Without an explicit window, max = -min = 10ωₚ and step = 0.1ωₚ.
    #[test]
    fn default_energy_window(zf in 0.1f64..40.0, rho in 1e-3f64..30.0) {
        let params = ParameterSet::new(base_input(zf, rho)).unwrap();
        let wpl = plasma_frequency_ev(params.electron_density());
        let range = params.energy_range();
        prop_assert!((range.max - 10.0 * wpl).abs() <= 1e-12 * range.max.abs());
        prop_assert_eq!(range.max, -range.min);
        prop_assert!((range.step - 0.1 * wpl).abs() <= 1e-12 * range.step.abs());
    }

    /// Any angle in (0, 180] is accepted.
    #[test]
    fn scattering_angle_in_range_accepted(angle in 1e-6f64..=180.0) {
        let params = ParameterSet::new(ParameterInput {
            scattering_angle: Some(angle),
            ..base_input(2.0, 1.0)
        });
        prop_assert!(params.is_ok());
    }

    /// Angles above 180 are rejected.
    #[test]
    fn scattering_angle_above_range_rejected(angle in 180.0001f64..1e4) {
        let params = ParameterSet::new(ParameterInput {
            scattering_angle: Some(angle),
            ..base_input(2.0, 1.0)
        });
        let is_out_of_range = matches!(params, Err(XrtsError::OutOfRangeValue { .. }));
        prop_assert!(is_out_of_range);
    }

    /// Omitted ion temperature follows the electron temperature.
    #[test]
    fn ion_temperature_defaults_to_electron(te in 1e-3f64..1e5) {
        let params = ParameterSet::new(ParameterInput {
            electron_temperature: Some(te),
            ..base_input(2.0, 1.0)
        }).unwrap();
        prop_assert_eq!(params.ion_temperature(), te);
    }
}

// ── JSON Export ──────────────────────────────────────────────────────

proptest! {
    /// Reloading the JSON export reproduces every float bit for bit.
    #[test]
    fn json_export_reloads_exactly(
        zf in 0.01f64..80.0,
        rho in 1e-4f64..50.0,
        ne_given in prop::bool::ANY,
    ) {
        let input = if ne_given {
            ParameterInput {
                electron_density: Some(rho * zf * AVOGADRO * 1e6 * 1.000_01),
                mass_density: None,
                ..base_input(zf, rho)
            }
        } else {
            base_input(zf, rho)
        };
        let params = ParameterSet::new(input).unwrap();
        let json = params.to_json().unwrap();
        let again = ParameterSet::new(ParameterInput::from_json_str(&json).unwrap()).unwrap();

        prop_assert_eq!(again.electron_density(), params.electron_density());
        prop_assert_eq!(again.ion_charge(), params.ion_charge());
        prop_assert_eq!(again.mass_density(), params.mass_density());
        prop_assert_eq!(again.energy_range(), params.energy_range());
        prop_assert_eq!(again.densities().derived(), params.densities().derived());
    }
}

// ── Input Deck ───────────────────────────────────────────────────────

proptest! {
    /// One TARGET line per element, four tokens each, in input order.
    #[test]
    fn species_block_matches_elements(
        elements in prop::collection::vec(element_strategy(), 1..8),
    ) {
        let params = ParameterSet::new(ParameterInput {
            elements: Some(elements.clone()),
            ..base_input(2.0, 1.0)
        }).unwrap();
        let deck = params.render_deck().unwrap();

        let targets: Vec<&str> = deck.lines().filter(|l| l.starts_with("TARGET_")).collect();
        prop_assert_eq!(targets.len(), elements.len());
        for (i, (line, element)) in targets.iter().zip(&elements).enumerate() {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            prop_assert_eq!(tokens.len(), 4);
            let index = format!("TARGET_{}", i + 1);
            let count = element.count.to_string();
            let charge = element.charge.to_string();
            prop_assert_eq!(tokens[0], index.as_str());
            prop_assert_eq!(tokens[1], element.symbol.as_str());
            prop_assert_eq!(tokens[2], count.as_str());
            prop_assert_eq!(tokens[3], charge.as_str());
        }
    }
}

#[test]
fn scattering_angle_boundaries() {
    let with_angle = |angle: f64| {
        ParameterSet::new(ParameterInput {
            scattering_angle: Some(angle),
            ..base_input(2.0, 1.0)
        })
    };
    assert!(matches!(with_angle(0.0), Err(XrtsError::OutOfRangeValue { .. })));
    assert!(with_angle(180.0).is_ok());
    assert!(matches!(with_angle(180.0001), Err(XrtsError::OutOfRangeValue { .. })));
}

#[test]
fn both_temperatures_missing() {
    let result = ParameterSet::new(ParameterInput {
        electron_temperature: None,
        ion_temperature: None,
        ..base_input(2.0, 1.0)
    });
    assert!(matches!(result, Err(XrtsError::MissingRequiredValue { .. })));
}

#[test]
fn plastic_and_unknown_element() {
    let plastic = ParameterSet::new(ParameterInput {
        elements: Some(vec![Element::new("C", 1, 4), Element::new("H", 1, -1)]),
        ..base_input(2.0, 1.0)
    });
    assert!(plastic.is_ok());

    let unknown = ParameterSet::new(ParameterInput {
        elements: Some(vec![Element::new("Xx", 1, 1)]),
        ..base_input(2.0, 1.0)
    });
    assert!(matches!(unknown, Err(XrtsError::InvalidChoice { .. })));
}
