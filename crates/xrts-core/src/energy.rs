// ─────────────────────────────────────────────────────────────────────
// XRTS Parameter Core — Energy Window
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Plasma frequency and the default energy scan window.

use ndarray::Array1;
use tracing::debug;
use xrts_types::config::EnergyRange;
use xrts_types::constants::{BOHR_RADIUS_M, CM3_PER_M3, MAX_SCAN_POINTS, RYDBERG_ENERGY_EV};
use xrts_types::error::{XrtsError, XrtsResult};

use crate::validators;

/// Half-width of the default window in units of ħωₚ.
const WINDOW_HALF_WIDTH: f64 = 10.0;

/// Default step in units of ħωₚ.
const WINDOW_STEP: f64 = 0.1;

/// Electron plasma energy ħωₚ [eV] for an electron density in 1/m³.
///
/// ħωₚ = 4·√(nₑ·a₀³·π)·Ry with nₑ in cm⁻³ and a₀ in cm.
pub fn plasma_frequency_ev(electron_density: f64) -> f64 {
    let bohr_radius_cm = BOHR_RADIUS_M * 1e2;
    let ne_per_cm3 = electron_density / CM3_PER_M3;
    4.0 * (ne_per_cm3 * bohr_radius_cm.powi(3) * std::f64::consts::PI).sqrt() * RYDBERG_ENERGY_EV
}

/// ±10·ħωₚ with a step of 0.1·ħωₚ.
pub fn default_energy_range(electron_density: f64) -> EnergyRange {
    let wpl = plasma_frequency_ev(electron_density);
    EnergyRange {
        min: -WINDOW_HALF_WIDTH * wpl,
        max: WINDOW_HALF_WIDTH * wpl,
        step: WINDOW_STEP * wpl,
    }
}

/// Caller's window if given (shape-checked), else the plasma-frequency default.
///
/// Must run after the density triple is resolved.
pub fn energy_range(value: Option<EnergyRange>, electron_density: f64) -> XrtsResult<EnergyRange> {
    match value {
        Some(range) => validators::energy_range(range),
        None => {
            let range = default_energy_range(electron_density);
            debug!(
                min = range.min,
                max = range.max,
                step = range.step,
                "energy range derived from plasma frequency"
            );
            Ok(range)
        }
    }
}

/// Number of scan energies `min, min + step, ...` not exceeding `max`.
///
/// Fails when the window holds more than [`MAX_SCAN_POINTS`] energies.
pub fn scan_len(range: &EnergyRange) -> XrtsResult<usize> {
    // Tolerate round-off so that `max` itself is included when it lies on the grid.
    let steps = ((range.max - range.min) / range.step + 1e-9).floor();
    if !(0.0..MAX_SCAN_POINTS as f64).contains(&steps) {
        return Err(XrtsError::out_of_range(
            "energy_range.step",
            range.step,
            "at most 1000000 energies between energy_range.min and energy_range.max",
        ));
    }
    Ok(steps as usize + 1)
}

/// The scan energies as an array.
pub fn energy_grid(range: &EnergyRange) -> XrtsResult<Array1<f64>> {
    let len = scan_len(range)?;
    Ok(Array1::from_shape_fn(len, |i| range.min + i as f64 * range.step))
}
