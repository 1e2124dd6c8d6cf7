// ─────────────────────────────────────────────────────────────────────
// XRTS Parameter Core — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Physical constants (CODATA 2018).

/// Avogadro constant (1/mol)
pub const AVOGADRO: f64 = 6.022_140_76e23;

/// Bohr radius (m)
pub const BOHR_RADIUS_M: f64 = 5.291_772_109_03e-11;

/// Rydberg energy, R∞·h·c (eV)
pub const RYDBERG_ENERGY_EV: f64 = 13.605_693_122_994;

/// g/cm³ → SI conversion factor applied in the density relation
/// `ne = ρ · Zf · Nₐ · 1e6`.
pub const CM3_PER_M3: f64 = 1.0e6;

/// Relative tolerance for the ne / Zf / ρ consistency check.
pub const DENSITY_CONSISTENCY_TOL: f64 = 1.0e-4;

/// Largest scattering angle (degrees).
pub const MAX_SCATTERING_ANGLE_DEG: f64 = 180.0;

/// Upper bound on the number of energies in one scan window.
pub const MAX_SCAN_POINTS: usize = 1_000_000;
