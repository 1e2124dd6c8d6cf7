// ─────────────────────────────────────────────────────────────────────
// XRTS Parameter Core — Density Consistency Solver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Electron density, average ion charge and mass density.
//!
//! The three are tied by `ne = ρ · Zf · Nₐ · 1e6` (ne in 1/m³, ρ in g/cm³).
//! Any two determine the third; if all three are given they must agree to
//! a relative error of 1e-4.

use tracing::debug;
use xrts_types::constants::{AVOGADRO, CM3_PER_M3, DENSITY_CONSISTENCY_TOL};
use xrts_types::error::{XrtsError, XrtsResult};

use crate::validators;

/// Which leg of the triple was solved for rather than given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DensityLeg {
    ElectronDensity,
    IonCharge,
    MassDensity,
}

/// A resolved (ne, Zf, ρ) triple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DensityTriple {
    electron_density: f64,
    ion_charge: f64,
    mass_density: f64,
    derived: Option<DensityLeg>,
    synchronized: bool,
}

/// `ρ · Zf · Nₐ · 1e6`, the electron density implied by the other two legs.
pub fn electron_density_from(ion_charge: f64, mass_density: f64) -> f64 {
    mass_density * ion_charge * AVOGADRO * CM3_PER_M3
}

/// Relative deviation of `ne` from `ρ · Zf · Nₐ · 1e6`.
pub fn relative_deviation(electron_density: f64, ion_charge: f64, mass_density: f64) -> f64 {
    (electron_density / electron_density_from(ion_charge, mass_density) - 1.0).abs()
}

/// Resolve the triple from at least two of its legs.
pub fn resolve_densities(
    electron_density: Option<f64>,
    ion_charge: Option<f64>,
    mass_density: Option<f64>,
) -> XrtsResult<DensityTriple> {
    let ne = electron_density.map(validators::electron_density).transpose()?;
    let zf = ion_charge.map(validators::ion_charge).transpose()?;
    let rho = mass_density.map(validators::mass_density).transpose()?;

    let given = [ne, zf, rho].iter().filter(|v| v.is_some()).count();
    if given < 2 {
        return Err(XrtsError::UnderspecifiedSystem { given });
    }

    let (ne, zf, rho, derived) = match (ne, zf, rho) {
        (None, Some(zf), Some(rho)) => (
            electron_density_from(zf, rho),
            zf,
            rho,
            Some(DensityLeg::ElectronDensity),
        ),
        (Some(ne), None, Some(rho)) => (
            ne,
            ne / (rho * AVOGADRO * CM3_PER_M3),
            rho,
            Some(DensityLeg::IonCharge),
        ),
        (Some(ne), Some(zf), None) => (
            ne,
            zf,
            ne / (zf * AVOGADRO * CM3_PER_M3),
            Some(DensityLeg::MassDensity),
        ),
        (Some(ne), Some(zf), Some(rho)) => {
            if relative_deviation(ne, zf, rho) > DENSITY_CONSISTENCY_TOL {
                return Err(XrtsError::InconsistentPhysicalParameters {
                    electron_density: ne,
                    expected: electron_density_from(zf, rho),
                });
            }
            (ne, zf, rho, None)
        }
        _ => return Err(XrtsError::UnderspecifiedSystem { given }),
    };

    // Guards against overflow to ∞ or underflow to 0 in the derived leg.
    match derived {
        Some(DensityLeg::ElectronDensity) => {
            validators::electron_density(ne)?;
        }
        Some(DensityLeg::IonCharge) => {
            validators::ion_charge(zf)?;
        }
        Some(DensityLeg::MassDensity) => {
            validators::mass_density(rho)?;
        }
        None => {}
    }

    debug!(
        electron_density = ne,
        ion_charge = zf,
        mass_density = rho,
        derived = ?derived,
        "density triple resolved"
    );

    Ok(DensityTriple {
        electron_density: ne,
        ion_charge: zf,
        mass_density: rho,
        derived,
        synchronized: true,
    })
}

impl DensityTriple {
    pub fn electron_density(&self) -> f64 {
        self.electron_density
    }

    pub fn ion_charge(&self) -> f64 {
        self.ion_charge
    }

    pub fn mass_density(&self) -> f64 {
        self.mass_density
    }

    /// The leg that was computed by the last resolve, `None` if all three
    /// were given.
    pub fn derived(&self) -> Option<DensityLeg> {
        self.derived
    }

    /// False once a single leg has been overridden without re-solving.
    pub fn is_synchronized(&self) -> bool {
        self.synchronized
    }

    /// Whether the current values satisfy the density relation.
    pub fn is_consistent(&self) -> bool {
        relative_deviation(self.electron_density, self.ion_charge, self.mass_density)
            <= DENSITY_CONSISTENCY_TOL
    }

    /// The `(ne, Zf, ρ)` options that rebuild this triple through
    /// [`resolve_densities`].
    ///
    /// A synchronized triple leaves its derived leg out, so the rebuild
    /// derives the same value. A triple overridden out of consistency
    /// cannot be rebuilt and is refused.
    pub fn input_legs(&self) -> XrtsResult<(Option<f64>, Option<f64>, Option<f64>)> {
        if !self.is_consistent() {
            return Err(XrtsError::InconsistentPhysicalParameters {
                electron_density: self.electron_density,
                expected: electron_density_from(self.ion_charge, self.mass_density),
            });
        }
        let omitted = if self.synchronized { self.derived } else { None };
        let keep = |leg: DensityLeg, value: f64| (omitted != Some(leg)).then_some(value);
        Ok((
            keep(DensityLeg::ElectronDensity, self.electron_density),
            keep(DensityLeg::IonCharge, self.ion_charge),
            keep(DensityLeg::MassDensity, self.mass_density),
        ))
    }

    /// Replace one leg with only its single-field check; the other two
    /// legs are left alone.
    pub(crate) fn override_leg(&mut self, leg: DensityLeg, value: f64) -> XrtsResult<()> {
        match leg {
            DensityLeg::ElectronDensity => {
                self.electron_density = validators::electron_density(value)?
            }
            DensityLeg::IonCharge => self.ion_charge = validators::ion_charge(value)?,
            DensityLeg::MassDensity => self.mass_density = validators::mass_density(value)?,
        }
        self.synchronized = false;
        Ok(())
    }
}
