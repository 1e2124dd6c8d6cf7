// ─────────────────────────────────────────────────────────────────────
// XRTS Parameter Core — Field Validators
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! One checker per calculation option.
//!
//! Every validator takes the raw value (`None` when the caller did not give
//! one) and returns the committed value, falling back to the option's
//! default where one exists.

use xrts_types::config::EnergyRange;
use xrts_types::constants::MAX_SCATTERING_ANGLE_DEG;
use xrts_types::elements::{Element, ElementTable};
use xrts_types::error::{XrtsError, XrtsResult};
use xrts_types::models::{
    IplModel, MixModel, NamedModel, SbfModel, SbfNorm, SeeModel, Selector, SiiModel,
};

fn required(value: Option<f64>, field: &str) -> XrtsResult<f64> {
    value.ok_or_else(|| XrtsError::missing(field))
}

fn positive(value: f64, field: &str) -> XrtsResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(XrtsError::out_of_range(field, value, "> 0"))
    }
}

fn non_negative(value: f64, field: &str) -> XrtsResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(XrtsError::out_of_range(field, value, ">= 0"))
    }
}

fn finite(value: f64, field: &str) -> XrtsResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(XrtsError::out_of_range(field, value, "finite"))
    }
}

/// Target species: required, non-empty, known symbols, count ≥ 1, charge ≥ -1.
pub fn elements(value: Option<Vec<Element>>, table: &dyn ElementTable) -> XrtsResult<Vec<Element>> {
    let elements = value.ok_or_else(|| XrtsError::missing("elements"))?;
    if elements.is_empty() {
        return Err(XrtsError::missing("elements"));
    }

    for (i, element) in elements.iter().enumerate() {
        if !table.contains(&element.symbol) {
            return Err(XrtsError::InvalidChoice {
                field: format!("elements[{i}].symbol"),
                value: element.symbol.clone(),
                allowed: "a chemical element symbol".to_string(),
            });
        }
        if element.count == 0 {
            return Err(XrtsError::out_of_range(
                format!("elements[{i}].count"),
                0.0,
                "a positive integer",
            ));
        }
        if element.charge < -1 {
            return Err(XrtsError::out_of_range(
                format!("elements[{i}].charge"),
                f64::from(element.charge),
                ">= -1",
            ));
        }
    }
    Ok(elements)
}

/// Scattering angle in degrees, 0 < θ ≤ 180. No default.
pub fn scattering_angle(value: Option<f64>) -> XrtsResult<f64> {
    let angle = required(value, "scattering_angle")?;
    if angle > 0.0 && angle <= MAX_SCATTERING_ANGLE_DEG {
        Ok(angle)
    } else {
        Err(XrtsError::out_of_range(
            "scattering_angle",
            angle,
            "in (0, 180] degrees",
        ))
    }
}

/// Electron temperature [eV], > 0. No default.
pub fn electron_temperature(value: Option<f64>) -> XrtsResult<f64> {
    positive(required(value, "electron_temperature")?, "electron_temperature")
}

/// Ion temperature [eV], > 0. Defaults to the electron temperature.
pub fn ion_temperature(value: Option<f64>, electron_temperature: Option<f64>) -> XrtsResult<f64> {
    let t = value
        .or(electron_temperature)
        .ok_or_else(|| XrtsError::missing("ion_temperature"))?;
    positive(t, "ion_temperature")
}

/// Electron number density [1/m³], > 0.
pub fn electron_density(value: f64) -> XrtsResult<f64> {
    positive(value, "electron_density")
}

/// Average ion charge [e], > 0.
pub fn ion_charge(value: f64) -> XrtsResult<f64> {
    positive(value, "ion_charge")
}

/// Mass density [g/cm³], > 0.
pub fn mass_density(value: f64) -> XrtsResult<f64> {
    positive(value, "mass_density")
}

/// Debye temperature [eV], ≥ 0, default 0.
pub fn debye_temperature(value: Option<f64>) -> XrtsResult<f64> {
    non_negative(value.unwrap_or(0.0), "debye_temperature")
}

/// Band gap [eV], ≥ 0, default 0.
pub fn band_gap(value: Option<f64>) -> XrtsResult<f64> {
    non_negative(value.unwrap_or(0.0), "band_gap")
}

/// Local field correction; 0 lets the engine compute it.
pub fn lfc(value: Option<f64>) -> XrtsResult<f64> {
    finite(value.unwrap_or(0.0), "lfc")
}

/// Probe photon energy [eV], > 0 when given.
pub fn photon_energy(value: Option<f64>) -> XrtsResult<Option<f64>> {
    value.map(|e| positive(e, "photon_energy")).transpose()
}

/// Shape check for a caller-supplied scan window.
pub fn energy_range(range: EnergyRange) -> XrtsResult<EnergyRange> {
    finite(range.min, "energy_range.min")?;
    finite(range.max, "energy_range.max")?;
    positive(range.step, "energy_range.step")?;
    if range.max <= range.min {
        return Err(XrtsError::out_of_range(
            "energy_range.max",
            range.max,
            "greater than energy_range.min",
        ));
    }
    crate::energy::scan_len(&range)?;
    Ok(range)
}

/// Ion-ion structure factor: named model or a fixed Sii ≥ 0. Default SOCP.
pub fn model_sii(value: Option<Selector<SiiModel>>) -> XrtsResult<Selector<SiiModel>> {
    match value.unwrap_or_default() {
        Selector::Fixed(v) => non_negative(v, SiiModel::FIELD).map(Selector::Fixed),
        named => Ok(named),
    }
}

/// Electron-electron structure factor model. Default RPA.
pub fn model_see(value: Option<SeeModel>) -> XrtsResult<SeeModel> {
    Ok(value.unwrap_or_default())
}

/// Bound-free structure factor model. Default IA.
pub fn model_sbf(value: Option<SbfModel>) -> XrtsResult<SbfModel> {
    Ok(value.unwrap_or_default())
}

/// Ionization potential lowering: named model or a fixed lowering [eV].
/// Default SP.
pub fn model_ipl(value: Option<Selector<IplModel>>) -> XrtsResult<Selector<IplModel>> {
    match value.unwrap_or_default() {
        Selector::Fixed(v) => finite(v, IplModel::FIELD).map(Selector::Fixed),
        named => Ok(named),
    }
}

/// Species mixing model. Default none.
pub fn model_mix(value: Option<MixModel>) -> XrtsResult<MixModel> {
    Ok(value.unwrap_or_default())
}

/// Bound-free normalization: FK, NO, none or a fixed norm. Default none.
pub fn sbf_norm(value: Option<Selector<SbfNorm>>) -> XrtsResult<Selector<SbfNorm>> {
    match value.unwrap_or_default() {
        Selector::Fixed(v) => finite(v, SbfNorm::FIELD).map(Selector::Fixed),
        named => Ok(named),
    }
}
