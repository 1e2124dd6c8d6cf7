// ─────────────────────────────────────────────────────────────────────
// XRTS Parameter Core — XRTS Python
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! PyO3 Python bindings for the XRTS parameter core.
//!
//! Exposes `PlasmaXrtsParameters` with keyword construction, validated
//! properties and input-deck writing. Model selectors take either a model
//! name (`str`) or a fixed value (`float`) where the engine allows one.

use std::collections::HashMap;
use std::path::PathBuf;

use numpy::{IntoPyArray, PyArray1};
use pyo3::exceptions::{PyIOError, PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyDict, PyFloat, PyString};

use xrts_core::deck::DeckOptions;
use xrts_core::energy::{energy_grid, plasma_frequency_ev};
use xrts_core::parameters::ParameterSet;
use xrts_types::config::{EnergyRange, ParameterInput};
use xrts_types::elements::Element;
use xrts_types::error::XrtsError;
use xrts_types::models::{NamedModel, Selector};

fn to_py_err(err: XrtsError) -> PyErr {
    match &err {
        XrtsError::TypeMismatch { .. } => PyTypeError::new_err(err.to_string()),
        XrtsError::Io(_) => PyIOError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

fn type_mismatch(field: &str, expected: &'static str, value: &Bound<'_, PyAny>) -> PyErr {
    to_py_err(XrtsError::TypeMismatch {
        field: field.to_string(),
        expected,
        found: value.get_type().to_string(),
    })
}

// ─── Argument conversion ───

fn extract_elements(entries: Vec<Bound<'_, PyAny>>) -> PyResult<Vec<Element>> {
    let mut elements = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let parts: Vec<Bound<'_, PyAny>> = entry
            .extract()
            .map_err(|_| type_mismatch(&format!("elements[{i}]"), "[symbol, count, charge]", entry))?;
        if parts.len() != 3 {
            return Err(to_py_err(XrtsError::InvalidConfiguration(format!(
                "elements[{i}] must have exactly 3 entries [symbol, count, charge], got {}",
                parts.len()
            ))));
        }
        let symbol: String = parts[0]
            .extract()
            .map_err(|_| type_mismatch(&format!("elements[{i}].symbol"), "str", &parts[0]))?;
        let count: i64 = parts[1]
            .extract()
            .map_err(|_| type_mismatch(&format!("elements[{i}].count"), "int", &parts[1]))?;
        let charge: i64 = parts[2]
            .extract()
            .map_err(|_| type_mismatch(&format!("elements[{i}].charge"), "int", &parts[2]))?;
        let count = u32::try_from(count).map_err(|_| {
            to_py_err(XrtsError::out_of_range(
                format!("elements[{i}].count"),
                count as f64,
                "a positive integer",
            ))
        })?;
        let charge = i32::try_from(charge).map_err(|_| {
            to_py_err(XrtsError::out_of_range(
                format!("elements[{i}].charge"),
                charge as f64,
                ">= -1",
            ))
        })?;
        elements.push(Element::new(symbol, count, charge));
    }
    Ok(elements)
}

fn invalid_configuration(message: String) -> PyErr {
    to_py_err(XrtsError::InvalidConfiguration(message))
}

/// A float that is not a `bool`; Python would otherwise read `True` as 1.0.
fn extract_real(field: &str, value: &Bound<'_, PyAny>) -> PyResult<f64> {
    if value.is_instance_of::<PyBool>() {
        return Err(type_mismatch(field, "number", value));
    }
    value
        .extract::<f64>()
        .map_err(|_| type_mismatch(field, "number", value))
}

fn extract_energy_range(value: Option<&Bound<'_, PyAny>>) -> PyResult<Option<EnergyRange>> {
    let Some(value) = value.filter(|v| !v.is_none()) else {
        return Ok(None);
    };
    let dict = value.downcast::<PyDict>().map_err(|_| {
        invalid_configuration(format!(
            "energy_range must be a dict with keys min, max, step; got {}",
            value.get_type()
        ))
    })?;

    let mut bounds: HashMap<String, Bound<'_, PyAny>> = HashMap::with_capacity(dict.len());
    for (key, item) in dict.iter() {
        let key: String = key.extract().map_err(|_| {
            invalid_configuration(format!("energy_range keys must be str; got {}", key.get_type()))
        })?;
        bounds.insert(key, item);
    }
    let mut keys: Vec<&str> = bounds.keys().map(String::as_str).collect();
    keys.sort_unstable();
    if keys != ["max", "min", "step"] {
        return Err(invalid_configuration(format!(
            "energy_range must have exactly the keys min, max, step; got [{}]",
            keys.join(", ")
        )));
    }

    let bound = |key: &str| extract_real(&format!("energy_range.{key}"), &bounds[key]);
    Ok(Some(EnergyRange {
        min: bound("min")?,
        max: bound("max")?,
        step: bound("step")?,
    }))
}

fn extract_selector<M: NamedModel>(value: Option<&Bound<'_, PyAny>>) -> PyResult<Option<Selector<M>>> {
    let Some(value) = value.filter(|v| !v.is_none()) else {
        return Ok(None);
    };
    if let Ok(name) = value.extract::<String>() {
        return Selector::parse_named(&name).map(Some).map_err(to_py_err);
    }
    if value.is_instance_of::<PyBool>() {
        return Err(type_mismatch(M::FIELD, "model name or number", value));
    }
    if let Ok(fixed) = value.extract::<f64>() {
        return Ok(Some(Selector::Fixed(fixed)));
    }
    Err(type_mismatch(M::FIELD, "model name or number", value))
}

fn extract_named<M: NamedModel>(value: Option<&Bound<'_, PyAny>>) -> PyResult<Option<M>> {
    let Some(value) = value.filter(|v| !v.is_none()) else {
        return Ok(None);
    };
    let name: String = value
        .extract()
        .map_err(|_| type_mismatch(M::FIELD, "model name", value))?;
    M::parse(&name).map(Some).map_err(to_py_err)
}

fn selector_to_py<M: NamedModel>(py: Python<'_>, selector: Selector<M>) -> PyObject {
    match selector {
        Selector::Named(model) => PyString::new(py, model.name()).into_any().unbind(),
        Selector::Fixed(value) => PyFloat::new(py, value).into_any().unbind(),
    }
}

// ─── Parameter set ───

/// Validated parameters of a plasma XRTS calculation.
#[pyclass]
struct PlasmaXrtsParameters {
    inner: ParameterSet,
}

#[pymethods]
impl PlasmaXrtsParameters {
    /// Validate all options; missing ones get their defaults.
    #[new]
    #[pyo3(signature = (
        elements=None,
        scattering_angle=None,
        electron_temperature=None,
        electron_density=None,
        ion_temperature=None,
        ion_charge=None,
        mass_density=None,
        debye_temperature=None,
        band_gap=None,
        energy_range=None,
        model_Sii=None,
        model_See=None,
        model_Sbf=None,
        model_IPL=None,
        model_Mix=None,
        lfc=None,
        Sbf_norm=None,
        photon_energy=None,
    ))]
    #[allow(clippy::too_many_arguments, non_snake_case)]
    fn new(
        elements: Option<Vec<Bound<'_, PyAny>>>,
        scattering_angle: Option<f64>,
        electron_temperature: Option<f64>,
        electron_density: Option<f64>,
        ion_temperature: Option<f64>,
        ion_charge: Option<f64>,
        mass_density: Option<f64>,
        debye_temperature: Option<f64>,
        band_gap: Option<f64>,
        energy_range: Option<&Bound<'_, PyAny>>,
        model_Sii: Option<&Bound<'_, PyAny>>,
        model_See: Option<&Bound<'_, PyAny>>,
        model_Sbf: Option<&Bound<'_, PyAny>>,
        model_IPL: Option<&Bound<'_, PyAny>>,
        model_Mix: Option<&Bound<'_, PyAny>>,
        lfc: Option<f64>,
        Sbf_norm: Option<&Bound<'_, PyAny>>,
        photon_energy: Option<f64>,
    ) -> PyResult<Self> {
        let input = ParameterInput {
            elements: elements.map(extract_elements).transpose()?,
            scattering_angle,
            electron_temperature,
            electron_density,
            ion_temperature,
            ion_charge,
            mass_density,
            debye_temperature,
            band_gap,
            energy_range: extract_energy_range(energy_range)?,
            model_sii: extract_selector(model_Sii)?,
            model_see: extract_named(model_See)?,
            model_sbf: extract_named(model_Sbf)?,
            model_ipl: extract_selector(model_IPL)?,
            model_mix: extract_named(model_Mix)?,
            lfc,
            sbf_norm: extract_selector(Sbf_norm)?,
            photon_energy,
        };
        let inner = ParameterSet::new(input).map_err(to_py_err)?;
        Ok(PlasmaXrtsParameters { inner })
    }

    /// Load and validate options from a JSON file.
    #[staticmethod]
    fn from_file(path: PathBuf) -> PyResult<Self> {
        let inner = ParameterSet::from_file(path).map_err(to_py_err)?;
        Ok(PlasmaXrtsParameters { inner })
    }

    /// Validate options given as a JSON string.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        let input = ParameterInput::from_json_str(json).map_err(to_py_err)?;
        let inner = ParameterSet::new(input).map_err(to_py_err)?;
        Ok(PlasmaXrtsParameters { inner })
    }

    #[getter]
    fn elements(&self) -> Vec<(String, u32, i32)> {
        self.inner
            .elements()
            .iter()
            .map(|e| (e.symbol.clone(), e.count, e.charge))
            .collect()
    }

    #[setter]
    fn set_elements(&mut self, value: Vec<Bound<'_, PyAny>>) -> PyResult<()> {
        let elements = extract_elements(value)?;
        self.inner.set_elements(elements).map_err(to_py_err)
    }

    #[getter]
    fn scattering_angle(&self) -> f64 {
        self.inner.scattering_angle()
    }

    #[setter]
    fn set_scattering_angle(&mut self, value: f64) -> PyResult<()> {
        self.inner.set_scattering_angle(value).map_err(to_py_err)
    }

    #[getter]
    fn electron_temperature(&self) -> f64 {
        self.inner.electron_temperature()
    }

    #[setter]
    fn set_electron_temperature(&mut self, value: f64) -> PyResult<()> {
        self.inner.set_electron_temperature(value).map_err(to_py_err)
    }

    #[getter]
    fn ion_temperature(&self) -> f64 {
        self.inner.ion_temperature()
    }

    #[setter]
    fn set_ion_temperature(&mut self, value: Option<f64>) -> PyResult<()> {
        self.inner.set_ion_temperature(value).map_err(to_py_err)
    }

    #[getter]
    fn electron_density(&self) -> f64 {
        self.inner.electron_density()
    }

    #[getter]
    fn ion_charge(&self) -> f64 {
        self.inner.ion_charge()
    }

    #[getter]
    fn mass_density(&self) -> f64 {
        self.inner.mass_density()
    }

    /// Re-solve the density triple from at least two of its legs.
    #[pyo3(signature = (electron_density=None, ion_charge=None, mass_density=None))]
    fn update_densities(
        &mut self,
        electron_density: Option<f64>,
        ion_charge: Option<f64>,
        mass_density: Option<f64>,
    ) -> PyResult<()> {
        self.inner
            .update_densities(electron_density, ion_charge, mass_density)
            .map_err(to_py_err)
    }

    /// Set the electron density alone, leaving ion charge and mass density as they are.
    fn override_electron_density(&mut self, value: f64) -> PyResult<()> {
        self.inner.override_electron_density(value).map_err(to_py_err)
    }

    fn override_ion_charge(&mut self, value: f64) -> PyResult<()> {
        self.inner.override_ion_charge(value).map_err(to_py_err)
    }

    fn override_mass_density(&mut self, value: f64) -> PyResult<()> {
        self.inner.override_mass_density(value).map_err(to_py_err)
    }

    /// False after an `override_*` call until the triple is re-solved.
    #[getter]
    fn densities_synchronized(&self) -> bool {
        self.inner.densities().is_synchronized()
    }

    #[getter]
    fn debye_temperature(&self) -> f64 {
        self.inner.debye_temperature()
    }

    #[setter]
    fn set_debye_temperature(&mut self, value: Option<f64>) -> PyResult<()> {
        self.inner.set_debye_temperature(value).map_err(to_py_err)
    }

    #[getter]
    fn band_gap(&self) -> f64 {
        self.inner.band_gap()
    }

    #[setter]
    fn set_band_gap(&mut self, value: Option<f64>) -> PyResult<()> {
        self.inner.set_band_gap(value).map_err(to_py_err)
    }

    /// Energy window as a dict with keys min, max, step [eV].
    #[getter]
    fn energy_range(&self) -> HashMap<&'static str, f64> {
        let range = self.inner.energy_range();
        HashMap::from([("min", range.min), ("max", range.max), ("step", range.step)])
    }

    #[setter]
    fn set_energy_range(&mut self, value: Option<&Bound<'_, PyAny>>) -> PyResult<()> {
        let range = extract_energy_range(value)?;
        self.inner.set_energy_range(range).map_err(to_py_err)
    }

    /// Scan energies [eV] as a numpy array.
    fn energy_grid<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray1<f64>>> {
        let grid = energy_grid(&self.inner.energy_range()).map_err(to_py_err)?;
        Ok(grid.into_pyarray(py))
    }

    #[getter(model_Sii)]
    fn model_sii(&self, py: Python<'_>) -> PyObject {
        selector_to_py(py, self.inner.model_sii())
    }

    #[setter(model_Sii)]
    fn set_model_sii(&mut self, value: Option<&Bound<'_, PyAny>>) -> PyResult<()> {
        let model = extract_selector(value)?;
        self.inner.set_model_sii(model).map_err(to_py_err)
    }

    #[getter(model_See)]
    fn model_see(&self) -> &'static str {
        self.inner.model_see().name()
    }

    #[setter(model_See)]
    fn set_model_see(&mut self, value: Option<&Bound<'_, PyAny>>) -> PyResult<()> {
        let model = extract_named(value)?;
        self.inner.set_model_see(model).map_err(to_py_err)
    }

    #[getter(model_Sbf)]
    fn model_sbf(&self) -> &'static str {
        self.inner.model_sbf().name()
    }

    #[setter(model_Sbf)]
    fn set_model_sbf(&mut self, value: Option<&Bound<'_, PyAny>>) -> PyResult<()> {
        let model = extract_named(value)?;
        self.inner.set_model_sbf(model).map_err(to_py_err)
    }

    #[getter(model_IPL)]
    fn model_ipl(&self, py: Python<'_>) -> PyObject {
        selector_to_py(py, self.inner.model_ipl())
    }

    #[setter(model_IPL)]
    fn set_model_ipl(&mut self, value: Option<&Bound<'_, PyAny>>) -> PyResult<()> {
        let model = extract_selector(value)?;
        self.inner.set_model_ipl(model).map_err(to_py_err)
    }

    #[getter(model_Mix)]
    fn model_mix(&self) -> &'static str {
        self.inner.model_mix().name()
    }

    #[setter(model_Mix)]
    fn set_model_mix(&mut self, value: Option<&Bound<'_, PyAny>>) -> PyResult<()> {
        let model = extract_named(value)?;
        self.inner.set_model_mix(model).map_err(to_py_err)
    }

    #[getter]
    fn lfc(&self) -> f64 {
        self.inner.lfc()
    }

    #[setter]
    fn set_lfc(&mut self, value: Option<f64>) -> PyResult<()> {
        self.inner.set_lfc(value).map_err(to_py_err)
    }

    #[getter(Sbf_norm)]
    fn sbf_norm(&self, py: Python<'_>) -> PyObject {
        selector_to_py(py, self.inner.sbf_norm())
    }

    #[setter(Sbf_norm)]
    fn set_sbf_norm(&mut self, value: Option<&Bound<'_, PyAny>>) -> PyResult<()> {
        let norm = extract_selector(value)?;
        self.inner.set_sbf_norm(norm).map_err(to_py_err)
    }

    #[getter]
    fn photon_energy(&self) -> Option<f64> {
        self.inner.photon_energy()
    }

    #[setter]
    fn set_photon_energy(&mut self, value: Option<f64>) -> PyResult<()> {
        self.inner.set_photon_energy(value).map_err(to_py_err)
    }

    /// Input deck text, without writing anything.
    fn render_deck(&self) -> PyResult<String> {
        self.inner.render_deck().map_err(to_py_err)
    }

    /// Write the input deck into a fresh scratch directory. Returns the
    /// deck path; the directory is left for the caller to remove.
    #[pyo3(signature = (scratch_root=None))]
    fn initialize(&mut self, scratch_root: Option<PathBuf>) -> PyResult<PathBuf> {
        let options = DeckOptions { scratch_root };
        let deck = self.inner.initialize(&options).map_err(to_py_err)?;
        Ok(deck.path)
    }

    #[getter]
    fn is_initialized(&self) -> bool {
        self.inner.is_initialized()
    }

    #[getter]
    fn scratch_dir(&self) -> Option<PathBuf> {
        self.inner.scratch_dir().map(|p| p.to_path_buf())
    }

    /// Resolved parameters as JSON.
    fn to_json(&self) -> PyResult<String> {
        self.inner.to_json().map_err(to_py_err)
    }
}

// ─── Physics helpers ───

/// Electron plasma energy ħωₚ [eV] for an electron density in 1/m³.
#[pyfunction]
fn plasma_frequency(electron_density: f64) -> f64 {
    plasma_frequency_ev(electron_density)
}

// ─── Module registration ───

/// XRTS Parameter Core — validated input decks for plasma XRTS calculations.
#[pymodule]
fn xrts_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PlasmaXrtsParameters>()?;
    m.add_function(wrap_pyfunction!(plasma_frequency, m)?)?;
    Ok(())
}
