// ─────────────────────────────────────────────────────────────────────
// XRTS Parameter Core — Parameter Set
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! The validated parameter set of one XRTS calculation.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use xrts_types::config::{EnergyRange, ParameterInput};
use xrts_types::elements::{Element, ElementTable, PeriodicTable};
use xrts_types::error::XrtsResult;
use xrts_types::models::{IplModel, MixModel, SbfModel, SbfNorm, SeeModel, Selector, SiiModel};

use crate::deck::{self, DeckOptions, InputDeck};
use crate::densities::{resolve_densities, DensityLeg, DensityTriple};
use crate::energy;
use crate::validators;

/// All options of a plasma XRTS calculation, validated and with every
/// default filled in.
///
/// Built in one step by [`ParameterSet::new`]. Setters re-run the check of
/// the field they touch and nothing else. The ne / Zf / ρ triple is only
/// changed through [`ParameterSet::update_densities`], which re-runs the
/// consistency solver, or through the explicit `override_*` methods.
#[derive(Debug, Clone)]
pub struct ParameterSet {
    elements: Vec<Element>,
    scattering_angle: f64,
    electron_temperature: f64,
    ion_temperature: f64,
    densities: DensityTriple,
    debye_temperature: f64,
    band_gap: f64,
    energy_range: EnergyRange,
    model_sii: Selector<SiiModel>,
    model_see: SeeModel,
    model_sbf: SbfModel,
    model_ipl: Selector<IplModel>,
    model_mix: MixModel,
    lfc: f64,
    sbf_norm: Selector<SbfNorm>,
    photon_energy: Option<f64>,
    scratch_dir: Option<PathBuf>,
}

impl ParameterSet {
    /// Validate `input` against the periodic table.
    pub fn new(input: ParameterInput) -> XrtsResult<Self> {
        Self::with_table(input, &PeriodicTable)
    }

    /// Validate `input`, looking element symbols up in `table`.
    pub fn with_table(input: ParameterInput, table: &dyn ElementTable) -> XrtsResult<Self> {
        let elements = validators::elements(input.elements, table)?;
        let scattering_angle = validators::scattering_angle(input.scattering_angle)?;
        let electron_temperature = validators::electron_temperature(input.electron_temperature)?;
        let densities =
            resolve_densities(input.electron_density, input.ion_charge, input.mass_density)?;
        let ion_temperature =
            validators::ion_temperature(input.ion_temperature, Some(electron_temperature))?;
        let debye_temperature = validators::debye_temperature(input.debye_temperature)?;
        let band_gap = validators::band_gap(input.band_gap)?;
        let energy_range =
            energy::energy_range(input.energy_range, densities.electron_density())?;
        let model_sii = validators::model_sii(input.model_sii)?;
        let model_see = validators::model_see(input.model_see)?;
        let model_sbf = validators::model_sbf(input.model_sbf)?;
        let model_ipl = validators::model_ipl(input.model_ipl)?;
        let model_mix = validators::model_mix(input.model_mix)?;
        let lfc = validators::lfc(input.lfc)?;
        let sbf_norm = validators::sbf_norm(input.sbf_norm)?;
        let photon_energy = validators::photon_energy(input.photon_energy)?;

        debug!(
            species = elements.len(),
            scattering_angle,
            electron_temperature,
            ion_temperature,
            model_sii = %model_sii,
            model_see = %model_see,
            "XRTS parameters validated"
        );

        Ok(ParameterSet {
            elements,
            scattering_angle,
            electron_temperature,
            ion_temperature,
            densities,
            debye_temperature,
            band_gap,
            energy_range,
            model_sii,
            model_see,
            model_sbf,
            model_ipl,
            model_mix,
            lfc,
            sbf_norm,
            photon_energy,
            scratch_dir: None,
        })
    }

    /// Load options from a JSON file and validate them.
    pub fn from_file(path: impl AsRef<Path>) -> XrtsResult<Self> {
        Self::new(ParameterInput::from_file(path)?)
    }

    // ── Read access ──────────────────────────────────────────────────

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn scattering_angle(&self) -> f64 {
        self.scattering_angle
    }

    pub fn electron_temperature(&self) -> f64 {
        self.electron_temperature
    }

    pub fn ion_temperature(&self) -> f64 {
        self.ion_temperature
    }

    pub fn electron_density(&self) -> f64 {
        self.densities.electron_density()
    }

    pub fn ion_charge(&self) -> f64 {
        self.densities.ion_charge()
    }

    pub fn mass_density(&self) -> f64 {
        self.densities.mass_density()
    }

    pub fn densities(&self) -> &DensityTriple {
        &self.densities
    }

    pub fn debye_temperature(&self) -> f64 {
        self.debye_temperature
    }

    pub fn band_gap(&self) -> f64 {
        self.band_gap
    }

    pub fn energy_range(&self) -> EnergyRange {
        self.energy_range
    }

    pub fn model_sii(&self) -> Selector<SiiModel> {
        self.model_sii
    }

    pub fn model_see(&self) -> SeeModel {
        self.model_see
    }

    pub fn model_sbf(&self) -> SbfModel {
        self.model_sbf
    }

    pub fn model_ipl(&self) -> Selector<IplModel> {
        self.model_ipl
    }

    pub fn model_mix(&self) -> MixModel {
        self.model_mix
    }

    pub fn lfc(&self) -> f64 {
        self.lfc
    }

    pub fn sbf_norm(&self) -> Selector<SbfNorm> {
        self.sbf_norm
    }

    pub fn photon_energy(&self) -> Option<f64> {
        self.photon_energy
    }

    /// Scratch directory of the last written input deck.
    pub fn scratch_dir(&self) -> Option<&Path> {
        self.scratch_dir.as_deref()
    }

    /// True once an input deck has been written for this parameter set.
    pub fn is_initialized(&self) -> bool {
        self.scratch_dir.is_some()
    }

    // ── Single-field updates ─────────────────────────────────────────

    pub fn set_elements(&mut self, elements: Vec<Element>) -> XrtsResult<()> {
        self.set_elements_with_table(elements, &PeriodicTable)
    }

    pub fn set_elements_with_table(
        &mut self,
        elements: Vec<Element>,
        table: &dyn ElementTable,
    ) -> XrtsResult<()> {
        self.elements = validators::elements(Some(elements), table)?;
        Ok(())
    }

    pub fn set_scattering_angle(&mut self, angle: f64) -> XrtsResult<()> {
        self.scattering_angle = validators::scattering_angle(Some(angle))?;
        Ok(())
    }

    /// The ion temperature is not touched; set it explicitly if it should follow.
    pub fn set_electron_temperature(&mut self, temperature: f64) -> XrtsResult<()> {
        self.electron_temperature = validators::electron_temperature(Some(temperature))?;
        Ok(())
    }

    /// `None` resets the ion temperature to the current electron temperature.
    pub fn set_ion_temperature(&mut self, temperature: Option<f64>) -> XrtsResult<()> {
        self.ion_temperature =
            validators::ion_temperature(temperature, Some(self.electron_temperature))?;
        Ok(())
    }

    pub fn set_debye_temperature(&mut self, temperature: Option<f64>) -> XrtsResult<()> {
        self.debye_temperature = validators::debye_temperature(temperature)?;
        Ok(())
    }

    pub fn set_band_gap(&mut self, band_gap: Option<f64>) -> XrtsResult<()> {
        self.band_gap = validators::band_gap(band_gap)?;
        Ok(())
    }

    /// `None` re-derives the window from the current electron density.
    pub fn set_energy_range(&mut self, range: Option<EnergyRange>) -> XrtsResult<()> {
        self.energy_range = energy::energy_range(range, self.densities.electron_density())?;
        Ok(())
    }

    pub fn set_model_sii(&mut self, model: Option<Selector<SiiModel>>) -> XrtsResult<()> {
        self.model_sii = validators::model_sii(model)?;
        Ok(())
    }

    pub fn set_model_see(&mut self, model: Option<SeeModel>) -> XrtsResult<()> {
        self.model_see = validators::model_see(model)?;
        Ok(())
    }

    pub fn set_model_sbf(&mut self, model: Option<SbfModel>) -> XrtsResult<()> {
        self.model_sbf = validators::model_sbf(model)?;
        Ok(())
    }

    pub fn set_model_ipl(&mut self, model: Option<Selector<IplModel>>) -> XrtsResult<()> {
        self.model_ipl = validators::model_ipl(model)?;
        Ok(())
    }

    pub fn set_model_mix(&mut self, model: Option<MixModel>) -> XrtsResult<()> {
        self.model_mix = validators::model_mix(model)?;
        Ok(())
    }

    pub fn set_lfc(&mut self, lfc: Option<f64>) -> XrtsResult<()> {
        self.lfc = validators::lfc(lfc)?;
        Ok(())
    }

    pub fn set_sbf_norm(&mut self, norm: Option<Selector<SbfNorm>>) -> XrtsResult<()> {
        self.sbf_norm = validators::sbf_norm(norm)?;
        Ok(())
    }

    pub fn set_photon_energy(&mut self, energy: Option<f64>) -> XrtsResult<()> {
        self.photon_energy = validators::photon_energy(energy)?;
        Ok(())
    }

    // ── Density triple ───────────────────────────────────────────────

    /// Re-solve the ne / Zf / ρ triple from at least two legs.
    ///
    /// On error the previous triple is kept.
    pub fn update_densities(
        &mut self,
        electron_density: Option<f64>,
        ion_charge: Option<f64>,
        mass_density: Option<f64>,
    ) -> XrtsResult<()> {
        self.densities = resolve_densities(electron_density, ion_charge, mass_density)?;
        Ok(())
    }

    /// Set ne without re-solving; Zf and ρ keep their values.
    pub fn override_electron_density(&mut self, value: f64) -> XrtsResult<()> {
        self.override_density_leg(DensityLeg::ElectronDensity, value)
    }

    /// Set Zf without re-solving; ne and ρ keep their values.
    pub fn override_ion_charge(&mut self, value: f64) -> XrtsResult<()> {
        self.override_density_leg(DensityLeg::IonCharge, value)
    }

    /// Set ρ without re-solving; ne and Zf keep their values.
    pub fn override_mass_density(&mut self, value: f64) -> XrtsResult<()> {
        self.override_density_leg(DensityLeg::MassDensity, value)
    }

    fn override_density_leg(&mut self, leg: DensityLeg, value: f64) -> XrtsResult<()> {
        self.densities.override_leg(leg, value)?;
        if !self.densities.is_consistent() {
            warn!(
                leg = ?leg,
                value,
                electron_density = self.densities.electron_density(),
                ion_charge = self.densities.ion_charge(),
                mass_density = self.densities.mass_density(),
                "density triple overridden out of consistency"
            );
        }
        Ok(())
    }

    // ── Export ───────────────────────────────────────────────────────

    /// Every resolved value as explicit options, except a density leg the
    /// solver derived, which the rebuild derives again.
    ///
    /// Fails with `InconsistentPhysicalParameters` after an `override_*`
    /// left the density triple out of balance.
    pub fn to_input(&self) -> XrtsResult<ParameterInput> {
        let (electron_density, ion_charge, mass_density) = self.densities.input_legs()?;
        Ok(ParameterInput {
            elements: Some(self.elements.clone()),
            scattering_angle: Some(self.scattering_angle),
            electron_temperature: Some(self.electron_temperature),
            electron_density,
            ion_temperature: Some(self.ion_temperature),
            ion_charge,
            mass_density,
            debye_temperature: Some(self.debye_temperature),
            band_gap: Some(self.band_gap),
            energy_range: Some(self.energy_range),
            model_sii: Some(self.model_sii),
            model_see: Some(self.model_see),
            model_sbf: Some(self.model_sbf),
            model_ipl: Some(self.model_ipl),
            model_mix: Some(self.model_mix),
            lfc: Some(self.lfc),
            sbf_norm: Some(self.sbf_norm),
            photon_energy: self.photon_energy,
        })
    }

    /// Resolved parameters as JSON, readable by [`ParameterInput::from_json_str`].
    pub fn to_json(&self) -> XrtsResult<String> {
        self.to_input()?.to_json_string()
    }

    // ── Input deck ───────────────────────────────────────────────────

    /// The engine input deck as text.
    pub fn render_deck(&self) -> XrtsResult<String> {
        deck::render_deck(self)
    }

    /// Write the input deck into a fresh scratch directory and remember it.
    ///
    /// The directory is left on disk; removing it is up to the caller.
    pub fn initialize(&mut self, options: &DeckOptions) -> XrtsResult<InputDeck> {
        let input_deck = deck::write_deck(self, options)?;
        self.scratch_dir = Some(input_deck.dir.clone());
        Ok(input_deck)
    }
}
