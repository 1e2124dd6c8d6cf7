// ─────────────────────────────────────────────────────────────────────
// XRTS Parameter Core — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use std::path::Path;

use serde::ser::SerializeTuple;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::elements::Element;
use crate::error::{XrtsError, XrtsResult};
use crate::models::{IplModel, MixModel, NamedModel, SbfModel, SbfNorm, SeeModel, Selector, SiiModel};

/// Energy scan window of the calculated spectrum [eV].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnergyRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

/// Raw calculation options as given by the caller.
///
/// `None` means "not given": the field's default or derivation policy
/// applies when the options are turned into a validated parameter set.
/// JSON key names match the option names of the engine front-end
/// (`model_Sii`, `Sbf_norm`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParameterInput {
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_elements")]
    pub elements: Option<Vec<Element>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scattering_angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub electron_temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub electron_density: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ion_temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ion_charge: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mass_density: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debye_temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band_gap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_range: Option<EnergyRange>,
    #[serde(rename = "model_Sii", skip_serializing_if = "Option::is_none")]
    pub model_sii: Option<Selector<SiiModel>>,
    #[serde(rename = "model_See", skip_serializing_if = "Option::is_none")]
    pub model_see: Option<SeeModel>,
    #[serde(rename = "model_Sbf", skip_serializing_if = "Option::is_none")]
    pub model_sbf: Option<SbfModel>,
    #[serde(rename = "model_IPL", skip_serializing_if = "Option::is_none")]
    pub model_ipl: Option<Selector<IplModel>>,
    #[serde(rename = "model_Mix", skip_serializing_if = "Option::is_none")]
    pub model_mix: Option<MixModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lfc: Option<f64>,
    #[serde(rename = "Sbf_norm", skip_serializing_if = "Option::is_none")]
    pub sbf_norm: Option<Selector<SbfNorm>>,
    /// Probe photon energy [eV]; only needed to write the input deck.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photon_energy: Option<f64>,
}

/// Elements are written as `[symbol, count, charge]` triples, the same
/// shape [`ParameterInput::from_json_str`] reads.
fn serialize_elements<S: Serializer>(
    elements: &Option<Vec<Element>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    struct Entry<'a>(&'a Element);

    impl Serialize for Entry<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut tuple = serializer.serialize_tuple(3)?;
            tuple.serialize_element(&self.0.symbol)?;
            tuple.serialize_element(&self.0.count)?;
            tuple.serialize_element(&self.0.charge)?;
            tuple.end()
        }
    }

    let entries: Option<Vec<Entry<'_>>> = elements
        .as_ref()
        .map(|list| list.iter().map(Entry).collect());
    entries.serialize(serializer)
}

const KNOWN_OPTIONS: [&str; 18] = [
    "elements",
    "scattering_angle",
    "electron_temperature",
    "electron_density",
    "ion_temperature",
    "ion_charge",
    "mass_density",
    "debye_temperature",
    "band_gap",
    "energy_range",
    "model_Sii",
    "model_See",
    "model_Sbf",
    "model_IPL",
    "model_Mix",
    "lfc",
    "Sbf_norm",
    "photon_energy",
];

impl ParameterInput {
    /// Load options from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> XrtsResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(contents: &str) -> XrtsResult<Self> {
        let value: Value = serde_json::from_str(contents)?;
        Self::from_json_value(&value)
    }

    /// Strict conversion from an untyped JSON object.
    ///
    /// `null` counts as "not given". Any other value must already have the
    /// option's primitive type, otherwise [`XrtsError::TypeMismatch`].
    pub fn from_json_value(value: &Value) -> XrtsResult<Self> {
        let obj = value.as_object().ok_or_else(|| {
            XrtsError::InvalidConfiguration(format!(
                "options must be a JSON object, got {}",
                json_kind(value)
            ))
        })?;

        if let Some(unknown) = obj.keys().find(|k| !KNOWN_OPTIONS.contains(&k.as_str())) {
            return Err(XrtsError::InvalidConfiguration(format!(
                "unknown option '{unknown}'"
            )));
        }

        Ok(ParameterInput {
            elements: obj.get("elements").map(elements_from_json).transpose()?.flatten(),
            scattering_angle: real(obj, "scattering_angle")?,
            electron_temperature: real(obj, "electron_temperature")?,
            electron_density: real(obj, "electron_density")?,
            ion_temperature: real(obj, "ion_temperature")?,
            ion_charge: real(obj, "ion_charge")?,
            mass_density: real(obj, "mass_density")?,
            debye_temperature: real(obj, "debye_temperature")?,
            band_gap: real(obj, "band_gap")?,
            energy_range: obj
                .get("energy_range")
                .map(energy_range_from_json)
                .transpose()?
                .flatten(),
            model_sii: selector(obj, "model_Sii")?,
            model_see: named(obj, "model_See")?,
            model_sbf: named(obj, "model_Sbf")?,
            model_ipl: selector(obj, "model_IPL")?,
            model_mix: named(obj, "model_Mix")?,
            lfc: real(obj, "lfc")?,
            sbf_norm: selector(obj, "Sbf_norm")?,
            photon_energy: real(obj, "photon_energy")?,
        })
    }

    pub fn to_json_string(&self) -> XrtsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn json_kind(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {b}"),
        Value::Number(n) => format!("number {n}"),
        Value::String(s) => format!("string \"{s}\""),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

fn mismatch(field: impl Into<String>, expected: &'static str, found: &Value) -> XrtsError {
    XrtsError::TypeMismatch {
        field: field.into(),
        expected,
        found: json_kind(found),
    }
}

fn as_real(field: &str, value: &Value) -> XrtsResult<f64> {
    value
        .as_f64()
        .ok_or_else(|| mismatch(field, "number", value))
}

fn real(obj: &Map<String, Value>, key: &str) -> XrtsResult<Option<f64>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => as_real(key, value).map(Some),
    }
}

fn named<M: NamedModel>(obj: &Map<String, Value>, key: &str) -> XrtsResult<Option<M>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => M::parse(s).map(Some),
        Some(value) => Err(mismatch(key, "model name", value)),
    }
}

fn selector<M: NamedModel>(obj: &Map<String, Value>, key: &str) -> XrtsResult<Option<Selector<M>>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Selector::parse_named(s).map(Some),
        Some(value @ Value::Number(_)) => as_real(key, value).map(|v| Some(Selector::Fixed(v))),
        Some(value) => Err(mismatch(key, "model name or number", value)),
    }
}

fn elements_from_json(value: &Value) -> XrtsResult<Option<Vec<Element>>> {
    let entries = match value {
        Value::Null => return Ok(None),
        Value::Array(entries) => entries,
        other => return Err(mismatch("elements", "array of [symbol, count, charge]", other)),
    };

    let mut elements = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let parts = match entry {
            Value::Array(parts) if parts.len() == 3 => parts,
            Value::Array(parts) => {
                return Err(XrtsError::InvalidConfiguration(format!(
                    "elements[{i}] must have exactly 3 entries [symbol, count, charge], got {}",
                    parts.len()
                )))
            }
            other => {
                return Err(mismatch(
                    format!("elements[{i}]"),
                    "array [symbol, count, charge]",
                    other,
                ))
            }
        };

        let symbol = parts[0]
            .as_str()
            .ok_or_else(|| mismatch(format!("elements[{i}].symbol"), "string", &parts[0]))?;

        let count_field = format!("elements[{i}].count");
        let count = parts[1]
            .as_i64()
            .ok_or_else(|| mismatch(count_field.clone(), "integer", &parts[1]))?;
        let count = u32::try_from(count)
            .map_err(|_| XrtsError::out_of_range(count_field, count as f64, "a positive integer"))?;

        let charge_field = format!("elements[{i}].charge");
        let charge = parts[2]
            .as_i64()
            .ok_or_else(|| mismatch(charge_field.clone(), "integer", &parts[2]))?;
        let charge = i32::try_from(charge)
            .map_err(|_| XrtsError::out_of_range(charge_field, charge as f64, ">= -1"))?;

        elements.push(Element::new(symbol, count, charge));
    }
    Ok(Some(elements))
}

fn energy_range_from_json(value: &Value) -> XrtsResult<Option<EnergyRange>> {
    match value {
        Value::Null => Ok(None),
        Value::Object(_) => EnergyRange::deserialize(value)
            .map(Some)
            .map_err(|e| energy_range_error(value, e)),
        other => Err(XrtsError::InvalidConfiguration(format!(
            "energy_range must be an object with keys min, max, step; got {}",
            json_kind(other)
        ))),
    }
}

/// A non-numeric bound is a type mismatch; any other failure is a wrong
/// record shape.
fn energy_range_error(value: &Value, err: serde_json::Error) -> XrtsError {
    let non_numeric = value.as_object().and_then(|obj| {
        ["min", "max", "step"]
            .into_iter()
            .find_map(|key| obj.get(key).filter(|v| !v.is_number()).map(|v| (key, v)))
    });
    match non_numeric {
        Some((key, v)) => mismatch(format!("energy_range.{key}"), "number", v),
        None => XrtsError::InvalidConfiguration(format!(
            "energy_range must have exactly the keys min, max, step: {err}"
        )),
    }
}
