// ─────────────────────────────────────────────────────────────────────
// XRTS Parameter Core — Errors
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Error, Debug)]
pub enum XrtsError {
    #[error("Missing required value: {field} was not given and has no default")]
    MissingRequiredValue { field: String },

    #[error("Type mismatch for {field}: expected {expected}, got {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: String,
    },

    #[error("Value out of range for {field}: {value} (must be {constraint})")]
    OutOfRangeValue {
        field: String,
        value: f64,
        constraint: &'static str,
    },

    #[error("Invalid choice for {field}: '{value}' (valid: {allowed})")]
    InvalidChoice {
        field: String,
        value: String,
        allowed: String,
    },

    #[error(
        "Underspecified system: at least two of electron_density, ion_charge and \
         mass_density must be given, got {given}"
    )]
    UnderspecifiedSystem { given: usize },

    #[error(
        "Electron density, mass density and ion charge are not internally consistent: \
         ne = {electron_density:.4e}/m**3, rho*Zf*NA = {expected:.4e}/m**3"
    )]
    InconsistentPhysicalParameters { electron_density: f64, expected: f64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl XrtsError {
    pub fn missing(field: impl Into<String>) -> Self {
        XrtsError::MissingRequiredValue {
            field: field.into(),
        }
    }

    pub fn out_of_range(field: impl Into<String>, value: f64, constraint: &'static str) -> Self {
        XrtsError::OutOfRangeValue {
            field: field.into(),
            value,
            constraint,
        }
    }

    pub fn invalid_choice(
        field: impl Into<String>,
        value: impl Into<String>,
        allowed: &[&str],
    ) -> Self {
        XrtsError::InvalidChoice {
            field: field.into(),
            value: value.into(),
            allowed: allowed.join(", "),
        }
    }
}

pub type XrtsResult<T> = Result<T, XrtsError>;
