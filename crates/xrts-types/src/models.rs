// ─────────────────────────────────────────────────────────────────────
// XRTS Parameter Core — Model Selectors
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Physical model choices understood by the scattering engine.
//!
//! Some selectors also take a bare number meaning "use this value instead
//! of computing the quantity"; those are wrapped in [`Selector`].

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{XrtsError, XrtsResult};

/// A closed set of named models.
pub trait NamedModel: Copy + PartialEq + 'static {
    /// Option name used in diagnostics.
    const FIELD: &'static str;
    /// Names are compared ignoring ASCII case when set.
    const CASE_INSENSITIVE: bool = false;

    fn all() -> &'static [Self];

    fn name(self) -> &'static str;

    /// Exact name match (ASCII case folded when `CASE_INSENSITIVE`);
    /// surrounding whitespace is not stripped.
    fn parse(s: &str) -> XrtsResult<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|m| {
                if Self::CASE_INSENSITIVE {
                    m.name().eq_ignore_ascii_case(s)
                } else {
                    m.name() == s
                }
            })
            .ok_or_else(|| {
                let names: Vec<&str> = Self::all().iter().map(|m| m.name()).collect();
                XrtsError::invalid_choice(Self::FIELD, s, &names)
            })
    }
}

macro_rules! named_model_traits {
    ($ty:ty) => {
        impl FromStr for $ty {
            type Err = XrtsError;

            fn from_str(s: &str) -> XrtsResult<Self> {
                <$ty as NamedModel>::parse(s)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.name())
            }
        }
    };
}

/// Ion-ion (quasi-static, Rayleigh) structure factor model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SiiModel {
    /// Debye-Hückel
    DebyeHuckel,
    /// One-component plasma
    Ocp,
    /// Screened one-component plasma
    #[default]
    Socp,
    /// SOCP with negative screening Fourier component
    Socpn,
}

impl NamedModel for SiiModel {
    const FIELD: &'static str = "model_Sii";

    fn all() -> &'static [Self] {
        &[
            SiiModel::DebyeHuckel,
            SiiModel::Ocp,
            SiiModel::Socp,
            SiiModel::Socpn,
        ]
    }

    fn name(self) -> &'static str {
        match self {
            SiiModel::DebyeHuckel => "DH",
            SiiModel::Ocp => "OCP",
            SiiModel::Socp => "SOCP",
            SiiModel::Socpn => "SOCPN",
        }
    }
}
named_model_traits!(SiiModel);

/// Dynamic (high-frequency) electron-electron structure factor model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeeModel {
    /// Random phase approximation
    #[default]
    Rpa,
    Lindhard,
    /// Static local field correction
    StaticLfc,
    /// Dynamic local field correction
    DynamicLfc,
    /// Born-Mermin approximation
    Bma,
    BmaStaticLfc,
    BmaDynamicLfc,
}

impl NamedModel for SeeModel {
    const FIELD: &'static str = "model_See";

    fn all() -> &'static [Self] {
        &[
            SeeModel::Rpa,
            SeeModel::Lindhard,
            SeeModel::StaticLfc,
            SeeModel::DynamicLfc,
            SeeModel::Bma,
            SeeModel::BmaStaticLfc,
            SeeModel::BmaDynamicLfc,
        ]
    }

    fn name(self) -> &'static str {
        match self {
            SeeModel::Rpa => "RPA",
            SeeModel::Lindhard => "Lindhard",
            SeeModel::StaticLfc => "static LFC",
            SeeModel::DynamicLfc => "dynamic LFC",
            SeeModel::Bma => "BMA",
            SeeModel::BmaStaticLfc => "BMA+sLFC",
            SeeModel::BmaDynamicLfc => "BMA+dLFC",
        }
    }
}
named_model_traits!(SeeModel);

impl SeeModel {
    /// True for the Born-Mermin family.
    pub fn is_bma(self) -> bool {
        matches!(
            self,
            SeeModel::Bma | SeeModel::BmaStaticLfc | SeeModel::BmaDynamicLfc
        )
    }
}

/// Bound-free (Compton) structure factor model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SbfModel {
    /// Impulse approximation
    #[default]
    Ia,
    /// Impulse approximation with binding corrections
    Iba,
    /// Form factor approximation
    Ffa,
}

impl NamedModel for SbfModel {
    const FIELD: &'static str = "model_Sbf";

    fn all() -> &'static [Self] {
        &[SbfModel::Ia, SbfModel::Iba, SbfModel::Ffa]
    }

    fn name(self) -> &'static str {
        match self {
            SbfModel::Ia => "IA",
            SbfModel::Iba => "IBA",
            SbfModel::Ffa => "FFA",
        }
    }
}
named_model_traits!(SbfModel);

/// Ionization potential lowering model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IplModel {
    /// Stewart-Pyatt
    #[default]
    StewartPyatt,
    /// Ecker-Kröll
    EckerKroll,
}

impl NamedModel for IplModel {
    const FIELD: &'static str = "model_IPL";

    fn all() -> &'static [Self] {
        &[IplModel::StewartPyatt, IplModel::EckerKroll]
    }

    fn name(self) -> &'static str {
        match self {
            IplModel::StewartPyatt => "SP",
            IplModel::EckerKroll => "EK",
        }
    }
}
named_model_traits!(IplModel);

/// Species mixing model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MixModel {
    Advanced,
    #[default]
    None,
}

impl NamedModel for MixModel {
    const FIELD: &'static str = "model_Mix";
    const CASE_INSENSITIVE: bool = true;

    fn all() -> &'static [Self] {
        &[MixModel::Advanced, MixModel::None]
    }

    fn name(self) -> &'static str {
        match self {
            MixModel::Advanced => "ADV",
            MixModel::None => "none",
        }
    }
}
named_model_traits!(MixModel);

/// Normalization of the bound-free structure factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SbfNorm {
    /// f-sum / Kramers normalization
    Fk,
    /// No normalization
    No,
    #[default]
    None,
}

impl NamedModel for SbfNorm {
    const FIELD: &'static str = "Sbf_norm";
    const CASE_INSENSITIVE: bool = true;

    fn all() -> &'static [Self] {
        &[SbfNorm::Fk, SbfNorm::No, SbfNorm::None]
    }

    fn name(self) -> &'static str {
        match self {
            SbfNorm::Fk => "FK",
            SbfNorm::No => "NO",
            SbfNorm::None => "none",
        }
    }
}
named_model_traits!(SbfNorm);

/// A named model or a fixed numeric override.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selector<M> {
    Named(M),
    Fixed(f64),
}

impl<M: NamedModel + Default> Default for Selector<M> {
    fn default() -> Self {
        Selector::Named(M::default())
    }
}

impl<M: NamedModel> Selector<M> {
    pub fn named(self) -> Option<M> {
        match self {
            Selector::Named(m) => Some(m),
            Selector::Fixed(_) => None,
        }
    }

    pub fn fixed(self) -> Option<f64> {
        match self {
            Selector::Named(_) => None,
            Selector::Fixed(v) => Some(v),
        }
    }

    /// Parse a model name; numbers are not accepted here.
    pub fn parse_named(s: &str) -> XrtsResult<Self> {
        M::parse(s).map(Selector::Named)
    }
}

impl<M: NamedModel> From<M> for Selector<M> {
    fn from(model: M) -> Self {
        Selector::Named(model)
    }
}

impl<M: NamedModel> fmt::Display for Selector<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Named(m) => f.write_str(m.name()),
            Selector::Fixed(v) => write!(f, "{v:.3}"),
        }
    }
}

impl<M: NamedModel> Serialize for Selector<M> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Selector::Named(m) => serializer.serialize_str(m.name()),
            Selector::Fixed(v) => serializer.serialize_f64(*v),
        }
    }
}
