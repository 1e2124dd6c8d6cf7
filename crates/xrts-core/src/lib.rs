// ─────────────────────────────────────────────────────────────────────
// XRTS Parameter Core — XRTS Core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Parameter validation and input-deck generation for plasma XRTS runs.
//!
//! - `validators`: single-field checks and defaults
//! - `densities`: ne / Zf / ρ consistency solver
//! - `energy`: plasma frequency and the default energy window
//! - `parameters`: the validated `ParameterSet`
//! - `deck`: fixed-layout input deck for the scattering engine

pub mod deck;
pub mod densities;
pub mod energy;
pub mod parameters;
pub mod validators;
