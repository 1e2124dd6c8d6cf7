// ─────────────────────────────────────────────────────────────────────
// XRTS Parameter Core — Elements
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Target species and the chemical-symbol lookup used to validate them.

use serde::{Deserialize, Serialize};

/// One species of the scattering target.
///
/// `charge = -1` asks the engine to pick the ionization of this species so
/// that the average ion charge of the mixture comes out right.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub symbol: String,
    pub count: u32,
    pub charge: i32,
}

impl Element {
    pub fn new(symbol: impl Into<String>, count: u32, charge: i32) -> Self {
        Element {
            symbol: symbol.into(),
            count,
            charge,
        }
    }
}

/// Lookup of valid chemical symbols.
pub trait ElementTable {
    fn contains(&self, symbol: &str) -> bool;
}

/// All 118 elements, symbols are case-sensitive ("Fe", not "FE").
pub const ALL_ELEMENTS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S",
    "Cl", "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga",
    "Ge", "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd",
    "Ag", "Cd", "In", "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm",
    "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os",
    "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa",
    "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg",
    "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

/// The periodic table as an [`ElementTable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodicTable;

impl ElementTable for PeriodicTable {
    fn contains(&self, symbol: &str) -> bool {
        ALL_ELEMENTS.contains(&symbol)
    }
}

impl<T: ElementTable + ?Sized> ElementTable for &T {
    fn contains(&self, symbol: &str) -> bool {
        (**self).contains(symbol)
    }
}
