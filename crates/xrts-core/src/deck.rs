// ─────────────────────────────────────────────────────────────────────
// XRTS Parameter Core — Input Deck
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Fixed-layout input deck for the XRTS scattering engine.
//!
//! The engine tokenizes each line on whitespace and has no schema version,
//! so section order, line order and the number of tokens per line must not
//! change. Reals are written with three decimals (`%4.3f`) or in C-style
//! scientific notation with three mantissa decimals (`%4.3e`).

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;
use xrts_types::elements::Element;
use xrts_types::error::{XrtsError, XrtsResult};
use xrts_types::models::{MixModel, SbfNorm, SeeModel, Selector};

use crate::densities::DensityLeg;
use crate::parameters::ParameterSet;

/// File name of the deck inside the scratch directory.
pub const DECK_FILE_NAME: &str = "input.dat";

/// Prefix of scratch directory names.
pub const SCRATCH_PREFIX: &str = "xrs_";

/// Where to put the scratch directory.
#[derive(Debug, Clone, Default)]
pub struct DeckOptions {
    /// Parent of the scratch directory; the system temp dir when `None`.
    pub scratch_root: Option<PathBuf>,
}

/// A deck written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDeck {
    pub dir: PathBuf,
    pub path: PathBuf,
}

/// On/off switches the engine expects alongside the model names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModelFlags {
    pub rpa: bool,
    pub lindhard: bool,
    pub static_lfc: bool,
    pub dynamic_lfc: bool,
    pub bma: bool,
    pub bma_static_lfc: bool,
    /// Any Born-Mermin variant, written on the `BMA(+sLFC)` output line.
    pub bma_family: bool,
    pub fixed_sii: bool,
    pub debye_temperature: bool,
    pub band_gap: bool,
    pub advanced_mix: bool,
    pub normalize_sbf: bool,
    pub ne_zf_lock: bool,
}

impl ModelFlags {
    pub fn from_parameters(params: &ParameterSet) -> Self {
        let see = params.model_see();
        ModelFlags {
            rpa: see == SeeModel::Rpa,
            lindhard: see == SeeModel::Lindhard,
            static_lfc: see == SeeModel::StaticLfc,
            dynamic_lfc: matches!(see, SeeModel::DynamicLfc | SeeModel::BmaDynamicLfc),
            bma: matches!(see, SeeModel::Bma | SeeModel::BmaDynamicLfc),
            bma_static_lfc: see == SeeModel::BmaStaticLfc,
            bma_family: see.is_bma(),
            fixed_sii: params.model_sii().fixed().is_some(),
            debye_temperature: params.debye_temperature() > 0.0,
            band_gap: params.band_gap() > 0.0,
            advanced_mix: params.model_mix() == MixModel::Advanced,
            normalize_sbf: matches!(
                params.sbf_norm(),
                Selector::Named(SbfNorm::Fk) | Selector::Fixed(_)
            ),
            // ne and Zf move together whenever ρ was given rather than solved for.
            ne_zf_lock: params.densities().derived() != Some(DensityLeg::MassDensity),
        }
    }
}

fn flag(on: bool) -> u8 {
    u8::from(on)
}

/// `%.3e` as C prints it: `4.817e+29`, `1.000e-05`.
pub fn format_sci(value: f64) -> String {
    let rust = format!("{value:.3e}");
    match rust.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exp) => {
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{mantissa}e{sign}{:02}", exp.abs())
            }
            Err(_) => rust,
        },
        None => rust,
    }
}

/// Render the deck. Fails before producing any output if a value the deck
/// needs is missing.
pub fn render_deck(params: &ParameterSet) -> XrtsResult<String> {
    let mut buf = Vec::with_capacity(4096);
    write_deck_to(&mut buf, params)?;
    String::from_utf8(buf)
        .map_err(|e| XrtsError::InvalidConfiguration(format!("input deck is not UTF-8: {e}")))
}

/// Write the deck lines to `w`.
pub fn write_deck_to<W: Write>(w: &mut W, params: &ParameterSet) -> XrtsResult<()> {
    let photon_energy = params
        .photon_energy()
        .ok_or_else(|| XrtsError::missing("photon_energy"))?;
    let flags = ModelFlags::from_parameters(params);
    let range = params.energy_range();
    let sii_value = params.model_sii().fixed().unwrap_or(0.0);

    writeln!(w, "--XRTS---input_file-----------------------------------")?;
    writeln!(w, "--")?;

    writeln!(w, "--fit_parameters------------------------------flag----")?;
    writeln!(w, "DO_FIT                 0")?;
    writeln!(w, "PHOTON_ENERGY {photon_energy:.3}")?;
    writeln!(w, "SCATTERING_ANGLE     {:.3}", params.scattering_angle())?;
    writeln!(w, "ELECTRON_TEMP     {:.3} 0", params.electron_temperature())?;
    writeln!(w, "ELECTRON_DENSITY     {} 0", format_sci(params.electron_density()))?;
    writeln!(w, "AMPLITUDE         1.0         0")?;
    writeln!(w, "BASELINE             0.0         0")?;
    writeln!(w, "Z_FREE             {:.3}        0", params.ion_charge())?;
    writeln!(w, "OUT(1=XSEC,2=PWR)    1")?;

    writeln!(w, "--model_for_total_spec---------use-flag--------------")?;
    writeln!(w, "USE_RPA {}", flag(flags.rpa))?;
    writeln!(w, "USE_LINDHARD {}", flag(flags.lindhard))?;
    writeln!(w, "USE_TSYTOVICH 0")?;
    writeln!(w, "USE_STATIC_LFC {}", flag(flags.static_lfc))?;
    writeln!(w, "USE_DYNAMIC_LFC {}", flag(flags.dynamic_lfc))?;
    writeln!(w, "USE_MFF 0")?;
    writeln!(w, "USE_BMA {}", flag(flags.bma))?;
    writeln!(w, "USE_BMA+sLFC {}", flag(flags.bma_static_lfc))?;
    writeln!(w, "USE_CORE 1")?;

    writeln!(w, "--gradients------------------------------------------")?;
    writeln!(w, "GRAD 0")?;
    writeln!(w, "L_GRADIENT            0.0e-0        ")?;
    writeln!(w, "T_GRADIENT            0.0")?;
    writeln!(w, "DSTEP                0.0    ")?;

    writeln!(w, "--ion_parameters----------------------------use_flag-")?;
    writeln!(w, "ION_TEMP {:.3} 1", params.ion_temperature())?;
    writeln!(w, "S_ION_FEATURE {sii_value:.3} {}", flag(flags.fixed_sii))?;
    writeln!(
        w,
        "DEBYE_TEMP {:.3} {}",
        params.debye_temperature(),
        flag(flags.debye_temperature)
    )?;
    writeln!(w, "BAND_GAP {:.3} {}", params.band_gap(), flag(flags.band_gap))?;

    writeln!(w, "--integration----------------------------------------")?;
    writeln!(w, "N_DAWSON 32")?;
    writeln!(w, "N_DISTRIBUTION 32")?;
    writeln!(w, "N_PVI 32")?;
    writeln!(w, "N_LANDEN 512")?;
    writeln!(w, "N_RELAXATION 1024")?;
    writeln!(w, "N_FFT 4096")?;
    writeln!(w, "EPS 1.0E-4")?;

    writeln!(w, "--See(k,w)------------------------------use/norm-----")?;
    writeln!(w, "STATIC_MODEL(DH,OCP,SOCP,SOCPN) {}", params.model_sii())?;
    writeln!(w, "USE_ADV_Mix {}", flag(flags.advanced_mix))?;
    writeln!(w, "USE_IRS_MODEL                     0")?;
    writeln!(w, "HARD_SPHERE_DIAM                 1E-10 0")?;
    writeln!(w, "POLARIZABILITY                     0.0 0.0")?;
    writeln!(w, "BOUND-FREE_MODEL(IA,IBA,FFA)     {}", params.model_sbf())?;
    writeln!(
        w,
        "BOUND-FREE_NORM(FK,NO,USR)         {}     {}",
        sbf_norm_token(params.sbf_norm()),
        flag(flags.normalize_sbf)
    )?;
    writeln!(w, "BOUND-FREE_MEFF                 1.0")?;
    writeln!(w, "USE_BOUND-FREE_DOPPLER          0")?;
    writeln!(w, "CONT-LOWR_MODEL(SP,EK,USR)      {}", params.model_ipl())?;
    writeln!(w, "GK                         {:.3} 0", params.lfc())?;
    writeln!(w, "RPA                         {} 0", flag(flags.rpa))?;
    writeln!(w, "LINDHARD                     {} 0", flag(flags.lindhard))?;
    writeln!(w, "SALPETER                         0 0")?;
    writeln!(w, "LANDEN                         0 0")?;
    writeln!(w, "RPA_TSYTOVICH                 0 0")?;
    writeln!(w, "STATIC_LFC                     {} 0", flag(flags.static_lfc))?;
    writeln!(w, "DYNAMIC_LFC                     {} 0", flag(flags.dynamic_lfc))?;
    writeln!(w, "MFF                             0 0")?;
    writeln!(w, "BMA(+sLFC)                     {} 0", flag(flags.bma_family))?;
    writeln!(w, "CORE                             1 0")?;
    writeln!(w, "TOTAL                         0 0")?;
    writeln!(w, "E_MIN                         {:.3}", range.min)?;
    writeln!(w, "E_MAX                         {:.3}", range.max)?;
    writeln!(w, "E_STEP                         {:.3}", range.step)?;

    writeln!(w, "--target_spec--------------------------chem----Zfree--")?;
    write_species(w, params.elements())?;
    writeln!(w, "MASS_DENSITY {:.3}", params.mass_density())?;
    writeln!(w, "NE_ZF_LOCK {}", flag(flags.ne_zf_lock))?;
    writeln!(w, "DATA_FILE data.txt")?;
    writeln!(w, "NUMBER_POINTS 1024")?;
    writeln!(w, "OPACITY_FILE nofile 0")?;

    writeln!(w, "--instrument_function---------------------------------")?;
    writeln!(w, "USE_FILE 0")?;
    writeln!(w, "FILE_NAME nofile.dat")?;
    writeln!(w, "INST_MODEL GAUSSIAN")?;
    writeln!(w, "INST_FWHM 5.0")?;
    writeln!(w, "BIN_PER_PIXEL 1.0")?;
    writeln!(w, "INST_INDEX 2.0")?;

    writeln!(w, "--additional_parameters-------------------------------")?;
    writeln!(w, "MAX_ITERATIONS 0")?;
    writeln!(w, "LEVENBERG_MARQUARDT 0")?;
    writeln!(w, "SIGMA_LM 1.0")?;
    writeln!(w, "SAVE_FILE xrts_out.txt")?;

    Ok(())
}

/// `Sbf_norm` as the engine reads it: the unset default is the token `None`.
fn sbf_norm_token(norm: Selector<SbfNorm>) -> String {
    match norm {
        Selector::Named(SbfNorm::None) => "None".to_string(),
        other => other.to_string(),
    }
}

fn write_species<W: Write>(w: &mut W, elements: &[Element]) -> XrtsResult<()> {
    writeln!(w, "NUMBER_OF_SPECIES {}", elements.len())?;
    for (i, element) in elements.iter().enumerate() {
        writeln!(
            w,
            "TARGET_{} {} {} {}",
            i + 1,
            element.symbol,
            element.count,
            element.charge
        )?;
    }
    Ok(())
}

/// Render the deck and write it as `input.dat` into a new, uniquely named
/// scratch directory.
///
/// Nothing touches the disk unless rendering succeeds. The directory is
/// kept after return; the caller owns its cleanup.
pub fn write_deck(params: &ParameterSet, options: &DeckOptions) -> XrtsResult<InputDeck> {
    let contents = render_deck(params)?;

    let mut builder = tempfile::Builder::new();
    builder.prefix(SCRATCH_PREFIX).keep(true);
    let scratch = match &options.scratch_root {
        Some(root) => builder.tempdir_in(root)?,
        None => builder.tempdir()?,
    };
    let dir = scratch.path().to_path_buf();
    let path = write_deck_file(&dir, &contents)?;

    info!(path = %path.display(), "XRTS input deck written");
    Ok(InputDeck { dir, path })
}

/// Write `input.dat` into `dir`; on failure `dir` is removed with it.
fn write_deck_file(dir: &Path, contents: &str) -> XrtsResult<PathBuf> {
    let path = dir.join(DECK_FILE_NAME);
    if let Err(e) = fs::write(&path, contents) {
        // Don't leave a half-written deck behind.
        let _ = fs::remove_dir_all(dir);
        return Err(e.into());
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use xrts_types::config::ParameterInput;
    use xrts_types::models::{IplModel, SiiModel};

    fn params(see: SeeModel) -> ParameterSet {
        ParameterSet::new(ParameterInput {
            elements: Some(vec![Element::new("C", 1, 4), Element::new("H", 1, -1)]),
            scattering_angle: Some(60.0),
            electron_temperature: Some(10.0),
            ion_charge: Some(2.5),
            mass_density: Some(1.0),
            model_see: Some(see),
            photon_energy: Some(8000.0),
            ..Default::default()
        })
        .unwrap()
    }

    fn line<'a>(deck: &'a str, key: &str) -> &'a str {
        deck.lines()
            .find(|l| l.split_whitespace().next() == Some(key))
            .unwrap_or_else(|| panic!("no line {key}"))
    }

    #[test]
    fn test_format_sci_matches_c() {
        assert_eq!(format_sci(4.817e29), "4.817e+29");
        assert_eq!(format_sci(1.0e-5), "1.000e-05");
        assert_eq!(format_sci(1.0), "1.000e+00");
        assert_eq!(format_sci(-2.5e100), "-2.500e+100");
    }

    #[test]
    fn test_section_order() {
        let deck = params(SeeModel::Rpa).render_deck().unwrap();
        let sections: Vec<&str> = deck
            .lines()
            .filter(|l| l.starts_with("--") && l.len() > 2)
            .map(|l| l.trim_start_matches('-').split('-').next().unwrap_or(""))
            .collect();
        assert_eq!(
            sections,
            [
                "XRTS",
                "fit_parameters",
                "model_for_total_spec",
                "gradients",
                "ion_parameters",
                "integration",
                "See(k,w)",
                "target_spec",
                "instrument_function",
                "additional_parameters",
            ]
        );
    }

    #[test]
    fn test_fit_parameters() {
        let p = params(SeeModel::Rpa);
        let deck = p.render_deck().unwrap();
        assert_eq!(line(&deck, "PHOTON_ENERGY"), "PHOTON_ENERGY 8000.000");
        assert_eq!(line(&deck, "SCATTERING_ANGLE"), "SCATTERING_ANGLE     60.000");
        assert_eq!(line(&deck, "ELECTRON_TEMP"), "ELECTRON_TEMP     10.000 0");
        assert_eq!(
            line(&deck, "ELECTRON_DENSITY"),
            format!("ELECTRON_DENSITY     {} 0", format_sci(p.electron_density()))
        );
        assert_eq!(line(&deck, "Z_FREE"), "Z_FREE             2.500        0");
        assert_eq!(line(&deck, "ION_TEMP"), "ION_TEMP 10.000 1");
    }

    #[test]
    fn test_species_block() {
        let deck = params(SeeModel::Rpa).render_deck().unwrap();
        assert_eq!(line(&deck, "NUMBER_OF_SPECIES"), "NUMBER_OF_SPECIES 2");
        let targets: Vec<&str> = deck.lines().filter(|l| l.starts_with("TARGET_")).collect();
        assert_eq!(targets, ["TARGET_1 C 1 4", "TARGET_2 H 1 -1"]);
        assert_eq!(line(&deck, "MASS_DENSITY"), "MASS_DENSITY 1.000");
        assert_eq!(line(&deck, "NE_ZF_LOCK"), "NE_ZF_LOCK 1");
    }

    #[test]
    fn test_use_flags_follow_see_model() {
        let use_flags = |see: SeeModel| -> Vec<(String, String)> {
            let deck = params(see).render_deck().unwrap();
            deck.lines()
                .filter(|l| l.starts_with("USE_") && !l.starts_with("USE_CORE"))
                .filter(|l| !l.starts_with("USE_ADV") && !l.starts_with("USE_IRS"))
                .filter(|l| !l.starts_with("USE_BOUND"))
                .filter_map(|l| {
                    let mut it = l.split_whitespace();
                    Some((it.next()?.to_string(), it.next()?.to_string()))
                })
                .filter(|(_, v)| v == "1")
                .collect()
        };

        let active = |see| -> Vec<String> { use_flags(see).into_iter().map(|(k, _)| k).collect() };
        assert_eq!(active(SeeModel::Rpa), ["USE_RPA"]);
        assert_eq!(active(SeeModel::Lindhard), ["USE_LINDHARD"]);
        assert_eq!(active(SeeModel::StaticLfc), ["USE_STATIC_LFC"]);
        assert_eq!(active(SeeModel::DynamicLfc), ["USE_DYNAMIC_LFC"]);
        assert_eq!(active(SeeModel::Bma), ["USE_BMA"]);
        assert_eq!(active(SeeModel::BmaStaticLfc), ["USE_BMA+sLFC"]);
        assert_eq!(active(SeeModel::BmaDynamicLfc), ["USE_DYNAMIC_LFC", "USE_BMA"]);
    }

    #[test]
    fn test_bma_output_line() {
        let deck = params(SeeModel::BmaStaticLfc).render_deck().unwrap();
        assert!(deck.contains("BMA(+sLFC)                     1 0"));
        let deck = params(SeeModel::Rpa).render_deck().unwrap();
        assert!(deck.contains("BMA(+sLFC)                     0 0"));
        assert!(deck.contains("RPA                         1 0"));
    }

    #[test]
    fn test_fixed_value_models() {
        let mut p = params(SeeModel::Rpa);
        p.set_model_sii(Some(Selector::Fixed(1.5))).unwrap();
        p.set_model_ipl(Some(Selector::Fixed(-12.0))).unwrap();
        p.set_sbf_norm(Some(Selector::Named(SbfNorm::Fk))).unwrap();
        p.set_lfc(Some(0.25)).unwrap();
        let deck = p.render_deck().unwrap();
        assert_eq!(line(&deck, "S_ION_FEATURE"), "S_ION_FEATURE 1.500 1");
        assert_eq!(line(&deck, "STATIC_MODEL(DH,OCP,SOCP,SOCPN)"), "STATIC_MODEL(DH,OCP,SOCP,SOCPN) 1.500");
        assert_eq!(line(&deck, "CONT-LOWR_MODEL(SP,EK,USR)"), "CONT-LOWR_MODEL(SP,EK,USR)      -12.000");
        assert_eq!(line(&deck, "BOUND-FREE_NORM(FK,NO,USR)"), "BOUND-FREE_NORM(FK,NO,USR)         FK     1");
        assert_eq!(line(&deck, "GK"), "GK                         0.250 0");
    }

    #[test]
    fn test_named_model_defaults_in_deck() {
        let deck = params(SeeModel::Rpa).render_deck().unwrap();
        assert_eq!(line(&deck, "S_ION_FEATURE"), "S_ION_FEATURE 0.000 0");
        assert!(deck.contains("STATIC_MODEL(DH,OCP,SOCP,SOCPN) SOCP\n"));
        assert!(deck.contains("BOUND-FREE_MODEL(IA,IBA,FFA)     IA\n"));
        assert!(deck.contains("CONT-LOWR_MODEL(SP,EK,USR)      SP\n"));
        assert!(deck.contains("BOUND-FREE_NORM(FK,NO,USR)         None     0\n"));
        assert_eq!(line(&deck, "USE_ADV_Mix"), "USE_ADV_Mix 0");
        assert_eq!(line(&deck, "DEBYE_TEMP"), "DEBYE_TEMP 0.000 0");
        assert_eq!(line(&deck, "BAND_GAP"), "BAND_GAP 0.000 0");
    }

    #[test]
    fn test_energy_window_lines() {
        let mut p = params(SeeModel::Rpa);
        p.set_energy_range(Some(xrts_types::config::EnergyRange {
            min: -100.0,
            max: 100.0,
            step: 0.5,
        }))
        .unwrap();
        let deck = p.render_deck().unwrap();
        assert_eq!(line(&deck, "E_MIN"), "E_MIN                         -100.000");
        assert_eq!(line(&deck, "E_MAX"), "E_MAX                         100.000");
        assert_eq!(line(&deck, "E_STEP"), "E_STEP                         0.500");
    }

    #[test]
    fn test_lock_released_when_mass_density_solved() {
        let mut p = params(SeeModel::Rpa);
        let ne = p.electron_density();
        p.update_densities(Some(ne), Some(2.5), None).unwrap();
        let deck = p.render_deck().unwrap();
        assert_eq!(line(&deck, "NE_ZF_LOCK"), "NE_ZF_LOCK 0");
    }

    #[test]
    fn test_missing_photon_energy() {
        let mut p = params(SeeModel::Rpa);
        p.set_photon_energy(None).unwrap();
        assert!(matches!(
            p.render_deck(),
            Err(XrtsError::MissingRequiredValue { ref field }) if field == "photon_energy"
        ));
    }

    #[test]
    fn test_write_deck_creates_scratch_dir() {
        let root = tempfile::tempdir().unwrap();
        let mut p = params(SeeModel::Rpa);
        p.set_model_ipl(Some(Selector::Named(IplModel::EckerKroll))).unwrap();
        p.set_model_sii(Some(Selector::Named(SiiModel::DebyeHuckel))).unwrap();
        let options = DeckOptions {
            scratch_root: Some(root.path().to_path_buf()),
        };

        let deck = p.initialize(&options).unwrap();
        assert!(deck.dir.starts_with(root.path()));
        assert!(deck
            .dir
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(SCRATCH_PREFIX)));
        assert_eq!(deck.path, deck.dir.join(DECK_FILE_NAME));
        assert_eq!(p.scratch_dir(), Some(deck.dir.as_path()));
        assert!(p.is_initialized());

        let written = fs::read_to_string(&deck.path).unwrap();
        assert_eq!(written, p.render_deck().unwrap());
        assert!(written.contains("CONT-LOWR_MODEL(SP,EK,USR)      EK\n"));

        let second = write_deck(&p, &options).unwrap();
        assert_ne!(second.dir, deck.dir);
    }

    #[test]
    fn test_write_deck_all_or_nothing() {
        let root = tempfile::tempdir().unwrap();
        let mut p = params(SeeModel::Rpa);
        p.set_photon_energy(None).unwrap();
        let options = DeckOptions {
            scratch_root: Some(root.path().to_path_buf()),
        };
        assert!(p.initialize(&options).is_err());
        assert!(!p.is_initialized());
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_failed_write_removes_scratch_dir() {
        let root = tempfile::tempdir().unwrap();
        let scratch = root.path().join(format!("{SCRATCH_PREFIX}blocked"));
        fs::create_dir(&scratch).unwrap();
        // A directory where the deck file should go makes the write fail.
        fs::create_dir(scratch.join(DECK_FILE_NAME)).unwrap();

        let contents = params(SeeModel::Rpa).render_deck().unwrap();
        assert!(matches!(
            write_deck_file(&scratch, &contents),
            Err(XrtsError::Io(_))
        ));
        assert!(!scratch.exists());
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_gradient_lines_keep_padding() {
        let deck = params(SeeModel::Rpa).render_deck().unwrap();
        assert!(deck.contains("\nL_GRADIENT            0.0e-0        \n"));
        assert!(deck.contains("\nDSTEP                0.0    \n"));
    }
}
