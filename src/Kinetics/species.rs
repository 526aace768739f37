/// Module to handle species as they appear in CHEMKIN files: a label with an
/// optional numeric index, the structure from the species dictionary, the
/// element counts and NASA data from the thermo block and transport data.
///
/// The identifier used in CHEMKIN files is derived from the label and index
/// (`N2(35)`); when the label cannot be used the formula or `S(index)` is.
use crate::Kinetics::adjacency_list::Molecule;
use crate::Kinetics::molmass::{ElementCount, atom_number, hill_formula, molar_mass, parse_formula};
use crate::Thermodynamics::DBhandlers::NASAdata::NASAdata;
use crate::Thermodynamics::DBhandlers::TRANSPORTdata::TransportData;
use crate::chemkin_error::ChemkinError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// longest identifier accepted by CHEMKIN readers
pub const MAX_IDENTIFIER_LENGTH: usize = 16;

static INDEX_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.+)\((\d+)\)$").unwrap());
static INVALID_IDENTIFIER_CHARACTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9\-_,\(\)\*#.:\[\]]").unwrap());

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    pub label: String,
    /// disambiguation number, written as `label(index)`
    pub index: Option<usize>,
    pub molecule: Option<Molecule>,
    /// element counts from the thermo record
    pub formula: Option<ElementCount>,
    pub thermo: Option<NASAdata>,
    pub transport: Option<TransportData>,
    pub reactive: bool,
}

impl Species {
    pub fn new(label: &str) -> Self {
        Species {
            label: label.to_string(),
            index: None,
            molecule: None,
            formula: None,
            thermo: None,
            transport: None,
            reactive: true,
        }
    }

    /// Species named as in a CHEMKIN file; a trailing `(<digits>)` becomes
    /// the index.
    pub fn from_chemkin_name(name: &str) -> Self {
        let (label, index) = split_index_suffix(name);
        let mut species = Species::new(&label);
        species.index = index;
        species
    }

    /// Element counts of the structure, or of the thermo record when there
    /// is no structure.
    pub fn element_count(&self) -> Option<ElementCount> {
        match &self.molecule {
            Some(molecule) => Some(molecule.formula()),
            None => self.formula.clone(),
        }
    }

    pub fn hill_formula(&self) -> Option<String> {
        self.element_count().map(|counts| hill_formula(&counts))
    }

    /// g/mol
    pub fn molar_mass(&self) -> Option<f64> {
        self.element_count().and_then(|counts| molar_mass(&counts))
    }

    /// Transport geometry from the structure, or guessed from the atom
    /// count of the formula.
    pub fn shape_index(&self) -> Option<u8> {
        if let Some(molecule) = &self.molecule {
            return Some(molecule.shape_index());
        }
        self.formula.as_ref().map(|counts| match atom_number(counts) {
            1 => 0,
            2 => 1,
            _ => 2,
        })
    }

    /// True when the formula matches one of the `inert` formulas (`N2`, `Ar`).
    pub fn is_inert(&self, inert: &[String]) -> bool {
        let Some(formula) = self.hill_formula() else {
            return false;
        };
        inert
            .iter()
            .filter_map(|name| parse_formula(name).ok())
            .any(|counts| hill_formula(&counts) == formula)
    }

    pub fn identifier(&self) -> Result<String, ChemkinError> {
        get_species_identifier(self)
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}({})", self.label, index),
            None => write!(f, "{}", self.label),
        }
    }
}

/// Splits `N2(35)` into (`N2`, Some(35)). Other names are returned whole.
pub fn split_index_suffix(name: &str) -> (String, Option<usize>) {
    match INDEX_SUFFIX.captures(name) {
        Some(caps) => match caps[2].parse::<usize>() {
            Ok(index) => (caps[1].to_string(), Some(index)),
            Err(_) => (name.to_string(), None),
        },
        None => (name.to_string(), None),
    }
}

/// Name under which the species is written in CHEMKIN files: the label
/// (with its index) if its characters are valid, else the formula, else
/// `S(index)`. Every candidate must fit in 16 characters.
pub fn get_species_identifier(species: &Species) -> Result<String, ChemkinError> {
    let fits = |name: &str| !name.is_empty() && name.chars().count() <= MAX_IDENTIFIER_LENGTH;

    let label = species.label.as_str();
    if !label.is_empty() && !INVALID_IDENTIFIER_CHARACTER.is_match(label) {
        let name = match species.index {
            Some(index) => format!("{}({})", label, index),
            None => label.to_string(),
        };
        if fits(&name) {
            return Ok(name);
        }
    }
    if let Some(formula) = species.hill_formula() {
        let name = match species.index {
            Some(index) => format!("{}({})", formula, index),
            None => formula,
        };
        if fits(&name) {
            return Ok(name);
        }
    }
    if let Some(index) = species.index {
        let name = format!("S({})", index);
        if fits(&name) {
            return Ok(name);
        }
    }
    Err(ChemkinError::NoValidIdentifier(species.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_split_index_suffix() {
        assert_eq!(split_index_suffix("N2(35)"), ("N2".to_string(), Some(35)));
        assert_eq!(split_index_suffix("CH2(S)"), ("CH2(S)".to_string(), None));
        assert_eq!(split_index_suffix("(12)"), ("(12)".to_string(), None));
        assert_eq!(split_index_suffix("C2H6"), ("C2H6".to_string(), None));
    }

    #[test]
    fn test_identifier_from_label() {
        let n2 = Species::from_chemkin_name("N2(35)");
        assert_eq!(n2.label, "N2");
        assert_eq!(get_species_identifier(&n2).unwrap(), "N2(35)");
        assert_eq!(n2.to_string(), "N2(35)");
        assert_eq!(Species::new("CH2(S)").identifier().unwrap(), "CH2(S)");
        assert_eq!(Species::new("C#C[CH2]").identifier().unwrap(), "C#C[CH2]");
    }

    #[test]
    fn test_identifier_fallbacks() {
        let mut spc = Species::new("methyl radical");
        spc.index = Some(7);
        spc.formula = Some(HashMap::from([("C".to_string(), 1), ("H".to_string(), 3)]));
        assert_eq!(spc.identifier().unwrap(), "CH3(7)");

        spc.formula = None;
        assert_eq!(spc.identifier().unwrap(), "S(7)");

        let long = Species::new("averyveryverylonglabel");
        assert!(matches!(
            long.identifier(),
            Err(ChemkinError::NoValidIdentifier(_))
        ));
        let mut long = Species::new("averyveryverylonglabel");
        long.index = Some(1234);
        assert_eq!(long.identifier().unwrap(), "S(1234)");
    }

    #[test]
    fn test_inert_and_shape() {
        let inert = vec!["N2".to_string(), "Ar".to_string()];
        let mut ar = Species::new("AR");
        ar.formula = Some(HashMap::from([("Ar".to_string(), 1)]));
        assert!(ar.is_inert(&inert));
        assert_eq!(ar.shape_index(), Some(0));
        let mut ch4 = Species::new("CH4");
        ch4.formula = Some(HashMap::from([("C".to_string(), 1), ("H".to_string(), 4)]));
        assert!(!ch4.is_inert(&inert));
        assert_eq!(ch4.shape_index(), Some(2));
        assert!(!Species::new("X").is_inert(&inert));
        assert_eq!(Species::new("X").shape_index(), None);
    }
}
