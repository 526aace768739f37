/// Module to handle molecular structures in adjacency list form, as stored in
/// species dictionaries. Two dialects exist:
///
/// new style (explicit electrons):
/// ```text
/// multiplicity 2
/// 1 C u1 p0 c0 {2,S} {3,S} {4,S}
/// 2 H u0 p0 c0 {1,S}
/// ```
/// old style (radical count only, lone pairs implied by valence):
/// ```text
/// 1 C 1 {2,S} {3,S} {4,S}
/// 2 H 0 {1,S}
/// ```
/// Structures are kept only as far as needed to write them back, derive the
/// formula and tell atoms, linear and nonlinear molecules apart.
use crate::Kinetics::molmass::{ElementCount, hill_formula, normalize_symbol};
use crate::chemkin_error::ChemkinError;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Quadruple,
    Benzene,
}

impl BondOrder {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.to_uppercase().as_str() {
            "S" => Some(BondOrder::Single),
            "D" => Some(BondOrder::Double),
            "T" => Some(BondOrder::Triple),
            "Q" => Some(BondOrder::Quadruple),
            "B" => Some(BondOrder::Benzene),
            _ => None,
        }
    }
    pub fn symbol(&self) -> &'static str {
        match self {
            BondOrder::Single => "S",
            BondOrder::Double => "D",
            BondOrder::Triple => "T",
            BondOrder::Quadruple => "Q",
            BondOrder::Benzene => "B",
        }
    }
    /// number of shared electron pairs
    pub fn order(&self) -> f64 {
        match self {
            BondOrder::Single => 1.0,
            BondOrder::Double => 2.0,
            BondOrder::Triple => 3.0,
            BondOrder::Quadruple => 4.0,
            BondOrder::Benzene => 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    pub element: String,
    /// reactive site label such as `*1`
    pub label: Option<String>,
    pub radical_electrons: u8,
    pub lone_pairs: u8,
    pub charge: i8,
    /// neighbour (0-based atom index) and bond order
    pub bonds: Vec<(usize, BondOrder)>,
}

impl Atom {
    pub fn new(element: &str) -> Self {
        Atom {
            element: normalize_symbol(element),
            label: None,
            radical_electrons: 0,
            lone_pairs: 0,
            charge: 0,
            bonds: Vec::new(),
        }
    }
    fn bond_order_sum(&self) -> f64 {
        self.bonds.iter().map(|(_, order)| order.order()).sum()
    }
}

// valence electrons of the main group elements
fn valence_electrons(element: &str) -> Option<i32> {
    let n = match element {
        "H" | "D" | "T" | "Li" | "Na" | "K" => 1,
        "He" | "Be" | "Mg" | "Ca" => 2,
        "B" | "Al" => 3,
        "C" | "Si" => 4,
        "N" | "P" => 5,
        "O" | "S" => 6,
        "F" | "Cl" | "Br" | "I" => 7,
        "Ne" | "Ar" | "Kr" | "Xe" => 8,
        _ => return None,
    };
    Some(n)
}

/// Lone pairs left once radicals, bonds and charge are accounted for.
fn implied_lone_pairs(atom: &Atom) -> u8 {
    match valence_electrons(&atom.element) {
        Some(valence) => {
            let free = valence as f64
                - atom.radical_electrons as f64
                - atom.bond_order_sum()
                - atom.charge as f64;
            (free / 2.0).floor().max(0.0) as u8
        }
        None => 0,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Molecule {
    /// spin multiplicity, 2S+1
    pub multiplicity: u8,
    pub atoms: Vec<Atom>,
}

impl Molecule {
    /// Single neutral atom without radicals, as assumed for species known
    /// only from a one-atom thermo formula.
    pub fn monatomic(element: &str) -> Self {
        let mut atom = Atom::new(element);
        atom.lone_pairs = implied_lone_pairs(&atom);
        Molecule {
            multiplicity: 1,
            atoms: vec![atom],
        }
    }

    /// Parses either dialect. `label` only serves the error messages.
    pub fn from_adjacency_list(text: &str, label: &str) -> Result<Self, ChemkinError> {
        let error = |reason: String| ChemkinError::AdjacencyList {
            label: label.to_string(),
            reason,
        };
        let bond_re = Regex::new(r"^\{(\d+),([A-Za-z]+)\}$").map_err(|e| error(e.to_string()))?;
        let old_radical_re = Regex::new(r"^(\d)([STQ]?)$").map_err(|e| error(e.to_string()))?;

        let mut multiplicity: Option<u8> = None;
        let mut atoms: Vec<Atom> = Vec::new();
        // atoms whose lone pairs were not given explicitly
        let mut implied: Vec<usize> = Vec::new();
        let mut singlet_pairs = 0u8;
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens[0].eq_ignore_ascii_case("multiplicity") {
                let value = tokens
                    .get(1)
                    .and_then(|t| t.parse::<u8>().ok())
                    .ok_or_else(|| error(format!("bad multiplicity line '{}'", line)))?;
                multiplicity = Some(value);
                continue;
            }
            let index: usize = tokens[0]
                .parse()
                .map_err(|_| error(format!("bad atom index in '{}'", line)))?;
            if index != atoms.len() + 1 {
                return Err(error(format!(
                    "atom {} found where atom {} was expected",
                    index,
                    atoms.len() + 1
                )));
            }
            let mut rest = tokens[1..].iter().peekable();
            let mut atom_label = None;
            if let Some(t) = rest.peek().map(|t| **t) {
                if t.starts_with('*') {
                    atom_label = Some(t.to_string());
                    rest.next();
                }
            }
            let element = rest
                .next()
                .ok_or_else(|| error(format!("missing element in '{}'", line)))?;
            let mut atom = Atom::new(element);
            atom.label = atom_label;

            let mut lone_pairs_given = false;
            match rest.peek().map(|t| **t) {
                Some(t) if t.starts_with('u') => {
                    atom.radical_electrons = t[1..]
                        .parse()
                        .map_err(|_| error(format!("bad radical count '{}'", t)))?;
                    rest.next();
                    while let Some(t) = rest.peek().map(|t| **t) {
                        if let Some(p) = t.strip_prefix('p') {
                            atom.lone_pairs = p
                                .parse()
                                .map_err(|_| error(format!("bad lone pair count '{}'", t)))?;
                            lone_pairs_given = true;
                        } else if let Some(c) = t.strip_prefix('c') {
                            atom.charge = c
                                .trim_start_matches('+')
                                .parse()
                                .map_err(|_| error(format!("bad charge '{}'", t)))?;
                        } else {
                            break;
                        }
                        rest.next();
                    }
                }
                Some(t) if !t.starts_with('{') => {
                    let caps = old_radical_re
                        .captures(t)
                        .ok_or_else(|| error(format!("bad radical count '{}'", t)))?;
                    atom.radical_electrons = caps[1]
                        .parse()
                        .map_err(|_| error(format!("bad radical count '{}'", t)))?;
                    if &caps[2] == "S" && atom.radical_electrons == 2 {
                        singlet_pairs += 1;
                    }
                    rest.next();
                }
                _ => {}
            }

            for t in rest {
                let caps = bond_re
                    .captures(t)
                    .ok_or_else(|| error(format!("bad bond '{}' in '{}'", t, line)))?;
                let neighbour: usize = caps[1]
                    .parse()
                    .map_err(|_| error(format!("bad bond '{}'", t)))?;
                let order = BondOrder::from_symbol(&caps[2])
                    .ok_or_else(|| error(format!("unknown bond order in '{}'", t)))?;
                if neighbour == 0 || neighbour == index {
                    return Err(error(format!("atom {} cannot bond to {}", index, neighbour)));
                }
                atom.bonds.push((neighbour - 1, order));
            }
            if !lone_pairs_given {
                implied.push(atoms.len());
            }
            atoms.push(atom);
        }
        if atoms.is_empty() {
            return Err(error("no atoms".to_string()));
        }

        for (i, atom) in atoms.iter().enumerate() {
            for (j, order) in atom.bonds.iter() {
                let back = atoms
                    .get(*j)
                    .and_then(|other| other.bonds.iter().find(|(k, _)| *k == i))
                    .map(|(_, o)| *o);
                if back != Some(*order) {
                    return Err(error(format!(
                        "bond {{{},{}}} of atom {} is not mirrored",
                        j + 1,
                        order.symbol(),
                        i + 1
                    )));
                }
            }
        }
        for i in implied {
            atoms[i].lone_pairs = implied_lone_pairs(&atoms[i]);
        }

        let radicals: u8 = atoms.iter().map(|a| a.radical_electrons).sum();
        let multiplicity =
            multiplicity.unwrap_or_else(|| (radicals + 1).saturating_sub(2 * singlet_pairs));
        Ok(Molecule {
            multiplicity,
            atoms,
        })
    }

    /// Renders the structure; `old_style` drops lone pairs and charges.
    pub fn to_adjacency_list(&self, old_style: bool) -> String {
        let radicals: u8 = self.atoms.iter().map(|a| a.radical_electrons).sum();
        let mut s = String::new();
        if !old_style && (self.multiplicity != 1 || radicals > 0) {
            s.push_str(&format!("multiplicity {}\n", self.multiplicity));
        }
        let index_width = self.atoms.len().to_string().len();
        let label_width = self
            .atoms
            .iter()
            .filter_map(|a| a.label.as_ref().map(|l| l.len()))
            .max();
        for (i, atom) in self.atoms.iter().enumerate() {
            s.push_str(&format!("{:<w$}", i + 1, w = index_width));
            if let Some(width) = label_width {
                s.push_str(&format!(
                    " {:<w$}",
                    atom.label.as_deref().unwrap_or(""),
                    w = width
                ));
            }
            if old_style {
                let radical = match atom.radical_electrons {
                    // singlet pairs when the multiplicity says so
                    2 if self.multiplicity < radicals + 1 => "2S".to_string(),
                    2 => "2T".to_string(),
                    n => n.to_string(),
                };
                s.push_str(&format!(" {:<2} {}", atom.element, radical));
            } else {
                let charge = match atom.charge {
                    c if c > 0 => format!("c+{}", c),
                    c => format!("c{}", c),
                };
                s.push_str(&format!(
                    " {} u{} p{} {}",
                    atom.element, atom.radical_electrons, atom.lone_pairs, charge
                ));
            }
            let mut bonds = atom.bonds.clone();
            bonds.sort_by_key(|(j, _)| *j);
            for (j, order) in bonds {
                s.push_str(&format!(" {{{},{}}}", j + 1, order.symbol()));
            }
            s.push('\n');
        }
        s
    }

    pub fn formula(&self) -> ElementCount {
        let mut counts = ElementCount::new();
        for atom in self.atoms.iter() {
            *counts.entry(atom.element.clone()).or_insert(0) += 1;
        }
        counts
    }

    pub fn hill_formula(&self) -> String {
        hill_formula(&self.formula())
    }

    /// Diatomics, and chains whose inner atoms are sp hybridised
    /// (single + triple or double + double bonds), are linear.
    pub fn is_linear(&self) -> bool {
        let n = self.atoms.len();
        if n < 2 {
            return false;
        }
        if n == 2 {
            return true;
        }
        let bonds: usize = self.atoms.iter().map(|a| a.bonds.len()).sum::<usize>() / 2;
        if bonds != n - 1 {
            return false;
        }
        self.atoms.iter().all(|atom| match atom.bonds.as_slice() {
            [_] => true,
            [(_, a), (_, b)] => matches!(
                (a, b),
                (BondOrder::Single, BondOrder::Triple)
                    | (BondOrder::Triple, BondOrder::Single)
                    | (BondOrder::Double, BondOrder::Double)
            ),
            _ => false,
        })
    }

    /// CHEMKIN transport geometry: 0 atom, 1 linear, 2 nonlinear.
    pub fn shape_index(&self) -> u8 {
        if self.atoms.len() == 1 {
            0
        } else if self.is_linear() {
            1
        } else {
            2
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const METHYL: &str = "multiplicity 2
1 C u1 p0 c0 {2,S} {3,S} {4,S}
2 H u0 p0 c0 {1,S}
3 H u0 p0 c0 {1,S}
4 H u0 p0 c0 {1,S}
";

    #[test]
    fn test_new_style_round_trip() {
        let molecule = Molecule::from_adjacency_list(METHYL, "CH3").unwrap();
        assert_eq!(molecule.multiplicity, 2);
        assert_eq!(molecule.atoms.len(), 4);
        assert_eq!(molecule.atoms[0].radical_electrons, 1);
        assert_eq!(
            molecule.formula(),
            HashMap::from([("C".to_string(), 1), ("H".to_string(), 3)])
        );
        assert_eq!(molecule.hill_formula(), "CH3");
        assert_eq!(molecule.to_adjacency_list(false), METHYL);
        assert_eq!(molecule.shape_index(), 2);
    }

    #[test]
    fn test_old_style_lone_pairs_are_implied() {
        let text = "1 O 0 {2,D}\n2 O 0 {1,D}\n";
        let molecule = Molecule::from_adjacency_list(text, "O2").unwrap();
        assert_eq!(molecule.multiplicity, 1);
        assert_eq!(molecule.atoms[0].lone_pairs, 2);
        assert_eq!(
            molecule.to_adjacency_list(false),
            "1 O u0 p2 c0 {2,D}\n2 O u0 p2 c0 {1,D}\n"
        );
        assert_eq!(molecule.to_adjacency_list(true), "1 O  0 {2,D}\n2 O  0 {1,D}\n");
        let reread = Molecule::from_adjacency_list(&molecule.to_adjacency_list(true), "O2").unwrap();
        assert_eq!(reread, molecule);
    }

    #[test]
    fn test_old_style_singlet_biradical() {
        let text = "1 C 2S {2,S} {3,S}\n2 H 0 {1,S}\n3 H 0 {1,S}\n";
        let molecule = Molecule::from_adjacency_list(text, "CH2(S)").unwrap();
        assert_eq!(molecule.multiplicity, 1);
        assert_eq!(
            molecule.to_adjacency_list(true),
            "1 C  2S {2,S} {3,S}\n2 H  0 {1,S}\n3 H  0 {1,S}\n"
        );
        let triplet = Molecule::from_adjacency_list(&text.replace("2S", "2T"), "CH2").unwrap();
        assert_eq!(triplet.multiplicity, 3);
    }

    #[test]
    fn test_labels_and_charges() {
        let text = "1 *1 N u0 p0 c+1 {2,D} {3,S}\n2 *2 O u0 p2 c0 {1,D}\n3    O u0 p3 c-1 {1,S}\n";
        let molecule = Molecule::from_adjacency_list(text, "NO2").unwrap();
        assert_eq!(molecule.atoms[0].charge, 1);
        assert_eq!(molecule.atoms[2].charge, -1);
        assert_eq!(molecule.atoms[1].label.as_deref(), Some("*2"));
        assert_eq!(molecule.to_adjacency_list(false), text);
    }

    #[test]
    fn test_shape_index() {
        assert_eq!(Molecule::monatomic("Ar").shape_index(), 0);
        assert_eq!(Molecule::monatomic("AR").atoms[0].lone_pairs, 4);
        let n2 = Molecule::from_adjacency_list("1 N u0 p1 c0 {2,T}\n2 N u0 p1 c0 {1,T}", "N2").unwrap();
        assert_eq!(n2.shape_index(), 1);
        let co2 = Molecule::from_adjacency_list(
            "1 O u0 p2 c0 {2,D}\n2 C u0 p0 c0 {1,D} {3,D}\n3 O u0 p2 c0 {2,D}",
            "CO2",
        )
        .unwrap();
        assert!(co2.is_linear());
        let water = Molecule::from_adjacency_list(
            "1 O u0 p2 c0 {2,S} {3,S}\n2 H u0 p0 c0 {1,S}\n3 H u0 p0 c0 {1,S}",
            "H2O",
        )
        .unwrap();
        assert_eq!(water.shape_index(), 2);
    }

    #[test]
    fn test_malformed_lists() {
        let unmirrored = "1 C u0 p0 c0 {2,S}\n2 H u0 p0 c0";
        assert!(matches!(
            Molecule::from_adjacency_list(unmirrored, "X"),
            Err(ChemkinError::AdjacencyList { .. })
        ));
        assert!(Molecule::from_adjacency_list("1 C u0 {1,S}", "X").is_err());
        assert!(Molecule::from_adjacency_list("2 C u0", "X").is_err());
        assert!(Molecule::from_adjacency_list("1 C u0 {2,X}\n2 C u0 {1,X}", "X").is_err());
        assert!(Molecule::from_adjacency_list("", "X").is_err());
    }
}
