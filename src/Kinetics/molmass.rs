/// Module to handle the atomic composition of species: element counts as read
/// from CHEMKIN thermo records, Hill formulas and molar masses
///
use regex::Regex;
use std::collections::HashMap;

/// element symbol -> number of atoms
pub type ElementCount = HashMap<String, usize>;

// element symbols and atomic masses, g/mol
const ELEMENTS: &[(&str, f64)] = &[
    ("E", 5.4858e-4),
    ("H", 1.008),
    ("D", 2.014),
    ("T", 3.016),
    ("He", 4.0026),
    ("Li", 6.94),
    ("Be", 9.0122),
    ("B", 10.81),
    ("C", 12.011),
    ("N", 14.007),
    ("O", 15.999),
    ("F", 18.998),
    ("Ne", 20.18),
    ("Na", 22.99),
    ("Mg", 24.305),
    ("Al", 26.98),
    ("Si", 28.085),
    ("P", 30.974),
    ("S", 32.065),
    ("Cl", 35.45),
    ("Ar", 39.948),
    ("K", 39.102),
    ("Ca", 40.08),
    ("Ti", 47.867),
    ("Cr", 51.9961),
    ("Fe", 55.845),
    ("Ni", 58.69),
    ("Cu", 63.546),
    ("Zn", 65.38),
    ("Br", 79.904),
    ("Kr", 83.798),
    ("I", 126.904),
    ("Xe", 131.293),
];

/// Normalises a symbol as written in CHEMKIN files (`AR`, `ar`) to the usual
/// capitalisation (`Ar`).
pub fn normalize_symbol(symbol: &str) -> String {
    let mut chars = symbol.trim().chars();
    match chars.next() {
        Some(first) => {
            let mut s = first.to_uppercase().collect::<String>();
            s.push_str(&chars.as_str().to_lowercase());
            s
        }
        None => String::new(),
    }
}

pub fn atomic_mass(symbol: &str) -> Option<f64> {
    let symbol = normalize_symbol(symbol);
    ELEMENTS
        .iter()
        .find(|(name, _)| *name == symbol)
        .map(|(_, mass)| *mass)
}

/// molar mass in g/mol, None if an element is unknown
pub fn molar_mass(counts: &ElementCount) -> Option<f64> {
    counts
        .iter()
        .map(|(element, count)| atomic_mass(element).map(|m| m * *count as f64))
        .sum()
}

/// Element symbols in Hill order: C first, H second, the rest alphabetically.
/// Without carbon every symbol, hydrogen included, is alphabetical.
pub fn hill_order(counts: &ElementCount) -> Vec<(String, usize)> {
    let mut elements: Vec<(String, usize)> = counts
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(e, c)| (e.clone(), *c))
        .collect();
    let has_carbon = counts.get("C").is_some_and(|c| *c > 0);
    elements.sort_by(|(a, _), (b, _)| {
        let rank = |e: &str| -> u8 {
            if !has_carbon {
                return 2;
            }
            match e {
                "C" => 0,
                "H" => 1,
                _ => 2,
            }
        };
        rank(a).cmp(&rank(b)).then_with(|| a.cmp(b))
    });
    elements
}

/// Hill formula, e.g. `C2H6`, `ArH`, `N2`
pub fn hill_formula(counts: &ElementCount) -> String {
    hill_order(counts)
        .into_iter()
        .map(|(element, count)| {
            if count == 1 {
                element
            } else {
                format!("{}{}", element, count)
            }
        })
        .collect()
}

/// Parses a plain formula such as `C2H6` or `N2` (no brackets or groups).
pub fn parse_formula(formula: &str) -> Result<ElementCount, String> {
    let re = Regex::new(r"([A-Z][a-z]?)(\d*)").map_err(|e| e.to_string())?;
    let mut counts = ElementCount::new();
    let mut consumed = 0;
    for cap in re.captures_iter(formula) {
        let whole = cap.get(0).map(|m| m.as_str()).unwrap_or("");
        consumed += whole.len();
        let element = cap[1].to_string();
        let count = match &cap[2] {
            "" => 1,
            digits => digits
                .parse::<usize>()
                .map_err(|e| format!("bad count in formula {}: {}", formula, e))?,
        };
        *counts.entry(element).or_insert(0) += count;
    }
    if consumed != formula.trim().len() || counts.is_empty() {
        return Err(format!("cannot parse formula '{}'", formula));
    }
    Ok(counts)
}

/// total number of atoms
pub fn atom_number(counts: &ElementCount) -> usize {
    counts.values().sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_formula() {
        let expected_counts = HashMap::from([("C".to_string(), 2), ("H".to_string(), 6)]);
        assert_eq!(parse_formula("C2H6").unwrap(), expected_counts);
        let expected_counts = HashMap::from([("N".to_string(), 2)]);
        assert_eq!(parse_formula("N2").unwrap(), expected_counts);
        let expected_counts = HashMap::from([("Ar".to_string(), 1)]);
        assert_eq!(parse_formula("Ar").unwrap(), expected_counts);
        assert!(parse_formula("c2h6").is_err());
        assert!(parse_formula("").is_err());
        assert!(parse_formula("C2(H6)").is_err());
    }

    #[test]
    fn test_hill_formula() {
        let ethane = HashMap::from([("H".to_string(), 6), ("C".to_string(), 2)]);
        assert_eq!(hill_formula(&ethane), "C2H6");
        let water = HashMap::from([("O".to_string(), 1), ("H".to_string(), 2)]);
        assert_eq!(hill_formula(&water), "H2O");
        let hcl = HashMap::from([("Cl".to_string(), 1), ("H".to_string(), 1)]);
        assert_eq!(hill_formula(&hcl), "ClH");
        let with_zero = HashMap::from([("N".to_string(), 2), ("C".to_string(), 0)]);
        assert_eq!(hill_formula(&with_zero), "N2");
    }

    #[test]
    fn test_molar_mass() {
        let ethane = parse_formula("C2H6").unwrap();
        assert_relative_eq!(molar_mass(&ethane).unwrap(), 30.07, epsilon = 1e-2);
        assert_eq!(atom_number(&ethane), 8);
        assert_eq!(normalize_symbol("AR"), "Ar");
        assert_relative_eq!(atomic_mass("ar").unwrap(), 39.948);
        let unknown = HashMap::from([("Qq".to_string(), 1)]);
        assert!(molar_mass(&unknown).is_none());
    }
}
