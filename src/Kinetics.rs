/// Module to calculate the atomic composition and molar mass of a chemical formula
///
///  # Examples
/// ```
/// use ChemkinIO::Kinetics::molmass::{hill_formula, molar_mass, parse_formula};
/// let counts = parse_formula("C2H6").unwrap();
/// assert_eq!(hill_formula(&counts), "C2H6");
/// println!("Molar mass: {:?} g/mol", molar_mass(&counts));
/// ```
pub mod molmass;
/// structures of the species dictionary in adjacency list form (both dialects)
pub mod adjacency_list;
/// species as they appear in CHEMKIN files and the identifiers written for them
///
///  # Examples
/// ```
/// use ChemkinIO::Kinetics::species::Species;
/// let n2 = Species::from_chemkin_name("N2(35)");
/// assert_eq!(n2.label, "N2");
/// assert_eq!(n2.identifier().unwrap(), "N2(35)");
/// ```
pub mod species;
/// reading and writing of species dictionaries
pub mod species_dictionary;
/// eng
/// The module handles the REACTIONS section of CHEMKIN files: it parses reaction entries
/// (equation, Arrhenius parameters and auxiliary LOW/TROE/PLOG/efficiency lines) into
/// kinetics models, writes them back and applies the CHEMKIN rules for DUPLICATE reactions.
/// ----------------------------------------------------------------
/// ru
/// Модуль обрабатывает раздел REACTIONS файлов CHEMKIN: разбирает записи реакций
/// (уравнение, параметры Аррениуса и вспомогательные строки LOW/TROE/PLOG/эффективностей)
/// в кинетические модели, записывает их обратно и применяет правила CHEMKIN для DUPLICATE реакций.
pub mod chemkin_reactions;
/// tests
pub mod chemkin_reactions_tests;
/// whole mechanism files: sections, species, thermo, reactions and their comments
///
///  # Examples
/// ```no_run
/// use ChemkinIO::Kinetics::chemkin_mechanism::{load_chemkin_file, print_summary};
/// use ChemkinIO::Utils::diagnostics::Diagnostics;
/// use ChemkinIO::settings::ChemkinOptions;
/// use std::path::Path;
/// let mut diag = Diagnostics::new();
/// let (species, reactions) = load_chemkin_file(
///     Path::new("chem.inp"),
///     Some(Path::new("species_dictionary.txt")),
///     &ChemkinOptions::default(),
///     &mut diag,
/// )
/// .unwrap();
/// print_summary(&species, &reactions);
/// ```
pub mod chemkin_mechanism;
