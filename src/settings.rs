//! # Settings Module
//!
//! ## Purpose
//! Options steering how mechanism files are read and written. Readers take a
//! [`ChemkinOptions`], writers a [`WriterOptions`]; both have sensible
//! defaults and can be kept in a JSON file next to the mechanism.
//!
//! ## Configuration Format
//! ```json
//! {
//!   "use_chemkin_names": false,
//!   "check_duplicates": true,
//!   "read_comments": true,
//!   "inert_species": ["N2", "Ar", "He", "Ne"],
//!   "transport_path": "tran.dat",
//!   "thermo_path": null
//! }
//! ```
//! Missing keys take their default values.
use crate::chemkin_error::ChemkinError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Options of the mechanism reader.
///
/// # Fields
/// * `use_chemkin_names` - keep the names of the `SPECIES` block as labels
///   even when a line carries an alias comment (`ethane ! C2H6`)
/// * `check_duplicates` - fail on identical reactions not marked `DUPLICATE`
/// * `read_comments` - attach comments to reactions and read family metadata
/// * `inert_species` - formulas of species marked non-reactive unless they
///   take part in a reaction
/// * `transport_path` - transport file loaded into the species
/// * `thermo_path` - extra thermo file; its records are used for species the
///   mechanism file has no thermo for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChemkinOptions {
    pub use_chemkin_names: bool,
    pub check_duplicates: bool,
    pub read_comments: bool,
    pub inert_species: Vec<String>,
    pub transport_path: Option<PathBuf>,
    pub thermo_path: Option<PathBuf>,
}

impl Default for ChemkinOptions {
    fn default() -> Self {
        Self {
            use_chemkin_names: false,
            check_duplicates: true,
            read_comments: true,
            inert_species: ["N2", "Ar", "He", "Ne"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            transport_path: None,
            thermo_path: None,
        }
    }
}

impl ChemkinOptions {
    /// Loads options from a JSON file. Relative data paths are taken
    /// relative to the directory of the JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, ChemkinError> {
        let content = fs::read_to_string(path)?;
        let mut options: ChemkinOptions = serde_json::from_str(&content)?;
        if let Some(dir) = path.parent() {
            for data_path in [&mut options.transport_path, &mut options.thermo_path] {
                if let Some(p) = data_path.as_mut() {
                    if p.is_relative() {
                        *p = dir.join(&*p);
                    }
                }
            }
        }
        Ok(options)
    }

    pub fn to_json(&self) -> Result<String, ChemkinError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Options of the mechanism writer.
///
/// # Fields
/// * `verbose` - write reaction indices, comments and thermo comments
/// * `check_for_duplicates` - adjust `DUPLICATE` flags before writing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterOptions {
    pub verbose: bool,
    pub check_for_duplicates: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            verbose: true,
            check_for_duplicates: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let options = ChemkinOptions::default();
        assert_eq!(options.inert_species, vec!["N2", "Ar", "He", "Ne"]);
        assert!(options.check_duplicates);
        assert!(!options.use_chemkin_names);
        assert_eq!(
            WriterOptions::default(),
            WriterOptions {
                verbose: true,
                check_for_duplicates: true
            }
        );
    }

    #[test]
    fn test_from_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "use_chemkin_names": true, "inert_species": ["Ar"], "transport_path": "tran.dat" }}"#
        )
        .unwrap();
        let options = ChemkinOptions::from_json_file(file.path()).unwrap();
        assert!(options.use_chemkin_names);
        assert!(options.check_duplicates);
        assert_eq!(options.inert_species, vec!["Ar"]);
        let expected = file.path().parent().unwrap().join("tran.dat");
        assert_eq!(options.transport_path, Some(expected));

        let reread: ChemkinOptions = serde_json::from_str(&options.to_json().unwrap()).unwrap();
        assert_eq!(reread, options);
    }

    #[test]
    fn test_bad_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ \"inert_species\": 3 }}").unwrap();
        assert!(matches!(
            ChemkinOptions::from_json_file(file.path()),
            Err(ChemkinError::Config(_))
        ));
    }
}
