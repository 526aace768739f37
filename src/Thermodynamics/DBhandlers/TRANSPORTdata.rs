//! # Transport data in CHEMKIN `tran.dat` form
//!
//! ## Aim
//! Reading and writing of the Lennard-Jones transport parameters that accompany
//! a mechanism file. One record per species:
//!
//! ```text
//! Ar                  0   136.501     3.330     0.000     0.000     0.000    ! GRI-Mech
//! ```
//! shape index (0 atom, 1 linear, 2 nonlinear), well depth ε/k_B in K,
//! collision diameter σ in Å, dipole moment in Debye, polarizability in Å³,
//! rotational relaxation collision number at 298 K, and the source comment.
//!
//! ## Round trip
//! Numbers are written with three decimals when that reads back as the same
//! number and in shortest exact form otherwise, so a written file reproduces
//! the data exactly.
use crate::Kinetics::species::Species;
use crate::Utils::load_from_file::{read_lines, remove_comment_from_line};
use crate::Utils::number_format::fixed_or_exact;
use crate::chemkin_error::ChemkinError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    InvalidShapeIndex(u8),
    InvalidParameter { name: String, value: f64 },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::InvalidShapeIndex(shape) => {
                write!(f, "Invalid shape index {}: expected 0, 1 or 2", shape)
            }
            TransportError::InvalidParameter { name, value } => {
                write!(f, "Invalid value of {}: {}", name, value)
            }
        }
    }
}

impl Error for TransportError {}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TransportData {
    /// Form of the molecule
    ///   Atom=0 Linear=1 Nonlinear=2
    pub shape_index: u8,
    /// Lennard-Jones well depth in Kelvin
    pub epsilon: f64,
    ///  Lennard-Jones collision diameter in angstroms
    pub sigma: f64,
    ///  dipole moment in Debye
    pub dipole_moment: f64,
    ///  Polarizability in A^3
    pub polarizability: f64,
    ///  Number of rotational relaxation collisions at 298 K.  Dimensionless
    pub rotrelaxcollnum: f64,
    /// source of the data
    pub comment: String,
}

impl TransportData {
    pub fn new(
        shape_index: u8,
        epsilon: f64,
        sigma: f64,
        dipole_moment: f64,
        polarizability: f64,
        rotrelaxcollnum: f64,
        comment: &str,
    ) -> Result<Self, TransportError> {
        if shape_index > 2 {
            return Err(TransportError::InvalidShapeIndex(shape_index));
        }
        for (name, value) in [
            ("epsilon", epsilon),
            ("sigma", sigma),
            ("polarizability", polarizability),
            ("rotrelaxcollnum", rotrelaxcollnum),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(TransportError::InvalidParameter {
                    name: name.to_string(),
                    value,
                });
            }
        }
        if !dipole_moment.is_finite() {
            return Err(TransportError::InvalidParameter {
                name: "dipole_moment".to_string(),
                value: dipole_moment,
            });
        }
        Ok(Self {
            shape_index,
            epsilon,
            sigma,
            dipole_moment,
            polarizability,
            rotrelaxcollnum,
            comment: comment.to_string(),
        })
    }

    /// One `tran.dat` line for the species written as `identifier`.
    pub fn to_chemkin_record(&self, identifier: &str) -> String {
        format!(
            "{:<19} {} {:>9} {:>9} {:>9} {:>9} {:>9}    ! {}",
            identifier,
            self.shape_index,
            fixed_or_exact(self.epsilon, 3),
            fixed_or_exact(self.sigma, 3),
            fixed_or_exact(self.dipole_moment, 3),
            fixed_or_exact(self.polarizability, 3),
            fixed_or_exact(self.rotrelaxcollnum, 3),
            self.comment
        )
    }

    /// Parses one record into (label, data). The comment is whatever
    /// follows the `!`.
    pub fn from_chemkin_record(line: &str) -> Result<(String, Self), ChemkinError> {
        let malformed = |reason: String| ChemkinError::MalformedTransport {
            line: line.trim().to_string(),
            reason,
        };
        let (data, comment) = remove_comment_from_line(line);
        let tokens: Vec<&str> = data.split_whitespace().collect();
        if tokens.len() < 7 {
            return Err(malformed(format!(
                "expected label and 6 values, found {} tokens",
                tokens.len()
            )));
        }
        let shape_index: u8 = tokens[1]
            .parse()
            .map_err(|_| malformed(format!("bad shape index '{}'", tokens[1])))?;
        let mut values = [0.0; 5];
        for (value, token) in values.iter_mut().zip(tokens[2..7].iter()) {
            *value = token
                .parse()
                .map_err(|_| malformed(format!("could not convert string to float: {}", token)))?;
        }
        let [epsilon, sigma, dipole, polar, zrot] = values;
        let transport =
            TransportData::new(shape_index, epsilon, sigma, dipole, polar, zrot, comment.trim())
                .map_err(|e| malformed(e.to_string()))?;
        Ok((tokens[0].to_string(), transport))
    }
}

/// Writes the transport file: a two line header, then one record per species.
/// Species without transport data are listed in a comment line.
pub fn save_transport_file(path: &Path, species: &[Species]) -> Result<(), ChemkinError> {
    let mut f = BufWriter::new(File::create(path)?);
    writeln!(
        f,
        "! {:15} {:8} {:9} {:9} {:9} {:9} {:9} {:9}",
        "Species", "Shape", "LJ-depth", "LJ-diam", "DiplMom", "Polzblty", "RotRelaxNum", "Data"
    )?;
    writeln!(
        f,
        "! {:15} {:8} {:9} {:9} {:9} {:9} {:9} {:9}",
        "Name", "Index", "epsilon/k_B", "sigma", "mu", "alpha", "Zrot", "Source"
    )?;
    for spc in species.iter() {
        let identifier = spc.identifier()?;
        match &spc.transport {
            Some(transport) => writeln!(f, "{}", transport.to_chemkin_record(&identifier))?,
            None => {
                let shape = spc
                    .shape_index()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "?".to_string());
                writeln!(f, "! {} {}", identifier, shape)?
            }
        }
    }
    f.flush()?;
    info!(
        "transport data of {} species written to '{}'",
        species.len(),
        path.display()
    );
    Ok(())
}

/// Reads a transport file into the species of `species` (keyed by the label
/// used in the file). Records for labels absent from the map are ignored.
pub fn load_transport_file(
    path: &Path,
    species: &mut HashMap<String, Species>,
) -> Result<(), ChemkinError> {
    let mut loaded = 0;
    for line in read_lines(path)?.iter() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('!') || trimmed.eq_ignore_ascii_case("END")
        {
            continue;
        }
        let (label, transport) = TransportData::from_chemkin_record(line)?;
        match species.get_mut(&label) {
            Some(spc) => {
                spc.transport = Some(transport);
                loaded += 1;
            }
            None => debug!("transport data for unknown species {} ignored", label),
        }
    }
    info!(
        "transport data for {} species loaded from '{}'",
        loaded,
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Kinetics::adjacency_list::Molecule;
    use tempfile::NamedTempFile;

    fn argon() -> TransportData {
        TransportData::new(0, 136.501, 3.33, 0.0, 0.0, 0.0, "GRI-Mech").unwrap()
    }

    #[test]
    fn test_record_format() {
        let record = argon().to_chemkin_record("Ar");
        assert_eq!(
            record,
            "Ar                  0   136.501     3.330     0.000     0.000     0.000    ! GRI-Mech"
        );
        let (label, transport) = TransportData::from_chemkin_record(&record).unwrap();
        assert_eq!(label, "Ar");
        assert_eq!(transport, argon());
    }

    #[test]
    fn test_record_keeps_full_precision() {
        let transport =
            TransportData::new(2, 1134.93 / 8.314472, 4.35, 1.7, 2.6, 1.5, "estimated").unwrap();
        let (_, reread) =
            TransportData::from_chemkin_record(&transport.to_chemkin_record("CH3OH")).unwrap();
        assert_eq!(reread, transport);
    }

    #[test]
    fn test_invalid_parameters() {
        assert_eq!(
            TransportData::new(3, 1.0, 1.0, 0.0, 0.0, 0.0, ""),
            Err(TransportError::InvalidShapeIndex(3))
        );
        assert!(TransportData::new(1, -97.0, 3.6, 0.0, 0.0, 0.0, "").is_err());
        assert!(matches!(
            TransportData::from_chemkin_record("N2 1 97.53 3.62 0.0"),
            Err(ChemkinError::MalformedTransport { .. })
        ));
        assert!(TransportData::from_chemkin_record("N2 1 97.53 3.62 x 1.76 4.0 ! bad").is_err());
    }

    #[test]
    fn test_transport_file_read_and_write() {
        let mut ar = Species::new("Ar");
        ar.transport = Some(argon());
        let mut n2 = Species::new("N2");
        n2.molecule = Some(
            Molecule::from_adjacency_list("1 N u0 p1 c0 {2,T}\n2 N u0 p1 c0 {1,T}", "N2").unwrap(),
        );
        let file = NamedTempFile::new().unwrap();
        save_transport_file(file.path(), &[ar.clone(), n2.clone()]).unwrap();

        let text = std::fs::read_to_string(file.path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("! Species"));
        assert_eq!(lines[3], "! N2 1");

        let mut species = HashMap::from([
            ("Ar".to_string(), Species::new("Ar")),
            ("N2".to_string(), n2.clone()),
        ]);
        load_transport_file(file.path(), &mut species).unwrap();
        assert_eq!(species["Ar"], ar);
        assert!(species["N2"].transport.is_none());
    }

    #[test]
    fn test_unknown_labels_are_ignored() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "! header").unwrap();
        writeln!(
            file,
            "HE                  0    10.200     2.576     0.000     0.000     0.000    ! GRI-Mech"
        )
        .unwrap();
        writeln!(file, "END").unwrap();
        let mut species = HashMap::from([("Ar".to_string(), Species::new("Ar"))]);
        load_transport_file(file.path(), &mut species).unwrap();
        assert!(species["Ar"].transport.is_none());
    }
}
