/// Module to handle species dictionaries: blank line separated blocks, each a
/// species label followed by the adjacency list of its structure.
///
/// ```text
/// CH3
/// multiplicity 2
/// 1 C u1 p0 c0 {2,S} {3,S} {4,S}
/// 2 H u0 p0 c0 {1,S}
/// 3 H u0 p0 c0 {1,S}
/// 4 H u0 p0 c0 {1,S}
///
/// ```
use crate::Kinetics::adjacency_list::Molecule;
use crate::Kinetics::species::Species;
use crate::Utils::diagnostics::Diagnostics;
use crate::Utils::load_from_file::read_lines;
use crate::chemkin_error::ChemkinError;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

fn parse_block(block: &[&str], inert: &[String]) -> Result<Species, ChemkinError> {
    let label = block[0].trim();
    let structure: Vec<&str> = block[1..]
        .iter()
        .copied()
        .filter(|l| !l.trim_start().starts_with("InChI"))
        .collect();
    let mut species = Species::from_chemkin_name(label);
    species.molecule = Some(Molecule::from_adjacency_list(&structure.join("\n"), label)?);
    if species.is_inert(inert) {
        species.reactive = false;
    }
    Ok(species)
}

/// Parses dictionary text; species matching `inert` are marked non-reactive.
pub fn read_species_dictionary(text: &str, inert: &[String]) -> Result<Vec<Species>, ChemkinError> {
    let mut species = Vec::new();
    let mut block: Vec<&str> = Vec::new();
    for line in text.lines().chain(std::iter::once("")) {
        let line = line.trim_end();
        if line.trim().is_empty() {
            if !block.is_empty() {
                species.push(parse_block(&block, inert)?);
                block.clear();
            }
            continue;
        }
        if line.trim_start().starts_with("//") {
            continue;
        }
        block.push(line);
    }
    Ok(species)
}

pub fn load_species_dictionary(path: &Path, inert: &[String]) -> Result<Vec<Species>, ChemkinError> {
    let text = read_lines(path)?.join("\n");
    let species = read_species_dictionary(&text, inert)?;
    info!(
        "{} species read from dictionary '{}'",
        species.len(),
        path.display()
    );
    Ok(species)
}

/// Dictionary text for `species`; species without a structure are skipped
/// with a warning.
pub fn write_species_dictionary(
    species: &[Species],
    old_style: bool,
    diag: &mut Diagnostics,
) -> Result<String, ChemkinError> {
    let mut s = String::new();
    for spc in species.iter() {
        let identifier = spc.identifier()?;
        match &spc.molecule {
            Some(molecule) => {
                s.push_str(&identifier);
                s.push('\n');
                s.push_str(&molecule.to_adjacency_list(old_style));
                s.push('\n');
            }
            None => diag.warning(format!(
                "Species {} has no structure and was not written to the species dictionary.",
                identifier
            )),
        }
    }
    Ok(s)
}

pub fn save_species_dictionary(
    path: &Path,
    species: &[Species],
    old_style: bool,
    diag: &mut Diagnostics,
) -> Result<(), ChemkinError> {
    let text = write_species_dictionary(species, old_style, diag)?;
    let mut f = BufWriter::new(File::create(path)?);
    f.write_all(text.as_bytes())?;
    f.flush()?;
    info!("species dictionary written to '{}'", path.display());
    Ok(())
}
