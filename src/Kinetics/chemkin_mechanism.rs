//! # Mechanism files
//!
//! ## Aim
//! Reading and writing of complete CHEMKIN mechanism files
//!
//! ```text
//! ELEMENTS  H C O N Ar  END
//! SPECIES
//!     Ar  CH3  ethane  ! C2H6
//! END
//! THERM ALL
//!    300.000  1000.000  5000.000
//! <NASA records>
//! END
//! REACTIONS    KCAL/MOLE   MOLES
//! ! Template reaction: R_Recombination
//! CH3+CH3=ethane          8.260e+17 -1.400    1.000
//! END
//! ```
//! together with the species dictionary holding the structures and, when
//! given, the transport file.
//!
//! ## Comments
//! Comments between reactions carry metadata. The writer puts them in front
//! of the reaction they describe; hand-written files often put them behind.
//! When nothing but `END` follows the last reaction the file is taken to be
//! in writer style, otherwise comments belong to the reaction before them.
use crate::Kinetics::adjacency_list::Molecule;
use crate::Kinetics::chemkin_reactions::{
    Reaction, ReactionUnits, check_for_unmarked_duplicates, mark_duplicate_reactions,
    read_reaction_entry, write_reaction_entry,
};
use crate::Kinetics::molmass::{ElementCount, hill_order};
use crate::Kinetics::species::{Species, split_index_suffix};
use crate::Kinetics::species_dictionary::load_species_dictionary;
use crate::Thermodynamics::DBhandlers::TRANSPORTdata::load_transport_file;
use crate::Thermodynamics::DBhandlers::chemkin_thermo::{
    ThermoBlock, read_thermo_block, write_thermo_entry,
};
use crate::Utils::diagnostics::Diagnostics;
use crate::Utils::load_from_file::{
    Section, is_end_line, read_lines, remove_comment_from_line, section_header,
};
use crate::chemkin_error::ChemkinError;
use crate::settings::{ChemkinOptions, WriterOptions};
use log::{debug, info};
use prettytable::{Table, row};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::LazyLock;

static TEMPLATE_REACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Template reaction:\s*(\S+)").unwrap());
static LIBRARY_REACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Library reaction:\s*(\S+)").unwrap());
static REACTION_INDEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Reaction index:").unwrap());

/// temperature line written after `THERM ALL`
const DEFAULT_TEMPERATURES: &str = "   300.000  1000.000  5000.000";

/// A name of the `SPECIES` block with its alias comment, if any.
#[derive(Debug, Clone)]
struct Declaration {
    name: String,
    alias: Option<String>,
}

/// Text of one reaction: equation line and auxiliary lines without
/// comments, comments before it and comments on its own lines.
#[derive(Debug, Default)]
struct ReactionText {
    lines: Vec<String>,
    leading: Vec<String>,
    inline: Vec<String>,
}

fn has_end_token(data: &str) -> bool {
    data.split_whitespace().any(|t| t.eq_ignore_ascii_case("END"))
}

/// Index of the first line after the section opened at `start`.
fn skip_section(lines: &[String], start: usize) -> usize {
    let (header, _) = remove_comment_from_line(&lines[start]);
    if has_end_token(header) {
        return start + 1;
    }
    let mut i = start + 1;
    while i < lines.len() {
        let (data, _) = remove_comment_from_line(&lines[i]);
        i += 1;
        if has_end_token(data) {
            break;
        }
    }
    i
}

fn read_species_section(
    lines: &[String],
    start: usize,
    declarations: &mut Vec<Declaration>,
    diag: &mut Diagnostics,
) -> usize {
    let mut i = start;
    while i < lines.len() {
        let (data, comment) = remove_comment_from_line(&lines[i]);
        let mut tokens: Vec<&str> = data.split_whitespace().collect();
        if i == start && !tokens.is_empty() {
            // the SPECIES keyword itself
            tokens.remove(0);
        }
        i += 1;
        let end = tokens.iter().position(|t| t.eq_ignore_ascii_case("END"));
        if let Some(end) = end {
            tokens.truncate(end);
        }
        let comment_tokens: Vec<&str> = comment.split_whitespace().collect();
        let alias = match (tokens.len(), comment_tokens.as_slice()) {
            (1, [alias]) => Some(alias.to_string()),
            _ => None,
        };
        for token in tokens {
            if declarations.iter().any(|d| d.name == token) {
                diag.warning(format!(
                    "Species {} is declared more than once; ignoring the repeated declaration.",
                    token
                ));
                continue;
            }
            declarations.push(Declaration {
                name: token.to_string(),
                alias: alias.clone(),
            });
        }
        if end.is_some() {
            break;
        }
    }
    i
}

/// Groups the lines of a `REACTIONS` section into entries. Returns the
/// entries, the comments after the last one and the line after `END`.
fn read_reaction_section(
    lines: &[String],
    start: usize,
) -> Result<(Vec<ReactionText>, Vec<String>, usize), ChemkinError> {
    let mut entries: Vec<ReactionText> = Vec::new();
    let mut pending: Vec<String> = Vec::new();
    let mut i = start;
    while i < lines.len() {
        let raw = &lines[i];
        i += 1;
        if is_end_line(raw) {
            break;
        }
        let (data, comment) = remove_comment_from_line(raw);
        let (data, comment) = (data.trim(), comment.trim());
        if data.contains('=') {
            let mut entry = ReactionText {
                lines: vec![data.to_string()],
                leading: std::mem::take(&mut pending),
                inline: Vec::new(),
            };
            if !comment.is_empty() {
                entry.inline.push(comment.to_string());
            }
            entries.push(entry);
            continue;
        }
        if !data.is_empty() {
            let entry = entries
                .last_mut()
                .ok_or_else(|| ChemkinError::MalformedReaction {
                    entry: data.to_string(),
                    reason: "auxiliary line before the first reaction".to_string(),
                })?;
            entry.lines.push(data.to_string());
        }
        if !comment.is_empty() {
            pending.push(comment.to_string());
        }
    }
    Ok((entries, pending, i))
}

/// Comment lines of each entry, following the writer-style or trailing-style
/// convention (see the module documentation).
fn associate_comments(entries: &mut [ReactionText], trailing: Vec<String>) -> Vec<Vec<String>> {
    if trailing.is_empty() {
        return entries
            .iter_mut()
            .map(|e| {
                let mut c = std::mem::take(&mut e.leading);
                c.append(&mut e.inline);
                c
            })
            .collect();
    }
    if let Some(first) = entries.first() {
        if !first.leading.is_empty() {
            debug!(
                "{} comment lines before the first reaction are not attached to any reaction",
                first.leading.len()
            );
        }
    }
    let mut following: Vec<Vec<String>> = entries
        .iter_mut()
        .skip(1)
        .map(|e| std::mem::take(&mut e.leading))
        .collect();
    following.push(trailing);
    entries
        .iter_mut()
        .zip(following)
        .map(|(e, mut after)| {
            let mut c = std::mem::take(&mut e.inline);
            c.append(&mut after);
            c
        })
        .collect()
}

/// Reads family and library names out of the comment lines; the other
/// lines become the reaction comment. Reaction index lines are dropped,
/// the writer regenerates them.
fn apply_comments(reaction: &mut Reaction, comments: &[String]) {
    let mut text: Vec<&str> = Vec::new();
    for comment in comments.iter() {
        if let Some(caps) = TEMPLATE_REACTION.captures(comment) {
            reaction.family = Some(caps[1].to_string());
        } else if let Some(caps) = LIBRARY_REACTION.captures(comment) {
            reaction.library = Some(caps[1].to_string());
        } else if !REACTION_INDEX.is_match(comment) {
            text.push(comment);
        }
    }
    reaction.comment = text.join("\n");
}

/// Attaches the thermo records to the declared species. Records of
/// undeclared species are ignored; with `overwrite == false` species that
/// already have thermo keep it.
fn attach_thermo(
    block: &ThermoBlock,
    species: &mut [Species],
    positions: &HashMap<String, usize>,
    overwrite: bool,
    diag: &mut Diagnostics,
) {
    for entry in block.entries.iter() {
        let Some(&position) = positions.get(&entry.label) else {
            diag.info(format!(
                "Ignoring thermo data for {} which is not declared in the SPECIES block.",
                entry.label
            ));
            continue;
        };
        let spc = &mut species[position];
        if entry.thermo.is_none() || (spc.thermo.is_some() && !overwrite) {
            continue;
        }
        spc.thermo = entry.thermo.clone();
        spc.formula = entry.formula.clone();
    }
}

/// Structure of a species known only from a single atom formula.
fn monatomic_structure(formula: &ElementCount) -> Option<Molecule> {
    let mut atoms = formula.iter().filter(|(_, n)| **n > 0);
    match (atoms.next(), atoms.next()) {
        (Some((element, &1)), None) => Some(Molecule::monatomic(element)),
        _ => None,
    }
}

/// Species sharing label and index with an earlier one get the lowest free
/// index, so that every species keeps its own identifier.
fn disambiguate_labels(species: &mut [Species], diag: &mut Diagnostics) {
    let mut taken: HashSet<(String, Option<usize>)> = species
        .iter()
        .map(|s| (s.label.clone(), s.index))
        .collect();
    let mut seen: HashSet<(String, Option<usize>)> = HashSet::new();
    for spc in species.iter_mut() {
        if seen.insert((spc.label.clone(), spc.index)) {
            continue;
        }
        let Some(index) = (1..).find(|n| !taken.contains(&(spc.label.clone(), Some(*n)))) else {
            continue;
        };
        let previous = spc.to_string();
        spc.index = Some(index);
        taken.insert((spc.label.clone(), spc.index));
        seen.insert((spc.label.clone(), spc.index));
        diag.info(format!(
            "Species {} clashes with an earlier species and was renamed to {}.",
            previous, spc
        ));
    }
}

/// Parses the lines of a mechanism file. `dictionary` supplies structures,
/// looked up by the name in the `SPECIES` block, then by its alias.
pub fn read_chemkin_mechanism(
    lines: &[String],
    dictionary: &[Species],
    options: &ChemkinOptions,
    diag: &mut Diagnostics,
) -> Result<(Vec<Species>, Vec<Reaction>), ChemkinError> {
    let mut declarations: Vec<Declaration> = Vec::new();
    let mut thermo_blocks: Vec<ThermoBlock> = Vec::new();
    let mut reaction_texts: Vec<ReactionText> = Vec::new();
    let mut trailing: Vec<String> = Vec::new();
    let mut units = ReactionUnits::default();

    let mut i = 0;
    while i < lines.len() {
        match section_header(&lines[i]) {
            Some(Section::Elements) => i = skip_section(lines, i),
            Some(Section::Species) => {
                i = read_species_section(lines, i, &mut declarations, diag);
            }
            Some(Section::Thermo) => {
                let (block, next) = read_thermo_block(lines, i, true, diag)?;
                thermo_blocks.push(block);
                i = next;
            }
            Some(Section::Reactions) => {
                let (header, _) = remove_comment_from_line(&lines[i]);
                units = ReactionUnits::from_header(header)?;
                let (mut texts, after, next) = read_reaction_section(lines, i + 1)?;
                reaction_texts.append(&mut texts);
                trailing = after;
                i = next;
            }
            None => i += 1,
        }
    }

    let by_name: HashMap<String, &Species> =
        dictionary.iter().map(|s| (s.to_string(), s)).collect();
    let mut species: Vec<Species> = Vec::with_capacity(declarations.len());
    let mut positions: HashMap<String, usize> = HashMap::new();
    for declaration in declarations.iter() {
        let known = by_name.get(&declaration.name).or_else(|| {
            declaration
                .alias
                .as_ref()
                .and_then(|alias| by_name.get(alias))
        });
        let mut spc = match known {
            Some(known) => (*known).clone(),
            None => Species::new(&declaration.name),
        };
        let name = match (&declaration.alias, options.use_chemkin_names) {
            (Some(alias), false) => alias,
            _ => &declaration.name,
        };
        let (label, index) = split_index_suffix(name);
        spc.label = label;
        spc.index = index;
        positions.insert(declaration.name.clone(), species.len());
        species.push(spc);
    }
    disambiguate_labels(&mut species, diag);

    for block in thermo_blocks.iter() {
        attach_thermo(block, &mut species, &positions, true, diag);
    }
    if let Some(thermo_path) = &options.thermo_path {
        let thermo_lines = read_lines(thermo_path)?;
        let has_header = thermo_lines
            .iter()
            .find(|l| !remove_comment_from_line(l).0.trim().is_empty())
            .is_some_and(|l| section_header(l) == Some(Section::Thermo));
        let (block, _) = read_thermo_block(&thermo_lines, 0, has_header, diag)?;
        attach_thermo(&block, &mut species, &positions, false, diag);
    }
    for spc in species.iter_mut() {
        if spc.molecule.is_none() {
            spc.molecule = spc.formula.as_ref().and_then(monatomic_structure);
        }
        spc.reactive = !spc.is_inert(&options.inert_species);
    }

    let comments = associate_comments(&mut reaction_texts, trailing);
    let mut reactions = Vec::with_capacity(reaction_texts.len());
    for (k, (text, comments)) in reaction_texts.iter().zip(comments.iter()).enumerate() {
        let entry: Vec<&str> = text.lines.iter().map(String::as_str).collect();
        let mut reaction = read_reaction_entry(&entry, &positions, &units, k + 1)?;
        if options.read_comments {
            apply_comments(&mut reaction, comments);
        }
        reactions.push(reaction);
    }
    // inert species taking part in a reaction are reactive after all
    for reaction in reactions.iter() {
        for position in reaction.reactants.iter().chain(reaction.products.iter()) {
            species[*position].reactive = true;
        }
    }

    if let Some(transport_path) = &options.transport_path {
        let mut by_token: HashMap<String, Species> = positions
            .iter()
            .map(|(name, position)| (name.clone(), species[*position].clone()))
            .collect();
        load_transport_file(transport_path, &mut by_token)?;
        for (name, spc) in by_token.into_iter() {
            if let Some(position) = positions.get(&name) {
                species[*position].transport = spc.transport;
            }
        }
    }

    if options.check_duplicates {
        check_for_unmarked_duplicates(&reactions, &species)?;
    }
    info!(
        "mechanism read: {} species, {} reactions",
        species.len(),
        reactions.len()
    );
    Ok((species, reactions))
}

/// Loads a mechanism file and, when given, its species dictionary.
pub fn load_chemkin_file(
    chem_path: &Path,
    dictionary_path: Option<&Path>,
    options: &ChemkinOptions,
    diag: &mut Diagnostics,
) -> Result<(Vec<Species>, Vec<Reaction>), ChemkinError> {
    let dictionary = match dictionary_path {
        Some(path) => load_species_dictionary(path, &options.inert_species)?,
        None => Vec::new(),
    };
    let lines = read_lines(chem_path)?;
    read_chemkin_mechanism(&lines, &dictionary, options, diag)
}

/// Element symbols of all species, Hill ordered.
fn collect_elements(species: &[Species]) -> Vec<String> {
    let mut total = ElementCount::new();
    for counts in species.iter().filter_map(|s| s.element_count()) {
        for (element, n) in counts.into_iter() {
            *total.entry(element).or_insert(0) += n;
        }
    }
    hill_order(&total).into_iter().map(|(e, _)| e).collect()
}

/// Formats a complete mechanism file.
pub fn write_chemkin_mechanism(
    species: &[Species],
    reactions: &[Reaction],
    options: &WriterOptions,
    diag: &mut Diagnostics,
) -> Result<String, ChemkinError> {
    let identifiers = species
        .iter()
        .map(|s| s.identifier())
        .collect::<Result<Vec<String>, ChemkinError>>()?;
    let mut unique = HashSet::new();
    if let Some(repeated) = identifiers.iter().find(|id| !unique.insert(id.as_str())) {
        return Err(ChemkinError::DuplicateIdentifier(repeated.clone()));
    }

    let mut s = String::new();
    s.push_str("ELEMENTS\n");
    s.push_str(&format!("    {}\n", collect_elements(species).join(" ")));
    s.push_str("END\n\n");

    s.push_str("SPECIES\n");
    for identifier in identifiers.iter() {
        s.push_str(&format!("    {}\n", identifier));
    }
    s.push_str("END\n\n");

    s.push_str("THERM ALL\n");
    s.push_str(DEFAULT_TEMPERATURES);
    s.push_str("\n\n");
    for (spc, identifier) in species.iter().zip(identifiers.iter()) {
        match (&spc.thermo, spc.element_count()) {
            (Some(thermo), Some(formula)) => {
                s.push_str(&write_thermo_entry(identifier, thermo, &formula, options.verbose));
                s.push('\n');
            }
            _ => diag.warning(format!(
                "Species {} has no thermo data and was not written to the thermo block.",
                identifier
            )),
        }
    }
    s.push_str("END\n\n");

    let mut working: Vec<Reaction> = reactions.to_vec();
    if options.check_for_duplicates {
        mark_duplicate_reactions(&mut working, species, diag);
    }
    s.push_str("REACTIONS    KCAL/MOLE   MOLES\n\n");
    for reaction in working.iter() {
        if options.verbose {
            s.push_str(&format!("! Reaction index: {}\n", reaction.index));
        }
        if let Some(family) = &reaction.family {
            s.push_str(&format!("! Template reaction: {}\n", family));
        }
        if let Some(library) = &reaction.library {
            s.push_str(&format!("! Library reaction: {}\n", library));
        }
        if options.verbose {
            for line in reaction.comment.lines() {
                s.push_str(&format!("! {}\n", line));
            }
        }
        s.push_str(&write_reaction_entry(reaction, species)?);
        s.push('\n');
    }
    s.push_str("END\n");
    Ok(s)
}

/// Writes a mechanism file. The `DUPLICATE` adjustments made for writing
/// do not touch `reactions`.
pub fn save_chemkin_file(
    path: &Path,
    species: &[Species],
    reactions: &[Reaction],
    options: &WriterOptions,
    diag: &mut Diagnostics,
) -> Result<(), ChemkinError> {
    let text = write_chemkin_mechanism(species, reactions, options, diag)?;
    let mut f = BufWriter::new(File::create(path)?);
    f.write_all(text.as_bytes())?;
    f.flush()?;
    info!(
        "mechanism with {} species and {} reactions written to '{}'",
        species.len(),
        reactions.len(),
        path.display()
    );
    Ok(())
}

/////////////////////////////////////SUMMARY////////////////////////////////////////////////

pub fn species_table(species: &[Species]) -> Table {
    let mut table = Table::new();
    table.add_row(row![
        "Identifier", "Formula", "M, g/mol", "Thermo", "Transport", "Reactive"
    ]);
    for spc in species.iter() {
        let identifier = spc.identifier().unwrap_or_else(|_| spc.to_string());
        table.add_row(row![
            identifier,
            spc.hill_formula().unwrap_or_else(|| "?".to_string()),
            spc.molar_mass()
                .map(|m| format!("{:.3}", m))
                .unwrap_or_else(|| "?".to_string()),
            if spc.thermo.is_some() { "yes" } else { "no" },
            if spc.transport.is_some() { "yes" } else { "no" },
            if spc.reactive { "yes" } else { "no" }
        ]);
    }
    table
}

pub fn reactions_table(reactions: &[Reaction], species: &[Species]) -> Table {
    let mut table = Table::new();
    table.add_row(row!["#", "Equation", "Kinetics", "Family", "Duplicate"]);
    for reaction in reactions.iter() {
        table.add_row(row![
            reaction.index,
            reaction.display(species),
            reaction.kinetics.model_name(),
            reaction
                .family
                .as_deref()
                .or(reaction.library.as_deref())
                .unwrap_or("-"),
            if reaction.duplicate { "DUP" } else { "" }
        ]);
    }
    table
}

pub fn print_summary(species: &[Species], reactions: &[Reaction]) {
    species_table(species).printstd();
    reactions_table(reactions, species).printstd();
}
